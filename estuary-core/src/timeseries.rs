//! Time axis and the output series produced by a run

use crate::config::{require_non_negative, require_positive};
use crate::errors::ConfigurationError;
use crate::state::{EstuaryState, StateField};
use serde::{Deserialize, Serialize};
use std::ops::Index;
use std::slice::Iter;

pub type FloatValue = f64;
/// Simulation time in days relative to the end of spin-up
pub type Time = f64;

/// Relative tolerance used when checking that a duration is a whole number of steps
const STEP_TOLERANCE: FloatValue = 1e-9;

/// Largest number of steps a run may take
pub const MAX_STEPS: usize = 10_000_000;

/// Fixed-step time axis spanning the spin-up and production phases
///
/// Simulation time starts at `-spin_up` and finishes at `horizon`.
/// Times are always computed from the step index so that no rounding error
/// accumulates along the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeAxis {
    dt: Time,
    spin_up_steps: usize,
    production_steps: usize,
}

impl TimeAxis {
    /// Create a time axis, checking that both phases are whole numbers of steps
    pub fn new(dt: Time, spin_up: Time, horizon: Time) -> Result<Self, ConfigurationError> {
        let dt = require_positive("dt", dt)?;
        let horizon = require_positive("horizon", horizon)?;
        let spin_up = require_non_negative("spin_up", spin_up)?;

        let spin_up_steps = whole_steps("spin_up", spin_up, dt)?;
        let production_steps = whole_steps("horizon", horizon, dt)?;
        match spin_up_steps.checked_add(production_steps) {
            Some(total) if total <= MAX_STEPS => {}
            _ => {
                return Err(ConfigurationError::TooManySteps {
                    name: "spin_up + horizon",
                    steps: spin_up_steps as FloatValue + production_steps as FloatValue,
                    limit: MAX_STEPS,
                })
            }
        }

        Ok(Self {
            dt,
            spin_up_steps,
            production_steps,
        })
    }

    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Number of steps taken during spin-up
    ///
    /// This is also the index of the first production-phase snapshot.
    pub fn spin_up_steps(&self) -> usize {
        self.spin_up_steps
    }

    pub fn production_steps(&self) -> usize {
        self.production_steps
    }

    pub fn total_steps(&self) -> usize {
        self.spin_up_steps + self.production_steps
    }

    /// Simulation time of the initial state
    pub fn start(&self) -> Time {
        -(self.spin_up_steps as FloatValue) * self.dt
    }

    /// Simulation time at the end of the run
    pub fn end(&self) -> Time {
        self.time_at(self.total_steps())
    }

    /// Simulation time after `step` steps
    pub fn time_at(&self, step: usize) -> Time {
        (step as FloatValue - self.spin_up_steps as FloatValue) * self.dt
    }

    /// Number of snapshots spanning `duration`, rounded up to whole steps
    ///
    /// Durations within [`STEP_TOLERANCE`] of a whole number of steps are not rounded
    /// up, so one day of hourly steps is 24 snapshots.
    pub fn steps_in(&self, duration: Time) -> usize {
        let steps = duration / self.dt;
        let nearest = steps.round();
        let steps = if (steps - nearest).abs() <= STEP_TOLERANCE * nearest.max(1.0) {
            nearest
        } else {
            steps.ceil()
        };
        steps.clamp(1.0, MAX_STEPS as FloatValue) as usize
    }
}

fn whole_steps(
    name: &'static str,
    duration: Time,
    dt: Time,
) -> Result<usize, ConfigurationError> {
    let steps = (duration / dt).round();
    if steps > MAX_STEPS as FloatValue {
        return Err(ConfigurationError::TooManySteps {
            name,
            steps,
            limit: MAX_STEPS,
        });
    }
    if (steps * dt - duration).abs() > STEP_TOLERANCE * duration.max(dt) {
        return Err(ConfigurationError::NotAMultipleOfStep {
            name,
            value: duration,
            dt,
        });
    }
    Ok(steps as usize)
}

/// Phase of the run a snapshot belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    SpinUp,
    Production,
}

/// Whether a series covers the full time axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
    /// The run is still being stepped
    InProgress,
    /// Every step up to the horizon was taken
    Complete,
    /// Stepping stopped at a numerical divergence
    Diverged,
}

/// State of the estuary at a point in simulation time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: Time,
    pub state: EstuaryState,
}

/// Ordered record of the snapshots produced by a run
///
/// Entry 0 is the initial state and entry `k` is the state after `k` steps.
/// Snapshots can only be appended by the integrator; once a run has returned the
/// series is read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSeries {
    time_axis: TimeAxis,
    snapshots: Vec<Snapshot>,
    completion: Completion,
}

impl OutputSeries {
    pub(crate) fn with_capacity(time_axis: TimeAxis) -> Self {
        Self {
            time_axis,
            snapshots: Vec::with_capacity(time_axis.total_steps() + 1),
            completion: Completion::InProgress,
        }
    }

    pub(crate) fn push(&mut self, time: Time, state: EstuaryState) {
        debug_assert!(self.completion == Completion::InProgress);
        self.snapshots.push(Snapshot { time, state });
    }

    pub(crate) fn finish(&mut self, completion: Completion) {
        self.completion = completion;
    }

    pub fn time_axis(&self) -> &TimeAxis {
        &self.time_axis
    }

    pub fn dt(&self) -> Time {
        self.time_axis.dt()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn first(&self) -> Option<&Snapshot> {
        self.snapshots.first()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    pub fn iter(&self) -> Iter<'_, Snapshot> {
        self.snapshots.iter()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn completion(&self) -> Completion {
        self.completion
    }

    pub fn is_complete(&self) -> bool {
        self.completion == Completion::Complete
    }

    /// Index of the first production-phase snapshot
    ///
    /// Every snapshot before this index was produced during spin-up.
    pub fn spin_up_index(&self) -> usize {
        self.time_axis.spin_up_steps()
    }

    /// Snapshots recorded during spin-up
    pub fn spin_up(&self) -> &[Snapshot] {
        &self.snapshots[..self.spin_up_index().min(self.len())]
    }

    /// Snapshots recorded from time zero onwards
    pub fn production(&self) -> &[Snapshot] {
        &self.snapshots[self.spin_up_index().min(self.len())..]
    }

    pub fn phase(&self, index: usize) -> Option<Phase> {
        if index >= self.len() {
            None
        } else if index < self.spin_up_index() {
            Some(Phase::SpinUp)
        } else {
            Some(Phase::Production)
        }
    }

    pub fn times(&self) -> Vec<Time> {
        self.iter().map(|s| s.time).collect()
    }

    /// Values of a single state field in time order
    pub fn column(&self, field: StateField) -> Vec<FloatValue> {
        self.iter().map(|s| s.state.get(field)).collect()
    }

    /// `(time, salinity, tidal height, nitrate, oxygen)` tuples in time order
    pub fn records(
        &self,
    ) -> impl Iterator<Item = (Time, FloatValue, FloatValue, FloatValue, FloatValue)> + '_ {
        self.iter().map(|s| {
            (
                s.time,
                s.state.salinity,
                s.state.tidal_height,
                s.state.nitrate,
                s.state.oxygen,
            )
        })
    }

    /// The most recent snapshots covering `window` days
    ///
    /// The window holds [`TimeAxis::steps_in`] snapshots, or all of them early in a run.
    pub fn trailing(&self, window: Time) -> &[Snapshot] {
        let count = self.time_axis.steps_in(window).min(self.len());
        &self.snapshots[self.len() - count..]
    }

    /// Indices of production-phase snapshots with oxygen below `threshold`
    pub fn hypoxic_indices(&self, threshold: FloatValue) -> Vec<usize> {
        let offset = self.spin_up_index().min(self.len());
        self.production()
            .iter()
            .enumerate()
            .filter(|(_, s)| s.state.oxygen < threshold)
            .map(|(i, _)| i + offset)
            .collect()
    }

    /// Time spent below `threshold` during the production phase
    /// unit: day
    pub fn hypoxic_duration(&self, threshold: FloatValue) -> Time {
        self.hypoxic_indices(threshold).len() as FloatValue * self.dt()
    }
}

impl Index<usize> for OutputSeries {
    type Output = Snapshot;

    fn index(&self, index: usize) -> &Self::Output {
        &self.snapshots[index]
    }
}

impl<'a> IntoIterator for &'a OutputSeries {
    type Item = &'a Snapshot;
    type IntoIter = Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
