//! Initial value problems and their explicit time integration
//!
//! A model implements [`IVP`] to provide the right-hand side of its ODE system.
//! [`Integrator`] advances it with fixed forward Euler steps:
//!
//! $$ y_{n+1} = y_n + \Delta t \, f(t_n, y_n) $$
//!
//! There is no error control. Large steps or strong forcing can make the explicit
//! scheme overshoot; this shows up as a [`NumericalDivergenceError`] rather than
//! being repaired.
//!
//! [`IVPSolver`] wraps the same right-hand side as an [`ode_solvers::System`] so that
//! it can be checked against a higher-order reference solution.

use crate::errors::{DivergedRun, NumericalDivergenceError};
use crate::state::{EstuaryState, ModelState};
use crate::timeseries::{Completion, FloatValue, OutputSeries, Phase, Time, TimeAxis};
use ode_solvers::{Rk4, System};
use std::ops::RangeInclusive;

/// Values derived from the run history that stay fixed for one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInputs {
    /// Multiplier applied to the configured productivity
    pub productivity_scale: FloatValue,
}

impl Default for StepInputs {
    fn default() -> Self {
        Self {
            productivity_scale: 1.0,
        }
    }
}

/// An ODE system `dy/dt = f(t, y)`
pub trait IVP<T, S> {
    /// Evaluate the derivative of `y` at time `t`
    fn calculate_dy_dt(&self, t: T, inputs: &StepInputs, y: &S, dy_dt: &mut S);

    /// Inputs for the step starting at `t`, given the snapshots recorded so far
    fn step_inputs(&self, _t: T, _history: &OutputSeries) -> StepInputs {
        StepInputs::default()
    }

    /// Overwrite the components of `y` that are known functions of time
    ///
    /// Called after every step with the time at the end of the step.
    fn apply_prescribed(&self, _t: T, _y: &mut S) {}
}

/// Fixed-step forward Euler integration over a spin-up and a production phase
#[derive(Debug, Clone)]
pub struct Integrator<M> {
    model: M,
    time_axis: TimeAxis,
    initial_state: EstuaryState,
}

impl<M> Integrator<M>
where
    M: IVP<Time, ModelState>,
{
    pub fn new(model: M, time_axis: TimeAxis, initial_state: EstuaryState) -> Self {
        Self {
            model,
            time_axis,
            initial_state,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Integrate from the start of spin-up to the horizon
    ///
    /// Every snapshot, including the initial state, is recorded. If a step produces
    /// an invalid state the run stops and the snapshots before that step are
    /// returned alongside the error.
    pub fn run(&self) -> Result<OutputSeries, DivergedRun> {
        let mut series = OutputSeries::with_capacity(self.time_axis);
        let mut y = self.initial_state.to_vector();
        let t_start = self.time_axis.time_at(0);
        self.model.apply_prescribed(t_start, &mut y);
        series.push(t_start, EstuaryState::from_vector(&y));

        for phase in [Phase::SpinUp, Phase::Production] {
            if let Err(error) = self.run_phase(self.phase_steps(phase), &mut y, &mut series) {
                series.finish(Completion::Diverged);
                return Err(DivergedRun {
                    error,
                    partial: series,
                });
            }
        }

        series.finish(Completion::Complete);
        Ok(series)
    }

    /// Step indices belonging to a phase
    ///
    /// Step `k` advances the state from snapshot `k - 1` to snapshot `k`.
    fn phase_steps(&self, phase: Phase) -> RangeInclusive<usize> {
        let boundary = self.time_axis.spin_up_steps();
        match phase {
            Phase::SpinUp => 1..=boundary,
            Phase::Production => boundary + 1..=self.time_axis.total_steps(),
        }
    }

    fn run_phase(
        &self,
        steps: RangeInclusive<usize>,
        y: &mut ModelState,
        series: &mut OutputSeries,
    ) -> Result<(), NumericalDivergenceError> {
        let dt = self.time_axis.dt();
        let mut dy_dt = ModelState::zeros();

        for step in steps {
            let t = self.time_axis.time_at(step - 1);
            let inputs = self.model.step_inputs(t, series);
            self.model.calculate_dy_dt(t, &inputs, y, &mut dy_dt);
            *y += dy_dt * dt;

            let t_next = self.time_axis.time_at(step);
            self.model.apply_prescribed(t_next, y);

            let state = EstuaryState::from_vector(y);
            if let Some((field, value)) = state.first_violation() {
                return Err(NumericalDivergenceError {
                    step,
                    time: t_next,
                    field,
                    value,
                });
            }
            series.push(t_next, state);
        }
        Ok(())
    }
}

/// Adapter exposing an [`IVP`] to the `ode_solvers` integrators
///
/// The step inputs are held fixed for the whole integration.
pub struct IVPSolver<'a, M> {
    model: &'a M,
    inputs: StepInputs,
}

impl<'a, M> IVPSolver<'a, M>
where
    M: IVP<Time, ModelState>,
{
    pub fn new(model: &'a M, inputs: StepInputs) -> Self {
        Self { model, inputs }
    }

    /// Classical fourth-order Runge-Kutta solver from `t0` to `t1`
    pub fn to_rk4(self, t0: Time, t1: Time, step: Time, y0: ModelState) -> Rk4<Time, ModelState, Self> {
        Rk4::new(self, t0, y0, t1, step)
    }
}

impl<M> System<Time, ModelState> for IVPSolver<'_, M>
where
    M: IVP<Time, ModelState>,
{
    fn system(&self, t: Time, y: &ModelState, dy: &mut ModelState) {
        self.model.calculate_dy_dt(t, &self.inputs, y, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StateField;
    use is_close::is_close;

    /// Oxygen decays exponentially, everything else stays put
    struct Decay {
        rate: FloatValue,
    }

    impl IVP<Time, ModelState> for Decay {
        fn calculate_dy_dt(
            &self,
            _t: Time,
            inputs: &StepInputs,
            y: &ModelState,
            dy_dt: &mut ModelState,
        ) {
            dy_dt.fill(0.0);
            dy_dt[StateField::Oxygen.index()] =
                -self.rate * inputs.productivity_scale * y[StateField::Oxygen.index()];
        }
    }

    /// Tidal height follows a prescribed ramp
    struct Ramp;

    impl IVP<Time, ModelState> for Ramp {
        fn calculate_dy_dt(
            &self,
            _t: Time,
            _inputs: &StepInputs,
            _y: &ModelState,
            dy_dt: &mut ModelState,
        ) {
            dy_dt.fill(0.0);
            dy_dt[StateField::TidalHeight.index()] = 1.0;
        }

        fn apply_prescribed(&self, t: Time, y: &mut ModelState) {
            y[StateField::TidalHeight.index()] = 2.0 * t;
        }
    }

    #[test]
    fn euler_step_matches_closed_form() {
        let axis = TimeAxis::new(0.1, 0.5, 1.0).unwrap();
        let integrator = Integrator::new(Decay { rate: 2.0 }, axis, EstuaryState::baseline());
        let series = integrator.run().unwrap();

        assert_eq!(series.len(), 16);
        assert!(series.is_complete());
        for (k, snapshot) in series.iter().enumerate() {
            let expected = EstuaryState::baseline().oxygen * (1.0 - 0.2_f64).powi(k as i32);
            assert!(is_close!(snapshot.state.oxygen, expected));
            assert_eq!(snapshot.state.salinity, EstuaryState::baseline().salinity);
        }
    }

    #[test]
    fn boundary_index_counts_spin_up_steps() {
        let axis = TimeAxis::new(0.25, 2.0, 1.0).unwrap();
        let series = Integrator::new(Decay { rate: 0.1 }, axis, EstuaryState::baseline())
            .run()
            .unwrap();

        assert_eq!(series.spin_up_index(), 8);
        assert_eq!(series.spin_up().len(), 8);
        assert_eq!(series[8].time, 0.0);
        assert_eq!(series.last().unwrap().time, 1.0);
    }

    #[test]
    fn prescribed_components_follow_forcing() {
        let axis = TimeAxis::new(0.1, 1.0, 1.0).unwrap();
        let series = Integrator::new(Ramp, axis, EstuaryState::baseline())
            .run()
            .unwrap();

        for snapshot in &series {
            assert_eq!(snapshot.state.tidal_height, 2.0 * snapshot.time);
        }
    }

    #[test]
    fn overshoot_stops_the_run() {
        // dt * rate = 1.5 sends oxygen negative on the first step
        let axis = TimeAxis::new(0.5, 1.0, 1.0).unwrap();
        let result = Integrator::new(Decay { rate: 3.0 }, axis, EstuaryState::baseline()).run();

        let diverged = result.unwrap_err();
        assert_eq!(diverged.error.step, 1);
        assert_eq!(diverged.error.field, StateField::Oxygen);
        assert!(is_close!(diverged.error.time, -0.5));
        assert!(is_close!(
            diverged.error.value,
            -0.5 * EstuaryState::baseline().oxygen
        ));
        assert_eq!(diverged.partial.len(), diverged.error.step);
        assert_eq!(diverged.partial.completion(), Completion::Diverged);
    }

    #[test]
    fn rk4_reference_agrees_with_fine_euler() {
        let model = Decay { rate: 0.5 };
        let y0 = EstuaryState::baseline().to_vector();

        let mut solver = IVPSolver::new(&model, StepInputs::default()).to_rk4(0.0, 1.0, 0.01, y0);
        solver.integrate().unwrap();
        let (_, y_out) = solver.results().get();
        let reference = y_out.last().unwrap()[StateField::Oxygen.index()];

        let exact = y0[StateField::Oxygen.index()] * (-0.5_f64).exp();
        assert!((reference - exact).abs() < 1e-8);

        let axis = TimeAxis::new(0.001, 0.0, 1.0).unwrap();
        let series = Integrator::new(model, axis, EstuaryState::baseline())
            .run()
            .unwrap();
        let euler = series.last().unwrap().state.oxygen;
        assert!((euler - reference).abs() / reference < 1e-3);
    }
}
