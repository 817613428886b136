//! Semi-diurnal tide
//!
//! The sea surface at the estuary mouth follows
//! $$ h(t) = A \sin\left(\frac{2\pi t}{P}\right) $$
//! and the rate used to drive ocean exchange is its analytic derivative
//! $$ \frac{dh}{dt} = A \frac{2\pi}{P} \cos\left(\frac{2\pi t}{P}\right) $$
//!
//! Both vanish identically when tides are disabled.

use estuary_core::config::Configuration;
use estuary_core::constants::{TIDAL_AMPLITUDE, TIDAL_PERIOD};
use estuary_core::state::Tendency;
use estuary_core::timeseries::{FloatValue, Time};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tide {
    enabled: bool,
    /// unit: m
    amplitude: FloatValue,
    /// unit: day
    period: Time,
}

impl Tide {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            amplitude: TIDAL_AMPLITUDE,
            period: TIDAL_PERIOD,
        }
    }

    pub fn from_configuration(configuration: &Configuration) -> Self {
        Self::new(configuration.tides_enabled())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn amplitude(&self) -> FloatValue {
        self.amplitude
    }

    pub fn period(&self) -> Time {
        self.period
    }

    fn angular_frequency(&self) -> FloatValue {
        2.0 * PI / self.period
    }

    /// Sea-surface displacement from the mean depth
    /// unit: m
    pub fn height(&self, t: Time) -> FloatValue {
        if !self.enabled {
            return 0.0;
        }
        self.amplitude * (self.angular_frequency() * t).sin()
    }

    /// Rate of change of the sea surface, positive on a rising tide
    /// unit: m / day
    pub fn rate(&self, t: Time) -> FloatValue {
        if !self.enabled {
            return 0.0;
        }
        let omega = self.angular_frequency();
        self.amplitude * omega * (omega * t).cos()
    }

    /// Ocean water is entering the estuary
    pub fn is_flooding(&self, t: Time) -> bool {
        self.rate(t) > 0.0
    }

    /// Contribution of the tide to the state derivative
    ///
    /// Only the tidal height changes; exchange of dissolved quantities is handled by
    /// [`OceanExchange`](super::OceanExchange).
    pub fn tendency(&self, t: Time) -> Tendency {
        Tendency {
            tidal_height: self.rate(t),
            ..Tendency::ZERO
        }
    }
}
