//! Freshwater inflow from the river
//!
//! The river replaces a constant fraction of the mean estuary volume with water
//! carrying no salt, the configured nitrate level and saturated oxygen:
//! $$ \frac{dC}{dt} = r \frac{z}{z + h} (C_{river} - C) $$

use super::water_depth;
use estuary_core::config::Configuration;
use estuary_core::constants::{HOURS_PER_DAY, MEAN_DEPTH, RIVER_OXYGEN};
use estuary_core::state::{EstuaryState, Tendency};
use estuary_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiverInflow {
    /// Fraction of the mean volume supplied by the river
    /// unit: 1 / day
    flushing_rate: FloatValue,
    /// unit: µmol / L
    nitrate: FloatValue,
    /// unit: µmol / L
    oxygen: FloatValue,
}

impl RiverInflow {
    /// `flow_fraction` is the fraction of the mean volume replaced each hour
    pub fn new(flow_fraction: FloatValue, nitrate: FloatValue) -> Self {
        Self {
            flushing_rate: flow_fraction * HOURS_PER_DAY,
            nitrate,
            oxygen: RIVER_OXYGEN,
        }
    }

    pub fn from_configuration(configuration: &Configuration) -> Self {
        Self::new(
            configuration.river_flow_fraction(),
            configuration.river_nitrate_level(),
        )
    }

    pub fn flushing_rate(&self) -> FloatValue {
        self.flushing_rate
    }

    /// Rate at which river water dilutes the current volume
    /// unit: 1 / day
    pub fn dilution_rate(&self, state: &EstuaryState) -> FloatValue {
        self.flushing_rate * MEAN_DEPTH / water_depth(state.tidal_height)
    }

    pub fn tendency(&self, state: &EstuaryState) -> Tendency {
        if self.flushing_rate == 0.0 {
            return Tendency::ZERO;
        }
        let dilution = self.dilution_rate(state);

        Tendency {
            salinity: -dilution * state.salinity,
            tidal_height: 0.0,
            nitrate: dilution * (self.nitrate - state.nitrate),
            oxygen: dilution * (self.oxygen - state.oxygen),
        }
    }
}
