//! Air-sea exchange of oxygen
//!
//! $$ \frac{dO}{dt} = \frac{G}{z + h} (O_{sat} - O) $$
//!
//! where $G$ is the exchange velocity in m/day. The term acts at all times,
//! independent of the tide.

use super::water_depth;
use estuary_core::config::Configuration;
use estuary_core::constants::OXYGEN_SATURATION;
use estuary_core::state::{EstuaryState, Tendency};
use estuary_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasExchange {
    /// unit: m / day
    velocity: FloatValue,
    /// unit: µmol / L
    saturation: FloatValue,
}

impl GasExchange {
    pub fn new(velocity: FloatValue) -> Self {
        Self {
            velocity,
            saturation: OXYGEN_SATURATION,
        }
    }

    pub fn from_configuration(configuration: &Configuration) -> Self {
        Self::new(configuration.gas_exchange_rate())
    }

    pub fn tendency(&self, state: &EstuaryState) -> Tendency {
        Tendency {
            oxygen: self.velocity / water_depth(state.tidal_height)
                * (self.saturation - state.oxygen),
            ..Tendency::ZERO
        }
    }
}
