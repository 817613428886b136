//! Primary production and respiration
//!
//! Net community production per unit area is
//! $$ NCP = P \left( P_{max}\, L(t) \frac{N}{N + K_N} - R \frac{O}{O + K_O} \right) $$
//! with daylight $L(t) = \max(0, -\cos 2\pi t)$ peaking at solar noon.
//! Oxygen gains $NCP / (z + h)$ and nitrate is drawn down in Redfield proportion.
//!
//! Averaged over a day production outweighs respiration, so biology is a net sink of
//! nitrate and a net source of oxygen. Respiration dominates at night. The Monod
//! factors stop uptake as nitrate runs out and respiration as oxygen runs out.

use super::water_depth;
use estuary_core::config::Configuration;
use estuary_core::constants::{
    COMMUNITY_RESPIRATION, NITRATE_HALF_SATURATION, OXYGEN_HALF_SATURATION,
    PEAK_OXYGEN_PRODUCTION, REDFIELD_OXYGEN_PER_NITRATE,
};
use estuary_core::state::{EstuaryState, Tendency};
use estuary_core::timeseries::{FloatValue, Time};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Fraction of peak sunlight at time `t` (days since midnight)
pub fn daylight(t: Time) -> FloatValue {
    (-(2.0 * PI * t).cos()).max(0.0)
}

fn monod(concentration: FloatValue, half_saturation: FloatValue) -> FloatValue {
    concentration / (concentration + half_saturation)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Biology {
    productivity: FloatValue,
}

impl Biology {
    pub fn new(productivity: FloatValue) -> Self {
        Self { productivity }
    }

    pub fn from_configuration(configuration: &Configuration) -> Self {
        Self::new(configuration.biological_productivity())
    }

    pub fn productivity(&self) -> FloatValue {
        self.productivity
    }

    /// Net community production per unit area
    /// unit: mmol O2 / m^2 / day
    pub fn net_community_production(
        &self,
        t: Time,
        state: &EstuaryState,
        productivity_scale: FloatValue,
    ) -> FloatValue {
        let production =
            PEAK_OXYGEN_PRODUCTION * daylight(t) * monod(state.nitrate, NITRATE_HALF_SATURATION);
        let respiration = COMMUNITY_RESPIRATION * monod(state.oxygen, OXYGEN_HALF_SATURATION);
        self.productivity * productivity_scale * (production - respiration)
    }

    pub fn tendency(
        &self,
        t: Time,
        state: &EstuaryState,
        productivity_scale: FloatValue,
    ) -> Tendency {
        if self.productivity == 0.0 || productivity_scale == 0.0 {
            return Tendency::ZERO;
        }
        let ncp = self.net_community_production(t, state, productivity_scale);
        let depth = water_depth(state.tidal_height);

        Tendency {
            salinity: 0.0,
            tidal_height: 0.0,
            nitrate: -ncp / (REDFIELD_OXYGEN_PER_NITRATE * depth),
            oxygen: ncp / depth,
        }
    }
}
