//! Tidal exchange with the ocean
//!
//! On a rising tide ocean water flows in and mixes with the estuary. With volume
//! $V = A (z + h)$ the concentration of each dissolved quantity obeys
//! $$ \frac{dC}{dt} = \frac{\max(dh/dt, 0)}{z + h} (C_{ocean} - C) $$
//! On a falling tide well-mixed estuary water leaves, which lowers the volume but
//! not the concentrations, so the contribution is zero.

use super::water_depth;
use super::Tide;
use estuary_core::constants::{OCEAN_NITRATE, OCEAN_SALINITY, OXYGEN_SATURATION};
use estuary_core::state::{EstuaryState, Tendency};
use estuary_core::timeseries::{FloatValue, Time};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OceanExchange {
    tide: Tide,
    /// unit: g / kg
    salinity: FloatValue,
    /// unit: µmol / L
    nitrate: FloatValue,
    /// unit: µmol / L
    oxygen: FloatValue,
}

impl OceanExchange {
    pub fn new(tide: Tide) -> Self {
        Self {
            tide,
            salinity: OCEAN_SALINITY,
            nitrate: OCEAN_NITRATE,
            oxygen: OXYGEN_SATURATION,
        }
    }

    /// Fraction of the estuary volume renewed with ocean water per day
    /// unit: 1 / day
    pub fn renewal_rate(&self, t: Time, state: &EstuaryState) -> FloatValue {
        let rate = self.tide.rate(t);
        if rate <= 0.0 {
            return 0.0;
        }
        rate / water_depth(state.tidal_height)
    }

    pub fn tendency(&self, t: Time, state: &EstuaryState) -> Tendency {
        if !self.tide.is_enabled() {
            return Tendency::ZERO;
        }
        let renewal = self.renewal_rate(t, state);
        if renewal == 0.0 {
            return Tendency::ZERO;
        }

        Tendency {
            salinity: renewal * (self.salinity - state.salinity),
            tidal_height: 0.0,
            nitrate: renewal * (self.nitrate - state.nitrate),
            oxygen: renewal * (self.oxygen - state.oxygen),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use estuary_core::constants::MEAN_DEPTH;

    fn brackish() -> EstuaryState {
        EstuaryState {
            salinity: 10.0,
            tidal_height: 0.0,
            nitrate: 80.0,
            oxygen: 120.0,
        }
    }

    #[test]
    fn no_exchange_without_tides() {
        let exchange = OceanExchange::new(Tide::new(false));
        for i in 0..200 {
            let t = i as Time * 0.01;
            assert_eq!(exchange.tendency(t, &brackish()), Tendency::ZERO);
        }
    }

    #[test]
    fn rising_tide_pulls_towards_ocean_values() {
        let tide = Tide::new(true);
        let exchange = OceanExchange::new(tide);
        let state = brackish();

        let tendency = exchange.tendency(0.0, &state);
        let renewal = tide.rate(0.0) / MEAN_DEPTH;

        assert!(tendency.salinity > 0.0);
        assert!(tendency.nitrate < 0.0);
        assert!(tendency.oxygen > 0.0);
        assert_eq!(tendency.tidal_height, 0.0);
        assert_relative_eq!(tendency.salinity, renewal * (OCEAN_SALINITY - 10.0));
        assert_relative_eq!(tendency.nitrate, renewal * (OCEAN_NITRATE - 80.0));
    }

    #[test]
    fn falling_tide_leaves_concentrations_unchanged() {
        let tide = Tide::new(true);
        let exchange = OceanExchange::new(tide);
        let t = tide.period() / 2.0;

        assert!(!tide.is_flooding(t));
        assert_eq!(exchange.tendency(t, &brackish()), Tendency::ZERO);
    }

    #[test]
    fn shallow_water_renews_faster() {
        let exchange = OceanExchange::new(Tide::new(true));
        let low = EstuaryState {
            tidal_height: -0.5,
            ..brackish()
        };
        let high = EstuaryState {
            tidal_height: 0.5,
            ..brackish()
        };
        assert!(exchange.renewal_rate(0.0, &low) > exchange.renewal_rate(0.0, &high));
    }

    #[test]
    fn ocean_water_is_in_equilibrium() {
        let exchange = OceanExchange::new(Tide::new(true));
        let tendency = exchange.tendency(0.0, &EstuaryState::baseline());
        assert!(tendency.is_zero());
    }
}
