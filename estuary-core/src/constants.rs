//! Physical constants and boundary values of the estuary box model
//!
//! Concentrations use µmol/L (equivalently mmol/m^3), salinity uses g/kg and
//! time is measured in days.

use crate::timeseries::{FloatValue, Time};
use std::f64::consts::PI;

pub const HOURS_PER_DAY: FloatValue = 24.0;

/// Salinity of the ocean water entering on a rising tide
/// unit: g / kg
pub const OCEAN_SALINITY: FloatValue = 35.0;

/// Nitrate concentration at the ocean boundary
/// unit: µmol / L
pub const OCEAN_NITRATE: FloatValue = 20.0;

/// Saturation concentration of dissolved oxygen, also the ocean boundary value
/// unit: µmol / L
pub const OXYGEN_SATURATION: FloatValue = 231.2;

/// Dissolved oxygen carried by river water
/// unit: µmol / L
pub const RIVER_OXYGEN: FloatValue = 231.2;

/// Mean depth of the estuary
/// unit: m
pub const MEAN_DEPTH: FloatValue = 5.0;

/// Period of the semi-diurnal tide (12.45 h)
/// unit: day
pub const TIDAL_PERIOD: Time = 12.45 / HOURS_PER_DAY;

/// Peak rate of change of the tidal height (0.5 m / h)
/// unit: m / day
pub const PEAK_TIDAL_RATE: FloatValue = 0.5 * HOURS_PER_DAY;

/// Tidal amplitude consistent with [`PEAK_TIDAL_RATE`] and [`TIDAL_PERIOD`]
/// unit: m
pub const TIDAL_AMPLITUDE: FloatValue = PEAK_TIDAL_RATE * TIDAL_PERIOD / (2.0 * PI);

/// Oxygen concentration below which conditions are considered hypoxic.
///
/// Only used to annotate results, the model never branches on it.
/// unit: µmol / L
pub const HYPOXIA_THRESHOLD: FloatValue = 60.0;

/// Length of the spin-up phase that precedes time zero
/// unit: day
pub const SPIN_UP_DURATION: Time = 2.0;

/// Peak areal gross oxygen production at solar noon for productivity 1.0
/// unit: mmol O2 / m^2 / day
pub const PEAK_OXYGEN_PRODUCTION: FloatValue = 125.0;

/// Areal community respiration for productivity 1.0
/// unit: mmol O2 / m^2 / day
pub const COMMUNITY_RESPIRATION: FloatValue = 30.0;

/// Moles of oxygen released per mole of nitrate taken up (Redfield 154:16)
pub const REDFIELD_OXYGEN_PER_NITRATE: FloatValue = 154.0 / 16.0;

/// Nitrate concentration at which uptake runs at half speed
/// unit: µmol / L
pub const NITRATE_HALF_SATURATION: FloatValue = 1.0;

/// Oxygen concentration at which respiration runs at half speed
/// unit: µmol / L
pub const OXYGEN_HALF_SATURATION: FloatValue = 5.0;

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn tidal_amplitude_matches_peak_rate() {
        let peak_rate = TIDAL_AMPLITUDE * 2.0 * PI / TIDAL_PERIOD;
        assert!(is_close!(peak_rate, PEAK_TIDAL_RATE));
        assert!(TIDAL_AMPLITUDE > 0.98 && TIDAL_AMPLITUDE < 1.0);
    }
}
