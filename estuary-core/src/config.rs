//! Configuration of an estuary run
//!
//! [`EstuaryParameters`], [`TimeSettings`] and [`InitialConditions`] are plain,
//! unvalidated values that can be deserialised from a scenario file.
//! Each is validated independently into the immutable values used by a run.

use crate::constants::{OCEAN_SALINITY, SPIN_UP_DURATION};
use crate::errors::{ConfigurationError, EstuaryResult};
use crate::state::EstuaryState;
use crate::timeseries::{FloatValue, Time, TimeAxis};
use serde::{Deserialize, Serialize};

/// User-selectable parameters of the estuary model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstuaryParameters {
    /// Whether the estuary is connected to a tidal ocean
    pub tides_enabled: bool,
    /// Air-sea gas exchange velocity
    /// unit: m / day
    pub gas_exchange_rate: FloatValue,
    /// System productivity relative to normal conditions.
    /// 0.5 is roughly a cloudy day, 2.0 a bloom
    pub biological_productivity: FloatValue,
    /// Fraction of the mean estuary volume replaced by river water each hour
    pub river_flow_fraction: FloatValue,
    /// Nitrate concentration of the river water
    /// unit: µmol / L
    pub river_nitrate_level: FloatValue,
    /// Scale production-phase productivity by the nitrate available over the previous day
    pub nutrient_limitation: bool,
}

impl Default for EstuaryParameters {
    fn default() -> Self {
        Self {
            tides_enabled: false,
            gas_exchange_rate: 3.0,
            biological_productivity: 1.0,
            river_flow_fraction: 0.05,
            river_nitrate_level: 100.0,
            nutrient_limitation: false,
        }
    }
}

/// Validated, immutable model configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    tides_enabled: bool,
    gas_exchange_rate: FloatValue,
    biological_productivity: FloatValue,
    river_flow_fraction: FloatValue,
    river_nitrate_level: FloatValue,
    nutrient_limitation: bool,
}

impl Configuration {
    pub fn from_parameters(parameters: &EstuaryParameters) -> Result<Self, ConfigurationError> {
        Ok(Self {
            tides_enabled: parameters.tides_enabled,
            gas_exchange_rate: require_positive(
                "gas_exchange_rate",
                parameters.gas_exchange_rate,
            )?,
            biological_productivity: require_non_negative(
                "biological_productivity",
                parameters.biological_productivity,
            )?,
            river_flow_fraction: require_non_negative(
                "river_flow_fraction",
                parameters.river_flow_fraction,
            )?,
            river_nitrate_level: require_non_negative(
                "river_nitrate_level",
                parameters.river_nitrate_level,
            )?,
            nutrient_limitation: parameters.nutrient_limitation,
        })
    }

    pub fn tides_enabled(&self) -> bool {
        self.tides_enabled
    }

    pub fn gas_exchange_rate(&self) -> FloatValue {
        self.gas_exchange_rate
    }

    pub fn biological_productivity(&self) -> FloatValue {
        self.biological_productivity
    }

    pub fn river_flow_fraction(&self) -> FloatValue {
        self.river_flow_fraction
    }

    pub fn river_nitrate_level(&self) -> FloatValue {
        self.river_nitrate_level
    }

    pub fn nutrient_limitation(&self) -> bool {
        self.nutrient_limitation
    }

    pub fn has_river(&self) -> bool {
        self.river_flow_fraction > 0.0
    }

    /// The parameters this configuration was built from
    pub fn parameters(&self) -> EstuaryParameters {
        EstuaryParameters {
            tides_enabled: self.tides_enabled,
            gas_exchange_rate: self.gas_exchange_rate,
            biological_productivity: self.biological_productivity,
            river_flow_fraction: self.river_flow_fraction,
            river_nitrate_level: self.river_nitrate_level,
            nutrient_limitation: self.nutrient_limitation,
        }
    }
}

impl TryFrom<&EstuaryParameters> for Configuration {
    type Error = ConfigurationError;

    fn try_from(value: &EstuaryParameters) -> Result<Self, Self::Error> {
        Configuration::from_parameters(value)
    }
}

/// Step size and duration of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSettings {
    /// unit: day
    pub dt: Time,
    /// Length of the production phase after time zero
    /// unit: day
    pub horizon: Time,
    /// Length of the spin-up phase before time zero
    /// unit: day
    pub spin_up: Time,
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            dt: 1.0 / 24.0,
            horizon: 40.0,
            spin_up: SPIN_UP_DURATION,
        }
    }
}

impl TimeSettings {
    pub fn time_axis(&self) -> Result<TimeAxis, ConfigurationError> {
        TimeAxis::new(self.dt, self.spin_up, self.horizon)
    }
}

/// Concentrations at the start of spin-up
///
/// Defaults to the ocean boundary values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConditions {
    /// unit: g / kg
    pub salinity: FloatValue,
    /// unit: µmol / L
    pub nitrate: FloatValue,
    /// unit: µmol / L
    pub oxygen: FloatValue,
}

impl Default for InitialConditions {
    fn default() -> Self {
        let baseline = EstuaryState::baseline();
        Self {
            salinity: baseline.salinity,
            nitrate: baseline.nitrate,
            oxygen: baseline.oxygen,
        }
    }
}

impl InitialConditions {
    /// Validate the concentrations into a state at mean depth
    pub fn to_state(&self) -> Result<EstuaryState, ConfigurationError> {
        let salinity = require_non_negative("initial salinity", self.salinity)?;
        if salinity > OCEAN_SALINITY {
            return Err(ConfigurationError::AboveLimit {
                name: "initial salinity",
                value: salinity,
                limit: OCEAN_SALINITY,
            });
        }
        Ok(EstuaryState {
            salinity,
            tidal_height: 0.0,
            nitrate: require_non_negative("initial nitrate", self.nitrate)?,
            oxygen: require_non_negative("initial oxygen", self.oxygen)?,
        })
    }
}

/// Everything needed to set up a run, as read from a scenario file
///
/// ```toml
/// [parameters]
/// tides_enabled = true
/// river_flow_fraction = 0.0
///
/// [time]
/// dt = 0.01
/// horizon = 10.0
/// ```
///
/// Missing tables and keys take their default values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub parameters: EstuaryParameters,
    pub time: TimeSettings,
    pub initial: InitialConditions,
}

impl ScenarioConfig {
    pub fn from_toml_str(source: &str) -> EstuaryResult<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn to_toml_string(&self) -> EstuaryResult<String> {
        Ok(toml::to_string(self)?)
    }
}

pub(crate) fn require_finite(name: &'static str, value: FloatValue) -> Result<FloatValue, ConfigurationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigurationError::NonFinite { name, value })
    }
}

pub(crate) fn require_positive(name: &'static str, value: FloatValue) -> Result<FloatValue, ConfigurationError> {
    let value = require_finite(name, value)?;
    if value <= 0.0 {
        return Err(ConfigurationError::NonPositive { name, value });
    }
    Ok(value)
}

pub(crate) fn require_non_negative(
    name: &'static str,
    value: FloatValue,
) -> Result<FloatValue, ConfigurationError> {
    let value = require_finite(name, value)?;
    if value < 0.0 {
        return Err(ConfigurationError::Negative { name, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EstuaryError;

    #[test]
    fn default_parameters_are_valid() {
        let configuration = Configuration::from_parameters(&EstuaryParameters::default()).unwrap();
        assert_eq!(configuration.parameters(), EstuaryParameters::default());
        assert!(configuration.has_river());
    }

    #[test]
    fn zero_values_are_allowed_where_non_negative() {
        let parameters = EstuaryParameters {
            biological_productivity: 0.0,
            river_flow_fraction: 0.0,
            river_nitrate_level: 0.0,
            ..Default::default()
        };
        let configuration = Configuration::try_from(&parameters).unwrap();
        assert!(!configuration.has_river());
        assert_eq!(configuration.biological_productivity(), 0.0);
    }

    #[test]
    fn each_parameter_is_validated() {
        let cases = [
            (
                EstuaryParameters {
                    gas_exchange_rate: 0.0,
                    ..Default::default()
                },
                ConfigurationError::NonPositive {
                    name: "gas_exchange_rate",
                    value: 0.0,
                },
            ),
            (
                EstuaryParameters {
                    biological_productivity: -0.5,
                    ..Default::default()
                },
                ConfigurationError::Negative {
                    name: "biological_productivity",
                    value: -0.5,
                },
            ),
            (
                EstuaryParameters {
                    river_flow_fraction: -0.01,
                    ..Default::default()
                },
                ConfigurationError::Negative {
                    name: "river_flow_fraction",
                    value: -0.01,
                },
            ),
            (
                EstuaryParameters {
                    river_nitrate_level: -3.0,
                    ..Default::default()
                },
                ConfigurationError::Negative {
                    name: "river_nitrate_level",
                    value: -3.0,
                },
            ),
            (
                EstuaryParameters {
                    gas_exchange_rate: FloatValue::INFINITY,
                    ..Default::default()
                },
                ConfigurationError::NonFinite {
                    name: "gas_exchange_rate",
                    value: FloatValue::INFINITY,
                },
            ),
        ];

        for (parameters, expected) in cases {
            assert_eq!(Configuration::from_parameters(&parameters), Err(expected));
        }
    }

    #[test]
    fn nan_productivity_is_rejected() {
        let parameters = EstuaryParameters {
            biological_productivity: FloatValue::NAN,
            ..Default::default()
        };
        assert!(matches!(
            Configuration::from_parameters(&parameters),
            Err(ConfigurationError::NonFinite {
                name: "biological_productivity",
                ..
            })
        ));
    }

    #[test]
    fn initial_conditions_are_validated() {
        assert_eq!(
            InitialConditions::default().to_state().unwrap(),
            EstuaryState::baseline()
        );

        let too_salty = InitialConditions {
            salinity: 40.0,
            ..Default::default()
        };
        assert!(matches!(
            too_salty.to_state(),
            Err(ConfigurationError::AboveLimit { limit, .. }) if limit == OCEAN_SALINITY
        ));

        let negative_oxygen = InitialConditions {
            oxygen: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            negative_oxygen.to_state(),
            Err(ConfigurationError::Negative {
                name: "initial oxygen",
                ..
            })
        ));
    }

    #[test]
    fn default_time_settings_run_hourly_for_forty_days() {
        let axis = TimeSettings::default().time_axis().unwrap();
        assert_eq!(axis.spin_up_steps(), 48);
        assert_eq!(axis.production_steps(), 960);
    }

    #[test]
    fn scenario_parses_partial_toml() {
        let scenario = ScenarioConfig::from_toml_str(
            r#"
            [parameters]
            tides_enabled = true
            gas_exchange_rate = 2.0
            river_flow_fraction = 0.0

            [time]
            dt = 0.01
            horizon = 10.0
            "#,
        )
        .unwrap();

        assert!(scenario.parameters.tides_enabled);
        assert_eq!(scenario.parameters.gas_exchange_rate, 2.0);
        assert_eq!(scenario.parameters.biological_productivity, 1.0);
        assert_eq!(scenario.time.dt, 0.01);
        assert_eq!(scenario.time.spin_up, SPIN_UP_DURATION);
        assert_eq!(scenario.initial, InitialConditions::default());
    }

    #[test]
    fn empty_scenario_uses_defaults() {
        let scenario = ScenarioConfig::from_toml_str("").unwrap();
        assert_eq!(scenario, ScenarioConfig::default());
    }

    #[test]
    fn scenario_round_trips_through_toml() {
        let scenario = ScenarioConfig {
            parameters: EstuaryParameters {
                tides_enabled: true,
                nutrient_limitation: true,
                ..Default::default()
            },
            initial: InitialConditions {
                oxygen: 150.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let serialised = scenario.to_toml_string().unwrap();
        let restored = ScenarioConfig::from_toml_str(&serialised).unwrap();
        assert_eq!(restored, scenario);
    }

    #[test]
    fn malformed_scenario_reports_parse_error() {
        let result = ScenarioConfig::from_toml_str("[parameters]\ngas_exchange_rate = \"fast\"");
        assert!(matches!(result, Err(EstuaryError::Parse(_))));
    }
}
