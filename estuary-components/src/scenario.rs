//! Building and running a complete scenario
//!
//! A [`ScenarioConfig`] is validated into an [`Integrator`] driving an
//! [`EstuaryModel`]. Validation happens here, not while parsing, so a scenario file
//! with an invalid value still parses and fails with a [`ConfigurationError`].

use crate::model::EstuaryModel;
use estuary_core::config::{Configuration, ScenarioConfig};
use estuary_core::errors::{ConfigurationError, DivergedRun, EstuaryError, EstuaryResult};
use estuary_core::ivp::Integrator;
use estuary_core::timeseries::OutputSeries;
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Scenario {
    integrator: Integrator<EstuaryModel>,
}

impl Scenario {
    pub fn from_config(config: &ScenarioConfig) -> Result<Self, ConfigurationError> {
        let configuration = Configuration::from_parameters(&config.parameters)?;
        let time_axis = config.time.time_axis()?;
        let initial_state = config.initial.to_state()?;

        debug!(
            "Scenario resolved: {:?}, dt={} days, {} spin-up and {} production steps, initial state {:?}",
            configuration,
            time_axis.dt(),
            time_axis.spin_up_steps(),
            time_axis.production_steps(),
            initial_state
        );

        Ok(Self {
            integrator: Integrator::new(
                EstuaryModel::from_configuration(configuration),
                time_axis,
                initial_state,
            ),
        })
    }

    /// Read and validate a TOML scenario file
    pub fn from_toml_file(path: impl AsRef<Path>) -> EstuaryResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| EstuaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = ScenarioConfig::from_toml_str(&source)?;
        Ok(Self::from_config(&config)?)
    }

    pub fn model(&self) -> &EstuaryModel {
        self.integrator.model()
    }

    /// Run spin-up and production
    ///
    /// On divergence the partial series is returned inside the error.
    pub fn run(&self) -> Result<OutputSeries, DivergedRun> {
        match self.integrator.run() {
            Ok(series) => {
                info!(
                    "Run complete: {} snapshots, production starts at index {}",
                    series.len(),
                    series.spin_up_index()
                );
                Ok(series)
            }
            Err(diverged) => {
                warn!(
                    "Run diverged at step {} (t={} days): {}={}; keeping {} snapshots",
                    diverged.error.step,
                    diverged.error.time,
                    diverged.error.field,
                    diverged.error.value,
                    diverged.partial.len()
                );
                Err(diverged)
            }
        }
    }
}

/// Validate and run a scenario in one go
pub fn run_scenario(config: &ScenarioConfig) -> EstuaryResult<OutputSeries> {
    Ok(Scenario::from_config(config)?.run()?)
}
