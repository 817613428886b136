//! Box model of a well-mixed estuary exchanging water with a tidal ocean and a river
//!
//! The numerical engine lives in [`estuary_core`] and the physical processes in
//! [`estuary_components`]. Both are re-exported here together with the types
//! needed to run a scenario.
//!
//! ```no_run
//! use estuary::{run_scenario, ScenarioConfig};
//!
//! let config = ScenarioConfig::from_toml_str("[parameters]\ntides_enabled = true").unwrap();
//! let series = run_scenario(&config).unwrap();
//! println!("production starts at index {}", series.spin_up_index());
//! ```

pub use estuary_components;
pub use estuary_core;

pub use estuary_components::{run_scenario, EstuaryModel, Scenario};
pub use estuary_core::config::{EstuaryParameters, ScenarioConfig, TimeSettings};
pub use estuary_core::errors::{EstuaryError, EstuaryResult};
pub use estuary_core::timeseries::OutputSeries;

#[cfg(feature = "python")]
mod python;
