use crate::state::StateField;
use crate::timeseries::{FloatValue, OutputSeries, Time};
use std::path::PathBuf;
use thiserror::Error;

/// An input parameter outside of its declared domain.
///
/// Raised while a configuration is being constructed, so a run never starts with
/// invalid inputs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: FloatValue },
    #[error("{name} must be greater than zero, got {value}")]
    NonPositive { name: &'static str, value: FloatValue },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: FloatValue },
    #[error("{name} must not exceed {limit}, got {value}")]
    AboveLimit {
        name: &'static str,
        value: FloatValue,
        limit: FloatValue,
    },
    #[error("{name} needs {steps} time steps, more than the limit of {limit}")]
    TooManySteps {
        name: &'static str,
        steps: FloatValue,
        limit: usize,
    },
    #[error("{name}={value} is not a whole number of time steps of {dt} days")]
    NotAMultipleOfStep {
        name: &'static str,
        value: FloatValue,
        dt: FloatValue,
    },
}

/// A state value left its physically meaningful domain during stepping.
///
/// The value is reported exactly as the explicit step produced it.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{field} reached {value} at step {step} (t={time} days)")]
pub struct NumericalDivergenceError {
    /// Index of the step that produced the invalid state (1-based)
    pub step: usize,
    /// Simulation time at the end of the offending step
    pub time: Time,
    pub field: StateField,
    pub value: FloatValue,
}

/// A run that stopped early because of a [`NumericalDivergenceError`].
///
/// `partial` holds every snapshot up to and including the last valid step, so its
/// length equals `error.step`.
#[derive(Error, Debug, Clone)]
#[error("run diverged: {error}")]
pub struct DivergedRun {
    pub error: NumericalDivergenceError,
    pub partial: OutputSeries,
}

/// Error type for building and running estuary scenarios.
#[derive(Error, Debug)]
pub enum EstuaryError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Diverged(Box<DivergedRun>),
    #[error("Could not parse scenario: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Could not serialise scenario: {0}")]
    Serialise(#[from] toml::ser::Error),
    #[error("Could not read scenario file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<DivergedRun> for EstuaryError {
    fn from(value: DivergedRun) -> Self {
        EstuaryError::Diverged(Box::new(value))
    }
}

/// Convenience type for `Result<T, EstuaryError>`.
pub type EstuaryResult<T> = Result<T, EstuaryError>;
