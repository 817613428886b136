use estuary_components::Scenario;
use estuary_core::config::{EstuaryParameters, ScenarioConfig, TimeSettings};
use estuary_core::constants::HYPOXIA_THRESHOLD;
use estuary_core::errors::DivergedRun;
use estuary_core::state::StateField;
use estuary_core::timeseries::{FloatValue, OutputSeries, Time};
use numpy::PyArray1;
use pyo3::create_exception;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

create_exception!(estuary._lib, ConfigurationError, PyValueError);

fn column<'py>(py: Python<'py>, values: Vec<FloatValue>) -> Bound<'py, PyArray1<FloatValue>> {
    PyArray1::from_vec_bound(py, values)
}

fn series_to_dict<'py>(
    py: Python<'py>,
    series: &OutputSeries,
    error: Option<String>,
) -> PyResult<Bound<'py, PyDict>> {
    let result = PyDict::new_bound(py);
    result.set_item("time", column(py, series.times()))?;
    for field in StateField::ALL {
        result.set_item(field.name(), column(py, series.column(field)))?;
    }
    result.set_item("spin_up_index", series.spin_up_index())?;
    result.set_item("hypoxia_threshold", HYPOXIA_THRESHOLD)?;
    result.set_item("completed", series.is_complete())?;
    result.set_item("error", error)?;
    Ok(result)
}

/// Run the estuary model and return its output as numpy columns
///
/// `parameters` is a dict of model parameters; missing keys take their defaults.
/// A run that diverges returns the snapshots up to the failure with `completed`
/// set to False and the reason in `error`.
#[pyfunction]
#[pyo3(signature = (parameters=None, dt=None, horizon=None))]
fn run_model<'py>(
    py: Python<'py>,
    parameters: Option<Bound<'py, PyAny>>,
    dt: Option<Time>,
    horizon: Option<Time>,
) -> PyResult<Bound<'py, PyDict>> {
    let parameters = match parameters {
        Some(parameters) => pythonize::depythonize_bound::<EstuaryParameters>(parameters)
            .map_err(|e| ConfigurationError::new_err(format!("{}", e)))?,
        None => EstuaryParameters::default(),
    };
    let defaults = TimeSettings::default();
    let config = ScenarioConfig {
        parameters,
        time: TimeSettings {
            dt: dt.unwrap_or(defaults.dt),
            horizon: horizon.unwrap_or(defaults.horizon),
            ..defaults
        },
        ..Default::default()
    };

    let scenario =
        Scenario::from_config(&config).map_err(|e| ConfigurationError::new_err(e.to_string()))?;
    let run = py.allow_threads(|| scenario.run());

    match run {
        Ok(series) => series_to_dict(py, &series, None),
        Err(DivergedRun { error, partial }) => {
            series_to_dict(py, &partial, Some(error.to_string()))
        }
    }
}

#[pymodule]
#[pyo3(name = "_lib")]
fn estuary(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("ConfigurationError", m.py().get_type_bound::<ConfigurationError>())?;
    m.add_function(wrap_pyfunction!(run_model, m)?)?;
    Ok(())
}
