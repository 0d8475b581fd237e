//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict)

use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::error::{ConfigurationError, ForecastError, ValidationError};
use crate::models::{EdStateConstants, ScenarioInput, VenueType};
use crate::orchestrator::ForecastResult;
use crate::search::SearchOutcome;

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field from a Python dict with clear error messages.
fn extract_required<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Missing required field '{}'",
                key
            ))
        })?
        .extract()
}

/// Extract an optional field; `None` both when missing and when Python `None`.
fn extract_optional<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<Option<T>>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) if !value.is_none() => Ok(Some(value.extract()?)),
        _ => Ok(None),
    }
}

// ========================================================================
// Error Mapping
// ========================================================================

pub fn validation_to_py(err: ValidationError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(format!("{} (field: {})", err, err.field()))
}

pub fn configuration_to_py(err: ConfigurationError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(err.to_string())
}

pub fn forecast_to_py(err: ForecastError) -> PyErr {
    match err {
        ForecastError::Validation(e) => validation_to_py(e),
        ForecastError::Configuration(e) => configuration_to_py(e),
    }
}

// ========================================================================
// Scenario Parser
// ========================================================================

/// Convert a Python dict to a raw scenario
///
/// Expected keys: `attendance`, `temperature`, `venue`, `duration_hours`,
/// `ed_state` (dict), optional `humidity_percent`.
pub fn parse_scenario_input(py_scenario: &Bound<'_, PyDict>) -> PyResult<ScenarioInput> {
    let attendance: i64 = extract_required(py_scenario, "attendance")?;
    let temperature: f64 = extract_required(py_scenario, "temperature")?;
    let humidity_percent: Option<f64> = extract_optional(py_scenario, "humidity_percent")?;
    let duration_hours: f64 = extract_required(py_scenario, "duration_hours")?;

    let venue_str: String = extract_required(py_scenario, "venue")?;
    let venue: VenueType = venue_str.parse().map_err(validation_to_py)?;

    let py_ed_state: Bound<'_, PyDict> = py_scenario
        .get_item("ed_state")?
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>("Missing required field 'ed_state'")
        })?
        .downcast_into()?;

    let ed_state = EdStateConstants {
        patients_in_department: extract_required(&py_ed_state, "patients_in_department")?,
        ed_beds: extract_required(&py_ed_state, "ed_beds")?,
        hospital_beds: extract_required(&py_ed_state, "hospital_beds")?,
        admitted_boarders: extract_required(&py_ed_state, "admitted_boarders")?,
        ventilators_in_use: extract_required(&py_ed_state, "ventilators_in_use")?,
        longest_boarder_hours: extract_required(&py_ed_state, "longest_boarder_hours")?,
        longest_wait_minutes: extract_required(&py_ed_state, "longest_wait_minutes")?,
    };

    Ok(ScenarioInput {
        attendance,
        temperature,
        humidity_percent,
        venue,
        duration_hours,
        ed_state,
    })
}

// ========================================================================
// Result Converters
// ========================================================================

/// Convert a forecast to a Python dict shaped for gauge and waterfall charts
pub fn forecast_result_to_py(py: Python<'_>, result: &ForecastResult) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("config_version", result.config_version.as_str())?;
    dict.set_item("config_fingerprint", result.config_fingerprint.as_str())?;
    dict.set_item("temperature_unit", result.temperature_unit.symbol())?;
    dict.set_item("total_load", result.load.total)?;
    dict.set_item("stip", result.allocation.stip)?;
    dict.set_item("acs_telehealth", result.allocation.acs_telehealth)?;
    dict.set_item("ed_transport", result.allocation.ed_transport)?;
    dict.set_item("score", result.threat.score)?;
    dict.set_item("band", result.threat.band.label())?;
    dict.set_item("band_rank", result.threat.band.rank())?;
    dict.set_item("alert", result.alert.message())?;
    dict.set_item("alert_critical", result.alert.is_critical())?;

    let factors = PyDict::new(py);
    factors.set_item("base_load", result.load.base_load)?;
    factors.set_item("temperature_multiplier", result.load.temperature_multiplier)?;
    factors.set_item("humidity_adjustment", result.load.humidity_adjustment)?;
    factors.set_item("venue_multiplier", result.load.venue_multiplier)?;
    factors.set_item("duration_factor", result.load.duration_factor)?;
    dict.set_item("load_factors", factors)?;

    let steps = PyDict::new(py);
    for step in result.waterfall_steps() {
        steps.set_item(step.label, step.value)?;
    }
    dict.set_item("waterfall", steps)?;

    Ok(dict.unbind())
}

/// Convert a threshold search outcome to a Python dict
pub fn search_outcome_to_py(py: Python<'_>, outcome: &SearchOutcome) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    match outcome {
        SearchOutcome::Found {
            value,
            band,
            method,
        } => {
            dict.set_item("found", true)?;
            dict.set_item("value", *value)?;
            dict.set_item("band", band.label())?;
            dict.set_item("method", format!("{:?}", method))?;
        }
        SearchOutcome::NotFound {
            reason,
            highest_band,
        } => {
            dict.set_item("found", false)?;
            dict.set_item("reason", reason.to_string())?;
            dict.set_item("highest_band", highest_band.label())?;
        }
    }

    Ok(dict.unbind())
}
