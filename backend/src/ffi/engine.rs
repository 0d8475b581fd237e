//! PyO3 wrapper for the forecasting pipeline
//!
//! This module provides the Python interface the dashboard calls on every
//! widget change.

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{
    configuration_to_py, forecast_result_to_py, forecast_to_py, parse_scenario_input,
    search_outcome_to_py, validation_to_py,
};
use crate::config::ConfigTable;
use crate::models::{Band, FieldSelector, ScenarioParameters};
use crate::orchestrator::evaluate;
use crate::search::find_crossing;

/// Python handle on one validated coefficient table
///
/// # Example (from Python)
///
/// ```python
/// from surge_radar._core import SurgeEngine
///
/// engine = SurgeEngine.reference()
/// scenario = {
///     "attendance": 65_000,
///     "temperature": 85.0,
///     "humidity_percent": 60.0,
///     "venue": "outdoor_exposed",
///     "duration_hours": 6.0,
///     "ed_state": {
///         "patients_in_department": 40,
///         "ed_beds": 50,
///         "hospital_beds": 300,
///         "admitted_boarders": 10,
///         "ventilators_in_use": 2,
///         "longest_boarder_hours": 4.0,
///         "longest_wait_minutes": 90.0,
///     },
/// }
/// result = engine.evaluate(scenario)
/// print(result["score"], result["band"])
/// ```
#[pyclass(name = "SurgeEngine", frozen)]
pub struct PySurgeEngine {
    config: ConfigTable,
}

#[pymethods]
impl PySurgeEngine {
    /// Engine over the built-in reference coefficients
    #[staticmethod]
    fn reference() -> Self {
        PySurgeEngine {
            config: ConfigTable::reference(),
        }
    }

    /// Engine over a JSON coefficient table
    ///
    /// Raises RuntimeError if the table is missing, malformed or invalid.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config = ConfigTable::from_json(json).map_err(configuration_to_py)?;
        Ok(PySurgeEngine { config })
    }

    #[getter]
    fn config_version(&self) -> String {
        self.config.version.clone()
    }

    #[getter]
    fn fingerprint(&self) -> PyResult<String> {
        self.config.fingerprint().map_err(configuration_to_py)
    }

    /// Evaluate a scenario dict
    ///
    /// Raises ValueError for out-of-domain scenario fields and
    /// RuntimeError for configuration failures.
    fn evaluate(&self, py: Python<'_>, scenario: &Bound<'_, PyDict>) -> PyResult<Py<PyDict>> {
        let input = parse_scenario_input(scenario)?;
        let params = ScenarioParameters::new(input, &self.config).map_err(validation_to_py)?;
        let result = evaluate(&params, &self.config).map_err(forecast_to_py)?;
        forecast_result_to_py(py, &result)
    }

    /// Find the smallest value of `field` in `[lo, hi]` reaching `band`
    fn find_crossing(
        &self,
        py: Python<'_>,
        field: &str,
        band: &str,
        scenario: &Bound<'_, PyDict>,
        lo: f64,
        hi: f64,
    ) -> PyResult<Py<PyDict>> {
        let field: FieldSelector = field.parse().map_err(validation_to_py)?;
        let band: Band = band.parse().map_err(validation_to_py)?;
        let input = parse_scenario_input(scenario)?;
        let fixed = ScenarioParameters::new(input, &self.config).map_err(validation_to_py)?;

        let outcome = py
            .allow_threads(|| find_crossing(field, band, &fixed, &self.config, (lo, hi)))
            .map_err(forecast_to_py)?;
        search_outcome_to_py(py, &outcome)
    }
}
