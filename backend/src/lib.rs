//! Surge Radar Core - Rust Engine
//!
//! Forecasts the medical-surge impact of a mass-gathering event and
//! expresses it as an emergency-department overcrowding score.
//!
//! # Architecture
//!
//! - **config**: Versioned, immutable coefficient table
//! - **models**: Scenario inputs and derived forecast values
//! - **load**: Patient load estimation
//! - **waterfall**: Care-disposition allocation (STIP → ACS/Telehealth → ED)
//! - **scoring**: NEDOCS-style threat score and band lookup
//! - **orchestrator**: Full pipeline and operator alerts
//! - **search**: Threshold search over one scenario field
//!
//! # Critical Invariants
//!
//! 1. Evaluation is pure and deterministic; the only shared state is the
//!    read-only `ConfigTable`
//! 2. Waterfall tiers are non-negative and conserve the total load
//! 3. Out-of-domain inputs are rejected, never clamped
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod config;
pub mod error;
pub mod load;
pub mod models;
pub mod orchestrator;
pub mod scoring;
pub mod search;
pub mod waterfall;

// Re-exports for convenience
pub use config::ConfigTable;
pub use error::{ConfigurationError, ForecastError, ValidationError};
pub use load::estimate;
pub use models::{
    Band, EdStateConstants, FieldSelector, PatientLoad, ScenarioInput, ScenarioParameters,
    ScoreTerms, ThreatScore, VenueType, WaterfallAllocation,
};
pub use orchestrator::{assess_alert, evaluate, ForecastResult, OperationalAlert};
pub use scoring::{band_for_score, score};
pub use search::{find_crossing, NotFoundReason, SearchMethod, SearchOutcome};
pub use waterfall::allocate;

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn surge_radar_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::engine::PySurgeEngine>()?;
    Ok(())
}
