//! Orchestrator - full forecast pipeline
//!
//! Composes load estimation, waterfall allocation and threat scoring into
//! a single pure evaluation, and assigns the operator alert.
//!
//! See `engine.rs` for the pipeline and `alerts.rs` for alert priorities.

pub mod alerts;
pub mod engine;

// Re-export main types for convenience
pub use alerts::{assess_alert, OperationalAlert};
pub use engine::{evaluate, ForecastResult, StepMeasure, WaterfallStep};
