//! Domain models for the surge forecaster

pub mod forecast;
pub mod scenario;

// Re-exports
pub use forecast::{Band, PatientLoad, ScoreTerms, ThreatScore, WaterfallAllocation};
pub use scenario::{EdStateConstants, FieldSelector, ScenarioInput, ScenarioParameters, VenueType};
