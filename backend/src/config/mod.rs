//! Configuration Table and Coefficient Types
//!
//! This module provides:
//! - The versioned coefficient set (`ConfigTable`)
//! - Response curves and multiplier tables (`curves`)
//!
//! # Single Source of Truth
//!
//! Every coefficient the engine uses lives in a `ConfigTable` passed by
//! reference. There are no process-wide coefficient constants.

pub mod curves;
pub mod table;

// Re-exports
pub use curves::{
    CurvePoint, DurationScaling, HumidityAdjustment, TemperatureCurve, ValueRange,
    VenueMultipliers,
};
pub use table::{
    AlertPolicy, BandBoundary, ConfigTable, IncidenceRate, InputRanges, ScoringWeights,
    SearchSettings, TemperatureUnit, TierCapacity, WaterfallTiers, REFERENCE_VERSION,
};
