//! Error taxonomy for the forecasting engine
//!
//! - `ValidationError`: scenario input outside its documented domain
//! - `ConfigurationError`: coefficient table missing, malformed, or unusable
//! - `ForecastError`: either of the above, surfaced by pipeline operations
//!
//! Out-of-domain inputs are never clamped. Every rejection names the field.

use thiserror::Error;

/// Scenario input rejected before any computation runs
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("attendance {value} outside supported range [{min}, {max}]")]
    Attendance { value: i64, min: i64, max: i64 },

    #[error("temperature {value} outside supported range [{min}, {max}]")]
    Temperature { value: f64, min: f64, max: f64 },

    #[error("humidity {value}% outside supported range [0, 100]")]
    Humidity { value: f64 },

    #[error("duration {value}h outside supported range (0, {max}]")]
    Duration { value: f64, max: f64 },

    #[error("ED state field '{field}' must be finite and non-negative, got {value}")]
    EdState { field: &'static str, value: f64 },

    #[error("Unknown venue type: {0}")]
    UnknownVenue(String),

    #[error("Unknown scenario field: {0}")]
    UnknownField(String),

    #[error("Unknown band label: {0}")]
    UnknownBand(String),

    #[error("search domain [{lo}, {hi}] is empty or not finite")]
    SearchDomain { lo: f64, hi: f64 },

    #[error("{field} must be non-negative, got {value}")]
    NegativeQuantity { field: &'static str, value: f64 },
}

impl ValidationError {
    /// Name of the scenario field this error refers to
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Attendance { .. } => "attendance",
            ValidationError::Temperature { .. } => "temperature",
            ValidationError::Humidity { .. } => "humidity",
            ValidationError::Duration { .. } => "duration_hours",
            ValidationError::EdState { field, .. } => field,
            ValidationError::UnknownVenue(_) => "venue",
            ValidationError::UnknownField(_) => "field",
            ValidationError::UnknownBand(_) => "band",
            ValidationError::SearchDomain { .. } => "domain",
            ValidationError::NegativeQuantity { field, .. } => field,
        }
    }
}

/// Coefficient table problems; fatal for the affected evaluation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Malformed configuration table: {0}")]
    Malformed(String),

    #[error("Invalid configuration '{field}': {reason}")]
    Invalid { field: String, reason: String },

    #[error("Zero denominator for scoring ratio '{0}'")]
    ZeroDenominator(&'static str),

    #[error("Non-finite value produced for '{0}'")]
    NonFinite(&'static str),

    #[error("Configuration serialization failed: {0}")]
    Serialization(String),
}

impl ConfigurationError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigurationError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Any failure of a pipeline operation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Reject a non-finite intermediate; only malformed coefficients can produce one
pub(crate) fn ensure_finite(value: f64, quantity: &'static str) -> Result<f64, ConfigurationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigurationError::NonFinite(quantity))
    }
}
