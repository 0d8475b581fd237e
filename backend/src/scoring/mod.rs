//! Overcrowding threat scoring
//!
//! A NEDOCS-style weighted combination of ED-state ratios, with the
//! incoming ED transports contributing as one more ratio against ED bed
//! capacity:
//!
//! ```text
//! score = max(0, intercept
//!              + census_weight      × patients_in_department / ed_beds
//!              + transport_weight   × ed_transport           / ed_beds
//!              + boarder_weight     × admitted_boarders      / hospital_beds
//!              + ventilator_weight  × ventilators_in_use     / ventilator_reference
//!              + boarder_time_weight × longest_boarder_hours / boarder_time_reference_hours
//!              + wait_time_weight   × longest_wait_minutes   / wait_time_reference_minutes)
//! ```
//!
//! # Critical Invariants
//!
//! - Score is ≥ 0 and has no upper clamp
//! - Score is non-decreasing in `ed_transport` (all weights are ≥ 0)
//! - A zero denominator is a `ConfigurationError`, never a NaN or ∞

pub mod bands;

pub use bands::band_for_score;

use crate::config::ConfigTable;
use crate::error::{ensure_finite, ConfigurationError, ForecastError, ValidationError};
use crate::models::{EdStateConstants, ScoreTerms, ThreatScore};

/// Score an ED transport volume against the department's baseline state
///
/// # Errors
///
/// - `ZeroDenominator` if `ed_beds` or `hospital_beds` is zero
/// - `ValidationError::NegativeQuantity` if `ed_transport` is negative
/// - `NonFinite` if any term is not finite
///
/// # Example
///
/// ```rust
/// use surge_radar_core_rs::{score, Band, ConfigTable, EdStateConstants};
///
/// let config = ConfigTable::reference();
/// let idle = EdStateConstants {
///     patients_in_department: 0,
///     ed_beds: 50,
///     hospital_beds: 300,
///     admitted_boarders: 0,
///     ventilators_in_use: 0,
///     longest_boarder_hours: 0.0,
///     longest_wait_minutes: 0.0,
/// };
///
/// // The negative intercept is clamped away for an idle department
/// let threat = score(0.0, &idle, &config).unwrap();
/// assert_eq!(threat.score, 0.0);
/// assert_eq!(threat.band, Band::NotBusy);
/// ```
pub fn score(
    ed_transport: f64,
    ed_state: &EdStateConstants,
    config: &ConfigTable,
) -> Result<ThreatScore, ForecastError> {
    let ed_transport = ensure_finite(ed_transport, "ed_transport")?;
    if ed_transport < 0.0 {
        return Err(ValidationError::NegativeQuantity {
            field: "ed_transport",
            value: ed_transport,
        }
        .into());
    }

    let weights = &config.scoring;
    let ed_beds = denominator(ed_state.ed_beds as f64, "ed_beds")?;
    let hospital_beds = denominator(ed_state.hospital_beds as f64, "hospital_beds")?;
    let ventilator_reference = denominator(weights.ventilator_reference, "ventilator_reference")?;
    let boarder_time_reference = denominator(
        weights.boarder_time_reference_hours,
        "boarder_time_reference_hours",
    )?;
    let wait_time_reference =
        denominator(weights.wait_time_reference_minutes, "wait_time_reference_minutes")?;

    let terms = ScoreTerms {
        intercept: weights.intercept,
        census: weights.census_weight * (ed_state.patients_in_department as f64 / ed_beds),
        transports: weights.transport_weight * (ed_transport / ed_beds),
        boarders: weights.boarder_weight * (ed_state.admitted_boarders as f64 / hospital_beds),
        ventilators: weights.ventilator_weight
            * (ed_state.ventilators_in_use as f64 / ventilator_reference),
        boarder_time: weights.boarder_time_weight
            * (ed_state.longest_boarder_hours / boarder_time_reference),
        wait_time: weights.wait_time_weight * (ed_state.longest_wait_minutes / wait_time_reference),
    };

    let raw = ensure_finite(terms.raw_sum(), "threat_score")?;
    let score = raw.max(0.0);
    let band = band_for_score(score, &config.bands);

    tracing::debug!(
        ed_transport,
        census = terms.census,
        transports = terms.transports,
        boarders = terms.boarders,
        ventilators = terms.ventilators,
        raw,
        score,
        band = %band,
        "threat score computed"
    );

    Ok(ThreatScore { score, band, terms })
}

fn denominator(value: f64, name: &'static str) -> Result<f64, ConfigurationError> {
    if value == 0.0 {
        return Err(ConfigurationError::ZeroDenominator(name));
    }
    ensure_finite(value, name)
}
