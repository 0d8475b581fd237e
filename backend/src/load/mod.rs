//! Patient load estimation
//!
//! Converts a validated scenario into an expected patient count:
//!
//! ```text
//! load = base × heat_multiplier × venue_multiplier × duration_factor
//! base = attendance / 10,000 × incidence.per_10k_attendees
//! heat_multiplier = temperature_curve(T) + humidity_adjustment(H)
//! ```
//!
//! # Key Principles
//!
//! 1. **No discount below comfort**: cold weather never lowers the load
//! 2. **Monotonic**: non-decreasing in attendance, temperature and humidity
//! 3. **Zero means zero**: attendance 0 yields exactly 0.0, whatever the multipliers

use crate::config::ConfigTable;
use crate::error::{ensure_finite, ConfigurationError};
use crate::models::{PatientLoad, ScenarioParameters};

const ATTENDEES_PER_RATE_UNIT: f64 = 10_000.0;

/// Estimate the expected patient load for a scenario
///
/// # Errors
///
/// `ConfigurationError::NonFinite` if the coefficients drive any factor
/// to a non-finite value.
///
/// # Example
///
/// ```rust
/// use surge_radar_core_rs::{estimate, ConfigTable, EdStateConstants, ScenarioInput, ScenarioParameters, VenueType};
///
/// let config = ConfigTable::reference();
/// let params = ScenarioParameters::new(
///     ScenarioInput {
///         attendance: 20_000,
///         temperature: 70.0,
///         humidity_percent: None,
///         venue: VenueType::IndoorClimateControlled,
///         duration_hours: 4.0,
///         ed_state: EdStateConstants {
///             patients_in_department: 0,
///             ed_beds: 40,
///             hospital_beds: 200,
///             admitted_boarders: 0,
///             ventilators_in_use: 0,
///             longest_boarder_hours: 0.0,
///             longest_wait_minutes: 0.0,
///         },
///     },
///     &config,
/// )
/// .unwrap();
///
/// let load = estimate(&params, &config).unwrap();
/// assert_eq!(load.total, 30.0);
/// ```
pub fn estimate(
    params: &ScenarioParameters,
    config: &ConfigTable,
) -> Result<PatientLoad, ConfigurationError> {
    let no_attendees = params.attendance() == 0;

    let base_load = if no_attendees {
        0.0
    } else {
        ensure_finite(
            params.attendance() as f64 / ATTENDEES_PER_RATE_UNIT
                * config.incidence.per_10k_attendees,
            "base_load",
        )?
    };

    let temperature_multiplier = ensure_finite(
        config.temperature_curve.multiplier(params.temperature()),
        "temperature_multiplier",
    )?;

    let humidity_adjustment = match (config.humidity, params.humidity_percent()) {
        (Some(adjustment), Some(humidity)) => {
            ensure_finite(adjustment.adjustment(humidity), "humidity_adjustment")?
        }
        _ => 0.0,
    };

    let heat_multiplier = temperature_multiplier + humidity_adjustment;
    let venue_multiplier = config.venue_multipliers.get(params.venue());
    let duration_factor = ensure_finite(
        config
            .duration_scaling
            .factor(params.duration_hours(), config.incidence.reference_duration_hours),
        "duration_factor",
    )?;

    // Factors stay populated; only the load is pinned at zero
    let total = if no_attendees {
        0.0
    } else {
        ensure_finite(
            base_load * heat_multiplier * venue_multiplier * duration_factor,
            "patient_load",
        )?
    };

    tracing::debug!(
        attendance = params.attendance(),
        base_load,
        temperature_multiplier,
        humidity_adjustment,
        venue_multiplier,
        duration_factor,
        total,
        "patient load estimated"
    );

    Ok(PatientLoad {
        total,
        base_load,
        temperature_multiplier,
        humidity_adjustment,
        heat_multiplier,
        venue_multiplier,
        duration_factor,
    })
}
