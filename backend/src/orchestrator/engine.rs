//! Forecast pipeline
//!
//! Runs one full scenario evaluation:
//!
//! ```text
//! ScenarioParameters ──► estimate ──► allocate ──► score ──► assess_alert
//!                         (load)      (waterfall)  (threat)
//! ```
//!
//! Evaluation is pure: no state survives between calls and the only shared
//! input is the read-only `ConfigTable`. Evaluating the same scenario twice
//! yields bit-identical results.

use crate::config::{ConfigTable, TemperatureUnit};
use crate::error::{ensure_finite, ForecastError};
use crate::load::estimate;
use crate::models::{PatientLoad, ScenarioParameters, ThreatScore, WaterfallAllocation};
use crate::orchestrator::alerts::{assess_alert, OperationalAlert};
use crate::scoring::score;
use crate::waterfall::allocate;
use serde::{Deserialize, Serialize};

/// Structured output of one evaluation, ready for chart and gauge rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Version tag of the coefficient set used
    pub config_version: String,

    /// SHA-256 fingerprint of the coefficient set used
    pub config_fingerprint: String,

    /// Unit of the scenario temperature and the table's heat coefficients
    pub temperature_unit: TemperatureUnit,

    pub load: PatientLoad,
    pub allocation: WaterfallAllocation,
    pub threat: ThreatScore,
    pub alert: OperationalAlert,
}

/// How a waterfall bar is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepMeasure {
    /// Bar starts from zero
    Absolute,
    /// Bar is drawn relative to the previous bar's end
    Relative,
}

/// One bar of the patient-flow waterfall chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallStep {
    pub label: &'static str,
    pub measure: StepMeasure,
    /// Signed contribution (deflection tiers are negative)
    pub value: f64,
}

impl ForecastResult {
    /// The four dashboard waterfall bars, in display order
    ///
    /// Total generated, minus STIP, minus ACS/Telehealth, leaving the ED
    /// transports that reach the grid.
    pub fn waterfall_steps(&self) -> Vec<WaterfallStep> {
        vec![
            WaterfallStep {
                label: "Total Generated",
                measure: StepMeasure::Absolute,
                value: self.load.total,
            },
            WaterfallStep {
                label: "On-Site (STIP)",
                measure: StepMeasure::Relative,
                value: -self.allocation.stip,
            },
            WaterfallStep {
                label: "ACS / Telehealth",
                measure: StepMeasure::Relative,
                value: -self.allocation.acs_telehealth,
            },
            WaterfallStep {
                label: "ED Transports",
                measure: StepMeasure::Absolute,
                value: self.allocation.ed_transport,
            },
        ]
    }
}

/// Evaluate a scenario end to end
///
/// # Errors
///
/// `ForecastError::Configuration` if `config` fails validation or any
/// stage fails; scenario validation has already happened when `params`
/// was constructed.
///
/// # Example
///
/// ```rust
/// use surge_radar_core_rs::{evaluate, Band, ConfigTable, EdStateConstants, ScenarioInput, ScenarioParameters, VenueType};
///
/// let config = ConfigTable::reference();
/// let params = ScenarioParameters::new(
///     ScenarioInput {
///         attendance: 0,
///         temperature: 105.0,
///         humidity_percent: Some(90.0),
///         venue: VenueType::OutdoorExposed,
///         duration_hours: 8.0,
///         ed_state: EdStateConstants {
///             patients_in_department: 0,
///             ed_beds: 30,
///             hospital_beds: 250,
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
/// let result = evaluate(&params, &config).unwrap();
/// assert_eq!(result.load.total, 0.0);
/// assert_eq!(result.allocation.ed_transport, 0.0);
/// assert_eq!(result.threat.band, Band::NotBusy);
/// ```
pub fn evaluate(
    params: &ScenarioParameters,
    config: &ConfigTable,
) -> Result<ForecastResult, ForecastError> {
    config.validate()?;
    let (load, allocation, threat) = evaluate_core(params, config)?;
    let alert = assess_alert(params, &threat, config);

    tracing::debug!(
        total = load.total,
        ed_transport = allocation.ed_transport,
        score = threat.score,
        band = %threat.band,
        ?alert,
        "scenario evaluated"
    );

    Ok(ForecastResult {
        config_version: config.version.clone(),
        config_fingerprint: config.fingerprint()?,
        temperature_unit: config.temperature_unit,
        load,
        allocation,
        threat,
        alert,
    })
}

/// Load, waterfall and score without the reporting extras
///
/// This is the function threshold search re-evaluates; it skips the table
/// validation and fingerprint hashing that `evaluate` performs, so callers
/// must validate `config` first.
pub(crate) fn evaluate_core(
    params: &ScenarioParameters,
    config: &ConfigTable,
) -> Result<(PatientLoad, WaterfallAllocation, ThreatScore), ForecastError> {
    let load = estimate(params, config)?;
    let allocation = allocate(load.total, params, config)?;

    for (value, quantity) in [
        (allocation.stip, "stip"),
        (allocation.acs_telehealth, "acs_telehealth"),
        (allocation.ed_transport, "ed_transport"),
    ] {
        ensure_finite(value, quantity)?;
    }

    let threat = score(allocation.ed_transport, params.ed_state(), config)?;
    Ok((load, allocation, threat))
}
