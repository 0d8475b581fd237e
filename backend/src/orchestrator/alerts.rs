//! Operator alerts
//!
//! One alert per evaluation, chosen by priority so a dashboard never shows
//! conflicting messages:
//!
//! 1. Heat-casualty override (temperature at or above the override point)
//! 2. System failure imminent (score at or above the critical score)
//! 3. Critical warning (score within `1 - warning_fraction` of critical)
//! 4. Nominal

use crate::config::ConfigTable;
use crate::models::{ScenarioParameters, ThreatScore};
use serde::{Deserialize, Serialize};

/// Operational alert level, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationalAlert {
    HeatCasualtyOverride,
    SystemFailureImminent,
    CriticalWarning,
    Nominal,
}

impl OperationalAlert {
    /// Short operator-facing message
    pub fn message(&self) -> &'static str {
        match self {
            OperationalAlert::HeatCasualtyOverride => {
                "Heat-casualty threshold exceeded; initiate regional deflection protocols"
            }
            OperationalAlert::SystemFailureImminent => {
                "Acute care grid saturated; implement tier 4 diversion"
            }
            OperationalAlert::CriticalWarning => {
                "Within 5% of operational breaking point; prepare alternate care site overflow"
            }
            OperationalAlert::Nominal => "Operating within conventional capacity constraints",
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            OperationalAlert::HeatCasualtyOverride | OperationalAlert::SystemFailureImminent
        )
    }
}

/// Pick the alert for a scored scenario
pub fn assess_alert(
    params: &ScenarioParameters,
    threat: &ThreatScore,
    config: &ConfigTable,
) -> OperationalAlert {
    let policy = &config.alerts;

    if params.temperature() >= policy.heat_override_temperature {
        OperationalAlert::HeatCasualtyOverride
    } else if threat.score >= policy.critical_score {
        OperationalAlert::SystemFailureImminent
    } else if threat.score >= policy.critical_score * policy.warning_fraction {
        OperationalAlert::CriticalWarning
    } else {
        OperationalAlert::Nominal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Band, EdStateConstants, ScenarioInput, ScoreTerms, VenueType};

    fn params(temperature: f64) -> ScenarioParameters {
        ScenarioParameters::new(
            ScenarioInput {
                attendance: 1_000,
                temperature,
                humidity_percent: None,
                venue: VenueType::Mixed,
                duration_hours: 3.0,
                ed_state: EdStateConstants {
                    patients_in_department: 0,
                    ed_beds: 10,
                    hospital_beds: 10,
                    admitted_boarders: 0,
                    ventilators_in_use: 0,
                    longest_boarder_hours: 0.0,
                    longest_wait_minutes: 0.0,
                },
            },
            &ConfigTable::reference(),
        )
        .unwrap()
    }

    fn threat(score: f64) -> ThreatScore {
        ThreatScore {
            score,
            band: Band::NotBusy,
            terms: ScoreTerms {
                intercept: 0.0,
                census: 0.0,
                transports: 0.0,
                boarders: 0.0,
                ventilators: 0.0,
                boarder_time: 0.0,
                wait_time: 0.0,
            },
        }
    }

    #[test]
    fn test_heat_override_takes_priority() {
        let config = ConfigTable::reference();
        assert_eq!(
            assess_alert(&params(98.0), &threat(200.0), &config),
            OperationalAlert::HeatCasualtyOverride
        );
    }

    #[test]
    fn test_score_thresholds() {
        let config = ConfigTable::reference();
        let p = params(80.0);
        assert_eq!(
            assess_alert(&p, &threat(140.0), &config),
            OperationalAlert::SystemFailureImminent
        );
        assert_eq!(
            assess_alert(&p, &threat(133.5), &config),
            OperationalAlert::CriticalWarning
        );
        assert_eq!(
            assess_alert(&p, &threat(132.9), &config),
            OperationalAlert::Nominal
        );
    }
}
