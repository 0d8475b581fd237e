//! Derived forecast values
//!
//! Every type here is recomputed fresh for each scenario evaluation and
//! carries the intermediate factors that produced it, so a rendering layer
//! can explain a number without recomputing it.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Expected patient load for a scenario
///
/// `total` is an expectation, not a head count: it is not rounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientLoad {
    /// Expected patient presentations
    pub total: f64,

    /// Incidence rate scaled by attendance, before multipliers
    pub base_load: f64,

    /// Temperature curve multiplier (1.0 at or below comfort threshold)
    pub temperature_multiplier: f64,

    /// Additive humidity term (0.0 when humidity is absent)
    pub humidity_adjustment: f64,

    /// temperature_multiplier + humidity_adjustment
    pub heat_multiplier: f64,

    pub venue_multiplier: f64,

    pub duration_factor: f64,
}

/// Care-disposition breakdown of a patient load
///
/// # Critical Invariants
///
/// 1. Every tier is non-negative
/// 2. `stip + acs_telehealth + ed_transport` equals the allocated total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterfallAllocation {
    /// Treated in place on site (STIP)
    pub stip: f64,

    /// Diverted to alternate care sites or telehealth
    pub acs_telehealth: f64,

    /// Transported to an emergency department
    pub ed_transport: f64,
}

impl WaterfallAllocation {
    pub fn total(&self) -> f64 {
        self.stip + self.acs_telehealth + self.ed_transport
    }

    /// Patients kept out of the ED by the first two tiers
    pub fn deflected(&self) -> f64 {
        self.stip + self.acs_telehealth
    }
}

/// Operational overcrowding band, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    NotBusy,
    Busy,
    ExtremelyBusy,
    Overcrowded,
    SeverelyOvercrowded,
    DangerouslyOvercrowded,
}

impl Band {
    /// All bands in ascending severity
    pub const ALL: [Band; 6] = [
        Band::NotBusy,
        Band::Busy,
        Band::ExtremelyBusy,
        Band::Overcrowded,
        Band::SeverelyOvercrowded,
        Band::DangerouslyOvercrowded,
    ];

    /// Ordinal rank, 0 for the least severe band
    pub fn rank(&self) -> usize {
        *self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            Band::NotBusy => "Not Busy",
            Band::Busy => "Busy",
            Band::ExtremelyBusy => "Extremely Busy",
            Band::Overcrowded => "Overcrowded",
            Band::SeverelyOvercrowded => "Severely Overcrowded",
            Band::DangerouslyOvercrowded => "Dangerously Overcrowded",
        }
    }

    pub fn lowest() -> Self {
        Band::NotBusy
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Band {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        Band::ALL
            .into_iter()
            .find(|band| {
                let label: String = band
                    .label()
                    .to_ascii_lowercase()
                    .chars()
                    .filter(|c| c.is_ascii_alphabetic())
                    .collect();
                label == normalized
            })
            .ok_or_else(|| ValidationError::UnknownBand(s.to_string()))
    }
}

/// Weighted contribution of each ED-state ratio to the score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTerms {
    pub intercept: f64,
    pub census: f64,
    pub transports: f64,
    pub boarders: f64,
    pub ventilators: f64,
    pub boarder_time: f64,
    pub wait_time: f64,
}

impl ScoreTerms {
    /// Unclamped sum of all terms
    pub fn raw_sum(&self) -> f64 {
        self.intercept
            + self.census
            + self.transports
            + self.boarders
            + self.ventilators
            + self.boarder_time
            + self.wait_time
    }
}

/// Standardized overcrowding score with its band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreatScore {
    /// Non-negative score; may exceed the top band's lower bound without limit
    pub score: f64,

    pub band: Band,

    pub terms: ScoreTerms,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_ordering_follows_severity() {
        for pair in Band::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].rank() + 1, pair[1].rank());
        }
        assert_eq!(Band::lowest().rank(), 0);
    }

    #[test]
    fn test_band_parses_labels_and_snake_case() {
        assert_eq!("Overcrowded".parse::<Band>().unwrap(), Band::Overcrowded);
        assert_eq!(
            "severely_overcrowded".parse::<Band>().unwrap(),
            Band::SeverelyOvercrowded
        );
        assert_eq!("not busy".parse::<Band>().unwrap(), Band::NotBusy);
        assert!("Saturated-ish".parse::<Band>().is_err());
    }

    #[test]
    fn test_allocation_total_and_deflected() {
        let allocation = WaterfallAllocation {
            stip: 6.5,
            acs_telehealth: 1.5,
            ed_transport: 2.0,
        };
        assert_eq!(allocation.total(), 10.0);
        assert_eq!(allocation.deflected(), 8.0);
    }
}
