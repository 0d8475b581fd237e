//! Configuration Table
//!
//! The immutable, versioned coefficient set that governs load estimation,
//! allocation, scoring and search. One table is loaded per process and
//! passed by reference to every evaluation.
//!
//! # Critical Invariants
//!
//! 1. **No silent defaults**: `ConfigTable` has no `Default`; a missing or
//!    malformed table is a `ConfigurationError`
//! 2. **Validated on load**: `from_json` always runs `validate`
//! 3. **Fingerprinted**: `fingerprint` hashes the canonical JSON form

use crate::config::curves::{
    CurvePoint, DurationScaling, HumidityAdjustment, TemperatureCurve, ValueRange,
    VenueMultipliers,
};
use crate::error::ConfigurationError;
use crate::models::Band;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Version tag of the built-in reference coefficient set
pub const REFERENCE_VERSION: &str = "surge-radar-reference/1";

/// Unit of every temperature in the table and in scenario inputs
///
/// The engine does not convert between units. The label travels with each
/// `ForecastResult` so a caller can display temperatures correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureUnit {
    Fahrenheit,
    Celsius,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Celsius => "°C",
        }
    }
}

/// Baseline patient presentation rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncidenceRate {
    /// Presentations per 10,000 attendees over the reference duration
    pub per_10k_attendees: f64,

    /// Event length (hours) the rate was observed over
    pub reference_duration_hours: f64,
}

/// Accepted scenario input domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputRanges {
    pub max_attendance: i64,
    pub temperature: ValueRange,
    pub max_duration_hours: f64,
}

/// Capacity of one waterfall tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum TierCapacity {
    /// Fixed patient count
    Absolute { count: f64 },

    /// Share of the total load, in [0, 1]
    FractionOfTotal { fraction: f64 },
}

impl TierCapacity {
    /// Absolute capacity for a given total load
    pub fn resolve(&self, total: f64) -> f64 {
        match self {
            TierCapacity::Absolute { count } => *count,
            TierCapacity::FractionOfTotal { fraction } => total * fraction,
        }
    }

    fn validate(&self, field: &str) -> Result<(), ConfigurationError> {
        match self {
            TierCapacity::Absolute { count } => {
                if !count.is_finite() || *count < 0.0 {
                    return Err(ConfigurationError::invalid(
                        field,
                        "absolute capacity must be finite and non-negative",
                    ));
                }
            }
            TierCapacity::FractionOfTotal { fraction } => {
                if !fraction.is_finite() || !(0.0..=1.0).contains(fraction) {
                    return Err(ConfigurationError::invalid(
                        field,
                        "fraction of total must lie in [0, 1]",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Capacities of the two capped tiers; the ED is the uncapped sink
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaterfallTiers {
    pub stip: TierCapacity,
    pub acs_telehealth: TierCapacity,
}

/// NEDOCS-style scoring coefficients
///
/// Each weight multiplies one non-negative ratio:
///
/// ```text
/// census       = patients_in_department / ed_beds
/// transports   = ed_transport           / ed_beds
/// boarders     = admitted_boarders      / hospital_beds
/// ventilators  = ventilators_in_use     / ventilator_reference
/// boarder_time = longest_boarder_hours  / boarder_time_reference_hours
/// wait_time    = longest_wait_minutes   / wait_time_reference_minutes
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringWeights {
    /// Constant offset; the clamp at zero is applied after it
    pub intercept: f64,

    pub census_weight: f64,
    pub transport_weight: f64,
    pub boarder_weight: f64,
    pub ventilator_weight: f64,
    pub boarder_time_weight: f64,
    pub wait_time_weight: f64,

    pub ventilator_reference: f64,
    pub boarder_time_reference_hours: f64,
    pub wait_time_reference_minutes: f64,
}

impl ScoringWeights {
    fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.intercept.is_finite() {
            return Err(ConfigurationError::invalid("scoring.intercept", "must be finite"));
        }

        for (field, weight) in [
            ("scoring.census_weight", self.census_weight),
            ("scoring.transport_weight", self.transport_weight),
            ("scoring.boarder_weight", self.boarder_weight),
            ("scoring.ventilator_weight", self.ventilator_weight),
            ("scoring.boarder_time_weight", self.boarder_time_weight),
            ("scoring.wait_time_weight", self.wait_time_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigurationError::invalid(
                    field,
                    "weights must be finite and non-negative",
                ));
            }
        }

        for (name, denominator) in [
            ("ventilator_reference", self.ventilator_reference),
            ("boarder_time_reference_hours", self.boarder_time_reference_hours),
            ("wait_time_reference_minutes", self.wait_time_reference_minutes),
        ] {
            if denominator == 0.0 {
                return Err(ConfigurationError::ZeroDenominator(name));
            }
            if !denominator.is_finite() || denominator < 0.0 {
                return Err(ConfigurationError::invalid(
                    format!("scoring.{}", name),
                    "must be finite and positive",
                ));
            }
        }

        Ok(())
    }
}

/// Lower bound (inclusive) of one band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BandBoundary {
    pub band: Band,
    pub lower: f64,
}

/// Operator alert thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlertPolicy {
    /// Temperature at or above which the heat-casualty override fires
    pub heat_override_temperature: f64,

    /// Score at or above which system failure is imminent
    pub critical_score: f64,

    /// Fraction of `critical_score` at which the warning fires
    pub warning_fraction: f64,
}

/// Threshold search resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchSettings {
    /// Grid points sampled across the domain (endpoints included)
    pub samples: usize,

    /// Bisection stops once the bracket is narrower than this
    pub tolerance: f64,

    pub max_bisection_iterations: u32,
}

/// Complete coefficient set
///
/// # Example
///
/// ```rust
/// use surge_radar_core_rs::ConfigTable;
///
/// let reference = ConfigTable::reference();
/// let json = serde_json::to_string(&reference).unwrap();
///
/// let loaded = ConfigTable::from_json(&json).unwrap();
/// assert_eq!(loaded.version, reference.version);
/// assert_eq!(loaded.fingerprint().unwrap(), reference.fingerprint().unwrap());
///
/// assert!(ConfigTable::from_json("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigTable {
    pub version: String,
    pub temperature_unit: TemperatureUnit,
    pub incidence: IncidenceRate,
    pub input_ranges: InputRanges,
    pub temperature_curve: TemperatureCurve,

    /// Absent: humidity never adjusts the heat multiplier
    #[serde(default)]
    pub humidity: Option<HumidityAdjustment>,

    pub venue_multipliers: VenueMultipliers,

    #[serde(default)]
    pub duration_scaling: DurationScaling,

    pub waterfall: WaterfallTiers,
    pub scoring: ScoringWeights,

    /// Ascending lower bounds, one per band
    pub bands: Vec<BandBoundary>,

    pub alerts: AlertPolicy,
    pub search: SearchSettings,
}

impl ConfigTable {
    /// Parse and validate a table from JSON
    ///
    /// # Errors
    ///
    /// - `Malformed` if the text is empty, not JSON, has unknown keys or
    ///   is missing a required section
    /// - `Invalid` / `ZeroDenominator` if validation fails
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        if json.trim().is_empty() {
            return Err(ConfigurationError::Malformed(
                "configuration table is unspecified".to_string(),
            ));
        }

        let table: ConfigTable = serde_json::from_str(json)
            .map_err(|e| ConfigurationError::Malformed(e.to_string()))?;
        table.validate()?;

        tracing::debug!(version = %table.version, "configuration table loaded");
        Ok(table)
    }

    /// Built-in reference coefficients
    ///
    /// Incidence, heat and venue coefficients follow the mass-gathering
    /// presentation-rate proxy (15 per 10,000; +5% per °F above 85°F);
    /// scoring follows the published NEDOCS weights.
    pub fn reference() -> Self {
        Self {
            version: REFERENCE_VERSION.to_string(),
            temperature_unit: TemperatureUnit::Fahrenheit,
            incidence: IncidenceRate {
                per_10k_attendees: 15.0,
                reference_duration_hours: 4.0,
            },
            input_ranges: InputRanges {
                max_attendance: 1_000_000,
                temperature: ValueRange {
                    min: -20.0,
                    max: 130.0,
                },
                max_duration_hours: 72.0,
            },
            temperature_curve: TemperatureCurve {
                points: vec![
                    CurvePoint { temperature: 85.0, multiplier: 1.0 },
                    CurvePoint { temperature: 98.0, multiplier: 1.65 },
                    CurvePoint { temperature: 110.0, multiplier: 2.85 },
                ],
            },
            humidity: Some(HumidityAdjustment {
                threshold_percent: 60.0,
                per_percent: 0.01,
            }),
            venue_multipliers: VenueMultipliers {
                indoor_climate_controlled: 1.0,
                mixed: 1.5,
                outdoor_exposed: 2.0,
            },
            duration_scaling: DurationScaling::Linear,
            waterfall: WaterfallTiers {
                stip: TierCapacity::FractionOfTotal { fraction: 0.65 },
                acs_telehealth: TierCapacity::FractionOfTotal { fraction: 0.15 },
            },
            scoring: ScoringWeights {
                intercept: -20.0,
                census_weight: 85.8,
                transport_weight: 85.8,
                boarder_weight: 600.0,
                ventilator_weight: 13.4,
                boarder_time_weight: 0.93,
                wait_time_weight: 5.64,
                ventilator_reference: 1.0,
                boarder_time_reference_hours: 1.0,
                wait_time_reference_minutes: 60.0,
            },
            bands: vec![
                BandBoundary { band: Band::NotBusy, lower: 0.0 },
                BandBoundary { band: Band::Busy, lower: 20.0 },
                BandBoundary { band: Band::ExtremelyBusy, lower: 60.0 },
                BandBoundary { band: Band::Overcrowded, lower: 100.0 },
                BandBoundary { band: Band::SeverelyOvercrowded, lower: 140.0 },
                BandBoundary { band: Band::DangerouslyOvercrowded, lower: 180.0 },
            ],
            alerts: AlertPolicy {
                heat_override_temperature: 98.0,
                critical_score: 140.0,
                warning_fraction: 0.95,
            },
            search: SearchSettings {
                samples: 64,
                tolerance: 1e-3,
                max_bisection_iterations: 100,
            },
        }
    }

    /// Check every coefficient against its documented domain
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.version.trim().is_empty() {
            return Err(ConfigurationError::invalid("version", "must not be empty"));
        }

        let incidence = &self.incidence;
        if !incidence.per_10k_attendees.is_finite() || incidence.per_10k_attendees < 0.0 {
            return Err(ConfigurationError::invalid(
                "incidence.per_10k_attendees",
                "must be finite and non-negative",
            ));
        }
        if !incidence.reference_duration_hours.is_finite()
            || incidence.reference_duration_hours <= 0.0
        {
            return Err(ConfigurationError::invalid(
                "incidence.reference_duration_hours",
                "must be finite and positive",
            ));
        }

        let ranges = &self.input_ranges;
        if ranges.max_attendance < 0 {
            return Err(ConfigurationError::invalid(
                "input_ranges.max_attendance",
                "must be non-negative",
            ));
        }
        ranges.temperature.validate("input_ranges.temperature")?;
        if !ranges.max_duration_hours.is_finite() || ranges.max_duration_hours <= 0.0 {
            return Err(ConfigurationError::invalid(
                "input_ranges.max_duration_hours",
                "must be finite and positive",
            ));
        }

        self.temperature_curve.validate()?;
        if let Some(humidity) = &self.humidity {
            humidity.validate()?;
        }
        self.venue_multipliers.validate()?;
        self.duration_scaling.validate()?;

        self.waterfall.stip.validate("waterfall.stip")?;
        self.waterfall
            .acs_telehealth
            .validate("waterfall.acs_telehealth")?;

        self.scoring.validate()?;
        self.validate_bands()?;

        let alerts = &self.alerts;
        if !alerts.heat_override_temperature.is_finite() {
            return Err(ConfigurationError::invalid(
                "alerts.heat_override_temperature",
                "must be finite",
            ));
        }
        if !alerts.critical_score.is_finite() || alerts.critical_score < 0.0 {
            return Err(ConfigurationError::invalid(
                "alerts.critical_score",
                "must be finite and non-negative",
            ));
        }
        if !alerts.warning_fraction.is_finite()
            || alerts.warning_fraction <= 0.0
            || alerts.warning_fraction > 1.0
        {
            return Err(ConfigurationError::invalid(
                "alerts.warning_fraction",
                "must lie in (0, 1]",
            ));
        }

        if self.search.samples < 2 {
            return Err(ConfigurationError::invalid(
                "search.samples",
                "at least two samples are required",
            ));
        }
        if !self.search.tolerance.is_finite() || self.search.tolerance <= 0.0 {
            return Err(ConfigurationError::invalid(
                "search.tolerance",
                "must be finite and positive",
            ));
        }
        if self.search.max_bisection_iterations == 0 {
            return Err(ConfigurationError::invalid(
                "search.max_bisection_iterations",
                "must be positive",
            ));
        }

        Ok(())
    }

    fn validate_bands(&self) -> Result<(), ConfigurationError> {
        if self.bands.len() != Band::ALL.len() {
            return Err(ConfigurationError::invalid(
                "bands",
                format!("expected {} boundaries, got {}", Band::ALL.len(), self.bands.len()),
            ));
        }

        for (boundary, expected) in self.bands.iter().zip(Band::ALL) {
            if boundary.band != expected {
                return Err(ConfigurationError::invalid(
                    "bands",
                    format!("expected {} at position {}, got {}", expected, expected.rank(), boundary.band),
                ));
            }
            if !boundary.lower.is_finite() {
                return Err(ConfigurationError::invalid("bands", "lower bounds must be finite"));
            }
        }

        if self.bands[0].lower != 0.0 {
            return Err(ConfigurationError::invalid(
                "bands",
                "lowest band must start at 0 so every score has a band",
            ));
        }

        if self.bands.windows(2).any(|w| w[1].lower <= w[0].lower) {
            return Err(ConfigurationError::invalid(
                "bands",
                "lower bounds must be strictly ascending",
            ));
        }

        Ok(())
    }

    /// Lower bound of a band's score interval
    pub fn band_lower_bound(&self, band: Band) -> Option<f64> {
        self.bands.iter().find(|b| b.band == band).map(|b| b.lower)
    }

    /// SHA-256 of the table's canonical JSON form (sorted keys)
    pub fn fingerprint(&self) -> Result<String, ConfigurationError> {
        use serde_json::Value;
        use std::collections::BTreeMap;

        let value = serde_json::to_value(self)
            .map_err(|e| ConfigurationError::Serialization(e.to_string()))?;

        fn canonicalize(value: Value) -> Value {
            match value {
                Value::Object(map) => {
                    let sorted: BTreeMap<String, Value> =
                        map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                    Value::Object(sorted.into_iter().collect())
                }
                Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
                other => other,
            }
        }

        let json = serde_json::to_string(&canonicalize(value))
            .map_err(|e| ConfigurationError::Serialization(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_table_is_valid() {
        ConfigTable::reference().validate().unwrap();
    }

    #[test]
    fn test_tier_capacity_resolution() {
        assert_eq!(TierCapacity::Absolute { count: 12.0 }.resolve(100.0), 12.0);
        assert_eq!(
            TierCapacity::FractionOfTotal { fraction: 0.25 }.resolve(100.0),
            25.0
        );
    }

    #[test]
    fn test_fraction_above_one_rejected() {
        let mut table = ConfigTable::reference();
        table.waterfall.stip = TierCapacity::FractionOfTotal { fraction: 1.2 };
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_zero_reference_denominator_rejected() {
        let mut table = ConfigTable::reference();
        table.scoring.wait_time_reference_minutes = 0.0;
        assert_eq!(
            table.validate(),
            Err(ConfigurationError::ZeroDenominator("wait_time_reference_minutes"))
        );
    }

    #[test]
    fn test_bands_must_ascend() {
        let mut table = ConfigTable::reference();
        table.bands[3].lower = 50.0;
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_fingerprint_is_stable_and_sensitive() {
        let a = ConfigTable::reference();
        let mut b = ConfigTable::reference();
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);

        b.scoring.transport_weight = 90.0;
        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn test_band_lower_bound_lookup() {
        let table = ConfigTable::reference();
        assert_eq!(table.band_lower_bound(Band::Overcrowded), Some(100.0));
        assert_eq!(table.band_lower_bound(Band::NotBusy), Some(0.0));
    }
}
