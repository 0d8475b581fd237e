//! Scenario Parameters
//!
//! The single input record of the forecasting pipeline. A raw
//! `ScenarioInput` (what a caller or dashboard supplies) becomes a
//! `ScenarioParameters` only after validation against the configured
//! input ranges.
//!
//! # Critical Invariants
//!
//! 1. **Validated once**: A `ScenarioParameters` value is always in-domain
//! 2. **Immutable**: Changing a field produces a new, re-validated value
//! 3. **No clamping**: Out-of-range fields are rejected, never coerced

use crate::config::ConfigTable;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Venue exposure class
///
/// Ordered by configured venue multiplier:
/// outdoor-exposed ≥ mixed ≥ indoor-climate-controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueType {
    /// Enclosed arena with climate control
    IndoorClimateControlled,
    /// Open stadium or unbounded fan zone
    OutdoorExposed,
    /// Partially covered venue
    Mixed,
}

impl VenueType {
    pub const ALL: [VenueType; 3] = [
        VenueType::IndoorClimateControlled,
        VenueType::Mixed,
        VenueType::OutdoorExposed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VenueType::IndoorClimateControlled => "indoor_climate_controlled",
            VenueType::OutdoorExposed => "outdoor_exposed",
            VenueType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for VenueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VenueType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "indoor_climate_controlled" | "indoor" => Ok(VenueType::IndoorClimateControlled),
            "outdoor_exposed" | "outdoor" => Ok(VenueType::OutdoorExposed),
            "mixed" => Ok(VenueType::Mixed),
            _ => Err(ValidationError::UnknownVenue(s.to_string())),
        }
    }
}

/// Baseline operating state of the receiving emergency department
///
/// Used by the scorer independently of the waterfall. Bed counts of zero
/// pass input validation but are rejected by the scorer as zero
/// denominators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdStateConstants {
    /// Patients currently in the department (all ED beds and hallways)
    pub patients_in_department: u32,

    /// Licensed ED treatment spaces
    pub ed_beds: u32,

    /// Licensed inpatient beds of the hospital
    pub hospital_beds: u32,

    /// Admitted patients still boarding in the ED
    pub admitted_boarders: u32,

    /// Ventilators currently in use in the ED
    pub ventilators_in_use: u32,

    /// Hours the longest admitted boarder has waited
    pub longest_boarder_hours: f64,

    /// Minutes the most recently bedded patient waited in the waiting room
    pub longest_wait_minutes: f64,
}

impl EdStateConstants {
    fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("longest_boarder_hours", self.longest_boarder_hours),
            ("longest_wait_minutes", self.longest_wait_minutes),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::EdState { field, value });
            }
        }
        Ok(())
    }
}

/// Raw, unvalidated scenario as supplied by a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioInput {
    /// Expected attendance (head count)
    pub attendance: i64,

    /// Ambient temperature in the table's configured unit
    pub temperature: f64,

    /// Relative humidity in percent, if known
    #[serde(default)]
    pub humidity_percent: Option<f64>,

    pub venue: VenueType,

    /// Event duration in hours
    pub duration_hours: f64,

    pub ed_state: EdStateConstants,
}

/// Validated scenario; the only form the pipeline accepts
///
/// # Example
///
/// ```rust
/// use surge_radar_core_rs::{ConfigTable, EdStateConstants, ScenarioInput, ScenarioParameters, VenueType};
///
/// let config = ConfigTable::reference();
/// let input = ScenarioInput {
///     attendance: 10_000,
///     temperature: 95.0,
///     humidity_percent: None,
///     venue: VenueType::OutdoorExposed,
///     duration_hours: 6.0,
///     ed_state: EdStateConstants {
///         patients_in_department: 40,
///         ed_beds: 50,
///         hospital_beds: 300,
///         admitted_boarders: 10,
///         ventilators_in_use: 2,
///         longest_boarder_hours: 4.0,
///         longest_wait_minutes: 90.0,
///     },
/// };
///
/// let params = ScenarioParameters::new(input, &config).unwrap();
/// assert_eq!(params.attendance(), 10_000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScenarioParameters {
    input: ScenarioInput,
}

impl ScenarioParameters {
    /// Validate a raw scenario against the table's input ranges
    ///
    /// # Errors
    ///
    /// Returns the first offending field as a `ValidationError`.
    pub fn new(input: ScenarioInput, config: &ConfigTable) -> Result<Self, ValidationError> {
        let ranges = &config.input_ranges;

        if input.attendance < 0 || input.attendance > ranges.max_attendance {
            return Err(ValidationError::Attendance {
                value: input.attendance,
                min: 0,
                max: ranges.max_attendance,
            });
        }

        if !ranges.temperature.contains(input.temperature) {
            return Err(ValidationError::Temperature {
                value: input.temperature,
                min: ranges.temperature.min,
                max: ranges.temperature.max,
            });
        }

        if let Some(humidity) = input.humidity_percent {
            if !humidity.is_finite() || !(0.0..=100.0).contains(&humidity) {
                return Err(ValidationError::Humidity { value: humidity });
            }
        }

        if !input.duration_hours.is_finite()
            || input.duration_hours <= 0.0
            || input.duration_hours > ranges.max_duration_hours
        {
            return Err(ValidationError::Duration {
                value: input.duration_hours,
                max: ranges.max_duration_hours,
            });
        }

        input.ed_state.validate()?;

        Ok(Self { input })
    }

    /// Copy of this scenario with one field replaced, re-validated
    ///
    /// Attendance takes the floor of `value` so the search variable stays
    /// real-valued while the head count stays integral.
    pub fn with_field(
        &self,
        field: FieldSelector,
        value: f64,
        config: &ConfigTable,
    ) -> Result<Self, ValidationError> {
        let mut input = self.input.clone();
        match field {
            FieldSelector::Attendance => {
                if !value.is_finite() {
                    return Err(ValidationError::Attendance {
                        value: i64::MIN,
                        min: 0,
                        max: config.input_ranges.max_attendance,
                    });
                }
                input.attendance = value.floor() as i64;
            }
            FieldSelector::Temperature => input.temperature = value,
            FieldSelector::Humidity => input.humidity_percent = Some(value),
            FieldSelector::DurationHours => input.duration_hours = value,
        }
        Self::new(input, config)
    }

    pub fn attendance(&self) -> i64 {
        self.input.attendance
    }

    pub fn temperature(&self) -> f64 {
        self.input.temperature
    }

    pub fn humidity_percent(&self) -> Option<f64> {
        self.input.humidity_percent
    }

    pub fn venue(&self) -> VenueType {
        self.input.venue
    }

    pub fn duration_hours(&self) -> f64 {
        self.input.duration_hours
    }

    pub fn ed_state(&self) -> &EdStateConstants {
        &self.input.ed_state
    }

    /// Current value of a searchable field
    pub fn field_value(&self, field: FieldSelector) -> Option<f64> {
        match field {
            FieldSelector::Attendance => Some(self.input.attendance as f64),
            FieldSelector::Temperature => Some(self.input.temperature),
            FieldSelector::Humidity => self.input.humidity_percent,
            FieldSelector::DurationHours => Some(self.input.duration_hours),
        }
    }

    pub fn as_input(&self) -> &ScenarioInput {
        &self.input
    }
}

/// Scenario field a threshold search may vary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSelector {
    Attendance,
    Temperature,
    Humidity,
    DurationHours,
}

impl FieldSelector {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldSelector::Attendance => "attendance",
            FieldSelector::Temperature => "temperature",
            FieldSelector::Humidity => "humidity",
            FieldSelector::DurationHours => "duration_hours",
        }
    }
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldSelector {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attendance" => Ok(FieldSelector::Attendance),
            "temperature" => Ok(FieldSelector::Temperature),
            "humidity" | "humidity_percent" => Ok(FieldSelector::Humidity),
            "duration" | "duration_hours" => Ok(FieldSelector::DurationHours),
            _ => Err(ValidationError::UnknownField(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_from_str_accepts_kebab_and_snake() {
        assert_eq!(
            "outdoor-exposed".parse::<VenueType>().unwrap(),
            VenueType::OutdoorExposed
        );
        assert_eq!(
            "indoor_climate_controlled".parse::<VenueType>().unwrap(),
            VenueType::IndoorClimateControlled
        );
        assert_eq!("Mixed".parse::<VenueType>().unwrap(), VenueType::Mixed);
    }

    #[test]
    fn test_unknown_venue_rejected() {
        let err = "fan-zone-on-mars".parse::<VenueType>().unwrap_err();
        assert_eq!(err.field(), "venue");
    }

    #[test]
    fn test_field_selector_round_trips_through_display() {
        for field in [
            FieldSelector::Attendance,
            FieldSelector::Temperature,
            FieldSelector::Humidity,
            FieldSelector::DurationHours,
        ] {
            assert_eq!(field.to_string().parse::<FieldSelector>().unwrap(), field);
        }
        assert!("wind_speed".parse::<FieldSelector>().is_err());
    }

    #[test]
    fn test_venue_serde_snake_case() {
        let json = serde_json::to_string(&VenueType::OutdoorExposed).unwrap();
        assert_eq!(json, "\"outdoor_exposed\"");
    }
}
