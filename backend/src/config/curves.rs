//! Response curves and multiplier tables
//!
//! The nonlinear parts of the load model: temperature response, humidity
//! adjustment, duration scaling and the venue lookup. Each type validates
//! itself; evaluation assumes a validated table.

use crate::error::ConfigurationError;
use crate::models::VenueType;
use serde::{Deserialize, Serialize};

/// Closed interval of accepted input values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    pub(crate) fn validate(&self, field: &str) -> Result<(), ConfigurationError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(ConfigurationError::invalid(
                field,
                format!("range [{}, {}] must be finite with min < max", self.min, self.max),
            ));
        }
        Ok(())
    }
}

/// Knot of the temperature response curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurvePoint {
    pub temperature: f64,
    pub multiplier: f64,
}

/// Piecewise-linear temperature multiplier
///
/// Flat at 1.0 up to the first knot (the comfort threshold), linear
/// between knots, and extrapolated along the last segment's slope above
/// the final knot. Knots are strictly ascending in temperature with
/// non-decreasing multipliers, so the curve is continuous and
/// non-decreasing everywhere.
///
/// # Example
///
/// ```rust
/// use surge_radar_core_rs::config::{CurvePoint, TemperatureCurve};
///
/// let curve = TemperatureCurve {
///     points: vec![
///         CurvePoint { temperature: 85.0, multiplier: 1.0 },
///         CurvePoint { temperature: 95.0, multiplier: 1.5 },
///     ],
/// };
/// assert_eq!(curve.multiplier(70.0), 1.0);
/// assert_eq!(curve.multiplier(90.0), 1.25);
/// assert_eq!(curve.multiplier(105.0), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemperatureCurve {
    pub points: Vec<CurvePoint>,
}

impl TemperatureCurve {
    /// Temperature at and below which no heat multiplier applies
    pub fn comfort_threshold(&self) -> f64 {
        self.points.first().map_or(f64::INFINITY, |p| p.temperature)
    }

    pub fn multiplier(&self, temperature: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 1.0,
        };

        if temperature <= first.temperature {
            return 1.0;
        }

        for segment in self.points.windows(2) {
            let (a, b) = (segment[0], segment[1]);
            if temperature <= b.temperature {
                return interpolate(a, b, temperature);
            }
        }

        // Above the final knot: continue the last segment's slope
        let n = self.points.len();
        if n < 2 {
            return last.multiplier;
        }
        interpolate(self.points[n - 2], *last, temperature)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        if self.points.len() < 2 {
            return Err(ConfigurationError::invalid(
                "temperature_curve.points",
                "at least two points are required",
            ));
        }

        for point in &self.points {
            if !point.temperature.is_finite() || !point.multiplier.is_finite() {
                return Err(ConfigurationError::invalid(
                    "temperature_curve.points",
                    "points must be finite",
                ));
            }
        }

        if self.points[0].multiplier != 1.0 {
            return Err(ConfigurationError::invalid(
                "temperature_curve.points",
                "first point marks the comfort threshold and must have multiplier 1.0",
            ));
        }

        for segment in self.points.windows(2) {
            if segment[1].temperature <= segment[0].temperature {
                return Err(ConfigurationError::invalid(
                    "temperature_curve.points",
                    "temperatures must be strictly ascending",
                ));
            }
            if segment[1].multiplier < segment[0].multiplier {
                return Err(ConfigurationError::invalid(
                    "temperature_curve.points",
                    "multipliers must be non-decreasing",
                ));
            }
        }

        Ok(())
    }
}

fn interpolate(a: CurvePoint, b: CurvePoint, temperature: f64) -> f64 {
    let t = (temperature - a.temperature) / (b.temperature - a.temperature);
    a.multiplier + t * (b.multiplier - a.multiplier)
}

/// Additive heat-index proxy from relative humidity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HumidityAdjustment {
    /// Humidity (percent) above which the adjustment starts
    pub threshold_percent: f64,

    /// Multiplier increment per percent above threshold
    pub per_percent: f64,
}

impl HumidityAdjustment {
    pub fn adjustment(&self, humidity_percent: f64) -> f64 {
        (humidity_percent - self.threshold_percent).max(0.0) * self.per_percent
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.threshold_percent.is_finite() || !(0.0..=100.0).contains(&self.threshold_percent) {
            return Err(ConfigurationError::invalid(
                "humidity.threshold_percent",
                "must lie in [0, 100]",
            ));
        }
        if !self.per_percent.is_finite() || self.per_percent < 0.0 {
            return Err(ConfigurationError::invalid(
                "humidity.per_percent",
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// How load scales with event duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum DurationScaling {
    /// factor = hours / reference
    #[default]
    Linear,

    /// factor = (hours / reference)^exponent; exponent < 1 models
    /// saturating attendee turnover
    PowerLaw { exponent: f64 },
}

impl DurationScaling {
    pub fn factor(&self, hours: f64, reference_hours: f64) -> f64 {
        let ratio = hours / reference_hours;
        match self {
            DurationScaling::Linear => ratio,
            DurationScaling::PowerLaw { exponent } => ratio.powf(*exponent),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        if let DurationScaling::PowerLaw { exponent } = self {
            if !exponent.is_finite() || *exponent <= 0.0 {
                return Err(ConfigurationError::invalid(
                    "duration_scaling.exponent",
                    "must be finite and positive",
                ));
            }
        }
        Ok(())
    }
}

/// Discrete venue multipliers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VenueMultipliers {
    pub indoor_climate_controlled: f64,
    pub mixed: f64,
    pub outdoor_exposed: f64,
}

impl VenueMultipliers {
    pub fn get(&self, venue: VenueType) -> f64 {
        match venue {
            VenueType::IndoorClimateControlled => self.indoor_climate_controlled,
            VenueType::Mixed => self.mixed,
            VenueType::OutdoorExposed => self.outdoor_exposed,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        let values = [self.indoor_climate_controlled, self.mixed, self.outdoor_exposed];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ConfigurationError::invalid(
                "venue_multipliers",
                "multipliers must be finite and non-negative",
            ));
        }
        if !(self.outdoor_exposed >= self.mixed && self.mixed >= self.indoor_climate_controlled) {
            return Err(ConfigurationError::invalid(
                "venue_multipliers",
                "expected outdoor_exposed >= mixed >= indoor_climate_controlled",
            ));
        }
        Ok(())
    }
}
