//! Threshold search over the forecast response surface
//!
//! Finds the smallest value of one scenario field at which the forecast
//! reaches a target band, treating the whole pipeline as a black box
//! `f(x) -> band`.
//!
//! # Algorithm
//!
//! 1. Sample `f` on an even grid over `[lo, hi]` (endpoints included).
//!    Samples are independent and evaluated in parallel; results are
//!    kept in grid order so the outcome never depends on scheduling.
//! 2. If the sampled band ranks are non-decreasing, bracket the first
//!    crossing between two neighbouring samples and bisect it down to the
//!    configured tolerance.
//! 3. Otherwise fall back to the linear scan and report the first
//!    qualifying sample.
//! 4. With no qualifying sample, report `NotFound`: `ExceedsDomain` when
//!    the score is still rising at `hi`, `NeverReached` when it is not.

use crate::config::{ConfigTable, SearchSettings};
use crate::error::{ForecastError, ValidationError};
use crate::models::{Band, FieldSelector, ScenarioParameters};
use crate::orchestrator::engine::evaluate_core;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One evaluation of the black-box function
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    pub band: Band,
    pub score: f64,
}

/// How a crossing was located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    /// Sampled response was monotonic; crossing refined to tolerance
    Bisection,
    /// Sampled response was not monotonic; crossing at grid resolution
    LinearScan,
}

/// Why no crossing exists inside the domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    /// Score still rising at the upper bound; the crossing lies beyond it
    ExceedsDomain,
    /// Score does not rise across the domain; the target is never reached
    NeverReached,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::ExceedsDomain => f.write_str("exceeds domain"),
            NotFoundReason::NeverReached => f.write_str("never reached"),
        }
    }
}

/// Result of a threshold search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found {
        /// Minimal qualifying value (within tolerance for bisection)
        value: f64,
        /// Band reached at `value`
        band: Band,
        method: SearchMethod,
    },
    NotFound {
        reason: NotFoundReason,
        /// Highest band observed inside the domain
        highest_band: Band,
    },
}

impl SearchOutcome {
    pub fn value(&self) -> Option<f64> {
        match self {
            SearchOutcome::Found { value, .. } => Some(*value),
            SearchOutcome::NotFound { .. } => None,
        }
    }
}

/// Find where a scenario field first pushes the forecast into `target_band`
///
/// Every field other than `free_variable` is held at `fixed`'s value.
///
/// # Errors
///
/// - Any configuration error from validating `config`, checked once before
///   sampling
/// - `ValidationError::SearchDomain` if `lo > hi` or either is not finite
/// - Any validation error raised when a domain value is outside the
///   field's configured range
/// - Any configuration error raised by the pipeline
///
/// # Example
///
/// ```rust
/// use surge_radar_core_rs::search::{find_crossing, NotFoundReason, SearchOutcome};
/// use surge_radar_core_rs::{Band, ConfigTable, EdStateConstants, FieldSelector, ScenarioInput, ScenarioParameters, VenueType};
///
/// let config = ConfigTable::reference();
/// let fixed = ScenarioParameters::new(
///     ScenarioInput {
///         attendance: 10_000,
///         temperature: 70.0,
///         humidity_percent: None,
///         venue: VenueType::IndoorClimateControlled,
///         duration_hours: 4.0,
///         ed_state: EdStateConstants {
///             patients_in_department: 0,
///             ed_beds: 50,
///             hospital_beds: 300,
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
/// // Below the comfort threshold temperature has no effect
/// let outcome = find_crossing(
///     FieldSelector::Temperature,
///     Band::Busy,
///     &fixed,
///     &config,
///     (60.0, 80.0),
/// )
/// .unwrap();
///
/// assert!(matches!(
///     outcome,
///     SearchOutcome::NotFound { reason: NotFoundReason::NeverReached, .. }
/// ));
/// ```
pub fn find_crossing(
    free_variable: FieldSelector,
    target_band: Band,
    fixed: &ScenarioParameters,
    config: &ConfigTable,
    domain: (f64, f64),
) -> Result<SearchOutcome, ForecastError> {
    config.validate()?;

    let probe = |x: f64| -> Result<Probe, ForecastError> {
        let params = fixed.with_field(free_variable, x, config)?;
        let (_, _, threat) = evaluate_core(&params, config)?;
        Ok(Probe {
            band: threat.band,
            score: threat.score,
        })
    };

    let outcome = search_crossing(probe, target_band, domain, &config.search)?;

    tracing::info!(
        field = %free_variable,
        target = %target_band,
        lo = domain.0,
        hi = domain.1,
        ?outcome,
        "threshold search complete"
    );

    Ok(outcome)
}

/// Threshold search over an arbitrary band-valued function
///
/// `f` must be pure; it is evaluated concurrently during sampling.
pub fn search_crossing<F>(
    f: F,
    target_band: Band,
    domain: (f64, f64),
    settings: &SearchSettings,
) -> Result<SearchOutcome, ForecastError>
where
    F: Fn(f64) -> Result<Probe, ForecastError> + Sync,
{
    let (lo, hi) = domain;
    if !lo.is_finite() || !hi.is_finite() || lo > hi {
        return Err(ValidationError::SearchDomain { lo, hi }.into());
    }

    let grid = sample_grid(lo, hi, settings.samples.max(2));

    // Evaluate in parallel, then surface the first failure in grid order
    let results: Vec<Result<Probe, ForecastError>> = grid.par_iter().map(|&x| f(x)).collect();
    let probes = results.into_iter().collect::<Result<Vec<Probe>, ForecastError>>()?;

    let target = target_band.rank();
    let monotonic = probes
        .windows(2)
        .all(|pair| pair[0].band.rank() <= pair[1].band.rank());

    let first = match probes.iter().position(|p| p.band.rank() >= target) {
        Some(index) => index,
        None => return Ok(not_found(&probes)),
    };

    if first == 0 {
        return Ok(SearchOutcome::Found {
            value: grid[0],
            band: probes[0].band,
            method: if monotonic {
                SearchMethod::Bisection
            } else {
                SearchMethod::LinearScan
            },
        });
    }

    if !monotonic {
        tracing::warn!(
            target = %target_band,
            samples = grid.len(),
            "response is not monotonic over the domain; using linear scan"
        );
        return Ok(SearchOutcome::Found {
            value: grid[first],
            band: probes[first].band,
            method: SearchMethod::LinearScan,
        });
    }

    // Invariant: f(below) < target <= f(above)
    let mut below = grid[first - 1];
    let mut above = grid[first];
    let mut above_band = probes[first].band;
    let mut iterations = 0;

    while above - below > settings.tolerance && iterations < settings.max_bisection_iterations {
        let mid = below + (above - below) / 2.0;
        if mid <= below || mid >= above {
            break;
        }
        let probe = f(mid)?;
        if probe.band.rank() >= target {
            above = mid;
            above_band = probe.band;
        } else {
            below = mid;
        }
        iterations += 1;
    }

    tracing::debug!(iterations, below, above, "bisection converged");

    Ok(SearchOutcome::Found {
        value: above,
        band: above_band,
        method: SearchMethod::Bisection,
    })
}

fn not_found(probes: &[Probe]) -> SearchOutcome {
    let highest_band = probes
        .iter()
        .map(|p| p.band)
        .max()
        .unwrap_or_else(Band::lowest);

    let rising = match (probes.first(), probes.last()) {
        (Some(first), Some(last)) => last.score > first.score,
        _ => false,
    };

    SearchOutcome::NotFound {
        reason: if rising {
            NotFoundReason::ExceedsDomain
        } else {
            NotFoundReason::NeverReached
        },
        highest_band,
    }
}

/// `samples` evenly spaced points, first exactly `lo`, last exactly `hi`
fn sample_grid(lo: f64, hi: f64, samples: usize) -> Vec<f64> {
    let last = samples - 1;
    (0..samples)
        .map(|i| {
            if i == last {
                hi
            } else {
                lo + (hi - lo) * (i as f64) / (last as f64)
            }
        })
        .collect()
}
