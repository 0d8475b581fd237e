//! Care-disposition waterfall
//!
//! Splits a total patient load across three ordered tiers:
//!
//! ```text
//! total ──► STIP (capped) ──► ACS/Telehealth (capped) ──► ED transport (sink)
//! ```
//!
//! Each capped tier absorbs `min(remaining, capacity)`. When the remainder
//! exactly equals a tier's capacity that tier takes all of it. Amounts are
//! carried at full precision; no rounding happens here.
//!
//! # Critical Invariants
//!
//! - **Conservation**: `stip + acs_telehealth + ed_transport == total`
//! - **Non-negativity**: every tier is ≥ 0

use crate::config::{ConfigTable, TierCapacity};
use crate::error::{ensure_finite, ForecastError, ValidationError};
use crate::models::{ScenarioParameters, WaterfallAllocation};

/// Allocate a total load across the waterfall tiers
///
/// `params` is accepted so capacity rules can depend on the scenario; the
/// reference tiers resolve capacities from the total alone.
///
/// # Errors
///
/// - `ValidationError::NegativeQuantity` if `total` is negative
/// - `NonFinite` if `total` or a resolved capacity is not finite
///
/// # Example
///
/// ```rust
/// use surge_radar_core_rs::config::TierCapacity;
/// use surge_radar_core_rs::waterfall::allocate_with_capacities;
///
/// let allocation = allocate_with_capacities(
///     100.0,
///     &TierCapacity::Absolute { count: 60.0 },
///     &TierCapacity::Absolute { count: 25.0 },
/// )
/// .unwrap();
///
/// assert_eq!(allocation.stip, 60.0);
/// assert_eq!(allocation.acs_telehealth, 25.0);
/// assert_eq!(allocation.ed_transport, 15.0);
/// ```
pub fn allocate(
    total: f64,
    _params: &ScenarioParameters,
    config: &ConfigTable,
) -> Result<WaterfallAllocation, ForecastError> {
    allocate_with_capacities(
        total,
        &config.waterfall.stip,
        &config.waterfall.acs_telehealth,
    )
}

/// Allocate against explicit tier capacities
pub fn allocate_with_capacities(
    total: f64,
    stip_capacity: &TierCapacity,
    acs_capacity: &TierCapacity,
) -> Result<WaterfallAllocation, ForecastError> {
    let total = ensure_finite(total, "waterfall_total")?;
    if total < 0.0 {
        return Err(ValidationError::NegativeQuantity {
            field: "waterfall_total",
            value: total,
        }
        .into());
    }

    let stip_cap = ensure_finite(stip_capacity.resolve(total), "stip_capacity")?.max(0.0);
    let acs_cap = ensure_finite(acs_capacity.resolve(total), "acs_capacity")?.max(0.0);

    let (stip, after_stip) = absorb(total, stip_cap);
    let (acs_telehealth, ed_transport) = absorb(after_stip, acs_cap);

    tracing::debug!(
        total,
        stip,
        acs_telehealth,
        ed_transport,
        "waterfall allocated"
    );

    Ok(WaterfallAllocation {
        stip,
        acs_telehealth,
        ed_transport,
    })
}

/// One tier takes what fits; returns (absorbed, passed on)
///
/// `remaining <= capacity` keeps exact equality inside the tier.
fn absorb(remaining: f64, capacity: f64) -> (f64, f64) {
    if remaining <= capacity {
        (remaining, 0.0)
    } else {
        // capacity < remaining, so the difference is strictly positive
        (capacity, remaining - capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;

    fn absolute(count: f64) -> TierCapacity {
        TierCapacity::Absolute { count }
    }

    #[test]
    fn test_exact_capacity_stays_in_tier() {
        let allocation = allocate_with_capacities(50.0, &absolute(50.0), &absolute(10.0)).unwrap();
        assert_eq!(allocation.stip, 50.0);
        assert_eq!(allocation.acs_telehealth, 0.0);
        assert_eq!(allocation.ed_transport, 0.0);
    }

    #[test]
    fn test_zero_capacity_routes_nothing() {
        let allocation = allocate_with_capacities(12.5, &absolute(0.0), &absolute(0.0)).unwrap();
        assert_eq!(allocation.stip, 0.0);
        assert_eq!(allocation.acs_telehealth, 0.0);
        assert_eq!(allocation.ed_transport, 12.5);
    }

    #[test]
    fn test_negative_total_rejected() {
        assert_eq!(
            allocate_with_capacities(-1.0, &absolute(1.0), &absolute(1.0)),
            Err(ForecastError::Validation(ValidationError::NegativeQuantity {
                field: "waterfall_total",
                value: -1.0,
            }))
        );
    }

    #[test]
    fn test_nan_total_rejected() {
        assert_eq!(
            allocate_with_capacities(f64::NAN, &absolute(1.0), &absolute(1.0)),
            Err(ForecastError::Configuration(ConfigurationError::NonFinite(
                "waterfall_total"
            )))
        );
    }

    #[test]
    fn test_fractional_load_carried_uncapped() {
        let allocation = allocate_with_capacities(
            0.75,
            &TierCapacity::FractionOfTotal { fraction: 0.5 },
            &absolute(0.125),
        )
        .unwrap();
        assert_eq!(allocation.stip, 0.375);
        assert_eq!(allocation.acs_telehealth, 0.125);
        assert_eq!(allocation.ed_transport, 0.25);
    }
}
