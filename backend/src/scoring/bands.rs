//! Band lookup
//!
//! Bands are half-open, lower-inclusive intervals `[lower_i, lower_{i+1})`;
//! the last band is unbounded above. A score sitting exactly on a boundary
//! belongs to the higher band.

use crate::config::BandBoundary;
use crate::models::Band;

/// Band of a score: the highest boundary whose lower bound does not exceed it
///
/// Total over non-negative scores for any validated table, since the first
/// boundary starts at 0.
///
/// # Example
///
/// ```rust
/// use surge_radar_core_rs::scoring::band_for_score;
/// use surge_radar_core_rs::{Band, ConfigTable};
///
/// let config = ConfigTable::reference();
/// assert_eq!(band_for_score(99.999, &config.bands), Band::ExtremelyBusy);
/// assert_eq!(band_for_score(100.0, &config.bands), Band::Overcrowded);
/// assert_eq!(band_for_score(1_000.0, &config.bands), Band::DangerouslyOvercrowded);
/// ```
pub fn band_for_score(score: f64, bands: &[BandBoundary]) -> Band {
    bands
        .iter()
        .rev()
        .find(|boundary| boundary.lower <= score)
        .map_or(Band::lowest(), |boundary| boundary.band)
}
