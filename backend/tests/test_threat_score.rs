//! Tests for threat scoring and band assignment
//!
//! Critical invariants tested:
//! - Score is non-negative and non-decreasing in ED transports
//! - A score equal to a boundary lands in the higher band
//! - Zero capacity denominators are configuration errors

use proptest::prelude::*;
use surge_radar_core_rs::config::ScoringWeights;
use surge_radar_core_rs::{
    band_for_score, score, Band, ConfigTable, ConfigurationError, EdStateConstants, ForecastError,
    ValidationError,
};

fn baseline_state() -> EdStateConstants {
    EdStateConstants {
        patients_in_department: 40,
        ed_beds: 50,
        hospital_beds: 300,
        admitted_boarders: 10,
        ventilators_in_use: 2,
        longest_boarder_hours: 4.0,
        longest_wait_minutes: 90.0,
    }
}

/// Table whose score equals the transport count exactly
fn transport_only_config() -> ConfigTable {
    let mut config = ConfigTable::reference();
    config.scoring = ScoringWeights {
        intercept: 0.0,
        census_weight: 0.0,
        transport_weight: 1.0,
        boarder_weight: 0.0,
        ventilator_weight: 0.0,
        boarder_time_weight: 0.0,
        wait_time_weight: 0.0,
        ventilator_reference: 1.0,
        boarder_time_reference_hours: 1.0,
        wait_time_reference_minutes: 60.0,
    };
    config
}

fn single_bed_state() -> EdStateConstants {
    EdStateConstants {
        patients_in_department: 0,
        ed_beds: 1,
        hospital_beds: 1,
        admitted_boarders: 0,
        ventilators_in_use: 0,
        longest_boarder_hours: 0.0,
        longest_wait_minutes: 0.0,
    }
}

#[test]
fn test_nedocs_terms_for_baseline_department() {
    let config = ConfigTable::reference();
    let threat = score(0.0, &baseline_state(), &config).unwrap();

    assert!((threat.terms.census - 68.64).abs() < 1e-9);
    assert!((threat.terms.boarders - 20.0).abs() < 1e-9);
    assert!((threat.terms.ventilators - 26.8).abs() < 1e-9);
    assert!((threat.terms.boarder_time - 3.72).abs() < 1e-9);
    assert!((threat.terms.wait_time - 8.46).abs() < 1e-9);
    assert_eq!(threat.terms.transports, 0.0);
    assert!((threat.score - 107.62).abs() < 1e-9);
    assert_eq!(threat.band, Band::Overcrowded);
}

#[test]
fn test_score_exactly_on_each_boundary_takes_higher_band() {
    let config = transport_only_config();
    for boundary in &config.bands {
        let threat = score(boundary.lower, &single_bed_state(), &config).unwrap();
        assert_eq!(threat.score, boundary.lower);
        assert_eq!(
            threat.band, boundary.band,
            "score {} should be {}",
            boundary.lower, boundary.band
        );
    }
}

#[test]
fn test_score_just_below_each_boundary_keeps_lower_band() {
    let config = transport_only_config();
    for pair in config.bands.windows(2) {
        let below = pair[1].lower - 1e-6;
        let threat = score(below, &single_bed_state(), &config).unwrap();
        assert_eq!(threat.band, pair[0].band);
    }
}

#[test]
fn test_negative_intercept_clamped_at_zero() {
    let config = ConfigTable::reference();
    let threat = score(0.0, &single_bed_state(), &config).unwrap();

    assert_eq!(threat.terms.raw_sum(), -20.0);
    assert_eq!(threat.score, 0.0);
    assert_eq!(threat.band, Band::lowest());
}

#[test]
fn test_zero_bed_denominators_rejected() {
    let config = ConfigTable::reference();

    let mut state = baseline_state();
    state.ed_beds = 0;
    assert_eq!(
        score(3.0, &state, &config),
        Err(ForecastError::Configuration(
            ConfigurationError::ZeroDenominator("ed_beds")
        ))
    );

    let mut state = baseline_state();
    state.hospital_beds = 0;
    assert_eq!(
        score(3.0, &state, &config),
        Err(ForecastError::Configuration(
            ConfigurationError::ZeroDenominator("hospital_beds")
        ))
    );
}

#[test]
fn test_negative_transports_are_an_input_error() {
    let config = ConfigTable::reference();
    match score(-3.0, &baseline_state(), &config) {
        Err(ForecastError::Validation(ValidationError::NegativeQuantity { field, value })) => {
            assert_eq!(field, "ed_transport");
            assert_eq!(value, -3.0);
        }
        other => panic!("expected NegativeQuantity, got {:?}", other),
    }
}

#[test]
fn test_band_lookup_is_total() {
    let config = ConfigTable::reference();
    for score in [0.0, 19.99, 20.0, 59.5, 60.0, 139.0, 180.0, 5_000.0, f64::MAX] {
        // Every score maps to some band without panicking
        let band = band_for_score(score, &config.bands);
        assert!(band.rank() < Band::ALL.len());
    }
}

proptest! {
    #[test]
    fn prop_score_non_decreasing_in_transports(
        a in 0.0f64..2_000.0,
        b in 0.0f64..2_000.0,
    ) {
        let config = ConfigTable::reference();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_score = score(low, &baseline_state(), &config).unwrap();
        let high_score = score(high, &baseline_state(), &config).unwrap();

        prop_assert!(low_score.score <= high_score.score);
        prop_assert!(low_score.band <= high_score.band);
    }

    #[test]
    fn prop_score_never_negative(
        transports in 0.0f64..500.0,
        patients in 0u32..200,
        beds in 1u32..200,
    ) {
        let config = ConfigTable::reference();
        let mut state = single_bed_state();
        state.patients_in_department = patients;
        state.ed_beds = beds;

        let threat = score(transports, &state, &config).unwrap();
        prop_assert!(threat.score >= 0.0);
        prop_assert_eq!(threat.band, band_for_score(threat.score, &config.bands));
    }
}
