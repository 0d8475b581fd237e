//! Tests for ConfigTable loading and validation
//!
//! A table that is missing, malformed or out of domain must surface as a
//! ConfigurationError; nothing is silently defaulted except the documented
//! optional sections.

use surge_radar_core_rs::config::{DurationScaling, TierCapacity, REFERENCE_VERSION};
use surge_radar_core_rs::{
    evaluate, find_crossing, Band, ConfigTable, ConfigurationError, EdStateConstants,
    FieldSelector, ForecastError, ScenarioInput, ScenarioParameters, VenueType,
};

fn festival(config: &ConfigTable) -> ScenarioParameters {
    ScenarioParameters::new(
        ScenarioInput {
            attendance: 60_000,
            temperature: 96.0,
            humidity_percent: None,
            venue: VenueType::OutdoorExposed,
            duration_hours: 6.0,
            ed_state: EdStateConstants {
                patients_in_department: 30,
                ed_beds: 50,
                hospital_beds: 300,
                admitted_boarders: 4,
                ventilators_in_use: 1,
                longest_boarder_hours: 2.0,
                longest_wait_minutes: 45.0,
            },
        },
        config,
    )
    .unwrap()
}

fn assert_rejected_by_evaluate(table: &ConfigTable, expected_field: &str) {
    let params = festival(&ConfigTable::reference());
    match evaluate(&params, table) {
        Err(ForecastError::Configuration(ConfigurationError::Invalid { field, .. })) => {
            assert_eq!(field, expected_field)
        }
        other => panic!("expected invalid table, got {:?}", other),
    }
}

fn reference_json() -> serde_json::Value {
    serde_json::to_value(ConfigTable::reference()).unwrap()
}

#[test]
fn test_reference_round_trips_through_json() {
    let json = serde_json::to_string(&ConfigTable::reference()).unwrap();
    let loaded = ConfigTable::from_json(&json).unwrap();

    assert_eq!(loaded, ConfigTable::reference());
    assert_eq!(loaded.version, REFERENCE_VERSION);
}

#[test]
fn test_unspecified_table_is_configuration_error() {
    assert!(matches!(
        ConfigTable::from_json(""),
        Err(ConfigurationError::Malformed(_))
    ));
    assert!(matches!(
        ConfigTable::from_json("   \n"),
        Err(ConfigurationError::Malformed(_))
    ));
}

#[test]
fn test_garbage_is_malformed() {
    assert!(matches!(
        ConfigTable::from_json("{ not json"),
        Err(ConfigurationError::Malformed(_))
    ));
}

#[test]
fn test_missing_section_is_malformed() {
    let mut value = reference_json();
    value.as_object_mut().unwrap().remove("scoring");

    assert!(matches!(
        ConfigTable::from_json(&value.to_string()),
        Err(ConfigurationError::Malformed(_))
    ));
}

#[test]
fn test_unknown_key_is_malformed() {
    let mut value = reference_json();
    value["scoring"]["mystery_weight"] = serde_json::json!(3.0);

    assert!(matches!(
        ConfigTable::from_json(&value.to_string()),
        Err(ConfigurationError::Malformed(_))
    ));
}

#[test]
fn test_out_of_domain_coefficient_is_invalid() {
    let mut value = reference_json();
    value["scoring"]["boarder_weight"] = serde_json::json!(-600.0);

    match ConfigTable::from_json(&value.to_string()) {
        Err(ConfigurationError::Invalid { field, .. }) => {
            assert_eq!(field, "scoring.boarder_weight")
        }
        other => panic!("expected Invalid, got {:?}", other),
    }
}

#[test]
fn test_zero_scoring_denominator_rejected_on_load() {
    let mut value = reference_json();
    value["scoring"]["ventilator_reference"] = serde_json::json!(0.0);

    assert_eq!(
        ConfigTable::from_json(&value.to_string()),
        Err(ConfigurationError::ZeroDenominator("ventilator_reference"))
    );
}

#[test]
fn test_duration_scaling_defaults_to_linear_when_omitted() {
    let mut value = reference_json();
    value.as_object_mut().unwrap().remove("duration_scaling");

    let loaded = ConfigTable::from_json(&value.to_string()).unwrap();
    assert_eq!(loaded.duration_scaling, DurationScaling::Linear);
}

#[test]
fn test_humidity_section_is_optional() {
    let mut value = reference_json();
    value.as_object_mut().unwrap().remove("humidity");

    let loaded = ConfigTable::from_json(&value.to_string()).unwrap();
    assert!(loaded.humidity.is_none());
}

#[test]
fn test_tagged_tier_capacities_parse() {
    let mut value = reference_json();
    value["waterfall"]["stip"] = serde_json::json!({ "type": "absolute", "count": 120.0 });

    let loaded = ConfigTable::from_json(&value.to_string()).unwrap();
    assert_eq!(loaded.waterfall.stip, TierCapacity::Absolute { count: 120.0 });
}

#[test]
fn test_bands_out_of_order_rejected() {
    let mut value = reference_json();
    let bands = value["bands"].as_array_mut().unwrap();
    bands.swap(1, 2);

    assert!(matches!(
        ConfigTable::from_json(&value.to_string()),
        Err(ConfigurationError::Invalid { .. })
    ));
}

#[test]
fn test_lowest_band_must_start_at_zero() {
    let mut table = ConfigTable::reference();
    table.bands[0].lower = 5.0;
    assert!(table.validate().is_err());
}

#[test]
fn test_search_settings_validated() {
    let mut table = ConfigTable::reference();
    table.search.samples = 1;
    assert!(table.validate().is_err());

    let mut table = ConfigTable::reference();
    table.search.tolerance = 0.0;
    assert!(table.validate().is_err());
}

#[test]
fn test_fingerprint_survives_reload() {
    let reference = ConfigTable::reference();
    let json = serde_json::to_string_pretty(&reference).unwrap();
    let loaded = ConfigTable::from_json(&json).unwrap();

    assert_eq!(loaded.fingerprint().unwrap(), reference.fingerprint().unwrap());
}

#[test]
fn test_evaluate_rejects_table_without_bands() {
    let mut table = ConfigTable::reference();
    table.bands.clear();
    assert_rejected_by_evaluate(&table, "bands");
}

#[test]
fn test_evaluate_rejects_empty_temperature_curve() {
    let mut table = ConfigTable::reference();
    table.temperature_curve.points.clear();
    assert_rejected_by_evaluate(&table, "temperature_curve.points");
}

#[test]
fn test_evaluate_rejects_negative_weight() {
    let mut table = ConfigTable::reference();
    table.scoring.transport_weight = -85.8;
    assert_rejected_by_evaluate(&table, "scoring.transport_weight");
}

#[test]
fn test_find_crossing_rejects_invalid_table() {
    let mut table = ConfigTable::reference();
    table.scoring.transport_weight = -85.8;
    let fixed = festival(&ConfigTable::reference());

    let err = find_crossing(
        FieldSelector::Attendance,
        Band::Overcrowded,
        &fixed,
        &table,
        (0.0, 100_000.0),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ForecastError::Configuration(ConfigurationError::Invalid { .. })
    ));
}

#[test]
fn test_tier_capacity_rejects_foreign_keys() {
    let mut value = reference_json();
    value["waterfall"]["stip"] = serde_json::json!({
        "type": "absolute",
        "count": 5.0,
        "fraction": 0.3
    });

    assert!(matches!(
        ConfigTable::from_json(&value.to_string()),
        Err(ConfigurationError::Malformed(_))
    ));
}

#[test]
fn test_duration_scaling_rejects_foreign_keys() {
    let mut value = reference_json();
    value["duration_scaling"] = serde_json::json!({
        "type": "power_law",
        "exponent": 0.5,
        "knee_hours": 3.0
    });

    assert!(matches!(
        ConfigTable::from_json(&value.to_string()),
        Err(ConfigurationError::Malformed(_))
    ));
}
