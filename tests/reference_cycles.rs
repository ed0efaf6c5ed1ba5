mod common;

use common::orrery;
use orrery::{catalog::CatalogDocument, orrery_errors::OrreryError};
use serde_json::json;

#[test]
fn test_cycle_fails_both_items() {
    let mut orrery = orrery();
    let document = CatalogDocument::new(
        "cycle",
        vec![
            json!({ "name": "Sun", "trajectory": "Sun" }),
            json!({ "name": "A", "center": "B" }),
            json!({ "name": "B", "center": "A" }),
            json!({ "name": "C", "center": "Sun", "bodyFrame": { "type": "BodyFixed", "body": "C" } }),
        ],
    );
    let report = orrery.load_catalog(&document);

    assert_eq!(report.bodies, vec!["Sun"]);
    assert_eq!(report.failure("A"), Some(&OrreryError::CyclicReference("A".into())));
    assert_eq!(report.failure("B"), Some(&OrreryError::CyclicReference("B".into())));
    assert_eq!(report.failure("C"), Some(&OrreryError::CyclicReference("C".into())));
    assert!(!orrery.catalog().contains("A"));
}

#[test]
fn test_failed_reload_keeps_previous_entity() {
    let mut orrery = orrery();
    let good = CatalogDocument::new(
        "good",
        vec![
            json!({ "name": "Sun", "trajectory": "Sun" }),
            json!({ "name": "Marker", "center": "Sun",
                    "trajectory": { "type": "FixedPoint", "position": [1, 2, 3] } }),
        ],
    );
    assert!(orrery.load_catalog(&good).is_complete());

    let bad = CatalogDocument::new(
        "bad",
        vec![json!({ "name": "Marker", "center": "Sun",
                     "trajectory": { "type": "Keplerian", "eccentricity": 1.0 } })],
    );
    let report = orrery.load_catalog(&bad);
    assert!(matches!(report.failure("Marker"), Some(OrreryError::InvalidItem { .. })));
    assert_eq!(
        orrery.position("Marker", 0.0).unwrap(),
        nalgebra::Vector3::new(1.0, 2.0, 3.0)
    );
}

#[test]
fn test_cycle_closed_by_later_document() {
    let mut orrery = orrery();
    let first = CatalogDocument::new(
        "first",
        vec![
            json!({ "name": "Sun", "trajectory": "Sun" }),
            json!({ "name": "Planet", "center": "Sun",
                    "trajectory": { "type": "FixedPoint", "position": [10, 0, 0] } }),
            json!({ "name": "Moonlet", "center": "Planet",
                    "trajectory": { "type": "FixedPoint", "position": [0, 1, 0] } }),
        ],
    );
    assert!(orrery.load_catalog(&first).is_complete());
    let before = orrery.position("Moonlet", 0.0).unwrap();

    let second = CatalogDocument::new(
        "second",
        vec![json!({ "name": "Planet", "center": "Moonlet" })],
    );
    let report = orrery.load_catalog(&second);

    assert!(report.bodies.is_empty());
    assert_eq!(
        report.failure("Planet"),
        Some(&OrreryError::CyclicReference("Planet".into()))
    );
    assert_eq!(
        orrery.catalog().find("Planet").unwrap().center.as_deref(),
        Some("Sun")
    );
    assert_eq!(orrery.position("Moonlet", 0.0).unwrap(), before);
}
