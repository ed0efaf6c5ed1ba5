mod common;

use approx::assert_relative_eq;
use common::{assert_position_close, fixture, orrery};
use nalgebra::Vector3;
use orrery::{
    catalog::{ssc_transform::ssc_to_document, CatalogDocument},
    constants::{AU, DAYS_PER_JULIAN_YEAR, J2000_OBLIQUITY_DEG, RADEG, SECONDS_PER_DAY},
    orrery::Orrery,
    orrery_errors::OrreryError,
    trajectory::Trajectory,
};
use serde_json::json;

fn with_sun() -> Orrery {
    let mut orrery = orrery();
    let sun = CatalogDocument::new("sun", vec![json!({ "name": "Sun", "trajectory": "Sun" })]);
    assert!(orrery.load_catalog(&sun).is_complete());
    orrery
}

const VESTA: &str = r#"
"Vesta" "Sol"
{
    Radius 262.7
    EllipticalOrbit {
        Period          3.63
        SemiMajorAxis   2.3615
        Eccentricity    0.0887
        Inclination     7.14
        AscendingNode   103.85
        ArgOfPericenter 151.2
        MeanAnomaly     205.5
    }
}
"#;

#[test]
fn test_legacy_record_matches_current_item() {
    let mut legacy = with_sun();
    let report = legacy.load_catalog(&ssc_to_document("vesta.ssc", VESTA).unwrap());
    assert_eq!(report.bodies, vec!["Sol/Vesta"]);

    let mut current = with_sun();
    let document = CatalogDocument::new(
        "vesta.json",
        vec![json!({
            "name": "Sol/Vesta",
            "center": "Sol",
            "trajectoryFrame": "EclipticJ2000",
            "trajectory": {
                "type": "Keplerian",
                "period": "3.63 y",
                "semiMajorAxis": "2.3615 au",
                "eccentricity": 0.0887,
                "inclination": 7.14,
                "ascendingNode": 103.85,
                "argumentOfPeriapsis": 151.2,
                "meanAnomaly": 205.5,
                "epoch": 2451545.0
            },
            "geometry": { "type": "Globe", "radius": 262.7 }
        })],
    );
    assert!(current.load_catalog(&document).is_complete());

    for t in [0.0, 1.0e7, -3.0e8] {
        assert_position_close(
            &legacy.position("Sol/Vesta", t).unwrap(),
            &current.position("Sol/Vesta", t).unwrap(),
            1e-3,
        );
    }
    let entity = legacy.catalog().find("Sol/Vesta").unwrap();
    assert_eq!(entity.center.as_deref(), Some("Sun"));
    assert_relative_eq!(
        entity.trajectory.period(),
        3.63 * DAYS_PER_JULIAN_YEAR * SECONDS_PER_DAY,
        max_relative = 1e-12
    );
}

#[test]
fn test_addon_layout() {
    let mut orrery = with_sun();
    let report = orrery
        .load_catalog_file(&fixture("addon/minor.ssc"))
        .unwrap();

    assert!(report.is_complete(), "{:?}", report.failures);
    assert_eq!(report.bodies, vec!["Sol/Vesta", "Sol/Vesta/Tracker"]);
    assert_eq!(
        report.resource_requests.iter().collect::<Vec<_>>(),
        vec![&fixture("addon/textures/medres/vesta.jpg").to_string()]
    );

    let info = orrery.catalog().find_info("Sol/Vesta").unwrap();
    assert_eq!(info.class.as_deref(), Some("asteroid"));
    assert!(orrery.catalog().find("Sol/Vesta").unwrap().rotation_model.is_some());

    // the tracker table is read from data/ and moves 100 km per day along x
    let vesta = orrery.position("Sol/Vesta", 0.0).unwrap();
    let tracker = orrery.position("Sol/Vesta/Tracker", 0.0).unwrap();
    assert_position_close(&(tracker - vesta), &Vector3::new(600.0, 0.0, 0.0), 1e-6);
    assert!(vesta.norm() > 2.0 * AU && vesta.norm() < 3.0 * AU);
}

#[test]
fn test_ecliptic_default_frame() {
    let mut orrery = with_sun();
    let report = orrery.load_catalog(
        &ssc_to_document(
            "marker.ssc",
            r#"ReferencePoint "Marker" "Sol" { FixedPosition [ 0 0 1 ] }"#,
        )
        .unwrap(),
    );
    assert!(report.is_complete());

    let eps = J2000_OBLIQUITY_DEG * RADEG;
    assert_position_close(
        &orrery.position("Sol/Marker", 0.0).unwrap(),
        &Vector3::new(0.0, -AU * eps.sin(), AU * eps.cos()),
        1e-3,
    );
}

#[test]
fn test_parse_error_reports_line() {
    let mut orrery = with_sun();
    let err = orrery
        .load_catalog_file(&fixture("broken.ssc"))
        .unwrap_err();
    assert_eq!(
        err,
        OrreryError::ParseError {
            line: 4,
            message: "unexpected 'Mass'".into()
        }
    );
    assert_eq!(orrery.catalog().names(), vec!["Sun"]);
}

#[test]
fn test_requests_reset_per_file() {
    let mut orrery = orrery();
    orrery
        .load_catalog_file(&fixture("solar_system.json"))
        .unwrap();
    let moon_map = fixture("moon.jpg").to_string();
    assert!(orrery.resource_requests().contains(&moon_map));

    orrery
        .load_catalog_file(&fixture("addon/minor.ssc"))
        .unwrap();
    assert_eq!(
        orrery.resource_requests().iter().collect::<Vec<_>>(),
        vec![&fixture("addon/textures/medres/vesta.jpg").to_string()]
    );

    // the Moon keeps waiting for its texture even though the request was cleared
    let update = orrery.apply_update(&moon_map, b"jpeg");
    assert_eq!(update.applied, vec!["Moon"]);
}
