#![allow(dead_code)]

use std::sync::Arc;

use approx::assert_relative_eq;
use camino::Utf8PathBuf;
use nalgebra::Vector3;
use orrery::{
    catalog::BuiltinRegistry, constants::AU, orrery::Orrery,
    trajectory::fixed_point::FixedPointTrajectory,
};

/// Path of a file under `tests/data`.
pub fn fixture(name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Where the stand-in builtin Earth sits, in EquatorJ2000 km.
pub fn earth_position() -> Vector3<f64> {
    Vector3::new(AU, 0.0, 0.0)
}

/// Builtins that stand in for an ephemeris: the Sun at the barycenter, the Earth 1 AU away.
pub fn stand_in_builtins(registry: &mut BuiltinRegistry) {
    registry.add_builtin_orbit("Sun", Arc::new(FixedPointTrajectory::origin()));
    registry.add_builtin_orbit("Earth", Arc::new(FixedPointTrajectory::new(earth_position())));
}

/// An orrery without ephemeris, with the stand-in builtins installed.
pub fn orrery() -> Orrery {
    let _ = pretty_env_logger::try_init();
    let mut orrery = Orrery::new(None);
    stand_in_builtins(orrery.loader_mut().builtins_mut());
    orrery
}

pub fn assert_position_close(actual: &Vector3<f64>, expected: &Vector3<f64>, epsilon: f64) {
    assert_relative_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_relative_eq!(actual.y, expected.y, epsilon = epsilon);
    assert_relative_eq!(actual.z, expected.z, epsilon = epsilon);
}
