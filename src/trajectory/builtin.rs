//! Named trajectories derived from a loaded DE ephemeris.
//!
//! | builtin   | definition                     | center |
//! |-----------|--------------------------------|--------|
//! | `Sun`     | Sun                            | SSB    |
//! | `Moon`    | Moon                           | Earth  |
//! | `EMB`     | EMB − Sun                      | Sun    |
//! | `Earth`   | (EMB − Sun) − m·Moon           | Sun    |
//! | planets   | planet − Sun                   | Sun    |
//!
//! with `m = 1 / (1 + EMRAT)`. Every Sun-relative orbit keeps the period of the body itself.
use std::sync::Arc;

use log::info;

use crate::{
    catalog::registry::BuiltinRegistry,
    jpl_ephem::{ephemeris_ids::JplObjectId, JplEphemeris},
    rotation::iau_moon::IauMoonRotationModel,
};

use super::{linear_combination::LinearCombinationTrajectory, SharedTrajectory};

const SUN_RELATIVE: [(&str, JplObjectId); 9] = [
    ("Mercury", JplObjectId::Mercury),
    ("Venus", JplObjectId::Venus),
    ("EMB", JplObjectId::EarthMoonBarycenter),
    ("Mars", JplObjectId::Mars),
    ("Jupiter", JplObjectId::Jupiter),
    ("Saturn", JplObjectId::Saturn),
    ("Uranus", JplObjectId::Uranus),
    ("Neptune", JplObjectId::Neptune),
    ("Pluto", JplObjectId::Pluto),
];

/// `body − Sun`, with the period of the body.
pub fn sun_relative(ephemeris: &JplEphemeris, body: JplObjectId) -> LinearCombinationTrajectory {
    LinearCombinationTrajectory::pair(
        Arc::new(ephemeris.trajectory(body)),
        1.0,
        Arc::new(ephemeris.trajectory(JplObjectId::Sun)),
        -1.0,
    )
}

/// Heliocentric Earth: the Sun-relative Earth–Moon barycenter, shifted by the Moon's share of
/// the Earth–Moon system.
pub fn earth_from_emb(ephemeris: &JplEphemeris) -> LinearCombinationTrajectory {
    let moon_share = 1.0 / (1.0 + ephemeris.earth_moon_mass_ratio());
    let emb: SharedTrajectory = Arc::new(sun_relative(ephemeris, JplObjectId::EarthMoonBarycenter));
    LinearCombinationTrajectory::pair(
        emb,
        1.0,
        Arc::new(ephemeris.trajectory(JplObjectId::Moon)),
        -moon_share,
    )
}

/// Register every ephemeris-derived orbit under its builtin name.
pub fn install_ephemeris_builtins(ephemeris: &JplEphemeris, registry: &mut BuiltinRegistry) {
    registry.add_builtin_orbit("Sun", Arc::new(ephemeris.trajectory(JplObjectId::Sun)));
    registry.add_builtin_orbit("Moon", Arc::new(ephemeris.trajectory(JplObjectId::Moon)));
    for (name, body) in SUN_RELATIVE {
        registry.add_builtin_orbit(name, Arc::new(sun_relative(ephemeris, body)));
    }
    registry.add_builtin_orbit("Earth", Arc::new(earth_from_emb(ephemeris)));

    info!(
        "Registered {} builtin orbits from DE{}",
        registry.orbit_names().len(),
        ephemeris.de_number()
    );
}

/// Register the rotation models that need no external data.
pub fn install_default_rotation_models(registry: &mut BuiltinRegistry) {
    registry.add_builtin_rotation_model("IAU Moon", Arc::new(IauMoonRotationModel));
}
