//! Reference frames of trajectories and body orientations.
//!
//! Every inertial frame is expressed relative to **EquatorJ2000**, the frame of the DE
//! ephemerides. ICRF and EquatorJ2000 are treated as identical (they differ by a few
//! milliarcseconds); EclipticJ2000 is EquatorJ2000 rotated about the x axis by the J2000
//! obliquity. A body-fixed frame follows the rotation model of another entity and is resolved by
//! the [`UniverseCatalog`](crate::universe::UniverseCatalog).
use std::fmt;

use nalgebra::{UnitQuaternion, Vector3};

use crate::constants::{J2000_OBLIQUITY_DEG, RADEG};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Frame {
    #[default]
    EquatorJ2000,
    EclipticJ2000,
    Icrf,
    /// Fixed to the named entity and rotating with it.
    BodyFixed(String),
}

impl Frame {
    /// Orientation of an inertial frame relative to EquatorJ2000, `None` for body-fixed frames.
    pub fn inertial_orientation(&self) -> Option<UnitQuaternion<f64>> {
        match self {
            Frame::EquatorJ2000 | Frame::Icrf => Some(UnitQuaternion::identity()),
            Frame::EclipticJ2000 => Some(UnitQuaternion::from_axis_angle(
                &Vector3::x_axis(),
                J2000_OBLIQUITY_DEG * RADEG,
            )),
            Frame::BodyFixed(_) => None,
        }
    }

    /// Name of the entity a body-fixed frame depends on.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Frame::BodyFixed(body) => Some(body),
            _ => None,
        }
    }

    /// Parse the name of an inertial frame, as written in catalogs.
    pub fn from_inertial_name(name: &str) -> Option<Self> {
        match name {
            "EquatorJ2000" => Some(Frame::EquatorJ2000),
            "EclipticJ2000" => Some(Frame::EclipticJ2000),
            "ICRF" => Some(Frame::Icrf),
            _ => None,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::EquatorJ2000 => write!(f, "EquatorJ2000"),
            Frame::EclipticJ2000 => write!(f, "EclipticJ2000"),
            Frame::Icrf => write!(f, "ICRF"),
            Frame::BodyFixed(body) => write!(f, "BodyFixed({body})"),
        }
    }
}
