//! # Rotation models
//!
//! A [`RotationModel`] gives the orientation of a body's fixed axes relative to its body frame as
//! a function of simulation time. The quaternion maps body-fixed vectors into the body frame:
//! `v_frame = q · v_fixed`.
//!
//! - [`uniform::UniformRotationModel`] – constant spin about a fixed axis.
//! - [`fixed::FixedRotationModel`] – constant orientation.
//! - [`iau_moon::IauMoonRotationModel`] – IAU 2009 lunar pole and prime meridian series.
use std::{fmt::Debug, sync::Arc};

use nalgebra::{UnitQuaternion, Vector3};

use crate::constants::TdbSeconds;

pub mod fixed;
pub mod iau_moon;
pub mod uniform;

pub trait RotationModel: Debug + Send + Sync {
    /// Orientation at `t` TDB seconds past J2000.
    fn orientation(&self, t: TdbSeconds) -> UnitQuaternion<f64>;

    /// Angular velocity in rad/s, expressed in the body frame.
    fn angular_velocity(&self, t: TdbSeconds) -> Vector3<f64>;
}

pub type SharedRotationModel = Arc<dyn RotationModel>;

/// Orientation of a pole given by its right ascension and declination, spun by `w` about it.
///
/// All angles in radians; the node of the body equator sits at `α + 90°`.
pub(crate) fn pole_orientation(alpha: f64, delta: f64, w: f64) -> UnitQuaternion<f64> {
    use std::f64::consts::FRAC_PI_2;

    UnitQuaternion::from_axis_angle(&Vector3::z_axis(), alpha + FRAC_PI_2)
        * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2 - delta)
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), w)
}
