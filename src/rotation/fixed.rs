use nalgebra::{UnitQuaternion, Vector3};

use crate::constants::TdbSeconds;

use super::RotationModel;

/// A body that never turns in its frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedRotationModel {
    orientation: UnitQuaternion<f64>,
}

impl FixedRotationModel {
    pub fn new(orientation: UnitQuaternion<f64>) -> Self {
        FixedRotationModel { orientation }
    }

    /// Orientation from the same node/inclination/meridian angles as a uniform rotation at rest.
    pub fn from_angles(inclination: f64, ascending_node: f64, meridian_angle: f64) -> Self {
        Self::new(
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), ascending_node)
                * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), inclination)
                * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), meridian_angle),
        )
    }
}

impl RotationModel for FixedRotationModel {
    fn orientation(&self, _t: TdbSeconds) -> UnitQuaternion<f64> {
        self.orientation
    }

    fn angular_velocity(&self, _t: TdbSeconds) -> Vector3<f64> {
        Vector3::zeros()
    }
}
