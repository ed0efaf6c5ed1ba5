use nalgebra::{UnitQuaternion, Vector3};

use crate::constants::{TdbSeconds, DPI};

use super::RotationModel;

/// Constant spin about an axis fixed in the body frame.
///
/// The axis is tilted by `inclination` from the frame's z axis, with the node of the equator at
/// `ascending_node` along the frame's xy plane. The prime meridian sits at `meridian_angle` from
/// the node at `epoch`. Angles in radians, times in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct UniformRotationModel {
    pub period: f64,
    pub epoch: TdbSeconds,
    pub inclination: f64,
    pub ascending_node: f64,
    pub meridian_angle: f64,
}

impl UniformRotationModel {
    fn axis_orientation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.ascending_node)
            * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), self.inclination)
    }

    /// Spin rate in rad/s; a zero or non-finite period means no spin.
    fn rate(&self) -> f64 {
        if self.period.is_finite() && self.period != 0.0 {
            DPI / self.period
        } else {
            0.0
        }
    }
}

impl RotationModel for UniformRotationModel {
    fn orientation(&self, t: TdbSeconds) -> UnitQuaternion<f64> {
        let angle = self.meridian_angle + self.rate() * (t - self.epoch);
        self.axis_orientation() * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle)
    }

    fn angular_velocity(&self, _t: TdbSeconds) -> Vector3<f64> {
        self.axis_orientation() * Vector3::new(0.0, 0.0, self.rate())
    }
}

#[cfg(test)]
mod test_uniform_rotation {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_quarter_turn() {
        let model = UniformRotationModel {
            period: 400.0,
            epoch: 0.0,
            inclination: 0.0,
            ascending_node: 0.0,
            meridian_angle: 0.0,
        };
        let v = model.orientation(100.0) * Vector3::x();
        assert_relative_eq!(v, Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(model.angular_velocity(0.0).z, DPI / 400.0);
    }

    #[test]
    fn test_tilted_axis() {
        let model = UniformRotationModel {
            period: 86_400.0,
            epoch: 0.0,
            inclination: FRAC_PI_2,
            ascending_node: 0.0,
            meridian_angle: 0.0,
        };
        // pole tipped onto -y, spin axis follows it at every instant
        let pole = model.orientation(12_345.0) * Vector3::z();
        assert_relative_eq!(pole, -Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(
            model.angular_velocity(0.0).normalize(),
            -Vector3::y(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_period_does_not_spin() {
        let model = UniformRotationModel {
            period: 0.0,
            epoch: 0.0,
            inclination: 0.3,
            ascending_node: 0.2,
            meridian_angle: 0.1,
        };
        assert_eq!(model.orientation(0.0), model.orientation(1.0e9));
        assert_eq!(model.angular_velocity(0.0), Vector3::zeros());
    }
}
