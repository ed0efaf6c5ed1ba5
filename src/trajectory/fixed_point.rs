use nalgebra::Vector3;

use crate::{constants::TdbSeconds, orrery_errors::OrreryError, state_vector::StateVector};

use super::Trajectory;

/// A body at rest relative to its center.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPointTrajectory {
    position: Vector3<f64>,
}

impl FixedPointTrajectory {
    pub fn new(position: Vector3<f64>) -> Self {
        FixedPointTrajectory { position }
    }

    /// Placeholder standing exactly on the center.
    pub fn origin() -> Self {
        Self::new(Vector3::zeros())
    }
}

impl Trajectory for FixedPointTrajectory {
    fn state(&self, _t: TdbSeconds) -> Result<StateVector, OrreryError> {
        Ok(StateVector::new(self.position, Vector3::zeros()))
    }

    fn period(&self) -> f64 {
        0.0
    }
}
