//! State vector type returned by trajectory evaluation.
//!
//! Overview
//! -----------------
//! `StateVector` is the unified container returned by every
//! [`Trajectory`](crate::trajectory::Trajectory). It always carries a **position** vector and
//! optionally a **velocity**, depending on what the trajectory can provide.
//!
//! Units
//! -----------------
//! * `position`: kilometers (km)
//! * `velocity`: kilometers per second (km/s)
//!
//! Arithmetic semantics
//! -----------------
//! Addition/subtraction are defined component-wise. The velocity propagates **only when present
//! on both operands**; otherwise it is dropped to avoid silently mixing partial information.
//! Scalar multiplication scales both fields, which is what linear combinations of trajectories
//! rely on.

use nalgebra::Vector3;
use std::ops::{Add, Mul, Sub};

/// Position and optional velocity of a body at one instant.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct StateVector {
    pub position: Vector3<f64>,
    pub velocity: Option<Vector3<f64>>,
}

impl StateVector {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        StateVector {
            position,
            velocity: Some(velocity),
        }
    }

    /// A state with a known position only.
    pub fn from_position(position: Vector3<f64>) -> Self {
        StateVector {
            position,
            velocity: None,
        }
    }

    pub fn zero() -> Self {
        StateVector::new(Vector3::zeros(), Vector3::zeros())
    }
}

fn combine_velocity(
    a: Option<Vector3<f64>>,
    b: Option<Vector3<f64>>,
    op: impl Fn(Vector3<f64>, Vector3<f64>) -> Vector3<f64>,
) -> Option<Vector3<f64>> {
    match (a, b) {
        (Some(v1), Some(v2)) => Some(op(v1, v2)),
        _ => None,
    }
}

impl Add for StateVector {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        StateVector {
            position: self.position + other.position,
            velocity: combine_velocity(self.velocity, other.velocity, |a, b| a + b),
        }
    }
}

impl Sub for StateVector {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        StateVector {
            position: self.position - other.position,
            velocity: combine_velocity(self.velocity, other.velocity, |a, b| a - b),
        }
    }
}

impl Mul<f64> for StateVector {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        StateVector {
            position: self.position * rhs,
            velocity: self.velocity.map(|v| v * rhs),
        }
    }
}

#[cfg(test)]
mod test_state_vector {
    use super::*;

    #[test]
    fn test_velocity_dropped_when_one_side_missing() {
        let a = StateVector::new(Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
        let b = StateVector::from_position(Vector3::new(2.0, 0.0, 0.0));
        let c = a + b;
        assert_eq!(c.position.x, 3.0);
        assert!(c.velocity.is_none());
    }

    #[test]
    fn test_scaled_difference() {
        let a = StateVector::new(Vector3::new(4.0, 2.0, 0.0), Vector3::new(1.0, 1.0, 1.0));
        let b = StateVector::new(Vector3::new(1.0, 1.0, 1.0), Vector3::new(1.0, 0.0, 0.0));
        let c = a - b * 2.0;
        assert_eq!(c.position, Vector3::new(2.0, 0.0, -2.0));
        assert_eq!(c.velocity, Some(Vector3::new(-1.0, 1.0, 1.0)));
    }
}
