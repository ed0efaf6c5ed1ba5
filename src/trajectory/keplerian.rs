//! # Keplerian trajectories
//!
//! Two-body conic motion propagated from classical mean elements. The orbit is described in the
//! owner's trajectory frame: the reference plane is the frame's xy plane and the node is measured
//! from its x axis.
//!
//! ## Units
//!
//! - Lengths: **km**
//! - Angles: **radians**
//! - Epoch and period: **TDB seconds** (past J2000 for the epoch)
//!
//! The mean motion comes from the period rather than from a gravitational parameter, so a
//! catalog can describe an orbit without knowing the mass of the center. For hyperbolic orbits
//! (`e > 1`) the "period" is `2π / n` and the trajectory reports itself as aperiodic.
use nalgebra::{Rotation3, Vector3};

use crate::{
    constants::{TdbSeconds, DPI},
    geometry::general_ellipse::GeneralEllipse,
    kepler::{solve_kepler_elliptic, solve_kepler_hyperbolic},
    orrery_errors::OrreryError,
    state_vector::StateVector,
};

use super::Trajectory;

/// Mean orbital elements at a reference epoch.
///
/// Units
/// -----
/// * `reference_epoch`: TDB seconds past J2000.
/// * `semi_major_axis`: km, negative for hyperbolic orbits.
/// * `eccentricity`: unitless, `e ≠ 1`.
/// * `inclination`, `ascending_node_longitude`, `periapsis_argument`, `mean_anomaly`: radians.
/// * `period`: seconds, `2π / n`.
#[derive(Debug, PartialEq, Clone)]
pub struct KeplerianElements {
    pub reference_epoch: TdbSeconds,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ascending_node_longitude: f64,
    pub periapsis_argument: f64,
    pub mean_anomaly: f64,
    pub period: f64,
}

impl KeplerianElements {
    pub fn periapsis_distance(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }
}

#[derive(Debug, Clone)]
pub struct KeplerianTrajectory {
    elements: KeplerianElements,
    /// Unit vector toward periapsis.
    p_hat: Vector3<f64>,
    /// In-plane unit vector 90° ahead of periapsis.
    q_hat: Vector3<f64>,
}

impl KeplerianTrajectory {
    pub fn new(elements: KeplerianElements) -> Self {
        let rotation = Rotation3::from_axis_angle(
            &Vector3::z_axis(),
            elements.ascending_node_longitude,
        ) * Rotation3::from_axis_angle(&Vector3::x_axis(), elements.inclination)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), elements.periapsis_argument);

        KeplerianTrajectory {
            p_hat: rotation * Vector3::x(),
            q_hat: rotation * Vector3::y(),
            elements,
        }
    }

    pub fn elements(&self) -> &KeplerianElements {
        &self.elements
    }

    /// Mean anomaly at `t`, not reduced to [0, 2π).
    fn mean_anomaly_at(&self, t: TdbSeconds) -> f64 {
        let el = &self.elements;
        el.mean_anomaly + DPI / el.period * (t - el.reference_epoch)
    }

    /// The ellipse traced by this orbit, `None` for hyperbolic orbits.
    ///
    /// The ellipse is centered `a·e` behind the focus along the periapsis direction, with
    /// generating vectors `a·P̂` and `b·Q̂`, so `point(E)` is the position at eccentric anomaly `E`.
    pub fn osculating_ellipse(&self) -> Option<GeneralEllipse> {
        let e = self.elements.eccentricity;
        if e >= 1.0 {
            return None;
        }
        let a = self.elements.semi_major_axis;
        let b = a * (1.0 - e * e).sqrt();
        Some(GeneralEllipse::new(
            -self.p_hat * (a * e),
            self.p_hat * a,
            self.q_hat * b,
        ))
    }
}

impl Trajectory for KeplerianTrajectory {
    fn state(&self, t: TdbSeconds) -> Result<StateVector, OrreryError> {
        let e = self.elements.eccentricity;
        let n = DPI / self.elements.period;
        let mean_anomaly = self.mean_anomaly_at(t);
        let diverged = || OrreryError::KeplerDivergence {
            mean_anomaly,
            eccentricity: e,
        };

        // in-plane position (x toward periapsis) and velocity
        let (x, y, vx, vy) = if e < 1.0 {
            let a = self.elements.semi_major_axis;
            let b = a * (1.0 - e * e).sqrt();
            let ecc_anomaly = solve_kepler_elliptic(mean_anomaly, e).ok_or_else(diverged)?;
            let (s, c) = ecc_anomaly.sin_cos();
            let rate = n / (1.0 - e * c);
            (a * (c - e), b * s, -a * s * rate, b * c * rate)
        } else {
            let a = self.elements.semi_major_axis.abs();
            let b = a * (e * e - 1.0).sqrt();
            let hyp_anomaly = solve_kepler_hyperbolic(mean_anomaly, e).ok_or_else(diverged)?;
            let (sh, ch) = (hyp_anomaly.sinh(), hyp_anomaly.cosh());
            let rate = n / (e * ch - 1.0);
            (a * (e - ch), b * sh, -a * sh * rate, b * ch * rate)
        };

        Ok(StateVector::new(
            self.p_hat * x + self.q_hat * y,
            self.p_hat * vx + self.q_hat * vy,
        ))
    }

    fn period(&self) -> f64 {
        if self.elements.eccentricity < 1.0 {
            self.elements.period
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod test_keplerian {
    use super::*;
    use crate::constants::{AU, RADEG, SECONDS_PER_DAY};
    use approx::assert_relative_eq;

    fn earth_like() -> KeplerianElements {
        KeplerianElements {
            reference_epoch: 0.0,
            semi_major_axis: AU,
            eccentricity: 0.0167,
            inclination: 7.155 * RADEG,
            ascending_node_longitude: 174.9 * RADEG,
            periapsis_argument: 288.1 * RADEG,
            mean_anomaly: 357.5 * RADEG,
            period: 365.256 * SECONDS_PER_DAY,
        }
    }

    #[test]
    fn test_returns_after_one_period() {
        let traj = KeplerianTrajectory::new(earth_like());
        let start = traj.position(1.0e6).unwrap();
        let after = traj.position(1.0e6 + traj.period()).unwrap();
        assert_relative_eq!(start, after, epsilon = 1e-2, max_relative = 1e-9);
    }

    #[test]
    fn test_periapsis_distance_at_zero_anomaly() {
        let mut el = earth_like();
        el.mean_anomaly = 0.0;
        let q = el.periapsis_distance();
        let traj = KeplerianTrajectory::new(el);
        assert_relative_eq!(traj.position(0.0).unwrap().norm(), q, max_relative = 1e-12);
    }

    #[test]
    fn test_velocity_matches_finite_difference() {
        let traj = KeplerianTrajectory::new(earth_like());
        let t = 5.0e6;
        let h = 10.0;
        let fd = (traj.position(t + h).unwrap() - traj.position(t - h).unwrap()) / (2.0 * h);
        let v = traj.state(t).unwrap().velocity.unwrap();
        assert_relative_eq!(v, fd, epsilon = 1e-6, max_relative = 1e-6);
    }

    #[test]
    fn test_positions_lie_on_osculating_ellipse() {
        let traj = KeplerianTrajectory::new(earth_like());
        let ellipse = traj.osculating_ellipse().unwrap();
        let el = traj.elements();

        for t in [0.0, 1.0e6, 1.3e7, 2.9e7] {
            let m = traj.mean_anomaly_at(t);
            let ecc_anomaly = solve_kepler_elliptic(m, el.eccentricity).unwrap();
            assert_relative_eq!(
                ellipse.point(ecc_anomaly),
                traj.position(t).unwrap(),
                epsilon = 1e-3,
                max_relative = 1e-10
            );
        }
        assert_relative_eq!(ellipse.semi_major_axis_length(), AU, max_relative = 1e-12);
    }

    #[test]
    fn test_hyperbolic_is_aperiodic() {
        let el = KeplerianElements {
            reference_epoch: 0.0,
            semi_major_axis: -1.0e6,
            eccentricity: 1.5,
            inclination: 0.0,
            ascending_node_longitude: 0.0,
            periapsis_argument: 0.0,
            mean_anomaly: 0.0,
            period: 1.0e5,
        };
        let traj = KeplerianTrajectory::new(el);
        assert!(!traj.is_periodic());
        assert!(traj.osculating_ellipse().is_none());

        // periapsis at the reference epoch, on the +x axis
        assert_relative_eq!(
            traj.position(0.0).unwrap(),
            Vector3::new(5.0e5, 0.0, 0.0),
            max_relative = 1e-12
        );
        // moving away afterwards
        assert!(traj.position(5.0e4).unwrap().norm() > 5.0e5);
    }
}
