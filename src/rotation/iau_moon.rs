//! IAU 2009 orientation model of the Moon.
//!
//! Pole right ascension `α`, declination `δ` and prime meridian `W` follow the IAU WGCCRE 2009
//! report, including the thirteen periodic arguments `E1 … E13`. `d` is the interval in days from
//! J2000 and `T` the interval in Julian centuries.
use nalgebra::{UnitQuaternion, Vector3};

use crate::constants::{TdbSeconds, DAYS_PER_JULIAN_YEAR, RADEG, SECONDS_PER_DAY};

use super::{pole_orientation, RotationModel};

/// `(constant, rate per day)` of the periodic arguments, degrees.
const ARGUMENTS: [(f64, f64); 13] = [
    (125.045, -0.052_992_1),
    (250.089, -0.105_984_2),
    (260.008, 13.012_000_9),
    (176.625, 13.340_715_4),
    (357.529, 0.985_600_3),
    (311.589, 26.405_708_4),
    (134.963, 13.064_993_0),
    (276.617, 0.328_714_6),
    (34.226, 1.748_487_7),
    (15.134, -0.158_976_3),
    (119.743, 0.003_609_6),
    (239.961, 0.164_357_3),
    (25.053, 12.959_008_8),
];

const ALPHA_SIN: [f64; 13] = [
    -3.8787, -0.1204, 0.0700, -0.0172, 0.0, 0.0072, 0.0, 0.0, 0.0, -0.0052, 0.0, 0.0, 0.0043,
];
const DELTA_COS: [f64; 13] = [
    1.5419, 0.0239, -0.0278, 0.0068, 0.0, -0.0029, 0.0009, 0.0, 0.0, 0.0008, 0.0, 0.0, -0.0009,
];
const W_SIN: [f64; 13] = [
    3.5610, 0.1208, -0.0642, 0.0158, 0.0252, -0.0066, -0.0047, -0.0046, 0.0028, 0.0052, 0.0040,
    0.0019, -0.0044,
];

/// Mean spin rate of the prime meridian, degrees per day.
const W_RATE: f64 = 13.176_358_15;

#[derive(Debug, Clone, Copy, Default)]
pub struct IauMoonRotationModel;

impl IauMoonRotationModel {
    /// `(α, δ, W)` in degrees.
    pub fn pole_and_meridian(&self, t: TdbSeconds) -> (f64, f64, f64) {
        let d = t / SECONDS_PER_DAY;
        let big_t = d / (DAYS_PER_JULIAN_YEAR * 100.0);

        let e: Vec<f64> = ARGUMENTS
            .iter()
            .map(|(c, rate)| (c + rate * d) * RADEG)
            .collect();

        let series = |coeffs: &[f64; 13], f: fn(f64) -> f64| -> f64 {
            coeffs.iter().zip(&e).map(|(k, ei)| k * f(*ei)).sum()
        };

        let alpha = 269.9949 + 0.0031 * big_t + series(&ALPHA_SIN, f64::sin);
        let delta = 66.5392 + 0.0130 * big_t + series(&DELTA_COS, f64::cos);
        let w = 38.3213 + W_RATE * d - 1.4e-12 * d * d + series(&W_SIN, f64::sin);
        (alpha, delta, w)
    }
}

impl RotationModel for IauMoonRotationModel {
    fn orientation(&self, t: TdbSeconds) -> UnitQuaternion<f64> {
        let (alpha, delta, w) = self.pole_and_meridian(t);
        pole_orientation(alpha * RADEG, delta * RADEG, w * RADEG)
    }

    /// Spin about the instantaneous pole at the mean meridian rate; the slow pole motion is
    /// neglected.
    fn angular_velocity(&self, t: TdbSeconds) -> Vector3<f64> {
        self.orientation(t) * Vector3::new(0.0, 0.0, W_RATE * RADEG / SECONDS_PER_DAY)
    }
}

#[cfg(test)]
mod test_iau_moon {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pole_at_j2000() {
        let (alpha, delta, w) = IauMoonRotationModel.pole_and_meridian(0.0);
        // hand-evaluated series at d = 0
        assert_relative_eq!(alpha, 266.8577, epsilon = 1e-3);
        assert_relative_eq!(delta, 65.6411, epsilon = 1e-3);
        assert_relative_eq!(w, 41.1953, epsilon = 1e-3);
    }

    #[test]
    fn test_pole_direction_matches_angles() {
        let model = IauMoonRotationModel;
        let t = 1.0e8;
        let (alpha, delta, _) = model.pole_and_meridian(t);
        let pole = model.orientation(t) * Vector3::z();
        let (a, d) = (alpha * RADEG, delta * RADEG);
        let expected = Vector3::new(d.cos() * a.cos(), d.cos() * a.sin(), d.sin());
        assert_relative_eq!(pole, expected, epsilon = 1e-12);
    }
}
