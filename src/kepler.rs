use super::constants::DPI;
use std::f64::consts::PI;

/// Principal value of an angle in radians, in [0, 2π).
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Solve Kepler's equation `M = E − e·sin E` for an elliptic orbit (`0 ≤ e < 1`).
///
/// Newton iterations start from `E = M` for moderate eccentricities and from `E = π` for
/// highly eccentric orbits, where the former start can overshoot.
///
/// Return
/// ------
/// * the eccentric anomaly in [0, 2π), or `None` if the iteration does not converge
pub fn solve_kepler_elliptic(mean_anomaly: f64, ecc: f64) -> Option<f64> {
    const ITX: usize = 50;
    let contr = 100.0 * f64::EPSILON;

    let ell = principal_angle(mean_anomaly);
    let mut u = if ecc < 0.8 { ell } else { PI };

    for _ in 0..ITX {
        let du = -(u - ecc * u.sin() - ell) / (1.0 - ecc * u.cos());
        u += du;
        if du.abs() < contr * 1e3 {
            return Some(principal_angle(u));
        }
    }

    None
}

/// Solve the hyperbolic Kepler equation `M = e·sinh F − F` (`e > 1`).
///
/// Steps that would change the sign of `F` or leave the region `|F| < 15` are halved to keep the
/// Newton iteration stable far from periapsis.
///
/// Return
/// ------
/// * the hyperbolic anomaly, or `None` if the iteration does not converge
pub fn solve_kepler_hyperbolic(mean_anomaly: f64, ecc: f64) -> Option<f64> {
    const ITX: usize = 100;
    let contr = 100.0 * f64::EPSILON;

    let ell = mean_anomaly;
    let mut f: f64 = (ell / ecc).asinh();

    for _ in 0..ITX {
        let df = -(ecc * f.sinh() - f - ell) / (ecc * f.cosh() - 1.0);
        let ff = f + df;
        f = if f * ff < 0.0 && f.abs() > contr {
            f / 2.0
        } else if ff.abs() > 15.0 + ell.abs().ln().max(0.0) {
            f + df.signum() * 0.5
        } else {
            ff
        };
        if df.abs() < contr * 1e3 * f.abs().max(1.0) {
            return Some(f);
        }
    }

    None
}

#[cfg(test)]
mod kepler_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_principal_angle() {
        assert_relative_eq!(principal_angle(-PI / 2.0), 1.5 * PI);
        assert_relative_eq!(principal_angle(5.0 * PI), PI, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_elliptic() {
        for ecc in [0.0, 0.0167, 0.2835591457, 0.7, 0.95, 0.999] {
            for m in [0.0, 0.3, 1.0, 3.0, 5.5] {
                let e_anom = solve_kepler_elliptic(m, ecc).unwrap();
                // residual modulo 2π
                let residual = e_anom - ecc * e_anom.sin() - m;
                assert_relative_eq!((residual / 2.0).sin(), 0.0, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_solve_hyperbolic() {
        for ecc in [1.1, 1.5, 3.0] {
            for m in [-20.0, -1.0, 0.0, 0.5, 10.0, 200.0] {
                let f = solve_kepler_hyperbolic(m, ecc).unwrap();
                assert_relative_eq!(ecc * f.sinh() - f, m, epsilon = 1e-8, max_relative = 1e-10);
            }
        }
    }
}
