//! # General ellipse
//!
//! An ellipse in 3-D space described by a center and two *generating vectors* `v0`, `v1`:
//!
//! ```text
//! p(θ) = center + cos θ · v0 + sin θ · v1
//! ```
//!
//! The generating vectors need not be orthogonal, which makes the representation convenient for
//! orbit fitting: any pair of conjugate semi-diameters describes the same curve. The principal
//! semi-axes are recovered in closed form by finding the parameter `θ0` where `|p(θ) − center|`
//! is extremal:
//!
//! ```text
//! a = v0·v0,  b = v1·v1,  c = v0·v1
//! θ0 = ½ · atan2(2c, a − b)
//! major =  cos θ0 · v0 + sin θ0 · v1
//! minor = −sin θ0 · v0 + cos θ0 · v1
//! ```
//!
//! Degenerate inputs are not rejected: collinear generating vectors give a zero-length minor
//! axis, and NaN components propagate to the result.
use nalgebra::{Matrix2x3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneralEllipse {
    center: Vector3<f64>,
    v0: Vector3<f64>,
    v1: Vector3<f64>,
}

impl GeneralEllipse {
    pub fn new(center: Vector3<f64>, v0: Vector3<f64>, v1: Vector3<f64>) -> Self {
        GeneralEllipse { center, v0, v1 }
    }

    pub fn center(&self) -> Vector3<f64> {
        self.center
    }

    /// Generating vectors as the rows of a 2×3 matrix, `v0` first.
    pub fn generating_vectors(&self) -> Matrix2x3<f64> {
        Matrix2x3::from_rows(&[self.v0.transpose(), self.v1.transpose()])
    }

    /// Point of the ellipse at parameter `theta` (radians).
    pub fn point(&self, theta: f64) -> Vector3<f64> {
        let (s, c) = theta.sin_cos();
        self.center + self.v0 * c + self.v1 * s
    }

    /// Principal semi-axes as the rows of a 2×3 matrix, semi-major axis first.
    ///
    /// The two rows are orthogonal and lie in the plane spanned by the generating vectors.
    pub fn principal_semi_axes(&self) -> Matrix2x3<f64> {
        let a = self.v0.dot(&self.v0);
        let b = self.v1.dot(&self.v1);
        let c = self.v0.dot(&self.v1);
        let theta0 = 0.5 * (2.0 * c).atan2(a - b);
        let (s, co) = theta0.sin_cos();

        let major = self.v0 * co + self.v1 * s;
        let minor = -self.v0 * s + self.v1 * co;

        Matrix2x3::from_rows(&[major.transpose(), minor.transpose()])
    }

    pub fn semi_major_axis_length(&self) -> f64 {
        self.principal_semi_axes().row(0).norm()
    }

    pub fn semi_minor_axis_length(&self) -> f64 {
        self.principal_semi_axes().row(1).norm()
    }
}
