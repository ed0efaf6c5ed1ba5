use nalgebra::Vector3;

use crate::{constants::SECONDS_PER_DAY, state_vector::StateVector};

/// One interpolation segment of a DE data record.
///
/// A `ChebyshevRecord` stores the Chebyshev coefficients needed to compute the position and
/// velocity of a body over a **single sub-interval** of a data record. The sub-interval is
/// `[start_jd, end_jd]` (Julian dates, TDB).
///
/// Fields
/// --------
/// * `start_jd`, `end_jd`: bounds of the sub-interval.
/// * `x`, `y`, `z`: Chebyshev coefficients of each Cartesian component (km).
///
/// Records are built by the dataset decoder from the IPT layout and are never mutated
/// afterwards.
#[derive(Debug, PartialEq, Clone)]
pub struct ChebyshevRecord {
    pub start_jd: f64,
    pub end_jd: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl ChebyshevRecord {
    /// Slice the coefficients of one sub-interval out of a decoded data record.
    ///
    /// Arguments
    /// -----------------
    /// * `block`: all the `f64` words of the data record, dates included.
    /// * `offset`: the 1-based IPT offset of the body inside the record.
    /// * `sub_index`: which sub-interval to extract.
    /// * `n_subs`: number of sub-intervals per record for this body.
    /// * `n_coeffs`: coefficients per component.
    ///
    /// Return
    /// ----------
    /// * `None` if the layout overruns the block; the decoder validates the IPT first so this
    ///   only happens on a corrupt file.
    pub fn from_block(
        block: &[f64],
        offset: usize,
        sub_index: usize,
        n_subs: usize,
        n_coeffs: usize,
    ) -> Option<Self> {
        let block_start = *block.first()?;
        let block_end = *block.get(1)?;
        let sub_span = (block_end - block_start) / n_subs as f64;

        let base = offset.checked_sub(1)? + sub_index * n_coeffs * 3;
        let coeffs = |component: usize| -> Option<Vec<f64>> {
            let start = base + component * n_coeffs;
            block.get(start..start + n_coeffs).map(<[f64]>::to_vec)
        };

        Some(ChebyshevRecord {
            start_jd: block_start + sub_index as f64 * sub_span,
            end_jd: block_start + (sub_index + 1) as f64 * sub_span,
            x: coeffs(0)?,
            y: coeffs(1)?,
            z: coeffs(2)?,
        })
    }

    /// Evaluate the record at a Julian date inside its sub-interval.
    ///
    /// The time is mapped to `tc ∈ [-1, 1]` and the Chebyshev series `T_n(tc)` and its derivative
    /// `T'_n(tc)` are built by recurrence:
    ///
    /// ```text
    /// T_0 = 1, T_1 = tc, T_n = 2·tc·T_{n-1} − T_{n-2}
    /// T'_0 = 0, T'_1 = 1, T'_n = 2·tc·T'_{n-1} + 2·T_{n-1} − T'_{n-2}
    /// ```
    ///
    /// Return
    /// ----------
    /// * position in km, velocity in km/s
    pub fn interpolate(&self, jd: f64) -> StateVector {
        let span = self.end_jd - self.start_jd;
        let tc = 2.0 * (jd - self.start_jd) / span - 1.0;
        let n_coeff = self.x.len();

        let mut tcheb = vec![0.0; n_coeff.max(2)];
        let mut tcheb_deriv = vec![0.0; n_coeff.max(2)];
        tcheb[0] = 1.0;
        tcheb[1] = tc;
        tcheb_deriv[1] = 1.0;

        let twot = tc + tc;
        for i in 2..n_coeff {
            tcheb[i] = twot * tcheb[i - 1] - tcheb[i - 2];
            tcheb_deriv[i] = twot * tcheb_deriv[i - 1] + 2.0 * tcheb[i - 1] - tcheb_deriv[i - 2];
        }

        let eval = |coeffs: &[f64], basis: &[f64]| -> f64 {
            coeffs.iter().zip(basis.iter()).map(|(c, b)| c * b).sum()
        };

        // d(tc)/dt in 1/s
        let vfac = 2.0 / (span * SECONDS_PER_DAY);

        StateVector::new(
            Vector3::new(
                eval(&self.x, &tcheb),
                eval(&self.y, &tcheb),
                eval(&self.z, &tcheb),
            ),
            Vector3::new(
                vfac * eval(&self.x, &tcheb_deriv),
                vfac * eval(&self.y, &tcheb_deriv),
                vfac * eval(&self.z, &tcheb_deriv),
            ),
        )
    }
}
