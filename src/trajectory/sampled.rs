//! # Sampled trajectories
//!
//! Positions tabulated at increasing times and interpolated with cubic Hermite splines. The
//! tangent at each sample is the centered finite difference of its neighbours (one-sided at the
//! ends), so the curve is C¹ and reproduces linear motion exactly.
//!
//! ## Text format
//!
//! One sample per line, whitespace separated:
//!
//! ```text
//! # JD (TDB)        x (km)        y (km)       z (km)
//! 2451545.0     1.0e8         2.0e7        -3.5e6
//! 2451546.0     1.01e8        2.1e7        -3.4e6
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Outside the tabulated span the position
//! is clamped to the first or last sample.
use nalgebra::Vector3;

use crate::{
    constants::TdbSeconds, orrery_errors::OrreryError, state_vector::StateVector,
    time::jd_to_tdb_seconds,
};

use super::Trajectory;

#[derive(Debug, Clone, PartialEq)]
pub struct SampledTrajectory {
    times: Vec<TdbSeconds>,
    positions: Vec<Vector3<f64>>,
    tangents: Vec<Vector3<f64>>,
    period: f64,
}

fn parse_error(line: usize, message: impl Into<String>) -> OrreryError {
    OrreryError::ParseError {
        line,
        message: message.into(),
    }
}

fn finite_difference(
    times: &[f64],
    positions: &[Vector3<f64>],
    before: usize,
    after: usize,
) -> Vector3<f64> {
    (positions[after] - positions[before]) / (times[after] - times[before])
}

impl SampledTrajectory {
    /// Build a trajectory from samples sorted by strictly increasing time.
    ///
    /// Return
    /// ------
    /// * `None` if there is no sample or the times are not strictly increasing
    pub fn new(samples: Vec<(TdbSeconds, Vector3<f64>)>, period: f64) -> Option<Self> {
        if samples.is_empty() || samples.windows(2).any(|w| !(w[0].0 < w[1].0)) {
            return None;
        }
        let (times, positions): (Vec<_>, Vec<_>) = samples.into_iter().unzip();

        let n = times.len();
        let tangents = (0..n)
            .map(|i| {
                if n == 1 {
                    Vector3::zeros()
                } else {
                    finite_difference(&times, &positions, i.saturating_sub(1), (i + 1).min(n - 1))
                }
            })
            .collect();

        Some(SampledTrajectory {
            times,
            positions,
            tangents,
            period,
        })
    }

    /// Parse the `JD x y z` text format.
    ///
    /// Arguments
    /// ---------
    /// * `text`: whole content of the sample file
    /// * `period`: period hint in seconds for the resulting trajectory
    ///
    /// Return
    /// ------
    /// * the trajectory, or [`OrreryError::ParseError`] naming the first offending line
    pub fn from_xyz_str(text: &str, period: f64) -> Result<Self, OrreryError> {
        let mut samples = Vec::new();
        let mut last_jd = f64::NEG_INFINITY;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.trim();
            if content.is_empty() || content.starts_with('#') {
                continue;
            }

            let values = content
                .split_whitespace()
                .map(str::parse::<f64>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| parse_error(line, format!("invalid number: {e}")))?;
            let [jd, x, y, z] = values[..] else {
                return Err(parse_error(
                    line,
                    format!("expected 4 values (JD x y z), found {}", values.len()),
                ));
            };
            if !(jd > last_jd) {
                return Err(parse_error(line, format!("time {jd} does not increase")));
            }
            last_jd = jd;
            samples.push((jd_to_tdb_seconds(jd), Vector3::new(x, y, z)));
        }

        if samples.is_empty() {
            return Err(parse_error(0, "no samples"));
        }
        // times are strictly increasing at this point
        SampledTrajectory::new(samples, period)
            .ok_or_else(|| parse_error(0, "sample times collapse on the simulation clock"))
    }

    pub fn span(&self) -> (TdbSeconds, TdbSeconds) {
        (self.times[0], self.times[self.times.len() - 1])
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

impl Trajectory for SampledTrajectory {
    fn state(&self, t: TdbSeconds) -> Result<StateVector, OrreryError> {
        if !t.is_finite() {
            return Err(OrreryError::InvalidEpoch(format!("{t} s past J2000")));
        }
        let n = self.times.len();
        let (first, last) = self.span();
        if n == 1 || t <= first {
            return Ok(StateVector::new(self.positions[0], Vector3::zeros()));
        }
        if t >= last {
            return Ok(StateVector::new(self.positions[n - 1], Vector3::zeros()));
        }

        // first sample strictly after t, in 1..n
        let hi = self.times.partition_point(|&ti| ti <= t);
        let lo = hi - 1;
        let h = self.times[hi] - self.times[lo];
        let s = (t - self.times[lo]) / h;
        let (p0, p1) = (self.positions[lo], self.positions[hi]);
        let (m0, m1) = (self.tangents[lo] * h, self.tangents[hi] * h);

        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;
        let position = p0 * h00 + m0 * h10 + p1 * h01 + m1 * h11;

        let d00 = 6.0 * s2 - 6.0 * s;
        let d10 = 3.0 * s2 - 4.0 * s + 1.0;
        let d01 = -6.0 * s2 + 6.0 * s;
        let d11 = 3.0 * s2 - 2.0 * s;
        let velocity = (p0 * d00 + m0 * d10 + p1 * d01 + m1 * d11) / h;

        Ok(StateVector::new(position, velocity))
    }

    fn period(&self) -> f64 {
        self.period
    }
}
