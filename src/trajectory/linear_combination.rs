//! Weighted sums of trajectories.
//!
//! A [`LinearCombinationTrajectory`] evaluates `Σ wᵢ · stateᵢ(t)`. It is the building block for
//! every derived body of the ephemeris: a heliocentric planet is `planet − Sun`, the Earth is
//! `EMB − m·Moon` with `m = 1 / (1 + EMRAT)`.
//!
//! The period of a sum has no physical meaning by itself, so it is never derived from the terms:
//! the constructor copies it from a designated source trajectory (or takes it explicitly) and the
//! value is a hint for orbit plotting.
use log::warn;

use crate::{constants::TdbSeconds, orrery_errors::OrreryError, state_vector::StateVector};

use super::{SharedTrajectory, Trajectory};

#[derive(Debug, Clone)]
pub struct LinearCombinationTrajectory {
    terms: Vec<(SharedTrajectory, f64)>,
    period: f64,
}

/// Warn when the term that dominates the sum is ambiguous: two periodic terms share the largest
/// weight magnitude but disagree on their period.
fn check_dominant_term(terms: &[(SharedTrajectory, f64)]) {
    let max_weight = terms
        .iter()
        .map(|(_, w)| w.abs())
        .fold(0.0_f64, f64::max);

    let mut dominant_periods = terms
        .iter()
        .filter(|(traj, w)| w.abs() == max_weight && traj.is_periodic())
        .map(|(traj, _)| traj.period());

    if let Some(first) = dominant_periods.next() {
        if dominant_periods.any(|p| p != first) {
            warn!(
                "Linear combination of {} terms has several dominant periodic terms with different periods",
                terms.len()
            );
        }
    }
}

impl LinearCombinationTrajectory {
    /// Combine weighted terms, taking the period from `period_source`.
    ///
    /// Arguments
    /// ---------
    /// * `terms`: ordered `(trajectory, weight)` pairs
    /// * `period_source`: trajectory whose period is copied; it is usually one of the terms
    pub fn combine(terms: Vec<(SharedTrajectory, f64)>, period_source: &dyn Trajectory) -> Self {
        Self::with_period(terms, period_source.period())
    }

    /// Combine weighted terms with an explicit period in seconds (`0.0` for aperiodic).
    pub fn with_period(terms: Vec<(SharedTrajectory, f64)>, period: f64) -> Self {
        check_dominant_term(&terms);
        LinearCombinationTrajectory { terms, period }
    }

    /// `wa·a + wb·b`, with the period of `a`.
    pub fn pair(a: SharedTrajectory, wa: f64, b: SharedTrajectory, wb: f64) -> Self {
        let period = a.period();
        Self::with_period(vec![(a, wa), (b, wb)], period)
    }

    pub fn set_period(&mut self, period: f64) {
        self.period = period;
    }

    pub fn terms(&self) -> &[(SharedTrajectory, f64)] {
        &self.terms
    }
}

impl Trajectory for LinearCombinationTrajectory {
    fn state(&self, t: TdbSeconds) -> Result<StateVector, OrreryError> {
        let mut iter = self.terms.iter();
        let Some((first, w0)) = iter.next() else {
            return Ok(StateVector::zero());
        };

        let mut acc = first.state(t)? * *w0;
        for (traj, weight) in iter {
            acc = acc + traj.state(t)? * *weight;
        }
        Ok(acc)
    }

    fn period(&self) -> f64 {
        self.period
    }
}
