//! # Trajectories
//!
//! A [`Trajectory`] maps simulation time (TDB seconds past J2000) to a [`StateVector`] relative
//! to the body's center, expressed in the trajectory frame chosen by the catalog entity that owns
//! it. Every variant is immutable once built and shared as [`SharedTrajectory`], so one
//! ephemeris-backed trajectory can serve several entities and composites without copies.
//!
//! ## Variants
//!
//! - [`ephemeris::EphemerisTrajectory`] – one body of a decoded DE dataset.
//! - [`linear_combination::LinearCombinationTrajectory`] – weighted sum of other trajectories,
//!   carrying an explicitly assigned period.
//! - [`fixed_point::FixedPointTrajectory`] – constant position.
//! - [`keplerian::KeplerianTrajectory`] – two-body conic propagated from mean elements.
//! - [`sampled::SampledTrajectory`] – positions interpolated from a time-tagged table.
//! - [`tle::TleTrajectory`] – SGP4 propagation of a two-line element set.
//!
//! [`builtin`] derives the named trajectories (Sun-relative planets, Earth from the
//! Earth–Moon barycenter) that the catalog resolver exposes as builtins.
use std::{fmt::Debug, sync::Arc};

use nalgebra::Vector3;

use crate::{constants::TdbSeconds, orrery_errors::OrreryError, state_vector::StateVector};

pub mod builtin;
pub mod ephemeris;
pub mod fixed_point;
pub mod keplerian;
pub mod linear_combination;
pub mod sampled;
pub mod tle;

/// Time-parametrized motion of a body relative to its center.
pub trait Trajectory: Debug + Send + Sync {
    /// State (km, km/s) at `t` TDB seconds past J2000.
    fn state(&self, t: TdbSeconds) -> Result<StateVector, OrreryError>;

    /// Position (km) at `t`.
    fn position(&self, t: TdbSeconds) -> Result<Vector3<f64>, OrreryError> {
        Ok(self.state(t)?.position)
    }

    /// Approximate orbital period in seconds; `0.0` for aperiodic motion.
    ///
    /// The value is a hint for plotting and level-of-detail decisions, not a physical invariant.
    fn period(&self) -> f64;

    fn is_periodic(&self) -> bool {
        self.period() > 0.0
    }
}

pub type SharedTrajectory = Arc<dyn Trajectory>;
