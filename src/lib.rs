//! # orrery
//!
//! Time-varying positions and orientations of solar-system bodies, resolved from declarative
//! catalogs.
//!
//! - [`jpl_ephem`] decodes JPL DE binary ephemerides into Chebyshev interpolants.
//! - [`trajectory`] and [`rotation`] provide the motion and orientation capabilities, including
//!   the ephemeris-derived builtins.
//! - [`catalog`] parses current (JSON) and legacy (SSC) catalogs and resolves them into the
//!   [`universe`] catalog.
//! - [`geometry`] holds the closed-form ellipse used for orbit plots.
//! - [`orrery`] is the façade a host application drives.
//!
//! Simulation time is always TDB seconds past J2000; lengths are km.
pub mod catalog;
pub mod constants;
pub mod frame;
pub mod geometry;
pub mod jpl_ephem;
pub mod kepler;
pub mod orrery;
pub mod orrery_errors;
pub mod rotation;
pub mod state_vector;
pub mod time;
pub mod trajectory;
pub mod universe;
