//! # Constants and type definitions for Orrery
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the `orrery` library.
//!
//! ## Overview
//!
//! - Astronomical constants (AU, J2000 epoch, obliquity of the ecliptic)
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, AU ↔ km)
//! - Core type aliases used across the crate
//!
//! The simulation clock is always expressed in **TDB seconds past J2000**; distances are in
//! **kilometers** and velocities in **kilometers per second** unless a function says otherwise.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of seconds in an hour
pub const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Number of days in a Julian year
pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// Julian date of the J2000.0 epoch (2000-01-01 12:00:00 TDB)
pub const J2000_JD: f64 = 2_451_545.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Obliquity of the ecliptic at J2000 (IAU 1976), in degrees
pub const J2000_OBLIQUITY_DEG: f64 = 23.439_281;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Julian Date (days, TDB)
pub type JulianDate = f64;
/// Simulation time: TDB seconds elapsed since J2000.0
pub type TdbSeconds = f64;
