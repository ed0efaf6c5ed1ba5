//! Dimensioned values in catalog documents.
//!
//! A quantity is either a bare number, read in the field's default unit, or a string
//! `"<number> <unit>"`. Values are converted to the crate's internal units: km for lengths,
//! seconds for durations, radians for angles.
//!
//! ```text
//! "semiMajorAxis": 1.523          → default unit (e.g. au) → 2.278e8 km
//! "period": "23.9345 h"           → 86 164.2 s
//! "inclination": "0.41 rad"       → 0.41 rad
//! ```
use std::sync::LazyLock;

use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use regex::Regex;
use serde_json::Value;

use crate::{
    constants::{TdbSeconds, AU, DAYS_PER_JULIAN_YEAR, RADEG, SECONDS_PER_DAY, SECONDS_PER_HOUR},
    orrery_errors::OrreryError,
    time::{jd_to_tdb_seconds, parse_date_to_tdb_seconds},
};

static QUANTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*([A-Za-z]*)\s*$")
        .expect("quantity pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Length,
    Time,
    Angle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Meter,
    Kilometer,
    AstronomicalUnit,
    Second,
    Minute,
    Hour,
    Day,
    Year,
    Degree,
    Radian,
}

impl Unit {
    pub fn dimension(self) -> Dimension {
        match self {
            Unit::Meter | Unit::Kilometer | Unit::AstronomicalUnit => Dimension::Length,
            Unit::Second | Unit::Minute | Unit::Hour | Unit::Day | Unit::Year => Dimension::Time,
            Unit::Degree | Unit::Radian => Dimension::Angle,
        }
    }

    /// Factor to km, s or rad.
    pub fn factor(self) -> f64 {
        match self {
            Unit::Meter => 1.0e-3,
            Unit::Kilometer => 1.0,
            Unit::AstronomicalUnit => AU,
            Unit::Second => 1.0,
            Unit::Minute => 60.0,
            Unit::Hour => SECONDS_PER_HOUR,
            Unit::Day => SECONDS_PER_DAY,
            Unit::Year => DAYS_PER_JULIAN_YEAR * SECONDS_PER_DAY,
            Unit::Degree => RADEG,
            Unit::Radian => 1.0,
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Unit> {
        let unit = match symbol {
            "m" => Unit::Meter,
            "km" => Unit::Kilometer,
            "au" | "AU" => Unit::AstronomicalUnit,
            "s" => Unit::Second,
            "min" => Unit::Minute,
            "h" => Unit::Hour,
            "d" => Unit::Day,
            "y" | "a" => Unit::Year,
            "deg" => Unit::Degree,
            "rad" => Unit::Radian,
            _ => return None,
        };
        Some(unit)
    }
}

/// Convert a quantity to internal units.
///
/// Arguments
/// ---------
/// * `value`: a JSON number or a `"<number> <unit>"` string
/// * `default_unit`: unit of bare numbers; it also fixes the expected dimension
///
/// Return
/// ------
/// * the value in km, s or rad, or [`OrreryError::InvalidQuantity`]
pub fn parse_quantity(value: &Value, default_unit: Unit) -> Result<f64, OrreryError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(|v| v * default_unit.factor())
            .ok_or_else(|| OrreryError::InvalidQuantity(n.to_string())),
        Value::String(s) => parse_quantity_str(s, default_unit),
        other => Err(OrreryError::InvalidQuantity(other.to_string())),
    }
}

pub fn parse_quantity_str(text: &str, default_unit: Unit) -> Result<f64, OrreryError> {
    let invalid = || OrreryError::InvalidQuantity(text.to_string());

    let caps = QUANTITY.captures(text).ok_or_else(invalid)?;
    let number: f64 = caps[1].parse().map_err(|_| invalid())?;
    let unit = match &caps[2] {
        "" => default_unit,
        symbol => Unit::from_symbol(symbol).ok_or_else(invalid)?,
    };
    if unit.dimension() != default_unit.dimension() {
        return Err(OrreryError::InvalidQuantity(format!(
            "{text}: expected a {:?}",
            default_unit.dimension()
        )));
    }
    Ok(number * unit.factor())
}

/// Convert an epoch to the simulation clock: a number is a TDB Julian date, a string any date
/// hifitime understands.
pub fn parse_epoch(value: &Value) -> Result<TdbSeconds, OrreryError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(jd_to_tdb_seconds)
            .ok_or_else(|| OrreryError::InvalidEpoch(n.to_string())),
        Value::String(s) => parse_date_to_tdb_seconds(s),
        other => Err(OrreryError::InvalidEpoch(other.to_string())),
    }
}

/// A `[x, y, z]` array of quantities.
pub fn parse_vector3(value: &Value, default_unit: Unit) -> Result<Vector3<f64>, OrreryError> {
    let invalid = || OrreryError::InvalidQuantity(format!("{value} is not a 3-vector"));
    let items = value.as_array().ok_or_else(invalid)?;
    let [x, y, z] = items.as_slice() else {
        return Err(invalid());
    };
    Ok(Vector3::new(
        parse_quantity(x, default_unit)?,
        parse_quantity(y, default_unit)?,
        parse_quantity(z, default_unit)?,
    ))
}

/// A `[w, x, y, z]` array, normalized.
pub fn parse_quaternion(value: &Value) -> Result<UnitQuaternion<f64>, OrreryError> {
    let invalid = || OrreryError::InvalidQuantity(format!("{value} is not a quaternion"));
    let items: Vec<f64> = value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|v| v.as_f64().ok_or_else(invalid))
        .collect::<Result<_, _>>()?;
    let [w, x, y, z] = items[..] else {
        return Err(invalid());
    };
    let q = Quaternion::new(w, x, y, z);
    if !(q.norm() > 0.0) {
        return Err(invalid());
    }
    Ok(UnitQuaternion::from_quaternion(q))
}
