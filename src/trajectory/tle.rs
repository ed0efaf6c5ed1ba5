//! # Satellites from two-line element sets
//!
//! A TLE set is plain text holding one record per satellite:
//!
//! ```text
//! ISS (ZARYA)
//! 1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
//! 2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008
//! ```
//!
//! The name line may carry the `0 ` prefix of three-line sets. Positions come from SGP4 and
//! are geocentric, in km, with the TEME axes taken as EquatorJ2000.
use std::fmt;

use nalgebra::Vector3;
use sgp4::{Constants, Elements, MinutesSinceEpoch};

use crate::{
    constants::TdbSeconds, orrery_errors::OrreryError, state_vector::StateVector,
    time::tle_epoch_to_tdb_seconds,
};

use super::Trajectory;

/// One `(name, line 1, line 2)` record and the line its name sits on.
struct TleRecord<'a> {
    line: usize,
    name: &'a str,
    line1: &'a str,
    line2: &'a str,
}

fn records(text: &str) -> Vec<TleRecord<'_>> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim_end()))
        .filter(|(_, l)| !l.trim().is_empty())
        .collect();

    let mut out = Vec::new();
    let mut i = 0;
    while i + 2 < lines.len() {
        let (line, name) = lines[i];
        let (_, line1) = lines[i + 1];
        let (_, line2) = lines[i + 2];
        if line1.starts_with("1 ") && line2.starts_with("2 ") {
            let name = name.strip_prefix("0 ").unwrap_or(name).trim();
            out.push(TleRecord {
                line,
                name,
                line1,
                line2,
            });
            i += 3;
        } else {
            i += 1;
        }
    }
    out
}

pub struct TleTrajectory {
    satellite: String,
    epoch: TdbSeconds,
    period: f64,
    constants: Constants,
}

impl fmt::Debug for TleTrajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TleTrajectory")
            .field("satellite", &self.satellite)
            .field("epoch", &self.epoch)
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

impl TleTrajectory {
    /// Build the propagator of one element set.
    ///
    /// Arguments
    /// ---------
    /// * `satellite`: name reported in errors
    /// * `line1`, `line2`: the two element lines, checksums included
    ///
    /// Return
    /// ------
    /// * the trajectory, or [`OrreryError::ParseError`] (line 0) when the lines are not a valid
    ///   element set
    pub fn from_lines(satellite: &str, line1: &str, line2: &str) -> Result<Self, OrreryError> {
        let invalid = |message: String| OrreryError::ParseError {
            line: 0,
            message: format!("element set of '{satellite}': {message}"),
        };

        let elements = Elements::from_tle(
            Some(satellite.to_string()),
            line1.as_bytes(),
            line2.as_bytes(),
        )
        .map_err(|e| invalid(e.to_string()))?;
        let constants = Constants::from_elements(&elements).map_err(|e| invalid(e.to_string()))?;

        // columns 19-32 of line 1: YYDDD.DDDDDDDD
        let field = line1
            .get(18..32)
            .ok_or_else(|| invalid("line 1 is too short for an epoch".into()))?;
        let (year, day) = field.trim().split_at(2.min(field.trim().len()));
        let year: i32 = year
            .parse()
            .map_err(|_| invalid(format!("bad epoch year '{year}'")))?;
        let day: f64 = day
            .parse()
            .map_err(|_| invalid(format!("bad epoch day '{day}'")))?;

        let period = if elements.mean_motion > 0.0 {
            86_400.0 / elements.mean_motion
        } else {
            0.0
        };

        Ok(TleTrajectory {
            satellite: satellite.to_string(),
            epoch: tle_epoch_to_tdb_seconds(year, day),
            period,
            constants,
        })
    }

    /// Pick `satellite` out of a TLE set.
    ///
    /// Names are compared after trimming; the first matching record wins.
    pub fn from_set(text: &str, satellite: &str) -> Result<Self, OrreryError> {
        let record = records(text)
            .into_iter()
            .find(|r| r.name == satellite.trim())
            .ok_or_else(|| OrreryError::ParseError {
                line: 0,
                message: format!("no element set for '{satellite}'"),
            })?;
        Self::from_lines(record.name, record.line1, record.line2).map_err(|e| match e {
            OrreryError::ParseError { message, .. } => OrreryError::ParseError {
                line: record.line,
                message,
            },
            other => other,
        })
    }

    pub fn satellite(&self) -> &str {
        &self.satellite
    }

    /// Epoch of the element set, TDB seconds past J2000.
    pub fn epoch(&self) -> TdbSeconds {
        self.epoch
    }
}

impl Trajectory for TleTrajectory {
    fn state(&self, t: TdbSeconds) -> Result<StateVector, OrreryError> {
        let minutes = (t - self.epoch) / 60.0;
        let prediction = self
            .constants
            .propagate(MinutesSinceEpoch(minutes))
            .map_err(|e| OrreryError::PropagationFailed {
                satellite: self.satellite.clone(),
                message: e.to_string(),
            })?;
        Ok(StateVector::new(
            Vector3::from(prediction.position),
            Vector3::from(prediction.velocity),
        ))
    }

    fn period(&self) -> f64 {
        self.period
    }
}

#[cfg(test)]
mod test_tle {
    use super::*;
    use approx::assert_relative_eq;

    const STATIONS: &str = "\
ISS (ZARYA)
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008

0 BROKEN SAT
1 00000U 00000A   20194.88612269  not an element set at all
2 00000
";

    #[test]
    fn test_low_orbit_from_set() {
        let iss = TleTrajectory::from_set(STATIONS, "ISS (ZARYA)").unwrap();
        assert_eq!(iss.satellite(), "ISS (ZARYA)");
        assert_relative_eq!(iss.period(), 86_400.0 / 15.49507896, max_relative = 1e-6);
        assert_relative_eq!(
            iss.epoch(),
            tle_epoch_to_tdb_seconds(20, 194.88612269),
            epsilon = 1e-6
        );

        for dt in [0.0, 600.0, -3_600.0, 86_400.0] {
            let state = iss.state(iss.epoch() + dt).unwrap();
            let r = state.position.norm();
            assert!(r > 6_600.0 && r < 6_900.0, "r = {r} km at {dt} s");
            let v = state.velocity.unwrap().norm();
            assert!(v > 7.4 && v < 7.9, "v = {v} km/s at {dt} s");
        }
    }

    #[test]
    fn test_missing_or_broken_record() {
        let err = TleTrajectory::from_set(STATIONS, "HUBBLE").unwrap_err();
        assert_eq!(
            err,
            OrreryError::ParseError {
                line: 0,
                message: "no element set for 'HUBBLE'".into()
            }
        );
        assert!(TleTrajectory::from_set(STATIONS, "BROKEN SAT").is_err());
    }

    #[test]
    fn test_records_skip_stray_lines() {
        let names: Vec<&str> = records(STATIONS).iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["ISS (ZARYA)", "BROKEN SAT"]);
        assert_eq!(records(STATIONS)[1].line, 5);
    }
}
