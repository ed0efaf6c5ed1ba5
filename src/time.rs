//! Time conversions for the simulation clock.
//!
//! The core works with **TDB seconds past J2000** everywhere. Ephemeris files are indexed by
//! Julian dates, and catalogs may express epochs either as Julian dates or as calendar strings;
//! this module bridges those representations, delegating calendar handling to
//! [hifitime](https://docs.rs/hifitime).
use hifitime::{Epoch, Unit};
use std::str::FromStr;

use crate::{
    constants::{JulianDate, TdbSeconds, J2000_JD, SECONDS_PER_DAY},
    orrery_errors::OrreryError,
};

/// Convert TDB seconds past J2000 to a TDB Julian date.
pub fn tdb_seconds_to_jd(tdb_sec: TdbSeconds) -> JulianDate {
    J2000_JD + tdb_sec / SECONDS_PER_DAY
}

/// Convert a TDB Julian date to TDB seconds past J2000.
pub fn jd_to_tdb_seconds(jd: JulianDate) -> TdbSeconds {
    (jd - J2000_JD) * SECONDS_PER_DAY
}

/// Build a hifitime [`Epoch`] from the simulation clock.
pub fn tdb_seconds_to_epoch(tdb_sec: TdbSeconds) -> Epoch {
    Epoch::from_tdb_seconds(tdb_sec)
}

/// Express a hifitime [`Epoch`] on the simulation clock.
pub fn epoch_to_tdb_seconds(epoch: &Epoch) -> TdbSeconds {
    epoch.to_tdb_seconds()
}

/// Parse a calendar date (e.g. `2000-01-01T12:00:00 TDB`) into TDB seconds past J2000.
///
/// Arguments
/// ---------
/// * `date`: any date string understood by hifitime; the time scale defaults to UTC when the
///   string does not name one.
///
/// Return
/// ------
/// * the date on the simulation clock, or [`OrreryError::InvalidEpoch`]
pub fn parse_date_to_tdb_seconds(date: &str) -> Result<TdbSeconds, OrreryError> {
    let epoch = Epoch::from_str(date.trim())
        .map_err(|e| OrreryError::InvalidEpoch(format!("{date}: {e}")))?;
    Ok(epoch_to_tdb_seconds(&epoch))
}

/// Epoch of a two-line element set on the simulation clock.
///
/// TLE epochs are a two-digit UTC year (57–99 for 1957–1999, 00–56 for 2000–2056) and a
/// fractional day of year, day 1.0 being January 1st at midnight.
pub fn tle_epoch_to_tdb_seconds(two_digit_year: i32, day_of_year: f64) -> TdbSeconds {
    let year = if two_digit_year < 57 {
        2000 + two_digit_year
    } else {
        1900 + two_digit_year
    };
    let epoch = Epoch::from_gregorian_utc_at_midnight(year, 1, 1) + Unit::Day * (day_of_year - 1.0);
    epoch_to_tdb_seconds(&epoch)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_jd_round_trip_anchor() {
        assert_eq!(tdb_seconds_to_jd(0.0), J2000_JD);
        assert_eq!(jd_to_tdb_seconds(J2000_JD + 1.0), SECONDS_PER_DAY);
    }

    #[test]
    fn test_parse_j2000_date() {
        let t = parse_date_to_tdb_seconds("2000-01-01T12:00:00 TDB").unwrap();
        assert_relative_eq!(t, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_parse_invalid_date() {
        let err = parse_date_to_tdb_seconds("not a date").unwrap_err();
        assert!(matches!(err, OrreryError::InvalidEpoch(_)));
    }

    #[test]
    fn test_tle_epoch() {
        // noon UTC on 2000-01-01 is 32 leap seconds plus 32.184 s before TDB noon
        assert_relative_eq!(tle_epoch_to_tdb_seconds(0, 1.5), 64.184, epsilon = 1e-2);
        assert!(tle_epoch_to_tdb_seconds(98, 1.0) < 0.0);
    }

    #[test]
    fn test_epoch_bridge() {
        let epoch = tdb_seconds_to_epoch(86_400.0);
        assert_relative_eq!(epoch_to_tdb_seconds(&epoch), 86_400.0, epsilon = 1e-6);
    }
}
