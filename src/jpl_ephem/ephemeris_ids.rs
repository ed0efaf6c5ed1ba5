use crate::constants::{DAYS_PER_JULIAN_YEAR, SECONDS_PER_DAY};

/// Identifier for the bodies tabulated in a JPL DE binary ephemeris.
///
/// DE files index their coefficient blocks by the row number of the IPT table (`0..=10` for
/// positions). This enum provides a typed mapping between those raw integers and their physical
/// meaning.
///
/// Notes
/// -----
/// * `Moon` is **geocentric** in DE files; every other body is relative to the solar-system
///   barycenter.
/// * `EarthMoonBarycenter` is row 2: DE files do not tabulate the Earth itself.
///
/// Conversions
/// -----------
/// * Use [`TryFrom<u8>`] to convert from a raw IPT row to a `JplObjectId`.
/// * Use [`From<JplObjectId>`] to recover the row index.
///
/// ```rust
/// use orrery::jpl_ephem::ephemeris_ids::JplObjectId;
///
/// let id = JplObjectId::try_from(4).unwrap();
/// assert_eq!(id, JplObjectId::Jupiter);
///
/// let raw: u8 = JplObjectId::Mars.into();
/// assert_eq!(raw, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JplObjectId {
    Mercury = 0,
    Venus = 1,
    EarthMoonBarycenter = 2,
    Mars = 3,
    Jupiter = 4,
    Saturn = 5,
    Uranus = 6,
    Neptune = 7,
    Pluto = 8,
    Moon = 9,
    Sun = 10,
}

impl JplObjectId {
    /// All bodies with a position series, in IPT order.
    pub const ALL: [JplObjectId; 11] = [
        JplObjectId::Mercury,
        JplObjectId::Venus,
        JplObjectId::EarthMoonBarycenter,
        JplObjectId::Mars,
        JplObjectId::Jupiter,
        JplObjectId::Saturn,
        JplObjectId::Uranus,
        JplObjectId::Neptune,
        JplObjectId::Pluto,
        JplObjectId::Moon,
        JplObjectId::Sun,
    ];

    /// Nominal sidereal period in seconds, used to size orbit plots.
    ///
    /// The Sun wanders around the barycenter without a meaningful period and reports `0.0`.
    pub fn nominal_period(&self) -> f64 {
        let days = match self {
            JplObjectId::Mercury => 87.969_3,
            JplObjectId::Venus => 224.701,
            JplObjectId::EarthMoonBarycenter => 365.256_363,
            JplObjectId::Mars => 686.980,
            JplObjectId::Jupiter => 11.862 * DAYS_PER_JULIAN_YEAR,
            JplObjectId::Saturn => 29.457 * DAYS_PER_JULIAN_YEAR,
            JplObjectId::Uranus => 84.011 * DAYS_PER_JULIAN_YEAR,
            JplObjectId::Neptune => 164.79 * DAYS_PER_JULIAN_YEAR,
            JplObjectId::Pluto => 247.94 * DAYS_PER_JULIAN_YEAR,
            JplObjectId::Moon => 27.321_661,
            JplObjectId::Sun => 0.0,
        };
        days * SECONDS_PER_DAY
    }
}

impl TryFrom<u8> for JplObjectId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        JplObjectId::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| format!("Invalid JPL object ID: {value}"))
    }
}

impl From<JplObjectId> for u8 {
    fn from(id: JplObjectId) -> Self {
        id as u8
    }
}

#[cfg(test)]
mod test_ephemeris_ids {
    use super::*;

    #[test]
    fn test_row_mapping() {
        for (row, id) in JplObjectId::ALL.iter().enumerate() {
            assert_eq!(u8::from(*id) as usize, row);
            assert_eq!(JplObjectId::try_from(row as u8).unwrap(), *id);
        }
        assert!(JplObjectId::try_from(11).is_err());
    }

    #[test]
    fn test_sun_is_aperiodic() {
        assert_eq!(JplObjectId::Sun.nominal_period(), 0.0);
        assert!(JplObjectId::Moon.nominal_period() > 27.0 * SECONDS_PER_DAY);
    }
}
