//! JPL DE binary ephemeris reader.
//!
//! This module decodes the **legacy binary DE files** (DE405, DE406, DE421, DE430, DE440, …)
//! into per-body Chebyshev interpolants and exposes each body as a
//! [`Trajectory`](crate::trajectory::Trajectory).
//!
//! - [`ephemeris_header`]: header decoding and structural validation (coverage, constants,
//!   IPT rows, record size).
//! - [`ephemeris_ids`]: the [`JplObjectId`] enum mapping IPT rows to bodies.
//! - [`ephemeris_records`]: Chebyshev sub-interval records and their evaluation.
//!
//! # File layout
//!
//! ```text
//! +---------------------------------------------------------------------+
//! | HEADER RECORD (recsize bytes)                                       |
//! |   titles (252 bytes) | constant names (2400 bytes)                  |
//! |   START_JD, END_JD, RECORD_SPAN (f64 × 3) | NCON (i32)              |
//! |   AU (f64) | EMRAT (f64) | IPT[0..12] (u32 × 36) | DENUM (u32)      |
//! |   LPT (u32 × 3) | [extra names, IPT[13], IPT[14] when NCON > 400]   |
//! +---------------------------------------------------------------------+
//! | CONSTANTS RECORD (recsize bytes, values of the named constants)     |
//! +---------------------------------------------------------------------+
//! | DATA RECORD #k: T_START, T_END (f64), then for every series b:      |
//! |   at word IPT[b][0]: for sub in 0..IPT[b][2]:                       |
//! |                        for comp in 0..dim(b):                       |
//! |                          IPT[b][1] Chebyshev coefficients (f64)     |
//! +---------------------------------------------------------------------+
//! ```
//!
//! All integers and floats are little-endian. The whole file is read in one call and validated
//! before any trajectory is handed out: a structurally inconsistent file is reported as
//! [`OrreryError::DatasetCorrupt`], never as a panic.
use std::sync::Arc;

use camino::Utf8Path;
use log::info;
use nom::{multi::count, number::complete::le_f64};

use crate::{
    constants::JulianDate,
    orrery_errors::OrreryError,
    state_vector::StateVector,
    time::jd_to_tdb_seconds,
    trajectory::ephemeris::EphemerisTrajectory,
};

use ephemeris_header::{EphemerisHeader, N_POSITION_SERIES};
use ephemeris_ids::JplObjectId;
use ephemeris_records::ChebyshevRecord;

/// Header decoding and validation.
pub mod ephemeris_header;
/// Body identifiers.
pub mod ephemeris_ids;
/// Chebyshev records.
pub mod ephemeris_records;

#[cfg(test)]
pub(crate) mod synthetic;

/// All sub-interval records of one body, ordered in time.
#[derive(Debug, Clone)]
struct BodySeries {
    n_subs: usize,
    records: Vec<ChebyshevRecord>,
}

/// Decoded dataset shared by the store and every trajectory view.
#[derive(Debug)]
pub struct EphemerisData {
    header: EphemerisHeader,
    bodies: Vec<BodySeries>,
}

impl EphemerisData {
    fn decode(bytes: &[u8]) -> Result<Self, OrreryError> {
        let header = EphemerisHeader::parse(bytes)?;
        let recsize = header.recsize;

        let data = recsize.checked_mul(2).and_then(|skip| bytes.get(skip..)).ok_or_else(|| {
            OrreryError::DatasetCorrupt(format!(
                "file is {} bytes, too short for the two {recsize}-byte header records",
                bytes.len()
            ))
        })?;
        if data.len() % recsize != 0 {
            return Err(OrreryError::DatasetCorrupt(format!(
                "data section of {} bytes is not a whole number of {recsize}-byte records",
                data.len()
            )));
        }

        let n_available = data.len() / recsize;
        let n_records = header.expected_records();
        if n_records == 0 {
            return Err(OrreryError::DatasetCorrupt(format!(
                "coverage [{}, {}] is shorter than one {}-day record",
                header.start_jd, header.end_jd, header.record_span
            )));
        }
        if n_available < n_records {
            return Err(OrreryError::DatasetCorrupt(format!(
                "coverage needs {n_records} records but the file holds {n_available}"
            )));
        }

        let mut bodies: Vec<BodySeries> = header.ipt[..N_POSITION_SERIES]
            .iter()
            .map(|row| BodySeries {
                n_subs: row[2] as usize,
                records: Vec::with_capacity(n_records * row[2] as usize),
            })
            .collect();

        for (index, chunk) in data.chunks_exact(recsize).take(n_records).enumerate() {
            let (_, block) = count(le_f64::<_, nom::error::Error<_>>, recsize / 8)(chunk)
                .map_err(|_| OrreryError::DatasetCorrupt(format!("unable to decode record {index}")))?;

            let expected_start = header.start_jd + index as f64 * header.record_span;
            let expected_end = expected_start + header.record_span;
            if (block[0] - expected_start).abs() > 1e-6 || (block[1] - expected_end).abs() > 1e-6
            {
                return Err(OrreryError::DatasetCorrupt(format!(
                    "record {index} covers [{}, {}] instead of [{expected_start}, {expected_end}]",
                    block[0], block[1]
                )));
            }

            for (body, series) in bodies.iter_mut().enumerate() {
                let [offset, n_coeffs, n_subs] = header.ipt[body].map(|v| v as usize);
                for sub in 0..n_subs {
                    let record = ChebyshevRecord::from_block(&block, offset, sub, n_subs, n_coeffs)
                        .ok_or_else(|| {
                            OrreryError::DatasetCorrupt(format!(
                                "body {body} overruns record {index}"
                            ))
                        })?;
                    series.records.push(record);
                }
            }
        }

        Ok(EphemerisData { header, bodies })
    }

    /// Interpolate the state of a body at a Julian date.
    ///
    /// The record is located from the coverage grid, then the sub-interval inside it; the last
    /// instant of the coverage belongs to the last record.
    pub fn state_at(&self, body: JplObjectId, jd: JulianDate) -> Result<StateVector, OrreryError> {
        let header = &self.header;
        if !(jd >= header.start_jd && jd <= header.end_jd) {
            return Err(OrreryError::EphemerisOutOfRange {
                jd,
                start: header.start_jd,
                end: header.end_jd,
            });
        }

        let series = &self.bodies[body as usize];
        let n_records = series.records.len() / series.n_subs;
        let elapsed = jd - header.start_jd;
        let record_index = ((elapsed / header.record_span).floor() as usize).min(n_records - 1);

        let record_start = header.start_jd + record_index as f64 * header.record_span;
        let sub_span = header.record_span / series.n_subs as f64;
        let sub_index = (((jd - record_start) / sub_span).floor() as usize).min(series.n_subs - 1);

        Ok(series.records[record_index * series.n_subs + sub_index].interpolate(jd))
    }
}

/// A loaded planetary ephemeris.
///
/// The decoded data lives behind an [`Arc`]: cloning the store or handing out trajectories never
/// copies the coefficient tables, and every trajectory keeps the data alive as long as it is used.
#[derive(Debug, Clone)]
pub struct JplEphemeris {
    data: Arc<EphemerisData>,
}

impl JplEphemeris {
    /// Read and decode a DE binary file.
    ///
    /// Arguments
    /// ---------
    /// * `path`: location of the dataset on disk
    ///
    /// Return
    /// -------
    /// * the store, [`OrreryError::DatasetUnreadable`] if the file cannot be read, or
    ///   [`OrreryError::DatasetCorrupt`] if its declared structure is inconsistent
    pub fn load(path: &Utf8Path) -> Result<Self, OrreryError> {
        let bytes = std::fs::read(path).map_err(|source| OrreryError::DatasetUnreadable {
            path: path.to_string(),
            source,
        })?;
        let ephemeris = Self::from_bytes(&bytes)?;
        info!(
            "Loaded DE{} ephemeris from {path}, coverage JD {} to {}",
            ephemeris.de_number(),
            ephemeris.data.header.start_jd,
            ephemeris.data.header.end_jd
        );
        Ok(ephemeris)
    }

    /// Decode a dataset already in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, OrreryError> {
        Ok(JplEphemeris {
            data: Arc::new(EphemerisData::decode(bytes)?),
        })
    }

    /// Trajectory view of one body, sharing this store's data.
    pub fn trajectory(&self, id: JplObjectId) -> EphemerisTrajectory {
        EphemerisTrajectory::new(Arc::clone(&self.data), id)
    }

    /// Ratio of the Earth's mass to the Moon's mass.
    pub fn earth_moon_mass_ratio(&self) -> f64 {
        self.data.header.earth_moon_mass_ratio
    }

    /// Astronomical unit in km, as declared by the dataset.
    pub fn au_km(&self) -> f64 {
        self.data.header.au
    }

    pub fn de_number(&self) -> u32 {
        self.data.header.de_number
    }

    /// Coverage of the dataset as Julian dates (TDB).
    pub fn coverage(&self) -> (JulianDate, JulianDate) {
        (self.data.header.start_jd, self.data.header.end_jd)
    }

    /// Coverage of the dataset on the simulation clock.
    pub fn valid_tdb_range(&self) -> (f64, f64) {
        let (start, end) = self.coverage();
        (jd_to_tdb_seconds(start), jd_to_tdb_seconds(end))
    }
}
