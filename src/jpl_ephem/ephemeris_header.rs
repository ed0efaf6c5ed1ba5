use nom::{
    bytes::complete::take,
    multi::count,
    number::complete::{le_f64, le_i32, le_u32},
    IResult,
};

use crate::orrery_errors::OrreryError;

/// Index pointer table: for each of the 15 series, `[offset, n_coeffs, n_subintervals]`.
///
/// * `offset`: 1-based position (in `f64` words) of the series inside a data record
/// * `n_coeffs`: Chebyshev coefficients per component
/// * `n_subintervals`: sub-intervals per data record
pub type IPT = [[u32; 3]; 15];

/// Number of series that carry body positions (Mercury … Sun).
pub const N_POSITION_SERIES: usize = 11;

/// Size of the fixed part of the header, up to and including the LPT row.
pub const HEADER_FIXED_SIZE: usize = 2856;

const TITLE_SIZE: usize = 14 * 3 * 6;
const OLD_MAX: usize = 400;

/// Decoded and validated header of a DE binary file.
#[derive(Debug, PartialEq, Clone)]
pub struct EphemerisHeader {
    pub title: String,
    pub de_number: u32,
    pub start_jd: f64,
    pub end_jd: f64,
    pub record_span: f64,
    pub ncon: i32,
    pub au: f64,
    pub earth_moon_mass_ratio: f64,
    pub ipt: IPT,
    pub recsize: usize,
}

/// Number of components of each IPT series.
fn dimension(index: usize) -> usize {
    match index {
        0..=10 => 3, // planets, Moon, Sun
        11 => 2,     // nutations
        12 => 3,     // lunar librations
        13 => 3,     // lunar mantle angular velocity
        14 => 1,     // TT-TDB
        _ => 0,
    }
}

/// Words taken by one IPT series in a data record, `None` on overflow.
fn series_words(index: usize, row: &[u32; 3]) -> Option<usize> {
    (row[1] as usize)
        .checked_mul(row[2] as usize)?
        .checked_mul(dimension(index))
}

/// Size of a record in bytes, recomputed from the IPT; `None` if it does not fit a `usize`.
fn compute_recsize(ipt: &IPT) -> Option<usize> {
    ipt.iter()
        .enumerate()
        .try_fold(2usize, |words, (i, row)| words.checked_add(series_words(i, row)?))?
        .checked_mul(8)
}

struct RawHeader {
    title: String,
    span: Vec<f64>,
    ncon: i32,
    au: f64,
    emrat: f64,
    ipt: IPT,
    de_number: u32,
}

fn parse_raw_header(input: &[u8]) -> IResult<&[u8], RawHeader> {
    let (input, titles) = take(TITLE_SIZE)(input)?;
    let (input, _cnam) = take(OLD_MAX * 6)(input)?;
    let (input, span) = count(le_f64, 3)(input)?;
    let (input, ncon) = le_i32(input)?;
    let (input, au) = le_f64(input)?;
    let (input, emrat) = le_f64(input)?;
    let (input, rows) = count(le_u32, 36)(input)?;
    let (input, de_number) = le_u32(input)?;
    let (input, lpt) = count(le_u32, 3)(input)?;

    let mut ipt: IPT = [[0; 3]; 15];
    for (i, val) in rows.into_iter().enumerate() {
        ipt[i / 3][i % 3] = val;
    }
    ipt[12] = [lpt[0], lpt[1], lpt[2]];

    let title = String::from_utf8_lossy(&titles[..84]).trim().to_string();

    Ok((
        input,
        RawHeader {
            title,
            span,
            ncon,
            au,
            emrat,
            ipt,
            de_number,
        },
    ))
}

/// Rows 13 and 14 live after the constant names beyond the 400th one (DE430t and later).
fn parse_extra_rows(bytes: &[u8], ncon: i32) -> Option<[[u32; 3]; 2]> {
    if ncon <= OLD_MAX as i32 {
        return None;
    }
    let offset = HEADER_FIXED_SIZE + (ncon as usize - OLD_MAX) * 6;
    let input = bytes.get(offset..)?;
    let (_, vals) = count(le_u32::<_, nom::error::Error<_>>, 6)(input).ok()?;
    Some([[vals[0], vals[1], vals[2]], [vals[3], vals[4], vals[5]]])
}

fn corrupt(message: impl Into<String>) -> OrreryError {
    OrreryError::DatasetCorrupt(message.into())
}

impl EphemerisHeader {
    /// Decode the header record and validate the layout it declares.
    ///
    /// Arguments
    /// ---------
    /// * `bytes`: the whole dataset
    ///
    /// Return
    /// -------
    /// * the header, or [`OrreryError::DatasetCorrupt`] when the declared structure is
    ///   inconsistent (coverage, constants, IPT rows or record size)
    pub fn parse(bytes: &[u8]) -> Result<Self, OrreryError> {
        let (_, raw) = parse_raw_header(bytes).map_err(|_| {
            corrupt(format!(
                "file is {} bytes, shorter than the {HEADER_FIXED_SIZE}-byte header",
                bytes.len()
            ))
        })?;

        let mut ipt = raw.ipt;
        if let Some([row13, row14]) = parse_extra_rows(bytes, raw.ncon) {
            ipt[13] = row13;
            ipt[14] = row14;
        }

        let (start_jd, end_jd, record_span) = (raw.span[0], raw.span[1], raw.span[2]);
        if !(start_jd.is_finite() && end_jd.is_finite() && start_jd < end_jd) {
            return Err(corrupt(format!(
                "invalid time coverage [{start_jd}, {end_jd}]"
            )));
        }
        if !(record_span.is_finite() && record_span > 0.0) {
            return Err(corrupt(format!("invalid record span {record_span} days")));
        }
        if !(raw.au.is_finite() && raw.au > 0.0) {
            return Err(corrupt(format!("invalid AU constant {}", raw.au)));
        }
        if !(raw.emrat.is_finite() && raw.emrat > 0.0) {
            return Err(corrupt(format!(
                "invalid Earth/Moon mass ratio {}",
                raw.emrat
            )));
        }

        let recsize = compute_recsize(&ipt)
            .ok_or_else(|| corrupt("IPT coefficient counts overflow the record size"))?;
        if recsize < HEADER_FIXED_SIZE {
            return Err(corrupt(format!(
                "record size {recsize} bytes cannot hold the header"
            )));
        }
        let words = recsize / 8;

        for (i, row) in ipt.iter().enumerate() {
            let [offset, n_coeffs, n_subs] = row.map(|v| v as usize);
            let populated = n_coeffs > 0 && n_subs > 0;
            if i < N_POSITION_SERIES && !populated {
                return Err(corrupt(format!("IPT row {i} declares no coefficients")));
            }
            if !populated {
                continue;
            }
            if offset < 3 {
                return Err(corrupt(format!(
                    "IPT row {i} starts at word {offset}, inside the record dates"
                )));
            }
            let last = series_words(i, row)
                .and_then(|w| w.checked_add(offset - 1))
                .ok_or_else(|| corrupt(format!("IPT row {i} overflows the record size")))?;
            if last > words {
                return Err(corrupt(format!(
                    "IPT row {i} ends at word {last}, past the {words}-word record"
                )));
            }
        }

        Ok(EphemerisHeader {
            title: raw.title,
            de_number: raw.de_number,
            start_jd,
            end_jd,
            record_span,
            ncon: raw.ncon,
            au: raw.au,
            earth_moon_mass_ratio: raw.emrat,
            ipt,
            recsize,
        })
    }

    /// Number of data records needed to cover `[start_jd, end_jd]`.
    pub fn expected_records(&self) -> usize {
        ((self.end_jd - self.start_jd) / self.record_span).round() as usize
    }
}
