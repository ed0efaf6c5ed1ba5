//! In-memory DE datasets for tests.
//!
//! Every body moves along a straight line `x0 + v·(jd − start_jd)`, which the Chebyshev layout
//! represents exactly with two coefficients per sub-interval. Tests can therefore compare
//! interpolated states against closed-form values.
use nalgebra::Vector3;

use super::ephemeris_header::{HEADER_FIXED_SIZE, N_POSITION_SERIES};

#[derive(Debug, Clone)]
pub(crate) struct SyntheticDataset {
    pub start_jd: f64,
    pub record_span: f64,
    pub n_records: usize,
    pub n_coeffs: u32,
    pub n_subs: u32,
    pub emrat: f64,
    pub au: f64,
    /// Per body: position at `start_jd` (km) and velocity (km/day).
    pub motions: [(Vector3<f64>, Vector3<f64>); N_POSITION_SERIES],
    pub override_span: Option<[f64; 3]>,
    pub override_ipt_offset: Option<(usize, u32)>,
    pub override_block_start: Option<(usize, f64)>,
}

fn put_f64(buf: &mut [u8], at: usize, value: f64) {
    buf[at..at + 8].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(buf: &mut [u8], at: usize, value: u32) {
    buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

impl SyntheticDataset {
    pub fn new(start_jd: f64, record_span: f64, n_records: usize) -> Self {
        let mut motions = [(Vector3::zeros(), Vector3::zeros()); N_POSITION_SERIES];
        for (body, motion) in motions.iter_mut().enumerate() {
            let b = body as f64 + 1.0;
            *motion = (
                Vector3::new(1.0e7 * b, -2.0e6 * b, 5.0e5 * b),
                Vector3::new(-1.0e4 * b, 3.0e3 * b, 250.0 * b),
            );
        }
        SyntheticDataset {
            start_jd,
            record_span,
            n_records,
            n_coeffs: 6,
            n_subs: 2,
            emrat: 81.300_568_221_497_22,
            au: 149_597_870.7,
            motions,
            override_span: None,
            override_ipt_offset: None,
            override_block_start: None,
        }
    }

    fn words_per_body(&self) -> usize {
        (self.n_coeffs * self.n_subs * 3) as usize
    }

    fn ipt_offset(&self, body: usize) -> u32 {
        match self.override_ipt_offset {
            Some((b, offset)) if b == body => offset,
            _ => (3 + body * self.words_per_body()) as u32,
        }
    }

    pub fn recsize(&self) -> usize {
        (2 + N_POSITION_SERIES * self.words_per_body()) * 8
    }

    pub fn end_jd(&self) -> f64 {
        self.start_jd + self.record_span * self.n_records as f64
    }

    /// Closed-form position (km) of a body.
    pub fn position_at(&self, body: usize, jd: f64) -> Vector3<f64> {
        let (x0, v) = self.motions[body];
        x0 + v * (jd - self.start_jd)
    }

    /// Closed-form velocity (km/s) of a body.
    pub fn velocity_of(&self, body: usize) -> Vector3<f64> {
        self.motions[body].1 / 86_400.0
    }

    fn header_record(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.recsize().max(HEADER_FIXED_SIZE)];
        let title = b"JPL Planetary Ephemeris DE999/SYNTHETIC";
        buf[..title.len()].copy_from_slice(title);
        for b in buf[title.len()..84].iter_mut() {
            *b = b' ';
        }

        let span = self
            .override_span
            .unwrap_or([self.start_jd, self.end_jd(), self.record_span]);
        put_f64(&mut buf, 2652, span[0]);
        put_f64(&mut buf, 2660, span[1]);
        put_f64(&mut buf, 2668, span[2]);
        buf[2676..2680].copy_from_slice(&400i32.to_le_bytes());
        put_f64(&mut buf, 2680, self.au);
        put_f64(&mut buf, 2688, self.emrat);

        for body in 0..N_POSITION_SERIES {
            let at = 2696 + body * 12;
            put_u32(&mut buf, at, self.ipt_offset(body));
            put_u32(&mut buf, at + 4, self.n_coeffs);
            put_u32(&mut buf, at + 8, self.n_subs);
        }
        put_u32(&mut buf, 2840, 999);
        buf.truncate(self.recsize());
        buf
    }

    fn data_record(&self, index: usize) -> Vec<u8> {
        let n_coeffs = self.n_coeffs as usize;
        let n_subs = self.n_subs as usize;
        let mut words = vec![0.0; self.recsize() / 8];

        let block_start = match self.override_block_start {
            Some((i, jd)) if i == index => jd,
            _ => self.start_jd + index as f64 * self.record_span,
        };
        words[0] = block_start;
        words[1] = block_start + self.record_span;

        let sub_span = self.record_span / n_subs as f64;
        for body in 0..N_POSITION_SERIES {
            let base = 2 + body * self.words_per_body();
            for sub in 0..n_subs {
                let mid = block_start + (sub as f64 + 0.5) * sub_span;
                let center = self.position_at(body, mid);
                let (_, v) = self.motions[body];
                for comp in 0..3 {
                    let at = base + sub * n_coeffs * 3 + comp * n_coeffs;
                    words[at] = center[comp];
                    words[at + 1] = v[comp] * sub_span / 2.0;
                }
            }
        }

        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.header_record();
        bytes.extend(vec![0u8; self.recsize()]);
        for i in 0..self.n_records {
            bytes.extend(self.data_record(i));
        }
        bytes
    }
}
