use std::{fmt, sync::Arc};

use crate::{
    constants::TdbSeconds,
    jpl_ephem::{ephemeris_ids::JplObjectId, EphemerisData},
    orrery_errors::OrreryError,
    state_vector::StateVector,
    time::tdb_seconds_to_jd,
};

use super::Trajectory;

/// View of one body of a loaded DE dataset.
///
/// Positions are given in the dataset's native frame (ICRF, treated as EquatorJ2000) and relative
/// to the body's ephemeris center: the solar-system barycenter for planets, EMB and Sun, the
/// Earth for the Moon.
#[derive(Clone)]
pub struct EphemerisTrajectory {
    data: Arc<EphemerisData>,
    body: JplObjectId,
}

impl EphemerisTrajectory {
    pub(crate) fn new(data: Arc<EphemerisData>, body: JplObjectId) -> Self {
        EphemerisTrajectory { data, body }
    }

    pub fn body(&self) -> JplObjectId {
        self.body
    }
}

impl fmt::Debug for EphemerisTrajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EphemerisTrajectory")
            .field("body", &self.body)
            .finish()
    }
}

impl Trajectory for EphemerisTrajectory {
    fn state(&self, t: TdbSeconds) -> Result<StateVector, OrreryError> {
        self.data.state_at(self.body, tdb_seconds_to_jd(t))
    }

    fn period(&self) -> f64 {
        self.body.nominal_period()
    }
}
