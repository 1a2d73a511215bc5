//! # SGP4/SDP4 satellite record and propagation entry points
//!
//! A [`Satrec`] is created once from a mean element set by the initializer
//! ([`Satrec::sgp4init`], or the TLE/OMM readers) and then propagated to any number of time
//! offsets, in any order.
//!
//! ## Model selection
//!
//! The initializer classifies the orbit once and for all:
//!
//! * **near-earth** (period < 225 min): secular gravity and drag, with the higher-order drag
//!   terms unless the perigee is below 220 km (simplified drag);
//! * **deep-space** (period ≥ 225 min): luni-solar secular and long-period terms, plus the
//!   resonance integrator for 12 h and 24 h orbits.
//!
//! The classification lives in [`Method`]; deep-space coefficients only exist in its
//! [`Method::DeepSpace`] variant.
//!
//! ## Entry points
//!
//! | Method                                   | Receiver    | Resonance checkpoint              |
//! |------------------------------------------|-------------|-----------------------------------|
//! | [`Satrec::propagate`]                    | `&mut self` | resumed from and stored in record |
//! | [`Satrec::propagate_from_epoch`]         | `&self`     | always restarted at epoch         |
//! | [`Satrec::propagate_with_checkpoint`]    | `&self`     | owned by the caller               |
//! | [`Satrec::propagate_jd`], [`Satrec::sgp4`], [`Satrec::sgp4_tsince`] | `&mut self` | as `propagate` |
//!
//! The checkpoint only speeds up monotonic call sequences: the integrator walks fixed 720 min
//! steps from epoch, so resuming from a checkpoint reaches the same values as a restart.
//!
//! The `error`, `error_message`, `t` and `mean` fields of the record are updated by the mutable
//! entry points for callers that inspect the last outcome after the fact. New code should use
//! the returned `Result`.

pub mod deep_space;
pub mod initializer;
pub mod resonance;
pub(crate) mod sgp4;

use hifitime::Epoch;
use nalgebra::Vector3;

use crate::constants::{JulianDate, Minutes, MINUTES_PER_DAY};
use crate::earth_gravity::{GravityConstants, GravityModel};
use crate::params::OperationMode;
use crate::sgp4_errors::{PropagationError, Sgp4Error};
use crate::time::epoch_from_year_days;

pub use deep_space::LunarSolarPeriodics;
pub use initializer::ElementSet;
pub use resonance::{Resonance, ResonanceCheckpoint, ResonanceTerms};

/// Position (km) and velocity (km/s) in the TEME frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl Default for StateVector {
    fn default() -> Self {
        StateVector {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
        }
    }
}

impl StateVector {
    /// Vectors filled with NaN, used by the array and tuple interfaces for fatal errors.
    pub fn nan() -> Self {
        StateVector {
            position: Vector3::repeat(f64::NAN),
            velocity: Vector3::repeat(f64::NAN),
        }
    }

    pub fn position_array(&self) -> [f64; 3] {
        [self.position.x, self.position.y, self.position.z]
    }

    pub fn velocity_array(&self) -> [f64; 3] {
        [self.velocity.x, self.velocity.y, self.velocity.z]
    }
}

/// Singly averaged mean elements of the last propagation, before the short-period corrections.
///
/// `am` in Earth radii, angles in radians, `nm` in rad/min.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeanElements {
    pub am: f64,
    pub em: f64,
    pub im: f64,
    pub nodem: f64,
    pub argpm: f64,
    pub mm: f64,
    pub nm: f64,
}

/// Secular and drag coefficients shared by both theories.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SecularTerms {
    pub mdot: f64,
    pub argpdot: f64,
    pub nodedot: f64,
    pub nodecf: f64,
    pub cc1: f64,
    pub cc4: f64,
    pub cc5: f64,
    pub t2cof: f64,
    pub omgcof: f64,
    pub xmcof: f64,
    pub eta: f64,
    pub delmo: f64,
    pub sinmao: f64,
    pub xlcof: f64,
    pub aycof: f64,
    pub con41: f64,
    pub x1mth2: f64,
    pub x7thm1: f64,
}

/// Higher-order drag coefficients, present when the perigee is at or above 220 km.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HigherOrderDrag {
    pub d2: f64,
    pub d3: f64,
    pub d4: f64,
    pub t3cof: f64,
    pub t4cof: f64,
    pub t5cof: f64,
}

/// Luni-solar coefficients of a deep-space record.
#[derive(Debug, Clone, PartialEq)]
pub struct DeepSpaceTerms {
    pub periodics: LunarSolarPeriodics,
    pub resonance: ResonanceTerms,
}

/// Theory selected at initialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Method {
    /// Near-earth theory, `None` when drag is simplified.
    NearEarth(Option<HigherOrderDrag>),
    DeepSpace(Box<DeepSpaceTerms>),
}

impl Method {
    /// Historical one-letter code, `'n'` or `'d'`.
    pub fn as_char(&self) -> char {
        match self {
            Method::NearEarth(_) => 'n',
            Method::DeepSpace(_) => 'd',
        }
    }

    /// True when the higher-order drag terms are skipped.
    pub fn is_simplified(&self) -> bool {
        !matches!(self, Method::NearEarth(Some(_)))
    }

    pub fn deep_space(&self) -> Option<&DeepSpaceTerms> {
        match self {
            Method::DeepSpace(terms) => Some(terms),
            Method::NearEarth(_) => None,
        }
    }
}

/// An initialized satellite record.
///
/// Units
/// -----
/// * angles in radians, mean motions in rad/min
/// * `ndot` in rad/min², `nddot` in rad/min³ (stored for export only, never used by the theory)
/// * `bstar` in inverse Earth radii
/// * `a`, `alta`, `altp` in Earth radii
#[derive(Debug, Clone, PartialEq)]
pub struct Satrec {
    // identification
    pub satnum: u32,
    pub classification: char,
    pub intldesg: String,
    pub ephtype: u8,
    pub elnum: u32,
    pub revnum: u32,

    // epoch
    /// Two-digit epoch year.
    pub epochyr: i32,
    /// Day of year plus fraction, 1.0 being January 1 00:00 UT.
    pub epochdays: f64,
    pub jdsatepoch: JulianDate,
    pub jdsatepoch_f: f64,

    // configuration
    pub gravity: GravityModel,
    pub constants: GravityConstants,
    pub opsmode: OperationMode,
    pub reuse_resonance_checkpoint: bool,

    // mean elements at epoch
    pub bstar: f64,
    pub ndot: f64,
    pub nddot: f64,
    pub ecco: f64,
    pub argpo: f64,
    pub inclo: f64,
    pub mo: f64,
    pub no_kozai: f64,
    pub nodeo: f64,

    // derived
    pub no_unkozai: f64,
    pub a: f64,
    pub alta: f64,
    pub altp: f64,
    pub gsto: f64,
    pub secular: SecularTerms,
    pub method: Method,

    // last propagation
    pub t: Minutes,
    pub error: i32,
    pub error_message: Option<String>,
    pub mean: MeanElements,
    checkpoint: Option<ResonanceCheckpoint>,
}

impl Satrec {
    /// Mean motion as given by the element set (Kozai convention), rad/min.
    pub fn no(&self) -> f64 {
        self.no_kozai
    }

    pub fn is_deep_space(&self) -> bool {
        matches!(self.method, Method::DeepSpace(_))
    }

    /// Resonance class: 0 none, 1 synchronous, 2 half-day.
    pub fn irez(&self) -> u8 {
        self.method
            .deep_space()
            .map_or(0, |ds| ds.resonance.kind.irez())
    }

    /// Resonance checkpoint of the stateful entry point, `None` before any integration step.
    pub fn checkpoint(&self) -> Option<ResonanceCheckpoint> {
        self.checkpoint
    }

    /// Forget the stored checkpoint: the next stateful call restarts from epoch.
    pub fn reset_checkpoint(&mut self) {
        self.checkpoint = None;
    }

    /// Full four-digit epoch year.
    pub fn epoch_year(&self) -> i32 {
        if self.epochyr < 57 {
            self.epochyr + 2000
        } else {
            self.epochyr + 1900
        }
    }

    /// Epoch of the element set as a UTC `hifitime` epoch, truncated to the microsecond.
    pub fn epoch(&self) -> Result<Epoch, Sgp4Error> {
        epoch_from_year_days(self.epoch_year(), self.epochdays)
    }

    /// Minutes elapsed from the element-set epoch to the split Julian date `jd + fr`.
    pub fn minutes_since_epoch(&self, jd: JulianDate, fr: f64) -> Minutes {
        (jd - self.jdsatepoch) * MINUTES_PER_DAY + (fr - self.jdsatepoch_f) * MINUTES_PER_DAY
    }

    /// Propagate to `tsince` minutes from epoch, resuming the resonance integration from the
    /// record checkpoint when allowed by the configuration.
    pub fn propagate(&mut self, tsince: Minutes) -> Result<StateVector, PropagationError> {
        let mut checkpoint = if self.reuse_resonance_checkpoint {
            self.checkpoint
        } else {
            None
        };
        let outcome = sgp4::sgp4(self, tsince, &mut checkpoint);
        if self.reuse_resonance_checkpoint {
            self.checkpoint = checkpoint;
        }
        self.record_outcome(tsince, &outcome);
        outcome.result
    }

    /// Propagate to `tsince` minutes from epoch without touching the record.
    ///
    /// The resonance integrator always restarts from epoch, so the result does not depend on
    /// previous calls.
    pub fn propagate_from_epoch(&self, tsince: Minutes) -> Result<StateVector, PropagationError> {
        sgp4::sgp4(self, tsince, &mut None).result
    }

    /// Propagate to `tsince` minutes from epoch with a caller-owned resonance checkpoint.
    ///
    /// Pass `&mut None` the first time; the checkpoint is updated in place. It only pays off when
    /// successive calls move monotonically away from epoch, and it must not be shared between
    /// records.
    pub fn propagate_with_checkpoint(
        &self,
        tsince: Minutes,
        checkpoint: &mut Option<ResonanceCheckpoint>,
    ) -> Result<StateVector, PropagationError> {
        sgp4::sgp4(self, tsince, checkpoint).result
    }

    /// Propagate to the split Julian date `jd + fr` (UTC).
    pub fn propagate_jd(
        &mut self,
        jd: JulianDate,
        fr: f64,
    ) -> Result<StateVector, PropagationError> {
        let tsince = self.minutes_since_epoch(jd, fr);
        self.propagate(tsince)
    }

    /// Tuple interface: error code, position and velocity at the split Julian date `jd + fr`.
    ///
    /// Fatal errors yield NaN vectors; a decayed satellite (code 6) keeps its finite vectors.
    pub fn sgp4(&mut self, jd: JulianDate, fr: f64) -> (i32, [f64; 3], [f64; 3]) {
        let tsince = self.minutes_since_epoch(jd, fr);
        self.sgp4_tsince(tsince)
    }

    /// Tuple interface at `tsince` minutes from epoch, see [`Satrec::sgp4`].
    pub fn sgp4_tsince(&mut self, tsince: Minutes) -> (i32, [f64; 3], [f64; 3]) {
        let (code, state) = match self.propagate(tsince) {
            Ok(state) => (0, state),
            Err(err) => (err.code(), err.state().unwrap_or_else(StateVector::nan)),
        };
        (code, state.position_array(), state.velocity_array())
    }

    fn record_outcome(&mut self, tsince: Minutes, outcome: &sgp4::Outcome) {
        self.t = tsince;
        if let Some(mean) = outcome.mean {
            self.mean = mean;
        }
        match &outcome.result {
            Ok(_) => {
                self.error = 0;
                self.error_message = None;
            }
            Err(err) => {
                self.error = err.code();
                self.error_message = Some(err.to_string());
            }
        }
    }
}
