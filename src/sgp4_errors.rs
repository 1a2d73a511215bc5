//! # Errors
//!
//! Two error types live here:
//!
//! * [`PropagationError`]: the outcome of one propagation call, carrying the historical SGP4
//!   error code (1 to 4 and 6) and, for a decayed satellite, the state vector.
//! * [`Sgp4Error`]: everything else the crate can fail on, from reading TLE and OMM text to
//!   initializing a record.

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

use crate::propagation::StateVector;

/// Failure reported by one propagation call.
///
/// Every variant maps to one of the historical SGP4 error codes through [`PropagationError::code`].
/// Code 5 (satellite underground) is retired and never produced.
/// [`PropagationError::Decayed`] is not fatal: the state vector is computed and travels with the error.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PropagationError {
    #[error("mean eccentricity {0:.6} not within range 0.0 <= e < 1.0")]
    MeanEccentricity(f64),

    #[error("mean motion {0:.6} is less than zero")]
    MeanMotion(f64),

    #[error("perturbed eccentricity {0:.6} not within range 0.0 <= e <= 1.0")]
    PerturbedEccentricity(f64),

    #[error("semilatus rectum {0:.6} is less than zero")]
    SemiLatusRectum(f64),

    #[error("mrt {mrt:.6} is less than 1.0 indicating the satellite has decayed")]
    Decayed { mrt: f64, state: StateVector },
}

impl PropagationError {
    /// Numeric error code, as stored in the `error` field of a record.
    pub fn code(&self) -> i32 {
        match self {
            PropagationError::MeanEccentricity(_) => 1,
            PropagationError::MeanMotion(_) => 2,
            PropagationError::PerturbedEccentricity(_) => 3,
            PropagationError::SemiLatusRectum(_) => 4,
            PropagationError::Decayed { .. } => 6,
        }
    }

    /// A fatal error leaves no usable state vector.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PropagationError::Decayed { .. })
    }

    /// State vector still carried by a non-fatal error.
    pub fn state(&self) -> Option<StateVector> {
        match self {
            PropagationError::Decayed { state, .. } => Some(*state),
            _ => None,
        }
    }
}

/// Generic description of an SGP4 error code, `None` for unknown codes.
///
/// ```
/// use sgp4_kernel::sgp4_errors::describe_error_code;
/// assert_eq!(describe_error_code(2), Some("nm is less than zero"));
/// ```
pub fn describe_error_code(code: i32) -> Option<&'static str> {
    match code {
        1 => Some("mean eccentricity is outside the range 0.0 to 1.0"),
        2 => Some("nm is less than zero"),
        3 => Some("perturbed eccentricity is outside the range 0.0 to 1.0"),
        4 => Some("semilatus rectum is less than zero"),
        5 => Some("(error 5 no longer in use; it meant the satellite was underground)"),
        6 => Some("mrt is less than 1.0 which indicates the satellite has decayed"),
        _ => None,
    }
}

#[derive(Error, Debug)]
pub enum Sgp4Error {
    #[error("TLE line {line} does not match the layout\n{layout}\n{found}")]
    InvalidTleLine {
        line: u8,
        layout: &'static str,
        found: String,
    },

    #[error("TLE line gives its checksum as {given} but in fact tallies to {computed}:\n{line}")]
    ChecksumMismatch {
        given: u32,
        computed: u32,
        line: String,
    },

    #[error("Object numbers in lines 1 and 2 do not match: {0} != {1}")]
    SatelliteNumberMismatch(u32, u32),

    #[error("Invalid Alpha-5 satellite number: {0:?}")]
    InvalidAlpha5(String),

    #[error("satellite number {0} cannot exceed 339999, whose Alpha 5 encoding is 'Z9999'")]
    SatelliteNumberTooLarge(u32),

    #[error("Unable to parse a floating point field: {0}")]
    ParseFloat(#[from] ParseFloatError),

    #[error("Unable to parse an integer field: {0}")]
    ParseInt(#[from] ParseIntError),

    #[error("OMM CSV error: {0}")]
    OmmCsv(#[from] csv::Error),

    #[error("OMM XML error: {0}")]
    OmmXml(#[from] quick_xml::DeError),

    #[error("OMM field is missing: {0}")]
    MissingOmmField(&'static str),

    #[error("Invalid epoch: {0}")]
    InvalidEpoch(String),

    #[error("satellite parameters out of range:\n{0}")]
    ElementsOutOfRange(String),

    #[error("Invalid element value: {0}")]
    InvalidElement(String),

    #[error("Invalid propagator parameters: {0}")]
    InvalidParams(String),

    #[error("Unknown gravity model: {0}")]
    UnknownGravityModel(String),

    #[error("Unknown operation mode: {0:?}")]
    UnknownOperationMode(String),

    #[error("Initialization self-check failed with error {code}: {0}", code = .0.code())]
    Initialization(PropagationError),

    #[error("Julian date arrays differ in length: {0} whole dates for {1} fractions")]
    LengthMismatch(usize, usize),
}

impl PartialEq for Sgp4Error {
    fn eq(&self, other: &Self) -> bool {
        use Sgp4Error::*;
        match (self, other) {
            (
                InvalidTleLine {
                    line: a,
                    found: fa,
                    ..
                },
                InvalidTleLine {
                    line: b,
                    found: fb,
                    ..
                },
            ) => a == b && fa == fb,
            (
                ChecksumMismatch {
                    given: ga,
                    computed: ca,
                    line: la,
                },
                ChecksumMismatch {
                    given: gb,
                    computed: cb,
                    line: lb,
                },
            ) => ga == gb && ca == cb && la == lb,
            (SatelliteNumberMismatch(a1, a2), SatelliteNumberMismatch(b1, b2)) => {
                a1 == b1 && a2 == b2
            }
            (InvalidAlpha5(a), InvalidAlpha5(b)) => a == b,
            (SatelliteNumberTooLarge(a), SatelliteNumberTooLarge(b)) => a == b,
            (ParseFloat(a), ParseFloat(b)) => a == b,
            (ParseInt(a), ParseInt(b)) => a == b,

            // not comparable, same variant is enough
            (OmmCsv(_), OmmCsv(_)) => true,
            (OmmXml(_), OmmXml(_)) => true,

            (MissingOmmField(a), MissingOmmField(b)) => a == b,
            (InvalidEpoch(a), InvalidEpoch(b)) => a == b,
            (ElementsOutOfRange(a), ElementsOutOfRange(b)) => a == b,
            (InvalidElement(a), InvalidElement(b)) => a == b,
            (InvalidParams(a), InvalidParams(b)) => a == b,
            (UnknownGravityModel(a), UnknownGravityModel(b)) => a == b,
            (UnknownOperationMode(a), UnknownOperationMode(b)) => a == b,
            (Initialization(a), Initialization(b)) => a == b,
            (LengthMismatch(a1, a2), LengthMismatch(b1, b2)) => a1 == b1 && a2 == b2,
            _ => false,
        }
    }
}
