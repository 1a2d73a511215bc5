//! # Propagator configuration
//!
//! [`Sgp4Params`] gathers the choices that are fixed for the whole lifetime of a satellite record:
//! the gravity constant set, the operation mode, and a few reader/propagator policies.
//! Use [`Sgp4Params::default`] for the usual public-TLE setup (WGS-72, improved mode) or
//! [`Sgp4Params::builder`] to customize it.
//!
//! ```
//! use sgp4_kernel::params::{OperationMode, Sgp4Params};
//! use sgp4_kernel::earth_gravity::GravityModel;
//!
//! let params = Sgp4Params::builder()
//!     .gravity(GravityModel::Wgs84)
//!     .opsmode(OperationMode::Afspc)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.gravity, GravityModel::Wgs84);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::earth_gravity::GravityModel;
use crate::sgp4_errors::Sgp4Error;

/// Sidereal-time and node-wrapping convention.
///
/// * `Afspc`: legacy AFSPC behavior (`'a'`). Greenwich sidereal time from the 1970 polynomial, and
///   negative nodes are wrapped into [0, 2π) inside the Lyddane branch.
/// * `Improved`: improved behavior (`'i'`). Greenwich sidereal time from the IAU-82 `gstime` formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperationMode {
    Afspc,
    #[default]
    Improved,
}

impl OperationMode {
    pub fn as_char(self) -> char {
        match self {
            OperationMode::Afspc => 'a',
            OperationMode::Improved => 'i',
        }
    }
}

impl TryFrom<char> for OperationMode {
    type Error = Sgp4Error;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'a' => Ok(OperationMode::Afspc),
            'i' => Ok(OperationMode::Improved),
            other => Err(Sgp4Error::UnknownOperationMode(other.to_string())),
        }
    }
}

impl FromStr for OperationMode {
    type Err = Sgp4Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => OperationMode::try_from(c),
            _ => Err(Sgp4Error::UnknownOperationMode(s.to_string())),
        }
    }
}

/// Configuration of the initializer, the readers and the stateful propagator.
#[derive(Debug, Clone, PartialEq)]
pub struct Sgp4Params {
    /// Gravity constant set fixed into every initialized record.
    pub gravity: GravityModel,
    /// Sidereal time and node-wrapping convention.
    pub opsmode: OperationMode,
    /// When `true`, [`crate::propagation::Satrec::propagate`] resumes the deep-space resonance
    /// integration from the last checkpoint. When `false`, every call restarts from epoch.
    pub reuse_resonance_checkpoint: bool,
    /// Reject TLE lines whose trailing checksum digit disagrees with their content.
    pub verify_checksum: bool,
    /// Decimal digits kept in the epoch day fraction when it carries no more than that many
    /// digits (TLE epochs have 8).
    pub epoch_fraction_digits: u32,
}

impl Sgp4Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> Sgp4ParamsBuilder {
        Sgp4ParamsBuilder::new()
    }
}

impl Default for Sgp4Params {
    fn default() -> Self {
        Sgp4Params {
            gravity: GravityModel::Wgs72,
            opsmode: OperationMode::Improved,
            reuse_resonance_checkpoint: true,
            verify_checksum: true,
            epoch_fraction_digits: 8,
        }
    }
}

/// Fluent builder for [`Sgp4Params`].
#[derive(Debug, Clone)]
pub struct Sgp4ParamsBuilder {
    params: Sgp4Params,
}

impl Default for Sgp4ParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Sgp4ParamsBuilder {
    pub fn new() -> Self {
        Self {
            params: Sgp4Params::default(),
        }
    }

    pub fn gravity(mut self, gravity: GravityModel) -> Self {
        self.params.gravity = gravity;
        self
    }

    pub fn opsmode(mut self, opsmode: OperationMode) -> Self {
        self.params.opsmode = opsmode;
        self
    }

    pub fn reuse_resonance_checkpoint(mut self, reuse: bool) -> Self {
        self.params.reuse_resonance_checkpoint = reuse;
        self
    }

    pub fn verify_checksum(mut self, verify: bool) -> Self {
        self.params.verify_checksum = verify;
        self
    }

    pub fn epoch_fraction_digits(mut self, digits: u32) -> Self {
        self.params.epoch_fraction_digits = digits;
        self
    }

    /// Validate and return the parameters.
    ///
    /// Return
    /// ------
    /// * `Err(Sgp4Error::InvalidParams)` if `epoch_fraction_digits` is outside `1..=15`,
    ///   the range a double can represent exactly enough for the rounding heuristic.
    pub fn build(self) -> Result<Sgp4Params, Sgp4Error> {
        let p = &self.params;
        if !(1..=15).contains(&p.epoch_fraction_digits) {
            return Err(Sgp4Error::InvalidParams(format!(
                "epoch_fraction_digits must be within 1..=15, got {}",
                p.epoch_fraction_digits
            )));
        }
        Ok(self.params)
    }
}

impl fmt::Display for Sgp4Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SGP4 parameters:")?;
        writeln!(f, "  gravity model              : {}", self.gravity)?;
        writeln!(f, "  operation mode             : {}", self.opsmode.as_char())?;
        writeln!(
            f,
            "  reuse resonance checkpoint : {}",
            self.reuse_resonance_checkpoint
        )?;
        writeln!(f, "  verify TLE checksum        : {}", self.verify_checksum)?;
        write!(
            f,
            "  epoch fraction digits      : {}",
            self.epoch_fraction_digits
        )
    }
}
