//! # Two-line element sets
//!
//! Reading and writing of the fixed-column TLE format.
//!
//! ## Layout
//!
//! ```text
//! 1 NNNNNC NNNNNAAA NNNNN.NNNNNNNN +.NNNNNNNN +NNNNN-N +NNNNN-N N NNNNN
//! 2 NNNNN NNN.NNNN NNN.NNNN NNNNNNN NNN.NNNN NNN.NNNN NN.NNNNNNNNNNNNNN
//! ```
//!
//! The format was designed for punch cards: the reader checks the position of every separator
//! before decoding the fields, and rejects lines that do not match.
//!
//! ## Units
//!
//! [`TleElements`] holds the decoded fields already converted to the units of the theory:
//! radians, rad/min for the mean motion, rad/min² and rad/min³ for its derivatives.

mod alpha5;
mod checksum;
mod exporter;

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{DEG2RAD, JD_SGP4_EPOCH, MINUTES_PER_DAY, XPDOTP};
use crate::earth_gravity::GravityModel;
use crate::params::Sgp4Params;
use crate::propagation::{ElementSet, Satrec};
use crate::sgp4_errors::Sgp4Error;
use crate::time::{days2mdhms, jday, tle_epoch_jd};

pub use alpha5::{from_alpha5, to_alpha5, MAX_ALPHA5};
pub use checksum::{compute_checksum, fix_checksum, verify_checksum};
pub use exporter::{check_satrec, export_tle};

pub const LINE1_LAYOUT: &str =
    "1 NNNNNC NNNNNAAA NNNNN.NNNNNNNN +.NNNNNNNN +NNNNN-N +NNNNN-N N NNNNN";
pub const LINE2_LAYOUT: &str =
    "2 NNNNN NNN.NNNN NNN.NNNN NNNNNNN NNN.NNNN NNN.NNNN NN.NNNNNNNNNNNNNN";

static LINE1_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^1 .{6} .{14}\..{8} .\..{8} .{8} .{8} . ").expect("valid line 1 pattern")
});
static LINE2_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^2 .{5} .{3}\..{4} .{3}\..{4} .{7} .{3}\..{4} .{3}\..{4} .{17}")
        .expect("valid line 2 pattern")
});

/// Decoded content of a two-line element set.
#[derive(Debug, Clone, PartialEq)]
pub struct TleElements {
    pub satnum: u32,
    pub classification: char,
    pub intldesg: String,
    /// Two-digit epoch year, 57-99 meaning 19xx.
    pub epochyr: i32,
    pub epochdays: f64,
    /// rad/min²
    pub ndot: f64,
    /// rad/min³
    pub nddot: f64,
    pub bstar: f64,
    pub ephtype: u8,
    pub elnum: u32,
    pub inclo: f64,
    pub nodeo: f64,
    pub ecco: f64,
    pub argpo: f64,
    pub mo: f64,
    /// rad/min
    pub no_kozai: f64,
    pub revnum: u32,
}

impl TleElements {
    /// Four-digit epoch year.
    pub fn epoch_year(&self) -> i32 {
        if self.epochyr < 57 {
            self.epochyr + 2000
        } else {
            self.epochyr + 1900
        }
    }

    /// Split Julian date of the epoch, keeping the 8 fraction digits of the TLE.
    pub fn epoch_jd(&self) -> (f64, f64) {
        tle_epoch_jd(self.epoch_year(), self.epochdays)
    }

    /// Initializer input for these elements.
    pub fn element_set(&self) -> ElementSet {
        let year = self.epoch_year();
        let mdhms = days2mdhms(year, self.epochdays);
        let (jd, fr) = jday(
            year,
            mdhms.month,
            mdhms.day,
            mdhms.hour,
            mdhms.minute,
            mdhms.second,
        );
        ElementSet {
            satnum: self.satnum,
            epoch: jd + fr - JD_SGP4_EPOCH,
            bstar: self.bstar,
            ndot: self.ndot,
            nddot: self.nddot,
            ecco: self.ecco,
            argpo: self.argpo,
            inclo: self.inclo,
            mo: self.mo,
            no_kozai: self.no_kozai,
            nodeo: self.nodeo,
        }
    }
}

fn layout_error(line: u8, found: &str) -> Sgp4Error {
    Sgp4Error::InvalidTleLine {
        line,
        layout: if line == 1 { LINE1_LAYOUT } else { LINE2_LAYOUT },
        found: found.to_string(),
    }
}

/// Columns `start..end` of an ASCII line, empty when the line is shorter.
fn columns(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("")
}

fn parse_f64(field: &str) -> Result<f64, Sgp4Error> {
    Ok(field.trim().parse::<f64>()?)
}

/// Integer field, blank meaning zero.
fn parse_u32_or_zero(field: &str) -> Result<u32, Sgp4Error> {
    let field = field.trim();
    if field.is_empty() {
        Ok(0)
    } else {
        Ok(field.parse()?)
    }
}

/// Decode an implied-decimal field with exponent, such as ` 38792-4` (0.38792e-4).
fn parse_exponent_field(sign: &str, mantissa: &str, exponent: &str) -> Result<f64, Sgp4Error> {
    let value = parse_f64(&format!("{}.{}", sign.trim(), mantissa))?;
    let exponent: i32 = exponent.trim().parse()?;
    Ok(value * 10f64.powi(exponent))
}

/// Decode a two-line element set.
///
/// The checksums are not verified here, see [`verify_checksum`] and [`Satrec::from_tle_with`].
///
/// Return
/// ------
/// * [`Sgp4Error::InvalidTleLine`] when a separator is misplaced or a line is too short
/// * [`Sgp4Error::SatelliteNumberMismatch`] when both lines disagree on the satellite
/// * a parse error for a malformed numeric field
pub fn parse_tle(line1: &str, line2: &str) -> Result<TleElements, Sgp4Error> {
    let line1 = line1.trim_end();
    if !line1.is_ascii() || !LINE1_RE.is_match(line1) {
        return Err(layout_error(1, line1));
    }

    let satnum = from_alpha5(columns(line1, 2, 7))?;
    let classification = columns(line1, 7, 8).chars().next().unwrap_or('U');
    let intldesg = columns(line1, 9, 17).trim_end().to_string();
    let epochyr: i32 = columns(line1, 18, 20).trim().parse()?;
    let epochdays = parse_f64(columns(line1, 20, 32))?;
    let ndot = parse_f64(columns(line1, 33, 43))?;
    let nddot = parse_exponent_field(
        columns(line1, 44, 45),
        columns(line1, 45, 50),
        columns(line1, 50, 52),
    )?;
    let bstar = parse_exponent_field(
        columns(line1, 53, 54),
        columns(line1, 54, 59),
        columns(line1, 59, 61),
    )?;
    let ephtype = columns(line1, 62, 63)
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .unwrap_or(0) as u8;
    let elnum = parse_u32_or_zero(columns(line1, 64, 68))?;

    let line2 = line2.trim_end();
    if !line2.is_ascii() || !LINE2_RE.is_match(line2) {
        return Err(layout_error(2, line2));
    }

    let satnum2 = from_alpha5(columns(line2, 2, 7))?;
    if satnum2 != satnum {
        return Err(Sgp4Error::SatelliteNumberMismatch(satnum, satnum2));
    }
    let inclo = parse_f64(columns(line2, 8, 16))?;
    let nodeo = parse_f64(columns(line2, 17, 25))?;
    let ecco = parse_f64(&format!("0.{}", columns(line2, 26, 33).replace(' ', "0")))?;
    let argpo = parse_f64(columns(line2, 34, 42))?;
    let mo = parse_f64(columns(line2, 43, 51))?;
    let no_kozai = parse_f64(columns(line2, 52, 63))?;
    let revnum = parse_u32_or_zero(columns(line2, 63, 68))?;

    Ok(TleElements {
        satnum,
        classification,
        intldesg,
        epochyr,
        epochdays,
        ndot: ndot / (XPDOTP * MINUTES_PER_DAY),
        nddot: nddot / (XPDOTP * MINUTES_PER_DAY * MINUTES_PER_DAY),
        bstar,
        ephtype,
        elnum,
        inclo: inclo * DEG2RAD,
        nodeo: nodeo * DEG2RAD,
        ecco,
        argpo: argpo * DEG2RAD,
        mo: mo * DEG2RAD,
        no_kozai: no_kozai / XPDOTP,
        revnum,
    })
}

impl Satrec {
    /// Initialize a record from two TLE lines with the given gravity model, in improved mode.
    ///
    /// ```
    /// use sgp4_kernel::{earth_gravity::GravityModel, propagation::Satrec};
    ///
    /// let line1 = "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991";
    /// let line2 = "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482";
    /// let mut sat = Satrec::twoline2rv(line1, line2, GravityModel::Wgs72).unwrap();
    /// let (code, r, _v) = sat.sgp4(2458826.5, 0.8625);
    /// assert_eq!(code, 0);
    /// assert!(r.iter().all(|x| x.is_finite()));
    /// ```
    pub fn twoline2rv(line1: &str, line2: &str, gravity: GravityModel) -> Result<Satrec, Sgp4Error> {
        let params = Sgp4Params {
            gravity,
            ..Sgp4Params::default()
        };
        Satrec::from_tle_with(line1, line2, &params)
    }

    /// Initialize a record from two TLE lines.
    ///
    /// The checksums are verified first when `params.verify_checksum` is set. The epoch of the
    /// record is rebuilt from the TLE year and day so that its fraction keeps the 8 printed
    /// digits.
    pub fn from_tle_with(
        line1: &str,
        line2: &str,
        params: &Sgp4Params,
    ) -> Result<Satrec, Sgp4Error> {
        if params.verify_checksum {
            verify_checksum(&[line1.trim_end(), line2.trim_end()])?;
        }
        let tle = parse_tle(line1, line2)?;
        let mut rec = Satrec::sgp4init(params, &tle.element_set())?;

        let (jd, fr) = tle.epoch_jd();
        rec.jdsatepoch = jd;
        rec.jdsatepoch_f = fr;
        rec.epochyr = tle.epochyr;
        rec.epochdays = tle.epochdays;
        rec.classification = tle.classification;
        rec.intldesg = tle.intldesg;
        rec.ephtype = tle.ephtype;
        rec.elnum = tle.elnum;
        rec.revnum = tle.revnum;
        Ok(rec)
    }
}

#[cfg(test)]
mod tle_test {
    use super::*;
    use approx::assert_relative_eq;

    const ISS_LINE1: &str =
        "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991";
    const ISS_LINE2: &str =
        "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482";

    #[test]
    fn test_parse_iss() {
        let tle = parse_tle(ISS_LINE1, ISS_LINE2).unwrap();
        assert_eq!(tle.satnum, 25544);
        assert_eq!(tle.classification, 'U');
        assert_eq!(tle.intldesg, "98067A");
        assert_eq!(tle.epochyr, 19);
        assert_eq!(tle.epoch_year(), 2019);
        assert_relative_eq!(tle.epochdays, 343.69339541);
        assert_relative_eq!(tle.ndot * XPDOTP * MINUTES_PER_DAY, 1.764e-5, max_relative = 1e-12);
        assert_eq!(tle.nddot, 0.0);
        assert_relative_eq!(tle.bstar, 3.8792e-5, max_relative = 1e-12);
        assert_eq!(tle.ephtype, 0);
        assert_eq!(tle.elnum, 999);
        assert_relative_eq!(tle.inclo, 51.6439 * DEG2RAD);
        assert_relative_eq!(tle.ecco, 0.0007417);
        assert_relative_eq!(tle.no_kozai * XPDOTP, 15.50103472, max_relative = 1e-12);
        assert_eq!(tle.revnum, 20248);
        assert_eq!(tle.epoch_jd(), (2458826.5, 0.69339541));
    }

    #[test]
    fn test_layout_errors() {
        let shifted = ISS_LINE1.replacen("19343.", "1934.3", 1);
        assert!(matches!(
            parse_tle(&shifted, ISS_LINE2),
            Err(Sgp4Error::InvalidTleLine { line: 1, .. })
        ));
        assert!(matches!(
            parse_tle(ISS_LINE1, &ISS_LINE2[..60]),
            Err(Sgp4Error::InvalidTleLine { line: 2, .. })
        ));
        let other = ISS_LINE2.replacen("25544", "25545", 1);
        assert_eq!(
            parse_tle(ISS_LINE1, &other),
            Err(Sgp4Error::SatelliteNumberMismatch(25544, 25545))
        );
    }

    #[test]
    fn test_alpha5_satellite_number() {
        let line1 = fix_checksum(&ISS_LINE1.replacen("25544", "E8493", 1));
        let line2 = fix_checksum(&ISS_LINE2.replacen("25544", "E8493", 1));
        assert_eq!(parse_tle(&line1, &line2).unwrap().satnum, 148_493);
    }

    #[test]
    fn test_checksum_rejected_before_initialization() {
        let bad = format!("{}5", &ISS_LINE1[..68]);
        assert!(matches!(
            Satrec::twoline2rv(&bad, ISS_LINE2, GravityModel::Wgs72),
            Err(Sgp4Error::ChecksumMismatch { .. })
        ));
        let params = Sgp4Params::builder().verify_checksum(false).build().unwrap();
        assert!(Satrec::from_tle_with(&bad, ISS_LINE2, &params).is_ok());
    }

    #[test]
    fn test_twoline2rv_epoch_fields() {
        let sat = Satrec::twoline2rv(ISS_LINE1, ISS_LINE2, GravityModel::Wgs72).unwrap();
        assert_eq!(sat.jdsatepoch, 2458826.5);
        assert_eq!(sat.jdsatepoch_f, 0.69339541);
        assert_eq!(sat.epochyr, 19);
        assert_eq!(sat.revnum, 20248);
        assert_eq!(sat.intldesg, "98067A");
    }
}
