//! # Time conversions
//!
//! Julian dates split into a whole part and a day fraction, the TLE day-of-year epoch, Greenwich
//! sidereal time, and the bridge to `hifitime` epochs used by the OMM reader.

use std::str::FromStr;

use hifitime::Epoch;

use crate::constants::{
    DAYS_PER_JULIAN_CENTURY, DEG2RAD, DPI, JD_1900, JD_J2000, SECONDS_PER_DAY,
};
use crate::sgp4_errors::Sgp4Error;

/// Calendar date split into month, day, hour, minute and fractional second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthDayTime {
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
}

/// Julian date of a calendar instant, returned as a whole part and a day fraction.
///
/// The whole part lands on the preceding midnight (x.5), the fraction holds the time of day.
/// Valid from 1900 March 1 to 2100 February 28.
///
/// Argument
/// --------
/// * `year`, `mon`, `day`: calendar date
/// * `hr`, `minute`, `sec`: UTC time of day
///
/// Return
/// ------
/// * `(jd, fr)` such that `jd + fr` is the Julian date
pub fn jday(year: i32, mon: u32, day: u32, hr: u32, minute: u32, sec: f64) -> (f64, f64) {
    let year = year as f64;
    let mon = mon as f64;
    let jd = 367.0 * year - (7.0 * (year + ((mon + 9.0) / 12.0).floor()) * 0.25).floor()
        + (275.0 * mon / 9.0).floor()
        + day as f64
        + 1_721_013.5;
    let fr = (sec + minute as f64 * 60.0 + hr as f64 * 3600.0) / SECONDS_PER_DAY;
    (jd, fr)
}

/// Julian date of a `hifitime` epoch, split as in [`jday`].
pub fn jday_epoch(epoch: &Epoch) -> (f64, f64) {
    let (year, month, day, hour, minute, second, nanos) = epoch.to_gregorian_utc();
    jday(
        year,
        month as u32,
        day as u32,
        hour as u32,
        minute as u32,
        second as f64 + nanos as f64 * 1e-9,
    )
}

/// Convert a day-of-year with fraction into month, day, hour, minute and second.
///
/// Day 1.0 is January 1 00:00. Leap years follow the simple `year % 4` rule.
/// Day numbers past the end of December keep counting in December (for example "December 32").
pub fn days2mdhms(year: i32, days: f64) -> MonthDayTime {
    let mut lmonth = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if year % 4 == 0 {
        lmonth[1] = 29;
    }
    let dayofyr = days.floor() as i64;

    let mut i = 1;
    let mut inttemp = 0;
    while dayofyr > inttemp + lmonth[i - 1] && i < 12 {
        inttemp += lmonth[i - 1];
        i += 1;
    }

    let temp = (days - dayofyr as f64) * 24.0;
    let hour = temp.floor();
    let temp = (temp - hour) * 60.0;
    let minute = temp.floor();

    MonthDayTime {
        month: i as u32,
        day: (dayofyr - inttemp) as u32,
        hour: hour as u32,
        minute: minute as u32,
        second: (temp - minute) * 60.0,
    }
}

/// Inverse of [`jday`]: calendar components of a Julian date.
///
/// Return
/// ------
/// * `(year, month, day, hour, minute, second)`
pub fn invjday(jd: f64) -> (i32, u32, u32, u32, u32, f64) {
    let temp = jd - JD_1900;
    let tu = temp / 365.25;
    let mut year = 1900 + tu.floor() as i32;
    let mut leapyrs = ((year - 1901) as f64 * 0.25).floor();

    // nudge by 8.64e-7 sec to get even outputs
    let mut days = temp - ((year - 1900) as f64 * 365.0 + leapyrs) + 0.000_000_000_01;

    if days < 1.0 {
        year -= 1;
        leapyrs = ((year - 1901) as f64 * 0.25).floor();
        days = temp - ((year - 1900) as f64 * 365.0 + leapyrs);
    }

    let mdhms = days2mdhms(year, days);
    (
        year,
        mdhms.month,
        mdhms.day,
        mdhms.hour,
        mdhms.minute,
        mdhms.second - 0.000_000_864,
    )
}

/// Greenwich mean sidereal time (IAU-82) of a UT1 Julian date, in radians within [0, 2π).
///
/// Argument
/// --------
/// * `jdut1`: Julian date in the UT1 scale
///
/// Return
/// ------
/// * GMST in radians
pub fn gstime(jdut1: f64) -> f64 {
    let tut1 = (jdut1 - JD_J2000) / DAYS_PER_JULIAN_CENTURY;
    let temp = -6.2e-6 * tut1 * tut1 * tut1
        + 0.093104 * tut1 * tut1
        + (876_600.0 * 3600.0 + 8_640_184.812866) * tut1
        + 67_310.54841;
    // 360/86400 = 1/240, to degrees then radians
    (temp * DEG2RAD / 240.0).rem_euclid(DPI)
}

/// Greenwich sidereal time at an SGP4 epoch from the legacy AFSPC polynomial.
///
/// `epoch` counts days since 1949 December 31 00:00 UT. The polynomial is anchored in 1970.
pub fn gstime_afspc(epoch: f64) -> f64 {
    const C1: f64 = 1.72027916940703639e-2;
    const THGR70: f64 = 1.7321343856509374;
    const FK5R: f64 = 5.07551419432269442e-15;

    let ts70 = epoch - 7305.0;
    let ds70 = (ts70 + 1.0e-8).floor();
    let tfrac = ts70 - ds70;
    let c1p2p = C1 + DPI;
    (THGR70 + C1 * ds70 + c1p2p * tfrac + ts70 * ts70 * FK5R).rem_euclid(DPI)
}

/// Julian date of a TLE epoch given as a full year and a fractional day of year.
///
/// The whole part is the midnight starting the epoch day, the fraction keeps the 8 decimal digits
/// printed in the TLE.
pub fn tle_epoch_jd(year: i32, epochdays: f64) -> (f64, f64) {
    let days = epochdays.floor();
    let fraction = epochdays - days;
    let whole = year as f64 * 365.0 + ((year - 1) as f64 / 4.0).floor() + days + 1_721_044.5;
    (whole, round_to_digits(fraction, 8))
}

/// Epoch of an element set as a `hifitime` UTC epoch.
///
/// Day numbers running past December 31 (a TLE epoch of "day 366" in a common year) are
/// carried into January of the following year.
pub fn epoch_from_year_days(year: i32, epochdays: f64) -> Result<Epoch, Sgp4Error> {
    let (year, mdhms) = calendar_from_year_days(year, epochdays);
    let (second, micros) = split_microseconds(mdhms.second);
    Epoch::maybe_from_gregorian_utc(
        year,
        mdhms.month as u8,
        mdhms.day as u8,
        mdhms.hour as u8,
        mdhms.minute as u8,
        second as u8,
        micros * 1000,
    )
    .map_err(|e| Sgp4Error::InvalidEpoch(e.to_string()))
}

/// ISO 8601 text of an element-set epoch with microsecond precision, e.g. `2019-12-09T16:38:29.363423`.
pub fn format_epoch_iso(year: i32, epochdays: f64) -> String {
    let (year, mdhms) = calendar_from_year_days(year, epochdays);
    let (second, micros) = split_microseconds(mdhms.second);
    format!(
        "{year:04}-{:02}-{:02}T{:02}:{:02}:{second:02}.{micros:06}",
        mdhms.month, mdhms.day, mdhms.hour, mdhms.minute
    )
}

/// Parse an ISO 8601 `YYYY-MM-DDTHH:MM:SS[.ffffff]` timestamp into a split Julian date.
///
/// The text is read by `hifitime`, UTC unless it names another time scale. Impossible calendar
/// dates such as February 30 are rejected.
pub fn parse_epoch_iso(text: &str) -> Result<(f64, f64), Sgp4Error> {
    let epoch = Epoch::from_str(text)
        .map_err(|e| Sgp4Error::InvalidEpoch(format!("{}: {e}", text.trim())))?;
    Ok(jday_epoch(&epoch))
}

fn calendar_from_year_days(year: i32, epochdays: f64) -> (i32, MonthDayTime) {
    let mut mdhms = days2mdhms(year, epochdays);
    let mut year = year;
    if mdhms.month == 12 && mdhms.day > 31 {
        year += 1;
        mdhms.month = 1;
        mdhms.day -= 31;
    }
    (year, mdhms)
}

fn split_microseconds(second: f64) -> (u32, u32) {
    let whole = second.floor();
    let micros = ((second - whole) * 1e6).floor();
    (whole as u32, micros as u32)
}

/// Round `value` to `digits` decimal places.
pub(crate) fn round_to_digits(value: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (value * scale).round() / scale
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_jday() {
        assert_eq!(jday(2019, 12, 9, 12, 0, 0.0), (2458826.5, 0.5));
        assert_eq!(jday(2000, 1, 1, 12, 0, 0.0), (2451544.5, 0.5));
    }

    #[test]
    fn test_days2mdhms() {
        let d = days2mdhms(2019, 343.69339541);
        assert_eq!((d.month, d.day, d.hour, d.minute), (12, 9, 16, 38));
        assert_abs_diff_eq!(d.second, 29.363424, epsilon = 1e-5);

        let leap = days2mdhms(2020, 60.5);
        assert_eq!((leap.month, leap.day, leap.hour), (2, 29, 12));
    }

    #[test]
    fn test_invjday_inverts_jday() {
        let (jd, fr) = jday(2019, 12, 9, 16, 38, 29.5);
        let (year, mon, day, hr, minute, sec) = invjday(jd + fr);
        assert_eq!((year, mon, day, hr, minute), (2019, 12, 9, 16, 38));
        assert_abs_diff_eq!(sec, 29.5, epsilon = 1e-4);

        let (year, mon, day, hr, _, _) = invjday(2451544.5);
        assert_eq!((year, mon, day, hr), (2000, 1, 1, 0));
    }

    #[test]
    fn test_gstime() {
        // J2000.0
        assert_abs_diff_eq!(gstime(2451545.0), 4.894961212823059, epsilon = 1e-10);
        let theta = gstime(2458826.5);
        assert!((0.0..DPI).contains(&theta));
    }

    #[test]
    fn test_gstime_afspc_close_to_iau82() {
        // 2000-01-01 00:00 UT
        let epoch = 2451544.5 - 2433281.5;
        let legacy = gstime_afspc(epoch);
        let improved = gstime(2451544.5);
        assert_abs_diff_eq!(legacy, improved, epsilon = 1e-6);
    }

    #[test]
    fn test_tle_epoch_jd() {
        let (jd, fr) = tle_epoch_jd(2019, 343.69339541);
        assert_eq!(jd, 2458826.5);
        assert_eq!(fr, 0.69339541);
    }

    #[test]
    fn test_epoch_iso_round_trip() {
        assert_eq!(
            format_epoch_iso(2019, 343.69339541),
            "2019-12-09T16:38:29.363423"
        );
        let (jd, fr) = parse_epoch_iso("2019-12-09T16:38:29.363423").unwrap();
        assert_eq!(jd, 2458826.5);
        assert_abs_diff_eq!(fr, 0.69339541, epsilon = 1e-11);
        assert!(parse_epoch_iso("2019-13-09T16:38:29").is_err());
        assert!(parse_epoch_iso("not a date").is_err());
    }

    #[test]
    fn test_parse_epoch_rejects_impossible_dates() {
        for text in ["2019-02-30T00:00:00.000000", "2019-02-29T12:00:00.000000"] {
            match parse_epoch_iso(text) {
                Err(Sgp4Error::InvalidEpoch(message)) => assert!(message.starts_with(text)),
                other => panic!("{text} gave {other:?}"),
            }
        }
        // leap year
        assert_eq!(
            parse_epoch_iso("2020-02-29T12:00:00.000000").unwrap(),
            (2458908.5, 0.5)
        );
        assert_eq!(
            parse_epoch_iso("2019-12-09T12:00:00Z").unwrap(),
            (2458826.5, 0.5)
        );
    }

    #[test]
    fn test_epoch_rolls_past_december() {
        // "December 32" of a common year
        let epoch = epoch_from_year_days(2019, 366.5).unwrap();
        let (year, month, day, hour, ..) = epoch.to_gregorian_utc();
        assert_eq!((year, month, day, hour), (2020, 1, 1, 12));
        assert_eq!(format_epoch_iso(2019, 366.5), "2020-01-01T12:00:00.000000");
    }

    #[test]
    fn test_jday_epoch() {
        let epoch = Epoch::from_gregorian_utc(2019, 12, 9, 12, 0, 0, 0);
        assert_eq!(jday_epoch(&epoch), (2458826.5, 0.5));
    }
}
