//! TLE writer.

use std::f64::consts::PI;

use crate::constants::{DPI, MINUTES_PER_DAY, XPDOTP};
use crate::propagation::Satrec;
use crate::sgp4_errors::Sgp4Error;

use super::alpha5::to_alpha5;
use super::checksum::compute_checksum;

/// Check that the angles and eccentricity of a record fit the signless TLE and OMM fields.
///
/// `inclo` must lie in [0, π), `nodeo`, `argpo` and `mo` in [0, 2π). `ecco` must lie in [0, 1)
/// once rounded to the seven digits of its TLE field.
pub fn check_satrec(sat: &Satrec) -> Result<(), Sgp4Error> {
    let ranges = [
        ("argpo", sat.argpo, DPI, "2pi"),
        ("inclo", sat.inclo, PI, "pi"),
        ("mo", sat.mo, DPI, "2pi"),
        ("nodeo", sat.nodeo, DPI, "2pi"),
    ];
    let mut problems: Vec<String> = ranges
        .iter()
        .filter(|(_, value, max, _)| !(0.0..*max).contains(value))
        .map(|(name, value, _, max_name)| {
            format!("  {name} = {value:.6} is outside the range 0 <= {name} < {max_name}")
        })
        .collect();
    if !eccentricity_field(sat.ecco).starts_with("0.") {
        problems.push(format!(
            "  ecco = {:.7} is outside the range 0 <= ecco < 1",
            sat.ecco
        ));
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(Sgp4Error::ElementsOutOfRange(problems.join("\n")))
    }
}

/// Eccentricity rounded to the seven digits written after the implied decimal point.
fn eccentricity_field(ecco: f64) -> String {
    format!("{ecco:.7}")
}

/// Mantissa and exponent of an implied-decimal field, such as ` 38792-4`.
///
/// `zero_exponent` is the text written for a zero exponent: `-0` for the second derivative of
/// the mean motion and `+0` for the drag term.
fn exponent_field(value: f64, zero_exponent: &str) -> String {
    // the leading digit of `d.dddd` becomes the first decimal of `.ddddd`
    let text = format!("{:.4e}", value * 10.0);
    let (mantissa, exponent) = text.split_once('e').unwrap_or((&text, "0"));
    let sign = if mantissa.starts_with('-') { '-' } else { ' ' };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let exponent = if exponent == 0 {
        zero_exponent.to_string()
    } else {
        format!("{exponent:+}")
    };
    format!("{sign}{digits}{exponent}")
}

/// First derivative of the mean motion as `±.NNNNNNNN` (rev/day²).
fn ndot_field(value: f64) -> String {
    let sign = if value < 0.0 { '-' } else { ' ' };
    let text = format!("{:.8}", value.abs());
    let text = text.strip_prefix('0').unwrap_or(&text);
    format!("{sign}{text}")
}

/// Serialize a record back into two TLE lines, checksums included.
///
/// ```
/// use sgp4_kernel::{earth_gravity::GravityModel, propagation::Satrec, tle::export_tle};
///
/// let line1 = "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991";
/// let line2 = "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482";
/// let sat = Satrec::twoline2rv(line1, line2, GravityModel::Wgs72).unwrap();
/// assert_eq!(export_tle(&sat).unwrap(), (line1.to_string(), line2.to_string()));
/// ```
pub fn export_tle(sat: &Satrec) -> Result<(String, String), Sgp4Error> {
    check_satrec(sat)?;
    let satnum = to_alpha5(sat.satnum)?;
    let classification = if sat.classification.is_whitespace() {
        'U'
    } else {
        sat.classification
    };

    let mut line1 = format!(
        "1 {satnum}{classification} {:<8} {:02}{:012.8} {} {} {} {} {:>4}",
        sat.intldesg,
        sat.epochyr,
        sat.epochdays,
        ndot_field(sat.ndot * XPDOTP * MINUTES_PER_DAY),
        exponent_field(sat.nddot * XPDOTP * MINUTES_PER_DAY * MINUTES_PER_DAY, "-0"),
        exponent_field(sat.bstar, "+0"),
        sat.ephtype,
        sat.elnum,
    );
    line1.push_str(&compute_checksum(&line1).to_string());

    let ecc = eccentricity_field(sat.ecco);
    let mut line2 = format!(
        "2 {satnum} {:8.4} {:8.4} {} {:8.4} {:8.4} {:11.8}{:>5}",
        sat.inclo.to_degrees(),
        sat.nodeo.to_degrees(),
        ecc.strip_prefix("0.").unwrap_or(&ecc),
        sat.argpo.to_degrees(),
        sat.mo.to_degrees(),
        sat.no_kozai * XPDOTP,
        sat.revnum,
    );
    line2.push_str(&compute_checksum(&line2).to_string());

    Ok((line1, line2))
}
