//! Alpha-5 satellite numbers.
//!
//! Numbers from 100000 to 339999 are written in the five TLE columns as a letter followed by
//! four digits. The letter counts tens of thousands from 10 (`A`) and skips `I` and `O`:
//! `E8493` is 148493 and `Z9999` is 339999.

use crate::sgp4_errors::Sgp4Error;

/// Largest satellite number representable in Alpha-5.
pub const MAX_ALPHA5: u32 = 339_999;

/// Encode a satellite number into the five TLE columns.
pub fn to_alpha5(satnum: u32) -> Result<String, Sgp4Error> {
    if satnum < 100_000 {
        return Ok(format!("{satnum:05}"));
    }
    if satnum > MAX_ALPHA5 {
        return Err(Sgp4Error::SatelliteNumberTooLarge(satnum));
    }
    let mut letter = b'A' + (satnum / 10_000 - 10) as u8;
    if letter >= b'I' {
        letter += 1;
    }
    if letter >= b'O' {
        letter += 1;
    }
    Ok(format!("{}{:04}", letter as char, satnum % 10_000))
}

/// Decode the five TLE columns of a satellite number, plain digits or Alpha-5.
pub fn from_alpha5(field: &str) -> Result<u32, Sgp4Error> {
    let field = field.trim();
    let invalid = || Sgp4Error::InvalidAlpha5(field.to_string());

    let mut chars = field.chars();
    let first = chars.next().ok_or_else(invalid)?;
    if !first.is_ascii_alphabetic() {
        return Ok(field.parse()?);
    }

    let letter = first.to_ascii_uppercase();
    if letter == 'I' || letter == 'O' {
        return Err(invalid());
    }
    let mut tens = (letter as u32 - 'A' as u32) + 10;
    if letter > 'I' {
        tens -= 1;
    }
    if letter > 'O' {
        tens -= 1;
    }

    let rest = chars.as_str();
    if rest.len() != 4 || !rest.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    Ok(tens * 10_000 + rest.parse::<u32>()?)
}
