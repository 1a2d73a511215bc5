//! Modulo-10 checksum of TLE lines.
//!
//! The checksum is the sum of the digits of the first 68 columns, each minus sign counting as 1,
//! modulo 10. It is written in column 69.

use crate::sgp4_errors::Sgp4Error;

/// Number of columns covered by the checksum.
const CHECKSUM_COLUMNS: usize = 68;

/// Compute the checksum digit of a TLE line.
///
/// ```
/// use sgp4_kernel::tle::compute_checksum;
/// let line = "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991";
/// assert_eq!(compute_checksum(line), 1);
/// ```
pub fn compute_checksum(line: &str) -> u32 {
    let total: u32 = line
        .chars()
        .take(CHECKSUM_COLUMNS)
        .map(|c| match c {
            '-' => 1,
            c => c.to_digit(10).unwrap_or(0),
        })
        .sum();
    total % 10
}

/// Check the trailing checksum digit of each line.
///
/// Lines without a digit in column 69 are accepted as they carry no checksum.
pub fn verify_checksum(lines: &[&str]) -> Result<(), Sgp4Error> {
    for line in lines {
        let Some(given) = line
            .chars()
            .nth(CHECKSUM_COLUMNS)
            .and_then(|c| c.to_digit(10))
        else {
            continue;
        };
        let computed = compute_checksum(line);
        if given != computed {
            return Err(Sgp4Error::ChecksumMismatch {
                given,
                computed,
                line: line.to_string(),
            });
        }
    }
    Ok(())
}

/// Return a copy of `line` with the correct checksum in column 69.
///
/// Any existing checksum is discarded and short lines are padded with spaces.
pub fn fix_checksum(line: &str) -> String {
    let body: String = line.chars().take(CHECKSUM_COLUMNS).collect();
    format!("{body:<68}{}", compute_checksum(&body))
}

#[cfg(test)]
mod checksum_test {
    use super::*;

    const ISS_LINE1: &str =
        "1 25544U 98067A   19343.69339541  .00001764  00000-0  38792-4 0  9991";
    const ISS_LINE2: &str =
        "2 25544  51.6439 211.2001 0007417  17.6667  85.6398 15.50103472202482";

    #[test]
    fn test_compute_checksum() {
        assert_eq!(compute_checksum(ISS_LINE1), 1);
        assert_eq!(compute_checksum(ISS_LINE2), 2);
        // minus signs count as one
        assert_eq!(compute_checksum("--"), 2);
    }

    #[test]
    fn test_verify_checksum() {
        assert!(verify_checksum(&[ISS_LINE1, ISS_LINE2]).is_ok());

        let bad = format!("{}7", &ISS_LINE2[..68]);
        assert_eq!(
            verify_checksum(&[ISS_LINE1, &bad]),
            Err(Sgp4Error::ChecksumMismatch {
                given: 7,
                computed: 2,
                line: bad.clone(),
            })
        );

        // no checksum column
        assert!(verify_checksum(&[&ISS_LINE1[..68]]).is_ok());
    }

    #[test]
    fn test_fix_checksum() {
        let broken = format!("{}0", &ISS_LINE1[..68]);
        assert_eq!(fix_checksum(&broken), ISS_LINE1);
        assert_eq!(fix_checksum("1 2"), format!("{:<68}3", "1 2"));
    }
}
