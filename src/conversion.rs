//! Sexagesimal sky coordinates.
//!
//! Lookup services report right ascension and declination as strings, in several
//! flavours (`"12h30m49.4s"`, `"12 30 49.4"`, `"12:30:49.4"`, `"+12d23m28s"`, or plain
//! decimal degrees). This module parses them into degrees and formats degrees back into
//! the space-separated `hh mm ss.s` / `±dd mm ss.s` notation used in reports and chart
//! requests.
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{Degree, HOUR_TO_DEG};
use crate::obsnight_errors::ObsNightError;

static SEXAGESIMAL_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[hdm:°'"s]"#).expect("separator pattern is valid"));

/// Split a sexagesimal string into its sign and up to three numeric fields.
///
/// Unit letters and colons are treated as separators so `"12h30m49.4s"` and
/// `"12 30 49.4"` yield the same fields.
fn split_sexagesimal(raw: &str) -> Option<(f64, Vec<f64>)> {
    let trimmed = raw.trim();
    let sign = if trimmed.starts_with('-') { -1.0 } else { 1.0 };
    let unsigned = trimmed.trim_start_matches(['-', '+']);

    let normalized = SEXAGESIMAL_SEPARATORS.replace_all(unsigned, " ");
    let fields = normalized
        .split_whitespace()
        .map(|f| f.parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;

    if fields.is_empty() || fields.len() > 3 {
        return None;
    }
    if fields.iter().skip(1).any(|v| *v < 0.0 || *v >= 60.0) {
        return None;
    }
    Some((sign, fields))
}

fn fold_sexagesimal(fields: &[f64]) -> f64 {
    fields
        .iter()
        .zip([1.0, 60.0, 3600.0])
        .map(|(v, div)| v / div)
        .sum()
}

/// Parse a right ascension string to degrees.
///
/// A single field is read as decimal degrees; two or three fields as hours, minutes,
/// seconds.
///
/// Arguments
/// ---------
/// * `ra`: e.g. `"12h30m49.4s"`, `"12 30 49.4"` or `"187.7059"`
///
/// Return
/// ------
/// * right ascension in degrees within `[0, 360)`, or [`ObsNightError::InvalidCoordinate`]
pub fn parse_ra_to_deg(ra: &str) -> Result<Degree, ObsNightError> {
    let invalid = || ObsNightError::InvalidCoordinate(format!("right ascension {ra:?}"));
    let (sign, fields) = split_sexagesimal(ra).ok_or_else(invalid)?;
    if sign < 0.0 {
        return Err(invalid());
    }

    let deg = if fields.len() == 1 {
        fields[0]
    } else {
        fold_sexagesimal(&fields) * HOUR_TO_DEG
    };

    if !(0.0..360.0).contains(&deg) {
        return Err(invalid());
    }
    Ok(deg)
}

/// Parse a declination string to degrees.
///
/// Arguments
/// ---------
/// * `dec`: e.g. `"+12d23m28s"`, `"-00 30 14.2"` or `"12.3911"`
///
/// Return
/// ------
/// * declination in degrees within `[-90, 90]`, or [`ObsNightError::InvalidCoordinate`]
pub fn parse_dec_to_deg(dec: &str) -> Result<Degree, ObsNightError> {
    let invalid = || ObsNightError::InvalidCoordinate(format!("declination {dec:?}"));
    let (sign, fields) = split_sexagesimal(dec).ok_or_else(invalid)?;

    let deg = sign * fold_sexagesimal(&fields);
    if !(-90.0..=90.0).contains(&deg) {
        return Err(invalid());
    }
    Ok(deg)
}

/// Split a non-negative value into whole units, minutes and tenths of seconds,
/// carrying any rounding overflow upward.
fn to_sexagesimal_tenths(value: f64) -> (u64, u64, f64) {
    let tenths = (value * 36_000.0).round() as u64;
    let units = tenths / 36_000;
    let minutes = (tenths % 36_000) / 600;
    let seconds = (tenths % 600) as f64 / 10.0;
    (units, minutes, seconds)
}

/// Format a right ascension in degrees as `hh mm ss.s`.
pub fn format_ra_hms(ra: Degree) -> String {
    let hours = ra.rem_euclid(360.0) / HOUR_TO_DEG;
    let (h, m, s) = to_sexagesimal_tenths(hours);
    format!("{:02} {:02} {:04.1}", h % 24, m, s)
}

/// Format a declination in degrees as `±dd mm ss.s` (sign always shown).
pub fn format_dec_dms(dec: Degree) -> String {
    let sign = if dec < 0.0 { '-' } else { '+' };
    let (d, m, s) = to_sexagesimal_tenths(dec.abs());
    format!("{sign}{d:02} {m:02} {s:04.1}")
}

#[cfg(test)]
mod conversion_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ra_to_deg() {
        assert_relative_eq!(parse_ra_to_deg("22 52 23.37").unwrap(), 343.097375);
        assert_relative_eq!(parse_ra_to_deg("12h30m49.4s").unwrap(), 187.705833333, epsilon = 1e-8);
        assert_relative_eq!(parse_ra_to_deg("12:30:49.4").unwrap(), 187.705833333, epsilon = 1e-8);
        assert_relative_eq!(parse_ra_to_deg("187.7059").unwrap(), 187.7059);

        assert!(parse_ra_to_deg("1 2 3.4.5").is_err());
        assert!(parse_ra_to_deg("12 75 00").is_err());
        assert!(parse_ra_to_deg("-01 00 00").is_err());
        assert!(parse_ra_to_deg("").is_err());
    }

    #[test]
    fn test_dec_to_deg() {
        assert_relative_eq!(
            parse_dec_to_deg("-00 30 14.2").unwrap(),
            -0.5039444444444444
        );
        assert_relative_eq!(
            parse_dec_to_deg("+12d23m28s").unwrap(),
            12.391111111,
            epsilon = 1e-8
        );
        assert_relative_eq!(parse_dec_to_deg("-14.25").unwrap(), -14.25);

        assert!(parse_dec_to_deg("95 00 00").is_err());
        assert!(parse_dec_to_deg("89 15").is_ok());
        assert!(parse_dec_to_deg("abc").is_err());
    }

    #[test]
    fn test_format_ra() {
        assert_eq!(format_ra_hms(187.705833333), "12 30 49.4");
        assert_eq!(format_ra_hms(0.0), "00 00 00.0");
        // 23h59m59.99s rounds up to the next hour and wraps
        assert_eq!(format_ra_hms(359.99999), "00 00 00.0");
    }

    #[test]
    fn test_format_dec() {
        assert_eq!(format_dec_dms(12.391111111), "+12 23 28.0");
        assert_eq!(format_dec_dms(-0.5039444444444444), "-00 30 14.2");
        assert_eq!(format_dec_dms(0.0), "+00 00 00.0");
    }
}
