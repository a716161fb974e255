// Feature row parser
//
// Decodes one delimited table row into a FeatureRecord. Fields are checked
// against a fixed maximum width before any numeric conversion, so a row
// glued together from two lines (or other corruption) fails loudly instead
// of being truncated into plausible numbers.

use crate::analysis::features::{FeatureRecord, CEPSTRAL_COEFFS};
use crate::error::ParseError;

/// Text the analysis tool writes for an undefined measurement
pub const FIELD_UNDEFINED: &str = "--undefined--";

/// Widest field accepted, in characters
pub const MAX_FIELD_WIDTH: usize = 15;

/// Field separator of the feature table
pub const DEFAULT_DELIMITER: char = ',';

/// Fields through F3 are mandatory
const REQUIRED_FIELDS: usize = 6;

/// Column names in schema order
pub const FIELD_NAMES: [&str; REQUIRED_FIELDS + CEPSTRAL_COEFFS] = [
    "Time", "Intensity", "Pitch", "F1", "F2", "F3", "MFCC1", "MFCC2", "MFCC3", "MFCC4", "MFCC5",
    "MFCC6", "MFCC7", "MFCC8", "MFCC9", "MFCC10", "MFCC11", "MFCC12",
];

/// Parse one feature table row
///
/// # Arguments
/// * `line` - Row text; a trailing `\r` or `\n` is ignored
/// * `delimiter` - Field separator
///
/// # Returns
/// * `Ok(FeatureRecord)` - All required fields decoded; MFCCs captured when
///   all twelve are present
/// * `Err(ParseError::FieldTooWide)` - A field exceeds [`MAX_FIELD_WIDTH`]
/// * `Err(ParseError::MalformedRecord)` - Wrong field count or a field that
///   is not a number
pub fn parse_line(line: &str, delimiter: char) -> Result<FeatureRecord, ParseError> {
    let text = line.trim_end_matches(['\r', '\n']);
    if text.trim().is_empty() {
        return Err(malformed("empty row".to_string()));
    }

    let fields: Vec<&str> = text.split(delimiter).collect();
    if fields.len() < REQUIRED_FIELDS {
        return Err(malformed(format!(
            "expected at least {} fields, found {}",
            REQUIRED_FIELDS,
            fields.len()
        )));
    }
    if fields.len() > FIELD_NAMES.len() {
        return Err(malformed(format!(
            "expected at most {} fields, found {}",
            FIELD_NAMES.len(),
            fields.len()
        )));
    }

    for (field, name) in fields.iter().zip(FIELD_NAMES) {
        let width = field.chars().count();
        if width > MAX_FIELD_WIDTH {
            return Err(ParseError::FieldTooWide {
                line: None,
                field: name,
                width,
                max: MAX_FIELD_WIDTH,
            });
        }
    }

    let time_seconds = field_value(fields[0], FIELD_NAMES[0])?;
    let cepstral = match fields.len() - REQUIRED_FIELDS {
        0 => None,
        CEPSTRAL_COEFFS => {
            let mut coeffs = [0; CEPSTRAL_COEFFS];
            for (slot, (field, name)) in coeffs.iter_mut().zip(
                fields[REQUIRED_FIELDS..]
                    .iter()
                    .zip(&FIELD_NAMES[REQUIRED_FIELDS..]),
            ) {
                *slot = rounded(field_value(field, name)?, name)?;
            }
            Some(coeffs)
        }
        present => {
            return Err(malformed(format!(
                "incomplete cepstral coefficients: {} of {}",
                present, CEPSTRAL_COEFFS
            )))
        }
    };

    Ok(FeatureRecord {
        time_ms: milliseconds(time_seconds)?,
        intensity_db: int_field(fields[1], FIELD_NAMES[1])?,
        pitch_hz: int_field(fields[2], FIELD_NAMES[2])?,
        f1_hz: int_field(fields[3], FIELD_NAMES[3])?,
        f2_hz: int_field(fields[4], FIELD_NAMES[4])?,
        f3_hz: int_field(fields[5], FIELD_NAMES[5])?,
        cepstral,
        line: text.to_string(),
    })
}

/// Decode a single field, mapping the undefined sentinel to zero
fn field_value(field: &str, name: &str) -> Result<f64, ParseError> {
    let text = field.trim();
    if text == FIELD_UNDEFINED {
        return Ok(0.0);
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(malformed(format!("{} is not a number: {:?}", name, text))),
    }
}

fn int_field(field: &str, name: &str) -> Result<i32, ParseError> {
    rounded(field_value(field, name)?, name)
}

/// Round to the nearest integer; values outside `i32` are malformed
fn rounded(value: f64, name: &str) -> Result<i32, ParseError> {
    let value = value.round();
    if value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err(malformed(format!("{} is out of range: {}", name, value)));
    }
    Ok(value as i32)
}

/// Seconds to rounded milliseconds; values outside `i64` are malformed
fn milliseconds(seconds: f64) -> Result<i64, ParseError> {
    let ms = (seconds * 1000.0).round();
    // i64::MAX is not representable, its f64 neighbour is 2^63
    if ms < i64::MIN as f64 || ms >= i64::MAX as f64 {
        return Err(malformed(format!("Time is out of range: {}", seconds)));
    }
    Ok(ms as i64)
}

fn malformed(reason: String) -> ParseError {
    ParseError::MalformedRecord { line: None, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: &str = "0.12,63.8,121.4,512.6,1489.2,2610.0";
    const FULL_ROW: &str =
        "0.14,64,122,515,1492,2603,-310,45,12,-8,3,0,7,-2,1,5,-4,2";

    #[test]
    fn test_parses_required_fields() {
        let record = parse_line(ROW, ',').unwrap();
        assert_eq!(record.time_ms, 120);
        assert_eq!(record.intensity_db, 64);
        assert_eq!(record.pitch_hz, 121);
        assert_eq!(record.f1_hz, 513);
        assert_eq!(record.f2_hz, 1489);
        assert_eq!(record.f3_hz, 2610);
        assert_eq!(record.cepstral, None);
        assert_eq!(record.line, ROW);
    }

    #[test]
    fn test_parsing_is_repeatable() {
        assert_eq!(parse_line(FULL_ROW, ','), parse_line(FULL_ROW, ','));
    }

    #[test]
    fn test_captures_cepstral_coefficients() {
        let record = parse_line(FULL_ROW, ',').unwrap();
        assert_eq!(
            record.cepstral,
            Some([-310, 45, 12, -8, 3, 0, 7, -2, 1, 5, -4, 2])
        );
    }

    #[test]
    fn test_time_rounds_to_nearest_millisecond() {
        // 0.06 * 1000 is 59.999... in binary floating point
        let record = parse_line("0.06,60,120,500,1500,2500", ',').unwrap();
        assert_eq!(record.time_ms, 60);
        let record = parse_line("1.2346,60,120,500,1500,2500", ',').unwrap();
        assert_eq!(record.time_ms, 1235);
    }

    #[test]
    fn test_undefined_sentinel_maps_to_zero() {
        let line = format!(
            "0.5,{u},{u},{u},{u},{u}",
            u = FIELD_UNDEFINED
        );
        let record = parse_line(&line, ',').unwrap();
        assert_eq!(record.intensity_db, 0);
        assert_eq!(record.pitch_hz, 0);
        assert_eq!(record.f1_hz, 0);
        assert_eq!(record.f2_hz, 0);
        assert_eq!(record.f3_hz, 0);
    }

    #[test]
    fn test_undefined_sentinel_in_cepstral_field() {
        let line = FULL_ROW.replacen("-310", FIELD_UNDEFINED, 1);
        let record = parse_line(&line, ',').unwrap();
        assert_eq!(record.cepstral.unwrap()[0], 0);
    }

    #[test]
    fn test_ignores_line_terminators() {
        let record = parse_line("0.02,60,120,500,1500,2500\r\n", ',').unwrap();
        assert_eq!(record.f3_hz, 2500);
        assert_eq!(record.line, "0.02,60,120,500,1500,2500");
    }

    #[test]
    fn test_custom_delimiter() {
        let record = parse_line("0.02\t60\t120\t500\t1500\t2500", '\t').unwrap();
        assert_eq!(record.pitch_hz, 120);
    }

    #[test]
    fn test_too_few_fields() {
        let err = parse_line("0.02,60,120,500,1500", ',').unwrap_err();
        match err {
            ParseError::MalformedRecord { reason, .. } => {
                assert!(reason.contains("at least 6"));
            }
            other => panic!("Expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_too_many_fields() {
        let line = format!("{},9", FULL_ROW);
        assert!(matches!(
            parse_line(&line, ','),
            Err(ParseError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_partial_cepstral_is_malformed() {
        let err = parse_line("0.02,60,120,500,1500,2500,1,2,3", ',').unwrap_err();
        match err {
            ParseError::MalformedRecord { reason, .. } => {
                assert!(reason.contains("3 of 12"));
            }
            other => panic!("Expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_field() {
        let err = parse_line("0.02,60,abc,500,1500,2500", ',').unwrap_err();
        match err {
            ParseError::MalformedRecord { reason, .. } => {
                assert!(reason.contains("Pitch"));
            }
            other => panic!("Expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn test_out_of_range_values_are_malformed() {
        for row in [
            "1e300,60,120,500,1500,2500",
            "0.12,1e300,120,500,1500,2500",
            "0.12,60,-3e9,500,1500,2500",
            "0.12,60,120,500,1500,2500,1,2,3,4,5,6,7,8,9,10,11,5e9",
        ] {
            match parse_line(row, ',') {
                Err(ParseError::MalformedRecord { reason, .. }) => {
                    assert!(reason.contains("out of range"), "{row}: {reason}")
                }
                other => panic!("Expected MalformedRecord for {row}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_largest_intensity_is_accepted() {
        let record = parse_line("0.12,2147483647,120,500,1500,2500", ',').unwrap();
        assert_eq!(record.intensity_db, i32::MAX);
    }

    #[test]
    fn test_empty_field_is_malformed() {
        assert!(matches!(
            parse_line("0.02,60,,500,1500,2500", ','),
            Err(ParseError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_field_too_wide() {
        let err = parse_line("0.02,60,120.00000000000001,500,1500,2500", ',').unwrap_err();
        assert_eq!(
            err,
            ParseError::FieldTooWide {
                line: None,
                field: "Pitch",
                width: 18,
                max: MAX_FIELD_WIDTH,
            }
        );
    }

    #[test]
    fn test_field_at_max_width_is_accepted() {
        // exactly 15 characters
        let record = parse_line("0.0200000000000,60,120,500,1500,2500", ',').unwrap();
        assert_eq!(record.time_ms, 20);
    }

    #[test]
    fn test_empty_row() {
        assert!(matches!(
            parse_line("\n", ','),
            Err(ParseError::MalformedRecord { .. })
        ));
    }
}
