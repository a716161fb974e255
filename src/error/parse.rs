// Feature table parse error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Parse error code constants
///
/// Error code range: 1001-1004
pub struct ParseErrorCodes {}

impl ParseErrorCodes {
    /// Row does not conform to the feature table schema
    pub const MALFORMED_RECORD: i32 = 1001;

    /// A field exceeded the maximum field width
    pub const FIELD_TOO_WIDE: i32 = 1002;

    /// The table header does not match the expected header
    pub const HEADER_MISMATCH: i32 = 1003;

    /// The underlying reader failed
    pub const IO: i32 = 1004;
}

/// Log a parse error with structured context
pub fn log_parse_error(err: &ParseError, context: &str) {
    error!(
        "Parse error in {}: code={}, component=FeatureTableReader, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors raised while decoding the feature table
///
/// All of these are fatal for a run: skipping a row would shift every
/// subsequent segment boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Row has the wrong number of fields or a non-numeric field
    MalformedRecord { line: Option<usize>, reason: String },

    /// Field wider than the schema allows (possible data corruption)
    FieldTooWide {
        line: Option<usize>,
        field: &'static str,
        width: usize,
        max: usize,
    },

    /// First line of the table is not the expected header
    HeaderMismatch { found: String },

    /// Reading from the underlying stream failed
    Io { details: String },
}

impl ParseError {
    /// Attach a 1-based line number to a row-level error
    pub fn at_line(self, line_number: usize) -> Self {
        match self {
            ParseError::MalformedRecord { reason, .. } => ParseError::MalformedRecord {
                line: Some(line_number),
                reason,
            },
            ParseError::FieldTooWide {
                field, width, max, ..
            } => ParseError::FieldTooWide {
                line: Some(line_number),
                field,
                width,
                max,
            },
            other => other,
        }
    }

    /// Line number the error refers to, if known
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::MalformedRecord { line, .. } | ParseError::FieldTooWide { line, .. } => {
                *line
            }
            _ => None,
        }
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!(" (line {})", n),
        None => String::new(),
    }
}

impl ErrorCode for ParseError {
    fn code(&self) -> i32 {
        match self {
            ParseError::MalformedRecord { .. } => ParseErrorCodes::MALFORMED_RECORD,
            ParseError::FieldTooWide { .. } => ParseErrorCodes::FIELD_TOO_WIDE,
            ParseError::HeaderMismatch { .. } => ParseErrorCodes::HEADER_MISMATCH,
            ParseError::Io { .. } => ParseErrorCodes::IO,
        }
    }

    fn message(&self) -> String {
        match self {
            ParseError::MalformedRecord { line, reason } => {
                format!("Malformed feature record{}: {}", line_suffix(line), reason)
            }
            ParseError::FieldTooWide {
                line,
                field,
                width,
                max,
            } => format!(
                "Field {} is {} characters wide (max {}){}; data may be corrupt",
                field,
                width,
                max,
                line_suffix(line)
            ),
            ParseError::HeaderMismatch { found } => {
                format!("Feature table header doesn't match: {:?}", found)
            }
            ParseError::Io { details } => format!("Failed to read feature table: {}", details),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ParseError (code {}): {}",
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ParseError {}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        ParseError::Io {
            details: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_codes() {
        assert_eq!(
            ParseError::MalformedRecord {
                line: None,
                reason: "x".to_string()
            }
            .code(),
            ParseErrorCodes::MALFORMED_RECORD
        );
        assert_eq!(
            ParseError::FieldTooWide {
                line: None,
                field: "Pitch",
                width: 20,
                max: 15
            }
            .code(),
            ParseErrorCodes::FIELD_TOO_WIDE
        );
        assert_eq!(
            ParseError::HeaderMismatch {
                found: String::new()
            }
            .code(),
            ParseErrorCodes::HEADER_MISMATCH
        );
        assert_eq!(
            ParseError::Io {
                details: "eof".to_string()
            }
            .code(),
            ParseErrorCodes::IO
        );
    }

    #[test]
    fn test_at_line_attaches_line_number() {
        let err = ParseError::MalformedRecord {
            line: None,
            reason: "too few fields".to_string(),
        }
        .at_line(42);
        assert_eq!(err.line(), Some(42));
        assert!(err.message().contains("(line 42)"));
    }

    #[test]
    fn test_at_line_leaves_header_error_alone() {
        let err = ParseError::HeaderMismatch {
            found: "bad".to_string(),
        }
        .at_line(1);
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_from_io_error() {
        let err: ParseError = std::io::Error::other("disk gone").into();
        match err {
            ParseError::Io { details } => assert!(details.contains("disk gone")),
            _ => panic!("Expected Io"),
        }
    }
}
