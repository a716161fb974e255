// Configuration error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Configuration error code constants
///
/// Error code range: 2001-2004
pub struct ConfigErrorCodes {}

impl ConfigErrorCodes {
    /// A numeric parameter was zero, negative, or NaN
    pub const NON_POSITIVE: i32 = 2001;

    /// Frames per segment exceeds the engine buffer capacity
    pub const SEGMENT_TOO_LONG: i32 = 2002;

    /// Frames per segment rounds down to zero
    pub const EMPTY_SEGMENT: i32 = 2003;

    /// Configuration file could not be read or decoded
    pub const INVALID_FILE: i32 = 2004;
}

/// Log a configuration error with structured context
pub fn log_config_error(err: &ConfigError, context: &str) {
    error!(
        "Config error in {}: code={}, component=ToleranceConfig, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Configuration errors
///
/// Raised at startup only, before the first frame is read.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Parameter must be strictly positive
    NonPositive { name: &'static str, value: f64 },

    /// Segment would need more frames than the ring buffer holds
    SegmentTooLong { frames: usize, capacity: usize },

    /// Extraction length is shorter than half a time step
    EmptySegment,

    /// Config file unreadable or not valid JSON
    InvalidFile { path: String, reason: String },
}

impl ErrorCode for ConfigError {
    fn code(&self) -> i32 {
        match self {
            ConfigError::NonPositive { .. } => ConfigErrorCodes::NON_POSITIVE,
            ConfigError::SegmentTooLong { .. } => ConfigErrorCodes::SEGMENT_TOO_LONG,
            ConfigError::EmptySegment => ConfigErrorCodes::EMPTY_SEGMENT,
            ConfigError::InvalidFile { .. } => ConfigErrorCodes::INVALID_FILE,
        }
    }

    fn message(&self) -> String {
        match self {
            ConfigError::NonPositive { name, value } => {
                format!("{} must be positive (got {})", name, value)
            }
            ConfigError::SegmentTooLong { frames, capacity } => format!(
                "Segment needs {} frames but the buffer holds only {}",
                frames, capacity
            ),
            ConfigError::EmptySegment => {
                "Extraction length is shorter than one analysis time step".to_string()
            }
            ConfigError::InvalidFile { path, reason } => {
                format!("Invalid config file {}: {}", path, reason)
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConfigError (code {}): {}",
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_codes() {
        assert_eq!(
            ConfigError::NonPositive {
                name: "timeStep",
                value: 0.0
            }
            .code(),
            2001
        );
        assert_eq!(
            ConfigError::SegmentTooLong {
                frames: 500,
                capacity: 100
            }
            .code(),
            2002
        );
        assert_eq!(ConfigError::EmptySegment.code(), 2003);
        assert_eq!(
            ConfigError::InvalidFile {
                path: "x.json".to_string(),
                reason: "eof".to_string()
            }
            .code(),
            2004
        );
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::NonPositive {
            name: "timeStep",
            value: -1.0,
        };
        assert_eq!(err.message(), "timeStep must be positive (got -1)");

        let err = ConfigError::SegmentTooLong {
            frames: 250,
            capacity: 100,
        };
        assert!(err.message().contains("250"));
        assert!(err.to_string().contains("code 2002"));
    }
}
