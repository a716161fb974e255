// Error types for the vowel segmenter
//
// Each area (parsing, configuration, extraction) owns an error enum with its
// own numeric code range. `SegmenterError` is the union that crosses layers.

mod config;
mod extraction;
mod parse;

pub use config::{log_config_error, ConfigError, ConfigErrorCodes};
pub use extraction::{log_extraction_error, ExtractionError, ExtractionErrorCodes, ToolError};
pub use parse::{log_parse_error, ParseError, ParseErrorCodes};

use std::fmt;

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

/// Any fatal error that ends a segmentation run
#[derive(Debug, Clone, PartialEq)]
pub enum SegmenterError {
    Config(ConfigError),
    Parse(ParseError),
    Extraction(ExtractionError),
    /// The acoustic analysis tool failed to produce the feature table
    FeatureAnalysis(ToolError),
}

impl ErrorCode for SegmenterError {
    fn code(&self) -> i32 {
        match self {
            SegmenterError::Config(err) => err.code(),
            SegmenterError::Parse(err) => err.code(),
            SegmenterError::Extraction(err) => err.code(),
            SegmenterError::FeatureAnalysis(err) => err.code(),
        }
    }

    fn message(&self) -> String {
        match self {
            SegmenterError::Config(err) => err.message(),
            SegmenterError::Parse(err) => err.message(),
            SegmenterError::Extraction(err) => err.message(),
            SegmenterError::FeatureAnalysis(err) => {
                format!("Feature analysis failed: {}", err.message())
            }
        }
    }
}

impl fmt::Display for SegmenterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmenterError::Config(err) => err.fmt(f),
            SegmenterError::Parse(err) => err.fmt(f),
            SegmenterError::Extraction(err) => err.fmt(f),
            SegmenterError::FeatureAnalysis(err) => write!(f, "Feature analysis failed: {}", err),
        }
    }
}

impl std::error::Error for SegmenterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SegmenterError::Config(err) => Some(err),
            SegmenterError::Parse(err) => Some(err),
            SegmenterError::Extraction(err) => Some(err),
            SegmenterError::FeatureAnalysis(err) => Some(err),
        }
    }
}

impl From<ConfigError> for SegmenterError {
    fn from(err: ConfigError) -> Self {
        SegmenterError::Config(err)
    }
}

impl From<ParseError> for SegmenterError {
    fn from(err: ParseError) -> Self {
        SegmenterError::Parse(err)
    }
}

impl From<ExtractionError> for SegmenterError {
    fn from(err: ExtractionError) -> Self {
        SegmenterError::Extraction(err)
    }
}
