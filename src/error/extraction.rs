// Extraction and external tool error types

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Extraction error code constants
///
/// Error code ranges: 3001-3003 (extraction), 4001-4004 (external tools)
pub struct ExtractionErrorCodes {}

impl ExtractionErrorCodes {
    /// Segment feature rows could not be written
    pub const PERSIST: i32 = 3001;

    /// An external tool failed while handling the segment
    pub const TOOL: i32 = 3002;

    /// Intermediate artifact could not be removed
    pub const CLEANUP: i32 = 3003;

    /// External tool could not be started
    pub const TOOL_SPAWN: i32 = 4001;

    /// External tool exited unsuccessfully
    pub const TOOL_EXIT_STATUS: i32 = 4002;

    /// External tool succeeded but did not produce its output
    pub const TOOL_MISSING_OUTPUT: i32 = 4003;

    /// In-process tool failed to read its input or write its output
    pub const TOOL_IO: i32 = 4004;
}

/// Log an extraction error with structured context
pub fn log_extraction_error(err: &ExtractionError, context: &str) {
    error!(
        "Extraction error in {}: code={}, component=ExtractionSink, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Failures from invoking an external program (Praat, ffmpeg)
#[derive(Debug, Clone, PartialEq)]
pub enum ToolError {
    /// Program could not be launched at all
    Spawn { tool: String, details: String },

    /// Program ran but reported failure
    ExitStatus { tool: String, code: Option<i32> },

    /// Program reported success but the expected file is absent
    MissingOutput { tool: String, path: String },

    /// In-process tool could not read or write an audio file
    Io {
        tool: String,
        path: String,
        details: String,
    },
}

impl ErrorCode for ToolError {
    fn code(&self) -> i32 {
        match self {
            ToolError::Spawn { .. } => ExtractionErrorCodes::TOOL_SPAWN,
            ToolError::ExitStatus { .. } => ExtractionErrorCodes::TOOL_EXIT_STATUS,
            ToolError::MissingOutput { .. } => ExtractionErrorCodes::TOOL_MISSING_OUTPUT,
            ToolError::Io { .. } => ExtractionErrorCodes::TOOL_IO,
        }
    }

    fn message(&self) -> String {
        match self {
            ToolError::Spawn { tool, details } => {
                format!("Failed to start {}: {}", tool, details)
            }
            ToolError::ExitStatus {
                tool,
                code: Some(code),
            } => format!("{} exited with status {}", tool, code),
            ToolError::ExitStatus { tool, code: None } => {
                format!("{} was terminated by a signal", tool)
            }
            ToolError::MissingOutput { tool, path } => {
                format!("{} did not produce {}", tool, path)
            }
            ToolError::Io {
                tool,
                path,
                details,
            } => format!("{} failed on {}: {}", tool, path, details),
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ToolError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for ToolError {}

/// Extraction sink errors
///
/// The pipeline never retries these; segments emitted before the failure
/// are left on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// Writing or renaming the segment feature table failed
    Persist { path: String, details: String },

    /// Cutting or transcoding the audio slice failed
    Tool(ToolError),

    /// Removing an intermediate file failed
    Cleanup { path: String, details: String },
}

impl ErrorCode for ExtractionError {
    fn code(&self) -> i32 {
        match self {
            ExtractionError::Persist { .. } => ExtractionErrorCodes::PERSIST,
            ExtractionError::Tool(_) => ExtractionErrorCodes::TOOL,
            ExtractionError::Cleanup { .. } => ExtractionErrorCodes::CLEANUP,
        }
    }

    fn message(&self) -> String {
        match self {
            ExtractionError::Persist { path, details } => {
                format!("Failed to persist segment table {}: {}", path, details)
            }
            ExtractionError::Tool(err) => format!("Audio extraction failed: {}", err.message()),
            ExtractionError::Cleanup { path, details } => {
                format!("Failed to remove {}: {}", path, details)
            }
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExtractionError (code {}): {}",
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for ExtractionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractionError::Tool(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ToolError> for ExtractionError {
    fn from(err: ToolError) -> Self {
        ExtractionError::Tool(err)
    }
}
