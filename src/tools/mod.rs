// External collaborators - acoustic analysis, slice cutting, transcoding
//
// Every tool runs synchronously on the caller's thread. A tool either leaves
// its output file behind or returns a ToolError; nothing is retried.

pub mod ffmpeg;
pub mod praat;
pub mod wav;

pub use ffmpeg::FfmpegTranscoder;
pub use praat::{PraatFeatureAnalyzer, PraatSliceCutter};
pub use wav::WavSliceCutter;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ToolError;

/// Cuts `[start_seconds, end_seconds]` of `source` into a WAV file at `dest`
pub trait SliceCutter {
    fn cut(
        &self,
        source: &Path,
        dest: &Path,
        start_seconds: f64,
        end_seconds: f64,
    ) -> Result<(), ToolError>;
}

/// Converts `input` into the format implied by `output`
pub trait Transcoder {
    fn transcode(&self, input: &Path, output: &Path) -> Result<(), ToolError>;
}

/// A program plus the arguments that precede every invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalTool {
    program: PathBuf,
    leading_args: Vec<String>,
}

impl ExternalTool {
    pub fn new(program: impl Into<PathBuf>, leading_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            leading_args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Name used in errors and logs
    pub fn name(&self) -> String {
        self.program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    /// Run the program with `args` after the leading arguments and wait
    ///
    /// # Errors
    /// * `ToolError::Spawn` - the program could not be started
    /// * `ToolError::ExitStatus` - it exited unsuccessfully
    pub fn run<I, A>(&self, args: I) -> Result<(), ToolError>
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args);
        cmd.args(args.into_iter().map(Into::into));
        tracing::debug!("[Tools] Running {:?}", cmd);

        let status = cmd.status().map_err(|err| ToolError::Spawn {
            tool: self.name(),
            details: err.to_string(),
        })?;
        if !status.success() {
            return Err(ToolError::ExitStatus {
                tool: self.name(),
                code: status.code(),
            });
        }
        Ok(())
    }

    /// Like [`run`](Self::run), then require `expected` to exist
    pub fn run_producing<I, A>(&self, args: I, expected: &Path) -> Result<(), ToolError>
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.run(args)?;
        if !expected.exists() {
            return Err(ToolError::MissingOutput {
                tool: self.name(),
                path: expected.display().to_string(),
            });
        }
        Ok(())
    }
}

/// Seconds as passed on tool command lines
pub(crate) fn seconds_arg(seconds: f64) -> String {
    format!("{:.6}", seconds)
}
