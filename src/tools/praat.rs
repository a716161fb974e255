// Praat adapters
//
// Both scripts take positional arguments:
//   features: <source> <table> <time_step> <window> <max_formant>
//   slice:    <source> <dest.wav> <start_s> <end_s>
// The slice script always writes WAV, whatever the source encoding.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::{ToleranceConfig, ToolConfig};
use crate::error::ToolError;
use crate::tools::{seconds_arg, ExternalTool, SliceCutter};

/// Produces the feature table for a sound file
#[derive(Debug, Clone)]
pub struct PraatFeatureAnalyzer {
    praat: ExternalTool,
    script: PathBuf,
}

impl PraatFeatureAnalyzer {
    pub fn new(praat: ExternalTool, script: impl Into<PathBuf>) -> Self {
        Self {
            praat,
            script: script.into(),
        }
    }

    pub fn from_config(tools: &ToolConfig) -> Self {
        Self::new(
            ExternalTool::new(&tools.praat_program, tools.praat_args.clone()),
            &tools.features_script,
        )
    }

    /// Analyse `source` into the table at `table_path`
    pub fn extract(
        &self,
        source: &Path,
        table_path: &Path,
        config: &ToleranceConfig,
    ) -> Result<(), ToolError> {
        tracing::info!(
            "[Praat] Analysing {:?} -> {:?}",
            source,
            table_path
        );
        let args: Vec<OsString> = vec![
            self.script.clone().into(),
            source.into(),
            table_path.into(),
            seconds_arg(config.time_step_seconds).into(),
            seconds_arg(config.window_seconds).into(),
            config.max_formant_hz.to_string().into(),
        ];
        self.praat.run_producing(args, table_path)
    }
}

/// Cuts slices through the Praat slice script
#[derive(Debug, Clone)]
pub struct PraatSliceCutter {
    praat: ExternalTool,
    script: PathBuf,
}

impl PraatSliceCutter {
    pub fn new(praat: ExternalTool, script: impl Into<PathBuf>) -> Self {
        Self {
            praat,
            script: script.into(),
        }
    }

    pub fn from_config(tools: &ToolConfig) -> Self {
        Self::new(
            ExternalTool::new(&tools.praat_program, tools.praat_args.clone()),
            &tools.slice_script,
        )
    }
}

impl SliceCutter for PraatSliceCutter {
    fn cut(
        &self,
        source: &Path,
        dest: &Path,
        start_seconds: f64,
        end_seconds: f64,
    ) -> Result<(), ToolError> {
        let args: Vec<OsString> = vec![
            self.script.clone().into(),
            source.into(),
            dest.into(),
            seconds_arg(start_seconds).into(),
            seconds_arg(end_seconds).into(),
        ];
        self.praat.run_producing(args, dest)
    }
}
