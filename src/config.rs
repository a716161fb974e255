//! Configuration management for segmentation runs
//!
//! Parameters can come from a JSON file so analysis settings and tool
//! locations can be tuned without recompiling. Command-line flags override
//! whatever the file provides. Every section has defaults matching the
//! classic segmenter settings, so a partial file is enough.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Ring buffer capacity of the segmentation engine, in frames
pub const MAX_BUFFER_FRAMES: usize = 100;

/// Config file looked up in the working directory by [`AppConfig::load`]
pub const DEFAULT_CONFIG_FILE: &str = "segmenter.json";

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub segmentation: ToleranceConfig,
    pub tools: ToolConfig,
    pub extraction: ExtractionConfig,
}

/// Analysis and homogeneity parameters for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToleranceConfig {
    /// Analysis time step in seconds (one feature row per step)
    pub time_step_seconds: f64,
    /// Formant analysis window width in seconds
    pub window_seconds: f64,
    /// Maximum formant in Hz; 5500 suits female voices, 5000 male voices
    pub max_formant_hz: u32,
    /// Maximum allowed % spread of pitch within a segment
    pub pitch_percent_tolerance: f64,
    /// Maximum allowed % spread of F1 within a segment
    pub f1_percent_tolerance: f64,
    /// Maximum allowed % spread of F2 within a segment
    pub f2_percent_tolerance: f64,
    /// Length of every extracted segment in seconds
    pub extraction_seconds: f64,
    /// Frames quieter than this (dB) are unvoiced
    pub minimum_intensity_db: i32,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            time_step_seconds: 0.02,
            window_seconds: 0.25,
            max_formant_hz: 5500,
            pitch_percent_tolerance: 12.0,
            f1_percent_tolerance: 15.0,
            f2_percent_tolerance: 20.0,
            extraction_seconds: 0.5,
            minimum_intensity_db: 55,
        }
    }
}

impl ToleranceConfig {
    /// Number of frames making up one segment, rounded to the nearest frame
    ///
    /// Only meaningful once [`ToleranceConfig::validate`] has passed.
    pub fn frames_per_segment(&self) -> usize {
        (self.extraction_seconds / self.time_step_seconds).round() as usize
    }

    /// Check every parameter and return the derived frames per segment
    ///
    /// # Errors
    /// * `NonPositive` - any time, formant, or tolerance value is <= 0 or NaN
    /// * `EmptySegment` - the segment rounds to zero frames
    /// * `SegmentTooLong` - the segment exceeds [`MAX_BUFFER_FRAMES`]
    pub fn validate(&self) -> Result<usize, ConfigError> {
        ensure_positive("timeStep", self.time_step_seconds)?;
        ensure_positive("windowWidth", self.window_seconds)?;
        ensure_positive("maxFormant", f64::from(self.max_formant_hz))?;
        ensure_positive("pitchPercent", self.pitch_percent_tolerance)?;
        ensure_positive("f1Percent", self.f1_percent_tolerance)?;
        ensure_positive("f2Percent", self.f2_percent_tolerance)?;
        ensure_positive("extractionLength", self.extraction_seconds)?;

        let frames = self.frames_per_segment();
        if frames == 0 {
            return Err(ConfigError::EmptySegment);
        }
        if frames > MAX_BUFFER_FRAMES {
            return Err(ConfigError::SegmentTooLong {
                frames,
                capacity: MAX_BUFFER_FRAMES,
            });
        }
        Ok(frames)
    }
}

fn ensure_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    // NaN fails this comparison too
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

/// Locations and arguments of the external collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Praat executable
    pub praat_program: PathBuf,
    /// Arguments placed before the script path (e.g. `--run`)
    pub praat_args: Vec<String>,
    /// Praat script producing the feature table
    pub features_script: PathBuf,
    /// Praat script cutting a sound slice
    pub slice_script: PathBuf,
    /// ffmpeg executable
    pub ffmpeg_program: PathBuf,
    /// Arguments placed before the ffmpeg input (quiet, overwrite)
    pub ffmpeg_args: Vec<String>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            praat_program: PathBuf::from("praat"),
            praat_args: vec!["--run".to_string()],
            features_script: PathBuf::from("extractFeatures.praat"),
            slice_script: PathBuf::from("extractSoundSlice.praat"),
            ffmpeg_program: PathBuf::from("ffmpeg"),
            ffmpeg_args: vec!["-v".to_string(), "0".to_string(), "-y".to_string()],
        }
    }
}

/// Which collaborator cuts audio slices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutterKind {
    /// Praat slice script; works for any format Praat can open
    Praat,
    /// In-process PCM WAV cutter
    Wav,
}

/// Per-segment extraction behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub cutter: CutterKind,
    /// Convert each WAV slice to MP3 and drop the WAV
    pub transcode: bool,
    /// Extension of the transcoded file
    pub transcode_extension: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            cutter: CutterKind::Praat,
            transcode: true,
            transcode_extension: "mp3".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// * `Ok(AppConfig)` - Loaded configuration (missing keys take defaults)
    /// * `Err(ConfigError::InvalidFile)` - File unreadable or JSON invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| ConfigError::InvalidFile {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let config =
            serde_json::from_str(&contents).map_err(|err| ConfigError::InvalidFile {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;
        log::info!("[Config] Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load `segmenter.json` from the working directory, or use defaults
    pub fn load() -> Self {
        Self::load_or_default(DEFAULT_CONFIG_FILE)
    }

    /// Load `path`, falling back to defaults when it is absent or invalid
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("[Config] No {:?} found, using defaults", path);
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("[Config] {}. Using defaults.", err);
                Self::default()
            }
        }
    }
}
