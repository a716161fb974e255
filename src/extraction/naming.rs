// Artifact paths for one run
//
// Everything is derived from the base path, the source path with its
// extension removed: `voice.wav` gives `voice.txt` for the full table,
// `voice_TEMP.txt` for the working file and `voice_<start>_<end>.*` (times
// in ms) for each segment.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension of feature tables
pub const TABLE_EXTENSION: &str = "txt";
/// Extension of cut audio slices
pub const SLICE_EXTENSION: &str = "wav";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentNaming {
    base: PathBuf,
}

impl SegmentNaming {
    /// Base path of `source` (extension removed)
    pub fn for_source(source: &Path) -> Self {
        Self {
            base: source.with_extension(""),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn with_suffix(&self, suffix: &str, extension: &str) -> PathBuf {
        let mut name: OsString = self.base.clone().into_os_string();
        name.push(suffix);
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    }

    /// Feature table of the whole source, `<base>.txt`
    pub fn feature_table(&self) -> PathBuf {
        self.with_suffix("", TABLE_EXTENSION)
    }

    /// Working file for the segment in progress, `<base>_TEMP.txt`
    pub fn working_table(&self) -> PathBuf {
        self.with_suffix("_TEMP", TABLE_EXTENSION)
    }

    /// `<base>_<start>_<end>.<extension>`
    pub fn segment_file(&self, start_time_ms: i64, end_time_ms: i64, extension: &str) -> PathBuf {
        self.with_suffix(&format!("_{}_{}", start_time_ms, end_time_ms), extension)
    }

    pub fn segment_table(&self, start_time_ms: i64, end_time_ms: i64) -> PathBuf {
        self.segment_file(start_time_ms, end_time_ms, TABLE_EXTENSION)
    }

    pub fn segment_slice(&self, start_time_ms: i64, end_time_ms: i64) -> PathBuf {
        self.segment_file(start_time_ms, end_time_ms, SLICE_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_from_source() {
        let naming = SegmentNaming::for_source(Path::new("/data/voice.wav"));
        assert_eq!(naming.base(), Path::new("/data/voice"));
        assert_eq!(naming.feature_table(), Path::new("/data/voice.txt"));
        assert_eq!(naming.working_table(), Path::new("/data/voice_TEMP.txt"));
        assert_eq!(
            naming.segment_table(1020, 1500),
            Path::new("/data/voice_1020_1500.txt")
        );
        assert_eq!(
            naming.segment_slice(1020, 1500),
            Path::new("/data/voice_1020_1500.wav")
        );
        assert_eq!(
            naming.segment_file(0, 480, "mp3"),
            Path::new("/data/voice_0_480.mp3")
        );
    }

    #[test]
    fn test_only_last_extension_is_removed() {
        let naming = SegmentNaming::for_source(Path::new("take.2.mp3"));
        assert_eq!(naming.feature_table(), Path::new("take.2.txt"));
    }

    #[test]
    fn test_source_without_extension() {
        let naming = SegmentNaming::for_source(Path::new("voice"));
        assert_eq!(naming.working_table(), Path::new("voice_TEMP.txt"));
    }
}
