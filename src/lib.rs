// Vowel Segmenter Core
// Streaming search for homogeneous voiced spans in a Praat feature table

// Module declarations
pub mod analysis;
pub mod config;
pub mod error;
pub mod extraction;
pub mod telemetry;
pub mod tools;

// Re-exports for convenience
pub use analysis::{FeatureRecord, FeatureTableReader, SegmentBoundary, SegmentationPipeline};
pub use config::{AppConfig, ToleranceConfig};
pub use error::SegmenterError;
pub use extraction::{DryRunSink, ExtractionSink, FileExtractionSink};
pub use telemetry::{RunSummary, SegmentationObserver};

use tracing::Level;

/// Maximum log level for a `-v` count: 0 warnings, 1 info, 2+ debug
pub fn log_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Install the stderr log subscriber
///
/// `log` records are forwarded too. Calling it again is a no-op.
pub fn init_logging(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_for_verbosity() {
        assert_eq!(log_level(0), Level::WARN);
        assert_eq!(log_level(1), Level::INFO);
        assert_eq!(log_level(2), Level::DEBUG);
        assert_eq!(log_level(9), Level::DEBUG);
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging(0);
        init_logging(2);
    }
}
