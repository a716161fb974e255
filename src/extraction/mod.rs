// Extraction sinks - where accepted segments go
//
// The pipeline hands every accepted SegmentBoundary to an ExtractionSink and
// waits for it to return. An error ends the run.

pub mod file_sink;
pub mod naming;

pub use file_sink::FileExtractionSink;
pub use naming::SegmentNaming;

use crate::analysis::segmenter::SegmentBoundary;
use crate::error::ExtractionError;

/// Receiver of accepted segments
pub trait ExtractionSink {
    /// Persist one segment before the next frame is read
    fn on_segment_accepted(&mut self, boundary: SegmentBoundary) -> Result<(), ExtractionError>;

    /// Called once after the last frame of a successful run
    fn finish(&mut self) -> Result<(), ExtractionError> {
        Ok(())
    }
}

/// Collects boundaries in memory
impl ExtractionSink for Vec<SegmentBoundary> {
    fn on_segment_accepted(&mut self, boundary: SegmentBoundary) -> Result<(), ExtractionError> {
        self.push(boundary);
        Ok(())
    }
}

/// Logs segments and writes nothing (`--dry-run`)
#[derive(Debug, Default)]
pub struct DryRunSink {
    segments: usize,
}

impl DryRunSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> usize {
        self.segments
    }
}

impl ExtractionSink for DryRunSink {
    fn on_segment_accepted(&mut self, boundary: SegmentBoundary) -> Result<(), ExtractionError> {
        self.segments += 1;
        tracing::info!(
            "[Extraction] Dry run: skipping {} - {} ms ({} frames)",
            boundary.start_time_ms,
            boundary.end_time_ms,
            boundary.frame_count()
        );
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ExtractionError> {
        tracing::info!("[Extraction] Dry run finished, {} segments skipped", self.segments);
        Ok(())
    }
}
