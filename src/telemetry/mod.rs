//! Run telemetry: event observers and the end-of-run summary.
//!
//! The pipeline publishes a [`SegmentationEvent`] for every frame, window
//! evaluation and extracted segment. [`RunReporter`] folds them into a
//! [`RunSummary`]; [`console::ConsoleDiagnostics`] prints them.

use serde::Serialize;

pub mod console;
pub mod events;

pub use console::ConsoleDiagnostics;
pub use events::SegmentationEvent;

/// Anything that wants to see pipeline events
pub trait SegmentationObserver {
    fn observe(&mut self, event: &SegmentationEvent);
}

/// Records every event; handy for tests and JSON dumps
impl SegmentationObserver for Vec<SegmentationEvent> {
    fn observe(&mut self, event: &SegmentationEvent) {
        self.push(event.clone());
    }
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SegmentationObserver for NoopObserver {
    fn observe(&mut self, _event: &SegmentationEvent) {}
}

/// End-of-run counts and durations
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub frames_processed: u64,
    pub voiced_frames: u64,
    pub windows_evaluated: u64,
    pub windows_rejected: u64,
    pub pitch_rejections: u64,
    pub f1_rejections: u64,
    pub f2_rejections: u64,
    pub segments_extracted: usize,
    /// Sum of `end - start` over extracted segments, in seconds
    pub total_segment_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_segment_seconds: Option<f64>,
}

/// Aggregates pipeline events into a [`RunSummary`]
#[derive(Debug, Default)]
pub struct RunReporter {
    summary: RunSummary,
}

impl RunReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current totals, mean duration included
    pub fn summary(&self) -> RunSummary {
        let mut summary = self.summary.clone();
        summary.mean_segment_seconds = (summary.segments_extracted > 0)
            .then(|| summary.total_segment_seconds / summary.segments_extracted as f64);
        summary
    }
}

impl SegmentationObserver for RunReporter {
    fn observe(&mut self, event: &SegmentationEvent) {
        let summary = &mut self.summary;
        match event {
            SegmentationEvent::FrameIngested { voiced, .. } => {
                summary.frames_processed += 1;
                if *voiced {
                    summary.voiced_frames += 1;
                }
            }
            SegmentationEvent::WindowEvaluated {
                evaluation,
                accepted,
            } => {
                summary.windows_evaluated += 1;
                if !accepted {
                    summary.windows_rejected += 1;
                    summary.pitch_rejections += u64::from(evaluation.failed.pitch);
                    summary.f1_rejections += u64::from(evaluation.failed.f1);
                    summary.f2_rejections += u64::from(evaluation.failed.f2);
                }
            }
            SegmentationEvent::SegmentExtracted {
                start_time_ms,
                end_time_ms,
                ..
            } => {
                summary.segments_extracted += 1;
                summary.total_segment_seconds +=
                    (end_time_ms - start_time_ms) as f64 / 1000.0;
            }
        }
    }
}
