//! Event types published by the segmentation pipeline to reporters and
//! console diagnostics.

use serde::Serialize;

use crate::analysis::homogeneity::WindowEvaluation;

/// One observable step of a segmentation run
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum SegmentationEvent {
    /// A frame entered the engine
    FrameIngested {
        /// Zero-based position in the stream
        index: u64,
        time_ms: i64,
        pitch_hz: i32,
        f1_hz: i32,
        f2_hz: i32,
        voiced: bool,
        /// Fill count after the engine processed the frame
        active_count: usize,
    },
    /// A full window was tested for homogeneity
    WindowEvaluated {
        evaluation: WindowEvaluation,
        accepted: bool,
    },
    /// The extraction sink accepted a segment
    SegmentExtracted {
        start_time_ms: i64,
        end_time_ms: i64,
        frame_count: usize,
    },
}
