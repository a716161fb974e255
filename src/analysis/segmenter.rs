// SegmentationEngine - sliding-window search for homogeneous voiced spans
//
// Frames are pushed one at a time. The engine keeps the most recent
// `frames_per_segment` frames in a fixed ring buffer and counts how many of
// them belong to the current run of voiced frames (`active_count`).
//
// Per frame:
// 1. Store the frame at `frame_index % frames_per_segment`
// 2. Unvoiced frame: drop the whole candidate (`active_count = 0`)
//    Voiced frame: `active_count += 1`
// 3. Once `active_count == frames_per_segment`, evaluate the window
// 4. Homogeneous: emit a SegmentBoundary and start over at the next frame
// 5. Not homogeneous: `active_count -= 1`, so the next voiced frame slides
//    the window forward by one and it is evaluated again
//
// An unvoiced frame is a hard reset; a failed homogeneity test only drops
// the oldest frame.

use serde::Serialize;

use crate::analysis::features::FeatureRecord;
use crate::analysis::homogeneity::{HomogeneityEvaluator, WindowEvaluation};
use crate::analysis::voicing::VoicingClassifier;
use crate::config::{ToleranceConfig, MAX_BUFFER_FRAMES};
use crate::error::ConfigError;

/// An accepted window: time span plus the frames it covers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentBoundary {
    /// Time of the window's first frame
    pub start_time_ms: i64,
    /// Time of the window's last frame
    pub end_time_ms: i64,
    /// Frames in stream order
    #[serde(skip)]
    pub records: Vec<FeatureRecord>,
}

impl SegmentBoundary {
    pub fn duration_ms(&self) -> i64 {
        self.end_time_ms - self.start_time_ms
    }

    pub fn start_seconds(&self) -> f64 {
        self.start_time_ms as f64 / 1000.0
    }

    pub fn end_seconds(&self) -> f64 {
        self.end_time_ms as f64 / 1000.0
    }

    pub fn frame_count(&self) -> usize {
        self.records.len()
    }
}

/// What happened to the candidate window after one frame
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Frame was unvoiced; the candidate was discarded
    Unvoiced,
    /// Frame was voiced but the window is not full yet
    Accumulating { active_count: usize },
    /// Window was full but not homogeneous; oldest frame dropped
    Rejected { evaluation: WindowEvaluation },
    /// Window was full and homogeneous
    Accepted {
        boundary: SegmentBoundary,
        evaluation: WindowEvaluation,
    },
}

/// Single-pass segmentation state machine over a bounded ring buffer
pub struct SegmentationEngine {
    buffer: [Option<FeatureRecord>; MAX_BUFFER_FRAMES],
    frames_per_segment: usize,
    active_count: usize,
    frames_seen: u64,
    voicing: VoicingClassifier,
    evaluator: HomogeneityEvaluator,
}

impl SegmentationEngine {
    /// Create an engine for windows of `frames_per_segment` frames
    ///
    /// # Errors
    /// * `EmptySegment` - `frames_per_segment` is zero
    /// * `SegmentTooLong` - `frames_per_segment` exceeds [`MAX_BUFFER_FRAMES`]
    pub fn new(
        frames_per_segment: usize,
        voicing: VoicingClassifier,
        evaluator: HomogeneityEvaluator,
    ) -> Result<Self, ConfigError> {
        if frames_per_segment == 0 {
            return Err(ConfigError::EmptySegment);
        }
        if frames_per_segment > MAX_BUFFER_FRAMES {
            return Err(ConfigError::SegmentTooLong {
                frames: frames_per_segment,
                capacity: MAX_BUFFER_FRAMES,
            });
        }

        Ok(Self {
            buffer: std::array::from_fn(|_| None),
            frames_per_segment,
            active_count: 0,
            frames_seen: 0,
            voicing,
            evaluator,
        })
    }

    /// Validate `config` and build the engine it describes
    pub fn from_config(config: &ToleranceConfig) -> Result<Self, ConfigError> {
        let frames_per_segment = config.validate()?;
        Self::new(
            frames_per_segment,
            VoicingClassifier::from_config(config),
            HomogeneityEvaluator::from_config(config),
        )
    }

    /// Feed the next frame of the stream
    pub fn push(&mut self, record: FeatureRecord) -> FrameOutcome {
        let slot = (self.frames_seen % self.frames_per_segment as u64) as usize;
        let voiced = self.voicing.is_voiced(&record);
        self.buffer[slot] = Some(record);
        self.frames_seen += 1;

        if !voiced {
            self.active_count = 0;
            return FrameOutcome::Unvoiced;
        }

        self.active_count = (self.active_count + 1).min(self.frames_per_segment);
        if self.active_count < self.frames_per_segment {
            return FrameOutcome::Accumulating {
                active_count: self.active_count,
            };
        }

        let evaluation = self.evaluator.evaluate(self.window());
        if evaluation.is_acceptable() {
            let records: Vec<FeatureRecord> = self.window().cloned().collect();
            let boundary = SegmentBoundary {
                start_time_ms: records.first().map_or(0, |r| r.time_ms),
                end_time_ms: records.last().map_or(0, |r| r.time_ms),
                records,
            };
            self.active_count = 0;
            FrameOutcome::Accepted {
                boundary,
                evaluation,
            }
        } else {
            self.active_count -= 1;
            FrameOutcome::Rejected { evaluation }
        }
    }

    /// Buffered frames, oldest first
    ///
    /// The oldest frame sits in the slot the next push will overwrite.
    fn window(&self) -> impl Iterator<Item = &FeatureRecord> + '_ {
        let start = (self.frames_seen % self.frames_per_segment as u64) as usize;
        let len = self.frames_per_segment;
        (0..len).filter_map(move |offset| self.buffer[(start + offset) % len].as_ref())
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    pub fn frames_per_segment(&self) -> usize {
        self.frames_per_segment
    }

    pub fn voicing(&self) -> &VoicingClassifier {
        &self.voicing
    }
}
