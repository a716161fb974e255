// Analysis module - single-pass vowel segmentation over a feature table
//
// Architecture:
// - FeatureTableReader: streams FeatureRecords out of the analysis table
// - SegmentationEngine: VoicingClassifier + HomogeneityEvaluator over a ring
//   buffer, one FrameOutcome per frame
// - SegmentationPipeline: drives the engine, hands accepted boundaries to the
//   ExtractionSink and publishes SegmentationEvents to the RunReporter and the
//   caller's observer
//
// Everything runs on the caller's thread. A segment is fully extracted before
// the next row is read.

pub mod features;
pub mod homogeneity;
pub mod segmenter;
pub mod voicing;

pub use features::{FeatureRecord, FeatureTableReader};
pub use homogeneity::{HomogeneityEvaluator, WindowEvaluation};
pub use segmenter::{FrameOutcome, SegmentBoundary, SegmentationEngine};
pub use voicing::VoicingClassifier;

use crate::config::ToleranceConfig;
use crate::error::{
    log_config_error, log_extraction_error, log_parse_error, ConfigError, ParseError,
    SegmenterError,
};
use crate::extraction::ExtractionSink;
use crate::telemetry::{RunReporter, RunSummary, SegmentationEvent, SegmentationObserver};

/// Drives one segmentation run from feature rows to extracted segments
pub struct SegmentationPipeline {
    engine: SegmentationEngine,
    reporter: RunReporter,
}

impl SegmentationPipeline {
    /// Validate `config` and build the engine for it
    pub fn new(config: &ToleranceConfig) -> Result<Self, ConfigError> {
        let engine = SegmentationEngine::from_config(config).map_err(|err| {
            log_config_error(&err, "SegmentationPipeline::new");
            err
        })?;
        tracing::info!(
            "[Pipeline] {} frames per segment, tolerances P={}% F1={}% F2={}%, min intensity {} dB",
            engine.frames_per_segment(),
            config.pitch_percent_tolerance,
            config.f1_percent_tolerance,
            config.f2_percent_tolerance,
            engine.voicing().minimum_intensity_db()
        );
        Ok(Self {
            engine,
            reporter: RunReporter::new(),
        })
    }

    pub fn frames_per_segment(&self) -> usize {
        self.engine.frames_per_segment()
    }

    /// Totals of everything processed so far
    pub fn summary(&self) -> RunSummary {
        self.reporter.summary()
    }

    /// Consume `rows` until exhausted or a fatal error occurs
    ///
    /// Accepted boundaries are passed to `sink` before the next row is read.
    /// `sink.finish()` runs only when the whole stream was processed.
    ///
    /// # Errors
    /// * `SegmenterError::Parse` - a row could not be decoded
    /// * `SegmenterError::Extraction` - the sink failed; earlier segments stay
    pub fn run<I, S, O>(
        &mut self,
        rows: I,
        sink: &mut S,
        observer: &mut O,
    ) -> Result<RunSummary, SegmenterError>
    where
        I: IntoIterator<Item = Result<FeatureRecord, ParseError>>,
        S: ExtractionSink + ?Sized,
        O: SegmentationObserver + ?Sized,
    {
        tracing::info!("[Pipeline] Starting segmentation run");

        for row in rows {
            let record = row.map_err(|err| {
                log_parse_error(&err, "SegmentationPipeline::run");
                err
            })?;
            self.push_frame(record, sink, observer)?;
        }

        sink.finish().map_err(|err| {
            log_extraction_error(&err, "SegmentationPipeline::run");
            err
        })?;

        let summary = self.reporter.summary();
        tracing::info!(
            "[Pipeline] Finished: {} frames, {} segments",
            summary.frames_processed,
            summary.segments_extracted
        );
        Ok(summary)
    }

    fn push_frame<S, O>(
        &mut self,
        record: FeatureRecord,
        sink: &mut S,
        observer: &mut O,
    ) -> Result<(), SegmenterError>
    where
        S: ExtractionSink + ?Sized,
        O: SegmentationObserver + ?Sized,
    {
        let index = self.engine.frames_seen();
        let (time_ms, pitch_hz, f1_hz, f2_hz) =
            (record.time_ms, record.pitch_hz, record.f1_hz, record.f2_hz);

        let outcome = self.engine.push(record);
        self.publish(
            observer,
            SegmentationEvent::FrameIngested {
                index,
                time_ms,
                pitch_hz,
                f1_hz,
                f2_hz,
                voiced: outcome != FrameOutcome::Unvoiced,
                active_count: self.engine.active_count(),
            },
        );

        match outcome {
            FrameOutcome::Unvoiced | FrameOutcome::Accumulating { .. } => {}
            FrameOutcome::Rejected { evaluation } => {
                tracing::debug!(
                    "[Pipeline] Window at {} ms rejected [{}]",
                    evaluation.start_time_ms,
                    evaluation.failed.label()
                );
                self.publish(
                    observer,
                    SegmentationEvent::WindowEvaluated {
                        evaluation,
                        accepted: false,
                    },
                );
            }
            FrameOutcome::Accepted {
                boundary,
                evaluation,
            } => {
                self.publish(
                    observer,
                    SegmentationEvent::WindowEvaluated {
                        evaluation,
                        accepted: true,
                    },
                );

                let extracted = SegmentationEvent::SegmentExtracted {
                    start_time_ms: boundary.start_time_ms,
                    end_time_ms: boundary.end_time_ms,
                    frame_count: boundary.frame_count(),
                };
                tracing::debug!(
                    "[Pipeline] Segment accepted {} - {} ms",
                    boundary.start_time_ms,
                    boundary.end_time_ms
                );
                sink.on_segment_accepted(boundary).map_err(|err| {
                    log_extraction_error(&err, "SegmentationPipeline::push_frame");
                    err
                })?;
                self.publish(observer, extracted);
            }
        }
        Ok(())
    }

    fn publish<O>(&mut self, observer: &mut O, event: SegmentationEvent)
    where
        O: SegmentationObserver + ?Sized,
    {
        self.reporter.observe(&event);
        observer.observe(&event);
    }
}
