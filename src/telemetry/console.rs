//! Human-readable run diagnostics.
//!
//! Every line is produced by a pure formatting function taking explicit
//! parameters; [`ConsoleDiagnostics`] only decides, from the verbosity
//! level, which lines to write.

use std::io::Write;

use crate::analysis::homogeneity::WindowEvaluation;
use crate::telemetry::{RunSummary, SegmentationEvent, SegmentationObserver};

/// Verbosity at which accepted windows and the config banner are shown
pub const VERBOSITY_BASIC: u8 = 1;
/// Verbosity at which every frame and every evaluation is shown
pub const VERBOSITY_LINES: u8 = 2;

/// Time step and segment length banner
pub fn format_config_banner(time_step_seconds: f64, frames_per_segment: usize) -> String {
    format!(
        "Analysis time step: {}\nPoints per segment: {} ({} seconds)",
        time_step_seconds,
        frames_per_segment,
        frames_per_segment as f64 * time_step_seconds
    )
}

/// One line per ingested frame
pub fn format_frame_line(
    index: u64,
    time_ms: i64,
    pitch_hz: i32,
    f1_hz: i32,
    f2_hz: i32,
    voiced: bool,
) -> String {
    format!(
        "LINE {} : (t){}, (p){}, (f1){}, (f2){} : ({})",
        index,
        time_ms,
        pitch_hz,
        f1_hz,
        f2_hz,
        if voiced { "voiced" } else { "UNVOICED" }
    )
}

/// Spread of each dimension plus the failure label
pub fn format_window_evaluation(evaluation: &WindowEvaluation) -> String {
    format!(
        "{:>9}: [{}] P:[{},{}]({:.1}) F1:[{},{}]({:.1}) F2:[{},{}]({:.1})",
        evaluation.start_time_ms,
        evaluation.failed.label(),
        evaluation.pitch.min,
        evaluation.pitch.max,
        evaluation.pitch.percent,
        evaluation.f1.min,
        evaluation.f1.max,
        evaluation.f1.percent,
        evaluation.f2.min,
        evaluation.f2.max,
        evaluation.f2.percent,
    )
}

/// Announcement of an extracted segment, times in seconds
pub fn format_extract_line(start_time_ms: i64, end_time_ms: i64) -> String {
    let start = start_time_ms as f64 / 1000.0;
    let end = end_time_ms as f64 / 1000.0;
    format!("EXTRACT:{:>7.3} to{:>7.3} ({:.3}s)", start, end, end - start)
}

/// Closing lines of a run
pub fn format_summary(summary: &RunSummary) -> String {
    let mut text = format!("done processing {} lines\n", summary.frames_processed);
    match summary.mean_segment_seconds {
        Some(mean) => text.push_str(&format!(
            "extracted {} segments with mean duration {:.3} seconds",
            summary.segments_extracted, mean
        )),
        None => text.push_str("extracted NO segments"),
    }
    text
}

/// Detailed counters, one per line
pub fn format_summary_table(summary: &RunSummary) -> String {
    let mut lines = vec![
        format!("Frames processed         : {}", summary.frames_processed),
        format!("Voiced frames            : {}", summary.voiced_frames),
        format!(
            "Windows evaluated        : {} ({} rejected)",
            summary.windows_evaluated, summary.windows_rejected
        ),
        format!(
            "Rejections P/F1/F2       : {} / {} / {}",
            summary.pitch_rejections, summary.f1_rejections, summary.f2_rejections
        ),
        format!("Segments extracted       : {}", summary.segments_extracted),
    ];
    match summary.mean_segment_seconds {
        Some(mean) => lines.push(format!(
            "Segment duration total   : {:.3} s (mean {:.3} s)",
            summary.total_segment_seconds, mean
        )),
        None => lines.push("Segment duration total   : n/a".to_string()),
    }
    lines.join("\n")
}

/// Observer writing diagnostics lines for the chosen verbosity
///
/// * 0 - extracted segments only
/// * 1 - plus accepted window spreads
/// * 2 - plus every frame and every evaluation
pub struct ConsoleDiagnostics<W: Write> {
    out: W,
    verbosity: u8,
}

impl<W: Write> ConsoleDiagnostics<W> {
    pub fn new(out: W, verbosity: u8) -> Self {
        Self { out, verbosity }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        // diagnostics are best effort
        let _ = writeln!(self.out, "{}", line);
    }
}

impl<W: Write> SegmentationObserver for ConsoleDiagnostics<W> {
    fn observe(&mut self, event: &SegmentationEvent) {
        match event {
            SegmentationEvent::FrameIngested {
                index,
                time_ms,
                pitch_hz,
                f1_hz,
                f2_hz,
                voiced,
                ..
            } => {
                if self.verbosity >= VERBOSITY_LINES {
                    let line =
                        format_frame_line(*index, *time_ms, *pitch_hz, *f1_hz, *f2_hz, *voiced);
                    self.emit(&line);
                }
            }
            SegmentationEvent::WindowEvaluated {
                evaluation,
                accepted,
            } => {
                if self.verbosity >= VERBOSITY_LINES
                    || (self.verbosity >= VERBOSITY_BASIC && *accepted)
                {
                    let line = format_window_evaluation(evaluation);
                    self.emit(&line);
                }
            }
            SegmentationEvent::SegmentExtracted {
                start_time_ms,
                end_time_ms,
                ..
            } => {
                let line = format_extract_line(*start_time_ms, *end_time_ms);
                self.emit(&line);
            }
        }
    }
}
