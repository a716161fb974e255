// Homogeneity evaluator
//
// A window is homogeneous when pitch, F1 and F2 each stay within their
// percent tolerance across all of its frames. The spread of a dimension is
// the percent difference between its minimum and maximum.

use serde::Serialize;

use crate::analysis::features::FeatureRecord;
use crate::config::ToleranceConfig;

/// Percent difference reported when either value is zero
///
/// Larger than any usable tolerance, so a window with an undefined pitch or
/// formant can never pass.
pub const PERCENT_DIFF_SENTINEL: f64 = 1000.0;

/// Symmetric relative spread between two values, in percent
///
/// `0` when equal, [`PERCENT_DIFF_SENTINEL`] when either is zero, otherwise
/// `100 * (max / min - 1)`.
pub fn percent_difference(a: i32, b: i32) -> f64 {
    if a == b {
        return 0.0;
    }
    if a == 0 || b == 0 {
        return PERCENT_DIFF_SENTINEL;
    }
    let (a, b) = (f64::from(a), f64::from(b));
    let quotient = if a > b { a / b } else { b / a };
    100.0 * (quotient - 1.0)
}

/// Min/max and percent spread of one dimension over a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionSpread {
    pub min: i32,
    pub max: i32,
    pub percent: f64,
}

impl DimensionSpread {
    fn from_range(min: i32, max: i32) -> Self {
        Self {
            min,
            max,
            percent: percent_difference(min, max),
        }
    }

    fn empty() -> Self {
        Self {
            min: 0,
            max: 0,
            percent: PERCENT_DIFF_SENTINEL,
        }
    }
}

/// Which dimensions exceeded their tolerance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FailedDimensions {
    pub pitch: bool,
    pub f1: bool,
    pub f2: bool,
}

impl FailedDimensions {
    pub fn any(&self) -> bool {
        self.pitch || self.f1 || self.f2
    }

    /// Three-character label: `P`, `1`, `2` for failed dimensions, space otherwise
    pub fn label(&self) -> String {
        [(self.pitch, 'P'), (self.f1, '1'), (self.f2, '2')]
            .iter()
            .map(|&(failed, mark)| if failed { mark } else { ' ' })
            .collect()
    }
}

/// Result of evaluating one candidate window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowEvaluation {
    /// Earliest frame time in the window
    pub start_time_ms: i64,
    pub frame_count: usize,
    pub pitch: DimensionSpread,
    pub f1: DimensionSpread,
    pub f2: DimensionSpread,
    pub failed: FailedDimensions,
}

impl WindowEvaluation {
    pub fn is_acceptable(&self) -> bool {
        !self.failed.any()
    }
}

/// Compares pitch/F1/F2 spreads against percent tolerances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomogeneityEvaluator {
    pitch_percent_tolerance: f64,
    f1_percent_tolerance: f64,
    f2_percent_tolerance: f64,
}

impl HomogeneityEvaluator {
    pub fn new(pitch_percent_tolerance: f64, f1_percent_tolerance: f64, f2_percent_tolerance: f64) -> Self {
        Self {
            pitch_percent_tolerance,
            f1_percent_tolerance,
            f2_percent_tolerance,
        }
    }

    pub fn from_config(config: &ToleranceConfig) -> Self {
        Self::new(
            config.pitch_percent_tolerance,
            config.f1_percent_tolerance,
            config.f2_percent_tolerance,
        )
    }

    /// Measure a window and decide whether it is homogeneous
    ///
    /// All three dimensions must be within tolerance. An empty window is
    /// never acceptable.
    pub fn evaluate<'a, I>(&self, window: I) -> WindowEvaluation
    where
        I: IntoIterator<Item = &'a FeatureRecord>,
    {
        let mut frame_count = 0;
        let mut start_time_ms = i64::MAX;
        let (mut min_pitch, mut max_pitch) = (i32::MAX, i32::MIN);
        let (mut min_f1, mut max_f1) = (i32::MAX, i32::MIN);
        let (mut min_f2, mut max_f2) = (i32::MAX, i32::MIN);

        for record in window {
            frame_count += 1;
            start_time_ms = start_time_ms.min(record.time_ms);
            min_pitch = min_pitch.min(record.pitch_hz);
            max_pitch = max_pitch.max(record.pitch_hz);
            min_f1 = min_f1.min(record.f1_hz);
            max_f1 = max_f1.max(record.f1_hz);
            min_f2 = min_f2.min(record.f2_hz);
            max_f2 = max_f2.max(record.f2_hz);
        }

        if frame_count == 0 {
            return WindowEvaluation {
                start_time_ms: 0,
                frame_count,
                pitch: DimensionSpread::empty(),
                f1: DimensionSpread::empty(),
                f2: DimensionSpread::empty(),
                failed: FailedDimensions {
                    pitch: true,
                    f1: true,
                    f2: true,
                },
            };
        }

        let pitch = DimensionSpread::from_range(min_pitch, max_pitch);
        let f1 = DimensionSpread::from_range(min_f1, max_f1);
        let f2 = DimensionSpread::from_range(min_f2, max_f2);
        let failed = FailedDimensions {
            pitch: pitch.percent > self.pitch_percent_tolerance,
            f1: f1.percent > self.f1_percent_tolerance,
            f2: f2.percent > self.f2_percent_tolerance,
        };

        WindowEvaluation {
            start_time_ms,
            frame_count,
            pitch,
            f1,
            f2,
            failed,
        }
    }
}
