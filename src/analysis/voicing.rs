// Voicing classifier
//
// A frame is voiced when it is loud enough and the analysis tool found both
// a pitch and a third formant. Silence, breath noise and fricatives fail at
// least one of these.

use crate::analysis::features::FeatureRecord;
use crate::config::ToleranceConfig;

/// Default minimum intensity of a voiced frame, in dB
pub const MINIMUM_INTENSITY_DB: i32 = 55;

/// Per-frame voiced/unvoiced predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoicingClassifier {
    minimum_intensity_db: i32,
}

impl Default for VoicingClassifier {
    fn default() -> Self {
        Self::new(MINIMUM_INTENSITY_DB)
    }
}

impl VoicingClassifier {
    pub fn new(minimum_intensity_db: i32) -> Self {
        Self {
            minimum_intensity_db,
        }
    }

    pub fn from_config(config: &ToleranceConfig) -> Self {
        Self::new(config.minimum_intensity_db)
    }

    pub fn minimum_intensity_db(&self) -> i32 {
        self.minimum_intensity_db
    }

    /// True iff intensity >= threshold AND pitch != 0 AND F3 != 0
    pub fn is_voiced(&self, record: &FeatureRecord) -> bool {
        record.intensity_db >= self.minimum_intensity_db
            && record.pitch_hz != 0
            && record.f3_hz != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(intensity_db: i32, pitch_hz: i32, f3_hz: i32) -> FeatureRecord {
        FeatureRecord::new(0, intensity_db, pitch_hz, 500, 1500, f3_hz)
    }

    #[test]
    fn test_voiced_frame() {
        assert!(VoicingClassifier::default().is_voiced(&frame(60, 120, 2500)));
    }

    #[test]
    fn test_each_condition_alone_marks_unvoiced() {
        let classifier = VoicingClassifier::default();
        assert!(!classifier.is_voiced(&frame(54, 120, 2500)));
        assert!(!classifier.is_voiced(&frame(60, 0, 2500)));
        assert!(!classifier.is_voiced(&frame(60, 120, 0)));
    }

    #[test]
    fn test_intensity_threshold_is_inclusive_and_monotonic() {
        let classifier = VoicingClassifier::default();
        for intensity in 0..100 {
            assert_eq!(
                classifier.is_voiced(&frame(intensity, 120, 2500)),
                intensity >= MINIMUM_INTENSITY_DB,
                "intensity {intensity}"
            );
        }
    }

    #[test]
    fn test_configured_threshold() {
        let config = ToleranceConfig {
            minimum_intensity_db: 40,
            ..ToleranceConfig::default()
        };
        let classifier = VoicingClassifier::from_config(&config);
        assert_eq!(classifier.minimum_intensity_db(), 40);
        assert!(classifier.is_voiced(&frame(45, 120, 2500)));
    }
}
