// Feature records - one row of the acoustic feature table
//
// The upstream analysis tool emits one row per time step with the columns
// Time, Intensity, Pitch, F1, F2, F3 followed by twelve MFCCs. Rows are
// decoded into `FeatureRecord` by `parser`, and `table` wraps a whole
// stream (header check, line numbers, ordering).

pub mod parser;
pub mod table;

pub use parser::{parse_line, DEFAULT_DELIMITER, FIELD_UNDEFINED, MAX_FIELD_WIDTH};
pub use table::{FeatureTableReader, MATRIX_HEADER};

use serde::Serialize;

/// Number of cepstral coefficients per row
pub const CEPSTRAL_COEFFS: usize = 12;

/// One analysis frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureRecord {
    /// Frame time in milliseconds, rounded from fractional seconds
    pub time_ms: i64,
    /// Intensity in dB
    pub intensity_db: i32,
    /// Pitch in Hz (0 when undefined)
    pub pitch_hz: i32,
    /// First formant in Hz (0 when undefined)
    pub f1_hz: i32,
    /// Second formant in Hz (0 when undefined)
    pub f2_hz: i32,
    /// Third formant in Hz (0 when undefined)
    pub f3_hz: i32,
    /// MFCC1..MFCC12 when the row carries them; never used for segmentation
    pub cepstral: Option<[i32; CEPSTRAL_COEFFS]>,
    /// Source row text without its line terminator
    ///
    /// Segment tables are written from this so they reproduce the input rows
    /// exactly.
    #[serde(skip)]
    pub line: String,
}

impl FeatureRecord {
    /// Build a record from already-rounded values (fixtures, tests)
    ///
    /// The `line` field is rendered from the values.
    pub fn new(
        time_ms: i64,
        intensity_db: i32,
        pitch_hz: i32,
        f1_hz: i32,
        f2_hz: i32,
        f3_hz: i32,
    ) -> Self {
        let mut record = Self {
            time_ms,
            intensity_db,
            pitch_hz,
            f1_hz,
            f2_hz,
            f3_hz,
            cepstral: None,
            line: String::new(),
        };
        record.line = record.render_row(DEFAULT_DELIMITER);
        record
    }

    /// Attach cepstral coefficients and re-render the row text
    pub fn with_cepstral(mut self, coeffs: [i32; CEPSTRAL_COEFFS]) -> Self {
        self.cepstral = Some(coeffs);
        self.line = self.render_row(DEFAULT_DELIMITER);
        self
    }

    /// Render the record as a feature table row
    pub fn render_row(&self, delimiter: char) -> String {
        let mut fields = vec![
            format!("{:.3}", self.time_ms as f64 / 1000.0),
            self.intensity_db.to_string(),
            self.pitch_hz.to_string(),
            self.f1_hz.to_string(),
            self.f2_hz.to_string(),
            self.f3_hz.to_string(),
        ];
        if let Some(coeffs) = &self.cepstral {
            fields.extend(coeffs.iter().map(|c| c.to_string()));
        }
        fields.join(&delimiter.to_string())
    }
}
