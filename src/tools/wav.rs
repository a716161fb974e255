// In-process WAV slice cutter
//
// Copies the interleaved samples between two times into a new file with the
// source's spec. Only PCM/float WAV sources are supported; anything else
// needs the Praat cutter.

use std::path::Path;

use crate::error::ToolError;
use crate::tools::SliceCutter;

const TOOL_NAME: &str = "wav";

/// [`SliceCutter`] backed by `hound`
#[derive(Debug, Clone, Copy, Default)]
pub struct WavSliceCutter;

impl WavSliceCutter {
    pub fn new() -> Self {
        Self
    }
}

fn wav_error(err: impl std::fmt::Display, path: &Path) -> ToolError {
    ToolError::Io {
        tool: TOOL_NAME.to_string(),
        path: path.display().to_string(),
        details: err.to_string(),
    }
}

/// Frame index for `seconds`, clamped to `[0, total]`
fn frame_at(seconds: f64, sample_rate: u32, total: u32) -> u32 {
    let frame = (seconds.max(0.0) * f64::from(sample_rate)).round();
    if frame >= f64::from(total) {
        total
    } else {
        frame as u32
    }
}

impl SliceCutter for WavSliceCutter {
    fn cut(
        &self,
        source: &Path,
        dest: &Path,
        start_seconds: f64,
        end_seconds: f64,
    ) -> Result<(), ToolError> {
        let mut reader = hound::WavReader::open(source).map_err(|err| wav_error(err, source))?;
        let spec = reader.spec();
        let total = reader.duration();
        let start = frame_at(start_seconds, spec.sample_rate, total);
        let end = frame_at(end_seconds, spec.sample_rate, total).max(start);
        let sample_count = (end - start) as usize * spec.channels as usize;

        reader.seek(start).map_err(|err| wav_error(err, source))?;
        let mut writer =
            hound::WavWriter::create(dest, spec).map_err(|err| wav_error(err, dest))?;

        match spec.sample_format {
            hound::SampleFormat::Float => {
                for sample in reader.samples::<f32>().take(sample_count) {
                    let sample = sample.map_err(|err| wav_error(err, source))?;
                    writer
                        .write_sample(sample)
                        .map_err(|err| wav_error(err, dest))?;
                }
            }
            hound::SampleFormat::Int => {
                for sample in reader.samples::<i32>().take(sample_count) {
                    let sample = sample.map_err(|err| wav_error(err, source))?;
                    writer
                        .write_sample(sample)
                        .map_err(|err| wav_error(err, dest))?;
                }
            }
        }

        writer.finalize().map_err(|err| wav_error(err, dest))?;
        tracing::debug!(
            "[WavCutter] {:?} frames {}..{} -> {:?}",
            source,
            start,
            end,
            dest
        );
        Ok(())
    }
}
