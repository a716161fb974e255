// FileExtractionSink - writes segment tables and audio slices next to the
// source file
//
// Per segment:
// 1. header + accepted rows -> <base>_TEMP.txt, flushed, renamed to
//    <base>_<start>_<end>.txt
// 2. SliceCutter -> <base>_<start>_<end>.wav
// 3. optional Transcoder -> <base>_<start>_<end>.<ext>, WAV removed
//
// The working file only lives inside step 1. If anything fails before the
// rename, WorkingFile's Drop removes it.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::analysis::features::MATRIX_HEADER;
use crate::analysis::segmenter::SegmentBoundary;
use crate::config::{AppConfig, CutterKind};
use crate::error::ExtractionError;
use crate::extraction::{ExtractionSink, SegmentNaming};
use crate::tools::{FfmpegTranscoder, PraatSliceCutter, SliceCutter, Transcoder, WavSliceCutter};

/// Removes the working file unless it was renamed
struct WorkingFile {
    path: PathBuf,
    keep: bool,
}

impl WorkingFile {
    fn create(path: PathBuf) -> Result<(Self, File), ExtractionError> {
        let file = File::create(&path).map_err(|err| persist_error(&path, err))?;
        Ok((Self { path, keep: false }, file))
    }

    fn persist(mut self, dest: &Path) -> Result<(), ExtractionError> {
        fs::rename(&self.path, dest).map_err(|err| persist_error(dest, err))?;
        self.keep = true;
        Ok(())
    }
}

impl Drop for WorkingFile {
    fn drop(&mut self) {
        if !self.keep {
            if let Err(err) = fs::remove_file(&self.path) {
                tracing::warn!(
                    "[Extraction] Could not remove working file {:?}: {}",
                    self.path,
                    err
                );
            }
        }
    }
}

fn persist_error(path: &Path, err: std::io::Error) -> ExtractionError {
    ExtractionError::Persist {
        path: path.display().to_string(),
        details: err.to_string(),
    }
}

/// Sink producing the on-disk artifacts of every accepted segment
pub struct FileExtractionSink {
    source: PathBuf,
    naming: SegmentNaming,
    cutter: Box<dyn SliceCutter>,
    transcoder: Option<(Box<dyn Transcoder>, String)>,
    segments: usize,
}

impl FileExtractionSink {
    pub fn new(source: impl Into<PathBuf>, cutter: Box<dyn SliceCutter>) -> Self {
        let source = source.into();
        Self {
            naming: SegmentNaming::for_source(&source),
            source,
            cutter,
            transcoder: None,
            segments: 0,
        }
    }

    /// Convert each slice to `extension` and drop the WAV
    pub fn with_transcoder(mut self, transcoder: Box<dyn Transcoder>, extension: &str) -> Self {
        self.transcoder = Some((transcoder, extension.to_string()));
        self
    }

    /// Sink wired to the tools selected in `config`
    pub fn from_config(source: impl Into<PathBuf>, config: &AppConfig) -> Self {
        let cutter: Box<dyn SliceCutter> = match config.extraction.cutter {
            CutterKind::Praat => Box::new(PraatSliceCutter::from_config(&config.tools)),
            CutterKind::Wav => Box::new(WavSliceCutter::new()),
        };
        let sink = Self::new(source, cutter);
        if config.extraction.transcode {
            sink.with_transcoder(
                Box::new(FfmpegTranscoder::from_config(&config.tools)),
                &config.extraction.transcode_extension,
            )
        } else {
            sink
        }
    }

    pub fn naming(&self) -> &SegmentNaming {
        &self.naming
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    fn write_table(&self, boundary: &SegmentBoundary) -> Result<PathBuf, ExtractionError> {
        let (working, file) = WorkingFile::create(self.naming.working_table())?;
        let mut out = BufWriter::new(file);

        writeln!(out, "{}", MATRIX_HEADER).map_err(|err| persist_error(&working.path, err))?;
        for record in &boundary.records {
            writeln!(out, "{}", record.line).map_err(|err| persist_error(&working.path, err))?;
        }
        let file = out
            .into_inner()
            .map_err(|err| persist_error(&working.path, err.into_error()))?;
        file.sync_all()
            .map_err(|err| persist_error(&working.path, err))?;
        drop(file);

        let dest = self
            .naming
            .segment_table(boundary.start_time_ms, boundary.end_time_ms);
        working.persist(&dest)?;
        Ok(dest)
    }
}

impl ExtractionSink for FileExtractionSink {
    fn on_segment_accepted(&mut self, boundary: SegmentBoundary) -> Result<(), ExtractionError> {
        let table = self.write_table(&boundary)?;

        let slice = self
            .naming
            .segment_slice(boundary.start_time_ms, boundary.end_time_ms);
        self.cutter.cut(
            &self.source,
            &slice,
            boundary.start_seconds(),
            boundary.end_seconds(),
        )?;

        let audio = match &self.transcoder {
            Some((transcoder, extension)) => {
                let encoded = self.naming.segment_file(
                    boundary.start_time_ms,
                    boundary.end_time_ms,
                    extension,
                );
                transcoder.transcode(&slice, &encoded)?;
                fs::remove_file(&slice).map_err(|err| ExtractionError::Cleanup {
                    path: slice.display().to_string(),
                    details: err.to_string(),
                })?;
                encoded
            }
            None => slice,
        };

        self.segments += 1;
        tracing::info!("[Extraction] Wrote {:?} and {:?}", table, audio);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ExtractionError> {
        tracing::info!(
            "[Extraction] {} segments written next to {:?}",
            self.segments,
            self.source
        );
        Ok(())
    }
}
