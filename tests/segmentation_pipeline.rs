use std::fs;
use std::path::{Path, PathBuf};

use vowel_segmenter::analysis::{FeatureTableReader, SegmentBoundary, SegmentationPipeline};
use vowel_segmenter::config::ToleranceConfig;
use vowel_segmenter::error::{ParseError, SegmenterError, ToolError};
use vowel_segmenter::extraction::FileExtractionSink;
use vowel_segmenter::telemetry::{NoopObserver, SegmentationEvent};
use vowel_segmenter::tools::SliceCutter;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// Records the requested range in place of audio
struct RangeCutter;

impl SliceCutter for RangeCutter {
    fn cut(&self, _source: &Path, dest: &Path, start: f64, end: f64) -> Result<(), ToolError> {
        fs::write(dest, format!("{start:.3} {end:.3}")).map_err(|err| ToolError::Spawn {
            tool: "range".to_string(),
            details: err.to_string(),
        })
    }
}

#[test]
fn fixture_yields_two_segments() {
    let reader = FeatureTableReader::open_path(fixture_path("sustained_vowel.txt")).unwrap();
    let mut pipeline = SegmentationPipeline::new(&ToleranceConfig::default()).unwrap();
    let mut segments: Vec<SegmentBoundary> = Vec::new();
    let mut events: Vec<SegmentationEvent> = Vec::new();

    let summary = pipeline.run(reader, &mut segments, &mut events).unwrap();

    let spans: Vec<(i64, i64)> = segments
        .iter()
        .map(|s| (s.start_time_ms, s.end_time_ms))
        .collect();
    assert_eq!(spans, vec![(100, 580), (700, 1180)]);
    assert!(segments.iter().all(|s| s.frame_count() == 25));
    assert!(segments[0].records.iter().all(|r| r.cepstral.is_some()));

    assert_eq!(summary.frames_processed, 60);
    assert_eq!(summary.voiced_frames, 50);
    assert_eq!(summary.windows_evaluated, 2);
    assert_eq!(summary.windows_rejected, 0);
    assert_eq!(summary.segments_extracted, 2);
    assert!((summary.mean_segment_seconds.unwrap() - 0.48).abs() < 1e-9);

    let frames = events
        .iter()
        .filter(|e| matches!(e, SegmentationEvent::FrameIngested { .. }))
        .count();
    assert_eq!(frames, 60);
}

#[test]
fn tight_pitch_tolerance_rejects_every_window() {
    let reader = FeatureTableReader::open_path(fixture_path("sustained_vowel.txt")).unwrap();
    let config = ToleranceConfig {
        pitch_percent_tolerance: 0.5,
        ..ToleranceConfig::default()
    };
    let mut pipeline = SegmentationPipeline::new(&config).unwrap();
    let mut segments: Vec<SegmentBoundary> = Vec::new();

    let summary = pipeline
        .run(reader, &mut segments, &mut NoopObserver)
        .unwrap();

    assert!(segments.is_empty());
    assert_eq!(summary.segments_extracted, 0);
    assert_eq!(summary.mean_segment_seconds, None);
    assert!(summary.windows_rejected > 0);
    assert_eq!(summary.pitch_rejections, summary.windows_rejected);
}

#[test]
fn bad_header_is_rejected_before_any_row() {
    let result = FeatureTableReader::open_path(fixture_path("bad_header.txt"));
    assert!(matches!(result, Err(ParseError::HeaderMismatch { .. })));
}

#[test]
fn malformed_row_stops_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let table = dir.path().join("broken.txt");
    let mut text = fs::read_to_string(fixture_path("sustained_vowel.txt")).unwrap();
    text.push_str("1.200,65,abc,700,1200,2600\n");
    fs::write(&table, text).unwrap();

    let reader = FeatureTableReader::open_path(&table).unwrap();
    let mut pipeline = SegmentationPipeline::new(&ToleranceConfig::default()).unwrap();
    let mut segments: Vec<SegmentBoundary> = Vec::new();
    let result = pipeline.run(reader, &mut segments, &mut NoopObserver);

    match result {
        Err(SegmenterError::Parse(err)) => assert_eq!(err.line(), Some(62)),
        other => panic!("Expected parse error, got {other:?}"),
    }
    // segments found before the bad row were already handed over
    assert_eq!(segments.len(), 2);
}

#[test]
fn file_sink_writes_accepted_rows_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("voice.wav");
    let fixture = fs::read_to_string(fixture_path("sustained_vowel.txt")).unwrap();
    let source_lines: Vec<&str> = fixture.lines().collect();

    let reader = FeatureTableReader::open_path(fixture_path("sustained_vowel.txt")).unwrap();
    let mut pipeline = SegmentationPipeline::new(&ToleranceConfig::default()).unwrap();
    let mut sink = FileExtractionSink::new(&source, Box::new(RangeCutter));
    pipeline.run(reader, &mut sink, &mut NoopObserver).unwrap();

    let first = fs::read_to_string(dir.path().join("voice_100_580.txt")).unwrap();
    let first_lines: Vec<&str> = first.lines().collect();
    assert_eq!(first_lines[0], source_lines[0]);
    // data rows 5..30 of the fixture, after its header
    assert_eq!(&first_lines[1..], &source_lines[6..31]);

    assert!(dir.path().join("voice_700_1180.txt").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("voice_700_1180.wav")).unwrap(),
        "0.700 1.180"
    );
    assert!(!dir.path().join("voice_TEMP.txt").exists());
}
