use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use vowel_segmenter::analysis::{FeatureTableReader, SegmentationPipeline};
use vowel_segmenter::config::{AppConfig, CutterKind};
use vowel_segmenter::error::SegmenterError;
use vowel_segmenter::extraction::{DryRunSink, ExtractionSink, FileExtractionSink, SegmentNaming};
use vowel_segmenter::telemetry::console::{
    format_config_banner, format_summary, format_summary_table, VERBOSITY_BASIC,
};
use vowel_segmenter::telemetry::ConsoleDiagnostics;
use vowel_segmenter::tools::PraatFeatureAnalyzer;

#[derive(Parser, Debug)]
#[command(
    name = "vowel_segmenter",
    about = "Extract homogeneous vowel segments from a sound file"
)]
struct Cli {
    /// Sound file to segment; segment files are written next to it
    sound_file: PathBuf,
    /// Use an existing feature table instead of running Praat
    #[arg(long)]
    features: Option<PathBuf>,
    /// JSON configuration file (defaults to ./segmenter.json when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Analysis time step in seconds
    #[arg(short = 't', long, allow_negative_numbers = true)]
    time_step: Option<f64>,
    /// Formant analysis window width in seconds
    #[arg(short = 'w', long, allow_negative_numbers = true)]
    window: Option<f64>,
    /// Maximum formant in Hz
    #[arg(long, allow_negative_numbers = true)]
    max_formant: Option<u32>,
    /// Allowed pitch spread within a segment, in percent
    #[arg(long, allow_negative_numbers = true)]
    pitch_tolerance: Option<f64>,
    /// Allowed F1 spread within a segment, in percent
    #[arg(long, allow_negative_numbers = true)]
    f1_tolerance: Option<f64>,
    /// Allowed F2 spread within a segment, in percent
    #[arg(long, allow_negative_numbers = true)]
    f2_tolerance: Option<f64>,
    /// Minimum intensity of a voiced frame, in dB
    #[arg(long, allow_negative_numbers = true)]
    min_intensity: Option<i32>,
    /// Diagnostics level: 0 segments only, 1 accepted windows, 2 every frame
    #[arg(short = 'v', long, default_value_t = 0)]
    verbosity: u8,
    /// Find segments without writing any files
    #[arg(long, visible_alias = "test")]
    dry_run: bool,
    /// Slice cutter to use
    #[arg(long, value_enum)]
    cutter: Option<CutterArg>,
    /// Keep WAV slices instead of transcoding them
    #[arg(long)]
    no_transcode: bool,
    #[arg(long, value_enum, default_value_t = SummaryFormat::Table)]
    summary_format: SummaryFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CutterArg {
    Praat,
    Wav,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SummaryFormat {
    Table,
    Json,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // --help and --version also arrive here
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    vowel_segmenter::init_logging(cli.verbosity);

    let config = resolve_config(&cli)?;
    let mut pipeline = SegmentationPipeline::new(&config.segmentation)?;

    let naming = SegmentNaming::for_source(&cli.sound_file);
    let table_path = match &cli.features {
        Some(path) => path.clone(),
        None => {
            let table = naming.feature_table();
            PraatFeatureAnalyzer::from_config(&config.tools)
                .extract(&cli.sound_file, &table, &config.segmentation)
                .map_err(SegmenterError::FeatureAnalysis)?;
            table
        }
    };
    let reader = FeatureTableReader::open_path(&table_path)
        .map_err(SegmenterError::from)
        .with_context(|| format!("reading feature table {}", table_path.display()))?;

    if cli.verbosity >= VERBOSITY_BASIC {
        println!(
            "{}",
            format_config_banner(
                config.segmentation.time_step_seconds,
                pipeline.frames_per_segment()
            )
        );
    }
    let mut console = ConsoleDiagnostics::new(io::stdout().lock(), cli.verbosity);

    let mut sink: Box<dyn ExtractionSink> = if cli.dry_run {
        Box::new(DryRunSink::new())
    } else {
        Box::new(FileExtractionSink::from_config(&cli.sound_file, &config))
    };

    let summary = pipeline.run(reader, sink.as_mut(), &mut console)?;
    let mut out = console.into_inner();

    match cli.summary_format {
        SummaryFormat::Table => {
            writeln!(out, "{}", format_summary(&summary))?;
            if cli.verbosity >= VERBOSITY_BASIC {
                writeln!(out, "{}", format_summary_table(&summary))?;
            }
        }
        SummaryFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}

/// File (explicit, or ./segmenter.json) overridden by command-line flags
fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .map_err(SegmenterError::from)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::load(),
    };

    let segmentation = &mut config.segmentation;
    if let Some(value) = cli.time_step {
        segmentation.time_step_seconds = value;
    }
    if let Some(value) = cli.window {
        segmentation.window_seconds = value;
    }
    if let Some(value) = cli.max_formant {
        segmentation.max_formant_hz = value;
    }
    if let Some(value) = cli.pitch_tolerance {
        segmentation.pitch_percent_tolerance = value;
    }
    if let Some(value) = cli.f1_tolerance {
        segmentation.f1_percent_tolerance = value;
    }
    if let Some(value) = cli.f2_tolerance {
        segmentation.f2_percent_tolerance = value;
    }
    if let Some(value) = cli.min_intensity {
        segmentation.minimum_intensity_db = value;
    }

    if let Some(cutter) = cli.cutter {
        config.extraction.cutter = match cutter {
            CutterArg::Praat => CutterKind::Praat,
            CutterArg::Wav => CutterKind::Wav,
        };
    }
    if cli.no_transcode {
        config.extraction.transcode = false;
    }
    Ok(config)
}
