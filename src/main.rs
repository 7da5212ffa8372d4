use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use hearings::{
    collect_source_files, read_source_file, write_transcript_json, DiagnosticKind, PipelineConfig,
    TranscriptParser, TranscriptSummary,
};

#[derive(Parser)]
#[command(name = "hearings")]
#[command(author, version, about = "Committee hearing transcript parser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse hearing transcripts into structured JSON
    Parse {
        /// Input text file, or a directory of .txt files
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON file, or a directory when the input is a directory
        #[arg(short, long)]
        output: PathBuf,

        /// Pipeline config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Lowest fuzzy match score accepted for a speaker label (0-100)
        #[arg(long)]
        score_floor: Option<u8>,

        /// Matches scoring below this are flagged for review (0-100)
        #[arg(long)]
        low_confidence: Option<u8>,

        /// Also write a summary next to each output file
        #[arg(long)]
        summary: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Parse a transcript and print its roster and speaker resolution
    Analyze {
        /// Input text file
        #[arg(short, long)]
        input: PathBuf,

        /// Pipeline config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            input,
            output,
            config,
            score_floor,
            low_confidence,
            summary,
            verbose,
        } => {
            setup_logging(verbose);
            let mut config = load_config(config.as_deref())?;
            if let Some(score_floor) = score_floor {
                config.resolver.score_floor = score_floor;
            }
            if let Some(low_confidence) = low_confidence {
                config.resolver.low_confidence_threshold = low_confidence;
            }
            parse_transcripts(&input, &output, config, summary)
        }
        Commands::Analyze {
            input,
            config,
            verbose,
        } => {
            setup_logging(verbose);
            let config = load_config(config.as_deref())?;
            analyze_transcript(&input, config)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            info!("Loading config from {:?}", path);
            PipelineConfig::from_file(path)
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn parse_transcripts(
    input: &Path,
    output: &Path,
    config: PipelineConfig,
    summary: bool,
) -> Result<()> {
    let parser = TranscriptParser::new(config);

    if !input.is_dir() {
        return parse_one(&parser, input, output, summary);
    }

    let files = collect_source_files(input)?;
    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {:?}", output))?;
    info!("Found {} transcripts in {:?}", files.len(), input);

    let mut failures = 0;
    for (i, file) in files.iter().enumerate() {
        info!("Parsing {} / {}: {:?}", i + 1, files.len(), file);
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("transcript_{}", i));
        let target = output.join(format!("{}.json", stem));
        if let Err(e) = parse_one(&parser, file, &target, summary) {
            warn!("Failed to parse {:?}: {:#}", file, e);
            failures += 1;
        }
    }

    info!(
        "Complete: {} parsed, {} failed",
        files.len() - failures,
        failures
    );
    Ok(())
}

fn parse_one(parser: &TranscriptParser, input: &Path, output: &Path, summary: bool) -> Result<()> {
    let document = read_source_file(input).context("Failed to read input transcript")?;
    let transcript = parser.parse(&document.text, document.source_locations);

    write_transcript_json(&transcript, output)?;
    info!("Output written to {:?}", output);

    if summary {
        let summary_path = output.with_extension("summary.json");
        TranscriptSummary::from_transcript(
            &transcript,
            parser.config().resolver.low_confidence_threshold,
        )
        .write_json(&summary_path)?;
        info!("Summary written to {:?}", summary_path);
    }

    Ok(())
}

fn analyze_transcript(input: &Path, config: PipelineConfig) -> Result<()> {
    info!("Analyzing transcript from {:?}", input);
    let document = read_source_file(input).context("Failed to read input transcript")?;
    let threshold = config.resolver.low_confidence_threshold;
    let transcript = TranscriptParser::new(config).parse(&document.text, document.source_locations);
    let summary = TranscriptSummary::from_transcript(&transcript, threshold);

    println!("Transcript Analysis");
    println!("===================");
    println!("{}", summary.format());

    if !transcript.diagnostics.is_empty() {
        println!("Diagnostics");
        println!("-----------");
        for kind in [
            DiagnosticKind::StructuralParseFailure,
            DiagnosticKind::FieldExtractionFailure,
            DiagnosticKind::LowConfidenceMatch,
            DiagnosticKind::UnresolvableLabel,
        ] {
            for diagnostic in transcript.diagnostics_of(kind) {
                println!("{:?}: {}", kind, diagnostic.message);
            }
        }
    }

    Ok(())
}
