use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tf_idf_similarity::config::SegmenterKind;
use tf_idf_similarity::{Document, IdfVariant, SimilarityConfig, SimilarityEngine};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Compute the TF-IDF cosine similarity of two text files
#[derive(Parser, Debug)]
#[command(name = "tf-idf-similarity", version)]
#[command(about = "Compute the TF-IDF cosine similarity of two text files", long_about = None)]
struct Args {
    /// Path to the original document
    orig_file: PathBuf,

    /// Path to the document compared against the original
    compare_file: PathBuf,

    /// File the result line is written to
    output_file: PathBuf,

    /// TOML configuration file (defaults to ./similarity.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured segmenter
    #[arg(long, value_enum)]
    segmenter: Option<SegmenterKind>,

    /// Override the configured idf convention
    #[arg(long, value_enum)]
    idf: Option<IdfVariant>,

    /// Also write a CBOR snapshot of the comparison to this path
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => {
            println!("similarity computed, result written to {}", args.output_file.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let mut config = SimilarityConfig::load(args.config.as_deref())?;
    if let Some(segmenter) = args.segmenter {
        config.segmenter = segmenter;
    }
    if let Some(idf) = args.idf {
        config.idf = idf;
    }
    let engine = SimilarityEngine::from_config(&config)?;
    info!(?config, "engine ready");

    let orig = Document::from_path(&args.orig_file)?;
    let compare = Document::from_path(&args.compare_file)?;
    let comparison = engine.compare(&orig, &compare)?;
    info!(score = %comparison.score(), "comparison finished");

    if let Some(path) = &args.snapshot {
        comparison.write_snapshot(path)?;
    }
    let line = format!("{}\n", comparison.report_line());
    if let Err(e) = fs::write(&args.output_file, line) {
        // a failed run leaves no artifacts behind
        if let Some(path) = &args.snapshot {
            if let Err(rm) = fs::remove_file(path) {
                warn!(path = %path.display(), error = %rm, "cannot remove snapshot");
            }
        }
        return Err(e).with_context(|| format!("cannot write `{}`", args.output_file.display()));
    }
    Ok(())
}
