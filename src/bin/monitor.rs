use std::fs;
use std::path::PathBuf;
use std::process::{Command, ExitCode};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tf_idf_similarity::monitor::Monitor;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Run a command and sample its resource usage until it exits
#[derive(Parser, Debug)]
#[command(name = "similarity-monitor", version)]
#[command(about = "Run a command and report its CPU, memory, disk and scheduling usage", long_about = None)]
struct Args {
    /// Sampling interval in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    interval_ms: u64,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Command to run, followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    command: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let (program, program_args) = args
        .command
        .split_first()
        .context("no command given")?;
    let mut command = Command::new(program);
    command.args(program_args);

    let mut monitor = Monitor::new(Duration::from_millis(args.interval_ms.max(1)));
    let report = monitor.run(&mut command)?;

    match &args.output {
        Some(path) => fs::write(path, format!("{report}\n"))
            .with_context(|| format!("cannot write `{}`", path.display()))?,
        None => println!("{report}"),
    }
    Ok(())
}
