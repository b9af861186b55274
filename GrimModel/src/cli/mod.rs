//! GrimModel CLI - Command-line interface for Grimrock model files

pub mod commands;
pub mod progress;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "grimmodel")]
#[command(about = "GrimModel: read Legend of Grimrock .model files and convert them to OBJ", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Model files, or directories to search for .model files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Dump model information to stdout
    #[arg(short, long)]
    pub dump: bool,

    /// Dump also empty nodes
    #[arg(short = 'E', long)]
    pub include_empty: bool,

    /// Dump also bones
    #[arg(short = 'B', long)]
    pub include_bones: bool,

    /// Dump transforms of nodes and bones
    #[arg(short = 'M', long)]
    pub transforms: bool,

    /// Write Wavefront OBJ to this file (a directory when there are several inputs)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write 1-based OBJ face indices offset across meshes
    #[arg(long)]
    pub one_based: bool,

    /// Print a JSON summary of each model
    #[arg(long)]
    pub json: bool,

    /// Skip the parent/bone/segment cross-reference checks
    #[arg(long)]
    pub no_validate: bool,

    /// Decode files in parallel with this many threads
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the GrimModel CLI
///
/// Exits with 1 if any input failed to decode or export.
pub fn run_cli() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let summary = commands::execute(&cli)?;
    Ok(if summary.is_success() { ExitCode::SUCCESS } else { ExitCode::from(1) })
}
