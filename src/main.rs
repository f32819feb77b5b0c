//! Binary entry point for graphrag-viz.
//!
//! Renders GraphRAG entity and relationship tables as an interactive HTML
//! graph.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use graphrag_viz::config::{ConfigOverrides, VisualizerConfig};
use graphrag_viz::io::Format;
use graphrag_viz::observability;
use graphrag_viz::services::Pipeline;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Render GraphRAG entities and relationships as an interactive HTML graph.
#[derive(Parser)]
#[command(name = "graphrag-viz")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Entity table (parquet, csv, tsv, json, ndjson or yaml).
    entities: PathBuf,

    /// Relationship table.
    relationships: PathBuf,

    /// Output HTML path [default: graphrag_visualization.html].
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Input format, overriding detection from file extensions.
    #[arg(short, long)]
    format: Option<Format>,

    /// Fail on relationship endpoints without an entity row.
    #[arg(long)]
    strict_endpoints: bool,

    /// Fail on duplicate entity ids.
    #[arg(long)]
    strict_ids: bool,

    /// Path to configuration file.
    #[arg(short, long, env = "GRAPHRAG_VIZ_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Collects the flags that override file configuration.
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            output: self.output.clone(),
            format: self.format,
            strict_endpoints: self.strict_endpoints,
            strict_ids: self.strict_ids,
        }
    }
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config.with_overrides(&cli.overrides()),
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match Pipeline::from_config(&cli.entities, &cli.relationships, &config).run() {
        Ok(report) => {
            println!("✅ Open '{}' in your browser.", report.output.display());
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Loads the explicit config file, or the default one if present.
fn load_config(path: Option<&Path>) -> graphrag_viz::Result<VisualizerConfig> {
    match path {
        Some(path) => VisualizerConfig::load_from_file(path),
        None => Ok(VisualizerConfig::load_default()?.unwrap_or_default()),
    }
}
