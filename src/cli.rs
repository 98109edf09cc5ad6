//! Command-line interface components.

use crate::config::{DEFAULT_CONFIG_PATH, PipelineConfig};
use crate::models::PipelineStats;
use crate::processor::{ReportProcessor, reporter::ConsoleReporter};

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "report-cleaner")]
#[command(about = "Clean locale-formatted delimited reports into typed Parquet files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Path to the YAML pipeline configuration
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override the raw report path from the configuration
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Override the output directory from the configuration
    #[arg(short, long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Log level derived from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }

    /// Load the configuration file and apply command-line overrides
    pub fn load_config(&self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::load(&self.config)
            .with_context(|| format!("Failed to load {}", self.config.display()))?;

        if let Some(input) = &self.input {
            config = config.with_input_path(input.clone());
        }
        if let Some(output_dir) = &self.output_dir {
            config = config.with_output_dir(output_dir.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

/// Set up structured logging based on CLI arguments
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("report_cleaner={}", log_level)));

    // Set up subscriber based on output format preference
    if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Run one cleaning pass as described by `args`
pub fn run(args: &Args) -> Result<PipelineStats> {
    let config = args.load_config()?;
    let processor = ReportProcessor::new(config)?;

    if !args.quiet {
        println!("{}", "Starting report cleaning".bright_green().bold());
        println!(
            "  {} {}",
            "Input:".bright_cyan(),
            processor.input_location()
        );
        println!(
            "  {} {}\n",
            "Output:".bright_cyan(),
            processor.output_location()
        );
    }

    let mut reporter = ConsoleReporter::new(args.quiet);
    let stats = processor.process(&mut reporter)?;
    Ok(stats)
}
