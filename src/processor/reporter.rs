//! Progress reporting hooks for the pipeline.
//!
//! The processor never logs to a global sink on its own behalf; callers
//! inject a [`Reporter`] and decide where stage events go.

use crate::models::{PipelineStats, Stage};

use colored::*;
use std::time::Duration;
use tracing::info;

/// Receives stage events from [`ReportProcessor`](super::ReportProcessor)
pub trait Reporter {
    fn stage_started(&mut self, _stage: Stage) {}

    /// `rows` is the number of rows the stage produced or checked
    fn stage_finished(&mut self, _stage: Stage, _rows: usize, _elapsed: Duration) {}

    fn pipeline_finished(&mut self, _stats: &PipelineStats) {}
}

/// Emits stage events as `tracing` records
#[derive(Debug, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn stage_started(&mut self, stage: Stage) {
        info!(%stage, "Stage started");
    }

    fn stage_finished(&mut self, stage: Stage, rows: usize, elapsed: Duration) {
        info!(%stage, rows, elapsed_ms = elapsed.as_millis() as u64, "Stage finished");
    }

    fn pipeline_finished(&mut self, stats: &PipelineStats) {
        info!(
            rows = stats.rows_written,
            output = %stats.output_location,
            elapsed_ms = stats.total_time().as_millis() as u64,
            "Pipeline finished"
        );
    }
}

/// Human-readable summary on stdout, on top of tracing records
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    tracing: TracingReporter,
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self {
            tracing: TracingReporter,
            quiet,
        }
    }
}

impl Reporter for ConsoleReporter {
    fn stage_started(&mut self, stage: Stage) {
        self.tracing.stage_started(stage);
    }

    fn stage_finished(&mut self, stage: Stage, rows: usize, elapsed: Duration) {
        self.tracing.stage_finished(stage, rows, elapsed);
        if !self.quiet {
            println!(
                "  {} {:<10} {} rows in {}ms",
                "✓".bright_green(),
                stage.to_string().bright_cyan(),
                rows.to_string().bright_white(),
                elapsed.as_millis()
            );
        }
    }

    fn pipeline_finished(&mut self, stats: &PipelineStats) {
        self.tracing.pipeline_finished(stats);
        if self.quiet {
            return;
        }
        println!("\n{}", "Cleaning Summary".bright_green().bold());
        println!(
            "  {} {}",
            "Rows read:".bright_cyan(),
            stats.rows_read.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Columns:".bright_cyan(),
            stats.columns.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Rows written:".bright_cyan(),
            stats.rows_written.to_string().bright_white().bold()
        );
        println!(
            "  {} {}",
            "Output:".bright_cyan(),
            stats.output_location.bright_white()
        );
        println!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            stats.total_time().as_millis().to_string().bright_white()
        );
    }
}
