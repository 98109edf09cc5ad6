//! Pipeline-level tests for the processor module
//!
//! Runs the complete read → validate → normalize → write pipeline against
//! report files written to temporary directories.

pub mod error_handling;

use super::reporter::Reporter;
use crate::config::PipelineConfig;
use crate::models::{PipelineStats, Stage};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

pub const REPORT_HEADER: &str = "date;amount;vat;total;delivery_note;customer_id;invoice_num";

/// Reporter that remembers every event it receives
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub started: Vec<Stage>,
    pub finished: Vec<(Stage, usize)>,
    pub summaries: usize,
}

impl Reporter for RecordingReporter {
    fn stage_started(&mut self, stage: Stage) {
        self.started.push(stage);
    }

    fn stage_finished(&mut self, stage: Stage, rows: usize, _elapsed: Duration) {
        self.finished.push((stage, rows));
    }

    fn pipeline_finished(&mut self, _stats: &PipelineStats) {
        self.summaries += 1;
    }
}

/// Write `body` under a report header and return a config pointing at it
pub fn write_report(temp_dir: &TempDir, header: &str, rows: &[&str]) -> PipelineConfig {
    let input = temp_dir.path().join("raw").join("reports.csv");
    fs::create_dir_all(input.parent().unwrap()).unwrap();

    let mut contents = String::from(header);
    contents.push('\n');
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    fs::write(&input, contents).unwrap();

    PipelineConfig::default()
        .with_input_path(input)
        .with_output_dir(temp_dir.path().join("clean"))
}

pub fn expected_output(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("clean").join("reports.parquet")
}
