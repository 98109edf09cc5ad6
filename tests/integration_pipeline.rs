//! End-to-end tests for the report cleaning pipeline
//!
//! Exercise the public API the way the binary does: load a YAML
//! configuration, run the processor with an injected reporter, and read the
//! resulting Parquet file back.

use polars::prelude::*;
use report_cleaner::config::PipelineConfig;
use report_cleaner::models::{PipelineStats, Stage};
use report_cleaner::processor::ReportProcessor;
use report_cleaner::processor::reporter::Reporter;
use report_cleaner::{CleanerError, normalize, validate_schema};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

const REQUIRED: [&str; 7] = [
    "date",
    "amount",
    "vat",
    "total",
    "delivery_note",
    "customer_id",
    "invoice_num",
];

#[derive(Default)]
struct StageLog(Vec<Stage>);

impl Reporter for StageLog {
    fn stage_finished(&mut self, stage: Stage, _rows: usize, _elapsed: Duration) {
        self.0.push(stage);
    }

    fn pipeline_finished(&mut self, stats: &PipelineStats) {
        assert_eq!(stats.stage_timings.len(), self.0.len());
    }
}

fn column<'a>(df: &'a DataFrame, name: &str) -> &'a Series {
    df.column(name).unwrap().as_materialized_series()
}

fn write_config(dir: &Path, input: &Path, extra: &str) -> std::path::PathBuf {
    let config_path = dir.join("config.yaml");
    let yaml = format!(
        "inputs:\n  raw_path: {}\noutputs:\n  dir: {}\n{}",
        input.display(),
        dir.join("clean").display(),
        extra
    );
    fs::write(&config_path, yaml).unwrap();
    config_path
}

#[test]
fn test_single_row_scenario_in_memory() {
    let raw = df!(
        "date" => ["01/01/2025"],
        "amount" => ["78,90"],
        "vat" => ["12,34"],
        "total" => ["91,24"],
        "delivery_note" => ["40.274"],
        "customer_id" => ["5.254"],
        "invoice_num" => ["9.849"],
    )
    .unwrap();

    validate_schema(&raw, &REQUIRED).unwrap();
    let cleaned = normalize(&raw, "%d/%m/%Y").unwrap();

    // 2025-01-01 is 20089 days after the Unix epoch
    let date = column(&cleaned, "date").cast(&DataType::Int32).unwrap();
    assert_eq!(date.i32().unwrap().get(0), Some(20089));
    assert_eq!(column(&cleaned, "amount").f64().unwrap().get(0), Some(78.90));
    assert_eq!(column(&cleaned, "vat").f64().unwrap().get(0), Some(12.34));
    assert_eq!(column(&cleaned, "total").f64().unwrap().get(0), Some(91.24));
    assert_eq!(column(&cleaned, "delivery_note").i64().unwrap().get(0), Some(40274));
    assert_eq!(column(&cleaned, "customer_id").i64().unwrap().get(0), Some(5254));
    assert_eq!(column(&cleaned, "invoice_num").i64().unwrap().get(0), Some(9849));
}

#[test]
fn test_config_file_to_parquet() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("march.csv");
    fs::write(
        &input,
        "date;amount;vat;total;delivery_note;customer_id;invoice_num\n\
         31/12/2024;1.234,56;123,45;1.358,01;40.273;5.115;10.318\n\
         01/01/2025;78,90;12,34;91,24;40.274;5.254;9.849\n",
    )
    .unwrap();
    let config_path = write_config(temp_dir.path(), &input, "");

    let config = PipelineConfig::load(&config_path).unwrap();
    let processor = ReportProcessor::new(config).unwrap();
    let mut log = StageLog::default();
    let stats = processor.process(&mut log).unwrap();

    assert_eq!(log.0, [Stage::Read, Stage::Validate, Stage::Normalize, Stage::Write]);
    assert_eq!(stats.rows_written, 2);

    let output = temp_dir.path().join("clean").join("march.parquet");
    let written = ParquetReader::new(fs::File::open(output).unwrap())
        .finish()
        .unwrap();
    assert_eq!(written.shape(), (2, 7));
    assert_eq!(column(&written, "amount").f64().unwrap().get(0), Some(1234.56));
    assert_eq!(column(&written, "customer_id").i64().unwrap().get(1), Some(5254));
}

#[test]
fn test_comma_delimited_anglo_report() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("us.csv");
    fs::write(
        &input,
        "day,price,sku\n2025-03-01,\"1,999.95\",\"12,345\"\n",
    )
    .unwrap();
    let config_path = write_config(
        temp_dir.path(),
        &input,
        "format:\n  delimiter: \",\"\n  decimal: \".\"\n  thousands: \",\"\n  date_format: \"%Y-%m-%d\"\n\
         schema:\n  required_columns: [day, price, sku]\n  date_column: day\n  amount_columns: [price]\n  id_columns: [sku]\n",
    );

    let config = PipelineConfig::load(&config_path).unwrap();
    ReportProcessor::new(config)
        .unwrap()
        .process(&mut StageLog::default())
        .unwrap();

    let output = temp_dir.path().join("clean").join("us.parquet");
    let written = ParquetReader::new(fs::File::open(output).unwrap())
        .finish()
        .unwrap();
    assert_eq!(column(&written, "price").f64().unwrap().get(0), Some(1999.95));
    assert_eq!(column(&written, "sku").i64().unwrap().get(0), Some(12345));
}

#[test]
fn test_missing_columns_reported_together() {
    let raw = df!("date" => ["01/01/2025"]).unwrap();
    let error = validate_schema(&raw, &["date", "amount", "vat"]).unwrap_err();

    assert!(matches!(error, CleanerError::Schema { .. }));
    let message = error.to_string();
    assert!(message.contains("amount"));
    assert!(message.contains("vat"));
}
