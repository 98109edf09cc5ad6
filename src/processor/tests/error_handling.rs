//! Error handling integration tests

use super::{REPORT_HEADER, RecordingReporter, expected_output, write_report};
use crate::error::CleanerError;
use crate::models::Stage;
use crate::processor::ReportProcessor;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_nonexistent_input() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = write_report(&temp_dir, REPORT_HEADER, &[]);
    let missing = temp_dir.path().join("nope.csv");
    config.inputs.raw_path = missing.clone();

    let processor = ReportProcessor::new(config).unwrap();
    let mut reporter = RecordingReporter::default();

    match processor.process(&mut reporter).unwrap_err() {
        CleanerError::InputNotFound { path } => assert_eq!(path, missing),
        other => panic!("Expected InputNotFound error, got {other:?}"),
    }
    assert!(reporter.finished.is_empty());
}

#[test]
fn test_missing_columns_stop_before_write() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_report(
        &temp_dir,
        "date;total;delivery_note;customer_id;invoice_num",
        &["01/01/2025;91,24;40.274;5.254;9.849"],
    );

    let processor = ReportProcessor::new(config).unwrap();
    let mut reporter = RecordingReporter::default();
    let error = processor.process(&mut reporter).unwrap_err();

    match &error {
        CleanerError::Schema { missing } => assert_eq!(missing, &vec!["amount", "vat"]),
        other => panic!("Expected Schema error, got {other:?}"),
    }
    let message = error.to_string();
    assert!(message.contains("amount") && message.contains("vat"));
    assert_eq!(reporter.finished, vec![(Stage::Read, 1)]);
    assert!(!expected_output(&temp_dir).exists());
}

#[test]
fn test_bad_date_leaves_no_output() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_report(
        &temp_dir,
        REPORT_HEADER,
        &[
            "01/01/2025;78,90;12,34;91,24;40.274;5.254;9.849",
            "2025-01-02;78,90;12,34;91,24;40.275;5.254;9.850",
        ],
    );

    let processor = ReportProcessor::new(config).unwrap();
    let error = processor
        .process(&mut RecordingReporter::default())
        .unwrap_err();

    assert!(matches!(
        error,
        CleanerError::DateParse { row: 1, ref value, .. } if value == "2025-01-02"
    ));
    assert!(!expected_output(&temp_dir).exists());
}

#[test]
fn test_bad_amount_aborts_batch() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_report(
        &temp_dir,
        REPORT_HEADER,
        &["01/01/2025;78,90;twelve;91,24;40.274;5.254;9.849"],
    );

    let error = ReportProcessor::new(config)
        .unwrap()
        .process(&mut RecordingReporter::default())
        .unwrap_err();

    match error {
        CleanerError::NumericParse { column, row, value } => {
            assert_eq!(column, "vat");
            assert_eq!(row, 0);
            assert_eq!(value, "twelve");
        }
        other => panic!("Expected NumericParse error, got {other:?}"),
    }
    assert!(!expected_output(&temp_dir).exists());
}

#[test]
fn test_invalid_config_rejected_up_front() {
    let mut config = crate::config::PipelineConfig::default()
        .with_input_path(PathBuf::from("reports.csv"));
    config.format.delimiter = "tab".to_string();

    let result = ReportProcessor::new(config);
    assert!(matches!(result, Err(CleanerError::Config { .. })));
}

#[test]
fn test_remote_run_without_credentials() {
    let mut config = crate::config::PipelineConfig::default()
        .with_input_path(PathBuf::from("reports.csv"));
    config.storage.use_s3 = true;
    config.storage.bucket = Some("acme-reports".to_string());

    // Only meaningful when the environment carries no AWS credentials
    if std::env::var("AWS_ACCESS_KEY_ID").is_ok() {
        return;
    }

    let processor = ReportProcessor::new(config).unwrap();
    assert!(processor.input_location().is_remote());
    let result = processor.process(&mut RecordingReporter::default());
    assert!(matches!(result, Err(CleanerError::Storage { .. })));
}
