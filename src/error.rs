//! Error handling for report cleaning operations.
//!
//! Provides error types with enough context to point an operator at the
//! offending column, row and raw value when a batch is rejected.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input report not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error(
        "Invalid date in column '{column}' at row {row}: '{value}' does not match format '{format}'"
    )]
    DateParse {
        column: String,
        row: usize,
        value: String,
        format: String,
    },

    #[error("Invalid number in column '{column}' at row {row}: '{value}'")]
    NumericParse {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error(
        "Write verification failed for {path}: expected {expected_rows}x{expected_columns}, read back {found_rows}x{found_columns}"
    )]
    WriteVerification {
        path: PathBuf,
        expected_rows: usize,
        expected_columns: usize,
        found_rows: usize,
        found_columns: usize,
    },
}

impl CleanerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CleanerError>;
