//! Report Cleaner Library
//!
//! Converts delimited business reports with continental number and date
//! formatting into typed Apache Parquet files.
//!
//! This library provides tools for:
//! - Loading pipeline settings from YAML
//! - Resolving local or S3 input and output locations
//! - Checking that every required column is present
//! - Normalizing dates, money amounts and identifiers into typed columns
//! - Writing Snappy-compressed Parquet with read-back verification
//!
//! ```no_run
//! use report_cleaner::config::PipelineConfig;
//! use report_cleaner::processor::{ReportProcessor, reporter::TracingReporter};
//! use std::path::Path;
//!
//! let config = PipelineConfig::load(Path::new("configs/config.dev.yaml"))?;
//! let stats = ReportProcessor::new(config)?.process(&mut TracingReporter)?;
//! println!("{} rows written", stats.rows_written);
//! # Ok::<(), report_cleaner::CleanerError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod normalizer;
pub mod processor;
pub mod schema;
pub mod storage;

pub use config::PipelineConfig;
pub use error::{CleanerError, Result};
pub use normalizer::{FieldNormalizer, normalize};
pub use processor::ReportProcessor;
pub use schema::validate_schema;
