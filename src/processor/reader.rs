//! Delimited report reading.
//!
//! Every column is loaded as text; typing is left to the normalizer so
//! that locale formatting never reaches the polars CSV parser.

use crate::error::{CleanerError, Result};
use crate::storage::StorageLocation;

use polars::io::cloud::CloudOptions;
use polars::prelude::*;
use tracing::debug;

/// Reads raw reports into an all-string DataFrame
#[derive(Debug, Clone)]
pub struct ReportReader {
    delimiter: u8,
    cloud_options: Option<CloudOptions>,
}

impl ReportReader {
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            cloud_options: None,
        }
    }

    /// Credentials used for remote locations
    pub fn with_cloud_options(mut self, cloud_options: Option<CloudOptions>) -> Self {
        self.cloud_options = cloud_options;
        self
    }

    /// Load the whole report into memory
    pub fn read(&self, location: &StorageLocation) -> Result<DataFrame> {
        if let StorageLocation::Local(path) = location {
            if !path.exists() {
                return Err(CleanerError::InputNotFound { path: path.clone() });
            }
        }

        debug!(
            "Reading report {} with delimiter '{}'",
            location, self.delimiter as char
        );

        // infer_schema_length of zero keeps every column as String
        let df = LazyCsvReader::new(location.as_path())
            .with_has_header(true)
            .with_separator(self.delimiter)
            .with_infer_schema_length(Some(0))
            .with_cloud_options(self.cloud_options.clone())
            .finish()?
            .collect()?;

        debug!(
            "Read {} rows x {} columns from {}",
            df.height(),
            df.width(),
            location
        );
        Ok(df)
    }
}
