//! Parquet writing module for cleaned reports
//!
//! Writes the typed DataFrame to a local file or an object-store URI, then
//! reads the result back and checks its shape before reporting success.

use crate::config::CompressionAlgorithm;
use crate::error::{CleanerError, Result};
use crate::storage::StorageLocation;

use polars::io::cloud::CloudOptions;
use polars::prelude::StatisticsOptions;
use polars::prelude::{
    len, DataFrame, IntoLazy, LazyFrame, ParquetWriteOptions,
    ParquetWriter as PolarsParquetWriter, ScanArgsParquet, SinkTarget,
};
use std::path::Path;
use tracing::{debug, info, warn};

/// Parquet writer with read-back verification
#[derive(Debug, Clone)]
pub struct ParquetWriter {
    compression: CompressionAlgorithm,
    cloud_options: Option<CloudOptions>,
}

impl ParquetWriter {
    pub fn new(compression: CompressionAlgorithm) -> Self {
        Self {
            compression,
            cloud_options: None,
        }
    }

    /// Credentials used for remote locations
    pub fn with_cloud_options(mut self, cloud_options: Option<CloudOptions>) -> Self {
        self.cloud_options = cloud_options;
        self
    }

    fn write_options(&self) -> ParquetWriteOptions {
        ParquetWriteOptions {
            compression: self.compression.to_polars_compression(),
            statistics: StatisticsOptions::full(),
            ..Default::default()
        }
    }

    /// Write `df` to `location` and return the verified row count
    pub fn write(&self, df: &DataFrame, location: &StorageLocation) -> Result<usize> {
        match location {
            StorageLocation::Local(path) => self.write_local(df.clone(), path)?,
            StorageLocation::Remote { .. } => self.write_remote(df, location)?,
        }

        let rows = self.verify_or_discard(df, location)?;
        info!("Wrote {} rows to {}", rows, location);
        Ok(rows)
    }

    /// Verify the written output, removing a local file that fails the check
    fn verify_or_discard(&self, expected: &DataFrame, location: &StorageLocation) -> Result<usize> {
        let result = self.verify(expected, location);
        if result.is_err() {
            if let StorageLocation::Local(path) = location {
                match std::fs::remove_file(path) {
                    Ok(()) => warn!("Removed unverified output {}", path.display()),
                    Err(e) => warn!("Could not remove {}: {}", path.display(), e),
                }
            }
        }
        result
    }

    fn write_local(&self, mut df: DataFrame, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let write_options = self.write_options();
        let file = std::fs::File::create(path)?;
        PolarsParquetWriter::new(file)
            .with_compression(write_options.compression)
            .with_statistics(write_options.statistics)
            .finish(&mut df)
            .map_err(|e| {
                CleanerError::storage(format!(
                    "Failed to write parquet {}: {}",
                    path.display(),
                    e
                ))
            })?;

        debug!("Local parquet write finished: {}", path.display());
        Ok(())
    }

    fn write_remote(&self, df: &DataFrame, location: &StorageLocation) -> Result<()> {
        df.clone()
            .lazy()
            .sink_parquet(
                SinkTarget::Path(location.as_path().into()),
                self.write_options(),
                self.cloud_options.clone(),
                Default::default(),
            )
            .and_then(|sink_frame| sink_frame.collect())
            .map_err(|e| {
                CleanerError::storage(format!("Failed to write parquet {}: {}", location, e))
            })?;

        debug!("Remote parquet sink finished: {}", location);
        Ok(())
    }

    /// Re-read the written file and compare its shape with `expected`
    fn verify(&self, expected: &DataFrame, location: &StorageLocation) -> Result<usize> {
        let scan_args = ScanArgsParquet {
            cloud_options: self.cloud_options.clone(),
            ..Default::default()
        };
        let mut written = LazyFrame::scan_parquet(location.as_path(), scan_args)?;

        let found_columns = written.collect_schema()?.len();
        let count_df = written.select([len()]).collect()?;
        let found_rows = count_df
            .column("len")?
            .get(0)?
            .try_extract::<usize>()?;

        if found_rows != expected.height() || found_columns != expected.width() {
            return Err(CleanerError::WriteVerification {
                path: location.as_path(),
                expected_rows: expected.height(),
                expected_columns: expected.width(),
                found_rows,
                found_columns,
            });
        }

        debug!(
            "Verified {}: {} rows x {} columns",
            location, found_rows, found_columns
        );
        Ok(found_rows)
    }
}
