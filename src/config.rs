//! Configuration management and validation.
//!
//! The pipeline is driven by a single YAML file read once per run. Every
//! section has defaults, so a minimal file only needs `inputs.raw_path`.

use crate::error::{CleanerError, Result};
use crate::models::{ColumnRoles, NumberFormat};
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default location of the development configuration
pub const DEFAULT_CONFIG_PATH: &str = "configs/config.dev.yaml";

/// Top-level pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub inputs: InputConfig,
    pub outputs: OutputConfig,
    pub format: FormatConfig,
    pub schema: SchemaConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Raw report file; only the file name is used when reading from S3
    pub raw_path: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from("data/raw/reports.csv"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Local output directory
    pub dir: PathBuf,

    /// Output file name, defaults to the input stem with a `.parquet` extension
    pub file_name: Option<String>,

    /// Parquet compression codec
    pub compression: CompressionAlgorithm,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data/clean"),
            file_name: None,
            compression: CompressionAlgorithm::Snappy,
        }
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }
}

/// Reader separators and the date pattern
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub delimiter: String,
    pub decimal: String,
    pub thousands: String,
    pub date_format: String,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            delimiter: ";".to_string(),
            decimal: ",".to_string(),
            thousands: ".".to_string(),
            date_format: "%d/%m/%Y".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    pub required_columns: Vec<String>,

    #[serde(flatten)]
    pub roles: ColumnRoles,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            required_columns: [
                "date",
                "amount",
                "vat",
                "total",
                "delivery_note",
                "customer_id",
                "invoice_num",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            roles: ColumnRoles::default(),
        }
    }
}

/// Remote object storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub use_s3: bool,
    pub bucket: Option<String>,
    pub raw_prefix: String,
    pub clean_prefix: String,

    /// Used only when neither `AWS_REGION` nor `AWS_DEFAULT_REGION` is set
    pub region: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            use_s3: false,
            bucket: None,
            raw_prefix: "raw".to_string(),
            clean_prefix: "clean".to_string(),
            region: None,
        }
    }
}

impl PipelineConfig {
    /// Load and validate configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CleanerError::config(format!(
                "Failed to read configuration {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_yaml(&contents)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Override the input path
    pub fn with_input_path(mut self, path: PathBuf) -> Self {
        self.inputs.raw_path = path;
        self
    }

    /// Override the output directory
    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.outputs.dir = dir;
        self
    }

    /// Check settings that serde cannot express
    pub fn validate(&self) -> Result<()> {
        self.delimiter()?;

        let number_format = self.number_format()?;
        if number_format.decimal == number_format.thousands {
            return Err(CleanerError::config(
                "format.decimal and format.thousands must differ",
            ));
        }

        if let Some(column) = self.schema.roles.overlapping_column() {
            return Err(CleanerError::config(format!(
                "column '{}' is assigned to more than one role",
                column
            )));
        }

        if self.format.date_format.trim().is_empty() {
            return Err(CleanerError::config("format.date_format must not be empty"));
        }

        if self.storage.use_s3 && self.storage.bucket.as_deref().is_none_or(str::is_empty) {
            return Err(CleanerError::config(
                "storage.bucket is required when storage.use_s3 is enabled",
            ));
        }

        Ok(())
    }

    /// Field delimiter as the byte polars expects
    pub fn delimiter(&self) -> Result<u8> {
        let delimiter = single_char("format.delimiter", &self.format.delimiter)?;
        if !delimiter.is_ascii() {
            return Err(CleanerError::config(
                "format.delimiter must be an ASCII character",
            ));
        }
        Ok(delimiter as u8)
    }

    /// Separators threaded into the normalizer
    pub fn number_format(&self) -> Result<NumberFormat> {
        Ok(NumberFormat::new(
            single_char("format.decimal", &self.format.decimal)?,
            single_char("format.thousands", &self.format.thousands)?,
        ))
    }

    /// Name of the Parquet file produced for this run
    pub fn output_file_name(&self) -> String {
        match &self.outputs.file_name {
            Some(name) => name.clone(),
            None => {
                let stem = self
                    .inputs
                    .raw_path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "reports".to_string());
                format!("{}.parquet", stem)
            }
        }
    }
}

fn single_char(key: &str, value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(CleanerError::config(format!(
            "{} must be exactly one character, got '{}'",
            key, value
        ))),
    }
}
