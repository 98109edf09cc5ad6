//! Storage location resolution.
//!
//! Works out where the raw report is read from and where the cleaned
//! Parquet file goes: a local path, or an `s3://` URI when remote storage
//! is enabled. Remote credentials come from the process environment.

use crate::config::PipelineConfig;
use crate::error::{CleanerError, Result};
use polars::io::cloud::{AmazonS3ConfigKey, CloudOptions};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A resolved input or output location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    Local(PathBuf),
    Remote { uri: String },
}

impl StorageLocation {
    pub fn is_remote(&self) -> bool {
        matches!(self, StorageLocation::Remote { .. })
    }

    /// Path or URI handed to polars
    pub fn as_path(&self) -> PathBuf {
        match self {
            StorageLocation::Local(path) => path.clone(),
            StorageLocation::Remote { uri } => PathBuf::from(uri),
        }
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageLocation::Local(path) => write!(f, "{}", path.display()),
            StorageLocation::Remote { uri } => f.write_str(uri),
        }
    }
}

/// Location of the raw report
pub fn resolve_input(config: &PipelineConfig) -> Result<StorageLocation> {
    if !config.storage.use_s3 {
        return Ok(StorageLocation::Local(config.inputs.raw_path.clone()));
    }

    let file_name = file_name(&config.inputs.raw_path)?;
    let uri = s3_uri(config, &config.storage.raw_prefix, &file_name)?;
    debug!("Resolved remote input {}", uri);
    Ok(StorageLocation::Remote { uri })
}

/// Location of the cleaned Parquet file
pub fn resolve_output(config: &PipelineConfig) -> Result<StorageLocation> {
    let file_name = config.output_file_name();
    if !config.storage.use_s3 {
        return Ok(StorageLocation::Local(config.outputs.dir.join(file_name)));
    }

    let uri = s3_uri(config, &config.storage.clean_prefix, &file_name)?;
    debug!("Resolved remote output {}", uri);
    Ok(StorageLocation::Remote { uri })
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| {
            CleanerError::config(format!(
                "inputs.raw_path has no file name: {}",
                path.display()
            ))
        })
}

fn s3_uri(config: &PipelineConfig, prefix: &str, file_name: &str) -> Result<String> {
    let bucket = config
        .storage
        .bucket
        .as_deref()
        .filter(|b| !b.is_empty())
        .ok_or_else(|| CleanerError::config("storage.bucket is required for S3 locations"))?;

    let prefix = prefix.trim_matches('/');
    Ok(if prefix.is_empty() {
        format!("s3://{}/{}", bucket, file_name)
    } else {
        format!("s3://{}/{}/{}", bucket, prefix, file_name)
    })
}

/// AWS credentials taken from the environment
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub region: Option<String>,
}

impl fmt::Debug for RemoteCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .field("region", &self.region)
            .finish()
    }
}

impl RemoteCredentials {
    /// Read credentials from the process environment
    pub fn from_env(fallback_region: Option<&str>) -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), fallback_region)
    }

    /// Build credentials from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F, fallback_region: Option<&str>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let access_key_id = get("AWS_ACCESS_KEY_ID")
            .ok_or_else(|| CleanerError::storage("AWS_ACCESS_KEY_ID is not set"))?;
        let secret_access_key = get("AWS_SECRET_ACCESS_KEY")
            .ok_or_else(|| CleanerError::storage("AWS_SECRET_ACCESS_KEY is not set"))?;
        let region = get("AWS_REGION")
            .or_else(|| get("AWS_DEFAULT_REGION"))
            .or_else(|| fallback_region.map(String::from));

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token: get("AWS_SESSION_TOKEN"),
            region,
        })
    }

    /// Convert into polars cloud options
    pub fn to_cloud_options(&self) -> CloudOptions {
        let mut configs = vec![
            (AmazonS3ConfigKey::AccessKeyId, self.access_key_id.clone()),
            (
                AmazonS3ConfigKey::SecretAccessKey,
                self.secret_access_key.clone(),
            ),
        ];
        if let Some(token) = &self.session_token {
            configs.push((AmazonS3ConfigKey::Token, token.clone()));
        }
        if let Some(region) = &self.region {
            configs.push((AmazonS3ConfigKey::Region, region.clone()));
        }
        CloudOptions::default().with_aws(configs)
    }
}

/// Cloud options for `location`, or `None` for local paths
pub fn cloud_options_for(
    location: &StorageLocation,
    config: &PipelineConfig,
) -> Result<Option<CloudOptions>> {
    if !location.is_remote() {
        return Ok(None);
    }
    let credentials = RemoteCredentials::from_env(config.storage.region.as_deref())?;
    debug!("Using remote credentials {:?}", credentials);
    Ok(Some(credentials.to_cloud_options()))
}
