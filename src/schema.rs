//! Required-column validation.
//!
//! A pure check over column names. Cell values and dtypes are never
//! inspected here; that is the normalizer's job.

use crate::error::{CleanerError, Result};
use polars::prelude::DataFrame;
use std::collections::HashSet;
use tracing::debug;

/// Ensure every required column is present in `df`.
///
/// On failure the error lists all missing names in the order they were
/// required, each reported once.
pub fn validate_schema<S: AsRef<str>>(df: &DataFrame, required: &[S]) -> Result<()> {
    let present: HashSet<&str> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .collect();

    let mut seen = HashSet::new();
    let missing: Vec<String> = required
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !present.contains(name) && seen.insert(*name))
        .map(String::from)
        .collect();

    if !missing.is_empty() {
        return Err(CleanerError::Schema { missing });
    }

    debug!("Schema validated: {} required columns present", required.len());
    Ok(())
}
