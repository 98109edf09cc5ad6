//! Core data structures for report cleaning.
//!
//! Defines the column role partition, the numeric formatting convention,
//! and the statistics reported after a run.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

/// Partition of recognised columns into the three parsing roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRoles {
    /// Column parsed as a calendar date
    pub date_column: String,

    /// Money columns parsed as `f64`
    pub amount_columns: Vec<String>,

    /// Whole-number identifier columns parsed as `i64`
    pub id_columns: Vec<String>,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
            amount_columns: vec!["amount".to_string(), "vat".to_string(), "total".to_string()],
            id_columns: vec![
                "delivery_note".to_string(),
                "customer_id".to_string(),
                "invoice_num".to_string(),
            ],
        }
    }
}

impl ColumnRoles {
    /// First column listed under more than one role, or twice in one
    pub fn overlapping_column(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        std::iter::once(&self.date_column)
            .chain(&self.amount_columns)
            .chain(&self.id_columns)
            .map(String::as_str)
            .find(|name| !seen.insert(*name))
    }
}

/// Decimal and thousands separators used by numeric cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub decimal: char,
    pub thousands: char,
}

impl NumberFormat {
    /// `.` groups thousands, `,` marks the decimal point
    pub const CONTINENTAL: Self = Self {
        decimal: ',',
        thousands: '.',
    };

    pub fn new(decimal: char, thousands: char) -> Self {
        Self { decimal, thousands }
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::CONTINENTAL
    }
}

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Validate,
    Normalize,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Read => "read",
            Stage::Validate => "validate",
            Stage::Normalize => "normalize",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// Processing statistics
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub rows_read: usize,
    pub columns: usize,
    pub rows_written: usize,
    pub output_location: String,
    pub stage_timings: Vec<(Stage, Duration)>,
}

impl PipelineStats {
    pub fn total_time(&self) -> Duration {
        self.stage_timings.iter().map(|(_, elapsed)| *elapsed).sum()
    }
}
