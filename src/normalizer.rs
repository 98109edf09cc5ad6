//! Locale-aware field normalization.
//!
//! Converts the string columns produced by the report reader into typed
//! columns according to their role: dates, money amounts and integer
//! identifiers. The first unparseable cell aborts the whole batch and the
//! error names the column, row and raw value.

use crate::config::PipelineConfig;
use crate::error::{CleanerError, Result};
use crate::models::{ColumnRoles, NumberFormat};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use tracing::debug;

/// Days from 0001-01-01 (CE) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Normalizes the role columns of a report
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    date_format: String,
    roles: ColumnRoles,
    number_format: NumberFormat,
}

impl FieldNormalizer {
    pub fn new(
        date_format: impl Into<String>,
        roles: ColumnRoles,
        number_format: NumberFormat,
    ) -> Self {
        Self {
            date_format: date_format.into(),
            roles,
            number_format,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Ok(Self::new(
            config.format.date_format.clone(),
            config.schema.roles.clone(),
            config.number_format()?,
        ))
    }

    /// Return a new frame with the role columns converted.
    ///
    /// Row count, column order and non-role columns are left untouched.
    /// Role columns absent from `df` are skipped.
    pub fn normalize(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut out = df.clone();

        if let Some(series) = self.convert_dates(df)? {
            out.with_column(series)?;
        }

        for name in &self.roles.amount_columns {
            if let Some(values) = string_column(df, name)? {
                let parsed =
                    convert_cells(name, values, |raw| parse_amount(raw, self.number_format))?;
                out.with_column(Series::new(name.as_str().into(), parsed))?;
            }
        }

        for name in &self.roles.id_columns {
            if let Some(values) = string_column(df, name)? {
                let parsed =
                    convert_cells(name, values, |raw| parse_identifier(raw, self.number_format))?;
                out.with_column(Series::new(name.as_str().into(), parsed))?;
            }
        }

        debug_assert_eq!(out.height(), df.height());
        debug!(
            "Normalized {} rows ({} amount, {} identifier columns)",
            out.height(),
            self.roles.amount_columns.len(),
            self.roles.id_columns.len()
        );
        Ok(out)
    }

    fn convert_dates(&self, df: &DataFrame) -> Result<Option<Series>> {
        let name = &self.roles.date_column;
        let Some(values) = string_column(df, name)? else {
            return Ok(None);
        };

        let mut days = Vec::with_capacity(values.len());
        for (row, cell) in values.into_iter().enumerate() {
            let day = match cell {
                Some(raw) => {
                    let date = parse_date(raw, &self.date_format).ok_or_else(|| {
                        CleanerError::DateParse {
                            column: name.clone(),
                            row,
                            value: raw.to_string(),
                            format: self.date_format.clone(),
                        }
                    })?;
                    Some(date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
                }
                None => None,
            };
            days.push(day);
        }

        let series = Series::new(name.as_str().into(), days).cast(&DataType::Date)?;
        Ok(Some(series))
    }
}

/// Normalize with the default roles and continental separators
pub fn normalize(df: &DataFrame, date_format: &str) -> Result<DataFrame> {
    FieldNormalizer::new(date_format, ColumnRoles::default(), NumberFormat::CONTINENTAL)
        .normalize(df)
}

/// Parse a money amount such as `"1.234,56"`.
///
/// Thousands separators are removed before the decimal separator is
/// rewritten to `.`; the other order corrupts values holding both.
pub fn parse_amount(raw: &str, format: NumberFormat) -> Option<f64> {
    let normalized = raw
        .trim()
        .replace(format.thousands, "")
        .replace(format.decimal, ".");
    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parse a whole-number identifier such as `"40.273"`.
///
/// Both separators are treated as grouping noise.
pub fn parse_identifier(raw: &str, format: NumberFormat) -> Option<i64> {
    let normalized: String = raw
        .trim()
        .chars()
        .filter(|c| *c != format.thousands && *c != format.decimal)
        .collect();
    normalized.parse::<i64>().ok()
}

/// Strictly parse a calendar date with a chrono format pattern.
///
/// chrono's `%Y` takes any number of digits and an optional sign, so a
/// `%Y` pattern additionally requires a four-digit year with no sign and
/// no digit run longer than the formatted date would produce. Padding is
/// not stripped.
pub fn parse_date(raw: &str, pattern: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(raw, pattern).ok()?;
    if !pattern.contains("%Y") {
        return Some(date);
    }

    if !(1000..=9999).contains(&date.year()) {
        return None;
    }
    if sign_count(raw) != sign_count(pattern) {
        return None;
    }
    let formatted = date.format(pattern).to_string();
    if longest_digit_run(raw) > longest_digit_run(&formatted) {
        return None;
    }
    Some(date)
}

fn sign_count(text: &str) -> usize {
    text.chars().filter(|c| matches!(c, '+' | '-')).count()
}

fn longest_digit_run(text: &str) -> usize {
    text.split(|c: char| !c.is_ascii_digit())
        .map(str::len)
        .max()
        .unwrap_or(0)
}

fn string_column<'a>(df: &'a DataFrame, name: &str) -> Result<Option<&'a StringChunked>> {
    if df.get_column_index(name).is_none() {
        debug!("Column '{}' not present, skipping normalization", name);
        return Ok(None);
    }
    let values = df.column(name)?.as_materialized_series().str()?;
    Ok(Some(values))
}

fn convert_cells<T, F>(column: &str, values: &StringChunked, parse: F) -> Result<Vec<Option<T>>>
where
    F: Fn(&str) -> Option<T>,
{
    let mut parsed = Vec::with_capacity(values.len());
    for (row, cell) in values.into_iter().enumerate() {
        let value = match cell {
            Some(raw) => Some(parse(raw).ok_or_else(|| CleanerError::NumericParse {
                column: column.to_string(),
                row,
                value: raw.to_string(),
            })?),
            None => None,
        };
        parsed.push(value);
    }
    Ok(parsed)
}
