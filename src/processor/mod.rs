//! Main processing engine.
//!
//! Orchestrates one cleaning run: resolve storage locations, read the raw
//! report, validate required columns, normalize typed columns, and write
//! the Parquet output. Each stage consumes the previous stage's frame; the
//! write stage only runs once normalization has fully succeeded.

pub mod reader;
pub mod reporter;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::{reader::ReportReader, reporter::Reporter, writer::ParquetWriter};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{PipelineStats, Stage};
use crate::normalizer::FieldNormalizer;
use crate::schema::validate_schema;
use crate::storage::{self, StorageLocation};

use polars::prelude::DataFrame;
use std::time::Instant;
use tracing::debug;

/// Runs the read → validate → normalize → write pipeline
#[derive(Debug)]
pub struct ReportProcessor {
    config: PipelineConfig,
    normalizer: FieldNormalizer,
    input: StorageLocation,
    output: StorageLocation,
}

impl ReportProcessor {
    /// Create a processor from a configuration, validating it first
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = FieldNormalizer::from_config(&config)?;
        let input = storage::resolve_input(&config)?;
        let output = storage::resolve_output(&config)?;

        debug!("Input: {}, output: {}", input, output);

        Ok(Self {
            config,
            normalizer,
            input,
            output,
        })
    }

    pub fn input_location(&self) -> &StorageLocation {
        &self.input
    }

    pub fn output_location(&self) -> &StorageLocation {
        &self.output
    }

    /// Validate and normalize an already loaded report.
    ///
    /// Pure over its input: `raw` is left untouched and a new frame is
    /// returned.
    pub fn clean(&self, raw: &DataFrame) -> Result<DataFrame> {
        validate_schema(raw, &self.config.schema.required_columns)?;
        self.normalizer.normalize(raw)
    }

    /// Main processing entry point
    pub fn process(&self, reporter: &mut dyn Reporter) -> Result<PipelineStats> {
        let mut stats = PipelineStats {
            output_location: self.output.to_string(),
            ..Default::default()
        };

        let input_cloud = storage::cloud_options_for(&self.input, &self.config)?;
        let output_cloud = storage::cloud_options_for(&self.output, &self.config)?;

        let reader = ReportReader::new(self.config.delimiter()?).with_cloud_options(input_cloud);
        let raw = run_stage(reporter, &mut stats, Stage::Read, || {
            let df = reader.read(&self.input)?;
            let rows = df.height();
            Ok((df, rows))
        })?;
        stats.rows_read = raw.height();
        stats.columns = raw.width();

        run_stage(reporter, &mut stats, Stage::Validate, || {
            validate_schema(&raw, &self.config.schema.required_columns)?;
            Ok(((), raw.height()))
        })?;

        let cleaned = run_stage(reporter, &mut stats, Stage::Normalize, || {
            let df = self.normalizer.normalize(&raw)?;
            let rows = df.height();
            Ok((df, rows))
        })?;
        drop(raw);

        let writer = ParquetWriter::new(self.config.outputs.compression)
            .with_cloud_options(output_cloud);
        stats.rows_written = run_stage(reporter, &mut stats, Stage::Write, || {
            let rows = writer.write(&cleaned, &self.output)?;
            Ok((rows, rows))
        })?;

        reporter.pipeline_finished(&stats);
        Ok(stats)
    }
}

/// Run one stage, timing it and notifying the reporter on success
fn run_stage<T, F>(
    reporter: &mut dyn Reporter,
    stats: &mut PipelineStats,
    stage: Stage,
    body: F,
) -> Result<T>
where
    F: FnOnce() -> Result<(T, usize)>,
{
    reporter.stage_started(stage);
    let start = Instant::now();
    let (value, rows) = body()?;
    let elapsed = start.elapsed();

    stats.stage_timings.push((stage, elapsed));
    reporter.stage_finished(stage, rows, elapsed);
    Ok(value)
}
