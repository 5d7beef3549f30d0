//! Per-generation progress rows (§6): generation, cumulative accepted
//! count, high-support count, low-variance count, mean fitness — one
//! row per `GenerationReport` emitted by the driver.

use anyhow::Context;
use std::fs::File;
use std::path::Path;

use crate::evolve::GenerationReport;

pub struct ProgressWriter {
    writer: csv::Writer<File>,
}

impl ProgressWriter {
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .from_path(path)
            .with_context(|| format!("opening progress output {}", path.display()))?;
        writer.write_record(["generation", "accepted_cumulative", "high_support_cumulative", "low_variance_cumulative", "mean_fitness"])?;
        Ok(Self { writer })
    }

    pub fn write_row(&mut self, report: &GenerationReport) -> anyhow::Result<()> {
        self.writer.write_record([
            report.generation.to_string(),
            report.accepted_cumulative.to_string(),
            report.high_support_cumulative.to_string(),
            report.low_variance_cumulative.to_string(),
            report.mean_fitness.to_string(),
        ])?;
        Ok(())
    }

    pub fn finish(mut self) -> anyhow::Result<()> {
        self.writer.flush().context("flushing progress output")?;
        Ok(())
    }
}
