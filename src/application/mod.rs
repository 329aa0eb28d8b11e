use anyhow::{Context, Result};
use log::info;
use rayon::prelude::*;

use crate::domain::report::{ScanSummary, SourceUnit};
use crate::ports::{ReportExporter, UnitScanner};

pub struct ScanUsecase<'a> {
    pub scanner: &'a dyn UnitScanner,
    pub exporter: &'a dyn ReportExporter,
}

impl<'a> ScanUsecase<'a> {
    /// Scan all units in parallel; reports keep the order of `units`.
    pub fn scan(&self, units: &[SourceUnit]) -> ScanSummary {
        let scanner = self.scanner;
        let reports = units
            .par_iter()
            .map(|unit| scanner.scan_unit(unit))
            .collect();
        let summary = ScanSummary::new(reports);
        info!(
            "Scanned {} unit(s): {} aspect enum(s), {} invalid, {} failed",
            units.len(),
            summary.total_records(),
            summary.invalid_records(),
            summary.failed_units()
        );
        summary
    }

    pub fn run(&self, units: &[SourceUnit], export_path: &str) -> Result<ScanSummary> {
        let summary = self.scan(units);
        self.exporter
            .export(&summary, export_path)
            .with_context(|| format!("Failed to write report to {}", export_path))?;
        Ok(summary)
    }
}
