//! Scan inputs and outputs.

use crate::domain::aspect::{AspectRecord, Severity, ValidationIssue};
use crate::domain::error::ScanError;
use crate::domain::index::AspectIndex;

/// A named piece of header text handed in by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub name: String,
    pub text: String,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Result of scanning one unit.
///
/// When `error` is set the scan was aborted and `records`/`issues` are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitReport {
    pub unit: String,
    pub records: Vec<AspectRecord>,
    /// Every non-fatal issue of the unit, ordered by source position.
    pub issues: Vec<ValidationIssue>,
    pub error: Option<ScanError>,
}

impl UnitReport {
    pub fn failed(unit: impl Into<String>, error: ScanError) -> Self {
        Self {
            unit: unit.into(),
            records: Vec::new(),
            issues: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.error.is_none() && self.issues.is_empty()
    }

    pub fn invalid_records(&self) -> usize {
        self.records.iter().filter(|r| !r.is_valid).count()
    }

    pub fn warnings(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Warning)
            .count()
    }
}

/// Reports for a batch of units plus the cross-unit index.
pub struct ScanSummary {
    pub reports: Vec<UnitReport>,
    pub index: AspectIndex,
}

impl ScanSummary {
    pub fn new(reports: Vec<UnitReport>) -> Self {
        let index = AspectIndex::build(&reports);
        Self { reports, index }
    }

    pub fn total_records(&self) -> usize {
        self.reports.iter().map(|r| r.records.len()).sum()
    }

    pub fn invalid_records(&self) -> usize {
        self.reports.iter().map(UnitReport::invalid_records).sum()
    }

    pub fn failed_units(&self) -> usize {
        self.reports.iter().filter(|r| r.error.is_some()).count()
    }
}
