use serde::{Deserialize, Serialize};

use crate::domain::aspect::{AspectRecord, IssueKind, ValidationIssue};
use crate::domain::error::ScanError;
use crate::domain::index::AspectConflict;
use crate::domain::report::{ScanSummary, UnitReport};
use crate::domain::token::Position;

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryDto {
    pub units: Vec<UnitDto>,
    pub conflicts: Vec<ConflictDto>,
    pub total_records: usize,
    pub invalid_records: usize,
    pub failed_units: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnitDto {
    pub unit: String,
    pub records: Vec<RecordDto>,
    pub issues: Vec<IssueDto>,
    pub error: Option<ErrorDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordDto {
    pub qualified_name: String,
    pub scope: Vec<String>,
    pub name: String,
    pub underlying_type: Option<String>,
    pub enumerators: Vec<EnumeratorDto>,
    pub terminator_index: Option<usize>,
    pub is_valid: bool,
    pub violations: Vec<IssueDto>,
    pub line: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EnumeratorDto {
    pub name: String,
    pub value: Option<String>,
    pub resolved: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IssueDto {
    pub kind: String,
    pub severity: String,
    pub subject: String,
    pub line: usize,
    pub column: usize,
    pub detail: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDto {
    pub category: String,
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub scope: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConflictDto {
    pub name: String,
    pub units: Vec<String>,
}

impl From<&ValidationIssue> for IssueDto {
    fn from(issue: &ValidationIssue) -> Self {
        let detail = match &issue.kind {
            IssueKind::MissingTerminator => vec![],
            IssueKind::TrailingAfterTerminator { trailing } => trailing.clone(),
            IssueKind::DuplicateQualifiedName { first_seen } => vec![first_seen.to_string()],
        };
        IssueDto {
            kind: issue.kind.name().to_string(),
            severity: issue.severity().to_string(),
            subject: issue.subject.clone(),
            line: issue.position.line,
            column: issue.position.column,
            detail,
        }
    }
}

impl From<&AspectRecord> for RecordDto {
    fn from(record: &AspectRecord) -> Self {
        let decl = &record.declaration;
        let enumerators = decl
            .enumerators
            .iter()
            .zip(decl.resolved_values())
            .map(|(entry, resolved)| EnumeratorDto {
                name: entry.name.clone(),
                value: entry.explicit_value.clone(),
                resolved: resolved.and_then(|v| i64::try_from(v).ok()),
            })
            .collect();
        RecordDto {
            qualified_name: decl.name.to_string(),
            scope: decl.name.scope.segments().to_vec(),
            name: decl.name.name.clone(),
            underlying_type: decl.underlying_type.clone(),
            enumerators,
            terminator_index: record.terminator_index,
            is_valid: record.is_valid,
            violations: record.violations.iter().map(IssueDto::from).collect(),
            line: decl.position.line,
        }
    }
}

impl From<&ScanError> for ErrorDto {
    fn from(err: &ScanError) -> Self {
        let position: Option<Position> = err.position();
        ErrorDto {
            category: err.category().to_string(),
            message: err.to_string(),
            line: position.map(|p| p.line),
            column: position.map(|p| p.column),
            scope: err.scope().map(|s| s.to_string()),
        }
    }
}

impl From<&UnitReport> for UnitDto {
    fn from(report: &UnitReport) -> Self {
        UnitDto {
            unit: report.unit.clone(),
            records: report.records.iter().map(RecordDto::from).collect(),
            issues: report.issues.iter().map(IssueDto::from).collect(),
            error: report.error.as_ref().map(ErrorDto::from),
        }
    }
}

impl From<AspectConflict> for ConflictDto {
    fn from(conflict: AspectConflict) -> Self {
        ConflictDto {
            name: conflict.name,
            units: conflict.definitions.into_iter().map(|d| d.unit).collect(),
        }
    }
}

impl From<&ScanSummary> for SummaryDto {
    fn from(summary: &ScanSummary) -> Self {
        SummaryDto {
            units: summary.reports.iter().map(UnitDto::from).collect(),
            conflicts: summary.index.conflicts().into_iter().map(ConflictDto::from).collect(),
            total_records: summary.total_records(),
            invalid_records: summary.invalid_records(),
            failed_units: summary.failed_units(),
        }
    }
}
