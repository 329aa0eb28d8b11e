// Infrastructure implementations for Aspect Names.

pub mod concurrency;
pub mod config;
pub mod project_loader;

use std::fmt::{self, Write as _};
use std::io;

use log::warn;

use crate::api::dto::SummaryDto;
use crate::domain::aspect::AspectPolicy;
use crate::domain::error::ScanError;
use crate::domain::report::{ScanSummary, SourceUnit, UnitReport};
use crate::domain::scanner::AspectScanner;
use crate::ports::{ReportExporter, UnitScanner};

/// Scanner adapter that applies the caller's input size limit.
pub struct DefaultUnitScanner {
    scanner: AspectScanner,
    max_input_bytes: Option<usize>,
}

impl DefaultUnitScanner {
    pub fn new(policy: AspectPolicy, max_input_bytes: Option<usize>) -> Self {
        Self {
            scanner: AspectScanner::new(policy),
            max_input_bytes,
        }
    }
}

impl UnitScanner for DefaultUnitScanner {
    fn scan_unit(&self, unit: &SourceUnit) -> UnitReport {
        if let Some(limit) = self.max_input_bytes {
            if unit.text.len() > limit {
                warn!("{}: skipped, {} bytes exceeds limit of {}", unit.name, unit.text.len(), limit);
                return UnitReport::failed(
                    unit.name.clone(),
                    ScanError::InputTooLarge {
                        len: unit.text.len(),
                        limit,
                    },
                );
            }
        }
        let report = self.scanner.scan(unit);
        if let Some(err) = &report.error {
            warn!("{}: {}", unit.name, err);
        }
        report
    }
}

pub struct JsonExporter;
impl ReportExporter for JsonExporter {
    fn render(&self, summary: &ScanSummary) -> io::Result<String> {
        Ok(serde_json::to_string_pretty(&SummaryDto::from(summary))?)
    }
}

pub struct TextExporter;

impl TextExporter {
    fn write_summary(summary: &ScanSummary, out: &mut String) -> fmt::Result {
        for report in &summary.reports {
            writeln!(out, "{}:", report.unit)?;
            if let Some(err) = &report.error {
                writeln!(out, "  FATAL {}: {}", err.category(), err)?;
                continue;
            }
            for record in &report.records {
                let status = if record.is_valid { "ok" } else { "INVALID" };
                writeln!(
                    out,
                    "  {} [{}] {}",
                    record.qualified_name(),
                    record.declaration.enumerator_names().join(", "),
                    status
                )?;
            }
            for issue in &report.issues {
                writeln!(out, "    {}", issue)?;
            }
        }
        for conflict in summary.index.conflicts() {
            let units: Vec<&str> = conflict.definitions.iter().map(|d| d.unit.as_str()).collect();
            writeln!(
                out,
                "conflict: {} differs between {}",
                conflict.name,
                units.join(", ")
            )?;
        }
        writeln!(
            out,
            "{} aspect enum(s), {} invalid, {} unit(s) failed",
            summary.total_records(),
            summary.invalid_records(),
            summary.failed_units()
        )
    }
}

impl ReportExporter for TextExporter {
    fn render(&self, summary: &ScanSummary) -> io::Result<String> {
        let mut out = String::new();
        Self::write_summary(summary, &mut out).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_limit_is_enforced() {
        let scanner = DefaultUnitScanner::new(AspectPolicy::default(), Some(8));
        let report = scanner.scan_unit(&SourceUnit::new("big.h", "namespace a {}"));
        assert!(matches!(
            report.error,
            Some(ScanError::InputTooLarge { len: 14, limit: 8 })
        ));
    }

    #[test]
    fn test_text_report() {
        let scanner = DefaultUnitScanner::new(AspectPolicy::default(), None);
        let reports = vec![
            scanner.scan_unit(&SourceUnit::new("ok.h", "namespace a { enum class XAspect { x, _end }; }")),
            scanner.scan_unit(&SourceUnit::new("bad.h", "namespace a { enum class XAspect { x }; }")),
        ];
        let text = TextExporter.render(&ScanSummary::new(reports)).unwrap();
        assert!(text.contains("a::XAspect [x, _end] ok"), "{}", text);
        assert!(text.contains("a::XAspect [x] INVALID"), "{}", text);
        assert!(text.contains("conflict: a::XAspect differs between bad.h, ok.h"), "{}", text);
        assert!(text.contains("2 aspect enum(s), 1 invalid, 0 unit(s) failed"), "{}", text);
    }

    #[test]
    fn test_json_report_parses_back() {
        let scanner = DefaultUnitScanner::new(AspectPolicy::default(), None);
        let reports = vec![scanner.scan_unit(&SourceUnit::new("x.h", "}"))];
        let json = JsonExporter.render(&ScanSummary::new(reports)).unwrap();
        let dto: SummaryDto = serde_json::from_str(&json).unwrap();
        assert_eq!(dto.failed_units, 1);
        assert_eq!(dto.units[0].error.as_ref().unwrap().category, "StructuralError");
    }
}
