use crate::domain::report::{ScanSummary, SourceUnit, UnitReport};

/// Scans one unit. Shared across worker threads, so implementations hold no
/// per-scan state.
pub trait UnitScanner: Send + Sync {
    fn scan_unit(&self, unit: &SourceUnit) -> UnitReport;
}

pub trait ReportExporter {
    fn render(&self, summary: &ScanSummary) -> std::io::Result<String>;

    /// Write the rendered report to `path`, or to stdout for `-`.
    fn export(&self, summary: &ScanSummary, path: &str) -> std::io::Result<()> {
        let content = self.render(summary)?;
        if path == "-" {
            use std::io::Write;
            let mut out = std::io::stdout().lock();
            out.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                out.write_all(b"\n")?;
            }
            return out.flush();
        }
        std::fs::write(path, content)
    }
}
