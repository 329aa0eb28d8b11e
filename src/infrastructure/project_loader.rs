use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::domain::report::SourceUnit;

pub struct ProjectLoader {
    extensions: Vec<String>,
}

impl ProjectLoader {
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    /// Read explicitly named files. A file that cannot be read fails the
    /// whole load, so a named header is never silently left unchecked.
    pub fn load_files(&self, paths: &[String]) -> Result<Vec<SourceUnit>> {
        paths
            .iter()
            .map(|path| {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("Cannot read input file {}", path))?;
                Ok(SourceUnit::new(path.clone(), text))
            })
            .collect()
    }

    /// Recursively collect header files under `dir`, sorted by path.
    pub fn load_folder(&self, dir: &str) -> Result<Vec<SourceUnit>> {
        let mut units = Vec::new();
        self.collect_recursive(Path::new(dir), &mut units)?;
        units.sort_by(|a, b| a.name.cmp(&b.name));
        debug!("{}: collected {} header(s)", dir, units.len());
        Ok(units)
    }

    fn is_header(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| *e == ext.to_lowercase()))
            .unwrap_or(false)
    }

    fn collect_recursive(&self, dir: &Path, out: &mut Vec<SourceUnit>) -> Result<()> {
        if dir.ends_with("target") || dir.ends_with(".git") {
            return Ok(());
        }
        if dir.is_file() {
            if self.is_header(dir) {
                let text = fs::read_to_string(dir)
                    .with_context(|| format!("Failed to read file {}", dir.display()))?;
                out.push(SourceUnit::new(dir.display().to_string(), text));
            }
            return Ok(());
        }

        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                self.collect_recursive(&path, out)?;
            } else if self.is_header(&path) {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read file {}", path.display()))?;
                out.push(SourceUnit::new(path.display().to_string(), text));
            }
        }
        Ok(())
    }
}
