//! Scan configuration.
//!
//! Loaded from a TOML file; every key is optional:
//!
//! ```toml
//! strict = true
//! extensions = ["h", "hpp"]
//! max_input_bytes = 1048576
//! jobs = 4
//!
//! [policy]
//! suffix = "Aspect"
//! terminator = "_end"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::aspect::AspectPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    pub policy: AspectPolicy,
    /// Header file extensions picked up when walking folders.
    pub extensions: Vec<String>,
    pub max_input_bytes: Option<usize>,
    /// Worker threads; defaults to half the cores.
    pub jobs: Option<usize>,
    /// Treat invalid aspect enums as a failing run.
    pub strict: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            policy: AspectPolicy::default(),
            extensions: ["h", "hh", "hpp", "hxx", "h++"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_input_bytes: None,
            jobs: None,
            strict: false,
        }
    }
}

impl ScanConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid scan config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("In config {}", path.display()))
    }
}
