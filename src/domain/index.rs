use dashmap::DashMap;
use rayon::prelude::*;

use crate::domain::report::UnitReport;
use crate::domain::token::Position;

/// Where and how one aspect enum was defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectDefinition {
    pub unit: String,
    pub position: Position,
    pub enumerators: Vec<String>,
    pub is_valid: bool,
}

/// One qualified name defined with different enumerator lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectConflict {
    pub name: String,
    pub definitions: Vec<AspectDefinition>,
}

/// Thread-safe index of aspect enums across many scanned units.
/// Built in parallel from the per-unit reports.
pub struct AspectIndex {
    // Key: qualified enum name
    pub definitions: DashMap<String, Vec<AspectDefinition>>,
}

impl Default for AspectIndex {
    fn default() -> Self {
        Self {
            definitions: DashMap::new(),
        }
    }
}

impl AspectIndex {
    pub fn build(reports: &[UnitReport]) -> Self {
        let index = AspectIndex::default();

        reports.par_iter().for_each(|report| {
            for record in &report.records {
                let def = AspectDefinition {
                    unit: report.unit.clone(),
                    position: record.declaration.position,
                    enumerators: record
                        .declaration
                        .enumerators
                        .iter()
                        .map(|e| e.name.clone())
                        .collect(),
                    is_valid: record.is_valid,
                };
                index
                    .definitions
                    .entry(record.qualified_name())
                    .or_default()
                    .push(def);
            }
        });

        // Insertion order depends on thread scheduling.
        index.definitions.iter_mut().for_each(|mut entry| {
            entry
                .value_mut()
                .sort_by(|a, b| (&a.unit, a.position.offset).cmp(&(&b.unit, b.position.offset)));
        });

        index
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Sorted qualified names.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.definitions.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Cloned to avoid holding DashMap locks.
    pub fn definitions_of(&self, name: &str) -> Vec<AspectDefinition> {
        self.definitions
            .get(name)
            .map(|defs| defs.value().clone())
            .unwrap_or_default()
    }

    /// Names whose definitions disagree on the enumerator list, sorted by name.
    pub fn conflicts(&self) -> Vec<AspectConflict> {
        let mut conflicts: Vec<AspectConflict> = self
            .definitions
            .iter()
            .filter(|entry| {
                let defs = entry.value();
                defs.windows(2).any(|w| w[0].enumerators != w[1].enumerators)
            })
            .map(|entry| AspectConflict {
                name: entry.key().clone(),
                definitions: entry.value().clone(),
            })
            .collect();
        conflicts.sort_by(|a, b| a.name.cmp(&b.name));
        conflicts
    }
}
