//! Aspect enum policy.
//!
//! An aspect enum is a scoped enum whose local name ends in the policy
//! suffix (`Aspect` by default). Its enumerator list is expected to end with
//! the terminator entry (`_end`). Policy violations are reported as data and
//! never abort a scan.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::enum_decl::EnumDeclaration;
use crate::domain::token::Position;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AspectPolicy {
    /// Case-sensitive suffix that marks an enum as an aspect enum.
    pub suffix: String,
    /// Exact enumerator name of the terminator.
    pub terminator: String,
}

impl Default for AspectPolicy {
    fn default() -> Self {
        Self {
            suffix: "Aspect".to_string(),
            terminator: "_end".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// No enumerator is named exactly like the terminator.
    MissingTerminator,
    /// Entries declared after the terminator.
    TrailingAfterTerminator { trailing: Vec<String> },
    /// The same qualified enum name was declared twice in one unit.
    DuplicateQualifiedName { first_seen: Position },
}

impl IssueKind {
    pub fn name(&self) -> &'static str {
        match self {
            IssueKind::MissingTerminator => "MissingTerminator",
            IssueKind::TrailingAfterTerminator { .. } => "TrailingAfterTerminator",
            IssueKind::DuplicateQualifiedName { .. } => "DuplicateQualifiedName",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::MissingTerminator | IssueKind::TrailingAfterTerminator { .. } => Severity::Error,
            IssueKind::DuplicateQualifiedName { .. } => Severity::Warning,
        }
    }
}

/// A non-fatal finding about one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    /// Qualified name of the enum the issue is about.
    pub subject: String,
    pub position: Position,
}

impl ValidationIssue {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: `{}` ", self.position, self.severity(), self.subject)?;
        match &self.kind {
            IssueKind::MissingTerminator => f.write_str("has no terminator enumerator"),
            IssueKind::TrailingAfterTerminator { trailing } => {
                write!(f, "declares {} after its terminator", trailing.join(", "))
            }
            IssueKind::DuplicateQualifiedName { first_seen } => {
                write!(f, "was already declared at {}", first_seen)
            }
        }
    }
}

/// A validated aspect enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectRecord {
    pub declaration: EnumDeclaration,
    /// Index of the entry named exactly like the terminator.
    pub terminator_index: Option<usize>,
    pub is_valid: bool,
    pub violations: Vec<ValidationIssue>,
}

impl AspectRecord {
    pub fn qualified_name(&self) -> String {
        self.declaration.name.to_string()
    }

    /// Entries before the terminator, or all entries if there is none.
    pub fn aspect_names(&self) -> Vec<&str> {
        let names = self.declaration.enumerator_names();
        match self.terminator_index {
            Some(idx) => names[..idx].to_vec(),
            None => names,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AspectValidator {
    policy: AspectPolicy,
}

impl AspectValidator {
    pub fn new(policy: AspectPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &AspectPolicy {
        &self.policy
    }

    pub fn is_aspect(&self, decl: &EnumDeclaration) -> bool {
        decl.local_name().ends_with(&self.policy.suffix)
    }

    pub fn validate(&self, declaration: EnumDeclaration) -> AspectRecord {
        let subject = declaration.name.to_string();
        let terminator_index = declaration
            .enumerators
            .iter()
            .position(|e| e.name == self.policy.terminator);

        let mut violations = Vec::new();
        match terminator_index {
            None => violations.push(ValidationIssue {
                kind: IssueKind::MissingTerminator,
                subject,
                position: declaration.position,
            }),
            Some(idx) if idx + 1 < declaration.enumerators.len() => {
                let after = &declaration.enumerators[idx + 1..];
                violations.push(ValidationIssue {
                    kind: IssueKind::TrailingAfterTerminator {
                        trailing: after.iter().map(|e| e.name.clone()).collect(),
                    },
                    subject,
                    position: after[0].position,
                });
            }
            Some(_) => {}
        }

        AspectRecord {
            is_valid: violations.is_empty(),
            declaration,
            terminator_index,
            violations,
        }
    }

    /// Validate the aspect enums among `declarations`, in order.
    pub fn validate_all(&self, declarations: Vec<EnumDeclaration>) -> Vec<AspectRecord> {
        declarations
            .into_iter()
            .filter(|d| self.is_aspect(d))
            .map(|d| self.validate(d))
            .collect()
    }
}
