//! Fatal error taxonomy for a unit scan.
//!
//! Every variant that can happen mid-scan carries the offending position and
//! the scope path that was open at that point. Terminator policy problems are
//! not errors; see [`crate::domain::aspect::ValidationIssue`].

use thiserror::Error;

use crate::domain::scope::ScopePath;
use crate::domain::token::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated character literal")]
    UnterminatedChar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} starting at {position}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralErrorKind {
    #[error("closing brace without a matching opening brace")]
    UnmatchedClose,
    #[error("namespace `{name}` opened at {opened_at} is never closed")]
    UnclosedNamespace { name: String, opened_at: Position },
    #[error("block opened at {opened_at} is never closed")]
    UnclosedBlock { opened_at: Position },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("lex error in `{scope}`: {source}")]
    Lex { source: LexError, scope: ScopePath },

    #[error("structural error at {position} in `{scope}`: {kind}")]
    Structural {
        kind: StructuralErrorKind,
        position: Position,
        scope: ScopePath,
    },

    #[error("enum `{name}` declared at {position} in `{scope}` has no closing brace")]
    UnterminatedEnum {
        name: String,
        position: Position,
        scope: ScopePath,
    },

    #[error("malformed header for enum `{name}` at {position} in `{scope}`: {reason}")]
    MalformedEnumHeader {
        name: String,
        reason: String,
        position: Position,
        scope: ScopePath,
    },

    #[error("malformed enumerator in `{name}` at {position}: expected {expected}, found `{found}`")]
    MalformedEnumerator {
        name: String,
        expected: &'static str,
        found: String,
        position: Position,
        scope: ScopePath,
    },

    #[error("input of {len} bytes exceeds the {limit}-byte limit")]
    InputTooLarge { len: usize, limit: usize },

    #[error("scan cancelled at {position} in `{scope}`")]
    Cancelled { position: Position, scope: ScopePath },
}

impl ScanError {
    pub fn lex(source: LexError, scope: &ScopePath) -> Self {
        ScanError::Lex {
            source,
            scope: scope.clone(),
        }
    }

    /// Short stable name of the error class, used in reports.
    pub fn category(&self) -> &'static str {
        match self {
            ScanError::Lex { .. } => "LexError",
            ScanError::Structural { .. } => "StructuralError",
            ScanError::UnterminatedEnum { .. } => "UnterminatedEnumError",
            ScanError::MalformedEnumHeader { .. } => "MalformedEnumHeaderError",
            ScanError::MalformedEnumerator { .. } => "MalformedEnumeratorError",
            ScanError::InputTooLarge { .. } => "InputTooLarge",
            ScanError::Cancelled { .. } => "Cancelled",
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            ScanError::Lex { source, .. } => Some(source.position),
            ScanError::Structural { position, .. }
            | ScanError::UnterminatedEnum { position, .. }
            | ScanError::MalformedEnumHeader { position, .. }
            | ScanError::MalformedEnumerator { position, .. }
            | ScanError::Cancelled { position, .. } => Some(*position),
            ScanError::InputTooLarge { .. } => None,
        }
    }

    /// Scope path that was open when the scan stopped.
    pub fn scope(&self) -> Option<&ScopePath> {
        match self {
            ScanError::Lex { scope, .. }
            | ScanError::Structural { scope, .. }
            | ScanError::UnterminatedEnum { scope, .. }
            | ScanError::MalformedEnumHeader { scope, .. }
            | ScanError::MalformedEnumerator { scope, .. }
            | ScanError::Cancelled { scope, .. } => Some(scope),
            ScanError::InputTooLarge { .. } => None,
        }
    }
}
