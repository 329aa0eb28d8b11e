//! Namespace scope tracking.
//!
//! Brace depth is counted for every block; only namespace blocks contribute
//! segments to the scope path.

use std::fmt;

use crate::domain::error::{LexError, StructuralErrorKind};
use crate::domain::filter::TokenStream;
use crate::domain::token::{Position, TokenKind};

/// Enclosing namespace names, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ScopePath {
    segments: Vec<String>,
}

impl ScopePath {
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_global(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn qualify(&self, name: impl Into<String>) -> QualifiedName {
        QualifiedName {
            scope: self.clone(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            f.write_str("<global>")
        } else {
            f.write_str(&self.segments.join("::"))
        }
    }
}

/// Scope path plus local name, e.g. `package::b::c::ModuleCAspect`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    pub scope: ScopePath,
    pub name: String,
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scope.is_global() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}::{}", self.scope, self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    /// `namespace a::b {` contributes two segments, `namespace {` none.
    Namespace { segments: Vec<String> },
    /// Class, struct, function, plain enum or any other braced block.
    Other,
}

#[derive(Debug, Clone)]
struct ScopeFrame {
    kind: ScopeKind,
    opened_at: Position,
}

#[derive(Debug, Default)]
pub struct NamespaceTracker {
    frames: Vec<ScopeFrame>,
}

impl NamespaceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called right after a `namespace` keyword was consumed.
    ///
    /// Consumes `name(::name)* {` and opens a namespace frame. Aliases
    /// (`namespace x = y;`) and using-directives open nothing; the tokens
    /// after the names are left in the stream.
    pub fn enter_namespace(
        &mut self,
        stream: &mut TokenStream<'_>,
        keyword_at: Position,
    ) -> Result<bool, LexError> {
        let mut segments = Vec::new();
        while let TokenKind::Identifier(name) = stream.peek_kind()? {
            stream.next_token()?;
            segments.push(name);
            if stream.eat_punct(':')?.is_none() {
                break;
            }
            stream.eat_punct(':')?;
        }
        if stream.eat_punct('{')?.is_none() {
            return Ok(false);
        }
        self.frames.push(ScopeFrame {
            kind: ScopeKind::Namespace { segments },
            opened_at: keyword_at,
        });
        Ok(true)
    }

    pub fn open_block(&mut self, at: Position) {
        self.frames.push(ScopeFrame {
            kind: ScopeKind::Other,
            opened_at: at,
        });
    }

    /// Pop the innermost frame for a `}`.
    pub fn close(&mut self) -> Result<ScopeKind, StructuralErrorKind> {
        self.frames
            .pop()
            .map(|frame| frame.kind)
            .ok_or(StructuralErrorKind::UnmatchedClose)
    }

    /// True when every open frame is a namespace, i.e. between top-level
    /// declarations.
    pub fn in_namespace_scope(&self) -> bool {
        self.frames
            .iter()
            .all(|frame| matches!(frame.kind, ScopeKind::Namespace { .. }))
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn current_path(&self) -> ScopePath {
        let segments = self
            .frames
            .iter()
            .filter_map(|frame| match &frame.kind {
                ScopeKind::Namespace { segments } => Some(segments.iter().cloned()),
                ScopeKind::Other => None,
            })
            .flatten()
            .collect();
        ScopePath { segments }
    }

    /// Check that nothing is left open at end of input.
    pub fn finish(&self) -> Result<(), StructuralErrorKind> {
        match self.frames.last() {
            None => Ok(()),
            Some(frame) => Err(match &frame.kind {
                ScopeKind::Namespace { segments } => StructuralErrorKind::UnclosedNamespace {
                    name: if segments.is_empty() {
                        "(anonymous)".to_string()
                    } else {
                        segments.join("::")
                    },
                    opened_at: frame.opened_at,
                },
                ScopeKind::Other => StructuralErrorKind::UnclosedBlock {
                    opened_at: frame.opened_at,
                },
            }),
        }
    }
}
