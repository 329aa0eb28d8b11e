//! Single-pass unit scanner.
//!
//! Each call owns a fresh [`ScanContext`]: token stream, namespace tracker and
//! collected declarations live there and are dropped together when the scan
//! ends. Nothing is shared between scans, so one `AspectScanner` can serve
//! many threads at once.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::domain::aspect::{AspectPolicy, AspectRecord, AspectValidator, IssueKind, ValidationIssue};
use crate::domain::enum_decl::{EnumDeclaration, EnumExtractor};
use crate::domain::error::{LexError, ScanError, StructuralErrorKind};
use crate::domain::filter::{SemanticToken, TokenStream};
use crate::domain::report::{SourceUnit, UnitReport};
use crate::domain::scope::NamespaceTracker;
use crate::domain::token::{Keyword, Position, TokenKind};

/// Everything extracted from one unit before aspect validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// All scoped enum declarations in source order.
    pub declarations: Vec<EnumDeclaration>,
    /// Duplicate qualified names.
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, Default)]
pub struct AspectScanner {
    validator: AspectValidator,
}

impl AspectScanner {
    pub fn new(policy: AspectPolicy) -> Self {
        Self {
            validator: AspectValidator::new(policy),
        }
    }

    pub fn policy(&self) -> &AspectPolicy {
        self.validator.policy()
    }

    pub fn scan(&self, unit: &SourceUnit) -> UnitReport {
        self.scan_with_cancel(unit, &AtomicBool::new(false))
    }

    /// Scan `unit`, giving up at the next top-level `;` or `}` once `cancel`
    /// is set. Enum bodies are never interrupted.
    pub fn scan_with_cancel(&self, unit: &SourceUnit, cancel: &AtomicBool) -> UnitReport {
        match self.scan_text(&unit.text, cancel) {
            Ok((records, issues)) => {
                debug!(
                    "scanned {}: {} aspect enum(s), {} issue(s)",
                    unit.name,
                    records.len(),
                    issues.len()
                );
                UnitReport {
                    unit: unit.name.clone(),
                    records,
                    issues,
                    error: None,
                }
            }
            Err(e) => {
                debug!("scan of {} aborted: {}", unit.name, e);
                UnitReport::failed(unit.name.clone(), e)
            }
        }
    }

    /// Stages up to enum extraction, without the aspect policy.
    pub fn extract(&self, text: &str) -> Result<Extraction, ScanError> {
        ScanContext::new(text, &AtomicBool::new(false)).run()
    }

    fn scan_text(
        &self,
        text: &str,
        cancel: &AtomicBool,
    ) -> Result<(Vec<AspectRecord>, Vec<ValidationIssue>), ScanError> {
        let extraction = ScanContext::new(text, cancel).run()?;
        let records = self.validator.validate_all(extraction.declarations);
        let mut issues = extraction.issues;
        issues.extend(records.iter().flat_map(|r| r.violations.iter().cloned()));
        issues.sort_by_key(|i| i.position.offset);
        Ok((records, issues))
    }
}

struct ScanContext<'a> {
    stream: TokenStream<'a>,
    tracker: NamespaceTracker,
    declarations: Vec<EnumDeclaration>,
    seen: HashMap<String, Position>,
    issues: Vec<ValidationIssue>,
    cancel: &'a AtomicBool,
}

impl<'a> ScanContext<'a> {
    fn new(text: &'a str, cancel: &'a AtomicBool) -> Self {
        Self {
            stream: TokenStream::new(text),
            tracker: NamespaceTracker::new(),
            declarations: Vec::new(),
            seen: HashMap::new(),
            issues: Vec::new(),
            cancel,
        }
    }

    fn run(mut self) -> Result<Extraction, ScanError> {
        loop {
            let tok = self.next()?;
            let at = tok.position();
            match tok.kind() {
                TokenKind::EndOfInput => {
                    self.tracker
                        .finish()
                        .map_err(|kind| self.structural(kind, at))?;
                    break;
                }
                TokenKind::Keyword(Keyword::Namespace) => {
                    let scope = self.tracker.current_path();
                    self.tracker
                        .enter_namespace(&mut self.stream, at)
                        .map_err(|e| ScanError::lex(e, &scope))?;
                }
                TokenKind::Keyword(Keyword::Enum) => self.enumeration(at)?,
                TokenKind::Punctuation('{') => self.tracker.open_block(at),
                TokenKind::Punctuation('}') => {
                    self.tracker.close().map_err(|kind| self.structural(kind, at))?;
                    self.checkpoint(at)?;
                }
                TokenKind::Punctuation(';') => self.checkpoint(at)?,
                _ => {}
            }
        }
        Ok(Extraction {
            declarations: self.declarations,
            issues: self.issues,
        })
    }

    fn next(&mut self) -> Result<SemanticToken, ScanError> {
        let next = self.stream.next_token();
        next.map_err(|e: LexError| ScanError::lex(e, &self.tracker.current_path()))
    }

    fn structural(&self, kind: StructuralErrorKind, position: Position) -> ScanError {
        ScanError::Structural {
            kind,
            position,
            scope: self.tracker.current_path(),
        }
    }

    /// Abandon the scan if asked to, but only between top-level declarations.
    fn checkpoint(&self, at: Position) -> Result<(), ScanError> {
        if self.tracker.in_namespace_scope() && self.cancel.load(Ordering::Relaxed) {
            return Err(ScanError::Cancelled {
                position: at,
                scope: self.tracker.current_path(),
            });
        }
        Ok(())
    }

    /// After `enum`: extract `enum class` / `enum struct`, leave plain enums
    /// to the block tracking.
    fn enumeration(&mut self, at: Position) -> Result<(), ScanError> {
        let scope = self.tracker.current_path();
        let scoped = self
            .stream
            .peek_kind()
            .map(|k| k.is_keyword(Keyword::Class) || k.is_keyword(Keyword::Struct))
            .map_err(|e| ScanError::lex(e, &scope))?;
        if !scoped {
            return Ok(());
        }
        self.stream.next_token().map_err(|e| ScanError::lex(e, &scope))?;

        let Some(decl) = EnumExtractor::new(&mut self.stream, scope, at).extract()? else {
            return Ok(());
        };
        let key = decl.name.to_string();
        match self.seen.get(&key) {
            Some(first_seen) => self.issues.push(ValidationIssue {
                kind: IssueKind::DuplicateQualifiedName {
                    first_seen: *first_seen,
                },
                subject: key,
                position: decl.position,
            }),
            None => {
                self.seen.insert(key, decl.position);
            }
        }
        self.declarations.push(decl);
        Ok(())
    }
}
