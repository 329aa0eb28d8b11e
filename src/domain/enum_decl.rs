//! Scoped enumeration extraction.
//!
//! Parses `enum class Name [: type] { ... }` (and `enum struct`) into an
//! [`EnumDeclaration`]. The enumerator list is kept in declaration order;
//! values are carried as source text and only resolved on request.

use crate::domain::error::{LexError, ScanError};
use crate::domain::filter::{SemanticToken, TokenStream};
use crate::domain::scope::{QualifiedName, ScopePath};
use crate::domain::token::{Position, Span, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumeratorEntry {
    pub name: String,
    /// Initializer text after `=`, e.g. `42` or `1 << 3`.
    pub explicit_value: Option<String>,
    pub position: Position,
    /// Same-line comments on the name, value or separating comma.
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDeclaration {
    pub name: QualifiedName,
    pub underlying_type: Option<String>,
    pub enumerators: Vec<EnumeratorEntry>,
    pub position: Position,
}

impl EnumDeclaration {
    pub fn local_name(&self) -> &str {
        &self.name.name
    }

    pub fn enumerator_names(&self) -> Vec<&str> {
        self.enumerators.iter().map(|e| e.name.as_str()).collect()
    }

    /// Integer value of each enumerator, following C++ successor rules.
    ///
    /// An initializer that is not a plain integer literal makes that entry
    /// and every following entry up to the next literal `None`.
    pub fn resolved_values(&self) -> Vec<Option<i128>> {
        let mut next: Option<i128> = Some(0);
        self.enumerators
            .iter()
            .map(|entry| {
                let value = match &entry.explicit_value {
                    Some(text) => parse_integer_literal(text),
                    None => next,
                };
                next = value.and_then(|v| v.checked_add(1));
                value
            })
            .collect()
    }
}

/// Parse a C++ integer literal: sign, `0x`/`0b`/octal prefixes, digit
/// separators and `u`/`l`/`z` suffixes.
pub fn parse_integer_literal(text: &str) -> Option<i128> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text.strip_prefix('+').unwrap_or(text).trim_start()),
    };
    let cleaned: String = body.chars().filter(|c| *c != '\'').collect();
    let lower = cleaned.to_ascii_lowercase();
    let lower = lower.trim_end_matches(['u', 'l', 'z']);
    let (radix, digits) = if let Some(hex) = lower.strip_prefix("0x") {
        (16, hex)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (2, bin)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (8, &lower[1..])
    } else {
        (10, lower)
    };
    if digits.is_empty() {
        return None;
    }
    let value = i128::from_str_radix(digits, radix).ok()?;
    Some(if negative { -value } else { value })
}

/// Reads one scoped enum from the token stream.
pub struct EnumExtractor<'s, 'a> {
    stream: &'s mut TokenStream<'a>,
    scope: ScopePath,
    name: String,
    start: Position,
}

impl<'s, 'a> EnumExtractor<'s, 'a> {
    /// `start` is the position of the `enum` keyword; the stream must be
    /// positioned just after `class` / `struct`.
    pub fn new(stream: &'s mut TokenStream<'a>, scope: ScopePath, start: Position) -> Self {
        Self {
            stream,
            scope,
            name: "<anonymous>".to_string(),
            start,
        }
    }

    /// Returns `None` for an opaque declaration such as `enum class E : int;`.
    pub fn extract(mut self) -> Result<Option<EnumDeclaration>, ScanError> {
        self.lex(|s| s.skip_attributes())?;
        let name_tok = self.next()?;
        match name_tok.token.kind {
            TokenKind::Identifier(name) => self.name = name,
            other => return Err(self.malformed_header(format!("expected enum name, found `{}`", other))),
        }

        let underlying_type = if self.lex(|s| s.eat_punct(':'))?.is_some() {
            Some(self.underlying_type()?)
        } else {
            None
        };

        let open = self.next()?;
        match open.token.kind {
            TokenKind::Punctuation('{') => {}
            TokenKind::Punctuation(';') => return Ok(None),
            other => return Err(self.malformed_header(format!("expected `{{` or `;`, found `{}`", other))),
        }

        let enumerators = self.body()?;
        Ok(Some(EnumDeclaration {
            name: self.scope.qualify(self.name.clone()),
            underlying_type,
            enumerators,
            position: self.start,
        }))
    }

    fn lex<T>(&mut self, f: impl FnOnce(&mut TokenStream<'a>) -> Result<T, LexError>) -> Result<T, ScanError> {
        f(&mut *self.stream).map_err(|e| ScanError::lex(e, &self.scope))
    }

    fn next(&mut self) -> Result<SemanticToken, ScanError> {
        self.lex(|s| s.next_token())
    }

    fn peek_kind(&mut self) -> Result<TokenKind, ScanError> {
        self.lex(|s| s.peek_kind())
    }

    fn malformed_header(&self, reason: String) -> ScanError {
        ScanError::MalformedEnumHeader {
            name: self.name.clone(),
            reason,
            position: self.start,
            scope: self.scope.clone(),
        }
    }

    fn unterminated(&self) -> ScanError {
        ScanError::UnterminatedEnum {
            name: self.name.clone(),
            position: self.start,
            scope: self.scope.clone(),
        }
    }

    fn malformed_enumerator(&self, expected: &'static str, found: &SemanticToken) -> ScanError {
        ScanError::MalformedEnumerator {
            name: self.name.clone(),
            expected,
            found: found.kind().to_string(),
            position: found.position(),
            scope: self.scope.clone(),
        }
    }

    /// Type tokens between `:` and `{` (or `;`), e.g. `unsigned int`.
    fn underlying_type(&mut self) -> Result<String, ScanError> {
        let mut text = String::new();
        let mut prev_ident = false;
        let mut saw_ident = false;
        loop {
            match self.peek_kind()? {
                TokenKind::Identifier(word) => {
                    if prev_ident {
                        text.push(' ');
                    }
                    text.push_str(&word);
                    prev_ident = true;
                    saw_ident = true;
                }
                TokenKind::Punctuation(':') => {
                    text.push(':');
                    prev_ident = false;
                }
                TokenKind::Punctuation('{') | TokenKind::Punctuation(';') => break,
                other => {
                    return Err(self.malformed_header(format!(
                        "unexpected `{}` in underlying type",
                        other
                    )))
                }
            }
            self.next()?;
        }
        if !saw_ident {
            return Err(self.malformed_header("expected an underlying type after `:`".to_string()));
        }
        Ok(text)
    }

    fn body(&mut self) -> Result<Vec<EnumeratorEntry>, ScanError> {
        let mut entries = Vec::new();
        loop {
            let tok = self.next()?;
            let name = match tok.kind() {
                TokenKind::Punctuation('}') => break,
                TokenKind::EndOfInput => return Err(self.unterminated()),
                TokenKind::Identifier(name) => name.clone(),
                _ => return Err(self.malformed_enumerator("an enumerator name or `}`", &tok)),
            };
            let mut entry = EnumeratorEntry {
                name,
                explicit_value: None,
                position: tok.position(),
                comments: comment_bodies(&tok),
            };

            self.lex(|s| s.skip_attributes())?;
            if let Some(eq) = self.lex(|s| s.eat_punct('='))? {
                entry.comments.extend(comment_bodies(&eq));
                entry.explicit_value = Some(self.value(&mut entry.comments)?);
            }

            let sep = self.lex(|s| s.peek().cloned())?;
            match sep.kind() {
                TokenKind::Punctuation(',') => {
                    self.next()?;
                    entry.comments.extend(comment_bodies(&sep));
                }
                TokenKind::Punctuation('}') => {}
                TokenKind::EndOfInput => return Err(self.unterminated()),
                _ => return Err(self.malformed_enumerator("`,` or `}`", &sep)),
            }
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Initializer tokens up to the next top-level `,` or `}`.
    fn value(&mut self, comments: &mut Vec<String>) -> Result<String, ScanError> {
        let mut text = String::new();
        let mut depth = 0usize;
        let mut prev: Option<Span> = None;
        loop {
            let kind = self.peek_kind()?;
            match kind {
                TokenKind::EndOfInput => return Err(self.unterminated()),
                TokenKind::Punctuation(',') | TokenKind::Punctuation('}') if depth == 0 => break,
                TokenKind::Punctuation('(') | TokenKind::Punctuation('[') | TokenKind::Punctuation('{') => {
                    depth += 1
                }
                TokenKind::Punctuation(')') | TokenKind::Punctuation(']') | TokenKind::Punctuation('}') => {
                    depth = depth.saturating_sub(1)
                }
                _ => {}
            }
            let tok = self.next()?;
            if let Some(prev) = prev {
                if !prev.touches(&tok.span()) {
                    text.push(' ');
                }
            }
            text.push_str(&tok.kind().to_string());
            comments.extend(comment_bodies(&tok));
            prev = Some(tok.span());
        }
        if text.is_empty() {
            let found = self.lex(|s| s.peek().cloned())?;
            return Err(self.malformed_enumerator("an enumerator value", &found));
        }
        Ok(text)
    }
}

fn comment_bodies(tok: &SemanticToken) -> Vec<String> {
    tok.trailing.iter().map(|c| c.body().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::Keyword;

    fn extract_in(src: &str, scope: &[&str]) -> Result<Option<EnumDeclaration>, ScanError> {
        let mut stream = TokenStream::new(src);
        let start = stream.next_token().unwrap();
        assert!(start.kind().is_keyword(Keyword::Enum));
        let kw = stream.next_token().unwrap();
        assert!(kw.kind().is_keyword(Keyword::Class) || kw.kind().is_keyword(Keyword::Struct));
        EnumExtractor::new(&mut stream, ScopePath::from_segments(scope.iter().copied()), start.position())
            .extract()
    }

    fn extract(src: &str) -> EnumDeclaration {
        extract_in(src, &["package", "a"]).unwrap().unwrap()
    }

    #[test]
    fn test_sloppy_spacing_and_comments() {
        let decl = extract(
            "enum class ModuleAAspect:int{ // sloppy spacing is not unheard of\n    // some of these might have comments\n    aOne, // first\n    aTwo, /// another\n    _end // required terminator\n};",
        );
        assert_eq!(decl.name.to_string(), "package::a::ModuleAAspect");
        assert_eq!(decl.underlying_type.as_deref(), Some("int"));
        assert_eq!(decl.enumerator_names(), vec!["aOne", "aTwo", "_end"]);
        assert_eq!(decl.enumerators[0].comments, vec!["first"]);
        assert_eq!(decl.enumerators[1].comments, vec!["another"]);
        assert_eq!(decl.enumerators[2].comments, vec!["required terminator"]);
    }

    #[test]
    fn test_comma_after_comment_line() {
        let decl = extract(
            "enum class ModuleCAspect : unsigned int /* why not leave it int? */\n{\n    cOne = 16\n    // there\n    , cTwo, _end_wrong/* another fake end */, _end // _end\n} ;",
        );
        assert_eq!(decl.underlying_type.as_deref(), Some("unsigned int"));
        assert_eq!(decl.enumerator_names(), vec!["cOne", "cTwo", "_end_wrong", "_end"]);
        assert_eq!(decl.enumerators[0].explicit_value.as_deref(), Some("16"));
        assert_eq!(decl.enumerators[2].comments, vec!["another fake end"]);
    }

    #[test]
    fn test_trailing_comma_is_not_an_enumerator() {
        let decl = extract("enum class Aspect {\n bOne = 42,\n /* x */ bTwo, // second\n end,\n _end,\n};");
        assert_eq!(decl.enumerator_names(), vec!["bOne", "bTwo", "end", "_end"]);
        assert_eq!(decl.enumerators[0].explicit_value.as_deref(), Some("42"));
        assert_eq!(decl.enumerators[1].explicit_value, None);
    }

    #[test]
    fn test_qualified_underlying_type_and_expression_values() {
        let decl = extract("enum struct Flags : std::uint8_t { a = 1 << 0, b = (1<<1), c = a | b };");
        assert_eq!(decl.underlying_type.as_deref(), Some("std::uint8_t"));
        let values: Vec<Option<&str>> = decl
            .enumerators
            .iter()
            .map(|e| e.explicit_value.as_deref())
            .collect();
        assert_eq!(values, vec![Some("1 << 0"), Some("(1<<1)"), Some("a | b")]);
    }

    #[test]
    fn test_resolved_values_follow_successor_rule() {
        let decl = extract("enum class E { a, b = 0x10, c, d = a, e, f = -2, g };");
        assert_eq!(
            decl.resolved_values(),
            vec![Some(0), Some(16), Some(17), None, None, Some(-2), Some(-1)]
        );
    }

    #[test]
    fn test_parse_integer_literal_forms() {
        assert_eq!(parse_integer_literal("42"), Some(42));
        assert_eq!(parse_integer_literal("0x1F"), Some(31));
        assert_eq!(parse_integer_literal("0b101"), Some(5));
        assert_eq!(parse_integer_literal("017"), Some(15));
        assert_eq!(parse_integer_literal("1'000ul"), Some(1000));
        assert_eq!(parse_integer_literal("0"), Some(0));
        assert_eq!(parse_integer_literal("0u"), Some(0));
        assert_eq!(parse_integer_literal("a | b"), None);
    }

    #[test]
    fn test_attributes_are_skipped() {
        let decl = extract("enum class [[nodiscard]] E { a [[deprecated]] = 1, b };");
        assert_eq!(decl.enumerator_names(), vec!["a", "b"]);
        assert_eq!(decl.enumerators[0].explicit_value.as_deref(), Some("1"));
    }

    #[test]
    fn test_opaque_declaration_yields_nothing() {
        assert_eq!(extract_in("enum class E : int;", &[]).unwrap(), None);
    }

    #[test]
    fn test_missing_close_brace_is_unterminated() {
        let err = extract_in("enum class FooAspect { a, b", &["ns"]).unwrap_err();
        match err {
            ScanError::UnterminatedEnum { name, position, scope } => {
                assert_eq!(name, "FooAspect");
                assert_eq!(position.column, 1);
                assert_eq!(scope, ScopePath::from_segments(["ns"]));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_colon_without_type_is_malformed_header() {
        let err = extract_in("enum class E : { a };", &[]).unwrap_err();
        assert!(matches!(err, ScanError::MalformedEnumHeader { .. }), "{:?}", err);
        let err = extract_in("enum class E : 5 { a };", &[]).unwrap_err();
        assert!(matches!(err, ScanError::MalformedEnumHeader { .. }), "{:?}", err);
    }

    #[test]
    fn test_missing_name_is_malformed_header() {
        let err = extract_in("enum class { a };", &[]).unwrap_err();
        assert!(matches!(err, ScanError::MalformedEnumHeader { .. }), "{:?}", err);
    }

    #[test]
    fn test_stray_token_in_body_is_malformed_enumerator() {
        let err = extract_in("enum class E { a, , b };", &[]).unwrap_err();
        assert!(matches!(err, ScanError::MalformedEnumerator { .. }), "{:?}", err);
        let err = extract_in("enum class E { a b };", &[]).unwrap_err();
        assert!(matches!(err, ScanError::MalformedEnumerator { .. }), "{:?}", err);
        let err = extract_in("enum class E { a = , b };", &[]).unwrap_err();
        assert!(matches!(err, ScanError::MalformedEnumerator { .. }), "{:?}", err);
    }

    #[test]
    fn test_lex_error_inside_body_carries_scope() {
        let err = extract_in("enum class E { a, /* open", &["package"]).unwrap_err();
        match err {
            ScanError::Lex { scope, .. } => assert_eq!(scope, ScopePath::from_segments(["package"])),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
