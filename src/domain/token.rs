//! Token and trivia types produced by the header lexer.

use std::fmt;

/// A point in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte range of a lexeme plus the line/column of its first char.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn position(&self) -> Position {
        Position {
            offset: self.start,
            line: self.line,
            column: self.column,
        }
    }

    /// True when `next` begins exactly where this span ends.
    pub fn touches(&self, next: &Span) -> bool {
        self.end == next.start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Namespace,
    Enum,
    Class,
    Struct,
}

impl Keyword {
    pub fn from_ident(ident: &str) -> Option<Keyword> {
        match ident {
            "namespace" => Some(Keyword::Namespace),
            "enum" => Some(Keyword::Enum),
            "class" => Some(Keyword::Class),
            "struct" => Some(Keyword::Struct),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Namespace => "namespace",
            Keyword::Enum => "enum",
            Keyword::Class => "class",
            Keyword::Struct => "struct",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Identifier(String),
    Keyword(Keyword),
    Punctuation(char),
    /// Numeric literal, kept as written (`16`, `0x1F`, `1'000u`).
    Number(String),
    /// String or character literal including its quotes.
    Literal(String),
    EndOfInput,
}

impl TokenKind {
    pub fn is_punct(&self, c: char) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == c)
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == kw)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(s) | TokenKind::Number(s) | TokenKind::Literal(s) => {
                f.write_str(s)
            }
            TokenKind::Keyword(k) => f.write_str(k.as_str()),
            TokenKind::Punctuation(c) => write!(f, "{}", c),
            TokenKind::EndOfInput => f.write_str("end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/// ...` or `/** ... */`
    Doc,
    /// `/* ... */`
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
    /// Full comment text including its delimiters.
    pub text: String,
    pub span: Span,
}

impl Comment {
    /// Comment text without delimiters and surrounding whitespace.
    pub fn body(&self) -> &str {
        let text = self.text.as_str();
        let inner = if let Some(rest) = text.strip_prefix("/*") {
            let rest = rest.strip_prefix('*').filter(|_| self.kind == CommentKind::Doc).unwrap_or(rest);
            rest.strip_suffix("*/").unwrap_or(rest)
        } else {
            let rest = text.trim_start_matches('/');
            rest.strip_prefix('<').unwrap_or(rest)
        };
        inner.trim()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriviaKind {
    Whitespace,
    Comment(Comment),
    /// Preprocessor line such as `#include <bar.h>`.
    Directive(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub span: Span,
}

/// One item of lexer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lexeme {
    Token(Token),
    Trivia(Trivia),
}
