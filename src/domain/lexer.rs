//! Header lexer.
//!
//! Lazily turns C++-like header text into [`Lexeme`]s: semantic tokens plus
//! whitespace, comment and preprocessor trivia. A lexer is single-use; scan
//! the same text again by constructing a new one.

use crate::domain::error::{LexError, LexErrorKind};
use crate::domain::token::{
    Comment, CommentKind, Keyword, Lexeme, Position, Span, Token, TokenKind, Trivia, TriviaKind,
};

pub struct Lexer<'a> {
    src: &'a str,
    idx: usize,
    line: usize,
    col: usize,
    at_line_start: bool,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            idx: 0,
            line: 1,
            col: 1,
            at_line_start: true,
            finished: false,
        }
    }

    /// Lex everything, stopping at the first error.
    pub fn lex_all(self) -> Result<Vec<Lexeme>, LexError> {
        self.collect()
    }

    fn cursor(&self) -> Position {
        Position {
            offset: self.idx,
            line: self.line,
            column: self.col,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.idx..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.src[self.idx..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.idx += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.bump();
        }
    }

    fn span_from(&self, start: Position) -> Span {
        Span {
            start: start.offset,
            end: self.idx,
            line: start.line,
            column: start.column,
        }
    }

    fn text_from(&self, start: Position) -> &'a str {
        &self.src[start.offset..self.idx]
    }

    fn token(&self, kind: TokenKind, start: Position) -> Lexeme {
        Lexeme::Token(Token {
            kind,
            span: self.span_from(start),
        })
    }

    fn trivia(&self, kind: TriviaKind, start: Position) -> Lexeme {
        Lexeme::Trivia(Trivia {
            kind,
            span: self.span_from(start),
        })
    }

    fn next_lexeme(&mut self) -> Result<Lexeme, LexError> {
        let start = self.cursor();
        let ch = match self.peek() {
            Some(ch) => ch,
            None => {
                self.finished = true;
                return Ok(self.token(TokenKind::EndOfInput, start));
            }
        };

        if ch.is_whitespace() {
            self.bump_while(char::is_whitespace);
            if self.text_from(start).contains('\n') {
                self.at_line_start = true;
            }
            return Ok(self.trivia(TriviaKind::Whitespace, start));
        }

        if ch == '/' && self.peek_nth(1) == Some('/') {
            return Ok(self.line_comment(start));
        }
        if ch == '/' && self.peek_nth(1) == Some('*') {
            return self.block_comment(start);
        }

        // Comments are whitespace to the preprocessor, so only real tokens
        // clear the line-start flag.
        let was_line_start = std::mem::replace(&mut self.at_line_start, false);

        if ch == '#' && was_line_start {
            return self.directive(start);
        }
        if ch == '"' || ch == '\'' {
            return self.quoted(ch, start);
        }
        if ch.is_ascii_digit() {
            return Ok(self.number(start));
        }
        if ch.is_ascii_alphabetic() || ch == '_' {
            self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_');
            let text = self.text_from(start);
            let kind = match Keyword::from_ident(text) {
                Some(kw) => TokenKind::Keyword(kw),
                None => TokenKind::Identifier(text.to_string()),
            };
            return Ok(self.token(kind, start));
        }

        self.bump();
        Ok(self.token(TokenKind::Punctuation(ch), start))
    }

    fn line_comment(&mut self, start: Position) -> Lexeme {
        loop {
            self.bump_while(|c| c != '\n');
            // A trailing backslash splices the next line into the comment.
            let text = self.text_from(start).trim_end_matches('\r');
            if !(text.ends_with('\\') && self.peek() == Some('\n')) {
                break;
            }
            self.bump();
        }
        let text = self.text_from(start);
        let kind = if text.starts_with("///") && !text.starts_with("////") {
            CommentKind::Doc
        } else {
            CommentKind::Line
        };
        self.comment(kind, start)
    }

    fn block_comment(&mut self, start: Position) -> Result<Lexeme, LexError> {
        self.bump();
        self.bump();
        loop {
            match self.bump() {
                Some('*') if self.peek() == Some('/') => {
                    self.bump();
                    break;
                }
                Some(_) => {}
                None => {
                    return Err(LexError {
                        kind: LexErrorKind::UnterminatedBlockComment,
                        position: start,
                    })
                }
            }
        }
        let text = self.text_from(start);
        let kind = if text.starts_with("/**") && text != "/**/" {
            CommentKind::Doc
        } else {
            CommentKind::Block
        };
        Ok(self.comment(kind, start))
    }

    fn comment(&self, kind: CommentKind, start: Position) -> Lexeme {
        let comment = Comment {
            kind,
            text: self.text_from(start).to_string(),
            span: self.span_from(start),
        };
        self.trivia(TriviaKind::Comment(comment), start)
    }

    /// Runs to end of line, following continuations. A block comment inside
    /// the directive is swallowed whole even if it spans lines; a `//`
    /// comment ends the directive and is lexed on its own.
    fn directive(&mut self, start: Position) -> Result<Lexeme, LexError> {
        loop {
            self.bump_while(|c| c != '\n' && c != '\\' && c != '/');
            match (self.peek(), self.peek_nth(1)) {
                (Some('\\'), _) => {
                    self.bump();
                    // Line continuation, possibly with a CR before the newline.
                    if self.peek() == Some('\r') {
                        self.bump();
                    }
                    if self.peek() == Some('\n') {
                        self.bump();
                    }
                }
                (Some('/'), Some('*')) => {
                    let comment_at = self.cursor();
                    self.block_comment(comment_at)?;
                }
                (Some('/'), Some('/')) => break,
                (Some('/'), _) => {
                    self.bump();
                }
                _ => break,
            }
        }
        let text = self.text_from(start).trim_end().to_string();
        Ok(self.trivia(TriviaKind::Directive(text), start))
    }

    fn quoted(&mut self, quote: char, start: Position) -> Result<Lexeme, LexError> {
        self.bump();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    if matches!(self.peek(), Some(c) if c != '\n') {
                        self.bump();
                    }
                }
                Some('\n') | None => {
                    let kind = if quote == '"' {
                        LexErrorKind::UnterminatedString
                    } else {
                        LexErrorKind::UnterminatedChar
                    };
                    return Err(LexError {
                        kind,
                        position: start,
                    });
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        let text = self.text_from(start).to_string();
        Ok(self.token(TokenKind::Literal(text), start))
    }

    fn number(&mut self, start: Position) -> Lexeme {
        let mut prev = '\0';
        while let Some(c) = self.peek() {
            let accepted = c.is_ascii_alphanumeric()
                || c == '_'
                || c == '.'
                || (c == '\'' && matches!(self.peek_nth(1), Some(n) if n.is_ascii_alphanumeric()))
                || ((c == '+' || c == '-') && matches!(prev, 'e' | 'E' | 'p' | 'P'));
            if !accepted {
                break;
            }
            prev = c;
            self.bump();
        }
        let text = self.text_from(start).to_string();
        self.token(TokenKind::Number(text), start)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Lexeme, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_lexeme();
        if result.is_err() {
            self.finished = true;
        }
        Some(result)
    }
}
