//! Comment filter.
//!
//! Hides whitespace, comment and directive trivia from the structural
//! passes. Comments are not dropped outright: each semantic token remembers
//! the comments that sit directly before it and the ones that follow it on
//! the same line.

use crate::domain::error::LexError;
use crate::domain::lexer::Lexer;
use crate::domain::token::{Comment, Keyword, Lexeme, Position, Span, Token, TokenKind, TriviaKind};

/// A non-trivia token with its adjacent comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticToken {
    pub token: Token,
    /// Comments between the previous token and this one.
    pub leading: Vec<Comment>,
    /// Comments after this token, before the next one, starting on the same line.
    pub trailing: Vec<Comment>,
}

impl SemanticToken {
    pub fn kind(&self) -> &TokenKind {
        &self.token.kind
    }

    pub fn span(&self) -> Span {
        self.token.span
    }

    pub fn position(&self) -> Position {
        self.token.span.position()
    }

    pub fn has_comment_before(&self) -> bool {
        !self.leading.is_empty()
    }

    pub fn has_comment_after(&self) -> bool {
        !self.trailing.is_empty()
    }
}

pub struct CommentFilter<'a> {
    lexer: Lexer<'a>,
    lookahead: Option<SemanticToken>,
    started: bool,
    done: bool,
}

impl<'a> CommentFilter<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            lexer: Lexer::new(src),
            lookahead: None,
            started: false,
            done: false,
        }
    }

    /// Read trivia up to and including the next token.
    fn read_token(&mut self) -> Result<(Vec<Comment>, Token), LexError> {
        let mut comments = Vec::new();
        for lexeme in self.lexer.by_ref() {
            match lexeme? {
                Lexeme::Token(token) => return Ok((comments, token)),
                Lexeme::Trivia(trivia) => {
                    if let TriviaKind::Comment(comment) = trivia.kind {
                        comments.push(comment);
                    }
                }
            }
        }
        // Only reached if the lexer is polled again after EndOfInput.
        Ok((
            comments,
            Token {
                kind: TokenKind::EndOfInput,
                span: Span::default(),
            },
        ))
    }

    fn advance(&mut self) -> Result<Option<SemanticToken>, LexError> {
        let mut current = match self.lookahead.take() {
            Some(token) => token,
            None if !self.started => {
                self.started = true;
                let (leading, token) = self.read_token()?;
                SemanticToken {
                    token,
                    leading,
                    trailing: Vec::new(),
                }
            }
            None => return Ok(None),
        };

        if current.token.kind == TokenKind::EndOfInput {
            return Ok(Some(current));
        }

        let (between, next) = self.read_token()?;
        let line = current.token.span.line;
        current.trailing = between
            .iter()
            .filter(|c| c.span.line == line)
            .cloned()
            .collect();
        self.lookahead = Some(SemanticToken {
            token: next,
            leading: between,
            trailing: Vec::new(),
        });
        Ok(Some(current))
    }
}

impl<'a> Iterator for CommentFilter<'a> {
    type Item = Result<SemanticToken, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(token)) => {
                if token.token.kind == TokenKind::EndOfInput {
                    self.done = true;
                }
                Some(Ok(token))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Cursor over filtered tokens with one token of lookahead.
///
/// Once `EndOfInput` is reached it is returned for every further call.
pub struct TokenStream<'a> {
    filter: CommentFilter<'a>,
    peeked: Option<SemanticToken>,
    end: Option<SemanticToken>,
}

impl<'a> TokenStream<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            filter: CommentFilter::new(src),
            peeked: None,
            end: None,
        }
    }

    fn pull(&mut self) -> Result<SemanticToken, LexError> {
        if let Some(end) = &self.end {
            return Ok(end.clone());
        }
        let token = match self.filter.next() {
            Some(token) => token?,
            None => SemanticToken {
                token: Token {
                    kind: TokenKind::EndOfInput,
                    span: Span::default(),
                },
                leading: Vec::new(),
                trailing: Vec::new(),
            },
        };
        if token.token.kind == TokenKind::EndOfInput {
            self.end = Some(token.clone());
        }
        Ok(token)
    }

    pub fn next_token(&mut self) -> Result<SemanticToken, LexError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.pull(),
        }
    }

    pub fn peek(&mut self) -> Result<&SemanticToken, LexError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.pull()?,
        };
        let token: &SemanticToken = self.peeked.insert(token);
        Ok(token)
    }

    pub fn peek_kind(&mut self) -> Result<TokenKind, LexError> {
        Ok(self.peek()?.token.kind.clone())
    }

    pub fn peek_position(&mut self) -> Result<Position, LexError> {
        Ok(self.peek()?.position())
    }

    pub fn peek_is_punct(&mut self, c: char) -> Result<bool, LexError> {
        Ok(self.peek()?.token.kind.is_punct(c))
    }

    pub fn peek_is_keyword(&mut self, kw: Keyword) -> Result<bool, LexError> {
        Ok(self.peek()?.token.kind.is_keyword(kw))
    }

    /// Consume the next token if it is the punctuation `c`.
    pub fn eat_punct(&mut self, c: char) -> Result<Option<SemanticToken>, LexError> {
        if self.peek_is_punct(c)? {
            return self.next_token().map(Some);
        }
        Ok(None)
    }

    /// Skip balanced `[ ... ]` groups, which covers `[[attribute]]` lists.
    pub fn skip_attributes(&mut self) -> Result<(), LexError> {
        while self.peek_is_punct('[')? {
            let mut depth = 0usize;
            loop {
                let token = self.next_token()?;
                match token.token.kind {
                    TokenKind::Punctuation('[') => depth += 1,
                    TokenKind::Punctuation(']') => {
                        depth = depth.saturating_sub(1);
                        if depth == 0 {
                            break;
                        }
                    }
                    TokenKind::EndOfInput => return Ok(()),
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filtered(src: &str) -> Vec<SemanticToken> {
        CommentFilter::new(src).collect::<Result<Vec<_>, _>>().unwrap()
    }

    #[test]
    fn test_comments_never_leak_into_tokens() {
        let toks = filtered("aOne, // first\n aTwo, /// another\n _end /* x */");
        let kinds: Vec<String> = toks.iter().map(|t| t.kind().to_string()).collect();
        assert_eq!(kinds, vec!["aOne", ",", "aTwo", ",", "_end", "end of input"]);
    }

    #[test]
    fn test_trailing_comments_stay_on_their_line() {
        let toks = filtered("_end // required terminator\n};");
        assert_eq!(toks[0].trailing.len(), 1);
        assert_eq!(toks[0].trailing[0].body(), "required terminator");
        assert!(toks[1].has_comment_before());
        assert!(!toks[1].has_comment_after());
    }

    #[test]
    fn test_comment_on_next_line_is_only_leading() {
        let toks = filtered("cOne = 16\n// there\n, cTwo");
        let sixteen = &toks[2];
        assert_eq!(sixteen.kind(), &TokenKind::Number("16".into()));
        assert!(!sixteen.has_comment_after());
        let comma = &toks[3];
        assert!(comma.kind().is_punct(','));
        assert_eq!(comma.leading[0].body(), "there");
    }

    #[test]
    fn test_filter_stops_after_error() {
        // The error surfaces while looking past `a`.
        let mut filter = CommentFilter::new("a /* open");
        assert!(filter.next().unwrap().is_err());
        assert!(filter.next().is_none());
    }

    #[test]
    fn test_stream_repeats_end_of_input() {
        let mut stream = TokenStream::new("x");
        assert_eq!(stream.next_token().unwrap().kind(), &TokenKind::Identifier("x".into()));
        assert_eq!(stream.next_token().unwrap().kind(), &TokenKind::EndOfInput);
        assert_eq!(stream.peek_kind().unwrap(), TokenKind::EndOfInput);
        assert_eq!(stream.next_token().unwrap().kind(), &TokenKind::EndOfInput);
    }

    #[test]
    fn test_skip_attributes() {
        let mut stream = TokenStream::new("[[deprecated(\"x\")]] [[maybe_unused]] name");
        stream.skip_attributes().unwrap();
        assert_eq!(stream.peek_kind().unwrap(), TokenKind::Identifier("name".into()));
    }
}
