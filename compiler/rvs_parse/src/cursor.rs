//! Token cursor for navigating the token stream.

use rvs_diagnostic::Error;
use rvs_ir::{Span, Token, TokenKind, TokenList};

/// Cursor over a `TokenList` and the text it was lexed from.
///
/// Invariant: the position is always valid; the last token is `Eof` and is
/// never advanced past.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    source: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList, source: &'a str) -> Self {
        Cursor {
            tokens,
            source,
            pos: 0,
        }
    }

    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    #[inline]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Kind of the token after the current one (`Eof` at the end).
    #[inline]
    pub fn peek_next_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos + 1)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    #[inline]
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    /// Whether the current token is of `kind`, ignoring payloads.
    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind().same_kind(kind)
    }

    /// Advance past the current token and return it. Stays on `Eof`.
    #[inline]
    pub fn advance(&mut self) -> Token {
        let token = *self.current();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it is of `kind`.
    #[inline]
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect the current token to be of the given kind, advance and return it.
    #[inline]
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, Error> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.make_expect_error(kind.display_name()))
        }
    }

    /// Expect an identifier and return its text.
    pub fn expect_ident(&mut self) -> Result<(&'a str, Span), Error> {
        if self.check(TokenKind::Ident) {
            let token = self.advance();
            Ok((self.slice(token.span), token.span))
        } else {
            Err(self.make_expect_error("identifier"))
        }
    }

    /// Text of `span` in the source.
    #[inline]
    pub fn slice(&self, span: Span) -> &'a str {
        self.source.get(span.to_range()).unwrap_or_default()
    }

    /// Build an "expected X, found Y" error at the current token.
    #[cold]
    #[inline(never)]
    pub fn make_expect_error(&self, expected: &str) -> Error {
        let found = self.found_description();
        self.error_here(format!("expected {expected}, found {found}"))
    }

    /// Error at the current token.
    #[cold]
    pub fn error_here(&self, message: impl Into<String>) -> Error {
        Error::parse(self.source, self.current_span(), message)
    }

    fn found_description(&self) -> String {
        let token = self.current();
        match token.kind {
            TokenKind::Error => format!("unexpected character `{}`", self.slice(token.span)),
            TokenKind::Ident => format!("identifier `{}`", self.slice(token.span)),
            TokenKind::Int(_) => format!("integer `{}`", self.slice(token.span)),
            other => other.display_name().to_string(),
        }
    }
}
