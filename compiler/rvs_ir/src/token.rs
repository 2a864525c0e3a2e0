//! Tokens produced by the lexer.
//!
//! Identifiers and string literals do not carry their text: the parser slices
//! it out of the source with the token's span. That keeps `TokenKind` `Copy`
//! and the token stream free of allocations.

use std::fmt;
use std::ops::Index;

use crate::Span;

/// Kind of a lexed token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// Unsigned integer literal (decimal or hex), not yet range-checked.
    Int(u64),
    /// Identifier; text is `source[span]`.
    Ident,
    /// Quoted string; text including quotes is `source[span]`.
    Str,

    // Keywords
    Import,
    Shuffle,
    Sample,
    Unique,
    Enum,

    // Punctuation
    Semicolon,
    Eq,
    Comma,
    Colon,
    DoubleColon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Plus,
    Star,

    /// Unrecognised input; the parser turns this into a `ParseError`.
    Error,
    Eof,
}

impl TokenKind {
    /// Human readable name used in "expected X, found Y" messages.
    pub fn display_name(self) -> &'static str {
        match self {
            TokenKind::Int(_) => "integer",
            TokenKind::Ident => "identifier",
            TokenKind::Str => "string",
            TokenKind::Import => "`import`",
            TokenKind::Shuffle => "`Shuffle`",
            TokenKind::Sample => "`Sample`",
            TokenKind::Unique => "`Unique`",
            TokenKind::Enum => "`enum`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Eq => "`=`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::DoubleColon => "`::`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Plus => "`+`",
            TokenKind::Star => "`*`",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of input",
        }
    }

    /// Whether two kinds are the same variant, ignoring payloads.
    #[inline]
    pub fn same_kind(self, other: TokenKind) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Lexer output. Always terminated by a single `Eof` token.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Token kinds only, handy for assertions.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }
}

impl Index<usize> for TokenList {
    type Output = Token;

    #[inline]
    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
