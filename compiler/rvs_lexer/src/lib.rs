//! Lexer for rvs using logos.
//!
//! Produces a `TokenList` for the parser. Identifier and string text stays in
//! the source; tokens only carry spans.

use logos::Logos;
use rvs_ir::{Span, Token, TokenKind, TokenList};

/// Raw token from logos (before conversion).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"//[^\n]*", logos::skip)]
    LineComment,

    #[token("import")]
    Import,
    #[token("Shuffle")]
    Shuffle,
    #[token("Sample")]
    Sample,
    #[token("Unique")]
    Unique,
    #[token("enum")]
    Enum,

    #[token("::")]
    DoubleColon,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("=")]
    Eq,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("+")]
    Plus,
    #[token("*")]
    Star,

    // Hex integer
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*", |lex| parse_int_skip_underscores(&lex.slice()[2..], 16))]
    HexInt(u64),

    // Integer
    #[regex(r"[0-9][0-9_]*", |lex| parse_int_skip_underscores(lex.slice(), 10))]
    Int(u64),

    // String literal, either quote style, no unescaped newlines
    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    #[regex(r"'([^'\\\n\r]|\\.)*'")]
    String,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Parse an integer skipping `_` separators.
///
/// Saturates at `u64::MAX` so the parser, not the lexer, reports literals that
/// do not fit in a `u32`.
#[inline]
fn parse_int_skip_underscores(s: &str, radix: u32) -> Option<u64> {
    let mut result: u64 = 0;
    for c in s.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(radix)?;
        result = result
            .saturating_mul(u64::from(radix))
            .saturating_add(u64::from(digit));
    }
    Some(result)
}

/// Lex source text into a `TokenList` ending in `Eof`.
///
/// Unrecognised input becomes `TokenKind::Error` tokens; lexing itself never
/// fails.
///
/// # Panics
///
/// Panics if the source is larger than `u32::MAX` bytes.
pub fn lex(source: &str) -> TokenList {
    let mut result = TokenList::new();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let span = Span::try_from_range(logos.span())
            .unwrap_or_else(|_| panic!("source exceeds {} bytes", u32::MAX));
        let kind = match token_result {
            Ok(raw) => convert_token(raw),
            Err(()) => TokenKind::Error,
        };
        result.push(Token::new(kind, span));
    }

    let eof_pos = u32::try_from(source.len())
        .unwrap_or_else(|_| panic!("source exceeds {} bytes", u32::MAX));
    result.push(Token::new(TokenKind::Eof, Span::point(eof_pos)));

    result
}

fn convert_token(raw: RawToken) -> TokenKind {
    match raw {
        RawToken::Int(n) | RawToken::HexInt(n) => TokenKind::Int(n),
        RawToken::String => TokenKind::Str,
        RawToken::Ident => TokenKind::Ident,

        RawToken::Import => TokenKind::Import,
        RawToken::Shuffle => TokenKind::Shuffle,
        RawToken::Sample => TokenKind::Sample,
        RawToken::Unique => TokenKind::Unique,
        RawToken::Enum => TokenKind::Enum,

        RawToken::DoubleColon => TokenKind::DoubleColon,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Eq => TokenKind::Eq,
        RawToken::Comma => TokenKind::Comma,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Star => TokenKind::Star,

        // Skipped by the callback, never produced.
        RawToken::LineComment => TokenKind::Error,
    }
}

/// Contents of a string token: quotes removed, escape sequences processed.
///
/// `slice` is the full token text including its quotes.
pub fn unescape_string(slice: &str) -> String {
    let content = slice
        .get(1..slice.len().saturating_sub(1))
        .unwrap_or_default();
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('0') => result.push('\0'),
                Some(other) => result.push(other),
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }

    result
}
