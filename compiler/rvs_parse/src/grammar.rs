//! Recursive descent grammar.
//!
//! ```text
//! program    := item*
//! item       := statement | import | enum
//! import     := 'import' (STRING | IDENT ('::' IDENT)*) ';'
//! enum       := 'enum' IDENT '{' (member (',' member)* ','?)? '}' ';'?
//! member     := IDENT ('=' UINT)?
//! statement  := IDENT '=' expr ';'
//! expr       := range | list | operand
//! operand    := range | ref | combine | literal | random | weighted
//! ref        := IDENT ('::' IDENT)?
//! range      := UINT ':' UINT (':' UINT)?
//! list       := UINT (',' UINT)+
//! combine    := '(' operand (',' operand)* ')' ('+' | '*')
//! random     := ('Shuffle' | 'Unique') '(' expr ')'
//!             | 'Sample' '(' operand (',' UINT)? ')'
//! weighted   := 'r'? '{' entry (',' entry)* ','? '}'
//! entry      := (UINT ':')? operand
//! ```
//!
//! The final `;` of the input may be omitted. Inside parentheses and braces
//! commas separate operands, so a bare list is only allowed at the top of a
//! statement and directly inside `Shuffle` and `Unique`. In a weighted entry
//! a leading `UINT ':'` is always the weight: `{1:5}` is `5` with weight 1.
//! Enum members without a value take the previous value plus one, starting
//! at 0.

use std::path::PathBuf;

use rvs_diagnostic::Error;
use rvs_ir::{
    CombineKind, EnumDef, Expr, ExprArena, ExprId, ExprKind, RandomMode, Replacement, Span,
    TokenKind, TokenList,
};
use rvs_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::Cursor;

/// Extension appended to `import a::b;` style paths.
const SOURCE_EXTENSION: &str = "rvs";

/// One top-level item, in source order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    Stmt {
        name: String,
        name_span: Span,
        expr: ExprId,
    },
    Import {
        /// Path as written, before resolution.
        path: PathBuf,
        span: Span,
    },
    Enum(EnumDef),
}

/// Parser state.
///
/// Expressions are allocated straight into the caller's arena; on error the
/// caller rolls the arena back.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: &'a mut ExprArena,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a TokenList, source: &'a str, arena: &'a mut ExprArena) -> Self {
        Parser {
            cursor: Cursor::new(tokens, source),
            arena,
        }
    }

    /// Parse the whole token stream into items.
    pub fn parse_program(mut self) -> Result<Vec<Item>, Error> {
        let mut items = Vec::new();
        while !self.cursor.is_at_end() {
            let item = match self.cursor.current_kind() {
                TokenKind::Import => self.parse_import()?,
                TokenKind::Enum => self.parse_enum()?,
                _ => self.parse_statement()?,
            };
            items.push(item);
        }
        Ok(items)
    }

    fn parse_statement(&mut self) -> Result<Item, Error> {
        if !self.cursor.check(TokenKind::Ident) {
            return Err(self
                .cursor
                .make_expect_error("identifier, `import` or `enum`"));
        }
        let (name, name_span) = self.cursor.expect_ident()?;
        self.cursor.expect(TokenKind::Eq)?;
        let expr = self.parse_expr()?;
        self.expect_terminator()?;

        trace!(name, ?name_span, "parsed statement");
        Ok(Item::Stmt {
            name: name.to_string(),
            name_span,
            expr,
        })
    }

    fn parse_import(&mut self) -> Result<Item, Error> {
        let start = self.cursor.expect(TokenKind::Import)?.span;

        let path = match self.cursor.current_kind() {
            TokenKind::Str => {
                let token = self.cursor.advance();
                let text = rvs_lexer::unescape_string(self.cursor.slice(token.span));
                if text.is_empty() {
                    return Err(Error::parse(
                        self.cursor.source(),
                        token.span,
                        "import path must not be empty",
                    ));
                }
                PathBuf::from(text)
            }
            TokenKind::Ident => {
                let mut path = PathBuf::new();
                let (first, _) = self.cursor.expect_ident()?;
                path.push(first);
                while self.cursor.eat(TokenKind::DoubleColon) {
                    let (segment, _) = self.cursor.expect_ident()?;
                    path.push(segment);
                }
                path.set_extension(SOURCE_EXTENSION);
                path
            }
            _ => return Err(self.cursor.make_expect_error("import path")),
        };

        let span = start.merge(self.cursor.previous_span());
        self.expect_terminator()?;

        trace!(path = %path.display(), "parsed import");
        Ok(Item::Import { path, span })
    }

    fn parse_enum(&mut self) -> Result<Item, Error> {
        self.cursor.expect(TokenKind::Enum)?;
        let (name, name_span) = self.cursor.expect_ident()?;
        self.cursor.expect(TokenKind::LBrace)?;

        let mut members: Vec<(String, u32)> = Vec::new();
        let mut next = Some(0u32);
        while !self.cursor.check(TokenKind::RBrace) {
            let (member, member_span) = self.cursor.expect_ident()?;
            if members.iter().any(|(existing, _)| existing == member) {
                return Err(Error::parse(
                    self.cursor.source(),
                    member_span,
                    format!("duplicate member `{member}` in enum `{name}`"),
                ));
            }
            let value = if self.cursor.eat(TokenKind::Eq) {
                self.parse_u32()?.0
            } else {
                next.ok_or_else(|| {
                    Error::parse(
                        self.cursor.source(),
                        member_span,
                        format!("value of `{name}::{member}` does not fit in 32 bits"),
                    )
                })?
            };
            members.push((member.to_string(), value));
            next = value.checked_add(1);

            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(TokenKind::RBrace)?;
        self.cursor.eat(TokenKind::Semicolon);

        trace!(name, members = members.len(), "parsed enum");
        Ok(Item::Enum(EnumDef {
            name: name.to_string(),
            name_span,
            members,
        }))
    }

    /// `;`, or nothing at the very end of the input.
    fn expect_terminator(&mut self) -> Result<(), Error> {
        if self.cursor.eat(TokenKind::Semicolon) || self.cursor.is_at_end() {
            Ok(())
        } else {
            Err(self.cursor.make_expect_error("`;`"))
        }
    }

    /// Full expression: lists allowed.
    fn parse_expr(&mut self) -> Result<ExprId, Error> {
        ensure_sufficient_stack(|| self.parse_expr_inner(true))
    }

    /// Operand of a group or `Sample`: commas belong to the enclosing syntax.
    fn parse_operand(&mut self) -> Result<ExprId, Error> {
        ensure_sufficient_stack(|| self.parse_expr_inner(false))
    }

    fn parse_expr_inner(&mut self, allow_list: bool) -> Result<ExprId, Error> {
        match self.cursor.current_kind() {
            TokenKind::Int(_) => self.parse_numeric(allow_list),
            TokenKind::Ident
                if self.cursor.peek_next_kind() == TokenKind::LBrace
                    && self.cursor.slice(self.cursor.current_span()) == "r" =>
            {
                let prefix = self.cursor.advance().span;
                self.parse_weighted(prefix, Replacement::With)
            }
            TokenKind::Ident => self.parse_reference(),
            TokenKind::LBrace => {
                let start = self.cursor.current_span();
                self.parse_weighted(start, Replacement::Without)
            }
            TokenKind::LParen => self.parse_combine(),
            TokenKind::Shuffle | TokenKind::Sample | TokenKind::Unique => self.parse_random(),
            _ => Err(self.cursor.make_expect_error("expression")),
        }
    }

    /// `name`, or `Enum::Member`.
    fn parse_reference(&mut self) -> Result<ExprId, Error> {
        let (name, start) = self.cursor.expect_ident()?;
        if self.cursor.eat(TokenKind::DoubleColon) {
            let (member, end) = self.cursor.expect_ident()?;
            return Ok(self.alloc(
                ExprKind::Reference(format!("{name}::{member}")),
                start.merge(end),
            ));
        }
        Ok(self.alloc(ExprKind::Reference(name.to_string()), start))
    }

    /// Literal, range or list, all of which start with an integer.
    fn parse_numeric(&mut self, allow_list: bool) -> Result<ExprId, Error> {
        let (first, start_span) = self.parse_u32()?;

        if self.cursor.eat(TokenKind::Colon) {
            let (stop, _) = self.parse_u32()?;
            let step = if self.cursor.eat(TokenKind::Colon) {
                let (step, step_span) = self.parse_u32()?;
                if step == 0 {
                    return Err(Error::parse(
                        self.cursor.source(),
                        step_span,
                        "range step must be greater than zero",
                    ));
                }
                step
            } else {
                1
            };
            let span = start_span.merge(self.cursor.previous_span());
            if first > stop {
                return Err(Error::parse(
                    self.cursor.source(),
                    span,
                    format!("range start {first} is greater than stop {stop}"),
                ));
            }
            return Ok(self.alloc(
                ExprKind::Range {
                    start: first,
                    stop,
                    step,
                },
                span,
            ));
        }

        if allow_list && self.cursor.check(TokenKind::Comma) {
            let mut values = vec![first];
            while self.cursor.eat(TokenKind::Comma) {
                let (value, _) = self.parse_u32()?;
                values.push(value);
            }
            let span = start_span.merge(self.cursor.previous_span());
            let range = self.arena.alloc_values(values);
            return Ok(self.alloc(ExprKind::List(range), span));
        }

        Ok(self.alloc(ExprKind::Literal(first), start_span))
    }

    fn parse_combine(&mut self) -> Result<ExprId, Error> {
        let start = self.cursor.expect(TokenKind::LParen)?.span;

        let mut operands = vec![self.parse_operand()?];
        while self.cursor.eat(TokenKind::Comma) {
            operands.push(self.parse_operand()?);
        }
        self.cursor.expect(TokenKind::RParen)?;

        let kind = match self.cursor.current_kind() {
            TokenKind::Plus => CombineKind::Concat,
            TokenKind::Star => CombineKind::Product,
            _ => return Err(self.cursor.make_expect_error("`+` or `*` after `)`")),
        };
        self.cursor.advance();

        let span = start.merge(self.cursor.previous_span());
        let operands = self.arena.alloc_expr_list(operands);
        Ok(self.alloc(ExprKind::Combine { kind, operands }, span))
    }

    /// Weighted selection, starting at `{` (the `r` prefix, if any, has been
    /// consumed and starts `start`).
    fn parse_weighted(&mut self, start: Span, replacement: Replacement) -> Result<ExprId, Error> {
        self.cursor.expect(TokenKind::LBrace)?;

        let mut entries = Vec::new();
        let mut weights = Vec::new();
        loop {
            let weight = if matches!(self.cursor.current_kind(), TokenKind::Int(_))
                && self.cursor.peek_next_kind() == TokenKind::Colon
            {
                let (weight, _) = self.parse_u32()?;
                self.cursor.advance();
                weight
            } else {
                1
            };
            entries.push(self.parse_operand()?);
            weights.push(weight);

            if !self.cursor.eat(TokenKind::Comma) || self.cursor.check(TokenKind::RBrace) {
                break;
            }
        }
        self.cursor.expect(TokenKind::RBrace)?;

        let span = start.merge(self.cursor.previous_span());
        if weights.iter().all(|&w| w == 0) {
            return Err(Error::parse(
                self.cursor.source(),
                span,
                "weights must not all be zero",
            ));
        }
        let entries = self.arena.alloc_expr_list(entries);
        let weights = self.arena.alloc_values(weights);
        Ok(self.alloc(
            ExprKind::Weighted {
                entries,
                weights,
                replacement,
            },
            span,
        ))
    }

    fn parse_random(&mut self) -> Result<ExprId, Error> {
        let keyword = self.cursor.advance();
        self.cursor.expect(TokenKind::LParen)?;

        let (inner, mode) = match keyword.kind {
            TokenKind::Shuffle => (self.parse_expr()?, RandomMode::Shuffle),
            TokenKind::Unique => (self.parse_expr()?, RandomMode::Unique),
            _ => {
                let inner = self.parse_operand()?;
                let count = if self.cursor.eat(TokenKind::Comma) {
                    Some(self.parse_u32()?.0)
                } else {
                    None
                };
                (inner, RandomMode::Sample { count })
            }
        };
        self.cursor.expect(TokenKind::RParen)?;

        let span = keyword.span.merge(self.cursor.previous_span());
        Ok(self.alloc(ExprKind::Random { inner, mode }, span))
    }

    fn parse_u32(&mut self) -> Result<(u32, Span), Error> {
        let token = *self.cursor.current();
        let TokenKind::Int(value) = token.kind else {
            return Err(self.cursor.make_expect_error("integer"));
        };
        self.cursor.advance();
        u32::try_from(value).map(|v| (v, token.span)).map_err(|_| {
            Error::parse(
                self.cursor.source(),
                token.span,
                format!(
                    "integer literal `{}` does not fit in 32 bits",
                    self.cursor.slice(token.span)
                ),
            )
        })
    }

    #[inline]
    fn alloc(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, span))
    }
}
