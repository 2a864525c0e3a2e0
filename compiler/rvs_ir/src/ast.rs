//! Flat AST for rvs source.
//!
//! A program is an ordered list of [`Stmt`]s (`name = expr;`). Expressions live
//! in an [`ExprArena`](crate::ExprArena) and refer to their children through
//! [`ExprId`] and [`ExprRange`] indices.

use std::fmt;
use std::path::PathBuf;

use crate::Span;

/// Index of an expression in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    /// Index into the arena's expression storage.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Contiguous run of expression ids in the arena's list storage.
///
/// Used for the operands of `Combine` and the entries of `Weighted`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ExprRange {
    pub start: u32,
    pub len: u32,
}

impl ExprRange {
    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        ExprRange { start, len }
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Contiguous run of literal values in the arena's value storage.
///
/// Used for `List` literals and the weights of `Weighted`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct ValueRange {
    pub start: u32,
    pub len: u32,
}

impl ValueRange {
    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        ValueRange { start, len }
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// How the operands of a parenthesised group are combined.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum CombineKind {
    /// `(a, b)+` - operand sequences appended in order.
    Concat,
    /// `(a, b)*` - Cartesian product, last operand varying fastest.
    Product,
}

/// Randomisation applied to an inner expression.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum RandomMode {
    /// `Shuffle(e)` - permutation of the rows of `e`.
    Shuffle,
    /// `Sample(e)` / `Sample(e, n)` - rows drawn with replacement.
    ///
    /// `None` draws as many rows as `e` has.
    Sample { count: Option<u32> },
    /// `Unique(e)` - every row of `e` drawn once, without replacement.
    Unique,
}

/// Whether a weighted pick puts its entry back.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Replacement {
    /// `{w: e, ...}` - each entry picked exactly `w` times, in random order.
    Without,
    /// `r{w: e, ...}` - as many picks as the total weight, each independent.
    With,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// `5`
    Literal(u32),
    /// `1, 2, 3`
    List(ValueRange),
    /// `start:stop[:step]`, inclusive and ascending.
    ///
    /// Invariant: `step > 0` and `start <= stop` (enforced by the parser).
    Range { start: u32, stop: u32, step: u32 },
    /// Another identifier, or an enum member as `Enum::Member`.
    Reference(String),
    /// `(e1, e2, ...)+` or `(e1, e2, ...)*`
    Combine { kind: CombineKind, operands: ExprRange },
    /// `Shuffle(e)` / `Sample(e[, n])`
    Random { inner: ExprId, mode: RandomMode },
    /// `{w1: e1, w2: e2, ...}` or `r{...}`
    ///
    /// Invariant: `weights` is parallel to `entries` and not all zero.
    Weighted {
        entries: ExprRange,
        weights: ValueRange,
        replacement: Replacement,
    },
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[inline]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// `enum Name { A, B = 5, C }`: named constants, referenced as `Name::A`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct EnumDef {
    pub name: String,
    pub name_span: Span,
    /// Members in declaration order with their values.
    pub members: Vec<(String, u32)>,
}

impl EnumDef {
    /// `Name::Member` for each member, with its value.
    pub fn constants(&self) -> impl Iterator<Item = (String, u32)> + '_ {
        self.members
            .iter()
            .map(|(member, value)| (format!("{}::{member}", self.name), *value))
    }
}

/// `name = expr;`
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Stmt {
    pub name: String,
    /// Span of `name` within the text it was parsed from.
    pub name_span: Span,
    pub expr: ExprId,
    /// File the statement was imported from, `None` for text handed to `parse`.
    pub origin: Option<PathBuf>,
}
