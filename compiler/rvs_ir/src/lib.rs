//! RVS IR - shared data structures for the sequence engine.
//!
//! This crate contains the types every later phase agrees on:
//! - Spans for source locations
//! - Tokens and `TokenList` for lexer output
//! - The flat AST (`Stmt`, `Expr`, `ExprKind`)
//! - The `ExprArena` that owns every expression of a context
//!
//! # Design Philosophy
//!
//! - **Flatten Everything**: no `Box<Expr>`, children are `ExprId` indices
//! - **Copy where cheap**: spans, ids and token kinds are all `Copy`
//! - **Roll back, don't rebuild**: the arena can be truncated to a checkpoint so
//!   a failed parse leaves no trace

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod span;
mod token;

pub use arena::{ArenaCheckpoint, ExprArena};
pub use ast::{
    CombineKind, EnumDef, Expr, ExprId, ExprKind, ExprRange, RandomMode, Replacement, Stmt,
    ValueRange,
};
pub use span::{Span, SpanError};
pub use token::{Token, TokenKind, TokenList};
