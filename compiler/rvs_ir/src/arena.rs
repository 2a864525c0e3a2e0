//! Arena allocation for the flat AST.
//!
//! All expressions of a context live in one arena so that statements from
//! several parse calls can reference each other by `ExprId`. A parse call
//! takes a checkpoint first and rolls back to it on failure.

use crate::ast::{Expr, ExprId, ExprRange, ValueRange};

/// Lengths of the arena's storages at some point in time.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ArenaCheckpoint {
    exprs: usize,
    expr_lists: usize,
    values: usize,
}

/// Contiguous storage for every expression of a context.
#[derive(Clone, Default, Debug, Eq, PartialEq)]
pub struct ExprArena {
    /// All expressions (indexed by `ExprId`).
    exprs: Vec<Expr>,
    /// Flattened operand lists for `Combine`.
    expr_lists: Vec<ExprId>,
    /// Flattened literal values for `List`.
    values: Vec<u32>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate expression, return ID.
    ///
    /// # Panics
    /// Panics if the arena already holds `u32::MAX` expressions.
    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(to_u32(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    /// Get expression by ID.
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this arena.
    #[inline]
    #[track_caller]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    /// Allocate an operand list, return its range.
    pub fn alloc_expr_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = self.expr_lists.len();
        self.expr_lists.extend(ids);
        ExprRange::new(to_u32(start), to_u32(self.expr_lists.len() - start))
    }

    #[inline]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        let start = range.start as usize;
        &self.expr_lists[start..start + range.len()]
    }

    /// Allocate literal values of a `List`, return their range.
    pub fn alloc_values(&mut self, values: impl IntoIterator<Item = u32>) -> ValueRange {
        let start = self.values.len();
        self.values.extend(values);
        ValueRange::new(to_u32(start), to_u32(self.values.len() - start))
    }

    #[inline]
    pub fn get_values(&self, range: ValueRange) -> &[u32] {
        let start = range.start as usize;
        &self.values[start..start + range.len()]
    }

    /// Record the current size of every storage.
    pub fn checkpoint(&self) -> ArenaCheckpoint {
        ArenaCheckpoint {
            exprs: self.exprs.len(),
            expr_lists: self.expr_lists.len(),
            values: self.values.len(),
        }
    }

    /// Drop everything allocated after `checkpoint`.
    ///
    /// Ids handed out after the checkpoint become dangling; callers must
    /// discard them together with whatever referenced them.
    pub fn rollback(&mut self, checkpoint: ArenaCheckpoint) {
        self.exprs.truncate(checkpoint.exprs);
        self.expr_lists.truncate(checkpoint.expr_lists);
        self.values.truncate(checkpoint.values);
    }
}

#[inline]
fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or_else(|_| panic!("expression arena exceeds {} entries", u32::MAX))
}
