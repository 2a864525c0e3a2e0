//! Depth-first resolution of statements into expansions.

use rvs_diagnostic::{Error, Result};
use rvs_ir::{CombineKind, ExprArena, ExprId, ExprKind, RandomMode};
use rvs_parse::Context;
use rvs_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::expand::{Expansion, LimitExceeded};
use crate::rng::{rng_for, SequenceRng};

#[derive(Clone, Debug)]
enum State {
    Unvisited,
    /// On the resolution stack.
    Visiting,
    Done(Expansion),
}

/// Resolves every statement of a context, each exactly once.
pub(crate) struct Resolver<'a> {
    context: &'a Context,
    arena: &'a ExprArena,
    states: Vec<State>,
    /// Statement indices currently being resolved, outermost first.
    stack: Vec<usize>,
}

impl<'a> Resolver<'a> {
    pub fn new(context: &'a Context) -> Self {
        Resolver {
            context,
            arena: context.arena(),
            states: vec![State::Unvisited; context.len()],
            stack: Vec::new(),
        }
    }

    /// Resolve all statements and return their expansions in declaration
    /// order.
    pub fn resolve_all(mut self) -> Result<Vec<Expansion>> {
        for index in 0..self.states.len() {
            self.resolve(index)?;
        }
        Ok(self
            .states
            .into_iter()
            .map(|state| match state {
                State::Done(expansion) => expansion,
                State::Unvisited | State::Visiting => Expansion::scalars(Vec::new()),
            })
            .collect())
    }

    /// Expansion of the statement at `index`, resolving it on first use.
    fn resolve(&mut self, index: usize) -> Result<Expansion> {
        match &self.states[index] {
            State::Done(expansion) => return Ok(expansion.clone()),
            State::Visiting => return Err(self.cycle_error(index)),
            State::Unvisited => {}
        }

        let context = self.context;
        let stmt = &context.statements()[index];
        self.states[index] = State::Visiting;
        self.stack.push(index);

        let mut rng = rng_for(context.seed_value(), &stmt.name);
        let expansion = self.expand(stmt.expr, &stmt.name, &mut rng)?;
        trace!(
            name = %stmt.name,
            values = expansion.values.len(),
            arity = expansion.arity,
            "resolved"
        );

        self.stack.pop();
        self.states[index] = State::Done(expansion.clone());
        Ok(expansion)
    }

    /// `a -> b -> a`: the stack from the first visit of `index`, then
    /// `index` again.
    fn cycle_error(&self, index: usize) -> Error {
        let start = self
            .stack
            .iter()
            .position(|&i| i == index)
            .unwrap_or_default();
        let statements = self.context.statements();
        let chain = self.stack[start..]
            .iter()
            .chain(std::iter::once(&index))
            .map(|&i| statements[i].name.clone())
            .collect();
        Error::CyclicReference(chain)
    }

    fn expand(&mut self, id: ExprId, owner: &str, rng: &mut SequenceRng) -> Result<Expansion> {
        ensure_sufficient_stack(|| self.expand_inner(id, owner, rng))
    }

    fn expand_inner(
        &mut self,
        id: ExprId,
        owner: &str,
        rng: &mut SequenceRng,
    ) -> Result<Expansion> {
        let context = self.context;
        let limit = context.expansion_limit();
        let over_limit = |LimitExceeded| Error::ExpansionLimit {
            id: owner.to_string(),
            limit,
        };

        let arena = self.arena;
        let expansion = match &arena.get_expr(id).kind {
            ExprKind::Literal(value) => Expansion::scalars(vec![*value]),
            ExprKind::List(range) => {
                let values = arena.get_values(*range);
                if values.len() > limit {
                    return Err(over_limit(LimitExceeded));
                }
                Expansion::scalars(values.to_vec())
            }
            ExprKind::Range { start, stop, step } => {
                Expansion::range(*start, *stop, *step, limit).map_err(over_limit)?
            }
            ExprKind::Reference(name) => match context.index_of(name) {
                Some(index) => self.resolve(index)?,
                None => {
                    let value = context
                        .constant(name)
                        .ok_or_else(|| Error::UndefinedReference(name.clone()))?;
                    Expansion::scalars(vec![value])
                }
            },
            ExprKind::Combine { kind, operands } => {
                let mut parts = Vec::with_capacity(operands.len());
                for &operand in arena.get_expr_list(*operands) {
                    parts.push(self.expand(operand, owner, rng)?);
                }
                match kind {
                    CombineKind::Concat => Expansion::concat(parts, limit),
                    CombineKind::Product => Expansion::product(&parts, limit),
                }
                .map_err(over_limit)?
            }
            ExprKind::Random { inner, mode } => {
                let inner = self.expand(*inner, owner, rng)?;
                match mode {
                    RandomMode::Shuffle => inner.shuffle(rng),
                    RandomMode::Sample { count } => {
                        inner.sample(*count, rng, limit).map_err(over_limit)?
                    }
                    RandomMode::Unique => inner.unique(rng),
                }
            }
            ExprKind::Weighted {
                entries,
                weights,
                replacement,
            } => {
                let mut parts = Vec::with_capacity(entries.len());
                for &entry in arena.get_expr_list(*entries) {
                    parts.push(self.expand(entry, owner, rng)?);
                }
                Expansion::weighted(
                    &parts,
                    arena.get_values(*weights),
                    *replacement,
                    rng,
                    limit,
                )
                .map_err(over_limit)?
            }
        };
        Ok(expansion)
    }
}
