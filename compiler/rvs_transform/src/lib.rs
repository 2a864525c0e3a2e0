//! Transformation of a parsed [`Context`] into a [`Model`].
//!
//! Every statement is resolved depth-first, expanding references on first
//! use and memoizing the result, so each identifier is expanded exactly once.
//! A reference back into the resolution stack is a cycle; a reference to an
//! unknown identifier is an error. The first problem found aborts the whole
//! transform.
//!
//! Randomised expressions draw from a `Pcg32` stream derived from the
//! context seed and the name of the statement they appear in. For a fixed
//! context and seed the result is always the same.

mod expand;
mod resolve;
mod rng;

#[cfg(test)]
mod tests;

pub use expand::{Expansion, LimitExceeded};

use rvs_diagnostic::Result;
use rvs_model::{Model, ResolvedSequence};
use rvs_parse::Context;
use tracing::debug;

use crate::resolve::Resolver;

/// Resolve and expand every statement of `context`.
///
/// The context is only read; it can be transformed again, for example after
/// changing the seed.
pub fn transform(context: &Context) -> Result<Model> {
    debug!(
        statements = context.len(),
        seed = context.seed_value(),
        "transform"
    );

    let expansions = Resolver::new(context).resolve_all()?;
    let sequences = context
        .statements()
        .iter()
        .zip(expansions)
        .map(|(stmt, expansion)| {
            ResolvedSequence::new(stmt.name.clone(), expansion.values, expansion.arity)
        })
        .collect();

    let model = Model::new(sequences);
    debug!(sequences = model.len(), "transform complete");
    Ok(model)
}
