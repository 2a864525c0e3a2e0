//! Transformer tests.
//!
//! - `resolution`: references, cycles, undefined identifiers, limits
//! - `expansion`: each expression form through a full transform
//! - `properties`: length laws and determinism

mod properties;

use rvs_model::Model;
use rvs_parse::Context;

/// Parse `source` into a fresh context with `seed`.
fn context(source: &str, seed: u32) -> Context {
    let mut ctx = Context::new().with_seed(seed);
    ctx.parse(source).unwrap_or_else(|e| panic!("parse failed: {e}"));
    ctx
}

/// Transform `source` and return the model.
fn model(source: &str) -> Model {
    crate::transform(&context(source, 0)).unwrap_or_else(|e| panic!("transform failed: {e}"))
}

/// Values of `name` in `model`.
fn values<'m>(model: &'m Model, name: &str) -> &'m [u32] {
    let handle = model
        .find(name)
        .unwrap_or_else(|e| panic!("lookup failed: {e}"));
    model
        .sequence(handle)
        .map(rvs_model::ResolvedSequence::values)
        .unwrap_or_else(|e| panic!("sequence failed: {e}"))
}
