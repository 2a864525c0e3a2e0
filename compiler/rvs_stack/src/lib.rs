//! Stack safety for recursive parsing and expansion.
//!
//! Parenthesised groups and `Shuffle`/`Sample` wrappers nest arbitrarily, and
//! both the parser and the transformer walk them recursively. Wrapping each
//! recursive step in [`ensure_sufficient_stack`] grows the stack on demand so
//! nesting depth is limited by memory rather than by the thread's stack size.
//!
//! On `wasm32` the guard is a plain call.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 64 * 1024;

/// Size of each new stack segment.
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
