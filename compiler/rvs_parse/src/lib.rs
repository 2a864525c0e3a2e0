//! Recursive descent parser for the rvs sequence language.
//!
//! Source text is lexed, parsed into the flat AST held by a [`Context`], and
//! `import` items are resolved and spliced in place. Each parse call either
//! succeeds completely or leaves the context untouched.

mod context;
mod cursor;
mod grammar;
mod source;

#[cfg(test)]
mod tests;

pub use context::{Context, DEFAULT_EXPANSION_LIMIT};
pub use cursor::Cursor;
pub use source::{FsLoader, MemoryLoader, SearchPath, SourceLoader};

use rvs_diagnostic::Result;

/// Parse `source` into `context`.
///
/// Shorthand for [`Context::parse`].
pub fn parse(source: &str, context: &mut Context) -> Result<()> {
    context.parse(source)
}
