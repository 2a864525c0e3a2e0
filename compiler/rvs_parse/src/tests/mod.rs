//! Parser tests.
//!
//! - `grammar`: statements, expressions and syntax errors
//! - `context`: atomicity, duplicates, seeds and search paths
//! - `imports`: import resolution, idempotence and file errors

mod context;
mod imports;
