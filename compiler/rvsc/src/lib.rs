//! rvs - random value sequences.
//!
//! The library side of the `rvs` binary. It re-exports the engine pipeline
//! (parse into a [`Context`], [`transform`] into a [`Model`], iterate through
//! [`Handle`]s) and hosts the command implementations the binary dispatches
//! to.
//!
//! ```text
//! let mut context = Context::new();
//! context.parse("a = Shuffle(1:4);")?;
//! let mut model = transform(&context)?;
//! let a = model.find("a")?;
//! let first = model.next(a)?;
//! ```

pub mod commands;
mod tracing_setup;

pub use rvs_diagnostic::{Error, ErrorCode, ErrorKind, Result};
pub use rvs_model::{Handle, Model, ResolvedSequence};
pub use rvs_parse::{
    parse, Context, FsLoader, MemoryLoader, SearchPath, SourceLoader, DEFAULT_EXPANSION_LIMIT,
};
pub use rvs_transform::transform;
pub use tracing_setup::init_tracing;
