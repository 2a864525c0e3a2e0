//! Errors and diagnostics for the sequence engine.
//!
//! Every phase reports failures as a single [`Error`] value: the first problem
//! found, never a partial result. Callers that want rustc-style output turn an
//! error into a [`Diagnostic`] with [`Error::to_diagnostic`] and hand it to an
//! emitter:
//!
//! ```text
//! error[E0001]: expected `;`, found identifier
//!   --> input:1:7
//!    |
//!  1 | a = 5 b = 6;
//!    |       ^ expected `;`
//! ```

mod diagnostic;
pub mod emitter;
mod error;
mod error_code;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Severity, Snippet};
pub use error::{Error, ErrorKind, Position, Result};
pub use error_code::ErrorCode;
