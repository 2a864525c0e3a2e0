//! The `explain` command: describe an error code.

use std::io::Write;

use rvs_diagnostic::ErrorCode;

/// Print the description of `code_str`. Returns `false` for unknown codes.
pub fn explain_error(code_str: &str, out: &mut impl Write) -> bool {
    let Some(code) = ErrorCode::parse(code_str.trim()) else {
        return false;
    };
    let _ = writeln!(out, "{code}: {}", code.description());
    true
}
