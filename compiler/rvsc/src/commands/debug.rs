//! Debugging commands that expose intermediate phases.

use std::io::Write;
use std::path::Path;

use rvs_diagnostic::{Error, Result};

/// Print the token stream of a source file.
pub fn lex_file(path: &Path, out: &mut impl Write) -> Result<()> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
        _ => Error::SourceRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;
    let tokens = rvs_lexer::lex(&content);

    let _ = writeln!(out, "Tokens for '{}' ({} tokens):", path.display(), tokens.len());
    for token in tokens.iter() {
        let _ = writeln!(out, "  {:?} @ {}", token.kind, token.span);
    }
    Ok(())
}
