//! The `check` command: parse and transform without printing values.

use std::io::Write;

use rvs_diagnostic::Result;
use rvs_transform::transform;

use super::{load_files, Options};

/// Parse and transform every file of `options`, reporting a one-line summary.
pub fn check_files(options: &Options, out: &mut impl Write) -> Result<()> {
    let context = load_files(options)?;
    let model = transform(&context)?;

    let values: usize = model.sequences().iter().map(rvs_model::ResolvedSequence::len).sum();
    // Top-level files count as imported too.
    let files = context.imported_files().count();
    let _ = writeln!(
        out,
        "OK: {} sequences, {values} values, {files} files",
        model.len()
    );
    Ok(())
}
