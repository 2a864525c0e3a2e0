//! The `run` command: parse files, transform, and print sequence values.

use std::io::Write;

use rvs_diagnostic::Result;
use rvs_model::{Handle, Model};
use rvs_transform::transform;
use tracing::debug;

use super::{load_files, Options};

/// Parse and transform every file of `options`, then print up to
/// `options.count` values of each selected identifier, one line each.
pub fn run_files(options: &Options, out: &mut impl Write) -> Result<()> {
    let context = load_files(options)?;
    let mut model = transform(&context)?;

    let handles: Vec<Handle> = if options.ids.is_empty() {
        model.handles().collect()
    } else {
        options
            .ids
            .iter()
            .map(|id| model.find(id))
            .collect::<Result<_>>()?
    };
    debug!(sequences = handles.len(), count = options.count, "printing");

    for handle in handles {
        let name = model.sequence(handle)?.name().to_string();
        let values = format_values(&mut model, handle, options.count, options.hex)?;
        let _ = writeln!(out, "{name}: {values}");
    }
    Ok(())
}

/// Step `handle` forward up to `count` times and render the values.
///
/// Stepping stops at the last value, which is marked `<done>`. A truncated
/// listing ends in `...`. Empty sequences render as `<empty>`.
pub fn format_values(model: &mut Model, handle: Handle, count: usize, hex: bool) -> Result<String> {
    if model.sequence(handle)?.is_empty() {
        return Ok("<empty>".to_string());
    }

    let mut rendered = Vec::new();
    let mut done = false;
    while rendered.len() < count && !done {
        let value = model.next(handle)?;
        done = model.done(handle)?;
        let mut text = if hex {
            format!("{value:#x}")
        } else {
            value.to_string()
        };
        if done {
            text.push_str(" <done>");
        }
        rendered.push(text);
    }
    if !done {
        rendered.push("...".to_string());
    }
    Ok(rendered.join(", "))
}
