//! The `repl` command: evaluate statements interactively.
//!
//! Each statement read is parsed into one long-lived context, the whole
//! context is transformed again, and the values of the last identifier
//! defined are printed in hex. A statement that fails to parse leaves the
//! context unchanged. One that parses but fails to transform stays defined,
//! so a later statement can supply a missing reference.

use std::io::{self, BufRead, Write};

use rvs_diagnostic::emitter::DiagnosticEmitter;
use rvs_diagnostic::Result;
use rvs_ir::TokenKind;
use rvs_parse::Context;
use rvs_transform::transform;
use tracing::trace;

use super::{emit_error, format_values, load_files, Options};

/// Splits line-oriented input into statements.
///
/// A statement ends at the first `;` token, so a `;` inside a comment or a
/// quoted import path does not end it. Text after the `;` is kept for the
/// next statement.
pub struct StatementReader<R> {
    input: R,
    pending: String,
}

impl<R: BufRead> StatementReader<R> {
    pub fn new(input: R) -> Self {
        StatementReader {
            input,
            pending: String::new(),
        }
    }

    /// Everything up to and including the next `;` token.
    ///
    /// At end of input the unterminated remainder is returned if it holds any
    /// token; `None` once only whitespace and comments are left.
    pub fn next_statement(&mut self) -> io::Result<Option<String>> {
        let mut line = Vec::new();
        loop {
            if let Some(end) = statement_end(&self.pending) {
                let rest = self.pending.split_off(end);
                let statement = std::mem::replace(&mut self.pending, rest);
                trace!(%statement, "statement read");
                return Ok(Some(statement));
            }

            line.clear();
            if self.input.read_until(b'\n', &mut line)? == 0 {
                let rest = std::mem::take(&mut self.pending);
                return Ok((rvs_lexer::lex(&rest).len() > 1).then_some(rest));
            }
            self.pending.push_str(&String::from_utf8_lossy(&line));
        }
    }
}

/// Byte offset just past the first `;` token of `text`.
fn statement_end(text: &str) -> Option<usize> {
    rvs_lexer::lex(text)
        .iter()
        .find(|token| token.kind == TokenKind::Semicolon)
        .map(|token| token.span.end as usize)
}

/// Parse `statement` into `context`, transform, and render up to `count`
/// values of the last identifier defined.
///
/// Returns `None` when the context has no statements.
pub fn eval_statement(context: &mut Context, statement: &str, count: usize) -> Result<Option<String>> {
    context.parse(statement)?;
    let mut model = transform(context)?;
    let Some(last) = context.statements().last() else {
        return Ok(None);
    };
    let handle = model.find(&last.name)?;
    let values = format_values(&mut model, handle, count, true)?;
    Ok(Some(format!("{}: {values}", last.name)))
}

/// Run the read-eval-print loop until `input` is exhausted.
///
/// Files named in `options` are loaded first. Errors are reported through
/// `emitter` and do not end the loop.
pub fn run_repl(
    options: &Options,
    input: &mut impl BufRead,
    out: &mut impl Write,
    emitter: &mut impl DiagnosticEmitter,
) -> io::Result<()> {
    let mut context = match load_files(options) {
        Ok(context) => context,
        Err(err) => {
            emit_error(emitter, &err, None);
            options.context()
        }
    };

    let mut reader = StatementReader::new(input);
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(statement) = reader.next_statement()? else {
            writeln!(out)?;
            return Ok(());
        };
        match eval_statement(&mut context, &statement, options.count) {
            Ok(Some(line)) => writeln!(out, "=> {line}")?,
            Ok(None) => {}
            Err(err) => emit_error(emitter, &err, Some(&statement)),
        }
    }
}
