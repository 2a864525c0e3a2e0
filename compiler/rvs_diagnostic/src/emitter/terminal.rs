//! Terminal Emitter
//!
//! Human-readable diagnostic output with optional ANSI color support.

use std::io::{self, Write};

use crate::{Diagnostic, Severity};

use super::DiagnosticEmitter;

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const NOTE: &str = "\x1b[1;36m"; // Bold cyan
    pub const HELP: &str = "\x1b[1;32m"; // Bold green
    pub const BOLD: &str = "\x1b[1m";
    pub const GUTTER: &str = "\x1b[1;34m"; // Bold blue
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Use colors when the output is a TTY.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a boolean; `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Terminal emitter with optional color support.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    /// Create a terminal emitter for stderr.
    pub fn stderr(mode: ColorMode, is_tty: bool) -> TerminalEmitter<io::Stderr> {
        TerminalEmitter {
            writer: io::stderr(),
            colors: mode.should_use_colors(is_tty),
        }
    }

    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn write_severity(&mut self, severity: Severity) {
        let color = match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
        };
        self.write_colored(&severity.to_string(), color);
    }

    fn write_snippet(&mut self, diagnostic: &Diagnostic) {
        let Some(snippet) = &diagnostic.snippet else {
            return;
        };
        let gutter = snippet.line.to_string();
        let pad = " ".repeat(gutter.len());

        self.write_colored(&format!("{pad}--> "), colors::GUTTER);
        let _ = writeln!(
            self.writer,
            "{}:{}:{}",
            snippet.path, snippet.line, snippet.column
        );
        self.write_colored(&format!("{pad} |"), colors::GUTTER);
        let _ = writeln!(self.writer);
        self.write_colored(&format!("{gutter} | "), colors::GUTTER);
        let _ = writeln!(self.writer, "{}", snippet.line_text);
        self.write_colored(&format!("{pad} | "), colors::GUTTER);

        let indent = " ".repeat(snippet.column.saturating_sub(1) as usize);
        let carets = "^".repeat(snippet.width);
        let _ = write!(self.writer, "{indent}");
        self.write_colored(&carets, colors::ERROR);
        if let Some(label) = diagnostic.labels.iter().find(|l| l.is_primary) {
            let _ = write!(self.writer, " ");
            self.write_colored(&label.message, colors::ERROR);
        }
        let _ = writeln!(self.writer);
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        // Header: severity[CODE]: message
        self.write_severity(diagnostic.severity);
        if self.colors {
            let _ = write!(
                self.writer,
                "{}[{}]{}",
                colors::BOLD,
                diagnostic.code,
                colors::RESET
            );
        } else {
            let _ = write!(self.writer, "[{}]", diagnostic.code);
        }
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        self.write_snippet(diagnostic);

        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.write_colored("note", colors::BOLD);
            let _ = writeln!(self.writer, ": {note}");
        }

        for suggestion in &diagnostic.suggestions {
            let _ = write!(self.writer, "  = ");
            self.write_colored("help", colors::HELP);
            let _ = writeln!(self.writer, ": {suggestion}");
        }
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use crate::{Error, ErrorCode};
    use pretty_assertions::assert_eq;
    use rvs_ir::Span;

    fn render(diagnostic: &Diagnostic, mode: ColorMode) -> String {
        let mut output = Vec::new();
        let mut emitter = TerminalEmitter::with_color_mode(&mut output, mode, false);
        emitter.emit(diagnostic);
        emitter.flush();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_error_snippet_no_color() {
        let source = "a = 5 b = 6;";
        let err = Error::parse(source, Span::new(6, 7), "expected `;`, found identifier");
        let text = render(&err.to_diagnostic(Some(source)), ColorMode::Never);

        assert_eq!(
            text,
            "error[E0001]: expected `;`, found identifier\n\
             \x20--> <input>:1:7\n\
             \x20 |\n\
             1 | a = 5 b = 6;\n\
             \x20 |       ^ expected `;`, found identifier\n"
        );
    }

    #[test]
    fn test_notes_and_help() {
        let diag = Diagnostic::error(ErrorCode::E1002)
            .with_message("cyclic reference")
            .with_note("cycle: a -> b -> a")
            .with_suggestion("break the cycle");
        let text = render(&diag, ColorMode::Never);
        assert!(text.contains("= note: cycle: a -> b -> a"));
        assert!(text.contains("= help: break the cycle"));
    }

    #[test]
    fn test_color_modes() {
        let diag = Diagnostic::error(ErrorCode::E2001).with_message("invalid handle 0");
        assert!(render(&diag, ColorMode::Always).contains("\x1b["));
        assert!(!render(&diag, ColorMode::Never).contains("\x1b["));
        // Auto without a TTY stays plain.
        assert!(!render(&diag, ColorMode::Auto).contains("\x1b["));
    }

    #[test]
    fn test_color_mode_default_is_auto() {
        assert_eq!(ColorMode::default(), ColorMode::Auto);
        assert!(ColorMode::Auto.should_use_colors(true));
    }
}
