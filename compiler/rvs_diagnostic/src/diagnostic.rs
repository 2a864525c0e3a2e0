use std::fmt;

use rvs_ir::Span;

use crate::error::Position;
use crate::span_utils::LineOffsetTable;
use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A labeled span with a message.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }
}

/// The offending source line, ready to print with a caret under it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Snippet {
    /// Display name of the source (`<input>` or a file path).
    pub path: String,
    pub line: u32,
    pub column: u32,
    pub line_text: String,
    /// Number of carets to draw (at least 1).
    pub width: usize,
}

impl Snippet {
    pub fn new(path: impl Into<String>, source: &str, span: Span, position: Position) -> Self {
        let table = LineOffsetTable::build(source);
        let line_text = table.line_text(source, position.line).to_string();
        let remaining = line_text
            .chars()
            .count()
            .saturating_sub(position.column as usize - 1);
        let width = (span.len() as usize).clamp(1, remaining.max(1));
        Snippet {
            path: path.into(),
            line: position.line,
            column: position.column,
            line_text,
            width,
        }
    }
}

/// A rendered-ready report of one error.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub snippet: Option<Snippet>,
    pub notes: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: String::new(),
            labels: Vec::new(),
            snippet: None,
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add a primary label at the error location.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    pub fn with_snippet(mut self, snippet: Snippet) -> Self {
        self.snippet = Some(snippet);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;

        if let Some(snippet) = &self.snippet {
            write!(f, "\n  --> {}:{}:{}", snippet.path, snippet.line, snippet.column)?;
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        for suggestion in &self.suggestions {
            write!(f, "\n  = help: {suggestion}")?;
        }

        Ok(())
    }
}
