//! The engine's error taxonomy.

use std::fmt;
use std::path::{Path, PathBuf};

use rvs_ir::Span;

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, ErrorCode, Snippet};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Location of a parse error.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Position {
    /// Byte offset into the parsed text.
    pub offset: u32,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, counted in characters.
    pub column: u32,
}

impl Position {
    /// Compute the position of `offset` within `source`.
    pub fn from_offset(source: &str, offset: u32) -> Self {
        let (line, column) = LineOffsetTable::build(source).offset_to_line_col(source, offset);
        Position {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Fieldless discriminant of [`Error`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorKind {
    Parse,
    DuplicateIdentifier,
    FileNotFound,
    SourceRead,
    UndefinedReference,
    CyclicReference,
    ExpansionLimit,
    InvalidHandle,
    EmptySequenceAccess,
}

impl ErrorKind {
    pub fn code(self) -> ErrorCode {
        match self {
            ErrorKind::Parse => ErrorCode::E0001,
            ErrorKind::DuplicateIdentifier => ErrorCode::E0002,
            ErrorKind::FileNotFound => ErrorCode::E0003,
            ErrorKind::SourceRead => ErrorCode::E0004,
            ErrorKind::UndefinedReference => ErrorCode::E1001,
            ErrorKind::CyclicReference => ErrorCode::E1002,
            ErrorKind::ExpansionLimit => ErrorCode::E1003,
            ErrorKind::InvalidHandle => ErrorCode::E2001,
            ErrorKind::EmptySequenceAccess => ErrorCode::E2002,
        }
    }
}

/// Every failure the engine reports.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("{}: {message}", location(.file.as_deref(), .position))]
    Parse {
        span: Span,
        position: Position,
        message: String,
        /// Imported file the error is in, `None` for the text given to `parse`.
        file: Option<PathBuf>,
    },

    #[error("duplicate identifier `{0}`")]
    DuplicateIdentifier(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read {}: {message}", .path.display())]
    SourceRead { path: PathBuf, message: String },

    #[error("undefined reference `{0}`")]
    UndefinedReference(String),

    #[error("cyclic reference: {}", .0.join(" -> "))]
    CyclicReference(Vec<String>),

    #[error("`{id}` expands to more than {limit} values")]
    ExpansionLimit { id: String, limit: usize },

    #[error("invalid handle {0}")]
    InvalidHandle(u32),

    #[error("handle {0} refers to an empty sequence")]
    EmptySequenceAccess(u32),
}

fn location(file: Option<&Path>, position: &Position) -> String {
    match file {
        Some(path) => format!("{}:{position}", path.display()),
        None => position.to_string(),
    }
}

impl Error {
    /// Build a parse error at `span` of `source`.
    pub fn parse(source: &str, span: Span, message: impl Into<String>) -> Self {
        Error::Parse {
            span,
            position: Position::from_offset(source, span.start),
            message: message.into(),
            file: None,
        }
    }

    /// Attach the imported file a parse error occurred in.
    ///
    /// Errors that already name a file, and non-parse errors, are unchanged.
    #[must_use]
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            Error::Parse {
                span,
                position,
                message,
                file: None,
            } => Error::Parse {
                span,
                position,
                message,
                file: Some(path.to_path_buf()),
            },
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse { .. } => ErrorKind::Parse,
            Error::DuplicateIdentifier(_) => ErrorKind::DuplicateIdentifier,
            Error::FileNotFound(_) => ErrorKind::FileNotFound,
            Error::SourceRead { .. } => ErrorKind::SourceRead,
            Error::UndefinedReference(_) => ErrorKind::UndefinedReference,
            Error::CyclicReference(_) => ErrorKind::CyclicReference,
            Error::ExpansionLimit { .. } => ErrorKind::ExpansionLimit,
            Error::InvalidHandle(_) => ErrorKind::InvalidHandle,
            Error::EmptySequenceAccess(_) => ErrorKind::EmptySequenceAccess,
        }
    }

    #[inline]
    pub fn code(&self) -> ErrorCode {
        self.kind().code()
    }

    /// Convert to a diagnostic for display.
    ///
    /// `source` is the text a parse error refers to (the imported file's
    /// contents when the error names a file). Without it, no snippet is shown.
    pub fn to_diagnostic(&self, source: Option<&str>) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.code());
        match self {
            Error::Parse {
                span,
                position,
                message,
                file,
            } => {
                let mut diagnostic = diagnostic
                    .with_message(message.clone())
                    .with_label(*span, message.clone());
                let path = file
                    .as_ref()
                    .map_or_else(|| "<input>".to_string(), |p| p.display().to_string());
                if let Some(source) = source {
                    diagnostic = diagnostic.with_snippet(Snippet::new(path, source, *span, *position));
                } else {
                    diagnostic = diagnostic.with_note(format!("at {path}:{position}"));
                }
                diagnostic
            }
            Error::DuplicateIdentifier(id) => diagnostic
                .with_message(self.to_string())
                .with_note("an identifier may be assigned only once per context")
                .with_suggestion(format!("rename one of the `{id}` definitions")),
            Error::FileNotFound(path) => diagnostic
                .with_message(self.to_string())
                .with_note("imports are resolved relative to the importing file, then against each search path entry in order")
                .with_suggestion(format!(
                    "add the directory containing `{}` with --search-path or RVS_PATH",
                    path.display()
                )),
            Error::SourceRead { .. } => diagnostic.with_message(self.to_string()),
            Error::UndefinedReference(id) => diagnostic
                .with_message(self.to_string())
                .with_suggestion(format!("define `{id}` before transforming")),
            Error::CyclicReference(chain) => diagnostic
                .with_message("cyclic reference")
                .with_note(format!("cycle: {}", chain.join(" -> "))),
            Error::ExpansionLimit { .. } => diagnostic
                .with_message(self.to_string())
                .with_suggestion("reduce the range or product sizes, or raise the expansion limit"),
            Error::InvalidHandle(_) | Error::EmptySequenceAccess(_) => {
                diagnostic.with_message(self.to_string())
            }
        }
    }
}
