use std::fmt;

/// Stable codes for every engine error.
///
/// Format: E#### where the first digit indicates the phase:
/// - E0xxx: parsing and source loading
/// - E1xxx: transformation
/// - E2xxx: iteration
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    /// Syntax error
    E0001,
    /// Identifier defined twice
    E0002,
    /// Imported file not found in the search path
    E0003,
    /// Imported file could not be read
    E0004,
    /// Reference to an undefined identifier
    E1001,
    /// Identifiers reference each other in a cycle
    E1002,
    /// Expansion exceeds the configured size limit
    E1003,
    /// Handle does not name a sequence
    E2001,
    /// `next`/`prev` on an empty sequence
    E2002,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
        }
    }

    /// One-line explanation, used by `rvs explain`.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "the source text does not match the rvs grammar",
            ErrorCode::E0002 => "an identifier is assigned more than once in the same context",
            ErrorCode::E0003 => "an imported file was not found relative to the importing file or in the search path",
            ErrorCode::E0004 => "an imported file exists but could not be read",
            ErrorCode::E1001 => "an expression references an identifier that is never defined",
            ErrorCode::E1002 => "identifiers reference each other in a cycle",
            ErrorCode::E1003 => "a definition expands to more values than the configured limit",
            ErrorCode::E2001 => "a handle is zero or larger than the number of sequences",
            ErrorCode::E2002 => "a value was requested from a sequence with no values",
        }
    }

    /// Parse a code such as `E1002` (case-insensitive).
    pub fn parse(code: &str) -> Option<ErrorCode> {
        const ALL: [ErrorCode; 9] = [
            ErrorCode::E0001,
            ErrorCode::E0002,
            ErrorCode::E0003,
            ErrorCode::E0004,
            ErrorCode::E1001,
            ErrorCode::E1002,
            ErrorCode::E1003,
            ErrorCode::E2001,
            ErrorCode::E2002,
        ];
        ALL.into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
