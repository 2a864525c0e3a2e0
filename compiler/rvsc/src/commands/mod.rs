//! Command implementations for the `rvs` binary.
//!
//! Each command writes its normal output to a caller-supplied writer and
//! returns engine errors instead of exiting, so the binary decides how to
//! report them and tests can capture output.

mod check;
mod debug;
mod explain;
mod repl;
mod run;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use rvs_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use rvs_diagnostic::Error;
use rvs_parse::{Context, SearchPath};

pub use check::check_files;
pub use debug::lex_file;
pub use explain::explain_error;
pub use repl::{eval_statement, run_repl, StatementReader};
pub use run::{format_values, run_files};

/// Number of values printed per identifier when `--count` is not given.
pub const DEFAULT_COUNT: usize = 16;

/// Settings shared by the `run`, `check` and `repl` commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    pub seed: u32,
    pub search_path: SearchPath,
    /// Values to print per identifier.
    pub count: usize,
    /// Identifiers to print; every identifier when empty.
    pub ids: Vec<String>,
    pub hex: bool,
    pub color: ColorMode,
    pub files: Vec<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            seed: 0,
            search_path: SearchPath::new(),
            count: DEFAULT_COUNT,
            ids: Vec::new(),
            hex: false,
            color: ColorMode::Auto,
            files: Vec::new(),
        }
    }
}

impl Options {
    /// Defaults overridden by `RVS_SEED`, `RVS_PATH` and `NO_COLOR`.
    pub fn from_env() -> Result<Self, String> {
        let mut options = Options::default();
        if let Ok(seed) = std::env::var("RVS_SEED") {
            options.seed = parse_seed("RVS_SEED", &seed)?;
        }
        if let Some(paths) = std::env::var_os("RVS_PATH") {
            options.search_path = SearchPath::from_env_value(&paths);
        }
        if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            options.color = ColorMode::Never;
        }
        Ok(options)
    }

    /// Apply command-line arguments on top of `self`.
    ///
    /// Options take the `--name=value` form. Anything not starting with `-` is
    /// a source file. `--search-path` entries are searched before those
    /// already present (from `RVS_PATH`).
    pub fn apply_args(mut self, args: &[String]) -> Result<Self, String> {
        let mut search_path = SearchPath::new();
        for arg in args {
            if let Some(value) = arg.strip_prefix("--seed=") {
                self.seed = parse_seed("--seed", value)?;
            } else if let Some(value) = arg.strip_prefix("--search-path=") {
                search_path.extend(&SearchPath::from_env_value(OsStr::new(value)));
            } else if let Some(value) = arg.strip_prefix("--count=") {
                self.count = usize::try_from(parse_number("--count", value)?)
                    .map_err(|_| format!("--count is too large: `{value}`"))?;
            } else if let Some(value) = arg.strip_prefix("--id=") {
                self.ids.push(value.to_string());
            } else if let Some(value) = arg.strip_prefix("--color=") {
                self.color = match value {
                    "auto" => ColorMode::Auto,
                    "always" => ColorMode::Always,
                    "never" => ColorMode::Never,
                    _ => return Err(format!("invalid value for --color: `{value}`")),
                };
            } else if arg == "--hex" || arg == "-x" {
                self.hex = true;
            } else if arg.starts_with('-') {
                return Err(format!("unknown option `{arg}`"));
            } else {
                self.files.push(PathBuf::from(arg));
            }
        }
        search_path.extend(&self.search_path);
        self.search_path = search_path;
        Ok(self)
    }

    /// A fresh file-system backed context with this seed and search path.
    pub fn context(&self) -> Context {
        Context::new()
            .with_seed(self.seed)
            .with_search_paths(self.search_path.paths().iter().cloned())
    }
}

fn parse_number(option: &str, value: &str) -> Result<u64, String> {
    let value = value.trim();
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|_| format!("invalid value for {option}: `{value}`"))
}

fn parse_seed(option: &str, value: &str) -> Result<u32, String> {
    u32::try_from(parse_number(option, value)?)
        .map_err(|_| format!("{option} does not fit in 32 bits: `{}`", value.trim()))
}

/// Parse every file of `options` into a fresh context.
pub fn load_files(options: &Options) -> rvs_diagnostic::Result<Context> {
    let mut context = options.context();
    for file in &options.files {
        context.parse_file(file)?;
    }
    Ok(context)
}

/// Render `error` to stderr with a source snippet where one is available.
///
/// `input` is the text given directly to `Context::parse`, if any. Parse
/// errors in files are shown against the file's contents.
pub fn report_error(error: &Error, input: Option<&str>, color: ColorMode) {
    emit_error(&mut stderr_emitter(color), error, input);
}

/// Terminal emitter for stderr, colored per `color` and whether stderr is a
/// terminal.
pub fn stderr_emitter(color: ColorMode) -> TerminalEmitter<std::io::Stderr> {
    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
    TerminalEmitter::<std::io::Stderr>::stderr(color, is_tty)
}

/// Emit `error` through any emitter. See [`report_error`].
pub fn emit_error(emitter: &mut impl DiagnosticEmitter, error: &Error, input: Option<&str>) {
    let file_text = match error {
        Error::Parse {
            file: Some(path), ..
        } => read_source(path),
        _ => None,
    };
    let source = file_text.as_deref().or(input);
    emitter.emit(&error.to_diagnostic(source));
    emitter.flush();
}

fn read_source(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok()
}
