//! Parse context: everything accumulated across `parse` calls.

use std::fmt;
use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};
use rvs_diagnostic::{Error, Result};
use rvs_ir::{ExprArena, Stmt};
use rvs_stack::ensure_sufficient_stack;
use tracing::debug;

use crate::grammar::{Item, Parser};
use crate::source::{FsLoader, SearchPath, SourceLoader};

/// Default cap on the number of values any single expansion may produce.
pub const DEFAULT_EXPANSION_LIMIT: usize = 1 << 24;

/// Accumulates statements from one or more parse calls.
///
/// Parsing is atomic per call: if a call fails, the context is left exactly
/// as it was before the call.
pub struct Context {
    arena: ExprArena,
    stmts: Vec<Stmt>,
    /// Identifier to index into `stmts`.
    symbols: FxHashMap<String, usize>,
    /// Enum names; they share the statement namespace.
    enums: FxHashSet<String>,
    /// `Enum::Member` to value.
    constants: FxHashMap<String, u32>,
    search_path: SearchPath,
    seed: u32,
    /// Canonical keys of every file imported so far.
    imported: FxHashSet<PathBuf>,
    loader: Box<dyn SourceLoader + Send + Sync>,
    expansion_limit: usize,
}

/// Results of an in-progress parse call, committed only on success.
#[derive(Default)]
struct Pending {
    stmts: Vec<Stmt>,
    constants: Vec<(String, u32)>,
    enums: Vec<String>,
    names: FxHashSet<String>,
    imported: FxHashSet<PathBuf>,
}

impl Context {
    pub fn new() -> Self {
        Context {
            arena: ExprArena::new(),
            stmts: Vec::new(),
            symbols: FxHashMap::default(),
            enums: FxHashSet::default(),
            constants: FxHashMap::default(),
            search_path: SearchPath::new(),
            seed: 0,
            imported: FxHashSet::default(),
            loader: Box::new(FsLoader),
            expansion_limit: DEFAULT_EXPANSION_LIMIT,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Append every entry of `paths` to the search path.
    #[must_use]
    pub fn with_search_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for path in paths {
            self.search_path.push(path);
        }
        self
    }

    /// Replace the source loader (the file system by default).
    #[must_use]
    pub fn with_loader(mut self, loader: impl SourceLoader + Send + Sync + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    #[must_use]
    pub fn with_expansion_limit(mut self, limit: usize) -> Self {
        self.expansion_limit = limit;
        self
    }

    /// Set the seed used by subsequent transforms.
    pub fn seed(&mut self, seed: u32) {
        self.seed = seed;
    }

    /// Append a directory to the import search path.
    ///
    /// The directory is not checked here; a missing file is reported as
    /// `FileNotFound` when an import fails to resolve.
    pub fn search_path(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        debug!(path = %path.display(), "search path entry added");
        self.search_path.push(path);
        Ok(())
    }

    /// Parse `source` and append its statements.
    ///
    /// Imports are resolved against the search path only.
    pub fn parse(&mut self, source: &str) -> Result<()> {
        self.parse_atomic(|ctx, pending| ctx.parse_source(source, None, pending))
    }

    /// Load and parse a file, as if it had been imported.
    ///
    /// `path` is used directly when the loader finds it, otherwise it is
    /// resolved against the search path. Imports inside the file are resolved
    /// relative to it first. Parsing a file that was already imported is a
    /// no-op.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.parse_atomic(|ctx, pending| {
            let resolved = if ctx.loader.exists(path) {
                path.to_path_buf()
            } else {
                ctx.search_path.resolve(path, None, ctx.loader.as_ref())?
            };
            ctx.parse_imported(resolved, pending)
        })
    }

    fn parse_atomic(
        &mut self,
        run: impl FnOnce(&mut Self, &mut Pending) -> Result<()>,
    ) -> Result<()> {
        let checkpoint = self.arena.checkpoint();
        let mut pending = Pending::default();

        if let Err(err) = run(self, &mut pending) {
            debug!(error = %err, "parse failed, rolling back");
            self.arena.rollback(checkpoint);
            return Err(err);
        }

        debug!(
            statements = pending.stmts.len(),
            enums = pending.enums.len(),
            imports = pending.imported.len(),
            "parse committed"
        );
        for stmt in pending.stmts {
            self.symbols.insert(stmt.name.clone(), self.stmts.len());
            self.stmts.push(stmt);
        }
        self.enums.extend(pending.enums);
        self.constants.extend(pending.constants);
        self.imported.extend(pending.imported);
        Ok(())
    }

    fn parse_source(
        &mut self,
        source: &str,
        origin: Option<&Path>,
        pending: &mut Pending,
    ) -> Result<()> {
        let tokens = rvs_lexer::lex(source);
        let items = Parser::new(&tokens, source, &mut self.arena)
            .parse_program()
            .map_err(|err| match origin {
                Some(path) => err.in_file(path),
                None => err,
            })?;

        for item in items {
            match item {
                Item::Stmt {
                    name,
                    name_span,
                    expr,
                } => {
                    self.claim_name(&name, pending)?;
                    pending.stmts.push(Stmt {
                        name,
                        name_span,
                        expr,
                        origin: origin.map(Path::to_path_buf),
                    });
                }
                Item::Enum(def) => {
                    self.claim_name(&def.name, pending)?;
                    debug!(name = %def.name, members = def.members.len(), "enum");
                    pending.constants.extend(def.constants());
                    pending.enums.push(def.name);
                }
                Item::Import { path, span } => {
                    let import_dir = origin.and_then(Path::parent);
                    let resolved =
                        self.search_path
                            .resolve(&path, import_dir, self.loader.as_ref())?;
                    debug!(?span, import = %path.display(), "import");
                    ensure_sufficient_stack(|| self.parse_imported(resolved, pending))?;
                }
            }
        }
        Ok(())
    }

    /// Reserve `name` for a statement or enum of the current parse call.
    fn claim_name(&self, name: &str, pending: &mut Pending) -> Result<()> {
        if self.symbols.contains_key(name)
            || self.enums.contains(name)
            || !pending.names.insert(name.to_string())
        {
            return Err(Error::DuplicateIdentifier(name.to_string()));
        }
        Ok(())
    }

    /// Parse a resolved file unless it was already imported.
    fn parse_imported(&mut self, resolved: PathBuf, pending: &mut Pending) -> Result<()> {
        let key = self.loader.canonicalize(&resolved);
        if self.imported.contains(&key) || !pending.imported.insert(key) {
            debug!(path = %resolved.display(), "already imported, skipping");
            return Ok(());
        }
        let text = self.loader.load(&resolved)?;
        self.parse_source(&text, Some(&resolved), pending)
    }

    /// Statements in declaration order.
    pub fn statements(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    /// The statement defining `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<&Stmt> {
        self.symbols.get(name).map(|&index| &self.stmts[index])
    }

    /// Index of the statement defining `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.symbols.get(name).copied()
    }

    /// Value of the enum member `Enum::Member`.
    pub fn constant(&self, name: &str) -> Option<u32> {
        self.constants.get(name).copied()
    }

    pub fn seed_value(&self) -> u32 {
        self.seed
    }

    pub fn search_paths(&self) -> &SearchPath {
        &self.search_path
    }

    pub fn expansion_limit(&self) -> usize {
        self.expansion_limit
    }

    /// Canonical paths of every imported file.
    pub fn imported_files(&self) -> impl Iterator<Item = &Path> {
        self.imported.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("statements", &self.stmts.len())
            .field("constants", &self.constants.len())
            .field("search_path", &self.search_path)
            .field("seed", &self.seed)
            .field("imported", &self.imported.len())
            .field("expansion_limit", &self.expansion_limit)
            .finish_non_exhaustive()
    }
}
