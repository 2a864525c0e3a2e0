//! Import resolution and source loading.

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use rustc_hash::FxHashMap;
use rvs_diagnostic::{Error, Result};
use tracing::debug;

/// Where imported sources come from.
///
/// The parser only ever touches the file system through this trait, so
/// embedders and tests can supply sources from memory.
pub trait SourceLoader {
    /// Whether `path` names a loadable source.
    fn exists(&self, path: &Path) -> bool;

    /// Read the source at `path`.
    fn load(&self, path: &Path) -> Result<String>;

    /// Key under which `path` is remembered as imported.
    ///
    /// Two paths with the same key are the same source.
    fn canonicalize(&self, path: &Path) -> PathBuf {
        normalize(path)
    }
}

/// Loads sources from the file system.
#[derive(Copy, Clone, Debug, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn load(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
            _ => Error::SourceRead {
                path: path.to_path_buf(),
                message: err.to_string(),
            },
        })
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| normalize(path))
    }
}

/// Sources held in memory, keyed by normalized path.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    files: FxHashMap<PathBuf, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        MemoryLoader::default()
    }

    /// Builder form of [`MemoryLoader::insert`].
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl AsRef<Path>, contents: impl Into<String>) {
        self.files.insert(normalize(path.as_ref()), contents.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SourceLoader for MemoryLoader {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(&normalize(path))
    }

    fn load(&self, path: &Path) -> Result<String> {
        self.files
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| Error::FileNotFound(path.to_path_buf()))
    }
}

/// Ordered list of directories searched for imports; first match wins.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    paths: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new() -> Self {
        SearchPath::default()
    }

    /// Split an OS path list (`:`-separated on Unix, `;` on Windows), such
    /// as the value of `RVS_PATH`. Empty entries are ignored.
    pub fn from_env_value(value: &OsStr) -> Self {
        SearchPath {
            paths: std::env::split_paths(value)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
        }
    }

    pub fn push(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    pub fn extend(&mut self, other: &SearchPath) {
        self.paths.extend(other.paths.iter().cloned());
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Find the file an import refers to.
    ///
    /// Tries `import_dir` (the directory of the importing file, if any)
    /// first, then every search path entry in order. Absolute paths are used
    /// as is.
    pub fn resolve(
        &self,
        import: &Path,
        import_dir: Option<&Path>,
        loader: &dyn SourceLoader,
    ) -> Result<PathBuf> {
        if import.is_absolute() {
            return if loader.exists(import) {
                Ok(import.to_path_buf())
            } else {
                Err(Error::FileNotFound(import.to_path_buf()))
            };
        }

        let candidates = import_dir
            .into_iter()
            .chain(self.paths.iter().map(PathBuf::as_path))
            .map(|dir| dir.join(import));

        for candidate in candidates {
            if loader.exists(&candidate) {
                debug!(import = %import.display(), resolved = %candidate.display(), "resolved import");
                return Ok(candidate);
            }
        }

        debug!(import = %import.display(), searched = self.paths.len(), "import not found");
        Err(Error::FileNotFound(import.to_path_buf()))
    }
}

impl fmt::Debug for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.paths).finish()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for SearchPath {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        SearchPath {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Lexically drop `.` components and fold `dir/..` pairs.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("./a/./b.rvs")), PathBuf::from("a/b.rvs"));
        assert_eq!(normalize(Path::new("a/../b.rvs")), PathBuf::from("b.rvs"));
        assert_eq!(normalize(Path::new("../b.rvs")), PathBuf::from("../b.rvs"));
    }

    #[test]
    fn test_memory_loader() {
        let loader = MemoryLoader::new().with_file("./lib/a.rvs", "a = 1;");
        assert!(loader.exists(Path::new("lib/a.rvs")));
        assert_eq!(loader.load(Path::new("lib/./a.rvs")).unwrap(), "a = 1;");
        assert_eq!(
            loader.load(Path::new("b.rvs")),
            Err(Error::FileNotFound(PathBuf::from("b.rvs")))
        );
        assert_eq!(loader.len(), 1);
    }

    #[test]
    fn test_resolve_prefers_importing_dir() {
        let loader = MemoryLoader::new()
            .with_file("src/common.rvs", "")
            .with_file("lib/common.rvs", "");
        let search: SearchPath = ["lib"].into_iter().collect();

        let found = search
            .resolve(Path::new("common.rvs"), Some(Path::new("src")), &loader)
            .unwrap();
        assert_eq!(normalize(&found), PathBuf::from("src/common.rvs"));

        let found = search.resolve(Path::new("common.rvs"), None, &loader).unwrap();
        assert_eq!(normalize(&found), PathBuf::from("lib/common.rvs"));
    }

    #[test]
    fn test_resolve_first_search_entry_wins() {
        let loader = MemoryLoader::new()
            .with_file("one/x.rvs", "")
            .with_file("two/x.rvs", "");
        let search: SearchPath = ["missing", "two", "one"].into_iter().collect();
        let found = search.resolve(Path::new("x.rvs"), None, &loader).unwrap();
        assert_eq!(found, PathBuf::from("two/x.rvs"));
    }

    #[test]
    fn test_resolve_not_found() {
        let search = SearchPath::new();
        let err = search
            .resolve(Path::new("nope.rvs"), None, &MemoryLoader::new())
            .unwrap_err();
        assert_eq!(err, Error::FileNotFound(PathBuf::from("nope.rvs")));
    }

    #[cfg(unix)]
    #[test]
    fn test_from_env_value_skips_empty_entries() {
        let search = SearchPath::from_env_value(OsStr::new("/a::/b:"));
        assert_eq!(search.paths(), &[PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn test_fs_loader_reads_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.rvs");
        fs::write(&file, "a = 1;").unwrap();

        assert!(FsLoader.exists(&file));
        assert_eq!(FsLoader.load(&file).unwrap(), "a = 1;");

        let missing = dir.path().join("b.rvs");
        assert!(!FsLoader.exists(&missing));
        assert_eq!(FsLoader.load(&missing), Err(Error::FileNotFound(missing)));
    }
}
