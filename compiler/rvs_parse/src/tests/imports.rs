//! Import resolution through the context.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Context, MemoryLoader};
use pretty_assertions::assert_eq;
use rvs_diagnostic::{Error, ErrorKind};

fn names(ctx: &Context) -> Vec<&str> {
    ctx.statements().iter().map(|s| s.name.as_str()).collect()
}

fn memory_context(loader: MemoryLoader) -> Context {
    Context::new().with_loader(loader).with_search_paths(["lib"])
}

#[test]
fn test_import_module_path_splices_in_place() {
    let loader = MemoryLoader::new().with_file("lib/common/values.rvs", "v = 1, 2;");
    let mut ctx = memory_context(loader);
    ctx.parse("first = 0; import common::values; last = v;").unwrap();

    assert_eq!(names(&ctx), vec!["first", "v", "last"]);
    let v = ctx.lookup("v").unwrap();
    assert_eq!(
        v.origin.as_deref(),
        Some(Path::new("lib/common/values.rvs"))
    );
}

#[test]
fn test_import_string_path() {
    let loader = MemoryLoader::new().with_file("lib/dir/a.rvs", "a = 1;");
    let mut ctx = memory_context(loader);
    ctx.parse("import 'dir/a.rvs';").unwrap();
    assert_eq!(names(&ctx), vec!["a"]);
}

#[test]
fn test_import_is_idempotent_within_and_across_calls() {
    let loader = MemoryLoader::new().with_file("lib/a.rvs", "a = 1;");
    let mut ctx = memory_context(loader);
    ctx.parse("import a; import a;").unwrap();
    ctx.parse("import \"a.rvs\";").unwrap();
    assert_eq!(names(&ctx), vec!["a"]);
    assert_eq!(ctx.imported_files().count(), 1);
}

#[test]
fn test_import_cycle_is_broken() {
    let loader = MemoryLoader::new()
        .with_file("lib/a.rvs", "import b; a = 1;")
        .with_file("lib/b.rvs", "import a; b = 2;");
    let mut ctx = memory_context(loader);
    ctx.parse("import a;").unwrap();
    assert_eq!(names(&ctx), vec!["b", "a"]);
}

#[test]
fn test_import_relative_to_importing_file_first() {
    let loader = MemoryLoader::new()
        .with_file("lib/pkg/main.rvs", "import helper;")
        .with_file("lib/pkg/helper.rvs", "h = 1;")
        .with_file("lib/helper.rvs", "h = 2;");
    let mut ctx = memory_context(loader);
    ctx.parse("import pkg::main;").unwrap();

    let h = ctx.lookup("h").unwrap();
    assert_eq!(h.origin.as_deref(), Some(Path::new("lib/pkg/helper.rvs")));
}

#[test]
fn test_missing_import_is_file_not_found_and_atomic() {
    let mut ctx = memory_context(MemoryLoader::new());
    let err = ctx.parse("a = 1; import missing;").unwrap_err();
    assert_eq!(err, Error::FileNotFound(PathBuf::from("missing.rvs")));
    assert!(ctx.is_empty());
}

#[test]
fn test_parse_error_in_import_names_the_file() {
    let loader = MemoryLoader::new().with_file("lib/bad.rvs", "x = 1;\ny = ;");
    let mut ctx = memory_context(loader);
    let err = ctx.parse("import bad;").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(err.to_string(), "lib/bad.rvs:2:5: expected expression, found `;`");
    assert_eq!(ctx.imported_files().count(), 0);
}

#[test]
fn test_duplicate_between_import_and_source() {
    let loader = MemoryLoader::new().with_file("lib/a.rvs", "a = 1;");
    let mut ctx = memory_context(loader);
    assert_eq!(
        ctx.parse("a = 0; import a;"),
        Err(Error::DuplicateIdentifier("a".to_string()))
    );
    // The failed import was not recorded, so it can be retried elsewhere.
    assert_eq!(ctx.imported_files().count(), 0);
}

#[test]
fn test_parse_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("inc")).unwrap();
    fs::write(dir.path().join("main.rvs"), "import inc::extra;\nm = (e, 1)+;").unwrap();
    fs::write(dir.path().join("inc/extra.rvs"), "e = 3:4;").unwrap();

    let mut ctx = Context::new();
    ctx.parse_file(dir.path().join("main.rvs")).unwrap();
    assert_eq!(names(&ctx), vec!["e", "m"]);

    // Parsing the same file again is a no-op.
    ctx.parse_file(dir.path().join("main.rvs")).unwrap();
    assert_eq!(ctx.len(), 2);
}

#[test]
fn test_parse_file_via_search_path() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.rvs"), "a = 1;").unwrap();

    let mut ctx = Context::new();
    ctx.search_path(dir.path()).unwrap();
    ctx.parse_file("a.rvs").unwrap();
    assert_eq!(names(&ctx), vec!["a"]);
}

#[test]
fn test_parse_file_missing() {
    let mut ctx = memory_context(MemoryLoader::new());
    assert_eq!(
        ctx.parse_file("nope.rvs"),
        Err(Error::FileNotFound(PathBuf::from("nope.rvs")))
    );
}
