//! Context tests: atomic parse calls, duplicates and settings.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::PathBuf;

use crate::{Context, SearchPath, DEFAULT_EXPANSION_LIMIT};
use pretty_assertions::assert_eq;
use rvs_diagnostic::{Error, ErrorKind};

fn names(ctx: &Context) -> Vec<&str> {
    ctx.statements().iter().map(|s| s.name.as_str()).collect()
}

#[test]
fn test_parse_calls_accumulate_in_order() {
    let mut ctx = Context::new();
    ctx.parse("a = 1; b = 2;").unwrap();
    ctx.parse("c = a;").unwrap();
    assert_eq!(names(&ctx), vec!["a", "b", "c"]);
    assert_eq!(ctx.index_of("c"), Some(2));
}

#[test]
fn test_duplicate_in_same_call() {
    let mut ctx = Context::new();
    assert_eq!(
        ctx.parse("a=1;a=2;"),
        Err(Error::DuplicateIdentifier("a".to_string()))
    );
    assert!(ctx.is_empty());
}

#[test]
fn test_duplicate_across_calls() {
    let mut ctx = Context::new();
    ctx.parse("a = 1;").unwrap();
    let err = ctx.parse("b = 2; a = 3;").unwrap_err();
    assert_eq!(err, Error::DuplicateIdentifier("a".to_string()));

    // `b` from the failed call was not committed.
    assert_eq!(names(&ctx), vec!["a"]);
    assert!(ctx.lookup("b").is_none());
}

#[test]
fn test_enum_shares_statement_namespace() {
    let mut ctx = Context::new();
    assert_eq!(
        ctx.parse("enum a { X } a = 1;"),
        Err(Error::DuplicateIdentifier("a".to_string()))
    );
    ctx.parse("enum E { X }").unwrap();
    assert_eq!(
        ctx.parse("E = 2;"),
        Err(Error::DuplicateIdentifier("E".to_string()))
    );
    assert_eq!(
        ctx.parse("enum E { Y }"),
        Err(Error::DuplicateIdentifier("E".to_string()))
    );
    assert_eq!(ctx.constant("E::X"), Some(0));
    assert_eq!(ctx.constant("E::Y"), None);
}

#[test]
fn test_failed_parse_drops_enum_constants() {
    let mut ctx = Context::new();
    assert!(ctx.parse("enum E { X = 3 } b = ;").is_err());
    assert_eq!(ctx.constant("E::X"), None);
    ctx.parse("enum E { X = 4 }").unwrap();
    assert_eq!(ctx.constant("E::X"), Some(4));
}

#[test]
fn test_failed_parse_leaves_context_untouched() {
    let mut ctx = Context::new();
    ctx.parse("a = 1, 2, 3;").unwrap();
    let exprs_before = ctx.arena().expr_count();

    let err = ctx.parse("b = 4; c = ;").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(names(&ctx), vec!["a"]);
    assert_eq!(ctx.arena().expr_count(), exprs_before);

    // The same context accepts corrected input afterwards.
    ctx.parse("b = 4; c = 5;").unwrap();
    assert_eq!(names(&ctx), vec!["a", "b", "c"]);
}

#[test]
fn test_forward_references_are_not_checked_by_parse() {
    let mut ctx = Context::new();
    ctx.parse("a = later;").unwrap();
    assert_eq!(ctx.len(), 1);
}

#[test]
fn test_seed_defaults_to_zero_and_can_be_overwritten() {
    let mut ctx = Context::new();
    assert_eq!(ctx.seed_value(), 0);
    ctx.seed(42);
    assert_eq!(ctx.seed_value(), 42);
    assert_eq!(Context::new().with_seed(7).seed_value(), 7);
}

#[test]
fn test_search_path_appends_without_checking() {
    let mut ctx = Context::new().with_search_paths(["first"]);
    ctx.search_path("/does/not/exist").unwrap();
    assert_eq!(
        ctx.search_paths().paths(),
        &[PathBuf::from("first"), PathBuf::from("/does/not/exist")]
    );
}

#[test]
fn test_expansion_limit_builder() {
    assert_eq!(Context::new().expansion_limit(), DEFAULT_EXPANSION_LIMIT);
    assert_eq!(Context::new().with_expansion_limit(10).expansion_limit(), 10);
}

#[test]
fn test_default_matches_new() {
    let ctx = Context::default();
    assert!(ctx.is_empty());
    assert_eq!(ctx.search_paths(), &SearchPath::new());
    assert_eq!(ctx.imported_files().count(), 0);
}

#[test]
fn test_debug_output() {
    let mut ctx = Context::new().with_seed(3);
    ctx.parse("a = 1;").unwrap();
    let debug = format!("{ctx:?}");
    assert!(debug.contains("statements: 1"));
    assert!(debug.contains("seed: 3"));
}

#[test]
fn test_context_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Context>();
}
