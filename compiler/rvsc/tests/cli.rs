//! Command behavior against real files on disk.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rvsc::commands::{check_files, emit_error, run_files, Options, DEFAULT_COUNT};
use rvsc::Error;
use rvs_diagnostic::emitter::{ColorMode, TerminalEmitter};

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

fn run(options: &Options) -> Result<String, Error> {
    let mut out = Vec::new();
    run_files(options, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn options_for(files: &[&Path], extra: &[&str]) -> Options {
    let mut list = args(extra);
    list.extend(files.iter().map(|p| p.display().to_string()));
    Options::default().apply_args(&list).unwrap()
}

#[test]
fn test_apply_args() {
    let options = Options::default()
        .apply_args(&args(&[
            "--seed=0x10",
            "--count=4",
            "--id=a",
            "--id=b",
            "-x",
            "--color=never",
            "main.rvs",
        ]))
        .unwrap();
    assert_eq!(options.seed, 16);
    assert_eq!(options.count, 4);
    assert_eq!(options.ids, vec!["a".to_string(), "b".to_string()]);
    assert!(options.hex);
    assert_eq!(options.color, ColorMode::Never);
    assert_eq!(options.files, vec![PathBuf::from("main.rvs")]);
}

#[test]
fn test_apply_args_defaults_and_errors() {
    let options = Options::default().apply_args(&[]).unwrap();
    assert_eq!(options.count, DEFAULT_COUNT);
    assert_eq!(options.seed, 0);

    assert!(Options::default().apply_args(&args(&["--seed=x"])).is_err());
    assert!(Options::default()
        .apply_args(&args(&["--seed=4294967296"]))
        .is_err());
    assert!(Options::default().apply_args(&args(&["--bogus"])).is_err());
    assert!(Options::default().apply_args(&args(&["--color=rainbow"])).is_err());
}

#[test]
fn test_search_path_option_accumulates() {
    let joined = std::env::join_paths(["lib", "vendor"]).unwrap();
    let options = Options::default()
        .apply_args(&[
            format!("--search-path={}", joined.to_string_lossy()),
            "--search-path=more".to_string(),
        ])
        .unwrap();
    assert_eq!(
        options.search_path.paths(),
        &[
            PathBuf::from("lib"),
            PathBuf::from("vendor"),
            PathBuf::from("more")
        ]
    );
}

#[test]
fn test_search_path_option_comes_before_env_entries() {
    let mut base = Options::default();
    base.search_path.push("from_env");
    let options = base
        .apply_args(&args(&["--search-path=from_cli"]))
        .unwrap();
    assert_eq!(
        options.search_path.paths(),
        &[PathBuf::from("from_cli"), PathBuf::from("from_env")]
    );
}

#[test]
fn test_run_prints_every_identifier() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(dir.path(), "main.rvs", "a = 1:3;\nb = 0:99;\nz = (1, 2)*;\n");

    let text = run(&options_for(&[&main], &["--count=4"])).unwrap();
    assert_eq!(
        text,
        "a: 1, 2, 3 <done>\n\
         b: 0, 1, 2, 3, ...\n\
         z: 1, 2 <done>\n"
    );
}

#[test]
fn test_run_selected_ids_in_hex() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(dir.path(), "main.rvs", "a = 1:3;\nb = 0xfe, 0xff;\n");

    let text = run(&options_for(&[&main], &["--id=b", "--hex"])).unwrap();
    assert_eq!(text, "b: 0xfe, 0xff <done>\n");

    let err = run(&options_for(&[&main], &["--id=nope"])).unwrap_err();
    assert_eq!(err, Error::UndefinedReference("nope".to_string()));
}

#[test]
fn test_run_resolves_imports_relative_to_file() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "lib/common.rvs", "base = 10, 20;\n");
    write(dir.path(), "lib/derived.rvs", "import \"common.rvs\";\nboth = (base, 30)+;\n");
    let main = write(
        dir.path(),
        "main.rvs",
        "import \"lib/derived.rvs\";\nimport \"lib/common.rvs\";\ntop = both;\n",
    );

    let text = run(&options_for(&[&main], &[])).unwrap();
    assert_eq!(
        text,
        "base: 10, 20 <done>\n\
         both: 10, 20, 30 <done>\n\
         top: 10, 20, 30 <done>\n"
    );
}

#[test]
fn test_run_uses_search_path() {
    let dir = tempfile::tempdir().unwrap();
    let shared = dir.path().join("shared");
    write(&shared, "widths.rvs", "width = 8, 16, 32;\n");
    let main = write(dir.path(), "src/main.rvs", "import \"widths.rvs\";\nw = Sample(width, 5);\n");

    let missing = run(&options_for(&[&main], &[])).unwrap_err();
    assert!(matches!(missing, Error::FileNotFound(_)), "{missing:?}");

    let search = format!("--search-path={}", shared.display());
    let text = run(&options_for(&[&main], &[&search, "--id=w"])).unwrap();
    let values: Vec<u32> = text
        .trim_start_matches("w: ")
        .trim_end_matches(" <done>\n")
        .split(", ")
        .map(|v| v.trim_end_matches(" <done>").parse().unwrap())
        .collect();
    assert_eq!(values.len(), 5);
    assert!(values.iter().all(|v| [8, 16, 32].contains(v)));
}

#[test]
fn test_seed_option_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(dir.path(), "main.rvs", "s = Shuffle(0:31);\n");

    let a = run(&options_for(&[&main], &["--seed=7", "--count=32"])).unwrap();
    let b = run(&options_for(&[&main], &["--seed=7", "--count=32"])).unwrap();
    let c = run(&options_for(&[&main], &["--seed=8", "--count=32"])).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_check_summary() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "lib.rvs", "l = 0:9;\n");
    let main = write(dir.path(), "main.rvs", "import \"lib.rvs\";\nm = (l, 1)*;\n");

    let mut out = Vec::new();
    check_files(&options_for(&[&main], &[]), &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "OK: 2 sequences, 30 values, 2 files\n"
    );
}

#[test]
fn test_parse_error_in_import_renders_file_snippet() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "bad.rvs", "ok = 1;\nbroken = (1, 2;\n");
    let main = write(dir.path(), "main.rvs", "import \"bad.rvs\";\n");

    let err = run(&options_for(&[&main], &[])).unwrap_err();
    let Error::Parse { file: Some(file), .. } = &err else {
        panic!("expected a parse error naming a file, got {err:?}");
    };
    assert!(file.ends_with("bad.rvs"));

    let mut rendered = Vec::new();
    {
        let mut emitter = TerminalEmitter::with_color_mode(&mut rendered, ColorMode::Never, false);
        emit_error(&mut emitter, &err, None);
    }
    let rendered = String::from_utf8(rendered).unwrap();
    assert!(rendered.starts_with("error[E0001]"), "{rendered}");
    assert!(rendered.contains("2 | broken = (1, 2;"), "{rendered}");
}

#[test]
fn test_duplicate_across_files() {
    let dir = tempfile::tempdir().unwrap();
    let first = write(dir.path(), "a.rvs", "x = 1;\n");
    let second = write(dir.path(), "b.rvs", "x = 2;\n");

    let err = run(&options_for(&[&first, &second], &[])).unwrap_err();
    assert_eq!(err, Error::DuplicateIdentifier("x".to_string()));
}
