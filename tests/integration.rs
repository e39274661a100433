//! Integration tests for the actionkey CLI pipeline.
//!
//! These tests write real action documents and config files to a temp
//! directory and invoke `run_to` directly, checking the exit code and the
//! rendered output.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use actionkey::cli::Args;
use actionkey::config::load_config;
use actionkey::document::ActionDocument;
use actionkey::{BuilderError, PatternBuilder};

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn args(argv: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("actionkey").chain(argv.iter().copied())).unwrap()
}

/// Run the pipeline and return (exit code, stdout).
fn run(argv: &[&str]) -> (i32, String) {
    let mut buf = Vec::new();
    let code = actionkey::run_to(&args(argv), &mut buf).unwrap();
    (code, String::from_utf8(buf).unwrap())
}

const USER_LOAD: &str = "\
names: [user, load]
params:
  - key: id
    pattern: '(\\d+)'
    value: 42
  - key: mode
    pattern: '(\\w+)'
    value: full
from_start: true
at_end: true
";

// ---------- Full pipeline tests ----------

#[test]
fn prints_matcher_and_identifier() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(dir.path(), "action.yml", USER_LOAD);

    let (code, out) = run(&[doc.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert_eq!(
        out,
        "matcher: ^user_load:(\\d+):(\\w+)$\nidentifier: user_load:42:full\n"
    );
}

#[test]
fn matcher_only_output() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(dir.path(), "action.yml", USER_LOAD);

    let (code, out) = run(&["-o", "matcher", doc.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert_eq!(out, "^user_load:(\\d+):(\\w+)$\n");
}

#[test]
fn json_output() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(dir.path(), "action.yml", USER_LOAD);

    let (code, out) = run(&["--format", "json", doc.to_str().unwrap()]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(parsed["matcher"], "^user_load:(\\d+):(\\w+)$");
    assert_eq!(parsed["identifier"], "user_load:42:full");
}

#[test]
fn unbound_param_in_both_mode_is_reported() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(
        dir.path(),
        "action.json",
        r#"{"names": ["ping"], "params": [{"key": "id", "pattern": "(\\d+)"}]}"#,
    );

    let (code, out) = run(&["-f", "json", doc.to_str().unwrap()]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(parsed["matcher"], "ping:(\\d+)");
    assert!(parsed["identifier"].is_null());
    assert_eq!(parsed["missing_param"], "id");
}

#[test]
fn unbound_param_in_identifier_mode_fails() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(
        dir.path(),
        "action.yml",
        "names: [ping]\nparams:\n  - key: id\n    pattern: '(\\d+)'\n",
    );

    let (code, out) = run(&["-o", "identifier", doc.to_str().unwrap()]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
}

#[test]
fn invalid_document_exits_2() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(dir.path(), "action.yml", "names: [12345]\n");

    let (code, out) = run(&[doc.to_str().unwrap()]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
}

#[test]
fn malformed_pattern_exits_2() {
    let dir = TempDir::new().unwrap();
    let doc = write_file(
        dir.path(),
        "action.yml",
        "names: [a]\nparams:\n  - key: p\n    pattern: '('\n",
    );

    let (code, _) = run(&["-o", "matcher", doc.to_str().unwrap()]);
    assert_eq!(code, 2);
}

#[test]
fn missing_document_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.yml");
    let mut buf = Vec::new();
    assert!(actionkey::run_to(&args(&[missing.to_str().unwrap()]), &mut buf).is_err());
    assert!(actionkey::run_to(&args(&[]), &mut buf).is_err());
}

// ---------- Config tests ----------

#[test]
fn config_file_sets_separators() {
    let dir = TempDir::new().unwrap();
    let config = write_file(
        dir.path(),
        ".actionkey.yml",
        "name_separator: '.'\nparam_separator: '/'\n",
    );
    let doc = write_file(dir.path(), "action.yml", USER_LOAD);

    let (code, out) = run(&[
        "--config",
        config.to_str().unwrap(),
        doc.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert_eq!(
        out,
        "matcher: ^user.load/(\\d+)/(\\w+)$\nidentifier: user.load/42/full\n"
    );
}

#[test]
fn cli_flags_override_config() {
    let dir = TempDir::new().unwrap();
    let config = write_file(dir.path(), ".actionkey.yml", "name_separator: '.'\n");
    let doc = write_file(dir.path(), "action.yml", USER_LOAD);

    let (code, out) = run(&[
        "--config",
        config.to_str().unwrap(),
        "--name-separator",
        "-",
        "-o",
        "identifier",
        doc.to_str().unwrap(),
    ]);
    assert_eq!(code, 0);
    assert_eq!(out, "user-load:42:full\n");
}

#[test]
fn bad_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config = write_file(dir.path(), ".actionkey.yml", "param_order_offset: many\n");
    let doc = write_file(dir.path(), "action.yml", USER_LOAD);

    let mut buf = Vec::new();
    let err = actionkey::run_to(
        &args(&["--config", config.to_str().unwrap(), doc.to_str().unwrap()]),
        &mut buf,
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("failed to parse"));
}

// ---------- Library round trips ----------

#[test]
fn document_and_builder_agree() {
    let dir = TempDir::new().unwrap();
    let config = write_file(dir.path(), ".actionkey.yml", "param_order_offset: 0\n");
    let options = load_config(Some(&config)).unwrap().into_options();

    let doc = ActionDocument::parse(USER_LOAD).unwrap();
    let from_doc = doc.apply(&PatternBuilder::new(options.clone())).unwrap();
    let by_hand = PatternBuilder::new(options)
        .from_start()
        .with_name("user")
        .with_name("load")
        .with_param("id", r"(\d+)")
        .with_param("mode", r"(\w+)")
        .at_end()
        .with_param_value("id", 42)
        .unwrap()
        .with_param_value("mode", "full")
        .unwrap();

    assert_eq!(from_doc.matcher_source(), by_hand.matcher_source());
    assert_eq!(
        from_doc.to_identifier().unwrap(),
        by_hand.to_identifier().unwrap()
    );
    assert_eq!(from_doc.param_order("id").unwrap(), 0);
    assert_eq!(from_doc.param_order("mode").unwrap(), 1);
}

#[test]
fn matcher_routes_identifiers() {
    let route = PatternBuilder::default()
        .from_start()
        .with_name("user")
        .with_param("id", r"(\d+)")
        .at_end();
    let re = route.to_matcher().unwrap();

    let key = route.with_param_value("id", 7).unwrap().to_identifier().unwrap();
    assert_eq!(&re.captures(&key).unwrap()[1], "7");
    assert!(!re.is_match("user:abc"));

    let err = route.with_param_value("missing", 1).unwrap_err();
    assert!(matches!(err, BuilderError::UnknownParam(_)));
}
