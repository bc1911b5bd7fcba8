//! End-to-end CLI tests using `assert_cmd`.
#![cfg_attr(
    test,
    allow(
        dead_code,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::missing_errors_doc,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::tests_outside_test_module,
        reason = "Test allows"
    )
)]

use std::fs::{create_dir_all, read_to_string, write};
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to get cargo binary or fail test
fn cargo_bin() -> Command {
    Command::cargo_bin("dirhop").unwrap_or_else(|err| panic!("Binary not found: {err}"))
}

/// Helper to create temp dir or fail test
fn temp_dir() -> TempDir {
    TempDir::new().unwrap_or_else(|err| panic!("Failed to create temp dir: {err}"))
}

/// A command wired to an isolated database and config under `home`.
fn isolated(home: &Path) -> Command {
    let mut command = cargo_bin();
    command
        .env("DIRHOP_DATABASE", home.join("database"))
        .env("DIRHOP_CONFIG", home.join("config.toml"))
        .env_remove("RUST_LOG");
    command
}

#[test]
fn test_cli_help() {
    cargo_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_search_prints_best_match_and_exits_zero() {
    let home = temp_dir();
    let visited = home.path().join("projects");
    create_dir_all(&visited).unwrap();
    write(
        home.path().join("database"),
        format!("5 {}\n", visited.display()),
    )
    .unwrap();

    isolated(home.path())
        .current_dir(home.path())
        .args(["search", "proj"])
        .assert()
        .success()
        .stdout(predicate::str::contains("projects"));
}

#[test]
fn test_search_without_match_exits_one() {
    let home = temp_dir();

    isolated(home.path())
        .current_dir(home.path())
        .args(["search", "no_such_fragment"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_search_all_reports_every_match() {
    let home = temp_dir();
    let first = home.path().join("work/alpha_code");
    let second = home.path().join("work/beta_code");
    create_dir_all(&first).unwrap();
    create_dir_all(&second).unwrap();
    write(
        home.path().join("database"),
        format!("5 {}\n3 {}\n", first.display(), second.display()),
    )
    .unwrap();

    isolated(home.path())
        .current_dir(home.path())
        .args(["search", "--all", "code"])
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha_code").and(predicate::str::contains("beta_code")));
}

#[test]
fn test_add_then_list_round_trip() {
    let home = temp_dir();
    let visited = home.path().join("somewhere");
    create_dir_all(&visited).unwrap();

    isolated(home.path())
        .args(["add", &visited.display().to_string()])
        .assert()
        .success();
    isolated(home.path())
        .args(["add", &visited.display().to_string()])
        .assert()
        .success();

    isolated(home.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("2\t"));
}

#[test]
fn test_add_rejects_missing_directory() {
    let home = temp_dir();

    isolated(home.path())
        .args(["add", "/no/such/directory"])
        .assert()
        .code(2);
}

#[test]
fn test_add_skips_blacklisted_directory() {
    let home = temp_dir();
    let visited = home.path().join("scratch");
    create_dir_all(&visited).unwrap();
    write(
        home.path().join("config.toml"),
        format!("black_listed_directories = [\"{}*\"]\n", home.path().display()),
    )
    .unwrap();

    isolated(home.path())
        .args(["add", &visited.display().to_string()])
        .assert()
        .success();

    assert!(
        !home.path().join("database").exists()
            || read_to_string(home.path().join("database")).unwrap().is_empty()
    );
}

#[test]
fn test_remove_and_clear() {
    let home = temp_dir();
    let kept = home.path().join("kept");
    let dropped = home.path().join("dropped");
    create_dir_all(&kept).unwrap();
    create_dir_all(&dropped).unwrap();
    write(
        home.path().join("database"),
        format!("4 {}\n2 {}\n", kept.display(), dropped.display()),
    )
    .unwrap();

    isolated(home.path())
        .args(["remove", &dropped.display().to_string()])
        .assert()
        .success();
    let text = read_to_string(home.path().join("database")).unwrap();
    assert!(text.contains("kept"));
    assert!(!text.contains("dropped"));

    isolated(home.path()).arg("clear").assert().success();
    let text = read_to_string(home.path().join("database")).unwrap();
    assert!(text.is_empty());
}

#[test]
fn test_bare_fragments_are_a_search() {
    let home = temp_dir();
    create_dir_all(home.path().join("direct_hit")).unwrap();

    isolated(home.path())
        .current_dir(home.path())
        .arg("direct_hit")
        .assert()
        .success()
        .stdout(predicate::str::contains("direct_hit"));
}

#[test]
fn test_filter_narrows_by_contained_file() {
    let home = temp_dir();
    let with_toml = home.path().join("has_crate_marker");
    let without = home.path().join("plain_crate_marker");
    create_dir_all(&with_toml).unwrap();
    create_dir_all(&without).unwrap();
    write(with_toml.join("Cargo.toml"), "[package]\n").unwrap();
    write(
        home.path().join("database"),
        format!("3 {}\n9 {}\n", with_toml.display(), without.display()),
    )
    .unwrap();

    isolated(home.path())
        .current_dir(home.path())
        .args(["search", "--all", "--filter", "Cargo.toml", "crate_marker"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("has_crate_marker")
                .and(predicate::str::contains("plain_crate_marker").not()),
        );
}
