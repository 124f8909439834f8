//! Tests for error handling, suggestions, and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn draftloom(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("draftloom").unwrap();
    cmd.env("DRAFTLOOM_STORAGE__DRAFTS_DIR", home.path().join("drafts"))
        .env("DRAFTLOOM_STORAGE__OUTPUT_DIR", home.path().join("out"))
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn unknown_draft_exits_not_found() {
    let home = TempDir::new().unwrap();
    draftloom(&home)
        .args(["show", "nope"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("nope"))
        .stderr(predicate::str::contains("Suggestions:"));
}

#[test]
fn unknown_toolkit_exits_not_found() {
    let home = TempDir::new().unwrap();
    draftloom(&home)
        .args(["new", "NoSuchToolkit", "--name", "x"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("NoSuchToolkit"));
}

#[test]
fn duplicate_draft_name_is_a_user_error() {
    let home = TempDir::new().unwrap();
    draftloom(&home)
        .args(["new", "WebService", "--name", "billing"])
        .assert()
        .success();
    draftloom(&home)
        .args(["new", "WebService", "--name", "billing"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("billing"));
}

#[test]
fn malformed_assignment_is_rejected_with_hint() {
    let home = TempDir::new().unwrap();
    draftloom(&home)
        .args(["new", "WebService", "--name", "billing"])
        .assert()
        .success();
    draftloom(&home)
        .args(["set", "billing", "Name billing"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("NAME=VALUE"));
}

#[test]
fn unknown_property_surfaces_domain_error() {
    let home = TempDir::new().unwrap();
    draftloom(&home)
        .args(["new", "WebService", "--name", "billing"])
        .assert()
        .success();
    draftloom(&home)
        .args(["set", "billing", "Nope=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nope"));
}

#[test]
fn bad_path_expression_is_not_found() {
    let home = TempDir::new().unwrap();
    draftloom(&home)
        .args(["new", "WebService", "--name", "billing"])
        .assert()
        .success();
    draftloom(&home)
        .args(["add", "billing", "{WebService.DoesNotExist}"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("DoesNotExist"));
}

#[test]
fn invalid_draft_name_is_rejected() {
    let home = TempDir::new().unwrap();
    draftloom(&home)
        .args(["new", "WebService", "--name", ".hidden"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid input"));
}

#[test]
fn missing_subcommand_prints_help() {
    let home = TempDir::new().unwrap();
    draftloom(&home)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}
