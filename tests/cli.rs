//! Smoke tests for the `anyconvert` binary.
//!
//! Run with:
//!   cargo test --test cli

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

fn anyconvert() -> Command {
    let mut cmd = Command::cargo_bin("anyconvert").unwrap();
    cmd.arg("--no-progress").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_exit_choice() {
    anyconvert()
        .write_stdin("5\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Convert PDF to DOCX"))
        .stdout(predicate::str::contains("Exiting the tool. Goodbye!"));
}

#[test]
fn test_cli_invalid_choice_reprompts() {
    let assert = anyconvert().write_stdin("6\n5\n").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.matches("Invalid choice! Please try again.").count(), 1);
    assert!(stdout.contains("Goodbye"));
}

#[test]
fn test_cli_closed_stdin_exits() {
    anyconvert()
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Goodbye"));
}

#[test]
fn test_cli_converts_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let jpeg = dir.path().join("scan.jpeg");
    common::write_jpeg_with_exif(&jpeg, &common::gradient(6, 6));
    let jpg = dir.path().join("scan.jpg");

    anyconvert()
        .args(["--jpeg-quality", "90"])
        .write_stdin(format!("4\n{}\n{}\n5\n", jpeg.display(), jpg.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("JPEG successfully converted to JPG"));

    let bytes = std::fs::read(&jpg).unwrap();
    assert!(!common::contains(&bytes, b"Exif"));
}

#[test]
fn test_cli_missing_file_message() {
    anyconvert()
        .write_stdin("2\n/no/such/file.docx\n5\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "File not found! Please check the path.",
        ));
}

#[test]
fn test_cli_help_lists_menu() {
    Command::cargo_bin("anyconvert")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("MENU:"))
        .stdout(predicate::str::contains("ANYCONVERT_JPEG_QUALITY"));
}

#[test]
fn test_cli_rejects_out_of_range_quality() {
    Command::cargo_bin("anyconvert")
        .unwrap()
        .args(["--jpeg-quality", "0"])
        .write_stdin("5\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("jpeg-quality"));
}
