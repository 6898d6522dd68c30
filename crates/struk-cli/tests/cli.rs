//! End-to-end tests for the struk binary.
//!
//! Only the offline commands are exercised here; `scan` needs model
//! files or a reachable AI backend.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn struk() -> Command {
    Command::cargo_bin("struk").unwrap()
}

#[test]
fn test_help() {
    struk()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_parse_receipt_text() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "INDOMARET CILANDAK").unwrap();
    writeln!(file, "12/05/24").unwrap();
    writeln!(file, "Indomie Goreng 3 x 3.500").unwrap();
    writeln!(file, "Grand Total: Rp 24.000").unwrap();
    file.flush().unwrap();

    struk()
        .arg("parse")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"store_name\": \"INDOMARET CILANDAK\""))
        .stdout(predicate::str::contains("\"date\": \"2024-05-12\""))
        .stdout(predicate::str::contains("\"total\": 24000"))
        .stdout(predicate::str::contains("Indomie Goreng"));
}

#[test]
fn test_parse_text_format() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "TOKO MAJU").unwrap();
    writeln!(file, "Total: Rp 15.000").unwrap();
    file.flush().unwrap();

    struk()
        .arg("parse")
        .arg(file.path())
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Store: TOKO MAJU"))
        .stdout(predicate::str::contains("Total: Rp 15.000"));
}

#[test]
fn test_parse_missing_input() {
    struk()
        .arg("parse")
        .arg("/no/such/file.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_config_show_defaults() {
    struk()
        .arg("config")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("gemini-2.5-flash"));
}

#[test]
fn test_config_init_and_path() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.json");

    struk()
        .args(["config", "init", "--output"])
        .arg(&config_path)
        .assert()
        .success();

    assert!(config_path.exists());

    // A second init without --force must refuse to overwrite.
    struk()
        .args(["config", "init", "--output"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_scan_missing_input() {
    struk()
        .arg("scan")
        .arg("/no/such/receipt.jpg")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
