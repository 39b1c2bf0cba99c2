//! Integration tests for the StrippedChain CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.  Every
//! test runs inside its own temp directory so `strippedchain.toml` and the
//! data directory never leak between tests.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

/// Helper: get a Command pointing at the strippedchain binary.
fn strippedchain() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("strippedchain").expect("binary should exist")
}

/// Helper: a command rooted in `dir`, acting as `cust-1`.
fn in_dir(dir: &TempDir) -> Command {
    let mut cmd = strippedchain();
    cmd.current_dir(dir.path())
        .env_remove("STRIPPEDCHAIN_OWNER")
        .env_remove("RUST_LOG")
        .args(["--owner", "cust-1"]);
    cmd
}

#[test]
fn help_flag_shows_usage() {
    strippedchain()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tamper-evident file ledger"))
        .stdout(predicate::str::contains("ingest"))
        .stdout(predicate::str::contains("retrieve"))
        .stdout(predicate::str::contains("remove"))
        .stdout(predicate::str::contains("verify"));
}

#[test]
fn version_flag_shows_version() {
    strippedchain()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("strippedchain"));
}

#[test]
fn no_args_shows_help() {
    strippedchain()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn completions_bash_prints_script() {
    strippedchain()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("strippedchain"));
}

#[test]
fn ingest_retrieve_verify_flow() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.child("report.csv");
    input.write_str("region,total\nnorth,42\n").unwrap();

    in_dir(&tmp)
        .args(["ingest", "report.csv", "--note", "weekly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("report.csv"))
        .stdout(predicate::str::contains("Block 1 committed"));

    tmp.child("data/ledger/chain.json").assert(predicate::path::exists());

    in_dir(&tmp)
        .args(["retrieve", "report.csv"])
        .assert()
        .success()
        .stdout("region,total\nnorth,42\n");

    in_dir(&tmp)
        .arg("verify")
        .assert()
        .success()
        .stdout(predicate::str::contains("Chain intact (2 block(s))"));

    in_dir(&tmp)
        .arg("files")
        .assert()
        .success()
        .stdout(predicate::str::contains("CSV"));
}

#[test]
fn retrieve_to_output_file() {
    let tmp = TempDir::new().unwrap();
    tmp.child("a.bin").write_binary(&[0u8, 1, 2, 3, 255]).unwrap();

    in_dir(&tmp).args(["ingest", "a.bin"]).assert().success();
    in_dir(&tmp)
        .args(["retrieve", "a.bin", "-o", "out.bin"])
        .assert()
        .success();

    tmp.child("out.bin")
        .assert(predicate::path::eq_file(tmp.child("a.bin").path()));
}

#[test]
fn remove_with_force_drops_file() {
    let tmp = TempDir::new().unwrap();
    tmp.child("a.txt").write_str("hello").unwrap();

    in_dir(&tmp).args(["ingest", "a.txt"]).assert().success();
    in_dir(&tmp)
        .args(["remove", "a.txt", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 'a.txt'"));

    in_dir(&tmp)
        .args(["retrieve", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("a.txt"));

    // The chain still verifies after the vault shrinks.
    in_dir(&tmp).arg("verify").assert().success();
}

#[test]
fn tampered_chain_fails_verification() {
    let tmp = TempDir::new().unwrap();
    tmp.child("a.txt").write_str("hello").unwrap();
    in_dir(&tmp).args(["ingest", "a.txt"]).assert().success();

    let chain_path = tmp.path().join("data/ledger/chain.json");
    let json = std::fs::read_to_string(&chain_path).unwrap();
    std::fs::write(&chain_path, json.replace("\"a.txt\"", "\"b.txt\"")).unwrap();

    in_dir(&tmp)
        .arg("verify")
        .assert()
        .failure()
        .stderr(predicate::str::contains("block 1"));
}

#[test]
fn ingest_missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    in_dir(&tmp)
        .args(["ingest", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.txt"));

    tmp.child("data").assert(predicate::path::missing());
}

#[test]
fn invalid_owner_is_rejected() {
    let tmp = TempDir::new().unwrap();
    strippedchain()
        .current_dir(tmp.path())
        .args(["--owner", "bad owner", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("owner id"));
}

#[test]
fn settings_file_moves_data_dir() {
    let tmp = TempDir::new().unwrap();
    tmp.child("strippedchain.toml")
        .write_str("data_dir = \"store\"\n")
        .unwrap();
    tmp.child("a.txt").write_str("hello").unwrap();

    in_dir(&tmp).args(["ingest", "a.txt"]).assert().success();
    tmp.child("store/ledger/chain.json")
        .assert(predicate::path::exists());
}
