use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

mod common;
use common::{destination, events_file};

#[test]
fn test_cli_end_to_end() {
    let u1 = destination("u1");
    let u2 = destination("u2");
    let file = events_file(&[
        ("payment", u1.as_str(), "60"),
        ("payment", u1.as_str(), "50"),
        ("payment", u2.as_str(), "5"),
        ("spend", "u1", "100"),
    ]);

    let mut cmd = Command::new(cargo_bin!("monetizer"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("payer,balance"))
        .stdout(predicate::str::contains("u1,10"))
        .stdout(predicate::str::contains("u2,5"));
}

#[test]
fn test_insufficient_spend_is_reported_and_skipped() {
    let u1 = destination("u1");
    let file = events_file(&[
        ("payment", u1.as_str(), "10"),
        ("spend", "u1", "50"),
        ("spend", "u1", "10"),
    ]);

    let mut cmd = Command::new(cargo_bin!("monetizer"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("insufficient balance"))
        .stdout(predicate::str::contains("u1,0"));
}

#[test]
fn test_spend_without_credit() {
    let file = events_file(&[("spend", "ghost", "1")]);

    let mut cmd = Command::new(cargo_bin!("monetizer"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("insufficient balance"))
        .stdout(predicate::str::contains("ghost").not());
}

#[test]
fn test_malformed_rows_are_skipped() {
    let u1 = destination("u1");
    let file = events_file(&[
        ("payment", u1.as_str(), "1"),
        ("refund", "u1", "1"),
        ("payment", "nowhere", "5"),
        ("payment", u1.as_str(), "-3"),
        ("payment", u1.as_str(), "2"),
    ]);

    let mut cmd = Command::new(cargo_bin!("monetizer"));
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading event"))
        .stderr(predicate::str::contains("malformed payment notification"))
        .stderr(predicate::str::contains("invalid amount"))
        .stdout(predicate::str::contains("u1,3"));
}

#[test]
fn test_max_balance_flag() {
    let u1 = destination("u1");
    let file = events_file(&[("payment", u1.as_str(), "500"), ("payment", u1.as_str(), "500")]);

    let mut cmd = Command::new(cargo_bin!("monetizer"));
    cmd.arg(file.path()).arg("--max-balance").arg("300");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("u1,300"));
}

#[test]
fn test_config_file() {
    let u1 = destination("u1");
    let file = events_file(&[("payment", u1.as_str(), "500")]);

    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "max_balance = 120").unwrap();
    config.flush().unwrap();

    let mut cmd = Command::new(cargo_bin!("monetizer"));
    cmd.arg(file.path()).arg("--config").arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("u1,120"));
}

#[test]
fn test_invalid_config_fails() {
    let file = events_file(&[]);

    let mut config = NamedTempFile::new().unwrap();
    writeln!(config, "receiver_endpoint_pattern = \"/no-placeholder\"").unwrap();
    config.flush().unwrap();

    let mut cmd = Command::new(cargo_bin!("monetizer"));
    cmd.arg(file.path()).arg("--config").arg(config.path());

    cmd.assert().failure();
}

#[test]
fn test_missing_input_fails() {
    let mut cmd = Command::new(cargo_bin!("monetizer"));
    cmd.arg("does/not/exist.csv");

    cmd.assert().failure();
}
