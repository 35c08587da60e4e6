//! Top-level CLI specs
//!
//! Help, version, completions and argument errors.

use crate::prelude::*;
use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("nbr")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("evaluate"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("patch"))
        .stdout(predicate::str::contains("zip"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag_prints_version() {
    Command::cargo_bin("nbr")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("nbr "));
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("nbr")
        .unwrap()
        .arg("explode")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn completions_name_the_binary() {
    let temp = Project::empty();
    temp.nbr()
        .args(["completions", "bash"])
        .passes()
        .stdout_has("_nbr");
}

#[test]
fn explicit_config_must_exist() {
    let temp = Project::empty();
    temp.nbr()
        .args(["--config", "missing.toml", "zip", "src", "out.zip"])
        .fails()
        .stderr_has("missing.toml");
}

#[test]
fn invalid_config_is_reported() {
    let temp = Project::empty();
    temp.file(".config/nbr/config.toml", "unknown_key = 1\n");
    temp.file("src/a.txt", "a");
    temp.nbr()
        .args(["zip", "src", "out.zip"])
        .fails()
        .stderr_has("invalid config");
}
