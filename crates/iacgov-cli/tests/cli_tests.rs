// SPDX-License-Identifier: MIT OR Apache-2.0
//! Integration tests for the `iac-gov-host` binary's argument parsing.

use assert_cmd::Command;
use predicates::str::contains;

fn iac_gov_host() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("iac-gov-host").expect("binary `iac-gov-host` should be built")
}

#[test]
fn help_flag_prints_usage() {
    iac_gov_host()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Infrastructure-as-Code governance agent host"))
        .stdout(contains("--transport"));
}

#[test]
fn version_flag_prints_version() {
    iac_gov_host()
        .arg("--version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn rejects_unknown_transport_value() {
    iac_gov_host()
        .args(["--transport", "carrier-pigeon"])
        .assert()
        .failure()
        .stderr(contains("invalid value"));
}
