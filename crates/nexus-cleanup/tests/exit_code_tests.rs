//! Exit code contract of the nexus-cleanup binary
//!
//! Only paths that stop before any network call are exercised here.

use assert_cmd::Command;
use predicates::prelude::*;

fn nexus_cleanup() -> Command {
    let mut cmd = Command::cargo_bin("nexus-cleanup").unwrap();
    cmd.env_remove("NEXUS_HOST")
        .env_remove("NEXUS_USERNAME")
        .env_remove("NEXUS_PASSWORD");
    cmd
}

#[test]
fn test_non_numeric_keep_exits_with_2() {
    nexus_cleanup()
        .args(["-r", "maven-releases", "-k", "three"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid keep"));
}

#[test]
fn test_bad_host_exits_with_2() {
    nexus_cleanup()
        .args(["-r", "maven-releases", "-k", "3", "--host", "not a url", "-q"])
        .assert()
        .code(2);
}

#[test]
fn test_missing_settings_file_fails() {
    nexus_cleanup()
        .args(["-r", "maven-releases", "-k", "3"])
        .args(["--config", "/nonexistent/cleanup.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load settings"));
}

#[test]
fn test_missing_required_flag_is_a_usage_error() {
    nexus_cleanup()
        .args(["-k", "3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--repository"));
}
