use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("perspectiq")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("sessions"))
        .stdout(predicate::str::contains("personas"))
        .stdout(predicate::str::contains("health"))
        .stdout(predicate::str::contains("--api-url"));
}

#[test]
fn test_sessions_help_shows_subcommands() {
    cargo_bin_cmd!("perspectiq")
        .args(["sessions", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn test_login_requires_username_and_role() {
    cargo_bin_cmd!("perspectiq")
        .args(["login", "--username", "alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--role"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("perspectiq")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
