//! Binary-level tests. Each test gets its own data directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn frontline(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("frontline").unwrap();
    cmd.env("FRONTLINE_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_describes_the_tool() {
    let home = TempDir::new().unwrap();

    frontline(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("offline"));
}

#[test]
fn status_on_empty_queue() {
    let home = TempDir::new().unwrap();

    frontline(&home)
        .args(["sync", "status", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pending\": 0"));
}

#[test]
fn enqueued_action_persists_between_runs() {
    let home = TempDir::new().unwrap();

    frontline(&home)
        .args(["sync", "enqueue", "deleteCustomer", "--payload", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Queued Delete Customer action"));

    frontline(&home)
        .args(["sync", "list", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\": \"deleteCustomer\""))
        .stdout(predicate::str::contains("\"count\": 1"));

    assert!(home.path().join("frontline.db").exists());
}

#[test]
fn reset_requires_force_and_is_idempotent() {
    let home = TempDir::new().unwrap();

    frontline(&home)
        .args(["sync", "enqueue", "deleteBill", "--payload", "7"])
        .assert()
        .success();

    frontline(&home)
        .arg("reset")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    frontline(&home).args(["reset", "--force"]).assert().success();
    frontline(&home).args(["reset", "--force"]).assert().success();

    frontline(&home)
        .args(["sync", "list", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 0"));
}

#[test]
fn run_without_backend_fails() {
    let home = TempDir::new().unwrap();

    frontline(&home)
        .args(["sync", "run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no remote backend configured"));
}

#[test]
fn session_login_and_logout() {
    let home = TempDir::new().unwrap();

    frontline(&home)
        .args(["session", "login", "salesman", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"salesman\""));

    frontline(&home)
        .args(["session", "logout", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"isAuthenticated\": false"));
}

#[test]
fn completions_for_bash() {
    let home = TempDir::new().unwrap();

    frontline(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("frontline"));
}
