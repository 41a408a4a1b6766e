//! End-to-end tests for the `lockbox` binary.
//!
//! These avoid `init`: it needs the OS keyring, which test machines may
//! not have.  Everything here runs before the seed is ever read.

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;

const SALT: &str = "0123456789abcdef0123456789abcdef";

fn lockbox() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("lockbox").expect("binary should exist");
    cmd.env_remove("LOCKBOX_HOME")
        .env_remove("LOCKBOX_PASSWORD")
        .env_remove("LOCKBOX_SECRET_KEY");
    cmd
}

// ---------------------------------------------------------------------------
// Help / version
// ---------------------------------------------------------------------------

#[test]
fn help_lists_commands() {
    lockbox()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("migrate"));
}

#[test]
fn version_flag() {
    lockbox()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lockbox"));
}

#[test]
fn no_args_shows_usage() {
    lockbox()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

#[test]
fn bare_generate_needs_no_vault() {
    let output = lockbox()
        .args(["generate", "--length", "20", "--no-special"])
        .output()
        .expect("run lockbox");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let password = stdout.trim();
    assert_eq!(password.chars().count(), 20);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn generate_rejects_tiny_length() {
    lockbox()
        .args(["generate", "--length", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 4 and 256"));
}

// ---------------------------------------------------------------------------
// Setup errors
// ---------------------------------------------------------------------------

#[test]
fn list_before_init_points_at_init() {
    let dir = TempDir::new().expect("tempdir");
    lockbox()
        .arg("--data-dir")
        .arg(dir.path())
        .env("LOCKBOX_SECRET_KEY", SALT)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("lockbox init"));
}

#[test]
fn missing_salt_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    lockbox()
        .arg("--data-dir")
        .arg(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Salt misconfigured"));
}

#[test]
fn short_salt_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    lockbox()
        .arg("--data-dir")
        .arg(dir.path())
        .env("LOCKBOX_SECRET_KEY", "too-short")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Salt misconfigured"));
}

#[test]
fn data_dir_can_come_from_env() {
    let dir = TempDir::new().expect("tempdir");
    lockbox()
        .env("LOCKBOX_HOME", dir.path())
        .env("LOCKBOX_SECRET_KEY", SALT)
        .arg("search")
        .arg("git")
        .assert()
        .failure()
        .stderr(predicate::str::contains("lockbox init"));
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

#[test]
fn bash_completions() {
    lockbox()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lockbox"));
}

#[test]
fn unknown_shell_fails() {
    lockbox()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown shell"));
}

#[test]
fn audit_on_fresh_dir_is_empty() {
    let dir = TempDir::new().expect("tempdir");
    lockbox()
        .arg("--data-dir")
        .arg(dir.path())
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit entries"));
}
