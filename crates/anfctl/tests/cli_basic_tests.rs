use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to create a test command isolated from the caller's environment
fn anfctl() -> Command {
    let mut cmd = Command::cargo_bin("anfctl").unwrap();
    cmd.env_remove("ANFCTL_CONFIG")
        .env_remove("AZURE_ACCESS_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_flag() {
    anfctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pool-change"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("config-path"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_version_flag() {
    anfctl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("anfctl"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_args_shows_usage() {
    anfctl()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_run_help_lists_poll_flags() {
    anfctl()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-attempts"))
        .stdout(predicate::str::contains("--interval"))
        .stdout(predicate::str::contains("--cleanup"));
}

#[test]
fn test_config_path_honours_explicit_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");

    anfctl()
        .arg("--config")
        .arg(&path)
        .arg("config-path")
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_path_reads_env_var() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("from-env.toml");

    anfctl()
        .env("ANFCTL_CONFIG", &path)
        .arg("config-path")
        .assert()
        .success()
        .stdout(predicate::str::contains("from-env.toml"));
}

#[test]
fn test_init_writes_template_and_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("anfctl").join("config.toml");

    anfctl()
        .arg("--config")
        .arg(&path)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Config template written"));

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("[primary_pool]"));
    assert!(raw.contains("[secondary_pool]"));

    anfctl()
        .arg("--config")
        .arg(&path)
        .arg("init")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));

    anfctl()
        .arg("--config")
        .arg(&path)
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_run_without_config_fails_with_hint() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.toml");

    anfctl()
        .arg("--config")
        .arg(&path)
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("anfctl init"));
}

#[test]
fn test_run_with_unfilled_template_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
subscription_id = ""
resource_group = "rg"
subnet_id = "subnet"
"#,
    )
    .unwrap();

    anfctl()
        .arg("--config")
        .arg(&path)
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("subscription_id"));
}

#[test]
fn test_run_with_fresh_template_reports_placeholder() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    anfctl()
        .arg("--config")
        .arg(&path)
        .arg("init")
        .assert()
        .success();

    anfctl()
        .arg("--config")
        .arg(&path)
        .arg("run")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("placeholder"));
}
