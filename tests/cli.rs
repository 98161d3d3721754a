//! End-to-end tests for the yaml2script binary

#![cfg(unix)]

use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const CI: &str = r#"
variables:
  GIT_DEPTH: "1"

stages:
  - test

.base:
  before_script:
    - echo setup

pre-commit:
  script:
    - echo hi

inherited:
  extends: .base
  script:
    - echo inherited

dangling:
  extends: .missing
  script:
    - echo dangling

broken:
  script:
    - |
      if true; then
        echo never closed
"#;

fn fixture() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join(".gitlab-ci.yml");
    fs::write(&file, CI).unwrap();
    (dir, file)
}

fn yaml2script(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_yaml2script"))
        .args(args)
        .current_dir(cwd)
        .env_remove("YAML2SCRIPT_CONFIG")
        .env_remove("YAML2SCRIPT_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_extract_prints_shebang_and_script() {
    let (dir, _) = fixture();
    let output = yaml2script(dir.path(), &["extract", ".gitlab-ci.yml", "pre-commit"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "#!/usr/bin/env sh\necho hi\n");
}

#[test]
fn test_extract_with_empty_shebang_omits_first_line() {
    let (dir, _) = fixture();
    let output = yaml2script(
        dir.path(),
        &["extract", ".gitlab-ci.yml", "pre-commit", "-shebang="],
    );

    assert!(output.status.success());
    assert_eq!(stdout(&output), "echo hi\n");
}

#[test]
fn test_extract_with_custom_shebang() {
    let (dir, _) = fixture();
    let output = yaml2script(
        dir.path(),
        &[
            "extract",
            ".gitlab-ci.yml",
            "inherited",
            "--shebang",
            "#!/usr/bin/env bash",
        ],
    );

    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "#!/usr/bin/env bash\necho setup\necho inherited\n"
    );
}

#[test]
fn test_extract_warns_about_missing_extends_target() {
    let (dir, _) = fixture();
    let output = yaml2script(dir.path(), &["extract", ".gitlab-ci.yml", "dangling"]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "#!/usr/bin/env sh\necho dangling\n");
    assert!(stderr(&output).contains("job to extend not available: ignoring"));
}

#[test]
fn test_extract_missing_job_fails() {
    let (dir, _) = fixture();
    let output = yaml2script(dir.path(), &["extract", ".gitlab-ci.yml", "deploy"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Job 'deploy' not found"));
}

#[test]
fn test_extract_missing_file_fails() {
    let (dir, _) = fixture();
    let output = yaml2script(dir.path(), &["extract", "nope.yml", "pre-commit"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("nope.yml"));
}

#[test]
fn test_check_passes_well_formed_job() {
    let (dir, _) = fixture();
    let output = yaml2script(
        dir.path(),
        &[
            "check",
            ".gitlab-ci.yml",
            "pre-commit",
            "inherited",
            "-check_command",
            "sh",
            "-parameter_check_command",
            "-n",
        ],
    );

    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_check_fails_on_syntax_error() {
    let (dir, _) = fixture();
    let output = yaml2script(
        dir.path(),
        &[
            "check",
            ".gitlab-ci.yml",
            "broken",
            "pre-commit",
            "--check-command",
            "sh -n",
        ],
    );

    assert_ne!(output.status.code(), Some(0));
    assert!(!stdout(&output).is_empty());
}

#[test]
fn test_check_quiet_suppresses_checker_output() {
    let (dir, _) = fixture();
    let output = yaml2script(
        dir.path(),
        &[
            "check",
            ".gitlab-ci.yml",
            "broken",
            "--check-command",
            "sh -n",
            "-quiet",
        ],
    );

    assert_ne!(output.status.code(), Some(0));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_check_verbose_prints_steps() {
    let (dir, _) = fixture();
    let output = yaml2script(
        dir.path(),
        &[
            "check",
            ".gitlab-ci.yml",
            "pre-commit",
            "--check-command",
            "sh -n",
            "-verbose",
        ],
    );

    let out = stdout(&output);
    assert!(output.status.success());
    assert!(out.contains("extract pre-commit from .gitlab-ci.yml"));
    assert!(out.contains("run sh -n "));
    assert!(out.contains("returncode 0"));
    assert!(out.contains("returncode sum 0"));
}

#[test]
fn test_check_missing_job_is_fatal() {
    let (dir, _) = fixture();
    let output = yaml2script(
        dir.path(),
        &["check", ".gitlab-ci.yml", "deploy", "--check-command", "true"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Job 'deploy' not found"));
}

#[test]
fn test_check_json_report() {
    let (dir, _) = fixture();
    let output = yaml2script(
        dir.path(),
        &[
            "check",
            ".gitlab-ci.yml",
            "pre-commit",
            "broken",
            "--check-command",
            "sh -n",
            "--format",
            "json",
        ],
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["jobs"][0]["job"], "pre-commit");
    assert_eq!(report["jobs"][0]["exit_code"], 0);
    assert_eq!(report["jobs"][1]["job"], "broken");
    assert_ne!(report["exit_code_sum"], 0);
}

#[test]
fn test_check_timeout_kills_hung_checker() {
    let (dir, _) = fixture();
    let start = std::time::Instant::now();
    let output = yaml2script(
        dir.path(),
        &[
            "check",
            ".gitlab-ci.yml",
            "pre-commit",
            "--check-command",
            "sleep 30 & sleep 30; true",
            "--timeout",
            "1",
        ],
    );

    assert_eq!(output.status.code(), Some(124));
    assert!(start.elapsed() < std::time::Duration::from_secs(10));
}

#[test]
fn test_all_checks_non_job_top_level_keys() {
    // Known limitation: `variables:` and `stages:` are checked as if they were jobs
    let (dir, _) = fixture();
    let output = yaml2script(
        dir.path(),
        &["all", ".gitlab-ci.yml", "--check-command", "sh -n", "--verbose"],
    );

    let out = stdout(&output);
    assert!(out.contains("extract variables from .gitlab-ci.yml"));
    assert!(out.contains("extract stages from .gitlab-ci.yml"));
    assert!(out.contains("extract .base from .gitlab-ci.yml"));
    assert!(out.contains("extract pre-commit from .gitlab-ci.yml"));
    // `broken` is part of the file, so the run as a whole fails
    assert_ne!(output.status.code(), Some(0));
}

#[test]
fn test_all_passes_on_clean_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".gitlab-ci.yml"),
        "variables:\n  A: b\n\njob:\n  script:\n    - echo ok\n",
    )
    .unwrap();

    let output = yaml2script(
        dir.path(),
        &["all", ".gitlab-ci.yml", "--check-command", "sh -n"],
    );
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_version_prints_crate_version() {
    let dir = TempDir::new().unwrap();
    let output = yaml2script(dir.path(), &["version"]);

    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        format!("yaml2script version {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn test_no_arguments_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = yaml2script(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_config_file_supplies_defaults() {
    let (dir, _) = fixture();
    let config = dir.path().join("yaml2script.yml");
    fs::write(&config, "shebang: ''\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_yaml2script"))
        .args(["extract", ".gitlab-ci.yml", "pre-commit"])
        .current_dir(dir.path())
        .env("YAML2SCRIPT_CONFIG", &config)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output), "echo hi\n");
}
