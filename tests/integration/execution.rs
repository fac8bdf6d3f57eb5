//! Integration tests for the discovery + executor pipeline
//! Drives the runner against a fake launcher script

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use traintest_discover::discover;
use traintest_model::TestError;
use traintest_runner::flavors::flavors_for;
use traintest_runner::Runner;

const MARKED: &str = "[job]\nuse_for_integration_test = true\n";

fn write_launcher(dir: &Path, body: String) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake_launcher.sh");
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Launcher that records every invocation and exits with a fixed code
fn logging_launcher(dir: &Path, log: &Path, exit_code: i32) -> PathBuf {
    write_launcher(
        dir,
        format!(
            "#!/bin/sh\necho \"$CONFIG_FILE|$NGPU|$*\" >> {}\nexit {}\n",
            log.display(),
            exit_code
        ),
    )
}

/// Launcher that records every invocation and fails only when its arguments
/// contain `marker`
fn marker_failing_launcher(dir: &Path, log: &Path, marker: &str) -> PathBuf {
    write_launcher(
        dir,
        format!(
            "#!/bin/sh\necho \"$CONFIG_FILE|$NGPU|$*\" >> {log}\ncase \"$*\" in *{marker}*) exit 1;; esac\nexit 0\n",
            log = log.display(),
            marker = marker
        ),
    )
}

fn run_all(config_dir: &Path, launcher: PathBuf) -> Result<usize, TestError> {
    let configs = discover(config_dir)?;
    let runner = Runner::new(launcher, 4);
    let mut stages = 0;
    for config in &configs {
        let defs = flavors_for(&config.file_name);
        stages += runner.run_config(config, &defs)?.stages;
    }
    Ok(stages)
}

#[test]
fn test_debug_model_scenario_runs_five_stages() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("debug_model.toml"), MARKED).unwrap();
    let log = dir.path().join("runs.log");
    let launcher = logging_launcher(dir.path(), &log, 0);

    let stages = run_all(dir.path(), launcher).unwrap();
    assert_eq!(stages, 5);

    let contents = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 5);
    // The base no-override run comes first: no tokens after CONFIG_FILE|NGPU|
    assert!(lines[0].ends_with("|4|"));
    assert!(lines[1].ends_with("--training.compile"));
    assert!(lines[4].ends_with("--training.steps 20"));
}

#[test]
fn test_unmarked_config_never_reaches_executor() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("full_model.toml"),
        "[job]\nuse_for_integration_test = false\n",
    )
    .unwrap();
    let log = dir.path().join("runs.log");
    let launcher = logging_launcher(dir.path(), &log, 0);

    let stages = run_all(dir.path(), launcher).unwrap();
    assert_eq!(stages, 0);
    assert!(!log.exists());
}

#[test]
fn test_failure_short_circuits_remaining_configs() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("alpha_model.toml"), MARKED).unwrap();
    fs::write(dir.path().join("beta_model.toml"), MARKED).unwrap();
    let log = dir.path().join("runs.log");
    let launcher = logging_launcher(dir.path(), &log, 3);

    let result = run_all(dir.path(), launcher);
    match result.unwrap_err() {
        TestError::TestFailed { flavor, command, code } => {
            assert_eq!(flavor, "default");
            assert!(command.contains("alpha_model.toml"));
            assert_eq!(code, 3);
        }
        other => panic!("Expected TestFailed error, got {other}"),
    }

    // Exactly one invocation: beta_model was never attempted
    let contents = fs::read_to_string(&log).unwrap();
    assert_eq!(contents.lines().count(), 1);
}

#[test]
fn test_variation_failure_names_its_flavor() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("debug_model.toml"), MARKED).unwrap();
    let log = dir.path().join("runs.log");
    // Default run (no tokens) passes; the first declared flavor fails
    let launcher = marker_failing_launcher(dir.path(), &log, "--training.compile");

    let result = run_all(dir.path(), launcher);
    match result.unwrap_err() {
        TestError::TestFailed { flavor, command, .. } => {
            assert_eq!(flavor, "1D compile");
            assert!(command.contains("--training.compile"));
        }
        other => panic!("Expected TestFailed error, got {other}"),
    }

    // Default ran, "1D compile" ran and failed, nothing after
    let contents = fs::read_to_string(&log).unwrap();
    assert_eq!(contents.lines().count(), 2);
}
