//! Test executor for the traintest driver
//!
//! Runs the training launcher once per stage of each override definition,
//! sequentially and synchronously, stopping at the first non-zero exit.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use traintest_model::{OverrideDefinitions, QualifyingConfig, StageCommand, TestError};

pub mod flavors;

/// Captured stdout/stderr of one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    /// Combine both streams into a single string, stdout first
    #[must_use]
    pub fn combined(&self) -> String {
        let mut combined = String::new();
        combined.push_str(&self.stdout);
        if !self.stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&self.stderr);
        }
        combined
    }
}

/// Counts of what actually ran for one configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub definitions: usize,
    pub stages: usize,
}

/// Executes test runs against a fixed launcher.
///
/// The launcher receives the configuration path and parallelism through the
/// `CONFIG_FILE` and `NGPU` environment variables, plus each stage's extra
/// tokens as plain arguments. Invocations block until the launcher exits;
/// no two stages ever run concurrently.
pub struct Runner {
    launcher: PathBuf,
    ngpu: u32,
}

impl Runner {
    #[must_use]
    pub fn new(launcher: PathBuf, ngpu: u32) -> Self {
        Self { launcher, ngpu }
    }

    /// Run every definition for one configuration, in order
    ///
    /// Definitions without stages are skipped. Stages within a definition
    /// run strictly sequentially; a later stage may depend on artifacts
    /// written by an earlier one.
    ///
    /// # Errors
    ///
    /// Returns `TestError` on the first spawn failure or non-zero exit;
    /// remaining stages and definitions are not attempted
    pub fn run_config(
        &self,
        config: &QualifyingConfig,
        defs: &[OverrideDefinitions],
    ) -> Result<RunSummary, TestError> {
        let mut summary = RunSummary {
            definitions: 0,
            stages: 0,
        };

        for def in defs {
            if !def.is_runnable() {
                tracing::debug!(flavor = %def.flavor, "definition has no stages, skipping");
                continue;
            }
            for stage_args in &def.stages {
                let cmd = StageCommand::new(&self.launcher, &config.path, self.ngpu, stage_args);
                self.run_stage(&cmd, &def.flavor)?;
                summary.stages += 1;
            }
            summary.definitions += 1;
        }

        Ok(summary)
    }

    /// Run one stage to completion and surface its output
    fn run_stage(&self, cmd: &StageCommand, flavor: &str) -> Result<RunOutput, TestError> {
        tracing::info!(flavor, command = %cmd, "running integration test stage");
        println!("===== Integration test, flavor: {flavor}, command: {cmd} =====");

        let output = Command::new(&cmd.launcher)
            .args(&cmd.args)
            .env("CONFIG_FILE", &cmd.config_file)
            .env("NGPU", cmd.ngpu.to_string())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|err| TestError::spawn(cmd.to_string(), err.to_string()))?;

        let run_output = RunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };
        // Captured in full, printed after completion; never streamed live
        println!("{}", run_output.combined());

        if output.status.success() {
            Ok(run_output)
        } else {
            Err(TestError::test_failed(
                flavor,
                cmd.to_string(),
                output.status.code().unwrap_or(-1),
            ))
        }
    }
}
