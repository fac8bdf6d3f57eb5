//! Shared data model for the traintest driver
//!
//! Override definitions, discovered configurations, stage commands, and the
//! error type used across crates.

use std::fmt;
use std::path::{Path, PathBuf};

/// A named set of command-line override variations for one test flavor.
///
/// Each stage is one subprocess invocation's worth of extra argument tokens.
/// Multiple stages model sequential dependent runs (e.g. save a checkpoint,
/// then resume from it). A definition with no stages is never executed; the
/// base no-override case is a separate definition with one empty stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideDefinitions {
    /// Human-readable label identifying this flavor in logs and errors
    pub flavor: String,
    /// Ordered stages, each an ordered list of argument tokens
    pub stages: Vec<Vec<String>>,
}

impl OverrideDefinitions {
    #[must_use]
    pub fn new(flavor: impl Into<String>, stages: Vec<Vec<String>>) -> Self {
        Self {
            flavor: flavor.into(),
            stages,
        }
    }

    /// Whether this definition carries any stage to execute
    #[must_use]
    pub fn is_runnable(&self) -> bool {
        !self.stages.is_empty()
    }
}

impl Default for OverrideDefinitions {
    /// The base case: one stage with no extra arguments
    fn default() -> Self {
        Self {
            flavor: "default".to_string(),
            stages: vec![vec![]],
        }
    }
}

/// A configuration file marked for integration testing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifyingConfig {
    pub path: PathBuf,
    pub file_name: String,
}

impl QualifyingConfig {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, file_name }
    }
}

/// One subprocess invocation: launcher, environment assignments, and the
/// stage's extra argument tokens.
///
/// Arguments are kept as an explicit token list and handed to the process
/// spawn primitive directly; no shell is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCommand {
    pub launcher: PathBuf,
    pub config_file: PathBuf,
    pub ngpu: u32,
    pub args: Vec<String>,
}

impl StageCommand {
    #[must_use]
    pub fn new(launcher: &Path, config_file: &Path, ngpu: u32, args: &[String]) -> Self {
        Self {
            launcher: launcher.to_path_buf(),
            config_file: config_file.to_path_buf(),
            ngpu,
            args: args.to_vec(),
        }
    }
}

impl fmt::Display for StageCommand {
    /// Human-readable rendering for logs and error messages, not a
    /// round-trippable shell snippet
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CONFIG_FILE={} NGPU={} {}",
            self.config_file.display(),
            self.ngpu,
            self.launcher.display()
        )?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Error types for discovery and execution
#[derive(thiserror::Error, Debug)]
pub enum TestError {
    #[error("traintest:{path}: ERR_DISCOVERY: {message}")]
    Discovery { path: String, message: String },

    #[error("traintest:{path}: ERR_CONFIG_PARSE: {message}")]
    ConfigParse { path: String, message: String },

    #[error("traintest: ERR_SPAWN: failed to launch `{command}`: {message}")]
    Spawn { command: String, message: String },

    #[error("traintest: ERR_TEST_FAILED: flavor: {flavor}, command: {command}, exit code: {code}")]
    TestFailed {
        flavor: String,
        command: String,
        code: i32,
    },
}

impl TestError {
    #[must_use]
    pub fn discovery(path: &Path, message: impl Into<String>) -> Self {
        Self::Discovery {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn config_parse(path: &Path, message: impl Into<String>) -> Self {
        Self::ConfigParse {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn spawn(command: String, message: impl Into<String>) -> Self {
        Self::Spawn {
            command,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn test_failed(flavor: &str, command: String, code: i32) -> Self {
        Self::TestFailed {
            flavor: flavor.to_string(),
            command,
            code,
        }
    }
}
