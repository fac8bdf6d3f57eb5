//! Configuration discovery for the traintest driver
//!
//! Scans a directory for `.toml` training configurations and selects the
//! ones whose `job.use_for_integration_test` flag is set.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use traintest_model::{QualifyingConfig, TestError};

/// Subset of a training configuration this driver relies on.
///
/// Unknown sections and keys are ignored; a missing `job` table or flag is
/// treated as "not marked for integration testing", not an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrainConfig {
    #[serde(default)]
    pub job: JobTable,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobTable {
    #[serde(default)]
    pub use_for_integration_test: bool,
}

/// Parse a single configuration file
///
/// # Errors
///
/// Returns `TestError` if the file cannot be read or is not valid TOML
pub fn load_config(path: &Path) -> Result<TrainConfig, TestError> {
    let contents =
        fs::read_to_string(path).map_err(|err| TestError::discovery(path, err.to_string()))?;
    toml::from_str(&contents).map_err(|err| TestError::config_parse(path, err.to_string()))
}

/// Enumerate qualifying configurations in `config_dir`
///
/// Every `.toml` entry is parsed; entries whose flag is set are returned in
/// lexicographic filename order so run order is deterministic across
/// filesystems. A malformed file aborts the whole pass.
///
/// # Errors
///
/// Returns `TestError` if the directory cannot be listed or any candidate
/// fails to parse
pub fn discover(config_dir: &Path) -> Result<Vec<QualifyingConfig>, TestError> {
    let entries =
        fs::read_dir(config_dir).map_err(|err| TestError::discovery(config_dir, err.to_string()))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| TestError::discovery(config_dir, err.to_string()))?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "toml") {
            candidates.push(path);
        }
    }
    candidates.sort();

    let mut qualifying = Vec::new();
    for path in candidates {
        let config = load_config(&path)?;
        if config.job.use_for_integration_test {
            tracing::debug!(path = %path.display(), "marked for integration testing");
            qualifying.push(QualifyingConfig::new(path));
        } else {
            tracing::debug!(path = %path.display(), "not marked, skipping");
        }
    }

    tracing::info!(
        dir = %config_dir.display(),
        count = qualifying.len(),
        "configuration discovery complete"
    );
    Ok(qualifying)
}
