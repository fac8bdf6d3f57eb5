//! Traintest - integration-test driver for training configurations
//!
//! Scans a directory of TOML training configurations, selects the ones
//! marked with `job.use_for_integration_test`, and runs the training
//! launcher once per configuration plus once per declared override
//! variation, failing on the first non-zero exit.

pub use traintest_discover as discover;
pub use traintest_model as model;
pub use traintest_runner as runner;
