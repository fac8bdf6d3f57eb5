//! Static table of declared override variations, keyed by configuration
//! filename. Literal in-process data; unknown keys yield no declared
//! variations rather than an error.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use traintest_model::OverrideDefinitions;

/// Checkpoint folder shared by the save/resume stages of the checkpoint
/// flavor. Reused across stages by design so the resume stage can pick up
/// the artifacts the save stage wrote.
pub const TEST_CHECKPOINT_DIR: &str = "./test_runner_checkpoint";

fn stage(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(std::string::ToString::to_string).collect()
}

static FLAVORS: Lazy<HashMap<&'static str, Vec<OverrideDefinitions>>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert(
        "debug_model.toml",
        vec![
            OverrideDefinitions::new("1D compile", vec![stage(&["--training.compile"])]),
            OverrideDefinitions::new(
                "Eager mode 2DParallel",
                vec![stage(&[
                    "--training.tensor_parallel_degree",
                    "2",
                    "--model.norm_type=rmsnorm",
                ])],
            ),
            OverrideDefinitions::new(
                "Checkpoint Integration Test",
                vec![
                    stage(&["--checkpoint.folder", TEST_CHECKPOINT_DIR]),
                    stage(&[
                        "--checkpoint.folder",
                        TEST_CHECKPOINT_DIR,
                        "--training.steps",
                        "20",
                    ]),
                ],
            ),
        ],
    );
    table
});

/// All definitions to run for one configuration file: the base no-override
/// case first, then the declared variations in declared order.
#[must_use]
pub fn flavors_for(config_file: &str) -> Vec<OverrideDefinitions> {
    let mut defs = vec![OverrideDefinitions::default()];
    if let Some(declared) = FLAVORS.get(config_file) {
        defs.extend(declared.iter().cloned());
    }
    defs
}
