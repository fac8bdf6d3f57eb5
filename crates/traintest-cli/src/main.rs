//! Traintest CLI
//!
//! Command-line driver for the training integration-test runner.

use clap::{Arg, Command};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

use traintest_discover::discover;
use traintest_runner::flavors::flavors_for;
use traintest_runner::Runner;

fn main() {
    let matches = Command::new("traintest")
        .version("0.1.0")
        .about("Integration-test driver for training configurations")
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory scanned for .toml training configurations")
                .default_value("./train_configs"),
        )
        .arg(
            Arg::new("launcher")
                .long("launcher")
                .value_name("SCRIPT")
                .help("Training launcher invoked once per test stage")
                .default_value("./run_llama_train.sh"),
        )
        .arg(
            Arg::new("ngpu")
                .long("ngpu")
                .value_name("N")
                .help("Value passed to the launcher as NGPU")
                .value_parser(clap::value_parser!(u32))
                .default_value("4"),
        )
        .get_matches();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config_dir = matches
        .get_one::<String>("config-dir")
        .map(String::as_str)
        .unwrap_or("./train_configs");
    let launcher = matches
        .get_one::<String>("launcher")
        .map(String::as_str)
        .unwrap_or("./run_llama_train.sh");
    let ngpu = matches.get_one::<u32>("ngpu").copied().unwrap_or(4);

    match run(Path::new(config_dir), Path::new(launcher), ngpu) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    }
}

/// Discover qualifying configurations and run every flavor of each one.
///
/// The first failure aborts everything; remaining configurations are not
/// attempted.
fn run(config_dir: &Path, launcher: &Path, ngpu: u32) -> Result<(), anyhow::Error> {
    let configs = discover(config_dir)?;
    if configs.is_empty() {
        tracing::info!("no configurations marked for integration testing");
        return Ok(());
    }

    let runner = Runner::new(launcher.to_path_buf(), ngpu);
    for config in &configs {
        let defs = flavors_for(&config.file_name);
        let summary = runner.run_config(config, &defs)?;
        tracing::info!(
            config = %config.file_name,
            definitions = summary.definitions,
            stages = summary.stages,
            "configuration passed"
        );
    }
    Ok(())
}
