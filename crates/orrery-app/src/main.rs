//! The binary entry point for the orrery.

use std::path::PathBuf;

use clap::Parser;

use orrery_config::{CliArgs, Config, ConfigSource};

fn main() {
    let args = CliArgs::parse();

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("config.ron"));
    let (mut config, config_source) = match Config::load_or_create(&config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };
    config.apply_cli_overrides(&args);

    orrery_log::init_logging(&config.debug.log_level);

    // Config loading ran before the subscriber existed; report it now.
    match config_source {
        ConfigSource::Loaded => log::info!("Loaded config from {}", config_path.display()),
        ConfigSource::Created => {
            log::info!("Created default config at {}", config_path.display());
        }
    }

    if let Err(e) = orrery_app::run(config) {
        log::error!("Fatal: {e}");
        std::process::exit(1);
    }
}
