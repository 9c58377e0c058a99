//! Command handlers for the droidgen CLI.

pub mod generate;
pub mod info;
pub mod init;
pub mod validate;

use crate::cli::Cli;
use droidgen_core::{
    config::{CONFIG_FILE_NAME, GenerateConfig, find_config_file},
    error::{DroidgenError, Result},
};
use std::env;
use tracing::{debug, info};

/// Loads configuration from `--config` or the nearest `droidgen.toml`.
pub fn load_config(cli: &Cli) -> Result<GenerateConfig> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => find_config_file(&env::current_dir()?).map_err(|e| {
            debug!("Config search failed: {}", e);
            DroidgenError::config(format!(
                "{CONFIG_FILE_NAME} not found. Run 'droidgen init' to create one."
            ))
        })?,
    };
    info!("Using configuration {}", path.display());
    GenerateConfig::from_toml_path(&path)
}
