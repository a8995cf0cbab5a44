//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;
use std::path::Path;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: &Settings, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            if config_path.exists() {
                Output::info(&format!("Loaded from {}", config_path.display()));
            } else {
                Output::warning(&format!(
                    "No config file at {}; showing defaults.",
                    config_path.display()
                ));
            }
            println!("{}", settings.to_toml()?);
        }

        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }

    Ok(())
}
