//! Config command handler.

use crate::config::{
    ClientConfig, Validatable, discover_config_file, generate_example_config, generate_json_schema,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Operation for the `config` subcommand.
#[derive(Debug, Clone)]
pub enum ConfigAction {
    /// JSON schema of the configuration file
    Schema { output: Option<PathBuf> },
    /// Commented example configuration
    Example,
    /// Effective configuration after loading and overrides
    Show,
    /// Search locations and the active file
    Path,
}

/// Run the config command.
pub fn run_config(
    config: &ClientConfig,
    loaded_from: Option<&Path>,
    explicit: Option<&Path>,
    action: ConfigAction,
) -> Result<()> {
    match action {
        ConfigAction::Schema { output } => {
            let schema = generate_json_schema()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
        }
        ConfigAction::Example => print!("{}", generate_example_config()),
        ConfigAction::Show => {
            match loaded_from {
                Some(path) => eprintln!("# Loaded from: {}", path.display()),
                None => eprintln!("# No config file found; showing defaults"),
            }
            for error in config.validate() {
                eprintln!("# warning: {error}");
            }
            let yaml = serde_yaml::to_string(&redacted(config)).context("failed to serialize config")?;
            print!("{yaml}");
        }
        ConfigAction::Path => {
            let search_paths = [
                std::env::current_dir().ok(),
                dirs::config_dir().map(|p| p.join("ossindex")),
                dirs::home_dir(),
            ];
            eprintln!("Config file search paths (in order):");
            for path in search_paths.into_iter().flatten() {
                eprintln!("  {}", path.display());
            }
            match discover_config_file(explicit) {
                Some(path) => eprintln!("Active config file: {}", path.display()),
                None => eprintln!("No config file found."),
            }
        }
    }
    Ok(())
}

/// Copy of `config` with credentials masked.
fn redacted(config: &ClientConfig) -> ClientConfig {
    const MASK: &str = "********";
    let mut shown = config.clone();
    if let Some(auth) = shown.auth.as_mut() {
        auth.password = MASK.to_string();
    }
    if let Some(auth) = shown.proxy.as_mut().and_then(|proxy| proxy.auth.as_mut()) {
        auth.password = MASK.to_string();
    }
    shown
}
