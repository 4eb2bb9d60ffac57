//! Configuration loading for the scrolly CLI.
//!
//! Settings are read from a TOML file when one is given. A missing or
//! invalid file falls back to the built-in defaults so a simulation can
//! still run.

use scrolly_core::NarrativeConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Top-level config file layout
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Log filter, e.g. `info` or `scrolly_runtime=debug`
    pub log_level: Option<String>,
    pub narrative: NarrativeConfig,
}

/// Loads `path`, falling back to defaults on any error
pub fn load_config(path: &Path) -> CliConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded config");
            data
        }
        Err(err) => {
            warn!(path = %path.display(), "Falling back to default config: {err}");
            return CliConfig::default();
        }
    };

    match parse_config(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config: {err}");
            CliConfig::default()
        }
    }
}

/// Parses and validates TOML config text
pub fn parse_config(contents: &str) -> anyhow::Result<CliConfig> {
    let cfg: CliConfig = toml::from_str(contents)?;
    cfg.narrative.validate()?;
    Ok(cfg)
}
