//! Configuration loading and merging logic
//!
//! Handles loading configuration from the config file and environment and
//! layering them over the built-in defaults.

use super::{paths, schema::Config};
use crate::report::OutputFormat;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers merged
    ///
    /// Precedence order (highest to lowest):
    /// 1. Environment variable overrides
    /// 2. Config file
    /// 3. Built-in defaults
    ///
    /// Command-line flags are applied on top by the caller.
    pub fn load() -> Result<Config> {
        let config = Self::load_file(&paths::config_path())?.unwrap_or_default();
        Ok(Self::apply_env_overrides(config))
    }

    /// Load configuration from a file
    ///
    /// A missing file is `Ok(None)`; an unreadable or malformed one is an error.
    pub fn load_file(path: &Path) -> Result<Option<Config>> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!("Loaded config file {}", path.display());
        Ok(Some(config))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: Config) -> Config {
        if let Ok(output) = std::env::var("KASBA_OUTPUT") {
            match OutputFormat::from_str(&output, true) {
                Ok(format) => config.output = format,
                Err(_) => tracing::warn!("Ignoring KASBA_OUTPUT={}: unknown format", output),
            }
        }

        if let Ok(namespace) = std::env::var("KASBA_STORAGE_NAMESPACE") {
            config.addons.storage_namespace = namespace;
        }

        if let Ok(namespace) = std::env::var("KASBA_MONITORING_NAMESPACE") {
            config.addons.monitoring_namespace = namespace;
        }

        config
    }
}
