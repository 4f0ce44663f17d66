//! Configuration loader.
//!
//! Loads step configuration from an optional TOML file plus environment
//! overrides, then hard-validates the result.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};

use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "SPARKNOTIFY";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Loads step configuration from its sources (in order of priority):
/// 1. the TOML file given on the command line (optional)
/// 2. `SPARKNOTIFY_*` environment variables (highest priority)
#[derive(Debug)]
pub struct ConfigLoader {
    /// Configuration file path, if one was given
    config_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader for the given configuration file, if any
    pub fn new(config_file: Option<&Path>) -> Self {
        Self {
            config_file: config_file.map(Path::to_path_buf),
        }
    }

    /// Load and hard-validate settings from all sources.
    ///
    /// # Errors
    /// Returns an error if the named file is missing, parsing fails, or
    /// validation fails.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(ConfigError::file_not_found(path.display().to_string()));
            }
            builder = builder
                .add_source(File::new(path.to_str().unwrap_or_default(), FileFormat::Toml));
        }

        // Environment variables are always highest priority:
        // SPARKNOTIFY_SKIP__ON_FAILURE -> skip.on_failure
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }
}
