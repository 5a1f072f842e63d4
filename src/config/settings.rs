use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::logging::LoggingConfig;

/// Index store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Run the full consistency check after every insert and delete.
    pub validate_writes: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Loads defaults overridden by `AVLDB_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads defaults, then the optional file, then the environment.
    ///
    /// Nested keys use `__`, e.g. `AVLDB_STORE__VALIDATE_WRITES=true` or
    /// `AVLDB_LOGGING__LEVEL=debug`.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // Adding default values
            .set_default("store.validate_writes", false)?
            .set_default("logging.level", "info")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let cfg = builder
            // Add environment variables with the AVLDB_ prefix
            .add_source(
                Environment::with_prefix("AVLDB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        cfg.try_deserialize()
    }
}
