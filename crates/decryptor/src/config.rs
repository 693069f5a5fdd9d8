//! Configuration loading and validation for the decryptor CLI.
//!
//! Values come from `KOTS_DECRYPTOR_*` environment variables. Every key has a
//! default, so an empty environment is valid.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Prefix shared by every configuration variable.
pub const ENV_PREFIX: &str = "KOTS_DECRYPTOR";

/// Validated decryptor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Tracing log level (`KOTS_DECRYPTOR_LOG_LEVEL`). Logs go to stderr.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("failed to build decryptor configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise decryptor configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("{ENV_PREFIX}_LOG_LEVEL must not be empty");
        }
        Ok(())
    }
}
