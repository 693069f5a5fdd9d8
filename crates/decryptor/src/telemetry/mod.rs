//! Logging setup for the decryptor CLI.
//!
//! JSON events go to stderr so that stdout carries nothing but command output
//! (plaintext, descriptors, or error text). No key material, nonce, plaintext,
//! or ciphertext may appear in any log field.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, ENV_PREFIX};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `KOTS_DECRYPTOR_LOG_LEVEL` when it parses.
///
/// # Errors
///
/// Returns an error if the configured level is not a valid filter directive or
/// a subscriber has already been set.
pub fn init(cfg: &Config) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => log_filter(&cfg.log_level)?,
    };

    tracing_subscriber::fmt()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise kots-decryptor logging: {e}"))
}

/// Build the filter for a configured level such as `warn` or
/// `kots_crypto=debug,info`.
fn log_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .with_context(|| format!("{ENV_PREFIX}_LOG_LEVEL is not a valid filter: {directives:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_level_is_accepted() {
        assert!(log_filter("warn").is_ok());
    }

    #[test]
    fn per_target_directives_are_accepted() {
        assert!(log_filter("kots_crypto=debug,info").is_ok());
    }

    #[test]
    fn unknown_level_is_rejected() {
        let err = log_filter("kots_crypto=loud").unwrap_err();
        assert!(err.to_string().contains("KOTS_DECRYPTOR_LOG_LEVEL"));
    }
}
