//! Logging setup

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogConfig;

/// Install the global subscriber described by `config`
///
/// `RUST_LOG` overrides `config.level`. Fails if a subscriber is already set.
pub fn try_init(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let json = config.json.then(|| fmt::layer().json());
    let text = (!config.json).then(|| fmt::layer());

    tracing_subscriber::registry()
        .with(json)
        .with(text)
        .with(filter)
        .try_init()
}

/// Like [`try_init`], but a second call is a no-op
pub fn init(config: &LogConfig) {
    if try_init(config).is_ok() {
        tracing::debug!(level = %config.level, json = config.json, "logging initialized");
    }
}
