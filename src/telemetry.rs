//! Tracing subscriber initialisation.

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Errors raised while installing the global subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log level: {0}")]
    InvalidFilter(#[from] ParseError),
    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(Box<dyn std::error::Error + Send + Sync>),
}

/// Installs a formatting subscriber filtered by `RUST_LOG`, falling back to
/// `log_level` when the variable is unset or invalid.
///
/// # Errors
///
/// Returns [`TelemetryError`] when `log_level` does not parse or a
/// subscriber is already installed.
pub fn init(log_level: &str) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(TelemetryError::Install)
}
