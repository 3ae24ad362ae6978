//! Subscriber setup for binaries and tests.
//!
//! Library code logs through both `log` and `tracing`. The subscriber
//! installed here also captures `log` records, so both end up in one stream.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

/// Builds the filter. `RUST_LOG` wins over the configured level.
fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{level},rusqlite=warn")))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber. Events go to stderr, one line each, as
/// plain text or JSON.
pub fn init(config: &LoggingConfig) -> Result<(), TryInitError> {
    let fmt_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_env_filter(&config.level))
        .try_init()
}
