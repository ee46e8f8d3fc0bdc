//! Tracing initialization.
//!
//! Sets up a fmt subscriber with an `EnvFilter`. The log level is controlled
//! via the standard `RUST_LOG` environment variable and defaults to `info`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for the application.
///
/// Safe to call once at startup. Returns an error if a global subscriber has
/// already been installed.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    Ok(())
}
