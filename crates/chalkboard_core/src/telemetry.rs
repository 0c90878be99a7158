//! Tracing subscriber initialisation.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber for the process.
///
/// Sets up a human-readable fmt layer filtered by the `RUST_LOG`
/// environment variable. Call once at startup; subsequent calls fail
/// because a global subscriber is already installed.
///
/// # Errors
///
/// Returns error if subscriber initialization fails.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry().with(fmt_layer).try_init()?;

    Ok(())
}
