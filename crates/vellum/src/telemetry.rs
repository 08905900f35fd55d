use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,vellum=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize console logging.
///
/// Honors `RUST_LOG`; defaults to `info,vellum=debug`. Fails if a global
/// subscriber is already set.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::debug!("Console tracing initialized");
    Ok(())
}

/// Initialize newline-delimited JSON logging, for hosts that ship logs to a
/// collector.
pub fn init_json_tracing() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()?;

    tracing::debug!("JSON tracing initialized");
    Ok(())
}
