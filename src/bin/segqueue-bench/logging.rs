//! Logging initialization.

use crate::config::LoggingConfig;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Initialize logging based on configuration.
///
/// Log lines go to stderr so they never interleave with the report rows on
/// stdout. `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(output_layer(&config.format))
        .with(filter)
        .init();
}

/// Formatting layer for "json", "compact", or (default) "pretty" output.
fn output_layer(format: &str) -> Box<dyn Layer<Registry> + Send + Sync> {
    let layer = fmt::layer().with_writer(std::io::stderr);

    match format {
        "json" => layer.json().boxed(),
        "compact" => layer.compact().boxed(),
        _ => layer.boxed(),
    }
}
