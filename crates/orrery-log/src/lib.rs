//! Console logging for the orrery.
//!
//! Structured, filterable logging via the `tracing` ecosystem. The subscriber
//! also captures `log` records from the library crates, so everything ends up
//! in one stream with timestamps and module paths.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// `level` is the base directive from the config file (e.g. "info",
/// "debug"); `wgpu` and `naga` are quieted to warn either way, and a
/// `RUST_LOG` environment variable overrides everything.
pub fn init_logging(level: &str) {
    let filter_str = if level.is_empty() {
        "info,wgpu=warn,naga=warn".to_string()
    } else {
        format!("{level},wgpu=warn,naga=warn")
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

/// An `EnvFilter` with the default filter string: `info` everywhere, `wgpu`
/// and `naga` quieted to warn.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new("info,wgpu=warn,naga=warn")
}
