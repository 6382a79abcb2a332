use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

use hizuke_core::constants::DEFAULT_LOG_LEVEL;

pub type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Level forced by `-v` flags, if any.
const fn verbosity_level(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}

/// ## Summary
/// Picks the filter directive: `-v` flags win over the configured level.
#[must_use]
pub fn effective_level(verbosity: u8, configured: &str) -> &str {
    verbosity_level(verbosity).unwrap_or(configured)
}

/// ## Summary
/// Installs a stderr subscriber whose filter can be replaced once the
/// configuration is known. `RUST_LOG` takes precedence when set.
pub fn init(verbosity: u8) -> FilterHandle {
    let initial = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(effective_level(verbosity, DEFAULT_LOG_LEVEL)));
    let (filter_layer, filter_handle) = reload::Layer::new(initial);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    filter_handle
}

/// ## Summary
/// Swaps in the configured level unless `RUST_LOG` or `-v` already chose one.
pub fn apply_configured_level(handle: &FilterHandle, verbosity: u8, configured: &str) {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return;
    }

    let level = effective_level(verbosity, configured);
    match EnvFilter::try_new(level) {
        Ok(filter) => {
            if let Err(e) = handle.modify(|current| *current = filter) {
                tracing::warn!(error = %e, "Failed to update log filter from config");
            }
        }
        Err(e) => {
            tracing::warn!(level = %level, error = %e, "Invalid log level in config, keeping default");
        }
    }
}
