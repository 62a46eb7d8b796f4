//! Logging initialisation.

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "greader_notify=info";

/// Install the global subscriber: plain-text lines on stdout, filtered by
/// `RUST_LOG` (falls back to `greader_notify=info`).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .init();
}
