//! Diagnostic tracing for the agent layer.
//!
//! Agents log the raw model completion at `debug` and every fallback at
//! `warn`. Nothing here is part of an agent's result.

use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// `RUST_LOG` filter (default `warn`) with compact output on stderr.
fn subscriber() -> impl Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
}

/// Install the subscriber, panicking if one is already set.
///
/// # Example
/// ```bash
/// RUST_LOG=ooda=debug cargo test
/// ```
pub fn init() {
    subscriber().init();
}

/// Install the subscriber unless the host (or another test) already did.
/// Returns whether this call installed it.
pub fn try_init() -> bool {
    subscriber().try_init().is_ok()
}
