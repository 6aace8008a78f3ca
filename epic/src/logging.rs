//! Diagnostic tracing for the epic tooling.
//!
//! Output goes to stderr only. Stdout is reserved for tool results and
//! session instructions, which hosts parse as JSON.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn,epic=info";

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`; defaults to `warn` with this crate at `info`.
///
/// # Example
/// ```bash
/// RUST_LOG=epic=debug epic idle --session-id ses_1
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
