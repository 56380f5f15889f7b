//! Tracing setup.
//!
//! Logs go to stderr so a printed URL is the only thing on stdout.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used for one-shot CLI commands.
pub const CLI_FILTER: &str = "bangs=warn";

/// Filter used by the HTTP server.
pub const SERVER_FILTER: &str = "bangs=info,tower_http=info";

/// Install the global subscriber. `RUST_LOG` overrides `default_filter`.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if result.is_ok() {
        tracing::debug!("Logging initialized");
    }
}
