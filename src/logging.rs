//! Tracing subscriber setup for the binary.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a global subscriber. `RUST_LOG` overrides `default_level`.
///
/// Logs go to stderr so that stdout stays reserved for results.
pub fn init_tracing(default_level: &str, json: bool) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .flatten_event(true);
        tracing_subscriber::registry().with(filter).with(fmt_layer).try_init()
    } else {
        let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
        tracing_subscriber::registry().with(filter).with(fmt_layer).try_init()
    }
}
