//! Logging initialization.
//!
//! - `LogFormat::Pretty`: human-readable lines on stdout
//! - `LogFormat::Json`: structured JSON lines on stdout
//!
//! The filter comes from `RUST_LOG` and defaults to `info`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogFormat;

/// Install the global subscriber. Calling it twice is harmless; the second
/// call is ignored.
pub fn init(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
    };

    // Only fails when a subscriber is already installed.
    let _ = result;
}
