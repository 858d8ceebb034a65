//! Subscriber setup for the binary
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! binary's job.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` count
#[must_use]
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber, writing to stderr
///
/// `RUST_LOG` takes precedence over `verbosity` when set.
///
/// # Errors
/// When a global subscriber is already installed.
pub fn init_tracing(
    verbosity: u8,
    json: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}
