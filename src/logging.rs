//! Diagnostic logging to stderr.
//!
//! Console output (reports, merge progress) is written by the commands
//! themselves; this only covers `tracing` events. `RUST_LOG` wins when set.

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
