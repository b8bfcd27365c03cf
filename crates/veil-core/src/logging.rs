#![forbid(unsafe_code)]

//! Structured logging bootstrap.
//!
//! Library code only emits `tracing` events; applications that want them
//! rendered call [`init`] once at startup. Output is newline-delimited JSON on
//! stderr so it never interleaves with the host's own stdout.
//!
//! The filter defaults to the value passed in, and `VEIL_LOG` overrides it
//! using the usual `EnvFilter` directive syntax (e.g. `veil_widgets=trace`).

use tracing_subscriber::EnvFilter;

/// Environment variable consulted for the log filter.
pub const LOG_ENV: &str = "VEIL_LOG";

/// Install a global JSON subscriber.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok()
}
