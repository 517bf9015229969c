//! Tracing subscriber setup for the `wordhoard` binary.
//!
//! Logs go to stderr so stdout stays clean for command output. `RUST_LOG`
//! wins over everything; otherwise `--verbose` selects `debug`, and the
//! `[logging] level` config key is the fallback.

use tracing_subscriber::EnvFilter;

pub fn init(level: &str, verbose: bool) {
    let default_level = if verbose { "debug" } else { level };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}
