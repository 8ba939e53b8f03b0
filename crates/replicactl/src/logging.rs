//! Logging setup for replicactl
//!
//! Logs go to stderr so stdout stays clean for --json output. RUST_LOG wins
//! over the -v count when set.

use tracing_subscriber::EnvFilter;

/// Filter directive for a given -v count
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
