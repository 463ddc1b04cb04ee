//! Logging setup for the CLI.

use tracing_subscriber::EnvFilter;

/// Initialize tracing output on stderr. `-v` raises the default level to
/// info, `-vv` to debug; `RUST_LOG` overrides both.
pub fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
