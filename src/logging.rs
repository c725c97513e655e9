//! Logging setup for the binary. Library crates log through `log`; the
//! subscriber picks those records up through `tracing-log`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count. `RUST_LOG` takes precedence.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

pub fn init(verbose: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to set tracing subscriber: {e}"))
}
