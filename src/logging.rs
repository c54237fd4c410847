//! `tracing` + `tracing-subscriber` setup, standing in for the original
//! source's `openlog`/`syslog` calls (spec.md §7: "administrators see log
//! lines categorized by severity").

use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber filtered by `RUST_LOG`
/// (`info` by default).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
