//! Cooperative shutdown, replacing the original source's `SIGINT`/`SIGTERM`
//! handlers-that-set-an-atomic-flag with a `CancellationToken` every task
//! can `select!` on — the Design Notes' suggested cross-platform
//! substitution for signal-driven polling.

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Waits for SIGINT or SIGTERM (Unix) / Ctrl-C (elsewhere), then cancels
/// `token`. Intended to be spawned once and raced against the rest of the
/// supervisor's event loop.
pub async fn wait_for_shutdown(token: CancellationToken) {
    shutdown_signal().await;
    info!("shutdown signal received, beginning cooperative shutdown");
    token.cancel();
}

#[cfg(target_family = "unix")]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

    tokio::select! {
        _ = sigint.recv() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(target_family = "unix"))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
