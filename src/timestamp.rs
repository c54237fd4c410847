//! Schedules the Timestamp Producer (spec.md §4.7): a tick every 10s,
//! aligned so the first tick lands 10s after start, appending a formatted
//! timestamp line through the shared [`LogGuard`].

use std::sync::Arc;

use aesd_core::timestamp::format_timestamp;
use aesd_core::LogGuard;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::TIMESTAMP_INTERVAL;

pub async fn run<const N: usize>(guard: Arc<LogGuard<N>>, shutdown: CancellationToken) {
    let start = tokio::time::Instant::now() + TIMESTAMP_INTERVAL;
    let mut ticker = tokio::time::interval_at(start, TIMESTAMP_INTERVAL);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("timestamp producer stopping");
                return;
            }
            _ = ticker.tick() => {
                let line = format_timestamp();
                if let Err(err) = guard.append_and_advance_cursor(line.as_bytes()).await {
                    warn!(%err, "timestamp producer failed to append");
                }
            }
        }
    }
}
