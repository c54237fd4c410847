//! The Log Guard: the single mutually-exclusive entry point every caller
//! outside of tests uses to touch a [`CommandLog`].
//!
//! Uses `tokio::sync::Mutex` rather than `std::sync::Mutex` because a
//! Connection Worker (see `aesd-server`'s `worker` module) holds the guard
//! across an `.await`ing socket write for the append-then-stream atomicity
//! spec.md §4.4 requires.

use tokio::sync::{Mutex, MutexGuard};
use tracing::error;

use crate::log::{CommandLog, DEFAULT_CAPACITY};
use crate::Result;

/// Shared, lock-guarded handle to one command log plus its append cursor.
///
/// `A` is kept alongside the log rather than recomputed from
/// `total_bytes()` because eviction and extension both need to adjust it in
/// the same critical section that mutates the log — recomputing it after
/// the fact would still be correct here, but keeping it explicit matches
/// spec.md §4.2's stated update rule.
pub struct LogGuard<const N: usize = DEFAULT_CAPACITY> {
    inner: Mutex<Inner<N>>,
}

struct Inner<const N: usize> {
    log: CommandLog<N>,
    cursor: u64,
}

impl<const N: usize> Default for LogGuard<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LogGuard<N> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                log: CommandLog::new(),
                cursor: 0,
            }),
        }
    }

    /// Appends `bytes` and advances the append cursor under one critical
    /// section, per spec.md §4.2:
    /// `evicted = log.append(bytes); A = A - evicted + len(bytes)`.
    pub async fn append_and_advance_cursor(&self, bytes: &[u8]) -> Result<u64> {
        let mut guard = self.inner.lock().await;
        let evicted = guard.log.append(bytes).map_err(|err| {
            error!(%err, "failed to append to command log");
            err
        })?;
        guard.cursor = guard.cursor - evicted as u64 + bytes.len() as u64;
        Ok(guard.cursor)
    }

    /// Reads up to `max` bytes starting at flat offset `off`. A short read
    /// (fewer than `max` bytes, possibly zero) means the log end was
    /// reached — not an error.
    pub async fn read_at(&self, off: u64, max: usize) -> Vec<u8> {
        let guard = self.inner.lock().await;
        guard.log.read_at(off, max)
    }

    /// Resolves a `(cmd_index, intra)` control coordinate to a flat offset.
    pub async fn find_by_command(&self, cmd_index: u64, intra: u64) -> Result<u64> {
        let guard = self.inner.lock().await;
        guard.log.find_by_command(cmd_index, intra)
    }

    /// The current value of the append cursor `A`.
    pub async fn append_cursor(&self) -> u64 {
        self.inner.lock().await.cursor
    }

    /// Acquires the guard for an entire append-then-stream sequence,
    /// per spec.md §4.4: the mutex is held from the moment a worker starts
    /// mutating/reading the log until it finishes streaming the response,
    /// so no peer's concurrent append can interleave mid-stream. Since
    /// `tokio::sync::Mutex` is async-aware, the returned handle may be held
    /// across the caller's own `.await`ing socket writes.
    pub async fn session(&self) -> LogGuardSession<'_, N> {
        LogGuardSession {
            guard: self.inner.lock().await,
        }
    }
}

/// A held lock over one command log, scoped to a single worker's
/// append-then-stream sequence (or any other operation that must observe a
/// coherent, non-interleaved snapshot).
pub struct LogGuardSession<'a, const N: usize> {
    guard: MutexGuard<'a, Inner<N>>,
}

impl<const N: usize> LogGuardSession<'_, N> {
    pub fn append_and_advance_cursor(&mut self, bytes: &[u8]) -> Result<u64> {
        let evicted = self.guard.log.append(bytes).map_err(|err| {
            error!(%err, "failed to append to command log");
            err
        })?;
        self.guard.cursor = self.guard.cursor - evicted as u64 + bytes.len() as u64;
        Ok(self.guard.cursor)
    }

    pub fn find_by_command(&self, cmd_index: u64, intra: u64) -> Result<u64> {
        self.guard.log.find_by_command(cmd_index, intra)
    }

    pub fn read_at(&self, off: u64, max: usize) -> Vec<u8> {
        self.guard.log.read_at(off, max)
    }

    pub fn append_cursor(&self) -> u64 {
        self.guard.cursor
    }
}
