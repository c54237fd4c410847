//! Tunables named in spec.md §6, collected in one place rather than left
//! as scattered `#define`s.

use std::time::Duration;

/// Ring capacity `N` (reference value from the original driver).
pub const RING_CAPACITY: usize = 10;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 9000;

/// `listen(2)` backlog.
pub const BACKLOG: u32 = 50;

/// Bytes moved per `read_at` call while streaming a response.
pub const STREAM_BLOCK_SIZE: usize = 4096;

/// Timestamp Producer tick interval.
pub const TIMESTAMP_INTERVAL: Duration = Duration::from_secs(10);
