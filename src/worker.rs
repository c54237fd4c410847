//! The Connection Worker (spec.md §4.4): one task per accepted connection,
//! reading newline-terminated requests via `aesd_core`'s byte-oriented
//! [`LineDelimitedDecoder`] (not `tokio_util`'s `LinesCodec`, which decodes
//! to `String` and strips a trailing `\r` — both wrong for an arbitrary
//! byte-string command), classifying each line, and streaming the log
//! back under the guard.

use std::sync::Arc;

use aesd_core::control::parse_seekto;
use aesd_core::{LineDelimitedDecoder, LogGuard};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_stream::StreamExt;
use tokio_util::codec::FramedRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::STREAM_BLOCK_SIZE;

pub struct Worker<const N: usize> {
    id: u64,
    guard: Arc<LogGuard<N>>,
    shutdown: CancellationToken,
}

impl<const N: usize> Worker<N> {
    pub fn new(id: u64, guard: Arc<LogGuard<N>>, shutdown: CancellationToken) -> Self {
        Self { id, guard, shutdown }
    }

    /// Runs the worker's read → classify → mutate/read → stream loop until
    /// EOF, a socket error, or cooperative shutdown.
    pub async fn run(self, stream: TcpStream) {
        let peer = stream.peer_addr().ok();
        info!(worker = self.id, ?peer, "connection accepted");

        let (read_half, mut write_half) = stream.into_split();
        let mut lines = FramedRead::new(read_half, LineDelimitedDecoder);

        loop {
            let line = tokio::select! {
                _ = self.shutdown.cancelled() => {
                    debug!(worker = self.id, "shutdown requested, closing connection");
                    break;
                }
                next = lines.next() => next,
            };

            // `LineDelimitedDecoder` strips the trailing `\n`; spec.md
            // treats the terminator as part of the stored command, so it
            // is re-appended before the line is handed to the log.
            let mut line = match line {
                Some(Ok(line)) => line.to_vec(),
                Some(Err(err)) => {
                    warn!(worker = self.id, %err, "error reading from client");
                    break;
                }
                None => {
                    debug!(worker = self.id, "client closed connection (EOF)");
                    break;
                }
            };
            line.push(b'\n');

            // Held for the entire append-then-stream sequence: spec.md
            // §4.4 requires a coherent snapshot (this client's own write
            // included, no peer append interleaved mid-stream), so the
            // guard is not released until every byte has been written to
            // the socket.
            let mut session = self.guard.session().await;

            let stream_from = if let Some(seek) = parse_seekto(&line) {
                match session.find_by_command(seek.cmd_index as u64, seek.intra_offset as u64) {
                    Ok(offset) => offset,
                    Err(err) => {
                        debug!(worker = self.id, %err, "bad SEEKTO, closing connection");
                        break;
                    }
                }
            } else if let Err(err) = session.append_and_advance_cursor(&line) {
                warn!(worker = self.id, %err, "failed to append line");
                break;
            } else {
                // Convention: a data line echoes the entire log, equivalent
                // to seeking to the beginning before streaming.
                0
            };

            let mut pos = stream_from;
            loop {
                let chunk = session.read_at(pos, STREAM_BLOCK_SIZE);
                if chunk.is_empty() {
                    break;
                }
                if let Err(err) = write_half.write_all(&chunk).await {
                    warn!(worker = self.id, %err, "error writing to client");
                    drop(session);
                    info!(worker = self.id, "connection closed");
                    return;
                }
                pos += chunk.len() as u64;
            }
            drop(session);
        }

        info!(worker = self.id, "connection closed");
    }
}
