//! A growable byte buffer that accumulates a blocking byte source until it
//! sees `\n` or EOF — the Line Reader of spec.md §4.3, used by the
//! in-memory character-device surface (the network surface uses
//! `tokio_util::codec::LinesCodec` instead, see `aesd-server`'s `worker`
//! module).

use std::io::Read;

use crate::error::AesdError;

const INITIAL_CAPACITY: usize = 512;

/// Doubling-growth byte buffer. The authoritative length is `buf.len()`;
/// the trailing NUL some callers append is purely a debug-display
/// convenience and never counted toward length.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// A NUL-terminated view suitable only for debug logging — never for
    /// determining length.
    pub fn debug_display(&self) -> String {
        String::from_utf8_lossy(&self.buf).into_owned()
    }

    /// Resets to empty, then reads one byte at a time from `src` until a
    /// `\n` is seen or EOF is reached. Returns the resulting length (which
    /// may be 0 on immediate EOF).
    ///
    /// Transient interrupts (`ErrorKind::Interrupted`) are retried
    /// transparently; any other I/O error is propagated.
    pub fn read_line<R: Read>(&mut self, src: &mut R) -> Result<usize, AesdError> {
        self.buf.clear();
        let mut byte = [0u8; 1];
        loop {
            match src.read(&mut byte) {
                Ok(0) => return Ok(self.buf.len()),
                Ok(_) => {
                    if self.buf.len() == self.buf.capacity() {
                        self.buf.reserve(self.buf.capacity().max(1));
                    }
                    self.buf.push(byte[0]);
                    if byte[0] == b'\n' {
                        return Ok(self.buf.len());
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(AesdError::from(e)),
            }
        }
    }
}
