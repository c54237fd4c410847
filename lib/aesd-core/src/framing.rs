//! Byte-oriented newline framing for the network surface (spec.md §3, §6:
//! a command is an arbitrary byte string terminated by `\n`).
//!
//! `tokio_util::codec::LinesCodec` is the wrong tool here: it decodes to
//! `String` via `str::from_utf8` (so non-UTF-8 input becomes a decode
//! error instead of a stored command) and strips a trailing `\r` before
//! the `\n` (so `abc\r\n` is stored as `abc\n`, not the bytes the client
//! actually sent). Modeled on `lib/codecs`'s `CharacterDelimitedDecoder`,
//! simplified to a fixed `\n` delimiter and no frame-length cap — a
//! command's size is bounded only by available memory, not by this
//! decoder.

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;

/// Splits a byte stream on `\n`, yielding each frame without its
/// delimiter and without interpreting the bytes in between at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineDelimitedDecoder;

impl Decoder for LineDelimitedDecoder {
    type Item = Bytes;
    type Error = std::io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Bytes>, Self::Error> {
        match buf.iter().position(|&b| b == b'\n') {
            None => Ok(None),
            Some(idx) => {
                let frame = buf.split_to(idx + 1).freeze();
                Ok(Some(frame.slice(0..idx)))
            }
        }
    }
}
