//! Core, network-agnostic pieces of the append-only command log: the ring
//! buffer itself, its mutual-exclusion wrapper, control-line parsing, line
//! framing, timestamp formatting, and the optional in-memory
//! character-device surface.
//!
//! Everything that touches a socket or a process lives in the `aesd-server`
//! binary crate instead; this crate is the part that could, in principle,
//! back a kernel driver shim.

pub mod chardevice;
pub mod control;
pub mod error;
pub mod framing;
pub mod guard;
pub mod linebuffer;
pub mod log;
pub mod timestamp;

pub use error::{AesdError, Result};
pub use framing::LineDelimitedDecoder;
pub use guard::LogGuard;
pub use log::{CommandLog, DEFAULT_CAPACITY};
