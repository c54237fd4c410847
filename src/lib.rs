//! The `aesd-server` binary's internals, exposed as a library target so
//! integration tests can drive the supervisor directly (mirroring the
//! teacher's own bin-plus-lib workspace split, just within one package).

pub mod cli;
pub mod config;
pub mod logging;
pub mod signal;
pub mod supervisor;
pub mod timestamp;
pub mod worker;

pub use supervisor::{run, SharedLog};
