//! The error taxonomy shared by the command log, its guard, and the
//! in-memory character-device surface.

use snafu::Snafu;

/// Errors that can arise from operating on the command log or its guard.
///
/// Propagation follows spec: `OutOfMemory` is local to a single append and
/// leaves the log unchanged, `Invalid` rejects a malformed lookup without
/// touching state, `Interrupted` is something callers retry or surface
/// cleanly at a coarse boundary, and `Fatal` should bubble all the way to
/// the supervisor.
#[derive(Debug, Snafu)]
pub enum AesdError {
    #[snafu(display("allocation failed while appending {requested} bytes"))]
    OutOfMemory { requested: usize },

    #[snafu(display("I/O error: {source}"))]
    Io { source: std::io::Error },

    #[snafu(display("invalid argument: {reason}"))]
    Invalid { reason: String },

    #[snafu(display("operation interrupted"))]
    Interrupted,

    #[snafu(display("fatal error: {reason}"))]
    Fatal { reason: String },
}

impl AesdError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid {
            reason: reason.into(),
        }
    }

    pub fn fatal(reason: impl Into<String>) -> Self {
        Self::Fatal {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for AesdError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}

pub type Result<T> = std::result::Result<T, AesdError>;
