//! Timestamp formatting for the periodic Timestamp Producer (spec.md
//! §4.7). Scheduling (the 10s tick) lives in `aesd-server`'s `timestamp`
//! module; this module only knows how to format one line.

use chrono::Local;

/// Formats the current local wall-clock time as
/// `timestamp:%a, %d %b %Y %T %z\n`, matching the original driver's
/// `strftime` format string verbatim.
pub fn format_timestamp() -> String {
    format!("timestamp:{}\n", Local::now().format("%a, %d %b %Y %T %z"))
}
