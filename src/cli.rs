//! Command-line surface, grounded in the teacher's own `clap` dependency
//! (the original source's CLI parsing is itself out of scope per spec.md
//! §1 — only the resulting flags are modeled here).

use clap::Parser;

use crate::config::DEFAULT_PORT;

#[derive(Debug, Parser)]
#[command(name = "aesd-server", about = "Line-oriented TCP front-end over a bounded command log")]
pub struct Opts {
    /// Daemonize after binding. Daemonization itself (double-fork, session
    /// leader, tty detachment) is out of scope for this design; this flag
    /// is accepted for CLI fidelity and logs a warning instead of acting.
    #[arg(short = 'd', long = "daemonize")]
    pub daemonize: bool,

    /// Keep a persistence artifact across restarts, if one exists. No
    /// on-disk persistence exists in this design (spec.md's Non-goals), so
    /// this is accepted and otherwise ignored.
    #[arg(short = 'k', long = "keep")]
    pub keep: bool,

    /// Port to listen on.
    #[arg(long = "port", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_standard_port() {
        let opts = Opts::parse_from(["aesd-server"]);
        assert_eq!(opts.port, DEFAULT_PORT);
        assert!(!opts.daemonize);
        assert!(!opts.keep);
    }

    #[test]
    fn parses_flags_and_port_override() {
        let opts = Opts::parse_from(["aesd-server", "-d", "-k", "--port", "9100"]);
        assert!(opts.daemonize);
        assert!(opts.keep);
        assert_eq!(opts.port, 9100);
    }
}
