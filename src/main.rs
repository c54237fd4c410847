use aesd_server::{cli, logging, supervisor};
use clap::Parser;
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let opts = cli::Opts::parse();

    if opts.daemonize {
        warn!("-d/--daemonize was requested but daemonization is out of scope for this build; running in the foreground");
    }
    if opts.keep {
        warn!("-k/--keep was requested but no on-disk persistence artifact exists in this build");
    }

    supervisor::run(opts.port).await
}
