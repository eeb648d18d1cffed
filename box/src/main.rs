mod cli;
mod commands;
mod error;

use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use cli::{CliOpts, Commands};

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let opts = CliOpts::from_iter(wild::args_os());
    let verbose = opts.verbose;
    init_logging(verbose);

    match opts.cmd {
        Commands::Create(args) => commands::create(args, verbose)?,
        Commands::List(args) => commands::list(args)?,
        Commands::Extract(args) => commands::extract(args, verbose)?,
    };

    Ok(())
}
