//! The `dploy` binary: parse arguments, set up logging, dispatch.
use anyhow::Result;
use clap::Parser;

use dploy_cli::cli::{Cli, Command};
use dploy_cli::commands;
use dploy_cli::logging::{self, Logger, Verbosity};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    logging::init_subscriber(Verbosity::from_flags(args.silent, args.verbose));
    let log = Logger::new();

    match args.command {
        Command::Stow(opts) => commands::stow::run(&args.global, &opts, &log),
        Command::Unstow(opts) => commands::unstow::run(&args.global, &opts, &log),
        Command::Link(opts) => commands::link::run(&args.global, &opts, &log),
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
