//! `dotlink` binary: parse arguments, set up logging and dispatch.
use anyhow::Result;
use clap::Parser;

use dotlink::cli::{Cli, Command};
use dotlink::commands;
use dotlink::links::Summary;
use dotlink::logging::{Logger, Verbosity, init_subscriber};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let command = args.subcommand();

    if command == Command::Version {
        commands::version::run();
        return Ok(());
    }

    let verbosity = match &command {
        Command::Plan(opts) if opts.json => Verbosity::Quiet,
        _ if args.verbose => Verbosity::Verbose,
        _ => Verbosity::Normal,
    };
    init_subscriber(verbosity, command.name());
    let log = Logger::new(command.name());

    let result = match &command {
        Command::Install => commands::install::run(&args.global, &log),
        Command::Plan(opts) => commands::plan::run(&args.global, opts, &log),
        Command::Unlink => commands::unlink::run(&args.global, &log),
        Command::Version => Ok(Summary::default()),
    };
    log.print_log_location();
    commands::ensure_success(&result?)
}
