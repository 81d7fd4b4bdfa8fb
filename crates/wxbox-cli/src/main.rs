//! `wxbox` entry point: parse arguments, set up logging, dispatch.

use clap::Parser;
use miette::Result;
use wxbox_cli::{cli, commands, error, logger};

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);

    let result = match args.command {
        cli::Command::Config(config_args) => commands::config_execute(config_args),
        cli::Command::Target(target_args) => commands::target_execute(target_args),
        cli::Command::Latest(latest_args) => commands::latest_execute(latest_args),
    };

    result.map_err(error::cli_error_to_miette)
}
