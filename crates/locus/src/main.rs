//! The `locus` command-line tool.

use std::process::ExitCode;

use clap::Parser;
use locus::cli::{
    CommandContext,
    args::{Cli, Commands},
    commands, logging,
};

/// Parses arguments, loads configuration and runs the selected command.
fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    let ctx = if matches!(cli.command, Commands::Init(_)) {
        CommandContext::load_cwd_only()
    } else {
        CommandContext::load()
    };

    match ctx {
        Ok(ctx) => commands::run(cli.command, &ctx),
        Err(code) => code,
    }
}
