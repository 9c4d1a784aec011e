//! Command implementations and dispatch.

pub mod check;
pub mod config;
pub mod init;
pub mod matching;
pub mod search;
pub mod slice;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Check => check::run(ctx),
        Commands::Config => config::run(ctx),
        Commands::Slice(cmd) => slice::run(ctx, &cmd),
        Commands::Match(cmd) => matching::run(ctx, &cmd),
        Commands::Search(cmd) => search::run(ctx, &cmd),
    }
}
