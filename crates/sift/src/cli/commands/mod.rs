//! Command implementations and dispatch.

pub mod check;
pub mod config;
pub mod document;
pub mod init;
pub mod mapping;
pub mod parse;
pub mod query;
mod shared;
pub mod suggest;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Check => check::run(ctx),
        Commands::Config => config::run(ctx),
        Commands::Mapping(cmd) => mapping::run(ctx, &cmd),
        Commands::Document(cmd) => document::run(ctx, &cmd),
        Commands::Query(cmd) => query::run(ctx, &cmd),
        Commands::Suggest(cmd) => suggest::run(ctx, &cmd),
        Commands::Parse(cmd) => parse::run(ctx, &cmd),
    }
}
