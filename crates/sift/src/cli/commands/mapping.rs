//! Implementation of `sift mapping`.

use std::process::ExitCode;

use sift_index::{IndexDefinition, MappingBuilder, fingerprint};

use crate::cli::{
    args::MappingCommand,
    context::CommandContext,
    output::{dim, print_json, strong, styled},
};

/// Prints the index definition inferred from the configuration.
pub fn run(ctx: &CommandContext, cmd: &MappingCommand) -> ExitCode {
    let builder = MappingBuilder::new(&ctx.config);
    let definition = IndexDefinition::new(&ctx.config, &builder);

    if cmd.json {
        return print_json(&definition.to_json());
    }

    println!(
        "{} {}",
        styled(strong, "Fingerprint:"),
        fingerprint(&definition)
    );
    let types: Vec<&str> = definition.mappings.iter().map(|(name, _)| name.as_str()).collect();
    println!(
        "{} {}",
        styled(strong, "Mapping types:"),
        styled(dim, &types.join(", "))
    );
    println!();
    print_json(&definition.to_json())
}
