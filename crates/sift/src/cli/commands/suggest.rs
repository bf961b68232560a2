//! Implementation of `sift suggest`.

use std::process::ExitCode;

use sift_index::{FacetSelection, Suggester};

use crate::cli::{
    args::SuggestCommand,
    context::CommandContext,
    output::{dim, print_json, styled},
};

/// Prints the autocomplete request for the text typed so far.
pub fn run(ctx: &CommandContext, cmd: &SuggestCommand) -> ExitCode {
    let mut categories = FacetSelection::new();
    for (facet, value) in &cmd.categories {
        categories.any_of(facet.clone(), value.clone());
    }

    match Suggester::new(&ctx.config).request(&cmd.text, &categories) {
        Some(request) => print_json(&request.body),
        None => {
            println!("{}", styled(dim, "No text to suggest for."));
            ExitCode::SUCCESS
        }
    }
}
