//! Implementation of `sift parse`.

use std::process::ExitCode;

use sift_index::ResultParser;

use crate::cli::{
    args::ParseCommand,
    context::CommandContext,
    output::{dim, facets_table, header, print_json, strong, styled},
};

/// Parses a saved engine response into hits and facet counts.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let response = match ctx.read_json(&cmd.response) {
        Ok(response) => response,
        Err(code) => return code,
    };
    let results = match ResultParser::new(&ctx.config.fields).parse(&response) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return print_json(&results);
    }

    println!("{} {}", styled(strong, "Total:"), results.total);
    if results.ids.is_empty() {
        println!("{}", styled(dim, "No hits."));
    } else {
        println!("{} {}", styled(strong, "Hits:"), results.ids.join(", "));
    }

    if results.facets.is_empty() {
        return ExitCode::SUCCESS;
    }
    println!();
    println!("{}", styled(header, "Facets"));
    println!("{}", facets_table(&results));
    ExitCode::SUCCESS
}
