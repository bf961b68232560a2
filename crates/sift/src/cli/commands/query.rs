//! Implementation of `sift query`.

use std::process::ExitCode;

use sift_index::{QueryCompiler, SearchParams, Searcher, SortOrder};

use super::shared::selection_from;
use crate::cli::{
    args::QueryCommand,
    context::CommandContext,
    output::{dim, print_json, styled},
};

/// Compiles the search text and facet selection and prints the rendered request.
pub fn run(ctx: &CommandContext, cmd: &QueryCommand) -> ExitCode {
    let selection = selection_from(&cmd.selection);
    let searcher = Searcher::new(&ctx.config);

    let size = cmd.size.unwrap_or(ctx.config.search.page_size);
    let mut params = SearchParams::new(size);
    params.from = cmd.from;
    if cmd.by_date {
        params = params.sorted_by(SortOrder::Date);
    }

    if cmd.explain
        && let Some(compiled) = QueryCompiler::new(&ctx.config).compile(&cmd.text, &selection)
    {
        eprintln!("{compiled:#?}");
    }

    match searcher.request(&cmd.text, &selection, params) {
        Some(request) => print_json(&request.body),
        None => {
            println!("{}", styled(dim, "Nothing to query."));
            ExitCode::SUCCESS
        }
    }
}
