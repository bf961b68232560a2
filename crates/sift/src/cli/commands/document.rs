//! Implementation of `sift document`.

use std::process::ExitCode;

use sift_document::{DocumentBuilder, Record, TermStore};
use sift_index::MappingBuilder;

use crate::cli::{
    args::DocumentCommand,
    context::CommandContext,
    output::{print_json, styled, warning},
};

/// Builds and prints the search document of a record.
pub fn run(ctx: &CommandContext, cmd: &DocumentCommand) -> ExitCode {
    let record = match Record::load(&ctx.resolve(&cmd.record)) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let terms = match &cmd.terms {
        Some(path) => match TermStore::load(&ctx.resolve(path)) {
            Ok(terms) => terms,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => TermStore::new(),
    };

    let document = DocumentBuilder::new(&ctx.config, &terms).build(&record);
    let code = print_json(&document);
    if !cmd.check {
        return code;
    }

    let Some(content_type) = record.content_type(&ctx.config.fields.canonical) else {
        eprintln!(
            "{}",
            styled(warning, "record has no content type; nothing to check against")
        );
        return ExitCode::FAILURE;
    };
    let issues = MappingBuilder::new(&ctx.config)
        .build_for(content_type)
        .check(&document);
    if issues.is_empty() {
        return ExitCode::SUCCESS;
    }
    for issue in &issues {
        eprintln!("{}", styled(warning, &format!("mapping: {issue}")));
    }
    ExitCode::FAILURE
}
