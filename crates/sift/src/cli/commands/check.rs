//! Implementation of `sift check`.

use std::process::ExitCode;

use sift_config::{ConfigWarning, discover_config_files};

use crate::cli::{
    context::CommandContext,
    output::{dim, strong, styled, success, warning},
};

/// Exit codes for `sift check`.
mod exit_codes {
    use std::process::ExitCode;

    /// Configuration is valid with no warnings.
    pub const OK: ExitCode = ExitCode::SUCCESS;
    /// Configuration has warnings but is usable.
    pub const WARNINGS: ExitCode = ExitCode::FAILURE;
}

/// Validates the configuration and reports warnings with hints.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config_files = discover_config_files(&ctx.cwd);
    if config_files.is_empty() {
        println!("{}", styled(dim, "No configuration files found."));
        println!();
        println!("Run 'sift init' to create a configuration file.");
        return exit_codes::OK;
    }

    println!("{}", styled(strong, "Config files:"));
    for path in &config_files {
        println!("   {}", path.display());
    }
    println!();

    let fields = &ctx.config.fields;
    println!("{}", styled(strong, "Indexed:"));
    println!("   fields:     {}", list_or_none(&fields.fields));
    println!("   meta:       {}", list_or_none(&fields.meta_fields));
    println!("   taxonomies: {}", list_or_none(&fields.taxonomies));
    println!("   facets:     {}", list_or_none(&fields.facets));
    println!();

    let warnings = ctx.config.validate();
    if warnings.is_empty() {
        println!("{}", styled(success, "No issues found."));
        return exit_codes::OK;
    }

    println!(
        "{}",
        styled(warning, &format!("Warnings ({}):", warnings.len()))
    );
    for w in &warnings {
        println!("   - {w}");
    }
    println!();

    print_hints(&warnings);

    exit_codes::WARNINGS
}

/// Joins names, or returns a placeholder for an empty list.
fn list_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings
        .iter()
        .map(|w| match w {
            ConfigWarning::NoFieldsDefined => {
                "Add fields, meta_fields or taxonomies to the [fields] section."
            }
            ConfigWarning::UndeclaredFacet { .. } => {
                "Facets must also be listed in fields, meta_fields or taxonomies."
            }
            ConfigWarning::RangesOnNonNumeric { .. } => {
                "List range-faceted fields in fields.numeric."
            }
            ConfigWarning::UnboundedRange { .. } => "Give every range a `from`, a `to`, or both.",
            ConfigWarning::UnknownScoreField { .. } => {
                "Scores apply only to configured names of the matching kind."
            }
            ConfigWarning::NonPositiveScore { .. } => {
                "Use a positive weight, or remove the score to leave the field unscored."
            }
            ConfigWarning::UnknownTypeTaxonomy { .. } => {
                "List only configured taxonomies in fields.type_taxonomies."
            }
        })
        .collect();

    hints.sort_unstable();
    hints.dedup();

    println!("{}", styled(strong, "Hints:"));
    for hint in hints {
        println!("   - {hint}");
    }
}
