//! Clap argument definitions for the `sift` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Faceted search documents, mappings and queries")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Parses a `facet=value` pair.
pub fn parse_facet_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((facet, value)) if !facet.trim().is_empty() => {
            Ok((facet.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected facet=value, got '{s}'")),
    }
}

/// Shared facet selection flags.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Require a facet value (repeatable; every value must match)
    #[arg(short = 'f', long = "facet", value_name = "FACET=VALUE", value_parser = parse_facet_pair)]
    pub require: Vec<(String, String)>,

    /// Accept a facet value (repeatable; any value of the facet may match)
    #[arg(long = "or", value_name = "FACET=VALUE", value_parser = parse_facet_pair)]
    pub any: Vec<(String, String)>,
}

/// Arguments for `sift init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.sift.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `sift mapping`.
#[derive(Args, Debug, Clone)]
pub struct MappingCommand {
    /// Print only the index definition as plain JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `sift document`.
#[derive(Args, Debug, Clone)]
pub struct DocumentCommand {
    /// Record file (JSON)
    pub record: PathBuf,

    /// Taxonomy terms file (JSON: taxonomy -> list of terms)
    #[arg(short = 't', long)]
    pub terms: Option<PathBuf>,

    /// Check the document against its content type's mapping
    #[arg(long)]
    pub check: bool,
}

/// Arguments for `sift query`.
#[derive(Args, Debug, Clone)]
pub struct QueryCommand {
    /// Search text; boolean syntax (AND, OR, NOT, field:value) is passed through
    #[arg(default_value = "")]
    pub text: String,

    #[command(flatten)]
    /// Facet selection.
    pub selection: SelectionArgs,

    /// Offset of the first hit
    #[arg(long, default_value = "0")]
    pub from: usize,

    /// Page size [default: search.page_size]
    #[arg(short = 'n', long)]
    pub size: Option<usize>,

    /// Sort newest first instead of by relevance
    #[arg(long)]
    pub by_date: bool,

    /// Print the compiled query before rendering
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for `sift suggest`.
#[derive(Args, Debug, Clone)]
pub struct SuggestCommand {
    /// Text typed so far
    pub text: String,

    /// Restrict to a category value (repeatable; any value may match)
    #[arg(short = 'c', long = "category", value_name = "FACET=VALUE", value_parser = parse_facet_pair)]
    pub categories: Vec<(String, String)>,
}

/// Arguments for `sift parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Engine response file (JSON)
    pub response: PathBuf,

    /// Output parsed results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Supported `sift` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize sift configuration in current directory
    Init(InitCommand),

    /// Validate configuration and diagnose issues
    Check,

    /// Show effective configuration settings
    Config,

    /// Show the index definition and its fingerprint
    Mapping(MappingCommand),

    /// Build the search document of a record
    Document(DocumentCommand),

    /// Compile and render a search request
    #[command(after_help = "\
FACET SELECTION:
  -f color=red -f color=blue     Both values required
  --or color=red --or color=blue Either value
  -f price=10-50                 Range facets select buckets by key

Nothing is rendered when there is no text, no selection and no facet.")]
    Query(QueryCommand),

    /// Render an autocomplete request
    Suggest(SuggestCommand),

    /// Parse an engine response into hits and facet counts
    Parse(ParseCommand),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facet_pairs_split_on_first_equals() {
        assert_eq!(
            parse_facet_pair("price=10-50"),
            Ok(("price".to_string(), "10-50".to_string()))
        );
        assert_eq!(
            parse_facet_pair("q=a=b"),
            Ok(("q".to_string(), "a=b".to_string()))
        );
    }

    #[test]
    fn facet_pairs_need_a_facet() {
        assert!(parse_facet_pair("red").is_err());
        assert!(parse_facet_pair("=red").is_err());
    }

    #[test]
    fn query_args_parse() {
        let cli = Cli::try_parse_from([
            "sift", "query", "shoes", "-f", "category=trail", "--or", "color=red", "--by-date",
        ])
        .unwrap();
        let Commands::Query(cmd) = cli.command else {
            panic!("expected query");
        };
        assert_eq!(cmd.text, "shoes");
        assert_eq!(cmd.selection.require, vec![("category".into(), "trail".into())]);
        assert_eq!(cmd.selection.any, vec![("color".into(), "red".into())]);
        assert!(cmd.by_date);
        assert_eq!(cmd.size, None);
    }
}
