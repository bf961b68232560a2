//! Rendering for CLI output.
//!
//! Structured output is JSON. On a terminal it is syntax highlighted; when piped it is
//! printed plain so it can be fed to other tools.

use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;
pub use sift_highlight::{dim, header, strong, success, warning};
use sift_highlight::Highlighter;
use sift_index::SearchResults;

/// Returns true if stdout is an interactive terminal.
pub fn is_tty() -> bool {
    io::stdout().is_terminal()
}

/// Prints a value as pretty JSON, highlighted on a terminal.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    let json = match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            return ExitCode::FAILURE;
        }
    };
    if is_tty() {
        println!("{}", Highlighter::new().highlight_json(&json));
    } else {
        println!("{json}");
    }
    ExitCode::SUCCESS
}

/// Prints TOML, highlighted on a terminal.
pub fn print_toml(content: &str) {
    if is_tty() {
        print!("{}", Highlighter::new().highlight_toml(content));
    } else {
        print!("{content}");
    }
}

/// Styles text only when writing to a terminal.
pub fn styled(style: fn(&str) -> String, text: &str) -> String {
    if is_tty() {
        style(text)
    } else {
        text.to_string()
    }
}

/// Builds a table of facet bucket counts, one row per bucket.
pub fn facets_table(results: &SearchResults) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Facet", "Value", "Count"]);
    for (facet, counts) in &results.facets {
        for (key, count) in counts.iter() {
            table.add_row(vec![
                Cell::new(facet),
                Cell::new(key),
                Cell::new(count).set_alignment(CellAlignment::Right),
            ]);
        }
    }
    table
}
