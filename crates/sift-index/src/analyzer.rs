//! Analysis chain declared in the index settings.
//!
//! Autocomplete fields are indexed with [`NGRAM_ANALYZER`], which emits every prefix of
//! each word up to [`MAX_GRAM`] characters, and searched with [`WHITESPACE_ANALYZER`] so
//! the typed prefix is matched as-is.

use serde_json::{Value, json};

/// Edge n-gram token filter.
pub const NGRAM_FILTER: &str = "ngram_filter";

/// Index-time analyzer of autocomplete fields.
pub const NGRAM_ANALYZER: &str = "ngram_analyzer";

/// Search-time analyzer of autocomplete fields.
pub const WHITESPACE_ANALYZER: &str = "whitespace_analyzer";

/// Whole-value lowercase analyzer for prefix matching.
pub const STARTSWITH_ANALYZER: &str = "analyzer_startswith";

/// Shortest emitted prefix.
pub const MIN_GRAM: u32 = 1;

/// Longest emitted prefix.
pub const MAX_GRAM: u32 = 20;

/// Returns the `analysis` section of the index settings.
pub fn analysis_settings() -> Value {
    json!({
        "filter": {
            NGRAM_FILTER: {
                "type": "edge_ngram",
                "min_gram": MIN_GRAM,
                "max_gram": MAX_GRAM,
                "token_chars": ["letter", "digit", "punctuation", "symbol"]
            }
        },
        "analyzer": {
            STARTSWITH_ANALYZER: {
                "tokenizer": "keyword",
                "filter": ["lowercase"]
            },
            NGRAM_ANALYZER: {
                "type": "custom",
                "tokenizer": "whitespace",
                "filter": ["lowercase", "asciifolding", NGRAM_FILTER]
            },
            WHITESPACE_ANALYZER: {
                "type": "custom",
                "tokenizer": "whitespace",
                "filter": ["lowercase", "asciifolding"]
            }
        }
    })
}
