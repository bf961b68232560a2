//! Index definition and faceted search for sift.
//!
//! This crate turns a [`sift_config::Config`] into everything a search engine needs and
//! understands what it sends back:
//! - Index mappings inferred from the field configuration, with per-kind hooks
//! - Conformance checks of built documents against a mapping
//! - A fingerprint of the index definition for detecting required rebuilds
//! - Query compilation from free text and facet selections, rendered as JSON
//! - Parsing of hit lists and facet counts from engine responses
//! - Autocomplete suggestions
//!
//! The engine itself is reached through a caller-supplied [`QueryExecutor`].
//!
//! # Example
//!
//! ```
//! use sift_config::Config;
//! use sift_index::{FacetSelection, Searcher};
//!
//! let mut config = Config::default();
//! config.fields.fields = vec!["post_title".to_string(), "post_type".to_string()];
//!
//! let searcher = Searcher::new(&config);
//! let mut selection = FacetSelection::new();
//! selection.require("post_type", "page");
//!
//! let request = searcher
//!     .request("trail shoes", &selection, searcher.default_params())
//!     .unwrap();
//! assert_eq!(request.body["size"], 10);
//! ```

#![warn(missing_docs)]

mod analyzer;
mod config_hash;
mod definition;
mod error;
mod mapping;
mod query;
mod result;
mod schema;
mod search;

pub use analyzer::{
    MAX_GRAM, MIN_GRAM, NGRAM_ANALYZER, NGRAM_FILTER, STARTSWITH_ANALYZER,
    WHITESPACE_ANALYZER, analysis_settings,
};
pub use config_hash::{SCHEMA_VERSION, fingerprint};
pub use definition::{IndexDefinition, TAXONOMY_TYPE_PREFIX};
pub use error::{ExecutorError, SearchError};
pub use mapping::{DATE_FORMAT, MappingBuilder, suggest_mapping};
pub use query::{
    Aggregation, AggregationKind, CompiledQuery, FACET_AGG, FILTERED_AGG, FacetFilter,
    FacetSelection, FacetValues, Filter, QueryCompiler, QueryContext, TextClause, aggregations,
    facet_filters, render, render_aggregation, render_filter, render_text, search_fields,
    text_clause,
};
pub use result::{FacetCounts, ResultParser, SearchResults};
pub use schema::{ConformanceIssue, DataType, FieldMapping, Schema};
pub use search::{
    QueryExecutor, SearchOutcome, SearchParams, SearchRequest, Searcher, SortOrder, Suggester,
    Suggestion, Suggestions,
};
