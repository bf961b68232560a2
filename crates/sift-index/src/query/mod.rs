//! Faceted query compilation.
//!
//! Search text and a facet selection are compiled into an engine-independent
//! [`CompiledQuery`] by the [`QueryCompiler`], then rendered into the engine's JSON
//! query language by [`render`].

mod aggregation;
mod compile;
mod facets;
mod ir;
mod render;
mod selection;
mod text;

pub use aggregation::aggregations;
pub use compile::{QueryCompiler, QueryContext};
pub use facets::facet_filters;
pub use ir::{
    Aggregation, AggregationKind, CompiledQuery, FacetFilter, Filter, TextClause,
};
pub use render::{FACET_AGG, FILTERED_AGG, render, render_aggregation, render_filter, render_text};
pub use selection::{FacetSelection, FacetValues};
pub use text::{search_fields, text_clause};
