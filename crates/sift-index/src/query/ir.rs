//! Engine-independent query representation.
//!
//! The compiler produces these types; [`super::render`] turns them into the engine's
//! JSON query language.

use sift_config::RangeSpec;

/// How free text is matched.
#[derive(Debug, Clone, PartialEq)]
pub enum TextClause {
    /// Every document matches.
    MatchAll,
    /// Plain text matched against several weighted fields.
    MultiMatch {
        /// Search text.
        query: String,
        /// Fields with optional `^weight` suffixes.
        fields: Vec<String>,
        /// Edit-distance setting, present only for fuzzy searches.
        fuzziness: Option<String>,
    },
    /// User-authored boolean syntax passed to the engine's query-string parser.
    QueryString {
        /// Normalized query text.
        query: String,
        /// Default fields with optional `^weight` suffixes.
        fields: Vec<String>,
    },
    /// Text matched against one field.
    Match {
        /// Field name.
        field: String,
        /// Search text.
        query: String,
    },
}

impl TextClause {
    /// Returns true for [`TextClause::MatchAll`].
    pub fn is_match_all(&self) -> bool {
        matches!(self, Self::MatchAll)
    }
}

/// A non-scoring restriction on matching documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Exact value.
    Term {
        /// Field name.
        field: String,
        /// Required value.
        value: String,
    },
    /// Half-open numeric interval `[gte, lt)`; an absent bound is unbounded.
    Range {
        /// Field name.
        field: String,
        /// Inclusive lower bound.
        gte: Option<f64>,
        /// Exclusive upper bound.
        lt: Option<f64>,
    },
    /// Boolean combination.
    Bool {
        /// Filters that must all match.
        must: Vec<Filter>,
        /// Alternatives.
        should: Vec<Filter>,
        /// Number of alternatives that must match.
        minimum_should_match: Option<usize>,
    },
    /// Filter applied inside nested objects at `path`.
    Nested {
        /// Nested field path.
        path: String,
        /// Filter on the nested objects.
        filter: Box<Filter>,
    },
    /// A free-text clause used as a filter.
    Text(TextClause),
}

impl Filter {
    /// Exact-value filter.
    pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Term {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Filter that requires every filter to match.
    pub fn all(filters: Vec<Filter>) -> Self {
        Self::Bool {
            must: filters,
            should: Vec::new(),
            minimum_should_match: None,
        }
    }

    /// Filter that requires at least one filter to match.
    pub fn any(filters: Vec<Filter>) -> Self {
        Self::Bool {
            must: Vec::new(),
            should: filters,
            minimum_should_match: Some(1),
        }
    }

    /// Range filter from a configured bucket.
    pub fn range(field: impl Into<String>, spec: &RangeSpec) -> Self {
        Self::Range {
            field: field.into(),
            gte: spec.from,
            lt: spec.to,
        }
    }

    /// Wraps the filter in a nested filter for each nested level of a dotted field.
    ///
    /// `a.b.c` becomes nested(`a`, nested(`a.b`, filter)); undotted fields are returned
    /// unchanged.
    pub fn nest_for(self, field: &str) -> Self {
        let segments: Vec<&str> = field.split('.').collect();
        (1..segments.len()).rev().fold(self, |inner, depth| Self::Nested {
            path: segments[..depth].join("."),
            filter: Box::new(inner),
        })
    }
}

/// One facet's filter, kept separately so aggregations can leave it out.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetFilter {
    /// Facet name.
    pub facet: String,
    /// Filter built from the facet's selected values.
    pub filter: Filter,
}

/// What an aggregation counts.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationKind {
    /// Most frequent values.
    Terms {
        /// Field name.
        field: String,
        /// Maximum number of buckets.
        size: usize,
    },
    /// Documents per configured range bucket.
    Range {
        /// Field name.
        field: String,
        /// Buckets.
        ranges: Vec<RangeSpec>,
    },
}

impl AggregationKind {
    /// Returns the aggregated field.
    pub fn field(&self) -> &str {
        match self {
            Self::Terms { field, .. } | Self::Range { field, .. } => field,
        }
    }
}

/// Facet counts, computed independently of the hit query.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Facet name; also the response key.
    pub name: String,
    /// What is counted.
    pub kind: AggregationKind,
    /// Documents counted: partition, free text and every other facet's filter.
    pub filter: Filter,
}

/// A compiled search.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// Scoring clause.
    pub text: TextClause,
    /// Partition and facet filters applied to hits.
    pub filter: Filter,
    /// Facet counts in facet declaration order.
    pub aggregations: Vec<Aggregation>,
}
