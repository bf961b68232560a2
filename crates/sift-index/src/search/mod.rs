//! Search execution against an external engine.
//!
//! The crate never talks to an engine itself. A [`Searcher`] compiles and renders a
//! request, hands it to a caller-supplied [`QueryExecutor`] and parses the response.

mod suggest;

use serde_json::{Value, json};
use sift_config::Config;
use tracing::debug;

pub use self::suggest::{Suggester, Suggestion, Suggestions};
use crate::{
    error::{ExecutorError, SearchError},
    query::{FacetSelection, QueryCompiler, render},
    result::{ResultParser, SearchResults},
};

/// Sends a rendered request to the engine and returns its JSON response.
pub trait QueryExecutor {
    /// Executes a request. Retries and timeouts are the implementor's concern.
    fn execute(&self, request: &SearchRequest) -> Result<Value, ExecutorError>;
}

impl<F> QueryExecutor for F
where
    F: Fn(&SearchRequest) -> Result<Value, ExecutorError>,
{
    fn execute(&self, request: &SearchRequest) -> Result<Value, ExecutorError> {
        self(request)
    }
}

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Best score first.
    #[default]
    Relevance,
    /// Newest first, by the date field.
    Date,
}

/// Result window and ordering of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    /// Offset of the first hit.
    pub from: usize,
    /// Maximum number of hits.
    pub size: usize,
    /// Hit ordering.
    pub sort: SortOrder,
}

impl SearchParams {
    /// First page of the given size, by relevance.
    pub fn new(size: usize) -> Self {
        Self {
            from: 0,
            size,
            sort: SortOrder::Relevance,
        }
    }

    /// Moves the window to a zero-based page of the current size.
    ///
    /// The offset saturates rather than wrapping for pages past the end.
    pub fn page(mut self, index: usize) -> Self {
        self.from = index.saturating_mul(self.size);
        self
    }

    /// Sets the ordering.
    pub fn sorted_by(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }
}

/// A rendered request ready for the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Request body, including `from`, `size` and `sort`.
    pub body: Value,
    /// Window and ordering the body was rendered with.
    pub params: SearchParams,
}

/// What a search produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// No text, no facet filter and no facet: the engine was not asked.
    NothingToQuery,
    /// Parsed engine response.
    Found(SearchResults),
}

/// Compiles, executes and parses searches.
pub struct Searcher<'a> {
    /// Query compiler.
    compiler: QueryCompiler<'a>,
    /// Response parser.
    parser: ResultParser<'a>,
}

impl<'a> Searcher<'a> {
    /// Creates a searcher.
    pub fn new(config: &'a Config) -> Self {
        Self {
            compiler: QueryCompiler::new(config),
            parser: ResultParser::new(&config.fields),
        }
    }

    /// Returns the compiler, for registering hooks.
    pub fn compiler_mut(&mut self) -> &mut QueryCompiler<'a> {
        &mut self.compiler
    }

    /// Returns the parser, for registering hooks.
    pub fn parser_mut(&mut self) -> &mut ResultParser<'a> {
        &mut self.parser
    }

    /// Returns the first page with the configured page size.
    pub fn default_params(&self) -> SearchParams {
        SearchParams::new(self.compiler.config().search.page_size)
    }

    /// Compiles and renders a request, or returns `None` if there is nothing to query.
    pub fn request(
        &self,
        text: &str,
        selection: &FacetSelection,
        params: SearchParams,
    ) -> Option<SearchRequest> {
        let query = self.compiler.compile(text, selection)?;
        let mut body = render(&query);
        if let Some(obj) = body.as_object_mut() {
            obj.insert("from".into(), json!(params.from));
            obj.insert("size".into(), json!(params.size));
            obj.insert("sort".into(), self.sort_clause(params.sort));
        }
        Some(SearchRequest { body, params })
    }

    /// Runs a search through an executor.
    pub fn search(
        &self,
        executor: &dyn QueryExecutor,
        text: &str,
        selection: &FacetSelection,
        params: SearchParams,
    ) -> Result<SearchOutcome, SearchError> {
        let Some(request) = self.request(text, selection, params) else {
            return Ok(SearchOutcome::NothingToQuery);
        };
        let response = executor.execute(&request).map_err(SearchError::Executor)?;
        let results = self.parser.parse(&response)?;
        debug!(total = results.total, hits = results.ids.len(), "search complete");
        Ok(SearchOutcome::Found(results))
    }

    /// Renders the sort clause of an ordering.
    fn sort_clause(&self, sort: SortOrder) -> Value {
        match sort {
            SortOrder::Relevance => json!([{ "_score": "desc" }]),
            SortOrder::Date => {
                let date = &self.compiler.config().fields.canonical.date;
                json!([{ date.as_str(): "desc" }])
            }
        }
    }
}
