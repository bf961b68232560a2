//! Query compilation: free text and facet selections to a [`CompiledQuery`].

use sift_config::Config;
use sift_document::HookChain;
use sift_query::analyze;
use tracing::debug;

use super::{
    aggregation::aggregations,
    facets::facet_filters,
    ir::{Aggregation, CompiledQuery, Filter, TextClause},
    selection::FacetSelection,
    text::text_clause,
};

/// The request a query is compiled from, handed to every compiler hook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryContext {
    /// Raw search text.
    pub text: String,
    /// Selected facet values.
    pub selection: FacetSelection,
}

/// Hook chains over each clause of a compiled query.
#[derive(Debug, Default)]
struct CompilerHooks {
    /// Scoring clause.
    text: HookChain<QueryContext, TextClause>,
    /// Combined hit filter.
    filter: HookChain<QueryContext, Filter>,
    /// Each facet aggregation.
    aggregation: HookChain<QueryContext, Aggregation>,
    /// The assembled query.
    query: HookChain<QueryContext, CompiledQuery>,
}

/// Compiles search requests against a configuration.
pub struct QueryCompiler<'a> {
    /// Loaded configuration.
    config: &'a Config,
    /// Extension hooks.
    hooks: CompilerHooks,
}

impl<'a> QueryCompiler<'a> {
    /// Creates a compiler.
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            hooks: CompilerHooks::default(),
        }
    }

    /// Registers a hook over the scoring clause.
    pub fn text_hook<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&QueryContext, TextClause) -> TextClause + Send + Sync + 'static,
    {
        self.hooks.text.push(hook);
        self
    }

    /// Registers a hook over the combined hit filter.
    pub fn filter_hook<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&QueryContext, Filter) -> Filter + Send + Sync + 'static,
    {
        self.hooks.filter.push(hook);
        self
    }

    /// Registers a hook over each facet aggregation.
    pub fn aggregation_hook<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&QueryContext, Aggregation) -> Aggregation + Send + Sync + 'static,
    {
        self.hooks.aggregation.push(hook);
        self
    }

    /// Registers a hook over the assembled query.
    pub fn query_hook<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&QueryContext, CompiledQuery) -> CompiledQuery + Send + Sync + 'static,
    {
        self.hooks.query.push(hook);
        self
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &Config {
        self.config
    }

    /// Restricts matches to the configured partition.
    pub fn partition_filter(&self) -> Filter {
        let index = &self.config.index;
        Filter::term(index.partition_field.clone(), index.partition.clone())
    }

    /// Compiles free text and a facet selection.
    ///
    /// Returns `None` when there is nothing to ask the engine: no text, no facet
    /// filter and no facet to count.
    pub fn compile(&self, text: &str, selection: &FacetSelection) -> Option<CompiledQuery> {
        let context = QueryContext {
            text: text.to_string(),
            selection: selection.clone(),
        };
        let fields = &self.config.fields;

        let text = text_clause(&analyze(text), fields, &self.config.search.fuzziness);
        let text = self.hooks.text.apply(&context, text);

        let contributions = facet_filters(fields, selection);
        let partition = self.partition_filter();
        let aggregations: Vec<Aggregation> =
            aggregations(self.config, &partition, &text, &contributions)
                .into_iter()
                .map(|agg| self.hooks.aggregation.apply(&context, agg))
                .collect();

        if text.is_match_all() && contributions.is_empty() && aggregations.is_empty() {
            debug!("nothing to query");
            return None;
        }

        let mut filters = vec![partition];
        filters.extend(contributions.into_iter().map(|c| c.filter));
        let filter = self.hooks.filter.apply(&context, Filter::all(filters));

        let query = CompiledQuery {
            text,
            filter,
            aggregations,
        };
        let query = self.hooks.query.apply(&context, query);
        debug!(
            text = %context.text,
            aggregations = query.aggregations.len(),
            "compiled query"
        );
        Some(query)
    }
}
