//! Autocomplete suggestions.

use serde::Serialize;
use serde_json::{Value, json};
use sift_config::Config;
use sift_document::SUGGEST_SUFFIX;
use tracing::debug;

use super::{QueryExecutor, SearchParams, SearchRequest};
use crate::{
    error::SearchError,
    query::{FacetSelection, Filter, facet_filters, render_filter},
    result::{parse_total, scalar_string},
};

/// One suggested document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    /// Document id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Link, when the document has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Parsed suggestions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Suggestions {
    /// Total number of matching documents.
    pub total: u64,
    /// Top suggestions in rank order.
    pub results: Vec<Suggestion>,
}

/// Builds autocomplete requests against the title's suggest field.
pub struct Suggester<'a> {
    /// Loaded configuration.
    config: &'a Config,
}

impl<'a> Suggester<'a> {
    /// Creates a suggester.
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Renders a suggestion request, or `None` for blank text.
    ///
    /// The category selection is filtered exactly like a search selection.
    pub fn request(&self, text: &str, categories: &FacetSelection) -> Option<SearchRequest> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let fields = &self.config.fields;
        let index = &self.config.index;
        let canonical = &fields.canonical;

        let mut filters = vec![Filter::term(
            index.partition_field.clone(),
            index.partition.clone(),
        )];
        filters.extend(facet_filters(fields, categories).into_iter().map(|c| c.filter));

        let params = SearchParams::new(self.config.search.suggest_size);
        let suggest_field = format!("{}{SUGGEST_SUFFIX}", canonical.title);
        let body = json!({
            "query": {
                "bool": {
                    "must": [{ "match": { suggest_field: { "query": text.to_lowercase() } } }],
                    "filter": render_filter(&Filter::all(filters)),
                }
            },
            "_source": [&canonical.content_type, &canonical.title, &canonical.link],
            "from": params.from,
            "size": params.size,
        });
        Some(SearchRequest { body, params })
    }

    /// Runs a suggestion request. Blank text yields no suggestions without a request.
    pub fn suggest(
        &self,
        executor: &dyn QueryExecutor,
        text: &str,
        categories: &FacetSelection,
    ) -> Result<Suggestions, SearchError> {
        let Some(request) = self.request(text, categories) else {
            return Ok(Suggestions::default());
        };
        let response = executor.execute(&request).map_err(SearchError::Executor)?;
        self.parse(&response)
    }

    /// Parses a suggestion response.
    ///
    /// Values are read from `_source`, or from `fields` where the engine returns each
    /// value as a one-element list.
    pub fn parse(&self, response: &Value) -> Result<Suggestions, SearchError> {
        let hits = response
            .get("hits")
            .ok_or_else(|| SearchError::InvalidResponse("missing 'hits'".into()))?;
        let total = parse_total(hits.get("total")).ok_or_else(|| {
            SearchError::InvalidResponse("missing or malformed 'hits.total'".into())
        })?;

        let canonical = &self.config.fields.canonical;
        let mut results = Vec::new();
        for hit in hits.get("hits").and_then(Value::as_array).into_iter().flatten() {
            let Some(id) = hit.get("_id").and_then(scalar_string) else {
                debug!("skipping suggestion without an id");
                continue;
            };
            results.push(Suggestion {
                id,
                title: hit_value(hit, &canonical.title).unwrap_or_default(),
                link: hit_value(hit, &canonical.link),
            });
        }
        Ok(Suggestions { total, results })
    }
}

/// Reads a string field of a hit from `_source` or `fields`.
fn hit_value(hit: &Value, field: &str) -> Option<String> {
    let value = hit
        .get("_source")
        .and_then(|source| source.get(field))
        .or_else(|| hit.get("fields")?.get(field)?.get(0))?;
    value.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use sift_config::FieldConfig;

    use super::*;
    use crate::{error::ExecutorError, result::ResultParser};

    fn config() -> Config {
        Config {
            fields: FieldConfig {
                taxonomies: vec!["category".into()],
                ..FieldConfig::default()
            },
            ..Config::default()
        }
    }

    #[test]
    fn request_matches_lowercased_text_on_suggest_field() {
        let config = config();
        let request = Suggester::new(&config)
            .request("  Trail Sh ", &FacetSelection::new())
            .unwrap();
        assert_eq!(
            request.body["query"]["bool"]["must"][0],
            json!({ "match": { "post_title_suggest": { "query": "trail sh" } } })
        );
        assert_eq!(
            request.body["query"]["bool"]["filter"],
            json!({ "bool": { "must": [{ "term": { "blog_id": "1" } }] } })
        );
        assert_eq!(request.body["size"], json!(5));
        assert_eq!(request.body["_source"], json!(["post_type", "post_title", "link"]));
    }

    #[test]
    fn categories_use_facet_filters() {
        let config = config();
        let mut categories = FacetSelection::new();
        categories.any_of("category", "shoes").any_of("category", "socks");
        let request = Suggester::new(&config).request("tr", &categories).unwrap();
        assert_eq!(
            request.body["query"]["bool"]["filter"]["bool"]["must"][1],
            json!({
                "bool": {
                    "should": [
                        { "term": { "category": "shoes" } },
                        { "term": { "category": "socks" } }
                    ],
                    "minimum_should_match": 1
                }
            })
        );
    }

    #[test]
    fn blank_text_does_not_execute() {
        let config = config();
        let calls = Cell::new(0);
        let executor = |_: &SearchRequest| -> Result<Value, ExecutorError> {
            calls.set(calls.get() + 1);
            Ok(json!({}))
        };
        let suggestions = Suggester::new(&config)
            .suggest(&executor, "   ", &FacetSelection::new())
            .unwrap();
        assert_eq!(suggestions, Suggestions::default());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn parses_source_and_fields_hits() {
        let config = config();
        let response = json!({
            "hits": {
                "total": 2,
                "hits": [
                    { "_id": "4", "_source": { "post_title": "Trail shoes", "link": "/trail" } },
                    { "_id": 5, "fields": { "post_title": ["Trail socks"] } }
                ]
            }
        });
        let suggestions = Suggester::new(&config).parse(&response).unwrap();
        assert_eq!(suggestions.total, 2);
        assert_eq!(
            suggestions.results,
            vec![
                Suggestion {
                    id: "4".into(),
                    title: "Trail shoes".into(),
                    link: Some("/trail".into()),
                },
                Suggestion {
                    id: "5".into(),
                    title: "Trail socks".into(),
                    link: None,
                },
            ]
        );
    }

    #[test]
    fn ids_and_totals_read_like_search_results() {
        let config = config();
        let response = json!({
            "hits": {
                "total": { "value": 3 },
                "hits": [
                    { "_id": 5.0, "_source": { "post_title": "Trail socks" } },
                    { "_source": { "post_title": "No id" } }
                ]
            }
        });
        let suggestions = Suggester::new(&config).parse(&response).unwrap();
        let results = ResultParser::new(&config.fields).parse(&response).unwrap();

        assert_eq!(suggestions.total, results.total);
        let ids: Vec<&str> = suggestions.results.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["5"]);
        assert_eq!(results.ids, vec!["5"]);
    }
}
