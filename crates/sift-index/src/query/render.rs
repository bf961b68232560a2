//! Rendering of compiled queries into the engine's JSON query language.

use serde_json::{Map, Value, json};
use sift_config::RangeSpec;

use super::ir::{Aggregation, AggregationKind, CompiledQuery, Filter, TextClause};

/// Name of the filter aggregation inside each facet's global aggregation.
pub const FILTERED_AGG: &str = "filtered";

/// Name of the innermost aggregation that holds a facet's buckets.
pub const FACET_AGG: &str = "facet";

/// Renders a compiled query as a search body with `query` and `aggs`.
pub fn render(query: &CompiledQuery) -> Value {
    let mut body = Map::new();
    body.insert(
        "query".into(),
        json!({
            "bool": {
                "must": [render_text(&query.text)],
                "filter": render_filter(&query.filter),
            }
        }),
    );
    if !query.aggregations.is_empty() {
        let aggs: Map<String, Value> = query
            .aggregations
            .iter()
            .map(|agg| (agg.name.clone(), render_aggregation(agg)))
            .collect();
        body.insert("aggs".into(), Value::Object(aggs));
    }
    Value::Object(body)
}

/// Renders a scoring clause.
pub fn render_text(text: &TextClause) -> Value {
    match text {
        TextClause::MatchAll => json!({ "match_all": {} }),
        TextClause::MultiMatch {
            query,
            fields,
            fuzziness,
        } => {
            let mut body = Map::new();
            body.insert("query".into(), json!(query));
            body.insert("fields".into(), json!(fields));
            if let Some(fuzziness) = fuzziness {
                body.insert("fuzziness".into(), json!(fuzziness));
            }
            json!({ "multi_match": body })
        }
        TextClause::QueryString { query, fields } => {
            json!({ "query_string": { "query": query, "fields": fields } })
        }
        TextClause::Match { field, query } => {
            json!({ "match": { field.as_str(): { "query": query } } })
        }
    }
}

/// Renders a filter.
pub fn render_filter(filter: &Filter) -> Value {
    match filter {
        Filter::Term { field, value } => json!({ "term": { field.as_str(): value } }),
        Filter::Range { field, gte, lt } => {
            let mut bounds = Map::new();
            if let Some(gte) = gte {
                bounds.insert("gte".into(), number(*gte));
            }
            if let Some(lt) = lt {
                bounds.insert("lt".into(), number(*lt));
            }
            json!({ "range": { field.as_str(): bounds } })
        }
        Filter::Bool {
            must,
            should,
            minimum_should_match,
        } => {
            let mut body = Map::new();
            if !must.is_empty() {
                body.insert("must".into(), must.iter().map(render_filter).collect());
            }
            if !should.is_empty() {
                body.insert("should".into(), should.iter().map(render_filter).collect());
            }
            if let Some(minimum) = minimum_should_match {
                body.insert("minimum_should_match".into(), json!(minimum));
            }
            json!({ "bool": body })
        }
        Filter::Nested { path, filter } => {
            json!({ "nested": { "path": path, "query": render_filter(filter) } })
        }
        Filter::Text(text) => render_text(text),
    }
}

/// Renders one facet as `global` → `filter` → buckets.
///
/// The global wrapper detaches the counts from the hit query; the filter applies the
/// aggregation's own restriction instead.
pub fn render_aggregation(agg: &Aggregation) -> Value {
    let buckets = match &agg.kind {
        AggregationKind::Terms { field, size } => {
            json!({ "terms": { "field": field, "size": size } })
        }
        AggregationKind::Range { field, ranges } => {
            let ranges: Vec<Value> = ranges.iter().map(render_range).collect();
            json!({ "range": { "field": field, "ranges": ranges } })
        }
    };
    let buckets = nest_aggregation(&agg.name, buckets);

    json!({
        "global": {},
        "aggs": {
            FILTERED_AGG: {
                "filter": render_filter(&agg.filter),
                "aggs": { FACET_AGG: buckets },
            }
        }
    })
}

/// Wraps a bucket aggregation in one nested aggregation per dotted level of the facet.
fn nest_aggregation(facet: &str, buckets: Value) -> Value {
    let segments: Vec<&str> = facet.split('.').collect();
    (1..segments.len()).rev().fold(buckets, |inner, depth| {
        json!({
            "nested": { "path": segments[..depth].join(".") },
            "aggs": { FACET_AGG: inner },
        })
    })
}

/// Renders a range bucket; the key is sent only when configured explicitly.
fn render_range(spec: &RangeSpec) -> Value {
    let mut range = Map::new();
    if let Some(from) = spec.from {
        range.insert("from".into(), number(from));
    }
    if let Some(to) = spec.to {
        range.insert("to".into(), number(to));
    }
    if let Some(key) = &spec.key {
        range.insert("key".into(), json!(key));
    }
    Value::Object(range)
}

/// Renders whole numbers as JSON integers.
fn number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        json!(value as i64)
    } else {
        json!(value)
    }
}
