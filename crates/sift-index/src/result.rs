//! Parsing of engine search responses.
//!
//! A response is reduced to the total hit count, the hit ids, the hit sources and one
//! key → count map per facet. Facet buckets are looked up at any depth below the
//! aggregation named after the facet, so the `global`/`filter`/`nested` wrappers added
//! by rendering need no special handling.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Value};
use sift_config::{FieldConfig, format_bound, range_key};
use sift_document::{Document, HookChain};
use tracing::debug;

use crate::error::SearchError;

/// Bucket counts of one facet, in response order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetCounts(Vec<(String, u64)>);

impl FacetCounts {
    /// Returns the count of a bucket.
    pub fn get(&self, key: &str) -> Option<u64> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, count)| *count)
    }

    /// Iterates over buckets in response order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, count)| (k.as_str(), *count))
    }

    /// Returns the number of buckets.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the facet has no buckets.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends a bucket.
    fn push(&mut self, key: String, count: u64) {
        self.0.push((key, count));
    }
}

impl Serialize for FacetCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, count) in &self.0 {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

/// A parsed search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchResults {
    /// Total number of matching documents.
    pub total: u64,
    /// Ids of the returned hits, in rank order.
    pub ids: Vec<String>,
    /// Sources of the returned hits with their id under `"id"`.
    pub results: Vec<Document>,
    /// Bucket counts by facet name.
    pub facets: BTreeMap<String, FacetCounts>,
}

/// Parses engine responses.
pub struct ResultParser<'a> {
    /// Field configuration, used to key range buckets.
    fields: &'a FieldConfig,
    /// Hooks over the parsed results; the context is the raw response.
    hooks: HookChain<Value, SearchResults>,
}

impl<'a> ResultParser<'a> {
    /// Creates a parser.
    pub fn new(fields: &'a FieldConfig) -> Self {
        Self {
            fields,
            hooks: HookChain::new(),
        }
    }

    /// Registers a hook over parsed results.
    pub fn hook<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&Value, SearchResults) -> SearchResults + Send + Sync + 'static,
    {
        self.hooks.push(hook);
        self
    }

    /// Parses a response.
    ///
    /// Fails only when `hits.total` is missing or malformed; unreadable hits and
    /// buckets are skipped.
    pub fn parse(&self, response: &Value) -> Result<SearchResults, SearchError> {
        let hits = response
            .get("hits")
            .ok_or_else(|| SearchError::InvalidResponse("missing 'hits'".into()))?;
        let total = parse_total(hits.get("total")).ok_or_else(|| {
            SearchError::InvalidResponse("missing or malformed 'hits.total'".into())
        })?;

        let mut results = SearchResults {
            total,
            ..SearchResults::default()
        };

        for hit in hits.get("hits").and_then(Value::as_array).into_iter().flatten() {
            let Some(id) = hit.get("_id").and_then(scalar_string) else {
                debug!("skipping hit without an id");
                continue;
            };
            let mut source: Document = hit
                .get("_source")
                .and_then(Value::as_object)
                .cloned()
                .map(Document::from)
                .unwrap_or_default();
            source.insert("id", Value::String(id.clone()));
            results.ids.push(id);
            results.results.push(source);
        }

        if let Some(aggs) = response.get("aggregations").and_then(Value::as_object) {
            for (name, agg) in aggs {
                match find_buckets(agg) {
                    Some(buckets) => {
                        let counts = self.facet_counts(name, buckets);
                        results.facets.insert(name.clone(), counts);
                    }
                    None => debug!(facet = name.as_str(), "aggregation without buckets"),
                }
            }
        }

        Ok(self.hooks.apply(response, results))
    }

    /// Reads the buckets of one facet.
    fn facet_counts(&self, facet: &str, buckets: &[Value]) -> FacetCounts {
        let mut counts = FacetCounts::default();
        for bucket in buckets {
            let key = self.bucket_key(facet, bucket);
            let count = bucket.get("doc_count").and_then(Value::as_u64);
            match (key, count) {
                (Some(key), Some(count)) => counts.push(key, count),
                _ => debug!(facet, "skipping malformed bucket"),
            }
        }
        counts
    }

    /// Returns a bucket's key.
    ///
    /// Range buckets are keyed by their bounds so the key can be selected again: a
    /// configured bucket with the same bounds lends its key, any other range renders as
    /// `"<from>-<to>"`.
    fn bucket_key(&self, facet: &str, bucket: &Value) -> Option<String> {
        if bucket.get("from").is_some() || bucket.get("to").is_some() {
            let from = bucket.get("from").and_then(Value::as_f64);
            let to = bucket.get("to").and_then(Value::as_f64);
            let configured = self
                .fields
                .ranges(facet)
                .iter()
                .find(|spec| spec.from == from && spec.to == to);
            return Some(configured.map_or_else(|| range_key(from, to), |spec| spec.key()));
        }
        bucket
            .get("key_as_string")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| bucket.get("key").and_then(scalar_string))
    }
}

/// Reads `hits.total` as a number or as `{"value": n}`.
pub fn parse_total(total: Option<&Value>) -> Option<u64> {
    match total? {
        Value::Number(n) => n.as_u64(),
        Value::Object(obj) => obj.get("value").and_then(Value::as_u64),
        _ => None,
    }
}

/// Renders a string or number as a key.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(format_bound(n.as_f64())),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Finds the first `buckets` array at any depth of an aggregation.
fn find_buckets(agg: &Value) -> Option<&[Value]> {
    let obj: &Map<String, Value> = agg.as_object()?;
    if let Some(buckets) = obj.get("buckets").and_then(Value::as_array) {
        return Some(buckets);
    }
    obj.values().filter(|v| v.is_object()).find_map(find_buckets)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sift_config::RangeSpec;

    use super::*;

    fn fields() -> FieldConfig {
        let mut custom = RangeSpec::new(Some(50.0), None);
        custom.key = Some("premium".into());
        FieldConfig {
            numeric: [("price".to_string(), true)].into(),
            ranges: [(
                "price".to_string(),
                vec![RangeSpec::new(None, Some(10.0)), custom],
            )]
            .into(),
            ..FieldConfig::default()
        }
    }

    fn response() -> Value {
        json!({
            "hits": {
                "total": { "value": 42, "relation": "eq" },
                "hits": [
                    { "_id": "12", "_source": { "post_title": "Trail shoes" } },
                    { "_id": 13, "_source": { "post_title": "Road shoes" } },
                    { "_source": { "post_title": "No id" } }
                ]
            },
            "aggregations": {
                "category": {
                    "doc_count": 42,
                    "filtered": {
                        "doc_count": 40,
                        "facet": {
                            "buckets": [
                                { "key": "shoes", "doc_count": 30 },
                                { "key": "socks", "doc_count": 10 }
                            ]
                        }
                    }
                },
                "price": {
                    "filtered": {
                        "facet": {
                            "buckets": [
                                { "key": "*-10.0", "to": 10.0, "doc_count": 5 },
                                { "key": "10.0-50.0", "from": 10.0, "to": 50.0, "doc_count": 7 },
                                { "key": "premium", "from": 50.0, "doc_count": 2 }
                            ]
                        }
                    }
                },
                "rating": {
                    "filtered": { "facet": { "buckets": [{ "key": 4.0, "doc_count": 3 }] } }
                }
            }
        })
    }

    #[test]
    fn parses_hits() {
        let fields = fields();
        let results = ResultParser::new(&fields).parse(&response()).unwrap();
        assert_eq!(results.total, 42);
        assert_eq!(results.ids, vec!["12", "13"]);
        assert_eq!(results.results[0].get("id"), Some(&json!("12")));
        assert_eq!(results.results[1].get("post_title"), Some(&json!("Road shoes")));
    }

    #[test]
    fn finds_buckets_below_wrappers() {
        let fields = fields();
        let results = ResultParser::new(&fields).parse(&response()).unwrap();
        let category = &results.facets["category"];
        assert_eq!(category.get("shoes"), Some(30));
        assert_eq!(category.iter().map(|(k, _)| k).collect::<Vec<_>>(), ["shoes", "socks"]);
        assert_eq!(results.facets["rating"].get("4"), Some(3));
    }

    #[test]
    fn range_buckets_use_selection_keys() {
        let fields = fields();
        let results = ResultParser::new(&fields).parse(&response()).unwrap();
        let price = &results.facets["price"];
        assert_eq!(price.get("-10"), Some(5));
        assert_eq!(price.get("10-50"), Some(7));
        assert_eq!(price.get("premium"), Some(2));
    }

    #[test]
    fn accepts_numeric_total() {
        let fields = fields();
        let results = ResultParser::new(&fields)
            .parse(&json!({ "hits": { "total": 3, "hits": [] } }))
            .unwrap();
        assert_eq!(results.total, 3);
        assert!(results.facets.is_empty());
    }

    #[test]
    fn rejects_missing_total() {
        let fields = fields();
        let parser = ResultParser::new(&fields);
        assert!(matches!(
            parser.parse(&json!({ "took": 1 })),
            Err(SearchError::InvalidResponse(_))
        ));
        assert!(matches!(
            parser.parse(&json!({ "hits": { "total": "many" } })),
            Err(SearchError::InvalidResponse(_))
        ));
    }

    #[test]
    fn hooks_rewrite_results() {
        let fields = fields();
        let mut parser = ResultParser::new(&fields);
        parser.hook(|response, mut results| {
            if response.get("timed_out") == Some(&json!(true)) {
                results.results.clear();
            }
            results
        });
        let mut response = response();
        response["timed_out"] = json!(true);
        let results = parser.parse(&response).unwrap();
        assert!(results.results.is_empty());
        assert_eq!(results.ids.len(), 2);
    }

    #[test]
    fn facet_counts_serialize_as_map() {
        let mut counts = FacetCounts::default();
        counts.push("b".into(), 2);
        counts.push("a".into(), 1);
        assert_eq!(serde_json::to_string(&counts).unwrap(), r#"{"b":2,"a":1}"#);
    }
}
