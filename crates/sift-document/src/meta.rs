//! Metadata extraction.
//!
//! Configured metadata paths are dotted (`urls.title`); each `.` descends one nested
//! level. List positions do not appear in paths, so `urls.title` selects the `title`
//! of every element of a `urls` list.
//!
//! Records carry metadata either as a structured [`MetaValue`] tree or as a flat bag
//! whose repeating groups are encoded in the key (`urls_0_title`, `urls_1_title`). The
//! flat form is rebuilt into a tree first, so both forms produce the same document
//! shape.

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::{Map, Value};
use sift_config::FieldConfig;
use tracing::debug;

use crate::{
    record::{MetaValue, Record},
    text::{coerce_numeric, is_blank},
};

/// Selection tree built from the configured metadata paths.
#[derive(Debug, Default)]
struct PathNode {
    /// Full dotted path if this node is itself a configured path.
    selected: Option<String>,
    /// Child segments in declaration order.
    children: Vec<(String, PathNode)>,
}

impl PathNode {
    /// Builds the tree for a list of dotted paths.
    fn from_paths(paths: &[String]) -> Self {
        let mut root = Self::default();
        for path in paths {
            let mut node = &mut root;
            for segment in path.split('.') {
                node = node.child_mut(segment);
            }
            node.selected = Some(path.clone());
        }
        root
    }

    /// Returns the named child, creating it if needed.
    fn child_mut(&mut self, segment: &str) -> &mut PathNode {
        let index = match self.children.iter().position(|(name, _)| name == segment) {
            Some(index) => index,
            None => {
                self.children.push((segment.to_string(), PathNode::default()));
                self.children.len() - 1
            }
        };
        &mut self.children[index].1
    }
}

/// Extracts configured metadata from a record.
///
/// Uses the structured tree when present, otherwise the flat bag. The result lists
/// top-level fields in the order their paths are first declared.
pub fn extract(record: &Record, config: &FieldConfig) -> Map<String, Value> {
    if config.meta_fields.is_empty() {
        return Map::new();
    }
    let paths = PathNode::from_paths(&config.meta_fields);
    let rebuilt;
    let tree = match &record.meta {
        Some(tree) => tree,
        None if record.flat_meta.is_empty() => return Map::new(),
        None => {
            rebuilt = unflatten(&record.flat_meta, &config.meta_fields);
            &rebuilt
        }
    };

    match select_object(tree, &paths, config) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Selects the configured children of an object node.
fn select_object(value: &MetaValue, node: &PathNode, config: &FieldConfig) -> Option<Value> {
    let MetaValue::Object(entries) = value else {
        return None;
    };
    let mut out = Map::new();
    for (segment, child) in &node.children {
        if let Some(found) = entries.get(segment)
            && let Some(selected) = select(found, child, config)
        {
            out.insert(segment.clone(), selected);
        }
    }
    (!out.is_empty()).then_some(Value::Object(out))
}

/// Selects from a value at a path node, collapsing list positions.
fn select(value: &MetaValue, node: &PathNode, config: &FieldConfig) -> Option<Value> {
    match value {
        MetaValue::Scalar(v) => {
            let path = node.selected.as_deref()?;
            if is_blank(v) {
                return None;
            }
            Some(if config.is_numeric(path) {
                coerce_numeric(v.clone())
            } else {
                v.clone()
            })
        }
        MetaValue::List(items) => {
            let mut out = Vec::new();
            for item in items {
                match select(item, node, config) {
                    Some(Value::Array(nested)) => out.extend(nested),
                    Some(selected) => out.push(selected),
                    None => {}
                }
            }
            (!out.is_empty()).then_some(Value::Array(out))
        }
        MetaValue::Object(_) => {
            if node.children.is_empty() {
                debug!(path = ?node.selected, "metadata object at a leaf path, skipping");
                return None;
            }
            select_object(value, node, config)
        }
    }
}

/// Intermediate tree used to rebuild flat metadata.
#[derive(Debug)]
enum FlatNode {
    /// A leaf value.
    Value(Value),
    /// A repeating group keyed by position.
    Items(BTreeMap<usize, BTreeMap<String, FlatNode>>),
}

impl FlatNode {
    /// Converts the node into a metadata tree, ordering items by position.
    fn into_meta(self) -> MetaValue {
        match self {
            Self::Value(v) => MetaValue::from(v),
            Self::Items(items) => MetaValue::List(
                items
                    .into_values()
                    .map(|fields| MetaValue::Object(into_meta_object(fields)))
                    .collect(),
            ),
        }
    }
}

/// Converts a map of flat nodes into metadata object entries.
fn into_meta_object(fields: BTreeMap<String, FlatNode>) -> BTreeMap<String, MetaValue> {
    fields
        .into_iter()
        .map(|(k, v)| (k, v.into_meta()))
        .collect()
}

/// Builds the key pattern for a dotted path: `urls.title` matches `urls_0_title`.
fn flat_key_pattern(path: &str) -> Option<Regex> {
    let body = path
        .split('.')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("_([0-9]+)_");
    match Regex::new(&format!("^{body}$")) {
        Ok(re) => Some(re),
        Err(e) => {
            debug!(path, error = %e, "invalid metadata key pattern");
            None
        }
    }
}

/// Rebuilds a metadata tree from flat keys.
fn unflatten(flat: &Map<String, Value>, paths: &[String]) -> MetaValue {
    let mut root: BTreeMap<String, FlatNode> = BTreeMap::new();

    for path in paths {
        if !path.contains('.') {
            if let Some(value) = flat.get(path) {
                root.entry(path.clone())
                    .or_insert_with(|| FlatNode::Value(value.clone()));
            }
            continue;
        }

        let Some(pattern) = flat_key_pattern(path) else {
            continue;
        };
        let segments: Vec<&str> = path.split('.').collect();
        for (key, value) in flat {
            let Some(captures) = pattern.captures(key) else {
                continue;
            };
            let indices: Option<Vec<usize>> = captures
                .iter()
                .skip(1)
                .map(|m| m.and_then(|m| m.as_str().parse().ok()))
                .collect();
            match indices {
                Some(indices) => insert_flat(&mut root, &segments, &indices, value.clone()),
                None => debug!(key, "metadata key index out of range"),
            }
        }
    }

    MetaValue::Object(into_meta_object(root))
}

/// Inserts a value at `segments`, descending into item `indices[i]` after segment `i`.
fn insert_flat(
    object: &mut BTreeMap<String, FlatNode>,
    segments: &[&str],
    indices: &[usize],
    value: Value,
) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };
    if rest.is_empty() {
        object
            .entry((*first).to_string())
            .or_insert(FlatNode::Value(value));
        return;
    }
    let Some((index, rest_indices)) = indices.split_first() else {
        return;
    };
    let entry = object
        .entry((*first).to_string())
        .or_insert_with(|| FlatNode::Items(BTreeMap::new()));
    match entry {
        FlatNode::Items(items) => {
            let item = items.entry(*index).or_default();
            insert_flat(item, rest, rest_indices, value);
        }
        FlatNode::Value(_) => debug!(field = first, "flat metadata key conflicts with a plain value"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn config(paths: &[&str]) -> FieldConfig {
        FieldConfig {
            meta_fields: paths.iter().map(|p| (*p).to_string()).collect(),
            ..FieldConfig::default()
        }
    }

    fn structured(meta: Value, paths: &[&str]) -> Value {
        let record = Record::new("1").with_meta(meta);
        Value::Object(extract(&record, &config(paths)))
    }

    #[test]
    fn selects_only_configured_paths() {
        let out = structured(
            json!({"color": "red", "secret": "x", "size": ["9", "10"]}),
            &["color", "size"],
        );
        assert_eq!(out, json!({"color": "red", "size": ["9", "10"]}));
    }

    #[test]
    fn list_of_objects_keeps_matching_sub_fields() {
        let out = structured(
            json!({"urls": [
                {"title": "Docs", "href": "/docs", "internal": 1},
                {"title": "Blog", "href": "/blog"}
            ]}),
            &["urls.title", "urls.href"],
        );
        assert_eq!(
            out,
            json!({"urls": [
                {"title": "Docs", "href": "/docs"},
                {"title": "Blog", "href": "/blog"}
            ]})
        );
    }

    #[test]
    fn nested_object_becomes_nested_document() {
        let out = structured(
            json!({"specs": {"color": "red", "weight": "", "other": 1}}),
            &["specs.color", "specs.weight"],
        );
        assert_eq!(out, json!({"specs": {"color": "red"}}));
    }

    #[test]
    fn blank_values_are_skipped() {
        let out = structured(json!({"color": null, "size": ["", "9"]}), &["color", "size"]);
        assert_eq!(out, json!({"size": ["9"]}));
    }

    #[test]
    fn output_follows_declaration_order() {
        let out = structured(json!({"a": "1", "b": "2"}), &["b", "a"]);
        let Value::Object(map) = out else {
            panic!("expected object");
        };
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn numeric_paths_are_coerced() {
        let mut config = config(&["price", "urls.rank"]);
        config.numeric.insert("price".into(), true);
        config.numeric.insert("urls.rank".into(), true);
        let record = Record::new("1").with_meta(json!({"price": "19.5", "urls": [{"rank": "2"}]}));
        assert_eq!(
            Value::Object(extract(&record, &config)),
            json!({"price": 19.5, "urls": [{"rank": 2}]})
        );
    }

    #[test]
    fn scalar_where_object_expected_is_skipped() {
        let out = structured(json!({"urls": "not a list"}), &["urls.title"]);
        assert_eq!(out, json!({}));
    }

    #[test]
    fn flat_fallback_direct_keys() {
        let record = Record::new("1")
            .with_flat_meta("color", "red")
            .with_flat_meta("ignored", "x");
        assert_eq!(
            Value::Object(extract(&record, &config(&["color"]))),
            json!({"color": "red"})
        );
    }

    #[test]
    fn flat_fallback_rebuilds_repeating_groups() {
        let record = Record::new("1")
            .with_flat_meta("urls_1_title", "Blog")
            .with_flat_meta("urls_0_title", "Docs")
            .with_flat_meta("urls_0_href", "/docs")
            .with_flat_meta("urls_10_title", "Last")
            .with_flat_meta("urls", "3")
            .with_flat_meta("urls_x_title", "bad");
        assert_eq!(
            Value::Object(extract(&record, &config(&["urls.title", "urls.href"]))),
            json!({"urls": [
                {"title": "Docs", "href": "/docs"},
                {"title": "Blog"},
                {"title": "Last"}
            ]})
        );
    }

    #[test]
    fn flat_pattern_is_anchored_and_escaped() {
        let pattern = flat_key_pattern("a.b").unwrap();
        assert!(pattern.is_match("a_0_b"));
        assert!(pattern.is_match("a_12_b"));
        assert!(!pattern.is_match("xa_0_b"));
        assert!(!pattern.is_match("a_0_bc"));
        assert!(!pattern.is_match("a_0_b_1_c"));

        let dotted = flat_key_pattern("a+.b").unwrap();
        assert!(dotted.is_match("a+_3_b"));
    }

    #[test]
    fn structured_tree_wins_over_flat() {
        let record = Record::new("1")
            .with_meta(json!({"color": "blue"}))
            .with_flat_meta("color", "red");
        assert_eq!(
            Value::Object(extract(&record, &config(&["color"]))),
            json!({"color": "blue"})
        );
    }
}
