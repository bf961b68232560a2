//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying
//! precedence rules.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use toml::Value;

use crate::{
    CanonicalFields, Config, FieldConfig, IndexSettings, SearchSettings,
    parse::{RawCanonical, RawConfig, RawFieldConfig, RawIndexSettings, RawSearchSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings and lists: first defined value wins (highest precedence)
/// - Keyed tables (flags, scores, ranges, ancestors, per-type taxonomies, facet sizes):
///   merged by key, first definition for each key wins
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    if configs.is_empty() {
        return Config::default();
    }

    let mut index = IndexSettings::default();
    let mut search = SearchSettings::default();
    let mut fields = FieldConfig::default();
    let mut search_exclude_set = false;

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref raw) = parsed.config.index {
            apply_raw_index(&mut index, raw);
        }
        if let Some(ref raw) = parsed.config.search {
            apply_raw_search(&mut search, raw);
        }
        if let Some(ref raw) = parsed.config.fields {
            search_exclude_set |= raw.search_exclude.is_some();
            apply_raw_fields(&mut fields, raw);
        }
    }

    // The default exclusion follows a renamed date field.
    if !search_exclude_set {
        fields.search_exclude = vec![fields.canonical.date.clone()];
    }

    let config_root = configs
        .first()
        .and_then(|c| c.path.parent().map(Path::to_path_buf));

    Config {
        index,
        search,
        fields,
        config_root,
    }
}

/// Applies raw index settings to result, overwriting any present values.
fn apply_raw_index(result: &mut IndexSettings, raw: &RawIndexSettings) {
    if let Some(ref v) = raw.partition_field {
        result.partition_field = v.clone();
    }
    if let Some(ref v) = raw.partition {
        result.partition = match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    }
    if let Some(v) = raw.shards {
        result.shards = v;
    }
    if let Some(v) = raw.replicas {
        result.replicas = v;
    }
    if let Some(ref v) = raw.content_types {
        result.content_types = v.clone();
    }
}

/// Applies raw search settings to result.
fn apply_raw_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    if let Some(v) = raw.facet_size {
        result.facet_size = v;
    }
    if let Some(v) = raw.suggest_size {
        result.suggest_size = v;
    }
    if let Some(v) = raw.page_size {
        result.page_size = v;
    }
    if let Some(ref v) = raw.fuzziness {
        result.fuzziness = v.clone();
    }
    if let Some(ref v) = raw.facet_sizes {
        extend(&mut result.facet_sizes, v);
    }
}

/// Applies raw field configuration to result.
fn apply_raw_fields(result: &mut FieldConfig, raw: &RawFieldConfig) {
    if let Some(ref v) = raw.fields {
        result.fields = v.clone();
    }
    if let Some(ref v) = raw.meta_fields {
        result.meta_fields = v.clone();
    }
    if let Some(ref v) = raw.taxonomies {
        result.taxonomies = v.clone();
    }
    if let Some(ref v) = raw.facets {
        result.facets = v.clone();
    }
    if let Some(ref v) = raw.search_exclude {
        result.search_exclude = v.clone();
    }
    if let Some(ref v) = raw.analyzer_language {
        result.analyzer_language = v.clone();
    }
    if let Some(ref v) = raw.numeric {
        extend(&mut result.numeric, &v.clone().into_map());
    }
    if let Some(ref v) = raw.not_analyzed {
        extend(&mut result.not_analyzed, &v.clone().into_map());
    }
    if let Some(ref scores) = raw.scores {
        if let Some(ref v) = scores.field {
            extend(&mut result.scores.field, v);
        }
        if let Some(ref v) = scores.meta {
            extend(&mut result.scores.meta, v);
        }
        if let Some(ref v) = scores.taxonomy {
            extend(&mut result.scores.taxonomy, v);
        }
    }
    if let Some(ref v) = raw.ranges {
        extend(&mut result.ranges, v);
    }
    if let Some(ref v) = raw.ancestors {
        extend(&mut result.ancestors, v);
    }
    if let Some(ref v) = raw.type_taxonomies {
        extend(&mut result.type_taxonomies, v);
    }
    if let Some(ref v) = raw.canonical {
        apply_raw_canonical(&mut result.canonical, v);
    }
}

/// Applies raw canonical field names to result.
fn apply_raw_canonical(result: &mut CanonicalFields, raw: &RawCanonical) {
    if let Some(ref v) = raw.title {
        result.title = v.clone();
    }
    if let Some(ref v) = raw.content {
        result.content = v.clone();
    }
    if let Some(ref v) = raw.date {
        result.date = v.clone();
    }
    if let Some(ref v) = raw.content_type {
        result.content_type = v.clone();
    }
    if let Some(ref v) = raw.link {
        result.link = v.clone();
    }
}

/// Overwrites entries of `target` with those of `source`.
fn extend<V: Clone>(target: &mut BTreeMap<String, V>, source: &BTreeMap<String, V>) {
    target.extend(source.iter().map(|(k, v)| (k.clone(), v.clone())));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RangeSpec, parse::parse_config_str};

    fn parsed(path: &str, toml: &str) -> ParsedConfig {
        ParsedConfig {
            path: PathBuf::from(path),
            config: parse_config_str(toml, Path::new(path)).unwrap(),
        }
    }

    #[test]
    fn test_merge_empty() {
        let config = merge_configs(&[]);
        assert!(config.config_root.is_none());
        assert_eq!(config.index, IndexSettings::default());
    }

    #[test]
    fn test_merge_single_sets_config_root() {
        let config = merge_configs(&[parsed(
            "/project/.sift.toml",
            "[search]\nfacet_size = 20\n",
        )]);
        assert_eq!(config.search.facet_size, 20);
        assert_eq!(config.config_root, Some(PathBuf::from("/project")));
    }

    #[test]
    fn test_merge_scalar_precedence() {
        let local = parsed(
            "/project/.sift.toml",
            "[index]\npartition = 3\n[search]\nfacet_size = 20\n",
        );
        let global = parsed(
            "/home/.sift.toml",
            "[index]\npartition = \"9\"\nshards = 2\n[search]\nfacet_size = 50\nsuggest_size = 8\n",
        );
        let config = merge_configs(&[local, global]);

        assert_eq!(config.index.partition, "3");
        assert_eq!(config.index.shards, 2);
        assert_eq!(config.search.facet_size, 20);
        assert_eq!(config.search.suggest_size, 8);
    }

    #[test]
    fn test_merge_lists_replace_wholesale() {
        let local = parsed("/p/.sift.toml", "[fields]\nfacets = [\"category\"]\n");
        let global = parsed(
            "/h/.sift.toml",
            "[fields]\nfacets = [\"post_tag\", \"price\"]\nfields = [\"post_title\"]\n",
        );
        let config = merge_configs(&[local, global]);

        assert_eq!(config.fields.facets, vec!["category"]);
        assert_eq!(config.fields.fields, vec!["post_title"]);
    }

    #[test]
    fn test_merge_tables_by_key() {
        let local = parsed(
            "/p/.sift.toml",
            r#"
[fields]
numeric = ["price"]
[fields.scores.field]
post_title = 5
[[fields.ranges.price]]
to = 100
"#,
        );
        let global = parsed(
            "/h/.sift.toml",
            r#"
[fields]
numeric = ["weight"]
[fields.scores.field]
post_title = 1
post_content = 1
[[fields.ranges.price]]
to = 5
[[fields.ranges.weight]]
from = 1
"#,
        );
        let config = merge_configs(&[local, global]);

        assert!(config.fields.is_numeric("price"));
        assert!(config.fields.is_numeric("weight"));
        assert_eq!(config.fields.scores.field.get("post_title"), Some(&5.0));
        assert_eq!(config.fields.scores.field.get("post_content"), Some(&1.0));
        assert_eq!(
            config.fields.ranges("price"),
            &[RangeSpec::new(None, Some(100.0))]
        );
        assert_eq!(config.fields.ranges("weight").len(), 1);
    }

    #[test]
    fn test_search_exclude_follows_renamed_date_field() {
        let config = merge_configs(&[parsed(
            "/p/.sift.toml",
            "[fields.canonical]\ndate = \"published\"\n",
        )]);
        assert_eq!(config.fields.canonical.date, "published");
        assert_eq!(config.fields.search_exclude, vec!["published"]);
    }

    #[test]
    fn test_explicit_search_exclude_is_kept() {
        let config = merge_configs(&[parsed(
            "/p/.sift.toml",
            "[fields]\nsearch_exclude = []\n[fields.canonical]\ndate = \"published\"\n",
        )]);
        assert!(config.fields.search_exclude.is_empty());
    }
}
