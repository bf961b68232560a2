//! Configuration system for sift.
//!
//! sift uses TOML configuration files named `.sift.toml`. Configuration is resolved by walking
//! up the directory tree from the current working directory, collecting any `.sift.toml` files
//! found, then loading `~/.sift.toml` as the global config with lowest precedence.
//!
//! The merged [`Config`] carries the index settings, search settings and the
//! [`FieldConfig`] that drives document building, mapping and query compilation.

#![warn(missing_docs)]

mod discovery;
mod error;
mod field;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use field::{
    CanonicalFields, EXACT_SUB_FIELD, FieldConfig, FieldKind, RangeSpec, Scores, format_bound,
    range_key,
};
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    FlagSet, RawCanonical, RawConfig, RawFieldConfig, RawIndexSettings, RawScores,
    RawSearchSettings, parse_config_file, parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for sift.
///
/// This represents the fully resolved configuration after merging all discovered
/// `.sift.toml` files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Index-level settings.
    pub index: IndexSettings,
    /// Query-time settings.
    pub search: SearchSettings,
    /// Indexed fields, facets and their mapping hints.
    pub fields: FieldConfig,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.sift.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    ///
    /// This checks for:
    /// - Empty configuration (no fields, metadata fields or taxonomies)
    /// - Facets that name nothing that is indexed
    /// - Ranges configured on non-numeric fields
    /// - Scores for unknown or non-positive entries
    /// - Per-type taxonomy lists naming unknown taxonomies
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output uses the same layout as a `.sift.toml` file.
    pub fn settings_to_toml(&self) -> String {
        let serializable = SerializableSettings {
            index: &self.index,
            search: &self.search,
            fields: &self.fields,
        };
        toml::to_string_pretty(&serializable).expect("settings serialization should not fail")
    }
}

/// Index-level settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Field holding the partition identifier on every document.
    pub partition_field: String,
    /// Partition identifier of this installation; every query is restricted to it.
    pub partition: String,
    /// Number of primary shards.
    pub shards: u32,
    /// Number of replicas per shard.
    pub replicas: u32,
    /// Content types that get a document mapping.
    pub content_types: Vec<String>,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            partition_field: String::from("blog_id"),
            partition: String::from("1"),
            shards: 5,
            replicas: 1,
            content_types: vec![String::from("post"), String::from("page")],
        }
    }
}

/// Query-time settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Default number of buckets per terms aggregation.
    pub facet_size: usize,
    /// Number of suggestions returned by the autocomplete query.
    pub suggest_size: usize,
    /// Default page size of search requests.
    pub page_size: usize,
    /// Fuzziness applied when the free text carries the fuzzy marker.
    pub fuzziness: String,
    /// Per-facet overrides of `facet_size`.
    pub facet_sizes: BTreeMap<String, usize>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            facet_size: 100,
            suggest_size: 5,
            page_size: 10,
            fuzziness: String::from("AUTO"),
            facet_sizes: BTreeMap::new(),
        }
    }
}

impl SearchSettings {
    /// Returns the bucket count for a facet's terms aggregation.
    pub fn facet_size_for(&self, facet: &str) -> usize {
        self.facet_sizes
            .get(facet)
            .copied()
            .unwrap_or(self.facet_size)
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Index-level settings.
    index: &'a IndexSettings,
    /// Query-time settings.
    search: &'a SearchSettings,
    /// Field configuration.
    fields: &'a FieldConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_settings_defaults() {
        let index = IndexSettings::default();
        assert_eq!(index.partition_field, "blog_id");
        assert_eq!(index.partition, "1");
        assert_eq!(index.shards, 5);
        assert_eq!(index.replicas, 1);
        assert_eq!(index.content_types, vec!["post", "page"]);
    }

    #[test]
    fn test_search_settings_defaults() {
        let search = SearchSettings::default();
        assert_eq!(search.facet_size, 100);
        assert_eq!(search.suggest_size, 5);
        assert_eq!(search.page_size, 10);
        assert_eq!(search.fuzziness, "AUTO");
    }

    #[test]
    fn test_facet_size_override() {
        let mut search = SearchSettings::default();
        search.facet_sizes.insert("category".into(), 20);
        assert_eq!(search.facet_size_for("category"), 20);
        assert_eq!(search.facet_size_for("post_tag"), 100);
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.fields.fields.is_empty());
        assert!(config.config_root.is_none());
    }

    #[test]
    fn test_settings_to_toml() {
        let mut config = Config::default();
        config.fields.fields = vec!["post_title".into(), "price".into()];
        config.fields.numeric.insert("price".into(), true);
        config
            .fields
            .ranges
            .insert("price".into(), vec![RangeSpec::new(None, Some(10.0))]);
        let toml = config.settings_to_toml();

        assert!(toml.contains("[index]"));
        assert!(toml.contains("[search]"));
        assert!(toml.contains("[fields]"));
        assert!(toml.contains("partition_field = \"blog_id\""));
        assert!(toml.contains("facet_size = 100"));

        let parsed: toml::Value =
            toml::from_str(&toml).expect("settings_to_toml should produce valid TOML");
        assert!(parsed.get("index").is_some());
        assert!(parsed.get("search").is_some());
        assert!(parsed.get("fields").is_some());
    }

    #[test]
    fn test_settings_to_toml_round_trips_through_parser() {
        let mut config = Config::default();
        config.fields.taxonomies = vec!["category".into()];
        config.fields.scores.taxonomy.insert("category".into(), 2.0);
        let toml = config.settings_to_toml();

        let raw = parse_config_str(&toml, Path::new("effective.toml")).unwrap();
        let merged = merge_configs(&[ParsedConfig {
            path: PathBuf::from("/tmp/.sift.toml"),
            config: raw,
        }]);
        assert_eq!(merged.fields, config.fields);
        assert_eq!(merged.index, config.index);
        assert_eq!(merged.search, config.search);
    }
}
