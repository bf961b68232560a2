//! Configuration file parsing.
//!
//! Parses individual `.sift.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
use toml::Value;
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::{ConfigError, RangeSpec};

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
/// This mirrors the TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Index settings section.
    pub index: Option<RawIndexSettings>,
    /// Search settings section.
    pub search: Option<RawSearchSettings>,
    /// Field configuration section.
    pub fields: Option<RawFieldConfig>,
}

/// Raw index settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIndexSettings {
    /// Field holding the partition identifier.
    pub partition_field: Option<String>,
    /// Partition identifier; numbers are accepted and kept as their decimal text.
    pub partition: Option<Value>,
    /// Number of primary shards.
    pub shards: Option<u32>,
    /// Number of replicas per shard.
    pub replicas: Option<u32>,
    /// Content types that get a document mapping.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub content_types: Option<Vec<String>>,
}

/// Raw search settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchSettings {
    /// Default number of buckets per terms aggregation.
    pub facet_size: Option<usize>,
    /// Number of suggestions returned by the autocomplete query.
    pub suggest_size: Option<usize>,
    /// Default page size.
    pub page_size: Option<usize>,
    /// Fuzziness for fuzzy matches.
    pub fuzziness: Option<String>,
    /// Per-facet bucket counts.
    pub facet_sizes: Option<BTreeMap<String, usize>>,
}

/// A set of boolean flags keyed by field name.
///
/// Accepts either a list of names (each set to `true`) or an explicit table of
/// `name = bool` entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FlagSet {
    /// A list of enabled names.
    List(Vec<String>),
    /// Explicit per-name flags.
    Table(BTreeMap<String, bool>),
}

impl FlagSet {
    /// Converts the set into explicit per-name flags.
    pub fn into_map(self) -> BTreeMap<String, bool> {
        match self {
            Self::List(names) => names.into_iter().map(|n| (n, true)).collect(),
            Self::Table(map) => map,
        }
    }
}

/// Raw per-kind scoring weights.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawScores {
    /// Weights for scalar fields.
    pub field: Option<BTreeMap<String, f32>>,
    /// Weights for metadata fields.
    pub meta: Option<BTreeMap<String, f32>>,
    /// Weights for taxonomies.
    pub taxonomy: Option<BTreeMap<String, f32>>,
}

/// Raw canonical field names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCanonical {
    /// Title field.
    pub title: Option<String>,
    /// Content field.
    pub content: Option<String>,
    /// Date field.
    pub date: Option<String>,
    /// Content-type field.
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    /// Link field.
    pub link: Option<String>,
}

/// Raw field configuration.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFieldConfig {
    /// Scalar fields.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub fields: Option<Vec<String>>,
    /// Metadata paths.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub meta_fields: Option<Vec<String>>,
    /// Taxonomies.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub taxonomies: Option<Vec<String>>,
    /// Facets.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub facets: Option<Vec<String>>,
    /// Fields excluded from free-text matching.
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub search_exclude: Option<Vec<String>>,
    /// Language analyzer name.
    pub analyzer_language: Option<String>,
    /// Numeric fields.
    pub numeric: Option<FlagSet>,
    /// Not analyzed fields.
    pub not_analyzed: Option<FlagSet>,
    /// Scoring weights.
    pub scores: Option<RawScores>,
    /// Range buckets per field.
    pub ranges: Option<BTreeMap<String, Vec<RangeSpec>>>,
    /// Ancestor expansion switches per taxonomy.
    pub ancestors: Option<BTreeMap<String, bool>>,
    /// Taxonomies per content type.
    pub type_taxonomies: Option<BTreeMap<String, Vec<String>>>,
    /// Canonical field names.
    pub canonical: Option<RawCanonical>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
///
/// Useful for validating template content (tests only).
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
