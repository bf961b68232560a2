//! Field configuration.
//!
//! [`FieldConfig`] is the static description of everything sift needs to know about a
//! content source: which fields, metadata paths and taxonomies are indexed, which of
//! them are exposed as facets, how they are typed, how they are weighted for free-text
//! scoring and which numeric buckets exist for range facets.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// The kind of a configured field.
///
/// Kinds key scoring weights and the mapping extension points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKind {
    /// A scalar field stored on the record.
    Field,
    /// A metadata path (possibly dotted).
    Meta,
    /// A taxonomy.
    Taxonomy,
}

impl FieldKind {
    /// Returns the lowercase name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Meta => "meta",
            Self::Taxonomy => "taxonomy",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of the fields that receive special treatment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CanonicalFields {
    /// Title field; also emitted as `<title>_suggest` for autocomplete.
    pub title: String,
    /// Long-text body field; markup is stripped before indexing.
    pub content: String,
    /// Publication date field; normalized to ISO-8601 and mapped as a date.
    pub date: String,
    /// Content-type discriminator field.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Dynamic link field computed from the record permalink.
    pub link: String,
}

impl Default for CanonicalFields {
    fn default() -> Self {
        Self {
            title: String::from("post_title"),
            content: String::from("post_content"),
            date: String::from("post_date"),
            content_type: String::from("post_type"),
            link: String::from("link"),
        }
    }
}

/// Per-kind free-text scoring weights.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Scores {
    /// Weights for scalar fields.
    pub field: BTreeMap<String, f32>,
    /// Weights for metadata fields.
    pub meta: BTreeMap<String, f32>,
    /// Weights for taxonomies (applied to `<taxonomy>_name`).
    pub taxonomy: BTreeMap<String, f32>,
}

impl Scores {
    /// Returns the weight table for a kind.
    pub fn for_kind(&self, kind: FieldKind) -> &BTreeMap<String, f32> {
        match kind {
            FieldKind::Field => &self.field,
            FieldKind::Meta => &self.meta,
            FieldKind::Taxonomy => &self.taxonomy,
        }
    }
}

/// One bucket of a numeric range facet.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RangeSpec {
    /// Inclusive lower bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    /// Exclusive upper bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
    /// Explicit selection key. Defaults to `"<from>-<to>"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl RangeSpec {
    /// Creates a range with the given bounds.
    pub fn new(from: Option<f64>, to: Option<f64>) -> Self {
        Self {
            from,
            to,
            key: None,
        }
    }

    /// Returns the key used to select this bucket in a facet selection.
    ///
    /// The default key uses the same `"<from>-<to>"` rendering as range buckets in
    /// parsed search results, so a bucket key read from a result can be fed straight
    /// back as a selection.
    pub fn key(&self) -> String {
        self.key
            .clone()
            .unwrap_or_else(|| range_key(self.from, self.to))
    }
}

/// Renders a `"<from>-<to>"` range key; an absent bound renders as the empty string.
pub fn range_key(from: Option<f64>, to: Option<f64>) -> String {
    format!("{}-{}", format_bound(from), format_bound(to))
}

/// Renders a numeric bound without a trailing `.0` for whole numbers.
pub fn format_bound(bound: Option<f64>) -> String {
    match bound {
        None => String::new(),
        Some(v) if v.fract() == 0.0 && v.is_finite() => format!("{}", v as i64),
        Some(v) => v.to_string(),
    }
}

/// Keyword sub-field on which full-text facets are filtered and counted.
pub const EXACT_SUB_FIELD: &str = "raw";

/// Static description of indexable fields, taxonomies and facets.
///
/// A `FieldConfig` is loaded once and treated as read-only afterwards. Field and
/// facet order is significant: documents list fields in declaration order and
/// aggregations are emitted in facet declaration order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Scalar fields copied from each record.
    pub fields: Vec<String>,
    /// Metadata paths; `.` separates nested-object segments.
    pub meta_fields: Vec<String>,
    /// Indexed taxonomies.
    pub taxonomies: Vec<String>,
    /// Fields and taxonomies exposed for faceting.
    pub facets: Vec<String>,
    /// Fields never used for free-text matching.
    pub search_exclude: Vec<String>,
    /// Language analyzer used for the language-aware sub-field of full-text fields.
    pub analyzer_language: String,
    /// Fields mapped as numbers.
    pub numeric: BTreeMap<String, bool>,
    /// Fields mapped as exact-match keywords.
    pub not_analyzed: BTreeMap<String, bool>,
    /// Free-text scoring weights.
    pub scores: Scores,
    /// Range buckets for numeric facets.
    pub ranges: BTreeMap<String, Vec<RangeSpec>>,
    /// Per-taxonomy switch for ancestor expansion (absent means enabled).
    pub ancestors: BTreeMap<String, bool>,
    /// Taxonomies that apply to each content type (absent type means all).
    pub type_taxonomies: BTreeMap<String, Vec<String>>,
    /// Names of specially-treated fields.
    pub canonical: CanonicalFields,
}

impl Default for FieldConfig {
    fn default() -> Self {
        let canonical = CanonicalFields::default();
        Self {
            fields: Vec::new(),
            meta_fields: Vec::new(),
            taxonomies: Vec::new(),
            facets: Vec::new(),
            search_exclude: vec![canonical.date.clone()],
            analyzer_language: String::from("english"),
            numeric: BTreeMap::new(),
            not_analyzed: BTreeMap::new(),
            scores: Scores::default(),
            ranges: BTreeMap::new(),
            ancestors: BTreeMap::new(),
            type_taxonomies: BTreeMap::new(),
            canonical,
        }
    }
}

impl FieldConfig {
    /// Returns true if the field is configured as numeric.
    pub fn is_numeric(&self, name: &str) -> bool {
        self.numeric.get(name).copied().unwrap_or(false)
    }

    /// Returns true if the field is configured as not analyzed.
    pub fn is_not_analyzed(&self, name: &str) -> bool {
        self.not_analyzed.get(name).copied().unwrap_or(false)
    }

    /// Returns true if the name is a configured taxonomy.
    pub fn is_taxonomy(&self, name: &str) -> bool {
        self.taxonomies.iter().any(|t| t == name)
    }

    /// Returns true if the name is a configured facet.
    pub fn is_facet(&self, name: &str) -> bool {
        self.facets.iter().any(|f| f == name)
    }

    /// Returns the positive scoring weight for a field, if any.
    pub fn score(&self, kind: FieldKind, name: &str) -> Option<f32> {
        self.scores
            .for_kind(kind)
            .get(name)
            .copied()
            .filter(|w| *w > 0.0)
    }

    /// Returns the configured range buckets for a field (empty if none).
    pub fn ranges(&self, name: &str) -> &[RangeSpec] {
        self.ranges.get(name).map_or(&[], Vec::as_slice)
    }

    /// Returns true if the field is numeric and has range buckets configured.
    pub fn is_range_facet(&self, name: &str) -> bool {
        self.is_numeric(name) && !self.ranges(name).is_empty()
    }

    /// Looks up a range bucket by its selection key.
    pub fn range_by_key(&self, name: &str, key: &str) -> Option<&RangeSpec> {
        self.ranges(name).iter().find(|r| r.key() == key)
    }

    /// Returns whether ancestor terms are included for a taxonomy.
    pub fn includes_ancestors(&self, taxonomy: &str) -> bool {
        self.ancestors.get(taxonomy).copied().unwrap_or(true)
    }

    /// Returns the configured taxonomies applicable to a content type, in declaration order.
    pub fn taxonomies_for(&self, content_type: &str) -> Vec<&str> {
        match self.type_taxonomies.get(content_type) {
            Some(allowed) => self
                .taxonomies
                .iter()
                .filter(|t| allowed.contains(t))
                .map(String::as_str)
                .collect(),
            None => self.taxonomies.iter().map(String::as_str).collect(),
        }
    }

    /// Returns true if the name is mapped as analyzed full text.
    ///
    /// Numeric, not-analyzed, taxonomy and the canonical content-type, date and link
    /// fields are not.
    pub fn is_full_text(&self, name: &str) -> bool {
        let canonical = &self.canonical;
        !self.is_numeric(name)
            && !self.is_not_analyzed(name)
            && !self.is_taxonomy(name)
            && name != canonical.content_type
            && name != canonical.date
            && name != canonical.link
    }

    /// Returns the field holding a name's exact values.
    ///
    /// Full-text facets carry a keyword [`EXACT_SUB_FIELD`]; every other name is its
    /// own exact field.
    pub fn exact_field(&self, name: &str) -> String {
        if self.is_facet(name) && self.is_full_text(name) {
            format!("{name}.{EXACT_SUB_FIELD}")
        } else {
            name.to_string()
        }
    }

    /// Returns the names that get an aggregation, in emission order.
    ///
    /// The content-type field is counted whenever it is an indexed field, ahead of the
    /// declared facets.
    pub fn facet_names(&self) -> Vec<&str> {
        let content_type = self.canonical.content_type.as_str();
        let mut names = Vec::with_capacity(self.facets.len() + 1);
        if self.fields.iter().any(|f| f == content_type) && !self.is_facet(content_type) {
            names.push(content_type);
        }
        names.extend(self.facets.iter().map(String::as_str));
        names
    }

    /// Returns true if the field must not take part in free-text matching.
    pub fn is_search_excluded(&self, name: &str) -> bool {
        self.search_exclude.iter().any(|f| f == name)
    }
}
