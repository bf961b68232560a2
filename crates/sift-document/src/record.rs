//! Content records.
//!
//! A [`Record`] is the read-only input to document building: scalar fields by name, an
//! optional permalink, metadata in structured and/or flat form, and the record's direct
//! taxonomy term memberships.

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use sift_config::CanonicalFields;

use crate::{error::DocumentError, term::TermNode};

/// A content record.
///
/// The JSON form accepts a numeric or string `id`:
///
/// ```json
/// {
///   "id": 42,
///   "fields": { "post_title": "Trail shoes", "post_type": "post" },
///   "permalink": "https://example.com/trail-shoes",
///   "meta": { "color": "red" },
///   "terms": [ { "taxonomy": "category", "id": 2, "slug": "shoes", "name": "Shoes" } ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Record {
    /// Record identifier.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Scalar fields by name.
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// Public URL of the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    /// Structured metadata tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaValue>,
    /// Flat metadata, used when no structured tree is present.
    ///
    /// Repeating groups use `<prefix>_<n>_<rest>` keys, e.g. `urls_0_title`.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub flat_meta: Map<String, Value>,
    /// Direct taxonomy term memberships.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terms: Vec<TermMembership>,
}

impl Record {
    /// Creates an empty record.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets a scalar field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Sets the permalink.
    pub fn with_permalink(mut self, permalink: impl Into<String>) -> Self {
        self.permalink = Some(permalink.into());
        self
    }

    /// Sets the structured metadata tree.
    pub fn with_meta(mut self, meta: impl Into<MetaValue>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    /// Sets a flat metadata value.
    pub fn with_flat_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.flat_meta.insert(key.into(), value.into());
        self
    }

    /// Adds a direct term membership.
    pub fn with_term(mut self, taxonomy: impl Into<String>, term: TermNode) -> Self {
        self.terms.push(TermMembership {
            taxonomy: taxonomy.into(),
            term,
        });
        self
    }

    /// Returns a scalar field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns the record's content type, if it has a non-empty one.
    pub fn content_type<'a>(&'a self, canonical: &CanonicalFields) -> Option<&'a str> {
        self.fields
            .get(&canonical.content_type)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Parses a record from JSON.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Loads a record from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path).map_err(|source| DocumentError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| DocumentError::ParseJson {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// A record's direct membership of a taxonomy term.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TermMembership {
    /// Taxonomy name.
    pub taxonomy: String,
    /// The assigned term.
    #[serde(flatten)]
    pub term: TermNode,
}

/// Accepts a numeric or string identifier.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    /// Identifier forms found in record JSON.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        /// Numeric id.
        Number(i64),
        /// String id.
        Text(String),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

/// Structured metadata tree.
///
/// JSON arrays become [`MetaValue::List`], objects become [`MetaValue::Object`] and
/// everything else is a [`MetaValue::Scalar`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "Value", into = "Value")]
pub enum MetaValue {
    /// A leaf value.
    Scalar(Value),
    /// A repeating value.
    List(Vec<MetaValue>),
    /// A nested group of named values.
    Object(BTreeMap<String, MetaValue>),
}

impl MetaValue {
    /// Returns the named child of an object.
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }
}

impl From<Value> for MetaValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
            other => Self::Scalar(other),
        }
    }
}

impl From<MetaValue> for Value {
    fn from(meta: MetaValue) -> Self {
        match meta {
            MetaValue::Scalar(v) => v,
            MetaValue::List(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            MetaValue::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_numeric_and_string_ids() {
        let numeric = Record::from_json(r#"{"id": 42}"#).unwrap();
        assert_eq!(numeric.id, "42");
        let text = Record::from_json(r#"{"id": "post-42"}"#).unwrap();
        assert_eq!(text.id, "post-42");
    }

    #[test]
    fn parses_full_record() {
        let record = Record::from_json(
            r#"{
                "id": 1,
                "fields": {"post_title": "Trail shoes", "post_type": "post"},
                "permalink": "https://example.com/trail-shoes",
                "meta": {"urls": [{"title": "Docs"}], "color": "red"},
                "flat_meta": {"color": "red"},
                "terms": [{"taxonomy": "category", "id": 2, "slug": "shoes", "name": "Shoes", "parent_id": 1}]
            }"#,
        )
        .unwrap();

        assert_eq!(record.field("post_title"), Some(&json!("Trail shoes")));
        assert_eq!(record.terms.len(), 1);
        assert_eq!(record.terms[0].taxonomy, "category");
        assert_eq!(record.terms[0].term.parent(), Some(1));

        let meta = record.meta.unwrap();
        assert!(matches!(meta.get("urls"), Some(MetaValue::List(items)) if items.len() == 1));
        assert_eq!(meta.get("color"), Some(&MetaValue::Scalar(json!("red"))));
    }

    #[test]
    fn content_type_requires_non_empty_string() {
        let canonical = CanonicalFields::default();
        assert_eq!(
            Record::new("1")
                .with_field("post_type", "page")
                .content_type(&canonical),
            Some("page")
        );
        assert_eq!(
            Record::new("1")
                .with_field("post_type", "")
                .content_type(&canonical),
            None
        );
        assert_eq!(Record::new("1").content_type(&canonical), None);
    }

    #[test]
    fn meta_value_converts_back_to_json() {
        let original = json!({"urls": [{"href": "a", "title": "b"}], "n": 3});
        let meta = MetaValue::from(original.clone());
        assert_eq!(Value::from(meta), original);
    }
}
