//! Field mappings and schema conformance.
//!
//! A [`Schema`] declares the type of every field a document may carry. Nested fields
//! (`urls.title`) are declared as a [`DataType::Nested`] field whose `properties` hold
//! the nested schema.
//!
//! Declaring a schema is not a migration: sending a schema that disagrees with data
//! already in the index requires recreating the index, which loses its documents.
//! Compare [`crate::fingerprint`] values to detect that situation.

use std::{collections::BTreeMap, fmt};

use serde_json::{Map, Value, json};
use sift_document::Document;

/// Engine field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Analyzed full text.
    Text,
    /// Exact-match value.
    Keyword,
    /// Floating point number.
    Float,
    /// Date.
    Date,
    /// Nested objects.
    Nested,
}

impl DataType {
    /// Returns the engine type name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Keyword => "keyword",
            Self::Float => "float",
            Self::Date => "date",
            Self::Nested => "nested",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declaration of a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    /// Field type.
    pub data_type: DataType,
    /// Whether values are tokenized.
    pub analyzed: bool,
    /// Index-time analyzer.
    pub analyzer: Option<String>,
    /// Query-time analyzer.
    pub search_analyzer: Option<String>,
    /// Date format.
    pub format: Option<String>,
    /// Additional representations of the same value, keyed by sub-field name.
    pub fields: BTreeMap<String, FieldMapping>,
    /// Nested schema of a [`DataType::Nested`] field.
    pub properties: Option<Schema>,
}

impl FieldMapping {
    /// Creates a mapping of the given type with no options.
    fn of(data_type: DataType, analyzed: bool) -> Self {
        Self {
            data_type,
            analyzed,
            analyzer: None,
            search_analyzer: None,
            format: None,
            fields: BTreeMap::new(),
            properties: None,
        }
    }

    /// Analyzed full text.
    pub fn text() -> Self {
        Self::of(DataType::Text, true)
    }

    /// Exact-match keyword.
    pub fn keyword() -> Self {
        Self::of(DataType::Keyword, false)
    }

    /// Floating point number.
    pub fn float() -> Self {
        Self::of(DataType::Float, false)
    }

    /// Date in the given format.
    pub fn date(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
            ..Self::of(DataType::Date, false)
        }
    }

    /// Nested objects with the given schema.
    pub fn nested(properties: Schema) -> Self {
        Self {
            properties: Some(properties),
            ..Self::of(DataType::Nested, false)
        }
    }

    /// Sets the index-time analyzer.
    pub fn with_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    /// Sets the query-time analyzer.
    pub fn with_search_analyzer(mut self, analyzer: impl Into<String>) -> Self {
        self.search_analyzer = Some(analyzer.into());
        self
    }

    /// Adds a sub-field.
    pub fn with_sub_field(mut self, name: impl Into<String>, mapping: FieldMapping) -> Self {
        self.fields.insert(name.into(), mapping);
        self
    }

    /// Renders the engine declaration.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".into(), json!(self.data_type.as_str()));
        if let Some(analyzer) = &self.analyzer {
            out.insert("analyzer".into(), json!(analyzer));
        }
        if let Some(analyzer) = &self.search_analyzer {
            out.insert("search_analyzer".into(), json!(analyzer));
        }
        if let Some(format) = &self.format {
            out.insert("format".into(), json!(format));
        }
        if !self.fields.is_empty() {
            let fields: Map<String, Value> = self
                .fields
                .iter()
                .map(|(name, mapping)| (name.clone(), mapping.to_json()))
                .collect();
            out.insert("fields".into(), Value::Object(fields));
        }
        if let Some(properties) = &self.properties {
            out.insert("properties".into(), properties.properties_json());
        }
        Value::Object(out)
    }
}

/// Field declarations by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    /// Declared fields.
    fields: BTreeMap<String, FieldMapping>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field.
    ///
    /// Declaring a nested field that already exists merges the two nested schemas.
    pub fn insert(&mut self, name: impl Into<String>, mapping: FieldMapping) {
        let name = name.into();
        if let Some(existing) = self.fields.get_mut(&name)
            && let Some(existing_props) = existing.properties.as_mut()
            && let Some(props) = &mapping.properties
        {
            for (child, child_mapping) in &props.fields {
                existing_props.insert(child.clone(), child_mapping.clone());
            }
            return;
        }
        self.fields.insert(name, mapping);
    }

    /// Declares a field at a nested path, creating nested parents as needed.
    pub fn insert_path(&mut self, segments: &[&str], mapping: FieldMapping) {
        match segments {
            [] => {}
            [name] => self.insert(*name, mapping),
            [parent, rest @ ..] => {
                let mut nested = Schema::new();
                nested.insert_path(rest, mapping);
                self.insert(*parent, FieldMapping::nested(nested));
            }
        }
    }

    /// Returns a top-level field.
    pub fn get(&self, name: &str) -> Option<&FieldMapping> {
        self.fields.get(name)
    }

    /// Returns a field by dotted path.
    pub fn get_path(&self, path: &str) -> Option<&FieldMapping> {
        let mut segments = path.split('.');
        let mut mapping = self.get(segments.next()?)?;
        for segment in segments {
            mapping = mapping.properties.as_ref()?.get(segment)?;
        }
        Some(mapping)
    }

    /// Iterates over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldMapping)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Renders the field declarations as a `properties` object.
    fn properties_json(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(name, mapping)| (name.clone(), mapping.to_json()))
                .collect(),
        )
    }

    /// Renders the mapping body: `{"properties": {...}}`.
    pub fn to_json(&self) -> Value {
        json!({ "properties": self.properties_json() })
    }

    /// Reports every way a document disagrees with this schema.
    ///
    /// An empty result means every field is declared and every value has the shape
    /// its declared type expects. Text and keyword fields accept numbers and booleans
    /// as well as strings, since the engine indexes them as their string form.
    pub fn check(&self, document: &Document) -> Vec<ConformanceIssue> {
        let mut issues = Vec::new();
        self.check_object(document.as_map(), "", &mut issues);
        issues
    }

    /// Checks the fields of one object, prefixing reported paths.
    fn check_object(
        &self,
        object: &Map<String, Value>,
        prefix: &str,
        issues: &mut Vec<ConformanceIssue>,
    ) {
        for (name, value) in object {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };
            match self.get(name) {
                Some(mapping) => check_value(mapping, value, &path, issues),
                None => issues.push(ConformanceIssue::Undeclared { field: path }),
            }
        }
    }
}

/// Checks one value, descending into arrays and nested objects.
fn check_value(mapping: &FieldMapping, value: &Value, path: &str, issues: &mut Vec<ConformanceIssue>) {
    if let Value::Array(items) = value {
        for item in items {
            check_value(mapping, item, path, issues);
        }
        return;
    }

    let conforms = match (mapping.data_type, value) {
        (_, Value::Null) => true,
        (DataType::Date, Value::String(_)) => true,
        (
            DataType::Text | DataType::Keyword,
            Value::String(_) | Value::Number(_) | Value::Bool(_),
        ) => true,
        (DataType::Float, Value::Number(_)) => true,
        (DataType::Nested, Value::Object(object)) => {
            match &mapping.properties {
                Some(properties) => properties.check_object(object, path, issues),
                None => issues.push(ConformanceIssue::Undeclared {
                    field: path.to_string(),
                }),
            }
            true
        }
        _ => false,
    };

    if !conforms {
        issues.push(ConformanceIssue::TypeMismatch {
            field: path.to_string(),
            expected: mapping.data_type,
            found: json_kind(value),
        });
    }
}

/// Names the JSON kind of a value.
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A disagreement between a document and a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConformanceIssue {
    /// The document has a field the schema does not declare.
    Undeclared {
        /// Dotted field path.
        field: String,
    },
    /// The value's shape does not match the declared type.
    TypeMismatch {
        /// Dotted field path.
        field: String,
        /// Declared type.
        expected: DataType,
        /// JSON kind of the value found.
        found: &'static str,
    },
}

impl fmt::Display for ConformanceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undeclared { field } => write!(f, "field '{field}' is not declared"),
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => write!(f, "field '{field}' is declared {expected} but holds a {found}"),
        }
    }
}
