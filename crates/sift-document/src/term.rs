//! Taxonomy terms and term lookup.
//!
//! Terms form a forest per taxonomy. The builder only reads ancestor chains, through
//! the [`TermLookup`] capability, so any term store (a database, a cache, an in-memory
//! map) can back document building.

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// A taxonomy term.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TermNode {
    /// Term identifier, unique within its taxonomy.
    pub id: u64,
    /// Exact-match slug.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Parent term identifier. `None` and `0` both mean the term is a root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
}

impl TermNode {
    /// Creates a root term.
    pub fn new(id: u64, slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            slug: slug.into(),
            name: name.into(),
            parent_id: None,
        }
    }

    /// Sets the parent term.
    pub fn with_parent(mut self, parent_id: u64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Returns the parent identifier, treating `0` as no parent.
    pub fn parent(&self) -> Option<u64> {
        self.parent_id.filter(|id| *id != 0)
    }
}

/// Read access to a term store.
pub trait TermLookup {
    /// Returns the term with the given id in a taxonomy.
    fn get_term(&self, taxonomy: &str, id: u64) -> Option<TermNode>;
}

impl<F> TermLookup for F
where
    F: Fn(&str, u64) -> Option<TermNode>,
{
    fn get_term(&self, taxonomy: &str, id: u64) -> Option<TermNode> {
        self(taxonomy, id)
    }
}

/// In-memory term store.
///
/// The JSON form maps each taxonomy to a list of terms:
///
/// ```json
/// { "category": [ { "id": 1, "slug": "apparel", "name": "Apparel" } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermStore {
    /// Terms keyed by taxonomy, then id.
    terms: BTreeMap<String, BTreeMap<u64, TermNode>>,
}

impl TermStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a term, replacing any term with the same id in the taxonomy.
    pub fn insert(&mut self, taxonomy: impl Into<String>, term: TermNode) {
        self.terms
            .entry(taxonomy.into())
            .or_default()
            .insert(term.id, term);
    }

    /// Returns the total number of terms.
    pub fn len(&self) -> usize {
        self.terms.values().map(BTreeMap::len).sum()
    }

    /// Returns true if the store holds no terms.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parses a store from its JSON form.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, Vec<TermNode>> = serde_json::from_str(content)?;
        let mut store = Self::new();
        for (taxonomy, terms) in raw {
            for term in terms {
                store.insert(taxonomy.clone(), term);
            }
        }
        Ok(store)
    }

    /// Loads a store from a JSON file.
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

impl TermLookup for TermStore {
    fn get_term(&self, taxonomy: &str, id: u64) -> Option<TermNode> {
        self.terms.get(taxonomy)?.get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn zero_parent_is_root() {
        let term = TermNode::new(3, "shoes", "Shoes").with_parent(0);
        assert_eq!(term.parent(), None);
        assert_eq!(term.with_parent(1).parent(), Some(1));
    }

    #[test]
    fn store_lookup_is_per_taxonomy() {
        let mut store = TermStore::new();
        store.insert("category", TermNode::new(1, "apparel", "Apparel"));
        store.insert("post_tag", TermNode::new(1, "sale", "Sale"));

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.get_term("category", 1).map(|t| t.slug),
            Some("apparel".into())
        );
        assert_eq!(
            store.get_term("post_tag", 1).map(|t| t.slug),
            Some("sale".into())
        );
        assert!(store.get_term("category", 2).is_none());
        assert!(store.get_term("missing", 1).is_none());
    }

    #[test]
    fn closures_are_lookups() {
        let lookup = |taxonomy: &str, id: u64| {
            (taxonomy == "category" && id == 7).then(|| TermNode::new(7, "boots", "Boots"))
        };
        assert!(lookup.get_term("category", 7).is_some());
        assert!(lookup.get_term("category", 8).is_none());
    }

    #[test]
    fn parses_json_form() {
        let store = TermStore::from_json(
            r#"{"category": [
                {"id": 1, "slug": "apparel", "name": "Apparel"},
                {"id": 2, "slug": "shoes", "name": "Shoes", "parent_id": 1}
            ]}"#,
        )
        .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get_term("category", 2).unwrap().parent(), Some(1));
    }

    #[test]
    fn load_reports_path_on_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = TermStore::load(file.path()).unwrap_err();
        assert!(matches!(err, DocumentError::ParseJson { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = TermStore::load(Path::new("/nonexistent/terms.json")).unwrap_err();
        assert!(matches!(err, DocumentError::ReadFile { .. }));
    }
}
