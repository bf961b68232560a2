//! Taxonomy ancestor expansion.
//!
//! A record is assigned terms directly; search needs every ancestor too, so that
//! filtering on `apparel` finds a record filed under `apparel > shoes > trail`. The
//! expander walks each assigned term's parent chain and collects slugs and names in
//! child-to-root order.

use std::collections::{BTreeMap, BTreeSet};

use sift_config::FieldConfig;
use tracing::{debug, warn};

use crate::{
    record::Record,
    term::{TermLookup, TermNode},
};

/// Expanded terms of one taxonomy.
///
/// The three lists are index-aligned and contain no duplicate slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonomyTerms {
    /// Exact-match slugs.
    pub slugs: Vec<String>,
    /// Display names.
    pub names: Vec<String>,
    /// Autocomplete texts.
    pub suggest: Vec<String>,
}

impl TaxonomyTerms {
    /// Appends a term unless its slug is already present.
    fn push(&mut self, term: &TermNode) {
        if self.slugs.iter().any(|s| *s == term.slug) {
            return;
        }
        self.slugs.push(term.slug.clone());
        self.names.push(term.name.clone());
        self.suggest.push(term.name.clone());
    }

    /// Returns true if no terms were collected.
    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }
}

/// Expands a record's term memberships to include ancestors.
pub struct TaxonomyExpander<'a> {
    /// Field configuration.
    config: &'a FieldConfig,
    /// Term store used to walk parent chains.
    lookup: &'a dyn TermLookup,
}

impl<'a> TaxonomyExpander<'a> {
    /// Creates an expander.
    pub fn new(config: &'a FieldConfig, lookup: &'a dyn TermLookup) -> Self {
        Self { config, lookup }
    }

    /// Expands the record's memberships, keyed by taxonomy.
    ///
    /// Only configured taxonomies that apply to the record's content type are
    /// expanded. Taxonomies the record has no terms in are omitted.
    pub fn expand(&self, record: &Record) -> BTreeMap<String, TaxonomyTerms> {
        let allowed = match record.content_type(&self.config.canonical) {
            Some(content_type) => self.config.taxonomies_for(content_type),
            None => self.config.taxonomies.iter().map(String::as_str).collect(),
        };

        let mut expanded: BTreeMap<String, TaxonomyTerms> = BTreeMap::new();
        for membership in &record.terms {
            let taxonomy = membership.taxonomy.as_str();
            if !allowed.contains(&taxonomy) {
                continue;
            }
            let terms = expanded.entry(taxonomy.to_string()).or_default();
            self.walk(taxonomy, &membership.term, terms);
        }
        expanded.retain(|_, terms| !terms.is_empty());
        expanded
    }

    /// Walks from a term towards its root, collecting every unseen slug.
    fn walk(&self, taxonomy: &str, start: &TermNode, terms: &mut TaxonomyTerms) {
        let with_ancestors = self.config.includes_ancestors(taxonomy);
        let mut visited = BTreeSet::new();
        let mut current = Some(start.clone());

        while let Some(term) = current {
            if !visited.insert(term.id) {
                warn!(
                    taxonomy,
                    term = term.id,
                    start = start.id,
                    "cyclic term parent chain, stopping ancestor walk"
                );
                break;
            }
            terms.push(&term);
            if !with_ancestors {
                break;
            }
            current = term.parent().and_then(|parent| {
                let found = self.lookup.get_term(taxonomy, parent);
                if found.is_none() {
                    debug!(taxonomy, term = term.id, parent, "parent term not found");
                }
                found
            });
        }
    }
}
