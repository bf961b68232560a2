//! Record to document building.
//!
//! A document is assembled in stages, each producing a partial document that passes
//! through the stage's hook chain before it is merged:
//!
//! 1. [`BuildStage::Fields`]: configured scalar fields
//! 2. [`BuildStage::Dynamic`]: fields computed from the record (partition, link)
//! 3. [`BuildStage::Meta`]: configured metadata paths
//! 4. [`BuildStage::Taxonomies`]: expanded taxonomy terms
//!
//! A final [`BuildStage::Document`] chain sees the merged result. Building never fails:
//! missing or malformed values are left out of the document.
//!
//! Taxonomy terms are also indexed on their own, one small document per term, so that
//! term names can be autocompleted; see [`DocumentBuilder::build_term`].

use serde_json::Value;
use sift_config::Config;
use tracing::debug;

use crate::{
    document::Document,
    hooks::HookChain,
    meta,
    record::Record,
    taxonomy::TaxonomyExpander,
    term::TermLookup,
    term::TermNode,
    text::{coerce_numeric, normalize_date, strip_markup},
};

/// Suffix of the autocomplete companion of the title field.
pub const SUGGEST_SUFFIX: &str = "_suggest";

/// Suffix of the display-name companion of a taxonomy field.
pub const NAME_SUFFIX: &str = "_name";

/// Term document field holding the slug.
pub const TERM_SLUG_FIELD: &str = "slug";

/// Term document field holding the display name.
pub const TERM_NAME_FIELD: &str = "name";

/// A stage of document building that accepts hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStage {
    /// Scalar fields.
    Fields,
    /// Computed fields.
    Dynamic,
    /// Metadata.
    Meta,
    /// Taxonomy terms.
    Taxonomies,
    /// The merged document.
    Document,
}

/// Computes a field value from a record; `None` leaves the field out.
pub type DynamicField = Box<dyn Fn(&Record) -> Option<Value> + Send + Sync>;

/// Hook chains of every stage.
#[derive(Debug, Default)]
struct StageHooks {
    /// Scalar field hooks.
    fields: HookChain<Record, Document>,
    /// Computed field hooks.
    dynamic: HookChain<Record, Document>,
    /// Metadata hooks.
    meta: HookChain<Record, Document>,
    /// Taxonomy hooks.
    taxonomies: HookChain<Record, Document>,
    /// Whole-document hooks.
    document: HookChain<Record, Document>,
    /// Term document hooks.
    term: HookChain<TermNode, Document>,
}

impl StageHooks {
    /// Returns the chain for a stage.
    fn chain_mut(&mut self, stage: BuildStage) -> &mut HookChain<Record, Document> {
        match stage {
            BuildStage::Fields => &mut self.fields,
            BuildStage::Dynamic => &mut self.dynamic,
            BuildStage::Meta => &mut self.meta,
            BuildStage::Taxonomies => &mut self.taxonomies,
            BuildStage::Document => &mut self.document,
        }
    }
}

/// Builds indexable documents from records.
pub struct DocumentBuilder<'a> {
    /// Loaded configuration.
    config: &'a Config,
    /// Term store used for ancestor expansion.
    lookup: &'a dyn TermLookup,
    /// Caller-registered computed fields, in registration order.
    dynamic_fields: Vec<(String, DynamicField)>,
    /// Stage hooks.
    hooks: StageHooks,
}

impl<'a> DocumentBuilder<'a> {
    /// Creates a builder.
    pub fn new(config: &'a Config, lookup: &'a dyn TermLookup) -> Self {
        Self {
            config,
            lookup,
            dynamic_fields: Vec::new(),
            hooks: StageHooks::default(),
        }
    }

    /// Registers a hook for a stage. Hooks of a stage run in registration order.
    pub fn hook<F>(&mut self, stage: BuildStage, hook: F) -> &mut Self
    where
        F: Fn(&Record, Document) -> Document + Send + Sync + 'static,
    {
        self.hooks.chain_mut(stage).push(hook);
        self
    }

    /// Registers a hook for term documents, run in registration order.
    pub fn term_hook<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&TermNode, Document) -> Document + Send + Sync + 'static,
    {
        self.hooks.term.push(hook);
        self
    }

    /// Registers an additional computed field.
    pub fn dynamic_field<F>(&mut self, name: impl Into<String>, compute: F) -> &mut Self
    where
        F: Fn(&Record) -> Option<Value> + Send + Sync + 'static,
    {
        self.dynamic_fields.push((name.into(), Box::new(compute)));
        self
    }

    /// Builds the document for a record.
    pub fn build(&self, record: &Record) -> Document {
        let mut document = self.hooks.fields.apply(record, self.scalar_fields(record));
        document.merge(self.hooks.dynamic.apply(record, self.computed_fields(record)));
        document.merge(self.hooks.meta.apply(record, self.meta_fields(record)));

        if record.content_type(&self.config.fields.canonical).is_some() {
            document.merge(
                self.hooks
                    .taxonomies
                    .apply(record, self.taxonomy_fields(record)),
            );
        } else {
            debug!(id = %record.id, "record has no content type, skipping taxonomies");
        }

        self.hooks.document.apply(record, document)
    }

    /// Builds the standalone document of a taxonomy term: slug, name and an
    /// autocomplete copy of the name.
    pub fn build_term(&self, term: &TermNode) -> Document {
        let mut document = Document::new();
        document.insert(TERM_NAME_FIELD, Value::String(term.name.clone()));
        document.insert(
            format!("{TERM_NAME_FIELD}{SUGGEST_SUFFIX}"),
            Value::String(term.name.clone()),
        );
        document.insert(TERM_SLUG_FIELD, Value::String(term.slug.clone()));
        self.hooks.term.apply(term, document)
    }

    /// Copies configured scalar fields, normalizing the canonical ones.
    fn scalar_fields(&self, record: &Record) -> Document {
        let fields = &self.config.fields;
        let canonical = &fields.canonical;
        let mut document = Document::new();

        for name in &fields.fields {
            let Some(value) = record.field(name).filter(|v| !v.is_null()) else {
                continue;
            };

            let value = if *name == canonical.date {
                match normalize_date(value) {
                    Some(date) => Value::String(date),
                    None => continue,
                }
            } else if *name == canonical.content {
                match value.as_str() {
                    Some(html) => Value::String(strip_markup(html)),
                    None => value.clone(),
                }
            } else if fields.is_numeric(name) {
                coerce_numeric(value.clone())
            } else {
                value.clone()
            };

            let suggest = (*name == canonical.title).then(|| value.clone());
            document.insert(name.clone(), value);
            if let Some(suggest) = suggest {
                document.insert(format!("{name}{SUGGEST_SUFFIX}"), suggest);
            }
        }
        document
    }

    /// Computes the partition, link and caller-registered fields.
    fn computed_fields(&self, record: &Record) -> Document {
        let index = &self.config.index;
        let mut document = Document::new();
        document.insert(
            index.partition_field.clone(),
            Value::String(index.partition.clone()),
        );
        if let Some(link) = &record.permalink {
            document.insert(
                self.config.fields.canonical.link.clone(),
                Value::String(link.clone()),
            );
        }
        for (name, compute) in &self.dynamic_fields {
            if let Some(value) = compute(record) {
                document.insert(name.clone(), value);
            }
        }
        document
    }

    /// Extracts configured metadata.
    fn meta_fields(&self, record: &Record) -> Document {
        Document::from(meta::extract(record, &self.config.fields))
    }

    /// Expands taxonomy memberships into slug, name and suggest lists.
    fn taxonomy_fields(&self, record: &Record) -> Document {
        let fields = &self.config.fields;
        let mut expanded = TaxonomyExpander::new(fields, self.lookup).expand(record);
        let mut document = Document::new();

        for taxonomy in &fields.taxonomies {
            let Some(terms) = expanded.remove(taxonomy) else {
                continue;
            };
            document.insert(taxonomy.clone(), string_array(terms.slugs));
            document.insert(format!("{taxonomy}{NAME_SUFFIX}"), string_array(terms.names));
            document.insert(
                format!("{taxonomy}{SUGGEST_SUFFIX}"),
                string_array(terms.suggest),
            );
        }
        document
    }
}

/// Converts strings to a JSON array.
fn string_array(values: Vec<String>) -> Value {
    Value::Array(values.into_iter().map(Value::String).collect())
}
