//! Schema building from the field configuration.
//!
//! Field types are inferred in priority order:
//!
//! 1. configured numeric → `float`
//! 2. configured not-analyzed, any taxonomy, or the content-type field → `keyword`
//! 3. the date field → `date` in [`DATE_FORMAT`]
//! 4. anything else → `text`, with a sub-field named after the analyzer language
//!
//! Full-text facets also get a `keyword` [`EXACT_SUB_FIELD`] so their values can be
//! filtered and counted exactly.
//!
//! Every inferred mapping passes through the hook chain of its [`FieldKind`] before it
//! is placed into the schema, so callers can override types.

use sift_config::{Config, EXACT_SUB_FIELD, FieldKind};
use sift_document::{HookChain, NAME_SUFFIX, SUGGEST_SUFFIX, TERM_NAME_FIELD, TERM_SLUG_FIELD};

use crate::{
    analyzer::{NGRAM_ANALYZER, WHITESPACE_ANALYZER},
    schema::{FieldMapping, Schema},
};

/// Engine format of date fields.
pub const DATE_FORMAT: &str = "date_time_no_millis";

/// Per-kind hook chains over field mappings, keyed by field name.
#[derive(Debug, Default)]
struct MappingHooks {
    /// Scalar and computed field hooks.
    field: HookChain<str, FieldMapping>,
    /// Metadata hooks; the context is the full dotted path.
    meta: HookChain<str, FieldMapping>,
    /// Taxonomy hooks.
    taxonomy: HookChain<str, FieldMapping>,
    /// Whole-schema hooks; the context is the content type.
    schema: HookChain<str, Schema>,
}

impl MappingHooks {
    /// Returns the chain for a field kind.
    fn for_kind(&self, kind: FieldKind) -> &HookChain<str, FieldMapping> {
        match kind {
            FieldKind::Field => &self.field,
            FieldKind::Meta => &self.meta,
            FieldKind::Taxonomy => &self.taxonomy,
        }
    }

    /// Returns the mutable chain for a field kind.
    fn for_kind_mut(&mut self, kind: FieldKind) -> &mut HookChain<str, FieldMapping> {
        match kind {
            FieldKind::Field => &mut self.field,
            FieldKind::Meta => &mut self.meta,
            FieldKind::Taxonomy => &mut self.taxonomy,
        }
    }
}

/// Builds document and taxonomy schemas.
pub struct MappingBuilder<'a> {
    /// Loaded configuration.
    config: &'a Config,
    /// Extension hooks.
    hooks: MappingHooks,
}

impl<'a> MappingBuilder<'a> {
    /// Creates a builder.
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            hooks: MappingHooks::default(),
        }
    }

    /// Registers a hook applied to every mapping of a field kind.
    pub fn hook<F>(&mut self, kind: FieldKind, hook: F) -> &mut Self
    where
        F: Fn(&str, FieldMapping) -> FieldMapping + Send + Sync + 'static,
    {
        self.hooks.for_kind_mut(kind).push(hook);
        self
    }

    /// Registers a hook applied to each content type's finished schema.
    pub fn schema_hook<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&str, Schema) -> Schema + Send + Sync + 'static,
    {
        self.hooks.schema.push(hook);
        self
    }

    /// Infers the mapping of a field.
    pub fn infer(&self, kind: FieldKind, name: &str) -> FieldMapping {
        let fields = &self.config.fields;
        if fields.is_numeric(name) {
            FieldMapping::float()
        } else if fields.is_not_analyzed(name)
            || kind == FieldKind::Taxonomy
            || name == fields.canonical.content_type
        {
            FieldMapping::keyword()
        } else if name == fields.canonical.date {
            FieldMapping::date(DATE_FORMAT)
        } else if fields.is_facet(name) {
            self.full_text()
                .with_sub_field(EXACT_SUB_FIELD, FieldMapping::keyword())
        } else {
            self.full_text()
        }
    }

    /// Full text with a language-analyzed sub-field.
    fn full_text(&self) -> FieldMapping {
        let language = &self.config.fields.analyzer_language;
        FieldMapping::text().with_sub_field(
            language.clone(),
            FieldMapping::text().with_analyzer(language.clone()),
        )
    }

    /// Infers a mapping and runs it through the kind's hooks.
    fn mapped(&self, kind: FieldKind, name: &str) -> FieldMapping {
        self.hooks.for_kind(kind).apply(name, self.infer(kind, name))
    }

    /// Builds the document schema shared by all content types.
    pub fn build(&self) -> Schema {
        let fields = &self.config.fields;
        let mut schema = Schema::new();

        for name in &fields.fields {
            schema.insert(name.clone(), self.mapped(FieldKind::Field, name));
            if *name == fields.canonical.title {
                schema.insert(format!("{name}{SUGGEST_SUFFIX}"), suggest_mapping());
            }
        }

        let computed = [&self.config.index.partition_field, &fields.canonical.link];
        for name in computed {
            let mapping = self
                .hooks
                .field
                .apply(name, FieldMapping::keyword());
            schema.insert(name.clone(), mapping);
        }

        for path in &fields.meta_fields {
            let segments: Vec<&str> = path.split('.').collect();
            schema.insert_path(&segments, self.mapped(FieldKind::Meta, path));
        }

        for taxonomy in &fields.taxonomies {
            schema.insert(taxonomy.clone(), self.mapped(FieldKind::Taxonomy, taxonomy));
            schema.insert(format!("{taxonomy}{NAME_SUFFIX}"), FieldMapping::text());
            schema.insert(format!("{taxonomy}{SUGGEST_SUFFIX}"), suggest_mapping());
        }

        schema
    }

    /// Builds the schema of one content type.
    pub fn build_for(&self, content_type: &str) -> Schema {
        self.hooks.schema.apply(content_type, self.build())
    }

    /// Builds the fixed schema of a taxonomy's term documents.
    ///
    /// Matches the documents of [`sift_document::DocumentBuilder::build_term`].
    pub fn taxonomy_schema(&self) -> Schema {
        let mut schema = Schema::new();
        schema.insert(TERM_SLUG_FIELD, FieldMapping::keyword());
        schema.insert(TERM_NAME_FIELD, FieldMapping::text());
        schema.insert(format!("{TERM_NAME_FIELD}{SUGGEST_SUFFIX}"), suggest_mapping());
        schema
    }
}

/// Autocomplete field: edge n-grams at index time, whole words at query time.
pub fn suggest_mapping() -> FieldMapping {
    FieldMapping::text()
        .with_analyzer(NGRAM_ANALYZER)
        .with_search_analyzer(WHITESPACE_ANALYZER)
}
