//! Document building for sift.
//!
//! Turns content records into search documents according to a [`sift_config::FieldConfig`]:
//!
//! - configured scalar fields, with dates normalized, markup stripped from the content
//!   field and an autocomplete copy of the title
//! - computed fields: the partition identifier and the link
//! - configured metadata paths, from a structured tree or flat `prefix_<n>_rest` keys
//! - taxonomy terms expanded to include their ancestors
//!
//! Taxonomy terms also get standalone documents of their own for name autocompletion.
//!
//! Every stage can be adjusted through ordered hooks.

#![warn(missing_docs)]

mod build;
mod document;
mod error;
mod hooks;
mod meta;
mod record;
mod taxonomy;
mod term;
mod text;

pub use build::{
    BuildStage, DocumentBuilder, DynamicField, NAME_SUFFIX, SUGGEST_SUFFIX, TERM_NAME_FIELD,
    TERM_SLUG_FIELD,
};
pub use document::Document;
pub use error::DocumentError;
pub use hooks::{Hook, HookChain};
pub use record::{MetaValue, Record, TermMembership};
pub use taxonomy::{TaxonomyExpander, TaxonomyTerms};
pub use term::{TermLookup, TermNode, TermStore};
pub use text::{DATE_FORMAT, coerce_numeric, is_blank, normalize_date, strip_markup};
