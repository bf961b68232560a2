//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use crate::{Config, FieldConfig, FieldKind};

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    /// No fields, metadata fields or taxonomies are configured.
    NoFieldsDefined,
    /// A facet names something that is not indexed.
    UndeclaredFacet {
        /// Name of the facet.
        facet: String,
    },
    /// Ranges are configured for a field that is not numeric.
    RangesOnNonNumeric {
        /// Name of the field.
        field: String,
    },
    /// A range bucket has neither bound.
    UnboundedRange {
        /// Name of the field.
        field: String,
        /// Selection key of the bucket.
        key: String,
    },
    /// A score names a field that is not configured for its kind.
    UnknownScoreField {
        /// Kind of the scored entry.
        kind: FieldKind,
        /// Name of the scored entry.
        field: String,
    },
    /// A score weight is zero or negative and will be ignored.
    NonPositiveScore {
        /// Kind of the scored entry.
        kind: FieldKind,
        /// Name of the scored entry.
        field: String,
        /// The configured weight.
        weight: f32,
    },
    /// A per-type taxonomy list names an unknown taxonomy.
    UnknownTypeTaxonomy {
        /// Content type.
        content_type: String,
        /// Name of the taxonomy.
        taxonomy: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFieldsDefined => {
                write!(f, "no fields, meta fields or taxonomies are configured")
            }
            Self::UndeclaredFacet { facet } => {
                write!(f, "facet '{facet}' is not a configured field or taxonomy")
            }
            Self::RangesOnNonNumeric { field } => {
                write!(f, "ranges for '{field}' are ignored: field is not numeric")
            }
            Self::UnboundedRange { field, key } => {
                write!(f, "range '{key}' for '{field}' has no bounds")
            }
            Self::UnknownScoreField { kind, field } => {
                write!(f, "score for unknown {kind} '{field}'")
            }
            Self::NonPositiveScore {
                kind,
                field,
                weight,
            } => {
                write!(f, "score {weight} for {kind} '{field}' is ignored")
            }
            Self::UnknownTypeTaxonomy {
                content_type,
                taxonomy,
            } => {
                write!(
                    f,
                    "content type '{content_type}' lists unknown taxonomy '{taxonomy}'"
                )
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let fields = &config.fields;
    let mut warnings = Vec::new();

    if fields.fields.is_empty() && fields.meta_fields.is_empty() && fields.taxonomies.is_empty()
    {
        warnings.push(ConfigWarning::NoFieldsDefined);
        return warnings;
    }

    for facet in &fields.facets {
        if !is_indexed(fields, facet) {
            warnings.push(ConfigWarning::UndeclaredFacet {
                facet: facet.clone(),
            });
        }
    }

    warnings.extend(validate_ranges(fields));
    warnings.extend(validate_scores(fields));

    for (content_type, taxonomies) in &fields.type_taxonomies {
        for taxonomy in taxonomies {
            if !fields.is_taxonomy(taxonomy) {
                warnings.push(ConfigWarning::UnknownTypeTaxonomy {
                    content_type: content_type.clone(),
                    taxonomy: taxonomy.clone(),
                });
            }
        }
    }

    warnings
}

/// Returns true if the name is a configured field, metadata path or taxonomy.
fn is_indexed(fields: &FieldConfig, name: &str) -> bool {
    fields.fields.iter().any(|f| f == name)
        || fields.meta_fields.iter().any(|f| f == name)
        || fields.is_taxonomy(name)
}

/// Checks range buckets.
fn validate_ranges(fields: &FieldConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    for (field, ranges) in &fields.ranges {
        if !fields.is_numeric(field) {
            warnings.push(ConfigWarning::RangesOnNonNumeric {
                field: field.clone(),
            });
        }
        for range in ranges {
            if range.from.is_none() && range.to.is_none() {
                warnings.push(ConfigWarning::UnboundedRange {
                    field: field.clone(),
                    key: range.key(),
                });
            }
        }
    }
    warnings
}

/// Checks scoring weights of every kind.
fn validate_scores(fields: &FieldConfig) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();
    for kind in [FieldKind::Field, FieldKind::Meta, FieldKind::Taxonomy] {
        let declared: &[String] = match kind {
            FieldKind::Field => &fields.fields,
            FieldKind::Meta => &fields.meta_fields,
            FieldKind::Taxonomy => &fields.taxonomies,
        };
        for (field, weight) in fields.scores.for_kind(kind) {
            if !declared.contains(field) {
                warnings.push(ConfigWarning::UnknownScoreField {
                    kind,
                    field: field.clone(),
                });
            } else if *weight <= 0.0 {
                warnings.push(ConfigWarning::NonPositiveScore {
                    kind,
                    field: field.clone(),
                    weight: *weight,
                });
            }
        }
    }
    warnings
}
