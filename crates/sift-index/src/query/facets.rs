//! Facet filter construction.
//!
//! Each selected facet contributes one filter:
//!
//! - `"red"` or `["red", "blue"]`: every value must match (one term each)
//! - `{"or": ["red", "blue"]}`: at least one value must match
//!
//! Values of range facets are bucket keys (`"10-50"`), translated back into the
//! configured `[from, to)` bounds. Terms match the facet's exact field, which for a
//! full-text facet is its keyword sub-field.

use sift_config::FieldConfig;
use tracing::debug;

use super::{
    ir::{FacetFilter, Filter},
    selection::{FacetSelection, FacetValues},
};

/// Builds the filter contributions of a selection, one per filtered facet.
///
/// Facets are visited in configuration order: taxonomies, then scalar and metadata
/// fields, then the remaining declared facets. Selections for unknown names, and
/// range keys that match no bucket, are skipped.
pub fn facet_filters(config: &FieldConfig, selection: &FacetSelection) -> Vec<FacetFilter> {
    let order = filterable_names(config);

    for (name, _) in selection.iter() {
        if !order.contains(&name) {
            debug!(facet = name, "ignoring selection for an unconfigured facet");
        }
    }

    order
        .into_iter()
        .filter_map(|name| {
            let values = selection.get(name)?;
            let filter = facet_filter(config, name, values)?;
            Some(FacetFilter {
                facet: name.to_string(),
                filter,
            })
        })
        .collect()
}

/// Names that accept a selection, in filter order and without duplicates.
fn filterable_names(config: &FieldConfig) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    let all = config
        .taxonomies
        .iter()
        .chain(&config.fields)
        .chain(&config.meta_fields)
        .chain(&config.facets);
    for name in all {
        if !names.contains(&name.as_str()) {
            names.push(name);
        }
    }
    names
}

/// Builds the filter for one facet's selected values.
fn facet_filter(config: &FieldConfig, name: &str, values: &FacetValues) -> Option<Filter> {
    let filters: Vec<Filter> = values
        .values()
        .iter()
        .filter_map(|value| value_filter(config, name, value))
        .map(|filter| filter.nest_for(name))
        .collect();

    match filters.len() {
        0 => None,
        _ if values.is_any() => Some(Filter::any(filters)),
        1 => filters.into_iter().next(),
        _ => Some(Filter::all(filters)),
    }
}

/// Builds the filter for a single selected value.
fn value_filter(config: &FieldConfig, name: &str, value: &str) -> Option<Filter> {
    if !config.is_range_facet(name) {
        return Some(Filter::term(config.exact_field(name), value));
    }
    match config.range_by_key(name, value) {
        Some(spec) => Some(Filter::range(name, spec)),
        None => {
            debug!(facet = name, key = value, "ignoring unknown range key");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use sift_config::RangeSpec;

    use super::*;

    fn config() -> FieldConfig {
        FieldConfig {
            fields: vec!["post_type".into(), "price".into()],
            meta_fields: vec!["specs.color".into()],
            taxonomies: vec!["category".into(), "post_tag".into()],
            facets: vec![
                "category".into(),
                "price".into(),
                "brand".into(),
                "specs.color".into(),
            ],
            numeric: [("price".to_string(), true)].into(),
            ranges: [(
                "price".to_string(),
                vec![
                    RangeSpec::new(None, Some(10.0)),
                    RangeSpec::new(Some(10.0), Some(50.0)),
                    RangeSpec::new(Some(50.0), None),
                ],
            )]
            .into(),
            ..FieldConfig::default()
        }
    }

    fn selection(json: &str) -> FacetSelection {
        FacetSelection::from_json(json).unwrap()
    }

    fn filters_of(json: &str) -> Vec<(String, Filter)> {
        facet_filters(&config(), &selection(json))
            .into_iter()
            .map(|f| (f.facet, f.filter))
            .collect()
    }

    #[test]
    fn bare_list_requires_every_value() {
        assert_eq!(
            filters_of(r#"{"category": ["red", "blue"]}"#),
            vec![(
                "category".to_string(),
                Filter::all(vec![
                    Filter::term("category", "red"),
                    Filter::term("category", "blue")
                ])
            )]
        );
    }

    #[test]
    fn or_list_requires_any_value() {
        assert_eq!(
            filters_of(r#"{"category": {"or": ["red", "blue"]}}"#),
            vec![(
                "category".to_string(),
                Filter::any(vec![
                    Filter::term("category", "red"),
                    Filter::term("category", "blue")
                ])
            )]
        );
    }

    #[test]
    fn single_value_is_a_plain_term() {
        assert_eq!(
            filters_of(r#"{"post_type": "page"}"#),
            vec![("post_type".to_string(), Filter::term("post_type", "page"))]
        );
    }

    #[test]
    fn range_keys_translate_to_bounds() {
        assert_eq!(
            filters_of(r#"{"price": {"or": ["-10", "50-", "nope"]}}"#),
            vec![(
                "price".to_string(),
                Filter::any(vec![
                    Filter::Range {
                        field: "price".into(),
                        gte: None,
                        lt: Some(10.0)
                    },
                    Filter::Range {
                        field: "price".into(),
                        gte: Some(50.0),
                        lt: None
                    },
                ])
            )]
        );
        assert!(filters_of(r#"{"price": "nope"}"#).is_empty());
    }

    #[test]
    fn follows_configuration_order_and_skips_unknown() {
        let facets: Vec<String> = filters_of(
            r#"{"brand": "acme", "price": "10-50", "post_tag": "sale", "category": "x", "unknown": "y"}"#,
        )
        .into_iter()
        .map(|(facet, _)| facet)
        .collect();
        assert_eq!(facets, vec!["category", "post_tag", "price", "brand"]);
    }

    #[test]
    fn nested_meta_facets_are_wrapped() {
        assert_eq!(
            filters_of(r#"{"specs.color": "red"}"#),
            vec![(
                "specs.color".to_string(),
                Filter::Nested {
                    path: "specs".into(),
                    filter: Box::new(Filter::term("specs.color.raw", "red")),
                }
            )]
        );
    }

    #[test]
    fn full_text_facets_match_exact_sub_field() {
        assert_eq!(
            filters_of(r#"{"brand": "Acme"}"#),
            vec![("brand".to_string(), Filter::term("brand.raw", "Acme"))]
        );
    }
}
