//! Facet count aggregations.

use sift_config::Config;

use super::ir::{Aggregation, AggregationKind, FacetFilter, Filter, TextClause};

/// Builds one aggregation per counted name: the content-type field when it is indexed,
/// then the declared facets in declaration order.
///
/// Each aggregation counts the documents matching the partition, the free text and
/// every facet filter except its own, so a facet keeps offering its alternatives
/// after one of them is selected.
pub fn aggregations(
    config: &Config,
    partition: &Filter,
    text: &TextClause,
    contributions: &[FacetFilter],
) -> Vec<Aggregation> {
    let fields = &config.fields;
    fields
        .facet_names()
        .into_iter()
        .map(|facet| {
            let kind = if fields.is_range_facet(facet) {
                AggregationKind::Range {
                    field: facet.to_string(),
                    ranges: fields.ranges(facet).to_vec(),
                }
            } else {
                AggregationKind::Terms {
                    field: fields.exact_field(facet),
                    size: config.search.facet_size_for(facet),
                }
            };

            let mut filters = vec![partition.clone()];
            if !text.is_match_all() {
                filters.push(Filter::Text(text.clone()));
            }
            filters.extend(
                contributions
                    .iter()
                    .filter(|c| c.facet != facet)
                    .map(|c| c.filter.clone()),
            );

            Aggregation {
                name: facet.to_string(),
                kind,
                filter: Filter::all(filters),
            }
        })
        .collect()
}
