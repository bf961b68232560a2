//! Shared helpers for command implementations.

use sift_index::FacetSelection;

use crate::cli::args::SelectionArgs;

/// Builds a facet selection from `-f` (required) and `--or` (alternative) pairs.
pub fn selection_from(args: &SelectionArgs) -> FacetSelection {
    let mut selection = FacetSelection::new();
    for (facet, value) in &args.require {
        selection.require(facet.clone(), value.clone());
    }
    for (facet, value) in &args.any {
        selection.any_of(facet.clone(), value.clone());
    }
    selection
}

#[cfg(test)]
mod tests {
    use sift_index::FacetValues;

    use super::*;

    #[test]
    fn pairs_build_selection() {
        let args = SelectionArgs {
            require: vec![
                ("category".into(), "shoes".into()),
                ("category".into(), "trail".into()),
            ],
            any: vec![("color".into(), "red".into()), ("color".into(), "blue".into())],
        };
        let selection = selection_from(&args);
        assert_eq!(
            selection.get("category"),
            Some(&FacetValues::All(vec!["shoes".into(), "trail".into()]))
        );
        assert!(selection.get("color").unwrap().is_any());
    }
}
