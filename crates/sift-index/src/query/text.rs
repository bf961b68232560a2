//! Free-text clause construction.

use sift_config::{FieldConfig, FieldKind};
use sift_document::NAME_SUFFIX;
use sift_query::TextQuery;
use tracing::debug;

use super::ir::TextClause;

/// Builds the scoring clause for classified search text.
pub fn text_clause(query: &TextQuery, config: &FieldConfig, fuzziness: &str) -> TextClause {
    match query {
        TextQuery::Empty => TextClause::MatchAll,
        TextQuery::Simple { text, fuzzy } => TextClause::MultiMatch {
            query: text.clone(),
            fields: search_fields(config, *fuzzy),
            fuzziness: fuzzy.then(|| fuzziness.to_string()),
        },
        TextQuery::Boolean { query, expr } => {
            for field in expr.fields() {
                if !is_declared(config, field) {
                    debug!(field, "query references an unconfigured field");
                }
            }
            TextClause::QueryString {
                query: query.clone(),
                fields: search_fields(config, false),
            }
        }
    }
}

/// Returns the fields free text is matched against.
///
/// Fields with a positive score are listed with `^weight`: full-text fields use their
/// language sub-field unless the search is fuzzy, and taxonomies match on their
/// display names. Without any scored field, every searchable full-text field is listed
/// unweighted.
pub fn search_fields(config: &FieldConfig, fuzzy: bool) -> Vec<String> {
    let mut scored = Vec::new();

    for (kind, name) in text_candidates(config) {
        if let Some(weight) = config.score(kind, name) {
            if fuzzy || config.is_not_analyzed(name) {
                scored.push(format!("{name}^{weight}"));
            } else {
                scored.push(format!("{name}.{}^{weight}", config.analyzer_language));
            }
        }
    }
    for taxonomy in &config.taxonomies {
        if let Some(weight) = config.score(FieldKind::Taxonomy, taxonomy) {
            scored.push(format!("{taxonomy}{NAME_SUFFIX}^{weight}"));
        }
    }
    if !scored.is_empty() {
        return scored;
    }

    text_candidates(config)
        .filter(|(_, name)| is_full_text(config, name))
        .map(|(_, name)| name.to_string())
        .chain(
            config
                .taxonomies
                .iter()
                .map(|taxonomy| format!("{taxonomy}{NAME_SUFFIX}")),
        )
        .collect()
}

/// Scalar and metadata fields eligible for free-text matching.
///
/// Dotted metadata paths live in nested objects and are left out; matching them needs
/// a nested query per path.
fn text_candidates(config: &FieldConfig) -> impl Iterator<Item = (FieldKind, &str)> {
    let fields = config.fields.iter().map(|f| (FieldKind::Field, f.as_str()));
    let meta = config
        .meta_fields
        .iter()
        .filter(|m| !m.contains('.'))
        .map(|m| (FieldKind::Meta, m.as_str()));
    fields
        .chain(meta)
        .filter(move |(_, name)| !config.is_search_excluded(name))
}

/// Returns true if a field is mapped as analyzed text.
fn is_full_text(config: &FieldConfig, name: &str) -> bool {
    !config.is_numeric(name)
        && !config.is_not_analyzed(name)
        && name != config.canonical.content_type
        && name != config.canonical.date
}

/// Returns true if a name refers to a configured field, taxonomy or companion field.
fn is_declared(config: &FieldConfig, name: &str) -> bool {
    let base = name.strip_suffix(NAME_SUFFIX).unwrap_or(name);
    config.fields.iter().any(|f| f == name)
        || config.meta_fields.iter().any(|m| m == name)
        || config.is_taxonomy(base)
}

#[cfg(test)]
mod tests {
    use sift_query::analyze;

    use super::*;

    fn config() -> FieldConfig {
        FieldConfig {
            fields: vec![
                "post_title".into(),
                "post_content".into(),
                "post_date".into(),
                "post_type".into(),
                "price".into(),
            ],
            meta_fields: vec!["color".into(), "urls.title".into()],
            taxonomies: vec!["category".into()],
            numeric: [("price".to_string(), true)].into(),
            ..FieldConfig::default()
        }
    }

    fn scored_config() -> FieldConfig {
        let mut config = config();
        config.scores.field.insert("post_title".into(), 3.0);
        config.scores.field.insert("post_content".into(), 1.0);
        config.scores.field.insert("post_date".into(), 5.0);
        config.scores.meta.insert("color".into(), 1.5);
        config.scores.taxonomy.insert("category".into(), 2.0);
        config
    }

    #[test]
    fn empty_text_matches_all() {
        assert_eq!(
            text_clause(&analyze("  "), &config(), "AUTO"),
            TextClause::MatchAll
        );
    }

    #[test]
    fn scored_fields_use_language_sub_field() {
        assert_eq!(
            search_fields(&scored_config(), false),
            vec![
                "post_title.english^3",
                "post_content.english^1",
                "color.english^1.5",
                "category_name^2"
            ]
        );
    }

    #[test]
    fn fuzzy_and_unanalyzed_fields_use_base_field() {
        assert_eq!(
            search_fields(&scored_config(), true),
            vec!["post_title^3", "post_content^1", "color^1.5", "category_name^2"]
        );

        let mut config = scored_config();
        config.not_analyzed.insert("color".into(), true);
        assert!(search_fields(&config, false).contains(&"color^1.5".to_string()));
    }

    #[test]
    fn unscored_config_searches_all_full_text_fields() {
        assert_eq!(
            search_fields(&config(), false),
            vec!["post_title", "post_content", "color", "category_name"]
        );
    }

    #[test]
    fn fuzziness_only_with_marker() {
        let config = scored_config();
        let TextClause::MultiMatch {
            query, fuzziness, ..
        } = text_clause(&analyze("shoos~"), &config, "AUTO")
        else {
            panic!("expected multi match");
        };
        assert_eq!(query, "shoos");
        assert_eq!(fuzziness.as_deref(), Some("AUTO"));

        let TextClause::MultiMatch { fuzziness, .. } =
            text_clause(&analyze("shoes"), &config, "AUTO")
        else {
            panic!("expected multi match");
        };
        assert_eq!(fuzziness, None);
    }

    #[test]
    fn boolean_syntax_becomes_query_string() {
        assert_eq!(
            text_clause(&analyze("red and shoes"), &scored_config(), "AUTO"),
            TextClause::QueryString {
                query: "red AND shoes".into(),
                fields: search_fields(&scored_config(), false),
            }
        );
    }
}
