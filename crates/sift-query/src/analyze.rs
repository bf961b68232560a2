//! Free-text classification.
//!
//! Decides how search text is matched: not at all, as a simple (optionally fuzzy)
//! weighted match, or as user-authored boolean syntax passed through verbatim.

use tracing::debug;

use crate::{
    ast::QueryExpr,
    lexer::{render_tokens, tokenize},
    parser::parse_tokens,
};

/// Marker that requests fuzzy matching when it ends the search text.
pub const FUZZY_MARKER: char = '~';

/// Classified search text.
#[derive(Debug, Clone, PartialEq)]
pub enum TextQuery {
    /// No text; everything matches.
    Empty,
    /// Plain text matched against the weighted full-text fields.
    Simple {
        /// Trimmed text with any trailing fuzzy marker removed.
        text: String,
        /// Whether the text ended with the fuzzy marker.
        fuzzy: bool,
    },
    /// Well-formed boolean syntax.
    Boolean {
        /// Normalized text: keywords uppercased, whitespace collapsed.
        query: String,
        /// Parsed expression.
        expr: QueryExpr,
    },
}

impl TextQuery {
    /// Returns true for [`TextQuery::Empty`].
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Classifies search text.
///
/// Text is boolean only if its tokens contain `AND`, `OR` (any case), `NOT` (uppercase),
/// parentheses or a `field:` prefix, and the tokens parse. Anything else, including
/// malformed boolean syntax, is a simple match so that a stray parenthesis never turns a
/// search into an error.
pub fn analyze(text: &str) -> TextQuery {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return TextQuery::Empty;
    }

    match tokenize(trimmed) {
        Ok(tokens) if tokens.iter().any(|t| t.is_boolean_syntax()) => {
            match parse_tokens(&tokens) {
                Ok(Some(expr)) => {
                    return TextQuery::Boolean {
                        query: render_tokens(&tokens),
                        expr,
                    };
                }
                Ok(None) => {}
                Err(e) => debug!(text = trimmed, error = %e, "malformed boolean syntax, using simple match"),
            }
        }
        Ok(_) => {}
        Err(e) => debug!(text = trimmed, error = %e, "unlexable search text, using simple match"),
    }

    simple(trimmed)
}

/// Builds a simple match, stripping a trailing fuzzy marker.
fn simple(trimmed: &str) -> TextQuery {
    match trimmed.strip_suffix(FUZZY_MARKER) {
        Some(rest) => {
            let rest = rest.trim_end();
            if rest.is_empty() {
                TextQuery::Empty
            } else {
                TextQuery::Simple {
                    text: rest.to_string(),
                    fuzzy: true,
                }
            }
        }
        None => TextQuery::Simple {
            text: trimmed.to_string(),
            fuzzy: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_text(text: &str, fuzzy: bool) -> TextQuery {
        TextQuery::Simple {
            text: text.into(),
            fuzzy,
        }
    }

    fn boolean_query(text: &str) -> Option<String> {
        match analyze(text) {
            TextQuery::Boolean { query, .. } => Some(query),
            _ => None,
        }
    }

    #[test]
    fn empty_and_whitespace() {
        assert_eq!(analyze(""), TextQuery::Empty);
        assert_eq!(analyze("  \t "), TextQuery::Empty);
        assert_eq!(analyze(" ~ "), TextQuery::Empty);
        assert!(analyze("").is_empty());
    }

    #[test]
    fn plain_words_are_simple() {
        assert_eq!(analyze("  red shoes "), simple_text("red shoes", false));
    }

    #[test]
    fn keywords_inside_words_do_not_trigger_boolean() {
        assert_eq!(analyze("android orange"), simple_text("android orange", false));
        assert_eq!(analyze("band ordering"), simple_text("band ordering", false));
    }

    #[test]
    fn lowercase_not_is_a_word() {
        assert_eq!(analyze("do not disturb"), simple_text("do not disturb", false));
    }

    #[test]
    fn leading_minus_alone_is_simple() {
        assert_eq!(analyze("shoes -red"), simple_text("shoes -red", false));
    }

    #[test]
    fn trailing_marker_enables_fuzzy() {
        assert_eq!(analyze("shoos~"), simple_text("shoos", true));
        assert_eq!(analyze("red shoos ~"), simple_text("red shoos", true));
    }

    #[test]
    fn interior_marker_is_not_fuzzy() {
        assert_eq!(analyze("a~b"), simple_text("a~b", false));
    }

    #[test]
    fn boolean_keywords_are_normalized() {
        assert_eq!(
            boolean_query("red and shoes or boots").as_deref(),
            Some("red AND shoes OR boots")
        );
        assert_eq!(
            boolean_query("shoes NOT   red").as_deref(),
            Some("shoes NOT red")
        );
    }

    #[test]
    fn field_syntax_and_grouping_are_boolean() {
        assert_eq!(
            boolean_query("color:red").as_deref(),
            Some("color:red")
        );
        assert_eq!(
            boolean_query("(red shoes)").as_deref(),
            Some("(red shoes)")
        );
    }

    #[test]
    fn boolean_keeps_fuzzy_marker_in_query() {
        assert_eq!(
            boolean_query("red OR shoos~").as_deref(),
            Some("red OR shoos~")
        );
    }

    #[test]
    fn malformed_boolean_falls_back_to_simple() {
        assert_eq!(analyze("red OR"), simple_text("red OR", false));
        assert_eq!(analyze("(red shoes"), simple_text("(red shoes", false));
        assert_eq!(analyze("\"red shoes"), simple_text("\"red shoes", false));
        assert_eq!(analyze("and~"), simple_text("and", true));
    }

    #[test]
    fn boolean_exposes_referenced_fields() {
        let TextQuery::Boolean { expr, .. } = analyze("color:red AND size:9") else {
            panic!("expected boolean");
        };
        assert_eq!(expr.fields(), vec!["color", "size"]);
    }
}
