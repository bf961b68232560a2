//! Free-text handling for sift search.
//!
//! Search text is classified before it reaches the query compiler:
//!
//! - **Empty**: nothing typed, every document matches
//! - **Simple**: `red shoes` is matched against the weighted full-text fields, and a
//!   trailing `~` (`shoos~`) turns on fuzzy matching
//! - **Boolean**: text using `AND`, `OR`, `NOT`, grouping or `field:value` is passed to
//!   the engine verbatim so the user's precedence is kept
//!
//! # Example
//!
//! ```
//! use sift_query::{TextQuery, analyze};
//!
//! assert!(matches!(analyze("red and shoes"), TextQuery::Boolean { .. }));
//! assert!(matches!(analyze("shoos~"), TextQuery::Simple { fuzzy: true, .. }));
//! ```

#![warn(missing_docs)]

mod analyze;
mod ast;
mod error;
mod lexer;
mod parser;

pub use analyze::{FUZZY_MARKER, TextQuery, analyze};
pub use ast::QueryExpr;
pub use error::{LexError, ParseError, QueryError, QueryErrorKind};
pub use lexer::{Token, render_tokens, tokenize};
pub use parser::{parse, parse_tokens};
