//! Boolean query parser.
//!
//! Parses a token stream into a query AST using recursive descent. The parser is used to
//! check that user-authored boolean syntax is well formed before it is passed through to
//! the search engine.
//!
//! # Grammar
//!
//! ```text
//! query      → or_expr
//! or_expr    → and_expr ("OR" and_expr)*
//! and_expr   → unary ("AND"? unary)*
//! unary      → ("-" | "NOT") unary | primary
//! primary    → (TERM | PHRASE | field_expr | "(" or_expr ")") BOOST?
//! field_expr → FIELD_PREFIX (TERM | PHRASE | "(" or_expr ")")
//! ```

use std::mem;

use crate::{
    ast::QueryExpr,
    error::{ParseError, QueryError},
    lexer::{Token, tokenize},
};

/// Recursive descent parser for query expressions.
struct Parser<'a> {
    /// Token stream to parse.
    tokens: &'a [Token],
    /// Current position in token stream.
    position: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser over a token stream.
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Parses the token stream into a query expression.
    fn parse(mut self) -> Result<Option<QueryExpr>, ParseError> {
        if self.tokens.is_empty() {
            return Ok(None);
        }

        let expr = self.parse_or_expr()?;

        if let Some(token) = self.peek() {
            return Err(ParseError::new(
                format!("unexpected token: {token}"),
                Some(self.position),
            ));
        }

        Ok(Some(expr))
    }

    /// Parses: or_expr → and_expr ("OR" and_expr)*
    fn parse_or_expr(&mut self) -> Result<QueryExpr, ParseError> {
        let mut left = self.parse_and_expr()?;

        while self.check(&Token::Or) {
            self.advance();
            let right = self.parse_and_expr()?;
            left = QueryExpr::or(vec![left, right]);
        }

        Ok(left)
    }

    /// Parses: and_expr → unary ("AND"? unary)*
    fn parse_and_expr(&mut self) -> Result<QueryExpr, ParseError> {
        let mut exprs = vec![self.parse_unary()?];

        loop {
            if self.check(&Token::And) {
                self.advance();
                exprs.push(self.parse_unary()?);
            } else if self.can_start_unary() {
                exprs.push(self.parse_unary()?);
            } else {
                break;
            }
        }

        Ok(QueryExpr::and(exprs))
    }

    /// Checks if the current token can start a unary expression.
    fn can_start_unary(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::Term(_)
                    | Token::Phrase(_)
                    | Token::Not
                    | Token::Minus
                    | Token::LParen
                    | Token::FieldPrefix(_)
            )
        )
    }

    /// Parses: unary → ("-" | "NOT") unary | primary
    fn parse_unary(&mut self) -> Result<QueryExpr, ParseError> {
        if self.check(&Token::Minus) || self.check(&Token::Not) {
            self.advance();
            let expr = self.parse_unary()?;
            return Ok(QueryExpr::Not(Box::new(expr)));
        }

        self.parse_primary()
    }

    /// Parses a primary expression and an optional boost suffix.
    fn parse_primary(&mut self) -> Result<QueryExpr, ParseError> {
        let expr = match self.peek() {
            Some(Token::Term(_) | Token::Phrase(_)) => self.parse_term_or_phrase()?,

            Some(Token::FieldPrefix(name)) => {
                let name = name.clone();
                self.advance();
                self.parse_field_expr(name)?
            }

            Some(Token::LParen) => self.parse_group("expected closing parenthesis")?,

            Some(Token::RParen) => {
                return Err(ParseError::new(
                    "unexpected closing parenthesis",
                    Some(self.position),
                ));
            }

            Some(token @ (Token::And | Token::Or)) => {
                return Err(ParseError::new(
                    format!("unexpected {token} (needs expression before it)"),
                    Some(self.position),
                ));
            }

            Some(Token::Not | Token::Minus) => {
                return Err(ParseError::new("unexpected negation", Some(self.position)));
            }

            Some(Token::Boost(_)) => {
                return Err(ParseError::new(
                    "unexpected boost (needs expression before it)",
                    Some(self.position),
                ));
            }

            None => {
                return Err(ParseError::new("unexpected end of query", None));
            }
        };

        if let Some(Token::Boost(factor)) = self.peek() {
            let factor = *factor;
            self.advance();
            return Ok(QueryExpr::boost(expr, factor));
        }
        Ok(expr)
    }

    /// Parses the expression after a field prefix.
    fn parse_field_expr(&mut self, name: String) -> Result<QueryExpr, ParseError> {
        let expr = match self.peek() {
            Some(Token::Term(_) | Token::Phrase(_)) => self.parse_term_or_phrase()?,
            Some(Token::LParen) => {
                self.parse_group("expected closing parenthesis after field expression")?
            }
            _ => {
                return Err(ParseError::new(
                    format!("expected term, phrase, or group after '{name}:'"),
                    Some(self.position),
                ));
            }
        };

        Ok(QueryExpr::Field {
            name,
            expr: Box::new(expr),
        })
    }

    /// Parses a TERM or PHRASE token into a QueryExpr, consuming the token.
    fn parse_term_or_phrase(&mut self) -> Result<QueryExpr, ParseError> {
        let expr = match self.peek() {
            Some(Token::Term(text)) => QueryExpr::Term(text.clone()),
            Some(Token::Phrase(text)) => {
                QueryExpr::Phrase(text.split_whitespace().map(String::from).collect())
            }
            _ => {
                return Err(ParseError::new(
                    "expected term or phrase",
                    Some(self.position),
                ));
            }
        };
        self.advance();
        Ok(expr)
    }

    /// Parses a parenthesized group, consuming the surrounding parentheses.
    fn parse_group(&mut self, missing_rparen_msg: &str) -> Result<QueryExpr, ParseError> {
        self.advance();
        let inner = self.parse_or_expr()?;

        if !self.check(&Token::RParen) {
            return Err(ParseError::new(missing_rparen_msg, Some(self.position)));
        }
        self.advance();

        Ok(inner)
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    /// Checks if the current token has the same variant as the given token.
    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| mem::discriminant(t) == mem::discriminant(token))
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Parses an already tokenized query.
pub fn parse_tokens(tokens: &[Token]) -> Result<Option<QueryExpr>, ParseError> {
    Parser::new(tokens).parse()
}

/// Parses search text into an AST.
///
/// Returns `Ok(None)` for empty text, `Ok(Some(expr))` for valid text, or
/// `Err(QueryError)` for invalid syntax.
pub fn parse(input: &str) -> Result<Option<QueryExpr>, QueryError> {
    let tokens = tokenize(input)?;
    parse_tokens(&tokens).map_err(|e| QueryError::from(e).with_query(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(s: &str) -> QueryExpr {
        QueryExpr::Term(s.into())
    }

    fn not(e: QueryExpr) -> QueryExpr {
        QueryExpr::Not(Box::new(e))
    }

    fn field(name: &str, e: QueryExpr) -> QueryExpr {
        QueryExpr::Field {
            name: name.into(),
            expr: Box::new(e),
        }
    }

    #[test]
    fn empty_query() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn implicit_and_explicit_and_are_equivalent() {
        let implicit = parse("red shoes").unwrap();
        let explicit = parse("red AND shoes").unwrap();
        assert_eq!(implicit, explicit);
        assert_eq!(
            implicit,
            Some(QueryExpr::And(vec![term("red"), term("shoes")]))
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            parse("red and shoes or boots").unwrap(),
            Some(QueryExpr::Or(vec![
                QueryExpr::And(vec![term("red"), term("shoes")]),
                term("boots")
            ]))
        );
    }

    #[test]
    fn grouping_overrides_precedence() {
        assert_eq!(
            parse("red AND (shoes OR boots)").unwrap(),
            Some(QueryExpr::And(vec![
                term("red"),
                QueryExpr::Or(vec![term("shoes"), term("boots")])
            ]))
        );
    }

    #[test]
    fn not_keyword_and_minus() {
        assert_eq!(
            parse("shoes NOT red -used").unwrap(),
            Some(QueryExpr::And(vec![
                term("shoes"),
                not(term("red")),
                not(term("used"))
            ]))
        );
    }

    #[test]
    fn field_expressions() {
        assert_eq!(
            parse("post_title:\"trail shoes\" color:(red OR blue)").unwrap(),
            Some(QueryExpr::And(vec![
                field(
                    "post_title",
                    QueryExpr::Phrase(vec!["trail".into(), "shoes".into()])
                ),
                field("color", QueryExpr::Or(vec![term("red"), term("blue")]))
            ]))
        );
    }

    #[test]
    fn boost_applies_to_primary() {
        assert_eq!(
            parse("shoes^2 OR boots").unwrap(),
            Some(QueryExpr::Or(vec![
                QueryExpr::boost(term("shoes"), 2.0),
                term("boots")
            ]))
        );
    }

    #[test]
    fn malformed_queries_are_errors() {
        for input in [
            "(red shoes",
            "red)",
            "OR red",
            "red OR",
            "red AND",
            "and red",
            "color:",
            "NOT",
            "\"unclosed",
        ] {
            assert!(parse(input).is_err(), "expected error for {input:?}");
        }
    }

    #[test]
    fn parse_error_carries_query() {
        let err = parse("red OR").unwrap_err();
        assert_eq!(err.query.as_deref(), Some("red OR"));
        assert_eq!(err.message(), "unexpected end of query");
    }
}
