//! Free-text lexer (tokenizer).
//!
//! Converts search text into a stream of tokens. Boolean keywords are recognized here so
//! the classifier can decide whether the text uses query syntax at all.

use std::{fmt, iter::Peekable, str::Chars};

use crate::error::LexError;

/// A token in the search text.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A bare word.
    Term(String),

    /// A quoted phrase (the quotes are stripped, content preserved).
    Phrase(String),

    /// The AND keyword (any case).
    And,

    /// The OR keyword (any case).
    Or,

    /// The NOT keyword (uppercase only).
    Not,

    /// Negation prefix (`-`).
    Minus,

    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,

    /// Field prefix (e.g., "post_title:" produces FieldPrefix("post_title")).
    FieldPrefix(String),

    /// Boost operator with factor (e.g., "^2.5" produces Boost(2.5)).
    Boost(f32),
}

impl Token {
    /// Returns true if the token only appears in explicit query syntax.
    ///
    /// A leading `-` or a boost alone does not make text a boolean query.
    pub fn is_boolean_syntax(&self) -> bool {
        matches!(
            self,
            Self::And | Self::Or | Self::Not | Self::LParen | Self::RParen | Self::FieldPrefix(_)
        )
    }

    /// Returns true if no space is rendered after this token.
    fn binds_right(&self) -> bool {
        matches!(self, Self::Minus | Self::LParen | Self::FieldPrefix(_))
    }

    /// Returns true if no space is rendered before this token.
    fn binds_left(&self) -> bool {
        matches!(self, Self::RParen | Self::Boost(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term(s) => f.write_str(s),
            Self::Phrase(s) => write!(f, "\"{s}\""),
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
            Self::Not => f.write_str("NOT"),
            Self::Minus => f.write_str("-"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::FieldPrefix(name) => write!(f, "{name}:"),
            Self::Boost(factor) => write!(f, "^{factor}"),
        }
    }
}

/// Renders a token stream back to text with normalized keywords and spacing.
///
/// User-authored grouping and operator order are preserved exactly.
pub fn render_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut previous: Option<&Token> = None;
    for token in tokens {
        if let Some(prev) = previous
            && !prev.binds_right()
            && !token.binds_left()
        {
            out.push(' ');
        }
        out.push_str(&token.to_string());
        previous = Some(token);
    }
    out
}

/// Tokenizes search text.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Creates an error at a specific position.
    fn error_at(&self, message: impl Into<String>, position: usize) -> LexError {
        LexError::new(message, position, self.input)
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();

        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };

        match ch {
            '"' => self.read_phrase(),
            '(' => {
                self.advance();
                Ok(Some(Token::LParen))
            }
            ')' => {
                self.advance();
                Ok(Some(Token::RParen))
            }
            '-' => {
                self.advance();
                Ok(Some(Token::Minus))
            }
            '^' => self.read_boost(),
            _ => Ok(self.read_term_or_keyword()),
        }
    }

    /// Reads a quoted phrase.
    fn read_phrase(&mut self) -> Result<Option<Token>, LexError> {
        let start_pos = self.position;
        self.advance();

        let mut content = String::new();

        loop {
            match self.chars.peek() {
                Some(&'"') => {
                    self.advance();
                    return Ok(Some(Token::Phrase(content)));
                }
                Some(&ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => {
                    return Err(self.error_at("unclosed quote", start_pos));
                }
            }
        }
    }

    /// Reads a term, keyword, or field prefix.
    fn read_term_or_keyword(&mut self) -> Option<Token> {
        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || ch == '(' || ch == ')' || ch == '"' || ch == '^' {
                break;
            }

            if ch == ':' {
                self.advance();
                if word.is_empty() {
                    continue;
                }
                return Some(Token::FieldPrefix(word));
            }

            word.push(ch);
            self.advance();
        }

        if word.is_empty() {
            return None;
        }

        if word.eq_ignore_ascii_case("AND") {
            return Some(Token::And);
        }
        if word.eq_ignore_ascii_case("OR") {
            return Some(Token::Or);
        }
        // Lowercase "not" is an ordinary word.
        if word == "NOT" {
            return Some(Token::Not);
        }

        Some(Token::Term(word))
    }

    /// Reads a boost operator (^N or ^N.N).
    fn read_boost(&mut self) -> Result<Option<Token>, LexError> {
        let start_pos = self.position;
        self.advance();

        let mut number = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() || (ch == '.' && !number.contains('.')) {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if number.is_empty() {
            return Err(self.error_at("expected number after '^'", start_pos));
        }

        match number.parse::<f32>() {
            Ok(factor) => Ok(Some(Token::Boost(factor))),
            Err(_) => Err(self.error_at(format!("invalid boost value: {number}"), start_pos)),
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Convenience function to tokenize search text.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}
