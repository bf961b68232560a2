//! Syntax highlighting and terminal colors for sift.
//!
//! Configuration is shown as TOML and every engine-facing artifact (mappings, documents,
//! requests, parsed results) as JSON. [`Highlighter`] colors both for a terminal;
//! callers writing to a pipe print the plain text instead.

#![warn(missing_docs)]

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::{SyntaxReference, SyntaxSet},
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// Resets all terminal attributes.
const RESET: &str = "\x1b[0m";

/// Highlights TOML and JSON for terminal output.
pub struct Highlighter {
    /// Language definitions, including TOML from the two-face extras.
    syntax_set: SyntaxSet,
    /// Color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// Active theme.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a highlighter with the Dracula theme.
    pub fn new() -> Self {
        Self::with_theme(EmbeddedThemeName::Dracula)
    }

    /// Creates a highlighter with the given theme.
    pub fn with_theme(theme: EmbeddedThemeName) -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme,
        }
    }

    /// Highlights TOML.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights JSON.
    pub fn highlight_json(&self, content: &str) -> String {
        self.highlight(content, "json")
    }

    /// Highlights content in the syntax named by a file extension or syntax name.
    ///
    /// Unknown syntaxes are highlighted as plain text.
    pub fn highlight(&self, content: &str, syntax: &str) -> String {
        let syntax = self.find_syntax(syntax);
        let mut lines = HighlightLines::new(syntax, self.theme_set.get(self.theme));

        let mut output = String::with_capacity(content.len() * 2);
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = lines
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges, false));
        }
        output.push_str(RESET);
        output
    }

    /// Looks a syntax up by extension, then by name.
    fn find_syntax(&self, syntax: &str) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_extension(syntax)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }
}

/// Text styles for status and structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Section headers.
    Header,
    /// Emphasized labels.
    Strong,
    /// Secondary information.
    Dim,
    /// Completed actions.
    Success,
    /// Non-fatal problems.
    Warning,
    /// Failures.
    Error,
}

impl Tone {
    /// Returns the escape sequence that starts the style.
    pub fn code(self) -> &'static str {
        match self {
            Self::Header => "\x1b[1m\x1b[36m",
            Self::Strong => "\x1b[1m",
            Self::Dim => "\x1b[2m",
            Self::Success => "\x1b[32m",
            Self::Warning => "\x1b[33m",
            Self::Error => "\x1b[31m",
        }
    }
}

/// Wraps text in a style.
pub fn paint(tone: Tone, text: &str) -> String {
    format!("{}{text}{RESET}", tone.code())
}

/// Formats a section header (bold cyan).
pub fn header(text: &str) -> String {
    paint(Tone::Header, text)
}

/// Formats an emphasized label (bold).
pub fn strong(text: &str) -> String {
    paint(Tone::Strong, text)
}

/// Formats secondary text (dim).
pub fn dim(text: &str) -> String {
    paint(Tone::Dim, text)
}

/// Formats a success message (green).
pub fn success(text: &str) -> String {
    paint(Tone::Success, text)
}

/// Formats a warning (yellow).
pub fn warning(text: &str) -> String {
    paint(Tone::Warning, text)
}

/// Formats an error (red).
pub fn error(text: &str) -> String {
    paint(Tone::Error, text)
}

/// Returns a dimmed horizontal rule.
pub fn rule(width: usize) -> String {
    dim(&"─".repeat(width))
}
