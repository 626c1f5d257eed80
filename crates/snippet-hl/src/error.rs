#![forbid(unsafe_code)]

use std::fmt;

/// Errors surfaced to callers of the highlighting API.
///
/// Malformed source text is never an error; scanners degrade to `plain`
/// tokens instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    /// The language tag is not one of the supported tags.
    UnsupportedLanguage(String),
    /// A style override table could not be parsed.
    InvalidStyleTable(String),
}

impl fmt::Display for HighlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedLanguage(tag) => write!(
                f,
                "unsupported language: {tag:?} (expected typescript, ts, tsx, json, bash or sh)"
            ),
            Self::InvalidStyleTable(msg) => write!(f, "invalid style table: {msg}"),
        }
    }
}

impl std::error::Error for HighlightError {}
