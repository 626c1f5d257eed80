#![forbid(unsafe_code)]

//! Whole-document formatting.
//!
//! A document is split on `\n`; each row is scanned under the state left by
//! the row before it. `N` line breaks always produce `N + 1` lines.

use std::borrow::Cow;

use crate::config::HighlightConfig;
use crate::error::HighlightError;
use crate::language::Language;
use crate::state::ScanState;
use crate::style::StyleTable;
use crate::token::{Token, TokenKind, join_tokens};

// ---------------------------------------------------------------------------
// Line
// ---------------------------------------------------------------------------

/// Tokens of one source row.
///
/// An empty row holds a single `plain` placeholder token so it keeps its
/// height when rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Line<'a> {
    tokens: Vec<Token<'a>>,
    blank: bool,
}

impl<'a> Line<'a> {
    /// Wrap scanner output for `source`, substituting the placeholder for an
    /// empty row.
    pub(crate) fn from_scan(source: &str, tokens: Vec<Token<'a>>, placeholder: &str) -> Self {
        if source.is_empty() {
            Self {
                tokens: vec![Token {
                    text: Cow::Owned(placeholder.to_string()),
                    kind: TokenKind::Plain,
                }],
                blank: true,
            }
        } else {
            Self {
                tokens,
                blank: false,
            }
        }
    }

    pub fn tokens(&self) -> &[Token<'a>] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token<'a>> {
        self.tokens.iter()
    }

    /// Whether the source row was empty.
    pub fn is_blank(&self) -> bool {
        self.blank
    }

    /// The source row this line was scanned from (`""` for a blank line).
    pub fn source_text(&self) -> String {
        if self.blank {
            String::new()
        } else {
            join_tokens(&self.tokens)
        }
    }

    pub fn into_owned(self) -> Line<'static> {
        Line {
            tokens: self.tokens.into_iter().map(Token::into_owned).collect(),
            blank: self.blank,
        }
    }
}

impl<'l, 'a> IntoIterator for &'l Line<'a> {
    type Item = &'l Token<'a>;
    type IntoIter = std::slice::Iter<'l, Token<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A formatted snippet: one [`Line`] per source row plus the merged style
/// table it was formatted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
    language: Language,
    lines: Vec<Line<'a>>,
    styles: StyleTable,
}

impl<'a> Document<'a> {
    pub(crate) fn from_parts(language: Language, lines: Vec<Line<'a>>, styles: StyleTable) -> Self {
        Self {
            language,
            lines,
            styles,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn lines(&self) -> &[Line<'a>] {
        &self.lines
    }

    /// Number of lines; always at least one.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The merged style table (palette defaults plus overrides).
    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    /// Style for `kind` under this document's merged table.
    pub fn style_of(&self, kind: TokenKind) -> &str {
        self.styles.resolve(kind)
    }

    /// Every token paired with its resolved style, line by line.
    pub fn styled_lines(&self) -> impl Iterator<Item = Vec<(&Token<'a>, &str)>> + '_ {
        self.lines.iter().map(move |line| {
            line.iter()
                .map(|token| (token, self.style_of(token.kind)))
                .collect()
        })
    }

    /// Reassemble the source text.
    pub fn source_text(&self) -> String {
        self.lines
            .iter()
            .map(Line::source_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn into_owned(self) -> Document<'static> {
        Document {
            language: self.language,
            lines: self.lines.into_iter().map(Line::into_owned).collect(),
            styles: self.styles,
        }
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Format `source` for the language named by `tag` with default config.
///
/// Fails only when the tag is unsupported.
pub fn format<'a>(
    source: &'a str,
    tag: &str,
    overrides: Option<&StyleTable>,
) -> Result<Document<'a>, HighlightError> {
    let language = Language::from_tag(tag)?;
    Ok(format_with(
        source,
        language,
        overrides,
        &HighlightConfig::default(),
    ))
}

/// Format `source` as `language` under `config`.
pub fn format_with<'a>(
    source: &'a str,
    language: Language,
    overrides: Option<&StyleTable>,
    config: &HighlightConfig,
) -> Document<'a> {
    let span = tracing::debug_span!(
        "format_document",
        language = language.as_str(),
        bytes = source.len(),
        lines = tracing::field::Empty,
    );
    let _guard = span.enter();

    let mut state = ScanState::new();
    let mut lines = Vec::new();
    for row in source.split('\n') {
        let (tokens, next) = language.scan_line(row, state);
        state = next;
        lines.push(Line::from_scan(row, tokens, &config.placeholder));
    }
    span.record("lines", lines.len());

    Document::from_parts(
        language,
        lines,
        StyleTable::merged(language, config.palette, overrides),
    )
}
