#![forbid(unsafe_code)]

//! Kind-to-style resolution.
//!
//! Styles are opaque strings (CSS declarations in the bundled defaults) that
//! the presentation layer applies verbatim. Resolution order for a kind:
//! caller override, then the language default for the active palette, then
//! [`PLAIN_STYLE`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::HighlightError;
use crate::language::Language;
use crate::token::TokenKind;

/// A static default table: `(kind, style)` pairs.
pub type StyleDefaults = &'static [(TokenKind, &'static str)];

/// Final fallback for kinds no table mentions.
pub const PLAIN_STYLE: &str = "color:inherit";

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// Named family of default style tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Palette {
    /// Readable on dark backgrounds.
    #[default]
    Dark,
    /// Readable on light backgrounds.
    Light,
}

impl Palette {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parse a palette name, ignoring surrounding whitespace and ASCII case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Palette {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown palette: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Default tables
// ---------------------------------------------------------------------------

macro_rules! palette_tables {
    (
        $module:ident {
            purple: $purple:literal,
            blue: $blue:literal,
            cyan: $cyan:literal,
            green: $green:literal,
            orange: $orange:literal,
            red: $red:literal,
            yellow: $yellow:literal,
            gray: $gray:literal,
            text: $text:literal $(,)?
        }
    ) => {
        mod $module {
            use super::StyleDefaults;
            use crate::token::TokenKind;

            pub(super) const TYPESCRIPT: StyleDefaults = &[
                (TokenKind::Keyword, concat!("color:", $purple, ";font-weight:bold")),
                (TokenKind::Type, concat!("color:", $yellow)),
                (TokenKind::String, concat!("color:", $cyan)),
                (TokenKind::Comment, concat!("color:", $green, ";font-style:italic")),
                (TokenKind::Number, concat!("color:", $orange)),
                (TokenKind::Operator, concat!("color:", $gray)),
                (TokenKind::Function, concat!("color:", $blue)),
                (TokenKind::Hook, concat!("color:", $blue, ";font-weight:bold")),
                (TokenKind::Property, concat!("color:", $red)),
                (TokenKind::MarkupBracket, concat!("color:", $gray)),
                (TokenKind::MarkupTag, concat!("color:", $red)),
                (TokenKind::MarkupAttribute, concat!("color:", $orange)),
                (TokenKind::MarkupBrace, concat!("color:", $yellow)),
                (TokenKind::Plain, concat!("color:", $text)),
            ];

            pub(super) const JSON: StyleDefaults = &[
                (TokenKind::Key, concat!("color:", $red)),
                (TokenKind::String, concat!("color:", $cyan)),
                (TokenKind::Number, concat!("color:", $orange)),
                (TokenKind::Boolean, concat!("color:", $purple)),
                (TokenKind::Punctuation, concat!("color:", $gray)),
                (TokenKind::Plain, concat!("color:", $text)),
            ];

            pub(super) const BASH: StyleDefaults = &[
                (TokenKind::Keyword, concat!("color:", $purple, ";font-weight:bold")),
                (TokenKind::Command, concat!("color:", $blue)),
                (TokenKind::Variable, concat!("color:", $red)),
                (TokenKind::String, concat!("color:", $cyan)),
                (TokenKind::Flag, concat!("color:", $orange)),
                (TokenKind::Operator, concat!("color:", $gray)),
                (TokenKind::Comment, concat!("color:", $green, ";font-style:italic")),
                (TokenKind::Substitution, concat!("color:", $yellow)),
                (TokenKind::Plain, concat!("color:", $text)),
            ];
        }
    };
}

palette_tables!(dark {
    purple: "#c678dd",
    blue: "#61afef",
    cyan: "#56b6c2",
    green: "#98c379",
    orange: "#d19a66",
    red: "#e06c75",
    yellow: "#e5c07b",
    gray: "#5c6370",
    text: "#abb2bf",
});

// Darker, more saturated variants.
palette_tables!(light {
    purple: "#8839a9",
    blue: "#005cc5",
    cyan: "#008080",
    green: "#50783c",
    orange: "#986801",
    red: "#c13434",
    yellow: "#856404",
    gray: "#5f6368",
    text: "#383a42",
});

/// The bundled default table for `language` under `palette`.
#[must_use]
pub fn default_table(language: Language, palette: Palette) -> StyleDefaults {
    match (palette, language) {
        (Palette::Dark, Language::TypeScript) => dark::TYPESCRIPT,
        (Palette::Dark, Language::Json) => dark::JSON,
        (Palette::Dark, Language::Bash) => dark::BASH,
        (Palette::Light, Language::TypeScript) => light::TYPESCRIPT,
        (Palette::Light, Language::Json) => light::JSON,
        (Palette::Light, Language::Bash) => light::BASH,
    }
}

fn default_style(kind: TokenKind, language: Language, palette: Palette) -> Option<&'static str> {
    default_table(language, palette)
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, style)| *style)
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Resolve `kind` with the dark palette.
#[must_use]
pub fn style_of<'t>(
    kind: TokenKind,
    language: Language,
    overrides: Option<&'t StyleTable>,
) -> &'t str {
    style_of_in(kind, language, Palette::Dark, overrides)
}

/// Resolve `kind`: override, then palette default, then [`PLAIN_STYLE`].
#[must_use]
pub fn style_of_in<'t>(
    kind: TokenKind,
    language: Language,
    palette: Palette,
    overrides: Option<&'t StyleTable>,
) -> &'t str {
    overrides
        .and_then(|table| table.get(kind))
        .or_else(|| default_style(kind, language, palette))
        .unwrap_or(PLAIN_STYLE)
}

// ---------------------------------------------------------------------------
// StyleTable
// ---------------------------------------------------------------------------

/// A partial mapping from token kind to style string.
///
/// Used both for caller overrides and for the fully merged table a
/// [`crate::Document`] carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StyleTable {
    entries: BTreeMap<TokenKind, String>,
}

impl StyleTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> StyleTableBuilder {
        StyleTableBuilder::new()
    }

    /// Copy a static default table.
    pub fn from_defaults(defaults: StyleDefaults) -> Self {
        defaults
            .iter()
            .map(|&(kind, style)| (kind, style.to_string()))
            .collect()
    }

    /// Defaults for `language`/`palette` with `overrides` laid on top.
    ///
    /// Override entries for kinds the language never emits are kept; they are
    /// harmless and keep the merge a plain union.
    pub fn merged(language: Language, palette: Palette, overrides: Option<&StyleTable>) -> Self {
        let mut table = Self::from_defaults(default_table(language, palette));
        if let Some(overrides) = overrides {
            for (kind, style) in &overrides.entries {
                table.entries.insert(*kind, style.clone());
            }
        }
        table
    }

    /// Parse a JSON object mapping kind names to style strings, e.g.
    /// `{"keyword": "color:red", "markup-tag": "color:blue"}`.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, HighlightError> {
        let raw: BTreeMap<String, String> = serde_json::from_str(json)
            .map_err(|err| HighlightError::InvalidStyleTable(err.to_string()))?;
        raw.into_iter()
            .map(|(name, style)| {
                name.parse::<TokenKind>()
                    .map(|kind| (kind, style))
                    .map_err(|err| HighlightError::InvalidStyleTable(err.to_string()))
            })
            .collect()
    }

    /// Serialize to the JSON shape accepted by [`StyleTable::from_json`].
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, HighlightError> {
        serde_json::to_string(&self.entries)
            .map_err(|err| HighlightError::InvalidStyleTable(err.to_string()))
    }

    /// Set the style for `kind`, returning the previous one.
    pub fn insert(&mut self, kind: TokenKind, style: impl Into<String>) -> Option<String> {
        self.entries.insert(kind, style.into())
    }

    pub fn remove(&mut self, kind: TokenKind) -> Option<String> {
        self.entries.remove(&kind)
    }

    #[must_use]
    pub fn get(&self, kind: TokenKind) -> Option<&str> {
        self.entries.get(&kind).map(String::as_str)
    }

    /// Style for `kind`, falling back to [`PLAIN_STYLE`].
    #[must_use]
    pub fn resolve(&self, kind: TokenKind) -> &str {
        self.get(kind).unwrap_or(PLAIN_STYLE)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (TokenKind, &str)> {
        self.entries
            .iter()
            .map(|(kind, style)| (*kind, style.as_str()))
    }
}

impl FromIterator<(TokenKind, String)> for StyleTable {
    fn from_iter<I: IntoIterator<Item = (TokenKind, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(not(feature = "serde"))]
impl StyleTable {
    /// Parsing overrides from JSON requires the `serde` feature.
    pub fn from_json(_json: &str) -> Result<Self, HighlightError> {
        Err(HighlightError::InvalidStyleTable(
            "JSON style tables require the `serde` feature".to_string(),
        ))
    }
}

/// Builder for override tables.
#[derive(Debug, Clone, Default)]
pub struct StyleTableBuilder {
    table: StyleTable,
}

impl StyleTableBuilder {
    /// Start from an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing table.
    pub fn from_table(table: StyleTable) -> Self {
        Self { table }
    }

    /// Set the style for any kind.
    pub fn set(mut self, kind: TokenKind, style: impl Into<String>) -> Self {
        self.table.insert(kind, style);
        self
    }

    pub fn keyword(self, style: impl Into<String>) -> Self {
        self.set(TokenKind::Keyword, style)
    }

    pub fn string(self, style: impl Into<String>) -> Self {
        self.set(TokenKind::String, style)
    }

    pub fn comment(self, style: impl Into<String>) -> Self {
        self.set(TokenKind::Comment, style)
    }

    pub fn number(self, style: impl Into<String>) -> Self {
        self.set(TokenKind::Number, style)
    }

    pub fn function(self, style: impl Into<String>) -> Self {
        self.set(TokenKind::Function, style)
    }

    /// Set one style for every markup kind.
    pub fn markup(mut self, style: impl Into<String>) -> Self {
        let style = style.into();
        for kind in TokenKind::ALL.into_iter().filter(|k| k.is_markup()) {
            self.table.insert(kind, style.clone());
        }
        self
    }

    pub fn plain(self, style: impl Into<String>) -> Self {
        self.set(TokenKind::Plain, style)
    }

    pub fn build(self) -> StyleTable {
        self.table
    }
}
