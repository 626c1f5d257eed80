#![forbid(unsafe_code)]

//! Language dispatch.
//!
//! Each supported language maps to one scanner function and one family of
//! default style tables. Scanners are plain functions selected by matching on
//! [`Language`].

use std::fmt;
use std::str::FromStr;

use crate::error::HighlightError;
use crate::state::ScanState;
use crate::style::{self, Palette, StyleDefaults};
use crate::token::{Token, TokenKind};
use crate::{json, shell, typescript};

/// Signature shared by every scanner once wrapped for dispatch.
///
/// Stateless scanners ignore the incoming state and return the empty state.
pub type ScanFn = for<'a> fn(&'a str, ScanState) -> (Vec<Token<'a>>, ScanState);

/// A supported source language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Language {
    /// TypeScript, including TSX markup.
    TypeScript,
    Json,
    Bash,
}

const TYPESCRIPT_KINDS: &[TokenKind] = &[
    TokenKind::Keyword,
    TokenKind::Type,
    TokenKind::String,
    TokenKind::Comment,
    TokenKind::Number,
    TokenKind::Operator,
    TokenKind::Function,
    TokenKind::Hook,
    TokenKind::Property,
    TokenKind::MarkupBracket,
    TokenKind::MarkupTag,
    TokenKind::MarkupAttribute,
    TokenKind::MarkupBrace,
    TokenKind::Plain,
];

const JSON_KINDS: &[TokenKind] = &[
    TokenKind::Key,
    TokenKind::String,
    TokenKind::Number,
    TokenKind::Boolean,
    TokenKind::Punctuation,
    TokenKind::Plain,
];

const BASH_KINDS: &[TokenKind] = &[
    TokenKind::Keyword,
    TokenKind::Command,
    TokenKind::Variable,
    TokenKind::String,
    TokenKind::Flag,
    TokenKind::Operator,
    TokenKind::Comment,
    TokenKind::Substitution,
    TokenKind::Plain,
];

impl Language {
    pub const ALL: [Language; 3] = [Self::TypeScript, Self::Json, Self::Bash];

    /// Resolve a language tag: `typescript`, `ts`, `tsx`, `json`, `bash` or
    /// `sh`. Surrounding whitespace and ASCII case are ignored.
    pub fn from_tag(tag: &str) -> Result<Self, HighlightError> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "typescript" | "ts" | "tsx" => Ok(Self::TypeScript),
            "json" => Ok(Self::Json),
            "bash" | "sh" => Ok(Self::Bash),
            _ => {
                tracing::warn!(tag, "unsupported language tag");
                Err(HighlightError::UnsupportedLanguage(tag.to_string()))
            }
        }
    }

    /// Look up a language by file extension (dot optional, case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "ts" | "tsx" | "mts" | "cts" => Some(Self::TypeScript),
            "json" => Some(Self::Json),
            "sh" | "bash" => Some(Self::Bash),
            _ => None,
        }
    }

    /// Canonical tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::Json => "json",
            Self::Bash => "bash",
        }
    }

    /// The closed set of kinds this language's scanner emits.
    #[must_use]
    pub const fn kinds(self) -> &'static [TokenKind] {
        match self {
            Self::TypeScript => TYPESCRIPT_KINDS,
            Self::Json => JSON_KINDS,
            Self::Bash => BASH_KINDS,
        }
    }

    /// Whether this language can emit `kind`.
    pub fn emits(self, kind: TokenKind) -> bool {
        self.kinds().contains(&kind)
    }

    /// Whether the scanner threads state between lines.
    #[must_use]
    pub const fn is_stateful(self) -> bool {
        matches!(self, Self::TypeScript)
    }

    /// The scanner function for this language.
    #[must_use]
    pub fn scanner(self) -> ScanFn {
        match self {
            Self::TypeScript => typescript::scan_line,
            Self::Json => scan_json,
            Self::Bash => scan_shell,
        }
    }

    /// Scan one line with this language's scanner.
    pub fn scan_line(self, line: &str, state: ScanState) -> (Vec<Token<'_>>, ScanState) {
        (self.scanner())(line, state)
    }

    /// Default style table for `palette`.
    #[must_use]
    pub fn default_styles(self, palette: Palette) -> StyleDefaults {
        style::default_table(self, palette)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = HighlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
    }
}

fn scan_json(line: &str, _state: ScanState) -> (Vec<Token<'_>>, ScanState) {
    (json::scan_line(line), ScanState::new())
}

fn scan_shell(line: &str, _state: ScanState) -> (Vec<Token<'_>>, ScanState) {
    (shell::scan_line(line), ScanState::new())
}

/// Scanner and default styles selected for a language tag.
#[derive(Clone, Copy)]
pub struct Dispatch {
    pub language: Language,
    pub scan: ScanFn,
    /// Defaults for the dark palette; see [`Language::default_styles`].
    pub default_styles: StyleDefaults,
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch")
            .field("language", &self.language)
            .field("default_styles", &self.default_styles.len())
            .finish_non_exhaustive()
    }
}

/// Select the scanner and default style table for `tag`.
///
/// Unknown tags are an error; there is no fallback language.
pub fn dispatch(tag: &str) -> Result<Dispatch, HighlightError> {
    let language = Language::from_tag(tag)?;
    Ok(Dispatch {
        language,
        scan: language.scanner(),
        default_styles: language.default_styles(Palette::Dark),
    })
}
