#![forbid(unsafe_code)]

//! Incremental re-highlighting for editable snippets.
//!
//! Each line caches its tokens and the [`ScanState`] it hands to the next
//! line. After an edit only the edited line is re-scanned, plus following
//! lines for as long as the carried state or tokens keep changing.

use crate::config::HighlightConfig;
use crate::document::{Document, Line};
use crate::language::Language;
use crate::state::ScanState;
use crate::style::{Palette, StyleTable};
use crate::token::{Token, validate_tokens};

#[derive(Debug, Clone, PartialEq, Eq)]
struct CachedLine {
    line: Line<'static>,
    state_after: ScanState,
}

/// Per-line token cache for a document that is edited in place.
#[derive(Debug, Clone)]
pub struct IncrementalDocument {
    language: Language,
    palette: Palette,
    placeholder: String,
    lines: Vec<CachedLine>,
}

impl IncrementalDocument {
    /// Tokenize `lines` from scratch with the default config.
    pub fn new(language: Language, lines: &[&str]) -> Self {
        Self::with_config(language, lines, &HighlightConfig::default())
    }

    /// Tokenize `lines` from scratch under `config`.
    pub fn with_config(language: Language, lines: &[&str], config: &HighlightConfig) -> Self {
        let mut doc = Self {
            language,
            palette: config.palette,
            placeholder: config.placeholder.clone(),
            lines: Vec::with_capacity(lines.len()),
        };
        doc.rescan_all(lines);
        doc
    }

    /// Tokenize a whole source text, split on `\n`.
    pub fn from_source(language: Language, source: &str) -> Self {
        let lines: Vec<&str> = source.split('\n').collect();
        Self::new(language, &lines)
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Cached line at `index`.
    pub fn line(&self, index: usize) -> Option<&Line<'static>> {
        self.lines.get(index).map(|cached| &cached.line)
    }

    /// State handed from line `index` to the next one.
    pub fn state_after(&self, index: usize) -> Option<ScanState> {
        self.lines.get(index).map(|cached| cached.state_after)
    }

    fn scan(&self, row: &str, state: ScanState) -> CachedLine {
        let (tokens, state_after) = self.language.scan_line(row, state);
        debug_assert!(validate_tokens(row, &tokens));
        let tokens = tokens.into_iter().map(Token::into_owned).collect();
        CachedLine {
            line: Line::from_scan(row, tokens, &self.placeholder),
            state_after,
        }
    }

    fn rescan_all(&mut self, lines: &[&str]) {
        let mut state = ScanState::new();
        let mut out = Vec::with_capacity(lines.len());
        for row in lines {
            let cached = self.scan(row, state);
            state = cached.state_after;
            out.push(cached);
        }
        self.lines = out;
    }

    /// Re-tokenize after `lines[index]` was edited.
    ///
    /// Scanning continues past the edited line until a line's tokens and exit
    /// state both match the cached ones. A changed line count falls back to a
    /// full rescan. Returns the number of lines scanned.
    pub fn update_line(&mut self, lines: &[&str], index: usize) -> usize {
        if index >= lines.len() {
            return 0;
        }

        if self.lines.len() != lines.len() {
            tracing::debug!(
                old = self.lines.len(),
                new = lines.len(),
                "line count changed, rescanning document"
            );
            self.rescan_all(lines);
            return lines.len();
        }

        let mut state = match index {
            0 => ScanState::new(),
            _ => self.lines[index - 1].state_after,
        };

        let mut scanned = 0;
        for (idx, row) in lines.iter().enumerate().skip(index) {
            let fresh = self.scan(row, state);
            scanned += 1;
            let unchanged = self.lines[idx] == fresh;
            state = fresh.state_after;
            self.lines[idx] = fresh;
            if unchanged {
                break;
            }
        }
        scanned
    }

    /// Snapshot the cached lines as a [`Document`].
    pub fn to_document(&self, overrides: Option<&StyleTable>) -> Document<'static> {
        Document::from_parts(
            self.language,
            self.lines.iter().map(|cached| cached.line.clone()).collect(),
            StyleTable::merged(self.language, self.palette, overrides),
        )
    }
}
