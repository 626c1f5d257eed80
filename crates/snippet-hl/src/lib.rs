#![forbid(unsafe_code)]

//! Line-based source tokenizer for highlighting code snippets.
//!
//! Supported languages are TypeScript (including TSX markup), JSON and Bash.
//! Scanning is lexical and best-effort: there is no parser, and malformed
//! input degrades to `plain` tokens instead of failing.
//!
//! - [`format`] / [`format_with`] - turn source text into a [`Document`]
//! - [`Token`] / [`TokenKind`] - verbatim slices with a classification
//! - [`ScanState`] - context carried from one line to the next
//! - [`style_of`] / [`StyleTable`] - resolve kinds to opaque style strings
//! - [`dispatch`] / [`Language`] - pick a scanner by language tag
//! - [`Highlighter`] / [`DocumentCache`] - cached formatting for repeated renders
//! - [`IncrementalDocument`] - re-highlight only what an edit affects
//!
//! # Example
//! ```
//! use snippet_hl::{TokenKind, format};
//!
//! let doc = format("const x = <App />;\n\nls", "tsx", None).unwrap();
//! assert_eq!(doc.line_count(), 3);
//!
//! let first = &doc.lines()[0];
//! assert_eq!(first.tokens()[0].kind, TokenKind::Keyword);
//! assert_eq!(first.source_text(), "const x = <App />;");
//!
//! // Empty rows keep their height with a placeholder token.
//! assert!(doc.lines()[1].is_blank());
//!
//! let style = doc.style_of(TokenKind::MarkupTag);
//! assert!(style.starts_with("color:"));
//! ```

pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod highlighter;
pub mod incremental;
pub mod json;
pub mod language;
pub mod shell;
pub mod state;
pub mod style;
pub mod token;
pub mod typescript;

pub use cache::{CacheStats, DocumentCache};
pub use config::{ConfigError, ConfigParse, DEFAULT_PLACEHOLDER, HighlightConfig};
pub use document::{Document, Line, format, format_with};
pub use error::HighlightError;
pub use highlighter::Highlighter;
pub use incremental::IncrementalDocument;
pub use language::{Dispatch, Language, ScanFn, dispatch};
pub use state::ScanState;
pub use style::{
    PLAIN_STYLE, Palette, StyleDefaults, StyleTable, StyleTableBuilder, style_of, style_of_in,
};
pub use token::{Token, TokenKind, UnknownTokenKind, join_tokens, validate_tokens};
