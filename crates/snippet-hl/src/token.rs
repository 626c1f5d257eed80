#![forbid(unsafe_code)]

//! Token model shared by every scanner.
//!
//! A [`Token`] is a verbatim slice of one source line tagged with a
//! [`TokenKind`]. Scanners borrow from the line they were given; call
//! [`Token::into_owned`] to detach a token from its source.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Token kinds
// ---------------------------------------------------------------------------

/// Classification attached to a token.
///
/// The enum is the union of every language vocabulary. Each language only
/// ever emits its own subset, see [`crate::Language::kinds`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum TokenKind {
    // Shared
    Keyword,
    Type,
    String,
    Comment,
    Number,
    Operator,
    Function,
    Hook,
    Property,

    // Embedded markup (TSX)
    MarkupBracket,
    MarkupTag,
    MarkupAttribute,
    MarkupBrace,

    // JSON
    Key,
    Boolean,
    Punctuation,

    // Shell
    Command,
    Variable,
    /// A command-line flag such as `-v` or `--force`. Named `option`.
    #[cfg_attr(feature = "serde", serde(rename = "option"))]
    Flag,
    Substitution,

    /// Anything the rules did not classify, including whitespace.
    Plain,
}

impl TokenKind {
    /// Every kind, in declaration order.
    pub const ALL: [TokenKind; 21] = [
        Self::Keyword,
        Self::Type,
        Self::String,
        Self::Comment,
        Self::Number,
        Self::Operator,
        Self::Function,
        Self::Hook,
        Self::Property,
        Self::MarkupBracket,
        Self::MarkupTag,
        Self::MarkupAttribute,
        Self::MarkupBrace,
        Self::Key,
        Self::Boolean,
        Self::Punctuation,
        Self::Command,
        Self::Variable,
        Self::Flag,
        Self::Substitution,
        Self::Plain,
    ];

    /// Stable kebab-case name, used for style table keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Type => "type",
            Self::String => "string",
            Self::Comment => "comment",
            Self::Number => "number",
            Self::Operator => "operator",
            Self::Function => "function",
            Self::Hook => "hook",
            Self::Property => "property",
            Self::MarkupBracket => "markup-bracket",
            Self::MarkupTag => "markup-tag",
            Self::MarkupAttribute => "markup-attribute",
            Self::MarkupBrace => "markup-brace",
            Self::Key => "key",
            Self::Boolean => "boolean",
            Self::Punctuation => "punctuation",
            Self::Command => "command",
            Self::Variable => "variable",
            Self::Flag => "option",
            Self::Substitution => "substitution",
            Self::Plain => "plain",
        }
    }

    /// Whether this kind belongs to the embedded-markup family.
    pub fn is_markup(self) -> bool {
        matches!(
            self,
            Self::MarkupBracket | Self::MarkupTag | Self::MarkupAttribute | Self::MarkupBrace
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no [`TokenKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTokenKind(pub String);

impl fmt::Display for UnknownTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown token kind: {}", self.0)
    }
}

impl std::error::Error for UnknownTokenKind {}

impl FromStr for TokenKind {
    type Err = UnknownTokenKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(key))
            .ok_or_else(|| UnknownTokenKind(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// A classified, verbatim slice of one input line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token<'a> {
    pub text: Cow<'a, str>,
    pub kind: TokenKind,
}

impl<'a> Token<'a> {
    /// Create a token borrowing `text`.
    pub fn new(kind: TokenKind, text: &'a str) -> Self {
        debug_assert!(!text.is_empty(), "tokens must not be empty");
        Self {
            text: Cow::Borrowed(text),
            kind,
        }
    }

    /// Shorthand for a `plain` token.
    pub fn plain(text: &'a str) -> Self {
        Self::new(TokenKind::Plain, text)
    }

    /// Token length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the token carries no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Detach the token from the source it borrows.
    pub fn into_owned(self) -> Token<'static> {
        Token {
            text: Cow::Owned(self.text.into_owned()),
            kind: self.kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Concatenate token texts.
pub fn join_tokens(tokens: &[Token<'_>]) -> String {
    let mut out = String::with_capacity(tokens.iter().map(Token::len).sum());
    for token in tokens {
        out.push_str(&token.text);
    }
    out
}

/// Check that `tokens` are non-empty and reproduce `line` exactly.
pub fn validate_tokens(line: &str, tokens: &[Token<'_>]) -> bool {
    let mut pos = 0;
    for token in tokens {
        if token.is_empty() {
            return false;
        }
        let end = pos + token.len();
        if line.get(pos..end) != Some(token.text.as_ref()) {
            return false;
        }
        pos = end;
    }
    pos == line.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip_through_from_str() {
        for kind in TokenKind::ALL {
            assert_eq!(kind.as_str().parse::<TokenKind>(), Ok(kind));
        }
    }

    #[test]
    fn kind_parse_is_case_insensitive() {
        assert_eq!("Markup-Tag".parse::<TokenKind>(), Ok(TokenKind::MarkupTag));
        assert_eq!(" option ".parse::<TokenKind>(), Ok(TokenKind::Flag));
    }

    #[test]
    fn kind_parse_rejects_unknown() {
        let err = "lifetime".parse::<TokenKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown token kind: lifetime");
    }

    #[test]
    fn markup_predicate() {
        assert!(TokenKind::MarkupBrace.is_markup());
        assert!(TokenKind::MarkupTag.is_markup());
        assert!(!TokenKind::Operator.is_markup());
    }

    #[test]
    fn token_accessors() {
        let t = Token::new(TokenKind::Keyword, "const");
        assert_eq!(t.len(), 5);
        assert!(!t.is_empty());
        assert_eq!(t.kind, TokenKind::Keyword);
    }

    #[test]
    fn into_owned_preserves_content() {
        let source = String::from("let");
        let owned = Token::new(TokenKind::Keyword, &source).into_owned();
        drop(source);
        assert_eq!(owned.text, "let");
        assert_eq!(owned.kind, TokenKind::Keyword);
    }

    #[test]
    fn validate_accepts_exact_cover() {
        let tokens = [Token::plain("a"), Token::plain(" "), Token::plain("b")];
        assert!(validate_tokens("a b", &tokens));
        assert_eq!(join_tokens(&tokens), "a b");
    }

    #[test]
    fn validate_rejects_gaps_and_mismatches() {
        assert!(!validate_tokens("a b", &[Token::plain("a"), Token::plain("b")]));
        assert!(!validate_tokens("ab", &[Token::plain("a")]));
        assert!(!validate_tokens("ab", &[Token::plain("ab"), Token::plain("c")]));
    }

    #[test]
    fn validate_empty_line() {
        assert!(validate_tokens("", &[]));
    }
}
