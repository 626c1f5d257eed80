#![forbid(unsafe_code)]

//! TypeScript/TSX scanner.
//!
//! Rules are tried in a fixed priority order at the start of the unconsumed
//! suffix; the first one that matches emits its tokens and the loop starts
//! over. Every rule consumes at least one character, so a line of `n` bytes
//! is scanned in at most `n` iterations.
//!
//! Embedded markup is tracked with a best-effort [`ScanState`]: an opening
//! `<tag` sets `in_markup_element`, a closing `>` or `/>` clears it, and
//! `{`/`}` move `brace_depth`. Once a line is scanned, [`line_heuristic`]
//! adjusts the state handed to the next line. Generic type parameters such as
//! `Array<string>` look like markup to these rules and are highlighted as
//! such; that is a known limitation, not a bug to work around here.

use crate::state::ScanState;
use crate::token::{Token, TokenKind};

/// Reserved words, matched as whole identifiers.
pub const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "break", "case", "catch", "class", "const", "continue",
    "debugger", "declare", "default", "delete", "do", "else", "enum", "export", "extends",
    "false", "finally", "for", "from", "function", "if", "implements", "import", "in", "infer",
    "instanceof", "interface", "keyof", "let", "module", "namespace", "new", "null", "of",
    "override", "private", "protected", "public", "readonly", "return", "satisfies", "static",
    "super", "switch", "this", "throw", "true", "try", "type", "typeof", "var", "while", "with",
    "yield",
];

/// Primitive and common built-in type names.
pub const TYPES: &[&str] = &[
    "any", "bigint", "boolean", "never", "number", "object", "string", "symbol", "undefined",
    "unknown", "void", "Array", "Awaited", "BigInt", "Boolean", "Date", "Error", "Exclude",
    "Extract", "Function", "HTMLElement", "Map", "NonNullable", "Number", "Object", "Omit",
    "Parameters", "Partial", "Pick", "Promise", "ReactElement", "ReactNode", "Readonly",
    "ReadonlyArray", "Record", "RegExp", "Required", "ReturnType", "Set", "String", "Symbol",
    "WeakMap", "WeakSet",
];

/// Operator alphabet, longest first so the first prefix hit is the longest.
const OPERATORS: &[&str] = &[
    ">>>=", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "...", "=>", "==",
    "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "**", "<<", ">>", "+", "-", "*", "/", "%", "=", "!", "<", ">", "&", "|", "^",
    "~", "?", ":", ";", ",", ".", "(", ")", "[", "]", "@", "#",
];

/// Scan one line of TypeScript/TSX.
///
/// Returns the line's tokens and the state the next line starts with. The
/// function is total: any input yields tokens that reproduce `line` exactly.
pub fn scan_line(line: &str, state: ScanState) -> (Vec<Token<'_>>, ScanState) {
    let mut scanner = LineScanner {
        line,
        pos: 0,
        state,
        tokens: Vec::new(),
    };

    if scanner.state.in_block_comment {
        scanner.continue_block_comment();
    }
    while scanner.pos < line.len() {
        scanner.step();
    }

    let scanned = scanner.state;
    let next = line_heuristic(line, scanned);
    if next != scanned {
        tracing::trace!(
            in_markup_element = next.in_markup_element,
            brace_depth = next.brace_depth,
            "line heuristic adjusted markup context"
        );
    }
    (scanner.tokens, next)
}

/// Adjust the state handed to the next line.
///
/// A line that opens a tag (`<` + letter) without any `>` leaves the next
/// line inside the element. A line with a `>` but no `<` closes any element
/// and resets the brace depth. Otherwise the scanned state stands.
pub fn line_heuristic(line: &str, mut state: ScanState) -> ScanState {
    let bytes = line.as_bytes();
    let has_lt = bytes.contains(&b'<');
    let has_gt = bytes.contains(&b'>');
    let opens_tag = bytes
        .windows(2)
        .any(|pair| pair[0] == b'<' && pair[1].is_ascii_alphabetic());

    if opens_tag && !has_gt {
        state.in_markup_element = true;
    } else if has_gt && !has_lt {
        state.in_markup_element = false;
        state.brace_depth = 0;
    }
    state
}

struct LineScanner<'a> {
    line: &'a str,
    pos: usize,
    state: ScanState,
    tokens: Vec<Token<'a>>,
}

impl<'a> LineScanner<'a> {
    fn emit(&mut self, kind: TokenKind, len: usize) {
        let end = self.pos + len;
        self.tokens.push(Token::new(kind, &self.line[self.pos..end]));
        self.pos = end;
    }

    fn continue_block_comment(&mut self) {
        match self.line.find("*/") {
            Some(close) => {
                self.emit(TokenKind::Comment, close + 2);
                self.state.in_block_comment = false;
            }
            None if !self.line.is_empty() => self.emit(TokenKind::Comment, self.line.len()),
            None => {}
        }
    }

    fn step(&mut self) {
        let rest = &self.line[self.pos..];
        let bytes = rest.as_bytes();

        // 1. Block comment.
        if rest.starts_with("/*") {
            match rest[2..].find("*/") {
                Some(close) => self.emit(TokenKind::Comment, close + 4),
                None => {
                    self.emit(TokenKind::Comment, rest.len());
                    self.state.in_block_comment = true;
                }
            }
            return;
        }

        // 2. Line comment.
        if rest.starts_with("//") {
            self.emit(TokenKind::Comment, rest.len());
            return;
        }

        // 3. String and template literals.
        if matches!(bytes[0], b'"' | b'\'' | b'`') {
            self.emit(TokenKind::String, string_len(rest));
            return;
        }

        // 4. Opening tag: `<` + letter.
        if bytes[0] == b'<' && bytes.get(1).is_some_and(u8::is_ascii_alphabetic) {
            let name = tag_name_len(&rest[1..]);
            self.emit(TokenKind::MarkupBracket, 1);
            self.emit(TokenKind::MarkupTag, name);
            self.state.in_markup_element = true;
            return;
        }

        // 5. Closing tag: `</name>`.
        if let Some(name) = close_tag_name_len(rest) {
            self.emit(TokenKind::MarkupBracket, 2);
            self.emit(TokenKind::MarkupTag, name);
            self.emit(TokenKind::MarkupBracket, 1);
            self.state.in_markup_element = false;
            return;
        }

        // 6. Tag terminator. `>=` and `>>` belong to the operator rule.
        if rest.starts_with("/>") {
            self.emit(TokenKind::MarkupBracket, 2);
            self.state.in_markup_element = false;
            return;
        }
        if bytes[0] == b'>' && !matches!(bytes.get(1), Some(b'=' | b'>')) {
            self.emit(TokenKind::MarkupBracket, 1);
            self.state.in_markup_element = false;
            return;
        }

        let word_start = self.at_word_start();

        // 7. Attribute name inside an opening tag.
        if self.state.in_markup_element
            && self.state.brace_depth == 0
            && word_start
            && let Some((name, assign)) = attribute_len(rest)
        {
            self.emit(TokenKind::MarkupAttribute, name);
            self.emit(TokenKind::Plain, assign);
            return;
        }

        // 8. Expression braces.
        match bytes[0] {
            b'{' => {
                self.emit(TokenKind::MarkupBrace, 1);
                self.state.open_brace();
                return;
            }
            b'}' => {
                self.emit(TokenKind::MarkupBrace, 1);
                self.state.close_brace();
                return;
            }
            _ => {}
        }

        // 9. Whitespace run.
        let ws = whitespace_len(rest);
        if ws > 0 {
            self.emit(TokenKind::Plain, ws);
            return;
        }

        // 10. Operators and punctuation.
        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(*op)) {
            self.emit(TokenKind::Operator, op.len());
            return;
        }

        // 11-14, 16. Words. An unclassified word falls through to rule 17.
        if word_start && rest.chars().next().is_some_and(is_ident_start) {
            let len = ident_len(rest);
            if let Some(kind) = self.classify_word(&rest[..len], &rest[len..]) {
                self.emit(kind, len);
                return;
            }
        }

        // 15. Numbers.
        if word_start && bytes[0].is_ascii_digit() {
            self.emit(TokenKind::Number, number_len(bytes));
            return;
        }

        // 17. Anything else, one character at a time.
        let len = rest.chars().next().map_or(1, char::len_utf8);
        self.emit(TokenKind::Plain, len);
    }

    /// True unless the previous character continues an identifier.
    fn at_word_start(&self) -> bool {
        self.line[..self.pos]
            .chars()
            .next_back()
            .is_none_or(|c| !is_ident_continue(c))
    }

    fn classify_word(&self, word: &str, after: &str) -> Option<TokenKind> {
        let kind = if KEYWORDS.contains(&word) {
            TokenKind::Keyword
        } else if is_hook_name(word) {
            TokenKind::Hook
        } else if after.starts_with('(') || after.starts_with("?.(") {
            TokenKind::Function
        } else if TYPES.contains(&word) {
            TokenKind::Type
        } else if !self.state.in_markup_element && after.starts_with(':') {
            TokenKind::Property
        } else {
            return None;
        };
        Some(kind)
    }
}

/// `useSomething` naming convention for hooks.
pub fn is_hook_name(word: &str) -> bool {
    word.strip_prefix("use")
        .and_then(|tail| tail.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn ident_len(s: &str) -> usize {
    s.char_indices()
        .find(|&(_, c)| !is_ident_continue(c))
        .map_or(s.len(), |(i, _)| i)
}

fn is_tag_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'.' | b'-')
}

/// Length of a tag name at the start of `s` (which starts with a letter).
fn tag_name_len(s: &str) -> usize {
    s.bytes().take_while(|&b| is_tag_char(b)).count()
}

/// Tag-name length when `rest` starts with `</name>`.
fn close_tag_name_len(rest: &str) -> Option<usize> {
    let after = rest.strip_prefix("</")?;
    if !after.as_bytes().first()?.is_ascii_alphabetic() {
        return None;
    }
    let name = tag_name_len(after);
    (after.as_bytes().get(name) == Some(&b'>')).then_some(name)
}

/// `(name_len, assign_len)` when `rest` starts with `name`, optional
/// whitespace and a single `=`.
fn attribute_len(rest: &str) -> Option<(usize, usize)> {
    let first = rest.chars().next()?;
    if !is_ident_start(first) {
        return None;
    }
    let name = rest
        .char_indices()
        .find(|&(_, c)| !(is_ident_continue(c) || c == '-'))
        .map_or(rest.len(), |(i, _)| i);
    let after = &rest[name..];
    let ws = whitespace_len(after);
    let tail = after[ws..].as_bytes();
    if tail.first() == Some(&b'=') && !matches!(tail.get(1), Some(b'=' | b'>')) {
        Some((name, ws + 1))
    } else {
        None
    }
}

fn whitespace_len(s: &str) -> usize {
    s.char_indices()
        .find(|&(_, c)| !c.is_whitespace())
        .map_or(s.len(), |(i, _)| i)
}

/// Length of a quoted literal, up to and including the first unescaped
/// closing quote, or the rest of the line when unterminated.
fn string_len(rest: &str) -> usize {
    let mut chars = rest.char_indices();
    let Some((_, quote)) = chars.next() else {
        return 0;
    };
    while let Some((i, c)) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == quote {
            return i + c.len_utf8();
        }
    }
    rest.len()
}

/// Length of a numeric literal starting with an ASCII digit.
fn number_len(bytes: &[u8]) -> usize {
    let digits_from = |mut end: usize, hex: bool| {
        while end < bytes.len()
            && (bytes[end] == b'_'
                || if hex {
                    bytes[end].is_ascii_hexdigit()
                } else {
                    bytes[end].is_ascii_digit()
                })
        {
            end += 1;
        }
        end
    };

    if bytes.len() > 2 && bytes[0] == b'0' && (bytes[1] | 0x20) == b'x' && bytes[2].is_ascii_hexdigit()
    {
        return digits_from(2, true);
    }

    let mut end = digits_from(0, false);
    if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
        end = digits_from(end + 1, false);
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        if bytes.get(end + 1 + sign).is_some_and(u8::is_ascii_digit) {
            end = digits_from(end + 1 + sign, false);
        }
    }
    end
}
