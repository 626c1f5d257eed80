#![forbid(unsafe_code)]

//! JSON scanner.
//!
//! Stateless: every line is scanned on its own. Recognized constructs are
//! object keys, strings, numbers, the literals `true`/`false`/`null` and
//! structural punctuation. Text between recognized constructs is gathered
//! into one `plain` token per gap.

use crate::token::{Token, TokenKind};

/// Scan one line of JSON.
pub fn scan_line(line: &str) -> Vec<Token<'_>> {
    let bytes = line.as_bytes();
    let len = bytes.len();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut gap_start = 0;

    macro_rules! flush_gap {
        () => {
            if gap_start < pos {
                tokens.push(Token::plain(&line[gap_start..pos]));
            }
        };
    }

    while pos < len {
        match bytes[pos] {
            b'"' => {
                flush_gap!();
                let end = string_end(bytes, pos);
                let after = end + whitespace_len(&bytes[end..]);
                if after < len && bytes[after] == b':' {
                    tokens.push(Token::new(TokenKind::Key, &line[pos..end]));
                    if after > end {
                        tokens.push(Token::plain(&line[end..after]));
                    }
                    tokens.push(Token::new(TokenKind::Punctuation, &line[after..after + 1]));
                    pos = after + 1;
                } else {
                    tokens.push(Token::new(TokenKind::String, &line[pos..end]));
                    pos = end;
                }
                gap_start = pos;
            }
            b'{' | b'}' | b'[' | b']' | b',' | b':' => {
                flush_gap!();
                tokens.push(Token::new(TokenKind::Punctuation, &line[pos..pos + 1]));
                pos += 1;
                gap_start = pos;
            }
            b'-' | b'0'..=b'9' if starts_word(bytes, pos) => match number_end(bytes, pos) {
                Some(end) => {
                    flush_gap!();
                    tokens.push(Token::new(TokenKind::Number, &line[pos..end]));
                    pos = end;
                    gap_start = pos;
                }
                None => pos += 1,
            },
            b't' | b'f' | b'n' if starts_word(bytes, pos) => {
                match ["true", "false", "null"]
                    .into_iter()
                    .find(|lit| is_word_at(bytes, pos, lit.as_bytes()))
                {
                    Some(lit) => {
                        flush_gap!();
                        tokens.push(Token::new(TokenKind::Boolean, &line[pos..pos + lit.len()]));
                        pos += lit.len();
                        gap_start = pos;
                    }
                    None => pos += 1,
                }
            }
            _ => {
                // Advance by whole characters so gaps stay on char boundaries.
                pos += line[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
    flush_gap!();

    tokens
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn starts_word(bytes: &[u8], pos: usize) -> bool {
    pos == 0 || !is_word_byte(bytes[pos - 1])
}

fn is_word_at(bytes: &[u8], pos: usize, word: &[u8]) -> bool {
    bytes[pos..].starts_with(word)
        && bytes
            .get(pos + word.len())
            .is_none_or(|&b| !is_word_byte(b))
}

/// End of a quoted string starting at `pos`; the line end when unterminated.
fn string_end(bytes: &[u8], pos: usize) -> usize {
    let mut end = pos + 1;
    while end < bytes.len() {
        match bytes[end] {
            b'\\' => end += 2,
            b'"' => return end + 1,
            _ => end += 1,
        }
    }
    bytes.len()
}

fn whitespace_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .take_while(|b| matches!(b, b' ' | b'\t' | b'\r'))
        .count()
}

/// `-?digits(.digits)?([eE][+-]?digits)?`, ending on a word boundary.
fn number_end(bytes: &[u8], pos: usize) -> Option<usize> {
    let digits = |from: usize| {
        bytes[from.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = pos + usize::from(bytes[pos] == b'-');
    let int = digits(end);
    if int == 0 {
        return None;
    }
    end += int;
    if bytes.get(end) == Some(&b'.') {
        let frac = digits(end + 1);
        if frac > 0 {
            end += 1 + frac;
        }
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp = digits(end + 1 + sign);
        if exp > 0 {
            end += 1 + sign + exp;
        }
    }
    bytes
        .get(end)
        .is_none_or(|&b| !is_word_byte(b))
        .then_some(end)
}
