#![forbid(unsafe_code)]

//! Shell (bash/sh) scanner.
//!
//! Stateless across lines. Within a line the scanner remembers whether the
//! next word starts a statement, so the leading word of each pipeline stage
//! or `;`-separated command is classified as `command`.
//!
//! A double-quoted string is emitted as one `string` token; parameter
//! expansions inside it are not split out.

use crate::token::{Token, TokenKind};

/// Reserved words and declaration builtins.
pub const KEYWORDS: &[&str] = &[
    "!", "[[", "case", "declare", "do", "done", "elif", "else", "esac", "eval", "exit",
    "export", "fi", "for", "function", "if", "in", "local", "readonly", "return", "select",
    "shift", "source", "then", "time", "trap", "typeset", "unset", "until", "while",
];

/// Keywords after which the next word is a command again.
const COMMAND_AFTER: &[&str] = &["!", "do", "elif", "else", "if", "then", "time", "until", "while"];

/// Operators, longest first.
const OPERATORS: &[&str] = &[
    "&>>", "<<<", "&&", "||", ";;", "|&", "&>", ">>", ">&", "<<", "<&", "<>", ">|", "|", "&",
    ";", "<", ">", "(", ")", "{", "}",
];

/// Operators after which the next word starts a new command.
const COMMAND_SEPARATORS: &[&str] = &["&&", "||", ";;", "|&", "|", "&", ";", "(", "{"];

/// Scan one line of shell script.
pub fn scan_line(line: &str) -> Vec<Token<'_>> {
    let mut scanner = ShellScanner {
        line,
        pos: 0,
        tokens: Vec::new(),
        expect_command: true,
        assigning: false,
    };
    while scanner.pos < line.len() {
        scanner.step();
    }
    scanner.tokens
}

struct ShellScanner<'a> {
    line: &'a str,
    pos: usize,
    tokens: Vec<Token<'a>>,
    /// The next word is the leading word of a statement.
    expect_command: bool,
    /// Inside the value of a `NAME=value` prefix.
    assigning: bool,
}

impl<'a> ShellScanner<'a> {
    fn emit(&mut self, kind: TokenKind, len: usize) {
        let end = self.pos + len;
        self.tokens.push(Token::new(kind, &self.line[self.pos..end]));
        self.pos = end;
    }

    /// Emit part of a word; an assignment value does not end the prefix.
    fn emit_operand(&mut self, kind: TokenKind, len: usize) {
        self.emit(kind, len);
        if !self.assigning {
            self.expect_command = false;
        }
    }

    /// Whitespace and operators both end the previous word.
    fn at_word_start(&self) -> bool {
        let after_operator = self
            .tokens
            .last()
            .is_some_and(|token| token.kind == TokenKind::Operator);
        after_operator
            || self.line[..self.pos]
                .chars()
                .next_back()
                .is_none_or(char::is_whitespace)
    }

    fn step(&mut self) {
        let rest = &self.line[self.pos..];
        let bytes = rest.as_bytes();

        let ws = rest
            .char_indices()
            .find(|&(_, c)| !c.is_whitespace())
            .map_or(rest.len(), |(i, _)| i);
        if ws > 0 {
            self.emit(TokenKind::Plain, ws);
            self.assigning = false;
            return;
        }

        if bytes[0] == b'#' && self.at_word_start() {
            self.emit(TokenKind::Comment, rest.len());
            return;
        }

        match bytes[0] {
            b'"' | b'\'' => {
                self.emit_operand(TokenKind::String, quoted_len(rest));
                return;
            }
            b'`' => {
                let len = rest[1..].find('`').map_or(rest.len(), |i| i + 2);
                self.emit_operand(TokenKind::Substitution, len);
                return;
            }
            b'$' if bytes.get(1) == Some(&b'(') => {
                self.emit_operand(TokenKind::Substitution, paren_substitution_len(rest));
                return;
            }
            b'$' => {
                if let Some(len) = variable_len(rest) {
                    self.emit_operand(TokenKind::Variable, len);
                    return;
                }
            }
            _ => {}
        }

        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(*op)) {
            self.emit(TokenKind::Operator, op.len());
            self.expect_command = COMMAND_SEPARATORS.contains(op);
            self.assigning = false;
            return;
        }

        let len = word_len(rest);
        if len == 0 {
            let len = rest.chars().next().map_or(1, char::len_utf8);
            self.emit_operand(TokenKind::Plain, len);
            return;
        }
        self.word(&rest[..len]);
    }

    fn word(&mut self, word: &str) {
        if self.assigning {
            self.emit(TokenKind::Plain, word.len());
            return;
        }

        if self.expect_command
            && let Some(name) = assignment_name_len(word)
        {
            self.emit(TokenKind::Variable, name);
            self.emit(TokenKind::Operator, 1);
            self.assigning = true;
            let value = word.len() - name - 1;
            if value > 0 {
                self.emit(TokenKind::Plain, value);
            }
            return;
        }

        if (self.expect_command || word == "in") && KEYWORDS.contains(&word) {
            self.expect_command = COMMAND_AFTER.contains(&word);
            self.emit(TokenKind::Keyword, word.len());
            return;
        }

        let kind = if word.starts_with('-') {
            TokenKind::Flag
        } else if self.expect_command {
            TokenKind::Command
        } else {
            TokenKind::Plain
        };
        self.emit_operand(kind, word.len());
    }
}

fn is_word_stop(c: char) -> bool {
    c.is_whitespace() || matches!(c, '|' | '&' | ';' | '<' | '>' | '(' | ')' | '`' | '"' | '\'' | '$')
}

fn word_len(s: &str) -> usize {
    s.char_indices()
        .find(|&(_, c)| is_word_stop(c))
        .map_or(s.len(), |(i, _)| i)
}

/// Length of `NAME` when `word` is `NAME=...` with a valid shell name.
fn assignment_name_len(word: &str) -> Option<usize> {
    let eq = word.find('=')?;
    let name = &word[..eq];
    let mut chars = name.chars();
    let first = chars.next()?;
    ((first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_'))
    .then_some(eq)
}

/// Quoted string length; single quotes have no escapes.
fn quoted_len(rest: &str) -> usize {
    let quote = rest.as_bytes()[0];
    let bytes = rest.as_bytes();
    let mut end = 1;
    while end < bytes.len() {
        match bytes[end] {
            b'\\' if quote == b'"' => end += 2,
            b if b == quote => return end + 1,
            _ => end += 1,
        }
    }
    bytes.len()
}

/// `$(...)` with nested parentheses; the rest of the line when unbalanced.
fn paren_substitution_len(rest: &str) -> usize {
    let mut depth = 0usize;
    for (i, b) in rest.bytes().enumerate().skip(1) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
    }
    rest.len()
}

/// `$NAME`, `${...}`, `$1`, or a special parameter such as `$?`.
fn variable_len(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    match *bytes.get(1)? {
        b'{' => Some(rest.find('}').map_or(rest.len(), |i| i + 1)),
        b if b.is_ascii_alphabetic() || b == b'_' => Some(
            1 + bytes[1..]
                .iter()
                .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                .count(),
        ),
        b if b.is_ascii_digit() => Some(2),
        b'@' | b'*' | b'#' | b'?' | b'$' | b'!' | b'-' => Some(2),
        _ => None,
    }
}
