//! End-to-end scenarios through the public API, one per documented behavior.

use snippet_hl::{
    Document, HighlightError, Language, ScanState, StyleTable, TokenKind, dispatch, format,
    style_of,
};

fn line_tokens(doc: &Document<'_>, index: usize) -> Vec<(TokenKind, String)> {
    doc.lines()[index]
        .iter()
        .map(|token| (token.kind, token.text.to_string()))
        .collect()
}

fn expect(pairs: &[(TokenKind, &str)]) -> Vec<(TokenKind, String)> {
    pairs
        .iter()
        .map(|&(kind, text)| (kind, text.to_string()))
        .collect()
}

// ============================================================================
// TypeScript / TSX
// ============================================================================

#[test]
fn ts_declaration() {
    let doc = format("const x = 1;", "ts", None).unwrap();
    assert_eq!(
        line_tokens(&doc, 0),
        expect(&[
            (TokenKind::Keyword, "const"),
            (TokenKind::Plain, " "),
            (TokenKind::Plain, "x"),
            (TokenKind::Plain, " "),
            (TokenKind::Operator, "="),
            (TokenKind::Plain, " "),
            (TokenKind::Number, "1"),
            (TokenKind::Operator, ";"),
        ])
    );
}

#[test]
fn tsx_element_with_attribute() {
    let d = dispatch("tsx").unwrap();
    let (tokens, state) = (d.scan)(r#"<div className="a">"#, ScanState::new());
    let pairs: Vec<_> = tokens
        .iter()
        .map(|t| (t.kind, t.text.to_string()))
        .collect();
    assert_eq!(
        pairs,
        expect(&[
            (TokenKind::MarkupBracket, "<"),
            (TokenKind::MarkupTag, "div"),
            (TokenKind::Plain, " "),
            (TokenKind::MarkupAttribute, "className"),
            (TokenKind::Plain, "="),
            (TokenKind::String, r#""a""#),
            (TokenKind::MarkupBracket, ">"),
        ])
    );
    assert!(!state.in_markup_element);
}

#[test]
fn hook_call_is_not_a_function() {
    let doc = format("useCustomHook()", "tsx", None).unwrap();
    assert_eq!(
        line_tokens(&doc, 0),
        expect(&[
            (TokenKind::Hook, "useCustomHook"),
            (TokenKind::Operator, "("),
            (TokenKind::Operator, ")"),
        ])
    );
}

#[test]
fn tsx_component_across_lines() {
    let source = "return (\n  <Button\n    onClick={go}\n    label=\"Go\"\n  />\n);";
    let doc = format(source, "tsx", None).unwrap();
    assert_eq!(doc.line_count(), 6);

    // `<Button` has no `>`, so attributes on the next lines stay in markup.
    let onclick = line_tokens(&doc, 2);
    assert_eq!(
        onclick,
        expect(&[
            (TokenKind::Plain, "    "),
            (TokenKind::MarkupAttribute, "onClick"),
            (TokenKind::Plain, "="),
            (TokenKind::MarkupBrace, "{"),
            (TokenKind::Plain, "g"),
            (TokenKind::Plain, "o"),
            (TokenKind::MarkupBrace, "}"),
        ])
    );

    let label = line_tokens(&doc, 3);
    assert_eq!(label[1], (TokenKind::MarkupAttribute, "label".to_string()));
    assert_eq!(label[3], (TokenKind::String, "\"Go\"".to_string()));

    let close = line_tokens(&doc, 4);
    assert_eq!(close[1], (TokenKind::MarkupBracket, "/>".to_string()));
}

#[test]
fn arrow_in_attribute_line_ends_markup_context() {
    // A line with `>` and no `<` resets the context, so the `=>` of an inline
    // handler ends the element for the following line.
    let source = "<Button\n  onClick={() => go(1)}\n  label=\"Go\"";
    let doc = format(source, "tsx", None).unwrap();

    let onclick = line_tokens(&doc, 1);
    assert_eq!(onclick[1], (TokenKind::MarkupAttribute, "onClick".to_string()));
    assert!(onclick.contains(&(TokenKind::Function, "go".to_string())));
    assert!(onclick.contains(&(TokenKind::Operator, "=>".to_string())));

    let label = line_tokens(&doc, 2);
    assert_eq!(label[1], (TokenKind::Plain, "l".to_string()));
    assert!(label.iter().all(|(kind, _)| *kind != TokenKind::MarkupAttribute));
}

#[test]
fn block_comment_spans_lines() {
    let doc = format("/**\n * Docs\n */\nlet a", "ts", None).unwrap();
    for index in 0..3 {
        assert!(
            doc.lines()[index]
                .iter()
                .all(|t| t.kind == TokenKind::Comment),
            "line {index} should be comment"
        );
    }
    assert_eq!(line_tokens(&doc, 3)[0], (TokenKind::Keyword, "let".to_string()));
}

#[test]
fn unterminated_string_ends_at_line_end() {
    let doc = format("const s = 'oops\nconst t = 1", "ts", None).unwrap();
    let first = line_tokens(&doc, 0);
    assert_eq!(first.last(), Some(&(TokenKind::String, "'oops".to_string())));
    assert_eq!(line_tokens(&doc, 1)[0], (TokenKind::Keyword, "const".to_string()));
}

#[test]
fn typed_signature() {
    let doc = format("function f(a: string): Promise<void> {}", "ts", None).unwrap();
    let tokens = line_tokens(&doc, 0);
    assert!(tokens.contains(&(TokenKind::Keyword, "function".to_string())));
    assert!(tokens.contains(&(TokenKind::Function, "f".to_string())));
    assert!(tokens.contains(&(TokenKind::Property, "a".to_string())));
    assert!(tokens.contains(&(TokenKind::Type, "string".to_string())));
}

// ============================================================================
// JSON
// ============================================================================

#[test]
fn json_object() {
    let doc = format(r#"{"key": "value", "n": 1, "b": true}"#, "json", None).unwrap();
    let tokens = line_tokens(&doc, 0);
    assert_eq!(tokens[1], (TokenKind::Key, r#""key""#.to_string()));
    assert_eq!(tokens[2], (TokenKind::Punctuation, ":".to_string()));
    assert_eq!(tokens[4], (TokenKind::String, r#""value""#.to_string()));
    assert!(tokens.contains(&(TokenKind::Number, "1".to_string())));
    assert_eq!(
        tokens[tokens.len() - 2],
        (TokenKind::Boolean, "true".to_string())
    );
}

#[test]
fn json_pretty_printed() {
    let source = "{\n  \"items\": [\n    1.5,\n    null\n  ]\n}\n";
    let doc = format(source, "json", None).unwrap();
    assert_eq!(doc.line_count(), 7);
    assert_eq!(
        line_tokens(&doc, 1),
        expect(&[
            (TokenKind::Plain, "  "),
            (TokenKind::Key, "\"items\""),
            (TokenKind::Punctuation, ":"),
            (TokenKind::Plain, " "),
            (TokenKind::Punctuation, "["),
        ])
    );
    assert!(doc.lines()[6].is_blank());
}

// ============================================================================
// Bash
// ============================================================================

#[test]
fn bash_echo_with_flag() {
    let doc = format(r#"echo "$HOME" --flag"#, "bash", None).unwrap();
    assert_eq!(
        line_tokens(&doc, 0),
        expect(&[
            (TokenKind::Command, "echo"),
            (TokenKind::Plain, " "),
            (TokenKind::String, r#""$HOME""#),
            (TokenKind::Plain, " "),
            (TokenKind::Flag, "--flag"),
        ])
    );
}

#[test]
fn bash_pipeline_and_substitution() {
    let doc = format("cat $(ls) | grep -v x # done", "sh", None).unwrap();
    let tokens = line_tokens(&doc, 0);
    assert_eq!(tokens[0], (TokenKind::Command, "cat".to_string()));
    assert!(tokens.contains(&(TokenKind::Substitution, "$(ls)".to_string())));
    assert!(tokens.contains(&(TokenKind::Operator, "|".to_string())));
    assert!(tokens.contains(&(TokenKind::Command, "grep".to_string())));
    assert!(tokens.contains(&(TokenKind::Flag, "-v".to_string())));
    assert_eq!(
        tokens.last(),
        Some(&(TokenKind::Comment, "# done".to_string()))
    );
}

#[test]
fn bash_control_flow() {
    let doc = format("if [ -f \"$f\" ]; then\n  rm \"$f\"\nfi", "bash", None).unwrap();
    let first = line_tokens(&doc, 0);
    assert_eq!(first[0], (TokenKind::Keyword, "if".to_string()));
    assert!(first.contains(&(TokenKind::Keyword, "then".to_string())));
    assert_eq!(line_tokens(&doc, 1)[1], (TokenKind::Command, "rm".to_string()));
    assert_eq!(line_tokens(&doc, 2)[0], (TokenKind::Keyword, "fi".to_string()));
}

// ============================================================================
// Documents, dispatch and styles
// ============================================================================

#[test]
fn empty_input_is_one_placeholder_line() {
    for tag in ["ts", "json", "sh"] {
        let doc = format("", tag, None).unwrap();
        assert_eq!(doc.line_count(), 1);
        assert_eq!(
            line_tokens(&doc, 0),
            expect(&[(TokenKind::Plain, "\u{a0}")])
        );
    }
}

#[test]
fn whitespace_only_and_single_char_lines() {
    for tag in ["typescript", "json", "bash"] {
        let doc = format("   \n\t\nx", tag, None).unwrap();
        assert_eq!(line_tokens(&doc, 0), expect(&[(TokenKind::Plain, "   ")]));
        assert_eq!(line_tokens(&doc, 1), expect(&[(TokenKind::Plain, "\t")]));
        assert_eq!(doc.lines()[2].source_text(), "x");
    }
}

#[test]
fn trailing_newline_adds_blank_line() {
    let doc = format("ls\n", "sh", None).unwrap();
    assert_eq!(doc.line_count(), 2);
    assert!(doc.lines()[1].is_blank());
}

#[test]
fn unsupported_language_is_reported() {
    let err = format("print(1)", "python", None).unwrap_err();
    assert_eq!(err, HighlightError::UnsupportedLanguage("python".to_string()));
    assert!(err.to_string().contains("python"));
}

#[test]
fn overrides_apply_per_kind() {
    let overrides = StyleTable::builder()
        .set(TokenKind::Command, "color:hotpink")
        .build();
    let doc = format("ls -la", "sh", Some(&overrides)).unwrap();
    assert_eq!(doc.style_of(TokenKind::Command), "color:hotpink");
    assert_eq!(
        doc.style_of(TokenKind::Flag),
        style_of(TokenKind::Flag, Language::Bash, None)
    );
}

#[test]
fn independent_calls_do_not_share_state() {
    let open = format("<div", "tsx", None).unwrap();
    assert_eq!(open.line_count(), 1);
    // A fresh call starts outside markup even after a call that ended inside it.
    let doc = format("a = 1", "tsx", None).unwrap();
    assert!(
        !doc.lines()[0]
            .iter()
            .any(|t| t.kind == TokenKind::MarkupAttribute)
    );
}
