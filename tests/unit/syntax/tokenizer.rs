use super::*;

fn roles(text: &str) -> Vec<(&str, TokenRole)> {
    tokenize(text).into_iter().map(|t| (t.text, t.role)).collect()
}

#[test]
fn comment_then_declaration() {
    let toks = tokenize("// comment\nconst x = 1;");
    assert_eq!(toks[0].role, TokenRole::Comment);
    assert_eq!(toks[0].text, "// comment");
    assert_eq!(toks[0].span, Span { start: 0, end: 10 });
    assert!(
        toks.iter()
            .filter(|t| t.role == TokenRole::Keyword)
            .all(|t| t.span.start >= 10)
    );
    assert_eq!(
        roles("// comment\nconst x = 1;"),
        vec![
            ("// comment", TokenRole::Comment),
            ("\n", TokenRole::Plain),
            ("const", TokenRole::Keyword),
            (" x ", TokenRole::Plain),
            ("=", TokenRole::Operator),
            (" ", TokenRole::Plain),
            ("1", TokenRole::Number),
            (";", TokenRole::Operator),
        ]
    );
}

#[test]
fn tokens_cover_every_byte_in_order() {
    let text = "while (struggling) { keepLearning(); } // Success is loading...";
    let toks = tokenize(text);
    let joined: String = toks.iter().map(|t| t.text).collect();
    assert_eq!(joined, text);
    for pair in toks.windows(2) {
        assert_eq!(pair[0].span.end, pair[1].span.start);
    }
    assert!(toks.contains(&Token {
        text: "keepLearning",
        role: TokenRole::Function,
        span: Span { start: 21, end: 33 },
    }));
    assert_eq!(toks.last().map(|t| t.role), Some(TokenRole::Comment));
}

#[test]
fn earlier_pattern_wins_on_overlap() {
    // Keyword scanning runs before strings, so `if` inside the string stays a keyword and the
    // string is split around it.
    assert_eq!(
        roles("'a if b'"),
        vec![
            ("'a ", TokenRole::String),
            ("if", TokenRole::Keyword),
            (" b'", TokenRole::String),
        ]
    );
    // A comment marker inside a string claims the rest of the line.
    assert_eq!(
        roles("\"x//y\""),
        vec![("\"x", TokenRole::String), ("//y\"", TokenRole::Comment)]
    );
    // Keyword beats call-position identifier.
    assert_eq!(roles("if(")[0], ("if", TokenRole::Keyword));
}

#[test]
fn keywords_need_word_boundaries() {
    assert_eq!(roles("format"), vec![("format", TokenRole::Plain)]);
    assert_eq!(roles("$if")[1], ("if", TokenRole::Keyword));
    assert_eq!(roles("for_each"), vec![("for_each", TokenRole::Plain)]);
}

#[test]
fn numbers_follow_boundary_rules() {
    assert_eq!(roles("3.14"), vec![("3.14", TokenRole::Number)]);
    assert_eq!(roles("x1"), vec![("x1", TokenRole::Plain)]);
    assert_eq!(roles("12abc"), vec![("12abc", TokenRole::Plain)]);
    assert_eq!(
        roles("1.5e3"),
        vec![
            ("1", TokenRole::Number),
            (".", TokenRole::Operator),
            ("5e3", TokenRole::Plain),
        ]
    );
}

#[test]
fn strings_handle_escapes_and_unterminated_quotes() {
    assert_eq!(roles(r#"'it\'s'"#), vec![(r#"'it\'s'"#, TokenRole::String)]);
    assert_eq!(roles("'open"), vec![("'open", TokenRole::Plain)]);
    assert_eq!(roles("\"é\""), vec![("\"é\"", TokenRole::String)]);
}

#[test]
fn call_identifiers_need_a_leading_boundary() {
    // `$` is not a word character, so there is no boundary in front of it at the start.
    assert_eq!(
        roles("$fetch()"),
        vec![
            ("$", TokenRole::Plain),
            ("fetch", TokenRole::Function),
            ("(", TokenRole::Operator),
            (")", TokenRole::Operator),
        ]
    );
    assert_eq!(roles("a$b(")[0], ("a$b", TokenRole::Function));
    assert_eq!(roles("obj.run(")[2], ("run", TokenRole::Function));
}

#[test]
fn empty_input_has_no_tokens() {
    assert!(tokenize("").is_empty());
    assert_eq!(tokenize_lines(""), vec![Vec::<Token<'_>>::new()]);
}

#[test]
fn lines_rebase_spans_and_split_multiline_strings() {
    let text = "let s = 'a\nb';\r\nx";
    let lines = tokenize_lines(text);
    assert_eq!(lines.len(), 3);

    let first: Vec<_> = lines[0].iter().map(|t| (t.text, t.role)).collect();
    assert_eq!(first.last(), Some(&("'a", TokenRole::String)));

    let second = &lines[1];
    assert_eq!(second[0].text, "b'");
    assert_eq!(second[0].role, TokenRole::String);
    assert_eq!(second[0].span, Span { start: 0, end: 2 });
    assert_eq!(second.last().map(|t| t.text), Some(";"));

    assert_eq!(lines[2][0].text, "x");
    assert_eq!(lines[2][0].span.start, 0);
}

#[test]
fn line_tokens_never_include_breaks() {
    for line in tokenize_lines("a\n\nb // c\r\n'd'") {
        for t in line {
            assert!(!t.text.contains('\n'));
            assert!(!t.text.contains('\r'));
        }
    }
}
