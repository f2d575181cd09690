//! Behavioural coverage for the scanner.

use cssls::{Dialect, Scanner, SyntaxKind, tokenize_with_trivia, tokenize_without_trivia};
use rstest::rstest;

fn kinds(src: &str, dialect: Dialect) -> Vec<SyntaxKind> {
    tokenize_without_trivia(src, dialect)
        .into_iter()
        .map(|(k, _)| k)
        .collect()
}

#[rstest]
#[case("12", SyntaxKind::T_NUMBER)]
#[case("1.5", SyntaxKind::T_NUMBER)]
#[case(".5", SyntaxKind::T_NUMBER)]
#[case("50%", SyntaxKind::T_PERCENTAGE)]
#[case("10px", SyntaxKind::T_DIMENSION)]
#[case("10PX", SyntaxKind::T_DIMENSION)]
#[case("2deg", SyntaxKind::T_DIMENSION)]
#[case("\"a b\"", SyntaxKind::T_STRING)]
#[case("'a'", SyntaxKind::T_STRING)]
#[case("#fff", SyntaxKind::T_HASH)]
#[case("url(img.png)", SyntaxKind::T_URL)]
#[case("-webkit-box", SyntaxKind::T_IDENT)]
#[case("--main-color", SyntaxKind::T_IDENT)]
#[case("@media", SyntaxKind::T_AT_KEYWORD)]
#[case("U+0-7F", SyntaxKind::T_UNICODE_RANGE)]
#[case("u+4??", SyntaxKind::T_UNICODE_RANGE)]
fn single_tokens(#[case] src: &str, #[case] expected: SyntaxKind) {
    assert_eq!(kinds(src, Dialect::Css), vec![expected]);
}

#[rstest]
fn unknown_suffix_is_not_merged() {
    assert_eq!(
        kinds("10foo", Dialect::Css),
        vec![SyntaxKind::T_NUMBER, SyntaxKind::T_IDENT]
    );
}

#[rstest]
#[case("$var", SyntaxKind::T_DOLLAR_VAR)]
#[case("#{", SyntaxKind::T_HASH_LBRACE)]
#[case("&", SyntaxKind::T_AMP)]
#[case("%placeholder", SyntaxKind::T_PLACEHOLDER)]
#[case("...", SyntaxKind::T_ELLIPSIS)]
#[case("==", SyntaxKind::T_EQEQ)]
#[case("!=", SyntaxKind::T_NEQ)]
#[case("<=", SyntaxKind::T_LTE)]
fn scss_sigils(#[case] src: &str, #[case] expected: SyntaxKind) {
    assert_eq!(kinds(src, Dialect::Scss), vec![expected]);
}

#[rstest]
fn less_sigils() {
    assert_eq!(
        kinds("@{name} @@var ~\"x\"", Dialect::Less),
        vec![
            SyntaxKind::T_AT_LBRACE,
            SyntaxKind::T_IDENT,
            SyntaxKind::T_RBRACE,
            SyntaxKind::T_AT,
            SyntaxKind::T_AT_KEYWORD,
            SyntaxKind::T_TILDE,
            SyntaxKind::T_STRING,
        ]
    );
}

#[rstest]
fn unterminated_string_stops_at_line_end() {
    let src = "'abc\nd";
    let tokens = tokenize_with_trivia(src, Dialect::Css);
    let Some((kind, span)) = tokens.first().cloned() else {
        panic!("no tokens");
    };
    assert_eq!(kind, SyntaxKind::T_BAD_STRING);
    assert_eq!(src.get(span), Some("'abc"));
    assert_eq!(kinds(src, Dialect::Css).last(), Some(&SyntaxKind::T_IDENT));
}

#[rstest]
fn unterminated_comment_runs_to_end() {
    let src = "a /* open";
    let tokens = tokenize_with_trivia(src, Dialect::Css);
    assert_eq!(
        tokens.last().map(|(k, sp)| (*k, sp.clone())),
        Some((SyntaxKind::T_COMMENT, 2..src.len()))
    );
}

#[rstest]
#[case("`")]
#[case("\\")]
#[case("?")]
fn unknown_characters_become_tokens(#[case] src: &str) {
    assert_eq!(kinds(src, Dialect::Css), vec![SyntaxKind::T_UNKNOWN]);
}

#[rstest]
#[case("a { color: red; }", Dialect::Css)]
#[case("$x: 1px // note\n.a { b: $x }", Dialect::Scss)]
#[case("@x: ~\"y\"; .m() when (@a > 1) { }", Dialect::Less)]
#[case("'unterminated\n/* unterminated", Dialect::Css)]
fn spans_cover_the_input(#[case] src: &str, #[case] dialect: Dialect) {
    let mut end = 0;
    for (_, span) in tokenize_with_trivia(src, dialect) {
        assert_eq!(span.start, end, "gap before {span:?}");
        end = span.end;
    }
    assert_eq!(end, src.len());
}

#[rstest]
fn scanner_walks_the_same_tokens() {
    let src = "a{margin:10px}";
    let mut scanner = Scanner::new(src, Dialect::Css);
    let mut seen = Vec::new();
    loop {
        let token = scanner.next_token();
        if token.kind == SyntaxKind::T_EOF {
            break;
        }
        seen.push(token.kind);
    }
    assert_eq!(seen, kinds(src, Dialect::Css));
    assert_eq!(scanner.position(), src.len());
}
