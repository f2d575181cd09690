//! At-rules shared by every dialect.
//!
//! The dialect overlays get the first look at an at-keyword so they can
//! claim their control and module rules; whatever is left is parsed here.
//! Unknown at-rules never raise an error: their prelude is kept as an
//! opaque balanced token run and their block is parsed when it reads as
//! declarations.

use super::{
    at_ident_start, block, block_item, body, declaration, declarations, expressions, ident,
    ident_tokens, less, scss, selectors, string_literal, string_or_uri,
};
use crate::parser::state::{CompletedMarker, Parser};
use crate::parser::errors::ErrorCode;
use crate::{Dialect, SyntaxKind};

const MARGIN_BOXES: &[&str] = &[
    "top-left-corner",
    "top-left",
    "top-center",
    "top-right",
    "top-right-corner",
    "bottom-left-corner",
    "bottom-left",
    "bottom-center",
    "bottom-right",
    "bottom-right-corner",
    "left-top",
    "left-middle",
    "left-bottom",
    "right-top",
    "right-middle",
    "right-bottom",
];

/// Parse the at-rule starting at the current at-keyword.
pub(crate) fn at_rule(p: &mut Parser<'_>, nested: bool) -> Option<CompletedMarker> {
    if !p.at(SyntaxKind::T_AT_KEYWORD) {
        return None;
    }
    let overlay = match p.dialect() {
        Dialect::Scss => scss::at_rule(p, nested),
        Dialect::Less => less::at_rule(p, nested),
        Dialect::Css => None,
    };
    if overlay.is_some() {
        return overlay;
    }
    let name = p.text().trim_start_matches('@').to_ascii_lowercase();
    let rule = match unprefixed(&name) {
        "import" => import(p),
        "namespace" => namespace(p),
        "charset" => charset(p),
        "media" => media(p, nested),
        "supports" => supports(p, nested),
        "page" => page(p, nested),
        "font-face" => simple_block(p, nested, SyntaxKind::N_FONT_FACE),
        "keyframes" => keyframes(p, nested),
        "layer" => layer(p, nested),
        "container" => container(p, nested),
        "property" => property_rule(p, nested),
        margin if MARGIN_BOXES.contains(&margin) => {
            simple_block(p, nested, SyntaxKind::N_PAGE_MARGIN_BOX)
        }
        _ => unknown_at_rule(p),
    };
    Some(rule)
}

/// `-webkit-keyframes` → `keyframes`.
fn unprefixed(name: &str) -> &str {
    name.strip_prefix('-')
        .and_then(|rest| rest.split_once('-'))
        .map_or(name, |(_, bare)| bare)
}

/// `@import (string | url) modifiers? media-query-list?`
fn import(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if p.dialect() == Dialect::Less {
        less::import_options(p);
    }
    if string_or_uri(p) {
        if p.dialect() == Dialect::Scss {
            while p.eat(SyntaxKind::T_COMMA) {
                if !string_or_uri(p) {
                    p.error(ErrorCode::UriOrStringExpected);
                    break;
                }
            }
        }
    } else {
        p.error(ErrorCode::UriOrStringExpected);
    }
    if p.at_word("layer") {
        import_layer(p);
    }
    if p.at_word("supports") && p.nth_at(1, SyntaxKind::T_LPAREN) && p.nth_adjacent(1) {
        import_supports(p);
    }
    if !at_statement_end(p) && media_query_list(p).is_none() {
        p.error(ErrorCode::MediaQueryExpected);
    }
    m.complete(p, SyntaxKind::N_IMPORT)
}

fn import_layer(p: &mut Parser<'_>) {
    let m = p.start();
    ident(p);
    if p.at(SyntaxKind::T_LPAREN) && p.nth_adjacent(0) {
        p.bump();
        if !layer_name(p) {
            p.error(ErrorCode::IdentifierExpected);
        }
        close_paren(p);
    }
    m.complete(p, SyntaxKind::N_FUNCTION);
}

fn import_supports(p: &mut Parser<'_>) {
    let m = p.start();
    ident(p);
    p.bump();
    if p.at(SyntaxKind::T_LPAREN) || p.at_word("not") {
        if !supports_condition(p) {
            p.error(ErrorCode::ConditionExpected);
        }
    } else if declaration(p).is_none() {
        p.error(ErrorCode::ConditionExpected);
    }
    close_paren(p);
    m.complete(p, SyntaxKind::N_FUNCTION);
}

fn at_statement_end(p: &Parser<'_>) -> bool {
    p.at_any(&[SyntaxKind::T_SEMI, SyntaxKind::T_RBRACE, SyntaxKind::T_EOF])
}

fn close_paren(p: &mut Parser<'_>) {
    if !p.eat(SyntaxKind::T_RPAREN) {
        p.error(ErrorCode::RightParenthesisExpected);
        p.recover(
            &[SyntaxKind::T_RPAREN],
            &[SyntaxKind::T_LBRACE, SyntaxKind::T_SEMI],
        );
    }
}

/// `@namespace prefix? (string | url)`
fn namespace(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if at_ident_start(p) && !p.at_word("url") {
        ident(p);
    }
    if !string_or_uri(p) {
        p.error(ErrorCode::UriOrStringExpected);
    }
    m.complete(p, SyntaxKind::N_NAMESPACE)
}

fn charset(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if string_literal(p).is_none() {
        p.error(ErrorCode::StringLiteralExpected);
    }
    m.complete(p, SyntaxKind::N_CHARSET)
}

fn media(p: &mut Parser<'_>, nested: bool) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if media_query_list(p).is_none() {
        p.error(ErrorCode::MediaQueryExpected);
    }
    body(p, nested);
    m.complete(p, SyntaxKind::N_MEDIA)
}

/// `media-query (',' media-query)*`
pub(crate) fn media_query_list(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    if media_query(p).is_none() {
        m.abandon(p);
        return None;
    }
    while p.eat(SyntaxKind::T_COMMA) {
        if media_query(p).is_none() {
            p.error(ErrorCode::MediaQueryExpected);
            break;
        }
    }
    Some(m.complete(p, SyntaxKind::N_MEDIA_QUERY_LIST))
}

/// `('not' | 'only')? media-type ('and' condition)*` or a bare condition.
fn media_query(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    let prefixed =
        (p.at_word("not") || p.at_word("only")) && !p.nth_at(1, SyntaxKind::T_LPAREN);
    if prefixed {
        p.bump();
    }
    if !media_condition(p) {
        if !prefixed {
            m.abandon(p);
            return None;
        }
        p.error(ErrorCode::MediaQueryExpected);
    }
    Some(m.complete(p, SyntaxKind::N_MEDIA_QUERY))
}

/// `'not'? operand (('and' | 'or') 'not'? operand)*`
fn media_condition(p: &mut Parser<'_>) -> bool {
    p.eat_word("not");
    if !media_operand(p) {
        return false;
    }
    while p.at_word("and") || p.at_word("or") {
        p.bump();
        p.eat_word("not");
        if !media_operand(p) {
            p.error(ErrorCode::MediaQueryExpected);
            break;
        }
    }
    true
}

fn media_operand(p: &mut Parser<'_>) -> bool {
    match p.current() {
        SyntaxKind::T_LPAREN => {
            media_feature(p);
            true
        }
        SyntaxKind::T_DOLLAR_VAR if p.dialect() == Dialect::Scss => {
            expressions::term(p);
            true
        }
        SyntaxKind::T_AT_KEYWORD if p.dialect() == Dialect::Less => {
            expressions::term(p);
            true
        }
        _ if at_ident_start(p) => {
            if p.nth_at(1, SyntaxKind::T_LPAREN) && p.nth_adjacent(1) {
                query_function(p);
            } else {
                ident(p);
            }
            true
        }
        _ => false,
    }
}

/// `style(--x: y)` and similar function-shaped container queries.
fn query_function(p: &mut Parser<'_>) {
    let m = p.start();
    ident(p);
    p.bump();
    if p.at(SyntaxKind::T_LPAREN) || p.at_word("not") {
        media_condition(p);
    } else if declaration(p).is_none() {
        p.error(ErrorCode::IdentifierExpected);
    }
    close_paren(p);
    m.complete(p, SyntaxKind::N_FUNCTION);
}

/// `'(' name (':' value)? ')'`, range forms such as
/// `(400px <= width < 700px)`, or a parenthesised nested condition.
pub(crate) fn media_feature(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if p.at(SyntaxKind::T_LPAREN) || (p.at_word("not") && p.nth_at(1, SyntaxKind::T_LPAREN)) {
        media_condition(p);
    } else {
        if expressions::binary(p).is_none() {
            p.error(ErrorCode::IdentifierExpected);
        }
        if p.eat(SyntaxKind::T_COLON) {
            if expressions::expr(p, false).is_none() {
                p.error(ErrorCode::TermExpected);
            }
        } else {
            while expressions::comparison(p) {
                if expressions::binary(p).is_none() {
                    p.error(ErrorCode::TermExpected);
                    break;
                }
            }
        }
    }
    close_paren(p);
    m.complete(p, SyntaxKind::N_MEDIA_FEATURE)
}

fn supports(p: &mut Parser<'_>, nested: bool) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if !supports_condition(p) {
        p.error(ErrorCode::ConditionExpected);
    }
    body(p, nested);
    m.complete(p, SyntaxKind::N_SUPPORTS)
}

/// `'not'? in-parens (('and' | 'or') 'not'? in-parens)*`
fn supports_condition(p: &mut Parser<'_>) -> bool {
    let m = p.start();
    p.eat_word("not");
    if !supports_in_parens(p) {
        m.abandon(p);
        return false;
    }
    while p.at_word("and") || p.at_word("or") {
        p.bump();
        p.eat_word("not");
        if !supports_in_parens(p) {
            p.error(ErrorCode::LeftParenthesisExpected);
            break;
        }
    }
    m.complete(p, SyntaxKind::N_SUPPORTS_CONDITION);
    true
}

fn supports_in_parens(p: &mut Parser<'_>) -> bool {
    if at_ident_start(p) && p.nth_at(1, SyntaxKind::T_LPAREN) && p.nth_adjacent(1) {
        if p.at_word("selector") {
            let m = p.start();
            ident(p);
            p.bump();
            if selectors::selectors(p).is_none() {
                p.error(ErrorCode::SelectorExpected);
            }
            close_paren(p);
            m.complete(p, SyntaxKind::N_FUNCTION);
        } else {
            expressions::term(p);
        }
        return true;
    }
    if !p.at(SyntaxKind::T_LPAREN) {
        return false;
    }
    let m = p.start();
    p.bump();
    let condition = p.at(SyntaxKind::T_LPAREN)
        || p.at_word("not")
        || (p.at_word("selector") && p.nth_at(1, SyntaxKind::T_LPAREN));
    if condition {
        supports_condition(p);
    } else if declaration(p).is_none() {
        p.error(ErrorCode::IdentifierExpected);
    }
    close_paren(p);
    m.complete(p, SyntaxKind::N_SUPPORTS_CONDITION);
    true
}

/// `@page page-selector (',' page-selector)* block`
fn page(p: &mut Parser<'_>, nested: bool) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if page_selector(p) {
        while p.eat(SyntaxKind::T_COMMA) {
            if !page_selector(p) {
                p.error(ErrorCode::IdentifierExpected);
                break;
            }
        }
    }
    block(
        p,
        block_item,
        ErrorCode::PageDirectiveOrDeclarationExpected,
        nested,
    );
    m.complete(p, SyntaxKind::N_PAGE)
}

/// `name? (':' pseudo-page)*`
fn page_selector(p: &mut Parser<'_>) -> bool {
    if !at_ident_start(p) && !p.at(SyntaxKind::T_COLON) {
        return false;
    }
    let m = p.start();
    ident(p);
    while p.at(SyntaxKind::T_COLON) {
        p.bump();
        if ident(p).is_none() {
            p.error(ErrorCode::IdentifierExpected);
            break;
        }
    }
    m.complete(p, SyntaxKind::N_PAGE_SELECTOR);
    true
}

fn simple_block(p: &mut Parser<'_>, nested: bool, kind: SyntaxKind) -> CompletedMarker {
    let m = p.start();
    p.bump();
    body(p, nested);
    m.complete(p, kind)
}

/// `@keyframes name { keyframe-selector block ... }`
fn keyframes(p: &mut Parser<'_>, nested: bool) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if ident(p).is_none() && string_literal(p).is_none() {
        p.error(ErrorCode::IdentifierExpected);
    }
    block(p, keyframe_item, ErrorCode::PercentageExpected, nested);
    m.complete(p, SyntaxKind::N_KEYFRAME)
}

fn keyframe_item(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if p.at(SyntaxKind::T_AT_KEYWORD) {
        return at_rule(p, true);
    }
    let m = p.start();
    if !keyframe_offset(p) {
        m.abandon(p);
        return None;
    }
    while p.eat(SyntaxKind::T_COMMA) {
        if !keyframe_offset(p) {
            p.error(ErrorCode::PercentageExpected);
            break;
        }
    }
    body(p, true);
    Some(m.complete(p, SyntaxKind::N_KEYFRAME_SELECTOR))
}

/// `from`, `to`, `50%`, or a timeline range name with an offset.
fn keyframe_offset(p: &mut Parser<'_>) -> bool {
    if p.eat(SyntaxKind::T_PERCENTAGE) {
        return true;
    }
    if ident(p).is_none() {
        return false;
    }
    if !p.eat(SyntaxKind::T_PERCENTAGE) && p.nth_adjacent(0) {
        p.eat(SyntaxKind::T_PERCENT);
    }
    true
}

/// `@layer name (',' name)* block?`
fn layer(p: &mut Parser<'_>, nested: bool) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if layer_name(p) {
        while p.eat(SyntaxKind::T_COMMA) {
            if !layer_name(p) {
                p.error(ErrorCode::IdentifierExpected);
                break;
            }
        }
    }
    if p.at(SyntaxKind::T_LBRACE) {
        body(p, nested);
    }
    m.complete(p, SyntaxKind::N_LAYER)
}

/// Dotted layer name such as `base.reset`.
fn layer_name(p: &mut Parser<'_>) -> bool {
    let m = p.start();
    if !ident_tokens(p) {
        m.abandon(p);
        return false;
    }
    while p.at(SyntaxKind::T_DOT)
        && p.nth_adjacent(0)
        && p.nth_adjacent(1)
        && p.nth_at(1, SyntaxKind::T_IDENT)
    {
        p.bump();
        ident_tokens(p);
    }
    m.complete(p, SyntaxKind::N_IDENTIFIER);
    true
}

/// `@container name? condition block`
fn container(p: &mut Parser<'_>, nested: bool) -> CompletedMarker {
    let m = p.start();
    p.bump();
    let named = at_ident_start(p)
        && !p.at_word("not")
        && !(p.nth_at(1, SyntaxKind::T_LPAREN) && p.nth_adjacent(1));
    if named {
        ident(p);
    }
    if !media_condition(p) {
        p.error(ErrorCode::ConditionExpected);
    }
    body(p, nested);
    m.complete(p, SyntaxKind::N_CONTAINER)
}

/// `@property --name { descriptors }`
fn property_rule(p: &mut Parser<'_>, nested: bool) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if ident(p).is_none() {
        p.error(ErrorCode::IdentifierExpected);
    }
    body(p, nested);
    m.complete(p, SyntaxKind::N_PROPERTY_AT_RULE)
}

/// Any other at-rule: an opaque prelude and an optional block.
fn unknown_at_rule(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    let prelude = p.start();
    while !p.at_any(&[
        SyntaxKind::T_SEMI,
        SyntaxKind::T_LBRACE,
        SyntaxKind::T_RBRACE,
        SyntaxKind::T_EOF,
    ]) {
        p.bump_balanced();
    }
    prelude.complete(p, SyntaxKind::N_AT_RULE_PRELUDE);
    if p.at(SyntaxKind::T_LBRACE) {
        let checkpoint = p.checkpoint();
        declarations(p, block_item, ErrorCode::RuleOrSelectorExpected);
        if p.has_error_since(checkpoint) {
            p.rewind(checkpoint);
            if !p.bump_balanced() {
                p.error(ErrorCode::RightCurlyExpected);
            }
        }
    }
    m.complete(p, SyntaxKind::N_UNKNOWN_AT_RULE)
}

#[cfg(test)]
mod tests {
    use crate::test_util::{assert_error_codes, assert_parse_error};
    use crate::{Dialect, ErrorCode, SyntaxKind, ast, parse_at_rule};
    use rstest::rstest;

    fn clean(src: &str, dialect: Dialect) -> Vec<SyntaxKind> {
        let parsed = parse_at_rule(src, dialect);
        assert!(parsed.errors().is_empty(), "{src}: {:?}", parsed.errors());
        assert!(parsed.is_complete(), "{src} not fully consumed");
        parsed
            .node()
            .map(|n| ast::kind_sequence(&n))
            .unwrap_or_default()
    }

    #[rstest]
    #[case("@import url(foo.css) screen and (orientation: landscape);", SyntaxKind::N_IMPORT)]
    #[case("@import 'a.css' layer(base.reset) supports(display: grid);", SyntaxKind::N_IMPORT)]
    #[case("@namespace svg url(http://www.w3.org/2000/svg);", SyntaxKind::N_NAMESPACE)]
    #[case("@charset \"utf-8\";", SyntaxKind::N_CHARSET)]
    #[case("@media screen and (min-width: 100px), print { a { color: red } }", SyntaxKind::N_MEDIA)]
    #[case("@media (400px <= width < 700px) { }", SyntaxKind::N_MEDIA)]
    #[case("@media not all and (monochrome) { }", SyntaxKind::N_MEDIA)]
    #[case("@supports not (display: grid) or selector(a > b) { }", SyntaxKind::N_SUPPORTS)]
    #[case("@page :first { margin: 1in; @top-left { content: 'x' } }", SyntaxKind::N_PAGE)]
    #[case("@font-face { font-family: x; src: url(x.woff) }", SyntaxKind::N_FONT_FACE)]
    #[case("@-webkit-keyframes spin { from { top: 0 } 50%, to { top: 1px } }", SyntaxKind::N_KEYFRAME)]
    #[case("@layer base.reset, theme;", SyntaxKind::N_LAYER)]
    #[case("@layer { a { color: red } }", SyntaxKind::N_LAYER)]
    #[case("@container sidebar (min-width: 400px) { }", SyntaxKind::N_CONTAINER)]
    #[case("@container style(--dark: true) { }", SyntaxKind::N_CONTAINER)]
    #[case("@property --x { syntax: '<length>'; inherits: false }", SyntaxKind::N_PROPERTY_AT_RULE)]
    #[case("@counter-style thumbs { system: cyclic; symbols: a b }", SyntaxKind::N_UNKNOWN_AT_RULE)]
    #[case("@custom-selector :--heading h1, h2;", SyntaxKind::N_UNKNOWN_AT_RULE)]
    fn css_at_rules(#[case] src: &str, #[case] kind: SyntaxKind) {
        let kinds = clean(src, Dialect::Css);
        assert_eq!(kinds.first(), Some(&kind));
    }

    #[rstest]
    fn media_features_are_structured() {
        let kinds = clean("@media (min-width: 100px) and (max-width: 200px) {}", Dialect::Css);
        let features = kinds
            .iter()
            .filter(|k| **k == SyntaxKind::N_MEDIA_FEATURE)
            .count();
        assert_eq!(features, 2);
        assert!(kinds.contains(&SyntaxKind::N_MEDIA_QUERY_LIST));
    }

    #[rstest]
    fn unknown_block_with_odd_content_is_opaque() {
        let kinds = clean("@foo bar { ]] }", Dialect::Css);
        assert_eq!(
            kinds,
            vec![SyntaxKind::N_UNKNOWN_AT_RULE, SyntaxKind::N_AT_RULE_PRELUDE]
        );
    }

    #[rstest]
    #[case("@media { }", ErrorCode::MediaQueryExpected)]
    #[case("@charset foo;", ErrorCode::StringLiteralExpected)]
    #[case("@import ;", ErrorCode::UriOrStringExpected)]
    #[case("@keyframes { from {} }", ErrorCode::IdentifierExpected)]
    #[case("@keyframes x { foo: bar }", ErrorCode::LeftCurlyExpected)]
    #[case("@supports { }", ErrorCode::ConditionExpected)]
    fn broken_at_rules_report(#[case] src: &str, #[case] code: ErrorCode) {
        let parsed = parse_at_rule(src, Dialect::Css);
        let codes: Vec<_> = parsed.errors().iter().map(|e| e.code).collect();
        assert!(codes.contains(&code), "{src}: {codes:?}");
    }

    #[rstest]
    fn unclosed_unknown_block_reports_missing_brace() {
        let src = "@foo { a {";
        let parsed = parse_at_rule(src, Dialect::Css);
        let end = u32::try_from(src.len()).unwrap_or_else(|_| panic!("length"));
        assert_parse_error(parsed.errors(), ErrorCode::RightCurlyExpected, end, end);
        assert_eq!(
            parsed.node().map(|n| n.kind()),
            Some(SyntaxKind::N_UNKNOWN_AT_RULE)
        );
    }

    #[rstest]
    #[case("@foo { a { }", &[ErrorCode::RightCurlyExpected])]
    #[case("@foo { ]] }", &[])]
    fn unknown_block_closing_is_checked(#[case] src: &str, #[case] expected: &[ErrorCode]) {
        assert_error_codes(parse_at_rule(src, Dialect::Css).errors(), expected);
    }
}
