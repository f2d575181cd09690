//! Selector productions.
//!
//! Simple selectors are runs of adjacent parts (`a.b#c[d]:e`); whitespace
//! between two runs is the descendant combinator and produces no node.

use super::{at_ident_start, ident, ident_tokens};
use crate::parser::state::{CompletedMarker, Parser};
use crate::parser::errors::ErrorCode;
use crate::{Dialect, SyntaxKind};

const SELECTOR_PSEUDOS: &[&str] = &[
    "not",
    "is",
    "where",
    "has",
    "matches",
    "any",
    "-webkit-any",
    "-moz-any",
    "host",
    "host-context",
    "slotted",
    "current",
    "past",
    "future",
    "global",
    "local",
    "deep",
    "cue",
];

const NTH_PSEUDOS: &[&str] = &[
    "nth-child",
    "nth-last-child",
    "nth-of-type",
    "nth-last-of-type",
    "nth-col",
    "nth-last-col",
];

/// Whether the current token can begin a selector.
pub(crate) fn at_selector_start(p: &Parser<'_>) -> bool {
    at_ident_start(p)
        || p.at_any(&[
            SyntaxKind::T_STAR,
            SyntaxKind::T_DOT,
            SyntaxKind::T_HASH,
            SyntaxKind::T_LBRACKET,
            SyntaxKind::T_COLON,
            SyntaxKind::T_AMP,
            SyntaxKind::T_GT,
            SyntaxKind::T_PLUS,
            SyntaxKind::T_TILDE,
            SyntaxKind::T_PIPE,
            SyntaxKind::T_PLACEHOLDER,
            SyntaxKind::T_UNICODE_RANGE,
        ])
}

/// `selectors := selector (',' selector)*`
pub(crate) fn selectors(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    if selector(p).is_none() {
        m.abandon(p);
        return None;
    }
    while p.eat(SyntaxKind::T_COMMA) {
        if selector(p).is_none() {
            p.error(ErrorCode::SelectorExpected);
            break;
        }
    }
    Some(m.complete(p, SyntaxKind::N_SELECTORS))
}

/// `selector := combinator? simple-selector (combinator? simple-selector)*`
pub(crate) fn selector(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    let mut parts = 0_usize;
    loop {
        // `u+a` lexes as a unicode range
        p.split_unicode_range();
        if combinator(p).is_none() && simple_selector(p).is_none() {
            break;
        }
        parts += 1;
    }
    if parts == 0 {
        m.abandon(p);
        return None;
    }
    Some(m.complete(p, SyntaxKind::N_SELECTOR))
}

fn combinator(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    match p.current() {
        SyntaxKind::T_GT => {
            p.bump();
            // `>>>` shadow-piercing descendant
            if p.at(SyntaxKind::T_GT)
                && p.nth_adjacent(0)
                && p.nth_at(1, SyntaxKind::T_GT)
                && p.nth_adjacent(1)
            {
                p.bump();
                p.bump();
            }
        }
        SyntaxKind::T_PLUS | SyntaxKind::T_TILDE => p.bump(),
        SyntaxKind::T_SLASH if p.nth_word(1, "deep") && p.nth_at(2, SyntaxKind::T_SLASH) => {
            p.bump();
            p.bump();
            p.bump();
        }
        _ => {
            m.abandon(p);
            return None;
        }
    }
    Some(m.complete(p, SyntaxKind::N_SELECTOR_COMBINATOR))
}

/// A run of adjacent selector parts.
pub(crate) fn simple_selector(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if p.dialect() == Dialect::Less && p.at_word("when") {
        return None;
    }
    let m = p.start();
    let mut parts = 0_usize;
    if element_name(p) || selector_reference(p) {
        parts += 1;
    }
    while (parts == 0 || p.nth_adjacent(0)) && selector_part(p) {
        parts += 1;
    }
    if parts == 0 {
        m.abandon(p);
        return None;
    }
    Some(m.complete(p, SyntaxKind::N_SIMPLE_SELECTOR))
}

/// `ns|name`, `*|name`, `|name`, `name` or `*`.
fn element_name(p: &mut Parser<'_>) -> bool {
    let bare_namespace = p.at(SyntaxKind::T_PIPE)
        && p.nth_adjacent(1)
        && matches!(p.nth(1), SyntaxKind::T_IDENT | SyntaxKind::T_STAR);
    if !at_ident_start(p) && !p.at(SyntaxKind::T_STAR) && !bare_namespace {
        return false;
    }
    let m = p.start();
    if !bare_namespace {
        if !p.eat(SyntaxKind::T_STAR) {
            ident_tokens(p);
        }
        if !(p.at(SyntaxKind::T_PIPE) && p.nth_adjacent(0)) {
            m.complete(p, SyntaxKind::N_ELEMENT_NAME);
            return true;
        }
    }
    p.bump();
    if !p.eat(SyntaxKind::T_STAR) && !ident_tokens(p) {
        p.error(ErrorCode::IdentifierOrWildcardExpected);
    }
    m.complete(p, SyntaxKind::N_ELEMENT_NAME);
    true
}

/// `&` with an optional suffix such as `&-item` or `&__elem`.
fn selector_reference(p: &mut Parser<'_>) -> bool {
    if !p.at(SyntaxKind::T_AMP) {
        return false;
    }
    let m = p.start();
    p.bump();
    if p.dialect() != Dialect::Css && p.nth_adjacent(0) {
        ident_tokens(p);
    }
    m.complete(p, SyntaxKind::N_SELECTOR_REFERENCE);
    true
}

fn selector_part(p: &mut Parser<'_>) -> bool {
    match p.current() {
        SyntaxKind::T_HASH => {
            let m = p.start();
            p.bump();
            m.complete(p, SyntaxKind::N_ID_SELECTOR);
        }
        SyntaxKind::T_DOT => class(p),
        SyntaxKind::T_LBRACKET => attribute(p),
        SyntaxKind::T_COLON => pseudo(p),
        SyntaxKind::T_PLACEHOLDER if p.dialect() == Dialect::Scss => {
            let m = p.start();
            p.bump();
            m.complete(p, SyntaxKind::N_SELECTOR_PLACEHOLDER);
        }
        SyntaxKind::T_AMP => return selector_reference(p),
        _ if at_ident_start(p) => {
            ident(p);
        }
        _ => return false,
    }
    true
}

fn class(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    if !(p.nth_adjacent(0) && ident_tokens(p)) {
        p.error(ErrorCode::IdentifierExpected);
    }
    m.complete(p, SyntaxKind::N_CLASS_SELECTOR);
}

/// `'[' (ns '|')? name (op value flag?)? ']'`
fn attribute(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    if (at_ident_start(p) || p.at(SyntaxKind::T_STAR)) && p.nth_at(1, SyntaxKind::T_PIPE) {
        p.bump();
        p.bump();
    } else {
        p.eat(SyntaxKind::T_PIPE);
    }
    if !ident_tokens(p) {
        p.error(ErrorCode::IdentifierExpected);
    }
    if p.at_any(&[
        SyntaxKind::T_EQ,
        SyntaxKind::T_INCLUDES,
        SyntaxKind::T_DASH_MATCH,
        SyntaxKind::T_PREFIX_MATCH,
        SyntaxKind::T_SUFFIX_MATCH,
        SyntaxKind::T_SUBSTRING_MATCH,
    ]) {
        let op = p.start();
        p.bump();
        op.complete(p, SyntaxKind::N_OPERATOR);
        if super::expressions::term(p).is_none() {
            p.error(ErrorCode::TermExpected);
        }
        // case-sensitivity flag
        if p.at(SyntaxKind::T_IDENT) {
            p.bump();
        }
    }
    if !p.eat(SyntaxKind::T_RBRACKET) {
        p.error(ErrorCode::RightSquareBracketExpected);
        p.recover(
            &[SyntaxKind::T_RBRACKET],
            &[SyntaxKind::T_LBRACE, SyntaxKind::T_SEMI],
        );
    }
    m.complete(p, SyntaxKind::N_ATTRIBUTE_SELECTOR);
}

/// `':' ':'? name ('(' argument ')')?`
fn pseudo(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    if p.at(SyntaxKind::T_COLON) && p.nth_adjacent(0) {
        p.bump();
    }
    if !(p.nth_adjacent(0) && at_ident_start(p)) {
        p.error(ErrorCode::IdentifierExpected);
        m.complete(p, SyntaxKind::N_PSEUDO_SELECTOR);
        return;
    }
    let name = p.text().to_ascii_lowercase();
    ident_tokens(p);
    if p.at(SyntaxKind::T_LPAREN) && p.nth_adjacent(0) {
        p.bump();
        if SELECTOR_PSEUDOS.contains(&name.as_str()) {
            if selectors(p).is_none() {
                p.error(ErrorCode::SelectorExpected);
            }
        } else if NTH_PSEUDOS.contains(&name.as_str()) {
            nth(p);
        } else {
            while !p.at_any(&[
                SyntaxKind::T_RPAREN,
                SyntaxKind::T_RBRACE,
                SyntaxKind::T_SEMI,
                SyntaxKind::T_EOF,
            ]) {
                p.bump_balanced();
            }
        }
        if !p.eat(SyntaxKind::T_RPAREN) {
            p.error(ErrorCode::RightParenthesisExpected);
        }
    }
    m.complete(p, SyntaxKind::N_PSEUDO_SELECTOR);
}

/// `an+b (of selectors)?`, `odd`, `even`.
fn nth(p: &mut Parser<'_>) {
    let m = p.start();
    let mut consumed = false;
    loop {
        match p.current() {
            SyntaxKind::T_NUMBER
            | SyntaxKind::T_DIMENSION
            | SyntaxKind::T_PLUS
            | SyntaxKind::T_MINUS
            | SyntaxKind::T_DOLLAR_VAR => p.bump(),
            SyntaxKind::T_IDENT if !p.at_word("of") => p.bump(),
            SyntaxKind::T_HASH_LBRACE if p.dialect() == Dialect::Scss => {
                super::interpolation(p);
            }
            _ => break,
        }
        consumed = true;
    }
    if !consumed {
        p.error(ErrorCode::TermExpected);
    }
    if p.eat_word("of") && selectors(p).is_none() {
        p.error(ErrorCode::SelectorExpected);
    }
    m.complete(p, SyntaxKind::N_NTH);
}

#[cfg(test)]
mod tests {
    use crate::{Dialect, SyntaxKind, parse_selector};
    use rstest::rstest;

    fn kinds(src: &str, dialect: Dialect) -> Vec<SyntaxKind> {
        let parsed = parse_selector(src, dialect);
        assert!(parsed.errors().is_empty(), "{:?}", parsed.errors());
        assert!(parsed.is_complete());
        parsed
            .node()
            .map(|n| {
                n.descendants()
                    .map(|d| d.kind())
                    .filter(|k| *k != SyntaxKind::N_SIMPLE_SELECTOR)
                    .collect()
            })
            .unwrap_or_default()
    }

    #[rstest]
    #[case("a.b#c", vec![SyntaxKind::N_SELECTOR, SyntaxKind::N_ELEMENT_NAME, SyntaxKind::N_CLASS_SELECTOR, SyntaxKind::N_ID_SELECTOR])]
    #[case("ul > li", vec![SyntaxKind::N_SELECTOR, SyntaxKind::N_ELEMENT_NAME, SyntaxKind::N_SELECTOR_COMBINATOR, SyntaxKind::N_ELEMENT_NAME])]
    #[case("[lang|=en i]", vec![SyntaxKind::N_SELECTOR, SyntaxKind::N_ATTRIBUTE_SELECTOR, SyntaxKind::N_OPERATOR, SyntaxKind::N_TERM, SyntaxKind::N_IDENTIFIER])]
    #[case("svg|rect", vec![SyntaxKind::N_SELECTOR, SyntaxKind::N_ELEMENT_NAME])]
    #[case("u+a", vec![SyntaxKind::N_SELECTOR, SyntaxKind::N_ELEMENT_NAME, SyntaxKind::N_SELECTOR_COMBINATOR, SyntaxKind::N_ELEMENT_NAME])]
    #[case("li:nth-child(2n+1 of .x)", vec![SyntaxKind::N_SELECTOR, SyntaxKind::N_ELEMENT_NAME, SyntaxKind::N_PSEUDO_SELECTOR, SyntaxKind::N_NTH, SyntaxKind::N_SELECTORS, SyntaxKind::N_SELECTOR, SyntaxKind::N_CLASS_SELECTOR])]
    fn css_selectors(#[case] src: &str, #[case] expected: Vec<SyntaxKind>) {
        assert_eq!(kinds(src, Dialect::Css), expected);
    }

    #[rstest]
    fn scss_reference_and_placeholder() {
        let kinds = kinds("&-item %base", Dialect::Scss);
        assert!(kinds.contains(&SyntaxKind::N_SELECTOR_REFERENCE));
        assert!(kinds.contains(&SyntaxKind::N_SELECTOR_PLACEHOLDER));
    }

    #[rstest]
    fn pseudo_without_name_is_an_error() {
        let parsed = parse_selector("a: b", Dialect::Css);
        assert_eq!(
            parsed.errors().first().map(|e| e.code),
            Some(crate::ErrorCode::IdentifierExpected)
        );
    }
}
