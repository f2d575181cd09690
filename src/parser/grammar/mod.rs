//! Grammar productions shared by every dialect.
//!
//! Productions return `Option<CompletedMarker>`: `None` means the input did
//! not start the construct and nothing was consumed. The SCSS and LESS
//! overlays hook in at a handful of points by matching on
//! [`Parser::dialect`]; recovery and block handling live here only.

pub(crate) mod at_rules;
pub(crate) mod expressions;
mod less;
mod scss;
pub(crate) mod selectors;

use log::debug;

use super::state::{CompletedMarker, Parser};
use super::errors::ErrorCode;
use crate::{Dialect, SyntaxKind};

/// A production used for the items of a `{}` block.
pub(crate) type Item = fn(&mut Parser<'_>) -> Option<CompletedMarker>;

/// `stylesheet := (at-rule | ruleset | ';' | '<!--' | '-->')*`
pub(crate) fn stylesheet(p: &mut Parser<'_>) {
    let m = p.start();
    while !p.at(SyntaxKind::T_EOF) {
        if p.at_any(&[SyntaxKind::T_CDO, SyntaxKind::T_CDC, SyntaxKind::T_SEMI]) {
            p.bump();
            continue;
        }
        if statement(p).is_none() {
            p.error(ErrorCode::RuleOrSelectorExpected);
            p.bump_balanced();
            continue;
        }
        expect_statement_end(p);
    }
    m.complete(p, SyntaxKind::N_STYLESHEET);
}

/// One top-level statement.
pub(crate) fn statement(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if p.at(SyntaxKind::T_AT_KEYWORD) {
        return at_rules::at_rule(p, false);
    }
    match p.dialect() {
        Dialect::Scss => {
            if let Some(decl) = scss::variable_declaration(p) {
                return Some(decl);
            }
        }
        Dialect::Less => {
            if let Some(mixin) = less::mixin_statement(p, false) {
                return Some(mixin);
            }
        }
        Dialect::Css => {}
    }
    ruleset(p, false)
}

/// Statements without a block must be followed by `;`, `}` or the end of
/// input.
fn expect_statement_end(p: &mut Parser<'_>) {
    if matches!(
        p.prev(),
        Some(SyntaxKind::T_RBRACE | SyntaxKind::T_SEMI)
    ) || p.at_any(&[SyntaxKind::T_EOF, SyntaxKind::T_RBRACE])
    {
        return;
    }
    if !p.eat(SyntaxKind::T_SEMI) {
        p.error(ErrorCode::SemiColonExpected);
        p.recover(&[SyntaxKind::T_SEMI], &[]);
    }
}

/// One item inside a ruleset-like block: a nested at-rule, a dialect
/// statement, a nested ruleset or a declaration.
pub(crate) fn block_item(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if p.at(SyntaxKind::T_AT_KEYWORD) {
        return at_rules::at_rule(p, true);
    }
    match p.dialect() {
        Dialect::Scss => {
            if let Some(decl) = scss::variable_declaration(p) {
                return Some(decl);
            }
        }
        Dialect::Less => {
            if let Some(mixin) = less::mixin_statement(p, true) {
                return Some(mixin);
            }
        }
        Dialect::Css => {}
    }
    if let Some(rule) = try_nested_ruleset(p) {
        return Some(rule);
    }
    declaration(p)
}

/// `'{' item* '}'` as an `N_DECLARATIONS` node.
///
/// Items that do not end in a block must be separated by `;`. `missing`
/// is reported when an item cannot be parsed at all.
pub(crate) fn declarations(
    p: &mut Parser<'_>,
    item: Item,
    missing: ErrorCode,
) -> Option<CompletedMarker> {
    if !p.at(SyntaxKind::T_LBRACE) {
        return None;
    }
    let m = p.start();
    p.bump();
    loop {
        if p.at_any(&[SyntaxKind::T_RBRACE, SyntaxKind::T_EOF]) {
            break;
        }
        if p.eat(SyntaxKind::T_SEMI) {
            continue;
        }
        if item(p).is_none() {
            debug!("no block item at {:?} '{}'", p.current(), p.text());
            p.error(missing);
            p.recover(&[SyntaxKind::T_SEMI], &[]);
            continue;
        }
        if p.at_any(&[SyntaxKind::T_RBRACE, SyntaxKind::T_EOF])
            || p.eat(SyntaxKind::T_SEMI)
            || matches!(p.prev(), Some(SyntaxKind::T_RBRACE | SyntaxKind::T_SEMI))
        {
            continue;
        }
        p.error(ErrorCode::SemiColonExpected);
        p.recover(&[SyntaxKind::T_SEMI], &[]);
    }
    p.expect(SyntaxKind::T_RBRACE, ErrorCode::RightCurlyExpected);
    Some(m.complete(p, SyntaxKind::N_DECLARATIONS))
}

/// Parse a block with `item`, or report a missing `{` and skip the rest of
/// the statement.
pub(crate) fn block(p: &mut Parser<'_>, item: Item, missing: ErrorCode, nested: bool) -> bool {
    if declarations(p, item, missing).is_some() {
        return true;
    }
    p.error(ErrorCode::LeftCurlyExpected);
    if nested {
        p.recover(&[SyntaxKind::T_SEMI], &[]);
    } else {
        p.recover(&[SyntaxKind::T_SEMI, SyntaxKind::T_RBRACE], &[]);
    }
    false
}

/// A ruleset-style body of declarations, nested rules and at-rules.
pub(crate) fn body(p: &mut Parser<'_>, nested: bool) -> bool {
    block(p, block_item, ErrorCode::RuleOrSelectorExpected, nested)
}

/// `ruleset := selectors body`
pub(crate) fn ruleset(p: &mut Parser<'_>, nested: bool) -> Option<CompletedMarker> {
    let m = p.start();
    if selectors::selectors(p).is_none() {
        m.abandon(p);
        return None;
    }
    if p.dialect() == Dialect::Less && p.at_word("when") {
        less::guard(p);
    }
    body(p, nested);
    Some(m.complete(p, SyntaxKind::N_RULESET))
}

/// Parse a nested ruleset if the input is a selector list followed by `{`;
/// otherwise leave the input untouched.
fn try_nested_ruleset(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if !selectors::at_selector_start(p) || looks_like_declaration(p) {
        return None;
    }
    let checkpoint = p.checkpoint();
    let m = p.start();
    let parsed = selectors::selectors(p).is_some();
    if p.dialect() == Dialect::Less && p.at_word("when") {
        less::guard(p);
    }
    if !parsed || !p.at(SyntaxKind::T_LBRACE) || p.has_error_since(checkpoint) {
        p.rewind(checkpoint);
        return None;
    }
    body(p, true);
    Some(m.complete(p, SyntaxKind::N_RULESET))
}

/// `name:` followed by whitespace or a block reads as a property.
fn looks_like_declaration(p: &Parser<'_>) -> bool {
    p.at(SyntaxKind::T_IDENT)
        && p.nth_at(1, SyntaxKind::T_COLON)
        && (p.nth_has_whitespace(2) || p.nth_at(2, SyntaxKind::T_LBRACE))
}

/// A declaration or, in SCSS, a `$variable` declaration.
pub(crate) fn any_declaration(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if p.dialect() == Dialect::Scss {
        if let Some(decl) = scss::variable_declaration(p) {
            return Some(decl);
        }
    }
    declaration(p)
}

/// `declaration := property ':' expr prio? nested-properties?`
///
/// A missing colon yields a declaration holding only its property so the
/// enclosing block can resynchronise at the next `;`.
pub(crate) fn declaration(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if p.at(SyntaxKind::T_IDENT) && p.text().starts_with("--") {
        return Some(custom_property_declaration(p));
    }
    let m = p.start();
    if property(p).is_none() {
        m.abandon(p);
        return None;
    }
    if !p.eat(SyntaxKind::T_COLON) {
        p.error(ErrorCode::ColonExpected);
        return Some(m.complete(p, SyntaxKind::N_DECLARATION));
    }
    let value = expressions::expr(p, false);
    prio(p);
    if p.at(SyntaxKind::T_LBRACE) {
        let nested = p.start();
        declarations(p, block_item, ErrorCode::RuleOrSelectorExpected);
        nested.complete(p, SyntaxKind::N_NESTED_PROPERTIES);
    } else if value.is_none() {
        p.error(ErrorCode::PropertyValueExpected);
    }
    Some(m.complete(p, SyntaxKind::N_DECLARATION))
}

fn custom_property_declaration(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let name = p.start();
    p.bump();
    name.complete(p, SyntaxKind::N_PROPERTY);
    if !p.eat(SyntaxKind::T_COLON) {
        p.error(ErrorCode::ColonExpected);
        return m.complete(p, SyntaxKind::N_CUSTOM_PROPERTY_DECLARATION);
    }
    custom_property_value(p);
    prio(p);
    m.complete(p, SyntaxKind::N_CUSTOM_PROPERTY_DECLARATION)
}

/// Structured when the value reads as an expression, otherwise an opaque
/// balanced token run.
fn custom_property_value(p: &mut Parser<'_>) {
    let checkpoint = p.checkpoint();
    if expressions::expr(p, false).is_some()
        && !p.has_error_since(checkpoint)
        && p.at_any(&[
            SyntaxKind::T_SEMI,
            SyntaxKind::T_RBRACE,
            SyntaxKind::T_RPAREN,
            SyntaxKind::T_BANG,
            SyntaxKind::T_EOF,
        ])
    {
        return;
    }
    p.rewind(checkpoint);
    let m = p.start();
    while !p.at_any(&[
        SyntaxKind::T_SEMI,
        SyntaxKind::T_RBRACE,
        SyntaxKind::T_RPAREN,
        SyntaxKind::T_RBRACKET,
        SyntaxKind::T_EOF,
    ]) && !(p.at(SyntaxKind::T_BANG) && p.nth_word(1, "important"))
    {
        p.bump_balanced();
    }
    m.complete(p, SyntaxKind::N_CUSTOM_PROPERTY_VALUE);
}

/// `property := ('*' | '_')? ident`
pub(crate) fn property(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let star_hack = p.at(SyntaxKind::T_STAR)
        && p.nth_at(1, SyntaxKind::T_IDENT)
        && p.nth_adjacent(1);
    if !star_hack && !at_ident_start(p) {
        return None;
    }
    let m = p.start();
    if star_hack {
        p.bump();
    }
    ident_tokens(p);
    if p.dialect() == Dialect::Less {
        less::property_merge(p);
    }
    Some(m.complete(p, SyntaxKind::N_PROPERTY))
}

/// `prio := '!' 'important'`
pub(crate) fn prio(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if !(p.at(SyntaxKind::T_BANG) && p.nth_word(1, "important")) {
        return None;
    }
    let m = p.start();
    p.bump();
    p.bump();
    Some(m.complete(p, SyntaxKind::N_PRIO))
}

/// Whether an interpolation opener of the current dialect is next.
pub(crate) fn at_interpolation(p: &Parser<'_>) -> bool {
    match p.dialect() {
        Dialect::Scss => p.at(SyntaxKind::T_HASH_LBRACE),
        Dialect::Less => p.at(SyntaxKind::T_AT_LBRACE),
        Dialect::Css => false,
    }
}

/// Whether an identifier, possibly interpolated, starts here.
pub(crate) fn at_ident_start(p: &Parser<'_>) -> bool {
    p.at(SyntaxKind::T_IDENT) || at_interpolation(p)
}

/// Consume an identifier built from adjacent identifier and interpolation
/// pieces, without wrapping it in a node.
pub(crate) fn ident_tokens(p: &mut Parser<'_>) -> bool {
    if !at_ident_start(p) {
        return false;
    }
    ident_piece(p);
    loop {
        if !p.nth_adjacent(0) {
            break;
        }
        if at_ident_start(p) {
            ident_piece(p);
        } else if p.at(SyntaxKind::T_MINUS) && p.nth_adjacent(1) && starts_ident_piece(p, 1) {
            p.bump();
        } else {
            break;
        }
    }
    true
}

fn starts_ident_piece(p: &Parser<'_>, n: usize) -> bool {
    match p.nth(n) {
        SyntaxKind::T_IDENT => true,
        SyntaxKind::T_HASH_LBRACE => p.dialect() == Dialect::Scss,
        SyntaxKind::T_AT_LBRACE => p.dialect() == Dialect::Less,
        _ => false,
    }
}

fn ident_piece(p: &mut Parser<'_>) {
    if at_interpolation(p) {
        interpolation(p);
    } else {
        p.bump();
    }
}

/// `N_IDENTIFIER` around [`ident_tokens`].
pub(crate) fn ident(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if !at_ident_start(p) {
        return None;
    }
    let m = p.start();
    ident_tokens(p);
    Some(m.complete(p, SyntaxKind::N_IDENTIFIER))
}

/// `#{ expr }` in SCSS, `@{ name }` in LESS.
pub(crate) fn interpolation(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    match p.dialect() {
        Dialect::Scss => scss::interpolation(p),
        Dialect::Less => less::interpolation(p),
        Dialect::Css => None,
    }
}

/// A string literal or `url(...)` term.
pub(crate) fn string_or_uri(p: &mut Parser<'_>) -> bool {
    let is_uri = p.at(SyntaxKind::T_URL)
        || (p.at_word("url") && p.nth_at(1, SyntaxKind::T_LPAREN) && p.nth_adjacent(1));
    if is_uri || p.at_any(&[SyntaxKind::T_STRING, SyntaxKind::T_BAD_STRING]) {
        expressions::term(p);
        return true;
    }
    false
}

/// A string literal term.
pub(crate) fn string_literal(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if !p.at_any(&[SyntaxKind::T_STRING, SyntaxKind::T_BAD_STRING]) {
        return None;
    }
    let m = p.start();
    p.bump();
    Some(m.complete(p, SyntaxKind::N_STRING_LITERAL))
}
