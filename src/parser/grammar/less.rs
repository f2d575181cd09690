//! LESS overlay: `@` variables, mixins, guards, escapes and the few
//! LESS-only at-rules.
//!
//! Mixin declarations and calls look like ordinary selectors until a
//! parameter list, a guard or the terminating `{`/`;` is reached, so both
//! are parsed speculatively and rewound when the input turns out to be a
//! ruleset.

use super::{block_item, body, declarations, expressions, ident_tokens, prio, selectors};
use crate::data::DataView;
use crate::parser::state::{CompletedMarker, Parser};
use crate::parser::errors::ErrorCode;
use crate::SyntaxKind;

/// LESS-only at-rules: variable declarations, detached-ruleset calls and
/// `@plugin`.
pub(super) fn at_rule(p: &mut Parser<'_>, _nested: bool) -> Option<CompletedMarker> {
    if p.nth_at(1, SyntaxKind::T_COLON) && p.nth_adjacent(1) {
        return Some(variable_declaration(p));
    }
    if p.at_keyword("@plugin") {
        return Some(plugin(p));
    }
    let is_call = p.nth_at(1, SyntaxKind::T_LPAREN)
        && p.nth_adjacent(1)
        && !DataView::builtin().is_known_at_rule(p.text());
    if is_call {
        let m = p.start();
        variable(p);
        expressions::arguments(p);
        return Some(m.complete(p, SyntaxKind::N_MIXIN_REFERENCE));
    }
    None
}

/// `@name: (expr | detached-ruleset)`
fn variable_declaration(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    variable(p);
    p.bump();
    if p.at(SyntaxKind::T_LBRACE) {
        let detached = p.start();
        declarations(p, block_item, ErrorCode::RuleOrSelectorExpected);
        detached.complete(p, SyntaxKind::N_DETACHED_RULESET);
    } else if expressions::expr(p, false).is_none() {
        p.error(ErrorCode::VariableValueExpected);
    } else {
        prio(p);
    }
    m.complete(p, SyntaxKind::N_VARIABLE_DECLARATION)
}

fn plugin(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if !super::string_or_uri(p) {
        p.error(ErrorCode::UriOrStringExpected);
    }
    m.complete(p, SyntaxKind::N_PLUGIN)
}

/// `'(' option (',' option)* ')'` after `@import`.
pub(super) fn import_options(p: &mut Parser<'_>) {
    if !p.at(SyntaxKind::T_LPAREN) {
        return;
    }
    let m = p.start();
    p.bump();
    loop {
        if !p.eat(SyntaxKind::T_IDENT) {
            p.error(ErrorCode::IdentifierExpected);
            break;
        }
        if !p.eat(SyntaxKind::T_COMMA) {
            break;
        }
    }
    if !p.eat(SyntaxKind::T_RPAREN) {
        p.error(ErrorCode::RightParenthesisExpected);
        p.recover(&[SyntaxKind::T_RPAREN], &[SyntaxKind::T_SEMI]);
    }
    m.complete(p, SyntaxKind::N_IMPORT_OPTIONS);
}

/// `@name` or the variable-variable form `@@name`.
pub(super) fn variable(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let indirect = p.at(SyntaxKind::T_AT)
        && p.nth_at(1, SyntaxKind::T_AT_KEYWORD)
        && p.nth_adjacent(1);
    if !indirect && !p.at(SyntaxKind::T_AT_KEYWORD) {
        return None;
    }
    let m = p.start();
    if indirect {
        p.bump();
    }
    p.bump();
    Some(m.complete(p, SyntaxKind::N_VARIABLE))
}

/// `~"..."`
pub(super) fn escaped_value(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let escaped = p.at(SyntaxKind::T_TILDE)
        && p.nth_adjacent(1)
        && matches!(p.nth(1), SyntaxKind::T_STRING | SyntaxKind::T_BAD_STRING);
    if !escaped {
        return None;
    }
    let m = p.start();
    p.bump();
    p.bump();
    Some(m.complete(p, SyntaxKind::N_ESCAPED_VALUE))
}

/// `'@{' name '}'`
pub(super) fn interpolation(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if !p.at(SyntaxKind::T_AT_LBRACE) {
        return None;
    }
    let m = p.start();
    p.bump();
    if !p.eat(SyntaxKind::T_IDENT) {
        p.error(ErrorCode::IdentifierExpected);
    }
    p.expect(SyntaxKind::T_RBRACE, ErrorCode::RightCurlyExpected);
    Some(m.complete(p, SyntaxKind::N_INTERPOLATION))
}

/// `+:` or `+_:` after a property name.
pub(super) fn property_merge(p: &mut Parser<'_>) {
    if !(p.at(SyntaxKind::T_PLUS) && p.nth_adjacent(0)) {
        return;
    }
    if p.nth_at(1, SyntaxKind::T_COLON) {
        p.bump();
    } else if p.nth_word(1, "_") && p.nth_at(2, SyntaxKind::T_COLON) {
        p.bump();
        p.bump();
    }
}

/// Mixin declarations, mixin calls and `&:extend(...)` statements.
pub(super) fn mixin_statement(p: &mut Parser<'_>, nested: bool) -> Option<CompletedMarker> {
    if p.at(SyntaxKind::T_AMP) && p.nth_at(1, SyntaxKind::T_COLON) && p.nth_word(2, "extend") {
        let m = p.start();
        selectors::selector(p);
        return Some(m.complete(p, SyntaxKind::N_EXTENDS_REFERENCE));
    }
    if !at_mixin_name(p) {
        return None;
    }
    mixin_declaration(p, nested).or_else(|| mixin_reference(p))
}

fn at_mixin_name(p: &Parser<'_>) -> bool {
    p.at(SyntaxKind::T_HASH)
        || (p.at(SyntaxKind::T_DOT) && p.nth_at(1, SyntaxKind::T_IDENT) && p.nth_adjacent(1))
}

/// `.name` or `#name` as an `N_IDENTIFIER` keeping its sigil.
fn mixin_name(p: &mut Parser<'_>) {
    let m = p.start();
    if p.eat(SyntaxKind::T_DOT) {
        ident_tokens(p);
    } else {
        p.bump();
    }
    m.complete(p, SyntaxKind::N_IDENTIFIER);
}

/// `.name(parameters) guard? block`
fn mixin_declaration(p: &mut Parser<'_>, nested: bool) -> Option<CompletedMarker> {
    let checkpoint = p.checkpoint();
    let m = p.start();
    mixin_name(p);
    if !(p.at(SyntaxKind::T_LPAREN) && p.nth_adjacent(0)) {
        p.rewind(checkpoint);
        return None;
    }
    parameter_list(p);
    if p.at_word("when") {
        guard(p);
    }
    if !p.at(SyntaxKind::T_LBRACE) || p.has_error_since(checkpoint) {
        p.rewind(checkpoint);
        return None;
    }
    body(p, nested);
    Some(m.complete(p, SyntaxKind::N_MIXIN_DECLARATION))
}

/// `'(' (parameter ((',' | ';') parameter)*)? ')'`
fn parameter_list(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    while !p.at_any(&[SyntaxKind::T_RPAREN, SyntaxKind::T_EOF]) {
        if !parameter(p) {
            p.error(ErrorCode::VariableNameExpected);
            p.recover(&[], &[SyntaxKind::T_RPAREN, SyntaxKind::T_LBRACE]);
            break;
        }
        if !(p.eat(SyntaxKind::T_COMMA) || p.eat(SyntaxKind::T_SEMI)) {
            break;
        }
    }
    if !p.eat(SyntaxKind::T_RPAREN) {
        p.error(ErrorCode::RightParenthesisExpected);
        p.recover(&[SyntaxKind::T_RPAREN], &[SyntaxKind::T_LBRACE]);
    }
    m.complete(p, SyntaxKind::N_PARAMETER_LIST)
}

/// `@name (':' default)?`, `@rest...`, `...` or a pattern-matching value.
fn parameter(p: &mut Parser<'_>) -> bool {
    let m = p.start();
    if variable(p).is_some() {
        if p.eat(SyntaxKind::T_COLON) {
            if expressions::expr(p, true).is_none() {
                p.error(ErrorCode::VariableValueExpected);
            }
        } else {
            p.eat(SyntaxKind::T_ELLIPSIS);
        }
    } else if !p.eat(SyntaxKind::T_ELLIPSIS) && expressions::expr(p, true).is_none() {
        m.abandon(p);
        return false;
    }
    m.complete(p, SyntaxKind::N_FUNCTION_PARAMETER);
    true
}

/// `.a.b();`, `#ns > .m(args) !important;` or `.m;`
fn mixin_reference(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let checkpoint = p.checkpoint();
    let m = p.start();
    mixin_name(p);
    loop {
        let child = p.eat(SyntaxKind::T_GT);
        if at_mixin_name(p) {
            mixin_name(p);
        } else if child {
            p.rewind(checkpoint);
            return None;
        } else {
            break;
        }
    }
    if p.at(SyntaxKind::T_LPAREN) {
        expressions::arguments(p);
    }
    prio(p);
    let terminated = p.at_any(&[SyntaxKind::T_SEMI, SyntaxKind::T_RBRACE, SyntaxKind::T_EOF]);
    if !terminated || p.has_error_since(checkpoint) {
        p.rewind(checkpoint);
        return None;
    }
    Some(m.complete(p, SyntaxKind::N_MIXIN_REFERENCE))
}

/// `'when' condition ((',' | 'and' | 'or') condition)*`
pub(super) fn guard(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    loop {
        if !guard_condition(p) {
            p.error(ErrorCode::ConditionExpected);
            break;
        }
        let joined =
            p.eat(SyntaxKind::T_COMMA) || p.eat_word("and") || p.eat_word("or");
        if !joined {
            break;
        }
    }
    m.complete(p, SyntaxKind::N_LESS_GUARD)
}

/// `'not'? '(' expr (comparison expr)? ')'`
fn guard_condition(p: &mut Parser<'_>) -> bool {
    let negated = p.at_word("not") && p.nth_at(1, SyntaxKind::T_LPAREN);
    if !negated && !p.at(SyntaxKind::T_LPAREN) {
        return false;
    }
    let m = p.start();
    if negated {
        p.bump();
    }
    p.bump();
    if expressions::binary(p).is_none() {
        p.error(ErrorCode::ExpressionExpected);
    }
    while expressions::comparison(p) {
        if expressions::binary(p).is_none() {
            p.error(ErrorCode::ExpressionExpected);
            break;
        }
    }
    if !p.eat(SyntaxKind::T_RPAREN) {
        p.error(ErrorCode::RightParenthesisExpected);
        p.recover(&[SyntaxKind::T_RPAREN], &[SyntaxKind::T_LBRACE]);
    }
    m.complete(p, SyntaxKind::N_GUARD_CONDITION);
    true
}

#[cfg(test)]
mod tests {
    use crate::test_util::{assert_no_parse_errors, parse_clean};
    use crate::{Dialect, SyntaxKind, ast, parse_at_rule, parse_ruleset};
    use rstest::rstest;

    fn kinds(src: &str) -> Vec<SyntaxKind> {
        ast::kind_sequence(&parse_clean(src, Dialect::Less).syntax())
    }

    #[rstest]
    #[case(".box-shadow(@x:0, @y:0){ -webkit-box-shadow: @arguments; }")]
    #[case(".m(@a: 1; @rest...) when (iscolor(@a)) and (@b > 0) { color: @a }")]
    #[case(".m(dark; @color) { color: darken(@color, 10%) }")]
    fn mixin_declarations(#[case] src: &str) {
        assert!(kinds(src).contains(&SyntaxKind::N_MIXIN_DECLARATION));
    }

    #[rstest]
    #[case(".a { .m(); }")]
    #[case(".a { #ns > .m(1px; red) !important; }")]
    #[case(".a { #ns.m; }")]
    #[case("@detached: { color: red }; .a { @detached(); }")]
    fn mixin_calls(#[case] src: &str) {
        assert!(kinds(src).contains(&SyntaxKind::N_MIXIN_REFERENCE));
    }

    #[rstest]
    fn ordinary_rulesets_are_not_mixins() {
        let seq = kinds(".a .b, #c { color: red }");
        assert!(!seq.contains(&SyntaxKind::N_MIXIN_REFERENCE));
        assert!(!seq.contains(&SyntaxKind::N_MIXIN_DECLARATION));
        assert_eq!(seq.get(1), Some(&SyntaxKind::N_RULESET));
    }

    #[rstest]
    #[case("@min768: ~\"(min-width: 768px)\";", SyntaxKind::N_ESCAPED_VALUE)]
    #[case("@name: banner; .@{name} { color: @@var }", SyntaxKind::N_INTERPOLATION)]
    #[case(".a:extend(.b all) { }", SyntaxKind::N_PSEUDO_SELECTOR)]
    #[case(".a { &:extend(.b); }", SyntaxKind::N_EXTENDS_REFERENCE)]
    #[case(".a { background+: url(1.png); background+_: red }", SyntaxKind::N_DECLARATION)]
    #[case(".guard when (@mode = huge) { width: 100% }", SyntaxKind::N_LESS_GUARD)]
    #[case("@plugin \"my-plugin\";", SyntaxKind::N_PLUGIN)]
    #[case("@import (reference, optional) \"foo\";", SyntaxKind::N_IMPORT_OPTIONS)]
    #[case("@r: { a: b };", SyntaxKind::N_DETACHED_RULESET)]
    #[case("@page :first { margin: 1in }", SyntaxKind::N_PAGE)]
    #[case("@media screen { @page :left { margin: 0 } }", SyntaxKind::N_PAGE)]
    fn less_constructs(#[case] src: &str, #[case] kind: SyntaxKind) {
        assert!(kinds(src).contains(&kind), "{src}");
    }

    #[rstest]
    fn variable_declaration_fragment() {
        let parsed = parse_at_rule("@width: 10px + 5", Dialect::Less);
        assert_no_parse_errors(parsed.errors());
        assert_eq!(
            parsed.node().map(|n| n.kind()),
            Some(SyntaxKind::N_VARIABLE_DECLARATION)
        );
    }

    #[rstest]
    fn css_treats_mixin_syntax_as_a_ruleset() {
        let parsed = parse_ruleset(
            ".box-shadow(@x:0, @y:0){ -webkit-box-shadow: @arguments; }",
            Dialect::Css,
        );
        assert_eq!(parsed.node().map(|n| n.kind()), Some(SyntaxKind::N_RULESET));
    }
}
