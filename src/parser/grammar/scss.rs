//! SCSS overlay: variables, module members, interpolation, mixins,
//! functions, control flow and the module system.

use super::{
    at_rules, block, block_item, body, expressions, ident, prio, selectors, string_literal,
    string_or_uri,
};
use crate::parser::state::{CompletedMarker, Parser};
use crate::parser::errors::ErrorCode;
use crate::SyntaxKind;

/// `$name: expr ('!default' | '!global')*`
pub(super) fn variable_declaration(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if !(p.at(SyntaxKind::T_DOLLAR_VAR) && p.nth_at(1, SyntaxKind::T_COLON)) {
        return None;
    }
    let m = p.start();
    variable(p);
    p.bump();
    if expressions::expr(p, false).is_none() {
        p.error(ErrorCode::VariableValueExpected);
    }
    prio(p);
    variable_flags(p, &["default", "global"]);
    Some(m.complete(p, SyntaxKind::N_VARIABLE_DECLARATION))
}

fn variable_flags(p: &mut Parser<'_>, allowed: &[&str]) {
    while p.at(SyntaxKind::T_BANG) && allowed.iter().any(|flag| p.nth_word(1, flag)) {
        let m = p.start();
        p.bump();
        p.bump();
        m.complete(p, SyntaxKind::N_VARIABLE_FLAG);
    }
}

/// `$name` at the current token.
pub(super) fn variable(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    m.complete(p, SyntaxKind::N_VARIABLE)
}

/// `namespace.$member` or `namespace.function(...)`.
pub(super) fn module_member(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let qualified = p.at(SyntaxKind::T_IDENT)
        && p.nth_at(1, SyntaxKind::T_DOT)
        && p.nth_adjacent(1)
        && p.nth_adjacent(2);
    if !qualified {
        return None;
    }
    let is_call = p.nth_at(2, SyntaxKind::T_IDENT)
        && p.nth_at(3, SyntaxKind::T_LPAREN)
        && p.nth_adjacent(3);
    if !(p.nth_at(2, SyntaxKind::T_DOLLAR_VAR) || is_call) {
        return None;
    }
    let m = p.start();
    ident(p);
    p.bump();
    if is_call {
        let name = ident(p)?;
        let call = name.precede(p);
        expressions::arguments(p);
        call.complete(p, SyntaxKind::N_FUNCTION);
    } else {
        variable(p);
    }
    Some(m.complete(p, SyntaxKind::N_MODULE_MEMBER))
}

/// `'#{' expr '}'`
pub(super) fn interpolation(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if !p.at(SyntaxKind::T_HASH_LBRACE) {
        return None;
    }
    let m = p.start();
    p.bump();
    if expressions::expr(p, false).is_none() {
        p.error(ErrorCode::ExpressionExpected);
    }
    p.expect(SyntaxKind::T_RBRACE, ErrorCode::RightCurlyExpected);
    Some(m.complete(p, SyntaxKind::N_INTERPOLATION))
}

/// SCSS-only at-rules; `None` hands the keyword back to the shared
/// grammar.
pub(super) fn at_rule(p: &mut Parser<'_>, nested: bool) -> Option<CompletedMarker> {
    let name = p.text().to_ascii_lowercase();
    let rule = match name.as_str() {
        "@mixin" => mixin_declaration(p, nested),
        "@include" => mixin_reference(p, nested),
        "@content" => content_reference(p),
        "@function" => function_declaration(p, nested),
        "@return" => keyword_expression(p, SyntaxKind::N_RETURN_STATEMENT),
        "@if" => if_statement(p, nested),
        "@for" => for_statement(p, nested),
        "@each" => each_statement(p, nested),
        "@while" => while_statement(p, nested),
        "@extend" => extend(p),
        "@debug" | "@warn" | "@error" => keyword_expression(p, SyntaxKind::N_DEBUG_STATEMENT),
        "@at-root" => at_root(p, nested),
        "@use" => use_rule(p),
        "@forward" => forward(p),
        _ => return None,
    };
    Some(rule)
}

/// `@mixin name parameters? block`
fn mixin_declaration(p: &mut Parser<'_>, nested: bool) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if ident(p).is_none() {
        p.error(ErrorCode::IdentifierExpected);
    }
    if p.at(SyntaxKind::T_LPAREN) {
        parameter_list(p);
    }
    body(p, nested);
    m.complete(p, SyntaxKind::N_MIXIN_DECLARATION)
}

/// `'(' (parameter (',' parameter)*)? ')'`
fn parameter_list(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    while !p.at_any(&[SyntaxKind::T_RPAREN, SyntaxKind::T_EOF]) {
        if !parameter(p) {
            p.error(ErrorCode::VariableNameExpected);
            p.recover(
                &[],
                &[SyntaxKind::T_RPAREN, SyntaxKind::T_LBRACE, SyntaxKind::T_SEMI],
            );
            break;
        }
        if !p.eat(SyntaxKind::T_COMMA) {
            break;
        }
    }
    if !p.eat(SyntaxKind::T_RPAREN) {
        p.error(ErrorCode::RightParenthesisExpected);
        p.recover(
            &[SyntaxKind::T_RPAREN],
            &[SyntaxKind::T_LBRACE, SyntaxKind::T_SEMI],
        );
    }
    m.complete(p, SyntaxKind::N_PARAMETER_LIST)
}

/// `$name (':' default)? '...'?`
fn parameter(p: &mut Parser<'_>) -> bool {
    if !p.at(SyntaxKind::T_DOLLAR_VAR) {
        return false;
    }
    let m = p.start();
    variable(p);
    if p.eat(SyntaxKind::T_COLON) && expressions::expr(p, true).is_none() {
        p.error(ErrorCode::VariableValueExpected);
    }
    p.eat(SyntaxKind::T_ELLIPSIS);
    m.complete(p, SyntaxKind::N_FUNCTION_PARAMETER);
    true
}

/// `@include name arguments? ('using' parameters)? block?`
fn mixin_reference(p: &mut Parser<'_>, nested: bool) -> CompletedMarker {
    let m = p.start();
    p.bump();
    mixin_name(p);
    if p.at(SyntaxKind::T_LPAREN) {
        expressions::arguments(p);
    }
    if p.at_word("using") || p.at(SyntaxKind::T_LBRACE) {
        let content = p.start();
        if p.eat_word("using") {
            if p.at(SyntaxKind::T_LPAREN) {
                parameter_list(p);
            } else {
                p.error(ErrorCode::LeftParenthesisExpected);
            }
        }
        block(p, block_item, ErrorCode::RuleOrSelectorExpected, nested);
        content.complete(p, SyntaxKind::N_MIXIN_CONTENT_DECLARATION);
    }
    m.complete(p, SyntaxKind::N_MIXIN_REFERENCE)
}

/// `name` or `namespace.name`.
fn mixin_name(p: &mut Parser<'_>) {
    let Some(name) = ident(p) else {
        p.error(ErrorCode::IdentifierExpected);
        return;
    };
    let qualified = p.at(SyntaxKind::T_DOT)
        && p.nth_adjacent(0)
        && p.nth_adjacent(1)
        && p.nth_at(1, SyntaxKind::T_IDENT);
    if qualified {
        let member = name.precede(p);
        p.bump();
        ident(p);
        member.complete(p, SyntaxKind::N_MODULE_MEMBER);
    }
}

fn content_reference(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if p.at(SyntaxKind::T_LPAREN) {
        expressions::arguments(p);
    }
    m.complete(p, SyntaxKind::N_MIXIN_CONTENT_REFERENCE)
}

/// `@function name parameters block`
fn function_declaration(p: &mut Parser<'_>, nested: bool) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if ident(p).is_none() {
        p.error(ErrorCode::IdentifierExpected);
    }
    if p.at(SyntaxKind::T_LPAREN) {
        parameter_list(p);
    } else {
        p.error(ErrorCode::LeftParenthesisExpected);
    }
    body(p, nested);
    m.complete(p, SyntaxKind::N_FUNCTION_DECLARATION)
}

/// `@return expr`, `@debug expr` and friends.
fn keyword_expression(p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if expressions::expr(p, false).is_none() {
        p.error(ErrorCode::ExpressionExpected);
    }
    m.complete(p, kind)
}

fn if_statement(p: &mut Parser<'_>, nested: bool) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if_tail(p, nested);
    m.complete(p, SyntaxKind::N_IF_STATEMENT)
}

/// `condition block else?`
fn if_tail(p: &mut Parser<'_>, nested: bool) {
    if expressions::expr(p, false).is_none() {
        p.error(ErrorCode::ConditionExpected);
    }
    body(p, nested);
    if p.at_keyword("@else") || p.at_keyword("@elseif") {
        else_statement(p, nested);
    }
}

/// `@else block`, `@else if ...` or the legacy `@elseif ...`.
fn else_statement(p: &mut Parser<'_>, nested: bool) {
    let m = p.start();
    let legacy = p.at_keyword("@elseif");
    p.bump();
    if legacy || p.at_word("if") {
        let inner = p.start();
        if !legacy {
            p.bump();
        }
        if_tail(p, nested);
        inner.complete(p, SyntaxKind::N_IF_STATEMENT);
    } else {
        body(p, nested);
    }
    m.complete(p, SyntaxKind::N_ELSE_STATEMENT);
}

/// `@for $i from a (through | to) b block`
fn for_statement(p: &mut Parser<'_>, nested: bool) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if p.at(SyntaxKind::T_DOLLAR_VAR) {
        variable(p);
    } else {
        p.error(ErrorCode::VariableNameExpected);
    }
    if !p.eat_word("from") {
        p.error(ErrorCode::FromExpected);
    }
    if expressions::binary(p).is_none() {
        p.error(ErrorCode::ExpressionExpected);
    }
    if !(p.eat_word("through") || p.eat_word("to")) {
        p.error(ErrorCode::ThroughOrToExpected);
    }
    if expressions::binary(p).is_none() {
        p.error(ErrorCode::ExpressionExpected);
    }
    body(p, nested);
    m.complete(p, SyntaxKind::N_FOR_STATEMENT)
}

/// `@each $a (',' $b)* in expr block`
fn each_statement(p: &mut Parser<'_>, nested: bool) -> CompletedMarker {
    let m = p.start();
    p.bump();
    let list = p.start();
    loop {
        if !p.at(SyntaxKind::T_DOLLAR_VAR) {
            p.error(ErrorCode::VariableNameExpected);
            break;
        }
        variable(p);
        if !p.eat(SyntaxKind::T_COMMA) {
            break;
        }
    }
    list.complete(p, SyntaxKind::N_VARIABLE_LIST);
    if !p.eat_word("in") {
        p.error(ErrorCode::InExpected);
    }
    if expressions::expr(p, false).is_none() {
        p.error(ErrorCode::ExpressionExpected);
    }
    body(p, nested);
    m.complete(p, SyntaxKind::N_EACH_STATEMENT)
}

fn while_statement(p: &mut Parser<'_>, nested: bool) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if expressions::expr(p, false).is_none() {
        p.error(ErrorCode::ConditionExpected);
    }
    body(p, nested);
    m.complete(p, SyntaxKind::N_WHILE_STATEMENT)
}

/// `@extend selectors '!optional'?`
fn extend(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if selectors::selectors(p).is_none() {
        p.error(ErrorCode::SelectorExpected);
    }
    if p.at(SyntaxKind::T_BANG) && p.nth_word(1, "optional") {
        p.bump();
        p.bump();
    }
    m.complete(p, SyntaxKind::N_EXTENDS_REFERENCE)
}

/// `@at-root (selectors | '(' query ')')? block`
fn at_root(p: &mut Parser<'_>, nested: bool) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if p.at(SyntaxKind::T_LPAREN) {
        at_rules::media_feature(p);
    } else if selectors::at_selector_start(p) {
        selectors::selectors(p);
    }
    body(p, nested);
    m.complete(p, SyntaxKind::N_AT_ROOT)
}

/// `@use "url" ('as' (name | '*'))? ('with' configuration)?`
fn use_rule(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if string_literal(p).is_none() {
        p.error(ErrorCode::StringLiteralExpected);
    }
    if p.eat_word("as") && !p.eat(SyntaxKind::T_STAR) && ident(p).is_none() {
        p.error(ErrorCode::IdentifierOrWildcardExpected);
    }
    if p.at_word("with") {
        module_configuration(p);
    }
    m.complete(p, SyntaxKind::N_USE)
}

/// `@forward "url" ('as' prefix-*)? (('show' | 'hide') members)? ('with' configuration)?`
fn forward(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if !string_or_uri(p) {
        p.error(ErrorCode::StringLiteralExpected);
    }
    if p.eat_word("as") {
        if ident(p).is_none() {
            p.error(ErrorCode::IdentifierExpected);
        }
        if !(p.nth_adjacent(0) && p.eat(SyntaxKind::T_STAR)) {
            p.error(ErrorCode::WildcardExpected);
        }
    }
    if p.at_word("show") || p.at_word("hide") {
        let visibility = p.start();
        p.bump();
        loop {
            if p.at(SyntaxKind::T_DOLLAR_VAR) {
                variable(p);
            } else if ident(p).is_none() {
                p.error(ErrorCode::IdentifierOrVariableExpected);
                break;
            }
            if !p.eat(SyntaxKind::T_COMMA) {
                break;
            }
        }
        visibility.complete(p, SyntaxKind::N_FORWARD_VISIBILITY);
    }
    if p.at_word("with") {
        module_configuration(p);
    }
    m.complete(p, SyntaxKind::N_FORWARD)
}

/// `'with' '(' ($name ':' expr '!default'?) (',' ...)* ')'`
fn module_configuration(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if !p.eat(SyntaxKind::T_LPAREN) {
        p.error(ErrorCode::LeftParenthesisExpected);
        return m.complete(p, SyntaxKind::N_MODULE_CONFIGURATION);
    }
    while !p.at_any(&[SyntaxKind::T_RPAREN, SyntaxKind::T_EOF]) {
        if !p.at(SyntaxKind::T_DOLLAR_VAR) {
            p.error(ErrorCode::VariableNameExpected);
            break;
        }
        let entry = p.start();
        variable(p);
        if p.expect(SyntaxKind::T_COLON, ErrorCode::ColonExpected)
            && expressions::expr(p, true).is_none()
        {
            p.error(ErrorCode::VariableValueExpected);
        }
        variable_flags(p, &["default"]);
        entry.complete(p, SyntaxKind::N_LIST_ENTRY);
        if !p.eat(SyntaxKind::T_COMMA) {
            break;
        }
    }
    if !p.eat(SyntaxKind::T_RPAREN) {
        p.error(ErrorCode::RightParenthesisExpected);
        p.recover(&[SyntaxKind::T_RPAREN], &[SyntaxKind::T_SEMI]);
    }
    m.complete(p, SyntaxKind::N_MODULE_CONFIGURATION)
}

#[cfg(test)]
mod tests {
    use crate::{Dialect, ErrorCode, SyntaxKind, ast, parse_at_rule};
    use rstest::rstest;

    #[rstest]
    #[case("@mixin sexy-border($color, $width: 1in) { color: black; }", SyntaxKind::N_MIXIN_DECLARATION)]
    #[case("@include button-variant($bg, $border: null) { &:hover { color: red } }", SyntaxKind::N_MIXIN_REFERENCE)]
    #[case("@include mq.breakpoint(md) using ($size) { width: $size; }", SyntaxKind::N_MIXIN_REFERENCE)]
    #[case("@function double($n) { @return $n * 2; }", SyntaxKind::N_FUNCTION_DECLARATION)]
    #[case("@if $a == 1 { a: b } @else if $a > 2 { c: d } @else { e: f }", SyntaxKind::N_IF_STATEMENT)]
    #[case("@for $i from 1 through length($list) { .item-#{$i} { width: 2em * $i; } }", SyntaxKind::N_FOR_STATEMENT)]
    #[case("@each $name, $glyph in $icons { .icon-#{$name}:before { content: $glyph; } }", SyntaxKind::N_EACH_STATEMENT)]
    #[case("@while $i > 0 { .w-#{$i} { width: 10px * $i; } }", SyntaxKind::N_WHILE_STATEMENT)]
    #[case("@extend %message-shared !optional;", SyntaxKind::N_EXTENDS_REFERENCE)]
    #[case("@debug \"value: #{$x}\";", SyntaxKind::N_DEBUG_STATEMENT)]
    #[case("@at-root .child { color: red }", SyntaxKind::N_AT_ROOT)]
    #[case("@at-root (without: media) { color: red }", SyntaxKind::N_AT_ROOT)]
    #[case("@use 'sass:math' as m;", SyntaxKind::N_USE)]
    #[case("@use 'library' with ($black: #222, $border-radius: 0.1rem !default);", SyntaxKind::N_USE)]
    #[case("@forward 'src/list' as list-* hide list-reset, $horizontal-list-gap;", SyntaxKind::N_FORWARD)]
    #[case("@media #{$query} and (max-width: $bp) { a { b: c } }", SyntaxKind::N_MEDIA)]
    fn scss_at_rules(#[case] src: &str, #[case] kind: SyntaxKind) {
        let parsed = parse_at_rule(src, Dialect::Scss);
        assert!(parsed.errors().is_empty(), "{src}: {:?}", parsed.errors());
        assert!(parsed.is_complete(), "{src} not fully consumed");
        assert_eq!(parsed.node().map(|n| n.kind()), Some(kind));
    }

    #[rstest]
    fn else_if_nests_an_if_statement() {
        let parsed = parse_at_rule("@if $a { } @else if $b { } @else { }", Dialect::Scss);
        let kinds = parsed
            .node()
            .map(|n| ast::kind_sequence(&n))
            .unwrap_or_default();
        let ifs = kinds
            .iter()
            .filter(|k| **k == SyntaxKind::N_IF_STATEMENT)
            .count();
        let elses = kinds
            .iter()
            .filter(|k| **k == SyntaxKind::N_ELSE_STATEMENT)
            .count();
        assert_eq!((ifs, elses), (2, 2));
    }

    #[rstest]
    #[case("@for $i 1 through 3 { }", ErrorCode::FromExpected)]
    #[case("@for $i from 1 until 3 { }", ErrorCode::ThroughOrToExpected)]
    #[case("@each $x of $list { }", ErrorCode::InExpected)]
    #[case("@each in $list { }", ErrorCode::VariableNameExpected)]
    #[case("@mixin m(a) { }", ErrorCode::VariableNameExpected)]
    #[case("@function f { }", ErrorCode::LeftParenthesisExpected)]
    #[case("@use foo;", ErrorCode::StringLiteralExpected)]
    #[case("@forward 'a' as b;", ErrorCode::WildcardExpected)]
    fn broken_scss_rules_report(#[case] src: &str, #[case] code: ErrorCode) {
        let parsed = parse_at_rule(src, Dialect::Scss);
        let codes: Vec<_> = parsed.errors().iter().map(|e| e.code).collect();
        assert!(codes.contains(&code), "{src}: {codes:?}");
    }
}
