//! Value expressions.
//!
//! `expr` is a space- or comma-separated list of binary expressions.
//! Binary operators bind by precedence climbing; SCSS adds comparison,
//! equality, boolean and modulo operators on top of the shared arithmetic
//! set.

use super::{at_ident_start, ident, less, scss};
use crate::parser::state::{CompletedMarker, Parser};
use crate::parser::errors::ErrorCode;
use crate::{Dialect, SyntaxKind};

/// `expr := binary ((',' | ε) binary)*`
///
/// With `stop_at_comma` the list ends at the first comma, which is how
/// function arguments and map entries are delimited.
pub(crate) fn expr(p: &mut Parser<'_>, stop_at_comma: bool) -> Option<CompletedMarker> {
    let m = p.start();
    if binary(p).is_none() {
        m.abandon(p);
        return None;
    }
    loop {
        if p.at(SyntaxKind::T_COMMA) {
            if stop_at_comma {
                break;
            }
            p.bump();
            if binary(p).is_none() {
                if p.dialect() == Dialect::Css {
                    p.error(ErrorCode::TermExpected);
                }
                break;
            }
            continue;
        }
        if binary(p).is_none() {
            break;
        }
    }
    Some(m.complete(p, SyntaxKind::N_EXPRESSION))
}

/// A single binary expression with no top-level list separators.
pub(crate) fn binary(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    binary_expr(p, 1)
}

fn binary_expr(p: &mut Parser<'_>, min_precedence: u8) -> Option<CompletedMarker> {
    let mut lhs = term(p)?;
    while let Some(precedence) = operator_precedence(p) {
        if precedence < min_precedence {
            break;
        }
        let m = lhs.precede(p);
        operator(p);
        if binary_expr(p, precedence + 1).is_none() {
            p.error(ErrorCode::TermExpected);
        }
        lhs = m.complete(p, SyntaxKind::N_BINARY_EXPRESSION);
    }
    Some(lhs)
}

fn operator_precedence(p: &Parser<'_>) -> Option<u8> {
    let scss = p.dialect() == Dialect::Scss;
    match p.current() {
        SyntaxKind::T_SLASH | SyntaxKind::T_STAR => Some(6),
        SyntaxKind::T_PERCENT if scss => Some(6),
        SyntaxKind::T_PLUS | SyntaxKind::T_MINUS if is_binary_sign(p) => Some(5),
        SyntaxKind::T_LT | SyntaxKind::T_LTE | SyntaxKind::T_GT | SyntaxKind::T_GTE if scss => {
            Some(4)
        }
        SyntaxKind::T_EQEQ | SyntaxKind::T_NEQ if scss => Some(3),
        SyntaxKind::T_IDENT if scss && p.at_word("and") => Some(2),
        SyntaxKind::T_IDENT if scss && p.at_word("or") => Some(1),
        _ => None,
    }
}

/// `a - b` and `a-b` subtract; `a -b` is a list of `a` and a negative term.
fn is_binary_sign(p: &Parser<'_>) -> bool {
    p.has_whitespace() == p.nth_has_whitespace(1)
}

fn operator(p: &mut Parser<'_>) {
    let m = p.start();
    p.bump();
    m.complete(p, SyntaxKind::N_OPERATOR);
}

/// A range comparison (`<`, `<=`, `>`, `>=`, `=`) as used by media
/// features and LESS guards.
pub(crate) fn comparison(p: &mut Parser<'_>) -> bool {
    if !p.at_any(&[
        SyntaxKind::T_LT,
        SyntaxKind::T_LTE,
        SyntaxKind::T_GT,
        SyntaxKind::T_GTE,
        SyntaxKind::T_EQ,
    ]) {
        return false;
    }
    operator(p);
    true
}

/// `term := unary? term-body`
pub(crate) fn term(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    let unary = (p.at_any(&[SyntaxKind::T_PLUS, SyntaxKind::T_MINUS])
        && p.nth_adjacent(1)
        && !p.nth_at(1, SyntaxKind::T_EOF))
        || (p.dialect() == Dialect::Scss && p.at_word("not") && p.nth_has_whitespace(1));
    if unary {
        operator(p);
    }
    if term_body(p).is_none() {
        if unary {
            p.error(ErrorCode::TermExpected);
            return Some(m.complete(p, SyntaxKind::N_TERM));
        }
        m.abandon(p);
        return None;
    }
    Some(m.complete(p, SyntaxKind::N_TERM))
}

fn term_body(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let dialect = p.dialect();
    match p.current() {
        SyntaxKind::T_NUMBER | SyntaxKind::T_PERCENTAGE | SyntaxKind::T_DIMENSION => {
            Some(leaf(p, SyntaxKind::N_NUMERIC_VALUE))
        }
        SyntaxKind::T_STRING | SyntaxKind::T_BAD_STRING => {
            Some(leaf(p, SyntaxKind::N_STRING_LITERAL))
        }
        SyntaxKind::T_URL => Some(leaf(p, SyntaxKind::N_URI_LITERAL)),
        SyntaxKind::T_UNICODE_RANGE => Some(leaf(p, SyntaxKind::N_UNICODE_RANGE)),
        SyntaxKind::T_HASH => Some(hex_color(p)),
        SyntaxKind::T_LBRACKET => Some(bracketed(p)),
        SyntaxKind::T_LPAREN => Some(parenthesized(p)),
        SyntaxKind::T_DOLLAR_VAR if dialect == Dialect::Scss => Some(scss::variable(p)),
        SyntaxKind::T_AMP if dialect == Dialect::Scss => {
            Some(leaf(p, SyntaxKind::N_SELECTOR_REFERENCE))
        }
        SyntaxKind::T_AT_KEYWORD | SyntaxKind::T_AT if dialect == Dialect::Less => {
            less::variable(p)
        }
        SyntaxKind::T_TILDE if dialect == Dialect::Less => less::escaped_value(p),
        _ if at_ident_start(p) => Some(ident_or_function(p)),
        _ => None,
    }
}

fn leaf(p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
    let m = p.start();
    p.bump();
    m.complete(p, kind)
}

/// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
fn hex_color(p: &mut Parser<'_>) -> CompletedMarker {
    let digits = p.text().trim_start_matches('#');
    let valid = matches!(digits.len(), 3 | 4 | 6 | 8)
        && digits.chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        p.error(ErrorCode::HexColorExpected);
    }
    leaf(p, SyntaxKind::N_HEX_COLOR)
}

fn ident_or_function(p: &mut Parser<'_>) -> CompletedMarker {
    if p.at_word("url") && p.nth_at(1, SyntaxKind::T_LPAREN) && p.nth_adjacent(1) {
        return uri_literal(p);
    }
    if p.at_word("progid") && p.nth_at(1, SyntaxKind::T_COLON) && p.nth_adjacent(1) {
        return progid_function(p);
    }
    if p.dialect() == Dialect::Scss {
        if let Some(member) = scss::module_member(p) {
            return member;
        }
    }
    let Some(name) = ident(p) else {
        // callers check `at_ident_start` first
        return leaf(p, SyntaxKind::N_IDENTIFIER);
    };
    if !(p.at(SyntaxKind::T_LPAREN) && p.nth_adjacent(0)) {
        return name;
    }
    let m = name.precede(p);
    arguments(p);
    m.complete(p, SyntaxKind::N_FUNCTION)
}

/// IE filter: `progid:DXImageTransform.Microsoft.Alpha(Opacity=80)`.
///
/// The dotted name becomes a single `N_IDENTIFIER`.
fn progid_function(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    let name = p.start();
    p.bump();
    p.bump();
    while p.at(SyntaxKind::T_IDENT) && p.nth_adjacent(0) {
        p.bump();
        if !(p.at(SyntaxKind::T_DOT) && p.nth_adjacent(0)) {
            break;
        }
        p.bump();
    }
    name.complete(p, SyntaxKind::N_IDENTIFIER);
    if p.at(SyntaxKind::T_LPAREN) && p.nth_adjacent(0) {
        arguments(p);
    } else {
        p.error(ErrorCode::LeftParenthesisExpected);
    }
    m.complete(p, SyntaxKind::N_FUNCTION)
}

/// `url(` with a quoted or variable argument.
fn uri_literal(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    p.bump();
    if !p.at(SyntaxKind::T_RPAREN) && term(p).is_none() {
        p.error(ErrorCode::UriOrStringExpected);
    }
    if !p.eat(SyntaxKind::T_RPAREN) {
        p.error(ErrorCode::RightParenthesisExpected);
        p.recover(&[SyntaxKind::T_RPAREN], &[SyntaxKind::T_SEMI]);
    }
    m.complete(p, SyntaxKind::N_URI_LITERAL)
}

/// `'(' (argument (',' argument)*)? ')'`; LESS also separates with `;`.
pub(crate) fn arguments(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    while !p.at(SyntaxKind::T_RPAREN) {
        if function_argument(p).is_none() {
            if !p.at_any(&[SyntaxKind::T_RPAREN, SyntaxKind::T_EOF]) {
                p.error(ErrorCode::ExpressionExpected);
                p.recover(&[], &[SyntaxKind::T_RPAREN, SyntaxKind::T_SEMI]);
            }
            break;
        }
        let separated = p.eat(SyntaxKind::T_COMMA)
            || (p.dialect() == Dialect::Less && p.eat(SyntaxKind::T_SEMI));
        if !separated {
            break;
        }
    }
    if !p.eat(SyntaxKind::T_RPAREN) {
        p.error(ErrorCode::RightParenthesisExpected);
        p.recover(&[SyntaxKind::T_RPAREN], &[SyntaxKind::T_SEMI]);
    }
    m.complete(p, SyntaxKind::N_ARGUMENT_LIST)
}

/// `(name ':' | ident '=')? expr '...'?`
fn function_argument(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let m = p.start();
    let mut keyword = match p.dialect() {
        Dialect::Scss => p.at(SyntaxKind::T_DOLLAR_VAR) && p.nth_at(1, SyntaxKind::T_COLON),
        Dialect::Less => p.at(SyntaxKind::T_AT_KEYWORD) && p.nth_at(1, SyntaxKind::T_COLON),
        Dialect::Css => false,
    };
    if keyword {
        let name = p.start();
        p.bump();
        name.complete(p, SyntaxKind::N_VARIABLE);
        p.bump();
    } else if p.at(SyntaxKind::T_IDENT) && p.nth_at(1, SyntaxKind::T_EQ) {
        // `Opacity=80` in IE filters
        keyword = true;
        ident(p);
        operator(p);
    }
    let value = expr(p, true);
    if value.is_none() && !keyword && !p.at(SyntaxKind::T_ELLIPSIS) {
        m.abandon(p);
        return None;
    }
    if value.is_none() && keyword {
        p.error(ErrorCode::ExpressionExpected);
    }
    p.eat(SyntaxKind::T_ELLIPSIS);
    Some(m.complete(p, SyntaxKind::N_FUNCTION_ARGUMENT))
}

/// `[` line names `]` in grid templates, bracketed lists in SCSS.
fn bracketed(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if !p.at(SyntaxKind::T_RBRACKET) {
        expr(p, false);
    }
    if !p.eat(SyntaxKind::T_RBRACKET) {
        p.error(ErrorCode::RightSquareBracketExpected);
        p.recover(&[SyntaxKind::T_RBRACKET], &[SyntaxKind::T_SEMI]);
    }
    m.complete(p, SyntaxKind::N_GRID_LINE)
}

/// `'(' expr ')'`; in SCSS a list or map of `key: value` entries.
fn parenthesized(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.bump();
    if p.dialect() == Dialect::Scss {
        while list_entry(p) && p.eat(SyntaxKind::T_COMMA) {}
    } else if !p.at(SyntaxKind::T_RPAREN) && expr(p, false).is_none() {
        p.error(ErrorCode::ExpressionExpected);
    }
    if !p.eat(SyntaxKind::T_RPAREN) {
        p.error(ErrorCode::RightParenthesisExpected);
        p.recover(&[SyntaxKind::T_RPAREN], &[SyntaxKind::T_SEMI]);
    }
    m.complete(p, SyntaxKind::N_PARENTHESIZED)
}

fn list_entry(p: &mut Parser<'_>) -> bool {
    let m = p.start();
    if expr(p, true).is_none() {
        m.abandon(p);
        return false;
    }
    if p.eat(SyntaxKind::T_COLON) && expr(p, true).is_none() {
        p.error(ErrorCode::ExpressionExpected);
    }
    m.complete(p, SyntaxKind::N_LIST_ENTRY);
    true
}
