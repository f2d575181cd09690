//! Event-based recursive-descent parser producing a `rowan` CST.
//!
//! Source text is tokenised with [`tokenize_with_trivia`], the grammar runs
//! over the significant tokens only and records start/token/finish/error
//! events, and the sink replays those events against the full token list to
//! build a lossless tree. Parsing never fails: syntax errors are embedded in
//! the tree as zero-length `N_ERROR` nodes and returned alongside it.

use log::debug;
use rowan::GreenNode;

use crate::{Dialect, SyntaxKind, SyntaxNode, tokenize_with_trivia};

pub mod ast;
mod errors;
mod event;
mod grammar;
mod sink;
mod state;
mod token_stream;

pub use errors::{ErrorCode, ParseError};

use sink::Sink;
use state::Parser;

/// Result of parsing a whole style sheet.
#[derive(Debug, Clone)]
pub struct Parsed {
    green: GreenNode,
    errors: Vec<ParseError>,
}

impl Parsed {
    /// Access the `rowan` green tree.
    #[must_use]
    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// The root of the syntax tree.
    #[must_use]
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// Typed view of the root node.
    #[must_use]
    pub fn root(&self) -> ast::Stylesheet {
        ast::Stylesheet {
            syntax: self.syntax(),
        }
    }

    /// Syntax errors in tree order.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// The `N_ERROR` marker nodes, in the same order as [`Parsed::errors`].
    #[must_use]
    pub fn error_nodes(&self) -> Vec<SyntaxNode> {
        self.syntax()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::N_ERROR)
            .collect()
    }

    /// Errors whose marker is a direct child of `node`.
    ///
    /// `node` must belong to this parse result's tree.
    #[must_use]
    pub fn issues(&self, node: &SyntaxNode) -> Vec<&ParseError> {
        self.error_nodes()
            .iter()
            .zip(&self.errors)
            .filter(|(marker, _)| marker.parent().as_ref() == Some(node))
            .map(|(_, error)| error)
            .collect()
    }
}

/// Parse a complete style sheet in `dialect`.
///
/// # Examples
///
/// ```
/// use cssls::{Dialect, SyntaxKind, parse};
///
/// let parsed = parse("a { color: red }", Dialect::Css);
/// assert!(parsed.errors().is_empty());
/// assert_eq!(parsed.syntax().kind(), SyntaxKind::N_STYLESHEET);
/// assert_eq!(parsed.syntax().text().to_string(), "a { color: red }");
/// ```
#[must_use]
pub fn parse(src: &str, dialect: Dialect) -> Parsed {
    let tokens = tokenize_with_trivia(src, dialect);
    let mut p = Parser::new(&tokens, src, dialect);
    grammar::stylesheet(&mut p);
    let (events, tokens) = p.finish();
    let (green, errors) = Sink::new(&tokens, src).finish(events);
    debug!(
        "parsed {} bytes of {dialect} into {} tokens with {} errors",
        src.len(),
        tokens.len(),
        errors.len()
    );
    Parsed { green, errors }
}

/// Result of parsing a single production.
///
/// The tree root is an `N_FRAGMENT` node holding the production and any
/// input left over after it.
#[derive(Debug, Clone)]
pub struct ParsedFragment {
    green: GreenNode,
    errors: Vec<ParseError>,
    complete: bool,
}

impl ParsedFragment {
    /// The fragment root.
    #[must_use]
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// The parsed production, if the input started one.
    #[must_use]
    pub fn node(&self) -> Option<SyntaxNode> {
        self.syntax()
            .children()
            .find(|n| n.kind() != SyntaxKind::N_ERROR)
    }

    /// Syntax errors in tree order.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Whether the production consumed every significant token.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

type Production = fn(&mut Parser<'_>);

fn parse_fragment(src: &str, dialect: Dialect, production: Production) -> ParsedFragment {
    let tokens = tokenize_with_trivia(src, dialect);
    let mut p = Parser::new(&tokens, src, dialect);
    let root = p.start();
    production(&mut p);
    let complete = p.is_exhausted();
    root.complete(&mut p, SyntaxKind::N_FRAGMENT);
    let (events, tokens) = p.finish();
    let (green, errors) = Sink::new(&tokens, src).finish(events);
    debug!(
        "parsed {dialect} fragment: {} errors, complete: {complete}",
        errors.len()
    );
    ParsedFragment {
        green,
        errors,
        complete,
    }
}

/// Parse a single ruleset.
///
/// # Examples
///
/// ```
/// use cssls::{Dialect, SyntaxKind, parse_ruleset};
///
/// let parsed = parse_ruleset("a, b > c { margin: 0 }", Dialect::Css);
/// assert!(parsed.is_complete());
/// assert_eq!(parsed.node().map(|n| n.kind()), Some(SyntaxKind::N_RULESET));
/// ```
#[must_use]
pub fn parse_ruleset(src: &str, dialect: Dialect) -> ParsedFragment {
    parse_fragment(src, dialect, |p| {
        grammar::ruleset(p, false);
    })
}

/// Parse a single declaration, optionally followed by `;`.
///
/// In SCSS a `$variable: value` declaration is accepted as well.
#[must_use]
pub fn parse_declaration(src: &str, dialect: Dialect) -> ParsedFragment {
    parse_fragment(src, dialect, |p| {
        grammar::any_declaration(p);
        p.eat(SyntaxKind::T_SEMI);
    })
}

/// Parse a single value expression.
///
/// # Examples
///
/// ```
/// use cssls::{Dialect, parse_expression};
///
/// let parsed = parse_expression("calc(100% - 2px) solid", Dialect::Css);
/// assert!(parsed.errors().is_empty());
/// assert!(parsed.is_complete());
/// ```
#[must_use]
pub fn parse_expression(src: &str, dialect: Dialect) -> ParsedFragment {
    parse_fragment(src, dialect, |p| {
        grammar::expressions::expr(p, false);
    })
}

/// Parse a single at-rule, optionally followed by `;`.
///
/// The at-keyword at the start of `src` selects the rule.
#[must_use]
pub fn parse_at_rule(src: &str, dialect: Dialect) -> ParsedFragment {
    parse_fragment(src, dialect, |p| {
        grammar::at_rules::at_rule(p, false);
        p.eat(SyntaxKind::T_SEMI);
    })
}

/// Parse a single complex selector (no selector list).
#[must_use]
pub fn parse_selector(src: &str, dialect: Dialect) -> ParsedFragment {
    parse_fragment(src, dialect, |p| {
        grammar::selectors::selector(p);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{
        assert_no_parse_errors, assert_parse_error, assert_round_trip, assert_spans_nested,
        find_node, offset_of,
    };
    use rstest::rstest;

    #[rstest]
    #[case("a { color: red }")]
    #[case("a { color: red; ")]
    #[case("}}} @media { ;; ")]
    #[case("/* only a comment")]
    #[case("a { b: \"unterminated\n }")]
    fn tree_text_round_trips(#[case] src: &str) {
        let parsed = parse(src, Dialect::Css);
        assert_round_trip(src, &parsed);
        assert_spans_nested(&parsed.syntax());
    }

    #[rstest]
    fn error_nodes_pair_with_errors() {
        let parsed = parse("a { b } c { d: }", Dialect::Css);
        assert_eq!(parsed.error_nodes().len(), parsed.errors().len());
        assert!(
            parsed
                .error_nodes()
                .iter()
                .all(|n| n.text_range().is_empty())
        );
    }

    #[rstest]
    fn issues_are_attached_to_the_broken_declaration() {
        let src = "a { b; c: d }";
        let parsed = parse(src, Dialect::Css);
        let broken = find_node(&parsed.syntax(), SyntaxKind::N_DECLARATION);
        let issues: Vec<ParseError> = parsed.issues(&broken).into_iter().cloned().collect();
        let semi = u32::try_from(offset_of(src, ";")).unwrap_or_else(|_| panic!("offset"));
        assert_parse_error(&issues, ErrorCode::ColonExpected, semi, semi + 1);
    }

    #[rstest]
    fn fragment_reports_leftover_input() {
        let parsed = parse_expression("1px ; 2px", Dialect::Css);
        assert!(!parsed.is_complete());
        assert_eq!(parsed.syntax().text().to_string(), "1px ; 2px");
    }

    #[rstest]
    fn scss_variable_declaration_fragment() {
        let parsed = parse_declaration("$x: 1px !default;", Dialect::Scss);
        assert_no_parse_errors(parsed.errors());
        assert!(parsed.is_complete());
        assert_eq!(
            parsed.node().map(|n| n.kind()),
            Some(SyntaxKind::N_VARIABLE_DECLARATION)
        );
    }
}
