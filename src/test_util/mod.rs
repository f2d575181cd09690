//! Helpers for parsing fixtures and asserting over syntax errors in tests.
//!
//! These functions reduce boilerplate when checking token streams, node
//! kinds and the error codes a parse reports.

mod assertions;

pub use assertions::{
    assert_error_codes, assert_no_parse_errors, assert_parse_error, assert_round_trip,
    assert_spans_nested,
};

use crate::{Dialect, Parsed, Span, SyntaxKind, SyntaxNode, parse, tokenize_with_trivia};

/// Tokenize `src` into `(SyntaxKind, Span)` pairs using
/// [`tokenize_with_trivia`].
///
/// # Examples
///
/// ```rust,no_run
/// # #[cfg(feature = "test-support")]
/// # {
/// use cssls::{Dialect, test_util::tokenize};
/// assert!(tokenize("a { color: red }", Dialect::Css).len() > 0);
/// # }
/// ```
#[must_use]
pub fn tokenize(src: &str, dialect: Dialect) -> Vec<(SyntaxKind, Span)> {
    tokenize_with_trivia(src, dialect)
}

/// Kinds of the significant tokens of `src`.
#[must_use]
pub fn token_kinds(src: &str, dialect: Dialect) -> Vec<SyntaxKind> {
    tokenize(src, dialect)
        .into_iter()
        .map(|(kind, _)| kind)
        .filter(|kind| !kind.is_trivia())
        .collect()
}

/// Parse `src`, asserting that it round-trips and reports no errors.
///
/// # Panics
/// Panics if the parse reports errors or loses text.
#[track_caller]
#[must_use]
pub fn parse_clean(src: &str, dialect: Dialect) -> Parsed {
    let parsed = parse(src, dialect);
    assert_round_trip(src, &parsed);
    assert_no_parse_errors(parsed.errors());
    parsed
}

/// First node of `kind` under `root`, in pre-order.
///
/// # Panics
/// Panics if there is no such node.
#[track_caller]
#[must_use]
pub fn find_node(root: &SyntaxNode, kind: SyntaxKind) -> SyntaxNode {
    root.descendants()
        .find(|n| n.kind() == kind)
        .unwrap_or_else(|| panic!("no {kind:?} node in {root:#?}"))
}

/// Byte offset of the first occurrence of `needle` in `src`.
///
/// # Panics
/// Panics if `needle` does not occur.
#[track_caller]
#[must_use]
pub fn offset_of(src: &str, needle: &str) -> usize {
    src.find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not found in '{src}'"))
}
