//! Shared test utilities for integration tests.
//!
//! These helpers parse fixtures and assert over error codes. They mirror a
//! subset of the `cssls::test_util` module without requiring the
//! `test-support` feature, enabling integration tests to compile against the
//! published library.

#![expect(
    dead_code,
    reason = "helpers are reused across multiple tests so some may be unused"
)]

use cssls::{Dialect, ErrorCode, GlobalScope, ParseError, Parsed, SyntaxKind, SyntaxNode};

/// Parse `src` and check that the tree reproduces it.
#[track_caller]
pub fn parse(src: &str, dialect: Dialect) -> Parsed {
    let parsed = cssls::parse(src, dialect);
    assert_eq!(parsed.syntax().text().to_string(), src, "text was not preserved");
    parsed
}

/// Parse `src`, asserting no errors were reported.
#[track_caller]
pub fn parse_clean(src: &str, dialect: Dialect) -> Parsed {
    let parsed = parse(src, dialect);
    assert!(
        parsed.errors().is_empty(),
        "unexpected errors for {src:?}: {:?}",
        parsed.errors()
    );
    parsed
}

/// Error codes reported for `src`, in order.
pub fn error_codes(src: &str, dialect: Dialect) -> Vec<ErrorCode> {
    parse(src, dialect).errors().iter().map(|e| e.code).collect()
}

/// Whether any node of `kind` occurs in the tree of `parsed`.
pub fn contains_kind(parsed: &Parsed, kind: SyntaxKind) -> bool {
    parsed.syntax().descendants().any(|n| n.kind() == kind)
}

/// Number of nodes of `kind` in the tree of `parsed`.
pub fn count_kind(parsed: &Parsed, kind: SyntaxKind) -> usize {
    parsed
        .syntax()
        .descendants()
        .filter(|n| n.kind() == kind)
        .count()
}

/// First node of `kind` in pre-order.
#[track_caller]
pub fn find_node(root: &SyntaxNode, kind: SyntaxKind) -> SyntaxNode {
    root.descendants()
        .find(|n| n.kind() == kind)
        .unwrap_or_else(|| panic!("no {kind:?} node"))
}

/// Parse `src` and build its scopes.
pub fn scopes(src: &str, dialect: Dialect) -> GlobalScope {
    cssls::build_scopes(&parse(src, dialect).syntax())
}

/// Byte offset of the first occurrence of `needle`.
#[track_caller]
pub fn offset_of(src: &str, needle: &str) -> usize {
    src.find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not found in '{src}'"))
}

/// Assert that every error range lies within the source.
#[track_caller]
pub fn assert_errors_in_bounds(src: &str, errors: &[ParseError]) {
    for error in errors {
        assert!(
            usize::from(error.range.end()) <= src.len(),
            "{error:?} is outside {src:?}"
        );
    }
}
