//! Assertion helpers for verifying parser output in tests.

use rowan::TextRange;

use crate::{ErrorCode, ParseError, Parsed, SyntaxNode};

/// Assert that a parser produced no errors.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "test-support")]
/// # {
/// use cssls::ParseError;
/// use cssls::test_util::assert_no_parse_errors;
/// let errors: Vec<ParseError> = Vec::new();
/// assert_no_parse_errors(&errors);
/// # }
/// ```
///
/// # Panics
/// Panics if `errors` is not empty.
#[track_caller]
pub fn assert_no_parse_errors<E: std::fmt::Debug>(errors: &[E]) {
    assert!(errors.is_empty(), "Parse errors: {errors:?}");
}

/// Assert that exactly one error with `code` was reported at `start..end`.
///
/// # Panics
/// Panics if there is not exactly one error, or if its code or range
/// differ.
#[track_caller]
pub fn assert_parse_error(errors: &[ParseError], code: ErrorCode, start: u32, end: u32) {
    assert_eq!(errors.len(), 1, "expected one error, got {errors:?}");
    let Some(error) = errors.first() else {
        unreachable!("length checked above");
    };
    assert_eq!(error.code, code, "unexpected error code in {error:?}");
    assert_eq!(
        error.range,
        TextRange::new(start.into(), end.into()),
        "unexpected error range in {error:?}"
    );
}

/// Assert the error codes reported, in order.
///
/// # Panics
/// Panics if the codes differ.
#[track_caller]
pub fn assert_error_codes(errors: &[ParseError], expected: &[ErrorCode]) {
    let codes: Vec<ErrorCode> = errors.iter().map(|e| e.code).collect();
    assert_eq!(codes, expected, "errors: {errors:?}");
}

/// Assert that the tree text equals the source.
///
/// # Panics
/// Panics if any text was lost or duplicated.
#[track_caller]
pub fn assert_round_trip(src: &str, parsed: &Parsed) {
    assert_eq!(parsed.syntax().text().to_string(), src);
}

/// Assert that every node lies inside its parent and siblings do not
/// overlap.
///
/// # Panics
/// Panics on the first violation.
#[track_caller]
pub fn assert_spans_nested(root: &SyntaxNode) {
    for node in root.descendants() {
        let range = node.text_range();
        let mut previous_end = range.start();
        for child in node.children() {
            let child_range = child.text_range();
            assert!(
                range.contains_range(child_range),
                "{child:?} escapes {node:?}"
            );
            assert!(
                child_range.start() >= previous_end,
                "{child:?} overlaps its previous sibling"
            );
            previous_end = child_range.end();
        }
    }
}
