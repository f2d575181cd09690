//! Syntax error codes and the error records returned with every parse.

use rowan::TextRange;

/// Closed set of syntax error codes.
///
/// Each error in a parse result is also marked in the tree by a zero-length
/// `N_ERROR` node positioned at the offending token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorCode {
    #[error("condition expected")]
    ConditionExpected,
    #[error("at-rule or selector expected")]
    RuleOrSelectorExpected,
    #[error("colon expected")]
    ColonExpected,
    #[error("semi-colon expected")]
    SemiColonExpected,
    #[error("term expected")]
    TermExpected,
    #[error("expression expected")]
    ExpressionExpected,
    #[error("identifier expected")]
    IdentifierExpected,
    #[error("percentage expected")]
    PercentageExpected,
    #[error("uri or string expected")]
    UriOrStringExpected,
    #[error("variable name expected")]
    VariableNameExpected,
    #[error("variable value expected")]
    VariableValueExpected,
    #[error("property value expected")]
    PropertyValueExpected,
    #[error("{{ expected")]
    LeftCurlyExpected,
    #[error("}} expected")]
    RightCurlyExpected,
    #[error("] expected")]
    RightSquareBracketExpected,
    #[error("( expected")]
    LeftParenthesisExpected,
    #[error(") expected")]
    RightParenthesisExpected,
    #[error("page directive or declaration expected")]
    PageDirectiveOrDeclarationExpected,
    #[error("selector expected")]
    SelectorExpected,
    #[error("string literal expected")]
    StringLiteralExpected,
    #[error("media query expected")]
    MediaQueryExpected,
    #[error("identifier or wildcard expected")]
    IdentifierOrWildcardExpected,
    #[error("wildcard expected")]
    WildcardExpected,
    #[error("identifier or variable expected")]
    IdentifierOrVariableExpected,
    #[error("hex color expected")]
    HexColorExpected,
    #[error("'from' expected")]
    FromExpected,
    #[error("'through' or 'to' expected")]
    ThroughOrToExpected,
    #[error("'in' expected")]
    InExpected,
}

/// A syntax error recorded while parsing.
///
/// `range` covers the token the parser stopped at, or is empty at the end of
/// input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code} at {range:?}")]
pub struct ParseError {
    /// What was expected.
    pub code: ErrorCode,
    /// Source range of the offending token.
    pub range: TextRange,
}

impl ParseError {
    /// Start offset of the error.
    #[must_use]
    pub fn offset(&self) -> usize {
        usize::from(self.range.start())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorCode::LeftCurlyExpected, "{ expected")]
    #[case(ErrorCode::PageDirectiveOrDeclarationExpected, "page directive or declaration expected")]
    #[case(ErrorCode::ThroughOrToExpected, "'through' or 'to' expected")]
    fn codes_display_their_message(#[case] code: ErrorCode, #[case] message: &str) {
        assert_eq!(code.to_string(), message);
    }

    #[rstest]
    fn parse_error_display_includes_the_range() {
        let error = ParseError {
            code: ErrorCode::ColonExpected,
            range: TextRange::new(3.into(), 4.into()),
        };
        assert_eq!(error.to_string(), "colon expected at 3..4");
        assert_eq!(error.offset(), 3);
    }
}
