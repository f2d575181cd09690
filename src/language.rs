//! `rowan` integration and style-sheet syntax kinds.
//!
//! This module defines the `SyntaxKind` enum covering all tokens and
//! non-terminal nodes produced for CSS, SCSS and LESS documents. The
//! enumeration is used by `rowan` to tag syntax tree elements. The
//! `CssLanguage` newtype implements `rowan::Language` using conversions
//! provided by `num_derive`.

use num_derive::{FromPrimitive as FromPrimitiveDerive, ToPrimitive as ToPrimitiveDerive};
use num_traits::{FromPrimitive, ToPrimitive};
use rowan::Language as RowanLanguage;
use rowan::SyntaxKind as RowanSyntaxKind;

/// Every possible token or node in a style-sheet syntax tree.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, FromPrimitiveDerive, ToPrimitiveDerive,
)]
#[repr(u16)]
#[expect(non_camel_case_types, reason = "kinds are tagged T_/N_ by role")]
pub enum SyntaxKind {
    // Trivia
    T_WHITESPACE,
    T_COMMENT,
    // Tokens
    T_IDENT,
    T_AT_KEYWORD,
    T_STRING,
    T_BAD_STRING,
    T_NUMBER,
    T_PERCENTAGE,
    T_DIMENSION,
    T_HASH,
    T_URL,
    T_UNICODE_RANGE,
    T_DOLLAR_VAR,
    T_PLACEHOLDER,
    T_HASH_LBRACE,
    T_AT_LBRACE,
    T_AT,
    T_LPAREN,
    T_RPAREN,
    T_LBRACE,
    T_RBRACE,
    T_LBRACKET,
    T_RBRACKET,
    T_SEMI,
    T_COLON,
    T_COMMA,
    T_DOT,
    T_ELLIPSIS,
    T_STAR,
    T_SLASH,
    T_PLUS,
    T_MINUS,
    T_GT,
    T_LT,
    T_GTE,
    T_LTE,
    T_EQ,
    T_EQEQ,
    T_NEQ,
    T_TILDE,
    T_BANG,
    T_AMP,
    T_PIPE,
    T_CARET,
    T_PERCENT,
    T_PREFIX_MATCH,
    T_SUFFIX_MATCH,
    T_SUBSTRING_MATCH,
    T_INCLUDES,
    T_DASH_MATCH,
    T_CDO,
    T_CDC,
    T_UNKNOWN,
    T_EOF,
    // Shared nodes
    N_STYLESHEET,
    N_FRAGMENT,
    N_RULESET,
    N_SELECTORS,
    N_SELECTOR,
    N_SIMPLE_SELECTOR,
    N_ELEMENT_NAME,
    N_CLASS_SELECTOR,
    N_ID_SELECTOR,
    N_ATTRIBUTE_SELECTOR,
    N_PSEUDO_SELECTOR,
    N_NTH,
    N_SELECTOR_COMBINATOR,
    N_SELECTOR_REFERENCE,
    N_SELECTOR_PLACEHOLDER,
    N_DECLARATIONS,
    N_DECLARATION,
    N_CUSTOM_PROPERTY_DECLARATION,
    N_CUSTOM_PROPERTY_VALUE,
    N_PROPERTY,
    N_PRIO,
    N_NESTED_PROPERTIES,
    N_EXPRESSION,
    N_BINARY_EXPRESSION,
    N_TERM,
    N_OPERATOR,
    N_FUNCTION,
    N_ARGUMENT_LIST,
    N_FUNCTION_ARGUMENT,
    N_IDENTIFIER,
    N_HEX_COLOR,
    N_NUMERIC_VALUE,
    N_STRING_LITERAL,
    N_URI_LITERAL,
    N_UNICODE_RANGE,
    N_GRID_LINE,
    N_PARENTHESIZED,
    N_LIST_ENTRY,
    // CSS at-rules
    N_IMPORT,
    N_NAMESPACE,
    N_CHARSET,
    N_MEDIA,
    N_MEDIA_QUERY_LIST,
    N_MEDIA_QUERY,
    N_MEDIA_FEATURE,
    N_SUPPORTS,
    N_SUPPORTS_CONDITION,
    N_PAGE,
    N_PAGE_SELECTOR,
    N_PAGE_MARGIN_BOX,
    N_FONT_FACE,
    N_KEYFRAME,
    N_KEYFRAME_SELECTOR,
    N_LAYER,
    N_CONTAINER,
    N_PROPERTY_AT_RULE,
    N_UNKNOWN_AT_RULE,
    N_AT_RULE_PRELUDE,
    // Dialect nodes
    N_VARIABLE,
    N_VARIABLE_DECLARATION,
    N_VARIABLE_FLAG,
    N_INTERPOLATION,
    N_MODULE_MEMBER,
    N_PARAMETER_LIST,
    N_FUNCTION_PARAMETER,
    N_MIXIN_DECLARATION,
    N_MIXIN_REFERENCE,
    N_MIXIN_CONTENT_REFERENCE,
    N_MIXIN_CONTENT_DECLARATION,
    N_FUNCTION_DECLARATION,
    N_RETURN_STATEMENT,
    N_IF_STATEMENT,
    N_ELSE_STATEMENT,
    N_FOR_STATEMENT,
    N_EACH_STATEMENT,
    N_VARIABLE_LIST,
    N_WHILE_STATEMENT,
    N_EXTENDS_REFERENCE,
    N_DEBUG_STATEMENT,
    N_AT_ROOT,
    N_USE,
    N_FORWARD,
    N_FORWARD_VISIBILITY,
    N_MODULE_CONFIGURATION,
    N_LESS_GUARD,
    N_GUARD_CONDITION,
    N_ESCAPED_VALUE,
    N_DETACHED_RULESET,
    N_PLUGIN,
    N_IMPORT_OPTIONS,
    // Special
    N_ERROR,
}

impl SyntaxKind {
    /// Whether the kind is whitespace or a comment.
    #[must_use]
    pub const fn is_trivia(self) -> bool {
        matches!(self, Self::T_WHITESPACE | Self::T_COMMENT)
    }

    /// Whether the kind tags a leaf token rather than a node.
    #[must_use]
    pub fn is_token(self) -> bool {
        self <= Self::T_EOF
    }
}

/// Newtype wrapper allowing `rowan` to store `SyntaxKind` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CssLanguage;

impl RowanLanguage for CssLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: RowanSyntaxKind) -> Self::Kind {
        SyntaxKind::from_u16(raw.0).unwrap_or(SyntaxKind::N_ERROR)
    }

    fn kind_to_raw(kind: Self::Kind) -> RowanSyntaxKind {
        RowanSyntaxKind(
            kind.to_u16()
                .unwrap_or_else(|| unreachable!("all SyntaxKind variants map to u16")),
        )
    }
}

/// Syntax node specialised to style sheets.
pub type SyntaxNode = rowan::SyntaxNode<CssLanguage>;
/// Syntax token specialised to style sheets.
pub type SyntaxToken = rowan::SyntaxToken<CssLanguage>;
/// Node or token specialised to style sheets.
pub type SyntaxElement = rowan::SyntaxElement<CssLanguage>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SyntaxKind::T_IDENT)]
    #[case(SyntaxKind::N_RULESET)]
    #[case(SyntaxKind::N_ERROR)]
    fn raw_round_trip(#[case] kind: SyntaxKind) {
        let raw = CssLanguage::kind_to_raw(kind);
        assert_eq!(CssLanguage::kind_from_raw(raw), kind);
    }

    #[rstest]
    fn out_of_range_raw_maps_to_error() {
        let raw = RowanSyntaxKind(u16::MAX);
        assert_eq!(CssLanguage::kind_from_raw(raw), SyntaxKind::N_ERROR);
    }

    #[rstest]
    fn token_and_node_partition() {
        assert!(SyntaxKind::T_EOF.is_token());
        assert!(!SyntaxKind::N_STYLESHEET.is_token());
        assert!(SyntaxKind::T_COMMENT.is_trivia());
        assert!(!SyntaxKind::T_IDENT.is_trivia());
    }
}
