//! Decomposing number, percentage and dimension lexemes.

use chumsky::prelude::*;

use super::AstNode;
use crate::{Span, SyntaxKind, SyntaxNode};

/// Value and unit of a numeric lexeme.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericParts {
    /// The number itself.
    pub value: f64,
    /// `%`, a dimension unit, or `None` for a bare number.
    pub unit: Option<String>,
}

/// Matches `[+-]? (digits ('.' digits)? | '.' digits) ([eE] [+-]? digits)?`
/// and yields the matched span.
fn number_prefix() -> impl Parser<char, Span, Error = Simple<char>> {
    let digits = || filter(char::is_ascii_digit).repeated().at_least(1);
    let mantissa = digits()
        .then(just('.').then(digits()).or_not())
        .ignored()
        .or(just('.').then(digits()).ignored());
    let exponent = one_of("eE")
        .then(one_of("+-").or_not())
        .then(digits())
        .ignored();
    one_of("+-")
        .or_not()
        .then(mantissa)
        .then(exponent.or_not())
        .map_with_span(|_, span: Span| span)
}

/// Split `text` into its numeric value and the unit that follows.
///
/// # Examples
///
/// ```
/// use cssls::ast::split_number;
///
/// assert_eq!(split_number("1.5em"), Some((1.5, "em")));
/// assert_eq!(split_number("-2"), Some((-2.0, "")));
/// assert_eq!(split_number("px"), None);
/// ```
#[must_use]
pub fn split_number(text: &str) -> Option<(f64, &str)> {
    let span = number_prefix().parse(text).ok()?;
    // The prefix is ASCII, so character and byte offsets agree.
    let number = text.get(span.clone())?;
    let unit = text.get(span.end..)?;
    let value = number.parse::<f64>().ok()?;
    Some((value, unit))
}

ast_node!(
    /// A number, percentage or dimension term.
    NumericValue,
    N_NUMERIC_VALUE
);

impl NumericValue {
    /// The raw lexeme.
    #[must_use]
    pub fn text(&self) -> String {
        self.syntax
            .first_token()
            .filter(|t| {
                matches!(
                    t.kind(),
                    SyntaxKind::T_NUMBER | SyntaxKind::T_PERCENTAGE | SyntaxKind::T_DIMENSION
                )
            })
            .map(|t| t.text().to_string())
            .unwrap_or_default()
    }

    /// Value and unit, or `None` when the lexeme is not a number.
    #[must_use]
    pub fn parts(&self) -> Option<NumericParts> {
        let text = self.text();
        let (value, unit) = split_number(&text)?;
        Some(NumericParts {
            value,
            unit: (!unit.is_empty()).then(|| unit.to_string()),
        })
    }

    /// Numeric values below `node`, in source order.
    #[must_use]
    pub fn all(node: &SyntaxNode) -> Vec<Self> {
        node.descendants().filter_map(Self::cast).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dialect, parse_expression};
    use rstest::rstest;

    #[rstest]
    #[case("12", Some((12.0, "")))]
    #[case(".5s", Some((0.5, "s")))]
    #[case("+1e3px", Some((1000.0, "px")))]
    #[case("1em", Some((1.0, "em")))]
    #[case("50%", Some((50.0, "%")))]
    #[case("-", None)]
    #[case("x1", None)]
    fn splits_lexemes(#[case] text: &str, #[case] expected: Option<(f64, &str)>) {
        assert_eq!(split_number(text), expected);
    }

    #[rstest]
    fn parts_of_an_expression() {
        let parsed = parse_expression("10px 50% 3", Dialect::Css);
        let Some(root) = parsed.node() else {
            panic!("expected an expression");
        };
        let parts: Vec<_> = NumericValue::all(&root)
            .iter()
            .filter_map(NumericValue::parts)
            .collect();
        assert_eq!(
            parts,
            vec![
                NumericParts {
                    value: 10.0,
                    unit: Some("px".to_string()),
                },
                NumericParts {
                    value: 50.0,
                    unit: Some("%".to_string()),
                },
                NumericParts {
                    value: 3.0,
                    unit: None,
                },
            ]
        );
    }
}
