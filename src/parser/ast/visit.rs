//! Pre-order traversal with subtree pruning.

use rowan::WalkEvent;

use crate::{SyntaxKind, SyntaxNode};

/// Callback invoked for every node entered during [`accept`].
///
/// Returning `false` prunes the subtree below the visited node.
pub trait Visitor {
    /// Visit `node`; return whether to descend into its children.
    fn visit(&mut self, node: &SyntaxNode) -> bool;
}

impl<F> Visitor for F
where
    F: FnMut(&SyntaxNode) -> bool,
{
    fn visit(&mut self, node: &SyntaxNode) -> bool {
        self(node)
    }
}

/// Visit `node` and its descendants in pre-order.
pub fn accept<V: Visitor + ?Sized>(node: &SyntaxNode, visitor: &mut V) {
    let mut events = node.preorder();
    while let Some(event) = events.next() {
        if let WalkEvent::Enter(entered) = event {
            if !visitor.visit(&entered) {
                events.skip_subtree();
            }
        }
    }
}

/// [`accept`] with a closure.
///
/// # Examples
///
/// ```
/// use cssls::{Dialect, SyntaxKind, ast, parse};
///
/// let parsed = parse("a { b { c: d } }", Dialect::Css);
/// let mut rulesets = 0;
/// ast::walk(&parsed.syntax(), |node| {
///     if node.kind() == SyntaxKind::N_RULESET {
///         rulesets += 1;
///         return false;
///     }
///     true
/// });
/// assert_eq!(rulesets, 1);
/// ```
pub fn walk(node: &SyntaxNode, mut f: impl FnMut(&SyntaxNode) -> bool) {
    accept(node, &mut f);
}

/// Node kinds in pre-order, starting with `node` itself.
///
/// Two trees with the same kind sequence are considered structurally
/// equivalent in tests.
#[must_use]
pub fn kind_sequence(node: &SyntaxNode) -> Vec<SyntaxKind> {
    let mut kinds = Vec::new();
    walk(node, |n| {
        kinds.push(n.kind());
        true
    });
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dialect, parse};
    use rstest::rstest;

    struct Counter {
        declarations: usize,
    }

    impl Visitor for Counter {
        fn visit(&mut self, node: &SyntaxNode) -> bool {
            if node.kind() == SyntaxKind::N_DECLARATION {
                self.declarations += 1;
            }
            node.kind() != SyntaxKind::N_MEDIA
        }
    }

    #[rstest]
    fn pruned_subtrees_are_not_visited() {
        let parsed = parse(
            "a { b: c } @media print { a { b: c; d: e } }",
            Dialect::Css,
        );
        let mut counter = Counter { declarations: 0 };
        accept(&parsed.syntax(), &mut counter);
        assert_eq!(counter.declarations, 1);
    }

    #[rstest]
    fn kind_sequence_starts_with_self() {
        let parsed = parse("a {}", Dialect::Css);
        let kinds = kind_sequence(&parsed.syntax());
        assert_eq!(kinds.first(), Some(&SyntaxKind::N_STYLESHEET));
        assert_eq!(kinds.get(1), Some(&SyntaxKind::N_RULESET));
    }

    #[rstest]
    fn equal_sources_have_equal_sequences() {
        let a = parse("a{color:red}", Dialect::Css);
        let b = parse("a {\n  color : red ;\n}", Dialect::Css);
        assert_eq!(kind_sequence(&a.syntax()), kind_sequence(&b.syntax()));
    }
}
