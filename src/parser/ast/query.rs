//! Offset queries mapping a cursor position to nodes.

use rowan::TextSize;

use crate::SyntaxNode;

/// Innermost node enclosing `offset`.
///
/// A node encloses the offsets from its start up to and including its end,
/// so a cursor placed directly after a node still finds it. When two
/// siblings touch at `offset` the later one wins. Offsets past the end of
/// the tree yield `root`.
///
/// # Examples
///
/// ```
/// use cssls::{Dialect, SyntaxKind, ast, parse};
///
/// let parsed = parse("a { color: red }", Dialect::Css);
/// let node = ast::node_at(&parsed.syntax(), 12);
/// assert_eq!(node.kind(), SyntaxKind::N_IDENTIFIER);
/// ```
#[must_use]
pub fn node_at(root: &SyntaxNode, offset: usize) -> SyntaxNode {
    node_path(root, offset)
        .pop()
        .unwrap_or_else(|| root.clone())
}

/// Nodes enclosing `offset` from `root` down to the innermost one.
#[must_use]
pub fn node_path(root: &SyntaxNode, offset: usize) -> Vec<SyntaxNode> {
    let mut path = vec![root.clone()];
    let Ok(offset) = TextSize::try_from(offset) else {
        return path;
    };
    let mut current = root.clone();
    while let Some(next) = current
        .children()
        .filter(|child| {
            let range = child.text_range();
            range.start() <= offset && offset <= range.end()
        })
        .last()
    {
        path.push(next.clone());
        current = next;
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dialect, SyntaxKind, parse};
    use rstest::rstest;

    #[rstest]
    #[case(0, SyntaxKind::N_ELEMENT_NAME)]
    #[case(4, SyntaxKind::N_PROPERTY)]
    #[case(11, SyntaxKind::N_IDENTIFIER)]
    #[case(16, SyntaxKind::N_DECLARATIONS)]
    fn innermost_node(#[case] offset: usize, #[case] kind: SyntaxKind) {
        let parsed = parse("a { color: red }", Dialect::Css);
        assert_eq!(node_at(&parsed.syntax(), offset).kind(), kind);
    }

    #[rstest]
    fn path_starts_at_root() {
        let parsed = parse("a { color: red }", Dialect::Css);
        let kinds: Vec<_> = node_path(&parsed.syntax(), 4)
            .iter()
            .map(SyntaxNode::kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::N_STYLESHEET,
                SyntaxKind::N_RULESET,
                SyntaxKind::N_DECLARATIONS,
                SyntaxKind::N_DECLARATION,
                SyntaxKind::N_PROPERTY,
            ]
        );
    }

    #[rstest]
    fn offsets_past_the_end_yield_root() {
        let parsed = parse("a {}", Dialect::Css);
        assert_eq!(node_at(&parsed.syntax(), 99).kind(), SyntaxKind::N_STYLESHEET);
    }
}
