//! Reparenting nodes in mutable trees.
//!
//! Parsed trees are immutable; call [`SyntaxNode::clone_for_update`] to get
//! a mutable copy before adopting nodes.

use thiserror::Error;

use crate::{SyntaxElement, SyntaxNode};

/// Misuse of the tree mutation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The parent or child belongs to an immutable tree.
    #[error("node belongs to an immutable tree; use clone_for_update")]
    Immutable,
    /// The child is the parent itself or one of its ancestors.
    #[error("cannot adopt a node into its own subtree")]
    Cycle,
}

/// Detach `child` from its current parent and append it to `parent`.
///
/// Returns the adopted node.
///
/// # Errors
///
/// Returns [`TreeError::Immutable`] when either node is not mutable and
/// [`TreeError::Cycle`] when `parent` lies inside `child`.
pub fn try_adopt_child(parent: &SyntaxNode, child: &SyntaxNode) -> Result<SyntaxNode, TreeError> {
    if !parent.is_mutable() || !child.is_mutable() {
        return Err(TreeError::Immutable);
    }
    if parent.ancestors().any(|ancestor| &ancestor == child) {
        return Err(TreeError::Cycle);
    }
    child.detach();
    let end = parent.children_with_tokens().count();
    parent.splice_children(end..end, vec![SyntaxElement::Node(child.clone())]);
    Ok(child.clone())
}

/// [`try_adopt_child`] for callers that treat misuse as a bug.
///
/// # Panics
///
/// Panics when [`try_adopt_child`] would return an error.
///
/// # Examples
///
/// ```
/// use cssls::{Dialect, SyntaxKind, ast, parse};
///
/// let root = parse("a { b: c } d { }", Dialect::Css)
///     .syntax()
///     .clone_for_update();
/// let blocks: Vec<_> = root
///     .descendants()
///     .filter(|n| n.kind() == SyntaxKind::N_DECLARATIONS)
///     .collect();
/// let (Some(from), Some(to)) = (blocks.first(), blocks.last()) else {
///     unreachable!()
/// };
/// let Some(decl) = from.children().next() else {
///     unreachable!()
/// };
/// ast::adopt_child(to, &decl);
/// assert_eq!(to.children().count(), 1);
/// assert_eq!(from.children().count(), 0);
/// ```
pub fn adopt_child(parent: &SyntaxNode, child: &SyntaxNode) -> SyntaxNode {
    try_adopt_child(parent, child).unwrap_or_else(|err| panic!("adopt_child: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dialect, SyntaxKind, parse};
    use rstest::{fixture, rstest};

    #[fixture]
    fn tree() -> SyntaxNode {
        parse("a { b: c; d: e } f { }", Dialect::Css)
            .syntax()
            .clone_for_update()
    }

    fn blocks(root: &SyntaxNode) -> Vec<SyntaxNode> {
        root.descendants()
            .filter(|n| n.kind() == SyntaxKind::N_DECLARATIONS)
            .collect()
    }

    #[rstest]
    fn adoption_moves_the_child(tree: SyntaxNode) {
        let blocks = blocks(&tree);
        let (Some(old), Some(new)) = (blocks.first(), blocks.get(1)) else {
            panic!("expected two blocks");
        };
        let Some(decl) = old.children().next() else {
            panic!("expected a declaration");
        };
        let adopted = adopt_child(new, &decl);
        assert_eq!(adopted.parent().as_ref(), Some(new));
        assert_eq!(old.children().count(), 1);
        assert_eq!(new.children().filter(|c| c == &decl).count(), 1);
        assert_eq!(tree.text().to_string(), "a { ; d: e } f { }b: c");
    }

    #[rstest]
    fn immutable_trees_are_rejected() {
        let root = parse("a { b: c }", Dialect::Css).syntax();
        let Some(ruleset) = root.children().next() else {
            panic!("expected a ruleset");
        };
        assert_eq!(try_adopt_child(&root, &ruleset), Err(TreeError::Immutable));
    }

    #[rstest]
    fn adopting_an_ancestor_is_rejected(tree: SyntaxNode) {
        let Some(ruleset) = tree.children().next() else {
            panic!("expected a ruleset");
        };
        let Some(block) = blocks(&tree).into_iter().next() else {
            panic!("expected a block");
        };
        assert_eq!(try_adopt_child(&block, &ruleset), Err(TreeError::Cycle));
        assert_eq!(try_adopt_child(&block, &block), Err(TreeError::Cycle));
    }

    #[rstest]
    #[should_panic(expected = "own subtree")]
    fn adopt_child_panics_on_misuse(tree: SyntaxNode) {
        adopt_child(&tree, &tree);
    }
}
