//!
//! Light-weight AST wrappers built around `rowan` syntax nodes.
//!
//! The wrappers expose typed navigation over the CST produced by the parser
//! without copying it. Alongside them live the offset queries, the visitor
//! traversal and the tree mutation helpers used by editor tooling.

use rowan::NodeOrToken;

use crate::{SyntaxKind, SyntaxNode};

/// Common interface for AST wrappers.
pub trait AstNode: Sized {
    /// Whether nodes of `kind` can be wrapped by this type.
    fn can_cast(kind: SyntaxKind) -> bool;

    /// Wrap `node` if it has the right kind.
    fn cast(node: SyntaxNode) -> Option<Self>;

    /// Access the underlying syntax node.
    fn syntax(&self) -> &SyntaxNode;
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            pub(crate) syntax: $crate::SyntaxNode,
        }

        impl $crate::ast::AstNode for $name {
            fn can_cast(kind: $crate::SyntaxKind) -> bool {
                kind == $crate::SyntaxKind::$kind
            }

            fn cast(node: $crate::SyntaxNode) -> Option<Self> {
                Self::can_cast(node.kind()).then_some(Self { syntax: node })
            }

            fn syntax(&self) -> &$crate::SyntaxNode {
                &self.syntax
            }
        }
    };
}

/// First child node of `kind`.
fn child(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    node.children().find(|c| c.kind() == kind)
}

/// All child nodes that cast to `N`.
fn children<N: AstNode>(node: &SyntaxNode) -> Vec<N> {
    node.children().filter_map(N::cast).collect()
}

/// Source text of `node` without surrounding trivia.
fn trimmed(node: &SyntaxNode) -> String {
    node.text().to_string().trim().to_string()
}

/// Text of the first direct child token of `kind`.
fn token_text(node: &SyntaxNode, kind: SyntaxKind) -> Option<String> {
    node.children_with_tokens().find_map(|e| match e {
        NodeOrToken::Token(t) if t.kind() == kind => Some(t.text().to_string()),
        _ => None,
    })
}

mod mutate;
mod nodes;
mod numeric;
mod query;
mod visit;

pub use mutate::{TreeError, adopt_child, try_adopt_child};
pub use nodes::{
    CustomPropertyDeclaration, Declaration, Declarations, EachStatement, ForStatement, Forward,
    Function, FunctionDeclaration, FunctionParameter, Import, Keyframe, MixinDeclaration,
    MixinReference, Ruleset, Selector, Stylesheet, UnknownAtRule, Use, Variable,
    VariableDeclaration,
};
pub use numeric::{NumericParts, NumericValue, split_number};
pub use query::{node_at, node_path};
pub use visit::{Visitor, accept, kind_sequence, walk};
