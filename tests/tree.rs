//! Behavioural coverage for tree navigation, traversal and mutation.

mod test_util;

use cssls::{Dialect, SyntaxKind, ast, ast::AstNode, ast::TreeError};
use rstest::rstest;
use test_util::{find_node, offset_of, parse};

#[rstest]
fn adopted_nodes_have_exactly_one_parent() {
    let src = "a { b: c } d { }";
    let root = parse(src, Dialect::Css).syntax().clone_for_update();
    let blocks: Vec<_> = root
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::N_DECLARATIONS)
        .collect();
    let (Some(from), Some(to)) = (blocks.first(), blocks.last()) else {
        panic!("expected two blocks");
    };
    let decl = find_node(from, SyntaxKind::N_DECLARATION);
    let adopted = ast::adopt_child(to, &decl);
    assert_eq!(adopted.parent().as_ref(), Some(to));
    let holders = root
        .descendants()
        .filter(|n| n.children().any(|c| c == adopted))
        .count();
    assert_eq!(holders, 1);
    assert_eq!(from.children().count(), 0);
}

#[rstest]
fn adopting_into_an_immutable_tree_fails() {
    let parsed = parse("a { b: c }", Dialect::Css);
    let root = parsed.syntax();
    let decl = find_node(&root, SyntaxKind::N_DECLARATION);
    assert_eq!(
        ast::try_adopt_child(&root, &decl),
        Err(TreeError::Immutable)
    );
}

#[rstest]
fn adopting_an_ancestor_fails() {
    let root = parse("a { b: c }", Dialect::Css).syntax().clone_for_update();
    let decl = find_node(&root, SyntaxKind::N_DECLARATION);
    let Some(block) = decl.parent() else {
        panic!("declaration has no parent");
    };
    assert_eq!(ast::try_adopt_child(&decl, &block), Err(TreeError::Cycle));
    assert_eq!(ast::try_adopt_child(&decl, &decl), Err(TreeError::Cycle));
}

#[rstest]
#[case("width", SyntaxKind::N_PROPERTY)]
#[case("10px", SyntaxKind::N_NUMERIC_VALUE)]
#[case(".a", SyntaxKind::N_CLASS_SELECTOR)]
fn node_at_finds_the_innermost_node(#[case] needle: &str, #[case] kind: SyntaxKind) {
    let src = ".a { width: 10px }";
    let root = parse(src, Dialect::Css).syntax();
    assert_eq!(ast::node_at(&root, offset_of(src, needle) + 1).kind(), kind);
}

#[rstest]
fn node_path_runs_from_the_root() {
    let src = ".a { width: 10px }";
    let root = parse(src, Dialect::Css).syntax();
    let path = ast::node_path(&root, offset_of(src, "10px"));
    assert_eq!(path.first().map(|n| n.kind()), Some(SyntaxKind::N_STYLESHEET));
    assert_eq!(path.last(), Some(&ast::node_at(&root, offset_of(src, "10px"))));
    for pair in path.windows(2) {
        if let [parent, child] = pair {
            assert_eq!(child.parent().as_ref(), Some(parent));
        }
    }
}

#[rstest]
fn visitor_can_prune_subtrees() {
    struct CountDeclarations {
        seen: usize,
    }

    impl ast::Visitor for CountDeclarations {
        fn visit(&mut self, node: &cssls::SyntaxNode) -> bool {
            if node.kind() == SyntaxKind::N_DECLARATION {
                self.seen += 1;
            }
            node.kind() != SyntaxKind::N_MEDIA
        }
    }

    let parsed = parse("a { b: c } @media x { d { e: f } }", Dialect::Css);
    let mut visitor = CountDeclarations { seen: 0 };
    ast::accept(&parsed.syntax(), &mut visitor);
    assert_eq!(visitor.seen, 1);
}

#[rstest]
fn formatting_does_not_change_structure() {
    let compact = parse("a{b:c;d:1px}", Dialect::Css).syntax();
    let spaced = parse("a {\n  b: c;\n  d: 1px;\n}\n", Dialect::Css).syntax();
    assert_eq!(ast::kind_sequence(&compact), ast::kind_sequence(&spaced));
}

#[rstest]
fn numeric_values_split_into_value_and_unit() {
    let parsed = parse("a { margin: 1.5em 2px 50% 0 }", Dialect::Css);
    let parts: Vec<_> = ast::NumericValue::all(&parsed.syntax())
        .iter()
        .filter_map(ast::NumericValue::parts)
        .map(|p| (p.value, p.unit))
        .collect();
    assert_eq!(
        parts,
        vec![
            (1.5, Some("em".to_string())),
            (2.0, Some("px".to_string())),
            (50.0, Some("%".to_string())),
            (0.0, None),
        ]
    );
}

#[rstest]
fn typed_wrappers_round_trip_through_syntax() {
    let parsed = parse("a { color: red }", Dialect::Css);
    let Some(decl) = ast::Declaration::cast(find_node(&parsed.syntax(), SyntaxKind::N_DECLARATION))
    else {
        panic!("expected a declaration");
    };
    assert_eq!(decl.property().as_deref(), Some("color"));
    assert!(ast::Ruleset::cast(decl.syntax().clone()).is_none());
    assert!(ast::Declaration::can_cast(decl.syntax().kind()));
}
