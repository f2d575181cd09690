//! Building the scope tree from a parsed style sheet.

use log::{debug, trace};
use rowan::WalkEvent;

use super::{GlobalScope, ReferenceKind, ScopeId, Symbol};
use crate::ast::{
    AstNode, CustomPropertyDeclaration, EachStatement, ForStatement, FunctionDeclaration,
    FunctionParameter, Keyframe, MixinDeclaration, Ruleset, VariableDeclaration,
};
use crate::{SyntaxKind, SyntaxNode};

/// Build the scopes and symbols of the tree rooted at `root`.
///
/// Every `N_DECLARATIONS` block opens a scope. Declarations add symbols to
/// the scope that encloses them; parameters and loop variables are added to
/// the body they govern. Custom properties declared at the top level or in
/// a `:root` rule, and SCSS variables flagged `!global`, go to the global
/// scope.
///
/// # Examples
///
/// ```
/// use cssls::{Dialect, ReferenceKind, build_scopes, parse};
///
/// let src = "$w: 1px; .a { $h: 2px; height: $h + $w }";
/// let scopes = build_scopes(&parse(src, Dialect::Scss).syntax());
/// let inside = src.find("height").unwrap_or_default();
/// assert!(scopes.resolve_at(inside, "$h", ReferenceKind::Variable).is_some());
/// assert!(scopes.resolve_at(inside, "$w", ReferenceKind::Variable).is_some());
/// assert!(scopes.resolve_at(0, "$h", ReferenceKind::Variable).is_none());
/// ```
#[must_use]
pub fn build_scopes(root: &SyntaxNode) -> GlobalScope {
    let mut builder = Builder {
        tree: GlobalScope::new(root.text_range()),
        stack: vec![ScopeId::GLOBAL],
    };
    for event in root.preorder() {
        match event {
            WalkEvent::Enter(node) => builder.enter(&node),
            WalkEvent::Leave(node) => {
                if node.kind() == SyntaxKind::N_DECLARATIONS {
                    builder.stack.pop();
                }
            }
        }
    }
    debug!("built {} scopes", builder.tree.len());
    builder.tree
}

struct Builder {
    tree: GlobalScope,
    stack: Vec<ScopeId>,
}

impl Builder {
    fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId::GLOBAL)
    }

    fn declare(
        &mut self,
        scope: ScopeId,
        name: String,
        kind: ReferenceKind,
        node: &SyntaxNode,
        value: Option<String>,
    ) {
        if name.is_empty() {
            return;
        }
        trace!("declare {kind} {name} in scope {scope:?}");
        self.tree
            .declare(scope, Symbol::new(name, kind, node.clone(), value));
    }

    fn enter(&mut self, node: &SyntaxNode) {
        let scope = self.current();
        match node.kind() {
            SyntaxKind::N_DECLARATIONS => self.open_block(node),
            SyntaxKind::N_RULESET => {
                if let Some(rule) = Ruleset::cast(node.clone()) {
                    self.rule_symbols(scope, &rule);
                }
            }
            SyntaxKind::N_VARIABLE_DECLARATION => {
                if let Some(decl) = VariableDeclaration::cast(node.clone()) {
                    let target = if decl.flags().iter().any(|f| f == "global") {
                        ScopeId::GLOBAL
                    } else {
                        scope
                    };
                    let value = decl.value().map(|v| text(&v));
                    self.declare(
                        target,
                        decl.name().unwrap_or_default(),
                        ReferenceKind::Variable,
                        node,
                        value,
                    );
                }
            }
            SyntaxKind::N_CUSTOM_PROPERTY_DECLARATION => {
                if let Some(decl) = CustomPropertyDeclaration::cast(node.clone()) {
                    let target = if is_root_level(node) {
                        ScopeId::GLOBAL
                    } else {
                        scope
                    };
                    let value = decl.value().map(|v| text(&v));
                    self.declare(
                        target,
                        decl.name().unwrap_or_default(),
                        ReferenceKind::Variable,
                        node,
                        value,
                    );
                }
            }
            SyntaxKind::N_MIXIN_DECLARATION => {
                if let Some(mixin) = MixinDeclaration::cast(node.clone()) {
                    let name = mixin.name().unwrap_or_default();
                    self.declare(scope, name, ReferenceKind::Mixin, node, None);
                }
            }
            SyntaxKind::N_FUNCTION_DECLARATION => {
                if let Some(function) = FunctionDeclaration::cast(node.clone()) {
                    let name = function.name().unwrap_or_default();
                    self.declare(scope, name, ReferenceKind::Function, node, None);
                }
            }
            SyntaxKind::N_KEYFRAME => {
                if let Some(keyframe) = Keyframe::cast(node.clone()) {
                    let name = keyframe.name().unwrap_or_default();
                    self.declare(scope, name, ReferenceKind::Keyframe, node, None);
                }
            }
            _ => {}
        }
    }

    /// Push a scope for `block` and declare the names its owner binds.
    fn open_block(&mut self, block: &SyntaxNode) {
        let scope = self.tree.push(self.current(), block.text_range());
        self.stack.push(scope);
        let Some(owner) = block.parent() else {
            return;
        };
        match owner.kind() {
            SyntaxKind::N_MIXIN_DECLARATION
            | SyntaxKind::N_FUNCTION_DECLARATION
            | SyntaxKind::N_MIXIN_CONTENT_DECLARATION => {
                let params = owner
                    .children()
                    .filter(|n| n.kind() == SyntaxKind::N_PARAMETER_LIST)
                    .flat_map(|list| list.children().filter_map(FunctionParameter::cast));
                for param in params {
                    let value = param.default().map(|v| text(&v));
                    let name = param.name().unwrap_or_default();
                    self.declare(scope, name, ReferenceKind::Variable, param.syntax(), value);
                }
            }
            SyntaxKind::N_FOR_STATEMENT => {
                if let Some(var) = ForStatement::cast(owner).and_then(|f| f.variable()) {
                    self.declare(scope, var.name(), ReferenceKind::Variable, var.syntax(), None);
                }
            }
            SyntaxKind::N_EACH_STATEMENT => {
                let vars = EachStatement::cast(owner)
                    .map(|each| each.variables())
                    .unwrap_or_default();
                for var in vars {
                    self.declare(scope, var.name(), ReferenceKind::Variable, var.syntax(), None);
                }
            }
            _ => {}
        }
    }

    /// Record each selector made of exactly one simple selector.
    fn rule_symbols(&mut self, scope: ScopeId, rule: &Ruleset) {
        for selector in rule.selectors() {
            let mut parts = selector.syntax().children();
            let (Some(only), None) = (parts.next(), parts.next()) else {
                continue;
            };
            if only.kind() == SyntaxKind::N_SIMPLE_SELECTOR {
                self.declare(scope, selector.text(), ReferenceKind::Rule, &only, None);
            }
        }
    }
}

fn text(node: &SyntaxNode) -> String {
    node.text().to_string().trim().to_string()
}

/// Whether a custom property declared at `node` is global: at the top
/// level or directly inside a `:root` rule.
fn is_root_level(node: &SyntaxNode) -> bool {
    let Some(parent) = node.parent() else {
        return true;
    };
    match parent.kind() {
        SyntaxKind::N_STYLESHEET => true,
        SyntaxKind::N_DECLARATIONS => parent
            .parent()
            .and_then(Ruleset::cast)
            .is_some_and(|rule| {
                let selectors = rule.selectors();
                !selectors.is_empty() && selectors.iter().all(|s| s.text() == ":root")
            }),
        _ => false,
    }
}
