//! Nested scopes and the symbols declared in them.
//!
//! [`build_scopes`] walks a parsed tree once and produces a [`GlobalScope`]:
//! an arena of scopes rooted at the scope spanning the whole document. Each
//! `{ ... }` block opens a child scope. Symbols are keyed by name and
//! [`ReferenceKind`]; every symbol of a scope is visible from anywhere inside
//! that scope and its descendants, regardless of where in the scope it was
//! declared.

use std::collections::BTreeMap;
use std::fmt;

use rowan::{TextRange, TextSize};

use crate::SyntaxNode;

mod builder;

pub use builder::build_scopes;

/// What a symbol names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReferenceKind {
    /// A selector that can be extended.
    Rule,
    /// `$x`, `@x` or `--x`.
    Variable,
    /// A SCSS `@mixin` or LESS mixin.
    Mixin,
    /// A SCSS `@function`.
    Function,
    /// An `@keyframes` animation.
    Keyframe,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rule => "rule",
            Self::Variable => "variable",
            Self::Mixin => "mixin",
            Self::Function => "function",
            Self::Keyframe => "keyframe",
        };
        f.write_str(name)
    }
}

/// A named declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    name: String,
    kind: ReferenceKind,
    node: SyntaxNode,
    value: Option<String>,
}

impl Symbol {
    pub(crate) fn new(
        name: String,
        kind: ReferenceKind,
        node: SyntaxNode,
        value: Option<String>,
    ) -> Self {
        Self {
            name,
            kind,
            node,
            value,
        }
    }

    /// Declared name, including any sigil (`$x`, `@x`, `.m`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// What the symbol names.
    #[must_use]
    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    /// The declaring node.
    #[must_use]
    pub fn node(&self) -> &SyntaxNode {
        &self.node
    }

    /// Source text of the assigned value or parameter default.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Index of a scope within its [`GlobalScope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// The document-wide root scope.
    pub const GLOBAL: Self = Self(0);
}

#[derive(Debug, Clone)]
struct ScopeData {
    range: TextRange,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    symbols: BTreeMap<(ReferenceKind, String), Symbol>,
}

impl ScopeData {
    fn new(range: TextRange, parent: Option<ScopeId>) -> Self {
        Self {
            range,
            parent,
            children: Vec::new(),
            symbols: BTreeMap::new(),
        }
    }
}

/// All scopes of one document.
#[derive(Debug, Clone)]
pub struct GlobalScope {
    scopes: Vec<ScopeData>,
}

impl GlobalScope {
    pub(crate) fn new(range: TextRange) -> Self {
        Self {
            scopes: vec![ScopeData::new(range, None)],
        }
    }

    /// Open a child scope of `parent` covering `range`.
    ///
    /// Children are opened in source order, so each parent's child list
    /// stays sorted by offset.
    pub(crate) fn push(&mut self, parent: ScopeId, range: TextRange) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(ScopeData::new(range, Some(parent)));
        if let Some(data) = self.scopes.get_mut(parent.0) {
            data.children.push(id);
        }
        id
    }

    /// Record `symbol` in `scope`, replacing an earlier symbol with the
    /// same name and kind.
    pub(crate) fn declare(&mut self, scope: ScopeId, symbol: Symbol) {
        if let Some(data) = self.scopes.get_mut(scope.0) {
            data.symbols
                .insert((symbol.kind, symbol.name.clone()), symbol);
        }
    }

    /// The root scope spanning the whole document.
    #[must_use]
    pub fn global(&self) -> Scope<'_> {
        self.scope(ScopeId::GLOBAL)
            .unwrap_or_else(|| unreachable!("the global scope is created first"))
    }

    /// Look up a scope by id.
    #[must_use]
    pub fn scope(&self, id: ScopeId) -> Option<Scope<'_>> {
        self.scopes.get(id.0).map(|data| Scope {
            tree: self,
            id,
            data,
        })
    }

    /// Number of scopes, the global one included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Always `false`; the global scope always exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Innermost scope containing `offset`.
    ///
    /// A scope contains the offsets from its start up to but excluding its
    /// end. Offsets outside every nested scope map to the global scope.
    #[must_use]
    pub fn scope_at(&self, offset: usize) -> Scope<'_> {
        let mut current = self.global();
        let Ok(offset) = TextSize::try_from(offset) else {
            return current;
        };
        while let Some(next) = current
            .children()
            .into_iter()
            .find(|child| child.range().contains(offset))
        {
            current = next;
        }
        current
    }

    /// Resolve `name` from the scope enclosing `offset`.
    #[must_use]
    pub fn resolve_at(&self, offset: usize, name: &str, kind: ReferenceKind) -> Option<&Symbol> {
        self.scope_at(offset).resolve(name, kind)
    }
}

/// A view of one scope inside a [`GlobalScope`].
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    tree: &'a GlobalScope,
    id: ScopeId,
    data: &'a ScopeData,
}

impl PartialEq for Scope<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Scope<'_> {}

impl<'a> Scope<'a> {
    /// This scope's id.
    #[must_use]
    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Source range covered by the scope.
    #[must_use]
    pub fn range(&self) -> TextRange {
        self.data.range
    }

    /// Start offset of the scope.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.data.range.start().into()
    }

    /// Length of the scope in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.range.len().into()
    }

    /// Whether the scope covers no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.range.is_empty()
    }

    /// Enclosing scope; `None` for the global scope.
    #[must_use]
    pub fn parent(&self) -> Option<Scope<'a>> {
        self.data.parent.and_then(|id| self.tree.scope(id))
    }

    /// Directly nested scopes, in source order.
    #[must_use]
    pub fn children(&self) -> Vec<Scope<'a>> {
        self.data
            .children
            .iter()
            .filter_map(|id| self.tree.scope(*id))
            .collect()
    }

    /// Symbol declared in this scope only.
    #[must_use]
    pub fn symbol(&self, name: &str, kind: ReferenceKind) -> Option<&'a Symbol> {
        self.data.symbols.get(&(kind, name.to_string()))
    }

    /// All symbols declared in this scope.
    #[must_use]
    pub fn symbols(&self) -> Vec<&'a Symbol> {
        self.data.symbols.values().collect()
    }

    /// Find `name` in this scope or the nearest enclosing scope that
    /// declares it.
    #[must_use]
    pub fn resolve(&self, name: &str, kind: ReferenceKind) -> Option<&'a Symbol> {
        let mut scope = Some(*self);
        while let Some(current) = scope {
            if let Some(symbol) = current.symbol(name, kind) {
                return Some(symbol);
            }
            scope = current.parent();
        }
        None
    }
}
