//! Library crate for cssls.
//!
//! An error-tolerant parser for CSS, SCSS and LESS producing a lossless
//! `rowan` syntax tree, plus a scope builder that turns the tree into a
//! nested symbol table for editor tooling.

#![forbid(unsafe_code)]

pub mod data;
pub mod dialect;
pub mod language;
pub mod parser;
pub mod scanner;
pub mod scope;

// Only expose test utilities to tests and opt-in consumers.
#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_util;

pub use data::{CustomData, DataView};
pub use dialect::{Dialect, UnknownDialect};
pub use language::{CssLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
pub use parser::{
    ErrorCode, ParseError, Parsed, ParsedFragment, ast, parse, parse_at_rule, parse_declaration,
    parse_expression, parse_ruleset, parse_selector,
};
pub use scanner::{ScannedToken, Scanner, Span, tokenize_with_trivia, tokenize_without_trivia};
pub use scope::{GlobalScope, ReferenceKind, Scope, ScopeId, Symbol, build_scopes};
