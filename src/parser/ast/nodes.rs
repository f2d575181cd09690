//! Typed wrappers for the node kinds consumers navigate most.

use super::{AstNode, child, children, token_text, trimmed};
use crate::data::DataView;
use crate::{SyntaxKind, SyntaxNode};

ast_node!(
    /// Root node of a parsed style sheet.
    Stylesheet,
    N_STYLESHEET
);
ast_node!(
    /// `selectors { declarations }`
    Ruleset,
    N_RULESET
);
ast_node!(
    /// One complex selector of a selector list.
    Selector,
    N_SELECTOR
);
ast_node!(
    /// A `{ ... }` block; the unit of lexical scoping.
    Declarations,
    N_DECLARATIONS
);
ast_node!(
    /// `property: value !important`
    Declaration,
    N_DECLARATION
);
ast_node!(
    /// `--name: value`
    CustomPropertyDeclaration,
    N_CUSTOM_PROPERTY_DECLARATION
);
ast_node!(
    /// `$name: value` in SCSS or `@name: value` in LESS.
    VariableDeclaration,
    N_VARIABLE_DECLARATION
);
ast_node!(
    /// A variable reference or declared name.
    Variable,
    N_VARIABLE
);
ast_node!(
    /// `@mixin name(...) { }` in SCSS or `.name(...) { }` in LESS.
    MixinDeclaration,
    N_MIXIN_DECLARATION
);
ast_node!(
    /// `@include name(...)` in SCSS or `.name();` in LESS.
    MixinReference,
    N_MIXIN_REFERENCE
);
ast_node!(
    /// `@function name(...) { }`
    FunctionDeclaration,
    N_FUNCTION_DECLARATION
);
ast_node!(
    /// A parameter of a mixin or function declaration.
    FunctionParameter,
    N_FUNCTION_PARAMETER
);
ast_node!(
    /// `name(arguments)` in a value.
    Function,
    N_FUNCTION
);
ast_node!(
    /// `@keyframes name { }`
    Keyframe,
    N_KEYFRAME
);
ast_node!(
    /// `@for $i from a through b { }`
    ForStatement,
    N_FOR_STATEMENT
);
ast_node!(
    /// `@each $a, $b in list { }`
    EachStatement,
    N_EACH_STATEMENT
);
ast_node!(
    /// An at-rule with no dedicated grammar.
    UnknownAtRule,
    N_UNKNOWN_AT_RULE
);
ast_node!(
    /// `@import ...`
    Import,
    N_IMPORT
);
ast_node!(
    /// `@use "url" as name`
    Use,
    N_USE
);
ast_node!(
    /// `@forward "url"`
    Forward,
    N_FORWARD
);

impl Stylesheet {
    /// Top-level statements, skipping error markers.
    #[must_use]
    pub fn statements(&self) -> Vec<SyntaxNode> {
        self.syntax
            .children()
            .filter(|n| n.kind() != SyntaxKind::N_ERROR)
            .collect()
    }

    /// Top-level rulesets.
    #[must_use]
    pub fn rulesets(&self) -> Vec<Ruleset> {
        children(&self.syntax)
    }

    /// Unknown at-rules anywhere in the sheet whose name `data` does not
    /// recognise.
    #[must_use]
    pub fn unknown_at_rules(&self, data: &DataView) -> Vec<UnknownAtRule> {
        self.syntax
            .descendants()
            .filter_map(UnknownAtRule::cast)
            .filter(|rule| !data.is_known_at_rule(&rule.name()))
            .collect()
    }
}

impl Ruleset {
    /// Selectors of the rule, in source order.
    #[must_use]
    pub fn selectors(&self) -> Vec<Selector> {
        child(&self.syntax, SyntaxKind::N_SELECTORS)
            .map(|list| children(&list))
            .unwrap_or_default()
    }

    /// The rule body, absent when `{` is missing.
    #[must_use]
    pub fn declarations(&self) -> Option<Declarations> {
        child(&self.syntax, SyntaxKind::N_DECLARATIONS).and_then(Declarations::cast)
    }
}

impl Selector {
    /// Selector text without surrounding whitespace.
    #[must_use]
    pub fn text(&self) -> String {
        trimmed(&self.syntax)
    }
}

impl Declarations {
    /// Plain declarations directly inside the block.
    #[must_use]
    pub fn declarations(&self) -> Vec<Declaration> {
        children(&self.syntax)
    }

    /// Statements directly inside the block, skipping error markers.
    #[must_use]
    pub fn items(&self) -> Vec<SyntaxNode> {
        self.syntax
            .children()
            .filter(|n| n.kind() != SyntaxKind::N_ERROR)
            .collect()
    }
}

impl Declaration {
    /// Property name as written, including hacks such as a leading `*`.
    #[must_use]
    pub fn property(&self) -> Option<String> {
        child(&self.syntax, SyntaxKind::N_PROPERTY).map(|n| trimmed(&n))
    }

    /// The value expression, absent when the colon or value is missing.
    #[must_use]
    pub fn value(&self) -> Option<SyntaxNode> {
        child(&self.syntax, SyntaxKind::N_EXPRESSION)
    }

    /// Whether the declaration ends with `!important`.
    #[must_use]
    pub fn is_important(&self) -> bool {
        child(&self.syntax, SyntaxKind::N_PRIO).is_some()
    }

    /// Whether `data` knows the property, ignoring browser hacks and
    /// vendor prefixes.
    #[must_use]
    pub fn is_known_property(&self, data: &DataView) -> bool {
        self.property().is_some_and(|name| {
            data.is_known_property(name.trim_start_matches(['*', '_']))
        })
    }
}

impl CustomPropertyDeclaration {
    /// The `--name` being declared.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        child(&self.syntax, SyntaxKind::N_PROPERTY).map(|n| trimmed(&n))
    }

    /// The value, structured or opaque.
    #[must_use]
    pub fn value(&self) -> Option<SyntaxNode> {
        child(&self.syntax, SyntaxKind::N_EXPRESSION)
            .or_else(|| child(&self.syntax, SyntaxKind::N_CUSTOM_PROPERTY_VALUE))
    }
}

impl VariableDeclaration {
    /// Declared name including its sigil.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        child(&self.syntax, SyntaxKind::N_VARIABLE).map(|n| trimmed(&n))
    }

    /// The assigned expression or LESS detached ruleset.
    #[must_use]
    pub fn value(&self) -> Option<SyntaxNode> {
        child(&self.syntax, SyntaxKind::N_EXPRESSION)
            .or_else(|| child(&self.syntax, SyntaxKind::N_DETACHED_RULESET))
    }

    /// Flag names such as `default` and `global`, without `!`.
    #[must_use]
    pub fn flags(&self) -> Vec<String> {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::N_VARIABLE_FLAG)
            .map(|n| trimmed(&n).trim_start_matches('!').trim().to_string())
            .collect()
    }
}

impl Variable {
    /// Name including its sigil.
    #[must_use]
    pub fn name(&self) -> String {
        trimmed(&self.syntax)
    }
}

impl MixinDeclaration {
    /// Declared name; LESS names keep their leading `.` or `#`.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        child(&self.syntax, SyntaxKind::N_IDENTIFIER).map(|n| trimmed(&n))
    }

    /// Declared parameters.
    #[must_use]
    pub fn parameters(&self) -> Vec<FunctionParameter> {
        parameters(&self.syntax)
    }
}

impl MixinReference {
    /// The referenced mixin name; the last segment of a LESS path.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::N_IDENTIFIER)
            .last()
            .map(|n| trimmed(&n))
    }
}

impl FunctionDeclaration {
    /// Declared function name.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        child(&self.syntax, SyntaxKind::N_IDENTIFIER).map(|n| trimmed(&n))
    }

    /// Declared parameters.
    #[must_use]
    pub fn parameters(&self) -> Vec<FunctionParameter> {
        parameters(&self.syntax)
    }
}

fn parameters(node: &SyntaxNode) -> Vec<FunctionParameter> {
    child(node, SyntaxKind::N_PARAMETER_LIST)
        .map(|list| children(&list))
        .unwrap_or_default()
}

impl FunctionParameter {
    /// Parameter name including its sigil; absent for LESS pattern values.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        child(&self.syntax, SyntaxKind::N_VARIABLE).map(|n| trimmed(&n))
    }

    /// Default value expression.
    #[must_use]
    pub fn default(&self) -> Option<SyntaxNode> {
        child(&self.syntax, SyntaxKind::N_EXPRESSION)
    }

    /// Whether the parameter collects remaining arguments with `...`.
    #[must_use]
    pub fn is_rest(&self) -> bool {
        token_text(&self.syntax, SyntaxKind::T_ELLIPSIS).is_some()
    }
}

impl Function {
    /// Function name as written.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        child(&self.syntax, SyntaxKind::N_IDENTIFIER).map(|n| trimmed(&n))
    }

    /// Argument nodes in order.
    #[must_use]
    pub fn arguments(&self) -> Vec<SyntaxNode> {
        child(&self.syntax, SyntaxKind::N_ARGUMENT_LIST)
            .map(|list| {
                list.children()
                    .filter(|n| n.kind() == SyntaxKind::N_FUNCTION_ARGUMENT)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Keyframe {
    /// Animation name, unquoted when given as a string.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.syntax
            .children()
            .find(|n| {
                matches!(
                    n.kind(),
                    SyntaxKind::N_IDENTIFIER | SyntaxKind::N_STRING_LITERAL
                )
            })
            .map(|n| trimmed(&n).trim_matches(['"', '\'']).to_string())
    }
}

impl ForStatement {
    /// The loop variable.
    #[must_use]
    pub fn variable(&self) -> Option<Variable> {
        child(&self.syntax, SyntaxKind::N_VARIABLE).and_then(Variable::cast)
    }
}

impl EachStatement {
    /// The loop variables.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        child(&self.syntax, SyntaxKind::N_VARIABLE_LIST)
            .map(|list| children(&list))
            .unwrap_or_default()
    }
}

impl UnknownAtRule {
    /// The at-keyword including `@`.
    #[must_use]
    pub fn name(&self) -> String {
        token_text(&self.syntax, SyntaxKind::T_AT_KEYWORD).unwrap_or_default()
    }

    /// Prelude text between the name and the block or `;`.
    #[must_use]
    pub fn prelude(&self) -> String {
        child(&self.syntax, SyntaxKind::N_AT_RULE_PRELUDE)
            .map(|n| trimmed(&n))
            .unwrap_or_default()
    }
}

/// Text of the first string or URL term below `node`, unquoted.
fn module_url(node: &SyntaxNode) -> Option<String> {
    node.descendants_with_tokens()
        .filter_map(rowan::NodeOrToken::into_token)
        .find(|t| matches!(t.kind(), SyntaxKind::T_STRING | SyntaxKind::T_URL))
        .map(|t| unquote(t.text()))
}

fn unquote(text: &str) -> String {
    let text = text
        .strip_prefix("url(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(text)
        .trim();
    text.trim_matches(['"', '\'']).to_string()
}

impl Import {
    /// Imported URLs in order.
    #[must_use]
    pub fn urls(&self) -> Vec<String> {
        self.syntax
            .children()
            .filter(|n| {
                matches!(
                    n.kind(),
                    SyntaxKind::N_STRING_LITERAL | SyntaxKind::N_URI_LITERAL | SyntaxKind::N_TERM
                )
            })
            .filter_map(|n| module_url(&n).or_else(|| Some(unquote(&trimmed(&n)))))
            .collect()
    }
}

impl Use {
    /// The module URL.
    #[must_use]
    pub fn url(&self) -> Option<String> {
        module_url(&self.syntax)
    }

    /// The namespace given with `as`, or `*`.
    #[must_use]
    pub fn namespace(&self) -> Option<String> {
        if token_text(&self.syntax, SyntaxKind::T_STAR).is_some() {
            return Some("*".to_string());
        }
        child(&self.syntax, SyntaxKind::N_IDENTIFIER).map(|n| trimmed(&n))
    }
}

impl Forward {
    /// The module URL.
    #[must_use]
    pub fn url(&self) -> Option<String> {
        module_url(&self.syntax)
    }

    /// Members listed after `show` or `hide`.
    #[must_use]
    pub fn members(&self) -> Vec<String> {
        child(&self.syntax, SyntaxKind::N_FORWARD_VISIBILITY)
            .map(|list| list.children().map(|n| trimmed(&n)).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dialect, parse};
    use rstest::rstest;

    fn first<N: AstNode>(src: &str, dialect: Dialect) -> N {
        parse(src, dialect)
            .syntax()
            .descendants()
            .find_map(N::cast)
            .unwrap_or_else(|| panic!("no matching node in {src}"))
    }

    #[rstest]
    fn ruleset_accessors() {
        let rule: Ruleset = first("a > b, .c { color: red !important; margin: 0 }", Dialect::Css);
        let selectors: Vec<_> = rule.selectors().iter().map(Selector::text).collect();
        assert_eq!(selectors, vec!["a > b", ".c"]);
        let decls = rule
            .declarations()
            .map(|d| d.declarations())
            .unwrap_or_default();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls.first().and_then(Declaration::property).as_deref(), Some("color"));
        assert!(decls.first().is_some_and(Declaration::is_important));
        assert!(!decls.get(1).is_some_and(Declaration::is_important));
    }

    #[rstest]
    #[case("a { color: red }", true)]
    #[case("a { -webkit-box-shadow: none }", true)]
    #[case("a { *zoom: 1 }", true)]
    #[case("a { colr: red }", false)]
    fn known_properties(#[case] src: &str, #[case] known: bool) {
        let decl: Declaration = first(src, Dialect::Css);
        assert_eq!(decl.is_known_property(&DataView::builtin()), known);
    }

    #[rstest]
    fn scss_variable_flags() {
        let decl: VariableDeclaration = first("$x: 1px !default !global;", Dialect::Scss);
        assert_eq!(decl.name().as_deref(), Some("$x"));
        assert_eq!(decl.flags(), vec!["default", "global"]);
        assert!(decl.value().is_some());
    }

    #[rstest]
    fn mixin_parameters() {
        let mixin: MixinDeclaration = first("@mixin m($a, $b: 2px, $rest...) { }", Dialect::Scss);
        assert_eq!(mixin.name().as_deref(), Some("m"));
        let params = mixin.parameters();
        let names: Vec<_> = params.iter().filter_map(FunctionParameter::name).collect();
        assert_eq!(names, vec!["$a", "$b", "$rest"]);
        assert!(params.get(1).and_then(FunctionParameter::default).is_some());
        assert!(params.get(2).is_some_and(FunctionParameter::is_rest));
    }

    #[rstest]
    fn function_arguments() {
        let func: Function = first("a { width: calc(1px, 2px) }", Dialect::Css);
        assert_eq!(func.name().as_deref(), Some("calc"));
        assert_eq!(func.arguments().len(), 2);
    }

    #[rstest]
    fn keyframe_names_are_unquoted() {
        let frames: Keyframe = first("@keyframes \"spin\" { from { top: 0 } }", Dialect::Css);
        assert_eq!(frames.name().as_deref(), Some("spin"));
    }

    #[rstest]
    fn unknown_at_rules_filtered_by_data() {
        let parsed = parse("@foo bar baz; @media screen { }", Dialect::Css);
        let unknown = parsed.root().unknown_at_rules(&DataView::builtin());
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown.first().map(UnknownAtRule::name).as_deref(), Some("@foo"));
        assert_eq!(unknown.first().map(UnknownAtRule::prelude).as_deref(), Some("bar baz"));
    }

    #[rstest]
    fn use_namespace() {
        let rule: Use = first("@use \"sass:math\" as m;", Dialect::Scss);
        assert_eq!(rule.url().as_deref(), Some("sass:math"));
        assert_eq!(rule.namespace().as_deref(), Some("m"));
    }

    #[rstest]
    fn loop_variables() {
        let each: EachStatement = first("@each $k, $v in $map { }", Dialect::Scss);
        let names: Vec<_> = each.variables().iter().map(Variable::name).collect();
        assert_eq!(names, vec!["$k", "$v"]);
        let each: ForStatement = first("@for $i from 1 through 3 { }", Dialect::Scss);
        assert_eq!(each.variable().map(|v| v.name()).as_deref(), Some("$i"));
    }
}
