//! Syntax kind classification for the TypeScript grammar.
//!
//! tree-sitter identifies node kinds by integer id. The converter dispatches on
//! the closed [`SyntaxKind`] enum instead; the id → kind mapping is built once
//! per process from the grammar's own kind names, so aliased symbols (several
//! ids sharing one name) classify identically.

use std::sync::OnceLock;
use tree_sitter::{Language, Node};

/// Assignment operators (`=` and the compound forms).
pub const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "<<=", ">>=", ">>>=", "|=", "^=", "&=", "**=", "&&=",
    "||=", "??=",
];

/// Binary operators that produce a `LogicalExpression`.
pub const LOGICAL_OPERATORS: &[&str] = &["||", "&&", "??"];

pub const UPDATE_OPERATORS: &[&str] = &["++", "--"];

pub const UNARY_OPERATORS: &[&str] = &["-", "+", "!", "~", "typeof", "void", "delete"];

/// Grammar node kinds the converter distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Program,
    HashBangLine,
    Comment,

    // Statements
    ExpressionStatement,
    StatementBlock,
    EmptyStatement,
    DebuggerStatement,
    IfStatement,
    ElseClause,
    SwitchStatement,
    SwitchBody,
    SwitchCase,
    SwitchDefault,
    ForStatement,
    ForInStatement,
    WhileStatement,
    DoStatement,
    TryStatement,
    CatchClause,
    FinallyClause,
    WithStatement,
    BreakStatement,
    ContinueStatement,
    ReturnStatement,
    ThrowStatement,
    LabeledStatement,

    // Declarations
    LexicalDeclaration,
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,
    GeneratorFunctionDeclaration,
    ClassDeclaration,

    // Modules
    ImportStatement,
    ImportClause,
    NamespaceImport,
    NamedImports,
    ImportSpecifier,
    ExportStatement,
    ExportClause,
    ExportSpecifier,
    NamespaceExport,

    // Names
    Identifier,
    PropertyIdentifier,
    ShorthandPropertyIdentifier,
    ShorthandPropertyIdentifierPattern,
    StatementIdentifier,
    PrivatePropertyIdentifier,
    This,
    Super,
    Undefined,

    // Literals
    Number,
    String,
    Regex,
    True,
    False,
    Null,
    TemplateString,
    TemplateSubstitution,

    // Expressions
    Array,
    Object,
    Pair,
    SpreadElement,
    MethodDefinition,
    ComputedPropertyName,
    FunctionExpression,
    GeneratorFunction,
    ArrowFunction,
    Class,
    AssignmentExpression,
    AugmentedAssignmentExpression,
    BinaryExpression,
    UnaryExpression,
    UpdateExpression,
    SequenceExpression,
    TernaryExpression,
    CallExpression,
    NewExpression,
    MemberExpression,
    SubscriptExpression,
    ParenthesizedExpression,
    YieldExpression,
    AwaitExpression,
    Arguments,
    OptionalChain,

    // Patterns
    ObjectPattern,
    ArrayPattern,
    PairPattern,
    RestPattern,
    AssignmentPattern,
    ObjectAssignmentPattern,

    // Functions and classes
    FormalParameters,
    RequiredParameter,
    OptionalParameter,
    ClassBody,
    ClassHeritage,
    ExtendsClause,

    // Type-only expression wrappers
    AsExpression,
    SatisfiesExpression,
    NonNullExpression,
    TypeAssertion,

    /// Anonymous tokens and every named kind not listed above.
    Other,
}

impl SyntaxKind {
    /// Classify a named grammar kind.
    pub fn from_name(name: &str) -> Self {
        match name {
            "program" => Self::Program,
            "hash_bang_line" => Self::HashBangLine,
            "comment" | "html_comment" => Self::Comment,

            "expression_statement" => Self::ExpressionStatement,
            "statement_block" => Self::StatementBlock,
            "empty_statement" => Self::EmptyStatement,
            "debugger_statement" => Self::DebuggerStatement,
            "if_statement" => Self::IfStatement,
            "else_clause" => Self::ElseClause,
            "switch_statement" => Self::SwitchStatement,
            "switch_body" => Self::SwitchBody,
            "switch_case" => Self::SwitchCase,
            "switch_default" => Self::SwitchDefault,
            "for_statement" => Self::ForStatement,
            "for_in_statement" => Self::ForInStatement,
            "while_statement" => Self::WhileStatement,
            "do_statement" => Self::DoStatement,
            "try_statement" => Self::TryStatement,
            "catch_clause" => Self::CatchClause,
            "finally_clause" => Self::FinallyClause,
            "with_statement" => Self::WithStatement,
            "break_statement" => Self::BreakStatement,
            "continue_statement" => Self::ContinueStatement,
            "return_statement" => Self::ReturnStatement,
            "throw_statement" => Self::ThrowStatement,
            "labeled_statement" => Self::LabeledStatement,

            "lexical_declaration" => Self::LexicalDeclaration,
            "variable_declaration" => Self::VariableDeclaration,
            "variable_declarator" => Self::VariableDeclarator,
            "function_declaration" => Self::FunctionDeclaration,
            "generator_function_declaration" => Self::GeneratorFunctionDeclaration,
            "class_declaration" => Self::ClassDeclaration,

            "import_statement" => Self::ImportStatement,
            "import_clause" => Self::ImportClause,
            "namespace_import" => Self::NamespaceImport,
            "named_imports" => Self::NamedImports,
            "import_specifier" => Self::ImportSpecifier,
            "export_statement" => Self::ExportStatement,
            "export_clause" => Self::ExportClause,
            "export_specifier" => Self::ExportSpecifier,
            "namespace_export" => Self::NamespaceExport,

            "identifier" => Self::Identifier,
            "property_identifier" => Self::PropertyIdentifier,
            "shorthand_property_identifier" => Self::ShorthandPropertyIdentifier,
            "shorthand_property_identifier_pattern" => Self::ShorthandPropertyIdentifierPattern,
            "statement_identifier" => Self::StatementIdentifier,
            "private_property_identifier" => Self::PrivatePropertyIdentifier,
            "this" => Self::This,
            "super" => Self::Super,
            "undefined" => Self::Undefined,

            "number" => Self::Number,
            "string" => Self::String,
            "regex" => Self::Regex,
            "true" => Self::True,
            "false" => Self::False,
            "null" => Self::Null,
            "template_string" => Self::TemplateString,
            "template_substitution" => Self::TemplateSubstitution,

            "array" => Self::Array,
            "object" => Self::Object,
            "pair" => Self::Pair,
            "spread_element" => Self::SpreadElement,
            "method_definition" => Self::MethodDefinition,
            "computed_property_name" => Self::ComputedPropertyName,
            // Older grammar releases name function expressions `function`.
            "function_expression" | "function" => Self::FunctionExpression,
            "generator_function" => Self::GeneratorFunction,
            "arrow_function" => Self::ArrowFunction,
            "class" => Self::Class,
            "assignment_expression" => Self::AssignmentExpression,
            "augmented_assignment_expression" => Self::AugmentedAssignmentExpression,
            "binary_expression" => Self::BinaryExpression,
            "unary_expression" => Self::UnaryExpression,
            "update_expression" => Self::UpdateExpression,
            "sequence_expression" => Self::SequenceExpression,
            "ternary_expression" => Self::TernaryExpression,
            "call_expression" => Self::CallExpression,
            "new_expression" => Self::NewExpression,
            "member_expression" => Self::MemberExpression,
            "subscript_expression" => Self::SubscriptExpression,
            "parenthesized_expression" => Self::ParenthesizedExpression,
            "yield_expression" => Self::YieldExpression,
            "await_expression" => Self::AwaitExpression,
            "arguments" => Self::Arguments,
            "optional_chain" => Self::OptionalChain,

            "object_pattern" => Self::ObjectPattern,
            "array_pattern" => Self::ArrayPattern,
            "pair_pattern" => Self::PairPattern,
            "rest_pattern" => Self::RestPattern,
            "assignment_pattern" => Self::AssignmentPattern,
            "object_assignment_pattern" => Self::ObjectAssignmentPattern,

            "formal_parameters" => Self::FormalParameters,
            "required_parameter" => Self::RequiredParameter,
            "optional_parameter" => Self::OptionalParameter,
            "class_body" => Self::ClassBody,
            "class_heritage" => Self::ClassHeritage,
            "extends_clause" => Self::ExtendsClause,

            "as_expression" => Self::AsExpression,
            "satisfies_expression" => Self::SatisfiesExpression,
            "non_null_expression" => Self::NonNullExpression,
            "type_assertion" => Self::TypeAssertion,

            _ => Self::Other,
        }
    }

    /// Classify a tree node.
    pub fn of(node: Node<'_>) -> Self {
        if node.is_error() || node.is_missing() {
            return Self::Other;
        }
        tables()
            .kinds
            .get(usize::from(node.kind_id()))
            .copied()
            .unwrap_or(Self::Other)
    }

    /// Whether this kind is a plain name that converts to an `Identifier`.
    pub fn is_identifier(self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::PropertyIdentifier
                | Self::ShorthandPropertyIdentifier
                | Self::ShorthandPropertyIdentifierPattern
                | Self::StatementIdentifier
                | Self::Undefined
        )
    }

    /// Whether this kind wraps an expression only to attach type information.
    pub fn is_type_wrapper(self) -> bool {
        matches!(
            self,
            Self::AsExpression | Self::SatisfiesExpression | Self::NonNullExpression | Self::TypeAssertion
        )
    }
}

/// Readable name of a node's kind, for diagnostics.
///
/// Anonymous tokens are quoted, hidden rules lose their leading underscore and
/// error nodes read as `syntax error`.
pub fn kind_name(node: Node<'_>) -> &'static str {
    if node.is_error() {
        return "syntax error";
    }
    tables()
        .names
        .get(usize::from(node.kind_id()))
        .map(String::as_str)
        .unwrap_or("unknown")
}

/// The TypeScript grammar, loaded once.
pub fn language() -> &'static Language {
    static LANGUAGE: OnceLock<Language> = OnceLock::new();
    LANGUAGE.get_or_init(|| arborium_typescript::language().into())
}

struct KindTables {
    kinds: Vec<SyntaxKind>,
    names: Vec<String>,
}

fn tables() -> &'static KindTables {
    static TABLES: OnceLock<KindTables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let lang = language();
        let count = lang.node_kind_count();
        let mut kinds = Vec::with_capacity(count);
        let mut names = Vec::with_capacity(count);
        for id in 0..count as u16 {
            let name = lang.node_kind_for_id(id).unwrap_or("");
            let named = lang.node_kind_is_named(id);
            kinds.push(if named {
                SyntaxKind::from_name(name)
            } else {
                SyntaxKind::Other
            });
            names.push(readable_name(name, named));
        }
        KindTables { kinds, names }
    })
}

fn readable_name(name: &str, named: bool) -> String {
    if name == "ERROR" {
        "syntax error".to_string()
    } else if !named {
        format!("\"{name}\"")
    } else {
        name.strip_prefix('_').unwrap_or(name).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(SyntaxKind::from_name("binary_expression"), SyntaxKind::BinaryExpression);
        assert_eq!(SyntaxKind::from_name("function"), SyntaxKind::FunctionExpression);
        assert_eq!(SyntaxKind::from_name("interface_declaration"), SyntaxKind::Other);
    }

    #[test]
    fn test_readable_names() {
        assert_eq!(readable_name("ERROR", true), "syntax error");
        assert_eq!(readable_name("=>", false), "\"=>\"");
        assert_eq!(readable_name("_expression", true), "expression");
        assert_eq!(readable_name("interface_declaration", true), "interface_declaration");
    }

    #[test]
    fn test_grammar_kinds_resolve() {
        let lang = language();
        for name in ["program", "binary_expression", "template_string", "class_body"] {
            let id = lang.id_for_node_kind(name, true);
            assert_ne!(id, 0, "{name} missing from grammar");
            assert_eq!(tables().kinds[usize::from(id)], SyntaxKind::from_name(name));
        }
    }

    #[test]
    fn test_operator_tables_are_disjoint() {
        for op in LOGICAL_OPERATORS {
            assert!(!ASSIGNMENT_OPERATORS.contains(op));
        }
        assert!(ASSIGNMENT_OPERATORS.contains(&"??="));
        assert!(UNARY_OPERATORS.contains(&"typeof"));
    }
}
