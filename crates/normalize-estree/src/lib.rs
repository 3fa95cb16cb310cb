//! Convert TypeScript syntax trees into ESTree interchange trees.
//!
//! The front-end is tree-sitter with the TypeScript grammar. Its concrete
//! syntax tree is converted into the shape downstream JavaScript tooling
//! expects: a `Program` root, `type` discriminants, and `loc`/`range` on every
//! node. Type-only syntax is erased where it wraps a value (`x as T`, `x!`)
//! and rejected where it declares something (`interface`, `enum`).
//!
//! ```
//! use normalize_estree::{ConvertOptions, check_and_convert};
//!
//! let program = check_and_convert("let x: number = 1;", &ConvertOptions::default()).unwrap();
//! let json = serde_json::to_value(&program).unwrap();
//! assert_eq!(json["type"], "Program");
//! assert_eq!(json["body"][0]["declarations"][0]["id"]["name"], "x");
//! ```
//!
//! Unsupported constructs fail the whole conversion with
//! [`ConvertError::UnsupportedConstruct`], naming the construct and where it
//! starts; no partial tree is returned.

pub mod convert;
pub mod error;
pub mod estree;
pub mod kinds;
pub mod options;
pub mod position;

pub use convert::Converter;
pub use error::{ConvertError, Result};
pub use estree::{Difference, Node, NodeKind, SourceType, StructureEq, diff};
pub use options::{ConvertOptions, EcmaTarget};

use tree_sitter::{Parser, Tree};

/// Parse TypeScript source with the bundled grammar.
pub fn parse(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(kinds::language())
        .map_err(|e| ConvertError::FrontEnd(format!("tree-sitter init: {}", e)))?;
    parser
        .parse(source, None)
        .ok_or_else(|| ConvertError::FrontEnd("failed to parse TypeScript".into()))
}

/// Convert a tree produced by the caller from `source`.
pub fn convert_tree(tree: &Tree, source: &str, options: &ConvertOptions) -> Result<Node> {
    let _span =
        tracing::trace_span!("convert", file = %options.file_name, target = ?options.target)
            .entered();
    Converter::new(source, options).convert_program(tree.root_node())
}

/// Parse `source` as a single module and convert it.
///
/// Syntax errors reported by the front-end are counted and logged but do not
/// stop the conversion; a construct the converter cannot map still does.
pub fn check_and_convert(source: &str, options: &ConvertOptions) -> Result<Node> {
    let tree = parse(source)?;
    let diagnostics = syntax_diagnostics(&tree);
    if diagnostics > 0 {
        tracing::debug!(diagnostics, file = %options.file_name, "front-end reported syntax errors");
    }
    convert_tree(&tree, source, options)
}

/// Number of error and missing nodes in the tree.
fn syntax_diagnostics(tree: &Tree) -> usize {
    let root = tree.root_node();
    if !root.has_error() {
        return 0;
    }
    let mut count = 0;
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            count += 1;
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return count;
            }
        }
    }
}
