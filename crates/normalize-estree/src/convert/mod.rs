//! Syntax tree → interchange tree conversion.
//!
//! A single recursive descent over the tree-sitter tree. [`Converter`] holds
//! the read-only context (source text, line index, file label); every
//! conversion method takes `&self` and returns an owned subtree, so the same
//! input node always yields the same output.
//!
//! The work is split by syntactic category:
//!
//! - `statement` - statements, declarations and module items
//! - `expression` - expressions, object literals, calls and members
//! - `pattern` - binding patterns and expressions reinterpreted as targets
//! - `function` - functions, parameters, classes and their members
//! - `literal` - literals, template strings and regular expressions

mod expression;
mod function;
mod literal;
mod pattern;
mod statement;

use crate::error::{ConvertError, Result};
use crate::estree::{Node, NodeKind, SourceLocation, SourceType};
use crate::kinds::{SyntaxKind, kind_name};
use crate::options::ConvertOptions;
use crate::position::LineIndex;
use std::sync::Arc;
use tree_sitter::Node as SyntaxNode;

/// Conversion context for one source file.
pub struct Converter<'a> {
    source: &'a str,
    lines: LineIndex,
    file: Arc<str>,
    source_type: SourceType,
}

impl<'a> Converter<'a> {
    pub fn new(source: &'a str, options: &ConvertOptions) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
            file: Arc::from(options.file_name.as_str()),
            source_type: options.source_type,
        }
    }

    /// Convert the root `program` node.
    ///
    /// The `Program` spans the whole buffer, including leading and trailing
    /// trivia.
    pub fn convert_program(&self, root: SyntaxNode<'_>) -> Result<Node> {
        if SyntaxKind::of(root) != SyntaxKind::Program {
            return self.unexpected(root);
        }
        let mut body = Vec::new();
        for child in named_children(root) {
            if SyntaxKind::of(child) == SyntaxKind::HashBangLine {
                continue;
            }
            body.push(self.convert_top_statement(child)?);
        }
        Ok(self.wrap_pos(
            0,
            self.source.len(),
            NodeKind::Program {
                body,
                source_type: self.source_type,
            },
        ))
    }

    /// Source text covered by a node.
    fn text(&self, node: SyntaxNode<'_>) -> &'a str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    /// Wrap `kind` with the node's own extent, minus surrounding comments.
    fn wrap(&self, node: SyntaxNode<'_>, kind: NodeKind) -> Node {
        self.wrap_pos(start_of(node), end_of(node), kind)
    }

    /// Wrap `kind` with an explicit byte span.
    fn wrap_pos(&self, start: usize, end: usize, kind: NodeKind) -> Node {
        let lines = &self.lines;
        Node {
            kind,
            loc: SourceLocation {
                source: Arc::clone(&self.file),
                start: lines.position(self.source, start),
                end: lines.position(self.source, end),
            },
            range: [
                lines.offset(self.source, start),
                lines.offset(self.source, end),
            ],
        }
    }

    /// Fail on a node the converter has no mapping for.
    fn unexpected<T>(&self, node: SyntaxNode<'_>) -> Result<T> {
        let start = self.lines.position(self.source, node.start_byte());
        let kind = kind_name(node);
        tracing::debug!(kind, line = start.line, column = start.column, "unsupported construct");
        Err(ConvertError::UnsupportedConstruct {
            kind: kind.to_string(),
            line: start.line,
            column: start.column,
        })
    }

    /// A required field; its absence (error recovery) fails on the parent.
    fn field<'t>(&self, node: SyntaxNode<'t>, name: &str) -> Result<SyntaxNode<'t>> {
        match node.child_by_field_name(name) {
            Some(child) => Ok(child),
            None => self.unexpected(node),
        }
    }

    /// First named child that is not a comment.
    fn first_named<'t>(&self, node: SyntaxNode<'t>) -> Result<SyntaxNode<'t>> {
        match named_children(node).into_iter().next() {
            Some(child) => Ok(child),
            None => self.unexpected(node),
        }
    }

    fn identifier(&self, node: SyntaxNode<'_>) -> Node {
        self.wrap(
            node,
            NodeKind::Identifier {
                name: self.text(node).to_string(),
            },
        )
    }
}

/// Named children, skipping extras (comments).
fn named_children(node: SyntaxNode<'_>) -> Vec<SyntaxNode<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

/// Start of the first token of `node` that is not a comment.
fn start_of(node: SyntaxNode<'_>) -> usize {
    let mut cursor = node.walk();
    let first = node.children(&mut cursor).find(|child| !child.is_extra());
    match first {
        Some(child) => start_of(child),
        None => node.start_byte(),
    }
}

/// End of the last token of `node` that is not a comment.
///
/// tree-sitter folds comments that follow a block into the block, so a
/// node's raw end can lie past trailing trivia.
fn end_of(node: SyntaxNode<'_>) -> usize {
    let mut cursor = node.walk();
    let last = node
        .children(&mut cursor)
        .filter(|child| !child.is_extra())
        .last();
    match last {
        Some(child) => end_of(child),
        None => node.end_byte(),
    }
}

/// All children, skipping extras.
fn children(node: SyntaxNode<'_>) -> Vec<SyntaxNode<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

/// The anonymous child token with this text, if any.
fn token<'t>(node: SyntaxNode<'t>, text: &str) -> Option<SyntaxNode<'t>> {
    children(node)
        .into_iter()
        .find(|child| !child.is_named() && child.kind() == text)
}
