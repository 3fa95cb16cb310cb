//! Statements, declarations and module items.

use super::function::{FunctionType, IdPolicy};
use super::{Converter, SyntaxNode, end_of, named_children, start_of, token};
use crate::error::Result;
use crate::estree::{Node, NodeKind, VariableKind};
use crate::kinds::SyntaxKind;

impl Converter<'_> {
    /// Convert a statement directly under the program, where module items
    /// (imports and exports) are allowed.
    pub(super) fn convert_top_statement(&self, node: SyntaxNode<'_>) -> Result<Node> {
        match SyntaxKind::of(node) {
            SyntaxKind::ExportStatement => self.convert_export(node),
            SyntaxKind::ImportStatement => self.convert_import(node),
            _ => self.convert_statement(node),
        }
    }

    pub(super) fn convert_statement(&self, node: SyntaxNode<'_>) -> Result<Node> {
        let kind = match SyntaxKind::of(node) {
            SyntaxKind::StatementBlock => return self.convert_block(node),
            SyntaxKind::LexicalDeclaration | SyntaxKind::VariableDeclaration => {
                return self.convert_variable_declaration(node, end_of(node));
            }
            SyntaxKind::FunctionDeclaration | SyntaxKind::GeneratorFunctionDeclaration => {
                return self.convert_function(node, FunctionType::Declaration, IdPolicy::Enforce);
            }
            SyntaxKind::ClassDeclaration => return self.convert_class(node, true),
            SyntaxKind::ExpressionStatement => NodeKind::ExpressionStatement {
                expression: Box::new(self.convert_expression(self.first_named(node)?)?),
            },
            SyntaxKind::EmptyStatement => NodeKind::EmptyStatement,
            SyntaxKind::DebuggerStatement => NodeKind::DebuggerStatement,
            SyntaxKind::IfStatement => self.convert_if(node)?,
            SyntaxKind::SwitchStatement => self.convert_switch(node)?,
            SyntaxKind::TryStatement => self.convert_try(node)?,
            SyntaxKind::WhileStatement => NodeKind::WhileStatement {
                test: Box::new(self.convert_expression(self.field(node, "condition")?)?),
                body: Box::new(self.convert_statement(self.field(node, "body")?)?),
            },
            SyntaxKind::DoStatement => NodeKind::DoWhileStatement {
                body: Box::new(self.convert_statement(self.field(node, "body")?)?),
                test: Box::new(self.convert_expression(self.field(node, "condition")?)?),
            },
            SyntaxKind::ForStatement => self.convert_for(node)?,
            SyntaxKind::ForInStatement => self.convert_for_in_or_of(node)?,
            SyntaxKind::WithStatement => NodeKind::WithStatement {
                object: Box::new(self.convert_expression(self.field(node, "object")?)?),
                body: Box::new(self.convert_statement(self.field(node, "body")?)?),
            },
            SyntaxKind::BreakStatement => NodeKind::BreakStatement {
                label: self.optional_label(node),
            },
            SyntaxKind::ContinueStatement => NodeKind::ContinueStatement {
                label: self.optional_label(node),
            },
            SyntaxKind::ReturnStatement => NodeKind::ReturnStatement {
                argument: match named_children(node).into_iter().next() {
                    Some(argument) => Some(Box::new(self.convert_expression(argument)?)),
                    None => None,
                },
            },
            SyntaxKind::ThrowStatement => NodeKind::ThrowStatement {
                argument: Box::new(self.convert_expression(self.first_named(node)?)?),
            },
            SyntaxKind::LabeledStatement => NodeKind::LabeledStatement {
                label: Box::new(self.identifier(self.field(node, "label")?)),
                body: Box::new(self.convert_statement(self.field(node, "body")?)?),
            },
            _ => return self.unexpected(node),
        };
        Ok(self.wrap(node, kind))
    }

    pub(super) fn convert_block(&self, node: SyntaxNode<'_>) -> Result<Node> {
        if SyntaxKind::of(node) != SyntaxKind::StatementBlock {
            return self.unexpected(node);
        }
        let body = self.convert_statements(named_children(node))?;
        Ok(self.wrap(node, NodeKind::BlockStatement { body }))
    }

    fn convert_statements(&self, nodes: Vec<SyntaxNode<'_>>) -> Result<Vec<Node>> {
        nodes
            .into_iter()
            .map(|node| self.convert_statement(node))
            .collect()
    }

    fn optional_label(&self, node: SyntaxNode<'_>) -> Option<Box<Node>> {
        node.child_by_field_name("label")
            .map(|label| Box::new(self.identifier(label)))
    }

    /// `var`/`let`/`const` declaration ending at `end`.
    ///
    /// Inside a `for` head the declaration stops at its last declarator
    /// rather than at the `;` that the grammar folds into it.
    fn convert_variable_declaration(&self, node: SyntaxNode<'_>, end: usize) -> Result<Node> {
        let kind = match SyntaxKind::of(node) {
            SyntaxKind::VariableDeclaration => VariableKind::Var,
            _ => self.variable_kind(self.field(node, "kind")?)?,
        };
        let mut declarations = Vec::new();
        for declarator in named_children(node) {
            if SyntaxKind::of(declarator) != SyntaxKind::VariableDeclarator {
                return self.unexpected(declarator);
            }
            let init = match declarator.child_by_field_name("value") {
                Some(value) => Some(Box::new(self.convert_expression(value)?)),
                None => None,
            };
            declarations.push(self.wrap(
                declarator,
                NodeKind::VariableDeclarator {
                    id: Box::new(self.convert_binding_pattern(self.field(declarator, "name")?)?),
                    init,
                },
            ));
        }
        Ok(self.wrap_pos(
            start_of(node),
            end,
            NodeKind::VariableDeclaration { declarations, kind },
        ))
    }

    fn variable_kind(&self, keyword: SyntaxNode<'_>) -> Result<VariableKind> {
        match self.text(keyword) {
            "var" => Ok(VariableKind::Var),
            "let" => Ok(VariableKind::Let),
            "const" => Ok(VariableKind::Const),
            _ => self.unexpected(keyword),
        }
    }

    fn convert_if(&self, node: SyntaxNode<'_>) -> Result<NodeKind> {
        let alternate = match node.child_by_field_name("alternative") {
            Some(clause) => {
                let statement = match SyntaxKind::of(clause) {
                    SyntaxKind::ElseClause => self.first_named(clause)?,
                    _ => clause,
                };
                Some(Box::new(self.convert_statement(statement)?))
            }
            None => None,
        };
        Ok(NodeKind::IfStatement {
            test: Box::new(self.convert_expression(self.field(node, "condition")?)?),
            consequent: Box::new(self.convert_statement(self.field(node, "consequence")?)?),
            alternate,
        })
    }

    fn convert_switch(&self, node: SyntaxNode<'_>) -> Result<NodeKind> {
        let discriminant = self.convert_expression(self.field(node, "value")?)?;
        let mut cases = Vec::new();
        for clause in named_children(self.field(node, "body")?) {
            let test = match SyntaxKind::of(clause) {
                SyntaxKind::SwitchCase => {
                    Some(Box::new(self.convert_expression(self.field(clause, "value")?)?))
                }
                SyntaxKind::SwitchDefault => None,
                _ => return self.unexpected(clause),
            };
            let mut cursor = clause.walk();
            let statements: Vec<_> = clause
                .children_by_field_name("body", &mut cursor)
                .filter(|statement| !statement.is_extra())
                .collect();
            let consequent = self.convert_statements(statements)?;
            cases.push(self.wrap(clause, NodeKind::SwitchCase { test, consequent }));
        }
        Ok(NodeKind::SwitchStatement {
            discriminant: Box::new(discriminant),
            cases,
        })
    }

    fn convert_try(&self, node: SyntaxNode<'_>) -> Result<NodeKind> {
        let block = self.convert_block(self.field(node, "body")?)?;
        let handler = match node.child_by_field_name("handler") {
            Some(clause) => {
                let param = match clause.child_by_field_name("parameter") {
                    Some(param) => Some(Box::new(self.convert_binding_pattern(param)?)),
                    None => None,
                };
                let body = self.convert_block(self.field(clause, "body")?)?;
                Some(Box::new(self.wrap(
                    clause,
                    NodeKind::CatchClause {
                        param,
                        body: Box::new(body),
                    },
                )))
            }
            None => None,
        };
        let finalizer = match node.child_by_field_name("finalizer") {
            Some(clause) => Some(Box::new(self.convert_block(self.field(clause, "body")?)?)),
            None => None,
        };
        Ok(NodeKind::TryStatement {
            block: Box::new(block),
            handler,
            finalizer,
        })
    }

    fn convert_for(&self, node: SyntaxNode<'_>) -> Result<NodeKind> {
        let init = match node.child_by_field_name("initializer") {
            Some(init) => self.convert_variable_declaration_or_expression(init)?,
            None => None,
        };
        let test = match node.child_by_field_name("condition") {
            Some(test) => self.convert_variable_declaration_or_expression(test)?,
            None => None,
        };
        let update = match node.child_by_field_name("increment") {
            Some(update) => Some(Box::new(self.convert_expression(update)?)),
            None => None,
        };
        Ok(NodeKind::ForStatement {
            init: init.map(Box::new),
            test: test.map(Box::new),
            update,
            body: Box::new(self.convert_statement(self.field(node, "body")?)?),
        })
    }

    /// A clause of a `for` head: a declaration, an expression, or nothing.
    fn convert_variable_declaration_or_expression(
        &self,
        node: SyntaxNode<'_>,
    ) -> Result<Option<Node>> {
        match SyntaxKind::of(node) {
            SyntaxKind::LexicalDeclaration | SyntaxKind::VariableDeclaration => {
                let end = named_children(node)
                    .last()
                    .map_or(end_of(node), |child| end_of(*child));
                self.convert_variable_declaration(node, end).map(Some)
            }
            SyntaxKind::ExpressionStatement => {
                self.convert_expression(self.first_named(node)?).map(Some)
            }
            SyntaxKind::EmptyStatement => Ok(None),
            _ if !node.is_named() => Ok(None),
            _ => self.convert_expression(node).map(Some),
        }
    }

    fn convert_for_in_or_of(&self, node: SyntaxNode<'_>) -> Result<NodeKind> {
        let left_node = self.field(node, "left")?;
        let left = match node.child_by_field_name("kind") {
            Some(keyword) => {
                let kind = self.variable_kind(keyword)?;
                let value = node.child_by_field_name("value");
                let init = match value {
                    Some(value) => Some(Box::new(self.convert_expression(value)?)),
                    None => None,
                };
                let end = end_of(value.unwrap_or(left_node));
                let declarator = self.wrap_pos(
                    start_of(left_node),
                    end,
                    NodeKind::VariableDeclarator {
                        id: Box::new(self.convert_binding_pattern(left_node)?),
                        init,
                    },
                );
                self.wrap_pos(
                    keyword.start_byte(),
                    end,
                    NodeKind::VariableDeclaration {
                        declarations: vec![declarator],
                        kind,
                    },
                )
            }
            None => self.convert_expression_as_pattern(left_node)?,
        };
        let right = Box::new(self.convert_expression(self.field(node, "right")?)?);
        let body = Box::new(self.convert_statement(self.field(node, "body")?)?);
        let operator = self.field(node, "operator")?;
        match self.text(operator) {
            "in" => Ok(NodeKind::ForInStatement {
                left: Box::new(left),
                right,
                body,
            }),
            "of" => Ok(NodeKind::ForOfStatement {
                left: Box::new(left),
                right,
                body,
                is_await: token(node, "await").is_some(),
            }),
            _ => self.unexpected(operator),
        }
    }

    fn convert_import(&self, node: SyntaxNode<'_>) -> Result<Node> {
        if let Some(keyword) = token(node, "type") {
            return self.unexpected(keyword);
        }
        let source = self.convert_module_source(self.field(node, "source")?)?;
        let mut specifiers = Vec::new();
        for child in named_children(node) {
            match SyntaxKind::of(child) {
                SyntaxKind::ImportClause => self.convert_import_clause(child, &mut specifiers)?,
                SyntaxKind::String => {}
                _ => return self.unexpected(child),
            }
        }
        Ok(self.wrap(
            node,
            NodeKind::ImportDeclaration {
                specifiers,
                source: Box::new(source),
            },
        ))
    }

    fn convert_import_clause(&self, clause: SyntaxNode<'_>, out: &mut Vec<Node>) -> Result<()> {
        for binding in named_children(clause) {
            match SyntaxKind::of(binding) {
                SyntaxKind::Identifier => {
                    let local = Box::new(self.identifier(binding));
                    out.push(self.wrap(binding, NodeKind::ImportDefaultSpecifier { local }));
                }
                SyntaxKind::NamespaceImport => {
                    let local = Box::new(self.identifier(self.first_named(binding)?));
                    out.push(self.wrap(binding, NodeKind::ImportNamespaceSpecifier { local }));
                }
                SyntaxKind::NamedImports => {
                    for specifier in named_children(binding) {
                        if SyntaxKind::of(specifier) != SyntaxKind::ImportSpecifier {
                            return self.unexpected(specifier);
                        }
                        let imported = self.convert_module_export_name(self.field(specifier, "name")?)?;
                        let local = match specifier.child_by_field_name("alias") {
                            Some(alias) => self.identifier(alias),
                            None => imported.clone(),
                        };
                        out.push(self.wrap(
                            specifier,
                            NodeKind::ImportSpecifier {
                                imported: Box::new(imported),
                                local: Box::new(local),
                            },
                        ));
                    }
                }
                _ => return self.unexpected(binding),
            }
        }
        Ok(())
    }

    fn convert_export(&self, node: SyntaxNode<'_>) -> Result<Node> {
        for child in named_children(node) {
            if child.kind() == "decorator" {
                return self.unexpected(child);
            }
        }
        let is_default = token(node, "default").is_some();

        if let Some(declaration) = node.child_by_field_name("declaration") {
            let declaration = Box::new(self.convert_statement(declaration)?);
            let kind = if is_default {
                NodeKind::ExportDefaultDeclaration { declaration }
            } else {
                NodeKind::ExportNamedDeclaration {
                    declaration: Some(declaration),
                    specifiers: Vec::new(),
                    source: None,
                }
            };
            return Ok(self.wrap(node, kind));
        }

        // `export default <expr>;`
        if let Some(value) = node.child_by_field_name("value") {
            let declaration = Box::new(self.convert_expression(value)?);
            return Ok(self.wrap(node, NodeKind::ExportDefaultDeclaration { declaration }));
        }

        // `export = <expr>;`
        if token(node, "=").is_some() {
            let declaration = Box::new(self.convert_expression(self.first_named(node)?)?);
            return Ok(self.wrap(node, NodeKind::ExportDefaultDeclaration { declaration }));
        }

        if let Some(keyword) = token(node, "type") {
            return self.unexpected(keyword);
        }

        let source = match node.child_by_field_name("source") {
            Some(source) => Some(Box::new(self.convert_module_source(source)?)),
            None => None,
        };

        for child in named_children(node) {
            match SyntaxKind::of(child) {
                SyntaxKind::ExportClause => {
                    let specifiers = self.convert_export_clause(child)?;
                    return Ok(self.wrap(
                        node,
                        NodeKind::ExportNamedDeclaration {
                            declaration: None,
                            specifiers,
                            source,
                        },
                    ));
                }
                SyntaxKind::NamespaceExport => {
                    let Some(source) = source else {
                        return self.unexpected(node);
                    };
                    let exported = self.convert_module_export_name(self.first_named(child)?)?;
                    return Ok(self.wrap(
                        node,
                        NodeKind::ExportAllDeclaration {
                            source,
                            exported: Some(Box::new(exported)),
                        },
                    ));
                }
                _ => {}
            }
        }

        match (token(node, "*"), source) {
            (Some(_), Some(source)) => Ok(self.wrap(
                node,
                NodeKind::ExportAllDeclaration {
                    source,
                    exported: None,
                },
            )),
            _ => self.unexpected(node),
        }
    }

    fn convert_export_clause(&self, clause: SyntaxNode<'_>) -> Result<Vec<Node>> {
        let mut specifiers = Vec::new();
        for specifier in named_children(clause) {
            if SyntaxKind::of(specifier) != SyntaxKind::ExportSpecifier {
                return self.unexpected(specifier);
            }
            let local = self.convert_module_export_name(self.field(specifier, "name")?)?;
            let exported = match specifier.child_by_field_name("alias") {
                Some(alias) => self.convert_module_export_name(alias)?,
                None => local.clone(),
            };
            specifiers.push(self.wrap(
                specifier,
                NodeKind::ExportSpecifier {
                    local: Box::new(local),
                    exported: Box::new(exported),
                },
            ));
        }
        Ok(specifiers)
    }

    /// `from "m"`: only string module specifiers are accepted.
    fn convert_module_source(&self, node: SyntaxNode<'_>) -> Result<Node> {
        match SyntaxKind::of(node) {
            SyntaxKind::String => self.convert_literal(node),
            _ => self.unexpected(node),
        }
    }

    /// An imported or exported name: an identifier, a string, or `default`.
    fn convert_module_export_name(&self, node: SyntaxNode<'_>) -> Result<Node> {
        match SyntaxKind::of(node) {
            SyntaxKind::String => self.convert_literal(node),
            kind if kind.is_identifier() => Ok(self.identifier(node)),
            // The keyword is an anonymous token in `{ default as x }`.
            _ if !node.is_named() && node.kind() == "default" => Ok(self.identifier(node)),
            _ => self.unexpected(node),
        }
    }
}
