//! Expressions.

use super::function::{FunctionType, IdPolicy};
use super::{Converter, SyntaxNode, children, named_children, token};
use crate::error::Result;
use crate::estree::{Node, NodeKind, PropertyKind};
use crate::kinds::{
    ASSIGNMENT_OPERATORS, LOGICAL_OPERATORS, SyntaxKind, UNARY_OPERATORS, UPDATE_OPERATORS,
};

impl Converter<'_> {
    pub(super) fn convert_expression(&self, node: SyntaxNode<'_>) -> Result<Node> {
        let kind = match SyntaxKind::of(node) {
            SyntaxKind::This => NodeKind::ThisExpression,
            SyntaxKind::Super => NodeKind::Super,
            kind if kind.is_identifier() => return Ok(self.identifier(node)),
            SyntaxKind::PrivatePropertyIdentifier => return Ok(self.private_identifier(node)),
            SyntaxKind::ParenthesizedExpression => {
                return self.convert_expression(self.first_named(node)?);
            }
            kind if kind.is_type_wrapper() => {
                return self.convert_expression(self.type_wrapper_operand(node)?);
            }
            SyntaxKind::BinaryExpression => self.convert_binary(node)?,
            SyntaxKind::SequenceExpression => {
                let mut expressions = Vec::new();
                self.flatten_sequence(node, &mut expressions)?;
                NodeKind::SequenceExpression { expressions }
            }
            SyntaxKind::AssignmentExpression | SyntaxKind::AugmentedAssignmentExpression => {
                self.convert_assignment(node)?
            }
            SyntaxKind::UnaryExpression => {
                let operator = self.field(node, "operator")?;
                if !UNARY_OPERATORS.contains(&self.text(operator)) {
                    return self.unexpected(operator);
                }
                NodeKind::UnaryExpression {
                    operator: self.text(operator).to_string(),
                    prefix: true,
                    argument: Box::new(self.convert_expression(self.field(node, "argument")?)?),
                }
            }
            SyntaxKind::UpdateExpression => {
                let operator = self.field(node, "operator")?;
                let argument = self.field(node, "argument")?;
                if !UPDATE_OPERATORS.contains(&self.text(operator)) {
                    return self.unexpected(operator);
                }
                NodeKind::UpdateExpression {
                    operator: self.text(operator).to_string(),
                    prefix: operator.start_byte() < argument.start_byte(),
                    argument: Box::new(self.convert_expression(argument)?),
                }
            }
            SyntaxKind::TernaryExpression => NodeKind::ConditionalExpression {
                test: Box::new(self.convert_expression(self.field(node, "condition")?)?),
                consequent: Box::new(self.convert_expression(self.field(node, "consequence")?)?),
                alternate: Box::new(self.convert_expression(self.field(node, "alternative")?)?),
            },
            SyntaxKind::CallExpression => self.convert_call(node)?,
            SyntaxKind::NewExpression => {
                let arguments = match node.child_by_field_name("arguments") {
                    Some(arguments) => self.convert_arguments(arguments)?,
                    None => Vec::new(),
                };
                NodeKind::NewExpression {
                    callee: Box::new(self.convert_expression(self.field(node, "constructor")?)?),
                    arguments,
                }
            }
            SyntaxKind::MemberExpression => {
                self.reject_optional_chain(node)?;
                let property = self.field(node, "property")?;
                let property = match SyntaxKind::of(property) {
                    SyntaxKind::PrivatePropertyIdentifier => self.private_identifier(property),
                    _ => self.identifier(property),
                };
                NodeKind::MemberExpression {
                    object: Box::new(self.convert_expression(self.field(node, "object")?)?),
                    property: Box::new(property),
                    computed: false,
                }
            }
            SyntaxKind::SubscriptExpression => {
                self.reject_optional_chain(node)?;
                NodeKind::MemberExpression {
                    object: Box::new(self.convert_expression(self.field(node, "object")?)?),
                    property: Box::new(self.convert_expression(self.field(node, "index")?)?),
                    computed: true,
                }
            }
            SyntaxKind::Array => NodeKind::ArrayExpression {
                elements: self.collect_elements(node, |element| self.convert_expression(element))?,
            },
            SyntaxKind::Object => self.convert_object(node)?,
            SyntaxKind::SpreadElement => NodeKind::SpreadElement {
                argument: Box::new(self.convert_expression(self.first_named(node)?)?),
            },
            SyntaxKind::YieldExpression => NodeKind::YieldExpression {
                argument: match named_children(node).into_iter().next() {
                    Some(argument) => Some(Box::new(self.convert_expression(argument)?)),
                    None => None,
                },
                delegate: token(node, "*").is_some(),
            },
            SyntaxKind::AwaitExpression => NodeKind::AwaitExpression {
                argument: Box::new(self.convert_expression(self.first_named(node)?)?),
            },
            SyntaxKind::ArrowFunction => {
                return self.convert_function(node, FunctionType::Arrow, IdPolicy::Ignore);
            }
            SyntaxKind::FunctionExpression | SyntaxKind::GeneratorFunction => {
                return self.convert_function(node, FunctionType::Expression, IdPolicy::AllowMissing);
            }
            SyntaxKind::Class => return self.convert_class(node, false),
            SyntaxKind::TemplateString => return self.convert_template(node),
            _ => return self.convert_literal(node),
        };
        Ok(self.wrap(node, kind))
    }

    fn private_identifier(&self, node: SyntaxNode<'_>) -> Node {
        let text = self.text(node);
        let name = text.strip_prefix('#').unwrap_or(text).to_string();
        self.wrap(node, NodeKind::PrivateIdentifier { name })
    }

    /// The value operand of `x as T`, `x satisfies T`, `x!` and `<T>x`.
    fn type_wrapper_operand<'t>(&self, node: SyntaxNode<'t>) -> Result<SyntaxNode<'t>> {
        let operand = match SyntaxKind::of(node) {
            SyntaxKind::TypeAssertion => named_children(node).pop(),
            _ => named_children(node).into_iter().next(),
        };
        match operand {
            Some(operand) => Ok(operand),
            None => self.unexpected(node),
        }
    }

    fn convert_binary(&self, node: SyntaxNode<'_>) -> Result<NodeKind> {
        let operator = self.text(self.field(node, "operator")?).to_string();
        let left = Box::new(self.convert_expression(self.field(node, "left")?)?);
        let right = Box::new(self.convert_expression(self.field(node, "right")?)?);
        Ok(if LOGICAL_OPERATORS.contains(&operator.as_str()) {
            NodeKind::LogicalExpression {
                operator,
                left,
                right,
            }
        } else {
            NodeKind::BinaryExpression {
                operator,
                left,
                right,
            }
        })
    }

    /// Collect the operands of a comma spine in source order.
    ///
    /// Only directly nested sequences are flattened; a parenthesized one
    /// stays a separate `SequenceExpression`.
    fn flatten_sequence(&self, node: SyntaxNode<'_>, out: &mut Vec<Node>) -> Result<()> {
        for operand in named_children(node) {
            if SyntaxKind::of(operand) == SyntaxKind::SequenceExpression {
                self.flatten_sequence(operand, out)?;
            } else {
                out.push(self.convert_expression(operand)?);
            }
        }
        Ok(())
    }

    fn convert_assignment(&self, node: SyntaxNode<'_>) -> Result<NodeKind> {
        let operator = match node.child_by_field_name("operator") {
            Some(operator) => operator,
            None => match token(node, "=") {
                Some(operator) => operator,
                None => return self.unexpected(node),
            },
        };
        if !ASSIGNMENT_OPERATORS.contains(&self.text(operator)) {
            return self.unexpected(operator);
        }
        Ok(NodeKind::AssignmentExpression {
            operator: self.text(operator).to_string(),
            left: Box::new(self.convert_expression_as_pattern(self.field(node, "left")?)?),
            right: Box::new(self.convert_expression(self.field(node, "right")?)?),
        })
    }

    fn convert_call(&self, node: SyntaxNode<'_>) -> Result<NodeKind> {
        self.reject_optional_chain(node)?;
        let callee = Box::new(self.convert_expression(self.field(node, "function")?)?);
        let arguments = self.field(node, "arguments")?;
        if SyntaxKind::of(arguments) == SyntaxKind::TemplateString {
            return Ok(NodeKind::TaggedTemplateExpression {
                tag: callee,
                quasi: Box::new(self.convert_template(arguments)?),
            });
        }
        Ok(NodeKind::CallExpression {
            callee,
            arguments: self.convert_arguments(arguments)?,
        })
    }

    fn convert_arguments(&self, node: SyntaxNode<'_>) -> Result<Vec<Node>> {
        if SyntaxKind::of(node) != SyntaxKind::Arguments {
            return self.unexpected(node);
        }
        named_children(node)
            .into_iter()
            .map(|argument| self.convert_expression(argument))
            .collect()
    }

    fn reject_optional_chain(&self, node: SyntaxNode<'_>) -> Result<()> {
        match children(node)
            .into_iter()
            .find(|child| SyntaxKind::of(*child) == SyntaxKind::OptionalChain)
        {
            Some(chain) => self.unexpected(chain),
            None => Ok(()),
        }
    }

    /// Elements of an array literal or array pattern, with `None` for holes.
    pub(super) fn collect_elements(
        &self,
        node: SyntaxNode<'_>,
        mut convert: impl FnMut(SyntaxNode<'_>) -> Result<Node>,
    ) -> Result<Vec<Option<Node>>> {
        let mut elements = Vec::new();
        // No element since the opening bracket or the last comma.
        let mut empty_slot = true;
        for child in children(node) {
            if child.is_named() {
                elements.push(Some(convert(child)?));
                empty_slot = false;
            } else if child.kind() == "," {
                if empty_slot {
                    elements.push(None);
                }
                empty_slot = true;
            }
        }
        Ok(elements)
    }

    fn convert_object(&self, node: SyntaxNode<'_>) -> Result<NodeKind> {
        let mut properties = Vec::new();
        for member in named_children(node) {
            let property = match SyntaxKind::of(member) {
                SyntaxKind::Pair => {
                    let (key, computed) = self.convert_property_key(self.field(member, "key")?)?;
                    NodeKind::Property {
                        key: Box::new(key),
                        value: Box::new(self.convert_expression(self.field(member, "value")?)?),
                        kind: PropertyKind::Init,
                        method: false,
                        shorthand: false,
                        computed,
                    }
                }
                SyntaxKind::ShorthandPropertyIdentifier => {
                    let name = self.identifier(member);
                    NodeKind::Property {
                        key: Box::new(name.clone()),
                        value: Box::new(name),
                        kind: PropertyKind::Init,
                        method: false,
                        shorthand: true,
                        computed: false,
                    }
                }
                SyntaxKind::MethodDefinition => self.convert_object_method(member)?,
                SyntaxKind::SpreadElement => NodeKind::SpreadElement {
                    argument: Box::new(self.convert_expression(self.first_named(member)?)?),
                },
                _ => return self.unexpected(member),
            };
            properties.push(self.wrap(member, property));
        }
        Ok(NodeKind::ObjectExpression { properties })
    }

    /// Convert a property name, reporting whether it was computed (`[expr]`).
    pub(super) fn convert_property_key(&self, node: SyntaxNode<'_>) -> Result<(Node, bool)> {
        match SyntaxKind::of(node) {
            SyntaxKind::ComputedPropertyName => {
                Ok((self.convert_expression(self.first_named(node)?)?, true))
            }
            SyntaxKind::PrivatePropertyIdentifier => Ok((self.private_identifier(node), false)),
            SyntaxKind::String | SyntaxKind::Number => Ok((self.convert_literal(node)?, false)),
            kind if kind.is_identifier() => Ok((self.identifier(node), false)),
            _ => self.unexpected(node),
        }
    }
}
