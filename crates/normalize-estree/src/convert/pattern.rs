//! Destructuring patterns.
//!
//! Declared names (parameters, declarators, catch bindings) and assignment
//! targets share the same output shapes but accept different inputs, so
//! each has its own walker: an assignment target may be a member
//! expression, a parenthesized target or an object/array literal that is
//! reinterpreted as a pattern.

use super::{Converter, SyntaxNode, named_children};
use crate::error::Result;
use crate::estree::{Node, NodeKind, PropertyKind};
use crate::kinds::SyntaxKind;

impl Converter<'_> {
    /// Convert a declared name or destructuring pattern.
    ///
    /// Only pattern syntax is accepted here; member expressions cannot be
    /// declared.
    pub(super) fn convert_binding_pattern(&self, node: SyntaxNode<'_>) -> Result<Node> {
        let kind = match SyntaxKind::of(node) {
            kind if kind.is_identifier() => return Ok(self.identifier(node)),
            SyntaxKind::ObjectPattern => NodeKind::ObjectPattern {
                properties: named_children(node)
                    .into_iter()
                    .map(|member| self.convert_binding_property(member))
                    .collect::<Result<_>>()?,
            },
            SyntaxKind::ArrayPattern => NodeKind::ArrayPattern {
                elements: self
                    .collect_elements(node, |element| self.convert_binding_pattern(element))?,
            },
            SyntaxKind::AssignmentPattern => NodeKind::AssignmentPattern {
                left: Box::new(self.convert_binding_pattern(self.field(node, "left")?)?),
                right: Box::new(self.convert_expression(self.field(node, "right")?)?),
            },
            SyntaxKind::RestPattern => NodeKind::RestElement {
                argument: Box::new(self.convert_binding_pattern(self.first_named(node)?)?),
            },
            _ => return self.unexpected(node),
        };
        Ok(self.wrap(node, kind))
    }

    fn convert_binding_property(&self, member: SyntaxNode<'_>) -> Result<Node> {
        let kind = match SyntaxKind::of(member) {
            SyntaxKind::PairPattern => {
                let (key, computed) = self.convert_property_key(self.field(member, "key")?)?;
                let value = self.convert_binding_pattern(self.field(member, "value")?)?;
                property(key, value, false, computed)
            }
            SyntaxKind::ShorthandPropertyIdentifierPattern => {
                let name = self.identifier(member);
                property(name.clone(), name, true, false)
            }
            SyntaxKind::ObjectAssignmentPattern => {
                let key = self.convert_binding_pattern(self.field(member, "left")?)?;
                self.shorthand_with_default(member, key)?
            }
            SyntaxKind::RestPattern => NodeKind::RestElement {
                argument: Box::new(self.convert_binding_pattern(self.first_named(member)?)?),
            },
            _ => return self.unexpected(member),
        };
        Ok(self.wrap(member, kind))
    }

    /// Reinterpret an expression as an assignment target.
    ///
    /// Object and array literals become patterns, `a = 1` inside them
    /// becomes a default value and spreads become rest elements. Member
    /// expressions stay as they are.
    pub(super) fn convert_expression_as_pattern(&self, node: SyntaxNode<'_>) -> Result<Node> {
        let kind = match SyntaxKind::of(node) {
            kind if kind.is_identifier() => return Ok(self.identifier(node)),
            SyntaxKind::MemberExpression | SyntaxKind::SubscriptExpression => {
                return self.convert_expression(node);
            }
            SyntaxKind::ParenthesizedExpression => {
                return self.convert_expression_as_pattern(self.first_named(node)?);
            }
            kind if kind.is_type_wrapper() => {
                let operand = match named_children(node).into_iter().next() {
                    Some(operand) => operand,
                    None => return self.unexpected(node),
                };
                return self.convert_expression_as_pattern(operand);
            }
            SyntaxKind::Object | SyntaxKind::ObjectPattern => NodeKind::ObjectPattern {
                properties: named_children(node)
                    .into_iter()
                    .map(|member| self.convert_target_property(member))
                    .collect::<Result<_>>()?,
            },
            SyntaxKind::Array | SyntaxKind::ArrayPattern => NodeKind::ArrayPattern {
                elements: self
                    .collect_elements(node, |element| self.convert_expression_as_pattern(element))?,
            },
            SyntaxKind::AssignmentExpression | SyntaxKind::AssignmentPattern => {
                NodeKind::AssignmentPattern {
                    left: Box::new(self.convert_expression_as_pattern(self.field(node, "left")?)?),
                    right: Box::new(self.convert_expression(self.field(node, "right")?)?),
                }
            }
            SyntaxKind::SpreadElement | SyntaxKind::RestPattern => NodeKind::RestElement {
                argument: Box::new(self.convert_expression_as_pattern(self.first_named(node)?)?),
            },
            _ => return self.unexpected(node),
        };
        Ok(self.wrap(node, kind))
    }

    /// A member of an object literal (or pattern) used as an assignment target.
    fn convert_target_property(&self, member: SyntaxNode<'_>) -> Result<Node> {
        let kind = match SyntaxKind::of(member) {
            SyntaxKind::Pair | SyntaxKind::PairPattern => {
                let (key, computed) = self.convert_property_key(self.field(member, "key")?)?;
                let value = self.convert_expression_as_pattern(self.field(member, "value")?)?;
                property(key, value, false, computed)
            }
            SyntaxKind::ShorthandPropertyIdentifier
            | SyntaxKind::ShorthandPropertyIdentifierPattern => {
                let name = self.identifier(member);
                property(name.clone(), name, true, false)
            }
            SyntaxKind::ObjectAssignmentPattern => {
                let key = self.convert_expression_as_pattern(self.field(member, "left")?)?;
                self.shorthand_with_default(member, key)?
            }
            SyntaxKind::SpreadElement | SyntaxKind::RestPattern => NodeKind::RestElement {
                argument: Box::new(self.convert_expression_as_pattern(self.first_named(member)?)?),
            },
            _ => return self.unexpected(member),
        };
        Ok(self.wrap(member, kind))
    }

    /// `{ a = 1 }`: a shorthand property whose value carries the default.
    fn shorthand_with_default(&self, member: SyntaxNode<'_>, key: Node) -> Result<NodeKind> {
        let value = self.wrap(
            member,
            NodeKind::AssignmentPattern {
                left: Box::new(key.clone()),
                right: Box::new(self.convert_expression(self.field(member, "right")?)?),
            },
        );
        Ok(property(key, value, true, false))
    }
}

fn property(key: Node, value: Node, shorthand: bool, computed: bool) -> NodeKind {
    NodeKind::Property {
        key: Box::new(key),
        value: Box::new(value),
        kind: PropertyKind::Init,
        method: false,
        shorthand,
        computed,
    }
}

#[cfg(test)]
mod tests {
    use crate::{ConvertOptions, check_and_convert};
    use serde_json::{Value, json};

    fn first(source: &str) -> Value {
        let program = check_and_convert(source, &ConvertOptions::default()).unwrap();
        serde_json::to_value(program).unwrap()["body"][0].clone()
    }

    #[test]
    fn test_object_assignment_target() {
        let expr = first("({a, b: c} = obj);")["expression"].clone();
        assert_eq!(expr["type"], "AssignmentExpression");
        let left = &expr["left"];
        assert_eq!(left["type"], "ObjectPattern");
        let props = left["properties"].as_array().unwrap();
        assert_eq!(props[0]["shorthand"], true);
        assert_eq!(props[0]["value"]["name"], "a");
        assert_eq!(props[1]["shorthand"], false);
        assert_eq!(props[1]["key"]["name"], "b");
        assert_eq!(props[1]["value"]["type"], "Identifier");
        assert_eq!(props[1]["value"]["name"], "c");
    }

    #[test]
    fn test_array_assignment_target_with_rest_and_holes() {
        let left = first("[a, , ...rest] = xs;")["expression"]["left"].clone();
        assert_eq!(left["type"], "ArrayPattern");
        let elements = left["elements"].as_array().unwrap();
        assert_eq!(elements[0]["name"], "a");
        assert_eq!(elements[1], Value::Null);
        assert_eq!(elements[2]["type"], "RestElement");
        assert_eq!(elements[2]["argument"]["name"], "rest");
    }

    #[test]
    fn test_nested_targets_keep_members() {
        let left = first("({ a: this.x, b: [y = 1] } = o);")["expression"]["left"].clone();
        let props = left["properties"].as_array().unwrap();
        assert_eq!(props[0]["value"]["type"], "MemberExpression");
        let inner = &props[1]["value"];
        assert_eq!(inner["type"], "ArrayPattern");
        assert_eq!(inner["elements"][0]["type"], "AssignmentPattern");
        assert_eq!(inner["elements"][0]["right"]["value"], 1);
    }

    #[test]
    fn test_declared_patterns() {
        let decl = first("const { a = 1, b: { c }, ...rest } = obj;");
        let id = &decl["declarations"][0]["id"];
        assert_eq!(id["type"], "ObjectPattern");
        let props = id["properties"].as_array().unwrap();
        assert_eq!(props[0]["shorthand"], true);
        assert_eq!(props[0]["value"]["type"], "AssignmentPattern");
        assert_eq!(props[0]["value"]["left"]["name"], "a");
        assert_eq!(props[1]["value"]["type"], "ObjectPattern");
        assert_eq!(props[2]["type"], "RestElement");
    }

    #[test]
    fn test_computed_pattern_key() {
        let decl = first("let { [k]: v } = o;");
        let prop = &decl["declarations"][0]["id"]["properties"][0];
        assert_eq!(prop["computed"], true);
        assert_eq!(prop["key"]["name"], "k");
    }

    #[test]
    fn test_for_of_target_pattern() {
        let stmt = first("for ([k, v] of entries) {}");
        assert_eq!(stmt["left"]["type"], "ArrayPattern");
        assert_eq!(stmt["left"]["elements"][0]["name"], "k");
        assert_eq!(stmt["left"]["elements"][1]["name"], "v");
    }

    #[test]
    fn test_spread_in_object_target_becomes_rest() {
        let left = first("({ a, ...others } = o);")["expression"]["left"].clone();
        assert_eq!(left["properties"][1]["type"], "RestElement");
        assert_eq!(left["properties"][1]["argument"]["name"], "others");
    }

    #[test]
    fn test_parenthesized_target() {
        let expr = first("(a) = 1;")["expression"].clone();
        assert_eq!(expr["left"]["type"], "Identifier");
        assert_eq!(expr["left"]["range"], json!([1, 2]));
    }
}
