//! Functions, parameters, classes and class members.
//!
//! Type annotations, type parameters, return types and accessibility
//! modifiers are erased.

use super::{Converter, SyntaxNode, children, end_of, named_children, start_of, token};
use crate::error::Result;
use crate::estree::{Class, Function, MethodKind, Node, NodeKind, PropertyKind};
use crate::kinds::SyntaxKind;

/// What to do with a function's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum IdPolicy {
    /// The name is required (declarations).
    Enforce,
    /// Use the name when there is one (function expressions).
    AllowMissing,
    /// Never emit an id (arrows, methods).
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FunctionType {
    Declaration,
    Expression,
    Arrow,
}

/// Modifier tokens in front of a function or member name.
#[derive(Debug, Default, Clone, Copy)]
struct Modifiers {
    is_static: bool,
    is_async: bool,
    generator: bool,
    getter: bool,
    setter: bool,
}

impl Converter<'_> {
    pub(super) fn convert_function(
        &self,
        node: SyntaxNode<'_>,
        ty: FunctionType,
        ids: IdPolicy,
    ) -> Result<Node> {
        let id = match ids {
            IdPolicy::Enforce => Some(self.identifier(self.field(node, "name")?)),
            IdPolicy::AllowMissing => node
                .child_by_field_name("name")
                .map(|name| self.identifier(name)),
            IdPolicy::Ignore => None,
        };

        let params = match node.child_by_field_name("parameter") {
            Some(param) => vec![self.convert_binding_pattern(param)?],
            None => self.convert_parameters(self.field(node, "parameters")?)?,
        };

        let body = self.field(node, "body")?;
        let expression = SyntaxKind::of(body) != SyntaxKind::StatementBlock;
        let body = match (expression, ty) {
            (false, _) => self.convert_block(body)?,
            (true, FunctionType::Arrow) => self.convert_expression(body)?,
            (true, _) => return self.unexpected(body),
        };

        let modifiers = self.modifiers(node, None);
        let function = Function {
            id: id.map(Box::new),
            params,
            body: Box::new(body),
            generator: modifiers.generator
                || matches!(
                    SyntaxKind::of(node),
                    SyntaxKind::GeneratorFunction | SyntaxKind::GeneratorFunctionDeclaration
                ),
            is_async: modifiers.is_async,
            expression,
        };
        let kind = match ty {
            FunctionType::Declaration => NodeKind::FunctionDeclaration(function),
            FunctionType::Expression => NodeKind::FunctionExpression(function),
            FunctionType::Arrow => NodeKind::ArrowFunctionExpression(function),
        };
        Ok(self.wrap(node, kind))
    }

    /// Scan the anonymous modifier tokens of a node, stopping at `name`.
    fn modifiers(&self, node: SyntaxNode<'_>, name: Option<SyntaxNode<'_>>) -> Modifiers {
        let mut modifiers = Modifiers::default();
        for child in children(node) {
            if name.is_some_and(|name| child.start_byte() >= name.start_byte()) {
                break;
            }
            if child.is_named() {
                // Everything after the parameter list is body or type syntax.
                if SyntaxKind::of(child) == SyntaxKind::FormalParameters {
                    break;
                }
                continue;
            }
            match child.kind() {
                "async" => modifiers.is_async = true,
                "*" => modifiers.generator = true,
                "get" => modifiers.getter = true,
                "set" => modifiers.setter = true,
                "static" => modifiers.is_static = true,
                // Some grammar releases lex `static get` as one token.
                "static get" => {
                    modifiers.is_static = true;
                    modifiers.getter = true;
                }
                _ => {}
            }
        }
        modifiers
    }

    fn convert_parameters(&self, node: SyntaxNode<'_>) -> Result<Vec<Node>> {
        if SyntaxKind::of(node) != SyntaxKind::FormalParameters {
            return self.unexpected(node);
        }
        let mut params = Vec::new();
        for param in named_children(node) {
            match SyntaxKind::of(param) {
                SyntaxKind::RequiredParameter | SyntaxKind::OptionalParameter => {
                    if let Some(decorator) = named_children(param)
                        .into_iter()
                        .find(|child| child.kind() == "decorator")
                    {
                        return self.unexpected(decorator);
                    }
                    let pattern = self.field(param, "pattern")?;
                    // `this` parameters only carry a type.
                    if SyntaxKind::of(pattern) == SyntaxKind::This {
                        continue;
                    }
                    let left = self.convert_binding_pattern(pattern)?;
                    params.push(match param.child_by_field_name("value") {
                        Some(value) => self.wrap_pos(
                            start_of(pattern),
                            end_of(value),
                            NodeKind::AssignmentPattern {
                                left: Box::new(left),
                                right: Box::new(self.convert_expression(value)?),
                            },
                        ),
                        None => left,
                    });
                }
                _ => params.push(self.convert_binding_pattern(param)?),
            }
        }
        Ok(params)
    }

    /// The function value of a method, spanning its parameter list and body.
    fn convert_method_value(&self, node: SyntaxNode<'_>, modifiers: Modifiers) -> Result<Node> {
        let parameters = self.field(node, "parameters")?;
        let body = self.field(node, "body")?;
        let function = Function {
            id: None,
            params: self.convert_parameters(parameters)?,
            body: Box::new(self.convert_block(body)?),
            generator: modifiers.generator,
            is_async: modifiers.is_async,
            expression: false,
        };
        Ok(self.wrap_pos(
            start_of(parameters),
            end_of(node),
            NodeKind::FunctionExpression(function),
        ))
    }

    /// A method or accessor in an object literal.
    pub(super) fn convert_object_method(&self, node: SyntaxNode<'_>) -> Result<NodeKind> {
        let name = self.field(node, "name")?;
        let (key, computed) = self.convert_property_key(name)?;
        let modifiers = self.modifiers(node, Some(name));
        let kind = if modifiers.getter {
            PropertyKind::Get
        } else if modifiers.setter {
            PropertyKind::Set
        } else {
            PropertyKind::Init
        };
        Ok(NodeKind::Property {
            key: Box::new(key),
            value: Box::new(self.convert_method_value(node, modifiers)?),
            kind,
            method: kind == PropertyKind::Init,
            shorthand: false,
            computed,
        })
    }

    pub(super) fn convert_class(&self, node: SyntaxNode<'_>, declaration: bool) -> Result<Node> {
        if let Some(decorator) = named_children(node)
            .into_iter()
            .find(|child| child.kind() == "decorator")
        {
            return self.unexpected(decorator);
        }
        let id = match node.child_by_field_name("name") {
            Some(name) => Some(Box::new(self.identifier(name))),
            None if declaration => return self.unexpected(node),
            None => None,
        };
        let super_class = match self.super_class(node)? {
            Some(expr) => Some(Box::new(self.convert_expression(expr)?)),
            None => None,
        };
        let class = Class {
            id,
            super_class,
            body: Box::new(self.convert_class_body(self.field(node, "body")?)?),
        };
        Ok(self.wrap(
            node,
            if declaration {
                NodeKind::ClassDeclaration(class)
            } else {
                NodeKind::ClassExpression(class)
            },
        ))
    }

    /// The first value of the first `extends` clause; `implements` is ignored.
    fn super_class<'t>(&self, node: SyntaxNode<'t>) -> Result<Option<SyntaxNode<'t>>> {
        let Some(heritage) = named_children(node)
            .into_iter()
            .find(|child| SyntaxKind::of(*child) == SyntaxKind::ClassHeritage)
        else {
            return Ok(None);
        };
        for clause in named_children(heritage) {
            match SyntaxKind::of(clause) {
                SyntaxKind::ExtendsClause => {
                    return match clause.child_by_field_name("value") {
                        Some(value) => Ok(Some(value)),
                        None => self.first_named(clause).map(Some),
                    };
                }
                // `implements_clause`
                SyntaxKind::Other => {}
                // Grammars without an extends clause node hold the expression directly.
                _ => return Ok(Some(clause)),
            }
        }
        Ok(None)
    }

    /// Class body, spanning the text between its braces.
    fn convert_class_body(&self, node: SyntaxNode<'_>) -> Result<Node> {
        if SyntaxKind::of(node) != SyntaxKind::ClassBody {
            return self.unexpected(node);
        }
        let mut body = Vec::new();
        for member in named_children(node) {
            match SyntaxKind::of(member) {
                SyntaxKind::MethodDefinition => body.push(self.convert_method_definition(member)?),
                // Field declarations, index signatures, decorators, static
                // blocks and abstract/overload signatures.
                _ => return self.unexpected(member),
            }
        }
        let start = token(node, "{").map_or(node.start_byte(), |open| open.end_byte());
        let end = token(node, "}").map_or(node.end_byte(), |close| close.start_byte());
        Ok(self.wrap_pos(start, end, NodeKind::ClassBody { body }))
    }

    fn convert_method_definition(&self, node: SyntaxNode<'_>) -> Result<Node> {
        let name = self.field(node, "name")?;
        let modifiers = self.modifiers(node, Some(name));
        let (key, computed) = self.convert_property_key(name)?;
        let named_constructor = match SyntaxKind::of(name) {
            SyntaxKind::String => matches!(self.text(name), "'constructor'" | "\"constructor\""),
            kind => kind.is_identifier() && self.text(name) == "constructor",
        };
        let (kind, key) = if modifiers.getter {
            (MethodKind::Get, key)
        } else if modifiers.setter {
            (MethodKind::Set, key)
        } else if named_constructor && !modifiers.is_static && !computed {
            let key = self.wrap(
                name,
                NodeKind::Identifier {
                    name: "constructor".to_string(),
                },
            );
            (MethodKind::Constructor, key)
        } else {
            (MethodKind::Method, key)
        };
        Ok(self.wrap(
            node,
            NodeKind::MethodDefinition {
                key: Box::new(key),
                value: Box::new(self.convert_method_value(node, modifiers)?),
                kind,
                computed,
                is_static: modifiers.is_static,
            },
        ))
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
    fn test_function_declaration() {
        let decl = first("async function* f(a: number, b = 1, ...rest: string[]): void {}");
        assert_eq!(decl["type"], "FunctionDeclaration");
        assert_eq!(decl["id"]["name"], "f");
        assert_eq!(decl["async"], true);
        assert_eq!(decl["generator"], true);
        assert_eq!(decl["expression"], false);
        let params = decl["params"].as_array().unwrap();
        assert_eq!(params[0]["type"], "Identifier");
        assert_eq!(params[1]["type"], "AssignmentPattern");
        assert_eq!(params[1]["right"]["value"], 1);
        assert_eq!(params[2]["type"], "RestElement");
        assert_eq!(params[2]["argument"]["name"], "rest");
    }

    #[test]
    fn test_this_parameter_is_dropped() {
        let decl = first("function f(this: Window, x) {}");
        assert_eq!(decl["params"].as_array().unwrap().len(), 1);
        assert_eq!(decl["params"][0]["name"], "x");
    }

    #[test]
    fn test_arrow_functions() {
        let arrow = first("x => x + 1;")["expression"].clone();
        assert_eq!(arrow["type"], "ArrowFunctionExpression");
        assert_eq!(arrow["id"], Value::Null);
        assert_eq!(arrow["expression"], true);
        assert_eq!(arrow["params"][0]["name"], "x");
        assert_eq!(arrow["body"]["type"], "BinaryExpression");

        let arrow = first("async (a, { b }) => { return b; };")["expression"].clone();
        assert_eq!(arrow["async"], true);
        assert_eq!(arrow["expression"], false);
        assert_eq!(arrow["params"][1]["type"], "ObjectPattern");
    }

    #[test]
    fn test_function_expression_names() {
        let named = first("(function named() {});")["expression"].clone();
        assert_eq!(named["type"], "FunctionExpression");
        assert_eq!(named["id"]["name"], "named");
        let anonymous = first("(function () {});")["expression"].clone();
        assert_eq!(anonymous["id"], Value::Null);
    }

    #[test]
    fn test_class_members() {
        let class = first(
            "class A<T> extends B implements C {\n  constructor(x) {}\n  static make() {}\n  get v() { return 1; }\n  set v(value) {}\n  [key]() {}\n  ;\n}",
        );
        assert_eq!(class["type"], "ClassDeclaration");
        assert_eq!(class["id"]["name"], "A");
        assert_eq!(class["superClass"]["name"], "B");
        let members = class["body"]["body"].as_array().unwrap();
        assert_eq!(members.len(), 5);
        assert_eq!(members[0]["kind"], "constructor");
        assert_eq!(members[0]["key"]["name"], "constructor");
        assert_eq!(members[1]["static"], true);
        assert_eq!(members[1]["kind"], "method");
        assert_eq!(members[2]["kind"], "get");
        assert_eq!(members[3]["kind"], "set");
        assert_eq!(members[4]["computed"], true);
    }

    #[test]
    fn test_static_constructor_is_a_method() {
        let class = first("class A { static constructor() {} }");
        assert_eq!(class["body"]["body"][0]["kind"], "method");
        assert_eq!(class["body"]["body"][0]["static"], true);
    }

    #[test]
    fn test_class_body_spans_between_braces() {
        let source = "class A { m() {} }";
        let class = first(source);
        assert_eq!(class["body"]["range"], json!([9, 17]));
    }

    #[test]
    fn test_method_value_starts_at_parameters() {
        let source = "class A { m(a) {} }";
        let value = first(source)["body"]["body"][0]["value"].clone();
        assert_eq!(value["type"], "FunctionExpression");
        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["range"], json!([11, 17]));
    }

    #[test]
    fn test_accessibility_modifiers_are_erased() {
        let class = first("class A { private async m() {} }");
        let member = &class["body"]["body"][0];
        assert_eq!(member["kind"], "method");
        assert_eq!(member["value"]["async"], true);
    }

    #[test]
    fn test_method_named_get() {
        let class = first("class A { get() {} }");
        assert_eq!(class["body"]["body"][0]["kind"], "method");
        assert_eq!(class["body"]["body"][0]["key"]["name"], "get");
    }

    #[test]
    fn test_class_expression_without_name() {
        let class = first("(class extends Base {});")["expression"].clone();
        assert_eq!(class["type"], "ClassExpression");
        assert_eq!(class["id"], Value::Null);
        assert_eq!(class["superClass"]["name"], "Base");
    }

    #[test]
    fn test_unsupported_class_members() {
        for source in [
            "class A { x = 1; }",
            "class A { [key: string]: number; }",
            "class A { static { init(); } }",
        ] {
            let err = check_and_convert(source, &ConvertOptions::default()).unwrap_err();
            assert!(
                err.to_string().starts_with("Unexpected node type"),
                "{source}: {err}"
            );
        }
    }
}
