//! End-to-end conversion tests through the public API.

use normalize_estree::{
    ConvertError, ConvertOptions, SourceType, StructureEq, check_and_convert, diff,
};
use serde_json::{Value, json};

fn convert(source: &str) -> Value {
    let program = check_and_convert(source, &ConvertOptions::default()).unwrap();
    serde_json::to_value(program).unwrap()
}

/// Every node in `value`, paired with its parent's range.
fn visit_nodes<'v>(value: &'v Value, parent: Option<&'v Value>, f: &mut impl FnMut(&'v Value, Option<&'v Value>)) {
    match value {
        Value::Object(map) => {
            let is_node = map.contains_key("type");
            if is_node {
                f(value, parent);
            }
            let next_parent = if is_node { Some(value) } else { parent };
            for (key, child) in map {
                if key != "loc" && key != "range" {
                    visit_nodes(child, next_parent, f);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                visit_nodes(item, parent, f);
            }
        }
        _ => {}
    }
}

fn range(node: &Value) -> (u64, u64) {
    let range = node["range"].as_array().unwrap();
    (range[0].as_u64().unwrap(), range[1].as_u64().unwrap())
}

#[test]
fn comma_expressions_are_flattened() {
    let program = convert("a, b, c;");
    let expr = &program["body"][0]["expression"];
    assert_eq!(expr["type"], "SequenceExpression");
    let names: Vec<_> = expr["expressions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn template_has_one_more_quasi_than_expressions() {
    let program = convert("`a${x}b${y}c`;");
    let template = &program["body"][0]["expression"];
    assert_eq!(template["type"], "TemplateLiteral");
    let quasis = template["quasis"].as_array().unwrap();
    assert_eq!(template["expressions"].as_array().unwrap().len(), 2);
    assert_eq!(quasis.len(), 3);
    assert_eq!(quasis[0]["value"]["raw"], "a");
    assert_eq!(quasis[0]["tail"], false);
    assert_eq!(quasis[2]["value"]["cooked"], "c");
    assert_eq!(quasis[2]["tail"], true);
}

#[test]
fn hex_literal_keeps_raw_text() {
    let program = convert("0x10;");
    let literal = &program["body"][0]["expression"];
    assert_eq!(literal["value"], 16);
    assert_eq!(literal["raw"], "0x10");
}

#[test]
fn unsupported_construct_reports_position() {
    let err = check_and_convert("let a = 1;\n  interface Foo {}", &ConvertOptions::default())
        .unwrap_err();
    assert_eq!(
        err,
        ConvertError::UnsupportedConstruct {
            kind: "interface_declaration".into(),
            line: 2,
            column: 2,
        }
    );
    assert_eq!(
        err.to_string(),
        "Unexpected node type interface_declaration (2:2)"
    );
}

#[test]
fn enum_is_rejected() {
    let err = check_and_convert("enum E { A }", &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::UnsupportedConstruct { line: 1, column: 0, .. }));
}

#[test]
fn every_node_is_located_inside_its_parent() {
    let source = "import { a as b } from './m';\n\
                  export const f = async (x = 1, ...rest) => { await x; };\n\
                  label: for (let i = 0; i < 3; i++) { if (i) continue label; else break; }\n\
                  try { f(`t${b}`); } catch ({ message }) { throw message; } finally {}\n\
                  export default class extends Object { static *gen() { yield* [1, , 2]; } }\n";
    let options = ConvertOptions::default().with_file_name("sample.ts");
    let program = serde_json::to_value(check_and_convert(source, &options).unwrap()).unwrap();
    assert_eq!(range(&program), (0, source.len() as u64));

    let mut count = 0;
    visit_nodes(&program, None, &mut |node, parent| {
        count += 1;
        let (start, end) = range(node);
        assert!(start <= end, "bad range on {}", node["type"]);
        assert_eq!(node["loc"]["source"], "sample.ts");
        let start_line = node["loc"]["start"]["line"].as_u64().unwrap();
        let end_line = node["loc"]["end"]["line"].as_u64().unwrap();
        assert!(start_line >= 1 && start_line <= end_line);
        if let Some(parent) = parent {
            let (outer_start, outer_end) = range(parent);
            assert!(
                outer_start <= start && end <= outer_end,
                "{} escapes {}",
                node["type"],
                parent["type"]
            );
        }
    });
    assert!(count > 50);
}

#[test]
fn node_text_has_no_surrounding_trivia() {
    let source = "function f() {} // TRIVIA\n\
                  if (a) {} // TRIVIA\n\
                  while (a) {} /* TRIVIA */\n\
                  class C { m() {} } // TRIVIA\n\
                  for (const x of xs) {} // TRIVIA\n\
                  let g = () => {}; // TRIVIA\n\
                  try {} catch {} finally {} /* TRIVIA */\n\
                  g();\n";
    let program = convert(source);
    visit_nodes(&program, None, &mut |node, _| {
        if matches!(node["type"].as_str(), Some("Program" | "ClassBody")) {
            return;
        }
        let (start, end) = range(node);
        let text = &source[start as usize..end as usize];
        assert!(!text.contains("TRIVIA"), "{} covers a comment: {text:?}", node["type"]);
        assert_eq!(text.trim(), text, "{} has surrounding whitespace", node["type"]);
    });
    let body = program["body"].as_array().unwrap();
    assert_eq!(range(&body[0]), (0, 15));
    assert_eq!(range(&body[0]["body"]), (13, 15));
}

#[test]
fn default_keyword_in_module_specifiers() {
    let program = convert("import { default as x } from 'm';\nexport { x as default };");
    assert_eq!(program["body"][0]["specifiers"][0]["imported"]["name"], "default");
    assert_eq!(program["body"][1]["specifiers"][0]["exported"]["name"], "default");
}

#[test]
fn valid_regex_keeps_its_value() {
    let program = convert("/(?<=a)b/u;\n/(/;");
    assert_eq!(program["body"][0]["expression"]["value"], json!({}));
    assert_eq!(program["body"][1]["expression"]["value"], Value::Null);
    assert_eq!(program["body"][1]["expression"]["regex"]["pattern"], "(");
}

#[test]
fn conversion_is_deterministic() {
    let source = "const { a, b: [c] } = obj; a.b ?? c;";
    let options = ConvertOptions::default();
    let first = check_and_convert(source, &options);
    let second = check_and_convert(source, &options);
    assert_eq!(first, second);
}

#[test]
fn type_annotations_do_not_change_structure() {
    let options = ConvertOptions::default();
    let typed = check_and_convert(
        "function f<T>(x: T, y?: number): T { return x as T; }",
        &options,
    )
    .unwrap();
    let plain = check_and_convert("function f(x, y) { return x; }", &options).unwrap();
    assert!(typed.structure_eq(&plain));
    assert_ne!(typed, plain);
}

#[test]
fn diff_against_reference_tree() {
    let actual = convert("x + 1;");
    let reference = json!({
        "type": "Program",
        "sourceType": "module",
        "start": 0,
        "body": [{
            "type": "ExpressionStatement",
            "expression": {
                "type": "BinaryExpression",
                "operator": "-",
                "left": {"type": "Identifier", "name": "x"},
                "right": {"type": "Literal", "value": 1.0, "raw": "1"}
            }
        }]
    });
    let differences = diff(&reference, &actual);
    assert_eq!(differences.len(), 1);
    assert_eq!(differences[0].path, "Program.body.0.expression.operator");
    assert!(diff(&actual, &actual).is_empty());
}

#[test]
fn script_source_type() {
    let options = ConvertOptions::default().with_source_type(SourceType::Script);
    let program = serde_json::to_value(check_and_convert("var x;", &options).unwrap()).unwrap();
    assert_eq!(program["sourceType"], "script");
    assert_eq!(program["body"][0]["kind"], "var");
    assert_eq!(program["body"][0]["declarations"][0]["init"], Value::Null);
}

#[test]
fn hash_bang_is_skipped() {
    let program = convert("#!/usr/bin/env node\nfoo();");
    let body = program["body"].as_array().unwrap();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["loc"]["start"]["line"], 2);
}
