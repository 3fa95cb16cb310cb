//! Structural comparison of interchange trees.
//!
//! Two trees are structurally equal when they agree on every field except the
//! positional metadata (`loc` and `range`). [`diff`] performs the same
//! comparison on JSON trees, so a tree produced here can be checked against
//! one produced by any other ESTree parser.
//!
//! [`diff`] skips keys present only on the expected side: reference parsers
//! commonly attach extra fields (`start`, `end`, `raw` on more node types)
//! that have no counterpart here. [`StructureEq`] is strict and requires both
//! sides to have the same keys.

use super::Node;
use serde::Serialize;
use serde_json::Value;

/// Fields that never take part in a structural comparison.
const POSITION_KEYS: &[&str] = &["loc", "range"];

/// Trait for structural equality comparison.
///
/// Unlike `PartialEq`, this ignores source positions.
pub trait StructureEq {
    fn structure_eq(&self, other: &Self) -> bool;
}

impl StructureEq for Value {
    fn structure_eq(&self, other: &Self) -> bool {
        let mut out = Vec::new();
        diff_into(&mut Vec::new(), self, other, Keys::Strict, &mut out);
        out.is_empty()
    }
}

impl StructureEq for Node {
    fn structure_eq(&self, other: &Self) -> bool {
        match (serde_json::to_value(self), serde_json::to_value(other)) {
            (Ok(a), Ok(b)) => a.structure_eq(&b),
            _ => false,
        }
    }
}

impl<T: StructureEq> StructureEq for Vec<T> {
    fn structure_eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.structure_eq(b))
    }
}

impl<T: StructureEq> StructureEq for Option<T> {
    fn structure_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (None, None) => true,
            (Some(a), Some(b)) => a.structure_eq(b),
            _ => false,
        }
    }
}

/// A single mismatching leaf found by [`diff`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Difference {
    /// Dotted path from the root, e.g. `Program.body.0.expression.operator`.
    pub path: String,
    pub expected: Value,
    pub actual: Value,
}

impl std::fmt::Display for Difference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: expected {}, got {}", self.path, self.expected, self.actual)
    }
}

/// How keys present on only one side are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keys {
    /// Keys missing from `actual` are skipped.
    Reference,
    /// A key on either side alone is a difference.
    Strict,
}

/// Compare `actual` against the reference tree `expected`, ignoring positions.
pub fn diff(expected: &Value, actual: &Value) -> Vec<Difference> {
    let mut out = Vec::new();
    let mut path = vec!["Program".to_string()];
    diff_into(&mut path, expected, actual, Keys::Reference, &mut out);
    out
}

fn diff_into(
    path: &mut Vec<String>,
    expected: &Value,
    actual: &Value,
    keys: Keys,
    out: &mut Vec<Difference>,
) {
    match (expected, actual) {
        (Value::Object(exp), Value::Object(act)) => {
            for (key, exp_value) in exp {
                if POSITION_KEYS.contains(&key.as_str()) {
                    continue;
                }
                path.push(key.clone());
                match act.get(key) {
                    Some(act_value) => diff_into(path, exp_value, act_value, keys, out),
                    None if keys == Keys::Strict => out.push(Difference {
                        path: path.join("."),
                        expected: exp_value.clone(),
                        actual: Value::Null,
                    }),
                    None => {}
                }
                path.pop();
            }
            if keys == Keys::Strict {
                for (key, act_value) in act {
                    if !exp.contains_key(key) && !POSITION_KEYS.contains(&key.as_str()) {
                        path.push(key.clone());
                        out.push(Difference {
                            path: path.join("."),
                            expected: Value::Null,
                            actual: act_value.clone(),
                        });
                        path.pop();
                    }
                }
            }
        }
        (Value::Array(exp), Value::Array(act)) => {
            for (index, (exp_value, act_value)) in exp.iter().zip(act).enumerate() {
                path.push(index.to_string());
                diff_into(path, exp_value, act_value, keys, out);
                path.pop();
            }
            if exp.len() != act.len() {
                out.push(Difference {
                    path: format!("{}.length", path.join(".")),
                    expected: Value::from(exp.len()),
                    actual: Value::from(act.len()),
                });
            }
        }
        (Value::Number(a), Value::Number(b)) if a.as_f64() == b.as_f64() => {}
        _ if expected == actual => {}
        _ => out.push(Difference {
            path: path.join("."),
            expected: expected.clone(),
            actual: actual.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_positions_are_ignored() {
        let a = json!({"type": "Identifier", "name": "x", "range": [0, 1], "loc": {"start": 0}});
        let b = json!({"type": "Identifier", "name": "x", "range": [5, 6], "loc": null});
        assert!(diff(&a, &b).is_empty());
    }

    #[test]
    fn test_reports_path_of_mismatch() {
        let a = json!({"type": "Program", "body": [{"type": "ExpressionStatement", "expression": {"operator": "+"}}]});
        let b = json!({"type": "Program", "body": [{"type": "ExpressionStatement", "expression": {"operator": "-"}}]});
        let diffs = diff(&a, &b);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "Program.body.0.expression.operator");
        assert_eq!(diffs[0].expected, json!("+"));
        assert_eq!(diffs[0].actual, json!("-"));
        assert_eq!(
            diffs[0].to_string(),
            r#"Program.body.0.expression.operator: expected "+", got "-""#
        );
    }

    #[test]
    fn test_extra_reference_keys_are_skipped() {
        let a = json!({"type": "Literal", "value": 1, "start": 0, "end": 1});
        let b = json!({"type": "Literal", "value": 1});
        assert!(diff(&a, &b).is_empty());
    }

    #[test]
    fn test_structure_eq_requires_the_same_keys() {
        let a = json!({"type": "Literal", "value": 1, "range": [0, 1]});
        let b = json!({"type": "Literal", "value": 1, "raw": "1", "range": [3, 4]});
        assert!(!a.structure_eq(&b));
        assert!(!b.structure_eq(&a));
        assert!(a.structure_eq(&json!({"type": "Literal", "value": 1.0})));
    }

    #[test]
    fn test_array_length_mismatch() {
        let a = json!({"body": [1, 2]});
        let b = json!({"body": [1]});
        let diffs = diff(&a, &b);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "Program.body.length");
    }

    #[test]
    fn test_integer_and_float_numbers_compare_equal() {
        assert!(diff(&json!(16), &json!(16.0)).is_empty());
    }

    #[test]
    fn test_null_against_object_is_a_difference() {
        let diffs = diff(&json!({"id": null}), &json!({"id": {"type": "Identifier"}}));
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "Program.id");
    }
}
