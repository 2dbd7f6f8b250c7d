//! Metadata filter expressions.
//!
//! A filter is a recursive tree: comparisons and set tests at the leaves,
//! `AND` / `OR` combinators inside. Expressions arrive as JSON objects with
//! a mandatory `"op"` key (`{"op": "EQ", "field": "type", "value": "A"}`)
//! and parse into [`FilterExpr`]; [`FilterExpr::to_json`] is the inverse.
//! Evaluation against a metadata record lives in
//! [`crate::search::filter::evaluate`].

use crate::document::MetadataValue;
use crate::error::StorexError;
use serde_json::{json, Value};

/// Single-value comparison operator for filter leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    /// Wire name of the operator.
    pub fn name(self) -> &'static str {
        match self {
            CompareOp::Eq => "EQ",
            CompareOp::Neq => "NEQ",
            CompareOp::Lt => "LT",
            CompareOp::Lte => "LTE",
            CompareOp::Gt => "GT",
            CompareOp::Gte => "GTE",
        }
    }
}

/// A parsed filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// Single-value comparison on one metadata field.
    Compare {
        field: String,
        op: CompareOp,
        value: MetadataValue,
    },
    /// True when the field's value equals any of the listed values.
    In {
        field: String,
        values: Vec<MetadataValue>,
    },
    /// True when the field's value equals none of the listed values.
    /// Holds vacuously when the field is absent.
    Nin {
        field: String,
        values: Vec<MetadataValue>,
    },
    /// Conjunction over children; short-circuits on the first false child.
    And(Vec<FilterExpr>),
    /// Disjunction over children; short-circuits on the first true child.
    Or(Vec<FilterExpr>),
}

impl FilterExpr {
    /// Parses a JSON-shaped filter expression.
    ///
    /// Fails with [`StorexError::InvalidFilter`] on an unknown operator,
    /// missing required keys, an empty `children` array, a non-array
    /// `values`, or a value that is not an integer, float, or string.
    pub fn parse(value: &Value) -> Result<FilterExpr, StorexError> {
        let object = value
            .as_object()
            .ok_or_else(|| invalid("filter expression must be a JSON object"))?;
        let op = object
            .get("op")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("missing or non-string \"op\""))?;

        match op {
            "AND" | "OR" => {
                let children = object
                    .get("children")
                    .and_then(Value::as_array)
                    .ok_or_else(|| invalid("AND/OR requires a \"children\" array"))?;
                if children.is_empty() {
                    return Err(invalid("\"children\" must be non-empty"));
                }
                let parsed: Vec<FilterExpr> = children
                    .iter()
                    .map(FilterExpr::parse)
                    .collect::<Result<_, _>>()?;
                Ok(match op {
                    "AND" => FilterExpr::And(parsed),
                    _ => FilterExpr::Or(parsed),
                })
            }
            "IN" | "NIN" => {
                let field = require_field(object)?;
                let raw = object
                    .get("values")
                    .and_then(Value::as_array)
                    .ok_or_else(|| invalid("IN/NIN requires a \"values\" array"))?;
                let values: Vec<MetadataValue> =
                    raw.iter().map(parse_primitive).collect::<Result<_, _>>()?;
                Ok(match op {
                    "IN" => FilterExpr::In { field, values },
                    _ => FilterExpr::Nin { field, values },
                })
            }
            "EQ" | "NEQ" | "LT" | "LTE" | "GT" | "GTE" => {
                let field = require_field(object)?;
                let value = object
                    .get("value")
                    .ok_or_else(|| invalid("comparison requires a \"value\""))?;
                let compare_op = match op {
                    "EQ" => CompareOp::Eq,
                    "NEQ" => CompareOp::Neq,
                    "LT" => CompareOp::Lt,
                    "LTE" => CompareOp::Lte,
                    "GT" => CompareOp::Gt,
                    _ => CompareOp::Gte,
                };
                Ok(FilterExpr::Compare {
                    field,
                    op: compare_op,
                    value: parse_primitive(value)?,
                })
            }
            other => Err(invalid(&format!("unknown operator {other:?}"))),
        }
    }

    /// Serializes back to the JSON shape accepted by [`FilterExpr::parse`].
    pub fn to_json(&self) -> Value {
        match self {
            FilterExpr::Compare { field, op, value } => json!({
                "op": op.name(),
                "field": field,
                "value": primitive_to_json(value),
            }),
            FilterExpr::In { field, values } => json!({
                "op": "IN",
                "field": field,
                "values": values.iter().map(primitive_to_json).collect::<Vec<_>>(),
            }),
            FilterExpr::Nin { field, values } => json!({
                "op": "NIN",
                "field": field,
                "values": values.iter().map(primitive_to_json).collect::<Vec<_>>(),
            }),
            FilterExpr::And(children) => json!({
                "op": "AND",
                "children": children.iter().map(FilterExpr::to_json).collect::<Vec<_>>(),
            }),
            FilterExpr::Or(children) => json!({
                "op": "OR",
                "children": children.iter().map(FilterExpr::to_json).collect::<Vec<_>>(),
            }),
        }
    }
}

fn invalid(message: &str) -> StorexError {
    StorexError::InvalidFilter(message.to_string())
}

fn require_field(object: &serde_json::Map<String, Value>) -> Result<String, StorexError> {
    object
        .get("field")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| invalid("missing or non-string \"field\""))
}

/// Types a JSON primitive: integer → `Integer`, other numbers → `Float`,
/// string → `String`. Everything else is rejected.
fn parse_primitive(value: &Value) -> Result<MetadataValue, StorexError> {
    match value {
        Value::String(s) => Ok(MetadataValue::String(s.clone())),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(MetadataValue::Integer(i))
            } else if let Some(f) = n.as_f64() {
                Ok(MetadataValue::Float(f as f32))
            } else {
                Err(invalid("unrepresentable number"))
            }
        }
        other => Err(invalid(&format!("unsupported value type: {other}"))),
    }
}

fn primitive_to_json(value: &MetadataValue) -> Value {
    match value {
        MetadataValue::Integer(i) => json!(i),
        MetadataValue::Float(f) => json!(f),
        MetadataValue::String(s) => json!(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_comparison() {
        let expr = FilterExpr::parse(&json!({"op": "EQ", "field": "type", "value": "A"})).unwrap();
        assert_eq!(
            expr,
            FilterExpr::Compare {
                field: "type".into(),
                op: CompareOp::Eq,
                value: MetadataValue::String("A".into()),
            }
        );
    }

    #[test]
    fn test_parse_types_numbers_from_their_form() {
        let int = FilterExpr::parse(&json!({"op": "GT", "field": "n", "value": 3})).unwrap();
        assert!(matches!(
            int,
            FilterExpr::Compare {
                value: MetadataValue::Integer(3),
                ..
            }
        ));
        let float = FilterExpr::parse(&json!({"op": "GT", "field": "n", "value": 3.5})).unwrap();
        assert!(matches!(
            float,
            FilterExpr::Compare {
                value: MetadataValue::Float(_),
                ..
            }
        ));
    }

    #[test]
    fn test_parse_in_and_nin() {
        let expr =
            FilterExpr::parse(&json!({"op": "IN", "field": "lang", "values": ["en", "fr"]}))
                .unwrap();
        assert_eq!(
            expr,
            FilterExpr::In {
                field: "lang".into(),
                values: vec![
                    MetadataValue::String("en".into()),
                    MetadataValue::String("fr".into())
                ],
            }
        );
        let expr =
            FilterExpr::parse(&json!({"op": "NIN", "field": "id", "values": [1, 2]})).unwrap();
        assert!(matches!(expr, FilterExpr::Nin { .. }));
    }

    #[test]
    fn test_parse_nested_combinators() {
        let expr = FilterExpr::parse(&json!({
            "op": "OR",
            "children": [
                {"op": "EQ", "field": "type", "value": "A"},
                {"op": "AND", "children": [
                    {"op": "GTE", "field": "score", "value": 10},
                    {"op": "LT", "field": "score", "value": 20},
                ]},
            ],
        }))
        .unwrap();
        let FilterExpr::Or(children) = expr else {
            panic!("expected OR");
        };
        assert_eq!(children.len(), 2);
        assert!(matches!(children[1], FilterExpr::And(_)));
    }

    #[test]
    fn test_parse_rejects_unknown_operator() {
        let err =
            FilterExpr::parse(&json!({"op": "LIKE", "field": "f", "value": "x"})).unwrap_err();
        assert!(matches!(err, StorexError::InvalidFilter(_)));
    }

    #[test]
    fn test_parse_rejects_missing_keys() {
        assert!(FilterExpr::parse(&json!({"field": "f", "value": 1})).is_err());
        assert!(FilterExpr::parse(&json!({"op": "EQ", "value": 1})).is_err());
        assert!(FilterExpr::parse(&json!({"op": "EQ", "field": "f"})).is_err());
        assert!(FilterExpr::parse(&json!({"op": "IN", "field": "f", "values": 3})).is_err());
        assert!(FilterExpr::parse(&json!({"op": "AND"})).is_err());
    }

    #[test]
    fn test_parse_rejects_empty_children() {
        assert!(FilterExpr::parse(&json!({"op": "AND", "children": []})).is_err());
    }

    #[test]
    fn test_parse_rejects_unsupported_value_types() {
        assert!(FilterExpr::parse(&json!({"op": "EQ", "field": "f", "value": true})).is_err());
        assert!(FilterExpr::parse(&json!({"op": "EQ", "field": "f", "value": null})).is_err());
        assert!(FilterExpr::parse(&json!({"op": "EQ", "field": "f", "value": [1]})).is_err());
        assert!(
            FilterExpr::parse(&json!({"op": "IN", "field": "f", "values": [{"x": 1}]})).is_err()
        );
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(FilterExpr::parse(&json!("EQ")).is_err());
        assert!(FilterExpr::parse(&json!(42)).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let exprs = [
            json!({"op": "EQ", "field": "type", "value": "A"}),
            json!({"op": "LTE", "field": "score", "value": 9}),
            json!({"op": "GT", "field": "ratio", "value": 0.25}),
            json!({"op": "NIN", "field": "id", "values": [1, 2, 3]}),
            json!({"op": "OR", "children": [
                {"op": "EQ", "field": "a", "value": 1},
                {"op": "AND", "children": [{"op": "NEQ", "field": "b", "value": "x"}]},
            ]}),
        ];
        for source in &exprs {
            let parsed = FilterExpr::parse(source).unwrap();
            let reparsed = FilterExpr::parse(&parsed.to_json()).unwrap();
            assert_eq!(parsed, reparsed);
        }
    }
}
