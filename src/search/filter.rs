//! Metadata filter evaluation.
//!
//! Evaluates a [`FilterExpr`] against a document's metadata record. A leaf
//! comparison on an absent field is false — `NIN` is the single exception
//! and holds vacuously. Ordering comparisons are defined only between two
//! values of the same numeric tag; strings are never ordered.

use crate::document::{Metadata, MetadataValue};
use crate::filter_types::{CompareOp, FilterExpr};
use std::cmp::Ordering;

/// Evaluates `expr` against `metadata`.
pub fn evaluate(metadata: &Metadata, expr: &FilterExpr) -> bool {
    match expr {
        FilterExpr::And(children) => children.iter().all(|child| evaluate(metadata, child)),
        FilterExpr::Or(children) => children.iter().any(|child| evaluate(metadata, child)),
        FilterExpr::Compare { field, op, value } => match metadata.get(field) {
            Some(found) => compare(found, *op, value),
            None => false,
        },
        FilterExpr::In { field, values } => metadata
            .get(field)
            .is_some_and(|found| values.iter().any(|candidate| candidate == found)),
        FilterExpr::Nin { field, values } => metadata
            .get(field)
            .map_or(true, |found| !values.iter().any(|candidate| candidate == found)),
    }
}

fn compare(found: &MetadataValue, op: CompareOp, against: &MetadataValue) -> bool {
    match op {
        CompareOp::Eq => found == against,
        CompareOp::Neq => found != against,
        CompareOp::Lt => numeric_cmp(found, against) == Some(Ordering::Less),
        CompareOp::Lte => matches!(
            numeric_cmp(found, against),
            Some(Ordering::Less | Ordering::Equal)
        ),
        CompareOp::Gt => numeric_cmp(found, against) == Some(Ordering::Greater),
        CompareOp::Gte => matches!(
            numeric_cmp(found, against),
            Some(Ordering::Greater | Ordering::Equal)
        ),
    }
}

/// Ordering between two values of the same numeric tag; `None` otherwise.
fn numeric_cmp(a: &MetadataValue, b: &MetadataValue) -> Option<Ordering> {
    match (a, b) {
        (MetadataValue::Integer(x), MetadataValue::Integer(y)) => Some(x.cmp(y)),
        (MetadataValue::Float(x), MetadataValue::Float(y)) => x.partial_cmp(y),
        _ => None,
    }
}
