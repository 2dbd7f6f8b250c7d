//! Core document types for storex.
//!
//! A `Document` pairs a dense embedding with a schema-less metadata record.
//! `MetadataValue` supports integer, float, and string values for use in
//! filtered search queries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A typed metadata value attached to a document.
///
/// Serialized untagged, so metadata records hold bare JSON primitives on
/// disk and in filter expressions. Equality is tag-strict: `Integer(1)`
/// never equals `Float(1.0)`, and no value ever equals one of another type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// 64-bit signed integer.
    Integer(i64),
    /// 32-bit floating-point number.
    Float(f32),
    /// UTF-8 string.
    String(String),
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Integer(value)
    }
}

impl From<f32> for MetadataValue {
    fn from(value: f32) -> Self {
        MetadataValue::Float(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::String(value)
    }
}

/// Schema-less metadata record: string keys to typed values.
pub type Metadata = HashMap<String, MetadataValue>;

/// A stored record: a dense embedding plus its metadata.
///
/// Documents carry no id of their own; a document's identity is its
/// position in the [`DocumentStore`](crate::store::DocumentStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Dense embedding of the store's fixed dimension.
    pub embedding: Vec<f32>,
    /// Arbitrary key-value metadata for filtering.
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Creates a new document from an embedding and metadata record.
    pub fn new(embedding: Vec<f32>, metadata: Metadata) -> Self {
        Self {
            embedding,
            metadata,
        }
    }
}
