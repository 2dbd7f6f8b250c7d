//! Crate error types.
//!
//! Only two failures surface to callers: an embedding of the wrong length
//! and a filter expression that does not parse. Cosine on a zero vector is
//! recovered locally (score 0.0), and an empty result set is an ordinary
//! value, never an error.

use thiserror::Error;

/// Errors surfaced by store construction and the search path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorexError {
    /// Query or document embedding length is incompatible with the store
    /// dimension, or an embedding is empty.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Filter expression rejected by the parser: unknown operator, missing
    /// required key, or unsupported value type.
    #[error("invalid filter expression: {0}")]
    InvalidFilter(String),
}
