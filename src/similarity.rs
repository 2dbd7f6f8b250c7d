//! Similarity metrics.
//!
//! Three pure metrics over `f32` slices, all higher-is-better so every
//! index ranks by descending score. Indexes that need a distance internally
//! derive it as `1 - score`; that convention never reaches the public API.

use crate::error::StorexError;
use serde::{Deserialize, Serialize};

/// Similarity metric used to score a document embedding against a query.
///
/// All variants return a score where **higher is better** (more similar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Similarity {
    /// Raw dot product `Σ aᵢ·bᵢ`. Unbounded, no normalization.
    DotProduct,
    /// Cosine similarity in \[-1, 1\]. A zero-norm vector scores 0.0
    /// instead of producing NaN.
    Cosine,
    /// `exp(-‖a - b‖)`, mapping Euclidean distance into (0, 1\].
    Euclidean,
}

impl Similarity {
    /// Scores two vectors.
    ///
    /// Fails with [`StorexError::DimensionMismatch`] when the lengths
    /// differ or either vector is empty.
    pub fn score(&self, a: &[f32], b: &[f32]) -> Result<f32, StorexError> {
        if a.is_empty() || b.is_empty() || a.len() != b.len() {
            return Err(StorexError::DimensionMismatch {
                expected: a.len(),
                actual: b.len(),
            });
        }
        Ok(self.score_unchecked(a, b))
    }

    /// Scores two vectors whose lengths were already validated by the store.
    pub(crate) fn score_unchecked(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Similarity::DotProduct => dot(a, b),
            Similarity::Cosine => {
                let denominator = norm(a) * norm(b);
                if denominator == 0.0 {
                    0.0
                } else {
                    dot(a, b) / denominator
                }
            }
            Similarity::Euclidean => (-euclidean_distance(a, b)).exp(),
        }
    }

    /// Distance form used by graph traversal: `1 - score`, lower is closer.
    pub(crate) fn distance_unchecked(&self, a: &[f32], b: &[f32]) -> f32 {
        1.0 - self.score_unchecked(a, b)
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn norm(a: &[f32]) -> f32 {
    a.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
