//! Index engines and query dispatch.
//!
//! Four engine families share one search contract: produce a candidate set,
//! drop candidates failing the metadata filter, score survivors with the
//! exact metric, and keep the top K by descending score. [`VectorIndex`] is
//! the tagged dispatch over the families.

/// Random-projection forest (Annoy-style) approximate index.
pub mod annoy;
/// Exhaustive flat index.
pub mod flat;
/// Hierarchical navigable small world graph index.
pub mod hnsw;
/// Locality-sensitive hashing index.
pub mod lsh;

pub use annoy::{AnnoyConfig, AnnoyIndex};
pub use flat::FlatIndex;
pub use hnsw::{HnswConfig, HnswIndex};
pub use lsh::{LshConfig, LshIndex};

use crate::document::Metadata;
use crate::error::StorexError;
use crate::filter_types::FilterExpr;
use crate::search::filter::evaluate;
use crate::search::topk::top_k;
use crate::search::types::SearchHit;
use crate::similarity::Similarity;
use crate::store::DocumentStore;
use serde_json::Value;

/// One search engine over a frozen document store.
///
/// The variants trade accuracy for speed differently; all answer the same
/// query contract.
#[derive(Debug)]
pub enum VectorIndex<'a> {
    /// Exhaustive scan; exact.
    Flat(FlatIndex<'a>),
    /// Multi-table bit-signature hashing; approximate.
    Lsh(LshIndex<'a>),
    /// Layered proximity graph; approximate.
    Hnsw(HnswIndex<'a>),
    /// Random-projection forest; approximate.
    Annoy(AnnoyIndex<'a>),
}

impl<'a> VectorIndex<'a> {
    /// Top-K most similar documents to `query`, restricted to documents
    /// matching `filter`.
    ///
    /// Results come back sorted by strictly descending score, ties broken
    /// by lower `doc_idx`, at most `k` of them. See
    /// [`FlatIndex::search`] for the shared edge-case contract.
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        filter: Option<&Value>,
    ) -> Result<Vec<SearchHit<'a>>, StorexError> {
        match self {
            VectorIndex::Flat(index) => index.search(query, k, filter),
            VectorIndex::Lsh(index) => index.search(query, k, filter),
            VectorIndex::Hnsw(index) => index.search(query, k, filter),
            VectorIndex::Annoy(index) => index.search(query, k, filter),
        }
    }
}

/// Outcome of query-time filter parsing.
pub(crate) enum QueryFilter {
    /// No filter supplied: every document matches.
    All,
    /// A parsed expression to evaluate per document.
    Expr(FilterExpr),
    /// The expression failed to parse: no document matches, so a malformed
    /// filter never returns unfiltered records.
    Rejected,
}

impl QueryFilter {
    pub(crate) fn matches(&self, metadata: &Metadata) -> bool {
        match self {
            QueryFilter::All => true,
            QueryFilter::Expr(expr) => evaluate(metadata, expr),
            QueryFilter::Rejected => false,
        }
    }

    pub(crate) fn is_rejected(&self) -> bool {
        matches!(self, QueryFilter::Rejected)
    }
}

/// Parses a query-time filter. `None`, JSON `null`, and `{}` all mean
/// "no filter"; a malformed expression is logged and rejected.
pub(crate) fn parse_query_filter(filter: Option<&Value>) -> QueryFilter {
    let value = match filter {
        None => return QueryFilter::All,
        Some(v) if v.is_null() => return QueryFilter::All,
        Some(v) if v.as_object().is_some_and(|obj| obj.is_empty()) => return QueryFilter::All,
        Some(v) => v,
    };
    match FilterExpr::parse(value) {
        Ok(expr) => QueryFilter::Expr(expr),
        Err(err) => {
            tracing::warn!("rejecting filter expression: {err}");
            QueryFilter::Rejected
        }
    }
}

/// Validates the query vector against the store dimension.
pub(crate) fn check_query(store: &DocumentStore, query: &[f32]) -> Result<(), StorexError> {
    if query.len() != store.dimension() {
        return Err(StorexError::DimensionMismatch {
            expected: store.dimension(),
            actual: query.len(),
        });
    }
    Ok(())
}

/// Shared tail of every query: filter the candidate set, score survivors
/// with the exact metric, and keep the top `k` by descending score.
pub(crate) fn rerank<'a>(
    store: &'a DocumentStore,
    metric: Similarity,
    query: &[f32],
    candidates: impl IntoIterator<Item = u32>,
    filter: &QueryFilter,
    k: usize,
) -> Vec<SearchHit<'a>> {
    let mut scored: Vec<(f32, u32)> = Vec::new();
    for doc_idx in candidates {
        let Some(document) = store.get(doc_idx as usize) else {
            continue;
        };
        if !filter.matches(&document.metadata) {
            continue;
        }
        scored.push((metric.score_unchecked(query, &document.embedding), doc_idx));
    }
    top_k(&mut scored, k);
    scored
        .into_iter()
        .filter_map(|(score, doc_idx)| {
            store.get(doc_idx as usize).map(|document| SearchHit {
                doc_idx: doc_idx as usize,
                score,
                document,
            })
        })
        .collect()
}
