//! Exhaustive flat index.
//!
//! Scores every document in the store against the query. O(N·d) per query,
//! exact by construction; the accuracy baseline the approximate engines are
//! measured against.

use crate::error::StorexError;
use crate::index::{check_query, parse_query_filter, rerank};
use crate::search::types::SearchHit;
use crate::similarity::Similarity;
use crate::store::DocumentStore;
use serde_json::Value;

/// Full-scan search engine over a frozen store.
#[derive(Debug)]
pub struct FlatIndex<'a> {
    store: &'a DocumentStore,
    metric: Similarity,
}

impl<'a> FlatIndex<'a> {
    /// Creates a flat index. No auxiliary structure is built.
    pub fn new(store: &'a DocumentStore, metric: Similarity) -> Self {
        Self { store, metric }
    }

    /// Exhaustive top-K search.
    ///
    /// Edge cases, shared by every engine: an empty store or `k = 0`
    /// returns an empty vector; `k >= N` returns all matching documents
    /// sorted; a filter that fails to parse returns an empty vector (logged,
    /// not an error); a query of the wrong length fails with
    /// [`StorexError::DimensionMismatch`].
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        filter: Option<&Value>,
    ) -> Result<Vec<SearchHit<'a>>, StorexError> {
        if self.store.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        check_query(self.store, query)?;
        let filter = parse_query_filter(filter);
        if filter.is_rejected() {
            return Ok(Vec::new());
        }
        let candidates = 0..self.store.len() as u32;
        Ok(rerank(self.store, self.metric, query, candidates, &filter, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, Metadata, MetadataValue};
    use serde_json::json;

    fn store_of(rows: Vec<(Vec<f32>, i64, &str)>) -> DocumentStore {
        let mut store = DocumentStore::new();
        for (embedding, id, kind) in rows {
            let metadata = Metadata::from([
                ("id".to_string(), MetadataValue::Integer(id)),
                ("type".to_string(), MetadataValue::String(kind.to_string())),
            ]);
            store.push(Document::new(embedding, metadata)).unwrap();
        }
        store
    }

    fn corpus() -> DocumentStore {
        store_of(vec![
            (vec![1.0, 0.0], 1, "A"),
            (vec![0.0, 1.0], 2, "B"),
            (vec![0.7, 0.7], 3, "C"),
            (vec![1.6, 0.3], 4, "A"),
            (vec![0.5, 0.8], 5, "A"),
        ])
    }

    #[test]
    fn test_unfiltered_top_2() {
        let store = corpus();
        let index = FlatIndex::new(&store, Similarity::Cosine);
        let hits = index.search(&[1.0, 1.0], 2, None).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].doc_idx, 2);
        assert!((hits[0].score - 1.0).abs() < 1e-4);
        assert_eq!(hits[1].doc_idx, 4);
        assert!((hits[1].score - 0.9744).abs() < 1e-3);
    }

    #[test]
    fn test_filtered_search_exact_scores() {
        let store = corpus();
        let index = FlatIndex::new(&store, Similarity::Cosine);
        let filter = json!({"op": "EQ", "field": "type", "value": "A"});
        let hits = index.search(&[1.0, 0.0], 3, Some(&filter)).unwrap();
        let indices: Vec<usize> = hits.iter().map(|h| h.doc_idx).collect();
        assert_eq!(indices, vec![0, 3, 4]);
        assert!((hits[0].score - 1.0).abs() < 1e-4);
        assert!((hits[1].score - 0.9827).abs() < 1e-3);
        assert!((hits[2].score - 0.5300).abs() < 1e-3);
    }

    #[test]
    fn test_or_filter_excludes_other_types() {
        let store = corpus();
        let index = FlatIndex::new(&store, Similarity::Cosine);
        let filter = json!({"op": "OR", "children": [
            {"op": "EQ", "field": "type", "value": "A"},
            {"op": "EQ", "field": "type", "value": "B"},
        ]});
        let hits = index.search(&[1.0, 1.0], 5, Some(&filter)).unwrap();
        assert_eq!(hits.len(), 4);
        assert!(hits.iter().all(|h| {
            h.document.metadata.get("type") != Some(&MetadataValue::String("C".into()))
        }));
    }

    #[test]
    fn test_neq_excludes_top_document() {
        let store = corpus();
        let index = FlatIndex::new(&store, Similarity::Cosine);
        let filter = json!({"op": "NEQ", "field": "id", "value": 3});
        let hits = index.search(&[1.0, 1.0], 10, Some(&filter)).unwrap();
        assert_eq!(hits.len(), 4);
        assert!(hits.iter().all(|h| h.doc_idx != 2));
    }

    #[test]
    fn test_k_larger_than_store_returns_all_sorted() {
        let store = corpus();
        let index = FlatIndex::new(&store, Similarity::Cosine);
        let hits = index.search(&[1.0, 0.0], 100, None).unwrap();
        assert_eq!(hits.len(), 5);
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_k_zero_and_empty_store() {
        let store = corpus();
        let index = FlatIndex::new(&store, Similarity::Cosine);
        assert!(index.search(&[1.0, 0.0], 0, None).unwrap().is_empty());

        let empty = DocumentStore::new();
        let index = FlatIndex::new(&empty, Similarity::Cosine);
        assert!(index.search(&[1.0, 0.0], 5, None).unwrap().is_empty());
    }

    #[test]
    fn test_filter_excluding_everything() {
        let store = corpus();
        let index = FlatIndex::new(&store, Similarity::Cosine);
        let filter = json!({"op": "EQ", "field": "type", "value": "Z"});
        assert!(index.search(&[1.0, 0.0], 5, Some(&filter)).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_filter_returns_empty_not_error() {
        let store = corpus();
        let index = FlatIndex::new(&store, Similarity::Cosine);
        let filter = json!({"op": "LIKE", "field": "type", "value": "A"});
        let hits = index.search(&[1.0, 0.0], 5, Some(&filter)).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_null_and_empty_object_mean_no_filter() {
        let store = corpus();
        let index = FlatIndex::new(&store, Similarity::Cosine);
        let null = Value::Null;
        assert_eq!(index.search(&[1.0, 0.0], 5, Some(&null)).unwrap().len(), 5);
        let empty = json!({});
        assert_eq!(index.search(&[1.0, 0.0], 5, Some(&empty)).unwrap().len(), 5);
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let store = corpus();
        let index = FlatIndex::new(&store, Similarity::Cosine);
        let err = index.search(&[1.0, 0.0, 0.0], 5, None).unwrap_err();
        assert!(matches!(err, StorexError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_single_document_store() {
        let store = store_of(vec![(vec![3.0, 4.0], 1, "A")]);
        let index = FlatIndex::new(&store, Similarity::Cosine);
        let hits = index.search(&[3.0, 4.0], 5, None).unwrap();
        assert_eq!(hits.len(), 1);
        assert!((hits[0].score - 1.0).abs() < 1e-5);
    }
}
