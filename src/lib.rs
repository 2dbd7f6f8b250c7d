//! # storex
//!
//! In-process vector search engine. Documents carry a dense `f32` embedding
//! and a schema-less metadata record; queries return the top-K most similar
//! documents under a pluggable metric, optionally restricted by a
//! structured metadata filter.
//!
//! Four index families share the search contract and trade accuracy for
//! speed differently: [`FlatIndex`] (exhaustive, exact), [`LshIndex`]
//! (multi-table bit-signature hashing), [`HnswIndex`] (layered proximity
//! graph), and [`AnnoyIndex`] (random-projection forest). [`VectorIndex`]
//! is the tagged dispatch over the four.
//!
//! ```
//! use storex::{Document, DocumentStore, FlatIndex, Metadata, Similarity};
//!
//! let mut store = DocumentStore::new();
//! store.push(Document::new(vec![1.0, 0.0], Metadata::new())).unwrap();
//! store.push(Document::new(vec![0.0, 1.0], Metadata::new())).unwrap();
//!
//! let index = FlatIndex::new(&store, Similarity::Cosine);
//! let hits = index.search(&[0.9, 0.1], 1, None).unwrap();
//! assert_eq!(hits[0].doc_idx, 0);
//! ```

/// Global configuration constants: defaults and tuning parameters.
pub mod config;
/// Core document types: `Document` and the `MetadataValue` enum.
pub mod document;
/// Crate error taxonomy.
pub mod error;
/// Filter expression tree and its JSON codec.
pub mod filter_types;
/// Index engines: flat, LSH, HNSW, Annoy, and the dispatch enum.
pub mod index;
/// Search primitives: filter evaluation, top-K selection, result types.
pub mod search;
/// Similarity metrics: dot product, cosine, Euclidean similarity.
pub mod similarity;
/// JSON Lines persistence for documents.
pub mod storage;
/// Append-only document store.
pub mod store;

pub use document::{Document, Metadata, MetadataValue};
pub use error::StorexError;
pub use filter_types::{CompareOp, FilterExpr};
pub use index::{
    AnnoyConfig, AnnoyIndex, FlatIndex, HnswConfig, HnswIndex, LshConfig, LshIndex, VectorIndex,
};
pub use search::types::SearchHit;
pub use similarity::Similarity;
pub use storage::Storage;
pub use store::DocumentStore;
