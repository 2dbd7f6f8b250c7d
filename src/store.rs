//! Append-only document store.
//!
//! Documents are identified by their insertion position (`doc_idx`). The
//! store fixes its embedding dimension on the first push and rejects
//! mismatched embeddings afterwards. Indexes hold a shared borrow of the
//! store for their whole lifetime, so the compiler enforces that nothing is
//! appended while an index built over the store is alive.

use crate::document::Document;
use crate::error::StorexError;

/// Ordered in-memory sequence of documents with append-only insertion and
/// random indexed reads.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    dimension: usize,
}

impl DocumentStore {
    /// Creates an empty store. The dimension is fixed by the first push.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a document sequence, validating that every
    /// embedding shares the first document's dimension.
    pub fn from_documents(documents: Vec<Document>) -> Result<Self, StorexError> {
        let mut store = Self::new();
        for doc in documents {
            store.push(doc)?;
        }
        Ok(store)
    }

    /// Appends a document and returns its `doc_idx`.
    ///
    /// Fails with [`StorexError::DimensionMismatch`] when the embedding is
    /// empty or its length differs from the store dimension.
    pub fn push(&mut self, document: Document) -> Result<usize, StorexError> {
        if document.embedding.is_empty() {
            return Err(StorexError::DimensionMismatch {
                expected: self.dimension,
                actual: 0,
            });
        }
        if self.documents.is_empty() {
            self.dimension = document.embedding.len();
        } else if document.embedding.len() != self.dimension {
            return Err(StorexError::DimensionMismatch {
                expected: self.dimension,
                actual: document.embedding.len(),
            });
        }
        self.documents.push(document);
        Ok(self.documents.len() - 1)
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` when the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// The document at `doc_idx`, or `None` when out of bounds.
    pub fn get(&self, doc_idx: usize) -> Option<&Document> {
        self.documents.get(doc_idx)
    }

    /// Iterates documents in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Embedding dimension shared by every document; 0 while empty.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl<'a> IntoIterator for &'a DocumentStore {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
