//! Locality-sensitive hashing index.
//!
//! `num_tables` independent hash tables, each hashing a vector to a
//! `num_hashes_per_table`-bit signature: bit i is set when the projection
//! onto the i-th random Gaussian hyperplane exceeds its threshold.
//! Documents sharing the query's signature in any table form the candidate
//! set, which is then reranked exactly. A query whose buckets are all empty
//! legitimately returns no results; callers needing guaranteed results
//! retry with the flat index or raise `num_tables`.

use crate::config;
use crate::error::StorexError;
use crate::index::{check_query, parse_query_filter, rerank};
use crate::search::types::SearchHit;
use crate::similarity::Similarity;
use crate::store::DocumentStore;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Tuning parameters for an LSH index.
#[derive(Debug, Clone)]
pub struct LshConfig {
    /// Number of independent hash tables. More tables, higher recall.
    pub num_tables: usize,
    /// Single-bit hashes per table, at most 64. More hashes, smaller and
    /// more selective buckets.
    pub num_hashes_per_table: usize,
    /// RNG seed for hyperplane sampling; a fixed seed reproduces the index.
    pub seed: u64,
}

impl Default for LshConfig {
    fn default() -> Self {
        Self {
            num_tables: config::LSH_DEFAULT_NUM_TABLES,
            num_hashes_per_table: config::LSH_DEFAULT_HASHES_PER_TABLE,
            seed: config::DEFAULT_SEED,
        }
    }
}

/// One random hyperplane hash contributing a single signature bit.
#[derive(Debug, Clone)]
struct Hyperplane {
    normal: Vec<f32>,
    threshold: f32,
}

impl Hyperplane {
    fn sample(rng: &mut StdRng, dimension: usize) -> Self {
        let normal: Vec<f32> = (0..dimension).map(|_| rng.sample(StandardNormal)).collect();
        Self {
            normal,
            threshold: 0.0,
        }
    }

    fn bit(&self, vector: &[f32]) -> u64 {
        let projection: f32 = self.normal.iter().zip(vector).map(|(h, v)| h * v).sum();
        u64::from(projection > self.threshold)
    }
}

/// One hash table: its hyperplanes plus signature buckets.
#[derive(Debug)]
struct HashTable {
    planes: Vec<Hyperplane>,
    buckets: HashMap<u64, Vec<u32>>,
}

impl HashTable {
    /// Concatenates the per-plane bits into the table's bucket key.
    fn signature(&self, vector: &[f32]) -> u64 {
        self.planes
            .iter()
            .fold(0u64, |signature, plane| (signature << 1) | plane.bit(vector))
    }
}

/// Multi-table LSH index over a frozen store.
#[derive(Debug)]
pub struct LshIndex<'a> {
    store: &'a DocumentStore,
    metric: Similarity,
    tables: Vec<HashTable>,
}

impl<'a> LshIndex<'a> {
    /// Builds the index eagerly: samples `num_tables * num_hashes_per_table`
    /// hyperplanes and hashes every document into its buckets.
    ///
    /// # Panics
    ///
    /// When `num_hashes_per_table` exceeds 64 (signatures are `u64` keys).
    pub fn new(store: &'a DocumentStore, metric: Similarity, config: LshConfig) -> Self {
        assert!(
            config.num_hashes_per_table <= 64,
            "LSH signatures are u64 bucket keys: at most 64 hashes per table"
        );
        let mut rng = StdRng::seed_from_u64(config.seed);
        let dimension = store.dimension();

        let mut tables: Vec<HashTable> = (0..config.num_tables)
            .map(|_| {
                let planes = (0..config.num_hashes_per_table)
                    .map(|_| Hyperplane::sample(&mut rng, dimension))
                    .collect();
                HashTable {
                    planes,
                    buckets: HashMap::new(),
                }
            })
            .collect();

        for table in &mut tables {
            for (doc_idx, document) in store.iter().enumerate() {
                let signature = table.signature(&document.embedding);
                table
                    .buckets
                    .entry(signature)
                    .or_default()
                    .push(doc_idx as u32);
            }
        }

        Self {
            store,
            metric,
            tables,
        }
    }

    /// Builds the index with default parameters.
    pub fn with_defaults(store: &'a DocumentStore, metric: Similarity) -> Self {
        Self::new(store, metric, LshConfig::default())
    }

    /// Approximate top-K search: union of the query's buckets across all
    /// tables, reranked exactly. Shares the edge-case contract of
    /// [`FlatIndex::search`](crate::index::FlatIndex::search).
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

        let mut candidates: HashSet<u32> = HashSet::new();
        for table in &self.tables {
            if let Some(bucket) = table.buckets.get(&table.signature(query)) {
                candidates.extend(bucket.iter().copied());
            }
        }

        Ok(rerank(self.store, self.metric, query, candidates, &filter, k))
    }
}
