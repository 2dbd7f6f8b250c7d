//! Global configuration constants for storex.
//!
//! Compile-time defaults for the index families live here; per-index
//! overrides go through the `LshConfig` / `HnswConfig` / `AnnoyConfig`
//! structs, whose `Default` impls read these values.

/// Default number of independent LSH hash tables.
///
/// Each table hashes every document once. More tables raise recall at the
/// cost of build time and memory.
pub const LSH_DEFAULT_NUM_TABLES: usize = 10;

/// Default number of single-bit hashes per LSH table.
///
/// The per-table signature concatenates this many bits into one bucket key.
/// More hashes make buckets smaller and more selective. Capped at 64 so a
/// signature always packs into a `u64`.
pub const LSH_DEFAULT_HASHES_PER_TABLE: usize = 8;

/// Default number of bidirectional links per HNSW node per layer.
///
/// Higher values improve recall but increase memory and build time.
/// Typical range: 8–64. Default: 16.
pub const HNSW_DEFAULT_M: usize = 16;

/// Default ef parameter during HNSW index construction.
///
/// Controls the size of the dynamic candidate list during insertion.
/// Higher values produce a better graph but slow down build time.
pub const HNSW_DEFAULT_EF_CONSTRUCTION: usize = 200;

/// Default ef parameter during HNSW search.
///
/// Controls the size of the dynamic candidate list during query; raised to
/// `k` automatically when `k` is larger. Higher values improve recall at the
/// cost of latency.
pub const HNSW_DEFAULT_EF_SEARCH: usize = 50;

/// Default number of trees in an Annoy forest.
///
/// More trees raise recall and memory linearly.
pub const ANNOY_DEFAULT_NUM_TREES: usize = 10;

/// Default maximum bucket size before an Annoy tree node splits.
pub const ANNOY_DEFAULT_MAX_LEAF_SIZE: usize = 50;

/// Recursion depth cap for Annoy tree construction. A bucket still
/// oversized at this depth becomes a leaf.
pub const ANNOY_MAX_TREE_DEPTH: usize = 20;

/// Floor on the per-tree candidate count during an Annoy query.
///
/// Each tree keeps descending deferred subtrees until it has collected at
/// least `max(2k, this)` candidates or runs out of branches.
pub const ANNOY_MIN_CANDIDATES_PER_TREE: usize = 100;

/// Minimum L2 norm for a usable random split hyperplane. Draws below this
/// are resampled; repeated failures turn the bucket into a leaf.
pub const MIN_SPLIT_NORM: f32 = 1e-10;

/// Default RNG seed for the approximate indexes. A fixed seed makes index
/// construction reproducible across runs.
pub const DEFAULT_SEED: u64 = 0;
