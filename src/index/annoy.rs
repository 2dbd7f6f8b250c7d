//! Random-projection forest index (Annoy-style).
//!
//! A forest of binary trees sharing one flat node arena. Each internal node
//! splits its bucket by a random L2-normalized Gaussian hyperplane at the
//! median projection; buckets that refuse to split (duplicate points, a
//! degenerate hyperplane, or the depth cap) become leaves. A query descends
//! every tree, backtracking into at most one deferred subtree per internal
//! node until a per-tree candidate floor is met, then reranks the union
//! across trees exactly.

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
use std::collections::HashSet;

/// Tuning parameters for an Annoy forest.
#[derive(Debug, Clone)]
pub struct AnnoyConfig {
    /// Number of trees. More trees, higher recall, linear memory cost.
    pub num_trees: usize,
    /// Maximum bucket size before a node splits.
    pub max_leaf_size: usize,
    /// RNG seed for hyperplane sampling; a fixed seed reproduces the forest.
    pub seed: u64,
}

impl Default for AnnoyConfig {
    fn default() -> Self {
        Self {
            num_trees: config::ANNOY_DEFAULT_NUM_TREES,
            max_leaf_size: config::ANNOY_DEFAULT_MAX_LEAF_SIZE,
            seed: config::DEFAULT_SEED,
        }
    }
}

/// One node in the shared forest arena.
#[derive(Debug)]
enum TreeNode {
    /// Terminal bucket of document indices.
    Leaf(Vec<u32>),
    /// Hyperplane split; `left` holds documents with projection <= offset.
    Split {
        normal: Vec<f32>,
        offset: f32,
        left: u32,
        right: u32,
    },
}

/// Random-projection forest over a frozen store.
#[derive(Debug)]
pub struct AnnoyIndex<'a> {
    store: &'a DocumentStore,
    metric: Similarity,
    arena: Vec<TreeNode>,
    roots: Vec<u32>,
}

impl<'a> AnnoyIndex<'a> {
    /// Builds the forest eagerly: `num_trees` trees over the full store,
    /// each with independent randomness.
    pub fn new(store: &'a DocumentStore, metric: Similarity, config: AnnoyConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut arena = Vec::new();
        let mut roots = Vec::with_capacity(config.num_trees);
        let all: Vec<u32> = (0..store.len() as u32).collect();
        for _ in 0..config.num_trees {
            let root = build_tree(&mut arena, store, &config, &mut rng, all.clone(), 0);
            roots.push(root);
        }
        Self {
            store,
            metric,
            arena,
            roots,
        }
    }

    /// Builds the forest with default parameters.
    pub fn with_defaults(store: &'a DocumentStore, metric: Similarity) -> Self {
        Self::new(store, metric, AnnoyConfig::default())
    }

    /// Approximate top-K search: per-tree descent with bounded backtracking,
    /// candidate union across trees, exact rerank. Shares the edge-case
    /// contract of [`FlatIndex::search`](crate::index::FlatIndex::search).
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

        let target = (2 * k).max(config::ANNOY_MIN_CANDIDATES_PER_TREE);
        let mut candidates: HashSet<u32> = HashSet::new();
        for &root in &self.roots {
            self.collect_from_tree(root, query, target, &mut candidates);
        }

        Ok(rerank(self.store, self.metric, query, candidates, &filter, k))
    }

    /// Walks one tree toward the query's leaf, deferring the far side of
    /// every split. Deferred subtrees are drained (each at most once) until
    /// this tree has produced `target` candidates.
    fn collect_from_tree(
        &self,
        root: u32,
        query: &[f32],
        target: usize,
        out: &mut HashSet<u32>,
    ) {
        let mut collected = 0usize;
        let mut deferred: Vec<u32> = vec![root];
        while collected < target {
            let Some(mut node) = deferred.pop() else {
                break;
            };
            loop {
                match &self.arena[node as usize] {
                    TreeNode::Leaf(items) => {
                        collected += items.len();
                        out.extend(items.iter().copied());
                        break;
                    }
                    TreeNode::Split {
                        normal,
                        offset,
                        left,
                        right,
                    } => {
                        let projection: f32 =
                            normal.iter().zip(query).map(|(n, q)| n * q).sum();
                        let (chosen, other) = if projection <= *offset {
                            (*left, *right)
                        } else {
                            (*right, *left)
                        };
                        deferred.push(other);
                        node = chosen;
                    }
                }
            }
        }
    }
}

/// Recursively builds one tree over `indices`, returning its arena index.
fn build_tree(
    arena: &mut Vec<TreeNode>,
    store: &DocumentStore,
    config: &AnnoyConfig,
    rng: &mut StdRng,
    indices: Vec<u32>,
    depth: usize,
) -> u32 {
    if indices.len() <= config.max_leaf_size || depth > config::ANNOY_MAX_TREE_DEPTH {
        return push_node(arena, TreeNode::Leaf(indices));
    }
    let Some(normal) = sample_unit_normal(rng, store.dimension()) else {
        return push_node(arena, TreeNode::Leaf(indices));
    };

    let mut projections = Vec::with_capacity(indices.len());
    for &doc_idx in &indices {
        let embedding = store
            .get(doc_idx as usize)
            .map(|doc| doc.embedding.as_slice())
            .unwrap_or(&[]);
        let projection: f32 = normal.iter().zip(embedding).map(|(n, e)| n * e).sum();
        projections.push(projection);
    }
    let offset = median(&projections);

    let mut left = Vec::new();
    let mut right = Vec::new();
    for (&doc_idx, &projection) in indices.iter().zip(&projections) {
        if projection <= offset {
            left.push(doc_idx);
        } else {
            right.push(doc_idx);
        }
    }
    // A split that puts everything on one side failed; keep the bucket whole.
    if left.is_empty() || right.is_empty() {
        return push_node(arena, TreeNode::Leaf(indices));
    }

    let left_id = build_tree(arena, store, config, rng, left, depth + 1);
    let right_id = build_tree(arena, store, config, rng, right, depth + 1);
    push_node(
        arena,
        TreeNode::Split {
            normal,
            offset,
            left: left_id,
            right: right_id,
        },
    )
}

fn push_node(arena: &mut Vec<TreeNode>, node: TreeNode) -> u32 {
    arena.push(node);
    (arena.len() - 1) as u32
}

/// Samples an L2-normalized Gaussian hyperplane. Degenerate draws are
/// resampled a few times; `None` tells the caller to fall back to a leaf.
fn sample_unit_normal(rng: &mut StdRng, dimension: usize) -> Option<Vec<f32>> {
    for _ in 0..3 {
        let mut normal: Vec<f32> = (0..dimension).map(|_| rng.sample(StandardNormal)).collect();
        let length = normal.iter().map(|x| x * x).sum::<f32>().sqrt();
        if length > config::MIN_SPLIT_NORM {
            for component in &mut normal {
                *component /= length;
            }
            return Some(normal);
        }
    }
    None
}

/// Median projection: middle element for odd counts, mean of the two middle
/// elements for even counts (so a two-point bucket always splits).
fn median(projections: &[f32]) -> f32 {
    let mut sorted = projections.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
