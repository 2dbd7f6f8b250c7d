//! HNSW graph structure and configuration.
//!
//! [`HnswConfig`] holds the tuning parameters (M, ef_construction,
//! ef_search, seed). [`HnswGraph`] is the layered adjacency arena: node `i`
//! is document `i`, and `neighbors[i][l]` exists only for layers up to
//! node i's sampled level.

use crate::config;
use rand::rngs::StdRng;
use rand::Rng;

/// Configuration parameters for an HNSW index.
///
/// Controls the trade-off between build speed, search speed, and recall.
#[derive(Debug, Clone)]
pub struct HnswConfig {
    /// Maximum bidirectional links per node per layer.
    pub m: usize,
    /// Candidate list size during construction.
    pub ef_construction: usize,
    /// Candidate list size during search; raised to `k` when `k` is larger.
    pub ef_search: usize,
    /// RNG seed for level sampling; a fixed seed reproduces the graph.
    pub seed: u64,
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self {
            m: config::HNSW_DEFAULT_M,
            ef_construction: config::HNSW_DEFAULT_EF_CONSTRUCTION,
            ef_search: config::HNSW_DEFAULT_EF_SEARCH,
            seed: config::DEFAULT_SEED,
        }
    }
}

/// Layered adjacency arena for the HNSW graph.
#[derive(Debug, Default)]
pub(crate) struct HnswGraph {
    /// `neighbors[node][layer]` — adjacency on that layer; the outer vec per
    /// node has exactly `level + 1` entries.
    pub(crate) neighbors: Vec<Vec<Vec<u32>>>,
    /// Sampled top layer per node.
    pub(crate) levels: Vec<u8>,
    /// Node the descent starts from; the node with the highest level.
    pub(crate) entry_point: Option<u32>,
    /// Highest occupied layer.
    pub(crate) top_layer: usize,
    /// Hard layer budget: `⌊log₂ N⌋ + 1` for an N-document store.
    pub(crate) max_layers: usize,
}

impl HnswGraph {
    /// Creates an empty graph sized for `count` nodes.
    pub(crate) fn with_capacity(count: usize) -> Self {
        let max_layers = if count == 0 {
            1
        } else {
            (count as f64).log2().floor() as usize + 1
        };
        Self {
            neighbors: Vec::with_capacity(count),
            levels: Vec::with_capacity(count),
            entry_point: None,
            top_layer: 0,
            max_layers,
        }
    }

    /// Samples a node level: repeated p = 0.5 coin flips, capped at the
    /// layer budget.
    pub(crate) fn random_level(&self, rng: &mut StdRng) -> usize {
        let mut level = 0;
        while level + 1 < self.max_layers && rng.gen::<f64>() < 0.5 {
            level += 1;
        }
        level
    }

    /// Adjacency of `node` on `layer`; empty above the node's own level.
    pub(crate) fn neighbors_at(&self, node: u32, layer: usize) -> &[u32] {
        let layers = &self.neighbors[node as usize];
        if layer < layers.len() {
            &layers[layer]
        } else {
            &[]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_layer_budget_grows_with_log2() {
        assert_eq!(HnswGraph::with_capacity(0).max_layers, 1);
        assert_eq!(HnswGraph::with_capacity(1).max_layers, 1);
        assert_eq!(HnswGraph::with_capacity(2).max_layers, 2);
        assert_eq!(HnswGraph::with_capacity(7).max_layers, 3);
        assert_eq!(HnswGraph::with_capacity(8).max_layers, 4);
        assert_eq!(HnswGraph::with_capacity(1000).max_layers, 10);
    }

    #[test]
    fn test_random_level_respects_budget() {
        let graph = HnswGraph::with_capacity(1000);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..10_000 {
            assert!(graph.random_level(&mut rng) < graph.max_layers);
        }
    }

    #[test]
    fn test_random_level_is_geometric_ish() {
        // With p = 0.5, roughly half of all samples land on layer 0.
        let graph = HnswGraph::with_capacity(1 << 20);
        let mut rng = StdRng::seed_from_u64(2);
        let samples = 10_000;
        let zeros = (0..samples)
            .filter(|_| graph.random_level(&mut rng) == 0)
            .count();
        assert!(zeros > samples * 4 / 10, "too few layer-0 nodes: {zeros}");
        assert!(zeros < samples * 6 / 10, "too many layer-0 nodes: {zeros}");
    }

    #[test]
    fn test_neighbors_above_level_are_empty() {
        let mut graph = HnswGraph::with_capacity(2);
        graph.neighbors.push(vec![vec![1]]);
        graph.levels.push(0);
        assert_eq!(graph.neighbors_at(0, 0), &[1]);
        assert!(graph.neighbors_at(0, 5).is_empty());
    }
}
