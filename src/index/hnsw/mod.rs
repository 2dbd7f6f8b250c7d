//! Hierarchical Navigable Small World (HNSW) approximate index.
//!
//! A stack of proximity graphs: higher layers are sparser and provide long
//! hops, layer 0 holds every node. A query greedily descends with a beam of
//! one, then runs a wider beam on layer 0. All internal ordering uses the
//! distance form `1 - score` (lower is closer); results convert back to
//! similarity before ranking.

/// Graph structure and configuration.
pub mod graph;
/// Insertion with bidirectional linking and symmetric pruning.
mod insert;
/// Single-layer beam search.
mod search;
/// Generation-based visited set for graph traversal.
mod visited;

pub use graph::HnswConfig;

use crate::error::StorexError;
use crate::index::hnsw::graph::HnswGraph;
use crate::index::hnsw::search::search_layer;
use crate::index::hnsw::visited::VisitedSet;
use crate::index::{check_query, parse_query_filter, rerank};
use crate::search::types::SearchHit;
use crate::similarity::Similarity;
use crate::store::DocumentStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;

/// Layered proximity-graph index over a frozen store.
#[derive(Debug)]
pub struct HnswIndex<'a> {
    store: &'a DocumentStore,
    metric: Similarity,
    config: HnswConfig,
    pub(crate) graph: HnswGraph,
}

impl<'a> HnswIndex<'a> {
    /// Builds the graph eagerly by inserting every document in store order.
    pub fn new(store: &'a DocumentStore, metric: Similarity, config: HnswConfig) -> Self {
        let mut index = Self {
            store,
            metric,
            config,
            graph: HnswGraph::with_capacity(store.len()),
        };
        let mut rng = StdRng::seed_from_u64(index.config.seed);
        let mut visited = VisitedSet::new(store.len());
        for node in 0..store.len() as u32 {
            index.insert_node(node, &mut rng, &mut visited);
        }
        index
    }

    /// Builds the index with default parameters.
    pub fn with_defaults(store: &'a DocumentStore, metric: Similarity) -> Self {
        Self::new(store, metric, HnswConfig::default())
    }

    /// Approximate top-K search: greedy descent to layer 1, then a layer-0
    /// beam of `max(k, ef_search)`, reranked exactly. Shares the edge-case
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
        let Some(entry) = self.graph.entry_point else {
            return Ok(Vec::new());
        };

        let store = self.store;
        let metric = self.metric;
        let distance = |node: u32| node_distance(store, metric, query, node);
        let mut visited = VisitedSet::new(store.len());

        let mut current = entry;
        for layer in (1..=self.graph.top_layer).rev() {
            let found = search_layer(
                &self.graph,
                &distance,
                std::slice::from_ref(&current),
                1,
                layer,
                &mut visited,
            );
            if let Some(&(_, nearest)) = found.first() {
                current = nearest;
            }
        }

        let ef = self.config.ef_search.max(k);
        let found = search_layer(
            &self.graph,
            &distance,
            std::slice::from_ref(&current),
            ef,
            0,
            &mut visited,
        );
        let candidates = found.into_iter().map(|(_, node)| node);
        Ok(rerank(store, metric, query, candidates, &filter, k))
    }
}

/// Distance from `query` to a stored node, in the metric's `1 - score` form.
pub(super) fn node_distance(
    store: &DocumentStore,
    metric: Similarity,
    query: &[f32],
    node: u32,
) -> f32 {
    store
        .get(node as usize)
        .map_or(f32::MAX, |doc| metric.distance_unchecked(query, &doc.embedding))
}
