//! HNSW graph construction.
//!
//! Nodes are inserted in store order. Each insert descends from the entry
//! point with a beam of one down to just above the node's sampled level,
//! then beam-searches every layer the node occupies, links up to M
//! bidirectional edges per layer, and prunes any neighbor that ends up over
//! capacity. Pruning removes the reverse edge of every dropped link, so
//! adjacency stays symmetric per layer once construction completes.

use crate::index::hnsw::node_distance;
use crate::index::hnsw::search::search_layer;
use crate::index::hnsw::visited::VisitedSet;
use crate::index::hnsw::HnswIndex;
use rand::rngs::StdRng;
use std::cmp::Ordering;

impl<'a> HnswIndex<'a> {
    /// Inserts the next node. `node` must equal the current node count.
    pub(super) fn insert_node(&mut self, node: u32, rng: &mut StdRng, visited: &mut VisitedSet) {
        let level = self.graph.random_level(rng);
        self.graph.neighbors.push(vec![Vec::new(); level + 1]);
        self.graph.levels.push(level as u8);

        let Some(entry) = self.graph.entry_point else {
            self.graph.entry_point = Some(node);
            self.graph.top_layer = level;
            return;
        };

        let store = self.store;
        let metric = self.metric;
        let Some(inserted) = store.get(node as usize) else {
            return;
        };
        let query = inserted.embedding.as_slice();
        let distance = |other: u32| node_distance(store, metric, query, other);

        // Phase 1: greedy descent to just above the node's level.
        let mut current = entry;
        for layer in (level + 1..=self.graph.top_layer).rev() {
            let found = search_layer(
                &self.graph,
                &distance,
                std::slice::from_ref(&current),
                1,
                layer,
                visited,
            );
            if let Some(&(_, nearest)) = found.first() {
                current = nearest;
            }
        }

        // Phase 2: collect neighbors per layer before touching the graph,
        // so each layer search sees the graph without the new node.
        let top = level.min(self.graph.top_layer);
        let mut selected_per_layer: Vec<Vec<u32>> = vec![Vec::new(); top + 1];
        let mut entries: Vec<u32> = vec![current];
        for layer in (0..=top).rev() {
            let candidates = search_layer(
                &self.graph,
                &distance,
                &entries,
                self.config.ef_construction,
                layer,
                visited,
            );
            selected_per_layer[layer] = candidates
                .iter()
                .take(self.config.m)
                .map(|&(_, id)| id)
                .collect();
            entries.clear();
            entries.extend(candidates.iter().map(|&(_, id)| id));
            if entries.is_empty() {
                entries.push(entry);
            }
        }

        // Phase 3: bidirectional linking with capacity pruning.
        for (layer, selected) in selected_per_layer.iter().enumerate() {
            for &neighbor in selected {
                if neighbor == node {
                    continue;
                }
                self.graph.neighbors[node as usize][layer].push(neighbor);
                self.graph.neighbors[neighbor as usize][layer].push(node);
                if self.graph.neighbors[neighbor as usize][layer].len() > self.config.m {
                    self.prune_layer(neighbor, layer);
                }
            }
        }

        if level > self.graph.top_layer {
            self.graph.top_layer = level;
            self.graph.entry_point = Some(node);
        }
    }

    /// Shrinks a node's adjacency on one layer back to its M closest
    /// neighbors, removing the reverse edge of every dropped link.
    fn prune_layer(&mut self, node: u32, layer: usize) {
        let store = self.store;
        let metric = self.metric;
        let Some(base) = store.get(node as usize) else {
            return;
        };
        let base = base.embedding.as_slice();

        let current = self.graph.neighbors[node as usize][layer].clone();
        let mut ranked: Vec<(f32, u32)> = current
            .iter()
            .map(|&other| (node_distance(store, metric, base, other), other))
            .collect();
        ranked.sort_unstable_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });

        for &(_, dropped) in ranked.iter().skip(self.config.m) {
            let reverse = &mut self.graph.neighbors[dropped as usize][layer];
            if let Some(position) = reverse.iter().position(|&id| id == node) {
                reverse.swap_remove(position);
            }
        }
        self.graph.neighbors[node as usize][layer] = ranked
            .iter()
            .take(self.config.m)
            .map(|&(_, id)| id)
            .collect();
    }
}
