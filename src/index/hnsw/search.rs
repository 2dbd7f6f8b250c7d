//! Single-layer beam search over the HNSW graph.
//!
//! Two heaps drive the search: a min-heap of candidates still to expand and
//! a bounded max-heap of the best results found so far. The search stops
//! once the closest unexpanded candidate is farther than the worst kept
//! result.

use crate::index::hnsw::graph::HnswGraph;
use crate::index::hnsw::visited::VisitedSet;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Heap entry ordered by distance, then node id for determinism.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct HeapEntry {
    distance: OrderedFloat<f32>,
    node: u32,
}

impl HeapEntry {
    fn new(distance: f32, node: u32) -> Self {
        Self {
            distance: OrderedFloat(distance),
            node,
        }
    }
}

/// Beam-searches one layer from `entry_points`, keeping up to `ef` closest
/// nodes. Returns `(distance, node)` pairs sorted by ascending distance.
pub(crate) fn search_layer<F: Fn(u32) -> f32>(
    graph: &HnswGraph,
    distance: &F,
    entry_points: &[u32],
    ef: usize,
    layer: usize,
    visited: &mut VisitedSet,
) -> Vec<(f32, u32)> {
    visited.clear();
    let mut candidates: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();
    let mut results: BinaryHeap<HeapEntry> = BinaryHeap::with_capacity(ef + 1);

    for &entry in entry_points {
        if !visited.insert(entry) {
            continue;
        }
        let d = distance(entry);
        candidates.push(Reverse(HeapEntry::new(d, entry)));
        results.push(HeapEntry::new(d, entry));
        if results.len() > ef {
            results.pop();
        }
    }
    // Cached worst kept distance, refreshed on every results change.
    let mut worst = results.peek().map_or(f32::MAX, |e| e.distance.0);

    while let Some(Reverse(closest)) = candidates.pop() {
        if results.len() >= ef && closest.distance.0 > worst {
            break;
        }
        for &neighbor in graph.neighbors_at(closest.node, layer) {
            if !visited.insert(neighbor) {
                continue;
            }
            let d = distance(neighbor);
            if results.len() < ef || d < worst {
                candidates.push(Reverse(HeapEntry::new(d, neighbor)));
                results.push(HeapEntry::new(d, neighbor));
                if results.len() > ef {
                    results.pop();
                }
                worst = results.peek().map_or(f32::MAX, |e| e.distance.0);
            }
        }
    }

    results
        .into_sorted_vec()
        .into_iter()
        .map(|entry| (entry.distance.0, entry.node))
        .collect()
}
