//! Shared top-K selection.
//!
//! Partial-sort contract: after `top_k(&mut buffer, k)`, positions
//! `[0, min(k, n))` hold the k highest-scoring pairs in strictly descending
//! score order, ties broken by lower document index, and the buffer is
//! truncated to that prefix.

use ordered_float::OrderedFloat;
use std::cmp::Reverse;

/// Total ranking key: descending score, then ascending document index.
fn rank_key(entry: &(f32, u32)) -> (Reverse<OrderedFloat<f32>>, u32) {
    (Reverse(OrderedFloat(entry.0)), entry.1)
}

/// Selects and sorts the top `k` `(score, doc_idx)` pairs in place.
pub fn top_k(entries: &mut Vec<(f32, u32)>, k: usize) {
    if k == 0 {
        entries.clear();
        return;
    }
    if k < entries.len() {
        entries.select_nth_unstable_by_key(k - 1, rank_key);
        entries.truncate(k);
    }
    entries.sort_unstable_by_key(rank_key);
}
