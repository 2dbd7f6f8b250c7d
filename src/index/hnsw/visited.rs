//! Generation-stamped visited set for graph traversal.
//!
//! An array of generation stamps replaces a `HashSet<u32>`: `clear` bumps
//! the generation instead of zeroing the array, so the repeated layer
//! searches of one insert or query reuse a single allocation.

#[derive(Debug)]
pub(crate) struct VisitedSet {
    stamps: Vec<u32>,
    generation: u32,
}

impl VisitedSet {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            stamps: vec![0; capacity],
            generation: 1,
        }
    }

    /// Resets the set. O(1) except on generation wraparound.
    pub(crate) fn clear(&mut self) {
        self.generation = match self.generation.checked_add(1) {
            Some(next) => next,
            None => {
                self.stamps.fill(0);
                1
            }
        };
    }

    /// Stamps `id` as visited. Returns `true` when it was not previously
    /// visited in the current generation.
    #[inline]
    pub(crate) fn insert(&mut self, id: u32) -> bool {
        let slot = &mut self.stamps[id as usize];
        if *slot == self.generation {
            false
        } else {
            *slot = self.generation;
            true
        }
    }
}
