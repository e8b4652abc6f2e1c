//! Block-structured priority queue (the structure "D" of the solver)
//!
//! Two zones of blocks, each block an unordered list of `(vertex, distance)`
//! pairs no longer than the capacity `M`:
//!
//! - the prepend zone buffers batches returned by recursive calls, which are
//!   already known to fall in a lower distance slab and are served first;
//! - the insert zone receives single relaxations at its tail, splitting the
//!   tail block at its median whenever it grows past `M` entries.
//!
//! A per-vertex best-known key gates [`BlockQueue::insert`], so re-inserting
//! a vertex at an equal or worse distance is a no-op. Stale entries may
//! still sit in blocks; pulls surface them and the solver's distance map
//! makes them harmless.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{BmsspError, Result};
use crate::graph::{VertexId, Weight};

type Block = Vec<(VertexId, Weight)>;

/// Bucketed priority structure supporting `insert`, `batch_prepend` and
/// block-level `pull`
#[derive(Debug)]
pub struct BlockQueue {
    capacity: usize,
    bound: Weight,
    prepend_zone: VecDeque<Block>,
    insert_zone: VecDeque<Block>,
    best: HashMap<VertexId, Weight>,
}

impl BlockQueue {
    /// Create an empty structure with block capacity `capacity` and global
    /// upper bound `bound`. Every stored distance stays strictly below
    /// `bound`.
    pub fn new(capacity: usize, bound: Weight) -> Result<Self> {
        if capacity == 0 {
            return Err(BmsspError::InvalidParameter {
                name: "capacity",
                reason: "block capacity must be at least 1".into(),
            });
        }
        if !(bound > 0.0) {
            return Err(BmsspError::InvalidParameter {
                name: "bound",
                reason: format!("bound must be positive, got {bound}"),
            });
        }
        Ok(Self {
            capacity,
            bound,
            prepend_zone: VecDeque::new(),
            insert_zone: VecDeque::new(),
            best: HashMap::new(),
        })
    }

    /// Insert `(v, d)` into the tail of the insert zone.
    ///
    /// No-op when `d` is not below the global bound, or when `v` is already
    /// tracked at an equal or better distance.
    pub fn insert(&mut self, v: VertexId, d: Weight) {
        if d >= self.bound {
            return;
        }
        if let Some(&cur) = self.best.get(&v) {
            if cur <= d {
                return;
            }
        }
        self.best.insert(v, d);

        if self.insert_zone.is_empty() {
            self.insert_zone.push_back(Block::new());
        }
        let tail = self.insert_zone.back_mut().unwrap();
        tail.push((v, d));

        if tail.len() > self.capacity {
            tail.sort_by(|a, b| a.1.total_cmp(&b.1));
            let upper = tail.split_off(tail.len() / 2);
            self.insert_zone.push_back(upper);
        }
    }

    /// Prepend a batch of entries known to precede everything in the insert
    /// zone's current slab.
    ///
    /// The batch is chunked from its tail in groups of at most `M`, each
    /// chunk pushed to the front, so the batch's first `M` entries become
    /// the leading block. Best-known keys are updated for strictly better
    /// distances; other entries are still stored and surface as stale.
    pub fn batch_prepend(&mut self, mut entries: Vec<(VertexId, Weight)>) {
        entries.retain(|&(_, d)| d < self.bound);
        if entries.is_empty() {
            return;
        }
        for &(v, d) in &entries {
            match self.best.get(&v) {
                Some(&cur) if cur <= d => {}
                _ => {
                    self.best.insert(v, d);
                }
            }
        }
        for chunk in entries.rchunks(self.capacity) {
            self.prepend_zone.push_front(chunk.to_vec());
        }
    }

    /// Remove and return the leading block.
    ///
    /// Returns the pulled vertices (deduplicated, at most `M`) together
    /// with the sub-slab bound: the smallest stored distance strictly above
    /// the largest pulled one, or the global bound once nothing qualifies.
    /// `None` when the structure is exhausted.
    pub fn pull(&mut self) -> Option<(Weight, Vec<VertexId>)> {
        let block = self.take_leading_block()?;

        let pulled_max = block
            .iter()
            .map(|&(_, d)| d)
            .fold(f64::NEG_INFINITY, f64::max);

        let mut seen = HashSet::with_capacity(block.len());
        let vertices: Vec<VertexId> = block
            .iter()
            .map(|&(v, _)| v)
            .filter(|v| seen.insert(*v))
            .collect();

        let next_bound = self
            .prepend_zone
            .iter()
            .chain(self.insert_zone.iter())
            .flat_map(|b| b.iter())
            .map(|&(_, d)| d)
            .filter(|&d| d > pulled_max)
            .fold(self.bound, f64::min);

        Some((next_bound, vertices))
    }

    /// Smallest stored distance, `None` when the structure is empty.
    ///
    /// Used by the solver to report a sound completion bound when its
    /// vertex budget stops a solve with entries still queued.
    pub fn min_key(&self) -> Option<Weight> {
        self.prepend_zone
            .iter()
            .chain(self.insert_zone.iter())
            .flat_map(|b| b.iter())
            .map(|&(_, d)| d)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Whether any block still holds an entry
    pub fn is_empty(&self) -> bool {
        self.prepend_zone.iter().all(Vec::is_empty) && self.insert_zone.iter().all(Vec::is_empty)
    }

    /// Total stored entries, counting stale duplicates
    pub fn len(&self) -> usize {
        self.prepend_zone
            .iter()
            .chain(self.insert_zone.iter())
            .map(Vec::len)
            .sum()
    }

    fn take_leading_block(&mut self) -> Option<Block> {
        while let Some(block) = self.prepend_zone.pop_front() {
            if block.is_empty() {
                continue;
            }
            return Some(self.clamp_to_capacity(block, false));
        }
        while let Some(block) = self.insert_zone.pop_front() {
            if block.is_empty() {
                continue;
            }
            return Some(self.clamp_to_capacity(block, true));
        }
        None
    }

    /// Blocks never exceed `M` entries under normal discipline; if one does,
    /// return the first `M` and leave the rest as the new leading block.
    fn clamp_to_capacity(&mut self, mut block: Block, from_insert_zone: bool) -> Block {
        if from_insert_zone {
            block.sort_by(|a, b| a.1.total_cmp(&b.1));
        }
        if block.len() > self.capacity {
            let rest = block.split_off(self.capacity);
            if from_insert_zone {
                self.insert_zone.push_front(rest);
            } else {
                self.prepend_zone.push_front(rest);
            }
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::INFINITY;

    fn drain(q: &mut BlockQueue) -> Vec<(Weight, Vec<VertexId>)> {
        let mut out = Vec::new();
        while let Some(pulled) = q.pull() {
            out.push(pulled);
        }
        out
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(BlockQueue::new(0, 10.0).is_err());
        assert!(BlockQueue::new(4, 0.0).is_err());
        assert!(BlockQueue::new(4, -1.0).is_err());
        assert!(BlockQueue::new(4, f64::NAN).is_err());
    }

    #[test]
    fn insert_gate_is_idempotent_at_best() {
        let mut q = BlockQueue::new(4, 100.0).unwrap();
        q.insert(1, 5.0);
        q.insert(1, 5.0);
        q.insert(1, 7.0);
        assert_eq!(q.len(), 1);

        // A strictly better key is accepted alongside the stale entry.
        q.insert(1, 3.0);
        assert_eq!(q.len(), 2);

        let (_, vs) = q.pull().unwrap();
        assert_eq!(vs, vec![1]);
        assert!(q.is_empty());
    }

    #[test]
    fn entries_at_or_above_bound_are_dropped() {
        let mut q = BlockQueue::new(4, 10.0).unwrap();
        q.insert(1, 10.0);
        q.insert(2, 11.0);
        q.batch_prepend(vec![(3, 10.0), (4, 9.0)]);
        assert_eq!(q.len(), 1);
        let (_, vs) = q.pull().unwrap();
        assert_eq!(vs, vec![4]);
    }

    #[test]
    fn tail_block_splits_at_median() {
        let mut q = BlockQueue::new(4, INFINITY).unwrap();
        for (v, d) in [(0, 8.0), (1, 3.0), (2, 9.0), (3, 1.0), (4, 7.0)] {
            q.insert(v, d);
        }
        // Split leaves [1.0, 3.0] leading and [7.0, 8.0, 9.0] behind.
        let (b1, vs1) = q.pull().unwrap();
        assert_eq!(vs1, vec![3, 1]);
        assert_eq!(b1, 7.0);

        let (b2, vs2) = q.pull().unwrap();
        assert_eq!(vs2, vec![4, 0, 2]);
        assert_eq!(b2, INFINITY);
    }

    #[test]
    fn batch_prepend_serves_first_entries_first() {
        let mut q = BlockQueue::new(2, 100.0).unwrap();
        q.insert(9, 50.0);
        q.batch_prepend(vec![(0, 1.0), (1, 2.0), (2, 3.0), (3, 4.0), (4, 5.0)]);

        // Chunked from the tail: the short remainder chunk leads, and the
        // batch's entries drain in input order, before the insert zone.
        let (_, vs) = q.pull().unwrap();
        assert_eq!(vs, vec![0]);
        let (_, vs) = q.pull().unwrap();
        assert_eq!(vs, vec![1, 2]);
        let (_, vs) = q.pull().unwrap();
        assert_eq!(vs, vec![3, 4]);
        let (_, vs) = q.pull().unwrap();
        assert_eq!(vs, vec![9]);
        assert!(q.is_empty());
    }

    #[test]
    fn pull_bound_skips_ties_and_falls_back_to_global_bound() {
        let mut q = BlockQueue::new(2, 100.0).unwrap();
        q.batch_prepend(vec![(0, 5.0), (1, 5.0)]);
        q.insert(2, 5.0);
        q.insert(3, 8.0);

        // Remaining entries at 5.0 tie with the pulled maximum and must not
        // become the sub-slab bound.
        let (b, vs) = q.pull().unwrap();
        assert_eq!(vs, vec![0, 1]);
        assert_eq!(b, 8.0);

        let (b, vs) = q.pull().unwrap();
        assert_eq!(vs, vec![2, 3]);
        assert_eq!(b, 100.0);
    }

    #[test]
    fn pull_sequence_is_non_decreasing() {
        let mut q = BlockQueue::new(4, INFINITY).unwrap();
        for (v, d) in [
            (0, 8.0),
            (1, 3.0),
            (2, 9.0),
            (3, 1.0),
            (4, 7.0),
            (5, 5.0),
            (6, 2.0),
            (7, 6.5),
        ] {
            q.insert(v, d);
        }
        q.batch_prepend(vec![(10, 0.5), (11, 0.25)]);

        let mut best = HashMap::new();
        for (v, d) in [
            (0, 8.0),
            (1, 3.0),
            (2, 9.0),
            (3, 1.0),
            (4, 7.0),
            (5, 5.0),
            (6, 2.0),
            (7, 6.5),
            (10, 0.5),
            (11, 0.25),
        ] {
            best.insert(v as VertexId, d);
        }

        let mut last_leading = f64::NEG_INFINITY;
        for (_, vs) in drain(&mut q) {
            let leading = vs.iter().map(|v| best[v]).fold(INFINITY, f64::min);
            assert!(leading >= last_leading, "{leading} < {last_leading}");
            last_leading = leading;
        }
    }

    #[test]
    fn exhausted_pull_returns_none() {
        let mut q = BlockQueue::new(2, 10.0).unwrap();
        assert!(q.pull().is_none());
        q.insert(1, 1.0);
        assert!(q.pull().is_some());
        assert!(q.pull().is_none());
    }
}
