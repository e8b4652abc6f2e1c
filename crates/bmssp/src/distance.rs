//! Tentative distance map d̂
//!
//! Maps vertices to the current upper bound on their shortest distance from
//! the source set. An absent key reads as [`INFINITY`], so callers only need
//! to seed the sources. During a solve every write is monotone: a distance
//! never grows.

use std::collections::HashMap;

use crate::graph::{VertexId, Weight, INFINITY};

/// Mutable vertex → tentative distance mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistMap {
    inner: HashMap<VertexId, Weight>,
}

impl DistMap {
    /// Create an empty map (every vertex reads as infinite)
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tentative distance of `v`; [`INFINITY`] when absent
    pub fn get(&self, v: VertexId) -> Weight {
        self.inner.get(&v).copied().unwrap_or(INFINITY)
    }

    /// Overwrite the tentative distance of `v`
    pub fn set(&mut self, v: VertexId, d: Weight) {
        self.inner.insert(v, d);
    }

    /// Whether `v` has a finite recorded distance
    pub fn is_reached(&self, v: VertexId) -> bool {
        self.get(v) < INFINITY
    }

    /// Number of vertices with a recorded entry (finite or seeded infinite)
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate recorded `(vertex, distance)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, Weight)> + '_ {
        self.inner.iter().map(|(&v, &d)| (v, d))
    }
}

impl FromIterator<(VertexId, Weight)> for DistMap {
    fn from_iter<I: IntoIterator<Item = (VertexId, Weight)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
