//! Reference unbounded Dijkstra
//!
//! Classic binary-heap implementation with lazy deletion. Not on the BMSSP
//! critical path; kept public for testing and benchmarking against the
//! bounded solver.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::distance::DistMap;
use crate::graph::{Graph, VertexId, INFINITY};

/// Compute shortest distances from `source` to every vertex of `graph`.
///
/// Returns a map holding every vertex that appears in the graph as a tail
/// or head; unreachable vertices carry [`INFINITY`].
pub fn dijkstra(graph: &Graph, source: VertexId) -> DistMap {
    let mut dist: DistMap = graph.vertices().map(|v| (v, INFINITY)).collect();
    dist.set(source, 0.0);

    // Min-heap via Reverse; OrderedFloat gives f64 keys a total order.
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, VertexId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), source)));

    while let Some(Reverse((OrderedFloat(d), u))) = heap.pop() {
        if d > dist.get(u) {
            continue; // stale entry
        }
        for edge in graph.out_edges(u) {
            let nd = d + edge.weight;
            if nd < dist.get(edge.to) {
                dist.set(edge.to, nd);
                heap.push(Reverse((OrderedFloat(nd), edge.to)));
            }
        }
    }

    dist
}
