//! Bounded base case of the recursion
//!
//! A binary-heap Dijkstra capped by both a distance bound and a vertex
//! budget. When the budget overflows, the farthest settled distance becomes
//! the returned bound and everything at or beyond it is handed back to the
//! caller unsettled.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::distance::DistMap;
use crate::graph::{Graph, VertexId, VertexSet, Weight};
use crate::solver::SolverStats;

/// Run a bounded Dijkstra from `sources`, settling at most `k` vertices
/// below `bound`.
///
/// Returns `(bound, settled)` when the exploration exhausted itself within
/// the budget: every settled vertex then carries its exact distance below
/// `bound`. On budget overflow (`k + 1` settlements) the maximum settled
/// distance `b_max` is returned instead, together with the settled vertices
/// strictly below it.
///
/// The recursion only ever passes singleton source sets; any non-empty set
/// with distances below `bound` works.
pub(crate) fn base_case(
    graph: &Graph,
    bound: Weight,
    sources: &[VertexId],
    k: usize,
    dhat: &mut DistMap,
    stats: &mut SolverStats,
) -> (Weight, VertexSet) {
    stats.basecase_calls += 1;

    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, VertexId)>> = BinaryHeap::new();
    for &x in sources {
        heap.push(Reverse((OrderedFloat(dhat.get(x)), x)));
    }

    let mut settled = VertexSet::new();
    let mut truncated = false;

    while let Some(Reverse((OrderedFloat(d), u))) = heap.pop() {
        if d > dhat.get(u) {
            continue; // stale entry
        }
        if d >= bound {
            break;
        }
        if !settled.insert(u) {
            continue;
        }
        if settled.len() > k {
            truncated = true;
            break;
        }
        for edge in graph.out_edges(u) {
            let nd = d + edge.weight;
            let dv = dhat.get(edge.to);
            // Equality still enqueues: a head whose distance was pre-set by
            // pivot exploration has to be settled and expanded here.
            if nd <= dv && nd < bound {
                if nd < dv {
                    dhat.set(edge.to, nd);
                    stats.relaxations += 1;
                }
                heap.push(Reverse((OrderedFloat(nd), edge.to)));
            }
        }
    }

    if !truncated {
        return (bound, settled);
    }

    stats.basecase_truncations += 1;
    let b_max = settled
        .iter()
        .map(|&v| dhat.get(v))
        .fold(f64::NEG_INFINITY, f64::max);
    settled.retain(|&v| dhat.get(v) < b_max);
    debug!(
        settled = settled.len(),
        b_max, "base case truncated at vertex budget"
    );
    (b_max, settled)
}
