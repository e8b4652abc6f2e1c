//! Pivot selection over a bounded relaxation frontier
//!
//! Runs `k` rounds of frontier relaxation from the source set, recording a
//! shortest-path forest as distances improve, then keeps as pivots the
//! forest roots whose subtrees grew to at least `k` vertices. Large
//! subtrees are what justify recursing on a pivot; everything else is close
//! enough to a source to be finished by witnesses alone.

use std::collections::{HashMap, HashSet};

use crate::distance::DistMap;
use crate::graph::{Graph, VertexId, VertexSet, Weight};
use crate::solver::SolverStats;

/// Result of pivot selection: the pivot set P and the witness set W of every
/// vertex whose distance improved during exploration.
pub(crate) struct PivotSelection {
    pub pivots: Vec<VertexId>,
    pub witnesses: VertexSet,
}

/// Select pivots among `sources` for a solve bounded by `bound`.
///
/// If the witness set outgrows `k * |sources|` the frontier is expanding too
/// fast for subtree accounting to pay off and every source becomes a pivot.
pub(crate) fn find_pivots(
    graph: &Graph,
    bound: Weight,
    sources: &[VertexId],
    k: usize,
    dhat: &mut DistMap,
    stats: &mut SolverStats,
) -> PivotSelection {
    let mut witnesses: VertexSet = sources.iter().copied().collect();
    // Parent pointers assigned on strict improvement only, which keeps the
    // forest acyclic even across zero-weight cycles.
    let mut parent: HashMap<VertexId, VertexId> = HashMap::new();
    let mut frontier: Vec<VertexId> = sources.to_vec();

    for _ in 0..k {
        if frontier.is_empty() {
            break;
        }
        stats.pivot_rounds += 1;

        let mut next = Vec::new();
        let mut queued: HashSet<VertexId> = HashSet::new();
        for &u in &frontier {
            let du = dhat.get(u);
            for edge in graph.out_edges(u) {
                let nd = du + edge.weight;
                let dv = dhat.get(edge.to);
                // Equality keeps already-tight vertices in the witness set
                // and the frontier; parents only move on strict improvement,
                // which keeps the forest acyclic.
                if nd <= dv && nd.is_finite() {
                    if nd < dv {
                        dhat.set(edge.to, nd);
                        stats.relaxations += 1;
                        parent.insert(edge.to, u);
                    }
                    witnesses.insert(edge.to);
                    if nd < bound && queued.insert(edge.to) {
                        next.push(edge.to);
                    }
                }
            }
        }

        if witnesses.len() > k.saturating_mul(sources.len()) {
            return PivotSelection {
                pivots: sources.to_vec(),
                witnesses,
            };
        }
        frontier = next;
    }

    let pivots = roots_with_large_subtrees(&witnesses, &parent, k);
    PivotSelection { pivots, witnesses }
}

/// Forest roots (witnesses without a recorded parent) whose subtree holds at
/// least `k` witnesses.
fn roots_with_large_subtrees(
    witnesses: &VertexSet,
    parent: &HashMap<VertexId, VertexId>,
    k: usize,
) -> Vec<VertexId> {
    let mut children: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
    for (&v, &p) in parent {
        children.entry(p).or_default().push(v);
    }

    let roots: Vec<VertexId> = witnesses
        .iter()
        .copied()
        .filter(|v| !parent.contains_key(v))
        .collect();

    // Pre-order walk, then accumulate subtree sizes bottom-up in reverse.
    let mut order: Vec<VertexId> = Vec::with_capacity(witnesses.len());
    let mut stack: Vec<VertexId> = roots.clone();
    while let Some(v) = stack.pop() {
        order.push(v);
        if let Some(ch) = children.get(&v) {
            stack.extend(ch.iter().copied());
        }
    }

    let mut size: HashMap<VertexId, usize> = order.iter().map(|&v| (v, 1)).collect();
    for &v in order.iter().rev() {
        if let Some(&p) = parent.get(&v) {
            let sv = size[&v];
            *size.get_mut(&p).expect("parents precede children in the walk") += sv;
        }
    }

    roots
        .into_iter()
        .filter(|r| size.get(r).copied().unwrap_or(1) >= k)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::INFINITY;

    fn stats() -> SolverStats {
        SolverStats::default()
    }

    fn seeded(source: VertexId) -> DistMap {
        let mut d = DistMap::new();
        d.set(source, 0.0);
        d
    }

    #[test]
    fn star_center_becomes_pivot() {
        let mut g = Graph::new();
        for v in 1..=5 {
            g.add_edge(0, v, 1.0).unwrap();
        }
        let mut d = seeded(0);
        let mut st = stats();

        // k = 6 keeps the frontier under the bail-out threshold, so the
        // center is selected through its subtree of all six witnesses.
        let sel = find_pivots(&g, INFINITY, &[0], 6, &mut d, &mut st);
        assert_eq!(sel.pivots, vec![0]);
        assert_eq!(sel.witnesses.len(), 6);
        for v in 1..=5 {
            assert_eq!(d.get(v), 1.0);
        }
    }

    #[test]
    fn short_chain_yields_no_pivots() {
        let mut g = Graph::new();
        g.add_edge(0, 1, 1.0).unwrap();
        g.add_edge(1, 2, 1.0).unwrap();
        let mut d = seeded(0);
        let mut st = stats();

        // Subtree of the sole root has 3 vertices < k = 5.
        let sel = find_pivots(&g, INFINITY, &[0], 5, &mut d, &mut st);
        assert!(sel.pivots.is_empty());
        assert_eq!(sel.witnesses.len(), 3);
    }

    #[test]
    fn fast_growing_frontier_bails_out_with_sources_as_pivots() {
        let mut g = Graph::new();
        for v in 1..=8 {
            g.add_edge(0, v, 1.0).unwrap();
        }
        let mut d = seeded(0);
        let mut st = stats();

        // One round reaches 9 witnesses > k * |S| = 1.
        let sel = find_pivots(&g, INFINITY, &[0], 1, &mut d, &mut st);
        assert_eq!(sel.pivots, vec![0]);
        assert_eq!(sel.witnesses.len(), 9);
    }

    #[test]
    fn bound_limits_expansion_but_not_witnessing() {
        let mut g = Graph::new();
        g.add_edge(0, 1, 5.0).unwrap();
        g.add_edge(1, 2, 5.0).unwrap();
        let mut d = seeded(0);
        let mut st = stats();

        // Vertex 1 improves to 5.0 >= bound: witnessed but never expanded,
        // so vertex 2 stays untouched.
        let sel = find_pivots(&g, 5.0, &[0], 3, &mut d, &mut st);
        assert!(sel.witnesses.contains(&1));
        assert!(!sel.witnesses.contains(&2));
        assert_eq!(d.get(1), 5.0);
        assert_eq!(d.get(2), INFINITY);
        assert!(sel.pivots.is_empty());
    }

    #[test]
    fn zero_weight_cycle_terminates() {
        let mut g = Graph::new();
        g.add_edge(0, 1, 0.0).unwrap();
        g.add_edge(1, 0, 0.0).unwrap();
        g.add_edge(1, 2, 1.0).unwrap();
        let mut d = seeded(0);
        let mut st = stats();

        let sel = find_pivots(&g, INFINITY, &[0], 4, &mut d, &mut st);
        assert_eq!(d.get(1), 0.0);
        assert_eq!(d.get(2), 1.0);
        assert!(sel.witnesses.contains(&2));
    }
}
