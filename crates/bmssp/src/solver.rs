//! Recursive bounded multi-source solver
//!
//! Each activation splits its sources into pivots and witnesses, feeds the
//! pivots to a [`BlockQueue`] sized for its recursion level, and repeatedly
//! pulls a sub-slab, recurses one level down, and relaxes the settled
//! frontier back into the queue — batching relaxations that fall below the
//! sub-slab into a prepend batch. Level zero falls through to the bounded
//! base case.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::basecase::base_case;
use crate::distance::DistMap;
use crate::error::{BmsspError, Result};
use crate::graph::{Graph, VertexId, VertexSet, Weight, INFINITY};
use crate::pivots::find_pivots;
use crate::queue::BlockQueue;

/// Maximum recursion depth the auto-derivation will request
const MAX_LEVELS: u32 = 12;

/// Tunable parameters of the solver.
///
/// The defaults (`k = 100`, `t = 1`, auto-derived level count) are
/// pragmatic choices that are correct on any input and fast on small and
/// medium graphs. [`SolverConfig::for_size`] instead applies the paper's
/// parameterisation — k = ⌊ln^(1/3) n⌋, t = ⌊ln^(2/3) n⌋ — which is what
/// delivers the O(m · log^(2/3) n) bound asymptotically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Vertex budget of the base case and pivot subtree threshold (≥ 2)
    pub k: usize,
    /// Block-capacity exponent: level ℓ uses capacity 2^((ℓ−1)·t)
    pub t: u32,
    /// Recursion level of the top call; `None` derives ⌈ln |V| / ln k⌉
    pub levels: Option<u32>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            k: 100,
            t: 1,
            levels: None,
        }
    }
}

impl SolverConfig {
    /// Parameters from the paper's analysis for an expected vertex count
    pub fn for_size(n: usize) -> Self {
        let log_n = (n.max(2) as f64).ln();
        Self {
            k: (log_n.powf(1.0 / 3.0).floor() as usize).max(2),
            t: (log_n.powf(2.0 / 3.0).floor() as u32).max(1),
            levels: None,
        }
    }

    /// Validate parameter ranges
    pub fn validate(&self) -> Result<()> {
        if self.k < 2 {
            return Err(BmsspError::InvalidParameter {
                name: "k",
                reason: format!(
                    "vertex budget must be at least 2 so k^(2l) can cover the graph, got {}",
                    self.k
                ),
            });
        }
        if self.t == 0 {
            return Err(BmsspError::InvalidParameter {
                name: "t",
                reason: "block-capacity exponent must be at least 1".into(),
            });
        }
        if let Some(levels) = self.levels {
            if levels == 0 {
                return Err(BmsspError::InvalidParameter {
                    name: "levels",
                    reason: "recursion level must be at least 1".into(),
                });
            }
        }
        Ok(())
    }

    /// Recursion level for a graph with `n` vertices: pinned, or derived so
    /// that the top-level budget k^(2ℓ) is at least n².
    pub fn levels_for(&self, n: usize) -> u32 {
        if let Some(levels) = self.levels {
            return levels;
        }
        let n = n.max(2) as f64;
        let derived = (n.ln() / (self.k as f64).ln()).ceil() as u32;
        derived.clamp(1, MAX_LEVELS)
    }
}

/// Counters accumulated over one solve
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolverStats {
    /// Successful edge relaxations (distance writes)
    pub relaxations: u64,
    /// Blocks pulled from queues across all levels
    pub pulls: u64,
    /// Batches handed to `batch_prepend`
    pub batch_prepends: u64,
    /// Base-case invocations
    pub basecase_calls: u64,
    /// Base cases that overflowed their vertex budget
    pub basecase_truncations: u64,
    /// Frontier relaxation rounds spent finding pivots
    pub pivot_rounds: u64,
    /// Deepest recursion level observed (top call is depth 0)
    pub max_depth: u32,
}

struct Solver<'g> {
    graph: &'g Graph,
    k: usize,
    t: u32,
    stats: SolverStats,
}

impl<'g> Solver<'g> {
    fn new(graph: &'g Graph, config: &SolverConfig) -> Self {
        Self {
            graph,
            k: config.k,
            t: config.t,
            stats: SolverStats::default(),
        }
    }

    fn solve(
        &mut self,
        level: u32,
        bound: Weight,
        sources: Vec<VertexId>,
        dhat: &mut DistMap,
        depth: u32,
    ) -> Result<(Weight, VertexSet)> {
        self.stats.max_depth = self.stats.max_depth.max(depth);

        if level == 0 {
            let (b, settled) = base_case(self.graph, bound, &sources, self.k, dhat, &mut self.stats);
            return Ok((b, settled));
        }

        debug!(level, bound, sources = sources.len(), "solver activation");

        let selection = find_pivots(self.graph, bound, &sources, self.k, dhat, &mut self.stats);

        let capacity_shift = ((level - 1) as u64 * self.t as u64).min(32) as u32;
        let mut queue = BlockQueue::new(1usize << capacity_shift, bound)?;
        for &x in &selection.pivots {
            queue.insert(x, dhat.get(x));
        }

        let limit = (self.k as u64).saturating_pow(2u32.saturating_mul(level));
        let mut settled = VertexSet::new();
        let mut last_completed = bound;

        while (settled.len() as u64) < limit {
            let (sub_bound, sub_sources) = match queue.pull() {
                Some(pulled) => pulled,
                None => break,
            };
            self.stats.pulls += 1;

            let (completed_bound, sub_settled) =
                self.solve(level - 1, sub_bound, sub_sources.clone(), dhat, depth + 1)?;

            settled.extend(sub_settled.iter().copied());

            let mut batch: Vec<(VertexId, Weight)> = Vec::new();
            for &u in &sub_settled {
                let du = dhat.get(u);
                for edge in self.graph.out_edges(u) {
                    let nd = du + edge.weight;
                    let dv = dhat.get(edge.to);
                    // Strict improvements always reschedule the head, even a
                    // settled one (its earlier settlement was provisional).
                    // Equality reschedules only unsettled heads, so
                    // zero-weight cycles cannot circulate forever.
                    if nd < dv || (nd == dv && nd.is_finite() && !settled.contains(&edge.to)) {
                        if nd < dv {
                            dhat.set(edge.to, nd);
                            self.stats.relaxations += 1;
                        }
                        if nd >= sub_bound && nd < bound {
                            queue.insert(edge.to, nd);
                        } else if nd >= completed_bound && nd < sub_bound {
                            batch.push((edge.to, nd));
                        }
                        // Below completed_bound the recursive call has
                        // already settled and expanded the head.
                    }
                }
            }

            // Pulled sources the sub-call did not finish go back in front.
            for &x in &sub_sources {
                let dx = dhat.get(x);
                if dx >= completed_bound && dx < sub_bound && !sub_settled.contains(&x) {
                    batch.push((x, dx));
                }
            }

            if !batch.is_empty() {
                self.stats.batch_prepends += 1;
                queue.batch_prepend(batch);
            }

            last_completed = completed_bound;
        }

        // A drained queue completes the whole slab. Otherwise the vertex
        // budget stopped the loop and the sound claim is capped by both the
        // last completed sub-slab and the cheapest entry still queued.
        let final_bound = match queue.min_key() {
            None => bound,
            Some(pending) => {
                debug!(level, "vertex budget exhausted before queue drained");
                last_completed.min(pending).min(bound)
            }
        };
        for &w in &selection.witnesses {
            if dhat.get(w) < final_bound {
                settled.insert(w);
            }
        }

        debug!(level, final_bound, settled = settled.len(), "solver activation done");
        Ok((final_bound, settled))
    }
}

fn validate_bound(bound: Weight) -> Result<()> {
    if !(bound > 0.0) {
        return Err(BmsspError::InvalidParameter {
            name: "bound",
            reason: format!("distance bound must be positive, got {bound}"),
        });
    }
    Ok(())
}

/// Run the recursive solver at an explicit recursion level.
///
/// `dhat` must carry a tentative distance below `bound` for at least one
/// source for anything to settle. Returns the completed bound `B'` and the
/// set of vertices settled below it; every vertex whose final distance is
/// below `B'` carries its exact shortest distance in `dhat`.
pub fn bmssp(
    graph: &Graph,
    level: u32,
    bound: Weight,
    sources: &VertexSet,
    config: &SolverConfig,
    dhat: &mut DistMap,
) -> Result<(Weight, VertexSet)> {
    config.validate()?;
    validate_bound(bound)?;

    let mut solver = Solver::new(graph, config);
    solver.solve(level, bound, sources.iter().copied().collect(), dhat, 0)
}

/// Single-source convenience wrapper with default parameters.
///
/// Seeds every vertex of `graph` at [`INFINITY`], the source at zero, and
/// solves with the default configuration. With `bound` = [`INFINITY`] the
/// returned map holds exact shortest distances for every reachable vertex.
pub fn bmssp_single_source(graph: &Graph, source: VertexId, bound: Weight) -> Result<DistMap> {
    let (dhat, _) = bmssp_single_source_with(graph, source, bound, &SolverConfig::default())?;
    Ok(dhat)
}

/// Single-source solve with an explicit configuration, returning the solve
/// statistics alongside the distances.
pub fn bmssp_single_source_with(
    graph: &Graph,
    source: VertexId,
    bound: Weight,
    config: &SolverConfig,
) -> Result<(DistMap, SolverStats)> {
    config.validate()?;
    validate_bound(bound)?;

    let mut dhat: DistMap = graph.vertices().map(|v| (v, INFINITY)).collect();
    dhat.set(source, 0.0);

    let level = config.levels_for(graph.vertex_count());
    debug!(
        source,
        bound,
        level,
        k = config.k,
        t = config.t,
        "single-source solve"
    );

    let mut solver = Solver::new(graph, config);
    solver.solve(level, bound, vec![source], &mut dhat, 0)?;
    Ok((dhat, solver.stats))
}
