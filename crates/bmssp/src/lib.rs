//! # BMSSP
//!
//! Single-source shortest paths on directed, non-negatively weighted graphs
//! using the Bounded Multi-Source Shortest Path technique of Duan et al.,
//! "Breaking the Sorting Barrier for Directed Single-Source Shortest Paths"
//! (arXiv:2504.17033).
//!
//! Instead of maintaining one totally ordered priority queue, the solver
//! explores the graph in bounded distance slabs: each recursion level picks
//! a small set of pivot vertices whose shortest-path subtrees are large
//! enough to pay for recursing, and batches everything else through a
//! block-structured queue that supports constant-amortised prepends. The
//! result is O(m · log^(2/3) n) work against Dijkstra's O(m · log n).
//!
//! ## Example
//!
//! ```
//! use bmssp::{bmssp_single_source, Graph, INFINITY};
//!
//! # fn main() -> bmssp::Result<()> {
//! let mut graph = Graph::new();
//! graph.add_edge(0, 1, 2.0)?;
//! graph.add_edge(1, 2, 1.0)?;
//! graph.add_edge(0, 2, 5.0)?;
//!
//! let dist = bmssp_single_source(&graph, 0, INFINITY)?;
//! assert_eq!(dist.get(2), 3.0);
//! # Ok(())
//! # }
//! ```
//!
//! The classic binary-heap [`dijkstra`] is included as the reference
//! implementation for testing and benchmarking.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod basecase;
pub mod dijkstra;
pub mod distance;
pub mod error;
pub mod graph;
mod pivots;
pub mod queue;
pub mod solver;

pub use dijkstra::dijkstra;
pub use distance::DistMap;
pub use error::{BmsspError, Result};
pub use graph::{Edge, Graph, VertexId, VertexSet, Weight, INFINITY};
pub use queue::BlockQueue;
pub use solver::{
    bmssp, bmssp_single_source, bmssp_single_source_with, SolverConfig, SolverStats,
};
