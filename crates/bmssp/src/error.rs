//! Error types for graph construction and solver invocation

use thiserror::Error;

use crate::graph::VertexId;

/// Result type for BMSSP operations
pub type Result<T> = std::result::Result<T, BmsspError>;

/// Errors that can occur while building a graph or configuring a solve
#[derive(Debug, Error)]
pub enum BmsspError {
    /// Edge weight was negative or NaN
    #[error("invalid weight {weight} on edge {from} -> {to}: weights must be non-negative and not NaN")]
    InvalidWeight {
        /// Tail vertex of the offending edge
        from: VertexId,
        /// Head vertex of the offending edge
        to: VertexId,
        /// The rejected weight
        weight: f64,
    },

    /// A solver parameter was outside its valid range
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name (`k`, `t`, `bound`, `capacity`)
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}
