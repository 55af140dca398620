//! Errors reported by structural graph operations.

use thiserror::Error;

use crate::graph::{EdgeId, IncidencePos, NodeId};

/// Errors reported by the structural operations of [`DiGraph`](crate::graph::DiGraph).
///
/// Every variant describes caller misuse: a handle that no longer exists, a
/// position that belongs to a different sequence, or a precondition the
/// operation documents. The graph is left unchanged whenever one of these is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The node handle is stale or belongs to another graph.
    #[error("node {0} does not exist in this graph")]
    NodeNotFound(NodeId),

    /// The edge handle is stale or belongs to another graph.
    #[error("edge {0} does not exist in this graph")]
    EdgeNotFound(EdgeId),

    /// A plain node removal was requested while edges are still attached.
    #[error("node {node} still has {degree} incident edge(s)")]
    NodeHasIncidentEdges {
        /// Node whose removal was refused.
        node: NodeId,
        /// Its degree at the time of the call.
        degree: usize,
    },

    /// An insertion point does not belong to the sequence it was given for.
    #[error("position {position} is not a slot of the expected incidence sequence of node {node}")]
    PositionMismatch {
        /// Node whose sequence was addressed.
        node: NodeId,
        /// The offending position.
        position: IncidencePos,
    },

    /// Self-loops have a single endpoint and cannot be contracted.
    #[error("edge {0} is a self-loop and cannot be contracted")]
    SelfLoopContraction(EdgeId),

    /// A copied edge references a node that is not part of the copy.
    #[error("edge {edge} cannot be copied: endpoint {node} is not copied")]
    EndpointNotCopied {
        /// Edge being copied.
        edge: EdgeId,
        /// Missing endpoint.
        node: NodeId,
    },

    /// A reorder request is not a permutation of the current sequence.
    #[error("new incidence order for node {0} is not a permutation of its current sequence")]
    NotAPermutation(NodeId),
}

/// Result alias for structural graph operations.
pub type Result<T> = core::result::Result<T, GraphError>;
