//! The capability interface graph algorithms are written against.
//!
//! Anything that can enumerate a node's incidence sequences, step through them
//! by stable position, and name the far endpoint of an edge can be walked by
//! the DFS engine in [`crate::graph::dfs`].

use core::fmt::Debug;
use core::hash::Hash;
use serde::{Deserialize, Serialize};

/// Selects one of a node's three incidence sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Incidence {
    /// Every edge touching the node, in attach order. A self-loop occupies
    /// one slot.
    All,
    /// Edges whose source is the node.
    Outgoing,
    /// Edges whose destination is the node.
    Incoming,
}

impl Incidence {
    /// The directed sequence a walk follows: `Incoming` when reversed,
    /// otherwise `Outgoing`.
    #[inline]
    pub fn directed(reversed: bool) -> Self {
        if reversed {
            Self::Incoming
        } else {
            Self::Outgoing
        }
    }
}

/// Incidence enumeration, adjacency lookup, and stable positions.
///
/// # Panics
/// Implementations may panic when handed a handle or position that no longer
/// exists; the methods here are the engine's hot path and are not fallible.
pub trait IncidenceGraph {
    /// Stable handle to a node.
    type NodeId: Copy + Eq + Hash + Debug;
    /// Stable handle to an edge.
    type EdgeId: Copy + Eq + Hash + Debug;
    /// Stable handle to one slot of an incidence sequence.
    type Position: Copy + Eq + Debug;

    /// First slot of `node`'s `which` sequence.
    fn first_incidence(&self, node: Self::NodeId, which: Incidence) -> Option<Self::Position>;

    /// Slot after `pos` in the same sequence.
    fn next_incidence(&self, pos: Self::Position) -> Option<Self::Position>;

    /// Edge referred to by the slot at `pos`.
    fn incidence_edge(&self, pos: Self::Position) -> Self::EdgeId;

    /// Endpoint of `edge` opposite to `node`; `node` itself for a self-loop.
    fn adjacent_node(&self, edge: Self::EdgeId, node: Self::NodeId) -> Self::NodeId;
}
