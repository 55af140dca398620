//! Strongly-typed handles into a [`DiGraph`](crate::graph::DiGraph).
//!
//! Every handle wraps a generation-checked arena index, so a handle kept past
//! the removal of its entity never resolves to whatever reuses the slot.

use crate::alloc::GenerationalIndex;
use crate::collections::LinkPos;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Handle to a node.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) GenerationalIndex);

/// Handle to an edge.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub(crate) GenerationalIndex);

/// Position of one slot in one of a node's incidence sequences.
///
/// A position stays valid while the slot exists, across any amount of
/// unrelated mutation.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IncidencePos(pub(crate) LinkPos);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}v{}", self.0.index(), self.0.generation())
    }
}

impl fmt::Debug for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}v{}", self.0.index(), self.0.generation())
    }
}

impl fmt::Debug for IncidencePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.0.raw();
        write!(f, "p{}v{}", raw.index(), raw.generation())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for IncidencePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
