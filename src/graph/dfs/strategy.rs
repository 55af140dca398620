//! The hook table a DFS-based algorithm implements.

use serde::{Deserialize, Serialize};

use super::state::DfsGraph;

/// Callbacks fired by [`DfsDiExplorer`](super::DfsDiExplorer).
///
/// Every hook receives the graph mutably, so an algorithm may restructure
/// the graph or redirect cursors (see [`DfsGraph::set_next_dfs_edge`]) in the
/// middle of a walk. All hooks default to doing nothing. An `Err` from any
/// hook ends the current step and is returned unchanged to the caller.
#[allow(unused_variables)]
pub trait DfsDiStrategy<G: DfsGraph> {
    /// Error type hooks may fail with.
    type Error;

    /// `node` has just been entered. It is already marked visited.
    fn enter_node(&mut self, graph: &mut G, node: G::NodeId) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Every edge of `node` has been examined; the walk returns to its parent.
    fn leave_node(&mut self, graph: &mut G, node: G::NodeId) -> Result<(), Self::Error> {
        Ok(())
    }

    /// `edge` leads from `node` to an already visited node (including
    /// `node` itself).
    fn process_frond(
        &mut self,
        graph: &mut G,
        node: G::NodeId,
        edge: G::EdgeId,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Decides whether the walk descends along the candidate tree edge `edge`.
    fn is_visiting_child(
        &mut self,
        graph: &mut G,
        node: G::NodeId,
        edge: G::EdgeId,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }

    /// [`is_visiting_child`](Self::is_visiting_child) declined `edge`.
    fn not_visiting_child(
        &mut self,
        graph: &mut G,
        node: G::NodeId,
        edge: G::EdgeId,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// The walk is about to descend from `node` along `edge`.
    fn before_visiting_child(
        &mut self,
        graph: &mut G,
        node: G::NodeId,
        edge: G::EdgeId,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// The walk has returned to `node` from the child reached over `edge`.
    fn after_visiting_child(
        &mut self,
        graph: &mut G,
        node: G::NodeId,
        edge: G::EdgeId,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Whether `node` still has edges to classify. Not called by the
    /// explorer; algorithms use it to look ahead.
    fn is_there_unexplored(&mut self, graph: &mut G, node: G::NodeId) -> Result<bool, Self::Error> {
        Ok(graph.is_there_unexplored(node))
    }

    /// Once `true`, the explorer stops after the current step.
    fn is_early_out(&self) -> bool {
        false
    }

    /// Clears the early-out latch. Called at the start of every
    /// [`run`](super::DfsDiExplorer::run).
    fn reset_early_out(&mut self) {}
}

/// A reusable early-out latch for strategy implementations.
///
/// ```
/// use stepgraph::graph::dfs::{DfsDiStrategy, DfsGraph, EarlyOut};
///
/// struct FirstLeaf<G: DfsGraph> {
///     leaf: Option<G::NodeId>,
///     early_out: EarlyOut,
/// }
///
/// impl<G: DfsGraph> DfsDiStrategy<G> for FirstLeaf<G> {
///     type Error = core::convert::Infallible;
///
///     fn leave_node(&mut self, _graph: &mut G, node: G::NodeId) -> Result<(), Self::Error> {
///         self.leaf.get_or_insert(node);
///         self.early_out.set();
///         Ok(())
///     }
///
///     fn is_early_out(&self) -> bool {
///         self.early_out.is_set()
///     }
///
///     fn reset_early_out(&mut self) {
///         self.early_out.reset();
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlyOut(bool);

impl EarlyOut {
    /// A cleared latch.
    pub const fn new() -> Self {
        Self(false)
    }

    /// Requests the walk to stop after the current step.
    #[inline]
    pub fn set(&mut self) {
        self.0 = true;
    }

    /// Clears the request.
    #[inline]
    pub fn reset(&mut self) {
        self.0 = false;
    }

    /// Whether a stop was requested.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.0
    }
}
