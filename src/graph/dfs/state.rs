//! Per-node and per-edge traversal state and the cursor operations on it.
//!
//! The state is stored as a decoration next to the user payload
//! ([`DfsDiNode`], [`DfsDiEdge`]) and reached through the [`DfsGraph`]
//! capability, so the explorer itself carries nothing but a node handle.

use serde::{Deserialize, Serialize};

use crate::graph::{DiGraph, EdgeId, Incidence, IncidenceGraph, IncidencePos, NodeId};

/// A position in a node's active incidence sequence, or past its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cursor<P> {
    /// The slot the next examination looks at.
    At(P),
    /// The sequence is exhausted.
    End,
}

impl<P> Cursor<P> {
    /// Returns `true` past the end of the sequence.
    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    /// The slot under the cursor.
    #[inline]
    pub fn position(self) -> Option<P> {
        match self {
            Self::At(pos) => Some(pos),
            Self::End => None,
        }
    }
}

impl<P> From<Option<P>> for Cursor<P> {
    #[inline]
    fn from(pos: Option<P>) -> Self {
        pos.map_or(Self::End, Self::At)
    }
}

/// Traversal state of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfsNodeState<I = NodeId, P = IncidencePos> {
    pub(crate) visited: bool,
    pub(crate) reversed: bool,
    pub(crate) waiting_for_child: bool,
    pub(crate) cursor: Cursor<P>,
    pub(crate) deferred_cursor: Option<Cursor<P>>,
    pub(crate) parent_in_dfs: Option<I>,
}

impl<I, P> Default for DfsNodeState<I, P> {
    fn default() -> Self {
        Self {
            visited: false,
            reversed: false,
            waiting_for_child: false,
            cursor: Cursor::End,
            deferred_cursor: None,
            parent_in_dfs: None,
        }
    }
}

impl<I, P> DfsNodeState<I, P> {
    /// Clears the state and selects the walk direction.
    pub fn reset(&mut self, reversed: bool) {
        *self = Self {
            reversed,
            ..Self::default()
        };
    }

    /// Whether the walk has entered the node.
    #[inline]
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Whether the walk follows incoming instead of outgoing edges.
    #[inline]
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Whether the node is suspended on a child (or inside a hook for the
    /// edge under its cursor).
    #[inline]
    pub fn is_waiting_for_child(&self) -> bool {
        self.waiting_for_child
    }

    /// Where the node's exploration stands.
    #[inline]
    pub fn cursor(&self) -> Cursor<P>
    where
        P: Copy,
    {
        self.cursor
    }

    /// A redirection waiting to replace the next advance, if any.
    #[inline]
    pub fn deferred_cursor(&self) -> Option<Cursor<P>>
    where
        P: Copy,
    {
        self.deferred_cursor
    }

    /// The node this one was entered from; `None` for the start node.
    #[inline]
    pub fn parent_in_dfs(&self) -> Option<I>
    where
        I: Copy,
    {
        self.parent_in_dfs
    }
}

/// Traversal state of one edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfsEdgeState {
    pub(crate) visited: bool,
}

impl DfsEdgeState {
    /// Clears the classification.
    #[inline]
    pub fn reset(&mut self) {
        self.visited = false;
    }

    /// Whether the edge has been classified as a tree edge or a frond.
    #[inline]
    pub fn is_visited(&self) -> bool {
        self.visited
    }
}

/// Access to the traversal state carried by a node payload.
pub trait DfsNodeData {
    /// The node's traversal state.
    fn dfs(&self) -> &DfsNodeState;
    /// The node's traversal state, mutably.
    fn dfs_mut(&mut self) -> &mut DfsNodeState;
}

/// Access to the traversal state carried by an edge payload.
pub trait DfsEdgeData {
    /// The edge's traversal state.
    fn dfs(&self) -> &DfsEdgeState;
    /// The edge's traversal state, mutably.
    fn dfs_mut(&mut self) -> &mut DfsEdgeState;
}

/// A node payload decorated with traversal state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfsDiNode<T = ()> {
    dfs: DfsNodeState,
    /// The user payload.
    pub data: T,
}

impl<T> DfsDiNode<T> {
    /// Wraps `data` with fresh traversal state.
    pub fn new(data: T) -> Self {
        Self {
            dfs: DfsNodeState::default(),
            data,
        }
    }
}

impl<T> DfsNodeData for DfsDiNode<T> {
    #[inline]
    fn dfs(&self) -> &DfsNodeState {
        &self.dfs
    }

    #[inline]
    fn dfs_mut(&mut self) -> &mut DfsNodeState {
        &mut self.dfs
    }
}

/// An edge payload decorated with traversal state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfsDiEdge<T = ()> {
    dfs: DfsEdgeState,
    /// The user payload.
    pub data: T,
}

impl<T> DfsDiEdge<T> {
    /// Wraps `data` with fresh traversal state.
    pub fn new(data: T) -> Self {
        Self {
            dfs: DfsEdgeState::default(),
            data,
        }
    }
}

impl<T> DfsEdgeData for DfsDiEdge<T> {
    #[inline]
    fn dfs(&self) -> &DfsEdgeState {
        &self.dfs
    }

    #[inline]
    fn dfs_mut(&mut self) -> &mut DfsEdgeState {
        &mut self.dfs
    }
}

/// A directed graph whose payloads carry traversal state.
pub type DfsDiGraph<N = (), E = ()> = DiGraph<DfsDiNode<N>, DfsDiEdge<E>>;

/// Graphs the DFS explorer can walk.
///
/// Implementors supply access to the per-node and per-edge state; the cursor
/// operations are provided on top of [`IncidenceGraph`].
pub trait DfsGraph: IncidenceGraph {
    /// Traversal state of `node`.
    fn dfs_node(&self, node: Self::NodeId) -> &DfsNodeState<Self::NodeId, Self::Position>;

    /// Traversal state of `node`, mutably.
    fn dfs_node_mut(
        &mut self,
        node: Self::NodeId,
    ) -> &mut DfsNodeState<Self::NodeId, Self::Position>;

    /// Traversal state of `edge`.
    fn dfs_edge(&self, edge: Self::EdgeId) -> &DfsEdgeState;

    /// Traversal state of `edge`, mutably.
    fn dfs_edge_mut(&mut self, edge: Self::EdgeId) -> &mut DfsEdgeState;

    /// Clears the state of every node and edge and selects the direction
    /// of the next walk.
    fn reset_dfs(&mut self, reversed: bool);

    /// Prepares `node` to be entered from `parent`: unvisited, not waiting,
    /// cursor at the start of the active sequence, no deferred redirection.
    ///
    /// A child takes its direction from `parent`, so nodes created after the
    /// last reset follow the walk's direction.
    fn init_exploration(&mut self, node: Self::NodeId, parent: Option<Self::NodeId>) {
        let reversed = match parent {
            Some(parent) => self.dfs_node(parent).reversed,
            None => self.dfs_node(node).reversed,
        };
        let first = Cursor::from(self.first_incidence(node, Incidence::directed(reversed)));
        let state = self.dfs_node_mut(node);
        state.reversed = reversed;
        state.parent_in_dfs = parent;
        state.waiting_for_child = false;
        state.visited = false;
        state.cursor = first;
        state.deferred_cursor = None;
    }

    /// Cursor one slot after `cursor`.
    fn next_cursor(&self, cursor: Cursor<Self::Position>) -> Cursor<Self::Position> {
        match cursor {
            Cursor::At(pos) => Cursor::from(self.next_incidence(pos)),
            Cursor::End => Cursor::End,
        }
    }

    /// The cursor the node continues from once the slot under the cursor is
    /// done. While waiting, that slot counts as processed.
    fn resume_cursor(&self, node: Self::NodeId) -> Cursor<Self::Position> {
        let state = self.dfs_node(node);
        if state.waiting_for_child {
            match state.deferred_cursor {
                Some(next) => next,
                None => self.next_cursor(state.cursor),
            }
        } else {
            state.cursor
        }
    }

    /// Returns `true` if no slot of the active sequence is left to examine.
    fn has_explored_all_edges(&self, node: Self::NodeId) -> bool {
        self.resume_cursor(node).is_end()
    }

    /// Returns `true` if a slot holding a not-yet-classified edge is left.
    ///
    /// A pending redirection counts as unexplored work on its own.
    fn is_there_unexplored(&self, node: Self::NodeId) -> bool {
        let state = self.dfs_node(node);
        if state.waiting_for_child {
            if let Some(next) = state.deferred_cursor {
                return !next.is_end();
            }
        }
        let mut cursor = self.resume_cursor(node);
        while let Cursor::At(pos) = cursor {
            if !self.dfs_edge(self.incidence_edge(pos)).visited {
                return true;
            }
            cursor = self.next_cursor(cursor);
        }
        false
    }

    /// The edge under `node`'s cursor.
    fn current_dfs_edge(&self, node: Self::NodeId) -> Option<Self::EdgeId> {
        self.dfs_node(node)
            .cursor
            .position()
            .map(|pos| self.incidence_edge(pos))
    }

    /// Moves the cursor to the deferred redirection if one is set, otherwise
    /// one slot forward.
    fn advance_dfs_edge(&mut self, node: Self::NodeId) {
        let state = self.dfs_node(node);
        let next = match state.deferred_cursor {
            Some(next) => next,
            None => self.next_cursor(state.cursor),
        };
        let state = self.dfs_node_mut(node);
        state.cursor = next;
        state.deferred_cursor = None;
    }

    /// Redirects the remaining exploration of `node` to `target`.
    ///
    /// - `node` not yet visited: no effect.
    /// - `node` waiting for a child, or inside a hook for the edge under its
    ///   cursor: `target` becomes the next slot examined once control returns
    ///   to `node`; slots in between are skipped without hooks.
    /// - otherwise (from `enter_node`, or between steps): `target` is the next
    ///   slot examined.
    ///
    /// Called from `leave_node` it has no effect on the walk, since the node
    /// is finished. `target` must be a slot of the node's active sequence, or
    /// [`Cursor::End`] to skip the rest.
    fn set_next_dfs_edge(&mut self, node: Self::NodeId, target: Cursor<Self::Position>) {
        let state = self.dfs_node_mut(node);
        if !state.visited {
            return;
        }
        if state.waiting_for_child {
            state.deferred_cursor = Some(target);
        } else {
            state.cursor = target;
            state.deferred_cursor = None;
        }
    }
}

impl<N, E> DfsGraph for DiGraph<N, E>
where
    N: DfsNodeData,
    E: DfsEdgeData,
{
    #[inline]
    fn dfs_node(&self, node: NodeId) -> &DfsNodeState {
        self.node_ref(node).data().dfs()
    }

    #[inline]
    fn dfs_node_mut(&mut self, node: NodeId) -> &mut DfsNodeState {
        self.node_mut(node)
            .unwrap_or_else(|| panic!("node {node} does not exist in this graph"))
            .data_mut()
            .dfs_mut()
    }

    #[inline]
    fn dfs_edge(&self, edge: EdgeId) -> &DfsEdgeState {
        self.edge_ref(edge).data().dfs()
    }

    #[inline]
    fn dfs_edge_mut(&mut self, edge: EdgeId) -> &mut DfsEdgeState {
        self.edge_mut(edge)
            .unwrap_or_else(|| panic!("edge {edge} does not exist in this graph"))
            .data_mut()
            .dfs_mut()
    }

    fn reset_dfs(&mut self, reversed: bool) {
        for (_, node) in self.node_records_mut() {
            node.data_mut().dfs_mut().reset(reversed);
        }
        for (_, edge) in self.edge_records_mut() {
            edge.data_mut().dfs_mut().reset();
        }
    }
}
