//! `DiGraph` - a mutable directed multigraph with stable handles and positions.
//!
//! Nodes and edges carry user payloads and live in generational pools. Each
//! node owns three incidence sequences (all / outgoing / incoming) whose slots
//! live in one shared [`LinkArena`]; the graph additionally keeps one global
//! node sequence and one global edge sequence.
//!
//! Every edge remembers the exact slots it occupies, so detaching an edge
//! never scans a sequence, and a slot handed out as an [`IncidencePos`] stays
//! valid until the edge leaves that particular sequence.
//!
//! Parallel edges and self-loops are allowed. A self-loop occupies a single
//! slot of its node's combined sequence, one outgoing slot and one incoming
//! slot.
//!
//! # Performance
//! | Operation | Complexity |
//! |-----------|------------|
//! | `add_node` / `add_edge` | \(O(1)\) amortized |
//! | `remove_edge` / `move_edge` / `split_edge` | \(O(1)\) |
//! | `remove_node_with_edges` | \(O(\deg)\) |
//! | `contract_edge` | \(O(\deg(\text{dst}))\) |
//! | `reorder_incidence` | \(O(\deg)\) |
//! | subgraph moves | \(O(V + E)\) of the source graph |

use crate::alloc::GenerationalPool;
use crate::collections::{LinkArena, LinkPos, ListHead};
use crate::error::{GraphError, Result};
use crate::graph::{EdgeId, Incidence, IncidenceGraph, IncidencePos, NodeId};

mod invariants;
mod restructure;
mod subgraph;

#[cfg(test)]
mod tests;

pub use restructure::{ContractedEdge, SplitEdge};
pub use subgraph::{SubgraphCopy, SubgraphMove};

/// A node record: payload, sequence slot and the three incidence sequences.
#[derive(Debug, Clone)]
pub struct DiNode<N> {
    data: N,
    order: LinkPos,
    incidence: ListHead,
    incidence_out: ListHead,
    incidence_in: ListHead,
    generation: u64,
}

impl<N> DiNode<N> {
    /// The node payload.
    #[inline]
    pub fn data(&self) -> &N {
        &self.data
    }

    /// The node payload, mutably.
    #[inline]
    pub fn data_mut(&mut self) -> &mut N {
        &mut self.data
    }

    /// Number of slots in the combined sequence (a self-loop counts once).
    #[inline]
    pub fn degree(&self) -> usize {
        self.incidence.len()
    }

    /// Number of outgoing edges.
    #[inline]
    pub fn out_degree(&self) -> usize {
        self.incidence_out.len()
    }

    /// Number of incoming edges.
    #[inline]
    pub fn in_degree(&self) -> usize {
        self.incidence_in.len()
    }

    /// Length of the `which` sequence.
    #[inline]
    pub fn degree_of(&self, which: Incidence) -> usize {
        self.list(which).len()
    }

    /// Freshness tag for external bookkeeping.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Overwrites the freshness tag.
    #[inline]
    pub fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    pub(crate) fn list(&self, which: Incidence) -> &ListHead {
        match which {
            Incidence::All => &self.incidence,
            Incidence::Outgoing => &self.incidence_out,
            Incidence::Incoming => &self.incidence_in,
        }
    }

    pub(crate) fn list_mut(&mut self, which: Incidence) -> &mut ListHead {
        match which {
            Incidence::All => &mut self.incidence,
            Incidence::Outgoing => &mut self.incidence_out,
            Incidence::Incoming => &mut self.incidence_in,
        }
    }
}

/// The four incidence slots an edge occupies.
///
/// For a self-loop `at_source == at_destination`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EdgeSlots {
    pub(crate) at_source: LinkPos,
    pub(crate) at_destination: LinkPos,
    pub(crate) out_pos: LinkPos,
    pub(crate) in_pos: LinkPos,
}

/// An edge record: payload, endpoints and the slots it occupies.
#[derive(Debug, Clone)]
pub struct DiEdge<E> {
    data: E,
    source: NodeId,
    destination: NodeId,
    order: LinkPos,
    slots: EdgeSlots,
    generation: u64,
}

impl<E> DiEdge<E> {
    /// The edge payload.
    #[inline]
    pub fn data(&self) -> &E {
        &self.data
    }

    /// The edge payload, mutably.
    #[inline]
    pub fn data_mut(&mut self) -> &mut E {
        &mut self.data
    }

    /// Tail of the edge.
    #[inline]
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Head of the edge.
    #[inline]
    pub fn destination(&self) -> NodeId {
        self.destination
    }

    /// Returns `true` if both endpoints are the same node.
    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.destination
    }

    /// Endpoint opposite to `node`, or `None` if `node` is not an endpoint.
    #[inline]
    pub fn adjacent_node(&self, node: NodeId) -> Option<NodeId> {
        if node == self.source {
            Some(self.destination)
        } else if node == self.destination {
            Some(self.source)
        } else {
            None
        }
    }

    /// Slot of this edge in the source's combined sequence.
    #[inline]
    pub fn source_pos(&self) -> IncidencePos {
        IncidencePos(self.slots.at_source)
    }

    /// Slot of this edge in the destination's combined sequence.
    #[inline]
    pub fn destination_pos(&self) -> IncidencePos {
        IncidencePos(self.slots.at_destination)
    }

    /// Slot of this edge in the source's outgoing sequence.
    #[inline]
    pub fn out_pos(&self) -> IncidencePos {
        IncidencePos(self.slots.out_pos)
    }

    /// Slot of this edge in the destination's incoming sequence.
    #[inline]
    pub fn in_pos(&self) -> IncidencePos {
        IncidencePos(self.slots.in_pos)
    }

    /// Freshness tag for external bookkeeping.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Overwrites the freshness tag.
    #[inline]
    pub fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }
}

/// Where a new or moved edge is linked into each sequence it joins.
///
/// `None` appends. A position must be a slot of the sequence it is given for,
/// otherwise the operation fails with [`GraphError::PositionMismatch`].
/// `before_at_destination` is ignored for self-loops, which have one combined
/// slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgePlacement {
    /// Insertion point in the source's combined sequence.
    pub before_at_source: Option<IncidencePos>,
    /// Insertion point in the destination's combined sequence.
    pub before_at_destination: Option<IncidencePos>,
    /// Insertion point in the source's outgoing sequence.
    pub before_out: Option<IncidencePos>,
    /// Insertion point in the destination's incoming sequence.
    pub before_in: Option<IncidencePos>,
    /// Insertion point in the graph's edge sequence.
    pub before_edge: Option<EdgeId>,
}

/// An edge detached from the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedEdge<E> {
    /// Handle the edge had; it no longer resolves.
    pub id: EdgeId,
    /// Former tail.
    pub source: NodeId,
    /// Former head.
    pub destination: NodeId,
    /// The payload.
    pub data: E,
}

/// A node detached from the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedNode<N> {
    /// Handle the node had; it no longer resolves.
    pub id: NodeId,
    /// The payload.
    pub data: N,
}

/// A directed multigraph with ordered incidence sequences.
#[derive(Debug, Clone)]
pub struct DiGraph<N, E> {
    nodes: GenerationalPool<DiNode<N>>,
    edges: GenerationalPool<DiEdge<E>>,
    node_seq: LinkArena<NodeId>,
    node_list: ListHead,
    edge_seq: LinkArena<EdgeId>,
    edge_list: ListHead,
    incidence: LinkArena<EdgeId>,
    generation: u64,
}

impl<N, E> Default for DiGraph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> DiGraph<N, E> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: GenerationalPool::new(),
            edges: GenerationalPool::new(),
            node_seq: LinkArena::new(),
            node_list: ListHead::new(),
            edge_seq: LinkArena::new(),
            edge_list: ListHead::new(),
            incidence: LinkArena::new(),
            generation: 0,
        }
    }

    /// Creates an empty graph with room for the given number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: GenerationalPool::with_capacity(nodes),
            edges: GenerationalPool::with_capacity(edges),
            node_seq: LinkArena::with_capacity(nodes),
            node_list: ListHead::new(),
            edge_seq: LinkArena::with_capacity(edges),
            edge_list: ListHead::new(),
            incidence: LinkArena::with_capacity(edges.saturating_mul(4)),
            generation: 0,
        }
    }

    // Nodes

    /// Appends a node to the node sequence.
    pub fn add_node(&mut self, data: N) -> NodeId {
        self.insert_node(data, None)
    }

    /// Inserts a node into the node sequence before `before`.
    ///
    /// # Errors
    /// [`GraphError::NodeNotFound`] if `before` is stale.
    pub fn add_node_before(&mut self, data: N, before: NodeId) -> Result<NodeId> {
        let order = self.node_entry(before)?.order;
        Ok(self.insert_node(data, Some(order)))
    }

    pub(crate) fn insert_node(&mut self, data: N, before: Option<LinkPos>) -> NodeId {
        let Self {
            nodes,
            node_seq,
            node_list,
            ..
        } = self;
        let idx = nodes.alloc_with(|idx| DiNode {
            data,
            order: node_seq.insert_before(node_list, before, NodeId(idx)),
            incidence: ListHead::new(),
            incidence_out: ListHead::new(),
            incidence_in: ListHead::new(),
            generation: 0,
        });
        let id = NodeId(idx);
        tracing::trace!(node = %id, "added node");
        id
    }

    /// Removes an isolated node and returns its payload.
    ///
    /// # Errors
    /// [`GraphError::NodeNotFound`] if `node` is stale and
    /// [`GraphError::NodeHasIncidentEdges`] if edges are still attached.
    pub fn remove_node(&mut self, node: NodeId) -> Result<N> {
        let degree = self.node_entry(node)?.degree();
        if degree > 0 {
            return Err(GraphError::NodeHasIncidentEdges { node, degree });
        }
        let record = self.nodes.free(node.0).ok_or(GraphError::NodeNotFound(node))?;
        self.node_seq.remove(&mut self.node_list, record.order);
        tracing::trace!(node = %node, "removed node");
        Ok(record.data)
    }

    /// Removes a node together with every edge touching it.
    ///
    /// The removed edges are returned in the order of the node's combined
    /// sequence.
    ///
    /// # Errors
    /// [`GraphError::NodeNotFound`] if `node` is stale.
    pub fn remove_node_with_edges(&mut self, node: NodeId) -> Result<(N, Vec<RemovedEdge<E>>)> {
        let attached: Vec<EdgeId> = self.incident_edges_of(node, Incidence::All)?.collect();
        let removed = attached
            .into_iter()
            .map(|edge| self.remove_edge(edge))
            .collect::<Result<Vec<_>>>()?;
        let data = self.remove_node(node)?;
        Ok((data, removed))
    }

    // Edges

    /// Appends an edge from `source` to `destination` to every sequence it
    /// joins.
    ///
    /// # Errors
    /// [`GraphError::NodeNotFound`] if either endpoint is stale.
    pub fn add_edge(&mut self, data: E, source: NodeId, destination: NodeId) -> Result<EdgeId> {
        self.add_edge_with(data, source, destination, &EdgePlacement::default())
    }

    /// Inserts an edge at explicit positions of each sequence it joins.
    ///
    /// # Errors
    /// [`GraphError::NodeNotFound`] / [`GraphError::EdgeNotFound`] for stale
    /// handles and [`GraphError::PositionMismatch`] for a position outside the
    /// sequence it was given for.
    pub fn add_edge_with(
        &mut self,
        data: E,
        source: NodeId,
        destination: NodeId,
        placement: &EdgePlacement,
    ) -> Result<EdgeId> {
        self.node_entry(source)?;
        self.node_entry(destination)?;
        self.check_placement(source, destination, placement, None)?;
        let before_edge = match placement.before_edge {
            Some(edge) => Some(self.edge_entry(edge)?.order),
            None => None,
        };

        let Self {
            nodes,
            edges,
            edge_seq,
            edge_list,
            incidence,
            ..
        } = self;
        let idx = edges.alloc_with(|idx| {
            let id = EdgeId(idx);
            DiEdge {
                data,
                source,
                destination,
                order: edge_seq.insert_before(edge_list, before_edge, id),
                slots: attach(nodes, incidence, id, source, destination, placement),
                generation: 0,
            }
        });
        let id = EdgeId(idx);
        tracing::trace!(edge = %id, %source, %destination, "added edge");
        Ok(id)
    }

    /// Removes an edge from every sequence and returns it.
    ///
    /// # Errors
    /// [`GraphError::EdgeNotFound`] if `edge` is stale.
    pub fn remove_edge(&mut self, edge: EdgeId) -> Result<RemovedEdge<E>> {
        let record = self.edges.free(edge.0).ok_or(GraphError::EdgeNotFound(edge))?;
        self.edge_seq.remove(&mut self.edge_list, record.order);
        detach(
            &mut self.nodes,
            &mut self.incidence,
            record.source,
            record.destination,
            record.slots,
        );
        tracing::trace!(%edge, "removed edge");
        Ok(RemovedEdge {
            id: edge,
            source: record.source,
            destination: record.destination,
            data: record.data,
        })
    }

    // Queries

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `node` names a live node.
    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.contains(node.0)
    }

    /// Returns `true` if `edge` names a live edge.
    #[inline]
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edges.contains(edge.0)
    }

    /// The node record behind `node`.
    #[inline]
    pub fn node(&self, node: NodeId) -> Option<&DiNode<N>> {
        self.nodes.get(node.0)
    }

    /// The node record behind `node`, mutably.
    #[inline]
    pub fn node_mut(&mut self, node: NodeId) -> Option<&mut DiNode<N>> {
        self.nodes.get_mut(node.0)
    }

    /// The edge record behind `edge`.
    #[inline]
    pub fn edge(&self, edge: EdgeId) -> Option<&DiEdge<E>> {
        self.edges.get(edge.0)
    }

    /// The edge record behind `edge`, mutably.
    #[inline]
    pub fn edge_mut(&mut self, edge: EdgeId) -> Option<&mut DiEdge<E>> {
        self.edges.get_mut(edge.0)
    }

    /// Node records with their handles, in storage order.
    pub fn node_records_mut(&mut self) -> impl Iterator<Item = (NodeId, &mut DiNode<N>)> + '_ {
        self.nodes.iter_mut().map(|(idx, node)| (NodeId(idx), node))
    }

    /// Edge records with their handles, in storage order.
    pub fn edge_records_mut(&mut self) -> impl Iterator<Item = (EdgeId, &mut DiEdge<E>)> + '_ {
        self.edges.iter_mut().map(|(idx, edge)| (EdgeId(idx), edge))
    }

    /// Node handles in node-sequence order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_seq.iter(&self.node_list).copied()
    }

    /// Edge handles in edge-sequence order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edge_seq.iter(&self.edge_list).copied()
    }

    /// Edges of `node`'s `which` sequence, front to back.
    ///
    /// # Panics
    /// Panics if `node` is stale.
    pub fn incident_edges(
        &self,
        node: NodeId,
        which: Incidence,
    ) -> impl Iterator<Item = EdgeId> + '_ {
        self.incidence.iter(self.node_ref(node).list(which)).copied()
    }

    /// Slots of `node`'s `which` sequence, front to back.
    ///
    /// # Panics
    /// Panics if `node` is stale.
    pub fn incidence_positions(
        &self,
        node: NodeId,
        which: Incidence,
    ) -> impl ExactSizeIterator<Item = IncidencePos> + '_ {
        self.incidence
            .positions(self.node_ref(node).list(which))
            .map(IncidencePos)
    }

    /// Edge occupying the slot at `pos`, if the slot still exists.
    #[inline]
    pub fn edge_at(&self, pos: IncidencePos) -> Option<EdgeId> {
        self.incidence.get(pos.0).copied()
    }

    // Generations

    /// The graph-wide generation counter.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Overwrites the graph-wide generation counter.
    #[inline]
    pub fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    /// Increments the graph-wide generation counter and returns the new value.
    pub fn advance_generation(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Zeroes the generation tag of the graph and of every node and edge.
    pub fn reset_generation(&mut self) {
        self.generation = 0;
        for (_, node) in self.node_records_mut() {
            node.generation = 0;
        }
        for (_, edge) in self.edge_records_mut() {
            edge.generation = 0;
        }
    }

    // Internal helpers

    pub(crate) fn node_entry(&self, node: NodeId) -> Result<&DiNode<N>> {
        self.nodes.get(node.0).ok_or(GraphError::NodeNotFound(node))
    }

    pub(crate) fn edge_entry(&self, edge: EdgeId) -> Result<&DiEdge<E>> {
        self.edges.get(edge.0).ok_or(GraphError::EdgeNotFound(edge))
    }

    pub(crate) fn node_ref(&self, node: NodeId) -> &DiNode<N> {
        self.nodes
            .get(node.0)
            .unwrap_or_else(|| panic!("node {node} does not exist in this graph"))
    }

    pub(crate) fn edge_ref(&self, edge: EdgeId) -> &DiEdge<E> {
        self.edges
            .get(edge.0)
            .unwrap_or_else(|| panic!("edge {edge} does not exist in this graph"))
    }

    pub(crate) fn incident_edges_of(
        &self,
        node: NodeId,
        which: Incidence,
    ) -> Result<impl Iterator<Item = EdgeId> + '_> {
        let list = self.node_entry(node)?.list(which);
        Ok(self.incidence.iter(list).copied())
    }

    /// Checks every insertion point of `placement` against the sequence it
    /// addresses. Slots owned by `moving` are rejected.
    pub(crate) fn check_placement(
        &self,
        source: NodeId,
        destination: NodeId,
        placement: &EdgePlacement,
        moving: Option<EdgeId>,
    ) -> Result<()> {
        if let Some(pos) = placement.before_at_source {
            self.check_position(source, Incidence::All, pos, moving)?;
        }
        if source != destination {
            if let Some(pos) = placement.before_at_destination {
                self.check_position(destination, Incidence::All, pos, moving)?;
            }
        }
        if let Some(pos) = placement.before_out {
            self.check_position(source, Incidence::Outgoing, pos, moving)?;
        }
        if let Some(pos) = placement.before_in {
            self.check_position(destination, Incidence::Incoming, pos, moving)?;
        }
        if let Some(edge) = placement.before_edge {
            self.edge_entry(edge)?;
        }
        Ok(())
    }

    fn check_position(
        &self,
        node: NodeId,
        which: Incidence,
        pos: IncidencePos,
        moving: Option<EdgeId>,
    ) -> Result<()> {
        let mismatch = GraphError::PositionMismatch { node, position: pos };
        let Some(&edge) = self.incidence.get(pos.0) else {
            return Err(mismatch);
        };
        if moving == Some(edge) {
            return Err(mismatch);
        }
        let Some(record) = self.edges.get(edge.0) else {
            return Err(mismatch);
        };
        let slots = record.slots;
        let belongs = match which {
            Incidence::All => {
                (record.source == node && slots.at_source == pos.0)
                    || (record.destination == node && slots.at_destination == pos.0)
            }
            Incidence::Outgoing => record.source == node && slots.out_pos == pos.0,
            Incidence::Incoming => record.destination == node && slots.in_pos == pos.0,
        };
        if belongs {
            Ok(())
        } else {
            Err(mismatch)
        }
    }
}

impl<N, E> IncidenceGraph for DiGraph<N, E> {
    type NodeId = NodeId;
    type EdgeId = EdgeId;
    type Position = IncidencePos;

    #[inline]
    fn first_incidence(&self, node: NodeId, which: Incidence) -> Option<IncidencePos> {
        self.node_ref(node).list(which).first().map(IncidencePos)
    }

    #[inline]
    fn next_incidence(&self, pos: IncidencePos) -> Option<IncidencePos> {
        assert!(self.incidence.contains(pos.0), "stale incidence position {pos}");
        self.incidence.next(pos.0).map(IncidencePos)
    }

    #[inline]
    fn incidence_edge(&self, pos: IncidencePos) -> EdgeId {
        self.edge_at(pos)
            .unwrap_or_else(|| panic!("stale incidence position {pos}"))
    }

    #[inline]
    fn adjacent_node(&self, edge: EdgeId, node: NodeId) -> NodeId {
        self.edge_ref(edge)
            .adjacent_node(node)
            .unwrap_or_else(|| panic!("node {node} is not an endpoint of edge {edge}"))
    }
}

/// Resolves a node that an edge record refers to.
///
/// Endpoints of live edges always exist, so a miss means the graph's own
/// bookkeeping is broken.
pub(crate) fn endpoint_mut<N>(
    nodes: &mut GenerationalPool<DiNode<N>>,
    node: NodeId,
) -> &mut DiNode<N> {
    nodes
        .get_mut(node.0)
        .unwrap_or_else(|| panic!("endpoint {node} of a live edge is missing"))
}

/// Points an existing slot at a different edge.
pub(crate) fn retarget(arena: &mut LinkArena<EdgeId>, pos: LinkPos, edge: EdgeId) {
    match arena.get_mut(pos) {
        Some(slot) => *slot = edge,
        None => panic!("slot {pos:?} of a live edge is missing"),
    }
}

/// Links a new edge into its endpoints' sequences.
pub(crate) fn attach<N>(
    nodes: &mut GenerationalPool<DiNode<N>>,
    incidence: &mut LinkArena<EdgeId>,
    edge: EdgeId,
    source: NodeId,
    destination: NodeId,
    placement: &EdgePlacement,
) -> EdgeSlots {
    let before = |pos: Option<IncidencePos>| pos.map(|p| p.0);

    let src = endpoint_mut(nodes, source);
    let pos = before(placement.before_at_source);
    let at_source = incidence.insert_before(&mut src.incidence, pos, edge);
    let pos = before(placement.before_out);
    let out_pos = incidence.insert_before(&mut src.incidence_out, pos, edge);

    let dst = endpoint_mut(nodes, destination);
    let at_destination = if source == destination {
        at_source
    } else {
        let pos = before(placement.before_at_destination);
        incidence.insert_before(&mut dst.incidence, pos, edge)
    };
    let pos = before(placement.before_in);
    let in_pos = incidence.insert_before(&mut dst.incidence_in, pos, edge);

    EdgeSlots {
        at_source,
        at_destination,
        out_pos,
        in_pos,
    }
}

/// Unlinks and frees every slot of an edge.
pub(crate) fn detach<N>(
    nodes: &mut GenerationalPool<DiNode<N>>,
    incidence: &mut LinkArena<EdgeId>,
    source: NodeId,
    destination: NodeId,
    slots: EdgeSlots,
) {
    let src = endpoint_mut(nodes, source);
    incidence.remove(&mut src.incidence, slots.at_source);
    incidence.remove(&mut src.incidence_out, slots.out_pos);

    let dst = endpoint_mut(nodes, destination);
    if source != destination {
        incidence.remove(&mut dst.incidence, slots.at_destination);
    }
    incidence.remove(&mut dst.incidence_in, slots.in_pos);
}
