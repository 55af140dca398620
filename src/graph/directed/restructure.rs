//! Operations that rewire edges in place.
//!
//! All of them relink existing incidence slots instead of freeing and
//! reallocating them, so positions held by callers (a DFS cursor, say) keep
//! naming the same place in a sequence after the rewrite.

use std::collections::HashSet;

use super::{
    attach, detach, endpoint_mut, retarget, DiEdge, DiGraph, EdgePlacement, EdgeSlots, RemovedEdge,
    RemovedNode,
};
use crate::error::{GraphError, Result};
use crate::graph::{EdgeId, Incidence, NodeId};

/// Result of [`DiGraph::split_edge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitEdge<E> {
    /// The edge that was replaced.
    pub removed: RemovedEdge<E>,
    /// The node inserted between the former endpoints.
    pub node: NodeId,
    /// `source → node`; holds the old edge's slots at the source.
    pub first: EdgeId,
    /// `node → destination`; holds the old edge's slots at the destination.
    pub second: EdgeId,
}

/// Result of [`DiGraph::contract_edge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractedEdge<N, E> {
    /// The contracted edge.
    pub edge: RemovedEdge<E>,
    /// The former destination, merged into the source.
    pub node: RemovedNode<N>,
}

impl<N, E> DiGraph<N, E> {
    /// Re-attaches `edge` to new endpoints at the given positions.
    ///
    /// The edge keeps its handle, payload and place in the edge sequence.
    /// Only the slots of `edge` itself are freed and reallocated; every other
    /// slot and its position is untouched.
    ///
    /// # Errors
    /// Stale handles, or a placement position that is not a slot of the
    /// addressed sequence (including a slot of `edge` itself).
    pub fn move_edge(
        &mut self,
        edge: EdgeId,
        source: NodeId,
        destination: NodeId,
        placement: &EdgePlacement,
    ) -> Result<()> {
        self.edge_entry(edge)?;
        self.node_entry(source)?;
        self.node_entry(destination)?;
        self.check_placement(source, destination, placement, Some(edge))?;

        let Self {
            nodes, edges, incidence, ..
        } = self;
        let Some(record) = edges.get_mut(edge.0) else {
            return Err(GraphError::EdgeNotFound(edge));
        };
        detach(nodes, incidence, record.source, record.destination, record.slots);
        record.slots = attach(nodes, incidence, edge, source, destination, placement);
        record.source = source;
        record.destination = destination;
        tracing::trace!(%edge, %source, %destination, "moved edge");
        Ok(())
    }

    /// Replaces `source → destination` with `source → node → destination`.
    ///
    /// The new node is inserted into the node sequence before `node_before`,
    /// or appended. `first` takes over the old edge's combined and outgoing
    /// slots at the source, `second` its combined and incoming slots at the
    /// destination, and both take the old edge's place in the edge sequence.
    /// The new node's sequences are `all = [first, second]`, `in = [first]`,
    /// `out = [second]`.
    ///
    /// # Errors
    /// [`GraphError::EdgeNotFound`] or [`GraphError::NodeNotFound`] for stale
    /// handles.
    pub fn split_edge(
        &mut self,
        edge: EdgeId,
        node_data: N,
        first_data: E,
        second_data: E,
        node_before: Option<NodeId>,
    ) -> Result<SplitEdge<E>> {
        self.edge_entry(edge)?;
        let before = match node_before {
            Some(node) => Some(self.node_entry(node)?.order),
            None => None,
        };

        let mid = self.insert_node(node_data, before);
        let old = self.edges.free(edge.0).ok_or(GraphError::EdgeNotFound(edge))?;
        let (source, destination) = (old.source, old.destination);

        let Self {
            nodes,
            edges,
            edge_seq,
            edge_list,
            incidence,
            ..
        } = self;

        let first = EdgeId(edges.alloc_with(|idx| {
            let id = EdgeId(idx);
            retarget(edge_seq, old.order, id);
            retarget(incidence, old.slots.at_source, id);
            retarget(incidence, old.slots.out_pos, id);
            let node = endpoint_mut(nodes, mid);
            let at_destination = incidence.push_back(&mut node.incidence, id);
            let in_pos = incidence.push_back(&mut node.incidence_in, id);
            DiEdge {
                data: first_data,
                source,
                destination: mid,
                order: old.order,
                slots: EdgeSlots {
                    at_source: old.slots.at_source,
                    at_destination,
                    out_pos: old.slots.out_pos,
                    in_pos,
                },
                generation: 0,
            }
        }));

        let second = EdgeId(edges.alloc_with(|idx| {
            let id = EdgeId(idx);
            let order = edge_seq.insert_before(edge_list, edge_seq.next(old.order), id);
            let node = endpoint_mut(nodes, mid);
            let at_source = incidence.push_back(&mut node.incidence, id);
            let out_pos = incidence.push_back(&mut node.incidence_out, id);
            let at_destination = if source == destination {
                // The loop's single combined slot went to `first`; the new
                // slot goes right after it.
                let after = incidence.next(old.slots.at_source);
                let node = endpoint_mut(nodes, destination);
                incidence.insert_before(&mut node.incidence, after, id)
            } else {
                retarget(incidence, old.slots.at_destination, id);
                old.slots.at_destination
            };
            retarget(incidence, old.slots.in_pos, id);
            DiEdge {
                data: second_data,
                source: mid,
                destination,
                order,
                slots: EdgeSlots {
                    at_source,
                    at_destination,
                    out_pos,
                    in_pos: old.slots.in_pos,
                },
                generation: 0,
            }
        }));

        tracing::debug!(%edge, node = %mid, %first, %second, "split edge");
        Ok(SplitEdge {
            removed: RemovedEdge {
                id: edge,
                source,
                destination,
                data: old.data,
            },
            node: mid,
            first,
            second,
        })
    }

    /// Merges the destination of `edge` into its source.
    ///
    /// The destination's combined, incoming and outgoing sequences (without
    /// `edge`) are appended to the source's with their slots intact, and each
    /// surviving edge is re-pointed at the source. Edges that ran between the
    /// two endpoints become self-loops and drop their second combined slot.
    ///
    /// # Errors
    /// [`GraphError::EdgeNotFound`] for a stale handle and
    /// [`GraphError::SelfLoopContraction`] for a self-loop.
    pub fn contract_edge(&mut self, edge: EdgeId) -> Result<ContractedEdge<N, E>> {
        let record = self.edge_entry(edge)?;
        if record.is_self_loop() {
            return Err(GraphError::SelfLoopContraction(edge));
        }
        let (source, destination) = (record.source, record.destination);
        let removed = self.remove_edge(edge)?;

        let Self {
            nodes, edges, incidence, ..
        } = self;
        let dst = endpoint_mut(nodes, destination);
        let mut combined = core::mem::take(&mut dst.incidence);
        let mut outgoing = core::mem::take(&mut dst.incidence_out);
        let mut incoming = core::mem::take(&mut dst.incidence_in);

        let positions: Vec<_> = incidence.positions(&combined).collect();
        for pos in positions {
            let Some(&id) = incidence.get(pos) else {
                continue;
            };
            let Some(other) = edges.get_mut(id.0) else {
                panic!("slot of a missing edge {id}");
            };
            let was_loop = other.is_self_loop();
            if other.source == destination {
                other.source = source;
            }
            if other.destination == destination {
                other.destination = source;
            }
            if !was_loop && other.is_self_loop() {
                // Ran between the endpoints: keep the slot already at the source.
                incidence.remove(&mut combined, pos);
                if other.slots.at_source == pos {
                    other.slots.at_source = other.slots.at_destination;
                } else {
                    other.slots.at_destination = other.slots.at_source;
                }
            }
        }

        let src = endpoint_mut(nodes, source);
        incidence.append(&mut src.incidence, &mut combined);
        incidence.append(&mut src.incidence_out, &mut outgoing);
        incidence.append(&mut src.incidence_in, &mut incoming);

        let data = self.remove_node(destination)?;
        tracing::debug!(%edge, %source, %destination, "contracted edge");
        Ok(ContractedEdge {
            edge: removed,
            node: RemovedNode { id: destination, data },
        })
    }

    /// Rearranges `node`'s `which` sequence into the given edge order.
    ///
    /// Slots are relinked, not reallocated, so existing positions stay valid.
    ///
    /// # Errors
    /// [`GraphError::NodeNotFound`] for a stale node and
    /// [`GraphError::NotAPermutation`] if `order` is not a permutation of the
    /// current sequence.
    pub fn reorder_incidence(
        &mut self,
        node: NodeId,
        which: Incidence,
        order: &[EdgeId],
    ) -> Result<()> {
        let record = self.node_entry(node)?;
        if order.len() != record.degree_of(which) {
            return Err(GraphError::NotAPermutation(node));
        }

        let mut seen = HashSet::with_capacity(order.len());
        let mut slots = Vec::with_capacity(order.len());
        for &edge in order {
            let slot = self.edges.get(edge.0).and_then(|e| match which {
                Incidence::All if e.source == node => Some(e.slots.at_source),
                Incidence::All if e.destination == node => Some(e.slots.at_destination),
                Incidence::Outgoing if e.source == node => Some(e.slots.out_pos),
                Incidence::Incoming if e.destination == node => Some(e.slots.in_pos),
                _ => None,
            });
            match slot {
                Some(slot) if seen.insert(edge) => slots.push(slot),
                _ => return Err(GraphError::NotAPermutation(node)),
            }
        }

        let Self { nodes, incidence, .. } = self;
        let list = endpoint_mut(nodes, node).list_mut(which);
        for slot in slots {
            incidence.unlink(list, slot);
            incidence.link_before(list, slot, None);
        }
        Ok(())
    }
}
