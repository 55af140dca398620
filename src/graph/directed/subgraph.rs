//! Induced subgraphs, cut sets, and moving or copying parts of a graph.
//!
//! Every mutating operation here runs as a pure query phase (which nodes,
//! which edges, which boundary) followed by a commit phase. All validation
//! happens in the query phase, so a failed call leaves both graphs untouched.

use std::collections::{HashMap, HashSet};

use super::{DiGraph, RemovedEdge};
use crate::error::{GraphError, Result};
use crate::graph::{EdgeId, Incidence, NodeId};

/// Result of moving an induced subgraph into another graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubgraphMove<E> {
    /// `(old, new)` node handles, in the order the nodes were moved.
    pub nodes: Vec<(NodeId, NodeId)>,
    /// `(old, new)` edge handles, in the order the edges were moved.
    pub edges: Vec<(EdgeId, EdgeId)>,
    /// Boundary edges removed from the source graph.
    pub cut: Vec<RemovedEdge<E>>,
}

impl<E> SubgraphMove<E> {
    /// New handle of a moved node.
    pub fn node(&self, old: NodeId) -> Option<NodeId> {
        self.nodes.iter().find(|(from, _)| *from == old).map(|&(_, to)| to)
    }

    /// New handle of a moved edge.
    pub fn edge(&self, old: EdgeId) -> Option<EdgeId> {
        self.edges.iter().find(|(from, _)| *from == old).map(|&(_, to)| to)
    }
}

/// Result of [`DiGraph::copy_subgraph`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubgraphCopy {
    /// `(original, copy)` node handles.
    pub nodes: Vec<(NodeId, NodeId)>,
    /// `(original, copy)` edge handles.
    pub edges: Vec<(EdgeId, EdgeId)>,
}

/// Per-node incidence orders captured before a move.
struct RecordedNode {
    id: NodeId,
    all: Vec<EdgeId>,
    outgoing: Vec<EdgeId>,
    incoming: Vec<EdgeId>,
}

impl<N, E> DiGraph<N, E> {
    /// Edges with both endpoints in `nodes`.
    ///
    /// Walks the given nodes' outgoing sequences in order, so the result
    /// follows the caller's node order and then outgoing order.
    ///
    /// # Errors
    /// [`GraphError::NodeNotFound`] for a stale node.
    pub fn node_induced_edges(&self, nodes: &[NodeId]) -> Result<Vec<EdgeId>> {
        let inside = self.node_set(nodes)?;
        let mut walked = HashSet::with_capacity(nodes.len());
        let mut induced = Vec::new();
        for &node in nodes {
            if !walked.insert(node) {
                continue;
            }
            for edge in self.incident_edges(node, Incidence::Outgoing) {
                if inside.contains(&self.edge_ref(edge).destination) {
                    induced.push(edge);
                }
            }
        }
        Ok(induced)
    }

    /// Endpoints of `edges`, in order of first appearance.
    ///
    /// # Errors
    /// [`GraphError::EdgeNotFound`] for a stale edge.
    pub fn edge_induced_nodes(&self, edges: &[EdgeId]) -> Result<Vec<NodeId>> {
        let mut seen = HashSet::new();
        let mut induced = Vec::new();
        for &edge in edges {
            let record = self.edge_entry(edge)?;
            for node in [record.source, record.destination] {
                if seen.insert(node) {
                    induced.push(node);
                }
            }
        }
        Ok(induced)
    }

    /// Of the given edges, those with exactly one endpoint in `nodes`.
    ///
    /// Order follows `edges`; duplicates are reported once. Self-loops are
    /// never cut.
    ///
    /// # Errors
    /// Stale node or edge handles.
    pub fn find_cut_set(&self, edges: &[EdgeId], nodes: &[NodeId]) -> Result<Vec<EdgeId>> {
        let inside = self.node_set(nodes)?;
        let mut seen = HashSet::with_capacity(edges.len());
        let mut cut = Vec::new();
        for &edge in edges {
            let record = self.edge_entry(edge)?;
            let crossing = inside.contains(&record.source) != inside.contains(&record.destination);
            if crossing && seen.insert(edge) {
                cut.push(edge);
            }
        }
        Ok(cut)
    }

    /// Removes the cut set of `edges` with respect to `nodes` and returns it.
    ///
    /// # Errors
    /// Stale node or edge handles; nothing is removed in that case.
    pub fn remove_cut_set(
        &mut self,
        edges: &[EdgeId],
        nodes: &[NodeId],
    ) -> Result<Vec<RemovedEdge<E>>> {
        let cut = self.find_cut_set(edges, nodes)?;
        let removed = cut
            .into_iter()
            .map(|edge| self.remove_edge(edge))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(removed = removed.len(), "removed cut set");
        Ok(removed)
    }

    /// All edges directly between `a` and `b`, in either direction.
    ///
    /// `a == b` yields the self-loops of `a`. Scans the combined sequence of
    /// whichever endpoint has the smaller degree.
    ///
    /// # Errors
    /// [`GraphError::NodeNotFound`] for a stale node.
    pub fn find_multi_edges(&self, a: NodeId, b: NodeId) -> Result<Vec<EdgeId>> {
        let (near, far) = if self.node_entry(a)?.degree() <= self.node_entry(b)?.degree() {
            (a, b)
        } else {
            (b, a)
        };
        Ok(self
            .incident_edges(near, Incidence::All)
            .filter(|&edge| self.edge_ref(edge).adjacent_node(near) == Some(far))
            .collect())
    }

    /// Moves the subgraph induced by `nodes` into `dest`.
    ///
    /// Every edge with exactly one endpoint in `nodes` is removed and
    /// returned as the cut. Moved nodes and edges keep their relative
    /// sequence order, and each moved node keeps the relative order of its
    /// three incidence sequences.
    ///
    /// # Errors
    /// [`GraphError::NodeNotFound`] for a stale node; nothing moves then.
    pub fn move_node_induced_subgraph(
        &mut self,
        nodes: &[NodeId],
        dest: &mut Self,
    ) -> Result<SubgraphMove<E>> {
        let inside = self.node_set(nodes)?;
        let touching = self.touching_edges(nodes);
        let cut = self.find_cut_set(&touching, nodes)?;
        let crossing: HashSet<EdgeId> = cut.iter().copied().collect();
        let interior: HashSet<EdgeId> = touching
            .into_iter()
            .filter(|edge| !crossing.contains(edge))
            .collect();

        let removed = cut
            .into_iter()
            .map(|edge| self.remove_edge(edge))
            .collect::<Result<Vec<_>>>()?;
        let (nodes, edges) = self.transplant(&inside, &interior, dest)?;
        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            cut = removed.len(),
            "moved node-induced subgraph"
        );
        Ok(SubgraphMove {
            nodes,
            edges,
            cut: removed,
        })
    }

    /// Moves the subgraph induced by `edges` into `dest`.
    ///
    /// The induced nodes are the endpoints of `edges`. Every other edge
    /// touching an induced node is removed and returned as the cut.
    ///
    /// # Errors
    /// [`GraphError::EdgeNotFound`] for a stale edge; nothing moves then.
    pub fn move_edge_induced_subgraph(
        &mut self,
        edges: &[EdgeId],
        dest: &mut Self,
    ) -> Result<SubgraphMove<E>> {
        let nodes = self.edge_induced_nodes(edges)?;
        let inside: HashSet<NodeId> = nodes.iter().copied().collect();
        let selected: HashSet<EdgeId> = edges.iter().copied().collect();
        let boundary: Vec<EdgeId> = self
            .touching_edges(&nodes)
            .into_iter()
            .filter(|edge| !selected.contains(edge))
            .collect();

        let removed = boundary
            .into_iter()
            .map(|edge| self.remove_edge(edge))
            .collect::<Result<Vec<_>>>()?;
        let (nodes, edges) = self.transplant(&inside, &selected, dest)?;
        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            cut = removed.len(),
            "moved edge-induced subgraph"
        );
        Ok(SubgraphMove {
            nodes,
            edges,
            cut: removed,
        })
    }

    /// Attaches copies of the given nodes and edges to `dest`.
    ///
    /// Each pair is an original handle and the payload for its copy. Copies
    /// are added in the given order, then each copied node's sequences are
    /// rearranged to match the original's order restricted to the copied
    /// edges. A handle listed twice is copied once; the later payload is
    /// dropped. The source graph is not modified.
    ///
    /// # Errors
    /// Stale handles, and [`GraphError::EndpointNotCopied`] if an edge's
    /// endpoint is not among the copied nodes. `dest` is untouched on error.
    pub fn copy_subgraph<N2, E2>(
        &self,
        node_pairs: Vec<(NodeId, N2)>,
        edge_pairs: Vec<(EdgeId, E2)>,
        dest: &mut DiGraph<N2, E2>,
    ) -> Result<SubgraphCopy> {
        let node_pairs = dedup_pairs(node_pairs);
        let edge_pairs = dedup_pairs(edge_pairs);
        for (node, _) in &node_pairs {
            self.node_entry(*node)?;
        }
        let copied: HashSet<NodeId> = node_pairs.iter().map(|(node, _)| *node).collect();
        for (edge, _) in &edge_pairs {
            let record = self.edge_entry(*edge)?;
            for node in [record.source, record.destination] {
                if !copied.contains(&node) {
                    return Err(GraphError::EndpointNotCopied { edge: *edge, node });
                }
            }
        }

        let mut node_map = HashMap::with_capacity(node_pairs.len());
        let mut copy = SubgraphCopy::default();
        for (node, data) in node_pairs {
            let new = dest.add_node(data);
            node_map.insert(node, new);
            copy.nodes.push((node, new));
        }

        let mut edge_map = HashMap::with_capacity(edge_pairs.len());
        for (edge, data) in edge_pairs {
            let record = self.edge_ref(edge);
            let new = dest.add_edge(data, node_map[&record.source], node_map[&record.destination])?;
            edge_map.insert(edge, new);
            copy.edges.push((edge, new));
        }

        for &(old, new) in &copy.nodes {
            for which in [Incidence::All, Incidence::Outgoing, Incidence::Incoming] {
                let order: Vec<EdgeId> = self
                    .incident_edges(old, which)
                    .filter_map(|edge| edge_map.get(&edge).copied())
                    .collect();
                dest.reorder_incidence(new, which, &order)?;
            }
        }

        tracing::debug!(nodes = copy.nodes.len(), edges = copy.edges.len(), "copied subgraph");
        Ok(copy)
    }

    /// Validates `nodes` and collects them into a set.
    fn node_set(&self, nodes: &[NodeId]) -> Result<HashSet<NodeId>> {
        nodes
            .iter()
            .map(|&node| self.node_entry(node).map(|_| node))
            .collect()
    }

    /// Every edge touching one of `nodes`, in discovery order, without
    /// duplicates. `nodes` must be validated.
    fn touching_edges(&self, nodes: &[NodeId]) -> Vec<EdgeId> {
        let mut seen = HashSet::new();
        let mut touching = Vec::new();
        for &node in nodes {
            for edge in self.incident_edges(node, Incidence::All) {
                if seen.insert(edge) {
                    touching.push(edge);
                }
            }
        }
        touching
    }

    /// Moves `nodes` and the `edges` between them into `dest`, keeping
    /// sequence orders. No edge outside `edges` may touch `nodes`.
    fn transplant(
        &mut self,
        nodes: &HashSet<NodeId>,
        edges: &HashSet<EdgeId>,
        dest: &mut Self,
    ) -> Result<(Vec<(NodeId, NodeId)>, Vec<(EdgeId, EdgeId)>)> {
        let ordered_nodes: Vec<NodeId> = self.nodes().filter(|node| nodes.contains(node)).collect();
        let ordered_edges: Vec<EdgeId> = self.edges().filter(|edge| edges.contains(edge)).collect();

        let recorded: Vec<RecordedNode> = ordered_nodes
            .iter()
            .map(|&id| RecordedNode {
                id,
                all: self.incident_edges(id, Incidence::All).collect(),
                outgoing: self.incident_edges(id, Incidence::Outgoing).collect(),
                incoming: self.incident_edges(id, Incidence::Incoming).collect(),
            })
            .collect();

        let mut detached = Vec::with_capacity(ordered_edges.len());
        for &edge in &ordered_edges {
            let generation = self.edge_ref(edge).generation;
            detached.push((self.remove_edge(edge)?, generation));
        }

        let mut node_map = HashMap::with_capacity(recorded.len());
        let mut node_pairs = Vec::with_capacity(recorded.len());
        for record in &recorded {
            let generation = self.node_ref(record.id).generation;
            let data = self.remove_node(record.id)?;
            let new = dest.add_node(data);
            if let Some(node) = dest.node_mut(new) {
                node.generation = generation;
            }
            node_map.insert(record.id, new);
            node_pairs.push((record.id, new));
        }

        let mut edge_map = HashMap::with_capacity(detached.len());
        let mut edge_pairs = Vec::with_capacity(detached.len());
        for (removed, generation) in detached {
            let (source, destination) = (node_map[&removed.source], node_map[&removed.destination]);
            let new = dest.add_edge(removed.data, source, destination)?;
            if let Some(edge) = dest.edge_mut(new) {
                edge.generation = generation;
            }
            edge_map.insert(removed.id, new);
            edge_pairs.push((removed.id, new));
        }

        let remap =
            |order: &[EdgeId]| -> Vec<EdgeId> { order.iter().map(|edge| edge_map[edge]).collect() };
        for record in &recorded {
            let new = node_map[&record.id];
            dest.reorder_incidence(new, Incidence::All, &remap(&record.all))?;
            dest.reorder_incidence(new, Incidence::Outgoing, &remap(&record.outgoing))?;
            dest.reorder_incidence(new, Incidence::Incoming, &remap(&record.incoming))?;
        }

        Ok((node_pairs, edge_pairs))
    }
}

/// Keeps the first pair for each handle, preserving order.
fn dedup_pairs<K: Copy + Eq + std::hash::Hash, V>(pairs: Vec<(K, V)>) -> Vec<(K, V)> {
    let mut seen = HashSet::with_capacity(pairs.len());
    pairs.into_iter().filter(|(key, _)| seen.insert(*key)).collect()
}
