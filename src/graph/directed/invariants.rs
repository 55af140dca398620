//! Structural self-check for [`DiGraph`].
//!
//! Every check is debug-asserted with a message, so a violation stops a debug
//! build at the first broken invariant while release builds just report
//! `false`.

use super::{DiEdge, DiGraph};
use crate::graph::{EdgeId, IncidencePos, NodeId};

/// Debug-asserts a structural invariant with a message.
#[inline(always)]
fn invariant(condition: bool, message: &str) -> bool {
    debug_assert!(condition, "graph invariant violated: {message}");
    condition
}

impl<N, E> DiGraph<N, E> {
    /// Validates the cross-references between nodes, edges and sequences.
    ///
    /// This method checks that:
    /// 1. The node and edge sequences list every live entity exactly once
    /// 2. Every incidence slot names a live edge that records that very slot
    /// 3. Every edge's recorded slots resolve back to the edge
    /// 4. Slot totals add up: `Σ|all| = 2E − loops`, `Σ|out| = Σ|in| = E`
    ///
    /// Returns `true` if all invariants hold.
    pub fn validate_invariants(&self) -> bool {
        let mut ok = true;

        ok &= invariant(
            self.node_list.len() == self.nodes.len() && self.node_seq.len() == self.nodes.len(),
            "node sequence must list every node",
        );
        ok &= invariant(
            self.edge_list.len() == self.edges.len() && self.edge_seq.len() == self.edges.len(),
            "edge sequence must list every edge",
        );
        for id in self.nodes() {
            ok &= invariant(self.contains_node(id), "node sequence entry must be live");
        }
        for id in self.edges() {
            ok &= invariant(self.contains_edge(id), "edge sequence entry must be live");
        }

        let mut combined_slots = 0usize;
        let mut out_slots = 0usize;
        let mut in_slots = 0usize;

        for (idx, node) in self.nodes.iter() {
            let id = NodeId(idx);
            ok &= invariant(
                self.node_seq.get(node.order) == Some(&id),
                "node order slot must refer back to the node",
            );

            for pos in self.incidence.positions(&node.incidence) {
                combined_slots += 1;
                let holds = self.slot_edge(IncidencePos(pos)).is_some_and(|edge| {
                    (edge.source == id && edge.slots.at_source == pos)
                        || (edge.destination == id && edge.slots.at_destination == pos)
                });
                ok &= invariant(holds, "combined slot must be an endpoint slot of its edge");
            }
            for pos in self.incidence.positions(&node.incidence_out) {
                out_slots += 1;
                let holds = self
                    .slot_edge(IncidencePos(pos))
                    .is_some_and(|edge| edge.source == id && edge.slots.out_pos == pos);
                ok &= invariant(holds, "outgoing slot must belong to an edge leaving the node");
            }
            for pos in self.incidence.positions(&node.incidence_in) {
                in_slots += 1;
                let holds = self
                    .slot_edge(IncidencePos(pos))
                    .is_some_and(|edge| edge.destination == id && edge.slots.in_pos == pos);
                ok &= invariant(holds, "incoming slot must belong to an edge entering the node");
            }
        }

        let mut loops = 0usize;
        for (idx, edge) in self.edges.iter() {
            let id = EdgeId(idx);
            ok &= invariant(
                self.edge_seq.get(edge.order) == Some(&id),
                "edge order slot must refer back to the edge",
            );
            ok &= invariant(
                self.contains_node(edge.source) && self.contains_node(edge.destination),
                "edge endpoints must be live nodes",
            );
            let slots = edge.slots;
            ok &= invariant(
                [slots.at_source, slots.at_destination, slots.out_pos, slots.in_pos]
                    .iter()
                    .all(|&pos| self.incidence.get(pos) == Some(&id)),
                "edge slots must refer back to the edge",
            );
            if edge.is_self_loop() {
                loops += 1;
                ok &= invariant(
                    slots.at_source == slots.at_destination,
                    "self-loop must occupy a single combined slot",
                );
            } else {
                ok &= invariant(
                    slots.at_source != slots.at_destination,
                    "non-loop edge must occupy two combined slots",
                );
            }
        }

        let edges = self.edges.len();
        ok &= invariant(
            combined_slots + loops == 2 * edges,
            "combined slots must total twice the edge count minus self-loops",
        );
        ok &= invariant(out_slots == edges, "outgoing slots must total the edge count");
        ok &= invariant(in_slots == edges, "incoming slots must total the edge count");
        ok &= invariant(
            self.incidence.len() == combined_slots + out_slots + in_slots,
            "incidence arena must hold no orphaned slots",
        );

        ok
    }

    fn slot_edge(&self, pos: IncidencePos) -> Option<&DiEdge<E>> {
        self.edge_at(pos).and_then(|edge| self.edges.get(edge.0))
    }
}
