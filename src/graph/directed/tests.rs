use super::*;
use crate::error::GraphError;

type Graph = DiGraph<&'static str, u32>;

fn seq(graph: &Graph, node: NodeId, which: Incidence) -> Vec<EdgeId> {
    graph.incident_edges(node, which).collect()
}

fn payloads(graph: &Graph, node: NodeId, which: Incidence) -> Vec<u32> {
    graph
        .incident_edges(node, which)
        .map(|edge| *graph.edge(edge).unwrap().data())
        .collect()
}

fn degree_identity_holds(graph: &Graph) -> bool {
    graph.nodes().all(|node| {
        let record = graph.node(node).unwrap();
        let loops = graph
            .incident_edges(node, Incidence::All)
            .filter(|&edge| graph.edge(edge).unwrap().is_self_loop())
            .count();
        record.degree() + loops == record.in_degree() + record.out_degree()
    })
}

#[test]
fn add_edge_fills_all_three_sequences() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    let ab = g.add_edge(1, a, b).unwrap();
    let ba = g.add_edge(2, b, a).unwrap();

    assert_eq!(seq(&g, a, Incidence::All), vec![ab, ba]);
    assert_eq!(seq(&g, a, Incidence::Outgoing), vec![ab]);
    assert_eq!(seq(&g, a, Incidence::Incoming), vec![ba]);
    assert_eq!(seq(&g, b, Incidence::All), vec![ab, ba]);
    assert_eq!(g.edges().collect::<Vec<_>>(), vec![ab, ba]);
    assert_eq!(g.adjacent_node(ab, a), b);
    assert!(g.validate_invariants());
}

#[test]
fn self_loop_occupies_one_combined_slot() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    let ab = g.add_edge(1, a, b).unwrap();
    let aa = g.add_edge(2, a, a).unwrap();

    let node = g.node(a).unwrap();
    assert_eq!(node.degree(), 2);
    assert_eq!(node.out_degree(), 2);
    assert_eq!(node.in_degree(), 1);
    assert_eq!(seq(&g, a, Incidence::All), vec![ab, aa]);
    assert_eq!(g.edge(aa).unwrap().source_pos(), g.edge(aa).unwrap().destination_pos());
    assert_eq!(g.adjacent_node(aa, a), a);
    assert!(degree_identity_holds(&g));
    assert!(g.validate_invariants());
}

#[test]
fn placement_inserts_before_given_slots() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    let e1 = g.add_edge(1, a, b).unwrap();
    let e2 = g.add_edge(2, a, b).unwrap();

    let placement = EdgePlacement {
        before_at_source: Some(g.edge(e2).unwrap().source_pos()),
        before_in: Some(g.edge(e1).unwrap().in_pos()),
        before_edge: Some(e1),
        ..EdgePlacement::default()
    };
    let e3 = g.add_edge_with(3, a, b, &placement).unwrap();

    assert_eq!(payloads(&g, a, Incidence::All), vec![1, 3, 2]);
    assert_eq!(payloads(&g, a, Incidence::Outgoing), vec![1, 2, 3]);
    assert_eq!(payloads(&g, b, Incidence::Incoming), vec![3, 1, 2]);
    assert_eq!(g.edges().collect::<Vec<_>>(), vec![e3, e1, e2]);
    assert!(g.validate_invariants());
}

#[test]
fn placement_rejects_foreign_positions() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    let c = g.add_node("c");
    let bc = g.add_edge(1, b, c).unwrap();

    let foreign = g.edge(bc).unwrap().source_pos();
    let placement = EdgePlacement {
        before_at_source: Some(foreign),
        ..EdgePlacement::default()
    };
    assert_eq!(
        g.add_edge_with(2, a, c, &placement),
        Err(GraphError::PositionMismatch {
            node: a,
            position: foreign
        })
    );

    // An outgoing slot is not a combined slot even on the right node.
    let out = g.edge(bc).unwrap().out_pos();
    let placement = EdgePlacement {
        before_at_source: Some(out),
        ..EdgePlacement::default()
    };
    assert!(matches!(
        g.add_edge_with(3, b, a, &placement),
        Err(GraphError::PositionMismatch { .. })
    ));
    assert_eq!(g.edge_count(), 1);
    assert!(g.validate_invariants());
}

#[test]
fn add_node_before_orders_node_sequence() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let c = g.add_node("c");
    let b = g.add_node_before("b", c).unwrap();
    assert_eq!(g.nodes().collect::<Vec<_>>(), vec![a, b, c]);
}

#[test]
fn remove_node_requires_isolation() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    let c = g.add_node("c");
    let ab = g.add_edge(1, a, b).unwrap();
    let ca = g.add_edge(2, c, a).unwrap();
    let aa = g.add_edge(3, a, a).unwrap();

    assert_eq!(
        g.remove_node(a),
        Err(GraphError::NodeHasIncidentEdges { node: a, degree: 3 })
    );

    let (data, removed) = g.remove_node_with_edges(a).unwrap();
    assert_eq!(data, "a");
    assert_eq!(removed.iter().map(|r| r.id).collect::<Vec<_>>(), vec![ab, ca, aa]);
    assert_eq!(removed[1].source, c);
    assert!(!g.contains_node(a));
    assert_eq!(g.node(b).unwrap().degree(), 0);
    assert_eq!(g.edge_count(), 0);
    assert_eq!(g.remove_node(b), Ok("b"));
    assert!(g.validate_invariants());
}

#[test]
fn stale_handles_are_reported() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    let e = g.add_edge(1, a, b).unwrap();
    g.remove_edge(e).unwrap();

    assert_eq!(g.remove_edge(e), Err(GraphError::EdgeNotFound(e)));
    assert_eq!(g.split_edge(e, "x", 1, 2, None), Err(GraphError::EdgeNotFound(e)));

    g.remove_node(b).unwrap();
    let reused = g.add_node("reused");
    assert_ne!(reused, b);
    assert!(g.node(b).is_none());
    assert_eq!(g.add_edge(2, a, b), Err(GraphError::NodeNotFound(b)));
}

#[test]
fn move_edge_keeps_handle_and_edge_order() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    let c = g.add_node("c");
    let e1 = g.add_edge(1, a, b).unwrap();
    let e2 = g.add_edge(2, a, b).unwrap();
    let e3 = g.add_edge(3, a, b).unwrap();
    let kept = g.edge(e3).unwrap().source_pos();

    g.move_edge(e2, c, a, &EdgePlacement::default()).unwrap();

    let moved = g.edge(e2).unwrap();
    assert_eq!((moved.source(), moved.destination()), (c, a));
    assert_eq!(*moved.data(), 2);
    assert_eq!(seq(&g, a, Incidence::All), vec![e1, e3, e2]);
    assert_eq!(seq(&g, a, Incidence::Incoming), vec![e2]);
    assert_eq!(seq(&g, b, Incidence::Incoming), vec![e1, e3]);
    assert_eq!(g.edges().collect::<Vec<_>>(), vec![e1, e2, e3]);
    assert_eq!(g.edge_at(kept), Some(e3));
    assert!(g.validate_invariants());
}

#[test]
fn move_edge_rejects_its_own_slots() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    let e = g.add_edge(1, a, b).unwrap();
    let placement = EdgePlacement {
        before_out: Some(g.edge(e).unwrap().out_pos()),
        ..EdgePlacement::default()
    };
    assert!(matches!(
        g.move_edge(e, a, b, &placement),
        Err(GraphError::PositionMismatch { .. })
    ));
    assert!(g.validate_invariants());
}

#[test]
fn split_edge_takes_over_slots_in_place() {
    let mut g = Graph::new();
    let s = g.add_node("s");
    let d = g.add_node("d");
    let x = g.add_node("x");
    let before = g.add_edge(1, x, s).unwrap();
    let e = g.add_edge(2, s, d).unwrap();
    let after = g.add_edge(3, s, d).unwrap();

    let at_source = g.edge(e).unwrap().source_pos();
    let at_destination = g.edge(e).unwrap().destination_pos();
    let out_pos = g.edge(e).unwrap().out_pos();
    let in_pos = g.edge(e).unwrap().in_pos();

    let split = g.split_edge(e, "mid", 20, 21, Some(x)).unwrap();
    assert_eq!(split.removed.data, 2);
    assert_eq!((split.removed.source, split.removed.destination), (s, d));
    let SplitEdge {
        node: mid,
        first,
        second,
        ..
    } = split;

    assert_eq!(g.edge_at(at_source), Some(first));
    assert_eq!(g.edge_at(out_pos), Some(first));
    assert_eq!(g.edge_at(at_destination), Some(second));
    assert_eq!(g.edge_at(in_pos), Some(second));

    assert_eq!(seq(&g, s, Incidence::All), vec![before, first, after]);
    assert_eq!(seq(&g, d, Incidence::All), vec![second, after]);
    assert_eq!(seq(&g, mid, Incidence::All), vec![first, second]);
    assert_eq!(seq(&g, mid, Incidence::Incoming), vec![first]);
    assert_eq!(seq(&g, mid, Incidence::Outgoing), vec![second]);
    assert_eq!(g.edges().collect::<Vec<_>>(), vec![before, first, second, after]);
    assert_eq!(g.nodes().collect::<Vec<_>>(), vec![s, d, mid, x]);
    assert!(g.validate_invariants());
}

#[test]
fn split_self_loop_places_second_after_first() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    let aa = g.add_edge(1, a, a).unwrap();
    let ab = g.add_edge(2, a, b).unwrap();

    let split = g.split_edge(aa, "mid", 10, 11, None).unwrap();
    assert_eq!(seq(&g, a, Incidence::All), vec![split.first, split.second, ab]);
    assert_eq!(seq(&g, a, Incidence::Outgoing), vec![split.first, ab]);
    assert_eq!(seq(&g, a, Incidence::Incoming), vec![split.second]);
    assert!(degree_identity_holds(&g));
    assert!(g.validate_invariants());
}

#[test]
fn contract_edge_appends_destination_sequences() {
    let mut g = Graph::new();
    let s = g.add_node("s");
    let d = g.add_node("d");
    let x = g.add_node("x");
    let y = g.add_node("y");
    let e1 = g.add_edge(1, x, s).unwrap();
    let e2 = g.add_edge(2, s, d).unwrap();
    let e3 = g.add_edge(3, d, y).unwrap();
    let e4 = g.add_edge(4, x, d).unwrap();
    let e5 = g.add_edge(5, d, s).unwrap();
    let kept = g.edge(e3).unwrap().source_pos();

    let contracted = g.contract_edge(e2).unwrap();
    assert_eq!(contracted.edge.data, 2);
    assert_eq!(contracted.node.id, d);
    assert_eq!(contracted.node.data, "d");

    assert_eq!(seq(&g, s, Incidence::All), vec![e1, e5, e3, e4]);
    assert_eq!(seq(&g, s, Incidence::Outgoing), vec![e3, e5]);
    assert_eq!(seq(&g, s, Incidence::Incoming), vec![e1, e5, e4]);
    assert!(g.edge(e5).unwrap().is_self_loop());
    assert_eq!(g.edge(e4).unwrap().destination(), s);
    assert_eq!(g.edge_at(kept), Some(e3));
    assert!(!g.contains_node(d));
    assert!(degree_identity_holds(&g));
    assert!(g.validate_invariants());
}

#[test]
fn contracting_a_self_loop_is_refused() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let aa = g.add_edge(1, a, a).unwrap();
    assert_eq!(g.contract_edge(aa), Err(GraphError::SelfLoopContraction(aa)));
    assert!(g.contains_edge(aa));
}

#[test]
fn split_then_contract_restores_adjacency() {
    let mut g = Graph::new();
    let nodes: Vec<_> = ["a", "b", "c", "d"].into_iter().map(|n| g.add_node(n)).collect();
    let e = g.add_edge(0, nodes[0], nodes[1]).unwrap();
    g.add_edge(1, nodes[1], nodes[2]).unwrap();
    g.add_edge(2, nodes[0], nodes[0]).unwrap();
    g.add_edge(3, nodes[3], nodes[0]).unwrap();

    let adjacency = |g: &Graph| -> Vec<Vec<NodeId>> {
        nodes
            .iter()
            .map(|&n| {
                let mut adj: Vec<_> = g
                    .incident_edges(n, Incidence::All)
                    .map(|e| g.adjacent_node(e, n))
                    .collect();
                adj.sort();
                adj
            })
            .collect()
    };
    let before = adjacency(&g);

    let split = g.split_edge(e, "mid", 10, 11, None).unwrap();
    g.contract_edge(split.first).unwrap();

    assert_eq!(adjacency(&g), before);
    assert_eq!(g.node_count(), 4);
    assert!(g.validate_invariants());
}

#[test]
fn reorder_incidence_keeps_positions() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    let edges: Vec<_> = (0..4).map(|i| g.add_edge(i, a, b).unwrap()).collect();
    let positions: Vec<_> = g.incidence_positions(a, Incidence::Outgoing).collect();

    let order = vec![edges[2], edges[0], edges[3], edges[1]];
    g.reorder_incidence(a, Incidence::Outgoing, &order).unwrap();

    assert_eq!(seq(&g, a, Incidence::Outgoing), order);
    assert_eq!(seq(&g, a, Incidence::All), edges);
    for (pos, edge) in positions.into_iter().zip(&edges) {
        assert_eq!(g.edge_at(pos), Some(*edge));
    }

    assert_eq!(
        g.reorder_incidence(a, Incidence::Outgoing, &[edges[0], edges[0], edges[1], edges[2]]),
        Err(GraphError::NotAPermutation(a))
    );
    assert_eq!(
        g.reorder_incidence(b, Incidence::Outgoing, &edges),
        Err(GraphError::NotAPermutation(b))
    );
    assert!(g.validate_invariants());
}

#[test]
fn cut_set_of_everything_or_nothing_is_empty() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    let c = g.add_node("c");
    let ab = g.add_edge(1, a, b).unwrap();
    let bc = g.add_edge(2, b, c).unwrap();
    let cc = g.add_edge(3, c, c).unwrap();

    let all_nodes: Vec<_> = g.nodes().collect();
    let all_edges: Vec<_> = g.edges().collect();
    assert!(g.find_cut_set(&all_edges, &all_nodes).unwrap().is_empty());
    assert!(g.find_cut_set(&[], &[]).unwrap().is_empty());
    assert!(g.find_cut_set(&all_edges, &[]).unwrap().is_empty());

    assert_eq!(g.find_cut_set(&[cc, bc, ab], &[b]).unwrap(), vec![bc, ab]);
    let removed = g.remove_cut_set(&all_edges, &[a]).unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].id, ab);
    assert!(g.validate_invariants());
}

#[test]
fn induced_queries_follow_caller_order() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    let c = g.add_node("c");
    let ab = g.add_edge(1, a, b).unwrap();
    let ba = g.add_edge(2, b, a).unwrap();
    let bc = g.add_edge(3, b, c).unwrap();
    let ca = g.add_edge(4, c, a).unwrap();

    assert_eq!(g.node_induced_edges(&[b, a]).unwrap(), vec![ba, ab]);
    assert_eq!(g.node_induced_edges(&[c, a, b]).unwrap(), vec![ca, ab, ba, bc]);
    assert_eq!(g.edge_induced_nodes(&[ca, bc]).unwrap(), vec![c, a, b]);
    assert_eq!(g.edge_induced_nodes(&[]).unwrap(), Vec::<NodeId>::new());
}

#[test]
fn multi_edges_between_two_nodes() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    let c = g.add_node("c");
    let ab = g.add_edge(1, a, b).unwrap();
    g.add_edge(2, a, c).unwrap();
    let ba = g.add_edge(3, b, a).unwrap();
    let aa = g.add_edge(4, a, a).unwrap();

    assert_eq!(g.find_multi_edges(a, b).unwrap(), vec![ab, ba]);
    assert_eq!(g.find_multi_edges(b, a).unwrap(), vec![ab, ba]);
    assert_eq!(g.find_multi_edges(a, a).unwrap(), vec![aa]);
    assert!(g.find_multi_edges(b, c).unwrap().is_empty());
}

#[test]
fn move_node_induced_subgraph_preserves_order() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    let c = g.add_node("c");
    let d = g.add_node("d");
    let bc = g.add_edge(1, b, c).unwrap();
    let ab = g.add_edge(2, a, b).unwrap();
    let cb = g.add_edge(3, c, b).unwrap();
    let cd = g.add_edge(4, c, d).unwrap();
    let bb = g.add_edge(5, b, b).unwrap();
    g.reorder_incidence(b, Incidence::All, &[bb, cb, ab, bc]).unwrap();

    let mut dest = Graph::new();
    let moved = g.move_node_induced_subgraph(&[c, b], &mut dest).unwrap();

    let cut: Vec<_> = moved.cut.iter().map(|r| r.id).collect();
    assert_eq!(cut, vec![cd, ab]);
    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edge_count(), 0);

    let nb = moved.node(b).unwrap();
    let nc = moved.node(c).unwrap();
    assert_eq!(dest.nodes().collect::<Vec<_>>(), vec![nb, nc]);
    let new_edges: Vec<_> = [bc, cb, bb].iter().map(|&e| moved.edge(e).unwrap()).collect();
    assert_eq!(dest.edges().collect::<Vec<_>>(), new_edges);
    assert_eq!(payloads(&dest, nb, Incidence::All), vec![5, 3, 1]);
    assert_eq!(payloads(&dest, nb, Incidence::Outgoing), vec![1, 5]);
    assert_eq!(*dest.node(nc).unwrap().data(), "c");
    assert!(g.validate_invariants());
    assert!(dest.validate_invariants());
}

#[test]
fn move_edge_induced_subgraph_cuts_unselected_edges() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    let c = g.add_node("c");
    let ab = g.add_edge(1, a, b).unwrap();
    let ba = g.add_edge(2, b, a).unwrap();
    let bc = g.add_edge(3, b, c).unwrap();

    let mut dest = Graph::new();
    let moved = g.move_edge_induced_subgraph(&[ab], &mut dest).unwrap();

    let cut: Vec<_> = moved.cut.iter().map(|r| r.id).collect();
    assert_eq!(cut, vec![ba, bc]);
    assert_eq!(g.nodes().collect::<Vec<_>>(), vec![c]);
    assert_eq!(dest.node_count(), 2);
    assert_eq!(dest.edge_count(), 1);
    assert!(g.validate_invariants());
    assert!(dest.validate_invariants());
}

#[test]
fn copy_subgraph_uses_fresh_payloads() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let b = g.add_node("b");
    let c = g.add_node("c");
    let ab = g.add_edge(1, a, b).unwrap();
    let ba = g.add_edge(2, b, a).unwrap();
    let bc = g.add_edge(3, b, c).unwrap();
    g.reorder_incidence(a, Incidence::All, &[ba, ab]).unwrap();

    let mut dest: DiGraph<String, char> = DiGraph::new();
    let copy = g
        .copy_subgraph(
            vec![(a, "A".to_owned()), (b, "B".to_owned())],
            vec![(ab, 'x'), (ba, 'y')],
            &mut dest,
        )
        .unwrap();

    let (_, na) = copy.nodes[0];
    let (_, nab) = copy.edges[0];
    let (_, nba) = copy.edges[1];
    assert_eq!(dest.node(na).unwrap().data(), "A");
    assert_eq!(dest.incident_edges(na, Incidence::All).collect::<Vec<_>>(), vec![nba, nab]);
    assert_eq!(g.edge_count(), 3);
    assert!(dest.validate_invariants());

    let mut untouched: DiGraph<(), ()> = DiGraph::new();
    assert_eq!(
        g.copy_subgraph(vec![(a, ()), (b, ())], vec![(bc, ())], &mut untouched),
        Err(GraphError::EndpointNotCopied { edge: bc, node: c })
    );
    assert!(untouched.is_empty());
}

#[test]
fn generation_tags() {
    let mut g = Graph::new();
    let a = g.add_node("a");
    let e = g.add_edge(1, a, a).unwrap();

    assert_eq!(g.advance_generation(), 1);
    assert_eq!(g.advance_generation(), 2);
    let current = g.generation();
    g.node_mut(a).unwrap().set_generation(current);
    g.edge_mut(e).unwrap().set_generation(7);
    assert_eq!(g.node(a).unwrap().generation(), 2);

    g.reset_generation();
    assert_eq!(g.generation(), 0);
    assert_eq!(g.node(a).unwrap().generation(), 0);
    assert_eq!(g.edge(e).unwrap().generation(), 0);
}
