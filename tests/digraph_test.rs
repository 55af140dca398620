use std::collections::HashMap;

use stepgraph::{DiGraph, EdgeId, EdgePlacement, GraphError, Incidence, IncidenceGraph, NodeId};

type Graph = DiGraph<String, u32>;

fn named(graph: &mut Graph, name: &str) -> NodeId {
    graph.add_node(name.to_owned())
}

fn payloads(graph: &Graph, node: NodeId, which: Incidence) -> Vec<u32> {
    graph
        .incident_edges(node, which)
        .map(|edge| *graph.edge(edge).unwrap().data())
        .collect()
}

/// Neighbour multiset of `node`'s combined sequence, keyed by node name.
fn neighbour_counts(graph: &Graph, node: NodeId) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for edge in graph.incident_edges(node, Incidence::All) {
        let other = graph.adjacent_node(edge, node);
        *counts.entry(graph.node(other).unwrap().data().clone()).or_default() += 1;
    }
    counts
}

#[test]
fn positions_survive_unrelated_rewrites() {
    let mut g = Graph::new();
    let a = named(&mut g, "a");
    let b = named(&mut g, "b");
    let c = named(&mut g, "c");
    let d = named(&mut g, "d");
    let ab = g.add_edge(1, a, b).unwrap();
    let ac = g.add_edge(2, a, c).unwrap();
    let ad = g.add_edge(3, a, d).unwrap();
    let dc = g.add_edge(4, d, c).unwrap();

    let held = g.edge(ad).unwrap().source_pos();
    let split_slot = g.edge(ab).unwrap().source_pos();

    let split = g.split_edge(ab, "m".to_owned(), 10, 11, None).unwrap();
    assert_eq!(split.removed.data, 1);
    assert_eq!(g.edge(split.first).unwrap().source_pos(), split_slot);
    assert_eq!(g.edge_at(held), Some(ad));

    g.remove_edge(ac).unwrap();
    assert_eq!(g.edge_at(held), Some(ad));

    g.move_edge(dc, c, d, &EdgePlacement::default()).unwrap();
    assert_eq!(g.edge_at(held), Some(ad));
    assert_eq!(payloads(&g, a, Incidence::All), vec![10, 3]);
    assert!(g.validate_invariants());
}

#[test]
fn split_then_contract_restores_neighbourhoods() {
    let mut g = Graph::new();
    let a = named(&mut g, "a");
    let b = named(&mut g, "b");
    let c = named(&mut g, "c");
    let ab = g.add_edge(1, a, b).unwrap();
    g.add_edge(2, b, c).unwrap();
    g.add_edge(3, c, a).unwrap();
    g.add_edge(4, a, a).unwrap();

    let before_a = neighbour_counts(&g, a);
    let before_b = neighbour_counts(&g, b);

    let split = g.split_edge(ab, "m".to_owned(), 5, 6, Some(b)).unwrap();
    assert_eq!(g.nodes().collect::<Vec<_>>(), vec![a, split.node, b, c]);
    assert!(g.validate_invariants());

    // Folding the new node into `a` leaves `a -> b` behind.
    let contracted = g.contract_edge(split.first).unwrap();
    assert_eq!(contracted.node.id, split.node);
    assert_eq!(contracted.edge.data, 5);
    assert!(!g.contains_node(split.node));

    assert_eq!(neighbour_counts(&g, a), before_a);
    assert_eq!(neighbour_counts(&g, b), before_b);
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.edge_count(), 4);
    assert!(g.validate_invariants());
}

#[test]
fn removal_errors_leave_the_graph_unchanged() {
    let mut g = Graph::new();
    let a = named(&mut g, "a");
    let b = named(&mut g, "b");
    let ab = g.add_edge(1, a, b).unwrap();

    assert_eq!(
        g.remove_node(a),
        Err(GraphError::NodeHasIncidentEdges { node: a, degree: 1 })
    );
    assert_eq!(g.node_count(), 2);

    let (data, removed) = g.remove_node_with_edges(a).unwrap();
    assert_eq!(data, "a");
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].id, ab);
    assert_eq!(g.node(b).unwrap().degree(), 0);

    assert_eq!(g.remove_edge(ab), Err(GraphError::EdgeNotFound(ab)));
    assert_eq!(g.add_edge(9, a, b), Err(GraphError::NodeNotFound(a)));
    assert_eq!(g.edge_count(), 0);

    // A reused slot gets a fresh generation; the stale handle stays stale.
    let fresh = named(&mut g, "fresh");
    assert_ne!(fresh, a);
    assert!(!g.contains_node(a));
    assert!(g.validate_invariants());
}

#[test]
fn self_loops_are_refused_by_contraction() {
    let mut g = Graph::new();
    let a = named(&mut g, "a");
    let aa = g.add_edge(1, a, a).unwrap();

    assert_eq!(g.contract_edge(aa).unwrap_err(), GraphError::SelfLoopContraction(aa));
    assert_eq!(g.find_multi_edges(a, a).unwrap(), vec![aa]);
    assert!(g.validate_invariants());
}

#[test]
fn cut_set_of_everything_or_nothing_is_empty() {
    let mut g = Graph::new();
    let nodes: Vec<NodeId> = (0..4).map(|i| named(&mut g, &i.to_string())).collect();
    for (i, pair) in nodes.windows(2).enumerate() {
        g.add_edge(u32::try_from(i).unwrap(), pair[0], pair[1]).unwrap();
    }
    g.add_edge(99, nodes[3], nodes[0]).unwrap();
    let edges: Vec<EdgeId> = g.edges().collect();

    assert!(g.find_cut_set(&edges, &nodes).unwrap().is_empty());
    assert!(g.find_cut_set(&[], &[]).unwrap().is_empty());
    assert!(g.find_cut_set(&edges, &[]).unwrap().is_empty());

    let cut = g.find_cut_set(&edges, &nodes[..2]).unwrap();
    assert_eq!(cut.len(), 2);
    let removed = g.remove_cut_set(&edges, &nodes[..2]).unwrap();
    assert_eq!(removed.iter().map(|r| r.id).collect::<Vec<_>>(), cut);
    assert_eq!(g.edge_count(), 2);
    assert!(g.validate_invariants());
}

#[test]
fn moved_subgraph_keeps_its_order_in_the_destination() {
    let mut src = Graph::new();
    let a = named(&mut src, "a");
    let b = named(&mut src, "b");
    let c = named(&mut src, "c");
    let ab = src.add_edge(1, a, b).unwrap();
    let bc1 = src.add_edge(2, b, c).unwrap();
    let cb = src.add_edge(3, c, b).unwrap();
    let bc2 = src.add_edge(4, b, c).unwrap();
    src.reorder_incidence(b, Incidence::All, &[bc2, cb, ab, bc1]).unwrap();

    let mut dest = Graph::new();
    let resident = named(&mut dest, "resident");
    let moved = src.move_node_induced_subgraph(&[b, c], &mut dest).unwrap();

    assert_eq!(moved.cut.len(), 1);
    assert_eq!(moved.cut[0].id, ab);
    assert_eq!(src.node_count(), 1);
    assert_eq!(src.edge_count(), 0);

    let new_b = moved.node(b).unwrap();
    let new_c = moved.node(c).unwrap();
    assert_eq!(dest.nodes().collect::<Vec<_>>(), vec![resident, new_b, new_c]);
    assert_eq!(payloads(&dest, new_b, Incidence::All), vec![4, 3, 2]);
    assert_eq!(payloads(&dest, new_b, Incidence::Outgoing), vec![2, 4]);
    assert_eq!(dest.find_multi_edges(new_b, new_c).unwrap().len(), 3);
    assert!(moved.edge(ab).is_none());
    assert!(src.validate_invariants());
    assert!(dest.validate_invariants());
}

#[test]
fn copies_into_a_graph_with_other_payloads() {
    let mut src = Graph::new();
    let a = named(&mut src, "a");
    let b = named(&mut src, "b");
    let c = named(&mut src, "c");
    let ab = src.add_edge(1, a, b).unwrap();
    let bc = src.add_edge(2, b, c).unwrap();

    let mut dest: DiGraph<usize, char> = DiGraph::new();
    let err = src
        .copy_subgraph(vec![(a, 0), (b, 1)], vec![(ab, 'x'), (bc, 'y')], &mut dest)
        .unwrap_err();
    assert_eq!(err, GraphError::EndpointNotCopied { edge: bc, node: c });
    assert!(dest.is_empty());

    let copy = src
        .copy_subgraph(vec![(a, 0), (b, 1)], vec![(ab, 'x')], &mut dest)
        .unwrap();
    assert_eq!(copy.nodes.len(), 2);
    let (_, new_ab) = copy.edges[0];
    let record = dest.edge(new_ab).unwrap();
    assert_eq!(*record.data(), 'x');
    assert_eq!(*dest.node(record.source()).unwrap().data(), 0);
    assert_eq!(*dest.node(record.destination()).unwrap().data(), 1);

    // The source is read-only during a copy.
    assert_eq!(src.edge_count(), 2);
    assert!(dest.validate_invariants());
}

#[test]
fn error_messages_name_the_handles() {
    let mut g = Graph::new();
    let a = named(&mut g, "a");
    g.remove_node(a).unwrap();
    let message = g.remove_node(a).unwrap_err().to_string();
    assert_eq!(message, format!("node {a} does not exist in this graph"));
}
