//! # `stepgraph` - Mutable Directed Multigraphs with a Resumable DFS
//!
//! An in-memory directed multigraph whose nodes and edges carry arbitrary
//! payloads, together with a depth-first explorer that advances one
//! micro-step at a time and lets the algorithm driving it restructure the
//! graph mid-walk.
//!
//! ## Key Features
//!
//! - **Stable handles**: node, edge and incidence-slot handles survive every
//!   unrelated mutation and are detected as stale once their element is gone.
//! - **Ordered incidence**: every node keeps its combined, outgoing and
//!   incoming edge sequences in a caller-controlled order.
//! - **Structural edits**: move, split and contract edges; extract, move or
//!   copy node- and edge-induced subgraphs; find cut sets and parallel edges.
//! - **Resumable DFS**: the traversal stack lives in the graph, so a walk can
//!   stop after any step, be serialized, and pick up where it left off.
//!
//! ## Architecture
//!
//! 1. **Storage** (`alloc`, `collections`):
//!    - [`GenerationalPool`] slots with generation counters for nodes and edges
//!    - one [`LinkArena`] holding the slots of every sequence
//!
//! 2. **Graph** ([`DiGraph`]):
//!    - each edge remembers the exact slots it occupies, so detaching is
//!      constant time and untouched slots keep their positions
//!    - [`DiGraph::validate_invariants`] cross-checks every back-reference
//!      and debug-asserts on the first violation
//!
//! 3. **Traversal** ([`graph::dfs`]):
//!    - [`DfsDiExplorer`] holds only the node on top of the stack
//!    - [`DfsDiStrategy`] hooks observe, veto and redirect the walk
//!
//! ## Quick Start
//!
//! ```
//! use stepgraph::{DiGraph, Incidence};
//!
//! let mut graph = DiGraph::new();
//! let a = graph.add_node("a");
//! let b = graph.add_node("b");
//! let ab = graph.add_edge(1_u32, a, b).unwrap();
//!
//! let split = graph.split_edge(ab, "m", 2, 3, None).unwrap();
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.incident_edges(split.node, Incidence::All).count(), 2);
//!
//! let contracted = graph.contract_edge(split.first).unwrap();
//! assert_eq!(contracted.node.data, "m");
//! assert_eq!(graph.edge_count(), 1);
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod alloc;
pub mod collections;
pub mod error;
pub mod graph;

pub use alloc::{GenerationalIndex, GenerationalPool};
pub use collections::{LinkArena, LinkPos, ListHead};
pub use error::{GraphError, Result};
pub use graph::dfs::{DfsDiExplorer, DfsDiGraph, DfsDiStrategy, DfsGraph};
pub use graph::{
    DiEdge, DiGraph, DiNode, EdgeId, EdgePlacement, Incidence, IncidenceGraph, IncidencePos, NodeId,
};

// Compile-time assertions for handle layout
const _: () = {
    use core::mem;

    // Handles are two `u32`s and stay cheap to copy and hash.
    assert!(mem::size_of::<NodeId>() == 8);
    assert!(mem::size_of::<EdgeId>() == 8);
    assert!(mem::size_of::<IncidencePos>() == 8);

    // Traversal state rides along with every node payload.
    assert!(mem::size_of::<graph::dfs::DfsNodeState>() <= mem::size_of::<u64>() * 6);
    assert!(mem::size_of::<graph::dfs::DfsEdgeState>() == 1);
};
