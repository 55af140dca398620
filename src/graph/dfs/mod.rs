//! Resumable, hook-driven depth-first exploration.
//!
//! - [`state`]: per-node cursors and per-edge classification, plus the
//!   [`DfsGraph`] capability the explorer walks.
//! - [`strategy`]: the [`DfsDiStrategy`] hook table algorithms implement.
//! - [`explorer`]: the [`DfsDiExplorer`] step machine.
//!
//! A walk over a [`DfsDiGraph`]:
//!
//! ```
//! use stepgraph::graph::dfs::{DfsDiEdge, DfsDiExplorer, DfsDiGraph, DfsDiNode, DfsDiStrategy};
//! use stepgraph::graph::NodeId;
//!
//! #[derive(Default)]
//! struct Preorder(Vec<NodeId>);
//!
//! impl DfsDiStrategy<DfsDiGraph<&'static str>> for Preorder {
//!     type Error = core::convert::Infallible;
//!
//!     fn enter_node(
//!         &mut self,
//!         _graph: &mut DfsDiGraph<&'static str>,
//!         node: NodeId,
//!     ) -> Result<(), Self::Error> {
//!         self.0.push(node);
//!         Ok(())
//!     }
//! }
//!
//! let mut graph: DfsDiGraph<&str> = DfsDiGraph::new();
//! let a = graph.add_node(DfsDiNode::new("a"));
//! let b = graph.add_node(DfsDiNode::new("b"));
//! let c = graph.add_node(DfsDiNode::new("c"));
//! graph.add_edge(DfsDiEdge::default(), a, c).unwrap();
//! graph.add_edge(DfsDiEdge::default(), a, b).unwrap();
//!
//! let mut explorer = DfsDiExplorer::new();
//! let mut preorder = Preorder::default();
//! explorer.reset(&mut graph, false);
//! explorer.run(&mut graph, &mut preorder, a).unwrap();
//! assert_eq!(preorder.0, vec![a, c, b]);
//! ```

pub mod explorer;
pub mod state;
pub mod strategy;


pub use explorer::DfsDiExplorer;
pub use state::{
    Cursor, DfsDiEdge, DfsDiGraph, DfsDiNode, DfsEdgeData, DfsEdgeState, DfsGraph, DfsNodeData,
    DfsNodeState,
};
pub use strategy::{DfsDiStrategy, EarlyOut};
