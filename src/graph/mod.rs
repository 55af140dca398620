//! Mutable directed multigraphs and the traversals that run over them.
//!
//! - `directed`: the [`DiGraph`] container with stable handles, ordered
//!   incidence sequences and structural edits (split, contract, subgraph moves).
//! - `dfs`: a resumable depth-first explorer driven by strategy hooks.
//!
//! Handles ([`NodeId`], [`EdgeId`], [`IncidencePos`]) are plain `Copy` values
//! tagged with a slot generation, so a handle to a removed element is
//! detected instead of aliasing a newer one.

pub mod dfs;
pub mod directed;
mod handle;
mod incidence;

pub use directed::{
    ContractedEdge, DiEdge, DiGraph, DiNode, EdgePlacement, RemovedEdge, RemovedNode, SplitEdge,
    SubgraphCopy, SubgraphMove,
};
pub use handle::{EdgeId, IncidencePos, NodeId};
pub use incidence::{Incidence, IncidenceGraph};
