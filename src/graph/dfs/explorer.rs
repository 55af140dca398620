//! `DfsDiExplorer` - a depth-first walk driven one micro-step at a time.
//!
//! The walk keeps no call stack of its own: the stack is the chain of
//! `parent_in_dfs` links in the node states, and the explorer only remembers
//! which node is on top. A walk can therefore be paused after any step,
//! the graph mutated, and the walk resumed.
//!
//! # Steps
//! Each call to [`DfsDiExplorer::one_step`] performs exactly one of:
//! - enter an unvisited node (`enter_node`);
//! - return from a child (`after_visiting_child`, then advance);
//! - leave a node whose cursor is exhausted (`leave_node`, then pop);
//! - skip an edge already classified from its other endpoint;
//! - classify a frond (`process_frond`, then advance);
//! - descend along a tree edge (`before_visiting_child`, then push), or
//!   decline it (`not_visiting_child`, then advance).

use core::fmt::Debug;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::state::DfsGraph;
use super::strategy::DfsDiStrategy;
use crate::graph::NodeId;

/// Position of a walk: the node on top of the implicit DFS stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfsDiExplorer<I = NodeId> {
    current: Option<I>,
}

impl<I> Default for DfsDiExplorer<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> DfsDiExplorer<I> {
    /// An explorer with no walk in progress.
    pub const fn new() -> Self {
        Self { current: None }
    }
}

impl<I: Copy + Eq + Debug> DfsDiExplorer<I> {
    /// The node on top of the DFS stack.
    #[inline]
    pub fn current_node(&self) -> Option<I> {
        self.current
    }

    /// Returns `true` once the start node has been left (or before any start).
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.current.is_none()
    }

    /// Clears the traversal state of every node and edge and selects the
    /// direction: `reversed` walks incoming edges instead of outgoing ones.
    pub fn reset<G>(&mut self, graph: &mut G, reversed: bool)
    where
        G: DfsGraph<NodeId = I>,
    {
        graph.reset_dfs(reversed);
        self.current = None;
        debug!(reversed, "reset traversal state");
    }

    /// Makes `start` the top of a fresh DFS stack.
    pub fn set_start_node<G>(&mut self, graph: &mut G, start: I)
    where
        G: DfsGraph<NodeId = I>,
    {
        graph.init_exploration(start, None);
        self.current = Some(start);
        debug!(?start, "start walk");
    }

    /// Walks from `start` until the stack empties or the strategy latches
    /// early-out.
    ///
    /// # Errors
    /// The first hook error, unchanged. The walk stays where it stopped.
    pub fn run<G, S>(&mut self, graph: &mut G, strategy: &mut S, start: I) -> Result<(), S::Error>
    where
        G: DfsGraph<NodeId = I>,
        S: DfsDiStrategy<G>,
    {
        self.set_start_node(graph, start);
        strategy.reset_early_out();
        while self.one_step(graph, strategy)? {}
        Ok(())
    }

    /// Performs one transition of the walk.
    ///
    /// Returns `Ok(true)` while work remains, `Ok(false)` once the stack is
    /// empty or the strategy latched early-out.
    ///
    /// # Errors
    /// Whatever a hook returned.
    ///
    /// # Panics
    /// Panics if a hook removed the node on top of the stack or the slot
    /// under its cursor.
    pub fn one_step<G, S>(&mut self, graph: &mut G, strategy: &mut S) -> Result<bool, S::Error>
    where
        G: DfsGraph<NodeId = I>,
        S: DfsDiStrategy<G>,
    {
        let Some(node) = self.current else {
            return Ok(false);
        };

        let (visited, waiting, parent) = {
            let state = graph.dfs_node(node);
            (state.visited, state.waiting_for_child, state.parent_in_dfs)
        };

        if !visited {
            trace!(?node, "enter");
            let state = graph.dfs_node_mut(node);
            state.visited = true;
            state.waiting_for_child = false;
            if let Err(err) = strategy.enter_node(graph, node) {
                graph.dfs_node_mut(node).visited = false;
                return Err(err);
            }
        } else if waiting {
            let edge = cursor_edge(graph, node);
            trace!(?node, ?edge, "return from child");
            strategy.after_visiting_child(graph, node, edge)?;
            graph.dfs_node_mut(node).waiting_for_child = false;
            graph.advance_dfs_edge(node);
        } else if graph.has_explored_all_edges(node) {
            trace!(?node, "leave");
            strategy.leave_node(graph, node)?;
            self.current = parent;
        } else {
            let edge = cursor_edge(graph, node);
            if graph.dfs_edge(edge).visited {
                trace!(?node, ?edge, "skip classified edge");
                graph.advance_dfs_edge(node);
            } else {
                let adjacent = graph.adjacent_node(edge, node);
                if graph.dfs_node(adjacent).visited {
                    trace!(?node, ?edge, "frond");
                    // Waiting while the hook runs makes a redirection from
                    // inside it apply after this edge.
                    graph.dfs_node_mut(node).waiting_for_child = true;
                    let outcome = strategy.process_frond(graph, node, edge);
                    graph.dfs_node_mut(node).waiting_for_child = false;
                    outcome?;
                    graph.dfs_edge_mut(edge).visited = true;
                    graph.advance_dfs_edge(node);
                } else if strategy.is_visiting_child(graph, node, edge)? {
                    trace!(?node, ?edge, child = ?adjacent, "descend");
                    graph.dfs_node_mut(node).waiting_for_child = true;
                    if let Err(err) = strategy.before_visiting_child(graph, node, edge) {
                        graph.dfs_node_mut(node).waiting_for_child = false;
                        return Err(err);
                    }
                    graph.dfs_edge_mut(edge).visited = true;
                    graph.init_exploration(adjacent, Some(node));
                    self.current = Some(adjacent);
                } else {
                    trace!(?node, ?edge, "declined child");
                    strategy.not_visiting_child(graph, node, edge)?;
                    graph.advance_dfs_edge(node);
                }
            }
        }

        Ok(!strategy.is_early_out() && self.current.is_some())
    }
}

fn cursor_edge<G: DfsGraph>(graph: &G, node: G::NodeId) -> G::EdgeId {
    graph
        .current_dfs_edge(node)
        .unwrap_or_else(|| panic!("cursor of node {node:?} is past the end of its sequence"))
}
