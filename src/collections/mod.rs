//! Intrusive sequence storage shared by many lists.
//!
//! - `link_arena`: doubly linked lists whose nodes live in one arena and are
//!   addressed by stable positions.

pub mod link_arena;

pub use link_arena::{LinkArena, LinkPos, ListHead, Positions};
