//! Slot storage for graph elements.

pub mod generational_pool;

pub use generational_pool::{GenerationalIndex, GenerationalPool};
