//! `GenerationalPool` - an object pool with generational indices.
//!
//! Prevents ABA problems by checking generations on access. Every entity the
//! graph owns (nodes, edges, sequence links) lives in one of these pools, and
//! handles stay comparable and hashable after the slot they name is recycled.
//!
//! # Performance
//! - `alloc`: O(1) (reuses the most recently freed slot first)
//! - `free`: O(1)
//! - `get` / `get_mut`: O(1) with one generation compare

use serde::{Deserialize, Serialize};

/// A generational index.
///
/// The `generation` half makes an index issued for a freed slot fail every
/// later lookup, even after the slot itself is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenerationalIndex {
    index: u32,
    generation: u32,
}

impl GenerationalIndex {
    /// Slot number inside the pool.
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Generation the slot had when this index was issued.
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

/// Internal slot state.
#[derive(Debug, Clone)]
enum Slot<T> {
    Occupied { generation: u32, value: T },
    Free { generation: u32, next_free: Option<u32> },
}

/// A generational pool allocator.
#[derive(Debug, Clone)]
pub struct GenerationalPool<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<u32>,
    len: usize,
}

impl<T> GenerationalPool<T> {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    /// Creates an empty pool with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    /// Stores `value` and returns its index.
    ///
    /// # Panics
    /// Panics if the pool would exceed `u32::MAX` slots.
    pub fn alloc(&mut self, value: T) -> GenerationalIndex {
        self.alloc_with(|_| value)
    }

    /// Stores the value built by `make`, which receives the index the value
    /// is about to be stored under.
    ///
    /// Lets a value hold its own handle (or register it elsewhere) before it
    /// is inserted.
    ///
    /// # Panics
    /// Panics if the pool would exceed `u32::MAX` slots.
    pub fn alloc_with(&mut self, make: impl FnOnce(GenerationalIndex) -> T) -> GenerationalIndex {
        if let Some(idx) = self.free_head {
            let (generation, next_free) = match self.slots[idx as usize] {
                Slot::Free { generation, next_free } => (generation.wrapping_add(1), next_free),
                Slot::Occupied { .. } => panic!("corrupted free list at slot {idx}"),
            };
            let handle = GenerationalIndex { index: idx, generation };
            let value = make(handle);
            self.slots[idx as usize] = Slot::Occupied { generation, value };
            self.free_head = next_free;
            self.len += 1;
            handle
        } else {
            let idx = u32::try_from(self.slots.len())
                .unwrap_or_else(|_| panic!("generational pool exhausted"));
            let handle = GenerationalIndex { index: idx, generation: 0 };
            let value = make(handle);
            self.slots.push(Slot::Occupied { generation: 0, value });
            self.len += 1;
            handle
        }
    }

    /// Returns the value behind `idx`, or `None` if it was freed.
    pub fn get(&self, idx: GenerationalIndex) -> Option<&T> {
        match self.slots.get(idx.index())? {
            Slot::Occupied { generation, value } if *generation == idx.generation => Some(value),
            _ => None,
        }
    }

    /// Returns the value behind `idx` mutably, or `None` if it was freed.
    pub fn get_mut(&mut self, idx: GenerationalIndex) -> Option<&mut T> {
        match self.slots.get_mut(idx.index())? {
            Slot::Occupied { generation, value } if *generation == idx.generation => Some(value),
            _ => None,
        }
    }

    /// Returns `true` if `idx` still names a live value.
    #[inline]
    pub fn contains(&self, idx: GenerationalIndex) -> bool {
        self.get(idx).is_some()
    }

    /// Frees the slot behind `idx` and hands its value back.
    ///
    /// Returns `None` (and leaves the pool untouched) for stale indices.
    pub fn free(&mut self, idx: GenerationalIndex) -> Option<T> {
        let slot = self.slots.get_mut(idx.index())?;
        match slot {
            Slot::Occupied { generation, .. } if *generation == idx.generation => {}
            _ => return None,
        }

        let vacated = Slot::Free {
            generation: idx.generation,
            next_free: self.free_head,
        };
        let Slot::Occupied { value, .. } = core::mem::replace(slot, vacated) else {
            unreachable!("slot checked as occupied above");
        };

        self.free_head = Some(idx.index);
        self.len -= 1;
        Some(value)
    }

    /// Number of live values.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no value is live.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates over live values in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (GenerationalIndex, &T)> + '_ {
        self.slots.iter().zip(0u32..).filter_map(|(slot, index)| match slot {
            Slot::Occupied { generation, value } => Some((
                GenerationalIndex {
                    index,
                    generation: *generation,
                },
                value,
            )),
            Slot::Free { .. } => None,
        })
    }

    /// Iterates mutably over live values in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (GenerationalIndex, &mut T)> + '_ {
        self.slots.iter_mut().zip(0u32..).filter_map(|(slot, index)| match slot {
            Slot::Occupied { generation, value } => Some((
                GenerationalIndex {
                    index,
                    generation: *generation,
                },
                value,
            )),
            Slot::Free { .. } => None,
        })
    }
}

impl<T> Default for GenerationalPool<T> {
    fn default() -> Self {
        Self::new()
    }
}
