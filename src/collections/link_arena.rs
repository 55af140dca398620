//! `LinkArena` - many doubly linked sequences sharing one generational arena.
//!
//! Each sequence is described by a small [`ListHead`] owned by whoever owns the
//! sequence (a graph node owns three of them). Links live in a shared
//! [`GenerationalPool`], so a [`LinkPos`] handed out by the arena stays valid
//! until that particular link is removed, no matter what else is inserted,
//! removed, or relinked around it.
//!
//! Links can be *unlinked* without being freed and *relinked* into another
//! sequence, which is how entities move between owners without their
//! positions going stale.
//!
//! # Performance
//! | Operation | Complexity |
//! |-----------|------------|
//! | `insert_before` / `push_back` | \(O(1)\) |
//! | `remove` / `unlink` / `link_before` | \(O(1)\) |
//! | `next` / `prev` / `get` | \(O(1)\) |
//! | `iter` | \(O(len)\) |

use crate::alloc::{GenerationalIndex, GenerationalPool};
use serde::{Deserialize, Serialize};

/// Handle to one link of one sequence.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkPos(GenerationalIndex);

impl LinkPos {
    /// The underlying arena index.
    #[inline]
    pub fn raw(self) -> GenerationalIndex {
        self.0
    }
}

/// Endpoints and length of one sequence stored in a [`LinkArena`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListHead {
    head: Option<LinkPos>,
    tail: Option<LinkPos>,
    len: usize,
}

impl ListHead {
    /// An empty sequence.
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of links in the sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the sequence has no links.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First link, if any.
    #[inline]
    pub fn first(&self) -> Option<LinkPos> {
        self.head
    }

    /// Last link, if any.
    #[inline]
    pub fn last(&self) -> Option<LinkPos> {
        self.tail
    }
}

#[derive(Debug, Clone)]
struct Link<T> {
    value: T,
    prev: Option<LinkPos>,
    next: Option<LinkPos>,
}

/// Arena holding the links of any number of sequences.
#[derive(Debug, Clone)]
pub struct LinkArena<T> {
    links: GenerationalPool<Link<T>>,
}

impl<T> LinkArena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            links: GenerationalPool::new(),
        }
    }

    /// Creates an empty arena with room for `capacity` links.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: GenerationalPool::with_capacity(capacity),
        }
    }

    /// Total number of live links across all sequences.
    #[inline]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns `true` if the arena holds no links.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Returns `true` if `pos` names a live link.
    #[inline]
    pub fn contains(&self, pos: LinkPos) -> bool {
        self.links.contains(pos.0)
    }

    /// Value stored at `pos`.
    #[inline]
    pub fn get(&self, pos: LinkPos) -> Option<&T> {
        self.links.get(pos.0).map(|link| &link.value)
    }

    /// Mutable value stored at `pos`.
    #[inline]
    pub fn get_mut(&mut self, pos: LinkPos) -> Option<&mut T> {
        self.links.get_mut(pos.0).map(|link| &mut link.value)
    }

    /// Link following `pos` in its sequence.
    ///
    /// Returns `None` at the end of the sequence or for a stale position.
    #[inline]
    pub fn next(&self, pos: LinkPos) -> Option<LinkPos> {
        self.links.get(pos.0).and_then(|link| link.next)
    }

    /// Link preceding `pos` in its sequence.
    #[inline]
    pub fn prev(&self, pos: LinkPos) -> Option<LinkPos> {
        self.links.get(pos.0).and_then(|link| link.prev)
    }

    /// Appends `value` to `list`.
    pub fn push_back(&mut self, list: &mut ListHead, value: T) -> LinkPos {
        self.insert_before(list, None, value)
    }

    /// Inserts `value` before `before` (or at the back when `None`).
    ///
    /// # Panics
    /// Panics if `before` is stale. Callers are expected to have verified
    /// that `before` belongs to `list`.
    pub fn insert_before(
        &mut self,
        list: &mut ListHead,
        before: Option<LinkPos>,
        value: T,
    ) -> LinkPos {
        let pos = LinkPos(self.links.alloc(Link {
            value,
            prev: None,
            next: None,
        }));
        self.link_before(list, pos, before);
        pos
    }

    /// Removes the link at `pos` from `list` and frees it.
    ///
    /// # Panics
    /// Panics if `pos` is stale.
    pub fn remove(&mut self, list: &mut ListHead, pos: LinkPos) -> T {
        self.unlink(list, pos);
        match self.links.free(pos.0) {
            Some(link) => link.value,
            None => unreachable!("link {pos:?} was just unlinked"),
        }
    }

    /// Detaches `pos` from `list` without freeing it.
    ///
    /// The link keeps its value and handle and can be relinked with
    /// [`LinkArena::link_before`], possibly into a different sequence.
    ///
    /// # Panics
    /// Panics if `pos` is stale.
    pub fn unlink(&mut self, list: &mut ListHead, pos: LinkPos) {
        let (prev, next) = {
            let link = self.link_mut(pos);
            let neighbours = (link.prev, link.next);
            link.prev = None;
            link.next = None;
            neighbours
        };

        match prev {
            Some(p) => self.link_mut(p).next = next,
            None => list.head = next,
        }
        match next {
            Some(n) => self.link_mut(n).prev = prev,
            None => list.tail = prev,
        }
        list.len -= 1;
    }

    /// Links a detached `pos` into `list` before `before` (or at the back).
    ///
    /// # Panics
    /// Panics if `pos` or `before` is stale.
    pub fn link_before(&mut self, list: &mut ListHead, pos: LinkPos, before: Option<LinkPos>) {
        let prev = match before {
            Some(b) => self.link_mut(b).prev,
            None => list.tail,
        };

        {
            let link = self.link_mut(pos);
            link.prev = prev;
            link.next = before;
        }

        match prev {
            Some(p) => self.link_mut(p).next = Some(pos),
            None => list.head = Some(pos),
        }
        match before {
            Some(b) => self.link_mut(b).prev = Some(pos),
            None => list.tail = Some(pos),
        }
        list.len += 1;
    }

    /// Moves every link of `from` to the back of `to`, keeping their order
    /// and their positions.
    pub fn append(&mut self, to: &mut ListHead, from: &mut ListHead) {
        let Some(first) = from.head else {
            return;
        };
        match to.tail {
            Some(tail) => {
                self.link_mut(tail).next = Some(first);
                self.link_mut(first).prev = Some(tail);
            }
            None => to.head = Some(first),
        }
        to.tail = from.tail;
        to.len += from.len;
        *from = ListHead::new();
    }

    /// Iterates over the positions of `list`, front to back.
    pub fn positions<'a>(&'a self, list: &ListHead) -> Positions<'a, T> {
        Positions {
            arena: self,
            current: list.head,
            remaining: list.len,
        }
    }

    /// Iterates over the values of `list`, front to back.
    pub fn iter<'a>(&'a self, list: &ListHead) -> impl Iterator<Item = &'a T> + 'a {
        let positions = self.positions(list);
        positions.filter_map(move |pos| self.get(pos))
    }

    fn link_mut(&mut self, pos: LinkPos) -> &mut Link<T> {
        self.links
            .get_mut(pos.0)
            .unwrap_or_else(|| panic!("stale sequence position {pos:?}"))
    }
}

impl<T> Default for LinkArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the positions of one sequence.
pub struct Positions<'a, T> {
    arena: &'a LinkArena<T>,
    current: Option<LinkPos>,
    remaining: usize,
}

impl<T> Iterator for Positions<'_, T> {
    type Item = LinkPos;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.current?;
        self.current = self.arena.next(pos);
        self.remaining = self.remaining.saturating_sub(1);
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Positions<'_, T> {}
