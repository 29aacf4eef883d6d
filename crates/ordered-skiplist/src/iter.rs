use std::iter::FusedIterator;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::{
    error::Result,
    interface::Comparator,
    list::{Link, Node, NodeArena, Position, Skiplist},
};


// ================================
//  Forwards iterators
// ================================

/// An iterator over the entries of a [`Skiplist`] in ascending order.
///
/// Created by [`Skiplist::iter`] and [`Skiplist::iter_from`]. To restart iteration, create a new
/// iterator.
pub struct Iter<'a, T, Cmp> {
    list: &'a Skiplist<T, Cmp>,
    next: Link,
}

impl<'a, T, Cmp> Iter<'a, T, Cmp> {
    #[inline]
    #[must_use]
    pub(crate) const fn new(list: &'a Skiplist<T, Cmp>, next: Link) -> Self {
        Self { list, next }
    }

    /// The position of the entry which the next call to `next` would return, or the end position
    /// if the iterator is exhausted.
    #[inline]
    #[must_use]
    pub const fn current_position(&self) -> Position {
        Position::from_link(self.next)
    }

    /// Skip over `steps` entries. Skipping exactly to the end is allowed.
    ///
    /// # Errors
    /// Returns an error, and leaves the iterator unchanged, if fewer than `steps` entries remain.
    pub fn advance(&mut self, steps: usize) -> Result<()> {
        let position = self.list.advance(Position::from_link(self.next), steps)?;
        self.next = position.link();
        Ok(())
    }
}

impl<'a, T, Cmp> Iterator for Iter<'a, T, Cmp> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.next?)?;
        self.next = node.skip(0);
        Some(node.entry())
    }
}

impl<T, Cmp> FusedIterator for Iter<'_, T, Cmp> {}

impl<T, Cmp> Clone for Iter<'_, T, Cmp> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            list: self.list,
            next: self.next,
        }
    }
}

impl<T, Cmp> Debug for Iter<'_, T, Cmp> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Iter")
            .field("position", &self.current_position())
            .finish_non_exhaustive()
    }
}

/// An owning iterator over the entries of a [`Skiplist`] in ascending order.
///
/// Created by the [`IntoIterator`] implementation of [`Skiplist`].
pub struct IntoIter<T> {
    arena:     NodeArena<T>,
    next:      Link,
    remaining: usize,
}

impl<T> IntoIter<T> {
    #[inline]
    #[must_use]
    pub(crate) const fn new(arena: NodeArena<T>, next: Link, remaining: usize) -> Self {
        Self { arena, next, remaining }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.free(self.next?)?;
        self.next = node.skip(0);
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.into_entry())
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Debug for IntoIter<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("IntoIter")
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

// ================================
//  Cursor
// ================================

/// A cursor which can move forwards and backwards through a [`Skiplist`], and seek to entries.
///
/// The cursor is either at an entry of the skiplist, or at a phantom position which is not
/// [valid]. The phantom position is just before the first entry and just after the last entry,
/// so moving the cursor forwards from the last entry, or backwards from the first entry, makes it
/// invalid, and moving it again wraps around.
///
/// Moving backwards needs a search from the head of the skiplist, so [`prev`] takes expected
/// `O(log n)` time instead of `O(1)`.
///
/// Created by [`Skiplist::cursor`].
///
/// [valid]: Cursor::is_valid
/// [`prev`]: Cursor::prev
pub struct Cursor<'a, T, Cmp> {
    list:   &'a Skiplist<T, Cmp>,
    cursor: Link,
}

impl<'a, T, Cmp> Cursor<'a, T, Cmp> {
    #[inline]
    #[must_use]
    pub(crate) const fn new(list: &'a Skiplist<T, Cmp>) -> Self {
        Self { list, cursor: None }
    }

    /// Whether the cursor is at an entry of the skiplist.
    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.cursor.is_some()
    }

    /// Move the cursor to the phantom position.
    #[inline]
    pub const fn reset(&mut self) {
        self.cursor = None;
    }

    /// The entry the cursor is at, if it is valid.
    #[must_use]
    pub fn current(&self) -> Option<&'a T> {
        let list = self.list;
        self.cursor
            .and_then(|id| list.node(id))
            .map(Node::entry)
    }

    /// The position the cursor is at. The phantom position is reported as the end position.
    #[inline]
    #[must_use]
    pub const fn current_position(&self) -> Position {
        Position::from_link(self.cursor)
    }

    /// Move the cursor to the first entry of the skiplist. The cursor is invalid afterwards only
    /// if the skiplist is empty.
    #[inline]
    pub const fn seek_to_first(&mut self) {
        self.cursor = self.list.first_link();
    }

    /// Move the cursor to the last entry of the skiplist. The cursor is invalid afterwards only
    /// if the skiplist is empty.
    pub fn seek_to_last(&mut self) {
        self.cursor = self.list.find_last_link();
    }
}

impl<'a, T, Cmp: Comparator<T>> Cursor<'a, T, Cmp> {
    /// Move the cursor backwards by one entry, and return the new current entry.
    ///
    /// From the phantom position, this moves to the last entry.
    pub fn prev(&mut self) -> Option<&'a T> {
        let list = self.list;

        self.cursor = if let Some(current) = self.current() {
            list.find_le_or_geq::<false, _>(|stored| list.comparator().cmp(stored, current))
        } else {
            list.find_last_link()
        };

        self.current()
    }

    /// Move the cursor to the first entry which is at least `min_bound`. If there is no such
    /// entry, the cursor becomes invalid.
    pub fn seek(&mut self, min_bound: &T) {
        let list = self.list;
        self.cursor = list.find_le_or_geq::<true, _>(|stored| list.comparator().cmp(stored, min_bound));
    }
}

impl<'a, T, Cmp> Iterator for Cursor<'a, T, Cmp> {
    type Item = &'a T;

    /// Move the cursor forwards by one entry, and return the new current entry.
    ///
    /// From the phantom position, this moves to the first entry. Since the cursor wraps around,
    /// this iterator is not fused: after returning `None` at the end, it starts over.
    fn next(&mut self) -> Option<Self::Item> {
        self.cursor = if let Some(id) = self.cursor {
            self.list.node(id).and_then(|node| node.skip(0))
        } else {
            self.list.first_link()
        };

        self.current()
    }
}

impl<T, Cmp> Clone for Cursor<'_, T, Cmp> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            list:   self.list,
            cursor: self.cursor,
        }
    }
}

impl<T, Cmp> Debug for Cursor<'_, T, Cmp> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Cursor")
            .field("position", &self.current_position())
            .finish_non_exhaustive()
    }
}
