mod arena;
mod node;


use std::cmp::Ordering;
use std::ops::Index;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use oorandom::Rand32;
use tracing::Level as LogLevel;

use crate::{
    config::{SkiplistConfig, validate_probability},
    error::{Result, SkiplistError},
    interface::{Comparator, OrdComparator},
    iter::{Cursor, IntoIter, Iter},
    levels::{LEVEL_CAP, entropy_seed, random_level},
};

pub(crate) use self::{
    arena::{NodeArena, NodeId},
    node::{Link, Node},
};


// ================================
//  Position
// ================================

/// A position in a [`Skiplist`]: either one of its entries, or the end position, which comes
/// after the last entry.
///
/// Two positions are equal only if they refer to the same node, or are both the end position;
/// entries are never compared. A position stays valid until its entry is erased, after which it is
/// *stale*: operations taking a position reject stale positions instead of resolving them to
/// whichever entry is inserted later.
///
/// A position should only be used with the skiplist which produced it, or a clone of that
/// skiplist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position(Link);

impl Position {
    /// The end position of every skiplist.
    pub const END: Self = Self(None);

    #[inline]
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.0.is_none()
    }

    #[inline]
    #[must_use]
    pub(crate) const fn from_link(link: Link) -> Self {
        Self(link)
    }

    #[inline]
    #[must_use]
    pub(crate) const fn link(self) -> Link {
        self.0
    }
}

impl Default for Position {
    #[inline]
    fn default() -> Self {
        Self::END
    }
}

// ================================
//  List
// ================================

/// An ordered set of unique entries, stored in a [skiplist].
///
/// Entries are ordered by `Cmp`, a [`Comparator`]; entries which compare equal are the same
/// entry, and inserting one which is already present leaves the skiplist unchanged.
///
/// Every entry is stored in a node which participates in levels `0..=level`, where `level` is
/// drawn from a geometric distribution when the node is inserted: each further level is reached
/// with probability [`level_probability`], up to [`max_level`]. Level 0 links every entry in
/// ascending order; higher levels link sparser subsets, which searches use to skip ahead.
///
/// Insertion, lookup, and erasure take expected `O(log n)` time if [`max_level`] is about
/// `log_{1/p}(n)`. Indexed access takes `O(n)` time.
///
/// [skiplist]: https://en.wikipedia.org/wiki/Skip_list
/// [`level_probability`]: Skiplist::level_probability
/// [`max_level`]: Skiplist::max_level
#[derive(Clone)]
pub struct Skiplist<T, Cmp = OrdComparator> {
    cmp:               Cmp,
    arena:             NodeArena<T>,
    /// The sentinel's links. `head[level]` is the first node on `level`.
    head:              [Link; LEVEL_CAP],
    /// Invariant: every `head[level]` with `level > current_max_level` is `None`, and
    /// `current_max_level <= max_level`.
    current_max_level: usize,
    max_level:         usize,
    level_probability: f32,
    prng:              Rand32,
    len:               usize,
}

// Construction
impl<T, Cmp> Skiplist<T, Cmp> {
    /// Create an empty skiplist with the default [`SkiplistConfig`], seeding its PRNG from the OS.
    #[must_use]
    pub fn with_comparator(cmp: Cmp) -> Self {
        Self::from_parts(cmp, SkiplistConfig::new(), entropy_seed())
    }

    /// Create an empty skiplist with the default [`SkiplistConfig`] and a fixed seed, so that the
    /// levels of its nodes are reproducible.
    #[must_use]
    pub fn new_seeded(cmp: Cmp, seed: u64) -> Self {
        Self::from_parts(cmp, SkiplistConfig::new(), seed)
    }

    /// Create an empty skiplist with the given settings.
    ///
    /// # Errors
    /// Returns an error if `config` has a level probability outside `(0, 1)`, or a max level of
    /// at least [`LEVEL_CAP`].
    pub fn with_config(cmp: Cmp, config: SkiplistConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(entropy_seed);
        Ok(Self::from_parts(cmp, config, seed))
    }

    #[must_use]
    fn from_parts(cmp: Cmp, config: SkiplistConfig, seed: u64) -> Self {
        Self {
            cmp,
            arena:             NodeArena::new(),
            head:              [None; LEVEL_CAP],
            current_max_level: 0,
            max_level:         config.max_level,
            level_probability: config.level_probability,
            prng:              Rand32::new(seed),
            len:               0,
        }
    }
}

impl<T: Ord> Skiplist<T> {
    /// Create an empty skiplist ordered by `T`'s [`Ord`] implementation.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(OrdComparator)
    }
}

impl<T, Cmp: Default> Default for Skiplist<T, Cmp> {
    #[inline]
    fn default() -> Self {
        Self::with_comparator(Cmp::default())
    }
}

// Short utility functions
impl<T, Cmp> Skiplist<T, Cmp> {
    #[inline]
    #[must_use]
    pub(crate) fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.arena.get(id)
    }

    #[inline]
    #[must_use]
    fn entry_at(&self, link: Link) -> Option<&T> {
        link.and_then(|id| self.arena.get(id)).map(Node::entry)
    }

    /// The very first link on the lowest level leads to the first node.
    #[inline]
    #[must_use]
    pub(crate) const fn first_link(&self) -> Link {
        let [first, ..] = self.head;
        first
    }

    /// The node after `link` on level 0. The successor of the end (or of a stale link) is the end.
    #[inline]
    #[must_use]
    fn successor(&self, link: Link) -> Link {
        link.and_then(|id| self.arena.get(id)).and_then(|node| node.skip(0))
    }

    /// The link following `preceding` on `level`, where a `None` value of `preceding` stands for
    /// the head.
    #[inline]
    #[must_use]
    fn link_after(&self, preceding: Link, level: usize) -> Link {
        match preceding {
            Some(id) => self.arena.get(id).and_then(|node| node.skip(level)),
            None     => self.head.get(level).copied().flatten(),
        }
    }

    /// Set the link following `preceding` on `level`, where a `None` value of `preceding` stands
    /// for the head.
    fn set_link_after(&mut self, preceding: Link, level: usize, link: Link) {
        match preceding {
            Some(id) => {
                if let Some(node) = self.arena.get_mut(id) {
                    node.set_skip(level, link);
                }
            }
            None => {
                if let Some(head_link) = self.head.get_mut(level) {
                    *head_link = link;
                }
            }
        }
    }

    /// Whether `position` refers to a live node, or is the end position.
    fn check_position(&self, position: Position) -> Result<()> {
        match position.0 {
            Some(id) if self.arena.get(id).is_none() => Err(SkiplistError::StalePosition),
            _                                        => Ok(()),
        }
    }
}

// Searching
impl<T, Cmp> Skiplist<T, Cmp> {
    /// Descend from the head at `current_max_level` down to level 0, on each level moving forwards
    /// while `probe` orders the next entry as [`Ordering::Less`]. `on_level` is given each level
    /// along with the last link visited on it (with `None` for the head).
    ///
    /// Returns the last link visited on level 0: the last node which `probe` orders as less, if
    /// any.
    fn descend<F, L>(&self, mut probe: F, mut on_level: L) -> Link
    where
        F: FnMut(&T) -> Ordering,
        L: FnMut(usize, Link),
    {
        let mut current: Link = None;

        for level in (0..=self.current_max_level).rev() {
            while let Some(next) = self.link_after(current, level) {
                if self.arena.get(next).is_some_and(|node| probe(node.entry()).is_lt()) {
                    // We should search further ahead since `next` was too small.
                    // (So, don't move down a level.)
                    current = Some(next);
                } else {
                    break;
                }
            }

            on_level(level, current);
        }

        current
    }

    /// Build the update path: for each level, the last node before the probed entry, with `None`
    /// standing for the head. Levels above `current_max_level` are left as the head.
    #[must_use]
    fn find_preceding<F: FnMut(&T) -> Ordering>(&self, probe: F) -> [Link; LEVEL_CAP] {
        let mut update = [None; LEVEL_CAP];

        self.descend(probe, |level, link| {
            if let Some(slot) = update.get_mut(level) {
                *slot = link;
            }
        });

        update
    }

    /// With `GEQ`, return the first node which `probe` does not order as less. Otherwise, return
    /// the last node which `probe` orders as less.
    #[must_use]
    pub(crate) fn find_le_or_geq<const GEQ: bool, F>(&self, probe: F) -> Link
    where
        F: FnMut(&T) -> Ordering,
    {
        let strictly_less = self.descend(probe, |_, _| {});

        if GEQ {
            self.link_after(strictly_less, 0)
        } else {
            strictly_less
        }
    }

    /// Return the last node in the skiplist, if the skiplist is nonempty.
    #[must_use]
    pub(crate) fn find_last_link(&self) -> Link {
        self.find_le_or_geq::<false, _>(|_| Ordering::Less)
    }

    /// Find the entry for which `probe` returns [`Ordering::Equal`].
    ///
    /// `probe` is given stored entries and should return how each one is ordered relative to the
    /// entry being searched for, consistently with the skiplist's comparator (as with
    /// [`slice::binary_search_by`]). This allows searching by a key, or some other part of an
    /// entry, without constructing a whole entry.
    ///
    /// Returns the end position if there is no such entry.
    #[must_use]
    pub fn find_by<F: FnMut(&T) -> Ordering>(&self, mut probe: F) -> Position {
        let candidate = self.find_le_or_geq::<true, _>(&mut probe);

        if self.entry_at(candidate).is_some_and(|entry| probe(entry).is_eq()) {
            Position(candidate)
        } else {
            Position::END
        }
    }
}

// Comparator-based operations
impl<T, Cmp: Comparator<T>> Skiplist<T, Cmp> {
    /// Insert `entry`, returning its position.
    ///
    /// If an entry comparing equal to `entry` is already present, that entry is left in place,
    /// its position is returned, and `entry` is dropped.
    pub fn insert(&mut self, entry: T) -> Position {
        let update = self.find_preceding(|stored| self.cmp.cmp(stored, &entry));

        // `update[0]` is the greatest node which is strictly less than `entry`, so `entry` is
        // already present iff the next node compares equal to it.
        let [preceding, ..] = update;
        let successor = self.link_after(preceding, 0);
        if self.entry_at(successor).is_some_and(|stored| self.cmp.cmp(stored, &entry).is_eq()) {
            return Position(successor);
        }

        let node_level = random_level(&mut self.prng, self.level_probability, self.max_level);

        // Levels above the old `current_max_level` were not visited by the search, so their
        // `update` entries are already the head.
        if node_level > self.current_max_level {
            tracing::event!(
                LogLevel::TRACE,
                "skiplist max level raised from {} to {node_level}",
                self.current_max_level,
            );
            self.current_max_level = node_level;
        }

        let id = self.arena.alloc(Node::new(node_level, entry));

        for (level, preceding) in update.into_iter().take(node_level + 1).enumerate() {
            // On `level`, put the new node between `preceding` and whatever followed it.
            let next = self.link_after(preceding, level);
            if let Some(node) = self.arena.get_mut(id) {
                node.set_skip(level, next);
            }
            self.set_link_after(preceding, level, Some(id));
        }

        self.len += 1;
        Position(Some(id))
    }

    /// Find the entry comparing equal to `entry`, or return the end position if there is none.
    #[must_use]
    pub fn find(&self, entry: &T) -> Position {
        self.find_by(|stored| self.cmp.cmp(stored, entry))
    }

    /// Check whether the entry, or something which compares as equal to the entry, is in
    /// the skiplist.
    #[must_use]
    pub fn contains(&self, entry: &T) -> bool {
        !self.find(entry).is_end()
    }

    /// Erase the entry at `position`, returning the position of the entry which followed it (or
    /// the end position).
    ///
    /// # Errors
    /// Fails without changing the skiplist if `position` is the end position or is stale.
    pub fn erase(&mut self, position: Position) -> Result<Position> {
        self.take(position).map(|(_, next)| next)
    }

    /// Erase the entry at `position` and return it, along with the position of the entry which
    /// followed it (or the end position).
    ///
    /// # Errors
    /// Fails without changing the skiplist if `position` is the end position or is stale.
    pub fn take(&mut self, position: Position) -> Result<(T, Position)> {
        let Some(id) = position.0 else {
            tracing::event!(LogLevel::DEBUG, "rejected an attempt to erase the end of a skiplist");
            return Err(SkiplistError::EraseEnd);
        };

        let update = self.update_path_to(id)?;

        // Nothing has been changed yet. From here on, nothing fails.
        let Some(node) = self.unlink(&update, id) else {
            return Err(SkiplistError::StalePosition);
        };
        self.lower_max_level();

        let next = Position(node.skip(0));
        Ok((node.into_entry(), next))
    }

    /// Erase every entry in the half-open range `[first, last)`, returning `last`.
    ///
    /// `last` may be the end position, to erase every entry from `first` onwards. If
    /// `first == last`, nothing is erased.
    ///
    /// # Errors
    /// Fails without changing the skiplist if either position is stale, if `first` is the end
    /// position while `last` is not, or if `last` does not come at or after `first`.
    pub fn erase_range(&mut self, first: Position, last: Position) -> Result<Position> {
        if first == last {
            return Ok(last);
        }

        let steps = self.distance(first, last)?;
        let Some(first_id) = first.0 else {
            return Err(SkiplistError::EraseEnd);
        };
        // Every node in the range is preceded, on each of its levels, by a node before `first`
        // or by another node in the range. So one search suffices.
        let update = self.update_path_to(first_id)?;

        // Nothing has been changed yet. From here on, nothing fails.
        let mut current = first.0;
        for _ in 0..steps {
            let Some(id) = current else { break };
            current = self.unlink(&update, id).and_then(|node| node.skip(0));
        }
        self.lower_max_level();

        debug_assert_eq!(current, last.0, "erase_range should stop at `last`");
        Ok(last)
    }

    /// Search for the entry of the live node `id`, and return the search path to it.
    ///
    /// # Errors
    /// Returns `StalePosition` if `id` is stale, or if the search does not lead to `id`, which
    /// happens only if the comparator is not a total order.
    fn update_path_to(&self, id: NodeId) -> Result<[Link; LEVEL_CAP]> {
        let target = self.arena.get(id).ok_or(SkiplistError::StalePosition)?.entry();
        let update = self.find_preceding(|stored| self.cmp.cmp(stored, target));

        let [preceding, ..] = update;
        if self.link_after(preceding, 0) == Some(id) {
            Ok(update)
        } else {
            Err(SkiplistError::StalePosition)
        }
    }

    /// Remove the entry comparing equal to `entry`, if there is one, and return it.
    pub fn remove(&mut self, entry: &T) -> Option<T> {
        let position = self.find(entry);
        if position.is_end() {
            None
        } else {
            self.take(position).ok().map(|(entry, _)| entry)
        }
    }

    /// Get a [`Cursor`] which can move forwards and backwards and seek through the skiplist.
    /// It starts at the phantom position before the first entry.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Cursor<'_, T, Cmp> {
        Cursor::new(self)
    }
}

// Positions and accessors
impl<T, Cmp> Skiplist<T, Cmp> {
    /// Free `id`, and splice it out of each of its levels on which it directly follows its entry
    /// of `update`. Later nodes of a range may be unlinked with the same `update`, since each
    /// `update[level]` then links to the next node of the range on `level`.
    ///
    /// Does not lower `current_max_level`.
    fn unlink(&mut self, update: &[Link; LEVEL_CAP], id: NodeId) -> Option<Node<T>> {
        let node = self.arena.free(id)?;

        for (level, preceding) in update.iter().copied().enumerate().take(node.level() + 1) {
            // Only a comparator which is not a total order can make this skip anything.
            if self.link_after(preceding, level) == Some(id) {
                self.set_link_after(preceding, level, node.skip(level));
            }
        }

        self.len -= 1;
        debug_assert_eq!(self.arena.occupied(), self.len, "every live node should be counted");
        Some(node)
    }

    /// Lower `current_max_level` while its level is empty.
    fn lower_max_level(&mut self) {
        let old_max_level = self.current_max_level;
        while self.current_max_level > 0
            && self.head.get(self.current_max_level).copied().flatten().is_none()
        {
            self.current_max_level -= 1;
        }

        if self.current_max_level != old_max_level {
            tracing::event!(
                LogLevel::TRACE,
                "skiplist max level lowered from {old_max_level} to {}",
                self.current_max_level,
            );
        }
    }

    /// The number of level-0 steps from `first` to `last`.
    fn distance(&self, first: Position, last: Position) -> Result<usize> {
        if first.is_end() {
            return Err(SkiplistError::EraseEnd);
        }
        self.check_position(first)?;
        self.check_position(last)?;

        let mut steps = 0;
        let mut current = first.0;
        while current != last.0 {
            if current.is_none() {
                return Err(SkiplistError::InvalidRange);
            }
            current = self.successor(current);
            steps += 1;
        }

        Ok(steps)
    }

    fn id_at_index(&self, index: usize) -> Result<NodeId> {
        let out_of_range = SkiplistError::OutOfRange { index, len: self.len };
        if index >= self.len {
            return Err(out_of_range);
        }

        let mut current = self.first_link();
        for _ in 0..index {
            current = self.successor(current);
        }
        current.ok_or(out_of_range)
    }

    /// The number of entries in the skiplist.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The highest level which currently has any node on it, or 0 if the skiplist is empty.
    #[inline]
    #[must_use]
    pub const fn current_max_level(&self) -> usize {
        self.current_max_level
    }

    /// The highest level which any node may reach.
    #[inline]
    #[must_use]
    pub const fn max_level(&self) -> usize {
        self.max_level
    }

    /// The probability that a new node which reached some level also reaches the next one.
    #[inline]
    #[must_use]
    pub const fn level_probability(&self) -> f32 {
        self.level_probability
    }

    /// Change the level probability used for nodes inserted from now on. Existing nodes keep
    /// their levels.
    ///
    /// # Errors
    /// Returns an error, and leaves the probability unchanged, if `level_probability` is not
    /// strictly between `0` and `1`.
    pub fn set_level_probability(&mut self, level_probability: f32) -> Result<()> {
        validate_probability(level_probability)?;

        tracing::event!(
            LogLevel::DEBUG,
            "skiplist level probability changed from {} to {level_probability}",
            self.level_probability,
        );
        self.level_probability = level_probability;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub const fn comparator(&self) -> &Cmp {
        &self.cmp
    }

    /// The position of the first entry, or the end position if the skiplist is empty.
    #[inline]
    #[must_use]
    pub const fn begin(&self) -> Position {
        Position(self.first_link())
    }

    /// The end position, which comes after the last entry.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> Position {
        Position::END
    }

    /// Get the entry at `position`. Returns `None` for the end position and for stale
    /// positions.
    #[inline]
    #[must_use]
    pub fn get(&self, position: Position) -> Option<&T> {
        self.entry_at(position.0)
    }

    /// Get the entry at `position` mutably. Returns `None` for the end position and for stale
    /// positions.
    ///
    /// It is a logic error to change the entry in a way that changes how it is ordered relative
    /// to the other entries. Doing so does not cause undefined behavior, but lookups and
    /// insertions may behave incorrectly afterwards.
    #[inline]
    #[must_use]
    pub fn get_mut(&mut self, position: Position) -> Option<&mut T> {
        position.0
            .and_then(|id| self.arena.get_mut(id))
            .map(Node::entry_mut)
    }

    /// The highest level which the node at `position` participates in.
    /// Returns `None` for the end position and for stale positions.
    #[must_use]
    pub fn level_of(&self, position: Position) -> Option<usize> {
        position.0
            .and_then(|id| self.arena.get(id))
            .map(Node::level)
    }

    /// The position after `position`. The end position (and any stale position) is followed by
    /// the end position.
    #[inline]
    #[must_use]
    pub fn next_position(&self, position: Position) -> Position {
        Position(self.successor(position.0))
    }

    /// The position `steps` entries after `position`. Reaching exactly the end position is
    /// allowed.
    ///
    /// # Errors
    /// Returns an error if this would move past the end position, or if `position` is stale.
    pub fn advance(&self, position: Position, steps: usize) -> Result<Position> {
        self.check_position(position)?;

        let mut current = position.0;
        for _ in 0..steps {
            if current.is_none() {
                return Err(SkiplistError::AdvancePastEnd);
            }
            current = self.successor(current);
        }

        Ok(Position(current))
    }

    /// Get the entry at `index` in ascending order.
    ///
    /// This walks the lowest level from the first entry, taking `O(index)` time.
    ///
    /// # Errors
    /// Returns an error if `index` is not less than [`self.len()`].
    ///
    /// [`self.len()`]: Skiplist::len
    pub fn get_index(&self, index: usize) -> Result<&T> {
        let id = self.id_at_index(index)?;
        self.arena
            .get(id)
            .map(Node::entry)
            .ok_or(SkiplistError::OutOfRange { index, len: self.len })
    }

    /// Get the entry at `index` in ascending order, mutably. See [`Skiplist::get_mut`] for
    /// restrictions on changing the entry.
    ///
    /// This walks the lowest level from the first entry, taking `O(index)` time.
    ///
    /// # Errors
    /// Returns an error if `index` is not less than [`self.len()`].
    ///
    /// [`self.len()`]: Skiplist::len
    pub fn get_index_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        let id = self.id_at_index(index)?;
        self.arena
            .get_mut(id)
            .map(Node::entry_mut)
            .ok_or(SkiplistError::OutOfRange { index, len })
    }

    /// The smallest entry, if the skiplist is nonempty. This operation is fast.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.entry_at(self.first_link())
    }

    /// The greatest entry, if the skiplist is nonempty.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.entry_at(self.find_last_link())
    }

    /// Erase every entry. Every position obtained before this call becomes stale.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = [None; LEVEL_CAP];
        self.current_max_level = 0;
        self.len = 0;
    }

    /// Iterate over the entries in ascending order.
    #[inline]
    #[must_use]
    pub const fn iter(&self) -> Iter<'_, T, Cmp> {
        Iter::new(self, self.first_link())
    }

    /// Iterate over the entries in ascending order, starting from the entry at `position`.
    /// If `position` is the end position or is stale, the iterator is empty.
    #[must_use]
    pub fn iter_from(&self, position: Position) -> Iter<'_, T, Cmp> {
        let start = if self.check_position(position).is_ok() { position.0 } else { None };
        Iter::new(self, start)
    }
}

impl<T, Cmp> Index<usize> for Skiplist<T, Cmp> {
    type Output = T;

    /// See [`Skiplist::get_index`].
    ///
    /// # Panics
    /// Panics if `index` is not less than the length of the skiplist.
    #[expect(clippy::panic, reason = "indexing out of bounds panics, as with `Vec`")]
    fn index(&self, index: usize) -> &Self::Output {
        match self.get_index(index) {
            Ok(entry) => entry,
            Err(err)  => panic!("{err}"),
        }
    }
}

impl<'a, T, Cmp> IntoIterator for &'a Skiplist<T, Cmp> {
    type Item     = &'a T;
    type IntoIter = Iter<'a, T, Cmp>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, Cmp> IntoIterator for Skiplist<T, Cmp> {
    type Item     = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        let first = self.first_link();
        IntoIter::new(self.arena, first, self.len)
    }
}

impl<T, Cmp: Comparator<T>> Extend<T> for Skiplist<T, Cmp> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

impl<T, Cmp: Comparator<T> + Default> FromIterator<T> for Skiplist<T, Cmp> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::default();
        list.extend(iter);
        list
    }
}

impl<T: Debug, Cmp> Debug for Skiplist<T, Cmp> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_set().entries(self.iter()).finish()
    }
}


#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;


    impl<T, Cmp: Comparator<T>> Skiplist<T, Cmp> {
        /// Panics if any structural invariant of the skiplist is broken.
        fn check_invariants(&self) {
            assert!(self.current_max_level <= self.max_level);
            assert_eq!(self.arena.occupied(), self.len);

            // Level 0 holds every node, strictly increasing.
            let mut level_zero = Vec::new();
            let mut current = self.first_link();
            while let Some(id) = current {
                let node = self.arena.get(id).expect("level 0 links should be live");
                assert!(node.level() <= self.max_level);
                level_zero.push(id);
                current = node.skip(0);
            }
            assert_eq!(level_zero.len(), self.len);
            for pair in level_zero.windows(2) {
                let lhs = self.arena.get(pair[0]).unwrap().entry();
                let rhs = self.arena.get(pair[1]).unwrap().entry();
                assert!(self.cmp.cmp(lhs, rhs).is_lt());
            }

            // Every higher level is exactly the subsequence of nodes tall enough for it.
            for level in 1..LEVEL_CAP {
                let expected: Vec<NodeId> = level_zero
                    .iter()
                    .copied()
                    .filter(|id| self.arena.get(*id).unwrap().level() >= level)
                    .collect();

                let mut actual = Vec::new();
                let mut current = self.head[level];
                while let Some(id) = current {
                    actual.push(id);
                    current = self.arena.get(id).unwrap().skip(level);
                }

                assert_eq!(actual, expected, "level {level} is inconsistent");
                if level > self.current_max_level {
                    assert!(actual.is_empty());
                }
            }

            // `current_max_level` is lowered whenever its level empties.
            if self.current_max_level > 0 {
                assert!(self.head[self.current_max_level].is_some());
            }
        }
    }

    #[test]
    fn empty_list() {
        let list: Skiplist<u32> = Skiplist::new_seeded(OrdComparator, 1);

        list.check_invariants();
        assert!(list.is_empty());
        assert_eq!(list.current_max_level(), 0);
        assert_eq!(list.begin(), list.end());
        assert!(list.first().is_none());
        assert!(list.last().is_none());
        assert!(list.iter().next().is_none());

        let _check_that_debug_works = format!("{list:?}");
    }

    #[test]
    fn head_is_linked_on_new_levels() {
        // With a probability this high, nodes nearly always reach the max level.
        let config = SkiplistConfig::new()
            .with_level_probability(0.999_999)
            .with_max_level(6)
            .with_seed(3);
        let mut list = Skiplist::with_config(OrdComparator, config).unwrap();

        let position = list.insert(10);
        assert_eq!(list.level_of(position), Some(6));
        assert_eq!(list.current_max_level(), 6);
        for level in 0..=6 {
            assert_eq!(list.head[level], position.0);
        }
        list.check_invariants();

        list.erase(position).unwrap();
        assert_eq!(list.current_max_level(), 0);
        assert!(list.head.iter().all(Option::is_none));
        list.check_invariants();
    }

    #[test]
    fn max_level_shrinks_lazily() {
        let mut list = Skiplist::new_seeded(OrdComparator, 11);

        let positions: Vec<_> = (0..200).map(|n| list.insert(n)).collect();
        list.check_invariants();

        // Erase the tallest nodes first; the max level follows the tallest remaining node.
        let mut by_height = positions;
        by_height.sort_by_key(|position| std::cmp::Reverse(list.level_of(*position)));

        for position in by_height {
            list.erase(position).unwrap();
            list.check_invariants();

            let tallest = list.iter_positions().filter_map(|p| list.level_of(p)).max();
            assert_eq!(list.current_max_level(), tallest.unwrap_or(0));
        }
        assert!(list.is_empty());
    }

    impl<T, Cmp> Skiplist<T, Cmp> {
        fn iter_positions(&self) -> impl Iterator<Item = Position> + '_ {
            std::iter::successors(Some(self.begin()), |position| {
                Some(self.next_position(*position))
            })
            .take_while(|position| !position.is_end())
        }
    }

    #[test]
    fn failed_operations_do_not_change_links() {
        let mut list = Skiplist::new_seeded(OrdComparator, 5);
        list.extend([3, 1, 4, 1, 5, 9, 2, 6]);
        let stale = list.find(&4);
        list.erase(stale).unwrap();
        let before = list.iter().copied().collect::<Vec<_>>();
        let head_before = list.head;

        assert_eq!(list.erase(Position::END), Err(SkiplistError::EraseEnd));
        assert_eq!(list.erase(stale), Err(SkiplistError::StalePosition));
        assert_eq!(list.erase_range(list.find(&6), list.find(&2)), Err(SkiplistError::InvalidRange));
        assert!(list.get_index(7).is_err());
        assert!(list.set_level_probability(1.0).is_err());

        assert_eq!(list.iter().copied().collect::<Vec<_>>(), before);
        assert_eq!(list.head, head_before);
        assert_eq!(list.len(), 6);
        list.check_invariants();
    }

    #[derive(Debug, Clone)]
    enum Op {
        Insert(u8),
        Remove(u8),
        EraseIndex(usize),
        EraseRange(usize, usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => any::<u8>().prop_map(Op::Insert),
            2 => any::<u8>().prop_map(Op::Remove),
            1 => (0..64_usize).prop_map(Op::EraseIndex),
            1 => (0..64_usize, 0..8_usize).prop_map(|(start, len)| Op::EraseRange(start, len)),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_under_random_operations(
            seed in any::<u64>(),
            ops in prop::collection::vec(op_strategy(), 0..200),
        ) {
            let config = SkiplistConfig::new().with_max_level(6).with_seed(seed);
            let mut list = Skiplist::with_config(OrdComparator, config).unwrap();
            let mut model = std::collections::BTreeSet::new();

            for op in ops {
                match op {
                    Op::Insert(entry) => {
                        list.insert(entry);
                        model.insert(entry);
                    }
                    Op::Remove(entry) => {
                        prop_assert_eq!(list.remove(&entry), model.take(&entry));
                    }
                    Op::EraseIndex(index) => {
                        if index < list.len() {
                            let position = list.advance(list.begin(), index).unwrap();
                            let entry = *list.get(position).unwrap();
                            list.erase(position).unwrap();
                            prop_assert!(model.remove(&entry));
                        } else {
                            prop_assert!(list.get_index(index).is_err());
                        }
                    }
                    Op::EraseRange(start, len) => {
                        let start = start.min(list.len());
                        let end = (start + len).min(list.len());
                        let first = list.advance(list.begin(), start).unwrap();
                        let last = list.advance(list.begin(), end).unwrap();

                        let erased: Vec<u8> = model.iter().copied().skip(start).take(end - start).collect();
                        prop_assert_eq!(list.erase_range(first, last), Ok(last));
                        for entry in erased {
                            model.remove(&entry);
                        }
                    }
                }

                list.check_invariants();
                prop_assert!(list.iter().eq(model.iter()));
            }
        }
    }
}
