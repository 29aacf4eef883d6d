#![cfg_attr(test, allow(unused_crate_dependencies, reason = "only the integration tests use them"))]

//! An ordered key/value map stored in an [`ordered_skiplist::Skiplist`].
//!
//! Each key appears at most once. The map is a thin layer over the skiplist: entries are
//! `(key, value)` pairs ordered by their key alone, and every search, insertion, and erasure is
//! the skiplist's.

use std::{cmp::Ordering, iter::FusedIterator, mem};
use std::fmt::{Debug, Formatter, Result as FmtResult};

use ordered_skiplist::{Comparator, OrdComparator, Position, Result, Skiplist, SkiplistConfig};


/// Orders `(key, value)` entries by their key.
#[derive(Default, Debug, Clone, Copy)]
struct KeyComparator<Cmp>(Cmp);

impl<K, V, Cmp: Comparator<K>> Comparator<(K, V)> for KeyComparator<Cmp> {
    #[inline]
    fn cmp(&self, lhs: &(K, V), rhs: &(K, V)) -> Ordering {
        self.0.cmp(&lhs.0, &rhs.0)
    }
}


/// An ordered map from keys to values, backed by a skiplist.
///
/// Keys are ordered by `Cmp`, a [`Comparator`] over `K`.
#[derive(Clone)]
pub struct SkipMap<K, V, Cmp = OrdComparator> {
    list: Skiplist<(K, V), KeyComparator<Cmp>>,
}

impl<K: Ord, V> SkipMap<K, V> {
    /// Create an empty map ordered by `K`'s [`Ord`] implementation.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(OrdComparator)
    }
}

impl<K, V, Cmp> SkipMap<K, V, Cmp> {
    #[must_use]
    pub fn with_comparator(cmp: Cmp) -> Self {
        Self { list: Skiplist::with_comparator(KeyComparator(cmp)) }
    }

    /// Create an empty map whose skiplist levels are drawn from a PRNG with a fixed seed.
    #[must_use]
    pub fn new_seeded(cmp: Cmp, seed: u64) -> Self {
        Self { list: Skiplist::new_seeded(KeyComparator(cmp), seed) }
    }

    /// # Errors
    /// See [`Skiplist::with_config`].
    pub fn with_config(cmp: Cmp, config: SkiplistConfig) -> Result<Self> {
        Ok(Self { list: Skiplist::with_config(KeyComparator(cmp), config)? })
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.list.clear();
    }

    /// The entry with the smallest key, if the map is nonempty.
    #[must_use]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.list.first().map(|(key, value)| (key, value))
    }

    /// The entry with the greatest key, if the map is nonempty.
    #[must_use]
    pub fn last(&self) -> Option<(&K, &V)> {
        self.list.last().map(|(key, value)| (key, value))
    }

    /// Iterate over the entries in ascending order of key.
    #[inline]
    #[must_use]
    pub const fn iter(&self) -> Iter<'_, K, V, Cmp> {
        Iter { inner: self.list.iter() }
    }

    /// Iterate over the keys in ascending order.
    #[inline]
    #[must_use]
    pub const fn keys(&self) -> Keys<'_, K, V, Cmp> {
        Keys { inner: self.iter() }
    }

    /// Iterate over the values in ascending order of key.
    #[inline]
    #[must_use]
    pub const fn values(&self) -> Values<'_, K, V, Cmp> {
        Values { inner: self.iter() }
    }
}

impl<K, V, Cmp: Comparator<K>> SkipMap<K, V, Cmp> {
    #[must_use]
    fn find_key(&self, key: &K) -> Position {
        let cmp = &self.list.comparator().0;
        self.list.find_by(|(stored, _)| cmp.cmp(stored, key))
    }

    /// Insert a value for `key`. If `key` was already present, its value is replaced, and the old
    /// value is returned; the key already in the map is kept.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let position = self.find_key(&key);

        if let Some((_, stored)) = self.list.get_mut(position) {
            Some(mem::replace(stored, value))
        } else {
            self.list.insert((key, value));
            None
        }
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.list
            .get(self.find_key(key))
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let position = self.find_key(key);
        self.list.get_mut(position).map(|(_, value)| value)
    }

    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        !self.find_key(key).is_end()
    }

    /// Remove the entry for `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Remove the entry for `key`, returning the stored key and value if it was present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let position = self.find_key(key);
        if position.is_end() {
            return None;
        }

        self.list.take(position).ok().map(|(entry, _)| entry)
    }
}

impl<K: Ord, V> Default for SkipMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, Cmp: Comparator<K>> Extend<(K, V)> for SkipMap<K, V, Cmp> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SkipMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Debug, V: Debug, Cmp> Debug for SkipMap<K, V, Cmp> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, Cmp> IntoIterator for &'a SkipMap<K, V, Cmp> {
    type Item     = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, Cmp>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, Cmp> IntoIterator for SkipMap<K, V, Cmp> {
    type Item     = (K, V);
    type IntoIter = IntoIter<K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        IntoIter { inner: self.list.into_iter() }
    }
}

// ================================
//  Iterators
// ================================

/// An iterator over the entries of a [`SkipMap`] in ascending order of key.
pub struct Iter<'a, K, V, Cmp> {
    inner: ordered_skiplist::Iter<'a, (K, V), KeyComparator<Cmp>>,
}

impl<'a, K, V, Cmp> Iterator for Iter<'a, K, V, Cmp> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, value)| (key, value))
    }
}

impl<K, V, Cmp> FusedIterator for Iter<'_, K, V, Cmp> {}

impl<K, V, Cmp> Clone for Iter<'_, K, V, Cmp> {
    #[inline]
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<K, V, Cmp> Debug for Iter<'_, K, V, Cmp> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_tuple("Iter").field(&self.inner).finish()
    }
}

/// An iterator over the keys of a [`SkipMap`] in ascending order.
pub struct Keys<'a, K, V, Cmp> {
    inner: Iter<'a, K, V, Cmp>,
}

impl<'a, K, V, Cmp> Iterator for Keys<'a, K, V, Cmp> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }
}

impl<K, V, Cmp> FusedIterator for Keys<'_, K, V, Cmp> {}

impl<K, V, Cmp> Debug for Keys<'_, K, V, Cmp> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_tuple("Keys").field(&self.inner).finish()
    }
}

/// An iterator over the values of a [`SkipMap`] in ascending order of key.
pub struct Values<'a, K, V, Cmp> {
    inner: Iter<'a, K, V, Cmp>,
}

impl<'a, K, V, Cmp> Iterator for Values<'a, K, V, Cmp> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }
}

impl<K, V, Cmp> FusedIterator for Values<'_, K, V, Cmp> {}

impl<K, V, Cmp> Debug for Values<'_, K, V, Cmp> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_tuple("Values").field(&self.inner).finish()
    }
}

/// An owning iterator over the entries of a [`SkipMap`] in ascending order of key.
pub struct IntoIter<K, V> {
    inner: ordered_skiplist::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K, V> Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_tuple("IntoIter").field(&self.inner).finish()
    }
}
