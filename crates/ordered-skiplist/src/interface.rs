use std::cmp::Ordering;


/// Interface for comparing entries in a [`Skiplist`].
///
/// The comparator must be a total order over the entries it is used with. Two entries which
/// compare as [`Ordering::Equal`] are treated as the same entry; a skiplist never holds both.
///
/// Any `Fn(&T, &T) -> Ordering` closure is a comparator.
///
/// [`Skiplist`]: crate::Skiplist
pub trait Comparator<T: ?Sized> {
    /// Compare two entries of a [`Skiplist`].
    ///
    /// [`Skiplist`]: crate::Skiplist
    #[must_use]
    fn cmp(&self, lhs: &T, rhs: &T) -> Ordering;
}

impl<T: ?Sized, F: Fn(&T, &T) -> Ordering> Comparator<T> for F {
    #[inline]
    fn cmp(&self, lhs: &T, rhs: &T) -> Ordering {
        self(lhs, rhs)
    }
}

/// A [`Comparator`] which uses the [`Ord`] implementation of the entry type.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrdComparator;

impl<T: ?Sized + Ord> Comparator<T> for OrdComparator {
    /// Equivalent to `Ord::cmp(lhs, rhs)`.
    #[inline]
    fn cmp(&self, lhs: &T, rhs: &T) -> Ordering {
        Ord::cmp(lhs, rhs)
    }
}
