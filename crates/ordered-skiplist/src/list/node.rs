use super::arena::NodeId;


/// A link to the next node on some level, or `None` if there is no next node on that level.
pub(crate) type Link = Option<NodeId>;


/// One entry of a skiplist, together with its links to the following node on each level the
/// node participates in.
///
/// # Invariants
/// - `skips.len() == level + 1`, where `level` is fixed when the node is created.
/// - For any `level`, if `self.skip(level)` refers to another node, that node sorts strictly
///   after `self` and participates in `level` as well.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    skips: Box<[Link]>,
    entry: T,
}

impl<T> Node<T> {
    /// Create a node which participates in levels `0..=level`, with every link empty.
    #[must_use]
    pub(crate) fn new(level: usize, entry: T) -> Self {
        Self {
            skips: vec![None; level + 1].into_boxed_slice(),
            entry,
        }
    }

    #[inline]
    #[must_use]
    pub(crate) const fn entry(&self) -> &T {
        &self.entry
    }

    #[inline]
    #[must_use]
    pub(crate) const fn entry_mut(&mut self) -> &mut T {
        &mut self.entry
    }

    #[inline]
    #[must_use]
    pub(crate) fn into_entry(self) -> T {
        self.entry
    }

    /// The highest level this node participates in.
    #[inline]
    #[must_use]
    pub(crate) const fn level(&self) -> usize {
        // `skips` is never empty
        self.skips.len().saturating_sub(1)
    }

    /// Using too high of a level is allowed, and returns `None`; a node simply has no successor
    /// on the levels it does not participate in.
    #[inline]
    #[must_use]
    pub(crate) fn skip(&self, level: usize) -> Link {
        self.skips.get(level).copied().flatten()
    }

    /// # Panics
    /// May or may not panic if `level > self.level()`, that is, if there is no skip at the
    /// indicated `level` of this node.
    pub(crate) fn set_skip(&mut self, level: usize, link: Link) {
        debug_assert!(level <= self.level(), "should not try to set a nonexistent skip of a node");

        if let Some(skip) = self.skips.get_mut(level) {
            *skip = link;
        }
    }
}
