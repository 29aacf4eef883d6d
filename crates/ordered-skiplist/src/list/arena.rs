use super::node::Node;


/// Identifies a node in a [`NodeArena`].
///
/// The generation is bumped whenever a slot is freed, so an id for an erased node does not
/// resolve to whichever node later reuses its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId {
    index:      usize,
    generation: u64,
}

/// A slot whose generation reaches this value is retired: it is never reused, and no id ever
/// carries this generation.
const RETIRED: u64 = u64::MAX;

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u64,
    node:       Option<Node<T>>,
}

impl<T> Slot<T> {
    /// Invalidate ids for the slot's previous node. Returns whether the slot may be reused.
    fn bump_generation(&mut self) -> bool {
        self.generation = self.generation.saturating_add(1);
        self.generation != RETIRED
    }
}

/// Owns every node of a skiplist. Freed slots are reused by later allocations.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<T> {
    slots:   Vec<Slot<T>>,
    /// Indices of vacant slots which may be reused.
    free:    Vec<usize>,
    /// The number of retired slots.
    retired: usize,
}

impl<T> NodeArena<T> {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            slots:   Vec::new(),
            free:    Vec::new(),
            retired: 0,
        }
    }

    #[must_use]
    pub(crate) fn alloc(&mut self, node: Node<T>) -> NodeId {
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.slots.get_mut(index) {
                debug_assert!(slot.node.is_none(), "free list should only hold vacant slots");
                slot.node = Some(node);
                return NodeId { index, generation: slot.generation };
            }
        }

        let index = self.slots.len();
        self.slots.push(Slot { generation: 0, node: Some(node) });
        NodeId { index, generation: 0 }
    }

    /// Returns `None` if the node has been freed.
    #[inline]
    #[must_use]
    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    /// Returns `None` if the node has been freed.
    #[inline]
    #[must_use]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Remove the node from the arena and return it. Returns `None` if the node had already been
    /// freed.
    pub(crate) fn free(&mut self, id: NodeId) -> Option<Node<T>> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }

        let node = slot.node.take()?;
        if slot.bump_generation() {
            self.free.push(id.index);
        } else {
            self.retired += 1;
        }
        Some(node)
    }

    /// Drop every node, invalidating every id handed out so far.
    pub(crate) fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let reusable = if slot.node.take().is_some() {
                slot.bump_generation()
            } else {
                slot.generation != RETIRED
            };

            if reusable {
                self.free.push(index);
            }
        }
        self.retired = self.slots.len() - self.free.len();
    }

    /// The number of nodes currently allocated.
    #[must_use]
    pub(crate) fn occupied(&self) -> usize {
        self.slots.len() - self.free.len() - self.retired
    }
}


#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;


    #[test]
    fn alloc_get_free() {
        let mut arena = NodeArena::new();

        let a = arena.alloc(Node::new(0, "a"));
        let b = arena.alloc(Node::new(3, "b"));

        assert_eq!(arena.occupied(), 2);
        assert_eq!(arena.get(a).map(|node| *node.entry()), Some("a"));
        assert_eq!(arena.get(b).map(Node::level), Some(3));

        assert_eq!(arena.free(a).map(Node::into_entry), Some("a"));
        assert!(arena.get(a).is_none());
        assert!(arena.get_mut(a).is_none());
        // Double frees are rejected.
        assert!(arena.free(a).is_none());
        assert_eq!(arena.occupied(), 1);
    }

    #[test]
    fn reused_slots_do_not_resurrect_old_ids() {
        let mut arena = NodeArena::new();

        let old = arena.alloc(Node::new(0, 1));
        assert_eq!(arena.free(old).map(Node::into_entry), Some(1));
        let new = arena.alloc(Node::new(0, 2));

        assert_ne!(old, new);
        assert!(arena.get(old).is_none());
        assert_eq!(arena.get(new).map(|node| *node.entry()), Some(2));
        // The slot was reused.
        assert_eq!(arena.slots.len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let shared = Rc::new(());
        let mut arena = NodeArena::new();

        let ids: Vec<_> = (0..10)
            .map(|_| arena.alloc(Node::new(1, Rc::clone(&shared))))
            .collect();
        assert!(arena.free(ids[3]).is_some());
        assert_eq!(Rc::strong_count(&shared), 10);

        arena.clear();

        assert_eq!(Rc::strong_count(&shared), 1);
        assert_eq!(arena.occupied(), 0);
        assert!(ids.iter().all(|id| arena.get(*id).is_none()));

        let _reused = arena.alloc(Node::new(0, Rc::clone(&shared)));
        assert_eq!(arena.slots.len(), 10);
        assert!(ids.iter().all(|id| arena.get(*id).is_none()));
    }

    #[test]
    fn exhausted_slots_are_retired() {
        let mut arena = NodeArena::new();
        let first = arena.alloc(Node::new(0, 1));

        // Pretend the slot has been reused until its last usable generation.
        arena.slots[first.index].generation = RETIRED - 1;
        let last_use = NodeId { index: first.index, generation: RETIRED - 1 };
        assert!(arena.get(first).is_none());
        assert_eq!(arena.free(last_use).map(Node::into_entry), Some(1));

        // The retired slot is never handed out again, so `last_use` stays stale.
        let fresh = arena.alloc(Node::new(0, 2));
        assert_ne!(fresh.index, first.index);
        assert_eq!(arena.occupied(), 1);
        assert!(arena.get(last_use).is_none());

        arena.clear();
        let after_clear = arena.alloc(Node::new(0, 3));
        assert_ne!(after_clear.index, first.index);
        assert!(arena.get(last_use).is_none());
        assert_eq!(arena.slots.len(), 2);
        assert_eq!(arena.occupied(), 1);
    }

    #[test]
    fn dropping_the_arena_drops_nodes() {
        let shared = Rc::new(());
        let mut arena = NodeArena::new();
        for _ in 0..5 {
            let _id = arena.alloc(Node::new(2, Rc::clone(&shared)));
        }

        drop(arena);
        assert_eq!(Rc::strong_count(&shared), 1);
    }
}
