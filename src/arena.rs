use std::ops::{Index, IndexMut};

use slab::Slab;

/// An opaque handle to a node stored in a tree.
///
/// A [`NodeId`] is only meaningful for the tree that returned it, and only
/// until that node is removed. Slots are reused, so a stale handle may refer
/// to an unrelated node once the tree has been mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Backing storage for the nodes of a single tree.
///
/// Every node is owned by the arena. Links between nodes (children and parent
/// back-references) are plain [`NodeId`] values and never keep a node alive.
#[derive(Debug, Clone)]
pub(crate) struct Arena<N>(Slab<N>);

impl<N> Default for Arena<N> {
    fn default() -> Self {
        Self(Slab::new())
    }
}

impl<N> Arena<N> {
    pub(crate) fn alloc(&mut self, node: N) -> NodeId {
        NodeId(self.0.insert(node))
    }

    /// Release the slot for `id`, returning the node it held.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to an occupied slot.
    pub(crate) fn free(&mut self, id: NodeId) -> N {
        self.0.remove(id.0)
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear()
    }
}

impl<N> Index<NodeId> for Arena<N> {
    type Output = N;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.0[id.0]
    }
}

impl<N> IndexMut<NodeId> for Arena<N> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.0[id.0]
    }
}
