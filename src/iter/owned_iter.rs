use std::vec;

use crate::{
    arena::{Arena, NodeId},
    node::TreeNode,
};

/// An iterator of owned `(key, value)` pairs, in ascending key order, as the
/// underlying tree `into_iter()` impl.
///
/// Nodes are released from the arena as they are yielded; anything not
/// consumed is dropped with the iterator.
#[derive(Debug)]
pub struct IntoIter<N> {
    arena: Arena<N>,
    order: vec::IntoIter<NodeId>,
}

impl<N> IntoIter<N> {
    /// `order` must hold every live id in `arena` exactly once.
    pub(crate) fn new(arena: Arena<N>, order: Vec<NodeId>) -> Self {
        debug_assert_eq!(arena.len(), order.len());
        Self {
            arena,
            order: order.into_iter(),
        }
    }
}

impl<N> Iterator for IntoIter<N>
where
    N: TreeNode,
{
    type Item = (N::Key, N::Value);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        Some(self.arena.free(id).into_entry())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<N> DoubleEndedIterator for IntoIter<N>
where
    N: TreeNode,
{
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.order.next_back()?;
        Some(self.arena.free(id).into_entry())
    }
}

impl<N> ExactSizeIterator for IntoIter<N> where N: TreeNode {}
