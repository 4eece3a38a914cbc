use std::{marker::PhantomData, vec};

use crate::{arena::NodeId, node::TreeNode, tree::Tree};

/// The order in which an in-order traversal visits nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug)]
enum Order {
    /// Walk the live tree structure with an explicit stack.
    Walk {
        stack: Vec<NodeId>,
        direction: Direction,
    },

    /// Yield node ids collected before the first call to `next()`.
    Snapshot(vec::IntoIter<NodeId>),
}

/// A lazy, depth-first, in-order walk of a tree yielding [`NodeId`] handles.
///
/// The walk keeps its own stack (bounded by the tree height) rather than
/// recursing, and a fresh [`Nodes`] always starts over from the root.
#[derive(Debug)]
pub struct Nodes<'a, K, V, T> {
    tree: &'a T,
    order: Order,
    _kv: PhantomData<fn() -> (K, V)>,
}

impl<'a, K, V, T> Nodes<'a, K, V, T>
where
    K: Ord,
    T: Tree<K, V>,
{
    pub(crate) fn walk(tree: &'a T, direction: Direction) -> Self {
        let mut this = Self {
            tree,
            order: Order::Walk {
                stack: vec![],
                direction,
            },
            _kv: PhantomData,
        };

        // Descend down the near side of the tree.
        if let Some(root) = tree.root() {
            this.push_subtree(root);
        }

        this
    }

    /// Collect the full traversal up front.
    ///
    /// Used by trees that restructure themselves on lookups, where walking the
    /// live links would race with any access made while iterating.
    pub(crate) fn snapshot(tree: &'a T, direction: Direction) -> Self {
        let ids = Self::walk(tree, direction).collect::<Vec<_>>();
        Self {
            tree,
            order: Order::Snapshot(ids.into_iter()),
            _kv: PhantomData,
        }
    }

    fn push_subtree(&mut self, subtree_root: NodeId) {
        let Order::Walk { stack, direction } = &mut self.order else {
            return;
        };

        let mut ptr = Some(subtree_root);
        while let Some(v) = ptr {
            stack.push(v);
            let n = self.tree.node(v);
            ptr = match direction {
                Direction::Ascending => n.left(),
                Direction::Descending => n.right(),
            };
        }
    }
}

impl<K, V, T> Iterator for Nodes<'_, K, V, T>
where
    K: Ord,
    T: Tree<K, V>,
{
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let (v, far) = match &mut self.order {
            Order::Snapshot(ids) => return ids.next(),
            Order::Walk { stack, direction } => {
                let v = stack.pop()?;
                let n = self.tree.node(v);
                let far = match direction {
                    Direction::Ascending => n.right(),
                    Direction::Descending => n.left(),
                };
                (v, far)
            }
        };

        // Descend down the near side of the far child of this node, if any.
        if let Some(far) = far {
            self.push_subtree(far);
        }

        Some(v)
    }
}

/// An in-order iterator over the `(key, value)` pairs of a tree.
#[derive(Debug)]
pub struct Iter<'a, K, V, T>(Nodes<'a, K, V, T>);

impl<'a, K, V, T> Iter<'a, K, V, T> {
    pub(crate) fn new(nodes: Nodes<'a, K, V, T>) -> Self {
        Self(nodes)
    }
}

impl<'a, K, V, T> Iterator for Iter<'a, K, V, T>
where
    K: Ord + 'a,
    V: 'a,
    T: Tree<K, V>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.0.tree;
        let n = tree.node(self.0.next()?);
        Some((n.key(), n.value()))
    }
}
