//! An unbalanced binary search tree.
//!
//! No rebalancing is ever performed, so the height depends entirely on the
//! insertion order and degrades to O(n) for sorted input. It serves as the
//! reference the balanced strategies are validated against, and for
//! throwaway use where the input order is known to be benign.

use std::cmp::Ordering;

use crate::{
    arena::{Arena, NodeId},
    iter::IntoIter,
    node::{replace_child, Relink, TreeNode},
    tree::{build_balanced, Insertion, Tree},
};

#[derive(Debug, Clone)]
pub struct BinaryNode<K, V> {
    left: Option<NodeId>,
    right: Option<NodeId>,

    key: K,
    value: V,
}

impl<K, V> BinaryNode<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            left: None,
            right: None,
            key,
            value,
        }
    }
}

impl<K, V> TreeNode for BinaryNode<K, V> {
    type Key = K;
    type Value = V;

    const TRACKS_PARENT: bool = false;

    fn key(&self) -> &K {
        &self.key
    }

    fn value(&self) -> &V {
        &self.value
    }

    fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    fn left(&self) -> Option<NodeId> {
        self.left
    }

    fn right(&self) -> Option<NodeId> {
        self.right
    }

    fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> Relink for BinaryNode<K, V> {
    fn set_left(&mut self, id: Option<NodeId>) {
        self.left = id;
    }

    fn set_right(&mut self, id: Option<NodeId>) {
        self.right = id;
    }
}

#[derive(Debug, Clone)]
pub struct BinaryTree<K, V> {
    arena: Arena<BinaryNode<K, V>>,
    root: Option<NodeId>,
}

impl<K, V> Default for BinaryTree<K, V> {
    fn default() -> Self {
        Self {
            arena: Arena::default(),
            root: None,
        }
    }
}

impl<K, V> BinaryTree<K, V>
where
    K: Ord,
{
    /// Locate the parent of `id` by descending from the root.
    fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        let key = &self.arena[id].key;

        let mut parent = None;
        let mut ptr = self.root;
        while let Some(v) = ptr {
            if v == id {
                return parent;
            }
            parent = Some(v);
            ptr = match key.cmp(&self.arena[v].key) {
                Ordering::Less => self.arena[v].left,
                Ordering::Greater => self.arena[v].right,
                Ordering::Equal => unreachable!("duplicate key in tree"),
            };
        }

        unreachable!("node not linked into this tree")
    }
}

impl<K, V> Tree<K, V> for BinaryTree<K, V>
where
    K: Ord,
{
    type Node = BinaryNode<K, V>;

    const STRATEGY: &'static str = "binary";

    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn len(&self) -> usize {
        self.arena.len()
    }

    fn node(&self, id: NodeId) -> &Self::Node {
        &self.arena[id]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Self::Node {
        &mut self.arena[id]
    }

    fn insert(&mut self, key: K, value: V) -> Insertion<V> {
        let mut parent = match self.root {
            Some(v) => v,
            None => {
                let id = self.arena.alloc(BinaryNode::new(key, value));
                self.root = Some(id);
                return Insertion::New(id);
            }
        };

        // Descend to the empty child slot `key` belongs in.
        loop {
            let n = &self.arena[parent];
            let child = match key.cmp(&n.key) {
                Ordering::Less => n.left,
                Ordering::Equal => return Insertion::Exists(parent, value),
                Ordering::Greater => n.right,
            };
            match child {
                Some(v) => parent = v,
                None => break,
            }
        }

        let go_left = key < self.arena[parent].key;
        let id = self.arena.alloc(BinaryNode::new(key, value));
        if go_left {
            self.arena[parent].left = Some(id);
        } else {
            self.arena[parent].right = Some(id);
        }

        Insertion::New(id)
    }

    fn remove(&mut self, id: NodeId) -> (K, V) {
        let parent = self.parent_of(id);

        // This node may have 0, 1 or 2 child node(s).
        //
        // With at most one child, that child (if any) replaces the node.
        //
        // With two children, the in-order predecessor (the right-most node of
        // the left subtree) is moved into the removed node's position. Its own
        // left subtree (it has no right child) is relinked to the
        // predecessor's former parent.
        let replacement = match (self.arena[id].left, self.arena[id].right) {
            (None, child) | (child, None) => child,
            (Some(left), Some(right)) => {
                let mut pred_parent = id;
                let mut pred = left;
                while let Some(v) = self.arena[pred].right {
                    pred_parent = pred;
                    pred = v;
                }

                if pred_parent != id {
                    let pred_left = self.arena[pred].left;
                    self.arena[pred_parent].right = pred_left;
                    self.arena[pred].left = Some(left);
                }
                self.arena[pred].right = Some(right);

                Some(pred)
            }
        };

        replace_child(&mut self.arena, &mut self.root, parent, id, replacement);

        self.arena.free(id).into_entry()
    }

    fn clear(&mut self) {
        tracing::debug!(
            strategy = Self::STRATEGY,
            n_entries = self.arena.len(),
            "clearing tree"
        );
        self.arena.clear();
        self.root = None;
    }

    fn from_sorted(entries: Vec<(K, V)>) -> Self {
        debug_assert!(crate::bulk::is_strictly_ascending(&entries));

        let mut arena = Arena::default();
        let root = build_balanced(entries, |key, value, left, right, _depth| {
            arena.alloc(BinaryNode {
                left,
                right,
                key,
                value,
            })
        });

        Self { arena, root }
    }

    fn into_entries(self) -> IntoIter<Self::Node> {
        let order = self.nodes().collect();
        IntoIter::new(self.arena, order)
    }
}
