//! A self-adjusting (splay) binary search tree.
//!
//! Every access moves the accessed node (or the last node on its search path)
//! to the root with a top-down splay. There is no per-node balance invariant:
//! any single operation may take O(n), but any sequence of m operations on a
//! tree of n keys completes in O((m + n) log n) rotations.
//!
//! Because lookups restructure the tree, the child links are held in [`Cell`]s
//! and every query, including [`Tree::find()`], reshapes the tree through a
//! shared reference. Keys and values are never moved by a splay, so references
//! to them stay valid. The tree is consequently not [`Sync`]: a shared
//! reference cannot be used from more than one thread.

use std::{borrow::Borrow, cell::Cell, cmp::Ordering};

use crate::{
    arena::{Arena, NodeId},
    iter::{Direction, IntoIter, Nodes},
    node::{descend, TreeNode},
    tree::{Insertion, Tree},
};

#[derive(Debug, Clone)]
pub struct SplayNode<K, V> {
    left: Cell<Option<NodeId>>,
    right: Cell<Option<NodeId>>,

    key: K,
    value: V,
}

impl<K, V> SplayNode<K, V> {
    fn new(key: K, value: V) -> Self {
        Self {
            left: Cell::new(None),
            right: Cell::new(None),
            key,
            value,
        }
    }
}

impl<K, V> TreeNode for SplayNode<K, V> {
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
        self.left.get()
    }

    fn right(&self) -> Option<NodeId> {
        self.right.get()
    }

    fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}

#[derive(Debug, Clone)]
pub struct SplayTree<K, V> {
    arena: Arena<SplayNode<K, V>>,
    root: Cell<Option<NodeId>>,

    /// The total number of rotations and spine links performed by splays.
    rotations: Cell<u64>,
}

impl<K, V> Default for SplayTree<K, V> {
    fn default() -> Self {
        Self {
            arena: Arena::default(),
            root: Cell::new(None),
            rotations: Cell::new(0),
        }
    }
}

impl<K, V> SplayTree<K, V> {
    /// The total number of splay steps performed over the lifetime of this
    /// tree.
    ///
    /// Each zig-zig rotation and each link of a node onto the left or right
    /// spine counts as one step, so this is proportional to the total length
    /// of every access path splayed.
    pub fn rotations(&self) -> u64 {
        self.rotations.get()
    }

    fn left(&self, n: NodeId) -> Option<NodeId> {
        self.arena[n].left.get()
    }

    fn right(&self, n: NodeId) -> Option<NodeId> {
        self.arena[n].right.get()
    }

    fn set_left(&self, n: NodeId, v: Option<NodeId>) {
        self.arena[n].left.set(v);
    }

    fn set_right(&self, n: NodeId, v: Option<NodeId>) {
        self.arena[n].right.set(v);
    }

    /// Splay the subtree rooted at `t` top-down, returning its new root.
    ///
    /// `dir` orders the target against a node's key: [`Ordering::Less`] when
    /// the target lies to the left of it, [`Ordering::Greater`] when it lies to
    /// the right and [`Ordering::Equal`] when the node is the target. The new
    /// root is the target if present, otherwise the last node on the search
    /// path (the target's in-order neighbour).
    ///
    /// Nodes passed on the way down are moved onto two spines: the left spine
    /// gathers nodes less than the target (linked through their right child),
    /// the right spine those greater (linked through their left child). Once
    /// the target is reached the spines become its new subtrees.
    fn splay_subtree<F>(&self, mut t: NodeId, dir: F) -> NodeId
    where
        F: Fn(&K) -> Ordering,
    {
        let mut left_root = None;
        let mut left_tail: Option<NodeId> = None;
        let mut right_root = None;
        let mut right_tail: Option<NodeId> = None;
        let mut steps = 0;

        loop {
            match dir(&self.arena[t].key) {
                Ordering::Less => {
                    let Some(mut l) = self.left(t) else { break };
                    if dir(&self.arena[l].key).is_lt() {
                        // Zig-zig: rotate right.
                        self.set_left(t, self.right(l));
                        self.set_right(l, Some(t));
                        t = l;
                        steps += 1;
                        match self.left(t) {
                            Some(v) => l = v,
                            None => break,
                        }
                    }

                    // Link right.
                    match right_tail {
                        Some(r) => self.set_left(r, Some(t)),
                        None => right_root = Some(t),
                    }
                    right_tail = Some(t);
                    t = l;
                    steps += 1;
                }
                Ordering::Greater => {
                    let Some(mut r) = self.right(t) else { break };
                    if dir(&self.arena[r].key).is_gt() {
                        // Zag-zag: rotate left.
                        self.set_right(t, self.left(r));
                        self.set_left(r, Some(t));
                        t = r;
                        steps += 1;
                        match self.right(t) {
                            Some(v) => r = v,
                            None => break,
                        }
                    }

                    // Link left.
                    match left_tail {
                        Some(l) => self.set_right(l, Some(t)),
                        None => left_root = Some(t),
                    }
                    left_tail = Some(t);
                    t = r;
                    steps += 1;
                }
                Ordering::Equal => break,
            }
        }

        // Reassemble: the target's subtrees are hung off the inner ends of the
        // spines, and the spines become the target's subtrees.
        if let Some(l) = left_tail {
            self.set_right(l, self.left(t));
            self.set_left(t, left_root);
        }
        if let Some(r) = right_tail {
            self.set_left(r, self.right(t));
            self.set_right(t, right_root);
        }

        self.rotations.set(self.rotations.get() + steps);
        t
    }

    /// Splay the whole tree towards the target described by `dir`, returning
    /// the new root.
    fn splay<F>(&self, dir: F) -> Option<NodeId>
    where
        F: Fn(&K) -> Ordering,
    {
        let root = self.splay_subtree(self.root.get()?, dir);
        self.root.set(Some(root));
        Some(root)
    }

    /// Splay the node `id` to the root.
    fn splay_node(&self, id: NodeId)
    where
        K: Ord,
    {
        let key = &self.arena[id].key;
        let root = self.splay(|k| key.cmp(k));
        debug_assert_eq!(root, Some(id));
    }
}

impl<K, V> Tree<K, V> for SplayTree<K, V>
where
    K: Ord,
{
    type Node = SplayNode<K, V>;

    const STRATEGY: &'static str = "splay";

    fn root(&self) -> Option<NodeId> {
        self.root.get()
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
        let Some(root) = self.splay(|k| key.cmp(k)) else {
            let id = self.arena.alloc(SplayNode::new(key, value));
            self.root.set(Some(id));
            return Insertion::New(id);
        };

        // The old root is the neighbour of the new key: it becomes a child of
        // the new node, handing over the subtree on the new key's side.
        let ord = key.cmp(&self.arena[root].key);
        if ord == Ordering::Equal {
            return Insertion::Exists(root, value);
        }

        let id = self.arena.alloc(SplayNode::new(key, value));
        if ord == Ordering::Less {
            self.set_left(id, self.left(root));
            self.set_right(id, Some(root));
            self.set_left(root, None);
        } else {
            self.set_right(id, self.right(root));
            self.set_left(id, Some(root));
            self.set_right(root, None);
        }
        self.root.set(Some(id));

        Insertion::New(id)
    }

    fn remove(&mut self, id: NodeId) -> (K, V) {
        self.splay_node(id);

        let right = self.right(id);
        let new_root = match self.left(id) {
            None => right,
            Some(left) => {
                // The maximum of the left subtree has no right child once
                // splayed to the top of that subtree.
                let max = self.splay_subtree(left, |_| Ordering::Greater);
                debug_assert_eq!(self.right(max), None);
                self.set_right(max, right);
                Some(max)
            }
        };
        self.root.set(new_root);

        self.arena.free(id).into_entry()
    }

    fn clear(&mut self) {
        tracing::debug!(
            strategy = Self::STRATEGY,
            n_entries = self.arena.len(),
            "clearing tree"
        );
        self.arena.clear();
        self.root.set(None);
    }

    /// Build by inserting each entry in turn; the splay heuristic, not the
    /// build, is responsible for the shape.
    fn from_sorted(entries: Vec<(K, V)>) -> Self {
        debug_assert!(crate::bulk::is_strictly_ascending(&entries));

        let mut this = Self::default();
        for (key, value) in entries {
            this.insert(key, value);
        }
        this
    }

    fn into_entries(self) -> IntoIter<Self::Node> {
        let order = self.nodes().collect();
        IntoIter::new(self.arena, order)
    }

    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.splay(|k| key.cmp(k.borrow()))?;
        key.cmp(self.arena[root].key.borrow()).is_eq().then_some(root)
    }

    fn min(&self) -> Option<NodeId> {
        self.splay(|_| Ordering::Less)
    }

    fn max(&self) -> Option<NodeId> {
        self.splay(|_| Ordering::Greater)
    }

    fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        self.splay_node(id);
        self.left(id).map(|l| descend(l, |v| self.right(v)))
    }

    fn successor(&self, id: NodeId) -> Option<NodeId> {
        self.splay_node(id);
        self.right(id).map(|r| descend(r, |v| self.left(v)))
    }

    fn infimum<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        // After the splay the root is `key`, its floor or its ceiling.
        let root = self.splay(|k| key.cmp(k.borrow()))?;
        if key.cmp(self.arena[root].key.borrow()).is_ge() {
            return Some(root);
        }
        self.left(root).map(|l| descend(l, |v| self.right(v)))
    }

    fn supremum<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let root = self.splay(|k| key.cmp(k.borrow()))?;
        if key.cmp(self.arena[root].key.borrow()).is_le() {
            return Some(root);
        }
        self.right(root).map(|r| descend(r, |v| self.left(v)))
    }

    /// Snapshots the traversal before yielding, as any lookup made while
    /// iterating restructures the tree.
    fn nodes(&self) -> Nodes<'_, K, V, Self> {
        Nodes::snapshot(self, Direction::Ascending)
    }

    fn nodes_rev(&self) -> Nodes<'_, K, V, Self> {
        Nodes::snapshot(self, Direction::Descending)
    }
}
