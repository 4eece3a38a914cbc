//! A height-balanced (AVL) binary search tree.
//!
//! Every node records its height, and the heights of any node's two subtrees
//! never differ by more than one. This bounds the tree height to ~1.44 log2(n)
//! levels, making every navigation and mutation O(log n).

use std::cmp::Ordering;

use crate::{
    arena::{Arena, NodeId},
    iter::IntoIter,
    node::{descend, rotate_left, rotate_right, transplant, Relink, TreeNode},
    tree::{build_balanced, Insertion, Tree},
};

#[derive(Debug, Clone)]
pub struct AvlNode<K, V> {
    /// Child nodes pointers.
    left: Option<NodeId>,
    right: Option<NodeId>,

    /// The non-owning back-reference used for upward rebalancing walks.
    parent: Option<NodeId>,

    /// The node's AVL height.
    ///
    /// A leaf has a height of 0.
    ///
    /// A u8 holds a maximum value of 255, meaning it can represent the height
    /// of a balanced tree of up to 5.78*10⁷⁶ entries.
    height: u8,

    key: K,
    value: V,
}

impl<K, V> AvlNode<K, V> {
    fn new(key: K, value: V, parent: Option<NodeId>) -> Self {
        Self {
            left: None,
            right: None,
            parent,
            height: 0,
            key,
            value,
        }
    }

    pub fn height(&self) -> u8 {
        self.height
    }
}

impl<K, V> TreeNode for AvlNode<K, V> {
    type Key = K;
    type Value = V;

    const TRACKS_PARENT: bool = true;

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

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> Relink for AvlNode<K, V> {
    fn set_left(&mut self, id: Option<NodeId>) {
        self.left = id;
    }

    fn set_right(&mut self, id: Option<NodeId>) {
        self.right = id;
    }

    fn set_parent(&mut self, id: Option<NodeId>) {
        self.parent = id;
    }
}

#[derive(Debug, Clone)]
pub struct AvlTree<K, V> {
    arena: Arena<AvlNode<K, V>>,
    root: Option<NodeId>,
}

impl<K, V> Default for AvlTree<K, V> {
    fn default() -> Self {
        Self {
            arena: Arena::default(),
            root: None,
        }
    }
}

/// The height of the (possibly absent) node `n`, where an absent child has a
/// height of -1 so that a leaf (height 0) is balanced.
fn height<K, V>(arena: &Arena<AvlNode<K, V>>, n: Option<NodeId>) -> i16 {
    n.map(|v| arena[v].height as i16).unwrap_or(-1)
}

fn update_height<K, V>(arena: &mut Arena<AvlNode<K, V>>, n: NodeId) {
    let h = height(arena, arena[n].left).max(height(arena, arena[n].right)) + 1;
    // Correctness: h is at least 0 as the maximum of the child heights is at
    // least -1.
    arena[n].height = h as u8;
}

/// Compute the "balance factor" of the subtree rooted at `n`.
///
/// Returns the subtree height skew / magnitude, which is a positive number when
/// left heavy, and a negative number when right heavy.
fn balance<K, V>(arena: &Arena<AvlNode<K, V>>, n: NodeId) -> i16 {
    height(arena, arena[n].left) - height(arena, arena[n].right)
}

impl<K, V> AvlTree<K, V> {
    fn rotate_left(&mut self, x: NodeId) -> NodeId {
        let p = rotate_left(&mut self.arena, &mut self.root, x);

        // The demoted node is now the child of the promoted node, so must be
        // updated first.
        update_height(&mut self.arena, x);
        update_height(&mut self.arena, p);
        p
    }

    fn rotate_right(&mut self, y: NodeId) -> NodeId {
        let p = rotate_right(&mut self.arena, &mut self.root, y);
        update_height(&mut self.arena, y);
        update_height(&mut self.arena, p);
        p
    }

    /// Restore the AVL balance of the subtree rooted at `n`, returning the root
    /// of the (possibly rotated) subtree.
    fn rebalance_node(&mut self, n: NodeId) -> NodeId {
        match balance(&self.arena, n) {
            // Left-heavy
            2.. => {
                let l = self.arena[n].left.unwrap();
                if balance(&self.arena, l) < 0 {
                    // Left-right: straighten the left child first.
                    self.rotate_left(l);
                }
                self.rotate_right(n)
            }
            // Right-heavy
            ..=-2 => {
                let r = self.arena[n].right.unwrap();
                if balance(&self.arena, r) > 0 {
                    // Right-left
                    self.rotate_right(r);
                }
                self.rotate_left(n)
            }
            -1..=1 => n,
        }
    }

    /// Walk from `start` to the root, recomputing heights and rotating any
    /// subtree whose balance factor exceeds 1.
    ///
    /// The walk ends early only once a node's height is unchanged and it needed
    /// no rotation, at which point no ancestor can be affected. A rotation does
    /// not end the walk: after a removal the rotated subtree may be shorter
    /// than before, unbalancing ancestors further up.
    fn rebalance_from(&mut self, start: Option<NodeId>) {
        let mut ptr = start;
        while let Some(n) = ptr {
            let old_height = self.arena[n].height;
            update_height(&mut self.arena, n);

            let subtree_root = self.rebalance_node(n);

            // Invariant: the absolute difference between tree heights
            // ("balance factor") cannot exceed 1.
            debug_assert!(balance(&self.arena, subtree_root).abs() <= 1);

            if subtree_root == n && self.arena[n].height == old_height {
                break;
            }

            ptr = self.arena[subtree_root].parent;
        }
    }
}

impl<K, V> Tree<K, V> for AvlTree<K, V>
where
    K: Ord,
{
    type Node = AvlNode<K, V>;

    const STRATEGY: &'static str = "avl";

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
                let id = self.arena.alloc(AvlNode::new(key, value, None));
                self.root = Some(id);
                return Insertion::New(id);
            }
        };

        let go_left = loop {
            let n = &self.arena[parent];
            let (child, go_left) = match key.cmp(&n.key) {
                Ordering::Less => (n.left, true),
                Ordering::Equal => return Insertion::Exists(parent, value),
                Ordering::Greater => (n.right, false),
            };
            match child {
                Some(v) => parent = v,
                None => break go_left,
            }
        };

        let id = self.arena.alloc(AvlNode::new(key, value, Some(parent)));
        if go_left {
            self.arena[parent].left = Some(id);
        } else {
            self.arena[parent].right = Some(id);
        }

        self.rebalance_from(Some(parent));

        Insertion::New(id)
    }

    fn remove(&mut self, id: NodeId) -> (K, V) {
        let n = &self.arena[id];

        // The deepest node whose subtree changed shape, and where rebalancing
        // starts.
        let start = match (n.left, n.right) {
            (None, child) | (child, None) => {
                let parent = n.parent;
                transplant(&mut self.arena, &mut self.root, id, child);
                parent
            }
            (Some(left), Some(right)) => {
                // Replace the node with its in-order successor: the left-most
                // node of the right subtree, which has no left child.
                let succ = descend(right, |v| self.arena[v].left);

                let start = if self.arena[succ].parent == Some(id) {
                    Some(succ)
                } else {
                    // Splice the successor out of its old position, its right
                    // subtree taking its place.
                    let succ_parent = self.arena[succ].parent;
                    let succ_right = self.arena[succ].right;
                    transplant(&mut self.arena, &mut self.root, succ, succ_right);

                    self.arena[succ].right = Some(right);
                    self.arena[right].parent = Some(succ);

                    succ_parent
                };

                transplant(&mut self.arena, &mut self.root, id, Some(succ));
                self.arena[succ].left = Some(left);
                self.arena[left].parent = Some(succ);
                self.arena[succ].height = self.arena[id].height;

                start
            }
        };

        let (key, value) = self.arena.free(id).into_entry();
        self.rebalance_from(start);
        (key, value)
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
            let id = arena.alloc(AvlNode {
                left,
                right,
                parent: None,
                height: 0,
                key,
                value,
            });
            for child in left.into_iter().chain(right) {
                arena[child].parent = Some(id);
            }
            update_height(&mut arena, id);
            id
        });

        Self { arena, root }
    }

    fn into_entries(self) -> IntoIter<Self::Node> {
        let order = self.nodes().collect();
        IntoIter::new(self.arena, order)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::*;
    use crate::test_utils::{validate_avl, Lfsr};

    #[test]
    fn test_rotation_trigger() {
        let mut t = AvlTree::default();
        for k in [1, 2, 3] {
            t.insert(k, ());
            validate_avl(&t);
        }

        // Right-right: a single left rotation leaves 2 at the root.
        let root = t.root().unwrap();
        assert_eq!(t.key(root), &2);
        assert_eq!(t.key(t.node(root).left().unwrap()), &1);
        assert_eq!(t.key(t.node(root).right().unwrap()), &3);
        assert_eq!(t.node(root).height(), 1);
    }

    #[test]
    fn test_double_rotation() {
        // Left-right: 3, 1, 2 must also settle with 2 at the root.
        let mut t = AvlTree::default();
        for k in [3, 1, 2] {
            t.insert(k, ());
        }
        validate_avl(&t);
        assert_eq!(t.key(t.root().unwrap()), &2);

        // And the mirror image.
        let mut t = AvlTree::default();
        for k in [1, 3, 2] {
            t.insert(k, ());
        }
        validate_avl(&t);
        assert_eq!(t.key(t.root().unwrap()), &2);
    }

    #[test]
    fn test_sorted_insert_stays_balanced() {
        let mut t = AvlTree::default();
        for k in 0..1023 {
            t.insert(k, ());
        }
        validate_avl(&t);

        // A perfect tree of 1023 nodes has 10 levels.
        assert_eq!(t.height(), 10);
    }

    #[test]
    fn test_remove_propagates_to_root() {
        // Build a minimal (Fibonacci) AVL tree of height 4 where removing the
        // shallowest leaf triggers rotations at more than one level.
        let mut t = AvlTree::default();
        for k in [8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1] {
            t.insert(k, ());
            validate_avl(&t);
        }

        let n12 = t.find(&12).unwrap();
        t.remove(n12);
        validate_avl(&t);

        let keys = t.iter().map(|(k, _)| *k).collect::<Vec<_>>();
        assert_eq!(keys, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_remove_root_with_two_children() {
        let mut t = AvlTree::from_keys(1..=7_u8);
        validate_avl(&t);

        let root = t.root().unwrap();
        assert_eq!(t.remove(root), (4, ()));
        validate_avl(&t);

        // The successor took the root's place.
        assert_eq!(t.key(t.root().unwrap()), &5);
    }

    /// Randomised insert / remove sequences of 10,000 operations, validating
    /// the AVL invariants after every mutation.
    #[test]
    fn test_random_ops_10k() {
        let mut rand = Lfsr::default();
        let mut t = AvlTree::default();
        let mut model = BTreeMap::new();

        for _ in 0..10_000 {
            let v = rand.next();
            let key = v % 512;

            if v & 0x8000 == 0 {
                t.insert(key, v);
                model.entry(key).or_insert(v);
            } else {
                assert_eq!(t.pop(&key), model.remove_entry(&key));
            }

            validate_avl(&t);
        }

        let got = t.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>();
        assert_eq!(got, model.into_iter().collect::<Vec<_>>());
    }

    proptest! {
        /// Assert the BST and AVL properties of tree nodes, ensuring the tree
        /// is well-formed, after every insert and remove.
        #[test]
        fn prop_node_invariants(
            values in prop::collection::vec(any::<u16>(), 1..200),
            removes in prop::collection::vec(any::<u16>(), 0..200),
        ) {
            let mut t = AvlTree::default();
            for &v in &values {
                t.insert(v, ());
                validate_avl(&t);
            }

            for v in removes.iter().chain(&values) {
                t.pop(v);
                validate_avl(&t);
            }

            assert!(t.is_empty());
        }

        #[test]
        fn prop_bulk_build_is_balanced(
            values in prop::collection::vec(any::<u16>(), 0..500),
        ) {
            let t = AvlTree::<u16, ()>::from_keys(values);
            validate_avl(&t);
        }
    }
}
