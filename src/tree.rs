use std::{borrow::Borrow, cmp::Ordering};

use tracing::trace;

use crate::{
    arena::NodeId,
    bulk::dedup_sorted,
    error::{Error, Neighbour, Result},
    iter::{Direction, IntoIter, Iter, Nodes},
    node::{descend, TreeNode},
};

/// The outcome of [`Tree::insert()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion<V> {
    /// A new node was linked into the tree.
    New(NodeId),

    /// A node with an equal key already exists and was left untouched.
    ///
    /// The value passed to [`Tree::insert()`] is handed back so the caller
    /// can decide whether to overwrite.
    Exists(NodeId, V),
}

impl<V> Insertion<V> {
    /// The node holding the key, whether or not it was just inserted.
    pub fn node(&self) -> NodeId {
        match self {
            Self::New(id) | Self::Exists(id, _) => *id,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Self::New(_))
    }
}

/// The navigation contract shared by every tree strategy.
///
/// A strategy supplies node storage and its own `insert` / `remove` /
/// `from_sorted`; every query is provided here, implemented once against the
/// [`TreeNode`] capability. Strategies that restructure on access override the
/// queries they need to.
///
/// Nodes are addressed by [`NodeId`] handles which stay valid until the node is
/// removed. Passing a handle from another tree, or one that has been removed,
/// is a caller bug and is not detected.
pub trait Tree<K, V>: Default
where
    K: Ord,
{
    type Node: TreeNode<Key = K, Value = V>;

    /// A short name for the balancing strategy, used in diagnostics.
    const STRATEGY: &'static str;

    fn root(&self) -> Option<NodeId>;

    /// The number of entries in the tree.
    fn len(&self) -> usize;

    fn node(&self, id: NodeId) -> &Self::Node;
    fn node_mut(&mut self, id: NodeId) -> &mut Self::Node;

    /// Insert `key` with `value`, returning the node holding `key`.
    ///
    /// Inserting a key that already exists is a no-op: the existing node and
    /// its value are left unchanged and `value` is handed back in
    /// [`Insertion::Exists`].
    fn insert(&mut self, key: K, value: V) -> Insertion<V>;

    /// Unlink and release `id`, returning the entry it held.
    fn remove(&mut self, id: NodeId) -> (K, V);

    /// Drop every entry.
    fn clear(&mut self);

    /// Build a tree from `entries`, which must be strictly ascending by key.
    fn from_sorted(entries: Vec<(K, V)>) -> Self;

    /// Consume the tree, yielding its entries in ascending key order.
    fn into_entries(self) -> IntoIter<Self::Node>;

    fn is_empty(&self) -> bool {
        self.root().is_none()
    }

    fn key<'a>(&'a self, id: NodeId) -> &'a K
    where
        Self::Node: 'a,
    {
        self.node(id).key()
    }

    fn value<'a>(&'a self, id: NodeId) -> &'a V
    where
        Self::Node: 'a,
    {
        self.node(id).value()
    }

    fn value_mut<'a>(&'a mut self, id: NodeId) -> &'a mut V
    where
        Self::Node: 'a,
    {
        self.node_mut(id).value_mut()
    }

    fn entry<'a>(&'a self, id: NodeId) -> (&'a K, &'a V)
    where
        Self::Node: 'a,
    {
        let n = self.node(id);
        (n.key(), n.value())
    }

    /// Return the node holding `key`, if any.
    fn find<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut ptr = self.root();
        while let Some(id) = ptr {
            let n = self.node(id);
            ptr = match key.cmp(n.key().borrow()) {
                Ordering::Less => n.left(),
                Ordering::Equal => return Some(id),
                Ordering::Greater => n.right(),
            };
        }
        None
    }

    fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// The node holding the smallest key.
    fn min(&self) -> Option<NodeId> {
        self.root().map(|r| descend(r, |v| self.node(v).left()))
    }

    /// The node holding the largest key.
    fn max(&self) -> Option<NodeId> {
        self.root().map(|r| descend(r, |v| self.node(v).right()))
    }

    /// The node immediately before `id` in key order.
    fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        let n = self.node(id);
        if let Some(left) = n.left() {
            return Some(descend(left, |v| self.node(v).right()));
        }

        if <Self::Node as TreeNode>::TRACKS_PARENT {
            // Walk up until the path turns left: that ancestor is the first
            // key below `id`.
            let mut child = id;
            let mut parent = n.parent();
            while let Some(p) = parent {
                let pn = self.node(p);
                if pn.right() == Some(child) {
                    return Some(p);
                }
                child = p;
                parent = pn.parent();
            }
            return None;
        }

        // Without parent links, re-descend from the root remembering the last
        // ancestor passed on its right.
        let key = n.key();
        let mut best = None;
        let mut ptr = self.root();
        while let Some(v) = ptr {
            let vn = self.node(v);
            if vn.key() < key {
                best = Some(v);
                ptr = vn.right();
            } else {
                ptr = vn.left();
            }
        }
        best
    }

    /// The node immediately after `id` in key order.
    fn successor(&self, id: NodeId) -> Option<NodeId> {
        let n = self.node(id);
        if let Some(right) = n.right() {
            return Some(descend(right, |v| self.node(v).left()));
        }

        if <Self::Node as TreeNode>::TRACKS_PARENT {
            let mut child = id;
            let mut parent = n.parent();
            while let Some(p) = parent {
                let pn = self.node(p);
                if pn.left() == Some(child) {
                    return Some(p);
                }
                child = p;
                parent = pn.parent();
            }
            return None;
        }

        let key = n.key();
        let mut best = None;
        let mut ptr = self.root();
        while let Some(v) = ptr {
            let vn = self.node(v);
            if key < vn.key() {
                best = Some(v);
                ptr = vn.left();
            } else {
                ptr = vn.right();
            }
        }
        best
    }

    /// The node holding the greatest key less than or equal to `key` (the
    /// floor).
    fn infimum<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut best = None;
        let mut ptr = self.root();
        while let Some(id) = ptr {
            let n = self.node(id);
            ptr = match key.cmp(n.key().borrow()) {
                Ordering::Equal => return Some(id),
                Ordering::Greater => {
                    best = Some(id);
                    n.right()
                }
                Ordering::Less => n.left(),
            };
        }
        best
    }

    /// The node holding the least key greater than or equal to `key` (the
    /// ceiling).
    fn supremum<Q>(&self, key: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut best = None;
        let mut ptr = self.root();
        while let Some(id) = ptr {
            let n = self.node(id);
            ptr = match key.cmp(n.key().borrow()) {
                Ordering::Equal => return Some(id),
                Ordering::Less => {
                    best = Some(id);
                    n.left()
                }
                Ordering::Greater => n.right(),
            };
        }
        best
    }

    /// The number of levels on the longest root-to-leaf path (0 when empty).
    fn height(&self) -> usize {
        let mut max = 0;
        let mut stack = self.root().map(|r| (r, 1)).into_iter().collect::<Vec<_>>();
        while let Some((id, depth)) = stack.pop() {
            max = max.max(depth);
            let n = self.node(id);
            stack.extend(n.left().into_iter().chain(n.right()).map(|c| (c, depth + 1)));
        }
        max
    }

    /// Visit every node in ascending key order.
    fn nodes(&self) -> Nodes<'_, K, V, Self> {
        Nodes::walk(self, Direction::Ascending)
    }

    /// Visit every node in descending key order.
    fn nodes_rev(&self) -> Nodes<'_, K, V, Self> {
        Nodes::walk(self, Direction::Descending)
    }

    /// Iterate over `(key, value)` pairs in ascending key order.
    fn iter(&self) -> Iter<'_, K, V, Self> {
        Iter::new(self.nodes())
    }

    /// Iterate over `(key, value)` pairs in descending key order.
    fn iter_rev(&self) -> Iter<'_, K, V, Self> {
        Iter::new(self.nodes_rev())
    }

    /// Remove the entry for `key`, if any.
    fn pop<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find(key)?;
        Some(self.remove(id))
    }

    /// Remove the entry with the smallest key.
    fn pop_min(&mut self) -> Result<(K, V)> {
        let id = self.min().ok_or(Error::Empty)?;
        Ok(self.remove(id))
    }

    /// Remove the entry with the largest key.
    fn pop_max(&mut self) -> Result<(K, V)> {
        let id = self.max().ok_or(Error::Empty)?;
        Ok(self.remove(id))
    }

    /// Build a tree pairing each of `keys` with the value at the same position
    /// in `values`.
    ///
    /// Surplus keys or values (when the two sequences differ in length) are
    /// ignored. When a key repeats, the value paired with its last occurrence
    /// wins.
    fn from_components<I, J>(keys: I, values: J) -> Self
    where
        I: IntoIterator<Item = K>,
        J: IntoIterator<Item = V>,
    {
        Self::from_entries(keys.into_iter().zip(values))
    }

    /// Build a tree holding `keys`, each with the default value.
    fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        V: Default,
    {
        Self::from_entries(keys.into_iter().map(|k| (k, V::default())))
    }

    /// Build a tree from unordered `(key, value)` pairs; later pairs overwrite
    /// earlier ones sharing a key.
    fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries = dedup_sorted(entries);
        trace!(
            strategy = Self::STRATEGY,
            n_entries = entries.len(),
            "bulk building tree"
        );
        Self::from_sorted(entries)
    }
}

/// Resolve a neighbourhood query against `tree`.
///
/// [`Neighbour::Next`] and [`Neighbour::Prev`] are relative to an existing
/// key, and fail with [`Error::KeyNotFound`] when `key` is absent.
pub(crate) fn neighbour<K, V, T, Q>(tree: &T, key: &Q, which: Neighbour) -> Result<NodeId>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
    T: Tree<K, V>,
{
    let found = match which {
        Neighbour::Floor => tree.infimum(key),
        Neighbour::Ceil => tree.supremum(key),
        Neighbour::Next => tree.successor(tree.find(key).ok_or(Error::KeyNotFound)?),
        Neighbour::Prev => tree.predecessor(tree.find(key).ok_or(Error::KeyNotFound)?),
    };
    found.ok_or(Error::NoNeighbour(which))
}

/// Link the strictly ascending `entries` into a balanced shape by repeatedly
/// splitting at the middle entry, returning the root.
///
/// `make` is called once per entry, children first, with the entry, its
/// already-built left and right subtrees and its depth (the root is at depth
/// 0). It must allocate the node and return its id.
///
/// The result has `ceil(log2(n + 1))` levels, every level but the last is
/// full, and no rebalancing is ever needed.
pub(crate) fn build_balanced<K, V, F>(entries: Vec<(K, V)>, mut make: F) -> Option<NodeId>
where
    F: FnMut(K, V, Option<NodeId>, Option<NodeId>, usize) -> NodeId,
{
    let len = entries.len();
    let mut iter = entries.into_iter();
    let root = build_subtree(&mut iter, len, 0, &mut make);
    debug_assert!(iter.next().is_none());
    root
}

fn build_subtree<I, K, V, F>(iter: &mut I, len: usize, depth: usize, make: &mut F) -> Option<NodeId>
where
    I: Iterator<Item = (K, V)>,
    F: FnMut(K, V, Option<NodeId>, Option<NodeId>, usize) -> NodeId,
{
    if len == 0 {
        return None;
    }

    // Consume the sequence in-order: the first half becomes the left subtree,
    // the middle entry this node, and the rest the right subtree.
    let n_left = len / 2;
    let left = build_subtree(iter, n_left, depth + 1, make);
    let (key, value) = iter.next()?;
    let right = build_subtree(iter, len - n_left - 1, depth + 1, make);

    Some(make(key, value, left, right, depth))
}

/// The number of levels [`build_balanced()`] produces for `n` entries.
pub(crate) fn balanced_levels(n: usize) -> usize {
    (usize::BITS - n.leading_zeros()) as usize
}
