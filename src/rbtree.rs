//! A red-black binary search tree.
//!
//! Nodes are coloured red or black such that the root is black, no red node has
//! a red child, and every path from a node down to an absent child passes
//! through the same number of black nodes. The longest path is therefore at
//! most twice the shortest, bounding the height to 2 log2(n + 1).
//!
//! Absent children are never allocated: [`is_black()`] treats [`None`] as
//! black.

use std::cmp::Ordering;

use crate::{
    arena::{Arena, NodeId},
    iter::IntoIter,
    node::{descend, rotate_left, rotate_right, transplant, Relink, TreeNode},
    tree::{balanced_levels, build_balanced, Insertion, Tree},
};

#[derive(Debug, Clone)]
pub struct RbNode<K, V> {
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,

    black: bool,

    key: K,
    value: V,
}

impl<K, V> RbNode<K, V> {
    pub fn is_black(&self) -> bool {
        self.black
    }
}

impl<K, V> TreeNode for RbNode<K, V> {
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

impl<K, V> Relink for RbNode<K, V> {
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

/// Returns true if `n` is black, treating an absent node as black.
pub(crate) fn is_black<K, V>(arena: &Arena<RbNode<K, V>>, n: Option<NodeId>) -> bool {
    n.map(|v| arena[v].black).unwrap_or(true)
}

fn is_red<K, V>(arena: &Arena<RbNode<K, V>>, n: Option<NodeId>) -> bool {
    !is_black(arena, n)
}

/// Colour `n` black, if present.
fn paint_black<K, V>(arena: &mut Arena<RbNode<K, V>>, n: Option<NodeId>) {
    if let Some(n) = n {
        arena[n].black = true;
    }
}

#[derive(Debug, Clone)]
pub struct RbTree<K, V> {
    arena: Arena<RbNode<K, V>>,
    root: Option<NodeId>,
}

impl<K, V> Default for RbTree<K, V> {
    fn default() -> Self {
        Self {
            arena: Arena::default(),
            root: None,
        }
    }
}

impl<K, V> RbTree<K, V> {
    fn parent(&self, n: NodeId) -> Option<NodeId> {
        self.arena[n].parent
    }

    fn is_left_child(&self, n: NodeId, parent: NodeId) -> bool {
        self.arena[parent].left == Some(n)
    }

    /// Restore the red-black invariants after linking the red leaf `n`.
    ///
    /// A red uncle is resolved by recolouring and moves the violation two
    /// levels up; a black uncle is resolved by at most two rotations, after
    /// which the loop ends.
    fn insert_fixup(&mut self, mut n: NodeId) {
        while let Some(p) = self.parent(n).filter(|&p| !self.arena[p].black) {
            // A red node is never the root, so the grandparent exists.
            let Some(g) = self.parent(p) else { break };

            let parent_is_left = self.is_left_child(p, g);
            let uncle = if parent_is_left {
                self.arena[g].right
            } else {
                self.arena[g].left
            };

            if is_red(&self.arena, uncle) {
                self.arena[p].black = true;
                paint_black(&mut self.arena, uncle);
                self.arena[g].black = false;
                n = g;
                continue;
            }

            // Black uncle. An inner grandchild is first rotated to the outside
            // so a single rotation at the grandparent finishes the fixup.
            let p = if parent_is_left {
                if !self.is_left_child(n, p) {
                    rotate_left(&mut self.arena, &mut self.root, p);
                    n
                } else {
                    p
                }
            } else if self.is_left_child(n, p) {
                rotate_right(&mut self.arena, &mut self.root, p);
                n
            } else {
                p
            };

            self.arena[p].black = true;
            self.arena[g].black = false;
            if parent_is_left {
                rotate_right(&mut self.arena, &mut self.root, g);
            } else {
                rotate_left(&mut self.arena, &mut self.root, g);
            }
            break;
        }

        paint_black(&mut self.arena, self.root);
    }

    /// Restore the black-height invariant after a black node was spliced out
    /// from above `x`, leaving every path through `x` one black node short.
    ///
    /// `x` may be absent (a nil position), so its parent is passed explicitly.
    fn remove_fixup(&mut self, mut x: Option<NodeId>, mut parent: Option<NodeId>) {
        while x != self.root && is_black(&self.arena, x) {
            // `x` is not the root, so it has a parent.
            let Some(p) = parent else { break };

            if self.arena[p].left == x {
                // The sibling of a doubly-black position always exists, as its
                // subtree must hold at least one black node.
                let Some(mut w) = self.arena[p].right else { break };

                if !self.arena[w].black {
                    // Red sibling: rotate it above the parent to obtain a black
                    // sibling.
                    self.arena[w].black = true;
                    self.arena[p].black = false;
                    rotate_left(&mut self.arena, &mut self.root, p);
                    let Some(v) = self.arena[p].right else { break };
                    w = v;
                }

                if is_black(&self.arena, self.arena[w].left)
                    && is_black(&self.arena, self.arena[w].right)
                {
                    // Push the deficiency up a level.
                    self.arena[w].black = false;
                    x = Some(p);
                    parent = self.arena[p].parent;
                    continue;
                }

                if is_black(&self.arena, self.arena[w].right) {
                    // Near nephew red, far nephew black: rotate the red nephew
                    // to the far side.
                    let c = self.arena[w].left;
                    paint_black(&mut self.arena, c);
                    self.arena[w].black = false;
                    w = rotate_right(&mut self.arena, &mut self.root, w);
                }

                self.arena[w].black = self.arena[p].black;
                self.arena[p].black = true;
                let c = self.arena[w].right;
                paint_black(&mut self.arena, c);
                rotate_left(&mut self.arena, &mut self.root, p);
            } else {
                let Some(mut w) = self.arena[p].left else { break };

                if !self.arena[w].black {
                    self.arena[w].black = true;
                    self.arena[p].black = false;
                    rotate_right(&mut self.arena, &mut self.root, p);
                    let Some(v) = self.arena[p].left else { break };
                    w = v;
                }

                if is_black(&self.arena, self.arena[w].left)
                    && is_black(&self.arena, self.arena[w].right)
                {
                    self.arena[w].black = false;
                    x = Some(p);
                    parent = self.arena[p].parent;
                    continue;
                }

                if is_black(&self.arena, self.arena[w].left) {
                    let c = self.arena[w].right;
                    paint_black(&mut self.arena, c);
                    self.arena[w].black = false;
                    w = rotate_left(&mut self.arena, &mut self.root, w);
                }

                self.arena[w].black = self.arena[p].black;
                self.arena[p].black = true;
                let c = self.arena[w].left;
                paint_black(&mut self.arena, c);
                rotate_right(&mut self.arena, &mut self.root, p);
            }

            // The deficiency is resolved locally.
            x = self.root;
            break;
        }

        paint_black(&mut self.arena, x);
    }
}

impl<K, V> Tree<K, V> for RbTree<K, V>
where
    K: Ord,
{
    type Node = RbNode<K, V>;

    const STRATEGY: &'static str = "red-black";

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
        let mut parent = None;
        let mut go_left = false;
        let mut ptr = self.root;
        while let Some(v) = ptr {
            let n = &self.arena[v];
            parent = Some(v);
            ptr = match key.cmp(&n.key) {
                Ordering::Less => {
                    go_left = true;
                    n.left
                }
                Ordering::Equal => return Insertion::Exists(v, value),
                Ordering::Greater => {
                    go_left = false;
                    n.right
                }
            };
        }

        let id = self.arena.alloc(RbNode {
            left: None,
            right: None,
            parent,
            black: false,
            key,
            value,
        });

        match parent {
            None => self.root = Some(id),
            Some(p) if go_left => self.arena[p].left = Some(id),
            Some(p) => self.arena[p].right = Some(id),
        }

        self.insert_fixup(id);

        Insertion::New(id)
    }

    fn remove(&mut self, id: NodeId) -> (K, V) {
        // One splice routine covers every target, root or not: find the node
        // that structurally leaves its position (`id` itself when it has at
        // most one child, otherwise its in-order successor) and the position
        // `x` that inherits it.
        let n = &self.arena[id];
        let (removed_black, x, x_parent) = match (n.left, n.right) {
            (None, child) | (child, None) => {
                let removed_black = n.black;
                let parent = n.parent;
                transplant(&mut self.arena, &mut self.root, id, child);
                (removed_black, child, parent)
            }
            (Some(left), Some(right)) => {
                let succ = descend(right, |v| self.arena[v].left);
                let removed_black = self.arena[succ].black;
                let x = self.arena[succ].right;

                let x_parent = if self.arena[succ].parent == Some(id) {
                    Some(succ)
                } else {
                    let succ_parent = self.arena[succ].parent;
                    transplant(&mut self.arena, &mut self.root, succ, x);
                    self.arena[succ].right = Some(right);
                    self.arena[right].parent = Some(succ);
                    succ_parent
                };

                // The successor takes over the removed node's position and
                // colour, so the colour that structurally leaves the tree is
                // the successor's.
                transplant(&mut self.arena, &mut self.root, id, Some(succ));
                self.arena[succ].left = Some(left);
                self.arena[left].parent = Some(succ);
                self.arena[succ].black = self.arena[id].black;

                (removed_black, x, x_parent)
            }
        };

        let (key, value) = self.arena.free(id).into_entry();

        if removed_black {
            self.remove_fixup(x, x_parent);
        }

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

        // Every level above the last is full; colouring only the nodes of an
        // incomplete last level red keeps every root-to-nil path at the same
        // black count with no red node having a red parent.
        let levels = balanced_levels(entries.len());
        let red_depth = if (entries.len() + 1).is_power_of_two() {
            // The last level is full too.
            None
        } else {
            Some(levels - 1)
        };

        let mut arena = Arena::default();
        let root = build_balanced(entries, |key, value, left, right, depth| {
            let id = arena.alloc(RbNode {
                left,
                right,
                parent: None,
                black: Some(depth) != red_depth,
                key,
                value,
            });
            for child in left.into_iter().chain(right) {
                arena[child].parent = Some(id);
            }
            id
        });

        Self { arena, root }
    }

    fn into_entries(self) -> IntoIter<Self::Node> {
        let order = self.nodes().collect();
        IntoIter::new(self.arena, order)
    }
}
