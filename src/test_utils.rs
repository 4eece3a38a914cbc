use std::fmt::{Debug, Display, Write};

use proptest::prelude::*;

use crate::{
    arena::NodeId, avl::AvlNode, node::TreeNode, rbtree::RbNode, tree::Tree, AvlTree, RbTree,
};

const KEY_MAX: u16 = 20;

/// An operation against a tree, applied in lockstep with a model map.
#[derive(Debug, Clone)]
pub(crate) enum Op {
    Insert(u16, u16),
    Find(u16),
    Pop(u16),
    PopMin,
    PopMax,
}

/// Generate an arbitrary [`Op`] with keys drawn from [0..[`KEY_MAX`]), so that
/// operations frequently collide with existing keys.
pub(crate) fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..KEY_MAX, any::<u16>()).prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (0..KEY_MAX).prop_map(Op::Find),
        2 => (0..KEY_MAX).prop_map(Op::Pop),
        1 => Just(Op::PopMin),
        1 => Just(Op::PopMax),
    ]
}

/// Linear-feedback shift register based PRNG.
///
/// Generates 65,535 unique values before cycling.
#[derive(Debug, Clone)]
pub(crate) struct Lfsr(u16);

impl Default for Lfsr {
    fn default() -> Self {
        Self(42)
    }
}

impl Lfsr {
    #[allow(clippy::should_implement_trait)]
    pub(crate) fn next(&mut self) -> u16 {
        let lsb = self.0 & 1;
        self.0 >>= 1;
        if lsb == 1 {
            self.0 ^= 0xD008;
        }
        assert_ne!(self.0, 42, "LFSR rollover");
        self.0
    }
}

/// Assert the structural invariants common to every strategy:
///
///   * Every key lies strictly within the bounds imposed by its ancestors.
///   * Parent links (where tracked) point back at the node holding the child
///     link, and the root has no parent.
///   * The number of reachable nodes matches [`Tree::len()`].
///
/// Returns the nodes in ascending key order.
pub(crate) fn validate_bst<K, V, T>(t: &T) -> Vec<NodeId>
where
    K: Ord + Debug,
    T: Tree<K, V>,
{
    fn recurse<'a, K, V, T>(
        t: &'a T,
        id: NodeId,
        parent: Option<NodeId>,
        lower: Option<&'a K>,
        upper: Option<&'a K>,
        out: &mut Vec<NodeId>,
    ) where
        K: Ord + Debug,
        T: Tree<K, V>,
    {
        let n = t.node(id);
        let key = n.key();

        if let Some(lower) = lower {
            assert!(key > lower, "key {key:?} not above bound {lower:?}");
        }
        if let Some(upper) = upper {
            assert!(key < upper, "key {key:?} not below bound {upper:?}");
        }
        if <T::Node as TreeNode>::TRACKS_PARENT {
            assert_eq!(n.parent(), parent, "bad parent link at {key:?}");
        }

        if let Some(left) = n.left() {
            recurse(t, left, Some(id), lower, Some(key), out);
        }
        out.push(id);
        if let Some(right) = n.right() {
            recurse(t, right, Some(id), Some(key), upper, out);
        }
    }

    let mut out = Vec::with_capacity(t.len());
    if let Some(root) = t.root() {
        recurse(t, root, None, None, None, &mut out);
    }

    assert_eq!(out.len(), t.len(), "reachable node count");
    assert_eq!(t.is_empty(), out.is_empty());

    out
}

/// Assert the BST invariants, and that every node's recorded height is exact
/// and its balance factor within [-1, 1].
pub(crate) fn validate_avl<K, V>(t: &AvlTree<K, V>)
where
    K: Ord + Debug,
{
    // Returns the height of `id`, where an absent node is -1.
    fn recurse<K, V>(t: &AvlTree<K, V>, id: Option<NodeId>) -> i16
    where
        K: Ord,
    {
        let Some(id) = id else { return -1 };
        let n: &AvlNode<K, V> = t.node(id);

        let left = recurse(t, n.left());
        let right = recurse(t, n.right());

        let h = left.max(right) + 1;
        assert_eq!(n.height() as i16, h, "stale height");
        assert!((left - right).abs() <= 1, "unbalanced: {left} vs {right}");

        h
    }

    validate_bst(t);
    let h = recurse(t, t.root());
    assert_eq!(t.height() as i16, h + 1);
}

/// Assert the BST invariants plus the red-black colouring rules:
///
///   * The root is black.
///   * No red node has a red child.
///   * Every path from a node to an absent child crosses the same number of
///     black nodes.
pub(crate) fn validate_rb<K, V>(t: &RbTree<K, V>)
where
    K: Ord + Debug,
{
    // Returns the black height of `id`, counting the absent leaves.
    fn recurse<K, V>(t: &RbTree<K, V>, id: Option<NodeId>) -> usize
    where
        K: Ord + Debug,
    {
        let Some(id) = id else { return 1 };
        let n: &RbNode<K, V> = t.node(id);

        if !n.is_black() {
            for child in n.left().into_iter().chain(n.right()) {
                assert!(
                    t.node(child).is_black(),
                    "red node {:?} has a red child",
                    n.key()
                );
            }
        }

        let left = recurse(t, n.left());
        let right = recurse(t, n.right());
        assert_eq!(left, right, "black height mismatch at {:?}", n.key());

        left + usize::from(n.is_black())
    }

    validate_bst(t);
    if let Some(root) = t.root() {
        assert!(t.node(root).is_black(), "red root");
    }
    recurse(t, t.root());
}

/// Render `t` in graphviz DOT format, for debugging.
#[allow(unused)]
pub(crate) fn print_dot<K, V, T>(t: &T) -> String
where
    K: Ord + Display,
    V: Display,
    T: Tree<K, V>,
{
    let mut buf = String::new();

    writeln!(buf, "digraph {{").unwrap();
    writeln!(buf, r#"bgcolor = "transparent";"#).unwrap();
    writeln!(
        buf,
        r#"node [shape = record; style = filled; fontcolor = orange4; fillcolor = white;];"#
    )
    .unwrap();

    let mut stack = t.root().into_iter().collect::<Vec<_>>();
    while let Some(id) = stack.pop() {
        let n = t.node(id);
        writeln!(buf, r#""{}" [label="{} | {}"];"#, n.key(), n.key(), n.value()).unwrap();

        for child in [n.left(), n.right()] {
            match child {
                Some(v) => {
                    writeln!(
                        buf,
                        "\"{}\" -> \"{}\" [color = \"orange1\";];",
                        n.key(),
                        t.key(v)
                    )
                    .unwrap();
                    stack.push(v);
                }
                None => {
                    writeln!(buf, "\"null_{}\" [shape=point,style=invis];", n.key()).unwrap();
                    writeln!(buf, "\"{}\" -> \"null_{}\" [style=invis];", n.key(), n.key())
                        .unwrap();
                }
            }
        }
    }

    writeln!(buf, "}}").unwrap();
    buf
}
