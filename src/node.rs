use crate::arena::{Arena, NodeId};

/// The capability shared by the nodes of every tree strategy.
///
/// A node holds one key and its value, plus the structural links the owning
/// tree maintains. Strategies add their own balancing metadata on top.
pub trait TreeNode {
    type Key;
    type Value;

    /// True when [`TreeNode::parent()`] is maintained for this node kind.
    ///
    /// When false, navigation that needs an ancestor re-descends from the root
    /// instead.
    const TRACKS_PARENT: bool;

    fn key(&self) -> &Self::Key;
    fn value(&self) -> &Self::Value;
    fn value_mut(&mut self) -> &mut Self::Value;

    fn left(&self) -> Option<NodeId>;
    fn right(&self) -> Option<NodeId>;

    /// The non-owning back-reference to this node's parent, if tracked.
    fn parent(&self) -> Option<NodeId> {
        None
    }

    /// Explode this node into the key and value it contains.
    fn into_entry(self) -> (Self::Key, Self::Value);
}

/// Link mutation for node kinds whose links are rewritten through exclusive
/// access.
pub(crate) trait Relink: TreeNode {
    fn set_left(&mut self, id: Option<NodeId>);
    fn set_right(&mut self, id: Option<NodeId>);

    /// No-op for node kinds that do not track their parent.
    fn set_parent(&mut self, _id: Option<NodeId>) {}
}

/// Follow `next` from `id` until it yields [`None`], returning the last node
/// visited.
///
/// Used to find the left-most / right-most node of a subtree.
pub(crate) fn descend<F>(mut id: NodeId, next: F) -> NodeId
where
    F: Fn(NodeId) -> Option<NodeId>,
{
    while let Some(v) = next(id) {
        id = v;
    }
    id
}

/// Point the child slot of `parent` that currently holds `old` at `new`
/// instead, or the `root` slot if `parent` is [`None`].
///
/// Only the downward link is written.
pub(crate) fn replace_child<N>(
    arena: &mut Arena<N>,
    root: &mut Option<NodeId>,
    parent: Option<NodeId>,
    old: NodeId,
    new: Option<NodeId>,
) where
    N: Relink,
{
    match parent {
        None => *root = new,
        Some(p) if arena[p].left() == Some(old) => arena[p].set_left(new),
        Some(p) => {
            debug_assert_eq!(arena[p].right(), Some(old));
            arena[p].set_right(new)
        }
    }
}

/// Replace the subtree rooted at `old` with the subtree rooted at `new`,
/// updating both the parent's child slot and `new`'s parent link.
///
/// `old` keeps its own links; the caller is responsible for them.
pub(crate) fn transplant<N>(
    arena: &mut Arena<N>,
    root: &mut Option<NodeId>,
    old: NodeId,
    new: Option<NodeId>,
) where
    N: Relink,
{
    let parent = arena[old].parent();
    replace_child(arena, root, parent, old, new);
    if let Some(new) = new {
        arena[new].set_parent(parent);
    }
}

/// Left rotate the subtree rooted at `x` around the pivot point `P`, returning
/// the new subtree root `P`.
///
/// ```text
///
///      x
///     / \                               P
///    1   P         Rotate Left        /   \
///       / \      --------------->    x     y
///      2   y                        / \   / \
///         / \                      1   2 3   4
///        3   4
/// ```
///
/// Child and parent links of `x`, `P`, subtree `2` and the parent of `x` are
/// all rewritten. Strategy metadata (heights, colours) is left to the caller.
///
/// # Panics
///
/// Panics if `x` has no right pointer (cannot be rotated).
pub(crate) fn rotate_left<N>(arena: &mut Arena<N>, root: &mut Option<NodeId>, x: NodeId) -> NodeId
where
    N: Relink,
{
    debug_assert!(N::TRACKS_PARENT);

    let p = arena[x].right().unwrap();

    let inner = arena[p].left();
    arena[x].set_right(inner);
    if let Some(inner) = inner {
        arena[inner].set_parent(Some(x));
    }

    transplant(arena, root, x, Some(p));

    arena[p].set_left(Some(x));
    arena[x].set_parent(Some(p));

    p
}

/// Right rotate the subtree rooted at `y` around the pivot point `P`, returning
/// the new subtree root `P`.
///
/// ```text
///          y
///         / \                           P
///        P   4     Rotate Right       /   \
///       / \      --------------->    x     y
///      x   3                        / \   / \
///     / \                          1   2 3   4
///    1   2
/// ```
///
/// # Panics
///
/// Panics if `y` has no left pointer (cannot be rotated).
pub(crate) fn rotate_right<N>(arena: &mut Arena<N>, root: &mut Option<NodeId>, y: NodeId) -> NodeId
where
    N: Relink,
{
    debug_assert!(N::TRACKS_PARENT);

    let p = arena[y].left().unwrap();

    let inner = arena[p].right();
    arena[y].set_left(inner);
    if let Some(inner) = inner {
        arena[inner].set_parent(Some(y));
    }

    transplant(arena, root, y, Some(p));

    arena[p].set_right(Some(y));
    arena[y].set_parent(Some(p));

    p
}
