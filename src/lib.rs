//! Ordered containers built on interchangeable binary search trees.
//!
//! Four balancing strategies implement one navigation contract, [`Tree`]:
//!
//!   * [`BinaryTree`]: no rebalancing, O(n) worst case.
//!   * [`AvlTree`]: height balanced, O(log n).
//!   * [`RbTree`]: red-black coloured, O(log n).
//!   * [`SplayTree`]: self-adjusting, O(log n) amortised.
//!
//! On top of the trees sit three adapters: [`TreeMap`], [`TreeSet`] and
//! [`KeyedSet`], each taking the strategy as a type parameter that defaults to
//! [`AvlTree`]. Aliases name every combination ([`RbMap`], [`SplaySet`], ...).
//!
//! ```
//! use arboretum::{RbMap, TreeMap};
//!
//! let mut prices: RbMap<&str, u32> = TreeMap::new();
//! prices.insert("pear", 3);
//! prices.insert("apple", 2);
//! prices.insert("fig", 5);
//!
//! let fruit = prices.keys().iter().copied().collect::<Vec<_>>();
//! assert_eq!(fruit, ["apple", "fig", "pear"]);
//! assert_eq!(prices.ceil_key("banana"), Ok(&"fig"));
//! ```
//!
//! Trees address their nodes with [`NodeId`] handles. Nodes are stored in a
//! per-tree arena and linked by handle, so parent back-references never own
//! the node they point at.

mod algebra;
mod arena;
mod avl;
mod binary;
pub mod bulk;
mod entry;
mod error;
mod iter;
mod keyed_set;
mod map;
mod node;
mod rbtree;
mod set;
mod splay;
mod tree;
mod view;

#[cfg(test)]
mod test_utils;

pub use arena::NodeId;
pub use avl::{AvlNode, AvlTree};
pub use binary::{BinaryNode, BinaryTree};
pub use entry::{Entry, OccupiedEntry, VacantEntry};
pub use error::{Error, Neighbour, Result};
pub use iter::{IntoIter, Iter, Nodes};
pub use keyed_set::{
    AvlKeyedSet, BinaryKeyedSet, KeyedSet, KeyedSetIntoIter, RbKeyedSet, SplayKeyedSet,
};
pub use map::{AvlMap, BinaryMap, RbMap, SplayMap, TreeMap};
pub use node::TreeNode;
pub use rbtree::{RbNode, RbTree};
pub use set::{AvlSet, BinarySet, RbSet, SetIntoIter, SetIter, SplaySet, TreeSet};
pub use splay::{SplayNode, SplayTree};
pub use tree::{Insertion, Tree};
pub use view::{Items, Keys, KeysIter, Values, ValuesIter};
