//! Lazy, borrowing views over the keys, values or entries of a
//! [`TreeMap`](crate::TreeMap).
//!
//! A view holds nothing but a reference to the tree: each call to `iter()`
//! starts a fresh in-order walk, so a view can be iterated any number of
//! times, forwards or in reverse.

use std::{borrow::Borrow, fmt::Debug, iter::Map, marker::PhantomData};

use crate::{iter::Iter, tree::Tree};

/// An iterator over the keys of a tree.
pub type KeysIter<'a, K, V, T> = Map<Iter<'a, K, V, T>, fn((&'a K, &'a V)) -> &'a K>;

/// An iterator over the values of a tree.
pub type ValuesIter<'a, K, V, T> = Map<Iter<'a, K, V, T>, fn((&'a K, &'a V)) -> &'a V>;

macro_rules! view {
    (
        $(#[$meta:meta])*
        $name:ident, $iter:ident, $item:ty, $project:ident
    ) => {
        $(#[$meta])*
        pub struct $name<'a, K, V, T> {
            tree: &'a T,
            _kv: PhantomData<fn() -> (K, V)>,
        }

        impl<'a, K, V, T> $name<'a, K, V, T>
        where
            K: Ord + 'a,
            V: 'a,
            T: Tree<K, V>,
        {
            pub(crate) fn new(tree: &'a T) -> Self {
                Self {
                    tree,
                    _kv: PhantomData,
                }
            }

            pub fn len(&self) -> usize {
                self.tree.len()
            }

            pub fn is_empty(&self) -> bool {
                self.tree.is_empty()
            }

            /// Iterate in ascending key order.
            pub fn iter(&self) -> $iter<'a, K, V, T> {
                $project(self.tree.iter())
            }

            /// Iterate in descending key order.
            pub fn rev(&self) -> $iter<'a, K, V, T> {
                $project(self.tree.iter_rev())
            }
        }

        impl<K, V, T> Clone for $name<'_, K, V, T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<K, V, T> Copy for $name<'_, K, V, T> {}

        impl<'a, K, V, T> IntoIterator for $name<'a, K, V, T>
        where
            K: Ord + 'a,
            V: 'a,
            T: Tree<K, V>,
        {
            type Item = $item;
            type IntoIter = $iter<'a, K, V, T>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        impl<'a, K, V, T> Debug for $name<'a, K, V, T>
        where
            K: Ord + Debug + 'a,
            V: Debug + 'a,
            T: Tree<K, V>,
        {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_list().entries(self.iter()).finish()
            }
        }
    };
}

view!(
    /// The keys of a tree, in ascending order.
    Keys,
    KeysIter,
    &'a K,
    project_keys
);

view!(
    /// The values of a tree, ordered by their keys.
    Values,
    ValuesIter,
    &'a V,
    project_values
);

view!(
    /// The `(key, value)` entries of a tree, in ascending key order.
    Items,
    Iter,
    (&'a K, &'a V),
    project_items
);

fn project_keys<'a, K, V, T>(iter: Iter<'a, K, V, T>) -> KeysIter<'a, K, V, T>
where
    K: Ord + 'a,
    V: 'a,
    T: Tree<K, V>,
{
    let f: fn((&'a K, &'a V)) -> &'a K = |(k, _)| k;
    iter.map(f)
}

fn project_values<'a, K, V, T>(iter: Iter<'a, K, V, T>) -> ValuesIter<'a, K, V, T>
where
    K: Ord + 'a,
    V: 'a,
    T: Tree<K, V>,
{
    let f: fn((&'a K, &'a V)) -> &'a V = |(_, v)| v;
    iter.map(f)
}

fn project_items<K, V, T>(iter: Iter<'_, K, V, T>) -> Iter<'_, K, V, T> {
    iter
}

impl<K, V, T> Keys<'_, K, V, T>
where
    K: Ord,
    T: Tree<K, V>,
{
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(key)
    }
}
