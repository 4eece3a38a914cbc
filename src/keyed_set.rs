use std::{
    borrow::Borrow,
    fmt::Debug,
    iter::Map,
    marker::PhantomData,
    mem,
    ops::{BitAnd, BitOr, BitXor, Sub},
};

use crate::{
    algebra,
    error::{Error, Neighbour, Result},
    iter::IntoIter,
    tree::{neighbour, Insertion, Tree},
    view::{Values, ValuesIter},
    AvlTree, BinaryTree, RbTree, SplayTree,
};

/// An ordered set of values `T`, ordered and deduplicated by the key `K` the
/// function `F` derives from each value.
///
/// At most one value is held per key. The key function is applied on every
/// insert, lookup and removal by value, and must be deterministic.
///
/// ```
/// use arboretum::KeyedSet;
///
/// let mut words: KeyedSet<usize, &str, _> = KeyedSet::new(|w: &&str| w.len());
/// words.add("apple");
/// words.add("kiwi");
///
/// // "pear" shares its key (length 4) with "kiwi", and replaces it.
/// assert_eq!(words.add("pear"), Some("kiwi"));
/// assert_eq!(words.get(&4), Some(&"pear"));
/// assert_eq!(words.iter().copied().collect::<Vec<_>>(), ["pear", "apple"]);
/// ```
pub struct KeyedSet<K, T, F, Tr = AvlTree<K, T>> {
    tree: Tr,
    key_fn: F,
    _k: PhantomData<fn() -> (K, T)>,
}

pub type AvlKeyedSet<K, T, F> = KeyedSet<K, T, F, AvlTree<K, T>>;
pub type RbKeyedSet<K, T, F> = KeyedSet<K, T, F, RbTree<K, T>>;
pub type SplayKeyedSet<K, T, F> = KeyedSet<K, T, F, SplayTree<K, T>>;
pub type BinaryKeyedSet<K, T, F> = KeyedSet<K, T, F, BinaryTree<K, T>>;

/// An owning iterator over the values of a [`KeyedSet`], in key order.
pub type KeyedSetIntoIter<K, T, Tr> = Map<IntoIter<<Tr as Tree<K, T>>::Node>, fn((K, T)) -> T>;

impl<K, T, F, Tr> Clone for KeyedSet<K, T, F, Tr>
where
    F: Clone,
    Tr: Clone,
{
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            key_fn: self.key_fn.clone(),
            _k: PhantomData,
        }
    }
}

impl<K, T, F, Tr> KeyedSet<K, T, F, Tr>
where
    K: Ord,
    F: Fn(&T) -> K,
    Tr: Tree<K, T>,
{
    pub fn new(key_fn: F) -> Self {
        Self::from_tree(Tr::default(), key_fn)
    }

    /// Build a set of `values` keyed by `key_fn`.
    ///
    /// When several values share a key, the last one wins.
    pub fn from_iter_with<I>(key_fn: F, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let tree = Tr::from_entries(values.into_iter().map(|v| (key_fn(&v), v)));
        Self::from_tree(tree, key_fn)
    }

    fn from_tree(tree: Tr, key_fn: F) -> Self {
        Self {
            tree,
            key_fn,
            _k: PhantomData,
        }
    }

    /// The key `value` is stored under.
    pub fn key_of(&self, value: &T) -> K {
        (self.key_fn)(value)
    }

    /// The underlying tree, mapping each key to its value.
    pub fn tree(&self) -> &Tr {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Add `value`, returning the value it replaced if one with an equal key
    /// was already present.
    pub fn add(&mut self, value: T) -> Option<T> {
        let key = self.key_of(&value);
        match self.tree.insert(key, value) {
            Insertion::New(_) => None,
            Insertion::Exists(id, value) => Some(mem::replace(self.tree.value_mut(id), value)),
        }
    }

    /// Remove the value sharing the key of `value`, returning true if there
    /// was one.
    pub fn discard(&mut self, value: &T) -> bool {
        let key = self.key_of(value);
        self.tree.pop(&key).is_some()
    }

    /// Remove and return the value sharing the key of `value`, failing with
    /// [`Error::KeyNotFound`] when there is none.
    pub fn remove(&mut self, value: &T) -> Result<T> {
        let key = self.key_of(value);
        self.remove_key(&key).ok_or(Error::KeyNotFound)
    }

    /// Remove and return the value stored under `key`.
    pub fn remove_key<Q>(&mut self, key: &Q) -> Option<T>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.pop(key).map(|(_, v)| v)
    }

    /// True when a value with the key of `value` is present.
    pub fn contains(&self, value: &T) -> bool {
        self.contains_key(&self.key_of(value))
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(key)
    }

    /// The value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find(key).map(|id| self.tree.value(id))
    }

    pub fn pop_min(&mut self) -> Result<T> {
        self.tree.pop_min().map(|(_, v)| v)
    }

    pub fn pop_max(&mut self) -> Result<T> {
        self.tree.pop_max().map(|(_, v)| v)
    }

    /// The value with the smallest key.
    pub fn min(&self) -> Result<&T> {
        let id = self.tree.min().ok_or(Error::Empty)?;
        Ok(self.tree.value(id))
    }

    /// The value with the largest key.
    pub fn max(&self) -> Result<&T> {
        let id = self.tree.max().ok_or(Error::Empty)?;
        Ok(self.tree.value(id))
    }

    fn neighbour<Q>(&self, key: &Q, which: Neighbour) -> Result<&T>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        neighbour(&self.tree, key, which).map(|id| self.tree.value(id))
    }

    /// The value with the greatest key less than or equal to `key`.
    pub fn floor<Q>(&self, key: &Q) -> Result<&T>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.neighbour(key, Neighbour::Floor)
    }

    /// The value with the least key greater than or equal to `key`.
    pub fn ceil<Q>(&self, key: &Q) -> Result<&T>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.neighbour(key, Neighbour::Ceil)
    }

    /// The value after the one stored under `key`, which must be present.
    pub fn next<Q>(&self, key: &Q) -> Result<&T>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.neighbour(key, Neighbour::Next)
    }

    /// The value before the one stored under `key`, which must be present.
    pub fn prev<Q>(&self, key: &Q) -> Result<&T>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.neighbour(key, Neighbour::Prev)
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Iterate over the values in ascending key order.
    pub fn iter(&self) -> ValuesIter<'_, K, T, Tr> {
        Values::new(&self.tree).iter()
    }

    /// Iterate over the values in descending key order.
    pub fn iter_rev(&self) -> ValuesIter<'_, K, T, Tr> {
        Values::new(&self.tree).rev()
    }

    /// The keys this set's key function derives from the values of `other`.
    fn keys_of<G, U>(&self, other: &KeyedSet<K, T, G, U>) -> AvlTree<K, ()>
    where
        G: Fn(&T) -> K,
        U: Tree<K, T>,
    {
        AvlTree::from_keys(other.iter().map(|v| self.key_of(v)))
    }

    /// True when every key of `self` is the key of some value in `other`.
    ///
    /// The values of `other` are keyed by `self`'s key function.
    pub fn is_subset<G, U>(&self, other: &KeyedSet<K, T, G, U>) -> bool
    where
        G: Fn(&T) -> K,
        U: Tree<K, T>,
    {
        algebra::is_subset(&self.tree, &self.keys_of(other))
    }

    /// True when the key of every value in `other` is in `self`.
    pub fn is_superset<G, U>(&self, other: &KeyedSet<K, T, G, U>) -> bool
    where
        G: Fn(&T) -> K,
        U: Tree<K, T>,
    {
        algebra::is_subset(&self.keys_of(other), &self.tree)
    }

    pub fn is_disjoint<G, U>(&self, other: &KeyedSet<K, T, G, U>) -> bool
    where
        G: Fn(&T) -> K,
        U: Tree<K, T>,
    {
        algebra::is_disjoint(&self.tree, &self.keys_of(other))
    }
}

/// Results are keyed by `self`'s key function, which is applied to the values
/// of `other` before comparing. Where both operands have a value for the same
/// key the result holds `self`'s.
impl<K, T, F, Tr> KeyedSet<K, T, F, Tr>
where
    K: Ord + Clone,
    T: Clone,
    F: Fn(&T) -> K + Clone,
    Tr: Tree<K, T>,
{
    /// The values of `other` re-keyed by this set's key function. Values of
    /// `other` that collide on a key keep the last in `other`'s order.
    fn rekeyed<G, U>(&self, other: &KeyedSet<K, T, G, U>) -> Tr
    where
        G: Fn(&T) -> K,
        U: Tree<K, T>,
    {
        Tr::from_entries(other.iter().map(|v| (self.key_of(v), v.clone())))
    }

    fn with_entries(&self, entries: Vec<(K, T)>) -> Self {
        Self::from_tree(Tr::from_sorted(entries), self.key_fn.clone())
    }

    /// Values whose key is in either set.
    pub fn union<G, U>(&self, other: &KeyedSet<K, T, G, U>) -> Self
    where
        G: Fn(&T) -> K,
        U: Tree<K, T>,
    {
        self.with_entries(algebra::union(&self.tree, &self.rekeyed(other)))
    }

    /// Values of `self` whose key is in both sets.
    pub fn intersection<G, U>(&self, other: &KeyedSet<K, T, G, U>) -> Self
    where
        G: Fn(&T) -> K,
        U: Tree<K, T>,
    {
        self.with_entries(algebra::intersection(&self.tree, &self.rekeyed(other)))
    }

    /// Values of `self` whose key is not in `other`.
    pub fn difference<G, U>(&self, other: &KeyedSet<K, T, G, U>) -> Self
    where
        G: Fn(&T) -> K,
        U: Tree<K, T>,
    {
        self.with_entries(algebra::difference(&self.tree, &self.rekeyed(other)))
    }

    /// Values whose key is in exactly one of the sets.
    pub fn symmetric_difference<G, U>(&self, other: &KeyedSet<K, T, G, U>) -> Self
    where
        G: Fn(&T) -> K,
        U: Tree<K, T>,
    {
        self.with_entries(algebra::symmetric_difference(&self.tree, &self.rekeyed(other)))
    }
}

macro_rules! keyed_set_operator {
    ($trait:ident, $method:ident, $op:ident) => {
        impl<K, T, F, Tr> $trait<&KeyedSet<K, T, F, Tr>> for &KeyedSet<K, T, F, Tr>
        where
            K: Ord + Clone,
            T: Clone,
            F: Fn(&T) -> K + Clone,
            Tr: Tree<K, T>,
        {
            type Output = KeyedSet<K, T, F, Tr>;

            fn $method(self, rhs: &KeyedSet<K, T, F, Tr>) -> Self::Output {
                self.$op(rhs)
            }
        }
    };
}

keyed_set_operator!(BitOr, bitor, union);
keyed_set_operator!(BitAnd, bitand, intersection);
keyed_set_operator!(Sub, sub, difference);
keyed_set_operator!(BitXor, bitxor, symmetric_difference);

impl<K, T, F, Tr> Extend<T> for KeyedSet<K, T, F, Tr>
where
    K: Ord,
    F: Fn(&T) -> K,
    Tr: Tree<K, T>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.add(v);
        }
    }
}

impl<K, T, F, Tr> IntoIterator for KeyedSet<K, T, F, Tr>
where
    K: Ord,
    F: Fn(&T) -> K,
    Tr: Tree<K, T>,
{
    type Item = T;
    type IntoIter = KeyedSetIntoIter<K, T, Tr>;

    fn into_iter(self) -> Self::IntoIter {
        let f: fn((K, T)) -> T = |(_, v)| v;
        self.tree.into_entries().map(f)
    }
}

impl<'a, K, T, F, Tr> IntoIterator for &'a KeyedSet<K, T, F, Tr>
where
    K: Ord + 'a,
    T: 'a,
    F: Fn(&T) -> K,
    Tr: Tree<K, T>,
{
    type Item = &'a T;
    type IntoIter = ValuesIter<'a, K, T, Tr>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Keyed sets are equal when they hold equal values under the same keys.
impl<K, T, F, G, Tr, U> PartialEq<KeyedSet<K, T, G, U>> for KeyedSet<K, T, F, Tr>
where
    K: Ord,
    T: PartialEq,
    F: Fn(&T) -> K,
    G: Fn(&T) -> K,
    Tr: Tree<K, T>,
    U: Tree<K, T>,
{
    fn eq(&self, other: &KeyedSet<K, T, G, U>) -> bool {
        self.len() == other.len() && self.tree.iter().eq(other.tree.iter())
    }
}

impl<K, T, F, Tr> Debug for KeyedSet<K, T, F, Tr>
where
    K: Ord,
    T: Debug,
    F: Fn(&T) -> K,
    Tr: Tree<K, T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
