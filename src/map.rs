use std::{
    borrow::Borrow,
    fmt::Debug,
    marker::PhantomData,
    mem,
    ops::Index,
};

use crate::{
    entry::Entry,
    error::{Error, Neighbour, Result},
    iter::{IntoIter, Iter},
    tree::{neighbour, Insertion, Tree},
    view::{Items, Keys, Values},
    AvlTree, BinaryTree, RbTree, SplayTree,
};

/// An ordered map backed by the tree strategy `T`.
///
/// Keys are unique and kept in ascending order; every lookup, insert and
/// removal is O(log n) for the balanced strategies (amortised for
/// [`SplayTree`]).
///
/// ```
/// use arboretum::{Neighbour, Error, TreeMap};
///
/// let mut map: TreeMap<u32, char> = TreeMap::new();
/// map.insert(1, 'a');
/// map.insert(5, 'b');
/// map.insert(9, 'c');
///
/// assert_eq!(map.floor(&6), Ok(&'b'));
/// assert_eq!(map.ceil(&6), Ok(&'c'));
/// assert_eq!(map.floor(&0), Err(Error::NoNeighbour(Neighbour::Floor)));
/// ```
pub struct TreeMap<K, V, T = AvlTree<K, V>> {
    tree: T,
    _kv: PhantomData<fn() -> (K, V)>,
}

pub type AvlMap<K, V> = TreeMap<K, V, AvlTree<K, V>>;
pub type RbMap<K, V> = TreeMap<K, V, RbTree<K, V>>;
pub type SplayMap<K, V> = TreeMap<K, V, SplayTree<K, V>>;
pub type BinaryMap<K, V> = TreeMap<K, V, BinaryTree<K, V>>;

impl<K, V, T> Default for TreeMap<K, V, T>
where
    T: Default,
{
    fn default() -> Self {
        Self {
            tree: T::default(),
            _kv: PhantomData,
        }
    }
}

impl<K, V, T> Clone for TreeMap<K, V, T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            _kv: PhantomData,
        }
    }
}

impl<K, V, T> TreeMap<K, V, T>
where
    K: Ord,
    T: Tree<K, V>,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map pairing each of `keys` with the value at the same position
    /// in `values`.
    ///
    /// Pairing stops at the end of the shorter sequence. When a key repeats,
    /// the value paired with its last occurrence wins.
    pub fn from_components<I, J>(keys: I, values: J) -> Self
    where
        I: IntoIterator<Item = K>,
        J: IntoIterator<Item = V>,
    {
        Self::from_tree(T::from_components(keys, values))
    }

    pub(crate) fn from_tree(tree: T) -> Self {
        Self {
            tree,
            _kv: PhantomData,
        }
    }

    /// The underlying tree.
    pub fn tree(&self) -> &T {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut T {
        &mut self.tree
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find(key).map(|id| self.tree.value(id))
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.tree.find(key)?;
        Some(self.tree.value_mut(id))
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.find(key).map(|id| self.tree.entry(id))
    }

    /// Like [`TreeMap::get()`], failing with [`Error::KeyNotFound`] when
    /// `key` is absent.
    pub fn try_get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Return the value for `key`, or `default` when it is absent.
    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(key)
    }

    /// Insert `value` for `key`, returning the value it replaced, if any.
    ///
    /// When `key` is already present only its value is replaced; the stored
    /// key is kept.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.tree.insert(key, value) {
            Insertion::New(_) => None,
            Insertion::Exists(id, value) => Some(mem::replace(self.tree.value_mut(id), value)),
        }
    }

    /// Return the value for `key`, inserting `default` first if `key` is
    /// absent.
    pub fn setdefault(&mut self, key: K, default: V) -> &mut V {
        // Inserting an existing key leaves its value untouched.
        let id = self.tree.insert(key, default).node();
        self.tree.value_mut(id)
    }

    /// Insert every pair in `entries`, overwriting existing values.
    pub fn update<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in entries {
            self.insert(key, value);
        }
    }

    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, T> {
        Entry::new(key, self)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.pop(key)
    }

    /// Remove and return the value for `key`, failing with
    /// [`Error::KeyNotFound`] when it is absent.
    pub fn pop<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove(key).ok_or(Error::KeyNotFound)
    }

    /// Remove and return the value for `key`, or return `default` when it is
    /// absent.
    pub fn pop_or<Q>(&mut self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove(key).unwrap_or(default)
    }

    pub fn pop_min(&mut self) -> Result<(K, V)> {
        self.tree.pop_min()
    }

    pub fn pop_max(&mut self) -> Result<(K, V)> {
        self.tree.pop_max()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub fn min_key(&self) -> Result<&K> {
        self.min_item().map(|(k, _)| k)
    }

    pub fn max_key(&self) -> Result<&K> {
        self.max_item().map(|(k, _)| k)
    }

    pub fn min_item(&self) -> Result<(&K, &V)> {
        let id = self.tree.min().ok_or(Error::Empty)?;
        Ok(self.tree.entry(id))
    }

    pub fn max_item(&self) -> Result<(&K, &V)> {
        let id = self.tree.max().ok_or(Error::Empty)?;
        Ok(self.tree.entry(id))
    }

    fn neighbour_item<Q>(&self, key: &Q, which: Neighbour) -> Result<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        neighbour(&self.tree, key, which).map(|id| self.tree.entry(id))
    }

    /// The entry with the greatest key less than or equal to `key`.
    pub fn floor_item<Q>(&self, key: &Q) -> Result<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.neighbour_item(key, Neighbour::Floor)
    }

    pub fn floor_key<Q>(&self, key: &Q) -> Result<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.floor_item(key).map(|(k, _)| k)
    }

    pub fn floor<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.floor_item(key).map(|(_, v)| v)
    }

    /// The entry with the least key greater than or equal to `key`.
    pub fn ceil_item<Q>(&self, key: &Q) -> Result<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.neighbour_item(key, Neighbour::Ceil)
    }

    pub fn ceil_key<Q>(&self, key: &Q) -> Result<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.ceil_item(key).map(|(k, _)| k)
    }

    pub fn ceil<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.ceil_item(key).map(|(_, v)| v)
    }

    /// The entry immediately after the existing `key`.
    ///
    /// Fails with [`Error::KeyNotFound`] if `key` is not in the map, and with
    /// [`Error::NoNeighbour`] if it is the largest key.
    pub fn next_item<Q>(&self, key: &Q) -> Result<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.neighbour_item(key, Neighbour::Next)
    }

    pub fn next_key<Q>(&self, key: &Q) -> Result<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.next_item(key).map(|(k, _)| k)
    }

    pub fn next<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.next_item(key).map(|(_, v)| v)
    }

    /// The entry immediately before the existing `key`.
    ///
    /// Fails with [`Error::KeyNotFound`] if `key` is not in the map, and with
    /// [`Error::NoNeighbour`] if it is the smallest key.
    pub fn prev_item<Q>(&self, key: &Q) -> Result<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.neighbour_item(key, Neighbour::Prev)
    }

    pub fn prev_key<Q>(&self, key: &Q) -> Result<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.prev_item(key).map(|(k, _)| k)
    }

    pub fn prev<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.prev_item(key).map(|(_, v)| v)
    }

    /// Iterate over the entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V, T> {
        self.tree.iter()
    }

    /// Iterate over the entries in descending key order.
    pub fn iter_rev(&self) -> Iter<'_, K, V, T> {
        self.tree.iter_rev()
    }

    pub fn keys(&self) -> Keys<'_, K, V, T> {
        Keys::new(&self.tree)
    }

    pub fn values(&self) -> Values<'_, K, V, T> {
        Values::new(&self.tree)
    }

    pub fn items(&self) -> Items<'_, K, V, T> {
        Items::new(&self.tree)
    }
}

impl<K, V, T, Q> Index<&Q> for TreeMap<K, V, T>
where
    K: Ord + Borrow<Q>,
    Q: Ord + ?Sized,
    T: Tree<K, V>,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if `key` is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not found")
    }
}

impl<K, V, T> FromIterator<(K, V)> for TreeMap<K, V, T>
where
    K: Ord,
    T: Tree<K, V>,
{
    /// Later pairs overwrite earlier ones sharing a key.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_tree(T::from_entries(iter))
    }
}

impl<K, V, T> Extend<(K, V)> for TreeMap<K, V, T>
where
    K: Ord,
    T: Tree<K, V>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.update(iter);
    }
}

impl<K, V, T> IntoIterator for TreeMap<K, V, T>
where
    K: Ord,
    T: Tree<K, V>,
{
    type Item = (K, V);
    type IntoIter = IntoIter<T::Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_entries()
    }
}

impl<'a, K, V, T> IntoIterator for &'a TreeMap<K, V, T>
where
    K: Ord + 'a,
    V: 'a,
    T: Tree<K, V>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Maps are equal when they hold the same entries, regardless of the strategy
/// backing each.
impl<K, V, T, U> PartialEq<TreeMap<K, V, U>> for TreeMap<K, V, T>
where
    K: Ord,
    V: PartialEq,
    T: Tree<K, V>,
    U: Tree<K, V>,
{
    fn eq(&self, other: &TreeMap<K, V, U>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K, V, T> Eq for TreeMap<K, V, T>
where
    K: Ord,
    V: Eq,
    T: Tree<K, V>,
{
}

impl<K, V, T> Debug for TreeMap<K, V, T>
where
    K: Ord + Debug,
    V: Debug,
    T: Tree<K, V>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;

    use super::*;
    use crate::test_utils::{arbitrary_op, Op};

    #[test]
    fn test_insert_overwrites() {
        let mut m = AvlMap::new();

        assert_eq!(m.insert(1, "a"), None);
        assert_eq!(m.insert(1, "b"), Some("a"));
        assert_eq!(m.get(&1), Some(&"b"));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_lookup() {
        let m = AvlMap::from_components(["a", "b", "c"], [1, 2, 3]);

        assert_eq!(m.get("b"), Some(&2));
        assert_eq!(m.get("z"), None);
        assert_eq!(m.try_get("b"), Ok(&2));
        assert_eq!(m.try_get("z"), Err(Error::KeyNotFound));
        assert_eq!(m.get_or("z", &42), &42);
        assert_eq!(m["c"], 3);
        assert!(m.contains_key("a"));
        assert!(!m.contains_key("d"));
        assert_eq!(m.get_key_value("a"), Some((&"a", &1)));
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn test_index_missing() {
        let m = AvlMap::<u8, u8>::new();
        let _ = m[&1];
    }

    #[test]
    fn test_get_mut() {
        let mut m = RbMap::from_iter([(1, 10), (2, 20)]);

        *m.get_mut(&2).unwrap() += 1;
        assert_eq!(m.get(&2), Some(&21));
        assert_eq!(m.get_mut(&3), None);
    }

    #[test]
    fn test_floor_ceil() {
        let m = AvlMap::from_iter([(1, 'a'), (5, 'b'), (9, 'c')]);

        assert_eq!(m.floor(&6), Ok(&'b'));
        assert_eq!(m.ceil(&6), Ok(&'c'));
        assert_eq!(m.floor(&5), Ok(&'b'));
        assert_eq!(m.ceil(&5), Ok(&'b'));
        assert_eq!(m.floor(&0), Err(Error::NoNeighbour(Neighbour::Floor)));
        assert_eq!(m.ceil(&10), Err(Error::NoNeighbour(Neighbour::Ceil)));

        assert_eq!(m.floor_key(&100), Ok(&9));
        assert_eq!(m.ceil_item(&2), Ok((&5, &'b')));
    }

    #[test]
    fn test_next_prev() {
        let m = SplayMap::from_iter([(1, 'a'), (5, 'b'), (9, 'c')]);

        assert_eq!(m.next(&1), Ok(&'b'));
        assert_eq!(m.next_key(&5), Ok(&9));
        assert_eq!(m.prev_item(&5), Ok((&1, &'a')));
        assert_eq!(m.prev_key(&9), Ok(&5));

        assert_eq!(m.next(&9), Err(Error::NoNeighbour(Neighbour::Next)));
        assert_eq!(m.prev(&1), Err(Error::NoNeighbour(Neighbour::Prev)));

        // The query key must exist.
        assert_eq!(m.next(&4), Err(Error::KeyNotFound));
        assert_eq!(m.prev(&4), Err(Error::KeyNotFound));
    }

    #[test]
    fn test_extremes() {
        let mut m = BinaryMap::new();
        assert_eq!(m.min_key(), Err(Error::Empty));
        assert_eq!(m.max_item(), Err(Error::Empty));
        assert_eq!(m.pop_min(), Err(Error::Empty));
        assert_eq!(m.pop_max(), Err(Error::Empty));

        m.update([(3, "c"), (1, "a"), (2, "b")]);
        assert_eq!(m.min_key(), Ok(&1));
        assert_eq!(m.max_key(), Ok(&3));
        assert_eq!(m.min_item(), Ok((&1, &"a")));
        assert_eq!(m.max_item(), Ok((&3, &"c")));

        assert_eq!(m.pop_min(), Ok((1, "a")));
        assert_eq!(m.pop_max(), Ok((3, "c")));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_pop() {
        let mut m = AvlMap::from_iter([(1, 10), (2, 20)]);

        assert_eq!(m.pop(&1), Ok(10));
        assert_eq!(m.pop(&1), Err(Error::KeyNotFound));
        assert_eq!(m.pop_or(&1, 99), 99);
        assert_eq!(m.pop_or(&2, 99), 20);
        assert_eq!(m.remove(&2), None);
        assert!(m.is_empty());
    }

    #[test]
    fn test_setdefault() {
        let mut m = AvlMap::new();

        assert_eq!(*m.setdefault("a", 1), 1);
        *m.setdefault("a", 2) += 10;
        assert_eq!(m.get("a"), Some(&11));
    }

    #[test]
    fn test_update_extend() {
        let mut m = RbMap::from_iter([(1, 'a'), (2, 'b')]);

        m.update([(2, 'x'), (3, 'c')]);
        m.extend([(4, 'd'), (1, 'y')]);

        let got = m.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>();
        assert_eq!(got, [(1, 'y'), (2, 'x'), (3, 'c'), (4, 'd')]);
    }

    #[test]
    fn test_views() {
        let m = AvlMap::from_iter([(2, "b"), (1, "a"), (3, "c")]);

        let keys = m.keys();
        assert_eq!(keys.len(), 3);
        assert!(!keys.is_empty());
        assert!(keys.contains(&2));
        assert!(!keys.contains(&4));
        assert_eq!(keys.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(keys.rev().copied().collect::<Vec<_>>(), [3, 2, 1]);

        // A view can be iterated repeatedly.
        assert_eq!(keys.into_iter().count(), 3);
        assert_eq!(keys.into_iter().count(), 3);

        assert_eq!(m.values().iter().copied().collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(m.items().rev().next(), Some((&3, &"c")));
        assert_eq!(format!("{:?}", m.keys()), "[1, 2, 3]");
    }

    #[test]
    fn test_into_iter() {
        let m = SplayMap::from_iter([(2, "b"), (1, "a")]);

        let borrowed = (&m).into_iter().map(|(k, _)| *k).collect::<Vec<_>>();
        assert_eq!(borrowed, [1, 2]);

        let owned = m.into_iter().collect::<Vec<_>>();
        assert_eq!(owned, [(1, "a"), (2, "b")]);
    }

    #[test]
    fn test_eq_across_strategies() {
        let a = AvlMap::from_iter([(1, 1), (2, 2)]);
        let b = SplayMap::from_iter([(2, 2), (1, 1)]);
        let c = RbMap::from_iter([(1, 1), (2, 3)]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.clone(), a);
        assert_eq!(format!("{a:?}"), "{1: 1, 2: 2}");
    }

    macro_rules! map_model_tests {
        ($name:ident, $map:ident) => {
            paste::paste! {
                proptest! {
                    /// The map behaves like [`BTreeMap`] under arbitrary
                    /// operation sequences.
                    #[test]
                    fn [<prop_model_ $name>](
                        ops in prop::collection::vec(arbitrary_op(), 1..100),
                    ) {
                        let mut m = $map::new();
                        let mut model = BTreeMap::new();

                        for op in ops {
                            match op {
                                Op::Insert(k, v) => {
                                    assert_eq!(m.insert(k, v), model.insert(k, v));
                                }
                                Op::Find(k) => {
                                    assert_eq!(m.get(&k), model.get(&k));
                                }
                                Op::Pop(k) => {
                                    assert_eq!(m.pop(&k).ok(), model.remove(&k));
                                }
                                Op::PopMin => {
                                    assert_eq!(m.pop_min().ok(), model.pop_first());
                                }
                                Op::PopMax => {
                                    assert_eq!(m.pop_max().ok(), model.pop_last());
                                }
                            }
                            assert_eq!(m.len(), model.len());
                        }

                        assert!(m.iter().eq(model.iter()));
                    }
                }
            }
        };
    }

    map_model_tests!(avl, AvlMap);
    map_model_tests!(rb, RbMap);
    map_model_tests!(splay, SplayMap);
    map_model_tests!(binary, BinaryMap);
}
