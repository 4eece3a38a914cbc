use std::{fmt::Debug, mem};

use crate::{arena::NodeId, map::TreeMap, tree::Tree};

/// The slot for one key of a [`TreeMap`], returned by [`TreeMap::entry()`].
///
/// The lookup is made once when the entry is created. An occupied entry
/// remembers the node holding the key, and a vacant one owns the key until a
/// value is supplied for it.
pub enum Entry<'a, K, V, T>
where
    K: Ord,
    T: Tree<K, V>,
{
    Vacant(VacantEntry<'a, K, V, T>),
    Occupied(OccupiedEntry<'a, K, V, T>),
}

/// A key with no value in the map yet.
pub struct VacantEntry<'a, K, V, T>
where
    K: Ord,
    T: Tree<K, V>,
{
    key: K,
    map: &'a mut TreeMap<K, V, T>,
}

/// A key already present in the map, addressed by the node that holds it.
pub struct OccupiedEntry<'a, K, V, T>
where
    K: Ord,
    T: Tree<K, V>,
{
    id: NodeId,
    map: &'a mut TreeMap<K, V, T>,
}

impl<'a, K, V, T> VacantEntry<'a, K, V, T>
where
    K: Ord,
    T: Tree<K, V>,
{
    /// The key a value would be stored under.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Give up the slot and get the key back, leaving the map unchanged.
    #[inline]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Store `value` under the key, borrowing it back for the lifetime of the
    /// map borrow.
    #[inline]
    pub fn insert(self, value: V) -> &'a mut V {
        self.insert_entry(value).into_mut()
    }

    fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V, T> {
        let id = self.map.tree_mut().insert(self.key, value).node();
        OccupiedEntry { id, map: self.map }
    }
}

impl<'a, K, V, T> OccupiedEntry<'a, K, V, T>
where
    K: Ord,
    T: Tree<K, V>,
{
    /// The key as stored in the map.
    #[inline]
    pub fn key(&self) -> &K {
        self.map.tree().key(self.id)
    }

    #[inline]
    pub fn get(&self) -> &V {
        self.map.tree().value(self.id)
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut V {
        self.map.tree_mut().value_mut(self.id)
    }

    /// Like [`OccupiedEntry::get_mut()`], but tied to the map borrow rather
    /// than to the entry.
    #[inline]
    pub fn into_mut(self) -> &'a mut V {
        self.map.tree_mut().value_mut(self.id)
    }

    /// Overwrite the value, keeping the stored key, and return the previous
    /// value.
    #[inline]
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Unlink the node and return its value.
    #[inline]
    pub fn remove(self) -> V {
        self.remove_entry().1
    }

    /// Unlink the node and return both halves of it.
    #[inline]
    pub fn remove_entry(self) -> (K, V) {
        self.map.tree_mut().remove(self.id)
    }
}

impl<'a, K, V, T> Entry<'a, K, V, T>
where
    K: Ord,
    T: Tree<K, V>,
{
    pub(crate) fn new(key: K, map: &'a mut TreeMap<K, V, T>) -> Self {
        match map.tree().find(&key) {
            Some(id) => Entry::Occupied(OccupiedEntry { id, map }),
            None => Entry::Vacant(VacantEntry { key, map }),
        }
    }

    /// The key this entry was created for, or the stored key if it was
    /// already present.
    #[inline]
    pub fn key(&self) -> &K {
        match self {
            Entry::Vacant(entry) => entry.key(),
            Entry::Occupied(entry) => entry.key(),
        }
    }

    /// Borrow the value under the key, storing `default` first if the key is
    /// absent.
    ///
    /// Counting words:
    ///
    /// ```
    /// use arboretum::TreeMap;
    ///
    /// let mut counts: TreeMap<&str, usize> = TreeMap::new();
    /// for word in "the cat saw the dog".split(' ') {
    ///     *counts.entry(word).or_insert(0) += 1;
    /// }
    ///
    /// assert_eq!(counts.get("the"), Some(&2));
    /// assert_eq!(counts.get("cat"), Some(&1));
    /// assert_eq!(counts.len(), 4);
    /// ```
    #[inline]
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// As [`Entry::or_insert()`], but `default` only runs when the key is
    /// absent.
    ///
    /// ```
    /// use arboretum::TreeMap;
    ///
    /// // Group names by their first letter.
    /// let mut groups: TreeMap<char, Vec<&str>> = TreeMap::new();
    /// for name in ["ada", "bob", "alan"] {
    ///     let initial = name.chars().next().unwrap();
    ///     groups.entry(initial).or_insert_with(Vec::new).push(name);
    /// }
    ///
    /// assert_eq!(groups.get(&'a'), Some(&vec!["ada", "alan"]));
    /// assert_eq!(groups.get(&'b'), Some(&vec!["bob"]));
    /// ```
    #[inline]
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// As [`Entry::or_insert_with()`], with the key passed to `default`.
    ///
    /// ```
    /// use arboretum::TreeMap;
    ///
    /// // Memoise the square of each key on first use.
    /// let mut squares: TreeMap<u64, u64> = TreeMap::new();
    /// assert_eq!(*squares.entry(12).or_insert_with_key(|n| n * n), 144);
    ///
    /// squares.insert(12, 0);
    /// assert_eq!(*squares.entry(12).or_insert_with_key(|n| n * n), 0);
    /// ```
    #[inline]
    pub fn or_insert_with_key<F: FnOnce(&K) -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let value = default(entry.key());
                entry.insert(value)
            }
        }
    }

    /// Run `f` on the value if the key is present. Vacant entries pass
    /// through untouched.
    ///
    /// ```
    /// use arboretum::TreeMap;
    ///
    /// // Restock an inventory, adding new lines as needed.
    /// let mut stock: TreeMap<&str, u32> = TreeMap::new();
    /// stock.insert("bolts", 40);
    ///
    /// for (item, qty) in [("bolts", 10), ("nuts", 25)] {
    ///     stock.entry(item).and_modify(|n| *n += qty).or_insert(qty);
    /// }
    ///
    /// assert_eq!(stock.get("bolts"), Some(&50));
    /// assert_eq!(stock.get("nuts"), Some(&25));
    /// ```
    #[inline]
    pub fn and_modify<F: FnOnce(&mut V)>(mut self, f: F) -> Self {
        if let Entry::Occupied(entry) = &mut self {
            f(entry.get_mut());
        }
        self
    }

    /// Store `value` under the key whether or not one was already there, and
    /// keep hold of the now occupied entry.
    ///
    /// ```
    /// use arboretum::TreeMap;
    ///
    /// let mut prices: TreeMap<&str, u32> = TreeMap::new();
    /// prices.insert("tea", 3);
    ///
    /// let entry = prices.entry("tea").insert_entry(4);
    /// assert_eq!(entry.remove_entry(), ("tea", 4));
    /// assert_eq!(prices.len(), 0);
    /// ```
    #[inline]
    pub fn insert_entry(self, value: V) -> OccupiedEntry<'a, K, V, T> {
        match self {
            Entry::Occupied(mut entry) => {
                entry.insert(value);
                entry
            }
            Entry::Vacant(entry) => entry.insert_entry(value),
        }
    }
}

impl<'a, K, V, T> Entry<'a, K, V, T>
where
    K: Ord,
    V: Default,
    T: Tree<K, V>,
{
    /// Borrow the value under the key, storing `V::default()` first if the
    /// key is absent.
    ///
    /// ```
    /// use arboretum::TreeMap;
    ///
    /// let mut tags: TreeMap<u32, Vec<&str>> = TreeMap::new();
    /// tags.entry(7).or_default().push("urgent");
    /// tags.entry(7).or_default().push("billing");
    ///
    /// assert_eq!(tags.get(&7), Some(&vec!["urgent", "billing"]));
    /// ```
    #[inline]
    pub fn or_default(self) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(V::default()),
        }
    }
}

impl<K, V, T> Debug for Entry<'_, K, V, T>
where
    K: Ord + Debug,
    V: Debug,
    T: Tree<K, V>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entry::Vacant(v) => f.debug_tuple("Entry").field(v).finish(),
            Entry::Occupied(v) => f.debug_tuple("Entry").field(v).finish(),
        }
    }
}

impl<K, V, T> Debug for VacantEntry<'_, K, V, T>
where
    K: Ord + Debug,
    T: Tree<K, V>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("VacantEntry").field(self.key()).finish()
    }
}

impl<K, V, T> Debug for OccupiedEntry<'_, K, V, T>
where
    K: Ord + Debug,
    V: Debug,
    T: Tree<K, V>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OccupiedEntry")
            .field("key", self.key())
            .field("value", self.get())
            .finish()
    }
}
