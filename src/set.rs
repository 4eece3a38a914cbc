use std::{
    borrow::Borrow,
    cmp::Ordering,
    fmt::Debug,
    iter::Map,
    marker::PhantomData,
    ops::{BitAnd, BitOr, BitXor, Sub},
};

use crate::{
    algebra,
    error::{Error, Neighbour, Result},
    iter::IntoIter,
    tree::{neighbour, Tree},
    view::{Keys, KeysIter},
    AvlTree, BinaryTree, RbTree, SplayTree,
};

/// An ordered set of unique elements backed by the tree strategy `Tr`.
///
/// ```
/// use arboretum::TreeSet;
///
/// let a: TreeSet<u32> = [1, 2, 3].into_iter().collect();
/// let b: TreeSet<u32> = [2, 3, 4].into_iter().collect();
///
/// let both: TreeSet<u32> = [2, 3].into_iter().collect();
///
/// assert_eq!(&a & &b, both);
/// assert!(both <= a);
/// assert!(both <= b);
/// ```
pub struct TreeSet<T, Tr = AvlTree<T, ()>> {
    tree: Tr,
    _t: PhantomData<fn() -> T>,
}

pub type AvlSet<T> = TreeSet<T, AvlTree<T, ()>>;
pub type RbSet<T> = TreeSet<T, RbTree<T, ()>>;
pub type SplaySet<T> = TreeSet<T, SplayTree<T, ()>>;
pub type BinarySet<T> = TreeSet<T, BinaryTree<T, ()>>;

/// An iterator over the elements of a [`TreeSet`].
pub type SetIter<'a, T, Tr> = KeysIter<'a, T, (), Tr>;

/// An owning iterator over the elements of a [`TreeSet`], in ascending order.
pub type SetIntoIter<T, Tr> = Map<IntoIter<<Tr as Tree<T, ()>>::Node>, fn((T, ())) -> T>;

impl<T, Tr> Default for TreeSet<T, Tr>
where
    Tr: Default,
{
    fn default() -> Self {
        Self {
            tree: Tr::default(),
            _t: PhantomData,
        }
    }
}

impl<T, Tr> Clone for TreeSet<T, Tr>
where
    Tr: Clone,
{
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            _t: PhantomData,
        }
    }
}

impl<T, Tr> TreeSet<T, Tr>
where
    T: Ord,
    Tr: Tree<T, ()>,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn from_tree(tree: Tr) -> Self {
        Self {
            tree,
            _t: PhantomData,
        }
    }

    /// The underlying tree.
    pub fn tree(&self) -> &Tr {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Add `value`, returning true if it was not already present.
    ///
    /// Adding an element equal to one already present replaces the stored
    /// element with `value`.
    pub fn add(&mut self, value: T) -> bool {
        let existed = self.tree.pop(&value).is_some();
        self.tree.insert(value, ());
        !existed
    }

    /// Remove `value` if present, returning true if it was.
    pub fn discard<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.pop(value).is_some()
    }

    /// Remove and return the stored element equal to `value`, failing with
    /// [`Error::KeyNotFound`] when it is absent.
    pub fn remove<Q>(&mut self, value: &Q) -> Result<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree
            .pop(value)
            .map(|(v, _)| v)
            .ok_or(Error::KeyNotFound)
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(value)
    }

    pub fn pop_min(&mut self) -> Result<T> {
        self.tree.pop_min().map(|(v, _)| v)
    }

    pub fn pop_max(&mut self) -> Result<T> {
        self.tree.pop_max().map(|(v, _)| v)
    }

    pub fn min(&self) -> Result<&T> {
        let id = self.tree.min().ok_or(Error::Empty)?;
        Ok(self.tree.key(id))
    }

    pub fn max(&self) -> Result<&T> {
        let id = self.tree.max().ok_or(Error::Empty)?;
        Ok(self.tree.key(id))
    }

    fn neighbour<Q>(&self, value: &Q, which: Neighbour) -> Result<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        neighbour(&self.tree, value, which).map(|id| self.tree.key(id))
    }

    /// The greatest element less than or equal to `value`.
    pub fn floor<Q>(&self, value: &Q) -> Result<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.neighbour(value, Neighbour::Floor)
    }

    /// The least element greater than or equal to `value`.
    pub fn ceil<Q>(&self, value: &Q) -> Result<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.neighbour(value, Neighbour::Ceil)
    }

    /// The element immediately after `value`, which must be in the set.
    pub fn next<Q>(&self, value: &Q) -> Result<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.neighbour(value, Neighbour::Next)
    }

    /// The element immediately before `value`, which must be in the set.
    pub fn prev<Q>(&self, value: &Q) -> Result<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.neighbour(value, Neighbour::Prev)
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Iterate over the elements in ascending order.
    pub fn iter(&self) -> SetIter<'_, T, Tr> {
        Keys::new(&self.tree).iter()
    }

    /// Iterate over the elements in descending order.
    pub fn iter_rev(&self) -> SetIter<'_, T, Tr> {
        Keys::new(&self.tree).rev()
    }

    /// True when every element of `self` is in `other`.
    pub fn is_subset<U>(&self, other: &TreeSet<T, U>) -> bool
    where
        U: Tree<T, ()>,
    {
        algebra::is_subset(&self.tree, &other.tree)
    }

    /// True when every element of `other` is in `self`.
    pub fn is_superset<U>(&self, other: &TreeSet<T, U>) -> bool
    where
        U: Tree<T, ()>,
    {
        other.is_subset(self)
    }

    pub fn is_disjoint<U>(&self, other: &TreeSet<T, U>) -> bool
    where
        U: Tree<T, ()>,
    {
        algebra::is_disjoint(&self.tree, &other.tree)
    }
}

impl<T, Tr> TreeSet<T, Tr>
where
    T: Ord + Clone,
    Tr: Tree<T, ()>,
{
    /// Elements in either set.
    pub fn union<U>(&self, other: &TreeSet<T, U>) -> Self
    where
        U: Tree<T, ()>,
    {
        Self::from_tree(Tr::from_sorted(algebra::union(&self.tree, &other.tree)))
    }

    /// Elements in both sets.
    pub fn intersection<U>(&self, other: &TreeSet<T, U>) -> Self
    where
        U: Tree<T, ()>,
    {
        Self::from_tree(Tr::from_sorted(algebra::intersection(
            &self.tree,
            &other.tree,
        )))
    }

    /// Elements in `self` but not in `other`.
    pub fn difference<U>(&self, other: &TreeSet<T, U>) -> Self
    where
        U: Tree<T, ()>,
    {
        Self::from_tree(Tr::from_sorted(algebra::difference(&self.tree, &other.tree)))
    }

    /// Elements in exactly one of the sets.
    pub fn symmetric_difference<U>(&self, other: &TreeSet<T, U>) -> Self
    where
        U: Tree<T, ()>,
    {
        Self::from_tree(Tr::from_sorted(algebra::symmetric_difference(
            &self.tree,
            &other.tree,
        )))
    }
}

macro_rules! set_operator {
    ($trait:ident, $method:ident, $op:ident) => {
        impl<T, Tr> $trait<&TreeSet<T, Tr>> for &TreeSet<T, Tr>
        where
            T: Ord + Clone,
            Tr: Tree<T, ()>,
        {
            type Output = TreeSet<T, Tr>;

            fn $method(self, rhs: &TreeSet<T, Tr>) -> Self::Output {
                self.$op(rhs)
            }
        }
    };
}

set_operator!(BitOr, bitor, union);
set_operator!(BitAnd, bitand, intersection);
set_operator!(Sub, sub, difference);
set_operator!(BitXor, bitxor, symmetric_difference);

impl<T, Tr> FromIterator<T> for TreeSet<T, Tr>
where
    T: Ord,
    Tr: Tree<T, ()>,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_tree(Tr::from_entries(iter.into_iter().map(|v| (v, ()))))
    }
}

impl<T, Tr> Extend<T> for TreeSet<T, Tr>
where
    T: Ord,
    Tr: Tree<T, ()>,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.add(v);
        }
    }
}

impl<T, Tr> IntoIterator for TreeSet<T, Tr>
where
    T: Ord,
    Tr: Tree<T, ()>,
{
    type Item = T;
    type IntoIter = SetIntoIter<T, Tr>;

    fn into_iter(self) -> Self::IntoIter {
        let f: fn((T, ())) -> T = |(v, _)| v;
        self.tree.into_entries().map(f)
    }
}

impl<'a, T, Tr> IntoIterator for &'a TreeSet<T, Tr>
where
    T: Ord + 'a,
    Tr: Tree<T, ()>,
{
    type Item = &'a T;
    type IntoIter = SetIter<'a, T, Tr>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, Tr, U> PartialEq<TreeSet<T, U>> for TreeSet<T, Tr>
where
    T: Ord,
    Tr: Tree<T, ()>,
    U: Tree<T, ()>,
{
    fn eq(&self, other: &TreeSet<T, U>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, Tr> Eq for TreeSet<T, Tr>
where
    T: Ord,
    Tr: Tree<T, ()>,
{
}

/// Sets are ordered by inclusion: `a <= b` holds when `a` is a subset of `b`,
/// and two sets neither of which contains the other are incomparable.
impl<T, Tr, U> PartialOrd<TreeSet<T, U>> for TreeSet<T, Tr>
where
    T: Ord,
    Tr: Tree<T, ()>,
    U: Tree<T, ()>,
{
    fn partial_cmp(&self, other: &TreeSet<T, U>) -> Option<Ordering> {
        match self.len().cmp(&other.len()) {
            Ordering::Equal => (self == other).then_some(Ordering::Equal),
            Ordering::Less => self.is_subset(other).then_some(Ordering::Less),
            Ordering::Greater => self.is_superset(other).then_some(Ordering::Greater),
        }
    }
}

impl<T, Tr> Debug for TreeSet<T, Tr>
where
    T: Ord + Debug,
    Tr: Tree<T, ()>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
