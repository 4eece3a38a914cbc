//! Set algebra over the ordered contents of two trees.
//!
//! Each operation reads its operands through the [`Tree`] navigation contract
//! only, and returns the strictly ascending entries of the result ready for
//! [`Tree::from_sorted()`]. Where both operands hold an equal key, the entry
//! of the left operand (`a`) is kept.

use std::cmp::Ordering;

use crate::tree::Tree;

/// Merge the in-order walks of `a` and `b`, passing every entry to `emit`
/// along with where it was found.
fn merge<'a, K, V, A, B, F>(a: &'a A, b: &'a B, mut emit: F)
where
    K: Ord + 'a,
    V: 'a,
    A: Tree<K, V>,
    B: Tree<K, V>,
    F: FnMut(Side, (&'a K, &'a V)),
{
    let mut left = a.iter().peekable();
    let mut right = b.iter().peekable();

    loop {
        let side = match (left.peek(), right.peek()) {
            (None, None) => return,
            (Some(_), None) => Side::Left,
            (None, Some(_)) => Side::Right,
            (Some((l, _)), Some((r, _))) => match l.cmp(r) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => Side::Both,
            },
        };

        let entry = match side {
            Side::Left => left.next(),
            Side::Right => right.next(),
            Side::Both => {
                right.next();
                left.next()
            }
        };
        if let Some(entry) = entry {
            emit(side, entry);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
    Both,
}

fn cloned<K: Clone, V: Clone>((k, v): (&K, &V)) -> (K, V) {
    (k.clone(), v.clone())
}

/// Every entry in either operand.
pub(crate) fn union<K, V, A, B>(a: &A, b: &B) -> Vec<(K, V)>
where
    K: Ord + Clone,
    V: Clone,
    A: Tree<K, V>,
    B: Tree<K, V>,
{
    let mut out = Vec::with_capacity(a.len().max(b.len()));
    merge(a, b, |_, entry| out.push(cloned(entry)));
    out
}

/// Entries present in exactly one operand.
pub(crate) fn symmetric_difference<K, V, A, B>(a: &A, b: &B) -> Vec<(K, V)>
where
    K: Ord + Clone,
    V: Clone,
    A: Tree<K, V>,
    B: Tree<K, V>,
{
    let mut out = Vec::new();
    merge(a, b, |side, entry| {
        if side != Side::Both {
            out.push(cloned(entry));
        }
    });
    out
}

/// Entries of `a` whose key is also in `b`.
///
/// Iterates the smaller operand, testing membership in the larger.
pub(crate) fn intersection<K, V, A, B>(a: &A, b: &B) -> Vec<(K, V)>
where
    K: Ord + Clone,
    V: Clone,
    A: Tree<K, V>,
    B: Tree<K, V>,
{
    if a.len() <= b.len() {
        a.iter()
            .filter(|(k, _)| b.contains(*k))
            .map(cloned)
            .collect()
    } else {
        b.nodes()
            .filter_map(|id| a.find(b.key(id)))
            .map(|id| cloned(a.entry(id)))
            .collect()
    }
}

/// Entries of `a` whose key is not in `b`.
pub(crate) fn difference<K, V, A, B>(a: &A, b: &B) -> Vec<(K, V)>
where
    K: Ord + Clone,
    V: Clone,
    A: Tree<K, V>,
    B: Tree<K, V>,
{
    a.iter()
        .filter(|(k, _)| !b.contains(*k))
        .map(cloned)
        .collect()
}

/// True when every key of `a` is in `b`.
pub(crate) fn is_subset<K, V, W, A, B>(a: &A, b: &B) -> bool
where
    K: Ord,
    A: Tree<K, V>,
    B: Tree<K, W>,
{
    a.len() <= b.len() && a.iter().all(|(k, _)| b.contains(k))
}

/// True when `a` and `b` share no key.
///
/// Iterates the smaller operand, testing membership in the larger.
pub(crate) fn is_disjoint<K, V, W, A, B>(a: &A, b: &B) -> bool
where
    K: Ord,
    A: Tree<K, V>,
    B: Tree<K, W>,
{
    if a.len() <= b.len() {
        a.iter().all(|(k, _)| !b.contains(k))
    } else {
        b.iter().all(|(k, _)| !a.contains(k))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;
    use crate::{AvlTree, SplayTree};

    fn keys(entries: Vec<(u16, char)>) -> Vec<u16> {
        entries.into_iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn test_left_values_win() {
        let a = AvlTree::from_entries([(1, 'a'), (2, 'a')]);
        let b = SplayTree::from_entries([(2, 'b'), (3, 'b')]);

        assert_eq!(union(&a, &b), [(1, 'a'), (2, 'a'), (3, 'b')]);
        assert_eq!(union(&b, &a), [(1, 'a'), (2, 'b'), (3, 'b')]);
        assert_eq!(intersection(&a, &b), [(2, 'a')]);
        assert_eq!(intersection(&b, &a), [(2, 'b')]);

        // The smaller operand is iterated, but values still come from the
        // left.
        let c = AvlTree::from_entries([(0, 'c'), (2, 'c'), (4, 'c')]);
        assert_eq!(intersection(&a, &c), [(2, 'a')]);
        assert_eq!(intersection(&c, &a), [(2, 'c')]);
    }

    proptest! {
        #[test]
        fn prop_algebra_matches_model(
            a in prop::collection::btree_set(0_u16..100, 0..50),
            b in prop::collection::btree_set(0_u16..100, 0..50),
        ) {
            let ta = AvlTree::<u16, char>::from_keys(a.iter().copied());
            let tb = SplayTree::<u16, char>::from_keys(b.iter().copied());

            let want = |s: BTreeSet<u16>| s.into_iter().collect::<Vec<_>>();

            assert_eq!(keys(union(&ta, &tb)), want(&a | &b));
            assert_eq!(keys(intersection(&ta, &tb)), want(&a & &b));
            assert_eq!(keys(difference(&ta, &tb)), want(&a - &b));
            assert_eq!(keys(symmetric_difference(&ta, &tb)), want(&a ^ &b));

            assert_eq!(is_subset(&ta, &tb), a.is_subset(&b));
            assert_eq!(is_subset(&tb, &ta), b.is_subset(&a));
            assert_eq!(is_disjoint(&ta, &tb), a.is_disjoint(&b));
        }
    }
}
