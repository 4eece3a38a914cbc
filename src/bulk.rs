//! Helpers that prepare raw key/value sequences for balanced bulk
//! construction.

use std::iter::Peekable;

/// Sort `entries` by key and remove duplicate keys, keeping the value of the
/// *last* occurrence of each key, matching the "later entry overwrites
/// earlier" semantics of repeated map assignment.
///
/// ```
/// use arboretum::bulk::dedup_sorted;
///
/// let got = dedup_sorted([(3, "c"), (1, "a"), (3, "z"), (2, "b")]);
/// assert_eq!(got, [(1, "a"), (2, "b"), (3, "z")]);
/// ```
pub fn dedup_sorted<K, V, I>(entries: I) -> Vec<(K, V)>
where
    K: Ord,
    I: IntoIterator<Item = (K, V)>,
{
    let mut entries = entries.into_iter().collect::<Vec<_>>();

    // The sort must be stable: entries sharing a key stay in input order so the
    // dedup below sees the last one last.
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    DedupSortedIter::new(entries.into_iter()).collect()
}

/// Returns true if the keys of `entries` are strictly ascending (sorted with
/// no duplicates).
pub fn is_strictly_ascending<K, V>(entries: &[(K, V)]) -> bool
where
    K: Ord,
{
    entries.windows(2).all(|w| w[0].0 < w[1].0)
}

/// An iterator for deduping the key of a sorted iterator.
///
/// When encountering the duplicated key, only the last key-value pair is
/// yielded.
#[derive(Debug)]
pub(crate) struct DedupSortedIter<K, V, I>
where
    I: Iterator<Item = (K, V)>,
{
    iter: Peekable<I>,
}

impl<K, V, I> DedupSortedIter<K, V, I>
where
    I: Iterator<Item = (K, V)>,
{
    pub(crate) fn new(iter: I) -> Self {
        Self {
            iter: iter.peekable(),
        }
    }
}

impl<K, V, I> Iterator for DedupSortedIter<K, V, I>
where
    K: Ord,
    I: Iterator<Item = (K, V)>,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        loop {
            let next = self.iter.next()?;

            let peeked = match self.iter.peek() {
                Some(peeked) => peeked,
                None => return Some(next),
            };

            if next.0 != peeked.0 {
                return Some(next);
            }
        }
    }
}
