//! OrderedMap: public map API over the order list and the bucket index.

use crate::bucket_index::BucketIndex;
use crate::order_list::{self, Handle, OrderList};
use core::fmt;
use core::hash::BuildHasher;
use fnv::FnvBuildHasher;
use std::io;

/// A string-keyed map that remembers insertion order.
///
/// Lookups by key go through a bucket index; positional access and
/// iteration walk the insertion-ordered list. Every insert or removal
/// rebuilds the index so that the bucket count equals `len()`, which makes
/// those operations O(n). Updating an existing key is O(1) on top of the
/// lookup and keeps the key's position.
pub struct OrderedMap<V, S = FnvBuildHasher> {
    list: OrderList<V>,
    index: BucketIndex<S>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> OrderedMap<V, S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            list: OrderList::new(),
            index: BucketIndex::with_hasher(hasher),
        }
    }

    pub fn hasher(&self) -> &S {
        self.index.hasher()
    }

    fn find(&self, key: &str) -> Option<Handle> {
        self.index.find(&self.list, key)
    }

    fn rehash(&mut self) {
        self.index.rebuild(&self.list);
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let h = self.find(key)?;
        self.list.value(h)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let h = self.find(key)?;
        self.list.value_mut(h)
    }

    /// Value at insertion position `i`; `None` when `i >= len()`. O(i).
    pub fn get_index(&self, i: usize) -> Option<&V> {
        let h = self.list.nth(i)?;
        self.list.value(h)
    }

    /// Key and value at insertion position `i`.
    pub fn get_index_entry(&self, i: usize) -> Option<(&str, &V)> {
        let h = self.list.nth(i)?;
        Some((self.list.key(h)?, self.list.value(h)?))
    }

    /// Inserts or updates. A new key is appended at the end and the index is
    /// rebuilt; an existing key keeps its position and the previous value is
    /// returned.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        if let Some(h) = self.find(&key) {
            return self
                .list
                .value_mut(h)
                .map(|slot| core::mem::replace(slot, value));
        }
        self.list.append(key, value);
        self.rehash();
        None
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry(&mut self, key: &str) -> Option<(String, V)> {
        let h = self.find(key)?;
        self.unlink(h)
    }

    /// Removes the entry at insertion position `i`; `None` when `i >= len()`.
    pub fn remove_index(&mut self, i: usize) -> Option<V> {
        let h = self.list.nth(i)?;
        self.unlink(h).map(|(_, v)| v)
    }

    fn unlink(&mut self, h: Handle) -> Option<(String, V)> {
        let removed = self.list.unlink(h)?;
        self.rehash();
        Some(removed)
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Scans every bucket comparing with `V`'s own equality. O(n).
    pub fn has_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.index
            .buckets()
            .flatten()
            .any(|&h| self.list.value(h) == Some(value))
    }

    pub fn clear(&mut self) {
        self.list.clear();
        self.rehash();
    }

    /// Number of buckets in the index: `len()`, or the fixed placeholder
    /// count while empty.
    pub fn bucket_count(&self) -> usize {
        self.index.bucket_count()
    }

    #[cfg(test)]
    pub(crate) fn parts(&self) -> (&OrderList<V>, &BucketIndex<S>) {
        (&self.list, &self.index)
    }
}

impl<V, S> OrderedMap<V, S> {
    pub fn size(&self) -> usize {
        self.list.len()
    }
    pub fn len(&self) -> usize {
        self.list.len()
    }
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Calls `f` for every entry in insertion order.
    pub fn each<F>(&self, mut f: F)
    where
        F: FnMut(&str, &V),
    {
        for (k, v) in self.iter() {
            f(k, v);
        }
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            it: self.list.iter(),
        }
    }

    pub fn keys(&self) -> Keys<'_, V> {
        Keys { it: self.iter() }
    }

    pub fn values(&self) -> Values<'_, V> {
        Values { it: self.iter() }
    }

    pub fn first(&self) -> Option<(&str, &V)> {
        self.iter().next()
    }

    pub fn last(&self) -> Option<(&str, &V)> {
        self.iter().next_back()
    }

    /// Writes a human-readable listing of the entries in insertion order.
    pub fn dump<W>(&self, mut out: W) -> io::Result<()>
    where
        W: io::Write,
        V: fmt::Debug,
    {
        writeln!(out, "OrderedMap(#elems = {}) {{", self.len())?;
        for (k, v) in self.iter() {
            writeln!(out, "  {} = {:?}", k, v)?;
        }
        writeln!(out, "}}")
    }

    /// `dump` to stdout.
    pub fn print(&self) -> io::Result<()>
    where
        V: fmt::Debug,
    {
        self.dump(io::stdout().lock())
    }
}

/// Iterator over `(key, value)` pairs in insertion order.
pub struct Iter<'a, V> {
    it: order_list::Iter<'a, V>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, k, v)| (k, v))
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, V> DoubleEndedIterator for Iter<'a, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.it.next_back().map(|(_, k, v)| (k, v))
    }
}

impl<'a, V> ExactSizeIterator for Iter<'a, V> {}

pub struct Keys<'a, V> {
    it: Iter<'a, V>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(k, _)| k)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, V> DoubleEndedIterator for Keys<'a, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.it.next_back().map(|(k, _)| k)
    }
}

impl<'a, V> ExactSizeIterator for Keys<'a, V> {}

pub struct Values<'a, V> {
    it: Iter<'a, V>,
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, v)| v)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<'a, V> DoubleEndedIterator for Values<'a, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.it.next_back().map(|(_, v)| v)
    }
}

impl<'a, V> ExactSizeIterator for Values<'a, V> {}

impl<'a, V, S> IntoIterator for &'a OrderedMap<V, S> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builds the map with one index rebuild per new key; later duplicates
/// update the earlier position.
impl<K, V, S> FromIterator<(K, V)> for OrderedMap<V, S>
where
    K: Into<String>,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::with_hasher(S::default());
        m.extend(iter);
        m
    }
}

impl<K, V, S> Extend<(K, V)> for OrderedMap<V, S>
where
    K: Into<String>,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

/// Equal when both hold the same pairs in the same order.
impl<V, S1, S2> PartialEq<OrderedMap<V, S2>> for OrderedMap<V, S1>
where
    V: PartialEq,
{
    fn eq(&self, other: &OrderedMap<V, S2>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<V: Eq, S> Eq for OrderedMap<V, S> {}

impl<V, S> fmt::Debug for OrderedMap<V, S>
where
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
