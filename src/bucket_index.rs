//! BucketIndex: key lookup over the order list, rebuilt in full after every
//! structural mutation so the bucket count always equals the entry count.

use crate::order_list::{Handle, OrderList};
use core::hash::{BuildHasher, Hasher};

/// Bucket count held while the map is empty.
pub(crate) const PLACEHOLDER_BUCKETS: usize = 10;

#[derive(Debug)]
pub(crate) struct BucketIndex<S> {
    hasher: S,
    buckets: Vec<Vec<Handle>>,
}

fn fold32(h: u64) -> u32 {
    ((h >> 32) ^ h) as u32
}

fn empty_buckets(n: usize) -> Vec<Vec<Handle>> {
    (0..n).map(|_| Vec::new()).collect()
}

impl<S> BucketIndex<S>
where
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            buckets: empty_buckets(PLACEHOLDER_BUCKETS),
        }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn buckets(&self) -> impl Iterator<Item = &[Handle]> + '_ {
        self.buckets.iter().map(Vec::as_slice)
    }

    /// The bucket `key` falls into under the current bucket count.
    pub fn bucket_of(&self, key: &str) -> usize {
        self.slot(key, self.buckets.len())
    }

    // Hashes the raw UTF-8 bytes (no `str` terminator), xor-folds the 64-bit
    // state to 32 bits, then reduces modulo the bucket count; `n` is never zero.
    fn slot(&self, key: &str, n: usize) -> usize {
        let mut state = self.hasher.build_hasher();
        state.write(key.as_bytes());
        fold32(state.finish()) as usize % n
    }

    /// Drops the current buckets and re-inserts every live entry, walking the
    /// order list once. An empty list gets the placeholder bucket array.
    pub fn rebuild<V>(&mut self, list: &OrderList<V>) {
        let n = list.len();
        if n == 0 {
            self.buckets = empty_buckets(PLACEHOLDER_BUCKETS);
            log::trace!("index reset to {} placeholder buckets", PLACEHOLDER_BUCKETS);
            return;
        }

        let mut buckets = empty_buckets(n);
        for (h, key, _) in list.iter() {
            buckets[self.slot(key, n)].push(h);
        }
        self.buckets = buckets;
        log::trace!("index rebuilt over {} buckets", n);
    }

    /// Linear scan of the key's bucket; short-circuits on an empty list.
    pub fn find<V>(&self, list: &OrderList<V>, key: &str) -> Option<Handle> {
        if list.is_empty() {
            return None;
        }
        self.buckets[self.bucket_of(key)]
            .iter()
            .copied()
            .find(|&h| list.key(h) == Some(key))
    }
}
