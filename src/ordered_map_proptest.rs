#![cfg(test)]

// Property tests for OrderedMap kept inside the crate so they can inspect
// the order list links and bucket layout directly.

use crate::bucket_index::PLACEHOLDER_BUCKETS;
use crate::ordered_map::OrderedMap;
use core::hash::BuildHasher;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::hash::Hasher;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Set(usize, i32),
    Remove(usize),
    RemoveIndex(usize),
    Get(usize),
    GetIndex(usize),
    HasValue(i32),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            (idx.clone(), -4i32..4).prop_map(|(i, v)| OpI::Set(i, v)),
            idx.clone().prop_map(OpI::Remove),
            (0usize..10).prop_map(OpI::RemoveIndex),
            idx.clone().prop_map(OpI::Get),
            (0usize..10).prop_map(OpI::GetIndex),
            (-4i32..4).prop_map(OpI::HasValue),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Walks the list both ways and checks every bucket against the hash.
fn check_structure<V, S>(m: &OrderedMap<V, S>) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let (list, index) = m.parts();

    let mut forward = Vec::new();
    let mut prev = None;
    let mut cur = list.first();
    while let Some(h) = cur {
        prop_assert_eq!(list.prev(h), prev, "prev link must mirror next link");
        forward.push(h);
        prop_assert!(forward.len() <= list.len(), "order list has a cycle");
        prev = Some(h);
        cur = list.next(h);
    }
    prop_assert_eq!(list.last(), prev);
    prop_assert_eq!(forward.len(), m.size());

    let mut backward = Vec::new();
    let mut cur = list.last();
    while let Some(h) = cur {
        backward.push(h);
        prop_assert!(backward.len() <= list.len(), "order list has a cycle");
        cur = list.prev(h);
    }
    backward.reverse();
    prop_assert_eq!(&backward, &forward);

    if m.is_empty() {
        prop_assert_eq!(index.bucket_count(), PLACEHOLDER_BUCKETS);
    } else {
        prop_assert_eq!(index.bucket_count(), m.size());
    }

    let mut indexed = 0;
    for (i, bucket) in index.buckets().enumerate() {
        for &h in bucket {
            let key = list.key(h);
            prop_assert!(key.is_some(), "bucket holds a stale handle");
            prop_assert_eq!(index.bucket_of(key.unwrap_or_default()), i);
            indexed += 1;
        }
    }
    prop_assert_eq!(indexed, m.size(), "each entry must sit in exactly one bucket");
    Ok(())
}

fn run_scenario<S>(
    mut sut: OrderedMap<i32, S>,
    pool: &[String],
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    // Model: insertion-ordered pairs.
    let mut model: Vec<(String, i32)> = Vec::new();

    for op in ops {
        match op {
            OpI::Set(i, v) => {
                let k = &pool[i];
                let old = sut.set(k.as_str(), v);
                match model.iter_mut().find(|(mk, _)| mk == k) {
                    Some((_, mv)) => {
                        prop_assert_eq!(old, Some(*mv));
                        *mv = v;
                    }
                    None => {
                        prop_assert_eq!(old, None);
                        model.push((k.clone(), v));
                    }
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let pos = model.iter().position(|(mk, _)| mk == k);
                let got = sut.remove(k);
                prop_assert_eq!(got, pos.map(|p| model.remove(p).1));
                prop_assert!(sut.remove(k).is_none(), "second removal must miss");
            }
            OpI::RemoveIndex(i) => {
                let got = sut.remove_index(i);
                let expected = (i < model.len()).then(|| model.remove(i).1);
                prop_assert_eq!(got, expected);
            }
            OpI::Get(i) => {
                let k = &pool[i];
                let expected = model.iter().find(|(mk, _)| mk == k).map(|(_, v)| v);
                prop_assert_eq!(sut.get(k), expected);
                prop_assert_eq!(sut.has_key(k), expected.is_some());
            }
            OpI::GetIndex(i) => {
                prop_assert_eq!(sut.get_index(i), model.get(i).map(|(_, v)| v));
            }
            OpI::HasValue(v) => {
                prop_assert_eq!(sut.has_value(&v), model.iter().any(|(_, mv)| *mv == v));
            }
        }

        check_structure(&sut)?;
        let keys: Vec<&str> = sut.keys().collect();
        let model_keys: Vec<&str> = model.iter().map(|(k, _)| k.as_str()).collect();
        prop_assert_eq!(keys, model_keys);
    }
    Ok(())
}

// Collision variant using a constant hasher to stress equality resolution.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Property: State-machine equivalence against an insertion-ordered Vec.
// Invariants exercised across random operation sequences:
// - `set` appends new keys and updates existing ones in place.
// - `remove`/`remove_index` return the model's value; repeated removal misses.
// - `get_index(i)` is `None` exactly when `i >= size()`.
// - The order list is doubly consistent and acyclic after every op.
// - Bucket count equals `size()` (placeholder when empty); each entry is in
//   exactly the bucket its key hashes to.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(OrderedMap::new(), &pool, ops)?;
    }

    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(OrderedMap::with_hasher(ConstBuildHasher), &pool, ops)?;
    }
}
