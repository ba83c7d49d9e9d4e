//! ordered-map: a string-keyed map that preserves insertion order and
//! supports both key lookup and positional access.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: map semantics (unique keys, O(1)-average lookup) with a
//!   deterministic, replayable iteration order, e.g. for JSON encoding
//!   that must emit keys in the order they were inserted.
//! - Layers:
//!   - OrderList<V>: doubly linked list of entries living in a generational
//!     slot arena. Links are optional handles, never references, so
//!     removal is a splice plus a slot free.
//!   - BucketIndex<S>: array of small buckets of handles, selected by a
//!     32-bit reduction of the hash modulo the bucket count.
//!   - OrderedMap<V, S>: public API joining the two; owns the rehash
//!     policy.
//!
//! Rehash policy
//! - Every insert of a new key and every removal rebuilds the index from
//!   scratch by walking the order list once. The bucket count afterwards
//!   equals `len()`, so the average bucket holds one entry. The cost is
//!   O(n) per structural mutation; updating an existing key skips it.
//! - An empty map keeps a fixed array of 10 buckets and short-circuits
//!   lookups before hashing.
//!
//! Constraints
//! - Single-threaded; no internal locking.
//! - "Not found" is `None` everywhere. Nothing else can fail except
//!   encoding, which reports the encoder's own error.
//! - Iterators borrow the map, so mutation during `each`/`iter` is
//!   rejected at compile time.
//! - Positions are `0..len()`; `get_index(len())` is `None`.
//!
//! Values
//! - `V` is stored opaquely. `has_value` relies on `V: PartialEq`; model
//!   an absent value with `Option<T>` (or `serde_json::Value::Null`) and
//!   `None == None` holds.
//!
//! Encoding
//! - With the `serde` feature (default), `OrderedMap` implements
//!   `Serialize`/`Deserialize` in insertion order, and `to_json` emits
//!   `{"a": 1, "b": "hello world", "c": []}`.

mod bucket_index;
mod order_list;
pub mod ordered_map;
#[cfg(test)]
mod ordered_map_proptest;

#[cfg(feature = "serde")]
pub mod json;

// Public surface
#[cfg(feature = "serde")]
pub use json::SpacedFormatter;
pub use ordered_map::{Iter, Keys, OrderedMap, Values};
