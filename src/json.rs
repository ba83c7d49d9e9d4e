//! Order-preserving serde support and the spaced JSON encoding.

use crate::ordered_map::OrderedMap;
use core::fmt;
use core::hash::BuildHasher;
use core::marker::PhantomData;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::ser::Formatter;
use std::io;

impl<V, S> Serialize for OrderedMap<V, S>
where
    V: Serialize,
{
    fn serialize<T>(&self, serializer: T) -> Result<T::Ok, T::Error>
    where
        T: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Entries are set in document order. A key repeated in the input keeps
/// its first position and takes the last value.
impl<'de, V, S> Deserialize<'de> for OrderedMap<V, S>
where
    V: Deserialize<'de>,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(OrderedMapVisitor {
            marker: PhantomData,
        })
    }
}

struct OrderedMapVisitor<V, S> {
    marker: PhantomData<fn() -> OrderedMap<V, S>>,
}

impl<'de, V, S> Visitor<'de> for OrderedMapVisitor<V, S>
where
    V: Deserialize<'de>,
    S: BuildHasher + Default,
{
    type Value = OrderedMap<V, S>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map with string keys")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = OrderedMap::with_hasher(S::default());
        while let Some((k, v)) = access.next_entry::<String, V>()? {
            map.set(k, v);
        }
        Ok(map)
    }
}

/// Spaced separators for the outermost object only: `": "` after each key
/// and `", "` between entries. Values nested inside stay compact, so the map
/// encodes as `{"a": [1,2], "b": {"x":1}}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpacedFormatter {
    depth: usize,
}

impl SpacedFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    fn separator<W>(&self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        match (first, self.depth) {
            (true, _) => Ok(()),
            (false, 1) => writer.write_all(b", "),
            (false, _) => writer.write_all(b","),
        }
    }
}

impl Formatter for SpacedFormatter {
    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.depth += 1;
        writer.write_all(b"[")
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.depth = self.depth.saturating_sub(1);
        writer.write_all(b"]")
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.separator(writer, first)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.depth += 1;
        writer.write_all(b"{")
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.depth = self.depth.saturating_sub(1);
        writer.write_all(b"}")
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.separator(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if self.depth == 1 {
            writer.write_all(b": ")
        } else {
            writer.write_all(b":")
        }
    }
}

impl<V, S> OrderedMap<V, S>
where
    V: Serialize,
{
    /// Streams the spaced encoding into `writer`.
    pub fn write_json<W>(&self, writer: W) -> serde_json::Result<()>
    where
        W: io::Write,
    {
        let mut ser = serde_json::Serializer::with_formatter(writer, SpacedFormatter::new());
        self.serialize(&mut ser)
    }

    pub fn to_json_vec(&self) -> serde_json::Result<Vec<u8>> {
        let mut out = Vec::with_capacity(2 + 16 * self.len());
        self.write_json(&mut out)?;
        Ok(out)
    }

    /// Encodes as a JSON object with keys in insertion order. An empty map
    /// encodes as `{}`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let bytes = self.to_json_vec()?;
        String::from_utf8(bytes).map_err(<serde_json::Error as serde::ser::Error>::custom)
    }
}
