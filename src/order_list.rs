//! OrderList: insertion-ordered doubly linked list over a generational slot arena.

use slotmap::{DefaultKey, SlotMap};

/// Stable reference to a live entry. Stale handles (of unlinked entries)
/// never resolve, even if the physical slot is reused.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct Handle(DefaultKey);

#[derive(Debug)]
struct Entry<V> {
    key: String,
    value: V,
    prev: Option<DefaultKey>,
    next: Option<DefaultKey>,
}

#[derive(Debug)]
pub(crate) struct OrderList<V> {
    slots: SlotMap<DefaultKey, Entry<V>>,
    first: Option<DefaultKey>,
    last: Option<DefaultKey>,
}

impl<V> OrderList<V> {
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            first: None,
            last: None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn first(&self) -> Option<Handle> {
        self.first.map(Handle)
    }
    pub fn last(&self) -> Option<Handle> {
        self.last.map(Handle)
    }

    pub fn next(&self, h: Handle) -> Option<Handle> {
        self.slots.get(h.0).and_then(|e| e.next).map(Handle)
    }
    pub fn prev(&self, h: Handle) -> Option<Handle> {
        self.slots.get(h.0).and_then(|e| e.prev).map(Handle)
    }

    pub fn key(&self, h: Handle) -> Option<&str> {
        self.slots.get(h.0).map(|e| e.key.as_str())
    }
    pub fn value(&self, h: Handle) -> Option<&V> {
        self.slots.get(h.0).map(|e| &e.value)
    }
    pub fn value_mut(&mut self, h: Handle) -> Option<&mut V> {
        self.slots.get_mut(h.0).map(|e| &mut e.value)
    }

    /// Appends a new entry at the tail. Key uniqueness is the caller's job.
    pub fn append(&mut self, key: String, value: V) -> Handle {
        let prev = self.last;
        let k = self.slots.insert(Entry {
            key,
            value,
            prev,
            next: None,
        });
        match prev.and_then(|p| self.slots.get_mut(p)) {
            Some(tail) => tail.next = Some(k),
            None => self.first = Some(k),
        }
        self.last = Some(k);
        Handle(k)
    }

    /// Splices the entry out of the chain and frees its slot.
    pub fn unlink(&mut self, h: Handle) -> Option<(String, V)> {
        let entry = self.slots.remove(h.0)?;

        match entry.prev.and_then(|p| self.slots.get_mut(p)) {
            Some(prev) => prev.next = entry.next,
            None => self.first = entry.next,
        }
        match entry.next.and_then(|n| self.slots.get_mut(n)) {
            Some(next) => next.prev = entry.prev,
            None => self.last = entry.prev,
        }

        Some((entry.key, entry.value))
    }

    /// Positional lookup by walking from the head; `i >= len` is out of bounds.
    pub fn nth(&self, i: usize) -> Option<Handle> {
        if i >= self.len() {
            return None;
        }
        self.iter().nth(i).map(|(h, _, _)| h)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.first = None;
        self.last = None;
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            list: self,
            front: self.first,
            back: self.last,
            remaining: self.len(),
        }
    }
}

impl<V> Default for OrderList<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over entries from first to last (or back, via `rev`).
pub(crate) struct Iter<'a, V> {
    list: &'a OrderList<V>,
    front: Option<DefaultKey>,
    back: Option<DefaultKey>,
    // Bounds the walk so the two cursors never cross.
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Handle, &'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let k = self.front?;
        let e = self.list.slots.get(k)?;
        self.front = e.next;
        self.remaining -= 1;
        Some((Handle(k), e.key.as_str(), &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, V> DoubleEndedIterator for Iter<'a, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let k = self.back?;
        let e = self.list.slots.get(k)?;
        self.back = e.prev;
        self.remaining -= 1;
        Some((Handle(k), e.key.as_str(), &e.value))
    }
}

impl<'a, V> ExactSizeIterator for Iter<'a, V> {}
