//! Recency Index Module
//!
//! Arena-backed doubly linked list plus a key map, giving O(1) touch,
//! insert, remove and evict-oldest.

use std::collections::HashMap;

// == List Node ==
#[derive(Debug)]
struct Node<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

// == Recency Index ==
/// Keys ordered by recency of use, each carrying a value.
///
/// - Front (head) = Most recently used
/// - Back (tail) = Least recently used
///
/// Nodes live in a slot vector; freed slots are reused.
#[derive(Debug)]
pub struct RecencyIndex<V> {
    slots: Vec<Option<Node<V>>>,
    free: Vec<usize>,
    positions: HashMap<String, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<V> Default for RecencyIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RecencyIndex<V> {
    // == Constructor ==
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            positions: HashMap::new(),
            head: None,
            tail: None,
        }
    }

    // == Touch ==
    /// Marks `key` as most recently used and returns its value.
    ///
    /// Returns None, leaving the order untouched, if the key is absent.
    pub fn touch(&mut self, key: &str) -> Option<&V> {
        let idx = *self.positions.get(key)?;
        self.unlink(idx);
        self.push_front(idx);
        self.slots[idx].as_ref().map(|node| &node.value)
    }

    // == Insert ==
    /// Inserts or replaces `key` at the front.
    ///
    /// Returns the previous value when the key was already present.
    pub fn insert(&mut self, key: String, value: V) -> Option<V> {
        if let Some(&idx) = self.positions.get(&key) {
            self.unlink(idx);
            self.push_front(idx);
            let node = self.slots[idx].as_mut()?;
            return Some(std::mem::replace(&mut node.value, value));
        }

        let node = Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.positions.insert(key, idx);
        self.push_front(idx);
        None
    }

    // == Remove ==
    /// Removes `key` and returns its value, if present.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.positions.remove(key)?;
        self.release(idx).map(|(_, value)| value)
    }

    // == Pop Oldest ==
    /// Removes and returns the least recently used entry.
    pub fn pop_oldest(&mut self) -> Option<(String, V)> {
        let idx = self.tail?;
        let (key, value) = self.release(idx)?;
        self.positions.remove(&key);
        Some((key, value))
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&str> {
        let idx = self.tail?;
        self.slots[idx].as_ref().map(|node| node.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    // == Keys ==
    /// Keys from most to least recently used.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys {
            index: self,
            cursor: self.head,
        }
    }

    fn release(&mut self, idx: usize) -> Option<(String, V)> {
        self.unlink(idx);
        let node = self.slots[idx].take()?;
        self.free.push(idx);
        Some((node.key, node.value))
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_mut() {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.slots[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.slots[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => {
                if let Some(node) = self.slots[h].as_mut() {
                    node.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }
}

/// Iterator over keys in recency order, see [`RecencyIndex::keys`].
pub struct Keys<'a, V> {
    index: &'a RecencyIndex<V>,
    cursor: Option<usize>,
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.index;
        let node = index.slots[self.cursor?].as_ref()?;
        self.cursor = node.next;
        Some(node.key.as_str())
    }
}
