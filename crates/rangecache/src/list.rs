//! Recency list backing the LRU cache
//!
//! Entries live in an arena (`Vec<Option<Node>>`) and link to each other by
//! slot index, so the key index can hold plain [`Handle`]s instead of
//! references into the list. Vacated slots go on a free list and are reused.

/// Stable reference to an entry in a [`RecencyList`]
///
/// A handle stays valid until its entry is removed. After that the slot may
/// be reused by a later `push_front`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

impl Handle {
    /// Slot index inside the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// Key/value pair owned by the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    /// Cache key
    pub key: K,
    /// Cached value
    pub value: V,
}

struct Node<K, V> {
    entry: Entry<K, V>,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Doubly-linked list ordered from most- to least-recently-used
pub struct RecencyList<K, V> {
    nodes: Vec<Option<Node<K, V>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<K, V> RecencyList<K, V> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Insert a new entry at the head and return its handle
    pub fn push_front(&mut self, key: K, value: V) -> Handle {
        let idx = self.alloc_node(Node {
            entry: Entry { key, value },
            prev: None,
            next: self.head,
        });

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }

        self.len += 1;
        Handle(idx)
    }

    /// Detach the entry behind `handle` and hand it back
    ///
    /// Returns `None` for a handle whose entry was already removed.
    pub fn remove(&mut self, handle: Handle) -> Option<Entry<K, V>> {
        let idx = handle.0;
        if !matches!(self.nodes.get(idx), Some(Some(_))) {
            return None;
        }

        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free_list.push(idx);
        self.len -= 1;
        Some(node.entry)
    }

    /// Mark the entry behind `handle` as most-recently-used
    pub fn move_to_front(&mut self, handle: Handle) {
        let idx = handle.0;
        if self.head == Some(idx) || !matches!(self.nodes.get(idx), Some(Some(_))) {
            return;
        }

        self.unlink(idx);

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
    }

    /// Detach and return the least-recently-used entry
    pub fn remove_tail(&mut self) -> Option<Entry<K, V>> {
        let tail_idx = self.tail?;
        self.remove(Handle(tail_idx))
    }

    /// Borrow the entry behind `handle`
    pub fn get(&self, handle: Handle) -> Option<&Entry<K, V>> {
        self.nodes
            .get(handle.0)
            .and_then(Option::as_ref)
            .map(|node| &node.entry)
    }

    /// Mutably borrow the entry behind `handle`
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut Entry<K, V>> {
        self.nodes
            .get_mut(handle.0)
            .and_then(Option::as_mut)
            .map(|node| &mut node.entry)
    }

    /// Handle of the most-recently-used entry
    pub fn head(&self) -> Option<Handle> {
        self.head.map(Handle)
    }

    /// Handle of the least-recently-used entry
    pub fn tail(&self) -> Option<Handle> {
        self.tail.map(Handle)
    }

    /// Number of entries in the list
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate entries from most- to least-recently-used
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = if let Some(node) = &self.nodes[idx] {
            (node.prev, node.next)
        } else {
            return;
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = None;
        }
    }

    fn alloc_node(&mut self, node: Node<K, V>) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx] = Some(node);
            idx
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }
}

impl<K, V> Default for RecencyList<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a [`RecencyList`], most-recently-used first
pub struct Iter<'a, K, V> {
    list: &'a RecencyList<K, V>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = &'a Entry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.list.nodes[idx].as_ref()?;
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
