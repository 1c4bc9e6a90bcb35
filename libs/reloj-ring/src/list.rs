//! Arena-backed circular doubly linked list
//!
//! Nodes live in a `Vec` of slots and link to each other by index. Freed
//! slots go on a free list and bump their generation, so a [`NodeRef`] taken
//! before a delete stops resolving instead of aliasing a recycled slot.
//!
//! Every scan is bounded by `size`: the ring has no terminator, so a miss is
//! detected by counting hops, never by hitting an empty link.

use crate::keyed::{Keyed, Merge};

/// Validated handle to a node in a [`CircularList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    next: usize,
    prev: usize,
    generation: u32,
}

/// Circular doubly linked list with a navigation cursor.
///
/// - `head` is the start of forward traversal and ordering
/// - `current` is the cursor moved by [`next_item`](Self::next_item) and
///   [`prev_item`](Self::prev_item); it never points at a removed node
#[derive(Debug)]
pub struct CircularList<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    current: Option<usize>,
    size: usize,
}

impl<T> Default for CircularList<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            current: None,
            size: 0,
        }
    }
}

impl<T> CircularList<T> {
    /// Create an empty ring
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.size
    }

    /// Append `value` just before `head`.
    ///
    /// On an empty ring the new node becomes `head` and `current` and links to
    /// itself in both directions. Otherwise the cursor is left where it is.
    pub fn insert_at_end(&mut self, value: T) -> NodeRef {
        let index = self.alloc(value);

        match self.head {
            None => {
                self.head = Some(index);
                self.current = Some(index);
            },
            Some(head) => {
                let tail = self.slots[head].prev;
                self.slots[tail].next = index;
                self.slots[index].prev = tail;
                self.slots[index].next = head;
                self.slots[head].prev = index;
            },
        }

        self.size += 1;
        self.handle(index)
    }

    /// Append `value`, then make it the new `head`.
    ///
    /// The cursor is not touched, so a positioned `current` keeps pointing at
    /// the same node even though forward order now starts elsewhere.
    pub fn insert_at_beginning(&mut self, value: T) -> NodeRef {
        let node = self.insert_at_end(value);
        self.head = Some(node.index);
        node
    }

    /// Iterate payloads in ring order starting at `head`
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            next: self.head,
            remaining: self.size,
        }
    }

    /// Snapshot of the payloads in ring order
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Advance the cursor one step forward and return the new current payload.
    ///
    /// An unset cursor starts at `head`.
    pub fn next_item(&mut self) -> Option<&T> {
        let head = self.head?;
        let index = match self.current {
            Some(current) => self.slots[current].next,
            None => head,
        };
        self.current = Some(index);
        self.value_at(index)
    }

    /// Step the cursor one node backward and return the new current payload.
    ///
    /// An unset cursor starts at `head`.
    pub fn prev_item(&mut self) -> Option<&T> {
        let head = self.head?;
        let index = match self.current {
            Some(current) => self.slots[current].prev,
            None => head,
        };
        self.current = Some(index);
        self.value_at(index)
    }

    /// Payload under the cursor, without moving it
    pub fn current(&self) -> Option<&T> {
        self.current.and_then(|index| self.value_at(index))
    }

    /// Put the cursor back on `head`
    pub fn reset_current(&mut self) -> Option<&T> {
        self.current = self.head;
        self.current()
    }

    /// Resolve a handle; stale handles yield `None`
    pub fn get(&self, node: NodeRef) -> Option<&T> {
        self.live_index(node).and_then(|index| self.value_at(index))
    }

    pub fn next_ref(&self, node: NodeRef) -> Option<NodeRef> {
        self.live_index(node)
            .map(|index| self.handle(self.slots[index].next))
    }

    pub fn prev_ref(&self, node: NodeRef) -> Option<NodeRef> {
        self.live_index(node)
            .map(|index| self.handle(self.slots[index].prev))
    }

    pub fn head_ref(&self) -> Option<NodeRef> {
        self.head.map(|index| self.handle(index))
    }

    pub fn current_ref(&self) -> Option<NodeRef> {
        self.current.map(|index| self.handle(index))
    }

    pub(crate) fn head_index(&self) -> Option<usize> {
        self.head
    }

    pub(crate) fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub(crate) fn next_index(&self, index: usize) -> usize {
        self.slots[index].next
    }

    pub(crate) fn prev_index(&self, index: usize) -> usize {
        self.slots[index].prev
    }

    pub(crate) fn value_at(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(|slot| slot.value.as_ref())
    }

    fn live_index(&self, node: NodeRef) -> Option<usize> {
        self.slots
            .get(node.index)
            .filter(|slot| slot.generation == node.generation && slot.value.is_some())
            .map(|_| node.index)
    }

    fn handle(&self, index: usize) -> NodeRef {
        NodeRef {
            index,
            generation: self.slots[index].generation,
        }
    }

    fn alloc(&mut self, value: T) -> usize {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.value = Some(value);
                slot.next = index;
                slot.prev = index;
                index
            },
            None => {
                let index = self.slots.len();
                self.slots.push(Slot {
                    value: Some(value),
                    next: index,
                    prev: index,
                    generation: 0,
                });
                index
            },
        }
    }

    fn release(&mut self, index: usize) -> Option<T> {
        let slot = &mut self.slots[index];
        slot.generation = slot.generation.wrapping_add(1);
        let value = slot.value.take();
        self.free.push(index);
        value
    }
}

impl<T: Keyed> CircularList<T> {
    /// Unlink the first node whose key matches and hand back its payload.
    ///
    /// `head` and `current` move to the removed node's successor when they
    /// pointed at it; removing the last node empties both.
    pub fn remove_by_id(&mut self, key: &T::Key) -> Option<T> {
        let index = self.find_index(key)?;

        if self.size == 1 {
            self.head = None;
            self.current = None;
        } else {
            let prev = self.slots[index].prev;
            let next = self.slots[index].next;
            self.slots[prev].next = next;
            self.slots[next].prev = prev;

            if self.head == Some(index) {
                self.head = Some(next);
            }
            if self.current == Some(index) {
                self.current = Some(next);
            }
        }

        self.size -= 1;
        self.release(index)
    }

    /// Like [`remove_by_id`](Self::remove_by_id), reporting only whether a node went away
    pub fn delete_by_id(&mut self, key: &T::Key) -> bool {
        self.remove_by_id(key).is_some()
    }

    pub fn search_by_id(&self, key: &T::Key) -> Option<&T> {
        self.find_index(key).and_then(|index| self.value_at(index))
    }

    fn find_index(&self, key: &T::Key) -> Option<usize> {
        let mut index = self.head?;
        for _ in 0..self.size {
            let slot = &self.slots[index];
            if slot.value.as_ref().is_some_and(|value| value.key() == key) {
                return Some(index);
            }
            index = slot.next;
        }
        None
    }
}

impl<T: Merge> CircularList<T> {
    /// Merge `patch` into the first node whose key matches.
    ///
    /// Returns `false` and leaves the ring untouched when nothing matches.
    pub fn update_by_id(&mut self, key: &T::Key, patch: T::Patch) -> bool {
        let Some(index) = self.find_index(key) else {
            return false;
        };
        match self.slots[index].value.as_mut() {
            Some(value) => {
                value.merge(patch);
                true
            },
            None => false,
        }
    }
}

/// Forward iterator over a ring, bounded by its size
pub struct Iter<'a, T> {
    list: &'a CircularList<T>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.next?;
        self.remaining -= 1;
        self.next = Some(self.list.slots[index].next);
        self.list.value_at(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a CircularList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        id: u32,
        label: String,
    }

    impl Entry {
        fn new(id: u32) -> Self {
            Self {
                id,
                label: format!("entry-{}", id),
            }
        }
    }

    impl Keyed for Entry {
        type Key = u32;

        fn key(&self) -> &u32 {
            &self.id
        }
    }

    impl Merge for Entry {
        type Patch = String;

        fn merge(&mut self, label: String) {
            self.label = label;
        }
    }

    fn ring_of(ids: &[u32]) -> CircularList<Entry> {
        let mut ring = CircularList::new();
        for &id in ids {
            ring.insert_at_end(Entry::new(id));
        }
        ring
    }

    fn ids(ring: &CircularList<Entry>) -> Vec<u32> {
        ring.iter().map(|e| e.id).collect()
    }

    /// Walk the raw links and check `n.next.prev == n` for every live node
    fn assert_links(ring: &CircularList<Entry>) {
        let Some(head) = ring.head else {
            assert_eq!(ring.size, 0);
            assert!(ring.current.is_none());
            return;
        };
        let mut index = head;
        for _ in 0..ring.size {
            let next = ring.slots[index].next;
            let prev = ring.slots[index].prev;
            assert_eq!(ring.slots[next].prev, index);
            assert_eq!(ring.slots[prev].next, index);
            assert!(ring.slots[index].value.is_some());
            index = next;
        }
        assert_eq!(index, head, "ring does not close after size hops");
    }

    #[test]
    fn test_new_ring_is_empty() {
        let ring: CircularList<Entry> = CircularList::new();
        assert!(ring.is_empty());
        assert_eq!(ring.len(), 0);
        assert!(ring.head_ref().is_none());
        assert!(ring.current_ref().is_none());
        assert_eq!(ring.iter().count(), 0);
    }

    #[test]
    fn test_single_node_links_to_itself() {
        let mut ring = CircularList::new();
        let node = ring.insert_at_end(Entry::new(1));

        assert_eq!(ring.next_ref(node), Some(node));
        assert_eq!(ring.prev_ref(node), Some(node));
        assert_eq!(ring.head_ref(), Some(node));
        assert_eq!(ring.current_ref(), Some(node));
        assert_links(&ring);
    }

    #[test]
    fn test_insert_at_end_keeps_cursor() {
        let mut ring = ring_of(&[1, 2]);
        assert_eq!(ring.next_item().map(|e| e.id), Some(2));

        ring.insert_at_end(Entry::new(3));
        assert_eq!(ring.current().map(|e| e.id), Some(2));
        assert_eq!(ids(&ring), vec![1, 2, 3]);
        assert_links(&ring);
    }

    #[test]
    fn test_insert_at_beginning_moves_head_only() {
        let mut ring = ring_of(&[1, 2]);
        ring.insert_at_beginning(Entry::new(0));

        assert_eq!(ids(&ring), vec![0, 1, 2]);
        assert_eq!(ring.current().map(|e| e.id), Some(1));
        assert_eq!(ring.reset_current().map(|e| e.id), Some(0));
        assert_links(&ring);
    }

    #[test]
    fn test_insert_at_beginning_on_empty_ring() {
        let mut ring = CircularList::new();
        let node = ring.insert_at_beginning(Entry::new(5));

        assert_eq!(ring.head_ref(), Some(node));
        assert_eq!(ring.current_ref(), Some(node));
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn test_delete_head_advances_head() {
        let mut ring = ring_of(&[1, 2, 3]);
        assert!(ring.delete_by_id(&1));

        assert_eq!(ids(&ring), vec![2, 3]);
        assert_eq!(ring.current().map(|e| e.id), Some(2));
        assert_links(&ring);
    }

    #[test]
    fn test_delete_tail_closes_ring() {
        let mut ring = ring_of(&[1, 2, 3]);
        assert!(ring.delete_by_id(&3));

        assert_eq!(ids(&ring), vec![1, 2]);
        assert_eq!(ring.prev_item().map(|e| e.id), Some(2));
        assert_links(&ring);
    }

    #[test]
    fn test_delete_current_moves_cursor_to_successor() {
        let mut ring = ring_of(&[1, 2, 3]);
        ring.next_item();
        assert!(ring.delete_by_id(&2));

        assert_eq!(ring.current().map(|e| e.id), Some(3));
        assert_links(&ring);
    }

    #[test]
    fn test_delete_last_node_empties_ring() {
        let mut ring = ring_of(&[7]);
        assert_eq!(ring.remove_by_id(&7), Some(Entry::new(7)));

        assert!(ring.is_empty());
        assert!(ring.current().is_none());
        assert!(ring.head_ref().is_none());
        assert_links(&ring);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut ring = ring_of(&[1, 2]);
        assert!(!ring.delete_by_id(&99));
        assert_eq!(ids(&ring), vec![1, 2]);
    }

    #[test]
    fn test_stale_handle_does_not_resolve_after_slot_reuse() {
        let mut ring = CircularList::new();
        let first = ring.insert_at_end(Entry::new(1));
        ring.insert_at_end(Entry::new(2));
        ring.delete_by_id(&1);

        let reused = ring.insert_at_end(Entry::new(3));
        assert_eq!(reused.index, first.index);
        assert!(ring.get(first).is_none());
        assert!(ring.next_ref(first).is_none());
        assert_eq!(ring.get(reused).map(|e| e.id), Some(3));
        assert_links(&ring);
    }

    #[test]
    fn test_duplicate_keys_hit_first_from_head() {
        let mut ring = CircularList::new();
        ring.insert_at_end(Entry {
            id: 1,
            label: "first".to_string(),
        });
        ring.insert_at_end(Entry {
            id: 1,
            label: "second".to_string(),
        });

        assert_eq!(ring.search_by_id(&1).map(|e| e.label.as_str()), Some("first"));
        assert!(ring.update_by_id(&1, "patched".to_string()));
        assert!(ring.delete_by_id(&1));
        assert_eq!(ring.search_by_id(&1).map(|e| e.label.as_str()), Some("second"));
    }

    #[test]
    fn test_update_merges_in_place() {
        let mut ring = ring_of(&[1, 2]);
        assert!(ring.update_by_id(&2, "renamed".to_string()));
        assert!(!ring.update_by_id(&3, "ghost".to_string()));

        let entry = ring.search_by_id(&2).cloned();
        assert_eq!(
            entry,
            Some(Entry {
                id: 2,
                label: "renamed".to_string()
            })
        );
        assert!(ring.search_by_id(&1).is_some());
        assert!(ring.search_by_id(&3).is_none());
    }

    #[test]
    fn test_iter_is_exact_size() {
        let ring = ring_of(&[4, 5, 6]);
        let iter = ring.iter();
        assert_eq!(iter.len(), 3);
        assert_eq!((&ring).into_iter().count(), 3);
        assert_eq!(ring.to_vec(), vec![Entry::new(4), Entry::new(5), Entry::new(6)]);
    }

    #[test]
    fn test_churn_keeps_links_consistent() {
        let mut ring = CircularList::new();
        for id in 0..20 {
            ring.insert_at_end(Entry::new(id));
        }
        for id in (0..20).step_by(3) {
            assert!(ring.delete_by_id(&id));
            ring.next_item();
            assert_links(&ring);
        }
        for id in 100..105 {
            ring.insert_at_beginning(Entry::new(id));
            assert_links(&ring);
        }
        assert_eq!(ring.len(), 20 - 7 + 5);
        assert_eq!(ring.iter().count(), ring.len());
    }
}
