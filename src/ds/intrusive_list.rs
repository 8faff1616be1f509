//! Recency list: a doubly linked list whose nodes live in a [`SlotArena`].
//!
//! Nodes are linked by [`SlotId`] instead of pointers, so the list needs no
//! `unsafe` and callers can hold a node handle to unlink or reposition it in
//! O(1).
//!
//! ```text
//!   head (LRU) ─► [id_3] ◄──► [id_1] ◄──► [id_2] ◄── tail (MRU)
//! ```
//!
//! ## Operations
//! - `push_back(v)`: append at the tail
//! - `pop_front()`: unlink + free the head
//! - `move_to_back(id)`: unlink + re-attach at the tail
//!
//! All of the above are O(1); `iter` is O(n).

use std::collections::HashSet;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Doubly linked list storing its nodes in a `SlotArena`.
#[derive(Debug)]
pub struct IntrusiveList<T> {
    arena: SlotArena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> IntrusiveList<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Returns `true` if `id` is currently a node in this list.
    pub fn contains(&self, id: SlotId) -> bool {
        self.arena.contains(id)
    }

    /// Value at the head of the list.
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|id| self.get(id))
    }

    /// Value at the tail of the list.
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id))
    }

    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    /// Iterates values from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    /// Appends `value` at the tail and returns its handle.
    pub fn push_back(&mut self, value: T) -> SlotId {
        let id = self.arena.insert(Node {
            value,
            prev: self.tail,
            next: None,
        });
        match self.tail.and_then(|tail| self.arena.get_mut(tail)) {
            Some(old_tail) => old_tail.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    /// Unlinks and returns the head value.
    pub fn pop_front(&mut self) -> Option<T> {
        let id = self.head?;
        self.remove(id)
    }

    /// Unlinks node `id` and returns its value.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.unlink(id)?;
        self.arena.remove(id).map(|node| node.value)
    }

    /// Moves an existing node to the tail; returns `false` if `id` is not present.
    pub fn move_to_back(&mut self, id: SlotId) -> bool {
        if !self.arena.contains(id) {
            return false;
        }
        if self.tail == Some(id) {
            return true;
        }
        self.unlink(id);
        self.link_back(id);
        true
    }

    fn unlink(&mut self, id: SlotId) -> Option<()> {
        let node = self.arena.get_mut(id)?;
        let (prev, next) = (node.prev.take(), node.next.take());

        match prev.and_then(|p| self.arena.get_mut(p)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.arena.get_mut(n)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }
        Some(())
    }

    fn link_back(&mut self, id: SlotId) {
        let old_tail = self.tail;
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail.and_then(|t| self.arena.get_mut(t)) {
            Some(tail_node) => tail_node.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    /// Walks the list and checks that links, length and end pointers agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.head.is_none() || self.tail.is_none() {
            if self.head.is_some() || self.tail.is_some() || !self.is_empty() {
                return Err(InvariantError::new(
                    "list head/tail must both be set unless the list is empty",
                ));
            }
            return Ok(());
        }

        let mut seen = HashSet::with_capacity(self.len());
        let mut current = self.head;
        let mut prev = None;
        while let Some(id) = current {
            if !seen.insert(id) {
                return Err(InvariantError::new("cycle detected in recency list"));
            }
            let node = self
                .arena
                .get(id)
                .ok_or_else(|| InvariantError::new("list links to a vacant slot"))?;
            if node.prev != prev {
                return Err(InvariantError::new("list prev link is inconsistent"));
            }
            if node.next.is_none() && self.tail != Some(id) {
                return Err(InvariantError::new("list tail does not match last node"));
            }
            prev = Some(id);
            current = node.next;
        }

        if seen.len() != self.len() {
            return Err(InvariantError::new(format!(
                "list walk visited {} nodes but arena holds {}",
                seen.len(),
                self.len()
            )));
        }
        Ok(())
    }
}

impl<T> Default for IntrusiveList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over list values from head to tail.
pub struct Iter<'a, T> {
    list: &'a IntrusiveList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.arena.get(self.current?)?;
        self.current = node.next;
        Some(&node.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values<T: Clone>(list: &IntrusiveList<T>) -> Vec<T> {
        list.iter().cloned().collect()
    }

    #[test]
    fn push_back_keeps_insertion_order() {
        let mut list = IntrusiveList::new();
        list.push_back(1);
        list.push_back(2);
        list.push_back(3);

        assert_eq!(values(&list), vec![1, 2, 3]);
        assert_eq!(list.front(), Some(&1));
        assert_eq!(list.back(), Some(&3));
        assert_eq!(list.len(), 3);
        list.check_invariants().unwrap();
    }

    #[test]
    fn pop_front_takes_head() {
        let mut list = IntrusiveList::new();
        list.push_back("a");
        list.push_back("b");

        assert_eq!(list.pop_front(), Some("a"));
        assert_eq!(values(&list), vec!["b"]);
        assert_eq!(list.pop_front(), Some("b"));
        assert_eq!(list.pop_front(), None);
        assert!(list.is_empty());
        assert!(list.front().is_none());
        assert!(list.back_id().is_none());
        list.check_invariants().unwrap();
    }

    #[test]
    fn move_to_back_from_head_middle_and_tail() {
        let mut list = IntrusiveList::new();
        let a = list.push_back('a');
        let b = list.push_back('b');
        let c = list.push_back('c');

        assert!(list.move_to_back(a));
        assert_eq!(values(&list), vec!['b', 'c', 'a']);

        assert!(list.move_to_back(c));
        assert_eq!(values(&list), vec!['b', 'a', 'c']);

        assert!(list.move_to_back(c));
        assert_eq!(values(&list), vec!['b', 'a', 'c']);
        assert_eq!(list.back_id(), Some(c));

        assert!(list.move_to_back(b));
        assert_eq!(values(&list), vec!['a', 'c', 'b']);
        list.check_invariants().unwrap();
    }

    #[test]
    fn remove_middle_relinks_neighbours() {
        let mut list = IntrusiveList::new();
        list.push_back(1);
        let mid = list.push_back(2);
        list.push_back(3);

        assert_eq!(list.remove(mid), Some(2));
        assert!(!list.contains(mid));
        assert_eq!(values(&list), vec![1, 3]);
        assert!(!list.move_to_back(mid));
        list.check_invariants().unwrap();
    }

    #[test]
    fn freed_slots_are_reused_without_corrupting_order() {
        let mut list = IntrusiveList::with_capacity(2);
        list.push_back(1);
        list.push_back(2);
        for next in 3..50 {
            list.pop_front();
            list.push_back(next);
            list.check_invariants().unwrap();
        }
        assert_eq!(values(&list), vec![48, 49]);
    }
}
