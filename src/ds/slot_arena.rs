//! Slab of reusable slots addressed by stable [`SlotId`] handles.
//!
//! Freed slots go onto a free list and are handed out again before the
//! backing `Vec` grows, so a cache running at capacity stops allocating once
//! it has filled up.

/// Stable handle to an occupied slot.
///
/// A handle stays valid until its slot is removed; afterwards the index may be
/// reused for an unrelated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    /// Returns the raw slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    vacant: Vec<usize>,
    occupied: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an arena with room for `capacity` values before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            vacant: Vec::new(),
            occupied: 0,
        }
    }

    /// Stores `value`, reusing a vacant slot when one exists.
    pub fn insert(&mut self, value: T) -> SlotId {
        let idx = match self.vacant.pop() {
            Some(idx) => {
                self.slots[idx] = Some(value);
                idx
            },
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            },
        };
        self.occupied += 1;
        SlotId(idx)
    }

    /// Vacates `id` and returns its value; `None` if the slot was empty.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.vacant.push(id.0);
        self.occupied -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
