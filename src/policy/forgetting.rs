//! # Forgetting Map: bounded recency cache
//!
//! A fixed-capacity key-value cache that forgets the least recently used
//! entry once it is full. Both writes and successful reads count as a use.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                       ForgettingMap<K, V>                            │
//!   │                                                                      │
//!   │   capacity: usize (read without locking)                             │
//!   │   ┌────────────────────────────────────────────────────────────────┐ │
//!   │   │              Arc<Mutex<ForgettingCore<K, V>>>                  │ │
//!   │   └────────────────────────────────────────────────────────────────┘ │
//!   │                                 │                                    │
//!   │                                 ▼                                    │
//!   │   ┌────────────────────────────────────────────────────────────────┐ │
//!   │   │  FxHashMap<K, Entry<V>>          Entry { node, value: Arc<V> } │ │
//!   │   │       │                                                        │ │
//!   │   │       │ node: SlotId                                           │ │
//!   │   │       ▼                                                        │ │
//!   │   │  IntrusiveList<K> (recency)                                    │ │
//!   │   │  head ──► [k_a] ◄──► [k_b] ◄──► [k_c] ◄── tail                 │ │
//!   │   │           LRU                    MRU                           │ │
//!   │   └────────────────────────────────────────────────────────────────┘ │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Write flow
//!
//! ```text
//!   write(k, v):
//!     1. k resident:   replace value; if k is not already the tail, move it there
//!     2. k new, full:  pop the head key and drop its map entry (eviction)
//!     3. k new:        push k at the tail, insert map entry
//! ```
//!
//! A write never evicts the key being written, and evicts at most one other
//! key. A read of a resident key always moves it to the tail, even when it is
//! already there.
//!
//! ## Thread Safety
//!
//! - `ForgettingCore`: single-threaded, requires `&mut self` to mutate
//! - `ForgettingMap`: one `parking_lot::Mutex` guards the map and the list
//!   together, so the two can never be observed out of step
//! - `capacity()` is copied out of the core at construction and needs no lock

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::{IntrusiveList, SlotId};
use crate::error::{CacheError, InvariantError};

/// Upper bound on up-front allocation; larger caches grow on demand.
const MAX_PREALLOC: usize = 4096;

#[derive(Debug)]
struct Entry<V> {
    node: SlotId,
    value: Arc<V>,
}

/// Single-threaded bounded recency cache.
///
/// Holds up to `capacity` entries. Writing a new key into a full cache drops
/// the key that has gone longest without being written or read.
///
/// Values are stored as `Arc<V>` so [`read`](Self::read) can hand out a
/// shared handle without cloning `V`.
///
/// # Example
///
/// ```
/// use forgetkit::policy::forgetting::ForgettingCore;
///
/// let mut cache = ForgettingCore::new(2).unwrap();
/// cache.write("a", 1);
/// cache.write("b", 2);
/// assert_eq!(*cache.read(&"a").unwrap(), 1);
///
/// // "b" is now least recently used
/// cache.write("c", 3);
/// assert!(!cache.contains(&"b"));
/// assert_eq!(cache.size(), 2);
/// ```
pub struct ForgettingCore<K, V> {
    map: FxHashMap<K, Entry<V>>,
    recency: IntrusiveList<K>,
    capacity: usize,
}

impl<K, V> ForgettingCore<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// Returns [`CacheError::NotInitialized`] if `capacity < 1`.
    pub fn new(capacity: i64) -> Result<Self, CacheError> {
        if capacity < 1 {
            debug!(capacity, "rejected forgetting map with non-positive capacity");
            return Err(CacheError::NotInitialized);
        }
        // Only reachable on targets where usize is narrower than i64.
        let capacity = usize::try_from(capacity).unwrap_or(usize::MAX);
        let prealloc = capacity.min(MAX_PREALLOC);
        debug!(capacity, "created forgetting map");

        Ok(Self {
            map: FxHashMap::with_capacity_and_hasher(prealloc, Default::default()),
            recency: IntrusiveList::with_capacity(prealloc),
            capacity,
        })
    }

    /// Stores `value` under `key` and marks `key` most recently used.
    ///
    /// Overwrites any previous value. If `key` is new and the cache is full,
    /// the least recently used entry is evicted first.
    pub fn write(&mut self, key: K, value: V) {
        let value = Arc::new(value);

        if let Some(entry) = self.map.get_mut(&key) {
            entry.value = value;
            let node = entry.node;
            // Already the tail: the value changed but the order did not.
            if self.recency.back_id() != Some(node) {
                self.recency.move_to_back(node);
            }
            self.debug_validate();
            return;
        }

        if self.recency.len() >= self.capacity {
            self.evict_lru();
        }
        let node = self.recency.push_back(key.clone());
        self.map.insert(key, Entry { node, value });
        self.debug_validate();
    }

    /// Like [`write`](Self::write), but accepts absent keys or values and
    /// rejects them before touching the cache.
    ///
    /// The key is checked first, so `(None, None)` reports
    /// [`CacheError::KeyNull`].
    pub fn write_nullable(&mut self, key: Option<K>, value: Option<V>) -> Result<(), CacheError> {
        let key = key.ok_or(CacheError::KeyNull)?;
        let value = value.ok_or(CacheError::ValueNull)?;
        self.write(key, value);
        Ok(())
    }

    /// Returns the value for `key` and marks `key` most recently used.
    ///
    /// Returns [`CacheError::KeyNotFound`] if `key` was never written or has
    /// been evicted; recency is left untouched in that case.
    pub fn read(&mut self, key: &K) -> Result<Arc<V>, CacheError> {
        let entry = self.map.get(key).ok_or(CacheError::KeyNotFound)?;
        let node = entry.node;
        let value = Arc::clone(&entry.value);
        self.recency.move_to_back(node);
        self.debug_validate();
        Ok(value)
    }

    /// Like [`read`](Self::read), but accepts an absent key and rejects it
    /// with [`CacheError::KeyNull`].
    pub fn read_nullable(&mut self, key: Option<&K>) -> Result<Arc<V>, CacheError> {
        self.read(key.ok_or(CacheError::KeyNull)?)
    }

    /// Checks residency without changing recency order.
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Current number of live entries.
    pub fn size(&self) -> usize {
        self.recency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recency.is_empty()
    }

    /// Fixed construction-time capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the recency sequence, least recently used first.
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.recency.iter().cloned().collect()
    }

    /// Verifies that the map and the recency list describe the same key set.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.map.len() != self.recency.len() {
            return Err(InvariantError::new(format!(
                "map holds {} entries but recency list holds {}",
                self.map.len(),
                self.recency.len()
            )));
        }
        if self.map.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "size {} exceeds capacity {}",
                self.map.len(),
                self.capacity
            )));
        }
        self.recency.check_invariants()?;
        // Equal lengths plus a node per key that names that key means the two
        // key sets are identical.
        for (key, entry) in &self.map {
            if self.recency.get(entry.node) != Some(key) {
                return Err(InvariantError::new(
                    "map entry points at a recency node for a different key",
                ));
            }
        }
        Ok(())
    }

    fn evict_lru(&mut self) {
        if let Some(evicted) = self.recency.pop_front() {
            self.map.remove(&evicted);
            trace!(
                capacity = self.capacity,
                size = self.map.len(),
                "evicted least recently used entry"
            );
        }
    }

    #[inline]
    fn debug_validate(&self) {
        debug_assert_eq!(self.map.len(), self.recency.len());
        debug_assert!(self.map.len() <= self.capacity);
    }
}

impl<K, V> fmt::Debug for ForgettingCore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForgettingCore")
            .field("size", &self.recency.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

/// Thread-safe bounded recency cache.
///
/// Cloning yields another handle to the same cache. Every operation that
/// touches entries runs under a single exclusive lock.
///
/// # Example
///
/// ```
/// use std::thread;
/// use forgetkit::ForgettingMap;
///
/// let cache = ForgettingMap::new(100).unwrap();
/// let writer = cache.clone();
/// thread::spawn(move || writer.write(1u32, "one".to_string()))
///     .join()
///     .unwrap();
///
/// assert_eq!(*cache.read(&1).unwrap(), "one");
/// assert_eq!(cache.size(), 1);
/// ```
pub struct ForgettingMap<K, V> {
    inner: Arc<Mutex<ForgettingCore<K, V>>>,
    capacity: usize,
}

impl<K, V> ForgettingMap<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// Returns [`CacheError::NotInitialized`] if `capacity < 1`.
    ///
    /// ```
    /// use forgetkit::{CacheError, ForgettingMap};
    ///
    /// assert_eq!(
    ///     ForgettingMap::<u8, u8>::new(-1).unwrap_err(),
    ///     CacheError::NotInitialized
    /// );
    /// let cache = ForgettingMap::<u8, u8>::new(3).unwrap();
    /// assert_eq!(cache.capacity(), 3);
    /// ```
    pub fn new(capacity: i64) -> Result<Self, CacheError> {
        let cache = ForgettingCore::new(capacity)?;
        Ok(Self {
            capacity: cache.capacity(),
            inner: Arc::new(Mutex::new(cache)),
        })
    }

    /// Stores `value` under `key`; see [`ForgettingCore::write`].
    pub fn write(&self, key: K, value: V) {
        self.inner.lock().write(key, value);
    }

    /// See [`ForgettingCore::write_nullable`].
    pub fn write_nullable(&self, key: Option<K>, value: Option<V>) -> Result<(), CacheError> {
        self.inner.lock().write_nullable(key, value)
    }

    /// Returns the value for `key` and marks it most recently used.
    ///
    /// ```
    /// use forgetkit::{CacheError, ForgettingMap};
    ///
    /// let cache = ForgettingMap::new(1).unwrap();
    /// cache.write("a", 1);
    /// cache.write("b", 2);
    /// assert_eq!(cache.read(&"a").unwrap_err(), CacheError::KeyNotFound);
    /// assert_eq!(*cache.read(&"b").unwrap(), 2);
    /// ```
    pub fn read(&self, key: &K) -> Result<Arc<V>, CacheError> {
        self.inner.lock().read(key)
    }

    /// See [`ForgettingCore::read_nullable`].
    pub fn read_nullable(&self, key: Option<&K>) -> Result<Arc<V>, CacheError> {
        self.inner.lock().read_nullable(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn size(&self) -> usize {
        self.inner.lock().size()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Fixed construction-time capacity. Takes no lock.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the recency sequence, least recently used first.
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.inner.lock().keys_by_recency()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }
}

impl<K, V> Clone for ForgettingMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            capacity: self.capacity,
        }
    }
}

impl<K, V> fmt::Debug for ForgettingMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.inner.lock();
        f.debug_struct("ForgettingMap")
            .field("size", &guard.recency.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
