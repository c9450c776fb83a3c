//! Bounded in-memory LRU cache (default, thread-safe).
//!
//! Recency is a doubly-linked list threaded through a slot arena, with a
//! `HashMap` from key to slot, so lookup, promotion, eviction and removal are
//! all O(1). A single mutex guards each operation end to end. TTL expiration
//! is lazy: it is only checked when an entry is read.

use super::CacheStore;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Cache entry with optional expiration, linked into the recency list.
struct CacheEntry<K, V> {
    key: K,
    value: V,
    expires_at: Option<Instant>,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<K, V> CacheEntry<K, V> {
    fn new(key: K, value: V, ttl: Option<Duration>) -> Self {
        // A TTL too large to represent never expires.
        let expires_at = ttl.and_then(|d| Instant::now().checked_add(d));
        CacheEntry {
            key,
            value,
            expires_at,
            prev: None,
            next: None,
        }
    }

    fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }
}

/// Lock-protected state: arena, free slots, key index and list ends.
///
/// `head` is the most recently used entry, `tail` the least.
struct LruState<K, V> {
    slots: Vec<Option<CacheEntry<K, V>>>,
    free: Vec<usize>,
    index: HashMap<K, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<K: Eq + Hash + Clone, V> LruState<K, V> {
    fn new() -> Self {
        LruState {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
        }
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.slots[idx].as_ref() {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(entry) = self.slots[p].as_mut() {
                    entry.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(entry) = self.slots[n].as_mut() {
                    entry.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(entry) = self.slots[idx].as_mut() {
            entry.prev = None;
            entry.next = None;
        }
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(entry) = self.slots[idx].as_mut() {
            entry.prev = None;
            entry.next = old_head;
        }
        match old_head {
            Some(h) => {
                if let Some(entry) = self.slots[h].as_mut() {
                    entry.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn promote(&mut self, idx: usize) {
        if self.head != Some(idx) {
            self.unlink(idx);
            self.push_front(idx);
        }
    }

    /// Place `entry` in a free slot (or a new one) as the most recently used.
    fn insert_front(&mut self, entry: CacheEntry<K, V>) {
        let key = entry.key.clone();
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(entry);
                idx
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        };
        self.push_front(idx);
        self.index.insert(key, idx);
    }

    fn take(&mut self, idx: usize) -> Option<CacheEntry<K, V>> {
        self.unlink(idx);
        let entry = self.slots[idx].take();
        if entry.is_some() {
            self.free.push(idx);
        }
        entry
    }

    fn remove_key(&mut self, key: &K) -> Option<CacheEntry<K, V>> {
        let idx = self.index.remove(key)?;
        self.take(idx)
    }

    fn pop_lru(&mut self) -> Option<CacheEntry<K, V>> {
        let idx = self.tail?;
        let entry = self.take(idx)?;
        self.index.remove(&entry.key);
        Some(entry)
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
    }
}

/// Thread-safe, size-bounded LRU cache with optional per-entry TTL.
///
/// Capacity pressure always wins over freshness: when a new key arrives and
/// the cache is full, the least recently used entry is evicted even if it
/// never expires. Expired entries are dropped when read; an expired entry
/// that is never read again keeps its slot until evicted or cleared.
///
/// # Example
///
/// ```
/// use gamehub_cache::backend::{CacheStore, LruCache};
/// use std::time::Duration;
///
/// let cache = LruCache::new(2).expect("capacity is valid");
///
/// cache.set("a".to_string(), 1, None);
/// cache.set("b".to_string(), 2, Some(Duration::from_secs(300)));
///
/// // Reading "a" makes it the most recently used...
/// assert_eq!(cache.get(&"a".to_string()), Some(1));
///
/// // ...so "b" is the one evicted to make room for "c".
/// cache.set("c".to_string(), 3, None);
/// assert_eq!(cache.get(&"b".to_string()), None);
/// ```
pub struct LruCache<K, V> {
    capacity: usize,
    state: Mutex<LruState<K, V>>,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    /// Create a new cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity < 1 {
            return Err(Error::ConfigError(format!(
                "LRU cache capacity must be at least 1, got {}",
                capacity
            )));
        }

        Ok(LruCache {
            capacity,
            state: Mutex::new(LruState::new()),
        })
    }

    // Every operation leaves the state consistent before it can panic, so a
    // poisoned lock still guards valid data.
    fn lock(&self) -> MutexGuard<'_, LruState<K, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `value` under `key`, returning the entry evicted to make room.
    ///
    /// Replacing an existing key never evicts anything.
    pub fn insert(&self, key: K, value: V, ttl: Option<Duration>) -> Option<(K, V)> {
        let mut state = self.lock();

        let mut evicted = None;
        if state.remove_key(&key).is_none() && state.len() >= self.capacity {
            evicted = state.pop_lru().map(|entry| (entry.key, entry.value));
            debug!("✓ LRU EVICT (capacity {} reached)", self.capacity);
        }

        state.insert_front(CacheEntry::new(key, value, ttl));

        if let Some(d) = ttl {
            debug!("✓ LRU SET (TTL: {:?}, {} held)", d, state.len());
        } else {
            debug!("✓ LRU SET ({} held)", state.len());
        }

        evicted
    }

    /// Get memory statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        let now = Instant::now();
        let expired_entries = state
            .slots
            .iter()
            .flatten()
            .filter(|entry| entry.is_expired_at(now))
            .count();

        CacheStats {
            total_entries: state.len(),
            expired_entries,
            capacity: self.capacity,
        }
    }
}

impl<K, V> CacheStore<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        let mut state = self.lock();

        let idx = match state.index.get(key) {
            Some(idx) => *idx,
            None => {
                debug!("✓ LRU GET -> MISS");
                return None;
            }
        };

        let expired = state.slots[idx]
            .as_ref()
            .map_or(true, |entry| entry.is_expired_at(Instant::now()));
        if expired {
            state.remove_key(key);
            debug!("✓ LRU GET -> EXPIRED");
            return None;
        }

        state.promote(idx);
        debug!("✓ LRU GET -> HIT");
        state.slots[idx].as_ref().map(|entry| entry.value.clone())
    }

    fn set(&self, key: K, value: V, ttl: Option<Duration>) {
        self.insert(key, value, ttl);
    }

    fn remove(&self, key: &K) {
        self.lock().remove_key(key);
        debug!("✓ LRU DELETE");
    }

    fn clear(&self) {
        self.lock().clear();
        warn!("⚠ LRU CLEAR executed - all entries dropped!");
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn stats(&self) -> CacheStats {
        LruCache::stats(self)
    }
}

/// Cache statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Combine the occupancy of two stores.
    pub fn merge(self, other: CacheStats) -> CacheStats {
        CacheStats {
            total_entries: self.total_entries + other.total_entries,
            expired_entries: self.expired_entries + other.expired_entries,
            capacity: self.capacity + other.capacity,
        }
    }
}
