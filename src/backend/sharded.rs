//! Sharded LRU cache for contended slots.
//!
//! Splits the key space across independently locked [`LruCache`] shards.
//! The external contract is the same as a single cache, except that recency
//! and eviction are tracked per shard: the entry evicted is the least
//! recently used one *in the shard the new key hashes to*.

use super::{CacheStats, CacheStore, LruCache};
use crate::error::{Error, Result};
use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};
use std::time::Duration;

/// Thread-safe LRU cache with one lock per shard.
///
/// Total capacity is split as evenly as possible, so the sum of the shard
/// capacities equals the configured capacity and no shard is empty.
///
/// Keys are routed with a fixed-seed hasher, so a key always lands in the same
/// shard. A shard that fills up evicts its own LRU entry even while other
/// shards have room.
pub struct ShardedLruCache<K, V> {
    shards: Vec<LruCache<K, V>>,
    hasher: BuildHasherDefault<DefaultHasher>,
    capacity: usize,
}

impl<K: Eq + Hash + Clone, V> ShardedLruCache<K, V> {
    /// Create a cache of `capacity` entries spread across `shard_count` shards.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if `capacity` is 0, `shard_count` is 0, or
    /// `shard_count` exceeds `capacity`.
    pub fn new(capacity: usize, shard_count: usize) -> Result<Self> {
        if shard_count == 0 || shard_count > capacity {
            return Err(Error::ConfigError(format!(
                "shard count must be between 1 and capacity ({}), got {}",
                capacity, shard_count
            )));
        }

        let base = capacity / shard_count;
        let extra = capacity % shard_count;
        let shards = (0..shard_count)
            .map(|i| LruCache::new(base + usize::from(i < extra)))
            .collect::<Result<Vec<_>>>()?;

        Ok(ShardedLruCache {
            shards,
            hasher: BuildHasherDefault::default(),
            capacity,
        })
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard_index(&self, key: &K) -> usize {
        self.hasher.hash_one(key) as usize % self.shards.len()
    }

    fn shard(&self, key: &K) -> &LruCache<K, V> {
        &self.shards[self.shard_index(key)]
    }
}

impl<K, V> CacheStore<K, V> for ShardedLruCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        self.shard(key).get(key)
    }

    fn set(&self, key: K, value: V, ttl: Option<Duration>) {
        self.shard(&key).insert(key, value, ttl);
    }

    fn remove(&self, key: &K) {
        self.shard(key).remove(key);
    }

    fn clear(&self) {
        for shard in &self.shards {
            shard.clear();
        }
    }

    fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.len()).sum()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn stats(&self) -> CacheStats {
        self.shards
            .iter()
            .map(|shard| shard.stats())
            .fold(CacheStats::default(), CacheStats::merge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_sharded_capacity_split() {
        let cache = ShardedLruCache::<String, u32>::new(10, 3).expect("Failed to create cache");

        assert_eq!(cache.shard_count(), 3);
        let capacities: Vec<usize> = cache.shards.iter().map(|s| s.capacity()).collect();
        assert_eq!(capacities, vec![4, 3, 3]);
        assert_eq!(cache.capacity(), 10);
    }

    #[test]
    fn test_sharded_invalid_shard_count() {
        assert!(matches!(
            ShardedLruCache::<String, u32>::new(4, 0),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            ShardedLruCache::<String, u32>::new(2, 3),
            Err(Error::ConfigError(_))
        ));
    }

    #[test]
    fn test_sharded_set_get_remove() {
        // 8 entries per shard: eight keys fit however they are routed
        let cache = ShardedLruCache::new(32, 4).expect("Failed to create cache");

        for i in 0..8 {
            cache.set(format!("key_{}", i), i, None);
        }
        for i in 0..8 {
            assert_eq!(cache.get(&format!("key_{}", i)), Some(i));
        }

        cache.remove(&"key_3".to_string());
        assert_eq!(cache.get(&"key_3".to_string()), None);
        assert_eq!(cache.len(), 7);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_sharded_routing_is_stable() {
        let first = ShardedLruCache::<String, u32>::new(16, 4).expect("Failed to create cache");
        let second = ShardedLruCache::<String, u32>::new(16, 4).expect("Failed to create cache");

        for i in 0..32 {
            let key = format!("key_{}", i);
            assert_eq!(first.shard_index(&key), second.shard_index(&key));
        }
    }

    #[test]
    fn test_sharded_evicts_within_full_shard() {
        let cache = ShardedLruCache::new(4, 2).expect("Failed to create cache");
        let colliding: Vec<String> = (0..)
            .map(|i| format!("key_{}", i))
            .filter(|k| cache.shard_index(k) == 0)
            .take(3)
            .collect();

        for (i, key) in colliding.iter().enumerate() {
            cache.set(key.clone(), i, None);
        }

        // Shard 0 holds two entries, so its LRU went while the total is under 4
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&colliding[0]), None);
        assert_eq!(cache.get(&colliding[1]), Some(1));
        assert_eq!(cache.get(&colliding[2]), Some(2));
    }

    #[test]
    fn test_sharded_capacity_never_exceeded() {
        let cache = ShardedLruCache::new(8, 4).expect("Failed to create cache");

        for i in 0..200 {
            cache.set(format!("key_{}", i), i, None);
            assert!(cache.len() <= 8);
        }
        assert_eq!(cache.stats().capacity, 8);
    }

    #[test]
    fn test_sharded_thread_safe() {
        let cache = ShardedLruCache::new(32, 4).expect("Failed to create cache");

        thread::scope(|s| {
            for t in 0..4 {
                let cache = &cache;
                s.spawn(move || {
                    for i in 0..250 {
                        let k = format!("key_{}", (t + i) % 50);
                        cache.set(k.clone(), i, Some(Duration::from_secs(60)));
                        cache.get(&k);
                    }
                });
            }
        });

        assert!(cache.len() <= 32);
    }
}
