//! Least Recently Used (LRU) Cache Engine
//!
//! One doubly-linked list ordered front = most-recently-used, back =
//! least-recently-used, plus a hash index from key to list position. A `put`
//! on a full cache evicts the back node; a `get` hit splices its node to the
//! front. Both operations are O(1) amortized.

use crate::cache::Cache;
use crate::entry::CacheEntry;
use crate::list::{List, Node};
use crate::metrics::{Metrics, MetricsSnapshot};
use hashbrown::hash_map::DefaultHashBuilder;
use hashbrown::HashMap;
use parking_lot::RwLock;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::time::Instant;

type LruNode<K, V> = Node<CacheEntry<K, V>>;

enum PutOutcome {
    Rejected,
    Accepted { evicted: bool },
}

struct Inner<K, V, S> {
    capacity: usize,
    list: List<CacheEntry<K, V>>,
    index: HashMap<K, *mut LruNode<K, V>, S>,
}

// SAFETY: Inner owns every node reachable from `index`; raw pointers never
// escape the struct and all mutation happens through `&mut self`.
unsafe impl<K: Send, V: Send, S: Send> Send for Inner<K, V, S> {}
// SAFETY: no interior mutability through a shared reference.
unsafe impl<K: Send, V: Send, S: Sync> Sync for Inner<K, V, S> {}

impl<K: Hash + Eq, V, S: BuildHasher> Inner<K, V, S> {
    fn get(&mut self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let node = *self.index.get(key)?;
        // SAFETY: node is a live pointer registered by this struct.
        unsafe {
            self.list.move_to_front(node);
            Some((*node).get_value().value.clone())
        }
    }

    fn put(&mut self, key: K, value: V) -> PutOutcome
    where
        K: Clone,
    {
        if self.capacity == 0 {
            return PutOutcome::Rejected;
        }

        if let Some(&node) = self.index.get(&key) {
            // SAFETY: node is a live pointer registered by this struct.
            unsafe {
                self.list.move_to_front(node);
                (*node).get_value_mut().value = value;
            }
            return PutOutcome::Accepted { evicted: false };
        }

        let mut evicted = false;
        if self.list.len() >= self.capacity {
            if let Some(lru) = self.list.pop_back() {
                self.index.remove(&lru.key);
                evicted = true;
            }
        }

        let node = self
            .list
            .add(CacheEntry::new(key.clone(), value))
            .expect("capacity was just made available");
        self.index.insert(key, node);
        PutOutcome::Accepted { evicted }
    }

    fn remove(&mut self, key: &K) -> bool {
        let Some(node) = self.index.remove(key) else {
            return false;
        };
        // SAFETY: node was registered by this struct and is still live.
        unsafe { self.list.take(node) };
        true
    }

    fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }
}

/// A Least Recently Used cache engine.
///
/// ```
/// use cache_core::{Cache, LruCache};
///
/// let cache = LruCache::new(2);
/// cache.put(1, "a");
/// cache.put(2, "b");
/// assert_eq!(cache.get(&1), Some("a"));
///
/// cache.put(3, "c"); // evicts 2, the least recently used
/// assert_eq!(cache.get(&2), None);
/// ```
pub struct LruCache<K, V, S = DefaultHashBuilder> {
    inner: RwLock<Inner<K, V, S>>,
    metrics: Metrics,
}

impl<K: Hash + Eq, V> LruCache<K, V, DefaultHashBuilder> {
    /// Creates a new LRU cache holding at most `capacity` entries.
    ///
    /// `capacity = 0` is legal: every `put` is rejected and every `get` misses.
    pub fn new(capacity: usize) -> Self {
        Self::with_hasher(capacity, DefaultHashBuilder::default())
    }

    /// Creates a new LRU cache from a [`crate::config::LruConfig`].
    pub fn from_config(config: crate::config::LruConfig) -> Self {
        Self::new(config.capacity)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LruCache<K, V, S> {
    /// Creates a new LRU cache with a custom hash builder.
    pub fn with_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            inner: RwLock::new(Inner {
                capacity,
                list: List::new(capacity),
                index: HashMap::with_hasher(hasher),
            }),
            metrics: Metrics::new(),
        }
    }

    /// Returns a point-in-time snapshot of this cache's metrics.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher> Cache<K, V> for LruCache<K, V, S> {
    fn put(&self, key: K, value: V) -> bool {
        let start = Instant::now();
        let mut inner = self.inner.write();
        let outcome = inner.put(key, value);
        let size = inner.index.len();
        drop(inner);

        self.metrics.set_size(size);
        self.metrics.record_latency(start);

        match outcome {
            PutOutcome::Rejected => false,
            PutOutcome::Accepted { evicted } => {
                if evicted {
                    self.metrics.record_eviction();
                }
                true
            }
        }
    }

    fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let start = Instant::now();
        let mut inner = self.inner.write();
        let result = inner.get(key);
        drop(inner);

        self.metrics.record_latency(start);
        match &result {
            Some(_) => self.metrics.record_hit(),
            None => self.metrics.record_miss(),
        }
        result
    }

    fn remove(&self, key: &K) -> bool {
        let mut inner = self.inner.write();
        let removed = inner.remove(key);
        let size = inner.index.len();
        drop(inner);
        self.metrics.set_size(size);
        removed
    }

    fn clear(&self) {
        let mut inner = self.inner.write();
        inner.clear();
        drop(inner);
        self.metrics.set_size(0);
    }

    fn size(&self) -> usize {
        self.inner.read().index.len()
    }

    fn capacity(&self) -> usize {
        self.inner.read().capacity
    }

    fn hit_count(&self) -> u64 {
        self.metrics.hit_count()
    }

    fn miss_count(&self) -> u64 {
        self.metrics.miss_count()
    }

    fn eviction_count(&self) -> u64 {
        self.metrics.eviction_count()
    }

    fn hit_rate(&self) -> f64 {
        self.metrics.hit_rate()
    }
}

impl<K, V, S> fmt::Debug for LruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("LruCache")
            .field("capacity", &inner.capacity)
            .field("size", &inner.index.len())
            .finish()
    }
}
