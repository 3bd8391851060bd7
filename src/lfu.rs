//! Least Frequently Used (LFU) Cache Engine
//!
//! Entries are bucketed by access frequency in a `BTreeMap<frequency, List>`;
//! a `min_freq` scalar tracks the lowest populated bucket for O(1) eviction.
//! Within a bucket, ties break least-recently-touched-first (the bucket's
//! own list is itself an LRU list).
//!
//! The touch procedure (shared by `get` hits and `put` on an existing key)
//! moves an entry's node from bucket `f` to bucket `f + 1`, dropping bucket
//! `f` if it empties and advancing `min_freq` past it — but a subsequent
//! insertion always resets `min_freq` to 1, since new entries always start
//! at frequency 1.

use crate::cache::Cache;
use crate::entry::CacheEntry;
use crate::list::{List, Node};
use crate::meta::LfuMeta;
use crate::metrics::{Metrics, MetricsSnapshot};
use hashbrown::hash_map::DefaultHashBuilder;
use hashbrown::HashMap;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::time::Instant;

type LfuNode<K, V> = Node<CacheEntry<K, V, LfuMeta>>;

enum PutOutcome {
    Rejected,
    Accepted { evicted: bool },
}

struct Inner<K, V, S> {
    capacity: usize,
    min_freq: u64,
    index: HashMap<K, *mut LfuNode<K, V>, S>,
    buckets: BTreeMap<u64, List<CacheEntry<K, V, LfuMeta>>>,
}

// SAFETY: Inner owns every node reachable from `index`; raw pointers never
// escape the struct and all mutation happens through `&mut self`.
unsafe impl<K: Send, V: Send, S: Send> Send for Inner<K, V, S> {}
// SAFETY: no interior mutability through a shared reference.
unsafe impl<K: Send, V: Send, S: Sync> Sync for Inner<K, V, S> {}

impl<K: Hash + Eq, V, S: BuildHasher> Inner<K, V, S> {
    /// Moves the node's entry from its current frequency bucket to the next.
    fn touch(&mut self, node: *mut LfuNode<K, V>) -> *mut LfuNode<K, V>
    where
        K: Clone,
    {
        // SAFETY: node is a live pointer registered by this struct.
        unsafe {
            let freq = (*node)
                .get_value()
                .metadata
                .expect("LFU entries always carry metadata")
                .frequency;

            let bucket = self
                .buckets
                .get_mut(&freq)
                .expect("bucket for current frequency must exist");
            let mut entry = bucket.take(node).expect("node must be present in its bucket");
            let emptied = bucket.is_empty();
            if emptied {
                self.buckets.remove(&freq);
                if self.min_freq == freq {
                    self.min_freq = freq + 1;
                }
            }

            let new_freq = entry
                .metadata
                .as_mut()
                .expect("LFU entries always carry metadata")
                .increment();
            let key = entry.key.clone();

            let capacity = self.capacity;
            let new_bucket = self
                .buckets
                .entry(new_freq)
                .or_insert_with(|| List::new(capacity));
            let new_node = new_bucket.add_unchecked(entry);
            self.index.insert(key, new_node);
            new_node
        }
    }

    fn get(&mut self, key: &K) -> Option<V>
    where
        K: Clone,
        V: Clone,
    {
        let node = *self.index.get(key)?;
        let node = self.touch(node);
        // SAFETY: touch returns the entry's new, live node.
        unsafe { Some((*node).get_value().value.clone()) }
    }

    fn evict_one(&mut self) {
        let freq = self.min_freq;
        let Some(bucket) = self.buckets.get_mut(&freq) else {
            return;
        };
        if let Some(entry) = bucket.pop_back() {
            self.index.remove(&entry.key);
        }
        if bucket.is_empty() {
            self.buckets.remove(&freq);
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
            unsafe { (*node).get_value_mut().value = value };
            self.touch(node);
            return PutOutcome::Accepted { evicted: false };
        }

        let mut evicted = false;
        if self.index.len() >= self.capacity {
            self.evict_one();
            evicted = true;
        }

        let entry = CacheEntry::with_metadata(key.clone(), value, LfuMeta::new(1));
        let bucket = self
            .buckets
            .entry(1)
            .or_insert_with(|| List::new(self.capacity));
        let node = bucket.add_unchecked(entry);
        self.index.insert(key, node);
        self.min_freq = 1;

        PutOutcome::Accepted { evicted }
    }

    fn remove(&mut self, key: &K) -> bool {
        let Some(node) = self.index.remove(key) else {
            return false;
        };
        // SAFETY: node was registered by this struct and is still live.
        let freq = unsafe {
            (*node)
                .get_value()
                .metadata
                .expect("LFU entries always carry metadata")
                .frequency
        };
        if let Some(bucket) = self.buckets.get_mut(&freq) {
            // SAFETY: node belongs to this bucket.
            unsafe { bucket.take(node) };
            let emptied = bucket.is_empty();
            if emptied {
                self.buckets.remove(&freq);
                if self.min_freq == freq {
                    self.min_freq = self.buckets.keys().next().copied().unwrap_or(1);
                }
            }
        }
        true
    }

    fn clear(&mut self) {
        self.index.clear();
        self.buckets.clear();
        self.min_freq = 1;
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}

/// A Least Frequently Used cache engine.
///
/// Ties within a frequency bucket break least-recently-touched-first.
///
/// ```
/// use cache_core::{Cache, LfuCache};
///
/// let cache = LfuCache::new(2);
/// cache.put(1, 10);
/// cache.put(2, 20);
/// cache.get(&1); // 1 now has frequency 2
/// cache.put(3, 30); // evicts 2, the less frequent key
///
/// assert_eq!(cache.get(&2), None);
/// assert_eq!(cache.get(&1), Some(10));
/// assert_eq!(cache.get(&3), Some(30));
/// ```
pub struct LfuCache<K, V, S = DefaultHashBuilder> {
    inner: RwLock<Inner<K, V, S>>,
    metrics: Metrics,
}

impl<K: Hash + Eq, V> LfuCache<K, V, DefaultHashBuilder> {
    /// Creates a new LFU cache holding at most `capacity` entries.
    ///
    /// `capacity = 0` is legal: every `put` is rejected and every `get` misses.
    pub fn new(capacity: usize) -> Self {
        Self::with_hasher(capacity, DefaultHashBuilder::default())
    }

    /// Creates a new LFU cache from a [`crate::config::LfuConfig`].
    pub fn from_config(config: crate::config::LfuConfig) -> Self {
        Self::new(config.capacity)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LfuCache<K, V, S> {
    /// Creates a new LFU cache with a custom hash builder.
    pub fn with_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            inner: RwLock::new(Inner {
                capacity,
                min_freq: 1,
                index: HashMap::with_hasher(hasher),
                buckets: BTreeMap::new(),
            }),
            metrics: Metrics::new(),
        }
    }

    /// Returns a point-in-time snapshot of this cache's metrics.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher> Cache<K, V> for LfuCache<K, V, S> {
    fn put(&self, key: K, value: V) -> bool {
        let start = Instant::now();
        let mut inner = self.inner.write();
        let outcome = inner.put(key, value);
        let size = inner.len();
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
        let size = inner.len();
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
        self.inner.read().len()
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

impl<K, V, S> fmt::Debug for LfuCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("LfuCache")
            .field("capacity", &inner.capacity)
            .field("size", &inner.index.len())
            .field("min_freq", &inner.min_freq)
            .finish()
    }
}
