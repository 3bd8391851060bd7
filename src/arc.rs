//! Adaptive Replacement Cache (ARC)
//!
//! Balances recency against frequency by splitting the cache into four
//! lists: `T1` holds entries seen exactly once recently, `T2` holds entries
//! seen two or more times, and `B1`/`B2` are "ghost" lists — keys recently
//! evicted from `T1`/`T2` respectively, kept without their values purely to
//! inform the adaptive target `p`.
//!
//! `p` is the target size of `T1`. A hit on a `B1` ghost means `T1` is
//! shrinking entries too eagerly, so `p` grows; a hit on a `B2` ghost means
//! the opposite, so `p` shrinks. `REPLACE` then evicts from whichever of
//! `T1`/`T2` currently exceeds its target, moving the evicted entry to the
//! corresponding ghost list.

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

type ArcEntryNode<K, V> = Node<CacheEntry<K, V>>;
type GhostNode<K> = Node<K>;

/// Which ghost list a hit came from, needed by [`Inner::replace`] to break
/// a tie at `|T1| == p` in favor of evicting from `T1`.
#[derive(Clone, Copy)]
enum GhostHint {
    B1,
    B2,
}

/// Where a key currently lives. Carries the node pointer directly so a hit
/// never needs a second lookup into the list it names.
enum Location<K, V> {
    T1(*mut ArcEntryNode<K, V>),
    T2(*mut ArcEntryNode<K, V>),
    B1(*mut GhostNode<K>),
    B2(*mut GhostNode<K>),
}

// Raw pointers are always Copy regardless of what they point to; a derived
// impl would wrongly require `K: Clone, V: Clone`.
impl<K, V> Clone for Location<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K, V> Copy for Location<K, V> {}

enum PutOutcome {
    Rejected,
    Accepted { evicted: bool },
}

struct Inner<K, V, S> {
    capacity: usize,
    /// Target size of T1; adapts within `[0, capacity]` on every ghost hit.
    p: usize,
    t1: List<CacheEntry<K, V>>,
    t2: List<CacheEntry<K, V>>,
    b1: List<K>,
    b2: List<K>,
    index: HashMap<K, Location<K, V>, S>,
}

// SAFETY: Inner owns every node reachable from `index`; raw pointers never
// escape the struct and all mutation happens through `&mut self`.
unsafe impl<K: Send, V: Send, S: Send> Send for Inner<K, V, S> {}
// SAFETY: no interior mutability through a shared reference.
unsafe impl<K: Send, V: Send, S: Sync> Sync for Inner<K, V, S> {}

impl<K: Hash + Eq, V, S: BuildHasher> Inner<K, V, S> {
    fn len(&self) -> usize {
        self.t1.len() + self.t2.len()
    }

    /// Evicts one entry from whichever of T1/T2 currently exceeds its
    /// adaptive target, demoting it to the matching ghost list. Returns
    /// whether an entry was actually evicted.
    fn replace(&mut self, ghost_hint: GhostHint) -> bool
    where
        K: Clone,
    {
        let t1_len = self.t1.len();
        let prefer_t1 = t1_len > 0
            && (t1_len > self.p || (matches!(ghost_hint, GhostHint::B2) && t1_len == self.p));

        if prefer_t1 {
            if let Some(old_entry) = self.t1.pop_back() {
                let old_key = old_entry.key;
                let ghost_node = self.b1.add_unchecked(old_key.clone());
                self.index.insert(old_key, Location::B1(ghost_node));
                return true;
            }
            false
        } else if !self.t2.is_empty() {
            if let Some(old_entry) = self.t2.pop_back() {
                let old_key = old_entry.key;
                let ghost_node = self.b2.add_unchecked(old_key.clone());
                self.index.insert(old_key, Location::B2(ghost_node));
                return true;
            }
            false
        } else {
            false
        }
    }

    fn get(&mut self, key: &K) -> Option<V>
    where
        K: Clone,
        V: Clone,
    {
        let loc = *self.index.get(key)?;
        match loc {
            Location::T1(node) => {
                // SAFETY: node is registered in T1 by this struct.
                let entry = unsafe { self.t1.take(node) }.expect("node must be present in T1");
                let value = entry.value.clone();
                let new_node = self.t2.add_unchecked(entry);
                self.index.insert(key.clone(), Location::T2(new_node));
                Some(value)
            }
            // SAFETY: node is registered in T2 by this struct.
            Location::T2(node) => unsafe {
                self.t2.move_to_front(node);
                Some((*node).get_value().value.clone())
            },
            Location::B1(_) | Location::B2(_) => None,
        }
    }

    fn put(&mut self, key: K, value: V) -> PutOutcome
    where
        K: Clone,
    {
        if self.capacity == 0 {
            return PutOutcome::Rejected;
        }

        match self.index.get(&key).copied() {
            Some(Location::T1(node)) => {
                // SAFETY: node is registered in T1 by this struct.
                let mut entry = unsafe { self.t1.take(node) }.expect("node must be present in T1");
                entry.value = value;
                let new_node = self.t2.add_unchecked(entry);
                self.index.insert(key, Location::T2(new_node));
                PutOutcome::Accepted { evicted: false }
            }
            Some(Location::T2(node)) => {
                // SAFETY: node is registered in T2 by this struct.
                unsafe {
                    self.t2.move_to_front(node);
                    (*node).get_value_mut().value = value;
                }
                PutOutcome::Accepted { evicted: false }
            }
            Some(Location::B1(ghost_node)) => {
                let b1_len = self.b1.len();
                let b2_len = self.b2.len();
                let delta = (b2_len / b1_len).max(1);
                self.p = (self.p + delta).min(self.capacity);

                let evicted = self.replace(GhostHint::B1);
                // SAFETY: ghost_node is registered in B1 by this struct.
                unsafe { self.b1.take(ghost_node) };

                let entry = CacheEntry::new(key.clone(), value);
                let node = self.t2.add_unchecked(entry);
                self.index.insert(key, Location::T2(node));

                PutOutcome::Accepted { evicted }
            }
            Some(Location::B2(ghost_node)) => {
                let b1_len = self.b1.len();
                let b2_len = self.b2.len();
                let delta = (b1_len / b2_len).max(1);
                self.p = self.p.saturating_sub(delta);

                let evicted = self.replace(GhostHint::B2);
                // SAFETY: ghost_node is registered in B2 by this struct.
                unsafe { self.b2.take(ghost_node) };

                let entry = CacheEntry::new(key.clone(), value);
                let node = self.t2.add_unchecked(entry);
                self.index.insert(key, Location::T2(node));

                PutOutcome::Accepted { evicted }
            }
            None => {
                let l1_len = self.t1.len() + self.b1.len();
                let l2_len = self.t2.len() + self.b2.len();
                let mut evicted = false;

                if l1_len == self.capacity {
                    if self.t1.len() < self.capacity {
                        // B1 accounts for the overflow; drop its LRU ghost,
                        // then REPLACE may still evict a live occupant.
                        if let Some(old_key) = self.b1.pop_back() {
                            self.index.remove(&old_key);
                        }
                        evicted = self.replace(GhostHint::B1);
                    } else {
                        // T1 alone fills the cache (B1 is empty): discard its
                        // LRU outright, with no ghost. Demoting it to B1
                        // instead would push |T1| + |B1| past capacity.
                        if let Some(old_entry) = self.t1.pop_back() {
                            self.index.remove(&old_entry.key);
                        }
                        evicted = true;
                    }
                } else if l1_len < self.capacity && l1_len + l2_len >= self.capacity {
                    if l1_len + l2_len >= 2 * self.capacity {
                        if let Some(old_key) = self.b2.pop_back() {
                            self.index.remove(&old_key);
                        }
                    }
                    evicted = self.replace(GhostHint::B1);
                }

                let entry = CacheEntry::new(key.clone(), value);
                let node = self.t1.add_unchecked(entry);
                self.index.insert(key, Location::T1(node));

                PutOutcome::Accepted { evicted }
            }
        }
    }

    fn remove(&mut self, key: &K) -> bool {
        let Some(loc) = self.index.remove(key) else {
            return false;
        };
        match loc {
            // SAFETY: each pointer is registered in the list named by its variant.
            Location::T1(node) => unsafe {
                self.t1.take(node);
            },
            Location::T2(node) => unsafe {
                self.t2.take(node);
            },
            Location::B1(node) => unsafe {
                self.b1.take(node);
            },
            Location::B2(node) => unsafe {
                self.b2.take(node);
            },
        }
        true
    }

    fn clear(&mut self) {
        self.index.clear();
        self.t1.clear();
        self.t2.clear();
        self.b1.clear();
        self.b2.clear();
        self.p = 0;
    }
}

/// An Adaptive Replacement Cache engine.
///
/// ```
/// use cache_core::{Cache, ArcCache};
///
/// let cache = ArcCache::new(3);
/// cache.put(1, "a");
/// cache.put(2, "b");
/// cache.put(3, "c");
/// cache.get(&1); // promotes 1 into T2
/// cache.put(4, "d"); // evicts from T1, not the just-promoted 1
///
/// assert_eq!(cache.get(&1), Some("a"));
/// assert_eq!(cache.size(), 3);
/// ```
pub struct ArcCache<K, V, S = DefaultHashBuilder> {
    inner: RwLock<Inner<K, V, S>>,
    metrics: Metrics,
}

impl<K: Hash + Eq, V> ArcCache<K, V, DefaultHashBuilder> {
    /// Creates a new ARC cache holding at most `capacity` live entries
    /// (`|T1| + |T2|`).
    ///
    /// `capacity = 0` is legal: every `put` is rejected and every `get` misses.
    pub fn new(capacity: usize) -> Self {
        Self::with_hasher(capacity, DefaultHashBuilder::default())
    }

    /// Creates a new ARC cache from a [`crate::config::ArcConfig`].
    pub fn from_config(config: crate::config::ArcConfig) -> Self {
        Self::new(config.capacity)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> ArcCache<K, V, S> {
    /// Creates a new ARC cache with a custom hash builder.
    pub fn with_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            inner: RwLock::new(Inner {
                capacity,
                p: 0,
                t1: List::new(capacity),
                t2: List::new(capacity),
                b1: List::new(capacity),
                b2: List::new(capacity),
                index: HashMap::with_hasher(hasher),
            }),
            metrics: Metrics::new(),
        }
    }

    /// Returns a point-in-time snapshot of this cache's metrics.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Returns the current adaptive target size of T1. Exposed for tests and
    /// diagnostics; not part of the uniform [`Cache`] contract.
    pub fn target_p(&self) -> usize {
        self.inner.read().p
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher> Cache<K, V> for ArcCache<K, V, S> {
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

impl<K, V, S> fmt::Debug for ArcCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("ArcCache")
            .field("capacity", &inner.capacity)
            .field("size", &inner.len())
            .field("p", &inner.p)
            .finish()
    }
}
