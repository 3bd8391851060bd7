//! A thread-safe, bounded key-value cache library.
//!
//! Three interchangeable engines — [`LruCache`], [`LfuCache`], and
//! [`ArcCache`] — implement the same [`Cache`] trait, so an application can
//! swap its eviction policy without touching call sites.
//!
//! ```
//! use cache_core::{Cache, LruCache};
//!
//! let cache = LruCache::new(100);
//! cache.put("session:42", "active");
//! assert_eq!(cache.get(&"session:42"), Some("active"));
//! ```
//!
//! # Choosing an engine
//!
//! | Engine | Evicts | Good for |
//! |--------|--------|----------|
//! | [`LruCache`] | the least recently used entry | recency-biased workloads |
//! | [`LfuCache`] | the least frequently used entry | stable popularity distributions |
//! | [`ArcCache`] | adaptively, between recency and frequency | workloads whose pattern isn't known up front |
//!
//! # Concurrency
//!
//! Every engine serializes its mutable state behind a single
//! [`parking_lot::RwLock`]; `get` takes the write lock too, since an LRU/LFU
//! hit reorders internal lists. Counters in [`metrics`] are lock-free atomics
//! read independently of that lock.
//!
//! # Modules
//!
//! - [`cache`]: the [`Cache`] trait all three engines implement
//! - [`lru`], [`lfu`], [`arc`]: the three eviction engines
//! - [`config`]: per-engine configuration structs
//! - [`metrics`]: hit/miss/eviction counters, a size gauge, and an optional
//!   latency histogram
//! - [`entry`]: the shared `CacheEntry<K, V, M>` type
//! - [`meta`]: per-engine entry metadata (`LfuMeta`; ARC needs none — its
//!   list identity lives entirely in the engine's own index)
//! - [`list`]: the intrusive doubly-linked list underlying all three engines

pub mod arc;
pub mod cache;
pub mod config;
pub mod entry;
pub mod lfu;
pub(crate) mod list;
pub mod lru;
pub mod meta;
pub mod metrics;

pub use arc::ArcCache;
pub use cache::Cache;
pub use lfu::LfuCache;
pub use lru::LruCache;

pub use config::{ArcConfig, LfuConfig, LruConfig};
pub use entry::CacheEntry;
pub use meta::LfuMeta;
pub use metrics::{Metrics, MetricsSnapshot};
