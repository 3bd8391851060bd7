//! Unified Cache Entry Type
//!
//! This module provides a unified `CacheEntry<K, V, M>` structure that can be used
//! across all cache engines. The generic `M` parameter allows each engine to
//! store its own metadata without affecting the core entry structure.
//!
//! # Memory Layout
//!
//! - `key: K` - user's key type
//! - `value: V` - user's value type
//! - `metadata: Option<M>` - 0+ bytes depending on engine
//!
//! # Usage Examples
//!
//! ```
//! use cache_core::entry::CacheEntry;
//!
//! // Simple entry without engine-specific metadata (e.g., for LRU)
//! let entry: CacheEntry<&str, i32, ()> = CacheEntry::new("key", 42);
//!
//! // Entry with frequency metadata (e.g., for LFU)
//! use cache_core::meta::LfuMeta;
//! let entry = CacheEntry::with_metadata("key", "value", LfuMeta::new(1));
//! ```

use std::fmt;

/// Unified cache entry holding a key, value, and engine-specific metadata.
///
/// The `M` parameter allows each engine to store its own metadata without
/// affecting the core entry structure. Use `()` for engines that don't need
/// extra per-entry metadata (e.g., LRU).
///
/// # Examples
///
/// ```
/// use cache_core::entry::CacheEntry;
///
/// let entry: CacheEntry<&str, i32, ()> = CacheEntry::new("key", 42);
/// assert_eq!(entry.key, "key");
/// assert_eq!(entry.value, 42);
/// ```
pub struct CacheEntry<K, V, M = ()> {
    /// The cached key.
    pub key: K,

    /// The cached value.
    pub value: V,

    /// Engine-specific metadata (frequency, list tag, etc.). `None` for
    /// engines that don't need per-entry metadata (e.g., LRU).
    pub metadata: Option<M>,
}

impl<K, V, M> CacheEntry<K, V, M> {
    /// Creates a new cache entry without engine-specific metadata.
    #[inline]
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            metadata: None,
        }
    }

    /// Creates a new cache entry with engine-specific metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// use cache_core::entry::CacheEntry;
    /// use cache_core::meta::LfuMeta;
    ///
    /// let entry = CacheEntry::with_metadata("key", vec![1, 2, 3], LfuMeta::new(0));
    /// assert!(entry.metadata.is_some());
    /// ```
    #[inline]
    pub fn with_metadata(key: K, value: V, metadata: M) -> Self {
        Self {
            key,
            value,
            metadata: Some(metadata),
        }
    }

    /// Returns a mutable reference to the metadata, or `None` if the entry
    /// was created without any.
    #[inline]
    pub fn metadata_mut(&mut self) -> Option<&mut M> {
        self.metadata.as_mut()
    }
}

impl<K: Clone, V: Clone, M: Clone> Clone for CacheEntry<K, V, M> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            value: self.value.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, M: fmt::Debug> fmt::Debug for CacheEntry<K, V, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("metadata", &self.metadata)
            .finish()
    }
}
