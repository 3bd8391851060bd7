//! Per-Policy Configuration
//!
//! Plain, public-field configuration structs — one per engine. Each carries
//! only what its engine needs; there is no shared "one config to rule them
//! all" type.

/// Configuration for [`crate::LruCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LruConfig {
    /// Maximum number of live entries. `0` is legal and permanently empty.
    pub capacity: usize,
}

impl LruConfig {
    /// Creates a config with the given capacity.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}

/// Configuration for [`crate::LfuCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LfuConfig {
    /// Maximum number of live entries. `0` is legal and permanently empty.
    pub capacity: usize,
}

impl LfuConfig {
    /// Creates a config with the given capacity.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}

/// Configuration for [`crate::ArcCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcConfig {
    /// Maximum number of live entries (`|T1| + |T2|`). `0` is legal and
    /// permanently empty.
    pub capacity: usize,
}

impl ArcConfig {
    /// Creates a config with the given capacity.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}
