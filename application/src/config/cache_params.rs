//! Cache parameters: panel cache validity and capacity.

use chrono::Duration;

/// Storage key the panel table is persisted under
pub const DEFAULT_CACHE_NAMESPACE: &str = "panel_discussion_cache";

/// Controls how long cached panels stay valid and how many are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheParams {
    /// Entries older than this are treated as absent and deleted on read.
    pub ttl: Duration,
    /// Maximum number of entries; the oldest are evicted first.
    pub capacity: usize,
    /// Key of the single table in the key-value store.
    pub namespace: String,
}

impl Default for CacheParams {
    fn default() -> Self {
        Self {
            ttl: Duration::hours(24),
            capacity: 20,
            namespace: DEFAULT_CACHE_NAMESPACE.to_string(),
        }
    }
}

impl CacheParams {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}
