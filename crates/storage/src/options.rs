//! Tuning knobs for [`MemoryStore`](crate::MemoryStore).

use std::time::Duration;

/// Options for creating a [`MemoryStore`](crate::MemoryStore).
///
/// Use the builder pattern to configure options:
///
/// ```ignore
/// use relgraph_storage::MemoryStoreOptions;
/// use std::time::Duration;
///
/// let opts = MemoryStoreOptions::new().lock_timeout(Duration::from_millis(200));
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStoreOptions {
    /// How long `lock_for_update` waits for a held lock.
    pub lock_timeout: Duration,
    /// How long a lock stays valid before another locker may take it over.
    pub lock_ttl: Duration,
    /// Largest `limit` a paged query accepts.
    pub max_query_limit: usize,
}

impl MemoryStoreOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lock wait bound.
    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Set the lock expiry.
    pub fn lock_ttl(mut self, ttl: Duration) -> Self {
        self.lock_ttl = ttl;
        self
    }

    /// Set the largest accepted page size.
    pub fn max_query_limit(mut self, limit: usize) -> Self {
        self.max_query_limit = limit;
        self
    }
}

impl Default for MemoryStoreOptions {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            lock_ttl: Duration::from_secs(15),
            max_query_limit: 10_000,
        }
    }
}
