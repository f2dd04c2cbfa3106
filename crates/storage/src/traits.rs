//! The document store contract the graph engine is written against.
//!
//! Documents cross this boundary as `serde_json::Value`; typed encoding is
//! the caller's job. Implementations must be `Send + Sync` and are used from
//! many threads at once.

use relgraph_core::{DocKey, Page, Query, RelGraphResult};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Proof of holding the exclusive lock on one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockToken(u64);

impl LockToken {
    /// Wrap a raw token value issued by a store.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw token value.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lock#{}", self.0)
    }
}

/// Result of locking a document that may not exist yet.
///
/// Locking an absent key succeeds: `existed` is false and `value` is `None`,
/// and the caller builds the document from scratch before writing it back.
#[derive(Debug, Clone, PartialEq)]
pub struct LockedDoc {
    /// Token to pass to `write_unlock`, `remove_unlock` or `unlock`.
    pub token: LockToken,
    /// Whether a live document was present when the lock was taken.
    pub existed: bool,
    /// Current content, if any.
    pub value: Option<Value>,
}

/// Monotonic counters.
pub trait CounterService: Send + Sync {
    /// Advance the counter at `key` by `step` and return the new value.
    ///
    /// A counter that does not exist yet is created holding `floor`, and
    /// `floor` is returned.
    fn increment(&self, key: &str, step: u64, floor: u64) -> RelGraphResult<u64>;
}

/// Keyed JSON documents with advisory locks and filtered scans.
pub trait DocumentStore: Send + Sync {
    /// Create or replace the document at `key`. `None` TTL never expires.
    fn upsert(&self, key: &DocKey, doc: Value, ttl: Option<Duration>) -> RelGraphResult<()>;

    /// Read the document at `key`; `NotFound` when absent or expired.
    fn get(&self, key: &DocKey) -> RelGraphResult<Value>;

    /// Take the exclusive lock on `key`, waiting up to the store's bound.
    ///
    /// Fails with `LockTimeout` when the bound elapses.
    fn lock_for_update(&self, key: &DocKey) -> RelGraphResult<LockedDoc>;

    /// Write `doc` and release the lock in one step.
    fn write_unlock(
        &self,
        key: &DocKey,
        doc: Value,
        token: LockToken,
        ttl: Option<Duration>,
    ) -> RelGraphResult<()>;

    /// Delete the document and release the lock in one step.
    fn remove_unlock(&self, key: &DocKey, token: LockToken) -> RelGraphResult<()>;

    /// Release the lock without writing.
    fn unlock(&self, key: &DocKey, token: LockToken) -> RelGraphResult<()>;

    /// Run a filtered, ordered scan and return one page of (projected) rows.
    fn query(&self, query: &Query, page: Page) -> RelGraphResult<Vec<Value>>;

    /// Count the documents matching `query`'s filter.
    fn count(&self, query: &Query) -> RelGraphResult<u64>;

    /// Largest page `query` accepts, if the store has one.
    fn max_query_limit(&self) -> Option<usize> {
        None
    }
}
