//! Sharded in-memory document store
//!
//! Reference implementation of [`DocumentStore`] and [`CounterService`].
//!
//! # Design
//!
//! - DashMap keyed by bucket: buckets never contend with each other
//! - FxHashMap within a bucket: O(1) point reads and writes
//! - Advisory locks live on the document slot itself, so a lock can be taken
//!   on a key that has no document yet
//! - Lock waiters park on one condvar; every release wakes them
//!
//! Filtered queries scan the whole bucket. There are no indexes.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use relgraph_core::{DocKey, FieldPath, Page, Query, RelGraphError, RelGraphResult};
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::options::MemoryStoreOptions;
use crate::traits::{CounterService, DocumentStore, LockToken, LockedDoc};

/// Lock currently held on a slot.
#[derive(Debug, Clone, Copy)]
struct LockHold {
    token: LockToken,
    expires_at: Instant,
}

/// One document slot. A slot may hold only a lock and no value.
#[derive(Debug, Default)]
struct Slot {
    value: Option<Value>,
    expires_at: Option<Instant>,
    lock: Option<LockHold>,
}

impl Slot {
    fn live_value(&self, now: Instant) -> Option<&Value> {
        match self.expires_at {
            Some(t) if t <= now => None,
            _ => self.value.as_ref(),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.value.is_some() && self.live_value(now).is_none()
    }

    /// Drop an expired value. Returns whether anything was dropped.
    fn evict_expired(&mut self, now: Instant) -> bool {
        if !self.is_expired(now) {
            return false;
        }
        self.value = None;
        self.expires_at = None;
        true
    }

    fn store(&mut self, doc: Value, ttl: Option<Duration>, now: Instant) {
        self.value = Some(doc);
        self.expires_at = ttl.map(|d| now + d);
    }

    fn check_token(&self, key: &DocKey, token: LockToken) -> RelGraphResult<()> {
        match self.lock {
            Some(hold) if hold.token == token => Ok(()),
            _ => Err(RelGraphError::lock_contention(key.to_string())),
        }
    }
}

/// Per-bucket shard
#[derive(Debug, Default)]
pub struct Shard {
    slots: FxHashMap<String, Slot>,
}

impl Shard {
    /// Number of live documents in this shard
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.slots
            .values()
            .filter(|s| s.live_value(now).is_some())
            .count()
    }

    /// Check if shard holds no live documents
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove expired documents. Slots still under lock keep the lock.
    fn sweep_expired(&mut self, now: Instant) -> usize {
        let mut evicted = 0;
        self.slots.retain(|_, slot| {
            if slot.evict_expired(now) {
                evicted += 1;
            }
            slot.value.is_some() || slot.lock.is_some()
        });
        evicted
    }
}

/// In-memory document store with advisory locks and counters.
///
/// # Thread Safety
///
/// All operations are thread-safe:
/// - get(), query(), count(): shard read guards only, never wait on locks
/// - upsert(): only locks the target bucket's shard
/// - lock_for_update(): waits up to `lock_timeout` for a held lock
///
/// # Example
///
/// ```ignore
/// use relgraph_storage::MemoryStore;
/// use std::sync::Arc;
///
/// let store = Arc::new(MemoryStore::new());
/// ```
pub struct MemoryStore {
    shards: DashMap<String, Shard>,
    counters: DashMap<String, u64>,
    next_token: AtomicU64,
    /// Serializes lock state changes so waiters cannot miss a release.
    gate: Mutex<()>,
    released: Condvar,
    options: MemoryStoreOptions,
}

impl MemoryStore {
    /// Create a store with default options
    pub fn new() -> Self {
        Self::with_options(MemoryStoreOptions::default())
    }

    /// Create a store with the given options
    pub fn with_options(options: MemoryStoreOptions) -> Self {
        Self {
            shards: DashMap::new(),
            counters: DashMap::new(),
            next_token: AtomicU64::new(0),
            gate: Mutex::new(()),
            released: Condvar::new(),
            options,
        }
    }

    /// Options this store was created with
    pub fn options(&self) -> &MemoryStoreOptions {
        &self.options
    }

    /// Number of live documents in `bucket`
    pub fn document_count(&self, bucket: &str) -> usize {
        self.shards.get(bucket).map(|s| s.len()).unwrap_or(0)
    }

    /// Check if a live document exists at `key`
    pub fn contains(&self, key: &DocKey) -> bool {
        let now = Instant::now();
        self.shards
            .get(&key.bucket)
            .and_then(|shard| {
                shard
                    .slots
                    .get(&key.id)
                    .map(|slot| slot.live_value(now).is_some())
            })
            .unwrap_or(false)
    }

    /// Check if `key` is currently locked
    pub fn is_locked(&self, key: &DocKey) -> bool {
        let now = Instant::now();
        self.shards
            .get(&key.bucket)
            .and_then(|shard| {
                shard
                    .slots
                    .get(&key.id)
                    .and_then(|slot| slot.lock)
                    .map(|hold| hold.expires_at > now)
            })
            .unwrap_or(false)
    }

    /// Sweep `bucket` after a scan saw expired documents in it.
    fn sweep_bucket(&self, bucket: &str, now: Instant) {
        if let Some(mut shard) = self.shards.get_mut(bucket) {
            let evicted = shard.sweep_expired(now);
            if evicted > 0 {
                tracing::trace!(target: "relgraph::store", bucket, evicted, "Evicted expired documents");
            }
        }
    }

    /// Try to take the lock. On failure returns when the current hold expires.
    ///
    /// Caller must hold `gate`.
    fn try_lock(&self, key: &DocKey, now: Instant) -> Result<LockedDoc, Instant> {
        let mut shard = self.shards.entry(key.bucket.clone()).or_default();
        let slot = shard.slots.entry(key.id.clone()).or_default();

        if let Some(hold) = slot.lock {
            if hold.expires_at > now {
                return Err(hold.expires_at);
            }
            tracing::debug!(
                target: "relgraph::store",
                key = %key,
                stale = %hold.token,
                "Taking over expired lock"
            );
        }

        slot.evict_expired(now);
        let token = LockToken::from_raw(self.next_token.fetch_add(1, Ordering::AcqRel) + 1);
        slot.lock = Some(LockHold {
            token,
            expires_at: now + self.options.lock_ttl,
        });
        let value = slot.live_value(now).cloned();
        Ok(LockedDoc {
            token,
            existed: value.is_some(),
            value,
        })
    }

    /// Apply `f` to the slot held under `token`, then release and wake waiters.
    fn release_with<F>(&self, key: &DocKey, token: LockToken, f: F) -> RelGraphResult<()>
    where
        F: FnOnce(&mut Slot, Instant),
    {
        let _gate = self.gate.lock();
        let now = Instant::now();
        {
            let mut shard = self
                .shards
                .get_mut(&key.bucket)
                .ok_or_else(|| RelGraphError::lock_contention(key.to_string()))?;
            let slot = shard
                .slots
                .get_mut(&key.id)
                .ok_or_else(|| RelGraphError::lock_contention(key.to_string()))?;
            slot.check_token(key, token)?;

            f(slot, now);
            slot.lock = None;
            if slot.live_value(now).is_none() {
                shard.slots.remove(&key.id);
            }
        }
        self.released.notify_all();
        tracing::trace!(target: "relgraph::store", key = %key, token = %token, "Lock released");
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CounterService for MemoryStore {
    fn increment(&self, key: &str, step: u64, floor: u64) -> RelGraphResult<u64> {
        match self.counters.entry(key.to_string()) {
            Entry::Occupied(mut e) => {
                let next = e.get().checked_add(step).ok_or_else(|| {
                    RelGraphError::store(format!("counter {} overflowed", key))
                })?;
                *e.get_mut() = next;
                Ok(next)
            }
            Entry::Vacant(e) => {
                e.insert(floor);
                Ok(floor)
            }
        }
    }
}

impl DocumentStore for MemoryStore {
    fn upsert(&self, key: &DocKey, doc: Value, ttl: Option<Duration>) -> RelGraphResult<()> {
        let now = Instant::now();
        let mut shard = self.shards.entry(key.bucket.clone()).or_default();
        shard
            .slots
            .entry(key.id.clone())
            .or_default()
            .store(doc, ttl, now);
        Ok(())
    }

    fn max_query_limit(&self) -> Option<usize> {
        Some(self.options.max_query_limit)
    }

    fn get(&self, key: &DocKey) -> RelGraphResult<Value> {
        let now = Instant::now();
        self.shards
            .get(&key.bucket)
            .and_then(|shard| {
                shard
                    .slots
                    .get(&key.id)
                    .and_then(|slot| slot.live_value(now).cloned())
            })
            .ok_or_else(|| RelGraphError::not_found(key.to_string()))
    }

    fn lock_for_update(&self, key: &DocKey) -> RelGraphResult<LockedDoc> {
        let start = Instant::now();
        let deadline = start + self.options.lock_timeout;
        let mut gate = self.gate.lock();

        loop {
            let now = Instant::now();
            match self.try_lock(key, now) {
                Ok(locked) => {
                    tracing::trace!(
                        target: "relgraph::store",
                        key = %key,
                        token = %locked.token,
                        existed = locked.existed,
                        "Lock acquired"
                    );
                    return Ok(locked);
                }
                Err(held_until) => {
                    if now >= deadline {
                        let waited = now.duration_since(start).as_millis() as u64;
                        return Err(RelGraphError::lock_timeout(key.to_string(), waited));
                    }
                    self.released.wait_until(&mut gate, held_until.min(deadline));
                }
            }
        }
    }

    fn write_unlock(
        &self,
        key: &DocKey,
        doc: Value,
        token: LockToken,
        ttl: Option<Duration>,
    ) -> RelGraphResult<()> {
        self.release_with(key, token, |slot, now| slot.store(doc, ttl, now))
    }

    fn remove_unlock(&self, key: &DocKey, token: LockToken) -> RelGraphResult<()> {
        self.release_with(key, token, |slot, _| {
            slot.value = None;
            slot.expires_at = None;
        })
    }

    fn unlock(&self, key: &DocKey, token: LockToken) -> RelGraphResult<()> {
        self.release_with(key, token, |_, _| {})
    }

    fn query(&self, query: &Query, page: Page) -> RelGraphResult<Vec<Value>> {
        if page.limit > self.options.max_query_limit {
            return Err(RelGraphError::store(format!(
                "query limit {} exceeds maximum {}",
                page.limit, self.options.max_query_limit
            )));
        }
        if page.limit == 0 {
            return Ok(Vec::new());
        }

        let now = Instant::now();
        let Some(shard) = self.shards.get(&query.bucket) else {
            return Ok(Vec::new());
        };

        let mut expired = false;
        let mut rows: Vec<(&String, &Value)> = shard
            .slots
            .iter()
            .filter_map(|(id, slot)| {
                expired |= slot.is_expired(now);
                slot.live_value(now).map(|v| (id, v))
            })
            .filter(|(_, v)| query.matches(v))
            .collect();

        match &query.order_by {
            Some(path) => rows.sort_by(|a, b| {
                collate(path, a.1, b.1).then_with(|| a.0.cmp(b.0))
            }),
            None => rows.sort_by(|a, b| a.0.cmp(b.0)),
        }

        let out: Vec<Value> = rows
            .into_iter()
            .skip(page.offset)
            .take(page.limit)
            .map(|(_, doc)| match &query.projection {
                Some(p) => p
                    .resolve(doc)
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Default::default())),
                None => doc.clone(),
            })
            .collect();

        drop(shard);
        if expired {
            self.sweep_bucket(&query.bucket, now);
        }
        Ok(out)
    }

    fn count(&self, query: &Query) -> RelGraphResult<u64> {
        let now = Instant::now();
        let Some(shard) = self.shards.get(&query.bucket) else {
            return Ok(0);
        };
        let mut expired = false;
        let n = shard
            .slots
            .values()
            .filter_map(|slot| {
                expired |= slot.is_expired(now);
                slot.live_value(now)
            })
            .filter(|v| query.matches(v))
            .count();

        drop(shard);
        if expired {
            self.sweep_bucket(&query.bucket, now);
        }
        Ok(n as u64)
    }
}

/// Compare two documents by the value at `path`.
///
/// Collation: missing < null < false < true < numbers < strings < arrays < objects.
fn collate(path: &FieldPath, a: &Value, b: &Value) -> CmpOrdering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(false)) => 2,
            Some(Value::Bool(true)) => 3,
            Some(Value::Number(_)) => 4,
            Some(Value::String(_)) => 5,
            Some(Value::Array(_)) => 6,
            Some(Value::Object(_)) => 7,
        }
    }

    let (va, vb) = (path.resolve(a), path.resolve(b));
    match (va, vb) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(CmpOrdering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(va).cmp(&rank(vb)),
    }
}
