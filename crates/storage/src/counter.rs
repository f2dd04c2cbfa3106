//! Standalone in-memory counter.
//!
//! Same semantics as [`MemoryStore`](crate::MemoryStore)'s counters, without
//! a document store attached. Handy wherever ids must be deterministic.

use parking_lot::Mutex;
use relgraph_core::{RelGraphError, RelGraphResult};
use rustc_hash::FxHashMap;

use crate::traits::CounterService;

/// Deterministic, process-local [`CounterService`].
#[derive(Debug, Default)]
pub struct SequentialCounter {
    values: Mutex<FxHashMap<String, u64>>,
}

impl SequentialCounter {
    /// Create a counter service with no counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `key`, if it has been created.
    pub fn current(&self, key: &str) -> Option<u64> {
        self.values.lock().get(key).copied()
    }
}

impl CounterService for SequentialCounter {
    fn increment(&self, key: &str, step: u64, floor: u64) -> RelGraphResult<u64> {
        let mut values = self.values.lock();
        match values.get_mut(key) {
            Some(v) => {
                *v = v
                    .checked_add(step)
                    .ok_or_else(|| RelGraphError::store(format!("counter {} overflowed", key)))?;
                Ok(*v)
            }
            None => {
                values.insert(key.to_string(), floor);
                Ok(floor)
            }
        }
    }
}
