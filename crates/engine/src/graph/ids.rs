//! Node id allocation.

use relgraph_core::{RelGraphError, RelGraphResult};
use relgraph_storage::CounterService;
use std::sync::Arc;

use super::types::NodeId;

/// Counter key used when none is configured.
pub const DEFAULT_NODE_COUNTER_KEY: &str = "id:node";

/// Hands out process-wide unique node ids from a shared counter.
///
/// Ids start at 1 and increase by 1. Uniqueness holds across concurrent
/// callers as long as the [`CounterService`] increments atomically.
#[derive(Clone)]
pub struct NodeIdAllocator {
    counter: Arc<dyn CounterService>,
    key: String,
}

impl NodeIdAllocator {
    /// Allocator on the default counter key.
    pub fn new(counter: Arc<dyn CounterService>) -> Self {
        Self::with_key(counter, DEFAULT_NODE_COUNTER_KEY)
    }

    /// Allocator on a custom counter key.
    pub fn with_key(counter: Arc<dyn CounterService>, key: impl Into<String>) -> Self {
        Self {
            counter,
            key: key.into(),
        }
    }

    /// Counter key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Next id.
    pub fn allocate(&self) -> RelGraphResult<NodeId> {
        let value = self
            .counter
            .increment(&self.key, 1, 1)
            .map_err(|e| RelGraphError::allocation(&self.key, e.to_string()))?;
        Ok(NodeId::from(value))
    }
}

impl std::fmt::Debug for NodeIdAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeIdAllocator")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgraph_storage::SequentialCounter;

    struct BrokenCounter;

    impl CounterService for BrokenCounter {
        fn increment(&self, _key: &str, _step: u64, _floor: u64) -> RelGraphResult<u64> {
            Err(RelGraphError::store("counter offline"))
        }
    }

    #[test]
    fn first_id_is_one() {
        let ids = NodeIdAllocator::new(Arc::new(SequentialCounter::new()));
        assert_eq!(ids.allocate().unwrap().as_str(), "1");
        assert_eq!(ids.allocate().unwrap().as_str(), "2");
    }

    #[test]
    fn uses_configured_key() {
        let counter = Arc::new(SequentialCounter::new());
        let ids = NodeIdAllocator::with_key(counter.clone(), "id:custom");
        ids.allocate().unwrap();
        assert_eq!(counter.current("id:custom"), Some(1));
        assert_eq!(counter.current(DEFAULT_NODE_COUNTER_KEY), None);
    }

    #[test]
    fn counter_failure_becomes_allocation_error() {
        let ids = NodeIdAllocator::new(Arc::new(BrokenCounter));
        match ids.allocate().unwrap_err() {
            RelGraphError::Allocation { counter, message } => {
                assert_eq!(counter, DEFAULT_NODE_COUNTER_KEY);
                assert!(message.contains("counter offline"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
