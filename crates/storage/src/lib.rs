//! Document store contract and in-memory reference store for relgraph.
//!
//! - [`DocumentStore`]: point CRUD, lock-on-absence, filtered scans
//! - [`CounterService`]: monotonic counters
//! - [`MemoryStore`]: sharded in-process implementation of both
//! - [`SequentialCounter`]: counters without a store

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod counter;
pub mod options;
pub mod sharded;
pub mod traits;

pub use counter::SequentialCounter;
pub use options::MemoryStoreOptions;
pub use sharded::MemoryStore;
pub use traits::{CounterService, DocumentStore, LockToken, LockedDoc};
