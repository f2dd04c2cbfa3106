//! Public types for the relgraph API.
//!
//! Re-exports from the internal crates so callers depend on `relgraph` only.

// ============================================================================
// Graph
// ============================================================================

pub use relgraph_engine::{
    ArcGraph, ArcOptions, Direction, EmptyArcPolicy, GraphArc, GraphConfig, IterationErrorMode,
    Node, NodeId, NodeIdAllocator, NodePage, RelationSet, RelationVerb,
};

// Key derivation, for callers that address arc documents directly
pub use relgraph_engine::graph::keys::{derive_key, parse_arc_key, ArcKeyParts};

// ============================================================================
// Store contract
// ============================================================================

pub use relgraph_storage::{
    CounterService, DocumentStore, LockToken, LockedDoc, MemoryStore, MemoryStoreOptions,
    SequentialCounter,
};

/// Documents cross the store boundary as JSON values.
pub type Document = serde_json::Value;

// ============================================================================
// Queries and errors
// ============================================================================

pub use relgraph_core::{
    DocKey, FieldPath, Page, Predicate, Query, RelGraphError, RelGraphResult, DEFAULT_BUCKET,
};
