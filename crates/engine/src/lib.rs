//! Directed multi-relation graph for relgraph.
//!
//! An [`ArcGraph`] keeps one arc document per ordered `(tail, head)` pair,
//! holding the set of relation verbs active from tail to head. It supports
//! locked relation merges, paged neighbor queries, degree counts and
//! unbounded iteration on top of any [`DocumentStore`](relgraph_storage::DocumentStore).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod graph;

pub use config::GraphConfig;
pub use graph::ids::NodeIdAllocator;
pub use graph::types::{
    ArcOptions, Direction, EmptyArcPolicy, GraphArc, IterationErrorMode, Node, NodeId, NodePage,
    RelationSet, RelationVerb,
};
pub use graph::ArcGraph;
