//! relgraph: a directed multi-relation graph over a document store.
//!
//! ```ignore
//! use relgraph::{GraphConfig, Node, RelationSet, RelationVerb};
//!
//! let graph = relgraph::in_memory(GraphConfig::default())?;
//! let ann = Node::new("user", graph.allocate_node_id()?, "Ann");
//! let bob = Node::new("user", graph.allocate_node_id()?, "Bob");
//!
//! graph.update_relation(&ann, &bob, &RelationSet::from_verbs([RelationVerb::FOLLOW]))?;
//! assert_eq!(graph.indegree(&bob, &RelationVerb::FOLLOW)?, 1);
//! ```

#![warn(missing_docs)]

mod types;

pub use types::*;

use std::sync::Arc;

/// Graph over a fresh [`MemoryStore`] with default store options.
pub fn in_memory(config: GraphConfig) -> RelGraphResult<ArcGraph> {
    ArcGraph::new(Arc::new(MemoryStore::new()), config)
}
