//! Shared strategies and fixtures.

use proptest::prelude::*;
use relgraph::{ArcGraph, GraphConfig, Node, RelationSet, RelationVerb};

/// Verbs drawn by the merge strategies.
pub const VERB_POOL: &[&str] = &["follow", "like", "view", "block", "invite", "x = true OR 1"];

/// Graph over a fresh in-memory store.
pub fn graph() -> ArcGraph {
    relgraph::in_memory(GraphConfig::default()).unwrap()
}

/// Graph with a custom page size.
pub fn graph_with_page_size(size: usize) -> ArcGraph {
    relgraph::in_memory(GraphConfig::new().max_page_size(size)).unwrap()
}

/// Node kinds valid in arc keys.
pub fn arb_kind() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,5}"
}

/// Node ids valid in arc keys; may contain `:`.
pub fn arb_id() -> impl Strategy<Value = String> {
    "[a-z0-9:]{1,6}"
}

/// A node with a key-safe identity.
pub fn arb_node() -> impl Strategy<Value = Node> {
    (arb_kind(), arb_id(), "[A-Za-z ]{0,8}").prop_map(|(kind, id, name)| Node::new(kind, id, name))
}

/// A verb from [`VERB_POOL`].
pub fn arb_verb() -> impl Strategy<Value = RelationVerb> {
    prop::sample::select(VERB_POOL).prop_map(RelationVerb::from)
}

/// A delta mixing additions and removals.
pub fn arb_delta() -> impl Strategy<Value = RelationSet> {
    prop::collection::vec((arb_verb(), any::<bool>()), 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}
