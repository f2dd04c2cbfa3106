//! Arc graph over a document store.
//!
//! Nodes are never stored on their own. Each ordered `(tail, head)` pair has
//! at most one arc document holding the set of verbs active from tail to
//! head, keyed by [`keys::derive_key`]. Traversals are filtered scans over
//! those documents.

pub mod ids;
pub mod keys;
pub mod query;
mod relation;
mod traversal;
pub mod types;

use std::sync::Arc;

use relgraph_core::{DocKey, RelGraphError, RelGraphResult};
use relgraph_storage::{CounterService, DocumentStore};
use serde_json::Value;
use tracing::debug;

use crate::config::GraphConfig;
use ids::NodeIdAllocator;
use types::*;

pub(crate) const LOG_TARGET: &str = "relgraph::graph";

/// Directed multi-relation graph.
///
/// Cheap to clone; clones share the store, the id counter and the config.
#[derive(Clone)]
pub struct ArcGraph {
    store: Arc<dyn DocumentStore>,
    ids: NodeIdAllocator,
    config: Arc<GraphConfig>,
}

impl ArcGraph {
    /// Graph over a store that also provides counters.
    pub fn new<S>(store: Arc<S>, config: GraphConfig) -> RelGraphResult<Self>
    where
        S: DocumentStore + CounterService + 'static,
    {
        let counter: Arc<dyn CounterService> = store.clone();
        Self::with_counter(store, counter, config)
    }

    /// Graph with a separate counter service for node ids.
    pub fn with_counter(
        store: Arc<dyn DocumentStore>,
        counter: Arc<dyn CounterService>,
        config: GraphConfig,
    ) -> RelGraphResult<Self> {
        config.validate()?;
        if let Some(max) = store.max_query_limit() {
            if config.max_page_size > max {
                return Err(RelGraphError::invalid_input(format!(
                    "max_page_size {} exceeds the store's query limit {}",
                    config.max_page_size, max
                )));
            }
        }
        let ids = NodeIdAllocator::with_key(counter, config.node_counter_key.clone());
        Ok(Self {
            store,
            ids,
            config: Arc::new(config),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    // =========================================================================
    // Node identity
    // =========================================================================

    /// Allocate a fresh node id. The first id is `"1"`.
    pub fn allocate_node_id(&self) -> RelGraphResult<NodeId> {
        self.ids.allocate()
    }

    // =========================================================================
    // Arc model
    // =========================================================================

    /// Write a fresh arc for `(tail, head)`.
    ///
    /// Unconditional upsert without locking: any existing arc for the pair is
    /// replaced, including its `createdAt`. Meant for pairs known to be new;
    /// use [`ArcGraph::update_relation`] otherwise. `false` entries in
    /// `relations` are dropped.
    pub fn create_arc(
        &self,
        tail: &Node,
        head: &Node,
        relations: &RelationSet,
        options: ArcOptions,
    ) -> RelGraphResult<()> {
        let key = self.arc_key(tail, head)?;
        for verb in relations.active() {
            keys::validate_verb(verb)?;
        }
        let mut arc = GraphArc::new(tail.clone(), head.clone());
        arc.relation = relations.clone().normalized();
        arc.options = options;

        let doc = encode_arc(&arc)?;
        self.store.upsert(&key, doc, self.config.arc_ttl())?;
        debug!(target: LOG_TARGET, key = %key, verbs = arc.relation.active_count(), "Created arc");
        Ok(())
    }

    /// The stored arc for `(tail, head)`. `NotFound` if there is none.
    pub fn get_arc(&self, tail: &Node, head: &Node) -> RelGraphResult<GraphArc> {
        let key = self.arc_key(tail, head)?;
        let doc = self.store.get(&key)?;
        decode_arc(doc)
    }

    /// Relation set of the arc for `(tail, head)`. `NotFound` if there is none.
    pub fn get_relation(&self, tail: &Node, head: &Node) -> RelGraphResult<RelationSet> {
        self.get_arc(tail, head).map(|arc| arc.relation)
    }

    /// Like [`ArcGraph::get_relation`], but a missing arc reads as an empty set.
    pub fn relation_or_empty(&self, tail: &Node, head: &Node) -> RelGraphResult<RelationSet> {
        match self.get_relation(tail, head) {
            Ok(set) => Ok(set),
            Err(e) if e.is_not_found() => Ok(RelationSet::new()),
            Err(e) => Err(e),
        }
    }

    fn arc_key(&self, tail: &Node, head: &Node) -> RelGraphResult<DocKey> {
        keys::arc_doc_key(&self.config.bucket, tail, head)
    }
}

impl std::fmt::Debug for ArcGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArcGraph")
            .field("ids", &self.ids)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

pub(crate) fn encode_arc(arc: &GraphArc) -> RelGraphResult<Value> {
    Ok(serde_json::to_value(arc)?)
}

pub(crate) fn decode_arc(doc: Value) -> RelGraphResult<GraphArc> {
    let arc: GraphArc = serde_json::from_value(doc)?;
    if arc.doc_type != ARC_DOC_TYPE {
        return Err(RelGraphError::serialization(format!(
            "expected an {} document, found type {:?}",
            ARC_DOC_TYPE, arc.doc_type
        )));
    }
    Ok(arc)
}
