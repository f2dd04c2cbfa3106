//! Graph configuration.
//!
//! ```toml
//! bucket = "social"
//! max_page_size = 500
//! arc_ttl_secs = 86400
//! empty_arcs = "delete"
//! iteration_errors = "propagate"
//! node_counter_key = "id:node"
//! ```
//!
//! Every field is optional; missing ones take the [`Default`] values.

use relgraph_core::{RelGraphError, RelGraphResult, DEFAULT_BUCKET};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::graph::ids::DEFAULT_NODE_COUNTER_KEY;
use crate::graph::types::{EmptyArcPolicy, IterationErrorMode};

/// Default page size for iteration, and the largest limit for paged queries.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 1000;

/// Settings for an [`ArcGraph`](crate::ArcGraph).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Store bucket holding arc documents.
    pub bucket: String,
    /// Page size for `for_each_*`, and upper bound for `limit`.
    pub max_page_size: usize,
    /// TTL applied to every arc write. `None` keeps arcs forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arc_ttl_secs: Option<u64>,
    /// What to do with an arc whose relation set becomes empty.
    pub empty_arcs: EmptyArcPolicy,
    /// How `for_each_*` reacts to a failing page query.
    pub iteration_errors: IterationErrorMode,
    /// Counter key for node id allocation.
    pub node_counter_key: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            arc_ttl_secs: None,
            empty_arcs: EmptyArcPolicy::default(),
            iteration_errors: IterationErrorMode::default(),
            node_counter_key: DEFAULT_NODE_COUNTER_KEY.to_string(),
        }
    }
}

impl GraphConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(toml: &str) -> RelGraphResult<Self> {
        let config: Self = toml::from_str(toml).map_err(|e| {
            RelGraphError::invalid_input(format!("failed to parse graph config: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> RelGraphResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RelGraphError::invalid_input(format!(
                "failed to read graph config '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Serialize to a TOML string.
    pub fn to_toml_string(&self) -> RelGraphResult<String> {
        toml::to_string_pretty(self).map_err(|e| {
            RelGraphError::serialization(format!("failed to serialize graph config: {}", e))
        })
    }

    /// Reject values the graph cannot operate with.
    pub fn validate(&self) -> RelGraphResult<()> {
        if self.bucket.is_empty() {
            return Err(RelGraphError::invalid_input("bucket cannot be empty"));
        }
        if self.max_page_size == 0 {
            return Err(RelGraphError::invalid_input(
                "max_page_size must be at least 1",
            ));
        }
        if self.node_counter_key.is_empty() {
            return Err(RelGraphError::invalid_input(
                "node_counter_key cannot be empty",
            ));
        }
        Ok(())
    }

    /// TTL for arc writes.
    pub fn arc_ttl(&self) -> Option<Duration> {
        self.arc_ttl_secs.map(Duration::from_secs)
    }

    /// Set the bucket.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Set the maximum page size.
    pub fn max_page_size(mut self, size: usize) -> Self {
        self.max_page_size = size;
        self
    }

    /// Set the arc TTL.
    pub fn arc_ttl_secs(mut self, secs: Option<u64>) -> Self {
        self.arc_ttl_secs = secs;
        self
    }

    /// Set the empty arc policy.
    pub fn empty_arcs(mut self, policy: EmptyArcPolicy) -> Self {
        self.empty_arcs = policy;
        self
    }

    /// Set the iteration error mode.
    pub fn iteration_errors(mut self, mode: IterationErrorMode) -> Self {
        self.iteration_errors = mode;
        self
    }

    /// Set the node counter key.
    pub fn node_counter_key(mut self, key: impl Into<String>) -> Self {
        self.node_counter_key = key.into();
        self
    }
}
