//! Error taxonomy shared by every relgraph crate.
//!
//! The store contract, the node id allocator, the relation mutator and the
//! traversal engine all report failures through [`RelGraphError`]. Nothing
//! in the workspace retries; errors travel to the caller unchanged or with
//! added context.

use thiserror::Error;

/// Result alias used throughout relgraph.
pub type RelGraphResult<T> = Result<T, RelGraphError>;

/// Every failure a relgraph operation can report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelGraphError {
    /// Point read on a document that does not exist.
    #[error("document not found: {key}")]
    NotFound {
        /// Document key that was looked up.
        key: String,
    },

    /// The exclusive lock could not be acquired within the store's bound.
    #[error("timed out after {waited_ms}ms waiting for lock on {key}")]
    LockTimeout {
        /// Locked document key.
        key: String,
        /// How long the caller waited.
        waited_ms: u64,
    },

    /// The lock is held by someone else, or the caller's token is stale.
    #[error("lock contention on {key}")]
    LockContention {
        /// Contended document key.
        key: String,
    },

    /// Any other store failure: connectivity, malformed query, write failure.
    #[error("store error: {message}")]
    Store {
        /// Human-readable description.
        message: String,
    },

    /// A counter increment failed while allocating an id.
    #[error("allocation failed on counter {counter}: {message}")]
    Allocation {
        /// Counter key.
        counter: String,
        /// Underlying failure.
        message: String,
    },

    /// Caller-supplied value rejected before reaching the store.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// What was wrong.
        message: String,
    },

    /// A document could not be encoded or decoded.
    #[error("serialization error: {message}")]
    Serialization {
        /// Underlying serde failure.
        message: String,
    },
}

impl RelGraphError {
    /// Build a [`RelGraphError::NotFound`].
    pub fn not_found(key: impl Into<String>) -> Self {
        RelGraphError::NotFound { key: key.into() }
    }

    /// Build a [`RelGraphError::LockTimeout`].
    pub fn lock_timeout(key: impl Into<String>, waited_ms: u64) -> Self {
        RelGraphError::LockTimeout {
            key: key.into(),
            waited_ms,
        }
    }

    /// Build a [`RelGraphError::LockContention`].
    pub fn lock_contention(key: impl Into<String>) -> Self {
        RelGraphError::LockContention { key: key.into() }
    }

    /// Build a [`RelGraphError::Store`].
    pub fn store(message: impl Into<String>) -> Self {
        RelGraphError::Store {
            message: message.into(),
        }
    }

    /// Build a [`RelGraphError::Allocation`].
    pub fn allocation(counter: impl Into<String>, message: impl Into<String>) -> Self {
        RelGraphError::Allocation {
            counter: counter.into(),
            message: message.into(),
        }
    }

    /// Build a [`RelGraphError::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        RelGraphError::InvalidInput {
            message: message.into(),
        }
    }

    /// Build a [`RelGraphError::Serialization`].
    pub fn serialization(message: impl Into<String>) -> Self {
        RelGraphError::Serialization {
            message: message.into(),
        }
    }

    /// True for [`RelGraphError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, RelGraphError::NotFound { .. })
    }

    /// True when the merge path could not obtain exclusive access.
    pub fn is_lock_failure(&self) -> bool {
        matches!(
            self,
            RelGraphError::LockTimeout { .. } | RelGraphError::LockContention { .. }
        )
    }
}

impl From<serde_json::Error> for RelGraphError {
    fn from(e: serde_json::Error) -> Self {
        RelGraphError::serialization(e.to_string())
    }
}
