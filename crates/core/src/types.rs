//! Document addressing types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucket used when a caller does not configure one.
pub const DEFAULT_BUCKET: &str = "default";

/// Address of a single document in the store: a bucket plus a document id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocKey {
    /// Bucket (keyspace) the document lives in.
    pub bucket: String,
    /// Document id, unique within the bucket.
    pub id: String,
}

impl DocKey {
    /// Create a key in the given bucket.
    pub fn new(bucket: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            id: id.into(),
        }
    }

    /// Create a key in [`DEFAULT_BUCKET`].
    pub fn in_default(id: impl Into<String>) -> Self {
        Self::new(DEFAULT_BUCKET, id)
    }
}

impl fmt::Display for DocKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.id)
    }
}

/// A `limit`/`offset` window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page {
    /// Maximum rows to return.
    pub limit: usize,
    /// Rows to skip before the first returned row.
    pub offset: usize,
}

impl Page {
    /// Create a page window.
    pub fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// The window that follows this one after `returned` rows came back.
    pub fn advance(self, returned: usize) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset + returned,
        }
    }
}
