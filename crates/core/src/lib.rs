//! Shared types for relgraph: errors, document keys and query expressions.
//!
//! Both the storage crate (which implements the document store contract) and
//! the engine crate (which expresses graph semantics through it) depend on
//! this crate and nothing else of each other.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod query;
pub mod types;

pub use error::{RelGraphError, RelGraphResult};
pub use query::{FieldPath, Predicate, Query};
pub use types::{DocKey, Page, DEFAULT_BUCKET};
