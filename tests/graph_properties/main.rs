//! Graph Property Test Suite
//!
//! Randomized checks of the laws the arc graph must satisfy.
//!
//! - **Keys**: arc key derivation is deterministic and injective
//! - **Merge**: relation merges are idempotent and invertible
//! - **Paging**: paged queries, iteration and degree counts agree
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test graph_properties
//! ```

mod test_utils;

mod key_properties;
mod merge_properties;
mod paging_properties;
