//! Arc key derivation and endpoint validation.
//!
//! Arc documents are stored under `{tail.kind}:{tail.id}>{head.kind}:{head.id}`.
//! Kinds may not contain `:` or `>` and ids may not contain `>`, which keeps
//! the mapping from `(tail, head)` identities to keys injective.

use relgraph_core::{DocKey, RelGraphError, RelGraphResult};

use super::types::{Node, RelationVerb};

const KIND_SEP: char = ':';
const ARC_SEP: char = '>';

/// Check that a node identity is safe to embed in an arc key.
pub fn validate_node(node: &Node) -> RelGraphResult<()> {
    if node.kind.is_empty() {
        return Err(RelGraphError::invalid_input("node kind cannot be empty"));
    }
    if node.kind.contains(KIND_SEP) || node.kind.contains(ARC_SEP) {
        return Err(RelGraphError::invalid_input(format!(
            "node kind cannot contain '{}' or '{}': {}",
            KIND_SEP, ARC_SEP, node.kind
        )));
    }
    if node.id.as_str().is_empty() {
        return Err(RelGraphError::invalid_input(format!(
            "node id cannot be empty (kind {})",
            node.kind
        )));
    }
    if node.id.as_str().contains(ARC_SEP) {
        return Err(RelGraphError::invalid_input(format!(
            "node id cannot contain '{}': {}",
            ARC_SEP, node.id
        )));
    }
    Ok(())
}

/// Check that a verb can be used as a relation field name.
pub fn validate_verb(verb: &RelationVerb) -> RelGraphResult<()> {
    if verb.as_str().is_empty() {
        return Err(RelGraphError::invalid_input("relation verb cannot be empty"));
    }
    Ok(())
}

/// Derive the arc key for `(tail, head)`. Does not validate.
pub fn derive_key(tail: &Node, head: &Node) -> String {
    format!(
        "{}{}{}{}{}{}{}",
        tail.kind, KIND_SEP, tail.id, ARC_SEP, head.kind, KIND_SEP, head.id
    )
}

/// Identity fields recovered from an arc key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcKeyParts {
    /// Tail kind.
    pub tail_kind: String,
    /// Tail id.
    pub tail_id: String,
    /// Head kind.
    pub head_kind: String,
    /// Head id.
    pub head_id: String,
}

/// Split an arc key back into its endpoint identities.
///
/// Returns `None` for strings that are not well-formed arc keys.
pub fn parse_arc_key(key: &str) -> Option<ArcKeyParts> {
    let (tail, head) = key.split_once(ARC_SEP)?;
    let (tail_kind, tail_id) = tail.split_once(KIND_SEP)?;
    let (head_kind, head_id) = head.split_once(KIND_SEP)?;
    if tail_kind.is_empty() || tail_id.is_empty() || head_kind.is_empty() || head_id.is_empty() {
        return None;
    }
    if head_kind.contains(ARC_SEP) || head_id.contains(ARC_SEP) {
        return None;
    }
    Some(ArcKeyParts {
        tail_kind: tail_kind.to_string(),
        tail_id: tail_id.to_string(),
        head_kind: head_kind.to_string(),
        head_id: head_id.to_string(),
    })
}

/// Validate both endpoints and build the document key in `bucket`.
pub fn arc_doc_key(bucket: &str, tail: &Node, head: &Node) -> RelGraphResult<DocKey> {
    validate_node(tail)?;
    validate_node(head)?;
    Ok(DocKey::new(bucket, derive_key(tail, head)))
}
