//! Core graph types: nodes, relation verbs, relation sets and arcs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Document type discriminator stored on every arc.
pub const ARC_DOC_TYPE: &str = "arc";

/// Opaque node identifier, unique within a node kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for NodeId {
    fn from(n: u64) -> Self {
        NodeId(n.to_string())
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

/// A graph participant.
///
/// Nodes are never stored as records of their own; they are embedded as the
/// endpoints of arcs. `(kind, id)` identifies a node, while `name` and
/// `photo` are display fields refreshed by every relation update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Type tag, also the store's object type.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Identifier within `kind`.
    #[serde(default, skip_serializing_if = "is_empty_id")]
    pub id: NodeId,
    /// Display name; traversal results sort by it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Thumbnail reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

fn is_empty_id(id: &NodeId) -> bool {
    id.0.is_empty()
}

impl Node {
    /// Create a node without a photo.
    pub fn new(kind: impl Into<String>, id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            name: name.into(),
            photo: None,
        }
    }

    /// Attach a thumbnail reference.
    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    /// Whether `other` denotes the same graph participant.
    pub fn same_identity(&self, other: &Node) -> bool {
        self.kind == other.kind && self.id == other.id
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// A named, directed relationship kind. The set of verbs is open.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationVerb(Cow<'static, str>);

impl RelationVerb {
    /// Follow.
    pub const FOLLOW: RelationVerb = RelationVerb::from_static("follow");
    /// View.
    pub const VIEW: RelationVerb = RelationVerb::from_static("view");
    /// Like.
    pub const LIKE: RelationVerb = RelationVerb::from_static("like");
    /// Friend.
    pub const FRIEND: RelationVerb = RelationVerb::from_static("friend");
    /// Contain.
    pub const CONTAIN: RelationVerb = RelationVerb::from_static("contain");
    /// Own.
    pub const OWN: RelationVerb = RelationVerb::from_static("own");
    /// Moderate.
    pub const MODERATE: RelationVerb = RelationVerb::from_static("moderate");
    /// Federate.
    pub const FEDERATE: RelationVerb = RelationVerb::from_static("federate");
    /// Invite.
    pub const INVITE: RelationVerb = RelationVerb::from_static("invite");
    /// Connect.
    pub const CONNECT: RelationVerb = RelationVerb::from_static("connect");
    /// Ignore.
    pub const IGNORE: RelationVerb = RelationVerb::from_static("ignore");
    /// Block.
    pub const BLOCK: RelationVerb = RelationVerb::from_static("block");

    /// Verb from a string literal.
    pub const fn from_static(verb: &'static str) -> Self {
        RelationVerb(Cow::Borrowed(verb))
    }

    /// Verb from any string.
    pub fn new(verb: impl Into<String>) -> Self {
        RelationVerb(Cow::Owned(verb.into()))
    }

    /// Borrow the verb.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelationVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RelationVerb {
    fn from(s: &str) -> Self {
        RelationVerb::new(s)
    }
}

impl From<String> for RelationVerb {
    fn from(s: String) -> Self {
        RelationVerb::new(s)
    }
}

/// Verb → presence map.
///
/// Only `true` entries mean an active relation; an absent verb is the same as
/// `false`. Stored relation sets never hold `false` entries. Deltas passed to
/// [`RelationSet::merge`] may, and a `false` there removes the verb.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationSet(BTreeMap<RelationVerb, bool>);

impl RelationSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set with every given verb active.
    pub fn from_verbs<I>(verbs: I) -> Self
    where
        I: IntoIterator<Item = RelationVerb>,
    {
        verbs.into_iter().map(|v| (v, true)).collect()
    }

    /// Builder-style [`RelationSet::set`].
    pub fn with(mut self, verb: RelationVerb, on: bool) -> Self {
        self.set(verb, on);
        self
    }

    /// Record `verb` as `on` (a delta entry; `false` is kept verbatim).
    pub fn set(&mut self, verb: RelationVerb, on: bool) {
        self.0.insert(verb, on);
    }

    /// Whether `verb` is active.
    pub fn contains(&self, verb: &RelationVerb) -> bool {
        self.0.get(verb).copied().unwrap_or(false)
    }

    /// Active verbs in lexical order.
    pub fn active(&self) -> impl Iterator<Item = &RelationVerb> {
        self.0.iter().filter(|(_, on)| **on).map(|(v, _)| v)
    }

    /// Number of active verbs.
    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    /// True when no verb is active.
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Raw entries, including any `false` delta entries.
    pub fn entries(&self) -> impl Iterator<Item = (&RelationVerb, bool)> {
        self.0.iter().map(|(v, on)| (v, *on))
    }

    /// Drop `false` entries.
    pub fn normalized(mut self) -> Self {
        self.0.retain(|_, on| *on);
        self
    }

    /// Apply `delta`: `true` sets a verb, `false` removes it, others stay.
    pub fn merge(&mut self, delta: &RelationSet) {
        for (verb, on) in delta.entries() {
            if on {
                self.0.insert(verb.clone(), true);
            } else {
                self.0.remove(verb);
            }
        }
    }
}

impl FromIterator<(RelationVerb, bool)> for RelationSet {
    fn from_iter<I: IntoIterator<Item = (RelationVerb, bool)>>(iter: I) -> Self {
        RelationSet(iter.into_iter().collect())
    }
}

/// Auxiliary per-arc metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcOptions {
    /// Caller-defined ordinal for ordering arcs outside the name sort.
    #[serde(rename = "ord", default, skip_serializing_if = "is_zero")]
    pub ordinal: i64,
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

/// A directed edge document, one per ordered `(tail, head)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphArc {
    /// Always [`ARC_DOC_TYPE`].
    #[serde(rename = "type")]
    pub doc_type: String,
    /// Source endpoint.
    pub tail: Node,
    /// Destination endpoint.
    pub head: Node,
    /// Verbs active from tail to head.
    #[serde(default)]
    pub relation: RelationSet,
    /// Auxiliary metadata.
    #[serde(default)]
    pub options: ArcOptions,
    /// Set once when the arc is first written.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl GraphArc {
    /// New arc with no relations, created now.
    pub fn new(tail: Node, head: Node) -> Self {
        Self {
            doc_type: ARC_DOC_TYPE.to_string(),
            tail,
            head,
            relation: RelationSet::new(),
            options: ArcOptions::default(),
            created_at: Utc::now(),
        }
    }
}

/// Which side of an arc a traversal starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Start at the tail and return heads.
    Outgoing,
    /// Start at the head and return tails.
    Incoming,
}

impl Direction {
    /// Arc field holding the node the traversal starts from.
    pub fn fixed_endpoint(self) -> &'static str {
        match self {
            Direction::Outgoing => "tail",
            Direction::Incoming => "head",
        }
    }

    /// Arc field holding the nodes the traversal returns.
    pub fn projected_endpoint(self) -> &'static str {
        match self {
            Direction::Outgoing => "head",
            Direction::Incoming => "tail",
        }
    }
}

/// One page of traversal results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePage {
    /// Nodes in ascending name order.
    pub results: Vec<Node>,
    /// Offset this page started at.
    pub prev_offset: usize,
    /// Offset to request for the next page.
    pub next_offset: usize,
}

impl NodePage {
    /// Rows in this page.
    pub fn size(&self) -> usize {
        self.results.len()
    }

    /// Whether a page requested with `limit` was the last one.
    pub fn is_last(&self, limit: usize) -> bool {
        self.size() < limit
    }
}

/// What the relation mutator does with an arc whose relation set becomes empty.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmptyArcPolicy {
    /// Keep the document with an empty relation set (default).
    #[default]
    Retain,
    /// Delete the document.
    Delete,
}

/// How unbounded iteration reacts to a failing page query.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IterationErrorMode {
    /// Return the error to the caller (default).
    #[default]
    Propagate,
    /// Log it and end iteration as if results were exhausted.
    Stop,
}
