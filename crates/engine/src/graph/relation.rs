//! Locked read-modify-write of an arc's relation set.

use relgraph_core::{DocKey, RelGraphResult};
use relgraph_storage::{LockToken, LockedDoc};
use tracing::{debug, warn};

use super::types::*;
use super::{decode_arc, encode_arc, keys, ArcGraph, LOG_TARGET};

impl ArcGraph {
    /// Merge `delta` into the relation set of `(tail, head)`.
    ///
    /// `true` entries add a verb, `false` entries remove it, verbs not named
    /// in `delta` are kept. The arc is created if missing, and the caller's
    /// `tail`/`head` replace the stored endpoints so display fields stay
    /// current. Concurrent updates of the same pair are serialized by the
    /// store's lock; no update is lost.
    pub fn update_relation(&self, tail: &Node, head: &Node, delta: &RelationSet) -> RelGraphResult<()> {
        self.update_relation_returning(tail, head, delta).map(|_| ())
    }

    /// [`ArcGraph::update_relation`], returning the merged relation set.
    pub fn update_relation_returning(
        &self,
        tail: &Node,
        head: &Node,
        delta: &RelationSet,
    ) -> RelGraphResult<RelationSet> {
        let key = self.arc_key(tail, head)?;
        for (verb, _) in delta.entries() {
            keys::validate_verb(verb)?;
        }

        let LockedDoc {
            token,
            existed,
            value,
        } = self.store.lock_for_update(&key)?;

        let mut arc = match value.map(decode_arc).transpose() {
            Ok(Some(arc)) => arc,
            Ok(None) => GraphArc::new(tail.clone(), head.clone()),
            Err(e) => {
                self.abandon(&key, token);
                return Err(e);
            }
        };
        arc.tail = tail.clone();
        arc.head = head.clone();
        arc.relation.merge(delta);

        if arc.relation.is_empty() && self.config.empty_arcs == EmptyArcPolicy::Delete {
            if existed {
                self.store.remove_unlock(&key, token)?;
                debug!(target: LOG_TARGET, key = %key, "Removed empty arc");
            } else {
                self.store.unlock(&key, token)?;
            }
            return Ok(arc.relation);
        }

        let doc = match encode_arc(&arc) {
            Ok(doc) => doc,
            Err(e) => {
                self.abandon(&key, token);
                return Err(e);
            }
        };
        self.store.write_unlock(&key, doc, token, self.config.arc_ttl())?;
        debug!(
            target: LOG_TARGET,
            key = %key,
            created = !existed,
            verbs = arc.relation.active_count(),
            "Merged relation"
        );
        Ok(arc.relation)
    }

    /// Release a lock after a failure; the original error wins.
    fn abandon(&self, key: &DocKey, token: LockToken) {
        if let Err(e) = self.store.unlock(key, token) {
            warn!(target: LOG_TARGET, key = %key, error = %e, "Failed to release arc lock");
        }
    }
}
