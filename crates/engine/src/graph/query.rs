//! Arc filters for traversal.

use relgraph_core::{FieldPath, Query};

use super::types::{Direction, Node, RelationVerb, ARC_DOC_TYPE};

/// Arcs of `verb` whose `direction.fixed_endpoint()` is `node`.
///
/// Unprojected and unordered; used for counting.
pub fn arc_filter(bucket: &str, node: &Node, direction: Direction, verb: &RelationVerb) -> Query {
    let fixed = direction.fixed_endpoint();
    Query::scan(bucket)
        .where_eq(FieldPath::field("type"), ARC_DOC_TYPE)
        .where_eq(FieldPath::field(fixed).then("type"), node.kind.as_str())
        .where_eq(FieldPath::field(fixed).then("id"), node.id.as_str())
        .where_eq(FieldPath::field("relation").then(verb.as_str()), true)
}

/// [`arc_filter`] projected to the opposite endpoint, ordered by its name.
pub fn neighbor_query(
    bucket: &str,
    node: &Node,
    direction: Direction,
    verb: &RelationVerb,
) -> Query {
    let other = direction.projected_endpoint();
    arc_filter(bucket, node, direction, verb)
        .project(FieldPath::field(other))
        .order_by(FieldPath::field(other).then("name"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn arc(tail: (&str, &str), head: (&str, &str), relation: serde_json::Value) -> serde_json::Value {
        json!({
            "type": "arc",
            "tail": {"type": tail.0, "id": tail.1},
            "head": {"type": head.0, "id": head.1},
            "relation": relation,
        })
    }

    #[test]
    fn incoming_filter_fixes_head() {
        let node = Node::new("user", "2", "");
        let q = neighbor_query("default", &node, Direction::Incoming, &RelationVerb::FOLLOW);
        assert_eq!(
            q.to_string(),
            "SELECT tail.* FROM `default` WHERE type = $1 AND head.type = $2 \
             AND head.id = $3 AND relation.follow = $4 ORDER BY tail.name"
        );
        let params: Vec<_> = q.params().into_iter().cloned().collect();
        assert_eq!(params, vec![json!("arc"), json!("user"), json!("2"), json!(true)]);
    }

    #[test]
    fn outgoing_filter_fixes_tail() {
        let node = Node::new("user", "1", "");
        let q = neighbor_query("default", &node, Direction::Outgoing, &RelationVerb::LIKE);
        assert!(q.matches(&arc(("user", "1"), ("page", "9"), json!({"like": true}))));
        assert!(!q.matches(&arc(("page", "9"), ("user", "1"), json!({"like": true}))));
        assert!(!q.matches(&arc(("user", "1"), ("page", "9"), json!({"follow": true}))));
    }

    #[test]
    fn kind_is_part_of_the_match() {
        let node = Node::new("user", "1", "");
        let q = arc_filter("default", &node, Direction::Outgoing, &RelationVerb::LIKE);
        assert!(!q.matches(&arc(("group", "1"), ("page", "9"), json!({"like": true}))));
    }

    #[test]
    fn verb_with_query_syntax_is_a_plain_field() {
        let verb = RelationVerb::new("x = true OR 1");
        let node = Node::new("user", "1", "");
        let q = arc_filter("default", &node, Direction::Outgoing, &verb);
        assert!(q.matches(&arc(("user", "1"), ("user", "2"), json!({"x = true OR 1": true}))));
        assert!(!q.matches(&arc(("user", "1"), ("user", "2"), json!({"x": true}))));
        assert!(!q.matches(&arc(("user", "1"), ("user", "2"), json!({"follow": true}))));
    }

    #[test]
    fn targets_configured_bucket() {
        let node = Node::new("user", "1", "");
        let q = arc_filter("social", &node, Direction::Outgoing, &RelationVerb::LIKE);
        assert_eq!(q.bucket, "social");
        assert!(q.order_by.is_none());
        assert!(q.projection.is_none());
    }
}
