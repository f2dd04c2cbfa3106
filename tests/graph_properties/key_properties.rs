//! Arc key derivation.

use crate::test_utils::*;
use proptest::prelude::*;
use relgraph::{derive_key, parse_arc_key, Node};

proptest! {
    #[test]
    fn prop_key_is_deterministic(tail in arb_node(), head in arb_node(), name in "[a-z]{0,5}") {
        let renamed = Node::new(tail.kind.clone(), tail.id.clone(), name);
        prop_assert_eq!(derive_key(&tail, &head), derive_key(&renamed, &head));
    }

    #[test]
    fn prop_key_parses_back(tail in arb_node(), head in arb_node()) {
        let parts = parse_arc_key(&derive_key(&tail, &head)).unwrap();
        prop_assert_eq!(parts.tail_kind, tail.kind);
        prop_assert_eq!(parts.tail_id, tail.id.as_str());
        prop_assert_eq!(parts.head_kind, head.kind);
        prop_assert_eq!(parts.head_id, head.id.as_str());
    }

    #[test]
    fn prop_key_is_injective(
        a in (arb_node(), arb_node()),
        b in (arb_node(), arb_node()),
    ) {
        let same_pair = a.0.same_identity(&b.0) && a.1.same_identity(&b.1);
        let same_key = derive_key(&a.0, &a.1) == derive_key(&b.0, &b.1);
        prop_assert_eq!(same_pair, same_key);
    }

    #[test]
    fn prop_reversed_pair_differs(tail in arb_node(), head in arb_node()) {
        prop_assume!(!tail.same_identity(&head));
        prop_assert_ne!(derive_key(&tail, &head), derive_key(&head, &tail));
    }
}
