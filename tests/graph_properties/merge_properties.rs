//! Relation merge algebra, in memory and through the store.

use crate::test_utils::*;
use proptest::prelude::*;
use relgraph::{Node, RelationSet};

proptest! {
    #[test]
    fn prop_merge_is_idempotent(start in arb_delta(), delta in arb_delta()) {
        let mut once = start.normalized();
        once.merge(&delta);
        let mut twice = once.clone();
        twice.merge(&delta);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_merge_never_stores_false(start in arb_delta(), delta in arb_delta()) {
        let mut set = start.normalized();
        set.merge(&delta);
        prop_assert!(set.entries().all(|(_, on)| on));
    }

    #[test]
    fn prop_add_then_remove_restores(start in arb_delta(), verb in arb_verb()) {
        let start = start.normalized();
        prop_assume!(!start.contains(&verb));

        let mut set = start.clone();
        set.merge(&RelationSet::new().with(verb.clone(), true));
        set.merge(&RelationSet::new().with(verb, false));
        prop_assert_eq!(set, start);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_stored_merges_match_in_memory(deltas in prop::collection::vec(arb_delta(), 1..8)) {
        let graph = graph();
        let (tail, head) = (Node::new("user", "1", "A"), Node::new("user", "2", "B"));

        let mut expected = RelationSet::new();
        for delta in &deltas {
            expected.merge(delta);
            let merged = graph.update_relation_returning(&tail, &head, delta).unwrap();
            prop_assert_eq!(&merged, &expected);
        }
        prop_assert_eq!(graph.get_relation(&tail, &head).unwrap(), expected);
    }

    #[test]
    fn prop_stored_merge_is_idempotent(delta in arb_delta()) {
        let graph = graph();
        let (tail, head) = (Node::new("user", "1", "A"), Node::new("user", "2", "B"));
        graph.update_relation(&tail, &head, &delta).unwrap();
        let once = graph.get_relation(&tail, &head).unwrap();
        graph.update_relation(&tail, &head, &delta).unwrap();
        prop_assert_eq!(graph.get_relation(&tail, &head).unwrap(), once);
    }
}
