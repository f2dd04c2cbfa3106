//! Paged queries, iteration and degree counts agree.

use crate::test_utils::*;
use proptest::prelude::*;
use relgraph::{Node, RelGraphError, RelationSet, RelationVerb};
use std::ops::ControlFlow;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_pages_iteration_and_degree_agree(
        names in prop::collection::vec("[a-e]{1,2}", 0..25),
        limit in 1usize..8,
        page_size in 1usize..6,
    ) {
        let graph = graph_with_page_size(page_size);
        let head = Node::new("page", "home", "Home");
        let follow = RelationSet::from_verbs([RelationVerb::FOLLOW]);
        for (i, name) in names.iter().enumerate() {
            let tail = Node::new("user", (i + 1).to_string(), name.clone());
            graph.update_relation(&tail, &head, &follow).unwrap();
        }
        // Tails linked by another verb never show up
        graph
            .update_relation(&Node::new("user", "999", "aaa"), &head, &RelationSet::from_verbs([RelationVerb::LIKE]))
            .unwrap();

        // Oversized limits are refused instead of returning short pages
        let limit = if limit > page_size {
            let err = graph.query_tails(&head, &RelationVerb::FOLLOW, limit, 0).unwrap_err();
            prop_assert!(matches!(err, RelGraphError::InvalidInput { .. }), "expected InvalidInput, got {:?}", err);
            page_size
        } else {
            limit
        };

        let mut paged = Vec::new();
        let mut offset = 0;
        loop {
            let page = graph.query_tails(&head, &RelationVerb::FOLLOW, limit, offset).unwrap();
            prop_assert_eq!(page.prev_offset, offset);
            prop_assert_eq!(page.next_offset, offset + page.size());
            paged.extend(page.results.iter().map(|n| n.id.to_string()));
            offset = page.next_offset;
            if page.is_last(limit) {
                break;
            }
        }

        let mut iterated = Vec::new();
        graph
            .for_each_tail(&head, &RelationVerb::FOLLOW, |n| {
                iterated.push(n.id.to_string());
                ControlFlow::Continue(())
            })
            .unwrap();

        prop_assert_eq!(&paged, &iterated);
        prop_assert_eq!(graph.indegree(&head, &RelationVerb::FOLLOW).unwrap(), paged.len() as u64);

        let mut distinct = paged.clone();
        distinct.sort();
        distinct.dedup();
        prop_assert_eq!(distinct.len(), names.len());
    }

    #[test]
    fn prop_outdegree_counts_distinct_heads(heads in prop::collection::vec(1u32..20, 0..30)) {
        let graph = graph();
        let tail = Node::new("user", "0", "Me");
        let like = RelationSet::from_verbs([RelationVerb::LIKE]);
        for h in &heads {
            graph.update_relation(&tail, &Node::new("post", h.to_string(), ""), &like).unwrap();
        }

        let mut distinct = heads.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(graph.outdegree(&tail, &RelationVerb::LIKE).unwrap(), distinct.len() as u64);
    }
}
