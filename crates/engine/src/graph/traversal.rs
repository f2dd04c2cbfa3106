//! Paged neighbor queries, degree counts and unbounded iteration.

use std::ops::ControlFlow;

use relgraph_core::{Page, Query, RelGraphError, RelGraphResult};
use tracing::{debug, error, warn};

use super::types::*;
use super::{keys, query, ArcGraph, LOG_TARGET};

impl ArcGraph {
    // =========================================================================
    // Paged queries
    // =========================================================================

    /// One page of nodes related to `node` by `verb` in `direction`.
    ///
    /// Results are the opposite endpoints, ascending by name (ties by arc
    /// key). A page shorter than `limit` is the last one. `limit` may not
    /// exceed `max_page_size`; a zero limit returns an empty page without
    /// querying the store.
    pub fn neighbors(
        &self,
        node: &Node,
        direction: Direction,
        verb: &RelationVerb,
        limit: usize,
        offset: usize,
    ) -> RelGraphResult<NodePage> {
        keys::validate_node(node)?;
        keys::validate_verb(verb)?;

        if limit > self.config.max_page_size {
            return Err(RelGraphError::invalid_input(format!(
                "page limit {} exceeds max_page_size {}",
                limit, self.config.max_page_size
            )));
        }
        if limit == 0 {
            return Ok(NodePage {
                results: Vec::new(),
                prev_offset: offset,
                next_offset: offset,
            });
        }

        let q = query::neighbor_query(&self.config.bucket, node, direction, verb);
        let results = self.fetch_page(&q, Page::new(limit, offset))?;
        let next_offset = offset + results.len();
        Ok(NodePage {
            results,
            prev_offset: offset,
            next_offset,
        })
    }

    /// Tails with an active `verb` arc into `head`.
    pub fn query_tails(
        &self,
        head: &Node,
        verb: &RelationVerb,
        limit: usize,
        offset: usize,
    ) -> RelGraphResult<NodePage> {
        self.neighbors(head, Direction::Incoming, verb, limit, offset)
    }

    /// Heads with an active `verb` arc out of `tail`.
    pub fn query_heads(
        &self,
        tail: &Node,
        verb: &RelationVerb,
        limit: usize,
        offset: usize,
    ) -> RelGraphResult<NodePage> {
        self.neighbors(tail, Direction::Outgoing, verb, limit, offset)
    }

    // =========================================================================
    // Degree
    // =========================================================================

    /// Number of arcs carrying `verb` at `node` in `direction`.
    pub fn degree(&self, node: &Node, direction: Direction, verb: &RelationVerb) -> RelGraphResult<u64> {
        keys::validate_node(node)?;
        keys::validate_verb(verb)?;

        let q = query::arc_filter(&self.config.bucket, node, direction, verb);
        self.store.count(&q).map_err(|e| {
            error!(
                target: LOG_TARGET,
                node = %node,
                verb = %verb,
                direction = ?direction,
                error = %e,
                "Degree count failed"
            );
            e
        })
    }

    /// Number of tails with an active `verb` arc into `head`.
    pub fn indegree(&self, head: &Node, verb: &RelationVerb) -> RelGraphResult<u64> {
        self.degree(head, Direction::Incoming, verb)
    }

    /// Number of heads with an active `verb` arc out of `tail`.
    pub fn outdegree(&self, tail: &Node, verb: &RelationVerb) -> RelGraphResult<u64> {
        self.degree(tail, Direction::Outgoing, verb)
    }

    // =========================================================================
    // Iteration
    // =========================================================================

    /// Call `f` for every neighbor of `node` in ascending name order.
    ///
    /// Pages of `max_page_size` are fetched until a short page. Returning
    /// [`ControlFlow::Break`] from `f` stops after the current node. Returns
    /// the number of nodes passed to `f`. A failing page query is returned
    /// as an error, or under [`IterationErrorMode::Stop`] logged and treated
    /// as the end of results.
    pub fn for_each_neighbor<F>(
        &self,
        node: &Node,
        direction: Direction,
        verb: &RelationVerb,
        mut f: F,
    ) -> RelGraphResult<usize>
    where
        F: FnMut(&Node) -> ControlFlow<()>,
    {
        keys::validate_node(node)?;
        keys::validate_verb(verb)?;

        let q = query::neighbor_query(&self.config.bucket, node, direction, verb);
        let limit = self.config.max_page_size;
        let mut page = Page::new(limit, 0);
        let mut delivered = 0;

        loop {
            let rows = match self.fetch_page(&q, page) {
                Ok(rows) => rows,
                Err(e) => match self.config.iteration_errors {
                    IterationErrorMode::Propagate => return Err(e),
                    IterationErrorMode::Stop => {
                        warn!(
                            target: LOG_TARGET,
                            node = %node,
                            verb = %verb,
                            offset = page.offset,
                            delivered,
                            error = %e,
                            "Iteration stopped on query failure"
                        );
                        return Ok(delivered);
                    }
                },
            };

            for row in &rows {
                delivered += 1;
                if f(row).is_break() {
                    return Ok(delivered);
                }
            }
            if rows.len() < limit {
                return Ok(delivered);
            }
            page = page.advance(rows.len());
        }
    }

    /// [`ArcGraph::for_each_neighbor`] over tails pointing at `head`.
    pub fn for_each_tail<F>(&self, head: &Node, verb: &RelationVerb, f: F) -> RelGraphResult<usize>
    where
        F: FnMut(&Node) -> ControlFlow<()>,
    {
        self.for_each_neighbor(head, Direction::Incoming, verb, f)
    }

    /// [`ArcGraph::for_each_neighbor`] over heads `tail` points at.
    pub fn for_each_head<F>(&self, tail: &Node, verb: &RelationVerb, f: F) -> RelGraphResult<usize>
    where
        F: FnMut(&Node) -> ControlFlow<()>,
    {
        self.for_each_neighbor(tail, Direction::Outgoing, verb, f)
    }

    fn fetch_page(&self, q: &Query, page: Page) -> RelGraphResult<Vec<Node>> {
        let rows = self.store.query(q, page)?;
        debug!(
            target: LOG_TARGET,
            query = %q,
            limit = page.limit,
            offset = page.offset,
            rows = rows.len(),
            "Fetched page"
        );
        rows.into_iter()
            .map(|row| serde_json::from_value::<Node>(row).map_err(RelGraphError::from))
            .collect()
    }
}
