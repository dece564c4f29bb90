//! Backtracking (VF2-family) search for isomorphisms and subgraph embeddings.

use std::ops::ControlFlow;

use tracing::{debug, trace};

use crate::config::{Config, SubgraphKind};
use crate::control::{SearchControl, SearchOutcome, SearchStatus};
use crate::graph::DirectedMultigraph;

use super::assignment::{NodeMapping, PartialMapping};
use super::constraints::{Compatibility, MatchKind};

/// Why a search stopped before exhausting its space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Halt {
    /// The visitor had what it needed.
    Satisfied,
    /// The control handle was cancelled.
    Cancelled,
}

/// A prepared search of `pattern` against `host`.
///
/// Pattern nodes are visited in a fixed order that keeps each new node
/// connected to already-mapped ones where possible, so constraint checks
/// bite early. Host candidates are tried in index order.
pub struct IsomorphismMatcher<'p, 'h> {
    pattern: &'p DirectedMultigraph,
    host: &'h DirectedMultigraph,
    kind: MatchKind,
    compat: Compatibility,
    order: Vec<usize>,
}

impl<'p, 'h> IsomorphismMatcher<'p, 'h> {
    /// Prepare a search.
    #[must_use]
    pub fn new(
        pattern: &'p DirectedMultigraph,
        host: &'h DirectedMultigraph,
        kind: MatchKind,
    ) -> Self {
        let compat = Compatibility::new(pattern, host, kind);
        let order = match_order(pattern);
        Self {
            pattern,
            host,
            kind,
            compat,
            order,
        }
    }

    /// Cheap rejections that need no search.
    fn trivially_impossible(&self) -> bool {
        let (pn, hn) = (self.pattern.node_count(), self.host.node_count());
        match self.kind {
            MatchKind::Isomorphism => {
                pn != hn || !self.compat.same_invariants(self.pattern, self.host)
            }
            MatchKind::Subgraph(_) => pn > hn,
        }
    }

    /// The first mapping found, if any. A cancelled search reports
    /// [`SearchStatus::Cancelled`] with no items, so it never reads as "no match".
    #[must_use]
    pub fn first(&self, control: Option<&SearchControl>) -> SearchOutcome<NodeMapping> {
        if self.trivially_impossible() {
            return SearchOutcome {
                items: Vec::new(),
                status: SearchStatus::Complete,
            };
        }
        let mut items = Vec::with_capacity(1);
        let mut st = PartialMapping::new(self.pattern.node_count(), self.host.node_count());
        let flow = self.backtrack(&mut st, 0, control, &mut |st| {
            items.push(st.to_complete());
            ControlFlow::Break(())
        });
        let status = match flow {
            ControlFlow::Break(Halt::Cancelled) => SearchStatus::Cancelled,
            ControlFlow::Continue(()) | ControlFlow::Break(Halt::Satisfied) => {
                SearchStatus::Complete
            }
        };
        SearchOutcome { items, status }
    }

    /// Every mapping, up to `limit` of them.
    #[must_use]
    pub fn all(
        &self,
        limit: Option<usize>,
        control: Option<&SearchControl>,
    ) -> SearchOutcome<NodeMapping> {
        if self.trivially_impossible() {
            return SearchOutcome {
                items: Vec::new(),
                status: SearchStatus::Complete,
            };
        }
        if limit == Some(0) {
            return SearchOutcome {
                items: Vec::new(),
                status: SearchStatus::Truncated,
            };
        }

        let mut items = Vec::new();
        let mut st = PartialMapping::new(self.pattern.node_count(), self.host.node_count());
        let flow = self.backtrack(&mut st, 0, control, &mut |st| {
            items.push(st.to_complete());
            if let Some(c) = control {
                c.inc_found(1);
            }
            if limit.is_some_and(|l| items.len() >= l) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        let status = match flow {
            ControlFlow::Continue(()) => SearchStatus::Complete,
            ControlFlow::Break(Halt::Satisfied) => SearchStatus::Truncated,
            ControlFlow::Break(Halt::Cancelled) => SearchStatus::Cancelled,
        };
        debug!("Enumerated {} mappings ({:?})", items.len(), status);
        SearchOutcome { items, status }
    }

    fn backtrack(
        &self,
        st: &mut PartialMapping,
        depth: usize,
        control: Option<&SearchControl>,
        visit: &mut dyn FnMut(&PartialMapping) -> ControlFlow<()>,
    ) -> ControlFlow<Halt> {
        if let Some(c) = control {
            c.inc_explored(1);
            if c.is_cancelled() {
                return ControlFlow::Break(Halt::Cancelled);
            }
        }

        // Base Case
        let Some(&next_p) = self.order.get(depth) else {
            debug_assert!(st.done());
            return match visit(st) {
                ControlFlow::Continue(()) => ControlFlow::Continue(()),
                ControlFlow::Break(()) => ControlFlow::Break(Halt::Satisfied),
            };
        };

        for h in 0..self.host.node_count() {
            if !st.host_is_free(h)
                || !self.compat.degrees_ok(next_p, h)
                || !self.compat.extends(self.pattern, self.host, st, next_p, h)
            {
                continue;
            }
            trace!("Depth {} trying {} -> {}", depth, next_p, h);
            with_assignment(st, next_p, h, |st_inner| {
                self.backtrack(st_inner, depth + 1, control, &mut *visit)
            })?;
        }

        ControlFlow::Continue(())
    }
}

/// Scoped helper that maps `p -> h`, runs `f`, then removes the assignment.
fn with_assignment<R>(
    st: &mut PartialMapping,
    p: usize,
    h: usize,
    f: impl FnOnce(&mut PartialMapping) -> R,
) -> R {
    st.assign(p, h);
    let out = f(st);
    st.unassign(p);
    out
}

/// Order pattern nodes: start from the highest-degree node, then repeatedly
/// take the node with the most links into the already-ordered set.
/// Ties go to higher degree, then lower index.
fn match_order(pattern: &DirectedMultigraph) -> Vec<usize> {
    let n = pattern.node_count();
    let degree: Vec<usize> = (0..n)
        .map(|u| pattern.in_degree(u) + pattern.out_degree(u))
        .collect();
    let linked = |u: usize, v: usize| pattern.has_edge(u, v) || pattern.has_edge(v, u);

    let mut order = Vec::with_capacity(n);
    let mut placed = vec![false; n];
    let mut links = vec![0usize; n];

    for _ in 0..n {
        let Some(next) = (0..n)
            .filter(|&u| !placed[u])
            .max_by(|&a, &b| {
                links[a]
                    .cmp(&links[b])
                    .then(degree[a].cmp(&degree[b]))
                    .then(b.cmp(&a))
            })
        else {
            break;
        };
        placed[next] = true;
        order.push(next);
        for u in (0..n).filter(|&u| !placed[u] && linked(u, next)) {
            links[u] += 1;
        }
    }
    order
}

/// True if `g1` and `g2` are isomorphic. Graphs of different sizes never are.
#[must_use]
pub fn is_isomorphic(g1: &DirectedMultigraph, g2: &DirectedMultigraph) -> bool {
    find_isomorphism(g1, g2).is_some()
}

/// A witnessing bijection from `g1`'s nodes to `g2`'s, if one exists.
#[must_use]
pub fn find_isomorphism(g1: &DirectedMultigraph, g2: &DirectedMultigraph) -> Option<NodeMapping> {
    let found = IsomorphismMatcher::new(g1, g2, MatchKind::Isomorphism)
        .first(None)
        .items
        .pop();
    debug!(
        "Isomorphism check on {} nodes: {}",
        g1.node_count(),
        found.is_some()
    );
    found
}

/// An embedding of `pattern` into `host`, if one exists.
#[must_use]
pub fn subgraph_isomorphism(
    pattern: &DirectedMultigraph,
    host: &DirectedMultigraph,
    kind: SubgraphKind,
) -> Option<NodeMapping> {
    IsomorphismMatcher::new(pattern, host, MatchKind::Subgraph(kind))
        .first(None)
        .items
        .pop()
}

/// True if `pattern` embeds into `host`.
#[must_use]
pub fn is_subgraph_isomorphic(
    pattern: &DirectedMultigraph,
    host: &DirectedMultigraph,
    kind: SubgraphKind,
) -> bool {
    subgraph_isomorphism(pattern, host, kind).is_some()
}

/// Every embedding of `pattern` into `host`, honouring `config.max_results`
/// and `config.subgraph_kind`.
#[must_use]
pub fn subgraph_mappings(
    pattern: &DirectedMultigraph,
    host: &DirectedMultigraph,
    config: &Config,
    control: Option<&SearchControl>,
) -> SearchOutcome<NodeMapping> {
    IsomorphismMatcher::new(pattern, host, MatchKind::Subgraph(config.subgraph_kind))
        .all(config.max_results, control)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EdgePolicy;
    use crate::engine::verify_mapping;

    fn cycle(n: usize) -> DirectedMultigraph {
        DirectedMultigraph::from_edges(n, EdgePolicy::Simple, (0..n).map(|i| (i, (i + 1) % n)))
    }

    #[test]
    fn match_order_follows_links() {
        // path 0 -> 1 -> 2 -> 3 with a hub on 1
        let g = DirectedMultigraph::from_edges(
            4,
            EdgePolicy::Simple,
            [(0, 1), (1, 2), (2, 3), (1, 3)],
        );
        let order = match_order(&g);
        assert_eq!(order.len(), 4);
        assert_eq!(order[0], 1);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
    }

    #[test]
    fn cycle_is_isomorphic_to_relabeled_cycle() {
        let g = cycle(5);
        let h = DirectedMultigraph::from_edges(
            5,
            EdgePolicy::Simple,
            [(3, 0), (0, 4), (4, 1), (1, 2), (2, 3)],
        );
        let m = find_isomorphism(&g, &h).unwrap();
        assert!(verify_mapping(&m, &g, &h, MatchKind::Isomorphism));
    }

    #[test]
    fn multiplicity_breaks_isomorphism() {
        let a = DirectedMultigraph::from_edges(2, EdgePolicy::Multi, [(0, 1), (0, 1), (1, 0)]);
        let b = DirectedMultigraph::from_edges(2, EdgePolicy::Multi, [(0, 1), (1, 0), (1, 0)]);
        let c = DirectedMultigraph::from_edges(2, EdgePolicy::Multi, [(0, 1), (1, 0), (1, 1)]);
        assert!(is_isomorphic(&a, &b));
        assert!(!is_isomorphic(&a, &c));
    }

    #[test]
    fn size_mismatch_is_not_isomorphic() {
        assert!(!is_isomorphic(&cycle(3), &cycle(4)));
    }

    #[test]
    fn empty_graphs_are_isomorphic() {
        let e = DirectedMultigraph::from_edges(0, EdgePolicy::Multi, std::iter::empty());
        assert!(is_isomorphic(&e, &e));
    }

    #[test]
    fn induced_vs_monomorphic() {
        // path a -> b inside a 2-cycle: monomorphic yes, induced no
        let path = DirectedMultigraph::from_edges(2, EdgePolicy::Simple, [(0, 1)]);
        let two_cycle = cycle(2);
        assert!(is_subgraph_isomorphic(&path, &two_cycle, SubgraphKind::Monomorphic));
        assert!(!is_subgraph_isomorphic(&path, &two_cycle, SubgraphKind::Induced));
    }

    #[test]
    fn all_embeddings_of_edge_in_triangle_cycle() {
        let edge = DirectedMultigraph::from_edges(2, EdgePolicy::Simple, [(0, 1)]);
        let host = cycle(3);
        let out = subgraph_mappings(&edge, &host, &Config::default(), None);
        assert_eq!(out.status, SearchStatus::Complete);
        assert_eq!(out.len(), 3);
        for m in &out.items {
            assert!(verify_mapping(m, &edge, &host, MatchKind::Subgraph(SubgraphKind::Induced)));
        }
    }

    #[test]
    fn limit_truncates_and_cancel_stops() {
        let edge = DirectedMultigraph::from_edges(2, EdgePolicy::Simple, [(0, 1)]);
        let host = cycle(6);
        let cfg = Config::builder().max_results(Some(2)).build();
        let out = subgraph_mappings(&edge, &host, &cfg, None);
        assert_eq!(out.len(), 2);
        assert_eq!(out.status, SearchStatus::Truncated);

        let control = SearchControl::new();
        control.cancel();
        let out = subgraph_mappings(&edge, &host, &Config::default(), Some(&control));
        assert!(out.is_empty());
        assert_eq!(out.status, SearchStatus::Cancelled);
    }

    #[test]
    fn first_reports_cancellation_apart_from_no_match() {
        let g = cycle(4);
        let h = DirectedMultigraph::from_edges(
            4,
            EdgePolicy::Simple,
            [(1, 0), (2, 1), (3, 2), (0, 3)],
        );
        let matcher = IsomorphismMatcher::new(&g, &h, MatchKind::Isomorphism);

        let control = SearchControl::new();
        let out = matcher.first(Some(&control));
        assert_eq!(out.status, SearchStatus::Complete);
        assert_eq!(out.len(), 1);
        assert!(verify_mapping(&out.items[0], &g, &h, MatchKind::Isomorphism));

        control.cancel();
        let out = matcher.first(Some(&control));
        assert!(out.is_empty());
        assert_eq!(out.status, SearchStatus::Cancelled);

        // a genuine miss finishes the search
        let path = DirectedMultigraph::from_edges(4, EdgePolicy::Simple, [(0, 1), (1, 2), (2, 3)]);
        let out = IsomorphismMatcher::new(&g, &path, MatchKind::Isomorphism).first(None);
        assert!(out.is_empty());
        assert_eq!(out.status, SearchStatus::Complete);
    }
}
