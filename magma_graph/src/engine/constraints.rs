//! Feasibility rules for extending a partial mapping.

use crate::config::{EdgePolicy, SubgraphKind};
use crate::graph::DirectedMultigraph;

use super::assignment::{NodeMapping, PartialMapping};

/// What kind of correspondence the search is looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    /// A bijection preserving every edge count in both directions.
    Isomorphism,
    /// An injection of a pattern into a host.
    Subgraph(SubgraphKind),
}

/// Whether edge counts or only edge presence are compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EdgeSemantics {
    Count,
    Presence,
}

/// How a pattern quantity must relate to its host counterpart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Relation {
    Equal,
    AtMost,
    /// Present in one iff present in the other, and at most the host's count.
    SamePresence,
}

/// Edge and degree comparison rules for one pattern/host pair.
///
/// Counts are compared only when both graphs keep multiplicities; as soon as
/// one side is simple, only presence is compared.
#[derive(Clone, Debug)]
pub(crate) struct Compatibility {
    semantics: EdgeSemantics,
    edge_rel: Relation,
    degree_rel: Relation,
    pattern_degrees: Vec<(usize, usize)>,
    host_degrees: Vec<(usize, usize)>,
}

impl Compatibility {
    pub(crate) fn new(
        pattern: &DirectedMultigraph,
        host: &DirectedMultigraph,
        kind: MatchKind,
    ) -> Self {
        let semantics = match (pattern.policy(), host.policy()) {
            (EdgePolicy::Multi, EdgePolicy::Multi) => EdgeSemantics::Count,
            _ => EdgeSemantics::Presence,
        };
        let (edge_rel, degree_rel) = match kind {
            MatchKind::Isomorphism => (Relation::Equal, Relation::Equal),
            MatchKind::Subgraph(SubgraphKind::Induced) => {
                (Relation::SamePresence, Relation::AtMost)
            }
            MatchKind::Subgraph(SubgraphKind::Monomorphic) => (Relation::AtMost, Relation::AtMost),
        };
        Self {
            semantics,
            edge_rel,
            degree_rel,
            pattern_degrees: effective_degrees(pattern, semantics),
            host_degrees: effective_degrees(host, semantics),
        }
    }

    fn weight(&self, m: u32) -> u32 {
        match self.semantics {
            EdgeSemantics::Count => m,
            EdgeSemantics::Presence => m.min(1),
        }
    }

    /// Compare the pattern's `u -> v` count with the host's image count.
    pub(crate) fn edge_ok(&self, pattern_m: u32, host_m: u32) -> bool {
        let (p, h) = (self.weight(pattern_m), self.weight(host_m));
        match self.edge_rel {
            Relation::Equal => p == h,
            Relation::AtMost => p <= h,
            Relation::SamePresence => (p == 0) == (h == 0) && p <= h,
        }
    }

    /// Degree pruning: a pattern node can only land on a host node whose
    /// in/out degrees can absorb its own.
    pub(crate) fn degrees_ok(&self, p: usize, h: usize) -> bool {
        let (p_in, p_out) = self.pattern_degrees[p];
        let (h_in, h_out) = self.host_degrees[h];
        match self.degree_rel {
            Relation::Equal => p_in == h_in && p_out == h_out,
            Relation::AtMost | Relation::SamePresence => p_in <= h_in && p_out <= h_out,
        }
    }

    /// Whole-graph invariants that must agree before an isomorphism search is
    /// worth starting.
    pub(crate) fn same_invariants(
        &self,
        pattern: &DirectedMultigraph,
        host: &DirectedMultigraph,
    ) -> bool {
        let total = |g: &DirectedMultigraph| -> u64 {
            g.weighted_edges().map(|(_, _, c)| u64::from(self.weight(c))).sum()
        };
        let loops = |g: &DirectedMultigraph| -> Vec<u32> {
            let mut v: Vec<u32> = (0..g.node_count()).map(|u| self.weight(g.loops(u))).collect();
            v.sort_unstable();
            v
        };
        let mut p_deg = self.pattern_degrees.clone();
        let mut h_deg = self.host_degrees.clone();
        p_deg.sort_unstable();
        h_deg.sort_unstable();

        total(pattern) == total(host) && p_deg == h_deg && loops(pattern) == loops(host)
    }

    /// Check that mapping `p -> h` agrees with every pair already mapped,
    /// including the self-loop on `p` itself.
    pub(crate) fn extends(
        &self,
        pattern: &DirectedMultigraph,
        host: &DirectedMultigraph,
        st: &PartialMapping,
        p: usize,
        h: usize,
    ) -> bool {
        if !self.edge_ok(pattern.loops(p), host.loops(h)) {
            return false;
        }
        st.pairs().all(|(p2, h2)| {
            self.edge_ok(pattern.multiplicity(p, p2), host.multiplicity(h, h2))
                && self.edge_ok(pattern.multiplicity(p2, p), host.multiplicity(h2, h))
        })
    }
}

/// `(in, out)` per node under the given semantics.
fn effective_degrees(g: &DirectedMultigraph, semantics: EdgeSemantics) -> Vec<(usize, usize)> {
    let n = g.node_count();
    let mut degrees = vec![(0usize, 0usize); n];
    for (u, v, c) in g.weighted_edges() {
        let w = match semantics {
            EdgeSemantics::Count => c as usize,
            EdgeSemantics::Presence => 1,
        };
        degrees[u].1 += w;
        degrees[v].0 += w;
    }
    degrees
}

/// Check a finished mapping against both graphs from scratch.
///
/// Used to validate results; the search itself never needs it.
#[must_use]
pub fn verify_mapping(
    mapping: &NodeMapping,
    pattern: &DirectedMultigraph,
    host: &DirectedMultigraph,
    kind: MatchKind,
) -> bool {
    if mapping.len() != pattern.node_count() {
        return false;
    }
    if kind == MatchKind::Isomorphism && pattern.node_count() != host.node_count() {
        return false;
    }
    let mut used = vec![false; host.node_count()];
    for (_, h) in mapping.iter() {
        if h >= host.node_count() || used[h] {
            return false;
        }
        used[h] = true;
    }

    let compat = Compatibility::new(pattern, host, kind);
    mapping.iter().all(|(p, h)| {
        mapping
            .iter()
            .all(|(p2, h2)| compat.edge_ok(pattern.multiplicity(p, p2), host.multiplicity(h, h2)))
    })
}
