//! Directed multigraphs derived from operation tables.
//!
//! For every ordered pair `(i, j)` with `k = M[i][j]` the builder emits the
//! edges `i -> k` and `k -> j`. Under [`EdgePolicy::Multi`] every emission is
//! its own edge, so a table of order `n` always yields `2n²` edges; under
//! [`EdgePolicy::Simple`] duplicates collapse.

use serde::{Deserialize, Serialize};

use crate::config::EdgePolicy;
use crate::enumerate::{AdjacencyMatrix, DegreeSpec};
use crate::error::PermutationError;
use crate::permutation::Permutation;
use crate::table::OperationTable;

/// An immutable directed graph on `0..n` that may carry parallel edges and
/// self-loops.
///
/// Edge multiplicities are kept in a dense `n × n` count matrix so matchers can
/// query `multiplicity(u, v)` in constant time. Under the simple policy every
/// count is 0 or 1.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectedMultigraph {
    node_count: usize,
    policy: EdgePolicy,
    counts: Vec<u32>,
    edge_count: usize,
}

impl DirectedMultigraph {
    /// Build a graph from an explicit edge list.
    ///
    /// Under [`EdgePolicy::Simple`] repeated edges are stored once.
    #[must_use]
    pub fn from_edges(
        node_count: usize,
        policy: EdgePolicy,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Self {
        let mut counts = vec![0u32; node_count * node_count];
        for (u, v) in edges {
            debug_assert!(u < node_count && v < node_count, "edge ({u}, {v}) out of range");
            let slot = &mut counts[u * node_count + v];
            match policy {
                EdgePolicy::Multi => *slot += 1,
                EdgePolicy::Simple => *slot = 1,
            }
        }
        Self::from_counts(node_count, policy, counts)
    }

    /// Build a simple graph from a 0/1 adjacency matrix.
    #[must_use]
    pub fn from_adjacency(adjacency: &AdjacencyMatrix) -> Self {
        Self::from_edges(adjacency.node_count(), EdgePolicy::Simple, adjacency.edges())
    }

    pub(crate) fn from_counts(node_count: usize, policy: EdgePolicy, counts: Vec<u32>) -> Self {
        debug_assert_eq!(counts.len(), node_count * node_count);
        let edge_count = counts.iter().map(|&c| c as usize).sum();
        Self {
            node_count,
            policy,
            counts,
            edge_count,
        }
    }

    /// Number of nodes.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of edges, counting parallel edges separately.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Edge policy the graph was built with.
    #[must_use]
    pub const fn policy(&self) -> EdgePolicy {
        self.policy
    }

    /// Number of parallel edges `u -> v`.
    #[must_use]
    pub fn multiplicity(&self, u: usize, v: usize) -> u32 {
        self.counts[u * self.node_count + v]
    }

    /// True if at least one edge `u -> v` exists.
    #[must_use]
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.multiplicity(u, v) > 0
    }

    /// Number of self-loops on `u`.
    #[must_use]
    pub fn loops(&self, u: usize) -> u32 {
        self.multiplicity(u, u)
    }

    /// Out-degree of `u`, counting multiplicity. A self-loop counts once here
    /// and once in the in-degree.
    #[must_use]
    pub fn out_degree(&self, u: usize) -> usize {
        self.row(u).iter().map(|&c| c as usize).sum()
    }

    /// In-degree of `v`, counting multiplicity.
    #[must_use]
    pub fn in_degree(&self, v: usize) -> usize {
        (0..self.node_count)
            .map(|u| self.multiplicity(u, v) as usize)
            .sum()
    }

    /// Distinct targets of edges leaving `u`, in index order.
    pub fn successors(&self, u: usize) -> impl Iterator<Item = usize> + '_ {
        self.row(u)
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(v, _)| v)
    }

    /// Distinct sources of edges entering `v`, in index order.
    pub fn predecessors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.node_count).filter(move |&u| self.has_edge(u, v))
    }

    /// Every `(u, v, multiplicity)` with a non-zero count, row-major.
    pub fn weighted_edges(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        let n = self.node_count;
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(move |(idx, &c)| (idx / n, idx % n, c))
    }

    /// Every edge, repeated once per parallel copy.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.weighted_edges()
            .flat_map(|(u, v, c)| std::iter::repeat_n((u, v), c as usize))
    }

    /// The degree spec this graph realises.
    #[must_use]
    pub fn degree_spec(&self) -> DegreeSpec {
        DegreeSpec::realised(
            (0..self.node_count).map(|v| self.in_degree(v)).collect(),
            (0..self.node_count).map(|u| self.out_degree(u)).collect(),
        )
    }

    /// Rename node `u` to `p(u)`. The result is isomorphic to `self` with `p`
    /// as a witness.
    ///
    /// # Errors
    /// [`PermutationError::SizeMismatch`] when `p` does not act on `0..n`.
    pub fn relabel(&self, p: &Permutation) -> Result<Self, PermutationError> {
        if p.len() != self.node_count {
            return Err(PermutationError::SizeMismatch {
                expected: self.node_count,
                actual: p.len(),
            });
        }
        let n = self.node_count;
        let mut counts = vec![0u32; n * n];
        for (u, v, c) in self.weighted_edges() {
            counts[p.apply(u) * n + p.apply(v)] = c;
        }
        Ok(Self::from_counts(n, self.policy, counts))
    }

    fn row(&self, u: usize) -> &[u32] {
        &self.counts[u * self.node_count..(u + 1) * self.node_count]
    }
}

/// Derives graphs from operation tables under a fixed edge policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct GraphBuilder {
    policy: EdgePolicy,
}

impl GraphBuilder {
    /// A builder with the given policy.
    #[must_use]
    pub const fn new(policy: EdgePolicy) -> Self {
        Self { policy }
    }

    /// The policy used by [`build`](Self::build).
    #[must_use]
    pub const fn policy(&self) -> EdgePolicy {
        self.policy
    }

    /// Emit `i -> M[i][j]` and `M[i][j] -> j` for every ordered pair.
    ///
    /// When `i == j == k` both emitted edges are the same self-loop; in multi
    /// mode that still adds two to its count.
    #[must_use]
    pub fn build(&self, table: &OperationTable) -> DirectedMultigraph {
        let edges = table
            .entries()
            .flat_map(|(i, j, k)| [(i, k), (k, j)]);
        DirectedMultigraph::from_edges(table.order(), self.policy, edges)
    }

    /// Build one graph per table, preserving order.
    #[must_use]
    pub fn build_all(&self, tables: &[OperationTable]) -> Vec<DirectedMultigraph> {
        tables.iter().map(|t| self.build(t)).collect()
    }
}

/// Summary numbers for a single graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of edges with multiplicity.
    pub edge_count: usize,
    /// Number of distinct ordered node pairs joined by an edge.
    pub distinct_edges: usize,
    /// Total self-loops, with multiplicity.
    pub self_loops: usize,
    /// In-degree per node.
    pub in_degrees: Vec<usize>,
    /// Out-degree per node.
    pub out_degrees: Vec<usize>,
    /// In-degree plus out-degree per node.
    pub degree_sequence: Vec<usize>,
}

impl GraphStats {
    /// Compute the summary for `graph`.
    #[must_use]
    pub fn of(graph: &DirectedMultigraph) -> Self {
        let n = graph.node_count();
        let in_degrees: Vec<usize> = (0..n).map(|v| graph.in_degree(v)).collect();
        let out_degrees: Vec<usize> = (0..n).map(|u| graph.out_degree(u)).collect();
        let degree_sequence = in_degrees
            .iter()
            .zip(&out_degrees)
            .map(|(i, o)| i + o)
            .collect();
        Self {
            node_count: n,
            edge_count: graph.edge_count(),
            distinct_edges: graph.weighted_edges().count(),
            self_loops: (0..n).map(|u| graph.loops(u) as usize).sum(),
            in_degrees,
            out_degrees,
            degree_sequence,
        }
    }
}
