//! Exhaustive enumeration of directed graphs with prescribed degrees.
//!
//! The naive formulation picks `k` edges out of the `n(n-1)` non-loop
//! candidates and keeps the subsets whose realised degrees match, which means
//! `C(n(n-1), k)` candidates (about 4.4e15 for 8 nodes and 24 edges).
//! The search here fills the adjacency matrix row by row instead: row `i`
//! picks exactly `out[i]` columns among those whose in-degree budget is not yet
//! spent, and a branch dies as soon as some column needs more edges than the
//! remaining rows can supply. Every retained matrix matches the degrees exactly.
//!
//! The first row's choices partition the space; with the `rayon` feature each
//! partition runs on its own worker and results are concatenated in order, so
//! the output is identical to the sequential run.

use std::ops::ControlFlow;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::aggregate::ResultAggregator;
use crate::config::Config;
use crate::control::{SearchControl, SearchOutcome, SearchStatus};
use crate::error::{AdjacencyError, DegreeSpecError};
use crate::graph::DirectedMultigraph;

/// Required in-degree and out-degree for every node.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DegreeSpec {
    in_degrees: Vec<usize>,
    out_degrees: Vec<usize>,
}

impl DegreeSpec {
    /// Validate and build a spec.
    ///
    /// # Errors
    /// [`DegreeSpecError::LengthMismatch`] or [`DegreeSpecError::SumMismatch`].
    pub fn new(in_degrees: Vec<usize>, out_degrees: Vec<usize>) -> Result<Self, DegreeSpecError> {
        if in_degrees.len() != out_degrees.len() {
            return Err(DegreeSpecError::LengthMismatch {
                in_len: in_degrees.len(),
                out_len: out_degrees.len(),
            });
        }
        let in_sum: usize = in_degrees.iter().sum();
        let out_sum: usize = out_degrees.iter().sum();
        if in_sum != out_sum {
            return Err(DegreeSpecError::SumMismatch { in_sum, out_sum });
        }
        Ok(Self {
            in_degrees,
            out_degrees,
        })
    }

    /// Degrees read off an existing graph; consistent by construction.
    pub(crate) fn realised(in_degrees: Vec<usize>, out_degrees: Vec<usize>) -> Self {
        debug_assert_eq!(
            in_degrees.iter().sum::<usize>(),
            out_degrees.iter().sum::<usize>()
        );
        Self {
            in_degrees,
            out_degrees,
        }
    }

    /// Number of nodes the spec covers.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.in_degrees.len()
    }

    /// Required in-degrees.
    #[must_use]
    pub fn in_degrees(&self) -> &[usize] {
        &self.in_degrees
    }

    /// Required out-degrees.
    #[must_use]
    pub fn out_degrees(&self) -> &[usize] {
        &self.out_degrees
    }

    /// Total number of edges of any admissible graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.out_degrees.iter().sum()
    }

    /// `C(n(n-1), k)`: how many edge subsets a blind search would test.
    /// `None` if the count overflows `u128`.
    #[must_use]
    pub fn naive_candidate_count(&self) -> Option<u128> {
        let n = self.node_count() as u128;
        let slots = n * n.saturating_sub(1);
        binomial(slots, self.edge_count() as u128)
    }
}

fn binomial(n: u128, k: u128) -> Option<u128> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    (0..k).try_fold(1u128, |acc, i| Some(acc.checked_mul(n - i)? / (i + 1)))
}

/// A 0/1 adjacency matrix of a simple directed graph.
///
/// Serialized as a list of 0/1 rows.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<u8>>", try_from = "Vec<Vec<u8>>")]
pub struct AdjacencyMatrix {
    node_count: usize,
    cells: Vec<bool>,
}

impl AdjacencyMatrix {
    /// The edgeless matrix on `node_count` nodes.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            node_count,
            cells: vec![false; node_count * node_count],
        }
    }

    /// Number of nodes.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.node_count
    }

    /// True if `u -> v` is present.
    #[must_use]
    pub fn get(&self, u: usize, v: usize) -> bool {
        self.cells[u * self.node_count + v]
    }

    /// Set or clear `u -> v`.
    pub fn set(&mut self, u: usize, v: usize, present: bool) {
        self.cells[u * self.node_count + v] = present;
    }

    /// Present edges, row-major.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.node_count;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b)
            .map(move |(idx, _)| (idx / n, idx % n))
    }

    /// Column sums.
    #[must_use]
    pub fn in_degrees(&self) -> Vec<usize> {
        (0..self.node_count)
            .map(|v| (0..self.node_count).filter(|&u| self.get(u, v)).count())
            .collect()
    }

    /// Row sums.
    #[must_use]
    pub fn out_degrees(&self) -> Vec<usize> {
        (0..self.node_count)
            .map(|u| (0..self.node_count).filter(|&v| self.get(u, v)).count())
            .collect()
    }

    /// True if the realised degrees equal `spec` exactly.
    #[must_use]
    pub fn satisfies(&self, spec: &DegreeSpec) -> bool {
        self.in_degrees() == spec.in_degrees() && self.out_degrees() == spec.out_degrees()
    }
}

impl From<AdjacencyMatrix> for Vec<Vec<u8>> {
    fn from(m: AdjacencyMatrix) -> Self {
        (0..m.node_count)
            .map(|u| (0..m.node_count).map(|v| u8::from(m.get(u, v))).collect())
            .collect()
    }
}

impl TryFrom<Vec<Vec<u8>>> for AdjacencyMatrix {
    type Error = AdjacencyError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        let n = rows.len();
        let mut m = Self::new(n);
        for (u, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(AdjacencyError::NotSquare {
                    row: u,
                    len: row.len(),
                    order: n,
                });
            }
            for (v, &cell) in row.iter().enumerate() {
                match cell {
                    0 => {}
                    1 => m.set(u, v, true),
                    other => {
                        return Err(AdjacencyError::NotBinary {
                            row: u,
                            col: v,
                            value: other,
                        });
                    }
                }
            }
        }
        Ok(m)
    }
}

/// Enumerates loop-free simple digraphs that realise a [`DegreeSpec`].
pub struct ConstrainedEnumerator<'cfg> {
    config: &'cfg Config,
}

impl<'cfg> ConstrainedEnumerator<'cfg> {
    /// An enumerator honouring `config.max_results` and `config.parallel`.
    #[must_use]
    pub const fn new(config: &'cfg Config) -> Self {
        Self { config }
    }

    /// Every adjacency matrix on `node_count` nodes whose in/out degrees equal
    /// `spec`. An empty result means no such graph exists.
    ///
    /// # Errors
    /// [`DegreeSpecError::NodeCountMismatch`] if `spec` covers a different
    /// number of nodes.
    pub fn enumerate(
        &self,
        node_count: usize,
        spec: &DegreeSpec,
        control: Option<&SearchControl>,
    ) -> Result<SearchOutcome<AdjacencyMatrix>, DegreeSpecError> {
        if spec.node_count() != node_count {
            return Err(DegreeSpecError::NodeCountMismatch {
                expected: node_count,
                actual: spec.node_count(),
            });
        }
        info!(
            "Enumerating {}-node digraphs with {} edges (naive candidates: {:?})",
            node_count,
            spec.edge_count(),
            spec.naive_candidate_count()
        );

        let limit = self.config.max_results;
        if limit == Some(0) {
            return Ok(SearchOutcome {
                items: Vec::new(),
                status: SearchStatus::Truncated,
            });
        }
        if node_count == 0 {
            return Ok(SearchOutcome {
                items: vec![AdjacencyMatrix::new(0)],
                status: SearchStatus::Complete,
            });
        }

        let partitions: Vec<Vec<usize>> = (1..node_count)
            .combinations(spec.out_degrees()[0])
            .filter(|cols| cols.iter().all(|&v| spec.in_degrees()[v] > 0))
            .collect();
        debug!("{} first-row partitions", partitions.len());

        let run = |cols: &Vec<usize>| RowSearch::start(spec, cols, control, limit).run();

        #[cfg(feature = "rayon")]
        let parts: Vec<(Vec<AdjacencyMatrix>, SearchStatus)> = if self.config.use_parallel() {
            partitions.par_iter().map(run).collect()
        } else {
            sequential(&partitions, run, limit)
        };

        #[cfg(not(feature = "rayon"))]
        let parts: Vec<(Vec<AdjacencyMatrix>, SearchStatus)> = sequential(&partitions, run, limit);

        let outcome = merge(parts, limit);
        if let Some(c) = control {
            debug!("Enumeration progress: {:?}", c.snapshot());
        }
        info!("Found {} graphs ({:?})", outcome.len(), outcome.status);
        Ok(outcome)
    }

    /// Enumerate, then keep one representative (the first found) per
    /// isomorphism class.
    ///
    /// # Errors
    /// As [`enumerate`](Self::enumerate).
    pub fn enumerate_up_to_isomorphism(
        &self,
        node_count: usize,
        spec: &DegreeSpec,
        control: Option<&SearchControl>,
    ) -> Result<SearchOutcome<AdjacencyMatrix>, DegreeSpecError> {
        let SearchOutcome { items, status } = self.enumerate(node_count, spec, control)?;
        let graphs: Vec<DirectedMultigraph> =
            items.iter().map(DirectedMultigraph::from_adjacency).collect();
        let classes = ResultAggregator::new(self.config).classify(&graphs);
        let items = classes
            .representatives
            .iter()
            .map(|&r| items[r].clone())
            .collect();
        Ok(SearchOutcome { items, status })
    }
}

/// Run partitions in order, stopping early once the cap is hit or the search
/// is cancelled.
fn sequential<F>(
    partitions: &[Vec<usize>],
    run: F,
    limit: Option<usize>,
) -> Vec<(Vec<AdjacencyMatrix>, SearchStatus)>
where
    F: Fn(&Vec<usize>) -> (Vec<AdjacencyMatrix>, SearchStatus),
{
    let mut parts = Vec::with_capacity(partitions.len());
    let mut total = 0;
    for cols in partitions {
        let (found, status) = run(cols);
        total += found.len();
        parts.push((found, status));
        if !status.is_complete() || limit.is_some_and(|l| total >= l) {
            break;
        }
    }
    parts
}

/// Concatenate partition results and derive the overall status.
fn merge(
    parts: Vec<(Vec<AdjacencyMatrix>, SearchStatus)>,
    limit: Option<usize>,
) -> SearchOutcome<AdjacencyMatrix> {
    let mut status = SearchStatus::Complete;
    let mut items = Vec::new();
    for (found, part_status) in parts {
        match part_status {
            SearchStatus::Cancelled => status = SearchStatus::Cancelled,
            SearchStatus::Truncated if status == SearchStatus::Complete => {
                status = SearchStatus::Truncated;
            }
            _ => {}
        }
        items.extend(found);
    }
    if let Some(l) = limit {
        if items.len() >= l {
            items.truncate(l);
            if status == SearchStatus::Complete {
                status = SearchStatus::Truncated;
            }
        }
    }
    SearchOutcome { items, status }
}

/// Backtracking state for one first-row partition.
struct RowSearch<'a> {
    spec: &'a DegreeSpec,
    n: usize,
    in_remaining: Vec<usize>,
    matrix: AdjacencyMatrix,
    found: Vec<AdjacencyMatrix>,
    control: Option<&'a SearchControl>,
    limit: Option<usize>,
}

impl<'a> RowSearch<'a> {
    fn start(
        spec: &'a DegreeSpec,
        first_row: &[usize],
        control: Option<&'a SearchControl>,
        limit: Option<usize>,
    ) -> Self {
        let n = spec.node_count();
        let mut in_remaining = spec.in_degrees().to_vec();
        let mut matrix = AdjacencyMatrix::new(n);
        for &v in first_row {
            matrix.set(0, v, true);
            in_remaining[v] -= 1;
        }
        Self {
            spec,
            n,
            in_remaining,
            matrix,
            found: Vec::new(),
            control,
            limit,
        }
    }

    fn run(mut self) -> (Vec<AdjacencyMatrix>, SearchStatus) {
        let status = match self.search_row(1) {
            ControlFlow::Continue(()) => SearchStatus::Complete,
            ControlFlow::Break(status) => status,
        };
        (self.found, status)
    }

    /// Some column needs more edges than rows `row..n` (excluding itself) can give.
    fn starved(&self, row: usize) -> bool {
        (0..self.n).any(|v| {
            let feeders = (row..self.n).filter(|&r| r != v).count();
            self.in_remaining[v] > feeders
        })
    }

    fn search_row(&mut self, row: usize) -> ControlFlow<SearchStatus> {
        if let Some(c) = self.control {
            c.inc_explored(1);
            if c.is_cancelled() {
                return ControlFlow::Break(SearchStatus::Cancelled);
            }
        }

        // Base Case
        if row == self.n {
            if self.in_remaining.iter().all(|&r| r == 0) {
                debug_assert!(self.matrix.satisfies(self.spec));
                self.found.push(self.matrix.clone());
                if let Some(c) = self.control {
                    c.inc_found(1);
                }
                if self.limit.is_some_and(|l| self.found.len() >= l) {
                    return ControlFlow::Break(SearchStatus::Truncated);
                }
            }
            return ControlFlow::Continue(());
        }

        if self.starved(row) {
            return ControlFlow::Continue(());
        }
        self.choose_cols(row, 0, self.spec.out_degrees()[row])
    }

    /// Pick `need` more columns for `row`, in increasing order from `from`.
    fn choose_cols(&mut self, row: usize, from: usize, need: usize) -> ControlFlow<SearchStatus> {
        if need == 0 {
            return self.search_row(row + 1);
        }
        for v in from..self.n {
            if v == row || self.in_remaining[v] == 0 {
                continue;
            }
            self.matrix.set(row, v, true);
            self.in_remaining[v] -= 1;
            let flow = self.choose_cols(row, v + 1, need - 1);
            self.in_remaining[v] += 1;
            self.matrix.set(row, v, false);
            flow?;
        }
        ControlFlow::Continue(())
    }
}
