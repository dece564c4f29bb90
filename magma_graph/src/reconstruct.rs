//! Reading an operation table back off a graph.
//!
//! For each cell `(i, j)` the candidates are the nodes `k` with edges
//! `i -> k` and `k -> j`. A cell is determined only when there is exactly one
//! candidate. Ambiguous and empty cells are reported as such and never
//! resolved by a guess.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::DirectedMultigraph;
use crate::table::OperationTable;

/// Outcome for a single cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellReconstruction {
    /// Exactly one intermediate node fits.
    Determined(usize),
    /// Zero or several intermediate nodes fit.
    Ambiguous(Vec<usize>),
}

/// Per-cell reconstruction of an `n × n` table, row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconstruction {
    order: usize,
    cells: Vec<CellReconstruction>,
}

impl Reconstruction {
    /// Table order.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Outcome for cell `(i, j)`.
    #[must_use]
    pub fn cell(&self, i: usize, j: usize) -> &CellReconstruction {
        &self.cells[i * self.order + j]
    }

    /// `(i, j, candidates)` for every cell that is not determined.
    pub fn ambiguous_cells(&self) -> impl Iterator<Item = (usize, usize, &[usize])> + '_ {
        let n = self.order;
        self.cells.iter().enumerate().filter_map(move |(idx, c)| match c {
            CellReconstruction::Determined(_) => None,
            CellReconstruction::Ambiguous(ks) => Some((idx / n, idx % n, ks.as_slice())),
        })
    }

    /// True when every cell is determined.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.ambiguous_cells().next().is_none()
    }

    /// The table, if every cell is determined.
    #[must_use]
    pub fn into_table(self) -> Option<OperationTable> {
        let values: Option<Vec<usize>> = self
            .cells
            .iter()
            .map(|c| match c {
                CellReconstruction::Determined(k) => Some(*k),
                CellReconstruction::Ambiguous(_) => None,
            })
            .collect();
        let values = values?;
        Some(OperationTable::from_fn(self.order, |i, j| values[i * self.order + j]))
    }
}

/// Compute candidates for every cell of the table behind `graph`.
#[must_use]
pub fn reconstruct_table(graph: &DirectedMultigraph) -> Reconstruction {
    let n = graph.node_count();
    let mut cells = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let ks: Vec<usize> = graph
                .successors(i)
                .filter(|&k| graph.has_edge(k, j))
                .collect();
            cells.push(match ks.as_slice() {
                [k] => CellReconstruction::Determined(*k),
                _ => CellReconstruction::Ambiguous(ks),
            });
        }
    }
    let reconstruction = Reconstruction { order: n, cells };
    debug!(
        "Reconstructed order-{} table, {} ambiguous cells",
        n,
        reconstruction.ambiguous_cells().count()
    );
    reconstruction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EdgePolicy;
    use crate::graph::GraphBuilder;

    #[test]
    fn trivial_table_is_recovered() {
        let table = OperationTable::from_fn(1, |_, _| 0);
        let g = GraphBuilder::new(EdgePolicy::Simple).build(&table);
        let rec = reconstruct_table(&g);
        assert!(rec.is_complete());
        assert_eq!(rec.into_table(), Some(table));
    }

    #[test]
    fn true_product_is_always_a_candidate() {
        let tables = [
            OperationTable::from_fn(3, |_, _| 0),
            OperationTable::from_fn(4, |i, j| (i + j) % 4),
            OperationTable::from_fn(4, |i, j| (i * j) % 4),
        ];
        for table in tables {
            let rec = reconstruct_table(&GraphBuilder::new(EdgePolicy::Simple).build(&table));
            for (i, j, k) in table.entries() {
                match rec.cell(i, j) {
                    CellReconstruction::Determined(found) => assert_eq!(*found, k),
                    CellReconstruction::Ambiguous(ks) => assert!(ks.contains(&k)),
                }
            }
        }
    }

    #[test]
    fn projection_table_is_ambiguous() {
        // x * y = x gives a complete graph with loops, so every node fits
        let table = OperationTable::from_fn(2, |i, _| i);
        let g = GraphBuilder::new(EdgePolicy::Simple).build(&table);
        let rec = reconstruct_table(&g);
        assert!(!rec.is_complete());
        assert_eq!(rec.cell(0, 1), &CellReconstruction::Ambiguous(vec![0, 1]));
        assert_eq!(rec.ambiguous_cells().count(), 4);
        assert_eq!(rec.into_table(), None);
    }

    #[test]
    fn missing_path_gives_empty_candidates() {
        let g = DirectedMultigraph::from_edges(2, EdgePolicy::Simple, [(0, 1)]);
        let rec = reconstruct_table(&g);
        assert_eq!(rec.cell(1, 0), &CellReconstruction::Ambiguous(Vec::new()));
    }
}
