//! Error types for the magma graph core.
//!
//! The core is computational, so the taxonomy is narrow: malformed tables are
//! rejected at the loader boundary, and an ill-posed degree specification is
//! rejected before any search starts. Search dead ends and empty results are
//! never errors.

use thiserror::Error;

/// Errors raised while turning raw rows into an [`OperationTable`](crate::OperationTable).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// A row does not have as many entries as the table has rows.
    #[error("row {row} has {len} entries, expected {order}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Length of that row.
        len: usize,
        /// Number of rows in the table.
        order: usize,
    },

    /// A cell holds a value that is not an element of the structure.
    #[error("cell ({row}, {col}) holds {value}, outside 0..{order}")]
    OutOfRange {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
        /// Value found.
        value: usize,
        /// Table order.
        order: usize,
    },
}

/// Errors raised when building a [`Permutation`](crate::Permutation).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermutationError {
    /// The images are not a bijection of `0..n`.
    #[error("values are not a permutation of 0..{0}")]
    NotABijection(usize),

    /// The permutation acts on a different number of points than the target.
    #[error("permutation of {actual} points applied to a structure of order {expected}")]
    SizeMismatch {
        /// Order of the table or graph.
        expected: usize,
        /// Length of the permutation.
        actual: usize,
    },
}

/// An ill-posed degree specification.
///
/// Distinct from an empty enumeration, which means no graph exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DegreeSpecError {
    /// In-degree and out-degree vectors have different lengths.
    #[error("in-degree vector has {in_len} entries, out-degree vector has {out_len}")]
    LengthMismatch {
        /// Length of the in-degree vector.
        in_len: usize,
        /// Length of the out-degree vector.
        out_len: usize,
    },

    /// The degree sums disagree, so no edge set can realise both.
    #[error("in-degrees sum to {in_sum} but out-degrees sum to {out_sum}")]
    SumMismatch {
        /// Sum of required in-degrees.
        in_sum: usize,
        /// Sum of required out-degrees.
        out_sum: usize,
    },

    /// The degree spec covers a different node count than requested.
    #[error("degree spec covers {actual} nodes, expected {expected}")]
    NodeCountMismatch {
        /// Requested node count.
        expected: usize,
        /// Length of the degree vectors.
        actual: usize,
    },
}

/// A serialised adjacency matrix that is not a square 0/1 grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdjacencyError {
    /// A row does not have as many entries as the matrix has rows.
    #[error("row {row} has {len} entries, expected {order}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Length of that row.
        len: usize,
        /// Number of rows in the matrix.
        order: usize,
    },

    /// A cell is neither 0 nor 1.
    #[error("cell ({row}, {col}) is {value}, expected 0 or 1")]
    NotBinary {
        /// Row of the cell.
        row: usize,
        /// Column of the cell.
        col: usize,
        /// Value found.
        value: u8,
    },
}

/// Umbrella error for the crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Table construction failed.
    #[error("invalid operation table: {0}")]
    Table(#[from] TableError),

    /// Permutation construction or application failed.
    #[error("invalid permutation: {0}")]
    Permutation(#[from] PermutationError),

    /// Degree specification is inconsistent.
    #[error("invalid degree spec: {0}")]
    DegreeSpec(#[from] DegreeSpecError),

    /// Adjacency matrix decoding failed.
    #[error("invalid adjacency matrix: {0}")]
    Adjacency(#[from] AdjacencyError),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OperationTable, Permutation};

    fn relabel_rows(rows: Vec<Vec<usize>>, images: Vec<usize>) -> Result<OperationTable> {
        let table = OperationTable::from_rows(rows)?;
        let p = Permutation::new(images)?;
        Ok(table.relabel(&p)?)
    }

    #[test]
    fn component_errors_convert_into_umbrella() {
        assert!(relabel_rows(vec![vec![0, 1], vec![1, 0]], vec![1, 0]).is_ok());
        assert_eq!(
            relabel_rows(vec![vec![0, 1]], vec![0]),
            Err(Error::Table(TableError::NotSquare {
                row: 0,
                len: 2,
                order: 1
            }))
        );
        assert_eq!(
            relabel_rows(vec![vec![0]], vec![0, 0]),
            Err(Error::Permutation(PermutationError::NotABijection(2)))
        );
        let err = relabel_rows(vec![vec![0]], vec![1, 0]).unwrap_err();
        assert!(err.to_string().starts_with("invalid permutation"));
    }
}
