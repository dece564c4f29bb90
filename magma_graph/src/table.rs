//! Operation tables of finite magmas.

use serde::{Deserialize, Serialize};

use crate::error::{PermutationError, TableError};
use crate::permutation::Permutation;

/// The multiplication table of a finite binary structure on `0..n`.
///
/// `get(i, j)` is the product of `i` and `j`. Cells are stored row-major and
/// the table is immutable once built. Serialized as a list of rows.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<usize>>", into = "Vec<Vec<usize>>")]
pub struct OperationTable {
    order: usize,
    cells: Vec<usize>,
}

impl OperationTable {
    /// Validate raw rows and build a table.
    ///
    /// This is the loader boundary: everything past it assumes a square table
    /// with in-range cells.
    ///
    /// # Errors
    /// [`TableError::NotSquare`] or [`TableError::OutOfRange`].
    pub fn from_rows(rows: Vec<Vec<usize>>) -> Result<Self, TableError> {
        let order = rows.len();
        let mut cells = Vec::with_capacity(order * order);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != order {
                return Err(TableError::NotSquare {
                    row,
                    len: values.len(),
                    order,
                });
            }
            for (col, value) in values.into_iter().enumerate() {
                if value >= order {
                    return Err(TableError::OutOfRange {
                        row,
                        col,
                        value,
                        order,
                    });
                }
                cells.push(value);
            }
        }
        Ok(Self { order, cells })
    }

    /// Build a table from a product function. `f` must return values `< order`.
    #[must_use]
    pub fn from_fn(order: usize, mut f: impl FnMut(usize, usize) -> usize) -> Self {
        let mut cells = Vec::with_capacity(order * order);
        for i in 0..order {
            for j in 0..order {
                let k = f(i, j);
                debug_assert!(k < order, "product {k} out of range for order {order}");
                cells.push(k);
            }
        }
        Self { order, cells }
    }

    /// Number of elements.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Product of `i` and `j`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.order + j]
    }

    /// Row-major view of the cells.
    #[must_use]
    pub fn as_flat(&self) -> &[usize] {
        &self.cells
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        // chunks(0) panics, and an empty table has no rows anyway
        self.cells.chunks(self.order.max(1))
    }

    /// Iterate over `(i, j, product)` triples in row-major order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        let n = self.order;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &k)| (idx / n, idx % n, k))
    }

    /// Relabel the elements by `p`: `M_p[x][y] = p(M[p⁻¹(x)][p⁻¹(y)])`.
    ///
    /// This is the conjugation action of the symmetric group on binary
    /// operations: relabeling by `p` and then by `q` equals relabeling once by
    /// `q ∘ p`.
    ///
    /// # Errors
    /// [`PermutationError::SizeMismatch`] when `p` acts on a different number
    /// of points.
    pub fn relabel(&self, p: &Permutation) -> Result<Self, PermutationError> {
        if p.len() != self.order {
            return Err(PermutationError::SizeMismatch {
                expected: self.order,
                actual: p.len(),
            });
        }
        Ok(self.relabel_unchecked(p, &p.inverse()))
    }

    /// Relabel with a precomputed inverse. Sizes are assumed to match.
    pub(crate) fn relabel_unchecked(&self, p: &Permutation, p_inv: &Permutation) -> Self {
        Self::from_fn(self.order, |x, y| {
            p.apply(self.get(p_inv.apply(x), p_inv.apply(y)))
        })
    }
}

impl TryFrom<Vec<Vec<usize>>> for OperationTable {
    type Error = TableError;

    fn try_from(rows: Vec<Vec<usize>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<OperationTable> for Vec<Vec<usize>> {
    fn from(table: OperationTable) -> Self {
        table.rows().map(<[usize]>::to_vec).collect()
    }
}
