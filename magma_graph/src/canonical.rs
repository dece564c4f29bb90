//! Orbits of operation tables under relabeling, and their canonical forms.
//!
//! When `n!` fits in the configured budget every permutation is applied
//! (exhaustive). Otherwise the identity plus `sample_size - 1` uniformly
//! drawn permutations are applied (sampled), and every result says which of
//! the two it is.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::info;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::config::Config;
use crate::permutation::{Permutation, all_permutations, factorial};
use crate::table::OperationTable;

/// Whether an orbit covers every relabeling or a random sample of them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitCoverage {
    /// All `n!` permutations were applied.
    Exhaustive,
    /// Only `drawn` permutations were applied, out of `total` (`None` when
    /// `n!` overflows `u128`).
    Sampled {
        /// Number of permutations applied.
        drawn: usize,
        /// `n!`, if representable.
        total: Option<u128>,
    },
}

impl OrbitCoverage {
    /// True for [`OrbitCoverage::Exhaustive`].
    #[must_use]
    pub const fn is_exhaustive(self) -> bool {
        matches!(self, Self::Exhaustive)
    }
}

/// One relabeled table and the permutation that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbitMember {
    /// Relabeling applied to the source table.
    pub permutation: Permutation,
    /// Resulting table.
    pub table: OperationTable,
}

/// The relabelings of a table, one member per applied permutation.
///
/// Tables with non-trivial automorphisms appear more than once; use
/// [`distinct_tables`](Self::distinct_tables) for the set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orbit {
    /// Members in permutation order (lexicographic when exhaustive).
    pub members: Vec<OrbitMember>,
    /// Exhaustive or sampled.
    pub coverage: OrbitCoverage,
}

impl Orbit {
    /// The tables, in member order.
    pub fn tables(&self) -> impl Iterator<Item = &OperationTable> {
        self.members.iter().map(|m| &m.table)
    }

    /// Sorted, deduplicated tables.
    #[must_use]
    pub fn distinct_tables(&self) -> Vec<OperationTable> {
        let mut tables: Vec<OperationTable> = self.tables().cloned().collect();
        tables.sort_unstable();
        tables.dedup();
        tables
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false: the identity is a member of every orbit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The lexicographically smallest row-major table seen in an orbit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalForm {
    /// The smallest table.
    pub table: OperationTable,
    /// A permutation taking the source table to `table`.
    pub permutation: Permutation,
    /// Whether the minimum was taken over the full orbit.
    pub coverage: OrbitCoverage,
}

/// Generates relabelings of tables and picks canonical representatives.
pub struct PermutationCanonicalizer<'cfg> {
    config: &'cfg Config,
}

impl<'cfg> PermutationCanonicalizer<'cfg> {
    /// A canonicalizer driven by `config`'s budget, sample size and seed.
    #[must_use]
    pub const fn new(config: &'cfg Config) -> Self {
        Self { config }
    }

    /// Pick the permutations to apply to a table of order `n`.
    fn plan(&self, n: usize) -> (Vec<Permutation>, OrbitCoverage) {
        let total = factorial(n);
        let within_budget = total.is_some_and(|t| t <= u128::from(self.config.permutation_budget));

        if within_budget {
            return (all_permutations(n).collect(), OrbitCoverage::Exhaustive);
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let drawn = self.config.sample_size.max(1);
        let mut perms = Vec::with_capacity(drawn);
        perms.push(Permutation::identity(n));
        perms.extend((1..drawn).map(|_| Permutation::random(n, &mut rng)));
        (perms, OrbitCoverage::Sampled { drawn, total })
    }

    /// Apply every planned permutation to `table`.
    #[must_use]
    pub fn orbit(&self, table: &OperationTable) -> Orbit {
        let (perms, coverage) = self.plan(table.order());
        info!(
            "Orbit of order-{} table: {} permutations ({:?})",
            table.order(),
            perms.len(),
            coverage
        );

        let relabel = |p: Permutation| {
            let table = table.relabel_unchecked(&p, &p.inverse());
            OrbitMember {
                permutation: p,
                table,
            }
        };

        #[cfg(feature = "rayon")]
        let members: Vec<OrbitMember> = if self.config.use_parallel() {
            perms.into_par_iter().map(relabel).collect()
        } else {
            perms.into_iter().map(relabel).collect()
        };

        #[cfg(not(feature = "rayon"))]
        let members: Vec<OrbitMember> = perms.into_iter().map(relabel).collect();

        Orbit { members, coverage }
    }

    /// The smallest flattened table over the planned permutations.
    ///
    /// Ties between permutations producing the same table are broken by the
    /// smaller permutation, so the result does not depend on traversal order.
    #[must_use]
    pub fn canonical_form(&self, table: &OperationTable) -> CanonicalForm {
        let (perms, coverage) = self.plan(table.order());

        let candidate = |p: Permutation| (table.relabel_unchecked(&p, &p.inverse()), p);

        #[cfg(feature = "rayon")]
        let best = if self.config.use_parallel() {
            perms.into_par_iter().map(candidate).min()
        } else {
            perms.into_iter().map(candidate).min()
        };

        #[cfg(not(feature = "rayon"))]
        let best = perms.into_iter().map(candidate).min();

        // plan() always yields at least the identity
        let (best_table, permutation) =
            best.unwrap_or_else(|| (table.clone(), Permutation::identity(table.order())));

        CanonicalForm {
            table: best_table,
            permutation,
            coverage,
        }
    }
}
