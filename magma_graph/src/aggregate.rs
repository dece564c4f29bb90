//! Pairwise isomorphism verdicts and the classes they induce.

use serde::{Deserialize, Serialize};
use tracing::info;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::config::Config;
use crate::engine::is_isomorphic;
use crate::graph::DirectedMultigraph;

/// Verdicts for every unordered pair of graph indices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonMatrix {
    size: usize,
    /// Upper triangle, row-major: `(0,1), (0,2), …, (1,2), …`.
    verdicts: Vec<bool>,
}

impl ComparisonMatrix {
    fn slot(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < j && j < self.size);
        // rows before i contribute (size-1) + (size-2) + … + (size-i) slots
        i * (2 * self.size - i - 1) / 2 + (j - i - 1)
    }

    /// Number of graphs compared.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Verdict for `i` and `j`. A graph is always isomorphic to itself.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> bool {
        match i.cmp(&j) {
            std::cmp::Ordering::Equal => true,
            std::cmp::Ordering::Less => self.verdicts[self.slot(i, j)],
            std::cmp::Ordering::Greater => self.verdicts[self.slot(j, i)],
        }
    }

    /// `(i, j, verdict)` for every `i < j`, in row-major order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        (0..self.size)
            .flat_map(move |i| ((i + 1)..self.size).map(move |j| (i, j)))
            .zip(self.verdicts.iter().copied())
            .map(|((i, j), v)| (i, j, v))
    }
}

/// The partition of graph indices into isomorphism classes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsomorphismClasses {
    /// Full pairwise verdict table.
    pub verdicts: ComparisonMatrix,
    /// Components, each sorted, ordered by their lowest index.
    pub components: Vec<Vec<usize>>,
    /// Lowest index of each component, in the same order.
    pub representatives: Vec<usize>,
}

impl IsomorphismClasses {
    /// Component index containing graph `i`.
    #[must_use]
    pub fn class_of(&self, i: usize) -> Option<usize> {
        self.components.iter().position(|c| c.binary_search(&i).is_ok())
    }
}

/// Union-find over `0..n` with path halving; the root of a set is always its
/// smallest member.
#[derive(Clone, Debug)]
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}

/// Compares every pair of graphs and clusters the isomorphic ones.
pub struct ResultAggregator<'cfg> {
    config: &'cfg Config,
}

impl<'cfg> ResultAggregator<'cfg> {
    /// An aggregator; `config.parallel` selects the rayon path.
    #[must_use]
    pub const fn new(config: &'cfg Config) -> Self {
        Self { config }
    }

    /// Run every pairwise check.
    #[must_use]
    pub fn compare_all(&self, graphs: &[DirectedMultigraph]) -> ComparisonMatrix {
        let n = graphs.len();
        let pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .collect();
        let check = |&(i, j): &(usize, usize)| is_isomorphic(&graphs[i], &graphs[j]);

        #[cfg(feature = "rayon")]
        let verdicts: Vec<bool> = if self.config.use_parallel() {
            pairs.par_iter().map(check).collect()
        } else {
            pairs.iter().map(check).collect()
        };

        #[cfg(not(feature = "rayon"))]
        let verdicts: Vec<bool> = pairs.iter().map(check).collect();

        ComparisonMatrix { size: n, verdicts }
    }

    /// Compare all pairs, then take connected components of the "isomorphic"
    /// relation with the lowest index of each as representative.
    #[must_use]
    pub fn classify(&self, graphs: &[DirectedMultigraph]) -> IsomorphismClasses {
        let verdicts = self.compare_all(graphs);
        let classes = Self::components_of(verdicts);
        info!(
            "{} graphs fall into {} isomorphism classes",
            graphs.len(),
            classes.components.len()
        );
        classes
    }

    /// Build the partition from an existing verdict table.
    #[must_use]
    pub fn components_of(verdicts: ComparisonMatrix) -> IsomorphismClasses {
        let n = verdicts.size();
        let mut sets = DisjointSet::new(n);
        for (i, j, iso) in verdicts.pairs() {
            if iso {
                sets.union(i, j);
            }
        }

        let mut components: Vec<Vec<usize>> = Vec::new();
        let mut slot_of_root = vec![usize::MAX; n];
        for i in 0..n {
            let root = sets.find(i);
            if slot_of_root[root] == usize::MAX {
                slot_of_root[root] = components.len();
                components.push(Vec::new());
            }
            components[slot_of_root[root]].push(i);
        }
        let representatives = components.iter().map(|c| c[0]).collect();

        IsomorphismClasses {
            verdicts,
            components,
            representatives,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(size: usize, iso: &[(usize, usize)]) -> ComparisonMatrix {
        let verdicts = (0..size)
            .flat_map(|i| ((i + 1)..size).map(move |j| (i, j)))
            .map(|p| iso.contains(&p))
            .collect();
        ComparisonMatrix { size, verdicts }
    }

    #[test]
    fn slot_layout_matches_pairs() {
        let m = matrix(5, &[(1, 3), (3, 4)]);
        for (i, j, v) in m.pairs() {
            assert_eq!(m.get(i, j), v);
            assert_eq!(m.get(j, i), v);
        }
        assert_eq!(m.pairs().count(), 10);
        assert!(m.get(2, 2));
    }

    #[test]
    fn components_are_transitive_closures() {
        // 1~3 and 3~4 join {1,3,4} even without a direct 1~4 verdict
        let classes = ResultAggregator::components_of(matrix(5, &[(1, 3), (3, 4)]));
        assert_eq!(classes.components, vec![vec![0], vec![1, 3, 4], vec![2]]);
        assert_eq!(classes.representatives, vec![0, 1, 2]);
        assert_eq!(classes.class_of(4), Some(1));
        assert_eq!(classes.class_of(7), None);
    }

    #[test]
    fn no_graphs_no_classes() {
        let cfg = Config::default();
        let classes = ResultAggregator::new(&cfg).classify(&[]);
        assert!(classes.components.is_empty());
        assert_eq!(classes.verdicts.pairs().count(), 0);
    }
}
