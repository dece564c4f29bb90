//! Tensor (direct) products of graphs and pattern surveys over them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Config, EdgePolicy};
use crate::engine::is_subgraph_isomorphic;
use crate::graph::DirectedMultigraph;

/// The tensor product `g1 × g2`.
///
/// Node `(a, b)` has index `a * n2 + b`. There is an edge `(a, b) -> (c, d)`
/// exactly when `a -> c` is in `g1` and `b -> d` is in `g2`; in multi mode its
/// multiplicity is the product of the two. The result is multi only if both
/// factors are.
#[must_use]
pub fn tensor_product(g1: &DirectedMultigraph, g2: &DirectedMultigraph) -> DirectedMultigraph {
    let policy = match (g1.policy(), g2.policy()) {
        (EdgePolicy::Multi, EdgePolicy::Multi) => EdgePolicy::Multi,
        _ => EdgePolicy::Simple,
    };
    let n2 = g2.node_count();
    let n = g1.node_count() * n2;
    let mut counts = vec![0u32; n * n];

    for (a, c, m1) in g1.weighted_edges() {
        for (b, d, m2) in g2.weighted_edges() {
            let weight = match policy {
                EdgePolicy::Multi => m1 * m2,
                EdgePolicy::Simple => 1,
            };
            counts[(a * n2 + b) * n + (c * n2 + d)] = weight;
        }
    }
    DirectedMultigraph::from_counts(n, policy, counts)
}

/// Whether the pattern occurs in one ordered product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCheck {
    /// Index of the left factor.
    pub left: usize,
    /// Index of the right factor.
    pub right: usize,
    /// Node count of the product.
    pub product_nodes: usize,
    /// Whether the pattern embeds into the product.
    pub contains_pattern: bool,
}

/// Check a pattern against every ordered product of a list of factors.
pub struct ProductSurvey;

impl ProductSurvey {
    /// For every `(i, j)` (including `i == j`), test whether `pattern`
    /// embeds into `factors[i] × factors[j]` under `config.subgraph_kind`.
    #[must_use]
    pub fn run(
        factors: &[DirectedMultigraph],
        pattern: &DirectedMultigraph,
        config: &Config,
    ) -> Vec<ProductCheck> {
        let mut checks = Vec::with_capacity(factors.len() * factors.len());
        for (left, g1) in factors.iter().enumerate() {
            for (right, g2) in factors.iter().enumerate() {
                let product = tensor_product(g1, g2);
                let contains_pattern =
                    is_subgraph_isomorphic(pattern, &product, config.subgraph_kind);
                debug!(
                    "Product G{} x G{} ({} nodes): pattern {}",
                    left,
                    right,
                    product.node_count(),
                    if contains_pattern { "found" } else { "absent" }
                );
                checks.push(ProductCheck {
                    left,
                    right,
                    product_nodes: product.node_count(),
                    contains_pattern,
                });
            }
        }
        checks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::is_isomorphic;

    fn simple(n: usize, edges: &[(usize, usize)]) -> DirectedMultigraph {
        DirectedMultigraph::from_edges(n, EdgePolicy::Simple, edges.iter().copied())
    }

    #[test]
    fn product_of_single_loops_is_single_loop() {
        let lp = simple(1, &[(0, 0)]);
        let p = tensor_product(&lp, &lp);
        assert_eq!(p.node_count(), 1);
        assert!(p.has_edge(0, 0));
    }

    #[test]
    fn product_edge_count_multiplies() {
        let a = simple(2, &[(0, 1), (1, 0)]);
        let b = simple(3, &[(0, 1), (1, 2), (2, 0)]);
        let p = tensor_product(&a, &b);
        assert_eq!(p.node_count(), 6);
        assert_eq!(p.edge_count(), 6);
        // (0,0) -> (1,1)
        assert!(p.has_edge(0, 4));
    }

    #[test]
    fn multi_product_multiplies_counts() {
        let a = DirectedMultigraph::from_edges(1, EdgePolicy::Multi, [(0, 0), (0, 0)]);
        let b = DirectedMultigraph::from_edges(1, EdgePolicy::Multi, [(0, 0), (0, 0), (0, 0)]);
        assert_eq!(tensor_product(&a, &b).loops(0), 6);
    }

    #[test]
    fn product_with_two_cycle_is_commutative_up_to_isomorphism() {
        let a = simple(2, &[(0, 1), (1, 0)]);
        let b = simple(3, &[(0, 1), (1, 2), (2, 0)]);
        assert!(is_isomorphic(&tensor_product(&a, &b), &tensor_product(&b, &a)));
    }

    #[test]
    fn survey_covers_all_ordered_pairs() {
        let loop1 = simple(1, &[(0, 0)]);
        let edge = simple(2, &[(0, 1)]);
        let pattern = simple(1, &[(0, 0)]);
        let checks = ProductSurvey::run(&[loop1, edge], &pattern, &Config::default());
        assert_eq!(checks.len(), 4);
        let found: Vec<bool> = checks.iter().map(|c| c.contains_pattern).collect();
        // only loop x loop has a self-loop
        assert_eq!(found, vec![true, false, false, false]);
    }
}
