//! Configuration for graph construction, matching and enumeration.
//!
//! Every entry point takes a `&Config`; nothing in the crate reads a
//! process-wide default. The main knobs are:
//! - edge_policy: whether graphs built from tables keep parallel edges.
//! - subgraph_kind: induced embeddings (the default) or plain monomorphisms.
//! - permutation_budget / sample_size / seed: when an orbit is explored
//!   exhaustively and how it is sampled otherwise.
//!
//! Quick examples
//!
//! Multi-edge graphs, exhaustive orbits up to 8 elements (default):
//! ```
//! use magma_graph::Config;
//! let cfg = Config::default();
//! assert_eq!(cfg.permutation_budget, 40_320);
//! ```
//!
//! Simple graphs, sampled orbits with a fixed seed:
//! ```
//! use magma_graph::{Config, EdgePolicy};
//! let cfg = Config::builder()
//!     .simple_edges()
//!     .permutation_budget(720)
//!     .sample_size(500)
//!     .seed(7)
//!     .build();
//! assert_eq!(cfg.edge_policy, EdgePolicy::Simple);
//! ```

use serde::{Deserialize, Serialize};

/// How a table's contributing pairs turn into edges.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgePolicy {
    /// Every contributing pair is a distinct edge; multiplicities are kept.
    #[default]
    Multi,
    /// Edges are collapsed into a set; only presence is kept.
    Simple,
}

/// Which notion of "pattern occurs in host" the subgraph search uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubgraphKind {
    /// An edge exists between two pattern nodes iff it exists between their
    /// images. In multi mode the host may carry more parallel copies than the
    /// pattern, never fewer.
    #[default]
    Induced,
    /// Every pattern edge must be present in the host with at least the same
    /// multiplicity; extra host edges are allowed.
    Monomorphic,
}

/// Global search configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Edge policy used when building graphs from tables.
    pub edge_policy: EdgePolicy,
    /// Semantics of subgraph matching.
    pub subgraph_kind: SubgraphKind,
    /// Largest `n!` that is explored exhaustively.
    pub permutation_budget: u64,
    /// Number of permutations drawn when `n!` exceeds the budget.
    pub sample_size: usize,
    /// Seed for permutation sampling.
    pub seed: u64,
    /// Use the parallel paths when the `rayon` feature is compiled in.
    pub parallel: bool,
    /// Stop enumerations after this many results.
    pub max_results: Option<usize>,
}

impl Config {
    /// Start building a configuration from the defaults.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// True when the rayon paths should run.
    #[must_use]
    pub const fn use_parallel(&self) -> bool {
        cfg!(feature = "rayon") && self.parallel
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            edge_policy: EdgePolicy::Multi,
            subgraph_kind: SubgraphKind::Induced,
            permutation_budget: 40_320,
            sample_size: 10_000,
            seed: 0x5eed,
            parallel: true,
            max_results: None,
        }
    }
}

/// Builder for [`Config`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the edge policy.
    #[must_use]
    pub const fn edge_policy(mut self, policy: EdgePolicy) -> Self {
        self.config.edge_policy = policy;
        self
    }

    /// Keep parallel edges.
    #[must_use]
    pub const fn multi_edges(self) -> Self {
        self.edge_policy(EdgePolicy::Multi)
    }

    /// Collapse parallel edges.
    #[must_use]
    pub const fn simple_edges(self) -> Self {
        self.edge_policy(EdgePolicy::Simple)
    }

    /// Set the subgraph semantics.
    #[must_use]
    pub const fn subgraph_kind(mut self, kind: SubgraphKind) -> Self {
        self.config.subgraph_kind = kind;
        self
    }

    /// Largest `n!` explored exhaustively.
    #[must_use]
    pub const fn permutation_budget(mut self, budget: u64) -> Self {
        self.config.permutation_budget = budget;
        self
    }

    /// Number of sampled permutations when over budget.
    #[must_use]
    pub const fn sample_size(mut self, size: usize) -> Self {
        self.config.sample_size = size;
        self
    }

    /// Seed for permutation sampling.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Toggle the rayon paths.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Cap the number of enumerated results.
    #[must_use]
    pub const fn max_results(mut self, max: Option<usize>) -> Self {
        self.config.max_results = max;
        self
    }

    /// Finish the builder.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}
