//! Graph-theoretic exploration of finite magmas.
//!
//! An operation table `M` on `0..n` becomes a directed multigraph with edges
//! `i -> M[i][j]` and `M[i][j] -> j` for every ordered pair. On top of that the
//! crate offers exact isomorphism and subgraph matching, relabeling orbits and
//! canonical forms of tables, enumeration of digraphs with prescribed degrees,
//! and clustering of graph populations into isomorphism classes.
//!
//! ```
//! use magma_graph::{Config, GraphBuilder, OperationTable, ResultAggregator};
//!
//! let cfg = Config::default();
//! let builder = GraphBuilder::new(cfg.edge_policy);
//! let z3 = OperationTable::from_fn(3, |i, j| (i + j) % 3);
//! let left = OperationTable::from_fn(3, |i, _| i);
//! let graphs = builder.build_all(&[z3.clone(), left, z3]);
//!
//! let classes = ResultAggregator::new(&cfg).classify(&graphs);
//! assert_eq!(classes.components, vec![vec![0, 2], vec![1]]);
//! ```

pub mod aggregate;
pub mod canonical;
pub mod config;
pub mod control;
pub mod engine;
pub mod enumerate;
pub mod error;
pub mod graph;
pub mod permutation;
pub mod product;
pub mod reconstruct;
pub mod table;

pub use aggregate::{ComparisonMatrix, IsomorphismClasses, ResultAggregator};
pub use canonical::{CanonicalForm, Orbit, OrbitCoverage, OrbitMember, PermutationCanonicalizer};
pub use config::{Config, ConfigBuilder, EdgePolicy, SubgraphKind};
pub use control::{ProgressSnapshot, SearchControl, SearchOutcome, SearchStatus};
pub use engine::{
    IsomorphismMatcher, MatchKind, NodeMapping, find_isomorphism, is_isomorphic,
    is_subgraph_isomorphic, subgraph_isomorphism, subgraph_mappings, verify_mapping,
};
pub use enumerate::{AdjacencyMatrix, ConstrainedEnumerator, DegreeSpec};
pub use error::{
    AdjacencyError, DegreeSpecError, Error, PermutationError, Result, TableError,
};
pub use graph::{DirectedMultigraph, GraphBuilder, GraphStats};
pub use permutation::{Permutation, all_permutations, factorial};
pub use product::{ProductCheck, ProductSurvey, tensor_product};
pub use reconstruct::{CellReconstruction, Reconstruction, reconstruct_table};
pub use table::OperationTable;
