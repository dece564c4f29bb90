//! Exact graph and subgraph isomorphism.

mod assignment;
mod constraints;
mod matcher;

pub use assignment::NodeMapping;
pub use constraints::{MatchKind, verify_mapping};
pub use matcher::{
    IsomorphismMatcher, find_isomorphism, is_isomorphic, is_subgraph_isomorphic,
    subgraph_isomorphism, subgraph_mappings,
};
