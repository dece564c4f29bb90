use std::path::PathBuf;

use clap::{Parser, Subcommand};
use magma_graph::{Config, EdgePolicy, SubgraphKind};

/// Magma graph explorer - turn operation tables into directed multigraphs and
/// compare them
#[derive(Parser, Debug)]
#[command(name = "magma")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// How repeated edges are stored
    #[arg(long, value_enum, default_value = "multi", global = true)]
    pub policy: EdgePolicyArg,

    /// Induced or non-induced pattern embeddings
    #[arg(long, value_enum, default_value = "induced", global = true)]
    pub subgraph_kind: SubgraphKindArg,

    /// Run on a single thread
    #[arg(long, default_value_t = false, global = true)]
    pub sequential: bool,

    /// Stop after this many results
    #[arg(long, global = true)]
    pub max_results: Option<usize>,

    /// Largest n! for which orbits are generated exhaustively
    #[arg(long, default_value_t = 40_320, global = true)]
    pub permutation_budget: u64,

    /// Permutations drawn when the orbit is sampled
    #[arg(long, default_value_t = 10_000, global = true)]
    pub sample_size: usize,

    /// Seed for sampled orbits
    #[arg(long, default_value_t = 0x5eed, global = true)]
    pub seed: u64,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pairwise isomorphism verdicts and isomorphism classes
    Classify {
        /// File with one table per line, each a JSON array of rows
        tables: PathBuf,
        /// Write the verdict table here instead of stdout
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Every relabeling of one table, or its canonical form
    Orbit {
        tables: PathBuf,
        /// 1-based line of the table to use
        #[arg(short, long, default_value_t = 1)]
        index: usize,
        /// Print only the canonical form
        #[arg(long, default_value_t = false)]
        canonical: bool,
    },
    /// Digraphs without self-loops that have the given degrees
    Enumerate {
        #[arg(long, value_delimiter = ',', required = true)]
        in_degrees: Vec<usize>,
        #[arg(long, value_delimiter = ',', required = true)]
        out_degrees: Vec<usize>,
        /// Keep one graph per isomorphism class
        #[arg(long, default_value_t = false)]
        up_to_iso: bool,
    },
    /// Look for a pattern graph inside every table's graph
    Subgraph {
        /// JSON table, or an object `{"nodes": n, "edges": [[u, v], ...]}`
        pattern: PathBuf,
        tables: PathBuf,
        /// Report every embedding instead of the first
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Node, edge and degree counts per table graph
    Stats { tables: PathBuf },
    /// Read each table back off its simple graph
    Reconstruct { tables: PathBuf },
}

impl Args {
    /// Convert command-line arguments into library configuration
    pub fn to_config(&self) -> Config {
        Config::builder()
            .edge_policy(self.policy.clone().into())
            .subgraph_kind(self.subgraph_kind.clone().into())
            .parallel(!self.sequential)
            .max_results(self.max_results)
            .permutation_budget(self.permutation_budget)
            .sample_size(self.sample_size)
            .seed(self.seed)
            .build()
    }
}

/// Command-line argument wrapper for EdgePolicy
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum EdgePolicyArg {
    /// Keep every parallel edge
    #[value(name = "multi")]
    Multi,
    /// Collapse parallel edges
    #[value(name = "simple")]
    Simple,
}

impl From<EdgePolicyArg> for EdgePolicy {
    fn from(arg: EdgePolicyArg) -> Self {
        match arg {
            EdgePolicyArg::Multi => EdgePolicy::Multi,
            EdgePolicyArg::Simple => EdgePolicy::Simple,
        }
    }
}

/// Command-line argument wrapper for SubgraphKind
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum SubgraphKindArg {
    /// Mapped node pairs carry exactly the pattern's edges
    #[value(name = "induced")]
    Induced,
    /// Mapped node pairs carry at least the pattern's edges
    #[value(name = "monomorphic")]
    Monomorphic,
}

impl From<SubgraphKindArg> for SubgraphKind {
    fn from(arg: SubgraphKindArg) -> Self {
        match arg {
            SubgraphKindArg::Induced => SubgraphKind::Induced,
            SubgraphKindArg::Monomorphic => SubgraphKind::Monomorphic,
        }
    }
}
