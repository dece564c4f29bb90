//! Magma graph explorer CLI
//!
//! Loads operation tables of finite magmas, turns them into directed
//! multigraphs and runs isomorphism, orbit, enumeration and pattern queries.

#[global_allocator]
/// Global allocator using jemalloc for better performance in parallel workloads.
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

mod args;
mod commands;
mod files;

use clap::Parser;
use tracing::info;

use args::{Args, Command};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.to_config();
    info!("Configuration: {:?}", config);

    match args.command {
        Command::Classify { tables, csv } => commands::classify(&tables, csv.as_deref(), &config),
        Command::Orbit {
            tables,
            index,
            canonical,
        } => commands::orbit(&tables, index, canonical, &config),
        Command::Enumerate {
            in_degrees,
            out_degrees,
            up_to_iso,
        } => commands::enumerate(in_degrees, out_degrees, up_to_iso, &config),
        Command::Subgraph {
            pattern,
            tables,
            all,
        } => commands::subgraph(&pattern, &tables, all, &config),
        Command::Stats { tables } => commands::stats(&tables, &config),
        Command::Reconstruct { tables } => commands::reconstruct(&tables),
    }
}
