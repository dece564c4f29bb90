//! One function per subcommand. Results go to stdout, logs to stderr.

use std::error::Error;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use magma_graph::{
    Config, ConstrainedEnumerator, DegreeSpec, EdgePolicy, GraphBuilder, GraphStats, NodeMapping,
    PermutationCanonicalizer, ResultAggregator, SearchControl, SearchStatus, reconstruct_table,
    subgraph_isomorphism, subgraph_mappings,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::files::{PatternSource, load_tables, write_verdicts};

fn graph_ids(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| format!("G{}", i + 1))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_json_lines<T: Serialize>(items: &[T]) -> Result<(), Box<dyn Error>> {
    let mut out = io::stdout().lock();
    for item in items {
        writeln!(out, "{}", serde_json::to_string(item)?)?;
    }
    Ok(())
}

pub fn classify(
    tables: &Path,
    csv_out: Option<&Path>,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let tables = load_tables(tables)?;
    info!("Loaded {} tables", tables.len());
    let graphs = GraphBuilder::new(config.edge_policy).build_all(&tables);
    let classes = ResultAggregator::new(config).classify(&graphs);

    match csv_out {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
            write_verdicts(file, &classes.verdicts)?;
            info!("Wrote verdicts to {}", path.display());
        }
        None => write_verdicts(io::stdout().lock(), &classes.verdicts)?,
    }

    for (c, members) in classes.components.iter().enumerate() {
        println!("Class {}: {}", c + 1, graph_ids(members));
    }
    println!("Representatives: {}", graph_ids(&classes.representatives));
    Ok(())
}

pub fn orbit(
    tables: &Path,
    index: usize,
    canonical: bool,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let tables = load_tables(tables)?;
    let table = index
        .checked_sub(1)
        .and_then(|i| tables.get(i))
        .ok_or_else(|| format!("No table {} in a file of {}", index, tables.len()))?;
    let canon = PermutationCanonicalizer::new(config);

    if canonical {
        let form = canon.canonical_form(table);
        info!("Canonical form coverage: {:?}", form.coverage);
        println!("{}", serde_json::to_string(&form)?);
    } else {
        let orbit = canon.orbit(table);
        info!(
            "Orbit coverage: {:?}, {} distinct tables",
            orbit.coverage,
            orbit.distinct_tables().len()
        );
        print_json_lines(&orbit.members)?;
    }
    Ok(())
}

pub fn enumerate(
    in_degrees: Vec<usize>,
    out_degrees: Vec<usize>,
    up_to_iso: bool,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let spec = DegreeSpec::new(in_degrees, out_degrees)?;
    let node_count = spec.node_count();
    let control = SearchControl::new();
    let enumerator = ConstrainedEnumerator::new(config);

    let outcome = if up_to_iso {
        enumerator.enumerate_up_to_isomorphism(node_count, &spec, Some(&control))?
    } else {
        enumerator.enumerate(node_count, &spec, Some(&control))?
    };

    info!("Search progress: {:?}", control.snapshot());
    if outcome.status != SearchStatus::Complete {
        warn!("Enumeration {:?}; the list is partial", outcome.status);
    }
    print_json_lines(&outcome.items)
}

#[derive(Debug, Serialize)]
struct SubgraphReport {
    graph: usize,
    found: bool,
    mappings: Vec<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<SearchStatus>,
}

pub fn subgraph(
    pattern: &Path,
    tables: &Path,
    all: bool,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let pattern = PatternSource::load(pattern)?.into_graph(config.edge_policy)?;
    let tables = load_tables(tables)?;
    let graphs = GraphBuilder::new(config.edge_policy).build_all(&tables);

    let reports: Vec<SubgraphReport> = graphs
        .iter()
        .enumerate()
        .map(|(idx, host)| {
            if all {
                let outcome = subgraph_mappings(&pattern, host, config, None);
                SubgraphReport {
                    graph: idx + 1,
                    found: !outcome.is_empty(),
                    mappings: outcome.items.into_iter().map(NodeMapping::into_vec).collect(),
                    status: Some(outcome.status),
                }
            } else {
                let mapping = subgraph_isomorphism(&pattern, host, config.subgraph_kind);
                SubgraphReport {
                    graph: idx + 1,
                    found: mapping.is_some(),
                    mappings: mapping.into_iter().map(NodeMapping::into_vec).collect(),
                    status: None,
                }
            }
        })
        .collect();

    let hits = reports.iter().filter(|r| r.found).count();
    info!("Pattern found in {} of {} graphs", hits, reports.len());
    print_json_lines(&reports)
}

#[derive(Debug, Serialize)]
struct StatsReport {
    graph: usize,
    #[serde(flatten)]
    stats: GraphStats,
}

pub fn stats(tables: &Path, config: &Config) -> Result<(), Box<dyn Error>> {
    let tables = load_tables(tables)?;
    let builder = GraphBuilder::new(config.edge_policy);
    let reports: Vec<StatsReport> = tables
        .iter()
        .enumerate()
        .map(|(idx, t)| StatsReport {
            graph: idx + 1,
            stats: GraphStats::of(&builder.build(t)),
        })
        .collect();
    print_json_lines(&reports)
}

#[derive(Debug, Serialize)]
struct AmbiguousCell {
    row: usize,
    col: usize,
    candidates: Vec<usize>,
}

#[derive(Debug, Serialize)]
struct ReconstructReport {
    graph: usize,
    complete: bool,
    matches_input: bool,
    ambiguous: Vec<AmbiguousCell>,
}

pub fn reconstruct(tables: &Path) -> Result<(), Box<dyn Error>> {
    let tables = load_tables(tables)?;
    let builder = GraphBuilder::new(EdgePolicy::Simple);

    let reports: Vec<ReconstructReport> = tables
        .iter()
        .enumerate()
        .map(|(idx, table)| {
            let rec = reconstruct_table(&builder.build(table));
            let ambiguous = rec
                .ambiguous_cells()
                .map(|(row, col, ks)| AmbiguousCell {
                    row,
                    col,
                    candidates: ks.to_vec(),
                })
                .collect();
            let complete = rec.is_complete();
            let matches_input = rec.into_table().is_some_and(|t| &t == table);
            ReconstructReport {
                graph: idx + 1,
                complete,
                matches_input,
                ambiguous,
            }
        })
        .collect();

    let complete = reports.iter().filter(|r| r.complete).count();
    info!("{} of {} tables fully determined by their graph", complete, reports.len());
    print_json_lines(&reports)
}
