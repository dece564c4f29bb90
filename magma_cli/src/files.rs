//! Reading tables and patterns, writing verdict tables.

use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::Path;

use magma_graph::{ComparisonMatrix, DirectedMultigraph, EdgePolicy, GraphBuilder, OperationTable};
use serde::{Deserialize, Serialize};

/// Parse one table per non-blank line, each a JSON array of rows.
pub fn load_tables(path: &Path) -> Result<Vec<OperationTable>, Box<dyn Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let mut tables = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let table: OperationTable = serde_json::from_str(line)
            .map_err(|e| format!("{}:{}: {}", path.display(), lineno + 1, e))?;
        tables.push(table);
    }
    Ok(tables)
}

/// A pattern graph given either as a table or as an explicit edge list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternSource {
    Edges {
        nodes: usize,
        edges: Vec<(usize, usize)>,
    },
    Table(OperationTable),
}

impl PatternSource {
    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let source = serde_json::from_str(text.trim())
            .map_err(|e| format!("{}: not a table or edge list: {}", path.display(), e))?;
        Ok(source)
    }

    pub fn into_graph(self, policy: EdgePolicy) -> Result<DirectedMultigraph, Box<dyn Error>> {
        match self {
            Self::Table(table) => Ok(GraphBuilder::new(policy).build(&table)),
            Self::Edges { nodes, edges } => {
                if let Some(&(u, v)) = edges.iter().find(|&&(u, v)| u >= nodes || v >= nodes) {
                    return Err(format!("Pattern edge ({u}, {v}) leaves 0..{nodes}").into());
                }
                Ok(DirectedMultigraph::from_edges(nodes, policy, edges))
            }
        }
    }
}

/// `Graph1,Graph2,Isomorphic` rows with 1-based ids.
pub fn write_verdicts<W: Write>(
    writer: W,
    verdicts: &ComparisonMatrix,
) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(["Graph1", "Graph2", "Isomorphic"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for (i, j, iso) in verdicts.pairs() {
        writer
            .write_record([
                (i + 1).to_string(),
                (j + 1).to_string(),
                if iso { "Yes" } else { "No" }.to_string(),
            ])
            .map_err(|e| format!("Failed to write CSV row: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush CSV writer: {}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_read_line_by_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.jsonl");
        fs::write(&path, "[[0,1],[1,0]]\n\n[[1,1],[0,0]]\n").unwrap();

        let tables = load_tables(&path).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].get(0, 0), 1);
    }

    #[test]
    fn bad_line_is_reported_with_its_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.jsonl");
        fs::write(&path, "[[0,1],[1,0]]\n[[0,2],[1,0]]\n").unwrap();

        let err = load_tables(&path).unwrap_err().to_string();
        assert!(err.contains(":2:"), "{err}");
    }

    #[test]
    fn pattern_accepts_edge_lists_and_tables() {
        let edges: PatternSource =
            serde_json::from_str(r#"{"nodes": 1, "edges": [[0, 0]]}"#).unwrap();
        let g = edges.into_graph(EdgePolicy::Simple).unwrap();
        assert_eq!(g.loops(0), 1);

        let table: PatternSource = serde_json::from_str("[[0]]").unwrap();
        assert_eq!(table.into_graph(EdgePolicy::Multi).unwrap().loops(0), 2);

        let bad: PatternSource =
            serde_json::from_str(r#"{"nodes": 1, "edges": [[0, 3]]}"#).unwrap();
        assert!(bad.into_graph(EdgePolicy::Simple).is_err());
    }
}
