#![allow(dead_code)]

use std::sync::OnceLock;

use magma_graph::{DirectedMultigraph, EdgePolicy, GraphBuilder, OperationTable, Permutation};

pub fn init_test_logger() {
    static INIT: OnceLock<()> = OnceLock::new();
    let _ = INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// #####################
// TABLES
// #####################
lazy_static::lazy_static! {
    pub static ref Z2: OperationTable = OperationTable::from_fn(2, |i, j| (i + j) % 2);
    pub static ref Z3: OperationTable = OperationTable::from_fn(3, |i, j| (i + j) % 3);
    pub static ref Z4: OperationTable = OperationTable::from_fn(4, |i, j| (i + j) % 4);
    pub static ref KLEIN: OperationTable = OperationTable::from_fn(4, |i, j| i ^ j);
    pub static ref LEFT3: OperationTable = OperationTable::from_fn(3, |i, _| i);
    pub static ref RIGHT3: OperationTable = OperationTable::from_fn(3, |_, j| j);
    pub static ref ZERO3: OperationTable = OperationTable::from_fn(3, |_, _| 0);
    /// Off the diagonal `x * y` is the third element; on it, the successor.
    /// No product ever equals one of its operands, so the graph has no loops.
    pub static ref NO_LOOPS3: OperationTable = OperationTable::from_fn(3, |i, j| {
        if i == j { (i + 1) % 3 } else { (6 - i - j) % 3 }
    });
    /// `Z3` relabeled by swapping 0 and 1.
    pub static ref Z3_SWAPPED: OperationTable = Z3
        .relabel(&Permutation::new([1, 0, 2]).expect("valid permutation"))
        .expect("same order");
}

pub fn tables_by_name(name: &str) -> &'static OperationTable {
    match name {
        "z2" => &Z2,
        "z3" => &Z3,
        "z4" => &Z4,
        "klein" => &KLEIN,
        "left3" => &LEFT3,
        "right3" => &RIGHT3,
        "zero3" => &ZERO3,
        "no_loops3" => &NO_LOOPS3,
        "z3_swapped" => &Z3_SWAPPED,
        other => panic!("unknown fixture table '{other}'"),
    }
}

pub fn graph_of(name: &str, policy: EdgePolicy) -> DirectedMultigraph {
    GraphBuilder::new(policy).build(tables_by_name(name))
}

pub fn simple_graph(n: usize, edges: &[(usize, usize)]) -> DirectedMultigraph {
    DirectedMultigraph::from_edges(n, EdgePolicy::Simple, edges.iter().copied())
}

pub fn multi_graph(n: usize, edges: &[(usize, usize)]) -> DirectedMultigraph {
    DirectedMultigraph::from_edges(n, EdgePolicy::Multi, edges.iter().copied())
}
