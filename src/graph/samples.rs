//! Fixed teaching graphs

use crate::graph::{Graph, GraphBuilder};
use crate::{Error, Result};

/// A named sample graph with its suggested source vertex
#[derive(Debug, Clone)]
pub struct Sample {
    pub name: &'static str,
    pub title: &'static str,
    pub source: &'static str,
    pub graph: Graph<f64>,
}

/// Names accepted by [`by_name`]
pub const SAMPLE_NAMES: [&str; 3] = ["simple", "medium", "sparse"];

/// Five node tutorial graph, source `A`
pub fn simple_graph() -> Result<Graph<f64>> {
    GraphBuilder::new()
        .node("A", 100.0, 200.0)
        .node("B", 250.0, 100.0)
        .node("C", 250.0, 300.0)
        .node("D", 400.0, 100.0)
        .node("E", 400.0, 300.0)
        .edge("e1", "A", "B", 4.0)
        .edge("e2", "A", "C", 2.0)
        .edge("e3", "B", "C", 1.0)
        .edge("e4", "B", "D", 5.0)
        .edge("e5", "C", "D", 8.0)
        .edge("e6", "C", "E", 10.0)
        .edge("e7", "D", "E", 2.0)
        .build()
}

/// Ten node demonstration graph, source `S`
pub fn medium_graph() -> Result<Graph<f64>> {
    GraphBuilder::new()
        .node("S", 80.0, 250.0)
        .node("A", 200.0, 150.0)
        .node("B", 200.0, 350.0)
        .node("C", 350.0, 100.0)
        .node("D", 350.0, 250.0)
        .node("E", 350.0, 400.0)
        .node("F", 500.0, 150.0)
        .node("G", 500.0, 350.0)
        .node("H", 650.0, 200.0)
        .node("T", 650.0, 300.0)
        .edge("e1", "S", "A", 3.0)
        .edge("e2", "S", "B", 5.0)
        .edge("e3", "A", "C", 2.0)
        .edge("e4", "A", "D", 4.0)
        .edge("e5", "B", "D", 2.0)
        .edge("e6", "B", "E", 6.0)
        .edge("e7", "C", "F", 3.0)
        .edge("e8", "D", "C", 1.0)
        .edge("e9", "D", "F", 5.0)
        .edge("e10", "D", "G", 4.0)
        .edge("e11", "E", "G", 2.0)
        .edge("e12", "F", "H", 2.0)
        .edge("e13", "G", "T", 3.0)
        .edge("e14", "H", "T", 1.0)
        .edge("e15", "F", "T", 6.0)
        .build()
}

/// Thirteen node sparse graph for comparing step counts, source `0`
pub fn sparse_graph() -> Result<Graph<f64>> {
    let coords = [
        (100.0, 300.0),
        (200.0, 150.0),
        (200.0, 450.0),
        (350.0, 100.0),
        (350.0, 250.0),
        (350.0, 400.0),
        (350.0, 550.0),
        (500.0, 150.0),
        (500.0, 350.0),
        (500.0, 500.0),
        (650.0, 250.0),
        (650.0, 400.0),
        (800.0, 300.0),
    ];
    let edges = [
        (0, 1, 4.0),
        (0, 2, 3.0),
        (1, 3, 2.0),
        (1, 4, 5.0),
        (2, 5, 6.0),
        (2, 6, 4.0),
        (3, 7, 3.0),
        (4, 7, 2.0),
        (4, 8, 4.0),
        (5, 8, 2.0),
        (5, 9, 5.0),
        (6, 9, 3.0),
        (7, 10, 4.0),
        (8, 10, 3.0),
        (8, 11, 2.0),
        (9, 11, 4.0),
        (10, 12, 3.0),
        (11, 12, 2.0),
    ];

    let mut builder = GraphBuilder::new();
    for (i, (x, y)) in coords.iter().enumerate() {
        builder = builder.node(&i.to_string(), *x, *y);
    }
    for (i, (from, to, weight)) in edges.iter().enumerate() {
        builder = builder.edge(&format!("e{}", i + 1), &from.to_string(), &to.to_string(), *weight);
    }
    builder.build()
}

/// Looks up a sample by name
pub fn by_name(name: &str) -> Result<Sample> {
    let (name, title, source, graph) = match name {
        "simple" => ("simple", "Simple graph (5 nodes)", "A", simple_graph()?),
        "medium" => ("medium", "Medium graph (10 nodes)", "S", medium_graph()?),
        "sparse" => ("sparse", "Sparse graph (13 nodes)", "0", sparse_graph()?),
        _ => return Err(Error::UnknownSample(name.to_string())),
    };
    Ok(Sample { name, title, source, graph })
}

/// All samples, in [`SAMPLE_NAMES`] order
pub fn all() -> Result<Vec<Sample>> {
    SAMPLE_NAMES.iter().map(|name| by_name(name)).collect()
}
