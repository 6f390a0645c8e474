use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use sssp_trace::graph::generators::generate_random;
use sssp_trace::{AlgorithmKind, Graph, ShortestPathResult};

struct Row {
    size: usize,
    edges: usize,
    classic: (Duration, ShortestPathResult<f64>),
    pivot: (Duration, ShortestPathResult<f64>),
}

// Runs one algorithm to completion and times it
fn run(kind: AlgorithmKind, graph: &Arc<Graph<f64>>) -> sssp_trace::Result<(Duration, ShortestPathResult<f64>)> {
    let start = Instant::now();
    let result = kind.compute_shortest_paths(Arc::clone(graph), "0")?;
    Ok((start.elapsed(), result))
}

fn bench_size(size: usize, edge_factor: f64) -> sssp_trace::Result<Row> {
    let mut rng = StdRng::seed_from_u64(size as u64);
    let graph = Arc::new(generate_random(size, edge_factor, &mut rng)?);
    Ok(Row {
        size,
        edges: graph.edge_count(),
        classic: run(AlgorithmKind::Classic, &graph)?,
        pivot: run(AlgorithmKind::PivotReduced, &graph)?,
    })
}

fn main() -> sssp_trace::Result<()> {
    env_logger::init();

    // Every run records a full snapshot per step, so sizes stay modest
    let graph_sizes = vec![50, 100, 250, 500, 1_000];
    let edge_factor = 3.0;

    println!("=====================================================");
    println!("Benchmark: traced Dijkstra vs traced BMSSP");
    println!("Edge factor: {} edges per vertex (on average)", edge_factor);
    println!("=====================================================");

    let rows: Vec<Row> = graph_sizes
        .par_iter()
        .map(|&size| bench_size(size, edge_factor))
        .collect::<sssp_trace::Result<_>>()?;

    println!(
        "{:<8} | {:<7} | {:<12} | {:<12} | {:<8} | {:<8} | {:<10} | {:<10} | {:<6}",
        "Vertices", "Edges", "Classic (ms)", "Pivot (ms)", "C steps", "P steps", "C relax", "P relax", "Agree"
    );
    println!("{}", "-".repeat(100));

    for row in &rows {
        let (classic_time, classic) = &row.classic;
        let (pivot_time, pivot) = &row.pivot;
        let agree = classic.same_distances(pivot);

        println!(
            "{:<8} | {:<7} | {:<12.2} | {:<12.2} | {:<8} | {:<8} | {:<10} | {:<10} | {:<6}",
            row.size,
            row.edges,
            classic_time.as_secs_f64() * 1000.0,
            pivot_time.as_secs_f64() * 1000.0,
            classic.step_count,
            pivot.step_count,
            classic.counters.relaxations,
            pivot.counters.relaxations,
            agree
        );
    }

    Ok(())
}
