use std::sync::Arc;

use colored::*;
use sssp_trace::graph::format_distance;
use sssp_trace::graph::samples;
use sssp_trace::{AlgorithmKind, Bmssp, Dijkstra, Step, StepKind, TracedAlgorithm};

fn print_step(index: usize, step: &Step<f64>) {
    let tag = match &step.kind {
        StepKind::Init { .. } | StepKind::FindPivotsStart { .. } => step.tag().cyan(),
        StepKind::Relax { .. } => step.tag().green(),
        StepKind::NoRelax { .. } => step.tag().red(),
        StepKind::PivotsIdentified { .. } | StepKind::FrontierReduction { .. } => step.tag().magenta(),
        StepKind::Done { .. } => step.tag().bold().green(),
        _ => step.tag().yellow(),
    };
    println!(
        "{:>3} {:<20} [line {:>2}] {}",
        index,
        tag,
        step.pseudocode_line,
        step.description.dimmed()
    );
}

fn main() -> sssp_trace::Result<()> {
    let sample = samples::by_name("simple")?;
    let graph = Arc::new(sample.graph);
    println!("--- {} ---", sample.title.bold());
    println!(
        "Graph has {} nodes and {} edges, source {}",
        graph.node_count(),
        graph.edge_count(),
        sample.source
    );

    for kind in AlgorithmKind::ALL {
        println!("\n{}", kind.name().bold().underline());
        for (index, step) in kind.trace(Arc::clone(&graph), sample.source)?.enumerate() {
            print_step(index, &step);
        }
    }

    // Final distances and paths
    let dijkstra = Dijkstra::new();
    let classic = dijkstra.compute_shortest_paths(Arc::clone(&graph), sample.source)?;
    let pivot = Bmssp::new().compute_shortest_paths(Arc::clone(&graph), sample.source)?;

    println!("\n{}", "Results".bold());
    for v in 0..graph.node_count() {
        let id = graph.node_id(v);
        let path = <Dijkstra as TracedAlgorithm<f64>>::get_path(&dijkstra, &classic, v)
            .map(|path| path.iter().map(|&u| graph.node_id(u)).collect::<Vec<_>>().join(" -> "))
            .unwrap_or_else(|| "unreachable".to_string());
        let classic_distance = classic.distances[v].unwrap_or(f64::INFINITY);
        let pivot_distance = pivot.distances[v].unwrap_or(f64::INFINITY);
        let marker = if classic.distances[v] == pivot.distances[v] {
            "✓".green()
        } else {
            "✗".red()
        };
        println!(
            "  {} {}: classic = {}, pivot-reduced = {}, path = {}",
            marker,
            id,
            format_distance(classic_distance),
            format_distance(pivot_distance),
            path
        );
    }

    println!(
        "\nClassic: {} steps, {} relaxations. Pivot-reduced: {} steps, {} relaxations, pivots {:?}",
        classic.step_count,
        classic.counters.relaxations,
        pivot.step_count,
        pivot.counters.relaxations,
        pivot
            .pivots
            .unwrap_or_default()
            .iter()
            .map(|&p| graph.node_id(p))
            .collect::<Vec<_>>()
    );

    Ok(())
}
