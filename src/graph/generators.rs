use rand::prelude::*;

use crate::graph::{Graph, GraphBuilder};
use crate::Result;

/// Canvas size used for generated coordinates
const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;

/// Generates a random geometric graph with n vertices.
///
/// Points are scattered uniformly over the canvas; vertices whose normalized
/// distance is at most `r` are connected with a weight equal to the rounded
/// canvas distance. Vertex ids are `"0".."n-1"`.
pub fn generate_geometric<R: Rng>(n: usize, r: f64, directed: bool, rng: &mut R) -> Result<Graph<f64>> {
    let mut builder = GraphBuilder::new().directed(directed);
    let mut points = Vec::with_capacity(n);

    for i in 0..n {
        let x = rng.gen_range(0.0..1.0);
        let y = rng.gen_range(0.0..1.0);
        points.push((x, y));
        builder = builder.node(&i.to_string(), x * WIDTH, y * HEIGHT);
    }

    let mut edge_id = 0;
    for i in 0..n {
        // Undirected graphs store each pair once
        let start = if directed { 0 } else { i + 1 };
        for j in start..n {
            if i == j {
                continue;
            }
            let (x1, y1) = points[i];
            let (x2, y2) = points[j];
            let dx = x1 - x2;
            let dy = y1 - y2;
            let dist = f64::sqrt(dx * dx + dy * dy);

            if dist <= r {
                let weight = (f64::hypot(dx * WIDTH, dy * HEIGHT) / 10.0).round().max(1.0);
                edge_id += 1;
                builder = builder.edge(&format!("e{}", edge_id), &i.to_string(), &j.to_string(), weight);
            }
        }
    }

    builder.build()
}

/// Generates a random directed graph with roughly `edge_factor * n` edges and
/// integer weights in `1..100`. Self-loops are skipped.
pub fn generate_random<R: Rng>(n: usize, edge_factor: f64, rng: &mut R) -> Result<Graph<f64>> {
    let mut builder = GraphBuilder::new();
    for i in 0..n {
        let x = rng.gen_range(0.0..WIDTH);
        let y = rng.gen_range(0.0..HEIGHT);
        builder = builder.node(&i.to_string(), x, y);
    }

    if n > 1 {
        let num_edges = (edge_factor * n as f64) as usize;
        for e in 0..num_edges {
            let u = rng.gen_range(0..n);
            let v = rng.gen_range(0..n);
            if u != v {
                let weight = rng.gen_range(1..100) as f64;
                builder = builder.edge(&format!("e{}", e), &u.to_string(), &v.to_string(), weight);
            }
        }
    }

    builder.build()
}

/// Generates an undirected 4-connected grid with unit weights.
/// Vertex `(i, j)` has id `"i,j"`.
pub fn generate_grid(width: usize, height: usize) -> Result<Graph<f64>> {
    let mut builder = GraphBuilder::new().directed(false);
    let id = |i: usize, j: usize| format!("{},{}", i, j);
    let step_x = WIDTH / (width.max(2) - 1) as f64;
    let step_y = HEIGHT / (height.max(2) - 1) as f64;

    for j in 0..height {
        for i in 0..width {
            builder = builder.node(&id(i, j), i as f64 * step_x, j as f64 * step_y);
        }
    }

    for j in 0..height {
        for i in 0..width {
            if i + 1 < width {
                builder = builder.edge(&format!("h{},{}", i, j), &id(i, j), &id(i + 1, j), 1.0);
            }
            if j + 1 < height {
                builder = builder.edge(&format!("v{},{}", i, j), &id(i, j), &id(i, j + 1), 1.0);
            }
        }
    }

    builder.build()
}
