use std::collections::HashSet;
use std::sync::Arc;

use log::warn;

use crate::graph::{Graph, Weight};
use crate::trace::{Counters, Step};
use crate::{Error, Result};

/// A lazy, finite sequence of steps ending with a `done` step.
///
/// Restarting a run means building a new sequence; once the sequence is
/// exhausted further pulls return `None`.
pub type StepSequence<W> = Box<dyn Iterator<Item = Step<W>> + Send>;

/// Result of running a traced algorithm to completion
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathResult<W: Weight> {
    /// Distances from source to each vertex, `None` when unreachable
    pub distances: Vec<Option<W>>,

    /// Predecessor vertices in the shortest path tree
    pub predecessors: Vec<Option<usize>>,

    /// Source vertex index
    pub source: usize,

    /// Totals from the final step
    pub counters: Counters,

    /// Pivots reported by the final step, for pivot-reducing algorithms
    pub pivots: Option<Vec<usize>>,

    /// Number of steps the run produced, the final step included
    pub step_count: usize,
}

impl<W: Weight> ShortestPathResult<W> {
    /// Builds a result from the terminal step of a run
    pub fn from_final_step(step: &Step<W>, source: usize, step_count: usize) -> Self {
        ShortestPathResult {
            distances: (0..step.distances.len()).map(|v| step.distance(v)).collect(),
            predecessors: step.predecessors.clone(),
            source,
            counters: step.counters,
            pivots: step.kind.pivots().map(|p| p.to_vec()),
            step_count,
        }
    }

    /// Whether both results reach the same vertices at equal distances,
    /// up to floating point noise
    pub fn same_distances(&self, other: &ShortestPathResult<W>) -> bool {
        let tolerance = <W as num_traits::NumCast>::from(1e-9).unwrap_or_else(W::epsilon);
        self.distances.len() == other.distances.len()
            && self
                .distances
                .iter()
                .zip(&other.distances)
                .all(|(a, b)| match (a, b) {
                    (Some(a), Some(b)) => (*a - *b).abs() <= tolerance,
                    (None, None) => true,
                    _ => false,
                })
    }
}

/// Resolves a source node id, failing before any step is produced
pub(crate) fn resolve_source<W: Weight>(graph: &Graph<W>, source: &str) -> Result<usize> {
    graph
        .index_of(source)
        .ok_or_else(|| Error::UnknownSource(source.to_string()))
}

/// Trait for shortest path algorithms that explain themselves step by step
pub trait TracedAlgorithm<W: Weight> {
    /// Get the name of the algorithm
    fn name(&self) -> &'static str;

    /// Fixed pseudocode listing that [`Step::pseudocode_line`] indexes into
    fn pseudocode(&self) -> &'static [&'static str];

    /// Starts a new lazy run from `source`
    fn trace(&self, graph: Arc<Graph<W>>, source: &str) -> Result<StepSequence<W>>;

    /// Runs the whole trace and keeps only the final state
    fn compute_shortest_paths(&self, graph: Arc<Graph<W>>, source: &str) -> Result<ShortestPathResult<W>> {
        let source_index = resolve_source(&graph, source)?;

        let mut step_count = 0;
        let mut last = None;
        for step in self.trace(graph, source)? {
            step_count += 1;
            last = Some(step);
        }

        match last {
            Some(step) if step.is_done() => Ok(ShortestPathResult::from_final_step(&step, source_index, step_count)),
            _ => Err(Error::AlgorithmError(format!("{} trace ended without a done step", self.name()))),
        }
    }

    /// Get the shortest path from source to target as a sequence of vertices
    fn get_path(&self, result: &ShortestPathResult<W>, target: usize) -> Option<Vec<usize>> {
        if target >= result.predecessors.len() || result.distances[target].is_none() {
            return None;
        }

        let mut path = Vec::new();
        let mut current = target;
        let mut visited = HashSet::new();

        // Build path in reverse order
        while current != result.source {
            if !visited.insert(current) {
                warn!("Cycle detected in path reconstruction at vertex {}", current);
                return None;
            }

            path.push(current);
            current = result.predecessors[current]?;
        }

        path.push(result.source);
        path.reverse();

        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(distances: Vec<Option<f64>>) -> ShortestPathResult<f64> {
        ShortestPathResult {
            predecessors: vec![None; distances.len()],
            distances,
            source: 0,
            counters: Counters::default(),
            pivots: None,
            step_count: 0,
        }
    }

    #[test]
    fn test_same_distances() {
        let a = result(vec![Some(0.0), Some(0.3), None]);
        let b = result(vec![Some(0.0), Some(0.1 + 0.2), None]);
        assert!(a.same_distances(&b));

        let unreached = result(vec![Some(0.0), None, None]);
        assert!(!a.same_distances(&unreached));

        let longer = result(vec![Some(0.0), Some(0.3), None, None]);
        assert!(!a.same_distances(&longer));
        assert!(!a.same_distances(&result(vec![Some(0.0), Some(0.4), None])));
    }
}
