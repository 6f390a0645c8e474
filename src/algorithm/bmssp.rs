use std::iter::FusedIterator;
use std::sync::Arc;

use log::debug;

use crate::algorithm::traits::{resolve_source, StepSequence, TracedAlgorithm};
use crate::data_structures::PendingList;
use crate::graph::{format_distance, Graph, Weight};
use crate::trace::state::TraceState;
use crate::trace::{EdgeState, NodeState, Step, StepKind};
use crate::Result;

/// Pseudocode shown next to a pivot-reducing trace
pub const BMSSP_PSEUDOCODE: [&str; 21] = [
    "function BMSSP(G, source):",
    "  k ← max(2, ⌈log₂(n+1)^(1/3)⌉)",
    "  W ← {source}, visited ← {source}",
    "",
    "  FindPivots:",
    "  for i ← 1 to k:",
    "    relax every edge leaving W",
    "    W ← newly reached vertices, visited ← visited ∪ W",
    "    if W = ∅: break",
    "",
    "  // Pivots root subtrees of at least k vertices",
    "  P ← {u ∈ visited : subtree(u) ≥ k} ∪ {source}",
    "  frontier shrinks from |visited| to |P|",
    "",
    "  Complete the remainder:",
    "  D ← vertices improved from visited, by dist",
    "  while D not empty:",
    "    u ← pull smallest from D",
    "    relax every edge leaving u, update D",
    "",
    "  return dist, prev",
];

mod line {
    pub const INIT: usize = 0;
    pub const FIND_PIVOTS: usize = 4;
    pub const RELAX_STEP: usize = 6;
    pub const WAVE_COMPLETE: usize = 7;
    pub const PIVOTS: usize = 11;
    pub const FRONTIER_REDUCTION: usize = 12;
    pub const PROCESS_REMAINING: usize = 17;
    pub const DONE: usize = 20;
}

/// Wave depth and pivot threshold for a graph with `n` vertices
pub fn pivot_parameter(n: usize) -> usize {
    let k = ((n as f64 + 1.0).log2().powf(1.0 / 3.0)).ceil() as usize;
    k.max(2)
}

/// Single-level, pivot-reducing shortest paths in the spirit of BMSSP from
/// "Breaking the Sorting Barrier for Directed Single-Source Shortest Paths".
///
/// A bounded Bellman-Ford wave of `k` rounds finds the pivots (roots of
/// subtrees with at least `k` vertices). Instead of recursing, the rest of the
/// graph is completed from a distance-ordered pending list. This keeps the
/// narrative of frontier reduction while always terminating with exact
/// distances; it does not achieve the paper's complexity bound.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bmssp;

impl Bmssp {
    pub fn new() -> Self {
        Bmssp
    }
}

impl<W: Weight> TracedAlgorithm<W> for Bmssp {
    fn name(&self) -> &'static str {
        "BMSSP (pivot reduction)"
    }

    fn pseudocode(&self) -> &'static [&'static str] {
        &BMSSP_PSEUDOCODE
    }

    fn trace(&self, graph: Arc<Graph<W>>, source: &str) -> Result<StepSequence<W>> {
        Ok(Box::new(BmsspTrace::new(graph, source)?))
    }
}

/// Where the next call to [`BmsspTrace::advance`] resumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    FindPivotsStart,
    /// Announce wave round `round` (1-based)
    RoundStart { round: usize },
    /// Relax every edge leaving the current wave
    RoundRelax { round: usize },
    Pivots,
    Reduction,
    Seed,
    Remaining,
    RelaxRemaining { u: usize },
    Finish,
    Finished,
}

/// Suspended pivot-reducing run
#[derive(Debug)]
pub struct BmsspTrace<W: Weight> {
    graph: Arc<Graph<W>>,
    state: TraceState<W>,
    k: usize,
    phase: Phase,
    /// Vertices relaxed from in the current round
    wave: Vec<usize>,
    /// Vertices reached by the wave, in discovery order
    visited: Vec<usize>,
    is_visited: Vec<bool>,
    /// Descendants (self included) recorded when each vertex was first reached
    subtree: Vec<usize>,
    pivots: Vec<usize>,
    pending: PendingList<usize, W>,
}

impl<W: Weight> BmsspTrace<W> {
    /// Prepares a run; fails if `source` is not a node id of `graph`
    pub fn new(graph: Arc<Graph<W>>, source: &str) -> Result<Self> {
        let source = resolve_source(&graph, source)?;
        let n = graph.node_count();
        let k = pivot_parameter(n);

        let mut is_visited = vec![false; n];
        is_visited[source] = true;
        let mut subtree = vec![0; n];
        subtree[source] = 1;

        debug!(
            "Starting BMSSP trace from {} on {} vertices with k = {}",
            graph.node_id(source),
            n,
            k
        );

        Ok(BmsspTrace {
            state: TraceState::new(&graph, source),
            graph,
            k,
            phase: Phase::Init,
            wave: vec![source],
            visited: vec![source],
            is_visited,
            subtree,
            pivots: Vec::new(),
            pending: PendingList::new(),
        })
    }

    /// Wave depth and pivot threshold of this run
    pub fn k(&self) -> usize {
        self.k
    }

    /// Vertices reached by the bounded wave so far, in discovery order
    pub fn visited(&self) -> &[usize] {
        &self.visited
    }

    /// Subtree counter of a vertex; 0 for vertices the wave never reached
    pub fn subtree_size(&self, vertex: usize) -> usize {
        self.subtree[vertex]
    }

    /// Pivots, once identified
    pub fn pivots(&self) -> &[usize] {
        &self.pivots
    }

    /// True once the `done` step has been produced
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Performs the next action and returns its step, or `None` after `done`
    pub fn advance(&mut self) -> Option<Step<W>> {
        loop {
            match self.phase {
                Phase::Init => {
                    let source = self.state.source();
                    self.phase = if self.graph.node_count() == 1 {
                        // The lone source is its own pivot
                        self.pivots = vec![source];
                        Phase::Finish
                    } else {
                        Phase::FindPivotsStart
                    };
                    let description = format!(
                        "Initialize BMSSP: source = {}, k = {} relaxation rounds",
                        self.graph.node_id(source),
                        self.k
                    );
                    return Some(self.state.snapshot(StepKind::Init { source }, description, vec![source], line::INIT));
                }
                Phase::FindPivotsStart => {
                    self.phase = Phase::RoundStart { round: 1 };
                    let description = format!("FindPivots: run {} relaxation rounds from the frontier", self.k);
                    let frontier = self.wave.clone();
                    return Some(self.state.snapshot(StepKind::FindPivotsStart { k: self.k }, description, frontier, line::FIND_PIVOTS));
                }
                Phase::RoundStart { round } => {
                    self.phase = Phase::RoundRelax { round };
                    let description = format!(
                        "FindPivots round {}/{}: relaxing from {} nodes",
                        round,
                        self.k,
                        self.wave.len()
                    );
                    let kind = StepKind::RelaxStep { round, wave: self.wave.clone() };
                    let frontier = self.wave.clone();
                    return Some(self.state.snapshot(kind, description, frontier, line::RELAX_STEP));
                }
                Phase::RoundRelax { round } => {
                    let reached = self.relax_wave();
                    self.wave = reached.clone();

                    if reached.is_empty() {
                        self.phase = Phase::Pivots;
                        continue;
                    }

                    self.phase = if round < self.k {
                        Phase::RoundStart { round: round + 1 }
                    } else {
                        Phase::Pivots
                    };
                    let description = format!("Round {} complete: {} new nodes reached", round, reached.len());
                    let frontier = reached.clone();
                    let kind = StepKind::WaveComplete { round, reached };
                    return Some(self.state.snapshot(kind, description, frontier, line::WAVE_COMPLETE));
                }
                Phase::Pivots => {
                    self.identify_pivots();
                    self.phase = Phase::Reduction;
                    let names = self.names(&self.pivots);
                    let description = format!(
                        "Pivots identified: {} nodes with subtree ≥ {} ({})",
                        self.pivots.len(),
                        self.k,
                        names
                    );
                    let kind = StepKind::PivotsIdentified { pivots: self.pivots.clone() };
                    let frontier = self.pivots.clone();
                    return Some(self.state.snapshot(kind, description, frontier, line::PIVOTS));
                }
                Phase::Reduction => {
                    self.phase = Phase::Seed;
                    let description = format!(
                        "Frontier reduction: {} visited nodes represented by {} pivots (factor ~{})",
                        self.visited.len(),
                        self.pivots.len(),
                        self.k
                    );
                    let kind = StepKind::FrontierReduction {
                        visited: self.visited.clone(),
                        pivots: self.pivots.clone(),
                    };
                    let frontier = self.pivots.clone();
                    return Some(self.state.snapshot(kind, description, frontier, line::FRONTIER_REDUCTION));
                }
                Phase::Seed => {
                    self.seed_pending();
                    self.phase = Phase::Remaining;
                }
                Phase::Remaining => {
                    let Some((u, distance)) = self.pending.pop_min() else {
                        self.phase = Phase::Finish;
                        continue;
                    };
                    self.state.set_node(u, NodeState::Current);
                    self.phase = Phase::RelaxRemaining { u };
                    let description = format!(
                        "Processing remaining node {} with dist = {}",
                        self.graph.node_id(u),
                        format_distance(distance)
                    );
                    let frontier = self.pending.keys();
                    return Some(self.state.snapshot(StepKind::ProcessRemaining { node: u }, description, frontier, line::PROCESS_REMAINING));
                }
                Phase::RelaxRemaining { u } => {
                    self.relax_into_pending(u);
                    self.state.set_node(u, NodeState::Complete);
                    self.phase = Phase::Remaining;
                }
                Phase::Finish => {
                    self.state.finish();
                    self.phase = Phase::Finished;
                    let counters = self.state.counters();
                    debug!(
                        "BMSSP trace finished after {} steps with {} pivots",
                        self.state.emitted() + 1,
                        self.pivots.len()
                    );
                    let description = format!(
                        "BMSSP complete. Comparisons: {}, relaxations: {}. Pivots used: {}",
                        counters.comparisons,
                        counters.relaxations,
                        self.pivots.len()
                    );
                    let kind = StepKind::Done { pivots: Some(self.pivots.clone()) };
                    return Some(self.state.snapshot(kind, description, Vec::new(), line::DONE));
                }
                Phase::Finished => return None,
            }
        }
    }

    /// One Bellman-Ford round from the current wave. Returns the vertices
    /// reached for the first time, which form the next wave.
    fn relax_wave(&mut self) -> Vec<usize> {
        let graph = Arc::clone(&self.graph);
        let wave = std::mem::take(&mut self.wave);
        let mut reached = Vec::new();

        for &u in &wave {
            for out in graph.outgoing_edges(u) {
                let candidate = self.state.candidate(u, out);
                if !self.state.try_relax(u, out, candidate) {
                    continue;
                }
                let v = out.target;
                self.state.set_edge(out.edge, EdgeState::Relaxed);
                self.state.set_node(v, NodeState::Frontier);

                if !self.is_visited[v] {
                    self.is_visited[v] = true;
                    self.visited.push(v);
                    reached.push(v);
                    self.credit_ancestors(v);
                    self.subtree[v] = 1;
                }
            }
        }

        reached
    }

    /// Adds one to the subtree counter of every ancestor of `v` up to the source
    fn credit_ancestors(&mut self, v: usize) {
        let source = self.state.source();
        let mut current = v;
        // Bounded walk; predecessor links never form a cycle under non-negative weights
        for _ in 0..self.graph.node_count() {
            if current == source {
                break;
            }
            let Some(parent) = self.state.predecessor(current) else {
                break;
            };
            self.subtree[parent] += 1;
            current = parent;
        }
    }

    fn identify_pivots(&mut self) {
        let source = self.state.source();
        for &v in &self.visited {
            if v == source || self.subtree[v] >= self.k {
                self.pivots.push(v);
                self.state.set_node(v, NodeState::Pivot);
            } else {
                self.state.set_node(v, NodeState::InFrontierSet);
            }
        }
    }

    /// Closes the wave: visited vertices become complete, and every edge
    /// leaving them is relaxed once more. Improved vertices, visited or not,
    /// become pending.
    fn seed_pending(&mut self) {
        for &v in &self.visited {
            self.state.set_node(v, NodeState::Complete);
        }
        for i in 0..self.visited.len() {
            let u = self.visited[i];
            self.relax_into_pending(u);
        }
    }

    fn relax_into_pending(&mut self, u: usize) {
        let graph = Arc::clone(&self.graph);
        for out in graph.outgoing_edges(u) {
            let candidate = self.state.candidate(u, out);
            if self.state.try_relax(u, out, candidate) {
                self.state.set_edge(out.edge, EdgeState::Relaxed);
                self.state.set_node(out.target, NodeState::Frontier);
                self.pending.upsert(out.target, candidate);
            }
        }
    }

    fn names(&self, vertices: &[usize]) -> String {
        vertices
            .iter()
            .map(|&v| self.graph.node_id(v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<W: Weight> Iterator for BmsspTrace<W> {
    type Item = Step<W>;

    fn next(&mut self) -> Option<Step<W>> {
        self.advance()
    }
}

impl<W: Weight> FusedIterator for BmsspTrace<W> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::samples::simple_graph;

    #[test]
    fn test_pivot_parameter() {
        assert_eq!(pivot_parameter(1), 2);
        assert_eq!(pivot_parameter(5), 2);
        // log2(513) ≈ 9.003, cube root just above 2
        assert_eq!(pivot_parameter(512), 3);
    }

    #[test]
    fn test_phases_on_simple_graph() {
        let graph = Arc::new(simple_graph().unwrap());
        let mut trace = BmsspTrace::new(graph, "A").unwrap();
        let mut tags = Vec::new();
        while let Some(step) = trace.advance() {
            tags.push(step.tag());
        }

        assert_eq!(
            tags,
            vec![
                "init",
                "find-pivots-start",
                "relax-step",
                "wave-complete",
                "relax-step",
                "wave-complete",
                "pivots-identified",
                "frontier-reduction",
                "process-remaining",
                "done",
            ]
        );
        // A roots every reached vertex; B and C each root one more
        assert_eq!(trace.subtree_size(0), 5);
        assert_eq!(trace.subtree_size(1), 2);
        assert_eq!(trace.subtree_size(2), 2);
        assert_eq!(trace.pivots(), &[0, 1, 2]);
    }

    #[test]
    fn test_non_pivots_join_frontier_set() {
        let graph = Arc::new(simple_graph().unwrap());
        let trace = BmsspTrace::new(graph, "A").unwrap();
        let step = trace
            .into_iter()
            .find(|s| s.tag() == "pivots-identified")
            .unwrap();
        assert_eq!(step.node_states[0], NodeState::Pivot);
        assert_eq!(step.node_states[3], NodeState::InFrontierSet);
        assert_eq!(step.frontier, vec![0, 1, 2]);
    }

    #[test]
    fn test_remaining_phase_fixes_stale_wave_distance() {
        let graph = Arc::new(simple_graph().unwrap());
        let steps: Vec<_> = BmsspTrace::new(graph, "A").unwrap().collect();
        let reduction = steps.iter().find(|s| s.tag() == "frontier-reduction").unwrap();
        // E was reached through C during the wave
        assert_eq!(reduction.distances[4], 12.0);

        let process = steps.iter().find(|s| s.tag() == "process-remaining").unwrap();
        assert_eq!(process.kind, StepKind::ProcessRemaining { node: 4 });
        assert_eq!(process.distances[4], 11.0);
        assert_eq!(process.node_states[4], NodeState::Current);

        let done = steps.last().unwrap();
        assert_eq!(done.predecessors[4], Some(3));
        assert_eq!(done.kind.pivots(), Some(&[0, 1, 2][..]));
    }
}
