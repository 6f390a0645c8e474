use std::iter::FusedIterator;
use std::sync::Arc;

use log::debug;

use crate::algorithm::traits::{resolve_source, StepSequence, TracedAlgorithm};
use crate::data_structures::IndexedMinHeap;
use crate::graph::{format_distance, Graph, Weight};
use crate::trace::state::TraceState;
use crate::trace::{EdgeState, NodeState, Step, StepKind};
use crate::Result;

/// Pseudocode shown next to a classic trace
pub const DIJKSTRA_PSEUDOCODE: [&str; 19] = [
    "function Dijkstra(G, source):",
    "  for each vertex v in G:",
    "    dist[v] ← ∞",
    "    prev[v] ← null",
    "  dist[source] ← 0",
    "  Q ← priority queue with all vertices",
    "",
    "  while Q is not empty:",
    "    u ← extract-min(Q)",
    "    if dist[u] = ∞: break",
    "    for each neighbor v of u still in Q:",
    "      alt ← dist[u] + weight(u, v)",
    "      if alt < dist[v]:",
    "        dist[v] ← alt",
    "        prev[v] ← u",
    "        decrease-key(Q, v, alt)",
    "    mark u complete",
    "",
    "  return dist, prev",
];

mod line {
    pub const INIT: usize = 5;
    pub const EXTRACT_MIN: usize = 8;
    pub const EXAMINE_EDGE: usize = 11;
    pub const NO_RELAX: usize = 12;
    pub const RELAX: usize = 15;
    pub const COMPLETE_NODE: usize = 16;
    pub const DONE: usize = 18;
}

/// Classic Dijkstra's algorithm, traced one queue or edge action at a time
#[derive(Debug, Default, Clone, Copy)]
pub struct Dijkstra;

impl Dijkstra {
    /// Creates a new Dijkstra algorithm instance
    pub fn new() -> Self {
        Dijkstra
    }
}

impl<W: Weight> TracedAlgorithm<W> for Dijkstra {
    fn name(&self) -> &'static str {
        "Dijkstra"
    }

    fn pseudocode(&self) -> &'static [&'static str] {
        &DIJKSTRA_PSEUDOCODE
    }

    fn trace(&self, graph: Arc<Graph<W>>, source: &str) -> Result<StepSequence<W>> {
        Ok(Box::new(DijkstraTrace::new(graph, source)?))
    }
}

/// Where the next call to [`DijkstraTrace::advance`] resumes
#[derive(Debug, Clone, Copy)]
enum Phase<W> {
    Init,
    Extract,
    /// Look for the next neighbor of `u` at adjacency position `next` or later
    Examine { u: usize, next: usize },
    /// Decide the edge at adjacency position `at`, already examined
    Decide { u: usize, at: usize, candidate: W },
    Finish,
    Finished,
}

/// Suspended classic run. Each [`advance`](Self::advance) performs exactly one
/// logical action and returns its step.
#[derive(Debug)]
pub struct DijkstraTrace<W: Weight> {
    graph: Arc<Graph<W>>,
    state: TraceState<W>,
    queue: IndexedMinHeap<usize, W>,
    phase: Phase<W>,
}

impl<W: Weight> DijkstraTrace<W> {
    /// Prepares a run; fails if `source` is not a node id of `graph`
    pub fn new(graph: Arc<Graph<W>>, source: &str) -> Result<Self> {
        let source = resolve_source(&graph, source)?;
        let state = TraceState::new(&graph, source);

        let mut queue = IndexedMinHeap::with_capacity(graph.node_count());
        for v in 0..graph.node_count() {
            queue.insert(v, state.distance(v));
        }

        debug!(
            "Starting Dijkstra trace from {} on {} vertices",
            graph.node_id(source),
            graph.node_count()
        );

        Ok(DijkstraTrace {
            graph,
            state,
            queue,
            phase: Phase::Init,
        })
    }

    /// True once the `done` step has been produced
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    /// Performs the next action and returns its step, or `None` after `done`
    pub fn advance(&mut self) -> Option<Step<W>> {
        loop {
            match self.phase {
                Phase::Init => {
                    let source = self.state.source();
                    // A lone vertex has nothing to extract or relax
                    self.phase = if self.graph.node_count() == 1 {
                        Phase::Finish
                    } else {
                        Phase::Extract
                    };
                    let description = format!(
                        "Initialize: dist[{}] = 0, every other distance = ∞",
                        self.graph.node_id(source)
                    );
                    return Some(self.emit(StepKind::Init { source }, description, line::INIT));
                }
                Phase::Extract => {
                    let Some(entry) = self.queue.extract_min() else {
                        self.phase = Phase::Finish;
                        continue;
                    };
                    // Whatever is left is unreachable
                    if entry.priority.is_infinite() {
                        self.phase = Phase::Finish;
                        continue;
                    }

                    let u = entry.key;
                    self.state.set_node(u, NodeState::Current);
                    self.phase = Phase::Examine { u, next: 0 };
                    let id = self.graph.node_id(u);
                    let description = format!(
                        "Extract minimum from the queue: u = {} with dist[{}] = {}",
                        id,
                        id,
                        format_distance(entry.priority)
                    );
                    return Some(self.emit(StepKind::ExtractMin { node: u }, description, line::EXTRACT_MIN));
                }
                Phase::Examine { u, next } => {
                    let graph = Arc::clone(&self.graph);
                    let outgoing = graph.outgoing_edges(u);
                    let found = outgoing
                        .iter()
                        .enumerate()
                        .skip(next)
                        .find(|(_, out)| self.queue.contains(&out.target));

                    let Some((at, out)) = found else {
                        self.state.set_node(u, NodeState::Complete);
                        self.phase = Phase::Extract;
                        let description = format!(
                            "Node {} complete with final distance {}",
                            graph.node_id(u),
                            format_distance(self.state.distance(u))
                        );
                        return Some(self.emit(StepKind::CompleteNode { node: u }, description, line::COMPLETE_NODE));
                    };

                    let candidate = self.state.candidate(u, out);
                    self.state.set_edge(out.edge, EdgeState::Relaxing);
                    self.phase = Phase::Decide { u, at, candidate };
                    let description = format!(
                        "Examine edge ({}, {}): alt = dist[{}] + w = {} + {} = {}",
                        graph.node_id(u),
                        graph.node_id(out.target),
                        graph.node_id(u),
                        format_distance(self.state.distance(u)),
                        out.weight,
                        format_distance(candidate)
                    );
                    let kind = StepKind::ExamineEdge { edge: out.edge, from: u, to: out.target };
                    return Some(self.emit(kind, description, line::EXAMINE_EDGE));
                }
                Phase::Decide { u, at, candidate } => {
                    let graph = Arc::clone(&self.graph);
                    let out = graph.outgoing_edges(u)[at];
                    let v = out.target;
                    let previous = self.state.distance(v);
                    self.phase = Phase::Examine { u, next: at + 1 };

                    if self.state.try_relax(u, &out, candidate) {
                        self.queue.decrease_key(v, candidate);
                        self.state.set_edge(out.edge, EdgeState::Relaxed);
                        self.state.set_node(v, NodeState::Frontier);
                        let description = format!(
                            "Relaxed: dist[{}] = {} (was {})",
                            graph.node_id(v),
                            format_distance(candidate),
                            format_distance(previous)
                        );
                        let kind = StepKind::Relax { edge: out.edge, from: u, to: v };
                        return Some(self.emit(kind, description, line::RELAX));
                    }

                    self.state.set_edge(out.edge, EdgeState::Default);
                    let description = format!(
                        "No improvement: alt = {} ≥ dist[{}] = {}",
                        format_distance(candidate),
                        graph.node_id(v),
                        format_distance(previous)
                    );
                    let kind = StepKind::NoRelax { edge: out.edge, from: u, to: v };
                    return Some(self.emit(kind, description, line::NO_RELAX));
                }
                Phase::Finish => {
                    self.state.finish();
                    self.phase = Phase::Finished;
                    let counters = self.state.counters();
                    debug!(
                        "Dijkstra trace finished after {} steps ({} comparisons, {} relaxations)",
                        self.state.emitted() + 1,
                        counters.comparisons,
                        counters.relaxations
                    );
                    let description = format!(
                        "Algorithm complete. Total: {} comparisons, {} relaxations.",
                        counters.comparisons, counters.relaxations
                    );
                    return Some(self.state.snapshot(StepKind::Done { pivots: None }, description, Vec::new(), line::DONE));
                }
                Phase::Finished => return None,
            }
        }
    }

    /// Snapshot with the reachable part of the queue as frontier
    fn emit(&mut self, kind: StepKind, description: String, line: usize) -> Step<W> {
        let frontier = self
            .queue
            .snapshot_ordered()
            .into_iter()
            .filter(|entry| entry.priority.is_finite())
            .map(|entry| entry.key)
            .collect();
        self.state.snapshot(kind, description, frontier, line)
    }
}

impl<W: Weight> Iterator for DijkstraTrace<W> {
    type Item = Step<W>;

    fn next(&mut self) -> Option<Step<W>> {
        self.advance()
    }
}

impl<W: Weight> FusedIterator for DijkstraTrace<W> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::samples::simple_graph;

    #[test]
    fn test_step_kinds_on_simple_graph() {
        let graph = Arc::new(simple_graph().unwrap());
        let steps: Vec<_> = DijkstraTrace::new(graph, "A").unwrap().collect();
        let tags: Vec<_> = steps.iter().map(|s| s.tag()).collect();

        assert_eq!(&tags[..4], &["init", "extract-min", "examine-edge", "relax"]);
        assert_eq!(tags.last(), Some(&"done"));
        // every extracted vertex is completed
        let extracted = tags.iter().filter(|t| **t == "extract-min").count();
        let completed = tags.iter().filter(|t| **t == "complete-node").count();
        assert_eq!(extracted, 5);
        assert_eq!(completed, 5);
        // every examination is resolved by relax or no-relax
        let examined = tags.iter().filter(|t| **t == "examine-edge").count();
        let resolved = tags.iter().filter(|t| **t == "relax" || **t == "no-relax").count();
        assert_eq!(examined, resolved);
        assert_eq!(steps.last().unwrap().counters.comparisons, examined);
    }

    #[test]
    fn test_examine_marks_edge_relaxing() {
        let graph = Arc::new(simple_graph().unwrap());
        let mut trace = DijkstraTrace::new(graph, "A").unwrap();
        trace.advance();
        let extract = trace.advance().unwrap();
        assert_eq!(extract.kind, StepKind::ExtractMin { node: 0 });
        assert_eq!(extract.node_states[0], NodeState::Current);

        let examine = trace.advance().unwrap();
        assert_eq!(examine.kind, StepKind::ExamineEdge { edge: 0, from: 0, to: 1 });
        assert_eq!(examine.edge_states[0], EdgeState::Relaxing);
        assert_eq!(examine.pseudocode_line, line::EXAMINE_EDGE);
    }

    #[test]
    fn test_fused_after_done() {
        let graph = Arc::new(simple_graph().unwrap());
        let mut trace = DijkstraTrace::new(graph, "A").unwrap();
        while trace.advance().is_some() {}
        assert!(trace.is_finished());
        assert!(trace.advance().is_none());
        assert!(trace.next().is_none());
    }
}
