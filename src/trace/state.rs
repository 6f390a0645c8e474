use log::trace;

use crate::graph::{Graph, OutEdge, Weight};
use crate::trace::step::{Counters, EdgeState, NodeState, Step, StepKind};

/// Live, mutable state of a traced run. Only ever exposed through
/// [`TraceState::snapshot`] copies.
#[derive(Debug)]
pub(crate) struct TraceState<W: Weight> {
    source: usize,
    node_states: Vec<NodeState>,
    edge_states: Vec<EdgeState>,
    distances: Vec<W>,
    predecessors: Vec<Option<usize>>,
    /// Edge that produced each vertex's current distance
    via_edge: Vec<Option<usize>>,
    counters: Counters,
    emitted: usize,
}

impl<W: Weight> TraceState<W> {
    /// Source at distance 0 in the frontier, everything else unreached
    pub fn new(graph: &Graph<W>, source: usize) -> Self {
        let n = graph.node_count();
        let mut distances = vec![W::infinity(); n];
        distances[source] = W::zero();
        let mut node_states = vec![NodeState::Unvisited; n];
        node_states[source] = NodeState::Frontier;

        TraceState {
            edge_states: vec![EdgeState::Default; graph.edge_count()],
            predecessors: vec![None; n],
            via_edge: vec![None; n],
            counters: Counters::default(),
            emitted: 0,
            source,
            node_states,
            distances,
        }
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn distance(&self, vertex: usize) -> W {
        self.distances[vertex]
    }

    pub fn predecessor(&self, vertex: usize) -> Option<usize> {
        self.predecessors[vertex]
    }

    pub fn set_node(&mut self, vertex: usize, state: NodeState) {
        self.node_states[vertex] = state;
    }

    pub fn set_edge(&mut self, edge: usize, state: EdgeState) {
        self.edge_states[edge] = state;
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Computes `dist[from] + weight`, counting one comparison
    pub fn candidate(&mut self, from: usize, out: &OutEdge<W>) -> W {
        self.counters.comparisons += 1;
        self.distances[from] + out.weight
    }

    /// Lowers `dist[out.target]` to `candidate` if strictly better, counting
    /// one relaxation. Returns whether the distance changed.
    pub fn try_relax(&mut self, from: usize, out: &OutEdge<W>, candidate: W) -> bool {
        if candidate < self.distances[out.target] {
            self.counters.relaxations += 1;
            self.distances[out.target] = candidate;
            self.predecessors[out.target] = Some(from);
            self.via_edge[out.target] = Some(out.edge);
            true
        } else {
            false
        }
    }

    /// Marks every vertex complete (unreached ones included) and every edge
    /// of the predecessor tree as part of a shortest path
    pub fn finish(&mut self) {
        for state in self.node_states.iter_mut() {
            *state = NodeState::Complete;
        }
        for edge in self.via_edge.iter().flatten() {
            self.edge_states[*edge] = EdgeState::ShortestPath;
        }
    }

    /// Copies the live state into a new [`Step`]
    pub fn snapshot(
        &mut self,
        kind: StepKind,
        description: String,
        frontier: Vec<usize>,
        pseudocode_line: usize,
    ) -> Step<W> {
        self.emitted += 1;
        trace!("step {} [{}]: {}", self.emitted, kind.tag(), description);

        Step {
            kind,
            description,
            node_states: self.node_states.clone(),
            edge_states: self.edge_states.clone(),
            distances: self.distances.clone(),
            predecessors: self.predecessors.clone(),
            frontier,
            pseudocode_line,
            counters: self.counters,
        }
    }

    /// Number of steps produced so far
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_graph() -> Graph<f64> {
        Graph::builder()
            .node("a", 0.0, 0.0)
            .node("b", 1.0, 0.0)
            .node("c", 2.0, 0.0)
            .edge("ab", "a", "b", 2.0)
            .edge("bc", "b", "c", 3.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let mut state = TraceState::new(&line_graph(), 0);
        assert_eq!(state.distance(0), 0.0);
        assert!(state.distance(2).is_infinite());
        let step = state.snapshot(StepKind::Init { source: 0 }, "init".into(), vec![0], 0);
        assert_eq!(step.node_states[0], NodeState::Frontier);
        assert_eq!(step.node_states[1], NodeState::Unvisited);
    }

    #[test]
    fn test_relaxation_counts_and_finish() {
        let graph = line_graph();
        let mut state = TraceState::new(&graph, 0);
        let out = graph.outgoing_edges(0)[0];
        let candidate = state.candidate(0, &out);
        assert!(state.try_relax(0, &out, candidate));
        assert!(!state.try_relax(0, &out, candidate));
        assert_eq!(state.counters(), Counters { comparisons: 1, relaxations: 1 });
        assert_eq!(state.predecessor(1), Some(0));

        state.finish();
        let step = state.snapshot(StepKind::Done { pivots: None }, "done".into(), vec![], 0);
        assert_eq!(step.edge_states, vec![EdgeState::ShortestPath, EdgeState::Default]);
        assert!(step.node_states.iter().all(|s| *s == NodeState::Complete));
        assert_eq!(state.emitted(), 1);
    }

    #[test]
    fn test_snapshot_is_independent_of_live_state() {
        let mut state = TraceState::new(&line_graph(), 0);
        let before = state.snapshot(StepKind::Init { source: 0 }, "init".into(), vec![0], 0);
        state.set_node(1, NodeState::Current);
        state.set_edge(0, EdgeState::Relaxing);
        assert_eq!(before.node_states[1], NodeState::Unvisited);
        assert_eq!(before.edge_states[0], EdgeState::Default);
    }
}
