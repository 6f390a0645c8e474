use serde::{Deserialize, Serialize};

use crate::graph::Weight;

/// Visual state of a vertex, owned by the algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeState {
    Unvisited,
    Frontier,
    Current,
    Complete,
    Pivot,
    InFrontierSet,
}

/// Visual state of a stored edge, owned by the algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeState {
    Default,
    Relaxing,
    Relaxed,
    ShortestPath,
}

/// Running totals carried by every step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    /// Candidate distances computed
    pub comparisons: usize,
    /// Candidates that improved a distance
    pub relaxations: usize,
}

/// What happened in a step, with the data specific to that kind of action.
///
/// Vertex and edge fields are indices into the traced graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum StepKind {
    Init { source: usize },
    ExtractMin { node: usize },
    ExamineEdge { edge: usize, from: usize, to: usize },
    Relax { edge: usize, from: usize, to: usize },
    NoRelax { edge: usize, from: usize, to: usize },
    CompleteNode { node: usize },
    FindPivotsStart { k: usize },
    /// Start of wave round `round` (1-based) relaxing from `wave`
    RelaxStep { round: usize, wave: Vec<usize> },
    WaveComplete { round: usize, reached: Vec<usize> },
    PivotsIdentified { pivots: Vec<usize> },
    FrontierReduction { visited: Vec<usize>, pivots: Vec<usize> },
    ProcessRemaining { node: usize },
    Done { pivots: Option<Vec<usize>> },
}

impl StepKind {
    /// The kebab-case tag of this kind, e.g. `"extract-min"`
    pub fn tag(&self) -> &'static str {
        match self {
            StepKind::Init { .. } => "init",
            StepKind::ExtractMin { .. } => "extract-min",
            StepKind::ExamineEdge { .. } => "examine-edge",
            StepKind::Relax { .. } => "relax",
            StepKind::NoRelax { .. } => "no-relax",
            StepKind::CompleteNode { .. } => "complete-node",
            StepKind::FindPivotsStart { .. } => "find-pivots-start",
            StepKind::RelaxStep { .. } => "relax-step",
            StepKind::WaveComplete { .. } => "wave-complete",
            StepKind::PivotsIdentified { .. } => "pivots-identified",
            StepKind::FrontierReduction { .. } => "frontier-reduction",
            StepKind::ProcessRemaining { .. } => "process-remaining",
            StepKind::Done { .. } => "done",
        }
    }

    /// The vertex the algorithm is working on, if any
    pub fn current_node(&self) -> Option<usize> {
        match *self {
            StepKind::ExtractMin { node }
            | StepKind::CompleteNode { node }
            | StepKind::ProcessRemaining { node } => Some(node),
            StepKind::ExamineEdge { from, .. }
            | StepKind::Relax { from, .. }
            | StepKind::NoRelax { from, .. } => Some(from),
            _ => None,
        }
    }

    /// The edge under relaxation. A failed relaxation no longer highlights its edge.
    pub fn relaxing_edge(&self) -> Option<usize> {
        match *self {
            StepKind::ExamineEdge { edge, .. } | StepKind::Relax { edge, .. } => Some(edge),
            _ => None,
        }
    }

    pub fn pivots(&self) -> Option<&[usize]> {
        match self {
            StepKind::PivotsIdentified { pivots } | StepKind::FrontierReduction { pivots, .. } => {
                Some(pivots)
            }
            StepKind::Done { pivots } => pivots.as_deref(),
            _ => None,
        }
    }

    /// The wave or visited set a pivot step refers to
    pub fn frontier_set(&self) -> Option<&[usize]> {
        match self {
            StepKind::RelaxStep { wave, .. } => Some(wave),
            StepKind::FrontierReduction { visited, .. } => Some(visited),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, StepKind::Done { .. })
    }
}

/// An immutable snapshot of the algorithm state after one logical action.
///
/// Per-vertex vectors are indexed like [`crate::Graph::nodes`], per-edge
/// vectors like [`crate::Graph::edges`]. A step owns all of its data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step<W: Weight> {
    pub kind: StepKind,
    pub description: String,
    pub node_states: Vec<NodeState>,
    pub edge_states: Vec<EdgeState>,
    /// `W::infinity()` for vertices not reached yet
    pub distances: Vec<W>,
    pub predecessors: Vec<Option<usize>>,
    /// Vertices currently active, in display order
    pub frontier: Vec<usize>,
    /// Index into the algorithm's pseudocode listing
    pub pseudocode_line: usize,
    pub counters: Counters,
}

impl<W: Weight> Step<W> {
    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    pub fn is_done(&self) -> bool {
        self.kind.is_done()
    }

    /// Distance of a vertex, `None` while it is unreached
    pub fn distance(&self, vertex: usize) -> Option<W> {
        self.distances
            .get(vertex)
            .copied()
            .filter(|distance| distance.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_and_metadata() {
        let relax = StepKind::Relax { edge: 3, from: 1, to: 2 };
        assert_eq!(relax.tag(), "relax");
        assert_eq!(relax.current_node(), Some(1));
        assert_eq!(relax.relaxing_edge(), Some(3));

        let no_relax = StepKind::NoRelax { edge: 3, from: 1, to: 2 };
        assert_eq!(no_relax.relaxing_edge(), None);

        let done = StepKind::Done { pivots: Some(vec![0, 4]) };
        assert!(done.is_done());
        assert_eq!(done.pivots(), Some(&[0, 4][..]));
        assert_eq!(StepKind::Done { pivots: None }.pivots(), None);
    }

    #[test]
    fn test_states_serialize_kebab_case() {
        assert_eq!(
            serde_json::to_string(&NodeState::InFrontierSet).unwrap(),
            "\"in-frontier-set\""
        );
        assert_eq!(
            serde_json::to_string(&EdgeState::ShortestPath).unwrap(),
            "\"shortest-path\""
        );
        let kind = serde_json::to_value(StepKind::ExtractMin { node: 2 }).unwrap();
        assert_eq!(kind["kind"], "extract-min");
        assert_eq!(kind["node"], 2);
    }
}
