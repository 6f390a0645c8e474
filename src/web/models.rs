use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::algorithm::{AlgorithmKind, ShortestPathResult};
use crate::graph::{Graph, GraphSpec};
use crate::runner::StepRunner;
use crate::trace::{EdgeState, NodeState, Step};

/// A sample graph as listed by the API
#[derive(Debug, Clone, Serialize)]
pub struct SampleInfo {
    pub name: &'static str,
    pub title: &'static str,
    pub source: &'static str,
    pub graph: GraphSpec<f64>,
}

/// An algorithm with its pseudocode listing
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmInfo {
    pub id: AlgorithmKind,
    pub name: &'static str,
    pub pseudocode: &'static [&'static str],
}

/// Parameters for starting a traced run. Either a sample name or a full
/// graph; the sample's own source is used when `source` is omitted.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub sample: Option<String>,
    #[serde(default)]
    pub graph: Option<GraphSpec<f64>>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

fn default_algorithm() -> String {
    AlgorithmKind::Classic.as_str().to_string()
}

/// Parameters for a side-by-side comparison
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub sample: Option<String>,
    #[serde(default)]
    pub graph: Option<GraphSpec<f64>>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Optional per-step details, keyed by node and edge ids
#[derive(Debug, Clone, Serialize)]
pub struct StepMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relaxing_edge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivots: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontier_set: Option<Vec<String>>,
    pub comparisons: usize,
    pub relaxations: usize,
}

/// A step rendered for a browser: id-keyed maps, `null` for infinite distances
#[derive(Debug, Clone, Serialize)]
pub struct WebStep {
    pub index: usize,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: String,
    pub node_states: BTreeMap<String, NodeState>,
    pub edge_states: BTreeMap<String, EdgeState>,
    pub distances: BTreeMap<String, Option<f64>>,
    pub predecessors: BTreeMap<String, Option<String>>,
    pub frontier: Vec<String>,
    pub current_line: usize,
    pub metadata: StepMetadata,
}

impl WebStep {
    pub fn from_step(graph: &Graph<f64>, step: &Step<f64>, index: usize) -> Self {
        let node = |v: usize| graph.node_id(v).to_string();
        let nodes = |vs: &[usize]| vs.iter().map(|&v| node(v)).collect::<Vec<_>>();

        WebStep {
            index,
            kind: step.tag(),
            description: step.description.clone(),
            node_states: step
                .node_states
                .iter()
                .enumerate()
                .map(|(v, state)| (node(v), *state))
                .collect(),
            edge_states: step
                .edge_states
                .iter()
                .enumerate()
                .map(|(e, state)| (graph.edge_id(e).to_string(), *state))
                .collect(),
            distances: (0..step.distances.len()).map(|v| (node(v), step.distance(v))).collect(),
            predecessors: step
                .predecessors
                .iter()
                .enumerate()
                .map(|(v, pred)| (node(v), pred.map(node)))
                .collect(),
            frontier: nodes(&step.frontier),
            current_line: step.pseudocode_line,
            metadata: StepMetadata {
                current_node: step.kind.current_node().map(node),
                relaxing_edge: step.kind.relaxing_edge().map(|e| graph.edge_id(e).to_string()),
                pivots: step.kind.pivots().map(nodes),
                frontier_set: step.kind.frontier_set().map(nodes),
                comparisons: step.counters.comparisons,
                relaxations: step.counters.relaxations,
            },
        }
    }
}

/// A traced run held by the server
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub runner: StepRunner<f64>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(runner: StepRunner<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            runner,
            created_at: Utc::now(),
        }
    }

    pub fn view(&self) -> SessionView {
        let runner = &self.runner;
        SessionView {
            id: self.id,
            algorithm: runner.algorithm(),
            source: runner.source().to_string(),
            created_at: self.created_at,
            cursor: runner.cursor(),
            cached_steps: runner.steps().len(),
            exhausted: runner.is_exhausted(),
            complete: runner.is_complete(),
            step: runner
                .current_step()
                .map(|step| WebStep::from_step(runner.graph(), step, runner.cursor())),
        }
    }
}

/// Session state returned by every session endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub algorithm: AlgorithmKind,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub cursor: usize,
    pub cached_steps: usize,
    pub exhausted: bool,
    pub complete: bool,
    pub step: Option<WebStep>,
}

/// Outcome of one algorithm in a comparison
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub algorithm: AlgorithmKind,
    pub name: &'static str,
    pub step_count: usize,
    pub comparisons: usize,
    pub relaxations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pivots: Option<Vec<String>>,
    pub distances: BTreeMap<String, Option<f64>>,
    pub execution_time_ms: f64,
}

impl RunSummary {
    pub fn new(
        graph: &Graph<f64>,
        algorithm: AlgorithmKind,
        result: &ShortestPathResult<f64>,
        execution_time_ms: f64,
    ) -> Self {
        RunSummary {
            algorithm,
            name: algorithm.name(),
            step_count: result.step_count,
            comparisons: result.counters.comparisons,
            relaxations: result.counters.relaxations,
            pivots: result
                .pivots
                .as_ref()
                .map(|pivots| pivots.iter().map(|&v| graph.node_id(v).to_string()).collect()),
            distances: result
                .distances
                .iter()
                .enumerate()
                .map(|(v, d)| (graph.node_id(v).to_string(), *d))
                .collect(),
            execution_time_ms,
        }
    }
}

/// Both algorithms on the same input
#[derive(Debug, Clone, Serialize)]
pub struct CompareResponse {
    pub classic: RunSummary,
    pub pivot_reduced: RunSummary,
    /// Whether both final distance maps are equal
    pub agree: bool,
}

/// Error response for API
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}
