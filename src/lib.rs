//! SSSP Trace - step-by-step instrumented single-source shortest paths
//!
//! This library re-expresses two shortest path algorithms as sequences of
//! inspectable steps suitable for driving a visualizer:
//!
//! - the classic priority-queue relaxation algorithm (Dijkstra), and
//! - a single-level, pivot-reducing wave algorithm modelled on the BMSSP
//!   procedure from "Breaking the Sorting Barrier for Directed Single-Source
//!   Shortest Paths" by Duan et al. (2025).
//!
//! Every algorithm is an explicit state machine that yields one [`trace::Step`]
//! per logical action. A [`runner::StepRunner`] pulls steps lazily and caches
//! them for scrubbing, and a [`runner::Player`] paces playback on a timer.

pub mod algorithm;
pub mod data_structures;
pub mod graph;
pub mod runner;
pub mod trace;
pub mod web;

pub use algorithm::{
    bmssp::Bmssp, classic_shortest_path, dijkstra::Dijkstra, pivot_reduced_shortest_path,
    AlgorithmKind, ShortestPathResult, StepSequence, TracedAlgorithm,
};
/// Re-export main types for convenient use
pub use graph::{Graph, GraphBuilder, Weight};
pub use runner::{Player, PlaybackConfig, StepRunner};
pub use trace::{EdgeState, NodeState, Step, StepKind};

/// Error types for the library
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Source node not found in graph: {0}")]
    UnknownSource(String),

    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("Duplicate edge id: {0}")]
    DuplicateEdge(String),

    #[error("Edge {edge} references unknown node {node}")]
    UnknownEndpoint { edge: String, node: String },

    #[error("Edge {edge} has negative or invalid weight: {weight}")]
    NegativeWeight { edge: String, weight: f64 },

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Unknown sample graph: {0}")]
    UnknownSample(String),

    #[error("Algorithm execution error: {0}")]
    AlgorithmError(String),

    #[error("Invalid graph JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, Error>;
