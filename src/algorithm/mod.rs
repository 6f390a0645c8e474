pub mod bmssp;
pub mod dijkstra;
pub mod traits;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::graph::{Graph, Weight};
use crate::{Error, Result};

pub use traits::{ShortestPathResult, StepSequence, TracedAlgorithm};

/// Traces the classic priority-queue algorithm from `source`
pub fn classic_shortest_path<W: Weight>(graph: Arc<Graph<W>>, source: &str) -> Result<StepSequence<W>> {
    dijkstra::Dijkstra::new().trace(graph, source)
}

/// Traces the pivot-reducing wave algorithm from `source`
pub fn pivot_reduced_shortest_path<W: Weight>(graph: Arc<Graph<W>>, source: &str) -> Result<StepSequence<W>> {
    bmssp::Bmssp::new().trace(graph, source)
}

/// The traced algorithms available to runners and the web API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmKind {
    Classic,
    PivotReduced,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 2] = [AlgorithmKind::Classic, AlgorithmKind::PivotReduced];

    /// Starts a new lazy run of this algorithm
    pub fn trace<W: Weight>(self, graph: Arc<Graph<W>>, source: &str) -> Result<StepSequence<W>> {
        match self {
            AlgorithmKind::Classic => classic_shortest_path(graph, source),
            AlgorithmKind::PivotReduced => pivot_reduced_shortest_path(graph, source),
        }
    }

    /// Runs this algorithm to completion
    pub fn compute_shortest_paths<W: Weight>(self, graph: Arc<Graph<W>>, source: &str) -> Result<ShortestPathResult<W>> {
        match self {
            AlgorithmKind::Classic => dijkstra::Dijkstra::new().compute_shortest_paths(graph, source),
            AlgorithmKind::PivotReduced => bmssp::Bmssp::new().compute_shortest_paths(graph, source),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AlgorithmKind::Classic => "Dijkstra",
            AlgorithmKind::PivotReduced => "BMSSP (pivot reduction)",
        }
    }

    pub fn pseudocode(self) -> &'static [&'static str] {
        match self {
            AlgorithmKind::Classic => &dijkstra::DIJKSTRA_PSEUDOCODE,
            AlgorithmKind::PivotReduced => &bmssp::BMSSP_PSEUDOCODE,
        }
    }

    /// Stable identifier, accepted back by [`FromStr`]
    pub fn as_str(self) -> &'static str {
        match self {
            AlgorithmKind::Classic => "classic",
            AlgorithmKind::PivotReduced => "pivot-reduced",
        }
    }
}

impl FromStr for AlgorithmKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "classic" | "dijkstra" => Ok(AlgorithmKind::Classic),
            "pivot-reduced" | "pivot" | "bmssp" => Ok(AlgorithmKind::PivotReduced),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_algorithm_names() {
        assert_eq!("dijkstra".parse::<AlgorithmKind>().unwrap(), AlgorithmKind::Classic);
        assert_eq!("BMSSP".parse::<AlgorithmKind>().unwrap(), AlgorithmKind::PivotReduced);
        for kind in AlgorithmKind::ALL {
            assert_eq!(kind.to_string().parse::<AlgorithmKind>().unwrap(), kind);
        }
        assert!(matches!("astar".parse::<AlgorithmKind>(), Err(Error::UnknownAlgorithm(_))));
    }

    #[test]
    fn test_pseudocode_names_match_trait() {
        let d = dijkstra::Dijkstra::new();
        let name = <dijkstra::Dijkstra as TracedAlgorithm<f64>>::name(&d);
        assert_eq!(name, AlgorithmKind::Classic.name());
        let b = bmssp::Bmssp::new();
        let lines = <bmssp::Bmssp as TracedAlgorithm<f64>>::pseudocode(&b);
        assert_eq!(lines, AlgorithmKind::PivotReduced.pseudocode());
    }
}
