use std::sync::Arc;

use crate::algorithm::AlgorithmKind;
use crate::graph::{Graph, Weight};
use crate::runner::StepRunner;
use crate::Result;

/// The classic and the pivot-reducing algorithm over the same graph and
/// source, stepped in lockstep. A runner that has finished stays on its
/// last step while the other one catches up.
#[derive(Debug)]
pub struct SideBySide<W: Weight> {
    classic: StepRunner<W>,
    pivot: StepRunner<W>,
}

impl<W: Weight> SideBySide<W> {
    pub fn new(graph: Arc<Graph<W>>, source: &str) -> Result<Self> {
        Ok(SideBySide {
            classic: StepRunner::initialize(Arc::clone(&graph), source, AlgorithmKind::Classic)?,
            pivot: StepRunner::initialize(graph, source, AlgorithmKind::PivotReduced)?,
        })
    }

    pub fn classic(&self) -> &StepRunner<W> {
        &self.classic
    }

    pub fn pivot(&self) -> &StepRunner<W> {
        &self.pivot
    }

    /// Advances both runners. Returns false once neither can move.
    pub fn step_forward(&mut self) -> bool {
        let classic = self.classic.step_forward();
        let pivot = self.pivot.step_forward();
        classic || pivot
    }

    pub fn step_backward(&mut self) -> bool {
        let classic = self.classic.step_backward();
        let pivot = self.pivot.step_backward();
        classic || pivot
    }

    pub fn run_to_completion(&mut self) {
        self.classic.run_to_completion();
        self.pivot.run_to_completion();
    }

    pub fn reset(&mut self) -> Result<()> {
        self.classic.reset()?;
        self.pivot.reset()
    }

    pub fn is_complete(&self) -> bool {
        self.classic.is_complete() && self.pivot.is_complete()
    }
}
