//! Consumers of a step sequence: cursor/caching, timed playback, lockstep comparison

pub mod compare;
pub mod playback;

use std::sync::Arc;

use log::debug;

use crate::algorithm::{AlgorithmKind, StepSequence};
use crate::graph::{Graph, Weight};
use crate::trace::Step;
use crate::Result;

pub use compare::SideBySide;
pub use playback::{PlaybackConfig, Player};

/// Pulls steps from a lazy sequence on demand and caches them, so the view
/// cursor can move backwards or jump without re-running anything.
///
/// The cursor never passes the end of the cache.
pub struct StepRunner<W: Weight> {
    graph: Arc<Graph<W>>,
    source: String,
    algorithm: AlgorithmKind,
    sequence: StepSequence<W>,
    steps: Vec<Step<W>>,
    cursor: usize,
    exhausted: bool,
}

impl<W: Weight> StepRunner<W> {
    /// Binds a fresh sequence and caches its first step
    pub fn initialize(graph: Arc<Graph<W>>, source: &str, algorithm: AlgorithmKind) -> Result<Self> {
        let sequence = algorithm.trace(Arc::clone(&graph), source)?;
        let mut runner = StepRunner {
            graph,
            source: source.to_string(),
            algorithm,
            sequence,
            steps: Vec::new(),
            cursor: 0,
            exhausted: false,
        };
        runner.pull();
        Ok(runner)
    }

    pub fn graph(&self) -> &Arc<Graph<W>> {
        &self.graph
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn algorithm(&self) -> AlgorithmKind {
        self.algorithm
    }

    /// All steps pulled so far, in order
    pub fn steps(&self) -> &[Step<W>] {
        &self.steps
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_step(&self) -> Option<&Step<W>> {
        self.steps.get(self.cursor)
    }

    /// True once the sequence has reported its end
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// True when the cursor sits on a `done` step
    pub fn is_complete(&self) -> bool {
        self.current_step().is_some_and(|step| step.is_done())
    }

    /// Moves to the next step, pulling from the sequence only when the cache
    /// is used up. Returns false when there is nothing further.
    pub fn step_forward(&mut self) -> bool {
        if self.cursor + 1 < self.steps.len() {
            self.cursor += 1;
            return true;
        }
        if self.pull() {
            self.cursor = self.steps.len() - 1;
            true
        } else {
            false
        }
    }

    /// Moves to the previous cached step. Returns false at the first step.
    pub fn step_backward(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Jumps to an already cached step. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.steps.len() {
            self.cursor = index;
            true
        } else {
            false
        }
    }

    /// Pulls every remaining step and moves to the last one
    pub fn run_to_completion(&mut self) {
        while self.pull() {}
        self.cursor = self.steps.len().saturating_sub(1);
    }

    /// Discards the cache and starts over with a new sequence
    pub fn reset(&mut self) -> Result<()> {
        debug!("Resetting {} runner from {}", self.algorithm, self.source);
        self.sequence = self.algorithm.trace(Arc::clone(&self.graph), &self.source)?;
        self.steps.clear();
        self.cursor = 0;
        self.exhausted = false;
        self.pull();
        Ok(())
    }

    /// Appends one step from the sequence to the cache
    fn pull(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        match self.sequence.next() {
            Some(step) => {
                self.steps.push(step);
                true
            }
            None => {
                self.exhausted = true;
                false
            }
        }
    }
}

impl<W: Weight> std::fmt::Debug for StepRunner<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepRunner")
            .field("source", &self.source)
            .field("algorithm", &self.algorithm)
            .field("cached", &self.steps.len())
            .field("cursor", &self.cursor)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}
