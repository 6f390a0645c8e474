pub(crate) mod state;
pub mod step;

pub use step::{Counters, EdgeState, NodeState, Step, StepKind};
