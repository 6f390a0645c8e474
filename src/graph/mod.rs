pub mod generators;
pub mod model;
pub mod samples;
pub mod traits;

pub use model::{Edge, Graph, GraphBuilder, GraphSpec, Node, OutEdge};
pub use traits::{format_distance, Weight};
