pub mod error;
pub mod graph;
pub mod tokens;

pub use error::GraphError;
pub use graph::DependencyGraph;
pub use tokens::{is_disjoint, subtract, union};
