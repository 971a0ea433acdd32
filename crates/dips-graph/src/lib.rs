//! A small directed graph with deterministic, stack-safe topological sorting.
//!
//! The graph knows nothing about entities or dependencies; it stores nodes
//! and directed edges and can linearize them so that every edge's
//! destination comes before its source.
//!
//! # Example
//!
//! ```
//! use dips_graph::{Graph, GraphError};
//!
//! let mut graph = Graph::new();
//! for node in ["a", "b", "c"] {
//!     graph.add_node(node);
//! }
//! graph.add_edge(&"a", &"b").unwrap();
//! graph.add_edge(&"b", &"c").unwrap();
//! assert_eq!(graph.topological_sort().unwrap(), vec!["c", "b", "a"]);
//!
//! graph.add_edge(&"c", &"a").unwrap();
//! assert!(matches!(
//!     graph.topological_sort(),
//!     Err(GraphError::CircularDependency { .. })
//! ));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod graph;
mod sort;

pub use error::{GraphError, GraphResult};
pub use graph::{Edge, Graph};
