//! Error types for graph operations.

use std::fmt;
use thiserror::Error;

/// The error type for graph operations.
///
/// Generic over the node identifier so callers get their own values back
/// instead of an opaque rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError<N: fmt::Debug> {
    /// An edge endpoint was never added as a node.
    #[error("unknown node: {0:?}")]
    UnknownNode(N),

    /// The graph contains a cycle, so no topological order exists.
    #[error("circular dependency: {}", format_path(.cycle))]
    CircularDependency {
        /// Closed path along recorded edges; the first node is repeated at the end.
        cycle: Vec<N>,
    },
}

impl<N: fmt::Debug> GraphError<N> {
    /// Returns the offending cycle if this is a [`GraphError::CircularDependency`].
    #[must_use]
    pub fn cycle(&self) -> Option<&[N]> {
        match self {
            Self::CircularDependency { cycle } => Some(cycle),
            Self::UnknownNode(_) => None,
        }
    }
}

/// A specialized Result type for graph operations.
pub type GraphResult<T, N> = std::result::Result<T, GraphError<N>>;

/// Renders a node path as `a -> b -> a`.
#[must_use]
pub fn format_path<N: fmt::Debug>(path: &[N]) -> String {
    path.iter()
        .map(|node| format!("{node:?}"))
        .collect::<Vec<_>>()
        .join(" -> ")
}
