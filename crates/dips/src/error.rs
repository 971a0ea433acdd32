//! Error types for dependency resolution and manifest loading.

use dips_graph::GraphError;
use dips_graph::error::format_path;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for dependency resolution.
///
/// Every variant is detected before an order is produced; no partial
/// order ever accompanies an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError<T: fmt::Debug> {
    /// No entities were supplied.
    #[error("empty entities")]
    EmptyInput,

    /// An entity occurs more than once in the entity list.
    #[error("entity {0:?} is listed more than once")]
    DuplicateEntity(T),

    /// The dependency mapping references an entity that was not supplied,
    /// either as a key or as a listed dependency.
    #[error("entity {0:?} doesn't exist in the given entities")]
    UnknownEntity(T),

    /// The dependencies form a cycle, so no valid order exists.
    #[error("can't resolve dependencies: circular dependency: {}", format_path(.cycle))]
    CircularDependency {
        /// Closed dependency path, dependent first: `a -> b -> a` means
        /// `a` depends on `b` and `b` depends on `a`.
        cycle: Vec<T>,
    },
}

impl<T: fmt::Debug> ResolveError<T> {
    /// Returns the offending cycle if this is a [`ResolveError::CircularDependency`].
    #[must_use]
    pub fn cycle(&self) -> Option<&[T]> {
        match self {
            Self::CircularDependency { cycle } => Some(cycle),
            _ => None,
        }
    }
}

impl<T: fmt::Debug> From<GraphError<T>> for ResolveError<T> {
    fn from(err: GraphError<T>) -> Self {
        match err {
            GraphError::UnknownNode(node) => Self::UnknownEntity(node),
            GraphError::CircularDependency { cycle } => Self::CircularDependency { cycle },
        }
    }
}

/// A specialized Result type for dependency resolution.
pub type ResolveResult<R, T> = std::result::Result<R, ResolveError<T>>;

/// The error type for manifest loading.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// IO error occurred while reading the manifest.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The file extension does not name a supported format.
    #[error("Unsupported manifest format: {} (expected .json, .yaml or .yml)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// A specialized Result type for manifest loading.
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_cycle_maps_to_circular_dependency() {
        let err: ResolveError<&str> = GraphError::CircularDependency {
            cycle: vec!["a", "b", "a"],
        }
        .into();
        assert_eq!(err.cycle(), Some(&["a", "b", "a"][..]));
        assert_eq!(
            err.to_string(),
            "can't resolve dependencies: circular dependency: \"a\" -> \"b\" -> \"a\""
        );
    }

    #[test]
    fn test_graph_unknown_node_maps_to_unknown_entity() {
        let err: ResolveError<&str> = GraphError::UnknownNode("x").into();
        assert_eq!(err, ResolveError::UnknownEntity("x"));
        assert!(err.cycle().is_none());
    }

    #[test]
    fn test_unknown_entity_display() {
        let err = ResolveError::UnknownEntity("b".to_string());
        assert_eq!(
            err.to_string(),
            "entity \"b\" doesn't exist in the given entities"
        );
    }
}
