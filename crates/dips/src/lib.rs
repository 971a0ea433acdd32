//! Dips - dependency order resolution.
//!
//! Given a set of entities and a "depends-on" map, dips produces a linear
//! order in which every entity appears after everything it depends on,
//! directly or transitively, or reports why no such order exists.
//!
//! ```
//! use dips::{ResolveError, resolve};
//! use std::collections::HashMap;
//!
//! let deps = HashMap::from([("test", vec!["build"]), ("deploy", vec!["test"])]);
//! let order = resolve(&["deploy", "test", "build"], &deps).unwrap();
//! assert_eq!(order, vec!["build", "test", "deploy"]);
//!
//! let cyclic = HashMap::from([("a", vec!["b"]), ("b", vec!["a"])]);
//! assert!(matches!(
//!     resolve(&["a", "b"], &cyclic),
//!     Err(ResolveError::CircularDependency { .. })
//! ));
//! ```

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod error;
pub mod manifest;
pub mod resolver;

// Public CLI module (needed by binary)
pub mod cli;
pub mod output;

pub use error::{ManifestError, ResolveError, ResolveResult};
pub use manifest::Manifest;
pub use resolver::{Entity, Resolver, TopologicalResolver, resolve};
