//! Dependency resolution.
//!
//! Entities become graph nodes and every declared dependency becomes an edge
//! **dependent -> dependency**. The graph's topological order then lists
//! each dependency before the entities that depend on it.
//!
//! # Determinism
//!
//! Edges are added by walking `entities` in order and looking each entity
//! up in the dependency map, so the same `entities` order always yields the
//! same result regardless of the map's iteration order.

use crate::error::{ResolveError, ResolveResult};
use dips_graph::Graph;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// Identifier of a unit of work to be ordered.
///
/// Implemented for every cloneable, hashable, debuggable type; strings and
/// integers are the common choices.
pub trait Entity: Clone + Eq + Hash + fmt::Debug {}

impl<T: Clone + Eq + Hash + fmt::Debug> Entity for T {}

/// Resolves dependencies between entities.
///
/// Returns the entities in an order where, if entity A depends on entity B,
/// B comes before A (e.g. job B should run before job A). If no such order
/// exists an error is returned instead.
pub trait Resolver<T: Entity> {
    /// Orders `entities` so that every dependency in `deps` precedes its dependent.
    ///
    /// `deps` maps an entity to the entities it depends on; absent keys mean
    /// "no dependencies".
    ///
    /// # Errors
    ///
    /// - [`ResolveError::EmptyInput`] if `entities` is empty
    /// - [`ResolveError::DuplicateEntity`] if an entity is listed twice
    /// - [`ResolveError::UnknownEntity`] if `deps` mentions an entity not in `entities`
    /// - [`ResolveError::CircularDependency`] if the dependencies form a cycle
    fn resolve(&self, entities: &[T], deps: &HashMap<T, Vec<T>>) -> ResolveResult<Vec<T>, T>;
}

/// Resolver backed by a depth-first topological sort.
///
/// # Example
///
/// ```
/// use dips::{Resolver, TopologicalResolver};
/// use std::collections::HashMap;
///
/// let deps = HashMap::from([("app", vec!["lib"]), ("lib", vec!["core"])]);
/// let order = TopologicalResolver::new()
///     .resolve(&["app", "lib", "core"], &deps)
///     .unwrap();
/// assert_eq!(order, vec!["core", "lib", "app"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TopologicalResolver;

impl TopologicalResolver {
    /// Creates a new resolver.
    pub fn new() -> Self {
        Self
    }
}

impl<T: Entity> Resolver<T> for TopologicalResolver {
    fn resolve(&self, entities: &[T], deps: &HashMap<T, Vec<T>>) -> ResolveResult<Vec<T>, T> {
        validate(entities, deps)?;

        let graph = build_graph(entities, deps)?;
        let order = graph.topological_sort()?;

        tracing::debug!(
            entities = entities.len(),
            dependencies = graph.edge_count(),
            "Resolved dependency order"
        );
        Ok(order)
    }
}

/// Resolves with the default [`TopologicalResolver`].
///
/// # Errors
///
/// See [`Resolver::resolve`].
pub fn resolve<T: Entity>(
    entities: &[T],
    deps: &HashMap<T, Vec<T>>,
) -> ResolveResult<Vec<T>, T> {
    TopologicalResolver.resolve(entities, deps)
}

/// Checks the input before any graph is built.
fn validate<T: Entity>(entities: &[T], deps: &HashMap<T, Vec<T>>) -> ResolveResult<(), T> {
    if entities.is_empty() {
        return Err(ResolveError::EmptyInput);
    }

    let mut known = HashSet::with_capacity(entities.len());
    for entity in entities {
        if !known.insert(entity) {
            return Err(ResolveError::DuplicateEntity(entity.clone()));
        }
    }

    for (entity, entity_deps) in deps {
        if !known.contains(entity) {
            return Err(ResolveError::UnknownEntity(entity.clone()));
        }
        if let Some(missing) = entity_deps.iter().find(|dep| !known.contains(dep)) {
            return Err(ResolveError::UnknownEntity(missing.clone()));
        }
    }

    Ok(())
}

fn build_graph<T: Entity>(
    entities: &[T],
    deps: &HashMap<T, Vec<T>>,
) -> ResolveResult<Graph<T>, T> {
    let mut graph = Graph::with_capacity(entities.len());
    for entity in entities {
        graph.add_node(entity.clone());
    }

    for entity in entities {
        let Some(entity_deps) = deps.get(entity) else {
            continue;
        };
        for dep in entity_deps {
            // entity depends on dep, so dep must come first
            graph.add_edge(entity, dep)?;
        }
    }

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    type Deps = HashMap<&'static str, Vec<&'static str>>;

    fn deps_of(pairs: &[(&'static str, &[&'static str])]) -> Deps {
        pairs
            .iter()
            .map(|(entity, deps)| (*entity, deps.to_vec()))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        let result = resolve::<&str>(&[], &HashMap::new());
        assert_eq!(result, Err(ResolveError::EmptyInput));
    }

    #[test]
    fn test_empty_input_checked_before_deps() {
        let result = resolve(&[], &deps_of(&[("a", &["b"])]));
        assert_eq!(result, Err(ResolveError::EmptyInput));
    }

    #[test]
    fn test_duplicate_entity() {
        let result = resolve(&["a", "b", "a"], &HashMap::new());
        assert_eq!(result, Err(ResolveError::DuplicateEntity("a")));
    }

    #[rstest]
    #[case::unknown_dependency(vec!["a"], vec![("a", vec!["b"])], "b")]
    #[case::unknown_key(vec!["a"], vec![("z", vec![])], "z")]
    #[case::key_checked_before_its_deps(vec!["a"], vec![("x", vec!["y"])], "x")]
    fn test_unknown_entity(
        #[case] entities: Vec<&'static str>,
        #[case] deps: Vec<(&'static str, Vec<&'static str>)>,
        #[case] expected: &'static str,
    ) {
        let deps: HashMap<_, _> = deps.into_iter().collect();
        let result = resolve(&entities, &deps);
        assert_eq!(result, Err(ResolveError::UnknownEntity(expected)));
    }

    #[test]
    fn test_two_node_cycle() {
        let result = resolve(&["a", "b"], &deps_of(&[("a", &["b"]), ("b", &["a"])]));
        assert_eq!(
            result,
            Err(ResolveError::CircularDependency {
                cycle: vec!["a", "b", "a"]
            })
        );
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let result = resolve(&["a"], &deps_of(&[("a", &["a"])]));
        assert_eq!(
            result,
            Err(ResolveError::CircularDependency {
                cycle: vec!["a", "a"]
            })
        );
    }

    #[test]
    fn test_no_dependencies_keeps_entity_order() {
        let order = resolve(&["c", "a", "b"], &HashMap::new()).unwrap();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_dependency_precedes_dependent() {
        let order = resolve(&["app", "lib"], &deps_of(&[("app", &["lib"])])).unwrap();
        assert_eq!(order, vec!["lib", "app"]);
    }

    #[test]
    fn test_integer_entities() {
        let deps = HashMap::from([(1, vec![2]), (2, vec![3])]);
        let order = TopologicalResolver::new().resolve(&[1, 2, 3], &deps).unwrap();
        assert_eq!(order, vec![3, 2, 1]);
    }

    #[test]
    fn test_resolver_as_trait_object() {
        let resolver: Box<dyn Resolver<&str>> = Box::new(TopologicalResolver);
        let order = resolver
            .resolve(&["a", "b"], &deps_of(&[("a", &["b"])]))
            .unwrap();
        assert_eq!(order, vec!["b", "a"]);
    }
}
