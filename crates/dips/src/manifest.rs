//! Dependency manifests.
//!
//! A manifest supplies the two resolver inputs from a file. Two shapes are
//! accepted, in JSON or YAML:
//!
//! ```json
//! { "entities": ["1", "2", "3"], "deps": { "1": ["2"], "2": ["3"] } }
//! ```
//!
//! or a bare dependency map, in which case the entities are inferred:
//!
//! ```json
//! { "1": ["2"], "2": ["3"] }
//! ```
//!
//! Entity names may be written as any scalar, so YAML's `1: [2]` names the
//! same entities as `"1": ["2"]`. A missing or null dependency list is empty.
//! A map whose only keys are `entities` and `deps` is read as the full shape.

use crate::error::{ManifestError, ManifestResult, ResolveResult};
use crate::resolver::Resolver;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Entities and their declared dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Entities to order. Inferred from `deps` when absent.
    #[serde(
        default,
        deserialize_with = "deserialize_entities",
        skip_serializing_if = "Option::is_none"
    )]
    pub entities: Option<Vec<String>>,

    /// Entity to the entities it depends on.
    #[serde(default, deserialize_with = "deserialize_deps")]
    pub deps: BTreeMap<String, Vec<String>>,
}

impl From<DependencyMap> for Manifest {
    fn from(DependencyMap(deps): DependencyMap) -> Self {
        Self {
            entities: None,
            deps,
        }
    }
}

// ============================================================================
// Lenient Deserialization
// ============================================================================

/// Entity name written as a string, number or boolean.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct EntityName(String);

impl<'de> Deserialize<'de> for EntityName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntityNameVisitor)
    }
}

struct EntityNameVisitor;

impl Visitor<'_> for EntityNameVisitor {
    type Value = EntityName;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an entity name")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(EntityName(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(EntityName(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(EntityName(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(EntityName(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(EntityName(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(EntityName(v.to_string()))
    }
}

/// Dependency list; null reads as empty.
struct DependencyList(Vec<String>);

impl<'de> Deserialize<'de> for DependencyList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DependencyListVisitor)
    }
}

struct DependencyListVisitor;

impl<'de> Visitor<'de> for DependencyListVisitor {
    type Value = DependencyList;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of dependencies")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(DependencyList(Vec::new()))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(DependencyList(Vec::new()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut deps = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(EntityName(dep)) = seq.next_element()? {
            deps.push(dep);
        }
        Ok(DependencyList(deps))
    }
}

/// Bare dependency map.
struct DependencyMap(BTreeMap<String, Vec<String>>);

impl<'de> Deserialize<'de> for DependencyMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DependencyMapVisitor)
    }
}

struct DependencyMapVisitor;

impl<'de> Visitor<'de> for DependencyMapVisitor {
    type Value = DependencyMap;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from entity to the entities it depends on")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(DependencyMap(BTreeMap::new()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut deps = BTreeMap::new();
        while let Some((EntityName(entity), DependencyList(list))) = map.next_entry()? {
            deps.insert(entity, list);
        }
        Ok(DependencyMap(deps))
    }
}

/// Top-level keys of a manifest document.
type TopLevelKeys = BTreeMap<EntityName, de::IgnoredAny>;

fn is_full_shape(keys: &TopLevelKeys) -> bool {
    keys.keys().all(|EntityName(key)| key == "entities" || key == "deps")
}

fn deserialize_entities<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    let names: Option<Vec<EntityName>> = Option::deserialize(deserializer)?;
    Ok(names.map(|names| names.into_iter().map(|EntityName(name)| name).collect()))
}

fn deserialize_deps<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, Vec<String>>, D::Error> {
    DependencyMap::deserialize(deserializer).map(|DependencyMap(deps)| deps)
}

impl Manifest {
    /// Parses a JSON manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Json`] if the input is not a valid manifest.
    pub fn from_json_str(input: &str) -> ManifestResult<Self> {
        let keys = serde_json::from_str::<TopLevelKeys>(input).ok();
        if keys.as_ref().is_some_and(is_full_shape) {
            return Ok(serde_json::from_str(input)?);
        }
        let deps: DependencyMap = serde_json::from_str(input)?;
        Ok(deps.into())
    }

    /// Parses a YAML manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Yaml`] if the input is not a valid manifest.
    pub fn from_yaml_str(input: &str) -> ManifestResult<Self> {
        let keys = serde_yaml::from_str::<TopLevelKeys>(input).ok();
        if keys.as_ref().is_some_and(is_full_shape) {
            return Ok(serde_yaml::from_str(input)?);
        }
        let deps: DependencyMap = serde_yaml::from_str(input)?;
        Ok(deps.into())
    }

    /// Reads a JSON manifest from `reader`, e.g. stdin.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Io`] on read failure and
    /// [`ManifestError::Json`] if the input is not a valid manifest.
    pub fn from_reader_json<R: Read>(mut reader: R) -> ManifestResult<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::from_json_str(&input)
    }

    /// Loads a manifest, choosing the format from the file extension
    /// (`.json`, `.yaml` or `.yml`).
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::UnsupportedFormat`] for any other extension,
    /// otherwise the read or parse error.
    pub fn from_path(path: &Path) -> ManifestResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let manifest = match extension.as_deref() {
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path)?)?,
            Some("yaml" | "yml") => Self::from_yaml_str(&std::fs::read_to_string(path)?)?,
            _ => return Err(ManifestError::UnsupportedFormat(path.to_path_buf())),
        };

        tracing::debug!(
            path = %path.display(),
            entries = manifest.deps.len(),
            "Loaded manifest"
        );
        Ok(manifest)
    }

    /// Replaces the entity list.
    #[must_use]
    pub fn with_entities(mut self, entities: Vec<String>) -> Self {
        self.entities = Some(entities);
        self
    }

    /// Returns the entities to order.
    #[must_use]
    ///
    /// Without an explicit list, every key and listed dependency is taken
    /// once, keys in sorted order, each followed by its dependencies.
    pub fn entities(&self) -> Vec<String> {
        if let Some(entities) = &self.entities {
            return entities.clone();
        }

        let mut seen = HashSet::new();
        let mut entities = Vec::new();
        for (entity, deps) in &self.deps {
            for id in std::iter::once(entity).chain(deps) {
                if seen.insert(id.as_str()) {
                    entities.push(id.clone());
                }
            }
        }
        entities
    }

    /// Returns the dependency mapping in the resolver's input form.
    #[must_use]
    pub fn deps(&self) -> HashMap<String, Vec<String>> {
        self.deps
            .iter()
            .map(|(entity, deps)| (entity.clone(), deps.clone()))
            .collect()
    }

    /// Number of declared dependency edges.
    #[must_use]
    pub fn dependency_count(&self) -> usize {
        self.deps.values().map(Vec::len).sum()
    }

    /// Resolves this manifest with `resolver`.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve`].
    pub fn resolve(&self, resolver: &dyn Resolver<String>) -> ResolveResult<Vec<String>, String> {
        resolver.resolve(&self.entities(), &self.deps())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::TopologicalResolver;

    fn strings(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| (*id).to_string()).collect()
    }

    #[test]
    fn test_parse_bare_json_map() {
        let manifest = Manifest::from_json_str(r#"{"1": ["2"], "2": ["3"]}"#).unwrap();
        assert!(manifest.entities.is_none());
        assert_eq!(manifest.deps["1"], strings(&["2"]));
        assert_eq!(manifest.entities(), strings(&["1", "2", "3"]));
    }

    #[test]
    fn test_parse_full_json_manifest() {
        let manifest =
            Manifest::from_json_str(r#"{"entities": ["b", "a"], "deps": {"a": ["b"]}}"#).unwrap();
        assert_eq!(manifest.entities(), strings(&["b", "a"]));
        assert_eq!(manifest.dependency_count(), 1);
    }

    #[test]
    fn test_parse_yaml_manifest() {
        let yaml = "entities: [x, y]\ndeps:\n  y: [x]\n";
        let manifest = Manifest::from_yaml_str(yaml).unwrap();
        assert_eq!(manifest.entities(), strings(&["x", "y"]));
        assert_eq!(manifest.deps["y"], strings(&["x"]));
    }

    #[test]
    fn test_parse_bare_yaml_map() {
        let manifest = Manifest::from_yaml_str("web: [db, cache]\ncache: []\n").unwrap();
        assert_eq!(manifest.entities(), strings(&["cache", "web", "db"]));
    }

    #[test]
    fn test_parse_yaml_numeric_names() {
        let manifest = Manifest::from_yaml_str("1: [2]\n2: [3]\n").unwrap();
        assert_eq!(manifest.deps["1"], strings(&["2"]));
        assert_eq!(manifest.entities(), strings(&["1", "2", "3"]));

        let order = manifest.resolve(&TopologicalResolver).unwrap();
        assert_eq!(order, strings(&["3", "2", "1"]));
    }

    #[test]
    fn test_numeric_key_is_never_a_manifest_field() {
        let manifest = Manifest::from_yaml_str("0: [1]\n1: []\n").unwrap();
        assert!(manifest.entities.is_none());
        assert_eq!(manifest.deps["0"], strings(&["1"]));
    }

    #[test]
    fn test_invalid_full_manifest_reports_field_error() {
        let err = Manifest::from_json_str(r#"{"entities": "a", "deps": {}}"#).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("invalid type"), "message: {message}");
        assert!(!message.contains("untagged"), "message: {message}");
    }

    #[test]
    fn test_parse_json_numeric_dependencies() {
        let manifest = Manifest::from_json_str(r#"{"1": [2, 3], "2": [true]}"#).unwrap();
        assert_eq!(manifest.deps["1"], strings(&["2", "3"]));
        assert_eq!(manifest.deps["2"], strings(&["true"]));
    }

    #[test]
    fn test_parse_yaml_null_dependencies() {
        let manifest = Manifest::from_yaml_str("a: [b]\nb:\n").unwrap();
        assert!(manifest.deps["b"].is_empty());
        assert_eq!(manifest.entities(), strings(&["a", "b"]));
        assert_eq!(manifest.dependency_count(), 1);
    }

    #[test]
    fn test_parse_full_yaml_with_numeric_entities() {
        let yaml = "entities: [1, 2]\ndeps:\n  2: [1]\n  1:\n";
        let manifest = Manifest::from_yaml_str(yaml).unwrap();
        assert_eq!(manifest.entities(), strings(&["1", "2"]));
        assert_eq!(manifest.deps["2"], strings(&["1"]));
        assert!(manifest.deps["1"].is_empty());
    }

    #[test]
    fn test_invalid_json_reports_the_bad_value() {
        let err = Manifest::from_json_str(r#"{"a": "not-a-list"}"#).unwrap_err();
        assert!(matches!(err, ManifestError::Json(_)));

        let message = err.to_string();
        assert!(message.contains("not-a-list"), "message: {message}");
        assert!(message.contains("expected a list of dependencies"), "message: {message}");
        assert!(!message.contains("untagged"), "message: {message}");
    }

    #[test]
    fn test_invalid_yaml_reports_the_bad_value() {
        let err = Manifest::from_yaml_str("a: {b: c}\n").unwrap_err();
        assert!(matches!(err, ManifestError::Yaml(_)));

        let message = err.to_string();
        assert!(message.contains("expected a list of dependencies"), "message: {message}");
        assert!(!message.contains("untagged"), "message: {message}");
    }

    #[test]
    fn test_from_reader_json() {
        let input = br#"{"a": ["b"]}"#;
        let manifest = Manifest::from_reader_json(&input[..]).unwrap();
        assert_eq!(manifest.entities(), strings(&["a", "b"]));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = Manifest::from_path(Path::new("deps.toml"));
        assert!(matches!(result, Err(ManifestError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_with_entities_overrides_inferred() {
        let manifest = Manifest::from_json_str(r#"{"a": ["b"]}"#)
            .unwrap()
            .with_entities(strings(&["a", "b", "c"]));
        assert_eq!(manifest.entities(), strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_resolve_manifest() {
        let manifest = Manifest::from_json_str(r#"{"app": ["lib"], "lib": []}"#).unwrap();
        let order = manifest.resolve(&TopologicalResolver).unwrap();
        assert_eq!(order, strings(&["lib", "app"]));
    }
}
