//! Directed graph container.
//!
//! Nodes are stored in insertion order and addressed internally by their
//! position, so every traversal (and therefore every topological order) is
//! reproducible for a given sequence of insertions.
//!
//! # Edge Direction
//!
//! The container itself is direction-neutral: an edge `src -> dst` only
//! means "`src` points to `dst`". Callers modelling dependencies use
//! **dependent -> dependency**, which makes [`Graph::topological_sort`]
//! emit every dependency before its dependents.

use crate::error::{GraphError, GraphResult};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Position of a node in insertion order.
pub(crate) type NodeIndex = usize;

/// An ordered pair of nodes: `src` points to `dst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge<N> {
    /// Source node.
    pub src: N,
    /// Destination node.
    pub dst: N,
}

/// A directed graph over caller-supplied node identifiers.
///
/// # Example
///
/// ```
/// use dips_graph::Graph;
///
/// let mut graph = Graph::new();
/// graph.add_node("app");
/// graph.add_node("lib");
/// graph.add_edge(&"app", &"lib").unwrap();
///
/// assert_eq!(graph.topological_sort().unwrap(), vec!["lib", "app"]);
/// ```
#[derive(Debug, Clone)]
pub struct Graph<N> {
    /// Nodes in insertion order
    pub(crate) nodes: Vec<N>,
    /// Node identifier to position in `nodes`
    pub(crate) index: HashMap<N, NodeIndex>,
    /// Successor positions per node, in edge insertion order
    pub(crate) successors: Vec<Vec<NodeIndex>>,
    edge_count: usize,
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            successors: Vec::new(),
            edge_count: 0,
        }
    }
}

impl<N> Graph<N>
where
    N: Clone + Eq + Hash + fmt::Debug,
{
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            successors: Vec::with_capacity(capacity),
            edge_count: 0,
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of recorded edges, duplicates included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Returns true if `node` has been added.
    #[must_use]
    pub fn contains_node(&self, node: &N) -> bool {
        self.index.contains_key(node)
    }

    /// Adds a node. Adding a node that is already present is a no-op.
    ///
    /// Returns `true` if the node was newly inserted.
    pub fn add_node(&mut self, node: N) -> bool {
        if self.index.contains_key(&node) {
            return false;
        }

        let position = self.nodes.len();
        self.index.insert(node.clone(), position);
        self.nodes.push(node);
        self.successors.push(Vec::new());
        true
    }

    /// Iterates over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    /// Records `dst` as a successor of `src`.
    ///
    /// Both endpoints must already be nodes of the graph. Self-loops and
    /// repeated edges are recorded as given.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] naming the first absent endpoint
    /// (`src` is checked before `dst`). The graph is not modified.
    pub fn add_edge(&mut self, src: &N, dst: &N) -> GraphResult<(), N> {
        let src_pos = self.position(src)?;
        let dst_pos = self.position(dst)?;

        tracing::trace!(src = ?src, dst = ?dst, "Adding edge");
        self.successors[src_pos].push(dst_pos);
        self.edge_count += 1;
        Ok(())
    }

    /// Iterates over the successors of `node` in the order the edges were added.
    ///
    /// Yields nothing if `node` is unknown or has no outgoing edges.
    pub fn neighbors(&self, node: &N) -> impl Iterator<Item = &N> {
        self.index.get(node).into_iter().flat_map(move |&pos| {
            self.successors[pos]
                .iter()
                .map(move |&succ| &self.nodes[succ])
        })
    }

    /// Iterates over every edge, grouped by source in node insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Edge<&N>> {
        self.successors.iter().enumerate().flat_map(move |(src, dsts)| {
            dsts.iter().map(move |&dst| Edge {
                src: &self.nodes[src],
                dst: &self.nodes[dst],
            })
        })
    }

    fn position(&self, node: &N) -> GraphResult<NodeIndex, N> {
        self.index
            .get(node)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(node.clone()))
    }
}
