//! Topological sorting with cycle detection.
//!
//! Depth-first search with three-state marking, driven by an explicit stack
//! so that chain depth is bounded by heap memory rather than the call stack:
//!
//! - `Unvisited`: not reached yet
//! - `InProgress`: on the current DFS path
//! - `Done`: finished; the node and everything reachable from it is emitted
//!
//! Reaching an `InProgress` node is a back edge, i.e. a cycle. A node is
//! emitted only after all of its successors, so for every edge
//! `src -> dst` the output has `dst` before `src`.

use crate::error::{GraphError, GraphResult};
use crate::graph::{Graph, NodeIndex};
use std::fmt;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

/// One entry of the DFS path: a node and the next successor to explore.
#[derive(Debug)]
struct Frame {
    node: NodeIndex,
    next: usize,
}

impl<N> Graph<N>
where
    N: Clone + Eq + Hash + fmt::Debug,
{
    /// Returns every node ordered so that each edge's destination precedes
    /// its source.
    ///
    /// Roots are taken in node insertion order and successors in edge
    /// insertion order, so the result is reproducible.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CircularDependency`] with the offending path as
    /// soon as a cycle is found. No partial order is returned.
    pub fn topological_sort(&self) -> GraphResult<Vec<N>, N> {
        tracing::debug!(
            nodes = self.len(),
            edges = self.edge_count(),
            "Sorting graph"
        );

        let order = self.sorted_positions()?;
        Ok(order
            .into_iter()
            .map(|pos| self.nodes[pos].clone())
            .collect())
    }

    /// Returns true if the graph has no cycle.
    #[must_use]
    pub fn is_acyclic(&self) -> bool {
        self.sorted_positions().is_ok()
    }

    fn sorted_positions(&self) -> GraphResult<Vec<NodeIndex>, N> {
        let mut state = vec![VisitState::Unvisited; self.nodes.len()];
        let mut sorted = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<Frame> = Vec::new();

        for root in 0..self.nodes.len() {
            if state[root] != VisitState::Unvisited {
                continue;
            }

            state[root] = VisitState::InProgress;
            stack.push(Frame {
                node: root,
                next: 0,
            });

            while let Some(frame) = stack.last_mut() {
                let node = frame.node;
                let Some(&succ) = self.successors[node].get(frame.next) else {
                    // All successors emitted; the node can follow them.
                    stack.pop();
                    state[node] = VisitState::Done;
                    sorted.push(node);
                    tracing::trace!(node = ?self.nodes[node], "Emitted");
                    continue;
                };
                frame.next += 1;

                match state[succ] {
                    VisitState::Done => {}
                    VisitState::InProgress => return Err(self.cycle_error(&stack, succ)),
                    VisitState::Unvisited => {
                        state[succ] = VisitState::InProgress;
                        stack.push(Frame {
                            node: succ,
                            next: 0,
                        });
                    }
                }
            }
        }

        Ok(sorted)
    }

    /// Builds the cycle from the DFS path, starting at the node the back edge returned to.
    fn cycle_error(&self, path: &[Frame], back_to: NodeIndex) -> GraphError<N> {
        // InProgress nodes are exactly the ones on the path.
        let start = path
            .iter()
            .position(|frame| frame.node == back_to)
            .unwrap_or(0);

        let mut cycle: Vec<N> = path[start..]
            .iter()
            .map(|frame| self.nodes[frame.node].clone())
            .collect();
        cycle.push(self.nodes[back_to].clone());

        tracing::debug!(cycle = ?cycle, "Cycle detected");
        GraphError::CircularDependency { cycle }
    }
}
