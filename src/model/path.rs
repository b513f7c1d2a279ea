//! Path: a sequence of alternating nodes and edges, with its cost.

use serde::{Deserialize, Serialize};
use super::{EdgeId, NodeId};

/// A path in the graph: node -[edge]-> node -[edge]-> node ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    /// Nodes along the path. Always has one more element than `edges`.
    pub nodes: Vec<NodeId>,
    /// Edges connecting consecutive nodes.
    pub edges: Vec<EdgeId>,
    /// Sum of the edge weights.
    pub distance: u64,
}

impl Path {
    pub fn single(node: NodeId) -> Self {
        Self { nodes: vec![node], edges: Vec::new(), distance: 0 }
    }

    /// Number of edges, i.e. traversal depth from `start()`.
    pub fn depth(&self) -> usize {
        self.edges.len()
    }

    pub fn start(&self) -> NodeId {
        *self.nodes.first().expect("Path always has at least one node")
    }

    pub fn end(&self) -> NodeId {
        *self.nodes.last().expect("Path always has at least one node")
    }

    /// Extend path with an edge, its target node and the edge's weight.
    pub fn append(&mut self, edge: EdgeId, node: NodeId, weight: u32) {
        self.edges.push(edge);
        self.nodes.push(node);
        self.distance += u64::from(weight);
    }
}
