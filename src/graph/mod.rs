//! # Graph arena
//!
//! Owns every node and edge. Nodes and edges refer to each other through
//! arena ids, so the inbound/outbound back-references never form ownership
//! cycles.
//!
//! ## Link invariants
//!
//! - A linked edge is registered in its source's outbound list, its
//!   target's inbound list, and both endpoints' incident lists. Nothing else.
//! - An unlinked edge is registered nowhere.
//! - Unlinking is idempotent; relinking an edge reuses its slot.
//!
//! The graph is agnostic to relational ids. Mapping rows to elements is
//! the job of [`crate::manager::GraphManager`].

pub mod search;

use crate::model::*;

pub use search::SearchOptions;

/// The node/edge universe plus the synthetic root.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    /// `None` marks a released slot waiting on the free list.
    edges: Vec<Option<Edge>>,
    free_edges: Vec<EdgeId>,
    root: NodeId,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// An empty graph holding only the root node.
    pub fn new() -> Self {
        let root = NodeId(0);
        Self {
            nodes: vec![Node::new(root, EntityKind::Root, Payload::Empty)],
            edges: Vec::new(),
            free_edges: Vec::new(),
            root,
        }
    }

    /// The fixed traversal origin for global queries.
    pub fn root(&self) -> NodeId {
        self.root
    }

    // ========================================================================
    // Factories
    // ========================================================================

    pub fn create_node(&mut self, kind: EntityKind, payload: Payload) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(id, kind, payload));
        id
    }

    /// Allocate an unlinked edge.
    pub fn create_edge(&mut self, kind: EntityKind, payload: Payload) -> EdgeId {
        match self.free_edges.pop() {
            Some(id) => {
                self.edges[id.index()] = Some(Edge::new(id, kind, payload));
                id
            }
            None => {
                let id = EdgeId(self.edges.len() as u32);
                self.edges.push(Some(Edge::new(id, kind, payload)));
                id
            }
        }
    }

    // ========================================================================
    // Link lifecycle
    // ========================================================================

    /// Link `edge` from `source` to `target`. An edge that is already linked
    /// is unlinked first, so relinking moves it rather than duplicating it.
    ///
    /// Returns a handle for setting the weight in the same expression.
    pub fn link(&mut self, edge: EdgeId, source: NodeId, target: NodeId) -> EdgeMut<'_> {
        assert!(source.index() < self.nodes.len(), "link source {source} outside arena");
        assert!(target.index() < self.nodes.len(), "link target {target} outside arena");

        self.unlink_edge(edge);
        self.edge_slot(edge).set_link(Link { source, target });
        self.nodes[source.index()].attach_outbound(edge);
        self.nodes[target.index()].attach_inbound(edge);

        EdgeMut { graph: self, id: edge }
    }

    /// Remove `edge` from both endpoints. Returns whether it was linked.
    pub fn unlink_edge(&mut self, edge: EdgeId) -> bool {
        let Some(link) = self.edge_slot(edge).take_link() else {
            return false;
        };
        self.nodes[link.source.index()].detach(edge);
        if link.target != link.source {
            self.nodes[link.target.index()].detach(edge);
        }
        true
    }

    /// Unlink every edge incident to `node`, both directions.
    /// Returns how many edges were unlinked.
    pub fn unlink_node(&mut self, node: NodeId) -> usize {
        let incident: Vec<EdgeId> = match self.nodes.get(node.index()) {
            Some(n) => n.edges().to_vec(),
            None => return 0,
        };
        incident.into_iter().filter(|e| self.unlink_edge(*e)).count()
    }

    /// Unlink `edge` and return its slot to the free list.
    /// The id must not be used again by the caller.
    pub fn release_edge(&mut self, edge: EdgeId) {
        if self.edges.get(edge.index()).is_some_and(Option::is_some) {
            self.unlink_edge(edge);
            self.edges[edge.index()] = None;
            self.free_edges.push(edge);
        }
    }

    // ========================================================================
    // Payload updates
    // ========================================================================

    /// Replace the mirrored row of a node. Returns false for unknown ids.
    pub fn replace_node_payload(&mut self, node: NodeId, payload: Payload) -> bool {
        match self.nodes.get_mut(node.index()) {
            Some(n) => {
                n.set_payload(payload);
                true
            }
            None => false,
        }
    }

    pub fn replace_edge_payload(&mut self, edge: EdgeId, payload: Payload) -> bool {
        match self.edges.get_mut(edge.index()).and_then(Option::as_mut) {
            Some(e) => {
                e.set_payload(payload);
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index()).and_then(Option::as_ref)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().flatten()
    }

    /// Nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Allocated edges, linked or not.
    pub fn edge_count(&self) -> usize {
        self.edges.len() - self.free_edges.len()
    }

    pub fn linked_edge_count(&self) -> usize {
        self.edges().filter(|e| e.is_linked()).count()
    }

    fn edge_slot(&mut self, id: EdgeId) -> &mut Edge {
        self.edges
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("edge {id} is not allocated"))
    }
}

/// Fluent handle returned by [`Graph::link`].
pub struct EdgeMut<'g> {
    graph: &'g mut Graph,
    id: EdgeId,
}

impl EdgeMut<'_> {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn set_weight(self, weight: Weight) -> EdgeId {
        self.graph.edge_slot(self.id).set_weight(weight);
        self.id
    }
}

// ============================================================================
// Tests
// ============================================================================
