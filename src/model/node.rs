//! Node in the proximity graph.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{EdgeId, EntityKind, Payload, Unit, Value};

/// Opaque node identifier (slot in the graph arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

pub(crate) type EdgeList = SmallVec<[EdgeId; 4]>;

/// A vertex: a user, an event, or the synthetic root.
///
/// Edge lists hold arena ids, never edges themselves. They are kept in
/// registration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub unit: Unit<NodeId>,
    edges: EdgeList,
    inbound: EdgeList,
    outbound: EdgeList,
}

impl Node {
    pub(crate) fn new(id: NodeId, kind: EntityKind, payload: Payload) -> Self {
        Self {
            unit: Unit::new(id, kind, payload),
            edges: EdgeList::new(),
            inbound: EdgeList::new(),
            outbound: EdgeList::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.unit.id
    }

    pub fn kind(&self) -> EntityKind {
        self.unit.kind
    }

    pub fn payload(&self) -> &Payload {
        &self.unit.payload
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.unit.get(key)
    }

    /// Every incident edge, either direction.
    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }

    pub fn inbound(&self) -> &[EdgeId] {
        &self.inbound
    }

    pub fn outbound(&self) -> &[EdgeId] {
        &self.outbound
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn attach_outbound(&mut self, edge: EdgeId) {
        self.outbound.push(edge);
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    pub(crate) fn attach_inbound(&mut self, edge: EdgeId) {
        self.inbound.push(edge);
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    /// Drop every registration of `edge` on this node.
    pub(crate) fn detach(&mut self, edge: EdgeId) {
        self.edges.retain(|e| *e != edge);
        self.inbound.retain(|e| *e != edge);
        self.outbound.retain(|e| *e != edge);
    }

    pub(crate) fn set_payload(&mut self, payload: Payload) {
        self.unit.payload = payload;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_loop_registers_once_as_incident() {
        let mut node = Node::new(NodeId(0), EntityKind::User, Payload::Empty);
        node.attach_outbound(EdgeId(3));
        node.attach_inbound(EdgeId(3));
        assert_eq!(node.edges(), &[EdgeId(3)]);
        assert_eq!(node.inbound(), &[EdgeId(3)]);
        assert_eq!(node.outbound(), &[EdgeId(3)]);

        node.detach(EdgeId(3));
        assert_eq!(node.degree(), 0);
        assert!(node.inbound().is_empty());
        assert!(node.outbound().is_empty());
    }
}
