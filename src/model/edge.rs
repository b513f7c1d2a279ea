//! Edge in the proximity graph.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::{EntityKind, NodeId, Payload, Unit, Value};

/// Opaque edge identifier (slot in the graph arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl EdgeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Traversal cost of an edge. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Weight(NonZeroU32);

impl Weight {
    pub const ONE: Weight = Weight::from_const(1);

    /// `None` for zero.
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Weight)
    }

    pub const fn from_const(value: u32) -> Self {
        match NonZeroU32::new(value) {
            Some(v) => Weight(v),
            None => panic!("edge weight must be positive"),
        }
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for Weight {
    type Error = crate::Error;

    fn try_from(value: u32) -> crate::Result<Self> {
        Weight::new(value).ok_or(crate::Error::InvalidWeight(value))
    }
}

impl From<Weight> for u32 {
    fn from(w: Weight) -> u32 {
        w.get()
    }
}

impl std::fmt::Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Endpoints of a linked edge. Traversable from `source` to `target` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub source: NodeId,
    pub target: NodeId,
}

/// A directed, weighted connection standing for one social action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub unit: Unit<EdgeId>,
    link: Option<Link>,
    weight: Weight,
}

impl Edge {
    pub(crate) fn new(id: EdgeId, kind: EntityKind, payload: Payload) -> Self {
        Self {
            unit: Unit::new(id, kind, payload),
            link: None,
            weight: Weight::ONE,
        }
    }

    pub fn id(&self) -> EdgeId {
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

    pub fn link(&self) -> Option<Link> {
        self.link
    }

    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }

    pub fn source(&self) -> Option<NodeId> {
        self.link.map(|l| l.source)
    }

    pub fn target(&self) -> Option<NodeId> {
        self.link.map(|l| l.target)
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub(crate) fn set_link(&mut self, link: Link) {
        self.link = Some(link);
    }

    pub(crate) fn take_link(&mut self) -> Option<Link> {
        self.link.take()
    }

    pub(crate) fn set_weight(&mut self, weight: Weight) {
        self.weight = weight;
    }

    pub(crate) fn set_payload(&mut self, payload: Payload) {
        self.unit.payload = payload;
    }
}
