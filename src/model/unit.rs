//! Unit: the shared shape of every graph element.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::record::{CommentRow, EventRow, ReactionRow, RelationRow, UserRow};
use super::{PropertyMap, Value};

/// What a node or edge stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// The synthetic traversal origin, and the edges fanning out of it.
    Root,
    User,
    Event,
    /// Follow relation.
    Relation,
    /// Authorship of an event.
    Post,
    Like,
    Comment,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Root => "root",
            EntityKind::User => "user",
            EntityKind::Event => "event",
            EntityKind::Relation => "relation",
            EntityKind::Post => "post",
            EntityKind::Like => "like",
            EntityKind::Comment => "comment",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mirrored row carried by a unit, resolved once at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "row", rename_all = "snake_case")]
pub enum Payload {
    /// No mirrored row (root node, root links, post edges).
    Empty,
    User(UserRow),
    Event(EventRow),
    Relation(RelationRow),
    Reaction(ReactionRow),
    Comment(CommentRow),
}

impl Payload {
    /// Render the row as an open property map.
    pub fn properties(&self) -> PropertyMap {
        match self {
            Payload::Empty => PropertyMap::new(),
            Payload::User(row) => row.properties(),
            Payload::Event(row) => row.properties(),
            Payload::Relation(row) => row.properties(),
            Payload::Reaction(row) => row.properties(),
            Payload::Comment(row) => row.properties(),
        }
    }

    pub fn as_user(&self) -> Option<&UserRow> {
        match self {
            Payload::User(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_event(&self) -> Option<&EventRow> {
        match self {
            Payload::Event(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&CommentRow> {
        match self {
            Payload::Comment(row) => Some(row),
            _ => None,
        }
    }
}

/// A typed, payload-bearing graph element with a stable identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit<I> {
    pub id: I,
    pub kind: EntityKind,
    pub payload: Payload,
}

impl<I: Copy> Unit<I> {
    pub fn new(id: I, kind: EntityKind, payload: Payload) -> Self {
        Self { id, kind, payload }
    }

    /// Single column of the mirrored row.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.payload.properties().remove(key)
    }
}
