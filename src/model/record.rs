//! Typed rows mirrored from the relational store.
//!
//! Each row is the committed state of one relational entity. The graph
//! never reads anything the store did not hand it through one of these.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::property_map::{PropertyMap, PropertyWriter};

/// Primary key of a relational row.
pub type RowId = i64;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRow {
    pub id: RowId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    /// Only active accounts are mirrored at startup.
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A posted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    pub id: RowId,
    /// Author.
    pub user_id: RowId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A follow relation. Traversal runs from the followed user to the follower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationRow {
    pub id: RowId,
    /// The followed user.
    pub user_id: RowId,
    pub follower_id: RowId,
    pub created_at: DateTime<Utc>,
}

/// What a reaction points at. Stored as `0` (event) or `1` (comment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ReactionTarget {
    Event,
    Comment,
}

/// Reaction state, stored as `0`, `1` or `2`. Only `Like` contributes to
/// proximity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ReactionValue {
    #[default]
    Unset,
    Like,
    Dislike,
}

impl ReactionValue {
    pub fn is_like(self) -> bool {
        self == ReactionValue::Like
    }
}

/// A like/dislike on an event or on a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionRow {
    pub id: RowId,
    pub user_id: RowId,
    #[serde(rename = "type")]
    pub target: ReactionTarget,
    /// Event id or comment id, depending on `target`.
    pub relation_id: RowId,
    #[serde(default)]
    pub value: ReactionValue,
    pub created_at: DateTime<Utc>,
}

/// What a comment is attached to. Stored as `0` (event) or `1` (community).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CommentTarget {
    #[default]
    Event,
    Community,
}

/// A comment on an event (or a community thread, which the graph ignores).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRow {
    pub id: RowId,
    pub user_id: RowId,
    #[serde(default, rename = "type")]
    pub target: CommentTarget,
    /// Event id or community id, depending on `target`.
    pub relation_id: RowId,
    #[serde(default)]
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl CommentRow {
    /// The event this comment hangs off, if it is an event comment.
    pub fn event_id(&self) -> Option<RowId> {
        match self.target {
            CommentTarget::Event => Some(self.relation_id),
            CommentTarget::Community => None,
        }
    }
}

fn default_active() -> bool {
    true
}

// ============================================================================
// Stored integer codes
// ============================================================================

impl TryFrom<u8> for ReactionTarget {
    type Error = crate::Error;

    fn try_from(code: u8) -> crate::Result<Self> {
        match code {
            0 => Ok(ReactionTarget::Event),
            1 => Ok(ReactionTarget::Comment),
            _ => Err(crate::Error::UnknownCode { column: "reaction type", code }),
        }
    }
}

impl From<ReactionTarget> for u8 {
    fn from(target: ReactionTarget) -> u8 {
        match target {
            ReactionTarget::Event => 0,
            ReactionTarget::Comment => 1,
        }
    }
}

impl TryFrom<u8> for ReactionValue {
    type Error = crate::Error;

    fn try_from(code: u8) -> crate::Result<Self> {
        match code {
            0 => Ok(ReactionValue::Unset),
            1 => Ok(ReactionValue::Like),
            2 => Ok(ReactionValue::Dislike),
            _ => Err(crate::Error::UnknownCode { column: "reaction value", code }),
        }
    }
}

impl From<ReactionValue> for u8 {
    fn from(value: ReactionValue) -> u8 {
        match value {
            ReactionValue::Unset => 0,
            ReactionValue::Like => 1,
            ReactionValue::Dislike => 2,
        }
    }
}

impl TryFrom<u8> for CommentTarget {
    type Error = crate::Error;

    fn try_from(code: u8) -> crate::Result<Self> {
        match code {
            0 => Ok(CommentTarget::Event),
            1 => Ok(CommentTarget::Community),
            _ => Err(crate::Error::UnknownCode { column: "comment type", code }),
        }
    }
}

impl From<CommentTarget> for u8 {
    fn from(target: CommentTarget) -> u8 {
        match target {
            CommentTarget::Event => 0,
            CommentTarget::Community => 1,
        }
    }
}

// ============================================================================
// Open property view
// ============================================================================

impl UserRow {
    pub fn properties(&self) -> PropertyMap {
        PropertyWriter::new()
            .put("id", self.id)
            .put("first_name", self.first_name.as_str())
            .put("last_name", self.last_name.as_str())
            .put("email", self.email.clone())
            .put("photo", self.photo.clone())
            .put("active", self.active)
            .put("created_at", self.created_at)
            .finish()
    }
}

impl EventRow {
    pub fn properties(&self) -> PropertyMap {
        PropertyWriter::new()
            .put("id", self.id)
            .put("user_id", self.user_id)
            .put("title", self.title.as_str())
            .put("description", self.description.as_str())
            .put("location", self.location.as_str())
            .put("online", self.online)
            .put("price", self.price)
            .put("active", self.active)
            .put("created_at", self.created_at)
            .finish()
    }
}

impl RelationRow {
    pub fn properties(&self) -> PropertyMap {
        PropertyWriter::new()
            .put("id", self.id)
            .put("user_id", self.user_id)
            .put("follower_id", self.follower_id)
            .put("created_at", self.created_at)
            .finish()
    }
}

impl ReactionRow {
    pub fn properties(&self) -> PropertyMap {
        let target = match self.target {
            ReactionTarget::Event => "event",
            ReactionTarget::Comment => "comment",
        };
        let value = match self.value {
            ReactionValue::Unset => "unset",
            ReactionValue::Like => "like",
            ReactionValue::Dislike => "dislike",
        };
        PropertyWriter::new()
            .put("id", self.id)
            .put("user_id", self.user_id)
            .put("target", target)
            .put("relation_id", self.relation_id)
            .put("value", value)
            .put("created_at", self.created_at)
            .finish()
    }
}

impl CommentRow {
    pub fn properties(&self) -> PropertyMap {
        let target = match self.target {
            CommentTarget::Event => "event",
            CommentTarget::Community => "community",
        };
        PropertyWriter::new()
            .put("id", self.id)
            .put("user_id", self.user_id)
            .put("target", target)
            .put("relation_id", self.relation_id)
            .put("text", self.text.as_str())
            .put("created_at", self.created_at)
            .finish()
    }
}
