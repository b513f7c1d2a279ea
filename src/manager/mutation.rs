//! Domain events the graph mirrors.
//!
//! A `Mutation` carries the committed row: constructing one is the host's
//! statement that the relational write already succeeded.

use serde::{Deserialize, Serialize};

use crate::model::*;
use super::GraphManager;

/// One committed relational change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "row", rename_all = "snake_case")]
pub enum Mutation {
    UserRegistered(UserRow),
    UserUpdated(UserRow),
    FollowCreated(RelationRow),
    FollowRemoved(RelationRow),
    EventPosted(EventRow),
    EventUpdated(EventRow),
    ReactionAdded(ReactionRow),
    ReactionChanged(ReactionRow),
    CommentAdded(CommentRow),
    CommentRemoved(CommentRow),
}

impl Mutation {
    /// Relational id of the row this mutation carries.
    pub fn row_id(&self) -> RowId {
        match self {
            Mutation::UserRegistered(r) | Mutation::UserUpdated(r) => r.id,
            Mutation::FollowCreated(r) | Mutation::FollowRemoved(r) => r.id,
            Mutation::EventPosted(r) | Mutation::EventUpdated(r) => r.id,
            Mutation::ReactionAdded(r) | Mutation::ReactionChanged(r) => r.id,
            Mutation::CommentAdded(r) | Mutation::CommentRemoved(r) => r.id,
        }
    }
}

impl GraphManager {
    /// Dispatch to the matching mutation method.
    pub fn apply(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::UserRegistered(row) => self.add_user(row),
            Mutation::UserUpdated(row) => self.update_user(row),
            Mutation::FollowCreated(row) => self.follow_user(row),
            Mutation::FollowRemoved(row) => self.unfollow_user(&row),
            Mutation::EventPosted(row) => self.add_event(row),
            Mutation::EventUpdated(row) => self.update_event(row),
            Mutation::ReactionAdded(row) => self.add_like(row),
            Mutation::ReactionChanged(row) => self.update_like(row),
            Mutation::CommentAdded(row) => self.add_comment(row),
            Mutation::CommentRemoved(row) => self.delete_comment(&row),
        }
    }
}
