//! # Relational Source Trait
//!
//! The read-only contract between the graph and the system of record.
//! The graph issues these bulk reads exactly once, from
//! [`crate::GraphManager::initialize`]; afterwards it learns about changes
//! only through committed rows handed to the mutation API.
//!
//! ## Implementations
//!
//! | Source | Module | Description |
//! |--------|--------|-------------|
//! | `MemorySource` | `memory` | In-memory tables for testing/embedding |
//!
//! Hosts backed by a real database implement the trait over their ORM.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::*;
use crate::Result;

pub use memory::MemorySource;

/// Everything `initialize` needs, read in one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub users: Vec<UserRow>,
    pub events: Vec<EventRow>,
    pub relations: Vec<RelationRow>,
    pub reactions: Vec<ReactionRow>,
    pub comments: Vec<CommentRow>,
}

/// Bulk reads against the relational store.
#[async_trait]
pub trait RelationalSource: Send + Sync {
    /// Users whose account is active.
    async fn active_users(&self) -> Result<Vec<UserRow>>;

    /// Events that are still active.
    async fn active_events(&self) -> Result<Vec<EventRow>>;

    /// All follow relations.
    async fn relations(&self) -> Result<Vec<RelationRow>>;

    /// All reactions, whatever their value.
    async fn reactions(&self) -> Result<Vec<ReactionRow>>;

    /// All comments, whatever their target.
    async fn comments(&self) -> Result<Vec<CommentRow>>;

    /// Read every table the graph mirrors.
    ///
    /// Default: the five reads above, in sequence.
    async fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            users: self.active_users().await?,
            events: self.active_events().await?,
            relations: self.relations().await?,
            reactions: self.reactions().await?,
            comments: self.comments().await?,
        })
    }
}
