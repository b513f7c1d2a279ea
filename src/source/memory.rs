//! In-memory relational source.
//!
//! Reference implementation of `RelationalSource`: plain row tables behind
//! one RwLock. Rows are returned in insertion order.
//!
//! Use this source for:
//! - Testing the graph manager without a database
//! - Embedding with a snapshot exported from the real store

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::model::*;
use crate::Result;
use super::{RelationalSource, Snapshot};

/// Row tables standing in for the relational store.
#[derive(Clone, Default)]
pub struct MemorySource {
    tables: Arc<RwLock<Snapshot>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self { tables: Arc::new(RwLock::new(snapshot)) }
    }

    /// Load tables from a JSON document shaped like [`Snapshot`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::from_snapshot(serde_json::from_str(json)?))
    }

    pub fn insert_user(&self, row: UserRow) {
        self.tables.write().users.push(row);
    }

    pub fn insert_event(&self, row: EventRow) {
        self.tables.write().events.push(row);
    }

    pub fn insert_relation(&self, row: RelationRow) {
        self.tables.write().relations.push(row);
    }

    pub fn insert_reaction(&self, row: ReactionRow) {
        self.tables.write().reactions.push(row);
    }

    pub fn insert_comment(&self, row: CommentRow) {
        self.tables.write().comments.push(row);
    }
}

#[async_trait]
impl RelationalSource for MemorySource {
    async fn active_users(&self) -> Result<Vec<UserRow>> {
        Ok(self.tables.read().users.iter().filter(|u| u.active).cloned().collect())
    }

    async fn active_events(&self) -> Result<Vec<EventRow>> {
        Ok(self.tables.read().events.iter().filter(|e| e.active).cloned().collect())
    }

    async fn relations(&self) -> Result<Vec<RelationRow>> {
        Ok(self.tables.read().relations.clone())
    }

    async fn reactions(&self) -> Result<Vec<ReactionRow>> {
        Ok(self.tables.read().reactions.clone())
    }

    async fn comments(&self) -> Result<Vec<CommentRow>> {
        Ok(self.tables.read().comments.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
