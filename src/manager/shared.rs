//! Shared handle for multi-threaded hosts.
//!
//! One coarse lock around the whole manager: a mutation holds the write
//! side for exactly one call, queries share the read side. Nothing here
//! blocks on I/O once `open` has returned.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::GraphConfig;
use crate::model::RowId;
use crate::source::RelationalSource;
use crate::Result;
use super::{EventHit, EventQuery, GraphManager, GraphStats, Mutation};

/// Cloneable handle to a fully initialized [`GraphManager`].
///
/// The only constructor awaits the bulk load, so no caller can reach a
/// half-built graph.
#[derive(Clone)]
pub struct SharedGraph {
    inner: Arc<RwLock<GraphManager>>,
}

impl SharedGraph {
    /// Build and populate the graph from `source`.
    pub async fn open<S: RelationalSource + ?Sized>(source: &S, config: GraphConfig) -> Result<Self> {
        let mut manager = GraphManager::new(config);
        manager.initialize(source).await?;
        Ok(Self { inner: Arc::new(RwLock::new(manager)) })
    }

    /// Apply one committed change under the write lock.
    pub fn apply(&self, mutation: Mutation) {
        self.inner.write().apply(mutation);
    }

    pub fn find_events(&self, user_id: Option<RowId>, query: &EventQuery) -> Vec<EventHit> {
        self.inner.read().find_events(user_id, query)
    }

    pub fn stats(&self) -> GraphStats {
        self.inner.read().stats()
    }

    /// Read access for queries the handle does not wrap.
    pub fn read(&self) -> RwLockReadGuard<'_, GraphManager> {
        self.inner.read()
    }

    /// Write access for a single multi-step change. Keep it short.
    pub fn write(&self) -> RwLockWriteGuard<'_, GraphManager> {
        self.inner.write()
    }
}
