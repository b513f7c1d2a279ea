//! # Graph Manager
//!
//! Mirrors the relational store into a [`Graph`] and keeps it current.
//!
//! ## Protocol
//!
//! 1. `initialize` reads every mirrored table once and builds the graph.
//! 2. After each committed relational write, the host hands the committed
//!    row to the matching mutation method.
//! 3. Queries run against the in-memory graph only.
//!
//! A crash between steps 2a (commit) and 2b (mutation) leaves the graph
//! stale until the next restart rebuilds it. The graph ranks; it never
//! holds authoritative state.
//!
//! ## Failure policy
//!
//! Mutation methods never return errors. A precondition violation
//! (duplicate id, unknown id, unresolved endpoint) is logged and leaves
//! the graph exactly as it was. Every check runs before the first write.

pub mod mutation;
pub mod query;
pub mod shared;

use hashbrown::HashMap;
use tracing::{debug, error, info};

use crate::config::{GraphConfig, Weights, DISCOVERY_MIN_DEPTH};
use crate::graph::{Graph, SearchOptions};
use crate::model::*;
use crate::source::{RelationalSource, Snapshot};
use crate::{Error, Result};

pub use mutation::Mutation;
pub use query::{EventHit, EventQuery};
pub use shared::SharedGraph;

/// Index sizes and graph totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub users: usize,
    pub events: usize,
    pub posts: usize,
    pub relations: usize,
    pub likes: usize,
    pub comments: usize,
    /// Root included.
    pub nodes: usize,
    pub linked_edges: usize,
}

/// Owns the graph and the relational-id indices into it.
///
/// Every id in an index maps to a linked element; removing the element
/// removes the entry in the same call.
#[derive(Debug, Clone)]
pub struct GraphManager {
    graph: Graph,
    weights: Weights,
    default_limit: usize,
    users: HashMap<RowId, NodeId>,
    events: HashMap<RowId, NodeId>,
    /// Post edges, keyed by event id.
    posts: HashMap<RowId, EdgeId>,
    relations: HashMap<RowId, EdgeId>,
    likes: HashMap<RowId, EdgeId>,
    comments: HashMap<RowId, EdgeId>,
}

impl Default for GraphManager {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}

impl GraphManager {
    /// An empty manager: root node only. Call `initialize` before serving.
    pub fn new(config: GraphConfig) -> Self {
        Self {
            graph: Graph::new(),
            weights: config.weights,
            default_limit: config.default_limit,
            users: HashMap::new(),
            events: HashMap::new(),
            posts: HashMap::new(),
            relations: HashMap::new(),
            likes: HashMap::new(),
            comments: HashMap::new(),
        }
    }

    // ========================================================================
    // Bulk load
    // ========================================================================

    /// Rebuild the graph from one bulk read of `source`.
    ///
    /// On error the manager is left untouched.
    pub async fn initialize<S: RelationalSource + ?Sized>(&mut self, source: &S) -> Result<()> {
        let snapshot = source.snapshot().await?;
        self.load(snapshot);
        Ok(())
    }

    /// Replace the graph with one built from `snapshot`.
    ///
    /// Rows referring to something the snapshot does not contain are
    /// skipped; partial data is expected here, so they are not errors.
    pub fn load(&mut self, snapshot: Snapshot) {
        let config = GraphConfig { weights: self.weights, default_limit: self.default_limit };
        *self = Self::new(config);

        let Snapshot { users, events, relations, reactions, comments } = snapshot;

        for row in users {
            if self.users.contains_key(&row.id) {
                debug!(user_id = row.id, "bulk load: duplicate user skipped");
                continue;
            }
            self.build_user(row);
        }

        for row in relations {
            match self.follow_endpoints(&row) {
                Ok((followed, follower)) => self.build_follow(row, followed, follower),
                Err(err) => debug!(relation_id = row.id, %err, "bulk load: relation skipped"),
            }
        }

        for row in events {
            if self.events.contains_key(&row.id) {
                debug!(event_id = row.id, "bulk load: duplicate event skipped");
                continue;
            }
            let author = self.users.get(&row.user_id).copied();
            if author.is_none() {
                debug!(event_id = row.id, user_id = row.user_id, "bulk load: event author not mirrored, post edge skipped");
            }
            self.build_event(row, author);
        }

        // Comments first: likes on comments resolve through them.
        for row in comments {
            let id = row.id;
            if let Err(err) = self.try_add_comment(row) {
                debug!(comment_id = id, %err, "bulk load: comment skipped");
            }
        }

        for row in reactions {
            if !row.value.is_like() {
                continue;
            }
            let id = row.id;
            if let Err(err) = self.try_add_like(row) {
                debug!(reaction_id = id, %err, "bulk load: like skipped");
            }
        }

        let stats = self.stats();
        info!(
            users = stats.users,
            events = stats.events,
            relations = stats.relations,
            likes = stats.likes,
            comments = stats.comments,
            linked_edges = stats.linked_edges,
            "proximity graph initialized"
        );
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// A newly registered user.
    pub fn add_user(&mut self, row: UserRow) {
        let id = row.id;
        report("add user", id, self.try_add_user(row));
    }

    /// A follow relation was created (or re-created under the same id).
    pub fn follow_user(&mut self, row: RelationRow) {
        let id = row.id;
        report("follow user", id, self.try_follow_user(row));
    }

    /// A follow relation was deleted.
    pub fn unfollow_user(&mut self, row: &RelationRow) {
        report("unfollow user", row.id, self.try_unfollow_user(row));
    }

    /// A newly posted event.
    pub fn add_event(&mut self, row: EventRow) {
        let id = row.id;
        report("add event", id, self.try_add_event(row));
    }

    /// A newly created reaction. Only likes reach the graph.
    pub fn add_like(&mut self, row: ReactionRow) {
        let id = row.id;
        report("add like", id, self.try_add_like(row));
    }

    /// An existing reaction changed value.
    pub fn update_like(&mut self, row: ReactionRow) {
        let id = row.id;
        report("update like", id, self.try_update_like(row));
    }

    /// A newly posted comment.
    pub fn add_comment(&mut self, row: CommentRow) {
        let id = row.id;
        report("add comment", id, self.try_add_comment(row));
    }

    /// A comment was deleted.
    pub fn delete_comment(&mut self, row: &CommentRow) {
        report("delete comment", row.id, self.try_delete_comment(row));
    }

    /// Refresh the mirrored row of a known user.
    pub fn update_user(&mut self, row: UserRow) {
        let id = row.id;
        report("update user", id, self.try_update_user(row));
    }

    /// Refresh the mirrored row of a known event.
    pub fn update_event(&mut self, row: EventRow) {
        let id = row.id;
        report("update event", id, self.try_update_event(row));
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Events socially close to `user_id`, nearest first, at least
    /// [`DISCOVERY_MIN_DEPTH`] hops away. Unknown or absent users browse
    /// from the root.
    pub fn find_events(&self, user_id: Option<RowId>, query: &EventQuery) -> Vec<EventHit> {
        self.search_events(user_id, query, DISCOVERY_MIN_DEPTH)
    }

    /// `find_events` with an explicit minimum depth.
    pub fn search_events(&self, user_id: Option<RowId>, query: &EventQuery, min_depth: usize) -> Vec<EventHit> {
        let entry = self.entry_for(user_id);
        let count = query.limit.unwrap_or(self.default_limit);

        self.graph
            .closest(entry, SearchOptions::new(min_depth, count), |node| query.matches(node))
            .into_iter()
            .filter_map(|path| {
                let node = self.graph.node(path.end())?;
                let event = node.payload().as_event()?.clone();
                Some(EventHit { event, distance: path.distance, depth: path.depth() })
            })
            .collect()
    }

    /// The node a search for `user_id` starts from.
    pub fn entry_for(&self, user_id: Option<RowId>) -> NodeId {
        user_id
            .and_then(|id| self.users.get(&id).copied())
            .unwrap_or_else(|| self.graph.root())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn user_node(&self, id: RowId) -> Option<NodeId> {
        self.users.get(&id).copied()
    }

    pub fn event_node(&self, id: RowId) -> Option<NodeId> {
        self.events.get(&id).copied()
    }

    pub fn post_edge(&self, event_id: RowId) -> Option<EdgeId> {
        self.posts.get(&event_id).copied()
    }

    pub fn relation_edge(&self, id: RowId) -> Option<EdgeId> {
        self.relations.get(&id).copied()
    }

    pub fn like_edge(&self, id: RowId) -> Option<EdgeId> {
        self.likes.get(&id).copied()
    }

    pub fn comment_edge(&self, id: RowId) -> Option<EdgeId> {
        self.comments.get(&id).copied()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            users: self.users.len(),
            events: self.events.len(),
            posts: self.posts.len(),
            relations: self.relations.len(),
            likes: self.likes.len(),
            comments: self.comments.len(),
            nodes: self.graph.node_count(),
            linked_edges: self.graph.linked_edge_count(),
        }
    }

    // ========================================================================
    // Checked mutations (every check precedes the first write)
    // ========================================================================

    fn try_add_user(&mut self, row: UserRow) -> Result<()> {
        ensure_absent(&self.users, EntityKind::User, row.id)?;
        self.build_user(row);
        Ok(())
    }

    fn try_follow_user(&mut self, row: RelationRow) -> Result<()> {
        let (followed, follower) = self.follow_endpoints(&row)?;
        self.build_follow(row, followed, follower);
        Ok(())
    }

    fn try_unfollow_user(&mut self, row: &RelationRow) -> Result<()> {
        let edge = self.relations.remove(&row.id).ok_or(Error::NotIndexed {
            kind: EntityKind::Relation,
            id: row.id,
        })?;
        self.graph.release_edge(edge);
        Ok(())
    }

    fn try_add_event(&mut self, row: EventRow) -> Result<()> {
        ensure_absent(&self.events, EntityKind::Event, row.id)?;
        let author = self.indexed_user(row.user_id)?;
        self.build_event(row, Some(author));
        Ok(())
    }

    fn try_add_like(&mut self, row: ReactionRow) -> Result<()> {
        ensure_absent(&self.likes, EntityKind::Like, row.id)?;
        if !row.value.is_like() {
            debug!(reaction_id = row.id, value = ?row.value, "reaction is not a like, not materialized");
            return Ok(());
        }
        self.build_like(row)
    }

    fn try_update_like(&mut self, row: ReactionRow) -> Result<()> {
        if row.value.is_like() {
            ensure_absent(&self.likes, EntityKind::Like, row.id)?;
            return self.build_like(row);
        }
        match self.likes.remove(&row.id) {
            Some(edge) => self.graph.release_edge(edge),
            None => debug!(reaction_id = row.id, "reaction was not a like, nothing to remove"),
        }
        Ok(())
    }

    fn try_add_comment(&mut self, row: CommentRow) -> Result<()> {
        ensure_absent(&self.comments, EntityKind::Comment, row.id)?;
        let event_id = row.event_id().ok_or_else(|| {
            Error::DanglingReference(format!("comment {} is not attached to an event", row.id))
        })?;
        let author = self.indexed_user(row.user_id)?;
        let event = self.indexed_event(event_id)?;

        let id = row.id;
        let edge = self.graph.create_edge(EntityKind::Comment, Payload::Comment(row));
        self.graph.link(edge, author, event).set_weight(self.weights.comment);
        self.comments.insert(id, edge);
        Ok(())
    }

    fn try_delete_comment(&mut self, row: &CommentRow) -> Result<()> {
        let edge = self.comments.remove(&row.id).ok_or(Error::NotIndexed {
            kind: EntityKind::Comment,
            id: row.id,
        })?;
        self.graph.release_edge(edge);
        Ok(())
    }

    fn try_update_user(&mut self, row: UserRow) -> Result<()> {
        let node = self.indexed_user(row.id)?;
        self.graph.replace_node_payload(node, Payload::User(row));
        Ok(())
    }

    fn try_update_event(&mut self, row: EventRow) -> Result<()> {
        let node = self.indexed_event(row.id)?;
        self.graph.replace_node_payload(node, Payload::Event(row));
        Ok(())
    }

    // ========================================================================
    // Builders (infallible; callers have checked preconditions)
    // ========================================================================

    fn build_user(&mut self, row: UserRow) {
        let id = row.id;
        let node = self.graph.create_node(EntityKind::User, Payload::User(row));
        self.link_root(node);
        self.users.insert(id, node);
    }

    fn build_event(&mut self, row: EventRow, author: Option<NodeId>) {
        let id = row.id;
        let node = self.graph.create_node(EntityKind::Event, Payload::Event(row));
        self.link_root(node);
        self.events.insert(id, node);

        if let Some(author) = author {
            let post = self.graph.create_edge(EntityKind::Post, Payload::Empty);
            self.graph.link(post, author, node).set_weight(self.weights.post);
            self.posts.insert(id, post);
        }
    }

    /// Create the follow edge on first sight of the id, relink it after.
    fn build_follow(&mut self, row: RelationRow, followed: NodeId, follower: NodeId) {
        let id = row.id;
        let edge = match self.relations.get(&id) {
            Some(&edge) => {
                self.graph.replace_edge_payload(edge, Payload::Relation(row));
                edge
            }
            None => self.graph.create_edge(EntityKind::Relation, Payload::Relation(row)),
        };
        self.graph.link(edge, followed, follower).set_weight(self.weights.follow);
        self.relations.insert(id, edge);
    }

    fn build_like(&mut self, row: ReactionRow) -> Result<()> {
        let (liker, event, weight) = self.like_endpoints(&row)?;
        let id = row.id;
        let edge = self.graph.create_edge(EntityKind::Like, Payload::Reaction(row));
        self.graph.link(edge, liker, event).set_weight(weight);
        self.likes.insert(id, edge);
        Ok(())
    }

    fn link_root(&mut self, node: NodeId) {
        let root = self.graph.root();
        let edge = self.graph.create_edge(EntityKind::Root, Payload::Empty);
        self.graph.link(edge, root, node).set_weight(self.weights.root);
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    fn indexed_user(&self, id: RowId) -> Result<NodeId> {
        self.user_node(id).ok_or(Error::NotIndexed { kind: EntityKind::User, id })
    }

    fn indexed_event(&self, id: RowId) -> Result<NodeId> {
        self.event_node(id).ok_or(Error::NotIndexed { kind: EntityKind::Event, id })
    }

    /// (followed, follower)
    fn follow_endpoints(&self, row: &RelationRow) -> Result<(NodeId, NodeId)> {
        Ok((self.indexed_user(row.user_id)?, self.indexed_user(row.follower_id)?))
    }

    /// (liker, event, weight). A like on a comment lands on the comment's
    /// parent event.
    fn like_endpoints(&self, row: &ReactionRow) -> Result<(NodeId, NodeId, Weight)> {
        let liker = self.indexed_user(row.user_id)?;
        match row.target {
            ReactionTarget::Event => {
                Ok((liker, self.indexed_event(row.relation_id)?, self.weights.like_event))
            }
            ReactionTarget::Comment => {
                let comment = self
                    .comments
                    .get(&row.relation_id)
                    .and_then(|edge| self.graph.edge(*edge))
                    .and_then(|edge| edge.payload().as_comment())
                    .ok_or_else(|| {
                        Error::DanglingReference(format!(
                            "reaction {} likes comment {} which is not mirrored",
                            row.id, row.relation_id
                        ))
                    })?;
                let event_id = comment.event_id().ok_or_else(|| {
                    Error::DanglingReference(format!("comment {} has no parent event", comment.id))
                })?;
                Ok((liker, self.indexed_event(event_id)?, self.weights.like_comment))
            }
        }
    }
}

fn ensure_absent<V>(index: &HashMap<RowId, V>, kind: EntityKind, id: RowId) -> Result<()> {
    if index.contains_key(&id) {
        return Err(Error::Duplicate { kind, id });
    }
    Ok(())
}

fn report(op: &'static str, id: RowId, result: Result<()>) {
    match result {
        Ok(()) => debug!(id, "graph {op}"),
        Err(err) => error!(id, %err, "graph {op} rejected"),
    }
}

// ============================================================================
// Tests
// ============================================================================
