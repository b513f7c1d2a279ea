//! # social-proximity: In-Memory Social Proximity Graph
//!
//! A live, weighted graph mirroring users, events, follows, likes and
//! comments from a relational store, answering "what is socially close to
//! this user" without touching the store per request.
//!
//! ## Design Principles
//!
//! 1. **Mirror, don't own**: the store is the system of record. The graph is
//!    rebuilt on start and patched after every committed write.
//! 2. **Arena, not pointers**: nodes and edges refer to each other by id.
//! 3. **Typed rows**: each element carries the row it mirrors as a tagged
//!    union, resolved once at construction.
//! 4. **Never fail a request**: mutations log and skip on bad input.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use social_proximity::{EventQuery, GraphConfig, MemorySource, SharedGraph};
//!
//! # async fn example() -> social_proximity::Result<()> {
//! let source = MemorySource::from_json_str(r#"{"users": [], "events": []}"#)?;
//! let graph = SharedGraph::open(&source, GraphConfig::default()).await?;
//!
//! for hit in graph.find_events(Some(42), &EventQuery::new().keyword("jazz")) {
//!     println!("{} at distance {}", hit.event.title, hit.distance);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Edge weights
//!
//! | Relation | Direction | Weight |
//! |----------|-----------|--------|
//! | root | root → user / event | 100 |
//! | follow | followed user → follower | 1 |
//! | post | author → event | 2 |
//! | comment | commenter → event | 4 |
//! | like on event | liker → event | 4 |
//! | like on comment | liker → comment's event | 6 |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod graph;
pub mod manager;
pub mod source;
pub mod config;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Node, Edge, Path, Unit, Payload, EntityKind, Value, PropertyMap,
    NodeId, EdgeId, Link, Weight, RowId,
    UserRow, EventRow, RelationRow, ReactionRow, CommentRow,
    ReactionValue, ReactionTarget, CommentTarget,
};

// ============================================================================
// Re-exports: Graph, Manager, Source, Config
// ============================================================================

pub use graph::{Graph, SearchOptions};
pub use manager::{GraphManager, GraphStats, Mutation, EventQuery, EventHit, SharedGraph};
pub use source::{RelationalSource, MemorySource, Snapshot};
pub use config::{GraphConfig, Weights, DISCOVERY_MIN_DEPTH};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("duplicate {kind} id {id}")]
    Duplicate { kind: EntityKind, id: RowId },

    #[error("{kind} {id} is not in the graph")]
    NotIndexed { kind: EntityKind, id: RowId },

    #[error("dangling reference: {0}")]
    DanglingReference(String),

    #[error("invalid edge weight {0}: must be positive")]
    InvalidWeight(u32),

    #[error("unknown {column} code {code}")]
    UnknownCode { column: &'static str, code: u8 },

    #[error("source error: {0}")]
    Source(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
