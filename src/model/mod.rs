//! # Proximity Graph Model
//!
//! Plain data for the in-memory graph: units, nodes, edges, paths, and the
//! typed relational rows they mirror.
//!
//! Design rule: no locks, no I/O, no async here. Link bookkeeping that
//! touches more than one element lives in [`crate::graph`].

pub mod unit;
pub mod node;
pub mod edge;
pub mod path;
pub mod record;
pub mod value;
pub mod property_map;

pub use unit::{EntityKind, Payload, Unit};
pub use node::{Node, NodeId};
pub use edge::{Edge, EdgeId, Link, Weight};
pub use path::Path;
pub use record::{
    CommentRow, CommentTarget, EventRow, ReactionRow, ReactionTarget,
    ReactionValue, RelationRow, RowId, UserRow,
};
pub use value::Value;
pub use property_map::PropertyMap;
