//! Process-wide graph configuration.
//!
//! The weight table is policy: it is fixed when the manager is built and
//! never varies per call. Defaults reproduce the production table.

use serde::{Deserialize, Serialize};

use crate::model::Weight;
use crate::Result;

/// Minimum traversal depth used by event discovery. Depth 1 from a user
/// only reaches the user's own events, so discovery starts one hop further.
pub const DISCOVERY_MIN_DEPTH: usize = 2;

/// Edge weight per relation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    /// root -> user / event
    pub root: Weight,
    /// followed user -> follower
    pub follow: Weight,
    /// author -> event
    pub post: Weight,
    /// commenter -> event
    pub comment: Weight,
    /// liker -> event
    pub like_event: Weight,
    /// liker -> parent event of the liked comment
    pub like_comment: Weight,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            root: Weight::from_const(100),
            follow: Weight::from_const(1),
            post: Weight::from_const(2),
            comment: Weight::from_const(4),
            like_event: Weight::from_const(4),
            like_comment: Weight::from_const(6),
        }
    }
}

/// Configuration for a [`crate::GraphManager`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub weights: Weights,
    /// Result cap for `find_events` when the query sets none.
    pub default_limit: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            default_limit: 20,
        }
    }
}

impl GraphConfig {
    /// Parse from JSON. Missing keys keep their defaults; a zero weight is
    /// rejected.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_policy_table() {
        let w = Weights::default();
        assert_eq!(
            [w.root, w.follow, w.post, w.comment, w.like_event, w.like_comment].map(Weight::get),
            [100, 1, 2, 4, 4, 6],
        );
        assert_eq!(GraphConfig::default().default_limit, 20);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = GraphConfig::from_json_str(r#"{"weights":{"follow":3}}"#).unwrap();
        assert_eq!(cfg.weights.follow.get(), 3);
        assert_eq!(cfg.weights.root.get(), 100);
        assert_eq!(cfg.default_limit, 20);
    }

    #[test]
    fn test_zero_weight_rejected() {
        let err = GraphConfig::from_json_str(r#"{"weights":{"post":0}}"#).unwrap_err();
        assert!(err.to_string().contains("weight"), "unexpected error: {err}");
    }
}
