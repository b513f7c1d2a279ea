//! Event discovery queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{EntityKind, EventRow, Node};

/// Filter for [`super::GraphManager::find_events`].
///
/// The keyword is matched case-insensitively as a substring of the title
/// or the description. `before` keeps events created strictly earlier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawEventQuery")]
pub struct EventQuery {
    /// Stored lowercased; `None` matches everything.
    keyword: Option<String>,
    pub before: Option<DateTime<Utc>>,
    /// `None` means the manager's configured default.
    pub limit: Option<usize>,
}

/// Wire form of [`EventQuery`]; the keyword is normalized on conversion.
#[derive(Deserialize)]
struct RawEventQuery {
    #[serde(default)]
    keyword: Option<String>,
    #[serde(default)]
    before: Option<DateTime<Utc>>,
    #[serde(default)]
    limit: Option<usize>,
}

impl From<RawEventQuery> for EventQuery {
    fn from(raw: RawEventQuery) -> Self {
        let query = EventQuery { keyword: None, before: raw.before, limit: raw.limit };
        match raw.keyword {
            Some(keyword) => query.keyword(keyword),
            None => query,
        }
    }
}

impl EventQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty keyword is the same as no keyword.
    pub fn keyword(mut self, keyword: impl AsRef<str>) -> Self {
        let keyword = keyword.as_ref().trim();
        self.keyword = (!keyword.is_empty()).then(|| keyword.to_lowercase());
        self
    }

    pub fn before(mut self, cutoff: DateTime<Utc>) -> Self {
        self.before = Some(cutoff);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn keyword_str(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// The search predicate. Pure; reads only the node's own row.
    pub fn matches(&self, node: &Node) -> bool {
        if node.kind() != EntityKind::Event {
            return false;
        }
        let Some(event) = node.payload().as_event() else {
            return false;
        };
        self.matches_keyword(event) && self.before.is_none_or(|cutoff| event.created_at < cutoff)
    }

    fn matches_keyword(&self, event: &EventRow) -> bool {
        match &self.keyword {
            None => true,
            Some(key) => {
                event.title.to_lowercase().contains(key.as_str())
                    || event.description.to_lowercase().contains(key.as_str())
            }
        }
    }
}

/// One discovered event, nearest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventHit {
    /// The mirrored row. Re-resolve against the store for anything beyond
    /// ranking.
    pub event: EventRow,
    /// Cumulative edge weight from the entry node.
    pub distance: u64,
    /// Edges from the entry node.
    pub depth: usize,
}
