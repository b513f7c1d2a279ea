//! PropertyMap: the open key-value view of a mirrored row.

use std::collections::BTreeMap;
use super::Value;

/// A map of column names to values. Ordered so rendered rows are stable.
pub type PropertyMap = BTreeMap<String, Value>;

/// Column-by-column builder used by the row renderers.
pub(crate) struct PropertyWriter(PropertyMap);

impl PropertyWriter {
    pub(crate) fn new() -> Self {
        Self(PropertyMap::new())
    }

    pub(crate) fn put(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub(crate) fn finish(self) -> PropertyMap {
        self.0
    }
}
