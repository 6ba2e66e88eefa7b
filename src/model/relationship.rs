//! Edge as returned by the graph client.

use serde::{Deserialize, Serialize};
use super::{PropertyMap, WireValue};

/// A directed edge with its rank and one flat property group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireEdge {
    pub edge_type: String,
    pub src: WireValue,
    pub dst: WireValue,
    pub rank: i64,
    pub properties: PropertyMap,
}

impl WireEdge {
    pub fn new(edge_type: impl Into<String>, src: impl Into<WireValue>, dst: impl Into<WireValue>) -> Self {
        Self {
            edge_type: edge_type.into(),
            src: src.into(),
            dst: dst.into(),
            rank: 0,
            properties: PropertyMap::new(),
        }
    }

    pub fn with_rank(mut self, rank: i64) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<WireValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.properties.get(key)
    }
}
