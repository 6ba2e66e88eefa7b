//! Vertex as returned by the graph client.

use serde::{Deserialize, Serialize};
use super::{PropertyMap, WireValue};

/// One tag instance attached to a wire vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireTag {
    pub name: String,
    pub properties: PropertyMap,
}

/// A vertex: its identifier plus one property group per tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireVertex {
    /// `String` or `Int`, depending on the space's vid type.
    pub vid: WireValue,
    pub tags: Vec<WireTag>,
}

impl WireVertex {
    pub fn new(vid: impl Into<WireValue>) -> Self {
        Self {
            vid: vid.into(),
            tags: Vec::new(),
        }
    }

    /// Attach a tag, or extend it when it is already present.
    pub fn with_tag<K, V>(mut self, tag: impl Into<String>, props: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<WireValue>,
    {
        let tag = tag.into();
        let props = props.into_iter().map(|(k, v)| (k.into(), v.into()));
        match self.tags.iter_mut().find(|t| t.name == tag) {
            Some(existing) => existing.properties.extend(props),
            None => self.tags.push(WireTag { name: tag, properties: props.collect() }),
        }
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.name == tag)
    }

    /// Property group of one tag.
    pub fn properties(&self, tag: &str) -> Option<&PropertyMap> {
        self.tags.iter().find(|t| t.name == tag).map(|t| &t.properties)
    }
}
