//! PropertyMap: the key-value group on vertices (per tag) and edges.

use std::collections::HashMap;
use super::WireValue;

/// A map of property names to wire values.
pub type PropertyMap = HashMap<String, WireValue>;

/// Build a property map from (key, value) pairs.
pub fn property_map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> PropertyMap
where
    K: Into<String>,
    V: Into<WireValue>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
