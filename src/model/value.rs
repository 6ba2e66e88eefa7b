//! Self-describing wire value, as handed over by the graph client.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{WireDate, WireDateTime, WireEdge, WireTime, WireVertex};
use crate::codec::EMPTY_LITERAL;

/// Dynamically tagged value returned by the NebulaGraph driver.
///
/// Covers every tag the codec understands:
/// - Scalars: Null, Empty, Bool, Int, Float, String
/// - Temporal: Date, Time, DateTime (all UTC on the wire)
/// - Graph: Vertex, Edge
/// - Containers: List, Map, Set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum WireValue {
    Null,
    /// Placeholder NebulaGraph emits for a property that was never written.
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),

    // Temporal types
    Date(WireDate),
    Time(WireTime),
    DateTime(WireDateTime),

    // Graph types
    Vertex(Box<WireVertex>),
    Edge(Box<WireEdge>),

    // Containers
    List(Vec<WireValue>),
    Map(HashMap<String, WireValue>),
    /// De-duplicated by the server; order is whatever the driver produced.
    Set(Vec<WireValue>),
}

// ============================================================================
// Type checking
// ============================================================================

impl WireValue {
    /// Tag name, as the driver spells it.
    pub fn type_name(&self) -> &'static str {
        match self {
            WireValue::Null => "null",
            WireValue::Empty => "empty",
            WireValue::Bool(_) => "bool",
            WireValue::Int(_) => "int",
            WireValue::Float(_) => "float",
            WireValue::String(_) => "string",
            WireValue::Date(_) => "date",
            WireValue::Time(_) => "time",
            WireValue::DateTime(_) => "datetime",
            WireValue::Vertex(_) => "vertex",
            WireValue::Edge(_) => "edge",
            WireValue::List(_) => "list",
            WireValue::Map(_) => "map",
            WireValue::Set(_) => "set",
        }
    }

    pub fn is_null(&self) -> bool { matches!(self, WireValue::Null) }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            WireValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            WireValue::String(s) => Some(s),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for WireValue { fn from(v: bool) -> Self { WireValue::Bool(v) } }
impl From<i32> for WireValue { fn from(v: i32) -> Self { WireValue::Int(v as i64) } }
impl From<i64> for WireValue { fn from(v: i64) -> Self { WireValue::Int(v) } }
impl From<f64> for WireValue { fn from(v: f64) -> Self { WireValue::Float(v) } }
impl From<String> for WireValue { fn from(v: String) -> Self { WireValue::String(v) } }
impl From<&str> for WireValue { fn from(v: &str) -> Self { WireValue::String(v.to_owned()) } }
impl From<WireDate> for WireValue { fn from(v: WireDate) -> Self { WireValue::Date(v) } }
impl From<WireTime> for WireValue { fn from(v: WireTime) -> Self { WireValue::Time(v) } }
impl From<WireDateTime> for WireValue { fn from(v: WireDateTime) -> Self { WireValue::DateTime(v) } }
impl From<WireVertex> for WireValue { fn from(v: WireVertex) -> Self { WireValue::Vertex(Box::new(v)) } }
impl From<WireEdge> for WireValue { fn from(v: WireEdge) -> Self { WireValue::Edge(Box::new(v)) } }
impl<T: Into<WireValue>> From<Vec<T>> for WireValue {
    fn from(v: Vec<T>) -> Self { WireValue::List(v.into_iter().map(Into::into).collect()) }
}
impl<T: Into<WireValue>> From<Option<T>> for WireValue {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(WireValue::Null) }
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireValue::Null => write!(f, "NULL"),
            WireValue::Empty => f.write_str(EMPTY_LITERAL),
            WireValue::Bool(b) => write!(f, "{b}"),
            WireValue::Int(i) => write!(f, "{i}"),
            WireValue::Float(v) => write!(f, "{v}"),
            WireValue::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            WireValue::Date(d) => write!(f, "{d}"),
            WireValue::Time(t) => write!(f, "{t}"),
            WireValue::DateTime(dt) => write!(f, "{dt}"),
            WireValue::Vertex(v) => write!(f, "({})", v.vid),
            WireValue::Edge(e) => write!(f, "{}->{}@{}", e.src, e.dst, e.rank),
            WireValue::List(l) => {
                write!(f, "[")?;
                for (i, v) in l.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            WireValue::Set(s) => {
                write!(f, "{{")?;
                for (i, v) in s.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{v}")?;
                }
                write!(f, "}}")
            }
            WireValue::Map(m) => {
                write!(f, "{{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
