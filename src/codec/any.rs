//! `AnyValue`: a destination that takes whatever the wire sends.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

use crate::model::{WireEdge, WireValue, WireVertex};
use crate::reflect::{Dest, Field, Native, Shape};
use crate::Result;

/// Canonical native form of a wire value, chosen per wire tag.
///
/// Temporal values are already moved into the configured zone.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AnyValue {
    /// Wire `null` and `empty`.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(DateTime<FixedOffset>),
    Vertex(WireVertex),
    Edge(WireEdge),
    List(Vec<AnyValue>),
    Map(HashMap<String, AnyValue>),
    Set(Vec<AnyValue>),
}

impl AnyValue {
    pub fn from_wire(value: &WireValue, tz: &FixedOffset) -> Result<Self> {
        let any = match value {
            WireValue::Null | WireValue::Empty => AnyValue::Null,
            WireValue::Bool(b) => AnyValue::Bool(*b),
            WireValue::Int(i) => AnyValue::Int(*i),
            WireValue::Float(f) => AnyValue::Float(*f),
            WireValue::String(s) => AnyValue::String(s.clone()),
            WireValue::Date(d) => AnyValue::Date(d.in_zone(tz)?.date_naive()),
            WireValue::Time(t) => AnyValue::Time(t.in_zone(tz)?),
            WireValue::DateTime(dt) => AnyValue::DateTime(dt.in_zone(tz)?),
            WireValue::Vertex(v) => AnyValue::Vertex((**v).clone()),
            WireValue::Edge(e) => AnyValue::Edge((**e).clone()),
            WireValue::List(items) => AnyValue::List(Self::from_wire_all(items, tz)?),
            WireValue::Set(items) => AnyValue::Set(Self::from_wire_all(items, tz)?),
            WireValue::Map(entries) => AnyValue::Map(
                entries
                    .iter()
                    .map(|(k, v)| Ok((k.clone(), Self::from_wire(v, tz)?)))
                    .collect::<Result<_>>()?,
            ),
        };
        Ok(any)
    }

    fn from_wire_all(items: &[WireValue], tz: &FixedOffset) -> Result<Vec<Self>> {
        items.iter().map(|v| Self::from_wire(v, tz)).collect()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AnyValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AnyValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AnyValue::Float(f) => Some(*f),
            AnyValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AnyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of a list or set.
    pub fn as_slice(&self) -> Option<&[AnyValue]> {
        match self {
            AnyValue::List(items) | AnyValue::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&AnyValue> {
        match self {
            AnyValue::Map(entries) => entries.get(key),
            _ => None,
        }
    }
}

impl Field for AnyValue {
    fn shape() -> Shape {
        Shape::Any
    }

    fn as_native(&self) -> Native<'_> {
        match self {
            AnyValue::Null => Native::Indirect(None),
            AnyValue::Bool(b) => Native::Bool(*b),
            AnyValue::Int(i) => Native::Int(*i),
            AnyValue::Float(f) => Native::Float64(*f),
            AnyValue::String(s) => Native::Text(s),
            AnyValue::Date(d) => Native::Date(*d),
            AnyValue::Time(t) => Native::Time(*t),
            AnyValue::DateTime(dt) => Native::DateTime(dt.naive_local()),
            AnyValue::Vertex(_) => Native::Opaque("vertex"),
            AnyValue::Edge(_) => Native::Opaque("edge"),
            AnyValue::List(items) => Native::List(items.iter().map(|v| v as &dyn Field).collect()),
            AnyValue::Set(items) => Native::Set(items.iter().map(|v| v as &dyn Field).collect()),
            AnyValue::Map(entries) => Native::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k as &dyn Field, v as &dyn Field))
                    .collect(),
            ),
        }
    }

    fn as_dest(&mut self) -> Dest<'_> {
        Dest::Any(self)
    }

    fn reset(&mut self) {
        *self = AnyValue::Null;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{WireDate, WireTime};
    use chrono::Offset;

    #[test]
    fn test_from_wire() {
        let utc = chrono::Utc.fix();
        let wire = WireValue::List(vec![WireValue::Int(1), WireValue::Empty, WireValue::from("x")]);
        assert_eq!(
            AnyValue::from_wire(&wire, &utc).unwrap(),
            AnyValue::List(vec![AnyValue::Int(1), AnyValue::Null, AnyValue::String("x".into())])
        );
    }

    #[test]
    fn test_temporal_zone_shift() {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        let date = AnyValue::from_wire(&WireValue::Date(WireDate::new(2024, 3, 1)), &tz).unwrap();
        assert_eq!(date, AnyValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        let time = AnyValue::from_wire(&WireValue::Time(WireTime::new(20, 0, 0, 0)), &tz).unwrap();
        assert_eq!(time, AnyValue::Time(NaiveTime::from_hms_opt(4, 0, 0).unwrap()));
    }
}
