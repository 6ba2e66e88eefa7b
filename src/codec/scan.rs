//! Scan: wire value → native field.
//!
//! Dispatch is on the wire tag crossed with the destination's write view.
//! NULL resets any destination. Options are scanned through; an absent one
//! is only filled when the inner scan succeeds. `AnyValue` destinations
//! take the canonical form of any tag.
//!
//! Vertex and edge values resolve the destination's descriptor through the
//! resolver, so nested record types are parsed and cached on first use.

use chrono::FixedOffset;

use super::format::{float_text, EMPTY_LITERAL};
use super::AnyValue;
use crate::model::WireValue;
use crate::reflect::{Dest, Field};
use crate::resolver::SchemaResolver;
use crate::{Error, Result};

/// Write `value` into `dest`.
///
/// Containers are filled all-or-nothing. Records stop at the first failing
/// field; fields written before it keep their new values.
pub fn scan(resolver: &SchemaResolver, value: &WireValue, dest: &mut dyn Field) -> Result<()> {
    if value.is_null() {
        dest.reset();
        return Ok(());
    }
    let tz = resolver.config().timezone;
    match dest.as_dest() {
        Dest::Unsettable(name) => Err(Error::Unsettable(format!(
            "cannot scan {} into read-only {name}",
            value.type_name()
        ))),
        Dest::Indirect(slot) => slot.scan_staged(&mut |inner| scan(resolver, value, inner)),
        Dest::Any(any) => {
            *any = AnyValue::from_wire(value, &tz)?;
            Ok(())
        }
        dest => scan_into(resolver, value, dest, &tz),
    }
}

fn scan_into(resolver: &SchemaResolver, value: &WireValue, dest: Dest<'_>, tz: &FixedOffset) -> Result<()> {
    match (value, dest) {
        (WireValue::Empty, Dest::Text(s)) => *s = EMPTY_LITERAL.to_string(),

        (WireValue::Bool(b), Dest::Bool(slot)) => *slot = *b,
        (WireValue::Bool(b), Dest::Text(s)) => *s = b.to_string(),

        (WireValue::Int(i), Dest::Int(slot)) => slot.set_i64(*i),
        (WireValue::Int(i), Dest::Float(slot)) => slot.set_f64(*i as f64),
        (WireValue::Int(i), Dest::Text(s)) => *s = i.to_string(),

        (WireValue::Float(f), Dest::Float(slot)) => slot.set_f64(*f),
        (WireValue::Float(f), Dest::Int(slot)) => slot.set_f64(*f),
        (WireValue::Float(f), Dest::Text(s)) => *s = float_text(*f),

        (WireValue::String(v), Dest::Text(s)) => s.clone_from(v),

        (WireValue::Date(d), Dest::Text(s)) => *s = d.in_zone(tz)?.format("%Y-%m-%d").to_string(),
        (WireValue::Date(d), Dest::Date(slot)) => *slot = d.in_zone(tz)?.date_naive(),
        (WireValue::Date(d), Dest::DateTime(slot)) => slot.set_instant(d.in_zone(tz)?),

        (WireValue::Time(t), Dest::Text(s)) => *s = t.in_zone(tz)?.format("%H:%M:%S%.6f").to_string(),
        (WireValue::Time(t), Dest::Time(slot)) => *slot = t.in_zone(tz)?,

        (WireValue::DateTime(dt), Dest::Text(s)) => {
            *s = dt.in_zone(tz)?.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
        }
        (WireValue::DateTime(dt), Dest::DateTime(slot)) => slot.set_instant(dt.in_zone(tz)?),
        (WireValue::DateTime(dt), Dest::Date(slot)) => *slot = dt.in_zone(tz)?.date_naive(),

        (WireValue::Vertex(vertex), Dest::Record(record)) => {
            let descriptor = resolver.vertex_of(record.record_type())?;
            descriptor.scan(resolver, vertex, record)?;
        }
        (WireValue::Edge(edge), Dest::Record(record)) => {
            let descriptor = resolver.edge_of(record.record_type())?;
            descriptor.scan(resolver, edge, record)?;
        }
        (WireValue::Vertex(_) | WireValue::Edge(_), other) => {
            return Err(Error::Structural {
                type_name: other.kind_name().to_string(),
                message: format!("a {} can only be scanned into a record", value.type_name()),
            });
        }

        (WireValue::List(items) | WireValue::Set(items), Dest::Seq(slot)) => {
            slot.fill(items.len(), &mut |i, elem| scan(resolver, &items[i], elem))?;
        }
        (WireValue::Map(entries), Dest::Map(slot)) => {
            let entries: Vec<(&str, &WireValue)> = entries.iter().map(|(k, v)| (k.as_str(), v)).collect();
            let keys: Vec<&str> = entries.iter().map(|(k, _)| *k).collect();
            slot.fill(&keys, &mut |i, elem| scan(resolver, entries[i].1, elem))?;
        }

        (value, dest) => {
            return Err(Error::UnsupportedConversion {
                from: value.type_name().to_string(),
                to: dest.kind_name().to_string(),
            });
        }
    }
    Ok(())
}
