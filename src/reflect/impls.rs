//! `Field` implementations for std and chrono types.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::{
    DateTimeSlot, Dest, ElemScan, Field, FloatSlot, IndirectSlot, IntSlot, MapSlot, Native, SeqSlot, Shape,
};
use crate::{Error, Result};

// ============================================================================
// Scalars
// ============================================================================

impl Field for bool {
    fn shape() -> Shape { Shape::Bool }
    fn as_native(&self) -> Native<'_> { Native::Bool(*self) }
    fn as_dest(&mut self) -> Dest<'_> { Dest::Bool(self) }
    fn reset(&mut self) { *self = false; }
}

macro_rules! int_field {
    ($($t:ty => $bits:expr, $signed:expr, $native:ident;)*) => {$(
        impl IntSlot for $t {
            fn set_i64(&mut self, v: i64) { *self = v as $t; }
            fn set_f64(&mut self, v: f64) { *self = v as $t; }
        }

        impl Field for $t {
            fn shape() -> Shape { Shape::Int { bits: $bits, signed: $signed } }
            fn as_native(&self) -> Native<'_> { Native::$native(*self as _) }
            fn as_dest(&mut self) -> Dest<'_> { Dest::Int(self) }
            fn reset(&mut self) { *self = 0; }
        }
    )*};
}

int_field! {
    i8 => 8, true, Int;
    i16 => 16, true, Int;
    i32 => 32, true, Int;
    i64 => 64, true, Int;
    isize => 0, true, Int;
    u8 => 8, false, UInt;
    u16 => 16, false, UInt;
    u32 => 32, false, UInt;
    u64 => 64, false, UInt;
    usize => 0, false, UInt;
}

impl FloatSlot for f32 {
    fn set_f64(&mut self, v: f64) { *self = v as f32; }
}

impl FloatSlot for f64 {
    fn set_f64(&mut self, v: f64) { *self = v; }
}

impl Field for f32 {
    fn shape() -> Shape { Shape::Float32 }
    fn as_native(&self) -> Native<'_> { Native::Float32(*self) }
    fn as_dest(&mut self) -> Dest<'_> { Dest::Float(self) }
    fn reset(&mut self) { *self = 0.0; }
}

impl Field for f64 {
    fn shape() -> Shape { Shape::Float64 }
    fn as_native(&self) -> Native<'_> { Native::Float64(*self) }
    fn as_dest(&mut self) -> Dest<'_> { Dest::Float(self) }
    fn reset(&mut self) { *self = 0.0; }
}

impl Field for String {
    fn shape() -> Shape { Shape::Text }
    fn as_native(&self) -> Native<'_> { Native::Text(self.as_str()) }
    fn as_dest(&mut self) -> Dest<'_> { Dest::Text(self) }
    fn reset(&mut self) { self.clear(); }
}

/// Readable, never writable.
impl Field for &'static str {
    fn shape() -> Shape { Shape::Text }
    fn as_native(&self) -> Native<'_> { Native::Text(*self) }
    fn as_dest(&mut self) -> Dest<'_> { Dest::Unsettable("&'static str") }
    fn reset(&mut self) {}
}

// ============================================================================
// Temporal
// ============================================================================

impl Field for NaiveDate {
    fn shape() -> Shape { Shape::Date }
    fn as_native(&self) -> Native<'_> { Native::Date(*self) }
    fn as_dest(&mut self) -> Dest<'_> { Dest::Date(self) }
    fn reset(&mut self) { *self = NaiveDate::default(); }
}

impl Field for NaiveTime {
    fn shape() -> Shape { Shape::Time }
    fn as_native(&self) -> Native<'_> { Native::Time(*self) }
    fn as_dest(&mut self) -> Dest<'_> { Dest::Time(self) }
    fn reset(&mut self) { *self = NaiveTime::default(); }
}

impl DateTimeSlot for NaiveDateTime {
    fn set_instant(&mut self, instant: DateTime<FixedOffset>) {
        *self = instant.naive_local();
    }
}

impl Field for NaiveDateTime {
    fn shape() -> Shape { Shape::DateTime }
    fn as_native(&self) -> Native<'_> { Native::DateTime(*self) }
    fn as_dest(&mut self) -> Dest<'_> { Dest::DateTime(self) }
    fn reset(&mut self) { *self = NaiveDateTime::default(); }
}

impl DateTimeSlot for DateTime<Utc> {
    fn set_instant(&mut self, instant: DateTime<FixedOffset>) {
        *self = instant.with_timezone(&Utc);
    }
}

impl Field for DateTime<Utc> {
    fn shape() -> Shape { Shape::DateTime }
    fn as_native(&self) -> Native<'_> { Native::Instant(*self) }
    fn as_dest(&mut self) -> Dest<'_> { Dest::DateTime(self) }
    fn reset(&mut self) { *self = DateTime::<Utc>::default(); }
}

impl DateTimeSlot for DateTime<FixedOffset> {
    fn set_instant(&mut self, instant: DateTime<FixedOffset>) {
        *self = instant;
    }
}

/// Rendered in its own offset, like a zoned timestamp.
impl Field for DateTime<FixedOffset> {
    fn shape() -> Shape { Shape::DateTime }
    fn as_native(&self) -> Native<'_> { Native::DateTime(self.naive_local()) }
    fn as_dest(&mut self) -> Dest<'_> { Dest::DateTime(self) }
    fn reset(&mut self) { *self = DateTime::<FixedOffset>::default(); }
}

// ============================================================================
// Sequences
// ============================================================================

fn stage<T: Field + Default>(len: usize, scan: &mut ElemScan<'_>) -> Result<Vec<T>> {
    let mut staged = Vec::with_capacity(len);
    for i in 0..len {
        let mut elem = T::default();
        scan(i, &mut elem)?;
        staged.push(elem);
    }
    Ok(staged)
}

impl<T: Field + Default> SeqSlot for Vec<T> {
    fn fill(&mut self, len: usize, scan: &mut ElemScan<'_>) -> Result<()> {
        *self = stage(len, scan)?;
        Ok(())
    }
}

impl<T: Field + Default> Field for Vec<T> {
    fn shape() -> Shape { Shape::List(Box::new(T::shape())) }
    fn as_native(&self) -> Native<'_> { Native::List(self.iter().map(|e| e as &dyn Field).collect()) }
    fn as_dest(&mut self) -> Dest<'_> { Dest::Seq(self) }
    fn reset(&mut self) { self.clear(); }
}

/// Only the first `N` source elements land; the tail keeps its values.
impl<T: Field + Default, const N: usize> SeqSlot for [T; N] {
    fn fill(&mut self, len: usize, scan: &mut ElemScan<'_>) -> Result<()> {
        let staged = stage::<T>(len.min(N), scan)?;
        for (slot, elem) in self.iter_mut().zip(staged) {
            *slot = elem;
        }
        Ok(())
    }
}

impl<T: Field + Default, const N: usize> Field for [T; N] {
    fn shape() -> Shape { Shape::List(Box::new(T::shape())) }
    fn as_native(&self) -> Native<'_> { Native::List(self.iter().map(|e| e as &dyn Field).collect()) }
    fn as_dest(&mut self) -> Dest<'_> { Dest::Seq(self) }
    fn reset(&mut self) { self.iter_mut().for_each(Field::reset); }
}

impl<T: Field + Default + Eq + Hash> SeqSlot for HashSet<T> {
    fn fill(&mut self, len: usize, scan: &mut ElemScan<'_>) -> Result<()> {
        let staged = stage::<T>(len, scan)?;
        self.clear();
        self.extend(staged);
        Ok(())
    }
}

impl<T: Field + Default + Eq + Hash> Field for HashSet<T> {
    fn shape() -> Shape { Shape::Set(Box::new(T::shape())) }
    fn as_native(&self) -> Native<'_> { Native::Set(self.iter().map(|e| e as &dyn Field).collect()) }
    fn as_dest(&mut self) -> Dest<'_> { Dest::Seq(self) }
    fn reset(&mut self) { self.clear(); }
}

impl<T: Field + Default + Ord> SeqSlot for BTreeSet<T> {
    fn fill(&mut self, len: usize, scan: &mut ElemScan<'_>) -> Result<()> {
        let staged = stage::<T>(len, scan)?;
        self.clear();
        self.extend(staged);
        Ok(())
    }
}

impl<T: Field + Default + Ord> Field for BTreeSet<T> {
    fn shape() -> Shape { Shape::Set(Box::new(T::shape())) }
    fn as_native(&self) -> Native<'_> { Native::Set(self.iter().map(|e| e as &dyn Field).collect()) }
    fn as_dest(&mut self) -> Dest<'_> { Dest::Seq(self) }
    fn reset(&mut self) { self.clear(); }
}

// ============================================================================
// Maps
// ============================================================================

fn stage_entries<K, V>(keys: &[&str], scan: &mut ElemScan<'_>) -> Result<Vec<(K, V)>>
where
    K: Field + Default,
    V: Field + Default,
{
    if !matches!(K::shape(), Shape::Text) {
        return Err(Error::UnsupportedConversion {
            from: "map".into(),
            to: format!("map keyed by {}: map key must be string", K::shape()),
        });
    }
    let mut staged = Vec::with_capacity(keys.len());
    for (i, key) in keys.iter().enumerate() {
        let mut k = K::default();
        match k.as_dest() {
            Dest::Text(text) => text.push_str(key),
            other => return Err(Error::Unsettable(format!("map key of kind {}", other.kind_name()))),
        }
        let mut v = V::default();
        scan(i, &mut v)?;
        staged.push((k, v));
    }
    Ok(staged)
}

impl<K, V> MapSlot for HashMap<K, V>
where
    K: Field + Default + Eq + Hash,
    V: Field + Default,
{
    fn fill(&mut self, keys: &[&str], scan: &mut ElemScan<'_>) -> Result<()> {
        let staged = stage_entries::<K, V>(keys, scan)?;
        self.extend(staged);
        Ok(())
    }
}

impl<K, V> Field for HashMap<K, V>
where
    K: Field + Default + Eq + Hash,
    V: Field + Default,
{
    fn shape() -> Shape { Shape::Map(Box::new(K::shape()), Box::new(V::shape())) }
    fn as_native(&self) -> Native<'_> {
        Native::Map(self.iter().map(|(k, v)| (k as &dyn Field, v as &dyn Field)).collect())
    }
    fn as_dest(&mut self) -> Dest<'_> { Dest::Map(self) }
    fn reset(&mut self) { self.clear(); }
}

impl<K, V> MapSlot for BTreeMap<K, V>
where
    K: Field + Default + Ord,
    V: Field + Default,
{
    fn fill(&mut self, keys: &[&str], scan: &mut ElemScan<'_>) -> Result<()> {
        let staged = stage_entries::<K, V>(keys, scan)?;
        self.extend(staged);
        Ok(())
    }
}

impl<K, V> Field for BTreeMap<K, V>
where
    K: Field + Default + Ord,
    V: Field + Default,
{
    fn shape() -> Shape { Shape::Map(Box::new(K::shape()), Box::new(V::shape())) }
    fn as_native(&self) -> Native<'_> {
        Native::Map(self.iter().map(|(k, v)| (k as &dyn Field, v as &dyn Field)).collect())
    }
    fn as_dest(&mut self) -> Dest<'_> { Dest::Map(self) }
    fn reset(&mut self) { self.clear(); }
}

// ============================================================================
// Indirection
// ============================================================================

impl<T: Field + Default> IndirectSlot for Option<T> {
    fn materialize(&mut self) -> &mut dyn Field {
        self.get_or_insert_with(T::default)
    }

    fn scan_staged(&mut self, scan: &mut dyn FnMut(&mut dyn Field) -> Result<()>) -> Result<()> {
        match self {
            Some(inner) => scan(inner),
            None => {
                let mut staged = T::default();
                scan(&mut staged)?;
                *self = Some(staged);
                Ok(())
            }
        }
    }
}

impl<T: Field + Default> Field for Option<T> {
    fn shape() -> Shape { Shape::Optional(Box::new(T::shape())) }
    fn as_native(&self) -> Native<'_> { Native::Indirect(self.as_ref().map(|v| v as &dyn Field)) }
    fn as_dest(&mut self) -> Dest<'_> { Dest::Indirect(self) }
    fn reset(&mut self) { *self = None; }
}

/// Fully transparent: a box behaves like its contents.
impl<T: Field> Field for Box<T> {
    fn shape() -> Shape { T::shape() }
    fn as_native(&self) -> Native<'_> { (**self).as_native() }
    fn as_dest(&mut self) -> Dest<'_> { (**self).as_dest() }
    fn reset(&mut self) { (**self).reset(); }
}
