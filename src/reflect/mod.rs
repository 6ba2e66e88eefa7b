//! # Record Introspection
//!
//! The contract between user record types and the schema engine.
//!
//! ## Layers
//!
//! | Item | Role |
//! |------|------|
//! | [`Field`] | one field value: static `Shape`, read view `Native`, write view `Dest` |
//! | [`Record`] | a struct: ordered field declarations + positional field access |
//! | [`Capabilities`] | which role contracts a record implements (id, tag, edge type) |
//! | [`introspect`] | flattened, ordered field listing with stable `FieldPath`s |
//!
//! Records are normally declared through [`record!`](crate::record), which
//! writes both trait impls from the struct definition.

pub mod impls;
pub mod introspect;
mod macros;

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use smallvec::SmallVec;

use crate::codec::AnyValue;
use crate::{Error, Result};

pub use introspect::{introspect, IntrospectedField};

// ============================================================================
// Shape: declared native type
// ============================================================================

/// Static description of a field's Rust type, as far as the engine cares.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Bool,
    /// `bits == 0` marks the pointer-sized `isize` / `usize`.
    Int { bits: u8, signed: bool },
    Float32,
    Float64,
    Text,
    Date,
    Time,
    DateTime,
    List(Box<Shape>),
    Set(Box<Shape>),
    Map(Box<Shape>, Box<Shape>),
    Optional(Box<Shape>),
    Record(RecordType),
    Any,
}

impl Shape {
    /// Record type reachable directly or through `Option`.
    pub fn record_type(&self) -> Option<RecordType> {
        match self {
            Shape::Record(ty) => Some(*ty),
            Shape::Optional(inner) => inner.record_type(),
            _ => None,
        }
    }

    /// Strip any `Option` layers.
    pub fn innermost(&self) -> &Shape {
        match self {
            Shape::Optional(inner) => inner.innermost(),
            other => other,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Bool => write!(f, "bool"),
            Shape::Int { bits: 0, signed: true } => write!(f, "isize"),
            Shape::Int { bits: 0, signed: false } => write!(f, "usize"),
            Shape::Int { bits, signed: true } => write!(f, "i{bits}"),
            Shape::Int { bits, signed: false } => write!(f, "u{bits}"),
            Shape::Float32 => write!(f, "f32"),
            Shape::Float64 => write!(f, "f64"),
            Shape::Text => write!(f, "String"),
            Shape::Date => write!(f, "NaiveDate"),
            Shape::Time => write!(f, "NaiveTime"),
            Shape::DateTime => write!(f, "DateTime"),
            Shape::List(elem) => write!(f, "Vec<{elem}>"),
            Shape::Set(elem) => write!(f, "Set<{elem}>"),
            Shape::Map(k, v) => write!(f, "Map<{k}, {v}>"),
            Shape::Optional(inner) => write!(f, "Option<{inner}>"),
            Shape::Record(ty) => write!(f, "{}", ty.short_name()),
            Shape::Any => write!(f, "AnyValue"),
        }
    }
}

// ============================================================================
// Native: read view used by Format
// ============================================================================

/// Borrowed view of a field's current value.
pub enum Native<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float32(f32),
    Float64(f64),
    Text(&'a str),
    Date(NaiveDate),
    Time(NaiveTime),
    /// Wall-clock date-time, rendered as-is.
    DateTime(NaiveDateTime),
    /// Absolute instant, rendered in the configured zone.
    Instant(DateTime<Utc>),
    List(Vec<&'a dyn Field>),
    Set(Vec<&'a dyn Field>),
    Map(Vec<(&'a dyn Field, &'a dyn Field)>),
    /// `Option`-like indirection; `None` is an absent value.
    Indirect(Option<&'a dyn Field>),
    Record(&'a dyn Record),
    /// A value with no literal form, e.g. a captured wire vertex.
    Opaque(&'static str),
}

impl Native<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Native::Bool(_) => "bool",
            Native::Int(_) => "signed integer",
            Native::UInt(_) => "unsigned integer",
            Native::Float32(_) => "f32",
            Native::Float64(_) => "f64",
            Native::Text(_) => "text",
            Native::Date(_) => "date",
            Native::Time(_) => "time",
            Native::DateTime(_) => "datetime",
            Native::Instant(_) => "utc datetime",
            Native::List(_) => "sequence",
            Native::Set(_) => "set",
            Native::Map(_) => "map",
            Native::Indirect(_) => "option",
            Native::Record(_) => "record",
            Native::Opaque(name) => name,
        }
    }
}

// ============================================================================
// Dest: write view used by Scan
// ============================================================================

/// Mutable capability of a destination field.
pub enum Dest<'a> {
    Bool(&'a mut bool),
    Int(&'a mut dyn IntSlot),
    Float(&'a mut dyn FloatSlot),
    Text(&'a mut String),
    Date(&'a mut NaiveDate),
    Time(&'a mut NaiveTime),
    DateTime(&'a mut dyn DateTimeSlot),
    /// `Vec`, arrays and sets.
    Seq(&'a mut dyn SeqSlot),
    Map(&'a mut dyn MapSlot),
    Indirect(&'a mut dyn IndirectSlot),
    Record(&'a mut dyn Record),
    Any(&'a mut AnyValue),
    /// Read-only field; carries the type name for the error.
    Unsettable(&'static str),
}

impl Dest<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Dest::Bool(_) => "bool",
            Dest::Int(_) => "integer",
            Dest::Float(_) => "float",
            Dest::Text(_) => "text",
            Dest::Date(_) => "date",
            Dest::Time(_) => "time",
            Dest::DateTime(_) => "datetime",
            Dest::Seq(_) => "sequence",
            Dest::Map(_) => "map",
            Dest::Indirect(_) => "option",
            Dest::Record(_) => "record",
            Dest::Any(_) => "any",
            Dest::Unsettable(name) => name,
        }
    }
}

/// Any integer width. Conversions follow `as` semantics.
pub trait IntSlot {
    fn set_i64(&mut self, v: i64);
    fn set_f64(&mut self, v: f64);
}

pub trait FloatSlot {
    fn set_f64(&mut self, v: f64);
}

/// Date-time destinations, fed an instant already moved into the
/// configured zone.
pub trait DateTimeSlot {
    fn set_instant(&mut self, instant: DateTime<FixedOffset>);
}

/// Callback that scans one source element into a fresh destination element.
pub type ElemScan<'s> = dyn FnMut(usize, &mut dyn Field) -> Result<()> + 's;

pub trait SeqSlot {
    /// Fill from `len` source elements. Bounded destinations keep only what
    /// fits. Nothing is written unless every element scans.
    fn fill(&mut self, len: usize, scan: &mut ElemScan<'_>) -> Result<()>;
}

pub trait MapSlot {
    /// Insert one entry per key; element `i` is scanned for `keys[i]`.
    /// Nothing is written unless every entry scans.
    fn fill(&mut self, keys: &[&str], scan: &mut ElemScan<'_>) -> Result<()>;
}

pub trait IndirectSlot {
    /// The pointee, allocated with its default when absent.
    fn materialize(&mut self) -> &mut dyn Field;

    /// Run `scan` against the pointee. An absent pointee is staged in a
    /// fresh default and only stored once `scan` succeeds.
    fn scan_staged(&mut self, scan: &mut dyn FnMut(&mut dyn Field) -> Result<()>) -> Result<()>;
}

// ============================================================================
// Field / Record
// ============================================================================

/// One field value the engine can read and write.
pub trait Field: Send + Sync + 'static {
    fn shape() -> Shape
    where
        Self: Sized;

    fn as_native(&self) -> Native<'_>;

    fn as_dest(&mut self) -> Dest<'_>;

    /// Zero the value (what a wire NULL scans to).
    fn reset(&mut self);
}

/// A struct the engine can introspect.
///
/// `fields()` must list fields in declaration order; `field(i)` and
/// `field_mut(i)` address the same positions.
pub trait Record: Any + Send + Sync {
    fn fields() -> Vec<FieldDecl>
    where
        Self: Sized;

    fn capabilities() -> Capabilities
    where
        Self: Sized,
    {
        Capabilities::new()
    }

    fn record_type(&self) -> RecordType;

    fn field(&self, index: usize) -> Option<&dyn Field>;

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Field>;
}

/// Declaration of one struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: &'static str,
    pub shape: Shape,
    /// Raw annotation string, see [`crate::annotation`].
    pub annotation: &'static str,
}

impl FieldDecl {
    pub fn new(name: &'static str, shape: Shape, annotation: &'static str) -> Self {
        Self { name, shape, annotation }
    }
}

// ============================================================================
// RecordType: type identity handle
// ============================================================================

/// Type-erased handle on a `Record` implementation. Equality is type identity.
#[derive(Clone, Copy)]
pub struct RecordType {
    id: TypeId,
    name: &'static str,
    fields: fn() -> Vec<FieldDecl>,
    capabilities: fn() -> Capabilities,
}

impl RecordType {
    pub fn of<T: Record>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            fields: T::fields,
            capabilities: T::capabilities,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }

    pub fn fields(&self) -> Vec<FieldDecl> {
        (self.fields)()
    }

    pub fn capabilities(&self) -> Capabilities {
        (self.capabilities)()
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RecordType {}

impl Hash for RecordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordType").field(&self.name).finish()
    }
}

// ============================================================================
// Capabilities: role contracts
// ============================================================================

/// The record is a vertex whose identifier is a string.
pub trait VertexIdStr: Record {
    fn vertex_id(&self) -> String;
}

/// The record is a vertex whose identifier is an int64.
pub trait VertexIdInt64: Record {
    fn vertex_id(&self) -> i64;
}

/// The record is a tag; a vertex type may be its own tag.
pub trait TagNamer: Record {
    fn tag_name() -> String;
}

/// The record is an edge of the named type.
pub trait EdgeTypeNamer: Record {
    fn edge_type_name() -> String;
}

pub type StringIdFn = fn(&dyn Record) -> Option<String>;
pub type Int64IdFn = fn(&dyn Record) -> Option<i64>;

/// Role contracts a record type declares. Each builder method only accepts
/// types that implement the matching trait.
#[derive(Clone, Copy, Default)]
pub struct Capabilities {
    string_id: Option<StringIdFn>,
    int64_id: Option<Int64IdFn>,
    tag_name: Option<fn() -> String>,
    edge_type_name: Option<fn() -> String>,
}

impl Capabilities {
    pub const fn new() -> Self {
        Self {
            string_id: None,
            int64_id: None,
            tag_name: None,
            edge_type_name: None,
        }
    }

    pub fn string_id<T: VertexIdStr>(mut self) -> Self {
        self.string_id = Some(string_id_of::<T>);
        self
    }

    pub fn int64_id<T: VertexIdInt64>(mut self) -> Self {
        self.int64_id = Some(int64_id_of::<T>);
        self
    }

    pub fn tag<T: TagNamer>(mut self) -> Self {
        self.tag_name = Some(T::tag_name);
        self
    }

    pub fn edge_type<T: EdgeTypeNamer>(mut self) -> Self {
        self.edge_type_name = Some(T::edge_type_name);
        self
    }

    pub fn string_id_fn(&self) -> Option<StringIdFn> {
        self.string_id
    }

    pub fn int64_id_fn(&self) -> Option<Int64IdFn> {
        self.int64_id
    }

    pub fn tag_name(&self) -> Option<String> {
        self.tag_name.map(|name| name())
    }

    pub fn edge_type_name(&self) -> Option<String> {
        self.edge_type_name.map(|name| name())
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("string_id", &self.string_id.is_some())
            .field("int64_id", &self.int64_id.is_some())
            .field("tag_name", &self.tag_name())
            .field("edge_type_name", &self.edge_type_name())
            .finish()
    }
}

fn string_id_of<T: VertexIdStr>(record: &dyn Record) -> Option<String> {
    (record as &dyn Any).downcast_ref::<T>().map(<T as VertexIdStr>::vertex_id)
}

fn int64_id_of<T: VertexIdInt64>(record: &dyn Record) -> Option<i64> {
    (record as &dyn Any).downcast_ref::<T>().map(<T as VertexIdInt64>::vertex_id)
}

// ============================================================================
// FieldPath: positional chain through flattened records
// ============================================================================

/// Positions from the outermost record down to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(SmallVec<[usize; 4]>);

impl FieldPath {
    pub fn root(index: usize) -> Self {
        let mut path = SmallVec::new();
        path.push(index);
        Self(path)
    }

    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }

    /// This path re-rooted under field `index` of an enclosing record.
    pub fn prefixed(&self, index: usize) -> Self {
        let mut path = SmallVec::with_capacity(self.0.len() + 1);
        path.push(index);
        path.extend_from_slice(&self.0);
        Self(path)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl<const N: usize> From<[usize; N]> for FieldPath {
    fn from(indices: [usize; N]) -> Self {
        Self(SmallVec::from_slice(&indices))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 { write!(f, ".")?; }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

/// Read the field at `path`, looking through records and present options.
pub fn field_at<'a>(record: &'a dyn Record, path: &FieldPath) -> Option<&'a dyn Field> {
    walk(record, path.indices())
}

/// Writable field at `path`; absent options on the way are allocated.
pub fn field_at_mut<'a>(record: &'a mut dyn Record, path: &FieldPath) -> Result<&'a mut dyn Field> {
    let name = record.record_type().short_name();
    walk_mut(record, path.indices())
        .ok_or_else(|| Error::Unsettable(format!("{name} has no settable field at path {path}")))
}

fn walk<'a>(record: &'a dyn Record, path: &[usize]) -> Option<&'a dyn Field> {
    let (first, rest) = path.split_first()?;
    let field = record.field(*first)?;
    if rest.is_empty() { Some(field) } else { descend(field, rest) }
}

fn descend<'a>(field: &'a dyn Field, rest: &[usize]) -> Option<&'a dyn Field> {
    match field.as_native() {
        Native::Record(record) => walk(record, rest),
        Native::Indirect(Some(inner)) => descend(inner, rest),
        _ => None,
    }
}

fn walk_mut<'a>(record: &'a mut dyn Record, path: &[usize]) -> Option<&'a mut dyn Field> {
    let (first, rest) = path.split_first()?;
    let field = record.field_mut(*first)?;
    if rest.is_empty() { Some(field) } else { descend_mut(field, rest) }
}

fn descend_mut<'a>(field: &'a mut dyn Field, rest: &[usize]) -> Option<&'a mut dyn Field> {
    match field.as_dest() {
        Dest::Record(record) => walk_mut(record, rest),
        Dest::Indirect(slot) => descend_mut(slot.materialize(), rest),
        _ => None,
    }
}
