//! # Schema Descriptors
//!
//! Built once per record type and cached by the resolver.
//!
//! | Descriptor | Built from | Used for |
//! |------------|-----------|----------|
//! | [`VertexDescriptor`] | id capability + tag-bearing fields | vertex DDL/DML, vertex scans |
//! | [`EdgeDescriptor`] | edge type + endpoint/rank annotations | edge DDL/DML, edge scans |
//! | [`RecordDescriptor`] | column names | projecting result rows |
//!
//! Vertex tags and edges share the property model below: ordered
//! [`PropertyDescriptor`]s, unique by name (first declaration wins), with
//! index memberships grouped into [`SecondaryIndex`] targets.

pub mod edge;
pub mod record;
pub mod vertex;

pub use edge::{EdgeDescriptor, Endpoint};
pub use record::RecordDescriptor;
pub use vertex::{VertexDescriptor, VertexId, VertexTag, VidType};

use std::fmt;

use hashbrown::HashMap;

use crate::annotation::{self, Annotation};
use crate::reflect::{FieldPath, IntrospectedField, Record, RecordType, Shape};
use crate::{Error, Result};

/// Default index priority; lower sorts first.
pub const DEFAULT_INDEX_PRIORITY: i32 = 10;

// ============================================================================
// StorageHint: storage type token, as the codec sees it
// ============================================================================

/// Coarse storage type used to pick a literal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum StorageHint {
    /// No storage type known; the native kind decides.
    #[default]
    None,
    Int,
    Float,
    Bool,
    String,
    Date,
    Time,
    DateTime,
    List,
    Map,
    Set,
    Null,
    Empty,
    /// A token no native kind renders to, e.g. `geography`.
    Other(String),
}

impl StorageHint {
    pub fn from_storage_type(token: &str) -> Self {
        let lower = token.trim().to_lowercase();
        match lower.as_str() {
            "" => StorageHint::None,
            "int" | "int64" | "int32" | "int16" | "int8" => StorageHint::Int,
            "float" | "double" => StorageHint::Float,
            "bool" => StorageHint::Bool,
            "string" => StorageHint::String,
            "date" => StorageHint::Date,
            "time" => StorageHint::Time,
            "datetime" | "timestamp" => StorageHint::DateTime,
            "list" => StorageHint::List,
            "map" => StorageHint::Map,
            "set" => StorageHint::Set,
            "null" => StorageHint::Null,
            "empty" => StorageHint::Empty,
            s if s.starts_with("fixed_string") => StorageHint::String,
            _ => StorageHint::Other(token.trim().to_string()),
        }
    }
}

impl fmt::Display for StorageHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageHint::None => write!(f, "no storage type"),
            StorageHint::Int => write!(f, "int"),
            StorageHint::Float => write!(f, "float"),
            StorageHint::Bool => write!(f, "bool"),
            StorageHint::String => write!(f, "string"),
            StorageHint::Date => write!(f, "date"),
            StorageHint::Time => write!(f, "time"),
            StorageHint::DateTime => write!(f, "datetime"),
            StorageHint::List => write!(f, "list"),
            StorageHint::Map => write!(f, "map"),
            StorageHint::Set => write!(f, "set"),
            StorageHint::Null => write!(f, "null"),
            StorageHint::Empty => write!(f, "empty"),
            StorageHint::Other(token) => write!(f, "{token}"),
        }
    }
}

/// Storage type a field declares by its Rust type alone.
pub fn infer_storage_type(shape: &Shape) -> Option<&'static str> {
    let token = match shape.innermost() {
        Shape::Bool => "bool",
        Shape::Int { bits: 0, .. } => "int",
        Shape::Int { bits: 8, .. } => "int8",
        Shape::Int { bits: 16, .. } => "int16",
        Shape::Int { bits: 32, .. } => "int32",
        Shape::Int { .. } => "int64",
        Shape::Float32 => "float",
        Shape::Float64 => "double",
        Shape::Text => "string",
        Shape::Date => "date",
        Shape::Time => "time",
        Shape::DateTime => "datetime",
        _ => return None,
    };
    Some(token)
}

// ============================================================================
// Index specs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    Tag,
    Edge,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Tag => write!(f, "TAG"),
            IndexKind::Edge => write!(f, "EDGE"),
        }
    }
}

/// One property's membership in a secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: String,
    pub property: String,
    pub storage_type: Option<String>,
    pub priority: i32,
    /// Prefix length; only meaningful for string properties.
    pub length: Option<u32>,
    /// Options that did not parse. Reported when the index is rendered.
    pub malformed: Vec<String>,
}

impl IndexSpec {
    /// Parse the value of an `index` annotation:
    /// `[<name>][,priority:<n>][,length:<n>]`.
    pub fn parse(raw: &str, owner: &str, property: &str, storage_type: Option<&str>) -> Self {
        let mut options = raw.split(',');
        let head = options.next().unwrap_or_default().trim();
        let name = if head.is_empty() || head == annotation::INDEX {
            format!("idx_{owner}_{property}")
        } else {
            head.to_string()
        };
        let mut spec = IndexSpec {
            name,
            property: property.to_string(),
            storage_type: storage_type.map(str::to_string),
            priority: DEFAULT_INDEX_PRIORITY,
            length: None,
            malformed: Vec::new(),
        };
        for option in options.map(str::trim).filter(|o| !o.is_empty()) {
            let (key, value) = option.split_once(':').unwrap_or((option, ""));
            match key.trim().to_lowercase().as_str() {
                "priority" => match value.trim().parse() {
                    Ok(priority) => spec.priority = priority,
                    Err(_) => spec.malformed.push(option.to_string()),
                },
                "length" => match value.trim().parse() {
                    Ok(length) => spec.length = Some(length),
                    Err(_) => spec.malformed.push(option.to_string()),
                },
                _ => {}
            }
        }
        spec
    }
}

/// A named index over one tag or edge type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryIndex {
    pub name: String,
    pub kind: IndexKind,
    pub target: String,
    /// Sorted by priority; equal priorities keep declaration order.
    pub fields: Vec<IndexSpec>,
}

// ============================================================================
// PropertyDescriptor
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    /// Rust field name the property was declared by.
    pub field_name: &'static str,
    pub path: FieldPath,
    pub shape: Shape,
    /// Declared or inferred storage type token, e.g. `int64`, `fixed_string(32)`.
    pub storage_type: Option<String>,
    pub hint: StorageHint,
    pub not_null: bool,
    /// Default literal, already in query syntax.
    pub default: Option<String>,
    pub comment: Option<String>,
    pub ttl: Option<String>,
    pub index: Option<IndexSpec>,
}

impl PropertyDescriptor {
    /// Build from an introspected field. `path` is the field's position
    /// from the outermost record, which may differ from `field.path` when
    /// the field belongs to a tag-bearing member.
    pub fn new(owner: &str, field: &IntrospectedField, ann: &Annotation, path: FieldPath) -> Self {
        let name = property_name(field.name, ann);
        let storage_type = ann
            .value(annotation::TYPE)
            .map(str::to_string)
            .or_else(|| infer_storage_type(&field.shape).map(str::to_string));
        let hint = storage_type
            .as_deref()
            .map_or(StorageHint::None, StorageHint::from_storage_type);
        let index = ann
            .get(annotation::INDEX)
            .map(|raw| IndexSpec::parse(raw, owner, &name, storage_type.as_deref()));
        Self {
            field_name: field.name,
            path,
            shape: field.shape.clone(),
            not_null: ann.has(annotation::NOT_NULL),
            default: ann.value(annotation::DEFAULT).map(str::to_string),
            comment: ann.value(annotation::COMMENT).map(str::to_string),
            ttl: ann.value(annotation::TTL).map(str::to_string),
            name,
            storage_type,
            hint,
            index,
        }
    }
}

/// `prop:<name>` if given, else the snake-cased field name.
pub fn property_name(field_name: &str, ann: &Annotation) -> String {
    ann.value(annotation::PROP)
        .map(str::to_string)
        .unwrap_or_else(|| annotation::to_snake_case(field_name))
}

// ============================================================================
// PropertySet: ordered, name-unique
// ============================================================================

/// Ordered properties of one tag or edge type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySet {
    properties: Vec<PropertyDescriptor>,
    by_name: HashMap<String, usize>,
    index_names: Vec<String>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property unless its name is taken. Returns whether it was added.
    pub fn push(&mut self, property: PropertyDescriptor) -> bool {
        if self.by_name.contains_key(&property.name) {
            return false;
        }
        if let Some(index) = &property.index {
            if !self.index_names.contains(&index.name) {
                self.index_names.push(index.name.clone());
            }
        }
        self.by_name.insert(property.name.clone(), self.properties.len());
        self.properties.push(property);
        true
    }

    pub fn get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.by_name.get(name).map(|&i| &self.properties[i])
    }

    pub fn as_slice(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PropertyDescriptor> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Index groups in first-seen order.
    pub fn indexes(&self, kind: IndexKind, target: &str) -> Vec<SecondaryIndex> {
        self.index_names
            .iter()
            .map(|name| {
                let mut fields: Vec<IndexSpec> = self
                    .properties
                    .iter()
                    .filter_map(|p| p.index.as_ref())
                    .filter(|spec| &spec.name == name)
                    .cloned()
                    .collect();
                fields.sort_by_key(|spec| spec.priority);
                SecondaryIndex {
                    name: name.clone(),
                    kind,
                    target: target.to_string(),
                    fields,
                }
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a PropertySet {
    type Item = &'a PropertyDescriptor;
    type IntoIter = std::slice::Iter<'a, PropertyDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub(crate) fn structural(ty: RecordType, message: impl Into<String>) -> Error {
    Error::Structural {
        type_name: ty.short_name().to_string(),
        message: message.into(),
    }
}

/// Reject a record of another type than the descriptor was built for.
pub(crate) fn ensure_type(expected: RecordType, record: &dyn Record) -> Result<()> {
    let actual = record.record_type();
    if actual == expected {
        Ok(())
    } else {
        Err(structural(
            expected,
            format!("descriptor applied to a record of type {}", actual.short_name()),
        ))
    }
}
