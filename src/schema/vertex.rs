//! Vertex descriptors: identifier contract, tags and their properties.

use std::fmt;

use tracing::debug;

use super::{ensure_type, structural, IndexKind, PropertyDescriptor, PropertySet, SecondaryIndex};
use crate::annotation::{self, Annotation};
use crate::codec::format::quote;
use crate::model::WireVertex;
use crate::reflect::{
    field_at_mut, introspect, FieldPath, Int64IdFn, IntrospectedField, Record, RecordType, Shape, StringIdFn,
};
use crate::resolver::SchemaResolver;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VidType {
    String,
    Int64,
}

/// A vertex identifier read from a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VertexId {
    String(String),
    Int64(i64),
}

impl VertexId {
    pub fn vid_type(&self) -> VidType {
        match self {
            VertexId::String(_) => VidType::String,
            VertexId::Int64(_) => VidType::Int64,
        }
    }

    /// Query literal: quoted string, or decimal digits.
    pub fn literal(&self) -> String {
        match self {
            VertexId::String(s) => quote(s),
            VertexId::Int64(i) => i.to_string(),
        }
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexId::String(s) => write!(f, "{s}"),
            VertexId::Int64(i) => write!(f, "{i}"),
        }
    }
}

#[derive(Clone, Copy)]
enum VidAccessor {
    String(StringIdFn),
    Int64(Int64IdFn),
}

// ============================================================================
// VertexTag
// ============================================================================

/// One tag of a vertex type. Property order is DDL column order.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexTag {
    name: String,
    properties: PropertySet,
    optional: bool,
}

impl VertexTag {
    fn new(name: String, optional: bool) -> Self {
        Self {
            name,
            properties: PropertySet::new(),
            optional,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    pub fn indexes(&self) -> Vec<SecondaryIndex> {
        self.properties.indexes(IndexKind::Tag, &self.name)
    }

    /// True when every member declaring this tag is an `Option`, so a wire
    /// vertex may omit it.
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

// ============================================================================
// VertexDescriptor
// ============================================================================

pub struct VertexDescriptor {
    record_type: RecordType,
    vid_type: VidType,
    accessor: VidAccessor,
    vid_field: Option<FieldPath>,
    tags: Vec<VertexTag>,
}

impl VertexDescriptor {
    pub fn parse(ty: RecordType) -> Result<Self> {
        let capabilities = ty.capabilities();
        let accessor = match (capabilities.string_id_fn(), capabilities.int64_id_fn()) {
            (Some(f), None) => VidAccessor::String(f),
            (None, Some(f)) => VidAccessor::Int64(f),
            (Some(_), Some(_)) => {
                return Err(structural(
                    ty,
                    "ambiguous vertex identifier: both VertexIdStr and VertexIdInt64 are declared",
                ));
            }
            (None, None) => {
                return Err(structural(
                    ty,
                    "missing vertex identifier: declare VertexIdStr or VertexIdInt64",
                ));
            }
        };
        let vid_type = match accessor {
            VidAccessor::String(_) => VidType::String,
            VidAccessor::Int64(_) => VidType::Int64,
        };

        let fields = introspect(ty);
        let vid_field = fields
            .iter()
            .find(|f| f.annotation().has(annotation::VERTEX_ID))
            .map(|f| f.path.clone());

        let mut tags: Vec<VertexTag> = Vec::new();
        if let Some(name) = capabilities.tag_name() {
            add_tag_scope(&mut tags, name, &fields, None, false);
        } else {
            // Each direct record-typed field that names a tag is one tag scope.
            for (index, decl) in ty.fields().into_iter().enumerate() {
                let ann = Annotation::parse(decl.annotation);
                if ann.is_ignored() || ann.has(annotation::FLATTEN) {
                    continue;
                }
                let Some(member) = decl.shape.record_type() else { continue };
                let Some(name) = member.capabilities().tag_name() else { continue };
                let optional = matches!(decl.shape, Shape::Optional(_));
                add_tag_scope(&mut tags, name, &introspect(member), Some(index), optional);
            }
        }
        if tags.is_empty() {
            return Err(structural(ty, "vertex has no tags"));
        }

        debug!(
            vertex = ty.short_name(),
            ?vid_type,
            tags = tags.len(),
            properties = tags.iter().map(|t| t.properties.len()).sum::<usize>(),
            "parsed vertex descriptor"
        );
        Ok(Self {
            record_type: ty,
            vid_type,
            accessor,
            vid_field,
            tags,
        })
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn vid_type(&self) -> VidType {
        self.vid_type
    }

    /// Field that receives the identifier on scan, if one is marked.
    pub fn vid_field(&self) -> Option<&FieldPath> {
        self.vid_field.as_ref()
    }

    pub fn tags(&self) -> &[VertexTag] {
        &self.tags
    }

    pub fn tag(&self, name: &str) -> Option<&VertexTag> {
        self.tags.iter().find(|t| t.name == name)
    }

    /// The record's identifier, through its id contract.
    pub fn vid(&self, record: &dyn Record) -> Result<VertexId> {
        ensure_type(self.record_type, record)?;
        let vid = match self.accessor {
            VidAccessor::String(f) => f(record).map(VertexId::String),
            VidAccessor::Int64(f) => f(record).map(VertexId::Int64),
        };
        vid.ok_or_else(|| structural(self.record_type, "vertex identifier accessor rejected the record"))
    }

    pub fn vid_literal(&self, record: &dyn Record) -> Result<String> {
        self.vid(record).map(|vid| vid.literal())
    }

    /// Populate `dest` from a wire vertex. A missing tag is an error unless
    /// it is optional, in which case its fields are left untouched, as are
    /// properties the vertex does not list.
    pub fn scan(&self, resolver: &SchemaResolver, vertex: &WireVertex, dest: &mut dyn Record) -> Result<()> {
        ensure_type(self.record_type, dest)?;
        if let Some(path) = &self.vid_field {
            resolver.scan(&vertex.vid, field_at_mut(dest, path)?)?;
        }
        for tag in &self.tags {
            let Some(values) = vertex.properties(&tag.name) else {
                if tag.optional {
                    continue;
                }
                return Err(structural(
                    self.record_type,
                    format!("wire vertex {} carries no tag `{}`", vertex.vid, tag.name),
                ));
            };
            for property in &tag.properties {
                if let Some(value) = values.get(&property.name) {
                    resolver.scan(value, field_at_mut(dest, &property.path)?)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for VertexDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexDescriptor")
            .field("record_type", &self.record_type)
            .field("vid_type", &self.vid_type)
            .field("vid_field", &self.vid_field)
            .field("tags", &self.tags)
            .finish()
    }
}

/// Merge `fields` into the tag named `name`, creating it on first sight.
/// `member` re-roots paths under a direct field of the vertex type. A tag
/// stays optional only while every scope merged into it is.
fn add_tag_scope(
    tags: &mut Vec<VertexTag>,
    name: String,
    fields: &[IntrospectedField],
    member: Option<usize>,
    optional: bool,
) {
    let position = match tags.iter().position(|t| t.name == name) {
        Some(position) => position,
        None => {
            tags.push(VertexTag::new(name, optional));
            tags.len() - 1
        }
    };
    let tag = &mut tags[position];
    tag.optional &= optional;
    for field in fields {
        let ann = field.annotation();
        if ann.has(annotation::VERTEX_ID) {
            continue;
        }
        let path = match member {
            Some(index) => field.path.prefixed(index),
            None => field.path.clone(),
        };
        let property = PropertyDescriptor::new(&tag.name, field, &ann, path);
        tag.properties.push(property);
    }
}
