//! # Schema Resolver
//!
//! Process-wide entry point: descriptor caches plus the codec, bound to one
//! [`CodecConfig`].
//!
//! Three independent caches (vertex, edge, record) map a type's `TypeId` to
//! its shared descriptor. A lookup takes the read lock only. On a miss the
//! descriptor is built with no lock held and then published under the write
//! lock; when two callers race, the first published `Arc` is kept and both
//! get it back. Failed builds are not cached.

use std::any::TypeId;
use std::sync::{Arc, OnceLock};

use hashbrown::HashMap;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::codec;
use crate::config::CodecConfig;
use crate::model::{WireRow, WireValue};
use crate::reflect::{field_at, Field, Record, RecordType};
use crate::schema::{EdgeDescriptor, PropertyDescriptor, RecordDescriptor, StorageHint, VertexDescriptor};
use crate::Result;

type Cache<D> = RwLock<HashMap<TypeId, Arc<D>>>;

#[derive(Default)]
pub struct SchemaResolver {
    config: CodecConfig,
    vertices: Cache<VertexDescriptor>,
    edges: Cache<EdgeDescriptor>,
    records: Cache<RecordDescriptor>,
}

impl SchemaResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Lazily created resolver with the default configuration.
    pub fn shared() -> &'static SchemaResolver {
        static SHARED: OnceLock<SchemaResolver> = OnceLock::new();
        SHARED.get_or_init(SchemaResolver::new)
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    // ========================================================================
    // Descriptors
    // ========================================================================

    pub fn vertex<T: Record>(&self) -> Result<Arc<VertexDescriptor>> {
        self.vertex_of(RecordType::of::<T>())
    }

    pub fn vertex_of(&self, ty: RecordType) -> Result<Arc<VertexDescriptor>> {
        lookup(&self.vertices, ty, "vertex", VertexDescriptor::parse)
    }

    pub fn edge<T: Record>(&self) -> Result<Arc<EdgeDescriptor>> {
        self.edge_of(RecordType::of::<T>())
    }

    pub fn edge_of(&self, ty: RecordType) -> Result<Arc<EdgeDescriptor>> {
        lookup(&self.edges, ty, "edge", EdgeDescriptor::parse)
    }

    pub fn record<T: Record>(&self) -> Result<Arc<RecordDescriptor>> {
        self.record_of(RecordType::of::<T>())
    }

    pub fn record_of(&self, ty: RecordType) -> Result<Arc<RecordDescriptor>> {
        lookup(&self.records, ty, "record", |ty| Ok(RecordDescriptor::parse(ty)))
    }

    // ========================================================================
    // Codec
    // ========================================================================

    /// Scan one wire value into a field.
    pub fn scan(&self, value: &WireValue, dest: &mut dyn Field) -> Result<()> {
        codec::scan(self, value, dest)
    }

    /// Scan a result row into a record, column by column.
    pub fn scan_row(&self, row: &WireRow, dest: &mut dyn Record) -> Result<()> {
        let descriptor = self.record_of(dest.record_type())?;
        descriptor.scan_row(self, row, dest)
    }

    /// Render a field as a literal for a property of kind `hint`.
    pub fn format(&self, hint: &StorageHint, value: &dyn Field) -> Result<String> {
        codec::format(&self.config, hint, value)
    }

    /// Render one property of `record`. An option left empty anywhere along
    /// the property's path renders as `NULL`.
    pub fn format_property(&self, property: &PropertyDescriptor, record: &dyn Record) -> Result<String> {
        match field_at(record, &property.path) {
            Some(field) => self.format(&property.hint, field),
            None => Ok(codec::NULL_LITERAL.to_string()),
        }
    }
}

fn lookup<D>(cache: &Cache<D>, ty: RecordType, kind: &'static str, build: fn(RecordType) -> Result<D>) -> Result<Arc<D>> {
    if let Some(found) = cache.read().get(&ty.id()) {
        trace!(type_name = ty.name(), kind, "descriptor cache hit");
        return Ok(Arc::clone(found));
    }

    let built = Arc::new(build(ty)?);
    let mut cache = cache.write();
    let published = Arc::clone(cache.entry(ty.id()).or_insert(built));
    debug!(type_name = ty.name(), kind, cached = cache.len(), "descriptor published");
    Ok(published)
}
