//! Edge descriptors: endpoints, rank and properties of one edge type.

use tracing::debug;

use super::vertex::{VertexId, VidType};
use super::{ensure_type, structural, IndexKind, PropertyDescriptor, PropertySet, SecondaryIndex};
use crate::annotation;
use crate::model::{WireEdge, WireValue};
use crate::reflect::{field_at, field_at_mut, introspect, FieldPath, IntrospectedField, Native, Record, RecordType, Shape};
use crate::resolver::SchemaResolver;
use crate::Result;

/// Source or destination of an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub vid_type: VidType,
    pub path: FieldPath,
}

impl Endpoint {
    fn from_field(ty: RecordType, field: &IntrospectedField, role: &str) -> Result<Self> {
        let vid_type = match field.shape {
            Shape::Text => VidType::String,
            Shape::Int { bits: 64, signed: true } => VidType::Int64,
            ref other => {
                return Err(structural(
                    ty,
                    format!("{role} endpoint `{}` must be String or i64, found {other}", field.name),
                ));
            }
        };
        Ok(Self {
            vid_type,
            path: field.path.clone(),
        })
    }
}

#[derive(Debug)]
pub struct EdgeDescriptor {
    record_type: RecordType,
    edge_type: String,
    src: Endpoint,
    dst: Endpoint,
    rank: Option<FieldPath>,
    properties: PropertySet,
}

impl EdgeDescriptor {
    pub fn parse(ty: RecordType) -> Result<Self> {
        let Some(edge_type) = ty.capabilities().edge_type_name() else {
            return Err(structural(ty, "missing edge type: declare EdgeTypeNamer"));
        };

        let mut src = None;
        let mut dst = None;
        let mut rank = None;
        let mut properties = PropertySet::new();
        for field in introspect(ty) {
            let ann = field.annotation();
            if ann.has(annotation::EDGE_SRC_ID) {
                if src.is_none() {
                    src = Some(Endpoint::from_field(ty, &field, "source")?);
                }
                continue;
            }
            if ann.has(annotation::EDGE_DST_ID) {
                if dst.is_none() {
                    dst = Some(Endpoint::from_field(ty, &field, "destination")?);
                }
                continue;
            }
            if ann.has(annotation::EDGE_RANK) {
                if rank.is_none() {
                    if !matches!(field.shape, Shape::Int { signed: true, .. }) {
                        return Err(structural(
                            ty,
                            format!("rank field `{}` must be a signed integer, found {}", field.name, field.shape),
                        ));
                    }
                    rank = Some(field.path.clone());
                }
                continue;
            }
            properties.push(PropertyDescriptor::new(&edge_type, &field, &ann, field.path.clone()));
        }

        let src = src.ok_or_else(|| structural(ty, "missing source endpoint: no field is marked edge_src_id"))?;
        let dst = dst.ok_or_else(|| structural(ty, "missing destination endpoint: no field is marked edge_dst_id"))?;

        debug!(
            edge = ty.short_name(),
            edge_type = %edge_type,
            properties = properties.len(),
            has_rank = rank.is_some(),
            "parsed edge descriptor"
        );
        Ok(Self {
            record_type: ty,
            edge_type,
            src,
            dst,
            rank,
            properties,
        })
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn edge_type(&self) -> &str {
        &self.edge_type
    }

    pub fn src(&self) -> &Endpoint {
        &self.src
    }

    pub fn dst(&self) -> &Endpoint {
        &self.dst
    }

    pub fn rank_field(&self) -> Option<&FieldPath> {
        self.rank.as_ref()
    }

    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    pub fn indexes(&self) -> Vec<SecondaryIndex> {
        self.properties.indexes(IndexKind::Edge, &self.edge_type)
    }

    pub fn src_vid(&self, record: &dyn Record) -> Result<VertexId> {
        self.endpoint_vid(record, &self.src, "source")
    }

    pub fn dst_vid(&self, record: &dyn Record) -> Result<VertexId> {
        self.endpoint_vid(record, &self.dst, "destination")
    }

    pub fn src_literal(&self, record: &dyn Record) -> Result<String> {
        self.src_vid(record).map(|vid| vid.literal())
    }

    pub fn dst_literal(&self, record: &dyn Record) -> Result<String> {
        self.dst_vid(record).map(|vid| vid.literal())
    }

    /// The record's rank, or 0 without a rank field.
    pub fn rank(&self, record: &dyn Record) -> Result<i64> {
        ensure_type(self.record_type, record)?;
        let Some(path) = &self.rank else { return Ok(0) };
        match field_at(record, path).map(|f| f.as_native()) {
            Some(Native::Int(rank)) => Ok(rank),
            _ => Ok(0),
        }
    }

    /// Populate `dest` from a wire edge. Properties unknown to this type are
    /// skipped.
    pub fn scan(&self, resolver: &SchemaResolver, edge: &WireEdge, dest: &mut dyn Record) -> Result<()> {
        ensure_type(self.record_type, dest)?;
        resolver.scan(&edge.src, field_at_mut(dest, &self.src.path)?)?;
        resolver.scan(&edge.dst, field_at_mut(dest, &self.dst.path)?)?;
        if let Some(path) = &self.rank {
            resolver.scan(&WireValue::Int(edge.rank), field_at_mut(dest, path)?)?;
        }
        for (name, value) in &edge.properties {
            if let Some(property) = self.properties.get(name) {
                resolver.scan(value, field_at_mut(dest, &property.path)?)?;
            }
        }
        Ok(())
    }

    fn endpoint_vid(&self, record: &dyn Record, endpoint: &Endpoint, role: &str) -> Result<VertexId> {
        ensure_type(self.record_type, record)?;
        match field_at(record, &endpoint.path).map(|f| f.as_native()) {
            Some(Native::Text(s)) => Ok(VertexId::String(s.to_string())),
            Some(Native::Int(i)) => Ok(VertexId::Int64(i)),
            _ => Err(structural(self.record_type, format!("{role} endpoint is not readable"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::EdgeTypeNamer;
    use crate::Error;

    crate::record! {
        #[derive(Debug, Default)]
        struct BadRank [edge_type] {
            src: String = "edge_src_id",
            dst: String = "edge_dst_id",
            rank: u32 = "edge_rank",
        }
    }

    impl EdgeTypeNamer for BadRank {
        fn edge_type_name() -> String { "bad_rank".into() }
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct FloatEndpoint [edge_type] {
            src: f64 = "edge_src_id",
            dst: String = "edge_dst_id",
        }
    }

    impl EdgeTypeNamer for FloatEndpoint {
        fn edge_type_name() -> String { "float_endpoint".into() }
    }

    crate::record! {
        #[derive(Debug, Default)]
        struct Untyped {
            src: String = "edge_src_id",
            dst: String = "edge_dst_id",
        }
    }

    fn message(result: Result<EdgeDescriptor>) -> String {
        match result {
            Err(Error::Structural { message, .. }) => message,
            other => panic!("expected a structural error, got {other:?}"),
        }
    }

    #[test]
    fn test_rank_must_be_signed() {
        let msg = message(EdgeDescriptor::parse(RecordType::of::<BadRank>()));
        assert!(msg.contains("signed integer"), "{msg}");
    }

    #[test]
    fn test_endpoint_kind() {
        let msg = message(EdgeDescriptor::parse(RecordType::of::<FloatEndpoint>()));
        assert!(msg.starts_with("source endpoint `src`"), "{msg}");
    }

    #[test]
    fn test_edge_type_required() {
        let msg = message(EdgeDescriptor::parse(RecordType::of::<Untyped>()));
        assert!(msg.contains("missing edge type"));
    }
}
