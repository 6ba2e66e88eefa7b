//! # nGQL Rendering
//!
//! Thin statement layer over the descriptors: schema DDL and single-row
//! inserts.
//!
//! | Function | Statement |
//! |----------|-----------|
//! | [`create_tag`] / [`create_tags`] | `CREATE TAG [IF NOT EXISTS] t(p type ...)` |
//! | [`create_edge`] | `CREATE EDGE [IF NOT EXISTS] e(p type ...)` |
//! | [`create_index`] | `CREATE TAG\|EDGE INDEX [IF NOT EXISTS] i ON t(p(len), ...)` |
//! | [`insert_vertex`] | `INSERT VERTEX t(p, ...) VALUES vid:(v, ...)` |
//! | [`insert_edge`] | `INSERT EDGE e(p, ...) VALUES src->dst@rank:(v, ...)` |
//!
//! Checks that descriptors defer land here: a tag or edge with more than one
//! TTL property, a property without a storage type, a string index field
//! without a prefix length, and unparsable index options.

use crate::reflect::Record;
use crate::resolver::SchemaResolver;
use crate::schema::{EdgeDescriptor, PropertyDescriptor, PropertySet, SecondaryIndex, VertexDescriptor, VertexTag};
use crate::{Error, Result};

// ============================================================================
// DDL
// ============================================================================

pub fn create_tag(tag: &VertexTag, if_not_exists: bool) -> Result<String> {
    create_schema("TAG", tag.name(), tag.properties(), if_not_exists)
}

/// One `CREATE TAG` per tag, joined with `; `.
pub fn create_tags(vertex: &VertexDescriptor, if_not_exists: bool) -> Result<String> {
    let statements = vertex
        .tags()
        .iter()
        .map(|tag| create_tag(tag, if_not_exists))
        .collect::<Result<Vec<_>>>()?;
    Ok(statements.join("; "))
}

pub fn create_edge(edge: &EdgeDescriptor, if_not_exists: bool) -> Result<String> {
    create_schema("EDGE", edge.edge_type(), edge.properties(), if_not_exists)
}

fn create_schema(kind: &str, name: &str, properties: &PropertySet, if_not_exists: bool) -> Result<String> {
    let mut columns = Vec::with_capacity(properties.len());
    let mut ttl: Option<(&str, &str)> = None;
    for property in properties {
        columns.push(column_definition(kind, name, property)?);
        if let Some(duration) = &property.ttl {
            if let Some((first, _)) = ttl {
                return Err(Error::Render(format!(
                    "{} {name} has more than one TTL property: {first}, {}",
                    kind.to_lowercase(),
                    property.name
                )));
            }
            ttl = Some((property.name.as_str(), duration.as_str()));
        }
    }

    let mut stmt = format!("CREATE {kind} {}{name}({})", if_not_exists_clause(if_not_exists), columns.join(", "));
    if let Some((column, duration)) = ttl {
        stmt.push_str(&format!(" TTL_DURATION = {duration}, TTL_COL = \"{column}\""));
    }
    Ok(stmt)
}

fn column_definition(kind: &str, owner: &str, property: &PropertyDescriptor) -> Result<String> {
    let Some(storage_type) = &property.storage_type else {
        return Err(Error::Render(format!(
            "property {} of {} {owner} has no storage type; annotate it with type:<token>",
            property.name,
            kind.to_lowercase()
        )));
    };
    let mut column = format!("{} {storage_type}", property.name);
    if property.not_null {
        column.push_str(" NOT NULL");
    }
    if let Some(default) = &property.default {
        column.push_str(" DEFAULT ");
        column.push_str(default);
    }
    if let Some(comment) = &property.comment {
        column.push_str(&format!(" COMMENT '{}'", comment.replace('\'', "\\'")));
    }
    Ok(column)
}

pub fn create_index(index: &SecondaryIndex, if_not_exists: bool) -> Result<String> {
    let mut fields = Vec::with_capacity(index.fields.len());
    for field in &index.fields {
        if let Some(option) = field.malformed.first() {
            return Err(Error::IndexSpec(format!(
                "index {} on {}: malformed option `{option}` for property {}",
                index.name, index.target, field.property
            )));
        }
        let is_string = field
            .storage_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("string"));
        match (is_string, field.length) {
            (true, None) | (true, Some(0)) => {
                return Err(Error::IndexSpec(format!(
                    "index {} on {}: string property {} needs an index length",
                    index.name, index.target, field.property
                )));
            }
            (true, Some(length)) => fields.push(format!("{}({length})", field.property)),
            (false, _) => fields.push(field.property.clone()),
        }
    }
    Ok(format!(
        "CREATE {} INDEX {}{} ON {}({})",
        index.kind,
        if_not_exists_clause(if_not_exists),
        index.name,
        index.target,
        fields.join(", ")
    ))
}

// ============================================================================
// DML
// ============================================================================

/// `INSERT VERTEX` for one record, covering every tag of its type.
pub fn insert_vertex(resolver: &SchemaResolver, vertex: &dyn Record, if_not_exists: bool) -> Result<String> {
    let descriptor = resolver.vertex_of(vertex.record_type())?;
    let vid = descriptor.vid_literal(vertex)?;

    let mut targets = Vec::with_capacity(descriptor.tags().len());
    let mut values = Vec::new();
    for tag in descriptor.tags() {
        let names: Vec<&str> = tag.properties().iter().map(|p| p.name.as_str()).collect();
        targets.push(format!("{}({})", tag.name(), names.join(", ")));
        for property in tag.properties() {
            values.push(resolver.format_property(property, vertex)?);
        }
    }
    Ok(format!(
        "INSERT VERTEX {}{} VALUES {vid}:({})",
        if_not_exists_clause(if_not_exists),
        targets.join(", "),
        values.join(", ")
    ))
}

/// `INSERT EDGE` for one record.
pub fn insert_edge(resolver: &SchemaResolver, edge: &dyn Record, if_not_exists: bool) -> Result<String> {
    let descriptor = resolver.edge_of(edge.record_type())?;
    let src = descriptor.src_literal(edge)?;
    let dst = descriptor.dst_literal(edge)?;
    let rank = descriptor.rank(edge)?;

    let names: Vec<&str> = descriptor.properties().iter().map(|p| p.name.as_str()).collect();
    let values = descriptor
        .properties()
        .iter()
        .map(|p| resolver.format_property(p, edge))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!(
        "INSERT EDGE {}{}({}) VALUES {src}->{dst}@{rank}:({})",
        if_not_exists_clause(if_not_exists),
        descriptor.edge_type(),
        names.join(", "),
        values.join(", ")
    ))
}

fn if_not_exists_clause(if_not_exists: bool) -> &'static str {
    if if_not_exists { "IF NOT EXISTS " } else { "" }
}
