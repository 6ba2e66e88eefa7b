//! # norm: NebulaGraph schema resolution and value marshaling
//!
//! Maps plain Rust record types onto NebulaGraph vertices, edges and result
//! rows, and moves values between the two in both directions.
//!
//! ## Design Principles
//!
//! 1. **Declared, not reflected**: a record type describes its fields once
//!    (`record!`), and everything else is derived from that listing
//! 2. **Descriptors are built once**: `SchemaResolver` caches one immutable
//!    descriptor per type, shared across threads
//! 3. **Exhaustive conversion**: every wire tag × destination kind pair is a
//!    match arm or an `UnsupportedConversion` error
//! 4. **No globals**: the time zone travels in a `CodecConfig`
//!
//! ## Quick Start
//!
//! ```rust
//! use norm::{record, SchemaResolver, WireValue, WireVertex};
//! use norm::reflect::{TagNamer, VertexIdStr};
//!
//! record! {
//!     #[derive(Debug, Default, Clone, PartialEq)]
//!     pub struct Player [string_id, tag] {
//!         pub vid: String = "vertex_id",
//!         pub name: String,
//!         pub age: i64,
//!     }
//! }
//!
//! impl VertexIdStr for Player {
//!     fn vertex_id(&self) -> String { self.vid.clone() }
//! }
//!
//! impl TagNamer for Player {
//!     fn tag_name() -> String { "player".into() }
//! }
//!
//! # fn main() -> norm::Result<()> {
//! let resolver = SchemaResolver::new();
//!
//! let wire = WireValue::from(
//!     WireVertex::new("p1").with_tag("player", [("name", WireValue::from("Tim")), ("age", WireValue::from(42))]),
//! );
//! let mut player = Player::default();
//! resolver.scan(&wire, &mut player)?;
//! assert_eq!(player.age, 42);
//!
//! let stmt = norm::ngql::insert_vertex(&resolver, &player, false)?;
//! assert_eq!(stmt, r#"INSERT VERTEX player(name, age) VALUES "p1":("Tim", 42)"#);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module | Role |
//! |--------|------|
//! | [`reflect`] | `Field` / `Record` traits, field introspection |
//! | [`annotation`] | per-field annotation grammar |
//! | [`schema`] | vertex, edge and record descriptors |
//! | [`codec`] | Format (native → literal) and Scan (wire → native) |
//! | [`resolver`] | concurrent descriptor caches |
//! | [`ngql`] | DDL / insert statements from descriptors |
//! | [`model`] | wire value model handed over by the client |

// ============================================================================
// Modules
// ============================================================================

pub mod annotation;
pub mod codec;
pub mod config;
pub mod model;
pub mod ngql;
pub mod reflect;
pub mod resolver;
pub mod schema;

// ============================================================================
// Re-exports: Model (the wire DTOs)
// ============================================================================

pub use model::{PropertyMap, WireDate, WireDateTime, WireEdge, WireRow, WireTag, WireTime, WireValue, WireVertex};

// ============================================================================
// Re-exports: Records and descriptors
// ============================================================================

pub use reflect::{
    Capabilities, EdgeTypeNamer, Field, FieldPath, Record, RecordType, Shape, TagNamer, VertexIdInt64, VertexIdStr,
};
pub use schema::{
    EdgeDescriptor, IndexKind, IndexSpec, PropertyDescriptor, RecordDescriptor, SecondaryIndex, StorageHint,
    VertexDescriptor, VertexId, VertexTag, VidType,
};

// ============================================================================
// Re-exports: Codec and resolver
// ============================================================================

pub use codec::AnyValue;
pub use config::CodecConfig;
pub use resolver::SchemaResolver;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot resolve {type_name}: {message}")]
    Structural { type_name: String, message: String },

    #[error("Unsettable destination: {0}")]
    Unsettable(String),

    #[error("Unsupported conversion: {from} to {to}")]
    UnsupportedConversion { from: String, to: String },

    #[error("Index spec error: {0}")]
    IndexSpec(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid temporal value: {0}")]
    InvalidTemporal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
