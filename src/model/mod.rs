//! # Wire Model
//!
//! Plain DTOs for the values the graph client hands back: tagged scalars,
//! temporals, vertices, edges, containers and result rows.
//!
//! Design rule: no record types and no descriptors here.
//! Pure data: no I/O and no state.

pub mod node;
pub mod relationship;
pub mod value;
pub mod property_map;
pub mod temporal;
pub mod row;

pub use node::{WireTag, WireVertex};
pub use relationship::WireEdge;
pub use value::WireValue;
pub use property_map::{PropertyMap, property_map};
pub use temporal::{WireDate, WireDateTime, WireTime};
pub use row::WireRow;
