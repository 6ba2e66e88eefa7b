//! # Value Codec
//!
//! Two directions between native fields and the graph's value model:
//!
//! - [`format()`]: a field's current value → an nGQL literal, steered by
//!   the property's [`StorageHint`](crate::schema::StorageHint).
//! - [`scan()`]: a [`WireValue`](crate::model::WireValue) → a field, steered
//!   by the field's write view.
//!
//! Both read the time zone from the [`CodecConfig`](crate::CodecConfig) they
//! are given; nothing here holds state.

pub mod any;
pub mod format;
pub mod scan;

pub use any::AnyValue;
pub use format::{format, quote, EMPTY_LITERAL, NULL_LITERAL};
pub use scan::scan;
