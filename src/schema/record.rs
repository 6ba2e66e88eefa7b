//! Result-row projections: column name → field.

use hashbrown::HashMap;
use tracing::debug;

use super::ensure_type;
use crate::annotation::{self, to_snake_case};
use crate::model::WireRow;
use crate::reflect::{field_at_mut, introspect, FieldPath, Record, RecordType};
use crate::resolver::SchemaResolver;
use crate::Result;

/// Decode-only mapping for projecting `WireRow`s into a record.
#[derive(Debug, Clone)]
pub struct RecordDescriptor {
    record_type: RecordType,
    columns: HashMap<String, FieldPath>,
}

impl RecordDescriptor {
    /// Columns are named by `col:<name>`, else by the snake-cased field
    /// name. The first field to claim a column keeps it.
    pub fn parse(ty: RecordType) -> Self {
        let mut columns = HashMap::new();
        for field in introspect(ty) {
            let ann = field.annotation();
            let column = ann
                .value(annotation::COL)
                .map(str::to_string)
                .unwrap_or_else(|| to_snake_case(field.name));
            columns.entry(column).or_insert(field.path);
        }
        debug!(record = ty.short_name(), columns = columns.len(), "parsed record descriptor");
        Self { record_type: ty, columns }
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn field_path(&self, column: &str) -> Option<&FieldPath> {
        self.columns.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Scan every known column of `row` into `dest`; unknown columns are
    /// skipped.
    pub fn scan_row(&self, resolver: &SchemaResolver, row: &WireRow, dest: &mut dyn Record) -> Result<()> {
        ensure_type(self.record_type, dest)?;
        for (column, value) in row.iter() {
            if let Some(path) = self.columns.get(column) {
                resolver.scan(value, field_at_mut(dest, path)?)?;
            }
        }
        Ok(())
    }
}
