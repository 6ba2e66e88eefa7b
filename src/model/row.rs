//! One result row: ordered column names and their values.

use serde::{Deserialize, Serialize};
use super::WireValue;

/// A single row of a result set, columns in server order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireRow {
    pub columns: Vec<String>,
    pub values: Vec<WireValue>,
}

impl WireRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<WireValue>) -> Self {
        self.columns.push(column.into());
        self.values.push(value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&WireValue> {
        self.columns.iter().position(|c| c == column).and_then(|i| self.values.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WireValue)> {
        self.columns.iter().map(String::as_str).zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
