//! Core types for reading tabular inputs.
//!
//! Defines the [`Record`] row representation and the [`RecordSource`] trait
//! that format adapters implement.

use crate::Result;
use serde_json::Value;
use std::collections::BTreeMap;

/// One row of a tabular input: field name to value.
///
/// A value is either a string or null. Typed scalars from Parquet, JSON or
/// YAML are stored in their display form (`42`, `true`, `1.5`); nested
/// values are stored as JSON text.
///
/// A field can be absent (the column does not exist for this row) or present
/// but null. [`Record::get`] treats both the same way, which is what the
/// default-value fallbacks of the graph builder rely on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<String, Option<String>>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record from `(field, value)` pairs, all non-null.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), Some(v.into())))
            .collect();
        Self { fields }
    }

    /// Builds a record from a JSON object.
    #[must_use]
    pub fn from_json_object(object: serde_json::Map<String, Value>) -> Self {
        let fields = object
            .into_iter()
            .map(|(k, v)| (k, json_value_to_field(v)))
            .collect();
        Self { fields }
    }

    /// Sets a non-null field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), Some(value.into()));
        self
    }

    /// Sets a field to null.
    #[must_use]
    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), None);
        self
    }

    /// Inserts or replaces a field.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        self.fields.insert(name.into(), value);
    }

    /// Returns the field value if the field is present and non-null.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Option::as_deref)
    }

    /// Returns true if the field exists, even when its value is null.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}

/// Converts a JSON value into a record field value.
fn json_value_to_field(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested @ (Value::Array(_) | Value::Object(_)) => Some(nested.to_string()),
    }
}

/// Source of input records.
///
/// Implementations read rows from a specific format (Parquet, CSV, JSON,
/// YAML) and yield them in file order.
pub trait RecordSource {
    /// Reads the next record from the source.
    ///
    /// Returns `Ok(None)` when the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O errors occur.
    fn next(&mut self) -> Result<Option<Record>>;

    /// Returns an estimate of the total number of records.
    ///
    /// Used to pre-size buffers. Returns `None` if unknown.
    fn size_hint(&self) -> Option<usize> {
        None
    }
}
