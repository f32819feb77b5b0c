//! YAML format adapter.
//!
//! Accepts either a single sequence of mappings or a document stream where
//! each document (separated by `---`) is one row.

use crate::io::traits::{Record, RecordSource};
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::io::BufRead;

/// YAML record source.
///
/// Parses all documents upfront since YAML requires full parsing.
pub struct YamlRecordSource {
    /// Pre-parsed records from the YAML input.
    records: Vec<Record>,
    /// Current index.
    index: usize,
}

impl YamlRecordSource {
    /// Creates a new YAML record source.
    ///
    /// # Errors
    ///
    /// Returns an error if YAML parsing fails.
    pub fn new<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|e| Error::OperationFailed {
                operation: "read_yaml".to_string(),
                cause: e.to_string(),
            })?;

        if content.trim().is_empty() {
            return Ok(Self {
                records: Vec::new(),
                index: 0,
            });
        }

        // Try parsing as a sequence first (array of rows)
        if let Ok(rows) = serde_yaml_ng::from_str::<Vec<Map<String, Value>>>(&content) {
            let records = rows.into_iter().map(Record::from_json_object).collect();
            return Ok(Self { records, index: 0 });
        }

        let mut records = Vec::new();
        for (doc_index, document) in serde_yaml_ng::Deserializer::from_str(&content).enumerate() {
            let row: Map<String, Value> =
                serde::Deserialize::deserialize(document).map_err(|e| {
                    Error::InvalidInput(format!(
                        "Document {}: Failed to parse YAML: {e}",
                        doc_index + 1
                    ))
                })?;
            records.push(Record::from_json_object(row));
        }

        Ok(Self { records, index: 0 })
    }
}

impl RecordSource for YamlRecordSource {
    fn next(&mut self) -> Result<Option<Record>> {
        let record = self.records.get(self.index).cloned();
        if record.is_some() {
            self.index += 1;
        }
        Ok(record)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.records.len())
    }
}
