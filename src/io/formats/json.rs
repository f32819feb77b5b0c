//! JSON format adapter.
//!
//! Supports both newline-delimited JSON (NDJSON/JSONL) and JSON arrays.

use crate::io::traits::{Record, RecordSource};
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::io::BufRead;

/// JSON record source.
///
/// Automatically detects and handles both formats:
/// - **NDJSON/JSONL**: One JSON object per line
/// - **Array**: A JSON array of objects `[{...}, {...}]`
pub struct JsonRecordSource<R: BufRead> {
    reader: R,
    /// Records parsed ahead of the caller (array mode, or the first NDJSON line).
    buffer: VecDeque<Record>,
    /// Whether we've detected and started parsing.
    started: bool,
    /// Whether we're in array mode.
    array_mode: bool,
    /// Line number for error reporting.
    line_number: usize,
}

impl<R: BufRead> JsonRecordSource<R> {
    /// Creates a new JSON record source.
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: VecDeque::new(),
            started: false,
            array_mode: false,
            line_number: 0,
        }
    }

    fn read_line(&mut self, line: &mut String) -> Result<usize> {
        self.reader
            .read_line(line)
            .map_err(|e| Error::OperationFailed {
                operation: "read_json".to_string(),
                cause: e.to_string(),
            })
    }

    /// Reads up to the first non-blank line to detect the layout.
    ///
    /// Returns `false` for an empty input.
    fn detect_format(&mut self) -> Result<bool> {
        self.started = true;

        let mut first_line = String::new();
        loop {
            first_line.clear();
            if self.read_line(&mut first_line)? == 0 {
                return Ok(false);
            }
            self.line_number += 1;
            if !first_line.trim().is_empty() {
                break;
            }
        }

        if first_line.trim_start().starts_with('[') {
            self.array_mode = true;
            let mut remaining = String::new();
            self.reader
                .read_to_string(&mut remaining)
                .map_err(|e| Error::OperationFailed {
                    operation: "read_json".to_string(),
                    cause: e.to_string(),
                })?;
            let full_content = format!("{first_line}{remaining}");

            let rows: Vec<Map<String, Value>> = serde_json::from_str(&full_content)
                .map_err(|e| Error::InvalidInput(format!("Failed to parse JSON array: {e}")))?;
            self.buffer = rows.into_iter().map(Record::from_json_object).collect();
        } else {
            let record = parse_object_line(first_line.trim(), self.line_number)?;
            self.buffer.push_back(record);
        }

        Ok(true)
    }
}

/// Parses one NDJSON line into a record.
fn parse_object_line(line: &str, line_number: usize) -> Result<Record> {
    let object: Map<String, Value> = serde_json::from_str(line).map_err(|e| {
        Error::InvalidInput(format!(
            "Line {line_number}: Failed to parse JSON object: {e}"
        ))
    })?;
    Ok(Record::from_json_object(object))
}

impl<R: BufRead> RecordSource for JsonRecordSource<R> {
    fn next(&mut self) -> Result<Option<Record>> {
        if !self.started && !self.detect_format()? {
            return Ok(None);
        }

        if let Some(record) = self.buffer.pop_front() {
            return Ok(Some(record));
        }
        if self.array_mode {
            return Ok(None);
        }

        let mut line = String::new();
        loop {
            line.clear();
            if self.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;
            if !line.trim().is_empty() {
                break;
            }
        }

        parse_object_line(line.trim(), self.line_number).map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        if self.array_mode {
            Some(self.buffer.len())
        } else {
            None
        }
    }
}
